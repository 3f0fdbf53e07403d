//! Ownership checks for user-owned resources.
//!
//! Every mutation of an owned resource goes through [`ensure_owner`], so the
//! rule "only the owner may change it" lives in exactly one place.

use super::{Error, UserId};

/// A resource with a single owning user.
pub trait Owned {
    /// The user allowed to mutate the resource.
    fn owner_id(&self) -> &UserId;
}

/// Whether `requester` owns `resource`.
///
/// # Examples
/// ```
/// use scribe::domain::{Owned, UserId, is_owner};
///
/// struct Note(UserId);
/// impl Owned for Note {
///     fn owner_id(&self) -> &UserId { &self.0 }
/// }
///
/// let owner = UserId::random();
/// assert!(is_owner(&Note(owner), &owner));
/// assert!(!is_owner(&Note(owner), &UserId::random()));
/// ```
#[must_use]
pub fn is_owner<R: Owned + ?Sized>(resource: &R, requester: &UserId) -> bool {
    resource.owner_id() == requester
}

/// Fail with [`crate::domain::ErrorCode::Forbidden`] unless `requester` owns
/// `resource`.
pub fn ensure_owner<R: Owned + ?Sized>(
    resource: &R,
    requester: &UserId,
    message: &str,
) -> Result<(), Error> {
    if is_owner(resource, requester) {
        Ok(())
    } else {
        Err(Error::forbidden(message))
    }
}
