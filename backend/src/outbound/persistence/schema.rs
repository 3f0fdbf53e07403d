//! Diesel table definitions for the PostgreSQL schema.
//!
//! Kept in step with `backend/migrations`. Uniqueness of usernames and
//! emails is enforced by partial indexes over rows whose `deleted_at` is
//! null, so a soft-deleted account frees its username and email.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        full_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Articles, each owned by one user.
    articles (id) {
        id -> Uuid,
        title -> Varchar,
        content -> Text,
        author_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(articles -> users (author_id));
diesel::allow_tables_to_appear_in_same_query!(articles, users);

/// Index names the adapters match on when translating unique violations.
pub(crate) mod constraints {
    pub const USERS_USERNAME_LIVE: &str = "users_username_live_key";
    pub const USERS_EMAIL_LIVE: &str = "users_email_live_key";
}
