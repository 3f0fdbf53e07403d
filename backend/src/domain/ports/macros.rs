//! Helper macro for declaring port error enums.
//!
//! Each variant gets a `snake_case` constructor; `String` fields accept
//! anything that converts into a `String`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $( define_port_error!(@constructor $variant $( { $($field : $ty),* } )?); )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Retries { attempts: u32 } => "gave up after {attempts} attempts",
            Rejected { message: String, status: u16 } => "rejected ({status}): {message}",
            Taken => "already taken",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        assert_eq!(SamplePortError::unreachable("db").to_string(), "unreachable: db");
    }

    #[rstest]
    fn non_string_fields_keep_their_type() {
        assert_eq!(
            SamplePortError::retries(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[rstest]
    fn mixed_fields_are_supported() {
        assert_eq!(
            SamplePortError::rejected("bad row", 409_u16).to_string(),
            "rejected (409): bad row"
        );
    }

    #[rstest]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::taken(), SamplePortError::Taken);
        assert_eq!(SamplePortError::taken().to_string(), "already taken");
    }
}
