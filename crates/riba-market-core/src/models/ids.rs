//! Newtype IDs for type-safe entity references.
//!
//! Every record id is a string on the wire. Wrapping each one in its own type
//! keeps a catalogue id from being passed where an item id is expected.

/// Define a string-backed id wrapper with serde `transparent` encoding.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "ts", derive(ts_rs::TS))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random id.
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Seller catalogue (also called a store).
    CatalogueId
);
define_id!(CatalogueItemId);
define_id!(ProductId);
define_id!(UserId);
define_id!(OrderId);
define_id!(AddressId);
define_id!(ReviewId);
