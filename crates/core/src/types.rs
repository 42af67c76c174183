//! Core identifier types for Folio
//!
//! This module defines the identities of the three persisted record kinds:
//! - ContentTypeId: identity of a content type record
//! - ContentItemId: durable identity of a content item
//! - VersionRecordId: identity of one version snapshot of an item
//!
//! All three wrap a UUID v4 so records can be identified before the
//! persistence layer has seen them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier using UUID v4
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from raw bytes
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }

            /// Parse an identifier from its string representation
            ///
            /// Returns None if the string is not a valid UUID.
            pub fn from_string(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }

            /// Get the raw bytes of this identifier
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a content type record
    ContentTypeId
);

uuid_id!(
    /// Durable identity of a content item
    ///
    /// Shared by every version of the item.
    ContentItemId
);

uuid_id!(
    /// Identity of a single version record
    ///
    /// This is the key of the identity session: resolving the same
    /// VersionRecordId twice in one unit of work yields the same item.
    VersionRecordId
);
