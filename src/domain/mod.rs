//! Domain types for the media catalogue, relationship graph and user lists.
//!
//! Identifiers are newtypes so a media id can never be handed to a query
//! expecting a user id.

pub mod errors;
pub mod fields;
pub mod graph;
pub mod list;
pub mod media;

pub use errors::ConstraintViolation;
pub use fields::{FieldMap, build_new_media, partition_fields};
pub use graph::{Edge, LinkKind, Relationship, related_ids};
pub use list::{ListEntry, MediaSummary};
pub use media::{
    AiringStatus, BookReleaseStatus, FilmReleaseStatus, Media, MediaBase, MediaDetails, MediaKind,
    NewMedia, Rating,
};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

define_id!(
    /// Primary key of a row in `media`.
    ///
    /// ```rust
    /// use mymedialist::domain::MediaId;
    ///
    /// let id = MediaId::new(42);
    /// assert_eq!(id.value(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    MediaId
);

define_id!(
    /// Primary key of a row in `users`.
    UserId
);

/// Possessive form used in page titles: "james' profile", "john_smith's profile".
#[must_use]
pub fn possessive(name: &str) -> String {
    if name.ends_with('s') {
        format!("{name}'")
    } else {
        format!("{name}'s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_i32() {
        let id = MediaId::from(7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(UserId::new(3).value(), 3);
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&MediaId::new(12)).unwrap();
        assert_eq!(json, "12");
    }

    #[test]
    fn possessive_handles_trailing_s() {
        assert_eq!(possessive("john_smith"), "john_smith's");
        assert_eq!(possessive("james"), "james'");
        assert_eq!(possessive("JAMES"), "JAMES's");
    }
}
