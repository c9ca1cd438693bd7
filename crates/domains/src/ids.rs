//! # Identifier Value Objects
//!
//! One strongly-typed UUID newtype per aggregate. Parsing is strict: an
//! empty string is rejected the same way a malformed string is, so callers
//! never have to reason about a "blank means absent" special case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses the canonical hyphenated form. Empty and malformed
            /// input both fail with [`DomainError::InvalidEntry`].
            pub fn parse_str(input: &str) -> Result<Self, DomainError> {
                if input.trim().is_empty() {
                    return Err(DomainError::InvalidEntry(format!(
                        "{} cannot be empty",
                        stringify!($name)
                    )));
                }
                Uuid::parse_str(input).map(Self).map_err(|_| {
                    DomainError::InvalidEntry(format!(
                        "invalid UUID string: '{input}'"
                    ))
                })
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_str(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identity of a [`crate::member::Member`].
    MemberId
);
entity_id!(
    /// Identity of a [`crate::work::Work`].
    WorkId
);
entity_id!(
    /// Identity of a [`crate::critique::Critique`].
    CritiqueId
);
entity_id!(
    /// Identity of a [`crate::rating::Rating`].
    RatingId
);
entity_id!(
    /// Identity of a [`crate::credit::CreditTransaction`].
    TransactionId
);
entity_id!(
    /// Identity of a [`crate::profile::MemberProfile`].
    ProfileId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_canonical_form() {
        let id = WorkId::new();
        let parsed = WorkId::parse_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn empty_string_is_an_error_not_none() {
        let err = MemberId::parse_str("").unwrap_err();
        assert!(matches!(err, DomainError::InvalidEntry(_)));
        let err = MemberId::parse_str("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidEntry(_)));
    }

    #[test]
    fn malformed_string_is_rejected() {
        let err = CritiqueId::parse_str("not-a-uuid").unwrap_err();
        assert!(matches!(err, DomainError::InvalidEntry(_)));
    }
}
