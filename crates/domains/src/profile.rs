//! # Member Profile
//!
//! Public-facing profile details. Every mutator takes a pre-validated value
//! object, so an invalid name or bio can never land on a profile.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::ids::{MemberId, ProfileId};

fn validate_name(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingEntry(kind.into()));
    }
    if value.chars().count() > 50 {
        return Err(DomainError::InvalidEntry(format!(
            "{kind} must be under 50 characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirstName(String);

impl FirstName {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_name("first name", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LastName(String);

impl LastName {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_name("last name", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short biography: at most 200 words and 1200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.split_whitespace().count() > 200 || value.chars().count() > 1200 {
            return Err(DomainError::InvalidEntry(
                "bio must be under 200 words and 1200 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether the profile is publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Visibility(bool);

impl Visibility {
    pub fn new(visible: bool) -> Self {
        Self(visible)
    }

    pub fn toggle(self) -> Self {
        Self(!self.0)
    }

    pub fn is_visible(&self) -> bool {
        self.0
    }
}

/// A member's public profile.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberProfile {
    pub id: ProfileId,
    pub member_id: MemberId,
    pub first_name: FirstName,
    pub last_name: LastName,
    pub bio: Bio,
    pub visibility: Visibility,
}

impl MemberProfile {
    pub fn create(
        member_id: MemberId,
        first_name: FirstName,
        last_name: LastName,
        bio: Bio,
        visibility: Visibility,
    ) -> Self {
        Self {
            id: ProfileId::new(),
            member_id,
            first_name,
            last_name,
            bio,
            visibility,
        }
    }

    pub fn change_first_name(&mut self, first_name: FirstName) {
        self.first_name = first_name;
    }

    pub fn change_last_name(&mut self, last_name: LastName) {
        self.last_name = last_name;
    }

    pub fn change_bio(&mut self, bio: Bio) {
        self.bio = bio;
    }

    pub fn toggle_visibility(&mut self) {
        self.visibility = self.visibility.toggle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_constraints() {
        assert!(FirstName::new("").is_err());
        assert!(FirstName::new("a".repeat(51)).is_err());
        assert!(LastName::new("Nguyen").is_ok());
    }

    #[test]
    fn bio_constraints() {
        assert!(Bio::new("word ".repeat(201)).is_err());
        assert!(Bio::new("x".repeat(1201)).is_err());
        assert!(Bio::new("Writes short fiction.").is_ok());
    }

    #[test]
    fn toggle_visibility_flips() {
        let mut profile = MemberProfile::create(
            MemberId::new(),
            FirstName::new("Ada").unwrap(),
            LastName::new("Lovelace").unwrap(),
            Bio::new("First of the programmers.").unwrap(),
            Visibility::new(true),
        );
        profile.toggle_visibility();
        assert!(!profile.visibility.is_visible());
        profile.toggle_visibility();
        assert!(profile.visibility.is_visible());
    }
}
