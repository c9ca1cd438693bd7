//! # Member Aggregate
//!
//! Identity and access management: the member aggregate, its role/status
//! lifecycle, the password policy, and the role→permission lookup table.
//! Passwords only ever exist here as Argon2 PHC strings; plaintext is
//! hashed at the construction boundary and never stored or logged.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::critique::Critique;
use crate::error::{DomainError, Result};
use crate::ids::MemberId;
use crate::work::Work;

/// Substrings that immediately disqualify a password.
const PASSWORD_BLOCKLIST: [&str; 4] = ["password", "abcdefg", "12345678", "qwerty"];

const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Admin,
    Staff,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "ADMIN",
            MemberRole::Staff => "STAFF",
            MemberRole::Member => "MEMBER",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "ADMIN" => Ok(MemberRole::Admin),
            "STAFF" => Ok(MemberRole::Staff),
            "MEMBER" => Ok(MemberRole::Member),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid member role"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
    Suspended,
    MarkedForDeletion,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Inactive => "INACTIVE",
            MemberStatus::Suspended => "SUSPENDED",
            MemberStatus::MarkedForDeletion => "MARKED_FOR_DELETION",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "ACTIVE" => Ok(MemberStatus::Active),
            "INACTIVE" => Ok(MemberStatus::Inactive),
            "SUSPENDED" => Ok(MemberStatus::Suspended),
            "MARKED_FOR_DELETION" => Ok(MemberStatus::MarkedForDeletion),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid member status"
            ))),
        }
    }
}

/// One allowed `{action, resource}` pair for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub action: String,
    pub resource: String,
}

/// Immutable role→permission table, loaded once from the declarative roles
/// file at startup and injected wherever permission checks are needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolePermissions {
    grants: HashMap<MemberRole, Vec<Permission>>,
}

impl RolePermissions {
    pub fn new(grants: HashMap<MemberRole, Vec<Permission>>) -> Self {
        Self { grants }
    }

    pub fn allows(&self, role: MemberRole, action: &str, resource: &str) -> bool {
        self.grants
            .get(&role)
            .map(|perms| {
                perms
                    .iter()
                    .any(|p| p.action == action && p.resource == resource)
            })
            .unwrap_or(false)
    }
}

/// An Argon2 PHC-format password hash. Constructing one from plaintext is
/// the only way to get a `PasswordDigest`, so a plaintext password can never
/// end up in a persisted field.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

// Debug shows a placeholder so hashes never end up in logs.
impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

impl PasswordDigest {
    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash(plaintext: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| DomainError::InvalidEntry(format!("password hashing failed: {e}")))?;
        Ok(Self(hash.to_string()))
    }

    /// Constant-time verification of a candidate against the stored hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let parsed = match PasswordHash::new(&self.0) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Rehydrates a digest from its persisted PHC string.
    pub fn from_phc_string(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A platform member: owns works, authors critiques, and carries the
/// role/status pair every permission decision is made against.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub email: String,
    password: PasswordDigest,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub works: Vec<Work>,
    pub critiques: Vec<Critique>,
    pub last_login: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
}

impl Member {
    /// Validating factory: rejects missing fields and policy-violating
    /// passwords, hashes the password, and returns a member in INACTIVE
    /// status awaiting activation.
    pub fn create(username: &str, email: &str, password: &str, role: MemberRole) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(DomainError::MissingEntry("username".into()));
        }
        if email.trim().is_empty() {
            return Err(DomainError::MissingEntry("email".into()));
        }
        if password.is_empty() {
            return Err(DomainError::MissingEntry("password".into()));
        }
        Self::validate_password_strength(password)?;
        let digest = PasswordDigest::hash(password)?;
        let now = Utc::now();
        Ok(Self {
            id: MemberId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password: digest,
            role,
            status: MemberStatus::Inactive,
            works: Vec::new(),
            critiques: Vec::new(),
            last_login: now,
            last_updated_date: now,
            created_date: now,
        })
    }

    /// Registration flow: `create` plus a password-confirmation check.
    pub fn register(
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self> {
        if confirm_password.is_empty() {
            return Err(DomainError::MissingEntry("confirm password".into()));
        }
        if password != confirm_password {
            return Err(DomainError::NonMatchingPasswords);
        }
        Self::create(username, email, password, MemberRole::Member)
    }

    /// Rebuilds a member from persisted state. No validation: the fields
    /// were validated when the aggregate was first constructed.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: MemberId,
        username: String,
        email: String,
        password: PasswordDigest,
        role: MemberRole,
        status: MemberStatus,
        works: Vec<Work>,
        critiques: Vec<Critique>,
        last_login: DateTime<Utc>,
        last_updated_date: DateTime<Utc>,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password,
            role,
            status,
            works,
            critiques,
            last_login,
            last_updated_date,
            created_date,
        }
    }

    /// Minimum length of 8, at least one letter, one digit and one symbol,
    /// and none of the blocklisted substrings.
    pub fn validate_password_strength(password: &str) -> Result<()> {
        if password.len() < PASSWORD_MIN_LEN {
            return Err(DomainError::WeakPassword(
                "minimum length of 8 characters required".into(),
            ));
        }
        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
        if !(has_letter && has_digit && has_symbol) {
            return Err(DomainError::WeakPassword(
                "mix of letters, numbers, and symbols required".into(),
            ));
        }
        let lowered = password.to_lowercase();
        if PASSWORD_BLOCKLIST.iter().any(|word| lowered.contains(word)) {
            return Err(DomainError::WeakPassword(
                "password is easily guessable".into(),
            ));
        }
        Ok(())
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password.verify(candidate)
    }

    /// Verifies the old password before re-hashing the new one.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<()> {
        Self::validate_password_strength(new_password)?;
        if !self.password.verify(old_password) {
            return Err(DomainError::IncorrectCredentials);
        }
        self.password = PasswordDigest::hash(new_password)?;
        self.last_updated_date = Utc::now();
        Ok(())
    }

    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password
    }

    pub fn activate(&mut self) {
        self.status = MemberStatus::Active;
        self.last_updated_date = Utc::now();
    }

    pub fn deactivate_self(&mut self) {
        self.status = MemberStatus::Inactive;
        self.last_updated_date = Utc::now();
    }

    /// Admin-only: deactivate another member.
    pub fn deactivate_member(&self, other: &mut Member) -> Result<()> {
        if self.role != MemberRole::Admin {
            return Err(DomainError::PermissionDenied(
                "only admins can deactivate members".into(),
            ));
        }
        other.status = MemberStatus::Inactive;
        other.last_updated_date = Utc::now();
        Ok(())
    }

    /// Members are never hard-deleted, only marked.
    pub fn mark_for_deletion(&mut self) {
        self.status = MemberStatus::MarkedForDeletion;
        self.last_updated_date = Utc::now();
    }

    pub fn record_login(&mut self) {
        self.last_login = Utc::now();
    }

    /// Appends a work to the owned collection. Duplicates are detected by
    /// id, not by object identity.
    pub fn add_work(&mut self, work: Work) -> Result<()> {
        if self.works.iter().any(|w| w.id == work.id) {
            return Err(DomainError::DuplicateEntry(format!(
                "work {} already exists",
                work.id
            )));
        }
        self.works.push(work);
        self.last_updated_date = Utc::now();
        Ok(())
    }

    /// Appends an authored critique, rejecting duplicates by id.
    pub fn add_critique(&mut self, critique: Critique) -> Result<()> {
        if self.critiques.iter().any(|c| c.id == critique.id) {
            return Err(DomainError::DuplicateEntry(format!(
                "critique {} already exists",
                critique.id
            )));
        }
        self.critiques.push(critique);
        self.last_updated_date = Utc::now();
        Ok(())
    }

    pub fn list_works(&self) -> &[Work] {
        &self.works
    }

    pub fn list_critiques(&self) -> &[Critique] {
        &self.critiques
    }

    /// Pure lookup against the injected role table.
    pub fn has_permission(&self, roles: &RolePermissions, action: &str, resource: &str) -> bool {
        roles.allows(self.role, action, resource)
    }
}
