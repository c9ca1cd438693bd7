//! # Rating Aggregate
//!
//! A numeric rating of a critique. The member and critique references are
//! construct-once: private fields with read accessors and no mutator, so
//! reassignment is impossible by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::ids::{CritiqueId, MemberId, RatingId};

/// Integer score constrained to 1–5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingScore(u8);

impl RatingScore {
    pub fn new(score: u8) -> Result<Self> {
        if !(1..=5).contains(&score) {
            return Err(DomainError::InvalidEntry(
                "score must be between 1 and 5".into(),
            ));
        }
        Ok(Self(score))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Optional free-text comment accompanying a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingComment(String);

impl RatingComment {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingStatus {
    PendingReview,
    Active,
    Rejected,
    Archived,
    MarkedForDeletion,
}

impl RatingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingStatus::PendingReview => "PENDING REVIEW",
            RatingStatus::Active => "ACTIVE",
            RatingStatus::Rejected => "REJECTED",
            RatingStatus::Archived => "ARCHIVED",
            RatingStatus::MarkedForDeletion => "MARKED FOR DELETION",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "PENDING REVIEW" => Ok(RatingStatus::PendingReview),
            "ACTIVE" => Ok(RatingStatus::Active),
            "REJECTED" => Ok(RatingStatus::Rejected),
            "ARCHIVED" => Ok(RatingStatus::Archived),
            "MARKED FOR DELETION" => Ok(RatingStatus::MarkedForDeletion),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid rating status"
            ))),
        }
    }
}

/// A member's rating of a critique.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub id: RatingId,
    pub score: RatingScore,
    pub comment: Option<RatingComment>,
    pub status: RatingStatus,
    pub submission_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub archive_date: Option<DateTime<Utc>>,
    member_id: MemberId,
    critique_id: CritiqueId,
}

impl Rating {
    /// Validating factory. The score is already constrained by its value
    /// object; both back-references are required and fixed for the life of
    /// the rating.
    pub fn create(
        score: RatingScore,
        comment: Option<RatingComment>,
        critique_id: CritiqueId,
        member_id: MemberId,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: RatingId::new(),
            score,
            comment,
            status: RatingStatus::Active,
            submission_date: now,
            last_updated_date: now,
            archive_date: None,
            member_id,
            critique_id,
        })
    }

    /// Rebuilds a rating from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: RatingId,
        score: RatingScore,
        comment: Option<RatingComment>,
        status: RatingStatus,
        submission_date: DateTime<Utc>,
        last_updated_date: DateTime<Utc>,
        archive_date: Option<DateTime<Utc>>,
        member_id: MemberId,
        critique_id: CritiqueId,
    ) -> Self {
        Self {
            id,
            score,
            comment,
            status,
            submission_date,
            last_updated_date,
            archive_date,
            member_id,
            critique_id,
        }
    }

    /// Read-only after construction.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Read-only after construction.
    pub fn critique_id(&self) -> CritiqueId {
        self.critique_id
    }

    pub fn update_score(&mut self, score: RatingScore) {
        self.score = score;
        self.last_updated_date = Utc::now();
    }

    pub fn add_comment(&mut self, comment: RatingComment) {
        self.comment = Some(comment);
        self.last_updated_date = Utc::now();
    }

    pub fn approve(&mut self) {
        self.status = RatingStatus::Active;
        self.last_updated_date = Utc::now();
    }

    pub fn reject(&mut self) {
        self.status = RatingStatus::Rejected;
        self.last_updated_date = Utc::now();
    }

    /// Idempotent: archiving an archived rating stays ARCHIVED.
    pub fn archive(&mut self) {
        self.status = RatingStatus::Archived;
        self.archive_date = Some(Utc::now());
        self.last_updated_date = Utc::now();
    }

    pub fn mark_for_deletion(&mut self) {
        self.status = RatingStatus::MarkedForDeletion;
        self.last_updated_date = Utc::now();
    }

    pub fn mark_pending_review(&mut self) {
        self.status = RatingStatus::PendingReview;
        self.last_updated_date = Utc::now();
    }

    /// Only an archived rating can be restored; anything else is a no-op.
    pub fn restore(&mut self) {
        if self.status == RatingStatus::Archived {
            self.status = RatingStatus::Active;
            self.archive_date = None;
            self.last_updated_date = Utc::now();
        }
    }
}
