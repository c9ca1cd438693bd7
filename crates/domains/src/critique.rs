//! # Critique Aggregate
//!
//! A structured critique of a work: four required text sections with
//! configurable minimum word counts, the same five-state moderation
//! lifecycle as works, and an attached collection of ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::ids::{CritiqueId, MemberId, WorkId};
use crate::rating::Rating;

/// Default minimum word counts per section, overridable through
/// configuration.
pub const DEFAULT_ABOUT_MIN_WORDS: usize = 20;
pub const DEFAULT_SUCCESSES_MIN_WORDS: usize = 40;
pub const DEFAULT_WEAKNESSES_MIN_WORDS: usize = 40;
pub const DEFAULT_IDEAS_MIN_WORDS: usize = 40;

macro_rules! critique_section {
    ($(#[$meta:meta])* $name:ident, $label:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validates non-emptiness and the minimum word count at
            /// construction; the minimum is injected from configuration.
            pub fn new(value: impl Into<String>, min_words: usize) -> Result<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::MissingEntry($label.into()));
                }
                let words = value.split_whitespace().count();
                if words < min_words {
                    return Err(DomainError::InvalidEntry(format!(
                        "the {} text should be at least {min_words} words",
                        $label
                    )));
                }
                Ok(Self(value))
            }

            /// Rehydrates persisted text without re-checking the minimum;
            /// the minimum in force at submission time may differ from the
            /// current configuration.
            pub fn from_stored(value: String) -> Self {
                Self(value)
            }

            pub fn word_count(&self) -> usize {
                self.0.split_whitespace().count()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

critique_section!(
    /// What the work is about, in the critic's words.
    CritiqueAbout,
    "about"
);
critique_section!(
    /// What the work does well.
    CritiqueSuccesses,
    "successes"
);
critique_section!(
    /// Where the work falls short.
    CritiqueWeaknesses,
    "weaknesses"
);
critique_section!(
    /// Concrete suggestions for improvement.
    CritiqueIdeas,
    "ideas"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CritiqueStatus {
    PendingReview,
    Active,
    Rejected,
    Archived,
    MarkedForDeletion,
}

impl CritiqueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CritiqueStatus::PendingReview => "PENDING REVIEW",
            CritiqueStatus::Active => "ACTIVE",
            CritiqueStatus::Rejected => "REJECTED",
            CritiqueStatus::Archived => "ARCHIVED",
            CritiqueStatus::MarkedForDeletion => "MARKED FOR DELETION",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "PENDING REVIEW" => Ok(CritiqueStatus::PendingReview),
            "ACTIVE" => Ok(CritiqueStatus::Active),
            "REJECTED" => Ok(CritiqueStatus::Rejected),
            "ARCHIVED" => Ok(CritiqueStatus::Archived),
            "MARKED FOR DELETION" => Ok(CritiqueStatus::MarkedForDeletion),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid critique status"
            ))),
        }
    }
}

/// A member's structured critique of a work.
#[derive(Debug, Clone, PartialEq)]
pub struct Critique {
    pub id: CritiqueId,
    pub about: CritiqueAbout,
    pub successes: CritiqueSuccesses,
    pub weaknesses: CritiqueWeaknesses,
    pub ideas: CritiqueIdeas,
    pub status: CritiqueStatus,
    pub submission_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub archive_date: Option<DateTime<Utc>>,
    pub member_id: MemberId,
    pub work_id: WorkId,
    pub ratings: Vec<Rating>,
}

impl Critique {
    /// Validating factory. The section value objects already carry their
    /// word-count guarantees; a fresh critique is immediately ACTIVE and
    /// can be sent back to review with [`Critique::pending_review`].
    pub fn create(
        about: CritiqueAbout,
        successes: CritiqueSuccesses,
        weaknesses: CritiqueWeaknesses,
        ideas: CritiqueIdeas,
        member_id: MemberId,
        work_id: WorkId,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: CritiqueId::new(),
            about,
            successes,
            weaknesses,
            ideas,
            status: CritiqueStatus::Active,
            submission_date: now,
            last_updated_date: now,
            archive_date: None,
            member_id,
            work_id,
            ratings: Vec::new(),
        })
    }

    /// Rebuilds a critique from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: CritiqueId,
        about: CritiqueAbout,
        successes: CritiqueSuccesses,
        weaknesses: CritiqueWeaknesses,
        ideas: CritiqueIdeas,
        status: CritiqueStatus,
        submission_date: DateTime<Utc>,
        last_updated_date: DateTime<Utc>,
        archive_date: Option<DateTime<Utc>>,
        member_id: MemberId,
        work_id: WorkId,
        ratings: Vec<Rating>,
    ) -> Self {
        Self {
            id,
            about,
            successes,
            weaknesses,
            ideas,
            status,
            submission_date,
            last_updated_date,
            archive_date,
            member_id,
            work_id,
            ratings,
        }
    }

    /// Total words across all four sections; used for credit awards.
    pub fn word_count(&self) -> usize {
        self.about.word_count()
            + self.successes.word_count()
            + self.weaknesses.word_count()
            + self.ideas.word_count()
    }

    pub fn approve(&mut self) {
        self.status = CritiqueStatus::Active;
        self.last_updated_date = Utc::now();
    }

    pub fn reject(&mut self) {
        self.status = CritiqueStatus::Rejected;
        self.last_updated_date = Utc::now();
    }

    /// Idempotent: archiving an archived critique stays ARCHIVED.
    pub fn archive(&mut self) {
        self.status = CritiqueStatus::Archived;
        self.archive_date = Some(Utc::now());
        self.last_updated_date = Utc::now();
    }

    pub fn mark_for_deletion(&mut self) {
        self.status = CritiqueStatus::MarkedForDeletion;
        self.last_updated_date = Utc::now();
    }

    pub fn pending_review(&mut self) {
        self.status = CritiqueStatus::PendingReview;
        self.last_updated_date = Utc::now();
    }

    /// Only an archived critique can be restored; anything else is a no-op.
    pub fn restore(&mut self) {
        if self.status == CritiqueStatus::Archived {
            self.status = CritiqueStatus::Active;
            self.archive_date = None;
            self.last_updated_date = Utc::now();
        }
    }

    pub fn list_ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Appends a rating, rejecting duplicates by id.
    pub fn add_rating(&mut self, rating: Rating) -> Result<()> {
        if self.ratings.iter().any(|r| r.id == rating.id) {
            return Err(DomainError::DuplicateEntry(format!(
                "rating {} already exists",
                rating.id
            )));
        }
        self.ratings.push(rating);
        self.last_updated_date = Utc::now();
        Ok(())
    }
}
