//! # Work Aggregate
//!
//! A creative work submitted for critique: validated title/content value
//! objects, the moderation state machine, and the rule that critiques may
//! only attach while the work is ACTIVE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::critique::Critique;
use crate::error::{DomainError, Result};
use crate::ids::{MemberId, WorkId};

/// Default ceiling on work length, overridable through configuration.
pub const DEFAULT_WORK_MAX_WORDS: usize = 8_000;

/// Work title: non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::MissingEntry("title".into()));
        }
        if value.chars().count() > 100 {
            return Err(DomainError::InvalidEntry(
                "title must be under 100 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Work body text, bounded by a configured maximum word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    pub fn new(value: impl Into<String>, max_words: usize) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::MissingEntry("content".into()));
        }
        let words = value.split_whitespace().count();
        if words > max_words {
            return Err(DomainError::InvalidEntry(format!(
                "work text must be under {max_words} words"
            )));
        }
        Ok(Self(value))
    }

    /// Rehydrates persisted content without re-checking the word ceiling;
    /// the ceiling in force at submission time may differ from the current
    /// configuration.
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkStatus {
    PendingReview,
    Active,
    Rejected,
    Archived,
    MarkedForDeletion,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::PendingReview => "PENDING REVIEW",
            WorkStatus::Active => "ACTIVE",
            WorkStatus::Rejected => "REJECTED",
            WorkStatus::Archived => "ARCHIVED",
            WorkStatus::MarkedForDeletion => "MARKED FOR DELETION",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "PENDING REVIEW" => Ok(WorkStatus::PendingReview),
            "ACTIVE" => Ok(WorkStatus::Active),
            "REJECTED" => Ok(WorkStatus::Rejected),
            "ARCHIVED" => Ok(WorkStatus::Archived),
            "MARKED FOR DELETION" => Ok(WorkStatus::MarkedForDeletion),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid work status"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkAgeRestriction {
    None,
    Teen,
    Adult,
}

impl WorkAgeRestriction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkAgeRestriction::None => "NONE",
            WorkAgeRestriction::Teen => "TEEN",
            WorkAgeRestriction::Adult => "ADULT",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "NONE" => Ok(WorkAgeRestriction::None),
            "TEEN" => Ok(WorkAgeRestriction::Teen),
            "ADULT" => Ok(WorkAgeRestriction::Adult),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid age restriction"
            ))),
        }
    }
}

/// Closed genre catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkGenre {
    Biography,
    Chicklit,
    Children,
    Comedy,
    Crime,
    Drama,
    Fantasy,
    HistoricalFiction,
    Horror,
    Literary,
    Mystery,
    NewAdult,
    Paranormal,
    Romance,
    ScienceFiction,
    Speculative,
    Suspense,
    Thriller,
    Undecided,
    UrbanFantasy,
    WomensLit,
    YoungAdult,
    Other,
}

impl WorkGenre {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkGenre::Biography => "BIOGRAPHY",
            WorkGenre::Chicklit => "CHICKLIT",
            WorkGenre::Children => "CHILDREN",
            WorkGenre::Comedy => "COMEDY",
            WorkGenre::Crime => "CRIME",
            WorkGenre::Drama => "DRAMA",
            WorkGenre::Fantasy => "FANTASY",
            WorkGenre::HistoricalFiction => "HISTORICAL FICTION",
            WorkGenre::Horror => "HORROR",
            WorkGenre::Literary => "LITERARY",
            WorkGenre::Mystery => "MYSTERY",
            WorkGenre::NewAdult => "NEW ADULT",
            WorkGenre::Paranormal => "PARANORMAL",
            WorkGenre::Romance => "ROMANCE",
            WorkGenre::ScienceFiction => "SCIENCE FICTION",
            WorkGenre::Speculative => "SPECULATIVE",
            WorkGenre::Suspense => "SUSPENSE",
            WorkGenre::Thriller => "THRILLER",
            WorkGenre::Undecided => "UNDECIDED",
            WorkGenre::UrbanFantasy => "URBAN FANTASY",
            WorkGenre::WomensLit => "WOMENS LIT",
            WorkGenre::YoungAdult => "YOUNG ADULT",
            WorkGenre::Other => "OTHER",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "BIOGRAPHY" => Ok(WorkGenre::Biography),
            "CHICKLIT" => Ok(WorkGenre::Chicklit),
            "CHILDREN" => Ok(WorkGenre::Children),
            "COMEDY" => Ok(WorkGenre::Comedy),
            "CRIME" => Ok(WorkGenre::Crime),
            "DRAMA" => Ok(WorkGenre::Drama),
            "FANTASY" => Ok(WorkGenre::Fantasy),
            "HISTORICAL FICTION" => Ok(WorkGenre::HistoricalFiction),
            "HORROR" => Ok(WorkGenre::Horror),
            "LITERARY" => Ok(WorkGenre::Literary),
            "MYSTERY" => Ok(WorkGenre::Mystery),
            "NEW ADULT" => Ok(WorkGenre::NewAdult),
            "PARANORMAL" => Ok(WorkGenre::Paranormal),
            "ROMANCE" => Ok(WorkGenre::Romance),
            "SCIENCE FICTION" => Ok(WorkGenre::ScienceFiction),
            "SPECULATIVE" => Ok(WorkGenre::Speculative),
            "SUSPENSE" => Ok(WorkGenre::Suspense),
            "THRILLER" => Ok(WorkGenre::Thriller),
            "UNDECIDED" => Ok(WorkGenre::Undecided),
            "URBAN FANTASY" => Ok(WorkGenre::UrbanFantasy),
            "WOMENS LIT" => Ok(WorkGenre::WomensLit),
            "YOUNG ADULT" => Ok(WorkGenre::YoungAdult),
            "OTHER" => Ok(WorkGenre::Other),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid genre"
            ))),
        }
    }
}

/// A submitted creative work and its moderation lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Work {
    pub id: WorkId,
    pub title: Title,
    pub content: Content,
    pub age_restriction: WorkAgeRestriction,
    pub genre: WorkGenre,
    pub status: WorkStatus,
    pub word_count: usize,
    pub submission_date: DateTime<Utc>,
    pub last_update_date: DateTime<Utc>,
    pub archive_date: Option<DateTime<Utc>>,
    pub member_id: MemberId,
    pub critiques: Vec<Critique>,
}

impl Work {
    /// Validating factory. New works await review; the word count is
    /// derived from the content once, here.
    pub fn create(
        title: Title,
        content: Content,
        member_id: MemberId,
        genre: WorkGenre,
        age_restriction: WorkAgeRestriction,
    ) -> Result<Self> {
        Self::create_with_id(WorkId::new(), title, content, member_id, genre, age_restriction)
    }

    /// Variant for callers that supply an external identifier.
    pub fn create_with_id(
        id: WorkId,
        title: Title,
        content: Content,
        member_id: MemberId,
        genre: WorkGenre,
        age_restriction: WorkAgeRestriction,
    ) -> Result<Self> {
        let word_count = content.word_count();
        let now = Utc::now();
        Ok(Self {
            id,
            title,
            content,
            age_restriction,
            genre,
            status: WorkStatus::PendingReview,
            word_count,
            submission_date: now,
            last_update_date: now,
            archive_date: None,
            member_id,
            critiques: Vec::new(),
        })
    }

    /// Rebuilds a work from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: WorkId,
        title: Title,
        content: Content,
        age_restriction: WorkAgeRestriction,
        genre: WorkGenre,
        status: WorkStatus,
        submission_date: DateTime<Utc>,
        last_update_date: DateTime<Utc>,
        archive_date: Option<DateTime<Utc>>,
        member_id: MemberId,
        critiques: Vec<Critique>,
    ) -> Self {
        let word_count = content.word_count();
        Self {
            id,
            title,
            content,
            age_restriction,
            genre,
            status,
            word_count,
            submission_date,
            last_update_date,
            archive_date,
            member_id,
            critiques,
        }
    }

    pub fn approve(&mut self) {
        self.status = WorkStatus::Active;
        self.archive_date = Some(Utc::now());
        self.last_update_date = Utc::now();
    }

    pub fn reject(&mut self) {
        self.status = WorkStatus::Rejected;
        self.archive_date = Some(Utc::now());
        self.last_update_date = Utc::now();
    }

    /// Idempotent: archiving an archived work stays ARCHIVED.
    pub fn archive(&mut self) {
        self.status = WorkStatus::Archived;
        self.archive_date = Some(Utc::now());
        self.last_update_date = Utc::now();
    }

    /// Only an archived work can be restored; anything else is a no-op.
    pub fn restore(&mut self) {
        if self.status == WorkStatus::Archived {
            self.status = WorkStatus::Active;
            self.archive_date = None;
            self.last_update_date = Utc::now();
        }
    }

    pub fn mark_for_deletion(&mut self) {
        self.status = WorkStatus::MarkedForDeletion;
        self.last_update_date = Utc::now();
    }

    pub fn is_available_for_critique(&self) -> bool {
        self.status == WorkStatus::Active
    }

    pub fn list_critiques(&self) -> &[Critique] {
        &self.critiques
    }

    /// Attaches a critique. Fails unless the work is ACTIVE, and rejects a
    /// critique whose id is already in the collection.
    pub fn add_critique(&mut self, critique: Critique) -> Result<()> {
        if !self.is_available_for_critique() {
            return Err(DomainError::NotAvailableForCritique);
        }
        if self.critiques.iter().any(|c| c.id == critique.id) {
            return Err(DomainError::DuplicateEntry(format!(
                "critique {} already exists",
                critique.id
            )));
        }
        self.critiques.push(critique);
        self.last_update_date = Utc::now();
        Ok(())
    }
}
