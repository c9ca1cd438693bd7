//! # Critique Service
//!
//! Builds the four section value objects from primitive input, checks the
//! target work is open for critique, and persists both sides of the
//! attachment.

use domains::{
    Critique, CritiqueAbout, CritiqueId, CritiqueIdeas, CritiqueRepository, CritiqueSuccesses,
    CritiqueWeaknesses, MemberId, WorkId, WorkRepository, DEFAULT_ABOUT_MIN_WORDS,
    DEFAULT_IDEAS_MIN_WORDS, DEFAULT_SUCCESSES_MIN_WORDS, DEFAULT_WEAKNESSES_MIN_WORDS,
};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Minimum word counts per critique section, injected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritiqueLimits {
    pub about_min_words: usize,
    pub successes_min_words: usize,
    pub weaknesses_min_words: usize,
    pub ideas_min_words: usize,
}

impl Default for CritiqueLimits {
    fn default() -> Self {
        Self {
            about_min_words: DEFAULT_ABOUT_MIN_WORDS,
            successes_min_words: DEFAULT_SUCCESSES_MIN_WORDS,
            weaknesses_min_words: DEFAULT_WEAKNESSES_MIN_WORDS,
            ideas_min_words: DEFAULT_IDEAS_MIN_WORDS,
        }
    }
}

/// Primitive inputs for a new critique.
#[derive(Debug, Clone)]
pub struct NewCritique<'a> {
    pub about: &'a str,
    pub successes: &'a str,
    pub weaknesses: &'a str,
    pub ideas: &'a str,
    pub member_id: &'a str,
    pub work_id: &'a str,
}

/// Validates a critique and attaches it to its work. The work must be
/// ACTIVE; the aggregate enforces that and the no-duplicates rule.
pub async fn add_critique<W, C>(
    works: &mut W,
    critiques: &mut C,
    limits: &CritiqueLimits,
    input: NewCritique<'_>,
) -> Result<Critique>
where
    W: WorkRepository,
    C: CritiqueRepository,
{
    let about = CritiqueAbout::new(input.about, limits.about_min_words)?;
    let successes = CritiqueSuccesses::new(input.successes, limits.successes_min_words)?;
    let weaknesses = CritiqueWeaknesses::new(input.weaknesses, limits.weaknesses_min_words)?;
    let ideas = CritiqueIdeas::new(input.ideas, limits.ideas_min_words)?;
    let member_id = MemberId::parse_str(input.member_id)?;
    let work_id = WorkId::parse_str(input.work_id)?;

    let mut work = works
        .get_by_id(work_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("work".into()))?;

    let critique = Critique::create(about, successes, weaknesses, ideas, member_id, work_id)?;
    work.add_critique(critique.clone())?;

    critiques.add(&critique).await?;
    works.add(&work).await?;
    info!(critique_id = %critique.id, work_id = %work_id, "critique added");
    Ok(critique)
}

pub async fn get_critique_by_id<C: CritiqueRepository>(
    repo: &mut C,
    critique_id: CritiqueId,
) -> Result<Critique> {
    repo.get_by_id(critique_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("critique".into()))
}

pub async fn list_critiques_for_work<C: CritiqueRepository>(
    repo: &mut C,
    work_id: WorkId,
) -> Result<Vec<Critique>> {
    Ok(repo.list_for_work(work_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        Content, DomainError, MockCritiqueRepository, MockWorkRepository, Title, Work,
        WorkAgeRestriction, WorkGenre, DEFAULT_WORK_MAX_WORDS,
    };

    fn words(n: usize) -> String {
        "word ".repeat(n).trim().to_string()
    }

    fn pending_work(id: WorkId) -> Work {
        Work::create_with_id(
            id,
            Title::new("T").unwrap(),
            Content::new("some words", DEFAULT_WORK_MAX_WORDS).unwrap(),
            MemberId::new(),
            WorkGenre::Other,
            WorkAgeRestriction::Adult,
        )
        .unwrap()
    }

    fn active_work(id: WorkId) -> Work {
        let mut work = pending_work(id);
        work.approve();
        work
    }

    #[tokio::test]
    async fn critique_attaches_to_active_work() {
        let mut works = MockWorkRepository::new();
        let mut critiques = MockCritiqueRepository::new();
        works
            .expect_get_by_id()
            .returning(|id| Ok(Some(active_work(id))));
        works.expect_add().returning(|_| Ok(()));
        critiques.expect_add().returning(|_| Ok(()));

        let member_id = MemberId::new().to_string();
        let work_id = WorkId::new().to_string();
        let (about, body) = (words(20), words(40));
        let critique = add_critique(
            &mut works,
            &mut critiques,
            &CritiqueLimits::default(),
            NewCritique {
                about: &about,
                successes: &body,
                weaknesses: &body,
                ideas: &body,
                member_id: &member_id,
                work_id: &work_id,
            },
        )
        .await
        .unwrap();
        assert_eq!(critique.work_id.to_string(), work_id);
    }

    #[tokio::test]
    async fn pending_work_is_not_available_for_critique() {
        let mut works = MockWorkRepository::new();
        let mut critiques = MockCritiqueRepository::new();
        works
            .expect_get_by_id()
            .returning(|id| Ok(Some(pending_work(id))));

        let member_id = MemberId::new().to_string();
        let work_id = WorkId::new().to_string();
        let (about, body) = (words(20), words(40));
        let err = add_critique(
            &mut works,
            &mut critiques,
            &CritiqueLimits::default(),
            NewCritique {
                about: &about,
                successes: &body,
                weaknesses: &body,
                ideas: &body,
                member_id: &member_id,
                work_id: &work_id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotAvailableForCritique)
        ));
    }

    #[tokio::test]
    async fn short_sections_are_rejected_with_the_minimum_named() {
        let mut works = MockWorkRepository::new();
        let mut critiques = MockCritiqueRepository::new();

        let member_id = MemberId::new().to_string();
        let work_id = WorkId::new().to_string();
        let (about, body) = (words(5), words(40));
        let err = add_critique(
            &mut works,
            &mut critiques,
            &CritiqueLimits::default(),
            NewCritique {
                about: &about,
                successes: &body,
                weaknesses: &body,
                ideas: &body,
                member_id: &member_id,
                work_id: &work_id,
            },
        )
        .await
        .unwrap_err();
        match err {
            ServiceError::Domain(DomainError::InvalidEntry(msg)) => {
                assert!(msg.contains("at least 20 words"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
