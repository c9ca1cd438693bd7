//! # Work Service
//!
//! Turns primitive request inputs into validated value objects, runs the
//! aggregate factory, and enforces the explicit-id duplicate check that
//! needs a repository round-trip.

use domains::{
    Content, MemberId, Title, Work, WorkAgeRestriction, WorkGenre, WorkId, WorkRepository,
};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Primitive inputs for a new work, as they arrive from the outside.
#[derive(Debug, Clone)]
pub struct NewWork<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub member_id: &'a str,
    pub genre: &'a str,
    pub age_restriction: &'a str,
    /// Externally supplied identifier; when present it must be unused.
    pub work_id: Option<&'a str>,
}

/// Validates and persists a new work.
pub async fn add_work<R: WorkRepository>(
    repo: &mut R,
    max_words: usize,
    input: NewWork<'_>,
) -> Result<Work> {
    let title = Title::new(input.title)?;
    let content = Content::new(input.content, max_words)?;
    let member_id = MemberId::parse_str(input.member_id)?;
    let genre = WorkGenre::parse_str(input.genre)?;
    let age_restriction = WorkAgeRestriction::parse_str(input.age_restriction)?;

    let work = match input.work_id {
        Some(raw) => {
            let id = WorkId::parse_str(raw)?;
            if repo.get_by_id(id).await?.is_some() {
                return Err(ServiceError::Duplicate(format!(
                    "work with id {id} already exists"
                )));
            }
            Work::create_with_id(id, title, content, member_id, genre, age_restriction)?
        }
        None => Work::create(title, content, member_id, genre, age_restriction)?,
    };

    repo.add(&work).await?;
    info!(work_id = %work.id, word_count = work.word_count, "work submitted");
    Ok(work)
}

pub async fn get_work_by_id<R: WorkRepository>(repo: &mut R, work_id: WorkId) -> Result<Work> {
    repo.get_by_id(work_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("work".into()))
}

pub async fn list_works<R: WorkRepository>(repo: &mut R) -> Result<Vec<Work>> {
    Ok(repo.list().await?)
}

pub async fn list_works_by_member<R: WorkRepository>(
    repo: &mut R,
    member_id: MemberId,
) -> Result<Vec<Work>> {
    Ok(repo.list_by_member_id(member_id).await?)
}

/// Moderation pass: activate a pending work.
pub async fn approve_work<R: WorkRepository>(repo: &mut R, work_id: WorkId) -> Result<Work> {
    transition(repo, work_id, Work::approve).await
}

pub async fn reject_work<R: WorkRepository>(repo: &mut R, work_id: WorkId) -> Result<Work> {
    transition(repo, work_id, Work::reject).await
}

pub async fn archive_work<R: WorkRepository>(repo: &mut R, work_id: WorkId) -> Result<Work> {
    transition(repo, work_id, Work::archive).await
}

pub async fn restore_work<R: WorkRepository>(repo: &mut R, work_id: WorkId) -> Result<Work> {
    transition(repo, work_id, Work::restore).await
}

async fn transition<R: WorkRepository>(
    repo: &mut R,
    work_id: WorkId,
    apply: fn(&mut Work),
) -> Result<Work> {
    let mut work = get_work_by_id(repo, work_id).await?;
    apply(&mut work);
    repo.add(&work).await?;
    Ok(work)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockWorkRepository, WorkStatus, DEFAULT_WORK_MAX_WORDS};

    fn sample_input<'a>(member_id: &'a str, work_id: Option<&'a str>) -> NewWork<'a> {
        NewWork {
            title: "The Lighthouse",
            content: "a short draft about the sea",
            member_id,
            genre: "LITERARY",
            age_restriction: "NONE",
            work_id,
        }
    }

    #[tokio::test]
    async fn add_work_persists_and_starts_pending() {
        let mut repo = MockWorkRepository::new();
        repo.expect_add().returning(|_| Ok(()));

        let member_id = MemberId::new().to_string();
        let work = add_work(
            &mut repo,
            DEFAULT_WORK_MAX_WORDS,
            sample_input(&member_id, None),
        )
        .await
        .unwrap();
        assert_eq!(work.status, WorkStatus::PendingReview);
        assert_eq!(work.word_count, 6);
    }

    #[tokio::test]
    async fn explicit_id_collision_is_a_duplicate() {
        let existing_id = WorkId::new();
        let member_id = MemberId::new().to_string();

        let mut repo = MockWorkRepository::new();
        let existing_member = member_id.clone();
        repo.expect_get_by_id().returning(move |id| {
            let work = Work::create_with_id(
                id,
                Title::new("Taken").unwrap(),
                Content::new("words", DEFAULT_WORK_MAX_WORDS).unwrap(),
                MemberId::parse_str(&existing_member).unwrap(),
                WorkGenre::Other,
                WorkAgeRestriction::Adult,
            )
            .unwrap();
            Ok(Some(work))
        });

        let raw_id = existing_id.to_string();
        let err = add_work(
            &mut repo,
            DEFAULT_WORK_MAX_WORDS,
            sample_input(&member_id, Some(&raw_id)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[tokio::test]
    async fn invalid_inputs_are_domain_errors() {
        let mut repo = MockWorkRepository::new();
        let member_id = MemberId::new().to_string();

        let mut input = sample_input(&member_id, None);
        input.genre = "POETRY";
        let err = add_work(&mut repo, DEFAULT_WORK_MAX_WORDS, input)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(_)));

        let mut input = sample_input(&member_id, None);
        input.member_id = "not-a-uuid";
        let err = add_work(&mut repo, DEFAULT_WORK_MAX_WORDS, input)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(_)));
    }
}
