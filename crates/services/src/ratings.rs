//! # Rating Service
//!
//! Scores a critique: validates the score into its value object, checks the
//! critique exists, and persists both the rating and the updated critique.

use domains::{
    CritiqueId, CritiqueRepository, MemberId, Rating, RatingComment, RatingId, RatingRepository,
    RatingScore,
};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Primitive inputs for a new rating.
#[derive(Debug, Clone)]
pub struct NewRating<'a> {
    pub score: u8,
    pub comment: Option<&'a str>,
    pub critique_id: &'a str,
    pub member_id: &'a str,
}

pub async fn add_rating<C, R>(
    critiques: &mut C,
    ratings: &mut R,
    input: NewRating<'_>,
) -> Result<Rating>
where
    C: CritiqueRepository,
    R: RatingRepository,
{
    let score = RatingScore::new(input.score)?;
    let comment = input.comment.map(RatingComment::new);
    let critique_id = CritiqueId::parse_str(input.critique_id)?;
    let member_id = MemberId::parse_str(input.member_id)?;

    let mut critique = critiques
        .get_by_id(critique_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("critique".into()))?;

    let rating = Rating::create(score, comment, critique_id, member_id)?;
    critique.add_rating(rating.clone())?;

    ratings.add(&rating).await?;
    critiques.add(&critique).await?;
    info!(rating_id = %rating.id, critique_id = %critique_id, "rating added");
    Ok(rating)
}

pub async fn get_rating_by_id<R: RatingRepository>(
    repo: &mut R,
    rating_id: RatingId,
) -> Result<Rating> {
    repo.get_by_id(rating_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("rating".into()))
}

pub async fn list_ratings_for_critique<R: RatingRepository>(
    repo: &mut R,
    critique_id: CritiqueId,
) -> Result<Vec<Rating>> {
    Ok(repo.list_for_critique(critique_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        Critique, CritiqueAbout, CritiqueIdeas, CritiqueSuccesses, CritiqueWeaknesses,
        DomainError, MockCritiqueRepository, MockRatingRepository, WorkId,
    };

    fn critique_with_id(id: CritiqueId) -> Critique {
        let words = |n: usize| "word ".repeat(n).trim().to_string();
        let mut critique = Critique::create(
            CritiqueAbout::new(words(20), 20).unwrap(),
            CritiqueSuccesses::new(words(40), 40).unwrap(),
            CritiqueWeaknesses::new(words(40), 40).unwrap(),
            CritiqueIdeas::new(words(40), 40).unwrap(),
            MemberId::new(),
            WorkId::new(),
        )
        .unwrap();
        critique.id = id;
        critique
    }

    #[tokio::test]
    async fn rating_is_persisted_against_its_critique() {
        let mut critiques = MockCritiqueRepository::new();
        let mut ratings = MockRatingRepository::new();
        critiques
            .expect_get_by_id()
            .returning(|id| Ok(Some(critique_with_id(id))));
        critiques.expect_add().returning(|_| Ok(()));
        ratings.expect_add().returning(|_| Ok(()));

        let critique_id = CritiqueId::new().to_string();
        let member_id = MemberId::new().to_string();
        let rating = add_rating(
            &mut critiques,
            &mut ratings,
            NewRating {
                score: 5,
                comment: Some("sharp and useful"),
                critique_id: &critique_id,
                member_id: &member_id,
            },
        )
        .await
        .unwrap();
        assert_eq!(rating.critique_id().to_string(), critique_id);
        assert_eq!(rating.score.value(), 5);
    }

    #[tokio::test]
    async fn out_of_range_score_never_reaches_the_repository() {
        let mut critiques = MockCritiqueRepository::new();
        let mut ratings = MockRatingRepository::new();

        let critique_id = CritiqueId::new().to_string();
        let member_id = MemberId::new().to_string();
        let err = add_rating(
            &mut critiques,
            &mut ratings,
            NewRating {
                score: 6,
                comment: None,
                critique_id: &critique_id,
                member_id: &member_id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidEntry(_))
        ));
    }

    #[tokio::test]
    async fn rating_an_unknown_critique_is_not_found() {
        let mut critiques = MockCritiqueRepository::new();
        let mut ratings = MockRatingRepository::new();
        critiques.expect_get_by_id().returning(|_| Ok(None));

        let critique_id = CritiqueId::new().to_string();
        let member_id = MemberId::new().to_string();
        let err = add_rating(
            &mut critiques,
            &mut ratings,
            NewRating {
                score: 3,
                comment: None,
                critique_id: &critique_id,
                member_id: &member_id,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
