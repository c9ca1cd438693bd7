//! Request and response bodies. Responses are built from the aggregates
//! explicitly so internals like password digests can never serialize out.

use domains::{CreditTransaction, Critique, Member, Rating, Work};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            username: member.username.clone(),
            email: member.email.clone(),
            role: member.role.as_str().to_string(),
            status: member.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkRequest {
    pub title: String,
    pub content: String,
    pub member_id: String,
    pub genre: String,
    pub age_restriction: String,
    /// Optional externally assigned identifier.
    pub work_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkResponse {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub age_restriction: String,
    pub status: String,
    pub word_count: usize,
    pub member_id: String,
    pub critique_count: usize,
}

impl From<&Work> for WorkResponse {
    fn from(work: &Work) -> Self {
        Self {
            id: work.id.to_string(),
            title: work.title.as_str().to_string(),
            genre: work.genre.as_str().to_string(),
            age_restriction: work.age_restriction.as_str().to_string(),
            status: work.status.as_str().to_string(),
            word_count: work.word_count,
            member_id: work.member_id.to_string(),
            critique_count: work.critiques.len(),
        }
    }
}

/// Actor performing a moderation action.
#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    pub actor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CritiqueRequest {
    pub about: String,
    pub successes: String,
    pub weaknesses: String,
    pub ideas: String,
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct CritiqueResponse {
    pub id: String,
    pub work_id: String,
    pub member_id: String,
    pub status: String,
    pub word_count: usize,
}

impl From<&Critique> for CritiqueResponse {
    fn from(critique: &Critique) -> Self {
        Self {
            id: critique.id.to_string(),
            work_id: critique.work_id.to_string(),
            member_id: critique.member_id.to_string(),
            status: critique.status.as_str().to_string(),
            word_count: critique.word_count(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub score: u8,
    pub comment: Option<String>,
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: String,
    pub critique_id: String,
    pub member_id: String,
    pub score: u8,
    pub comment: Option<String>,
    pub status: String,
}

impl From<&Rating> for RatingResponse {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id.to_string(),
            critique_id: rating.critique_id().to_string(),
            member_id: rating.member_id().to_string(),
            score: rating.score.value(),
            comment: rating.comment.as_ref().map(|c| c.as_str().to_string()),
            status: rating.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreditBalanceResponse {
    pub member_id: String,
    pub balance: f64,
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub amount: f64,
    pub transaction_type: String,
    pub work_id: Option<String>,
    pub critique_id: Option<String>,
}

impl From<&CreditTransaction> for TransactionResponse {
    fn from(transaction: &CreditTransaction) -> Self {
        Self {
            id: transaction.id.to_string(),
            amount: transaction.amount,
            transaction_type: transaction.transaction_type.as_str().to_string(),
            work_id: transaction.work_id.map(|id| id.to_string()),
            critique_id: transaction.critique_id.map(|id| id.to_string()),
        }
    }
}
