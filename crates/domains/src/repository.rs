//! # Repository Ports
//!
//! Persistence contracts, one per aggregate. Adapters (SQLite, in-memory)
//! implement these; services stay generic over them.
//!
//! `add` upserts by id: the same call persists a new aggregate or an updated
//! one. Uniqueness of usernames, emails, and externally supplied work ids is
//! a service-level check, so a repository never raises a duplicate error.

use async_trait::async_trait;

use crate::credit::CreditTransaction;
use crate::critique::Critique;
use crate::ids::{CritiqueId, MemberId, RatingId, TransactionId, WorkId};
use crate::member::Member;
use crate::rating::Rating;
use crate::work::Work;

/// Persistence contract for members.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn add(&mut self, member: &Member) -> anyhow::Result<()>;
    async fn get_by_id(&mut self, id: MemberId) -> anyhow::Result<Option<Member>>;
    async fn get_by_email(&mut self, email: &str) -> anyhow::Result<Option<Member>>;
    async fn get_by_username(&mut self, username: &str) -> anyhow::Result<Option<Member>>;
    async fn list(&mut self) -> anyhow::Result<Vec<Member>>;
}

/// Persistence contract for works.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WorkRepository: Send + Sync {
    async fn add(&mut self, work: &Work) -> anyhow::Result<()>;
    async fn get_by_id(&mut self, id: WorkId) -> anyhow::Result<Option<Work>>;
    async fn list_by_member_id(&mut self, member_id: MemberId) -> anyhow::Result<Vec<Work>>;
    async fn list(&mut self) -> anyhow::Result<Vec<Work>>;
}

/// Persistence contract for critiques.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CritiqueRepository: Send + Sync {
    async fn add(&mut self, critique: &Critique) -> anyhow::Result<()>;
    async fn get_by_id(&mut self, id: CritiqueId) -> anyhow::Result<Option<Critique>>;
    async fn list_for_work(&mut self, work_id: WorkId) -> anyhow::Result<Vec<Critique>>;
    async fn list(&mut self) -> anyhow::Result<Vec<Critique>>;
}

/// Persistence contract for ratings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn add(&mut self, rating: &Rating) -> anyhow::Result<()>;
    async fn get_by_id(&mut self, id: RatingId) -> anyhow::Result<Option<Rating>>;
    async fn list_for_critique(&mut self, critique_id: CritiqueId)
        -> anyhow::Result<Vec<Rating>>;
}

/// Persistence contract for the credit ledger.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CreditRepository: Send + Sync {
    async fn add(&mut self, transaction: &CreditTransaction) -> anyhow::Result<()>;
    async fn get_by_id(&mut self, id: TransactionId)
        -> anyhow::Result<Option<CreditTransaction>>;
    async fn list_for_member(
        &mut self,
        member_id: MemberId,
    ) -> anyhow::Result<Vec<CreditTransaction>>;
}
