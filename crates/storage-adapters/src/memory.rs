//! # In-memory fakes
//!
//! HashMap-backed implementations of the repository ports, keyed by
//! identity. Service tests run against these; the unit-of-work fake mirrors
//! the commit-or-discard contract over a shared store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domains::{
    CreditRepository, CreditTransaction, Critique, CritiqueId, CritiqueRepository, Member,
    MemberId, MemberRepository, Rating, RatingId, RatingRepository, TransactionId, Work, WorkId,
    WorkRepository,
};

#[derive(Debug, Default, Clone)]
pub struct InMemoryMemberRepository {
    items: HashMap<MemberId, Member>,
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn add(&mut self, member: &Member) -> anyhow::Result<()> {
        self.items.insert(member.id, member.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: MemberId) -> anyhow::Result<Option<Member>> {
        Ok(self.items.get(&id).cloned())
    }

    async fn get_by_email(&mut self, email: &str) -> anyhow::Result<Option<Member>> {
        Ok(self.items.values().find(|m| m.email == email).cloned())
    }

    async fn get_by_username(&mut self, username: &str) -> anyhow::Result<Option<Member>> {
        Ok(self
            .items
            .values()
            .find(|m| m.username == username)
            .cloned())
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Member>> {
        Ok(self.items.values().cloned().collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkRepository {
    items: HashMap<WorkId, Work>,
}

#[async_trait]
impl WorkRepository for InMemoryWorkRepository {
    async fn add(&mut self, work: &Work) -> anyhow::Result<()> {
        self.items.insert(work.id, work.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: WorkId) -> anyhow::Result<Option<Work>> {
        Ok(self.items.get(&id).cloned())
    }

    async fn list_by_member_id(&mut self, member_id: MemberId) -> anyhow::Result<Vec<Work>> {
        Ok(self
            .items
            .values()
            .filter(|w| w.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Work>> {
        Ok(self.items.values().cloned().collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCritiqueRepository {
    items: HashMap<CritiqueId, Critique>,
}

#[async_trait]
impl CritiqueRepository for InMemoryCritiqueRepository {
    async fn add(&mut self, critique: &Critique) -> anyhow::Result<()> {
        self.items.insert(critique.id, critique.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: CritiqueId) -> anyhow::Result<Option<Critique>> {
        Ok(self.items.get(&id).cloned())
    }

    async fn list_for_work(&mut self, work_id: WorkId) -> anyhow::Result<Vec<Critique>> {
        Ok(self
            .items
            .values()
            .filter(|c| c.work_id == work_id)
            .cloned()
            .collect())
    }

    async fn list(&mut self) -> anyhow::Result<Vec<Critique>> {
        Ok(self.items.values().cloned().collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRatingRepository {
    items: HashMap<RatingId, Rating>,
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn add(&mut self, rating: &Rating) -> anyhow::Result<()> {
        self.items.insert(rating.id, rating.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: RatingId) -> anyhow::Result<Option<Rating>> {
        Ok(self.items.get(&id).cloned())
    }

    async fn list_for_critique(&mut self, critique_id: CritiqueId) -> anyhow::Result<Vec<Rating>> {
        Ok(self
            .items
            .values()
            .filter(|r| r.critique_id() == critique_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCreditRepository {
    items: HashMap<TransactionId, CreditTransaction>,
}

#[async_trait]
impl CreditRepository for InMemoryCreditRepository {
    async fn add(&mut self, transaction: &CreditTransaction) -> anyhow::Result<()> {
        self.items.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn get_by_id(&mut self, id: TransactionId) -> anyhow::Result<Option<CreditTransaction>> {
        Ok(self.items.get(&id).cloned())
    }

    async fn list_for_member(
        &mut self,
        member_id: MemberId,
    ) -> anyhow::Result<Vec<CreditTransaction>> {
        Ok(self
            .items
            .values()
            .filter(|t| t.member_id == member_id)
            .cloned()
            .collect())
    }
}

/// The full repository set backing one fake unit of work.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    pub members: InMemoryMemberRepository,
    pub works: InMemoryWorkRepository,
    pub critiques: InMemoryCritiqueRepository,
    pub ratings: InMemoryRatingRepository,
    pub credits: InMemoryCreditRepository,
}

impl InMemoryStore {
    /// A shared handle suitable for handing to several units of work.
    pub fn shared() -> Arc<Mutex<InMemoryStore>> {
        Arc::new(Mutex::new(InMemoryStore::default()))
    }
}

/// Fake unit of work: stages changes on a working copy of the shared store
/// and publishes them only on commit. Dropping the scope without committing
/// discards everything, matching the SQLite adapter's rollback behavior.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    shared: Arc<Mutex<InMemoryStore>>,
    pub store: InMemoryStore,
}

impl InMemoryUnitOfWork {
    pub fn begin(shared: &Arc<Mutex<InMemoryStore>>) -> Self {
        let store = shared
            .lock()
            .expect("in-memory store lock poisoned")
            .clone();
        Self {
            shared: Arc::clone(shared),
            store,
        }
    }

    pub fn commit(self) {
        *self
            .shared
            .lock()
            .expect("in-memory store lock poisoned") = self.store;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MemberRole;

    fn alice() -> Member {
        Member::create("alice", "a@x.com", "Str0ng!pass", MemberRole::Member).unwrap()
    }

    #[tokio::test]
    async fn add_then_lookup_by_each_key() {
        let mut repo = InMemoryMemberRepository::default();
        let member = alice();
        repo.add(&member).await.unwrap();

        assert_eq!(repo.get_by_id(member.id).await.unwrap(), Some(member.clone()));
        assert_eq!(
            repo.get_by_email("a@x.com").await.unwrap(),
            Some(member.clone())
        );
        assert_eq!(
            repo.get_by_username("alice").await.unwrap(),
            Some(member.clone())
        );
        assert!(repo.get_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn uncommitted_unit_of_work_discards_changes() {
        let shared = InMemoryStore::shared();
        let member = alice();

        {
            let mut uow = InMemoryUnitOfWork::begin(&shared);
            uow.store.members.add(&member).await.unwrap();
            // dropped without commit
        }
        let mut uow = InMemoryUnitOfWork::begin(&shared);
        assert!(uow.store.members.get_by_id(member.id).await.unwrap().is_none());

        {
            let mut uow = InMemoryUnitOfWork::begin(&shared);
            uow.store.members.add(&member).await.unwrap();
            uow.commit();
        }
        let mut uow = InMemoryUnitOfWork::begin(&shared);
        assert!(uow.store.members.get_by_id(member.id).await.unwrap().is_some());
    }
}
