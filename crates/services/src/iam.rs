//! # IAM Service
//!
//! Member registration, login, and the member-owned collections. Uniqueness
//! of usernames and emails needs a repository round-trip, so it lives here
//! rather than on the aggregate.

use domains::{Critique, Member, MemberId, MemberRepository, Work};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Registers a new member after checking username/email uniqueness.
pub async fn register_member<R: MemberRepository>(
    repo: &mut R,
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Member> {
    check_for_unique_parameters(repo, username, email).await?;
    let member = Member::register(username, email, password, confirm_password)?;
    repo.add(&member).await?;
    info!(member_id = %member.id, "member registered");
    Ok(member)
}

/// Fails with [`ServiceError::Duplicate`] if the email or username is taken.
pub async fn check_for_unique_parameters<R: MemberRepository>(
    repo: &mut R,
    username: &str,
    email: &str,
) -> Result<()> {
    if repo.get_by_email(email).await?.is_some() {
        return Err(ServiceError::Duplicate("email already in use".into()));
    }
    if repo.get_by_username(username).await?.is_some() {
        return Err(ServiceError::Duplicate("username already in use".into()));
    }
    Ok(())
}

/// Verifies credentials and records the login. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login_member<R: MemberRepository>(
    repo: &mut R,
    email: &str,
    password: &str,
) -> Result<Member> {
    let mut member = repo
        .get_by_email(email)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;
    if !member.verify_password(password) {
        return Err(ServiceError::InvalidCredentials);
    }
    member.record_login();
    repo.add(&member).await?;
    Ok(member)
}

pub async fn get_member_by_id<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
) -> Result<Member> {
    repo.get_by_id(member_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("member".into()))
}

pub async fn get_member_by_username<R: MemberRepository>(
    repo: &mut R,
    username: &str,
) -> Result<Member> {
    repo.get_by_username(username)
        .await?
        .ok_or_else(|| ServiceError::NotFound("member".into()))
}

pub async fn list_members<R: MemberRepository>(repo: &mut R) -> Result<Vec<Member>> {
    Ok(repo.list().await?)
}

/// Appends a work to the owning member's collection and persists the change.
pub async fn add_work_to_member<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
    work: Work,
) -> Result<()> {
    let mut member = get_member_by_id(repo, member_id).await?;
    // A store that rehydrates owned collections by foreign key already
    // carries a freshly persisted work; attaching it again is a no-op.
    if member.list_works().iter().any(|w| w.id == work.id) {
        return Ok(());
    }
    member.add_work(work)?;
    repo.add(&member).await?;
    Ok(())
}

/// Appends an authored critique to the member's collection.
pub async fn add_critique_to_member<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
    critique: Critique,
) -> Result<()> {
    let mut member = get_member_by_id(repo, member_id).await?;
    if member.list_critiques().iter().any(|c| c.id == critique.id) {
        return Ok(());
    }
    member.add_critique(critique)?;
    repo.add(&member).await?;
    Ok(())
}

pub async fn list_member_works<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
) -> Result<Vec<Work>> {
    let member = get_member_by_id(repo, member_id).await?;
    Ok(member.works)
}

pub async fn list_member_critiques<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
) -> Result<Vec<Critique>> {
    let member = get_member_by_id(repo, member_id).await?;
    Ok(member.critiques)
}

pub async fn change_password<R: MemberRepository>(
    repo: &mut R,
    member_id: MemberId,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let mut member = get_member_by_id(repo, member_id).await?;
    member.change_password(old_password, new_password)?;
    repo.add(&member).await?;
    Ok(())
}

/// Admin action: the actor's role is checked by the aggregate.
pub async fn deactivate_member<R: MemberRepository>(
    repo: &mut R,
    actor_id: MemberId,
    target_id: MemberId,
) -> Result<()> {
    let actor = get_member_by_id(repo, actor_id).await?;
    let mut target = get_member_by_id(repo, target_id).await?;
    actor.deactivate_member(&mut target)?;
    repo.add(&target).await?;
    info!(member_id = %target_id, "member deactivated");
    Ok(())
}
