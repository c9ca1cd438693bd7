//! # Credit Service
//!
//! Awards ledger entries for participation. Amounts come from the injected
//! [`CreditRules`] table; the transaction factory enforces which ids each
//! entry type must carry.

use domains::{
    CreditRepository, CreditRules, CreditTransaction, Critique, MemberId, TransactionType, Work,
};
use tracing::info;

use crate::error::{Result, ServiceError};

/// Awards credits for a submitted work, scaled by its word count.
pub async fn award_for_submission<R: CreditRepository>(
    repo: &mut R,
    rules: &CreditRules,
    work: &Work,
) -> Result<CreditTransaction> {
    let amount = rules.credits_for_submission(work.word_count);
    let transaction = CreditTransaction::create(
        work.member_id,
        amount,
        TransactionType::WorkSubmitted,
        Some(work.id),
        None,
    )?;
    repo.add(&transaction).await?;
    info!(member_id = %work.member_id, amount, "submission credits awarded");
    Ok(transaction)
}

/// Awards credits for a written critique, scaled by its total word count.
pub async fn award_for_critique<R: CreditRepository>(
    repo: &mut R,
    rules: &CreditRules,
    critique: &Critique,
) -> Result<CreditTransaction> {
    let amount = rules.credits_for_critique(critique.word_count());
    let transaction = CreditTransaction::create(
        critique.member_id,
        amount,
        TransactionType::CritiqueGiven,
        Some(critique.work_id),
        Some(critique.id),
    )?;
    repo.add(&transaction).await?;
    info!(member_id = %critique.member_id, amount, "critique credits awarded");
    Ok(transaction)
}

/// One-time welcome bonus, if the rule table configures one.
pub async fn award_new_member_bonus<R: CreditRepository>(
    repo: &mut R,
    rules: &CreditRules,
    member_id: MemberId,
) -> Result<CreditTransaction> {
    let amount = rules
        .bonus("new_member")
        .ok_or_else(|| ServiceError::NotFound("new_member bonus rule".into()))?;
    let transaction = CreditTransaction::create(
        member_id,
        amount,
        TransactionType::NewMemberBonus,
        None,
        None,
    )?;
    repo.add(&transaction).await?;
    Ok(transaction)
}

/// Sum of all ledger entries for a member.
pub async fn balance_for_member<R: CreditRepository>(
    repo: &mut R,
    member_id: MemberId,
) -> Result<f64> {
    let transactions = repo.list_for_member(member_id).await?;
    Ok(transactions.iter().map(|t| t.amount).sum())
}
