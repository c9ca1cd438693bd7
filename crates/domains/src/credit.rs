//! # Credit Ledger
//!
//! Credit transactions reward participation. The entry-type constraints are
//! enforced once, at construction, and the award amounts come from an
//! immutable, externally loaded rule table injected into the services that
//! need it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::ids::{CritiqueId, MemberId, TransactionId, WorkId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    CritiqueGiven,
    WorkSubmitted,
    NewMemberBonus,
    ProfileCompletionBonus,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CritiqueGiven => "critique_given",
            TransactionType::WorkSubmitted => "work_submitted",
            TransactionType::NewMemberBonus => "new_member_bonus",
            TransactionType::ProfileCompletionBonus => "profile_completion_bonus",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self> {
        match value {
            "critique_given" => Ok(TransactionType::CritiqueGiven),
            "work_submitted" => Ok(TransactionType::WorkSubmitted),
            "new_member_bonus" => Ok(TransactionType::NewMemberBonus),
            "profile_completion_bonus" => Ok(TransactionType::ProfileCompletionBonus),
            other => Err(DomainError::InvalidEntry(format!(
                "'{other}' is not a valid transaction type"
            ))),
        }
    }
}

/// One entry in the credit ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditTransaction {
    pub id: TransactionId,
    pub member_id: MemberId,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub work_id: Option<WorkId>,
    pub critique_id: Option<CritiqueId>,
    pub date_of_transaction: DateTime<Utc>,
}

impl CreditTransaction {
    /// Validating factory enforcing the ledger-entry type constraints:
    /// a work submission carries a work_id and nothing else, a critique
    /// award carries both ids.
    pub fn create(
        member_id: MemberId,
        amount: f64,
        transaction_type: TransactionType,
        work_id: Option<WorkId>,
        critique_id: Option<CritiqueId>,
    ) -> Result<Self> {
        if transaction_type == TransactionType::WorkSubmitted
            && (work_id.is_none() || critique_id.is_some())
        {
            return Err(DomainError::InvalidEntry(
                "work submission must only have an associated work_id".into(),
            ));
        }
        if transaction_type == TransactionType::CritiqueGiven
            && (critique_id.is_none() || work_id.is_none())
        {
            return Err(DomainError::InvalidEntry(
                "critique submission must have an associated critique_id and work_id".into(),
            ));
        }
        Ok(Self {
            id: TransactionId::new(),
            member_id,
            amount,
            transaction_type,
            work_id,
            critique_id,
            date_of_transaction: Utc::now(),
        })
    }

    /// Rebuilds a transaction from persisted state.
    pub fn rehydrate(
        id: TransactionId,
        member_id: MemberId,
        amount: f64,
        transaction_type: TransactionType,
        work_id: Option<WorkId>,
        critique_id: Option<CritiqueId>,
        date_of_transaction: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            amount,
            transaction_type,
            work_id,
            critique_id,
            date_of_transaction,
        }
    }
}

/// A word-count threshold: a concrete ceiling or the literal `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordThreshold {
    Words(u32),
    Max,
}

impl WordThreshold {
    fn covers(&self, word_count: usize) -> bool {
        match self {
            WordThreshold::Words(limit) => word_count <= *limit as usize,
            WordThreshold::Max => true,
        }
    }
}

/// One ordered rule: works/critiques up to `max_words` earn `credits`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditRule {
    pub max_words: WordThreshold,
    pub credits: f64,
}

/// Immutable award table, loaded once from the declarative rule file.
///
/// Construction requires each category to be non-empty and to end with an
/// unbounded rule, so every word count matches some rule and the lookups
/// below are total.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditRules {
    submission: Vec<CreditRule>,
    critique: Vec<CreditRule>,
    bonuses: HashMap<String, f64>,
}

impl CreditRules {
    pub fn new(
        submission: Vec<CreditRule>,
        critique: Vec<CreditRule>,
        bonuses: HashMap<String, f64>,
    ) -> Result<Self> {
        Self::validate_group("submission", &submission)?;
        Self::validate_group("critique", &critique)?;
        Ok(Self {
            submission,
            critique,
            bonuses,
        })
    }

    fn validate_group(name: &str, rules: &[CreditRule]) -> Result<()> {
        if rules.is_empty() {
            return Err(DomainError::InvalidEntry(format!(
                "'{name}' must contain at least one rule"
            )));
        }
        match rules.last() {
            Some(rule) if rule.max_words == WordThreshold::Max => Ok(()),
            _ => Err(DomainError::InvalidEntry(format!(
                "the last rule in '{name}' must have max_words 'max'"
            ))),
        }
    }

    /// Credits awarded for submitting a work of `word_count` words: the
    /// first rule whose threshold covers the count wins.
    pub fn credits_for_submission(&self, word_count: usize) -> f64 {
        Self::first_match(&self.submission, word_count)
    }

    /// Credits awarded for writing a critique of `word_count` words.
    pub fn credits_for_critique(&self, word_count: usize) -> f64 {
        Self::first_match(&self.critique, word_count)
    }

    /// Named bonus amount (e.g. `new_member`), if configured.
    pub fn bonus(&self, name: &str) -> Option<f64> {
        self.bonuses.get(name).copied()
    }

    fn first_match(rules: &[CreditRule], word_count: usize) -> f64 {
        // Construction guarantees the final rule is unbounded.
        rules
            .iter()
            .find(|rule| rule.max_words.covers(word_count))
            .map(|rule| rule.credits)
            .unwrap_or_else(|| rules[rules.len() - 1].credits)
    }
}
