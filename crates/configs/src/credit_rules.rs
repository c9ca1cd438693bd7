//! Loader for the credit-award rule file.
//!
//! The file is validated field by field rather than deserialized straight
//! into the domain types, so a malformed file fails with a message naming
//! exactly what is wrong with it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use domains::{CreditRule, CreditRules, WordThreshold};
use serde_yaml::Value;

use crate::error::ConfigError;

pub fn load_credit_rules(path: impl AsRef<Path>) -> Result<CreditRules, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_credit_rules(&raw)
}

/// Expected shape:
///
/// ```yaml
/// rules:
///   submission:
///     - max_words: 3000
///       credits: 3
///     - max_words: max
///       credits: 5
///   critique:
///     - max_words: max
///       credits: 2.5
///   bonus:
///     new_member: 2
/// ```
pub fn parse_credit_rules(raw: &str) -> Result<CreditRules, ConfigError> {
    let doc: Value = serde_yaml::from_str(raw)?;
    let rules = doc.get("rules").unwrap_or(&doc);

    let submission = rule_group(rules, "submission")?;
    let critique = rule_group(rules, "critique")?;
    let bonuses = bonus_table(rules)?;

    CreditRules::new(submission, critique, bonuses)
        .map_err(|e| ConfigError::InvalidRules(e.to_string()))
}

fn rule_group(doc: &Value, name: &str) -> Result<Vec<CreditRule>, ConfigError> {
    let group = doc.get(name).ok_or_else(|| {
        ConfigError::InvalidRules("YAML file must contain 'submission' and 'critique' rules.".into())
    })?;
    let entries = group
        .as_sequence()
        .ok_or_else(|| ConfigError::InvalidRules(format!("'{name}' must be a list of rules.")))?;

    let mut rules = Vec::with_capacity(entries.len());
    for entry in entries {
        let (max_words, credits) = match (entry.get("max_words"), entry.get("credits")) {
            (Some(max_words), Some(credits)) => (max_words, credits),
            _ => {
                return Err(ConfigError::InvalidRules(format!(
                    "Each rule in '{name}' must contain 'max_words' and 'credits'."
                )))
            }
        };

        let max_words = if let Some(words) = max_words.as_u64() {
            WordThreshold::Words(words as u32)
        } else if max_words.as_str() == Some("max") {
            WordThreshold::Max
        } else {
            return Err(ConfigError::InvalidRules(format!(
                "'max_words' in '{name}' must be an integer or 'max'."
            )));
        };

        let credits = credits.as_f64().ok_or_else(|| {
            ConfigError::InvalidRules(format!("'credits' in '{name}' must be a number."))
        })?;

        rules.push(CreditRule { max_words, credits });
    }
    Ok(rules)
}

fn bonus_table(doc: &Value) -> Result<HashMap<String, f64>, ConfigError> {
    let mut bonuses = HashMap::new();
    let Some(bonus) = doc.get("bonus") else {
        return Ok(bonuses);
    };
    let mapping = bonus.as_mapping().ok_or_else(|| {
        ConfigError::InvalidRules("'bonus' must be a mapping of names to amounts.".into())
    })?;
    for (key, value) in mapping {
        let name = key.as_str().ok_or_else(|| {
            ConfigError::InvalidRules("'bonus' names must be strings.".into())
        })?;
        let amount = value.as_f64().ok_or_else(|| {
            ConfigError::InvalidRules(format!("'{name}' bonus must be a number."))
        })?;
        bonuses.insert(name.to_string(), amount);
    }
    Ok(bonuses)
}
