//! Rule list compilation
//!
//! [`compile`] checks a rule list, resolves every typed rule against the
//! registry once, and returns a [`CompiledValidator`] that no longer
//! depends on either the registry or the rule list.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::candidate::Candidate;
use crate::error::{CheckError, Result};
use crate::registry::RuleRegistry;
use crate::rule::{FieldRule, RuleSource, SharedRule};
use crate::violation::Violations;

/// A field rule after resolution
#[derive(Clone)]
struct BoundRule {
    key: String,
    rule: SharedRule,
    message: Option<String>,
}

/// Reusable validator produced by [`compile`].
///
/// Holds an immutable list of resolved rules. Cloning shares that list, and
/// validation keeps no state between calls, so one validator can be used
/// from many threads at once.
#[derive(Clone)]
pub struct CompiledValidator {
    rules: Arc<[BoundRule]>,
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Check and resolve `rules` against `registry`.
///
/// Fails on the first rule with an empty key, type name or message override
/// ([`CheckError::InvalidRuleDefinition`]) or naming an unregistered type
/// ([`CheckError::UnknownRuleType`]).
pub fn compile(registry: &RuleRegistry, rules: &[FieldRule]) -> Result<CompiledValidator> {
    let bound = rules
        .iter()
        .enumerate()
        .map(|(index, field_rule)| bind(registry, index, field_rule))
        .collect::<Result<Vec<_>>>()?;

    debug!("Compiled {} field rules", bound.len());

    Ok(CompiledValidator {
        rules: bound.into(),
    })
}

fn bind(registry: &RuleRegistry, index: usize, field_rule: &FieldRule) -> Result<BoundRule> {
    if field_rule.key.is_empty() {
        return Err(CheckError::invalid(index, "key must not be empty"));
    }
    if field_rule.message.as_deref() == Some("") {
        return Err(CheckError::invalid(index, "message must not be empty"));
    }

    let rule = match &field_rule.source {
        RuleSource::Type(name) if name.is_empty() => {
            return Err(CheckError::invalid(index, "rule type must not be empty"));
        }
        RuleSource::Type(name) => registry.resolve(name)?,
        RuleSource::Custom(rule) => Arc::clone(rule),
    };

    Ok(BoundRule {
        key: field_rule.key.clone(),
        rule,
        message: field_rule.message.clone(),
    })
}

impl CompiledValidator {
    /// Run every rule against `candidate`, in declaration order
    pub fn validate<C: Candidate + ?Sized>(&self, candidate: &C) -> Violations {
        self.rules.iter().fold(Violations::new(), |mut violations, bound| {
            let outcome = bound.rule.check(&bound.key, candidate.field(&bound.key));
            if let Some(message) = outcome.filter(|m| !m.is_empty()) {
                trace!("Rule for '{}' failed: {}", bound.key, message);
                violations.push(&bound.key, bound.message.clone().unwrap_or(message));
            }
            violations
        })
    }

    /// Validate each candidate in turn
    pub fn validate_all<'a, C, I>(&self, candidates: I) -> Vec<Violations>
    where
        C: Candidate + ?Sized + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        candidates.into_iter().map(|c| self.validate(c)).collect()
    }

    /// Validate a typed record through its JSON form
    pub fn validate_record<T: Serialize + ?Sized>(&self, record: &T) -> Result<Violations> {
        let value = serde_json::to_value(record)?;
        Ok(self.validate(&value))
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Field keys, in rule order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|b| b.key.as_str())
    }

    /// Whether `candidate` passes every rule
    pub fn is_valid<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.validate(candidate).is_valid()
    }
}
