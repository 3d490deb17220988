//! Rule Registry
//!
//! Maps rule-type names to rule functions. Field rules that name a type are
//! resolved here exactly once, when a rule list is compiled.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builtin;
use crate::compiler::{self, CompiledValidator};
use crate::error::{CheckError, Result};
use crate::rule::{FieldRule, Rule, SharedRule};

/// What happens when a rule type is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMode {
    /// The later registration replaces the earlier one
    #[default]
    Overwrite,
    /// The later registration fails with [`CheckError::DuplicateRuleType`]
    Strict,
}

/// Named rule types available to [`compile`](crate::compile).
///
/// Registration needs `&mut self`, so it cannot overlap with a compilation
/// that borrows the same registry. When a registry is shared across threads
/// (for example behind an `Arc`), finish all registration before the first
/// compilation; the registry has no internal locking.
///
/// Compiled validators keep their own handle to every resolved rule, so
/// registering a replacement later does not change them.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, SharedRule>,
    mode: RegistrationMode,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rule_types", &self.rule_types())
            .field("mode", &self.mode)
            .finish()
    }
}

impl RuleRegistry {
    /// Registry with the built-in rule types, overwriting on re-registration
    pub fn new() -> Self {
        Self::with_mode(RegistrationMode::Overwrite)
    }

    /// Registry with the built-in rule types, rejecting re-registration
    pub fn strict() -> Self {
        Self::with_mode(RegistrationMode::Strict)
    }

    pub fn with_mode(mode: RegistrationMode) -> Self {
        let mut rules: HashMap<String, SharedRule> = HashMap::new();
        rules.insert(builtin::REQUIRED.to_string(), Arc::new(builtin::required));
        rules.insert(builtin::NUMBER.to_string(), Arc::new(builtin::number));

        Self { rules, mode }
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Register a rule type
    pub fn register<R>(&mut self, name: impl Into<String>, rule: R) -> Result<()>
    where
        R: Rule + 'static,
    {
        self.register_shared(name, Arc::new(rule))
    }

    /// Register an already shared rule type
    pub fn register_shared(&mut self, name: impl Into<String>, rule: SharedRule) -> Result<()> {
        let name = name.into();

        if self.rules.contains_key(&name) {
            if self.mode == RegistrationMode::Strict {
                return Err(CheckError::DuplicateRuleType { name });
            }
            debug!("Replacing rule type: {}", name);
        } else {
            debug!("Registering rule type: {}", name);
        }

        self.rules.insert(name, rule);
        Ok(())
    }

    /// Look up a rule type by name
    pub fn resolve(&self, name: &str) -> Result<SharedRule> {
        self.rules
            .get(name)
            .cloned()
            .ok_or_else(|| CheckError::UnknownRuleType {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// All registered rule type names, sorted
    pub fn rule_types(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compile a rule list against this registry
    pub fn compile(&self, rules: &[FieldRule]) -> Result<CompiledValidator> {
        compiler::compile(self, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_builtins_registered() {
        let registry = RuleRegistry::new();
        assert_eq!(registry.rule_types(), vec!["number", "required"]);
        assert_eq!(registry.mode(), RegistrationMode::Overwrite);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = RuleRegistry::new();
        let err = registry.resolve("email").err().unwrap();
        assert!(matches!(err, CheckError::UnknownRuleType { ref name } if name == "email"));
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = RuleRegistry::new();
        registry
            .register("positive", |key: &str, value: Option<&Value>| {
                match value.and_then(Value::as_f64) {
                    Some(n) if n > 0.0 => None,
                    _ => Some(format!("{key} should be positive")),
                }
            })
            .unwrap();

        let rule = registry.resolve("positive").unwrap();
        assert_eq!(rule.check("n", Some(&json!(3))), None);
        assert_eq!(rule.check("n", Some(&json!(-3))), Some("n should be positive".to_string()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_overwrite_mode_replaces() {
        let mut registry = RuleRegistry::new();
        registry
            .register("required", |_: &str, _: Option<&Value>| Some("always".to_string()))
            .unwrap();

        let rule = registry.resolve("required").unwrap();
        assert_eq!(rule.check("id", Some(&json!("x"))), Some("always".to_string()));
    }

    #[test]
    fn test_strict_mode_rejects_duplicates() {
        let mut registry = RuleRegistry::strict();
        registry.register("even", |_: &str, _: Option<&Value>| None).unwrap();

        let result = registry.register("even", |_: &str, _: Option<&Value>| None);
        assert!(matches!(
            result,
            Err(CheckError::DuplicateRuleType { ref name }) if name == "even"
        ));

        let result = registry.register("number", |_: &str, _: Option<&Value>| None);
        assert!(result.is_err());
    }
}
