//! Rule functions and field rules

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A single field check.
///
/// `key` is the field being checked and `value` its current value, `None`
/// when the candidate has no such field. Returns the violation message, or
/// `None` (or an empty string) when the value passes.
///
/// Rules must be pure and must not panic: a panic propagates straight out
/// of [`CompiledValidator::validate`](crate::CompiledValidator::validate).
pub trait Rule: Send + Sync {
    fn check(&self, key: &str, value: Option<&Value>) -> Option<String>;
}

impl<F> Rule for F
where
    F: Fn(&str, Option<&Value>) -> Option<String> + Send + Sync,
{
    fn check(&self, key: &str, value: Option<&Value>) -> Option<String> {
        self(key, value)
    }
}

/// Reference-counted rule, shared between registries and compiled validators
pub type SharedRule = Arc<dyn Rule>;

/// How a field rule obtains its check
#[derive(Clone)]
pub enum RuleSource {
    /// Named rule type, resolved against a [`RuleRegistry`](crate::RuleRegistry) at compile time
    Type(String),
    /// Caller-supplied rule, used as-is
    Custom(SharedRule),
}

impl fmt::Debug for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Type(name) => f.debug_tuple("Type").field(name).finish(),
            RuleSource::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One declarative entry: a field key and how to check it
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field to read from the candidate object
    pub key: String,
    /// Where the check comes from
    pub source: RuleSource,
    /// Replaces the rule's own message when the check fails
    pub message: Option<String>,
}

impl FieldRule {
    /// Rule checked by the registered rule type `rule_type`
    pub fn typed(key: impl Into<String>, rule_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: RuleSource::Type(rule_type.into()),
            message: None,
        }
    }

    /// Rule checked by a caller-supplied function
    pub fn custom<R>(key: impl Into<String>, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        Self::shared(key, Arc::new(rule))
    }

    /// Rule checked by an already shared function
    pub fn shared(key: impl Into<String>, rule: SharedRule) -> Self {
        Self {
            key: key.into(),
            source: RuleSource::Custom(rule),
            message: None,
        }
    }

    /// Rule that fails with `message` whenever `pred` returns false
    pub fn predicate<P>(key: impl Into<String>, pred: P, message: impl Into<String>) -> Self
    where
        P: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::custom(key, move |_: &str, value: Option<&Value>| {
            (!pred(value)).then(|| message.clone())
        })
    }

    /// Report `message` instead of the rule's own text on failure
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Rule type name, if this is a typed rule
    pub fn rule_type(&self) -> Option<&str> {
        match &self.source {
            RuleSource::Type(name) => Some(name),
            RuleSource::Custom(_) => None,
        }
    }
}
