//! Rule files
//!
//! Rule lists kept as configuration, in TOML or JSON:
//!
//! ```toml
//! [[rules]]
//! key = "id"
//! type = "required"
//! message = "an id is mandatory"
//!
//! [[rules]]
//! key = "sex"
//! fn = "binary_flag"
//! ```
//!
//! `type` names a registered rule type. `fn` names a function bound on the
//! [`RuleSet`] by the host program with [`RuleSet::bind`]. Each entry needs
//! exactly one of the two.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compiler::{self, CompiledValidator};
use crate::error::{CheckError, Result};
use crate::registry::RuleRegistry;
use crate::rule::{FieldRule, Rule, SharedRule};

/// One rule entry as written in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Field to check
    #[serde(default)]
    pub key: Option<String>,

    /// Registered rule type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,

    /// Name of a function bound on the rule set
    #[serde(default, rename = "fn", skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Replaces the rule's own message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Table { rules: Vec<RuleDefinition> },
    List(Vec<RuleDefinition>),
}

/// A rule list read from configuration, plus the host functions it refers to
#[derive(Clone, Default)]
pub struct RuleSet {
    definitions: Vec<RuleDefinition>,
    functions: HashMap<String, SharedRule>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.functions.keys().collect();
        bound.sort();
        f.debug_struct("RuleSet")
            .field("definitions", &self.definitions)
            .field("functions", &bound)
            .finish()
    }
}

impl RuleSet {
    pub fn new(definitions: Vec<RuleDefinition>) -> Self {
        Self {
            definitions,
            functions: HashMap::new(),
        }
    }

    /// Parse a TOML document with a `[[rules]]` array
    pub fn from_toml_str(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct TomlFile {
            #[serde(default)]
            rules: Vec<RuleDefinition>,
        }

        let file: TomlFile = toml::from_str(content)?;
        Ok(Self::new(file.rules))
    }

    /// Parse a JSON document: `{"rules": [...]}` or a bare array
    pub fn from_json_str(content: &str) -> Result<Self> {
        let definitions = match serde_json::from_str::<RuleFile>(content)? {
            RuleFile::Table { rules } => rules,
            RuleFile::List(rules) => rules,
        };
        Ok(Self::new(definitions))
    }

    /// Load a `.toml` or `.json` rule file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let rule_set = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(CheckError::UnsupportedFormat(path.display().to_string())),
        };

        debug!("Loaded {} rule definitions from {}", rule_set.len(), path.display());
        Ok(rule_set)
    }

    /// Bind a host function for `fn = name` entries
    pub fn bind<R>(mut self, name: impl Into<String>, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.functions.insert(name.into(), Arc::new(rule));
        self
    }

    pub fn definitions(&self) -> &[RuleDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Check every definition and turn it into a [`FieldRule`]
    pub fn to_field_rules(&self) -> Result<Vec<FieldRule>> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, def)| self.to_field_rule(index, def))
            .collect()
    }

    fn to_field_rule(&self, index: usize, def: &RuleDefinition) -> Result<FieldRule> {
        let key = match def.key.as_deref() {
            Some(key) if !key.is_empty() => key,
            Some(_) => return Err(CheckError::invalid(index, "key must not be empty")),
            None => return Err(CheckError::invalid(index, "missing key")),
        };

        let rule = match (&def.rule_type, &def.function) {
            (Some(rule_type), None) => FieldRule::typed(key, rule_type.as_str()),
            (None, Some(name)) => {
                let function = self.functions.get(name).ok_or_else(|| {
                    CheckError::invalid(index, format!("no function bound as '{}'", name))
                })?;
                FieldRule::shared(key, Arc::clone(function))
            }
            (Some(_), Some(_)) => {
                return Err(CheckError::invalid(index, "only one of 'type' or 'fn' may be given"));
            }
            (None, None) => {
                return Err(CheckError::invalid(index, "one of 'type' or 'fn' is required"));
            }
        };

        Ok(match &def.message {
            Some(message) => rule.with_message(message.as_str()),
            None => rule,
        })
    }

    /// Compile the rule set against `registry`
    pub fn compile(&self, registry: &RuleRegistry) -> Result<CompiledValidator> {
        compiler::compile(registry, &self.to_field_rules()?)
    }
}
