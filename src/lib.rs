//! Object Checker
//!
//! Declarative validation for flat, string-keyed objects. A rule list is
//! compiled once against a registry of named rule types and the resulting
//! validator is reused for any number of objects.
//!
//! ## Features
//!
//! - **Rule Registry**: named rule types, with `required` and `number` built in
//! - **Compile Once**: rule lists are checked and resolved up front, so
//!   configuration mistakes surface before any object is validated
//! - **Ordered Violations**: one message per failing rule, in declaration order
//! - **Rule Files**: rule lists kept in TOML or JSON
//! - **Document Input**: JSON files and directories of them, read as candidates
//!
//! ## Example
//!
//! ```
//! use object_checker::{compile, FieldRule, RuleRegistry};
//! use serde_json::json;
//!
//! let registry = RuleRegistry::new();
//! let validator = compile(&registry, &[
//!     FieldRule::typed("id", "required"),
//!     FieldRule::typed("age", "number"),
//! ]).unwrap();
//!
//! let violations = validator.validate(&json!({"id": "", "age": "x"}));
//! assert_eq!(violations.messages(), ["id should not be null", "age should be a number"]);
//! assert!(validator.validate(&json!({"id": "u1", "age": "30"})).is_valid());
//! ```

pub mod builtin;
pub mod candidate;
pub mod coerce;
pub mod compiler;
pub mod config;
pub mod error;
pub mod input;
pub mod registry;
pub mod rule;
pub mod ruleset;
pub mod violation;

pub use candidate::Candidate;
pub use compiler::{compile, CompiledValidator};
pub use config::CheckerConfig;
pub use error::{CheckError, Result};
pub use input::{collect_documents, Document};
pub use registry::{RegistrationMode, RuleRegistry};
pub use rule::{FieldRule, Rule, RuleSource, SharedRule};
pub use ruleset::{RuleDefinition, RuleSet};
pub use violation::{Violation, Violations};
