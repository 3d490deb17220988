//! Configuration for the checker
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (checker.toml)
//! - Environment variables (CHECKER__*)
//!
//! ## Example config file (checker.toml):
//! ```toml
//! [registry]
//! strict = true
//!
//! [rules]
//! path = "rules/user.toml"
//!
//! [output]
//! format = "compact"
//! fail_on_violation = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::registry::{RegistrationMode, RuleRegistry};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Rule file settings
    #[serde(default)]
    pub rules: RulesConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject registering a rule type twice
    #[serde(default)]
    pub strict: bool,
}

/// Rule file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule file used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format for JSON reports (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Exit with a failure status when any object has violations
    #[serde(default = "default_true")]
    pub fail_on_violation: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            fail_on_violation: true,
        }
    }
}

impl CheckerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["checker.toml", ".checker.toml", "config/checker.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        let project_dirs = directories::ProjectDirs::from("dev", "object-checker", "checker");
        if let Some(config_dir) = project_dirs {
            let xdg_config = config_dir.config_dir().join("checker.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Environment variables (CHECKER__REGISTRY__STRICT=true)
        builder = builder.add_source(
            Environment::with_prefix("CHECKER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn registration_mode(&self) -> RegistrationMode {
        if self.registry.strict {
            RegistrationMode::Strict
        } else {
            RegistrationMode::Overwrite
        }
    }

    /// Fresh registry in the configured registration mode
    pub fn registry(&self) -> RuleRegistry {
        RuleRegistry::with_mode(self.registration_mode())
    }
}
