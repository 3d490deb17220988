//! Object Checker CLI
//!
//! Validates JSON objects against a rule file.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use object_checker::config::OutputFormat;
use object_checker::{
    collect_documents, CheckerConfig, CompiledValidator, Document, RuleSet, Violations,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "object-check")]
#[command(about = "Validate JSON objects against declarative field rules")]
struct Cli {
    /// Config file (defaults to checker.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON files or directories of JSON files
    Validate {
        /// Rule file (.toml or .json)
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List rule types and check a rule file
    Rules {
        /// Rule file (.toml or .json)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Write a JSON report of all violations
    Report {
        /// Rule file (.toml or .json)
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the run succeeded
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CheckerConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Validate { rules, paths } => {
            let validator = compile_rules(&config, rules)?;
            let documents = collect_documents(&paths).context("reading documents")?;

            let mut invalid = 0;
            for doc in &documents {
                let violations = validator.validate(doc);
                if violations.is_valid() {
                    println!("✅ {}", doc.label);
                } else {
                    invalid += 1;
                    println!("❌ {} - {} violation(s)", doc.label, violations.len());
                    for violation in &violations {
                        println!("   └─ {}", violation.message);
                    }
                }
            }

            println!();
            println!("{} object(s) checked, {} invalid", documents.len(), invalid);

            Ok(run_passed(&config, invalid))
        }

        Commands::Rules { rules } => {
            let registry = config.registry();
            println!("Rule types ({:?} registration):", registry.mode());
            for name in registry.rule_types() {
                println!("  • {}", name);
            }

            if let Some(path) = rules.or_else(|| config.rules.path.clone()) {
                let rule_set = RuleSet::load(&path)
                    .with_context(|| format!("reading rule file {}", path.display()))?;
                let validator = rule_set.compile(&registry)?;
                println!();
                println!("✅ {} - {} rule(s) compiled", path.display(), validator.len());
                for (def, key) in rule_set.definitions().iter().zip(validator.keys()) {
                    let how = match (&def.rule_type, &def.function) {
                        (Some(t), _) => format!("type {}", t),
                        (_, Some(f)) => format!("fn {}", f),
                        _ => String::new(),
                    };
                    println!("   └─ {}: {}", key, how);
                }
            }
            Ok(true)
        }

        Commands::Report { rules, output, paths } => {
            let validator = compile_rules(&config, rules)?;
            let documents = collect_documents(&paths).context("reading documents")?;

            let results: Vec<(&Document, Violations)> = documents
                .iter()
                .map(|doc| (doc, validator.validate(doc)))
                .collect();
            let invalid = results.iter().filter(|(_, v)| !v.is_valid()).count();

            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "rules": validator.keys().collect::<Vec<_>>(),
                "objects": results
                    .iter()
                    .map(|(doc, violations)| serde_json::json!({
                        "source": doc.label,
                        "valid": violations.is_valid(),
                        "violations": violations,
                    }))
                    .collect::<Vec<_>>(),
                "totals": {
                    "checked": results.len(),
                    "invalid": invalid,
                }
            });

            let report_json = match config.output.format {
                OutputFormat::Pretty => serde_json::to_string_pretty(&report)?,
                OutputFormat::Compact => serde_json::to_string(&report)?,
            };

            if let Some(path) = output {
                fs::write(&path, &report_json)?;
                println!("✅ Report written to {:?}", path);
            } else {
                println!("{}", report_json);
            }

            Ok(run_passed(&config, invalid))
        }
    }
}

/// Invalid objects only fail the run when `fail_on_violation` is set
fn run_passed(config: &CheckerConfig, invalid: usize) -> bool {
    invalid == 0 || !config.output.fail_on_violation
}

fn compile_rules(
    config: &CheckerConfig,
    rules: Option<PathBuf>,
) -> anyhow::Result<CompiledValidator> {
    let Some(path) = rules.or_else(|| config.rules.path.clone()) else {
        bail!("no rule file given (use --rules or set [rules] path)");
    };

    let rule_set = RuleSet::load(&path)
        .with_context(|| format!("reading rule file {}", path.display()))?;
    let validator = rule_set
        .compile(&config.registry())
        .with_context(|| format!("compiling rule file {}", path.display()))?;

    debug!("Compiled {} rules from {}", validator.len(), path.display());
    Ok(validator)
}
