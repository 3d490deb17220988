//! End-to-end validation tests
//!
//! Compiles the user rule fixtures and checks them against sample objects.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use object_checker::{
    compile, CheckError, CompiledValidator, FieldRule, RuleRegistry, RuleSet,
};
use serde_json::{json, Value};

fn fixtures_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").leak()
}

fn binary_flag(key: &str, value: Option<&Value>) -> Option<String> {
    match value {
        Some(v) if v == 0 || v == 1 => None,
        _ => Some(format!("{key} must be 0 or 1")),
    }
}

fn users() -> Vec<Value> {
    let content = std::fs::read_to_string(fixtures_path().join("users.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn user_validator(file: &str) -> CompiledValidator {
    RuleSet::load(fixtures_path().join(file))
        .unwrap()
        .bind("binary_flag", binary_flag)
        .compile(&RuleRegistry::new())
        .unwrap()
}

// =============================================================================
// Rule File Tests
// =============================================================================

#[test]
fn test_user_rules_toml() {
    let validator = user_validator("user_rules.toml");
    let results = validator.validate_all(&users());

    assert_eq!(
        results[0].messages(),
        vec![
            "id should not be null",
            "name should not be null",
            "sex must be 0 or 1",
            "age should be a number",
        ]
    );
    assert!(results[1].is_valid());
    assert!(results[2].is_valid());
    assert_eq!(results[3].messages(), vec!["id should not be null", "sex must be 0 or 1"]);
}

#[test]
fn test_toml_and_json_rules_agree() {
    let from_toml = user_validator("user_rules.toml");
    let from_json = user_validator("user_rules.json");

    for user in users() {
        assert_eq!(from_toml.validate(&user), from_json.validate(&user));
    }
}

#[test]
fn test_invalid_rule_file() {
    let rule_set = RuleSet::load(fixtures_path().join("invalid_rules.json")).unwrap();
    let result = rule_set.compile(&RuleRegistry::new());
    assert!(matches!(result, Err(CheckError::InvalidRuleDefinition { index: 1, .. })));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yaml");
    std::fs::write(&path, "rules: []").unwrap();

    assert!(matches!(RuleSet::load(&path), Err(CheckError::UnsupportedFormat(_))));
}

// =============================================================================
// Boundary Tests
// =============================================================================

#[test]
fn test_required_boundaries() {
    let validator = compile(&RuleRegistry::new(), &[FieldRule::typed("v", "required")]).unwrap();

    for failing in [json!({"v": ""}), json!({"v": null}), json!({})] {
        let messages = validator.validate(&failing).into_messages();
        assert_eq!(messages, vec!["v should not be null"], "{failing}");
    }
    for passing in [json!({"v": 0}), json!({"v": false}), json!({"v": " "})] {
        assert!(validator.is_valid(&passing), "{passing}");
    }
}

#[test]
fn test_number_boundaries() {
    let validator = compile(&RuleRegistry::new(), &[FieldRule::typed("v", "number")]).unwrap();

    for passing in [json!({"v": "42"}), json!({"v": 42}), json!({"v": "3.14"})] {
        assert!(validator.is_valid(&passing), "{passing}");
    }
    for failing in [json!({"v": "abc"}), json!({}), json!({"v": {}})] {
        let messages = validator.validate(&failing).into_messages();
        assert_eq!(messages, vec!["v should be a number"], "{failing}");
    }
}

// =============================================================================
// Compilation Properties
// =============================================================================

#[test]
fn test_repeated_compilation_behaves_the_same() {
    let registry = RuleRegistry::new();
    let rules = vec![
        FieldRule::typed("id", "required"),
        FieldRule::typed("age", "number"),
        FieldRule::custom("sex", binary_flag),
    ];

    let first = compile(&registry, &rules).unwrap();
    let second = compile(&registry, &rules).unwrap();

    for user in users() {
        let expected = first.validate(&user);
        assert_eq!(second.validate(&user), expected);
        assert_eq!(first.validate(&user), expected);
    }
}

#[test]
fn test_strict_registry_through_compile() {
    let mut registry = RuleRegistry::strict();
    registry.register("binary_flag", binary_flag).unwrap();
    assert!(matches!(
        registry.register("binary_flag", binary_flag),
        Err(CheckError::DuplicateRuleType { .. })
    ));

    let validator = registry.compile(&[FieldRule::typed("sex", "binary_flag")]).unwrap();
    assert_eq!(validator.validate(&json!({"sex": 2})).messages(), vec!["sex must be 0 or 1"]);
}

#[test]
fn test_concurrent_validation() {
    let validator = Arc::new(user_validator("user_rules.json"));
    let expected: Vec<_> = users().iter().map(|u| validator.validate(u)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || users().iter().map(|u| validator.validate(u)).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
