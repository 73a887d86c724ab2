use attrguard_model::{ConfigError, ModelConfig};
use attrguard_types::Value;
use attrguard_validator::{Rule, SchemaError};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const SCHEMA_TOML: &str = r#"
use_defaults = true

[defaults]
title = "test title"
published = { "$date" = "2024-01-15" }

[validators.title]
is_type = "string"
max_length = 20
min_length = 2

[validators.email]
regex = '^\S+@\S+$'
empty_ok = true
"#;

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ── TOML ─────────────────────────────────────────────────────────

#[test]
fn toml_schema_parses() {
    let config = ModelConfig::from_toml_str(SCHEMA_TOML).unwrap();

    assert!(config.use_defaults);
    assert_eq!(config.defaults.get("title"), Some(&Value::from("test title")));
    assert_eq!(
        config.defaults.get("published"),
        Some(&Value::Date(1_705_276_800_000))
    );
    let attributes: Vec<&str> = config.validators.keys().map(String::as_str).collect();
    assert_eq!(attributes, vec!["title", "email"]);
}

#[test]
fn toml_rule_order_is_preserved() {
    let specs = ModelConfig::from_toml_str(SCHEMA_TOML)
        .unwrap()
        .rule_specs()
        .unwrap();

    let title: Vec<&str> = specs["title"].rules().iter().map(Rule::name).collect();
    assert_eq!(title, vec!["isType", "maxLength", "minLength"]);
    assert!(specs["email"].is_empty_ok());
    assert!(!specs["title"].is_empty_ok());
}

#[test]
fn empty_schema_is_valid() {
    let config = ModelConfig::from_toml_str("").unwrap();
    assert_eq!(config, ModelConfig::default());
    assert!(config.rule_specs().unwrap().is_empty());
}

#[test]
fn camel_case_keys_are_accepted() {
    let config = ModelConfig::from_toml_str(
        r#"
        useDefaults = true

        [validators.name]
        isType = "string"
        emptyOk = true
        "#,
    )
    .unwrap();
    assert!(config.validator_config().use_defaults);
    assert!(config.rule_specs().unwrap()["name"].is_empty_ok());
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let err = ModelConfig::from_toml_str("use_defaults = ").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn bad_rule_argument_is_a_schema_error() {
    let config = ModelConfig::from_toml_str(
        r#"
        [validators.count]
        max_length = -1
        "#,
    )
    .unwrap();
    let err = config.rule_specs().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Schema(SchemaError::InvalidArgument { .. })
    ));
    assert!(err.to_string().contains("`count`"));
}

#[test]
fn loose_list_argument_still_loads() {
    let config = ModelConfig::from_toml_str(
        r#"
        [validators.grade]
        in_list = "abc"
        range = [1]
        "#,
    )
    .unwrap();
    assert!(config.rule_specs().unwrap()["grade"].is_empty());
}

// ── JSON ─────────────────────────────────────────────────────────

#[test]
fn json_schema_parses() {
    let config = ModelConfig::from_json_str(
        r#"{
            "useDefaults": true,
            "defaults": {"highfives": 12},
            "validators": {"highfives": {"range": [0, 13]}}
        }"#,
    )
    .unwrap();

    assert!(config.use_defaults);
    assert_eq!(config.defaults.get("highfives"), Some(&Value::from(12)));
    assert_eq!(config.rule_specs().unwrap()["highfives"].len(), 1);
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = ModelConfig::from_json_str("{\"validators\": 3}").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

// ── files ────────────────────────────────────────────────────────

#[test]
fn load_toml_file() {
    let file = write_temp(".toml", SCHEMA_TOML);
    let config = ModelConfig::load_from(file.path()).unwrap();
    assert_eq!(config, ModelConfig::from_toml_str(SCHEMA_TOML).unwrap());
}

#[test]
fn load_json_file_by_extension() {
    let file = write_temp(".json", r#"{"validators": {"a": {"minLength": 1}}}"#);
    let config = ModelConfig::load_from(file.path()).unwrap();
    assert_eq!(config.rule_specs().unwrap()["a"].len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ModelConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
