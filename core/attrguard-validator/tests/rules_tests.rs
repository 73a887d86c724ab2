use attrguard_types::Value;
use attrguard_validator::{
    Rule, RuleDeclaration, RuleSpec, SchemaError, TesterKind, resolve,
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn declaration(json: &str) -> RuleDeclaration {
    serde_json::from_str(json).unwrap()
}

fn names(spec: &RuleSpec) -> Vec<&str> {
    spec.rules().iter().map(Rule::name).collect()
}

// ── declarations ─────────────────────────────────────────────────

#[test]
fn declaration_order_is_rule_order() {
    let spec = RuleSpec::from_declaration(
        "title",
        &declaration(r#"{"isType": "string", "maxLength": 20, "minLength": 2}"#),
    )
    .unwrap();
    assert_eq!(names(&spec), vec!["isType", "maxLength", "minLength"]);
}

#[test]
fn reordered_declaration_reorders_rules() {
    let spec = RuleSpec::from_declaration(
        "title",
        &declaration(r#"{"minLength": 2, "isType": "string"}"#),
    )
    .unwrap();
    assert_eq!(names(&spec), vec!["minLength", "isType"]);
}

#[test]
fn unknown_rules_are_skipped() {
    let spec = RuleSpec::from_declaration(
        "foo",
        &declaration(r#"{"isEqual": "bar", "maxLength": 3, "futureRule": [1, 2]}"#),
    )
    .unwrap();
    assert_eq!(names(&spec), vec!["maxLength"]);
}

#[test]
fn custom_key_without_function_is_skipped() {
    let spec = RuleSpec::from_declaration("foo", &declaration(r#"{"fn": "noop"}"#)).unwrap();
    assert!(spec.is_empty());
}

#[test]
fn snake_case_names_and_empty_ok() {
    let spec = RuleSpec::from_declaration(
        "email",
        &declaration(r#"{"regex": "^\\S+@\\S+$", "empty_ok": true, "max_length": 64}"#),
    )
    .unwrap();
    assert_eq!(names(&spec), vec!["regex", "maxLength"]);
    assert!(spec.is_empty_ok());
}

#[test]
fn typed_arguments() {
    let spec = RuleSpec::from_declaration(
        "field",
        &declaration(
            r#"{
                "range": [1, 4],
                "inList": ["a", "b"],
                "isKey": {"bar": true, "baz": false},
                "toEqual": "x",
                "minValue": 5,
                "isInstance": "Point"
            }"#,
        ),
    )
    .unwrap();

    let rules = spec.rules();
    assert!(matches!(rules[0], Rule::Range { min, max } if min == 1.0 && max == 4.0));
    assert!(matches!(&rules[1], Rule::InList(list) if list.len() == 2));
    assert!(matches!(&rules[2], Rule::IsKey(keys) if keys == &["bar", "baz"]));
    assert!(matches!(&rules[3], Rule::ToEqual(v) if *v == Value::from("x")));
    assert!(matches!(&rules[4], Rule::MinValue(v) if *v == Value::from(5)));
    assert!(matches!(&rules[5], Rule::IsInstance(kind) if kind == "Point"));
}

// ── malformed arguments ──────────────────────────────────────────

#[test]
fn range_without_two_numbers_is_skipped() {
    for loose in [r#"{"range": "1-4"}"#, r#"{"range": [1]}"#, r#"{"range": [1, "4"]}"#] {
        let spec = RuleSpec::from_declaration("n", &declaration(loose)).unwrap();
        assert!(spec.is_empty(), "{loose} produced a rule");
    }
}

#[test]
fn in_list_without_a_list_accepts_anything() {
    let spec = RuleSpec::from_declaration(
        "x",
        &declaration(r#"{"inList": "abc", "maxLength": 3}"#),
    )
    .unwrap();
    assert_eq!(names(&spec), vec!["maxLength"]);

    for value in [Value::from("zzz"), Value::from(7), Value::Null] {
        assert!(spec.rules().iter().all(|r| r.test(&value, "x").is_none()));
    }
}

#[test]
fn other_malformed_arguments_are_errors() {
    let err = RuleSpec::from_declaration("t", &declaration(r#"{"isType": 3}"#)).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidArgument { ref rule, .. } if rule == "isType"));
}

#[test]
fn invalid_pattern_is_reported() {
    let err = RuleSpec::from_declaration("code", &declaration(r#"{"regex": "("}"#)).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPattern { ref attribute, .. } if attribute == "code"));
    assert!(err.to_string().contains("invalid pattern for `code`"));
}

#[test]
fn lengths_must_be_non_negative_integers() {
    assert!(RuleSpec::from_declaration("s", &declaration(r#"{"maxLength": -1}"#)).is_err());
    assert!(RuleSpec::from_declaration("s", &declaration(r#"{"minLength": 2.5}"#)).is_err());
    assert!(RuleSpec::from_declaration("s", &declaration(r#"{"minLength": "2"}"#)).is_err());
}

#[test]
fn empty_ok_must_be_boolean() {
    let err = RuleSpec::from_declaration("s", &declaration(r#"{"emptyOk": "yes"}"#)).unwrap_err();
    assert!(err.to_string().contains("emptyOk"));
}

#[test]
fn parse_all_keeps_attribute_order() {
    let declarations: IndexMap<String, RuleDeclaration> = serde_json::from_str(
        r#"{
            "title": {"isType": "string"},
            "highfives": {"range": [0, 13]},
            "email": {"regex": ".+@.+"}
        }"#,
    )
    .unwrap();
    let specs = RuleSpec::parse_all(&declarations).unwrap();
    let attributes: Vec<&str> = specs.keys().map(String::as_str).collect();
    assert_eq!(attributes, vec!["title", "highfives", "email"]);
}

// ── resolver ─────────────────────────────────────────────────────

#[test]
fn resolve_keeps_order_and_spreads_empty_ok() {
    let spec = RuleSpec::new()
        .is_type("string")
        .custom(|_, _| None)
        .max_length(3)
        .empty_ok(true);
    let resolved = resolve(&spec);

    let names: Vec<&str> = resolved.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["isType", "fn", "maxLength"]);
    assert!(resolved.iter().all(|r| r.empty_ok));
    assert_eq!(resolved[0].rule.kind(), Some(TesterKind::IsType));
    assert_eq!(resolved[1].rule.kind(), None);
}

#[test]
fn resolve_reflects_spec_edits() {
    let spec = RuleSpec::new().min_length(2);
    assert_eq!(resolve(&spec).len(), 1);

    let spec = spec.max_length(5);
    assert_eq!(resolve(&spec).len(), 2);
}

#[test]
fn suppression_needs_empty_value_and_flag() {
    let lenient = RuleSpec::new().min_length(3).empty_ok(true);
    let strict = RuleSpec::new().min_length(3);

    let lenient_rule = resolve(&lenient)[0];
    let strict_rule = resolve(&strict)[0];

    assert!(lenient_rule.suppresses(&Value::from("")));
    assert!(!lenient_rule.suppresses(&Value::from("ab")));
    assert!(!strict_rule.suppresses(&Value::from("")));
}
