//! End-to-end validation scenarios against the `Dog`/`Human`/`Pet` schema
//! from spec §8, driven through the crate's public `build_schema`/
//! `validate` API rather than a single rule in isolation.

use graphql_engine_core::ast::Pos;
use graphql_engine_core::{build_schema, validate};

const SCHEMA: &str = r#"
    schema { query: Query }
    type Query { dog: Dog, human: Human }
    type Dog { name: String, friends: [Dog] }
    type Human { pets: [Pet] }
    interface Pet { name: String }
    type Cat implements Pet { name: String, friends: [Dog] }
    union CatOrDog = Cat | Dog
"#;

fn messages(source: &str) -> Vec<String> {
    let schema = build_schema(SCHEMA).expect("schema builds");
    let outcome = validate(&schema, source, None).expect("document parses");
    outcome.errors.into_iter().map(|e| e.message).collect()
}

#[test]
fn scenario_1_known_top_level_field_passes() {
    assert!(messages("{ dog { name } }").is_empty());
}

#[test]
fn scenario_2_known_nested_field_passes() {
    assert!(messages("{ human { pets { name } } }").is_empty());
}

#[test]
fn scenario_3_unknown_top_level_field_reports_location() {
    let schema = build_schema(SCHEMA).expect("schema builds");
    let outcome = validate(&schema, "{ dog { nome } }", None).expect("document parses");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].message, "Cannot query field 'nome' on type 'Dog'.");
    assert_eq!(outcome.errors[0].locations, vec![Pos { line: 1, column: 9 }]);
}

#[test]
fn scenario_4_unknown_nested_field_fails() {
    assert_eq!(
        messages("{ human { pets { nome } } }"),
        vec!["Cannot query field 'nome' on type 'Pet'.".to_string()]
    );
}

#[test]
fn scenario_5_stops_at_first_unresolvable_ancestor() {
    assert_eq!(
        messages("{ human { pets { friends { nome } } } }"),
        vec!["Cannot query field 'friends' on type 'Pet'.".to_string()]
    );
}

#[test]
fn scalar_leafs_with_subselection_is_rejected() {
    let errors = messages("{ dog { name { x } } }");
    assert!(errors.iter().any(|m| m.contains("name")), "{errors:?}");
}

#[test]
fn object_field_without_subselection_is_rejected() {
    let errors = messages("{ dog }");
    assert!(errors.iter().any(|m| m.contains("dog")), "{errors:?}");
}

#[test]
fn unknown_fragment_spread_is_reported() {
    let errors = messages("{ dog { ...Missing } }");
    assert!(!errors.is_empty());
}

#[test]
fn unused_fragment_is_reported() {
    let errors = messages("{ dog { name } } fragment Unused on Dog { name }");
    assert!(errors.iter().any(|m| m.contains("Unused")), "{errors:?}");
}

#[test]
fn unknown_directive_is_reported() {
    let errors = messages("{ dog { name @bogus } }");
    assert!(!errors.is_empty());
}

#[test]
fn typename_is_legal_everywhere_including_unions() {
    assert!(messages("{ dog { __typename name } }").is_empty());
}
