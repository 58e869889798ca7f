//! Colocated-test support, grounded on `juniper`'s own
//! `validation::test_harness` (`expect_passes_rule`/`expect_fails_rule`).

#![cfg(test)]

use crate::ast::{self, QueryDocument};
use crate::registry::{self, SchemaType};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::{Visitor, visit_document};

fn parse(schema_src: &str, query_src: &str) -> (SchemaType, QueryDocument) {
    let schema = registry::build_schema(schema_src).expect("schema must build for this test");
    let parsed = graphql_parser::query::parse_query(query_src).expect("query must parse for this test");
    (schema, ast::convert_query_document(&parsed))
}

fn run<V: Visitor, F: FnOnce() -> V>(
    schema_src: &str,
    factory: F,
    query_src: &str,
) -> Vec<String> {
    let (schema, doc) = parse(schema_src, query_src);
    let mut visitor = factory();
    let mut ctx = ValidatorContext::new(&schema, &doc);
    visit_document(&mut visitor, &mut ctx, &doc);
    ctx.into_errors().into_iter().map(|e| e.message).collect()
}

pub fn expect_passes_rule<V: Visitor, F: FnOnce() -> V>(schema_src: &str, factory: F, query_src: &str) {
    let errors = run(schema_src, factory, query_src);
    assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
}

pub fn expect_fails_rule<V: Visitor, F: FnOnce() -> V>(
    schema_src: &str,
    factory: F,
    query_src: &str,
    expected: &[String],
) {
    let errors = run(schema_src, factory, query_src);
    assert_eq!(errors, expected);
}
