//! Schema validator and execution engine for GraphQL documents.
//!
//! This crate is the CORE of a GraphQL server-side engine (§1 "Purpose &
//! Scope"): given a schema expressed in the GraphQL Schema Definition
//! Language and an operation document, it either produces a structured set
//! of validation errors or, for valid documents, a response tree obtained
//! by invoking user-supplied field resolvers. The GraphQL lexer/parser
//! (`graphql-parser`), the transport layer, and subscription plumbing are
//! external collaborators this crate consumes rather than implements.
//!
//! The three tightly coupled subsystems:
//!
//! - [`registry`] — the schema symbol table + type-shape registry
//!   (component B): [`registry::build_schema`].
//! - [`validation`] — the query validator (component C):
//!   [`validation::validate`].
//! - [`executor`] — the execution engine (component E): [`executor::run`]/
//!   [`executor::execute`].
//!
//! [`ast`] holds the owned AST both of the above walk; [`value`] is the
//! response value model; [`resolve`] is the resolver registry (component
//! D); [`error`] is the structured error model (component F).

pub mod ast;
pub mod error;
pub mod executor;
pub mod registry;
pub mod resolve;
pub mod validation;
pub mod value;

pub use error::GraphQLError;
pub use executor::{ExecutionOutcome, OperationOrSource, SchemaOrSource, ValidatedOperation};
pub use registry::{SchemaType, SpecId};
pub use resolve::{FieldResult, ResolvedValue, Resolver, ResolverOutcome, ResolverRegistry};
pub use validation::ValidationOutcome;
pub use value::{Object, Value};

/// Builds the type registry from schema source text (§4.B, §6
/// `build-schema`).
pub fn build_schema(source: &str) -> Result<SchemaType, Vec<error::SchemaError>> {
    registry::build_schema(source)
}

/// Validates an operation document against a previously built schema (§4.C,
/// §6 `validate`). `rules` selects a subset of [`validation::rules::NAMES`];
/// `None` runs every rule.
pub fn validate(
    schema: &SchemaType,
    operation_source: &str,
    rules: Option<&[&str]>,
) -> Result<ValidationOutcome, String> {
    validation::validate(schema, operation_source, rules)
}

/// Executes an operation, building/parsing/validating whatever raw inputs
/// are given (§4.E "preparation", §6 `execute`).
pub async fn execute<'a, Ctx>(
    user_ctx: &'a Ctx,
    schema: SchemaOrSource<'a>,
    resolvers: &'a ResolverRegistry<Ctx>,
    operation: OperationOrSource<'a>,
    variables: Option<&'a Object>,
) -> ExecutionOutcome
where
    Ctx: Send + Sync + 'static,
{
    executor::run(user_ctx, schema, resolvers, operation, variables).await
}

/// Synchronous convenience wrapper around [`execute`], for resolver sets
/// that never actually suspend (every [`ResolverOutcome::Ready`], no
/// `Pending` futures) — mirroring `juniper::execute_sync`'s place next to
/// its async `execute` (§6 "a `execute_sync` convenience wrapper blocks on
/// it for purely-synchronous resolver sets").
///
/// Blocks the calling thread via [`futures::executor::block_on`]; a
/// resolver that actually suspends simply parks this thread until it
/// resolves, rather than panicking — for a resolver set with genuinely
/// pending futures, use [`execute`] under a real async runtime instead.
pub fn execute_sync<Ctx>(
    user_ctx: &Ctx,
    schema: SchemaOrSource<'_>,
    resolvers: &ResolverRegistry<Ctx>,
    operation: OperationOrSource<'_>,
    variables: Option<&Object>,
) -> ExecutionOutcome
where
    Ctx: Send + Sync + 'static,
{
    futures::executor::block_on(execute(user_ctx, schema, resolvers, operation, variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn schema_source() -> &'static str {
        r#"
            schema { query: Query }
            type Query { f(n: Int = 3): Int }
        "#
    }

    #[test]
    fn execute_sync_runs_a_purely_synchronous_query() {
        let schema = build_schema(schema_source()).expect("schema builds");

        let mut resolvers = ResolverRegistry::<()>::new();
        resolvers.register(
            "Query",
            "f",
            Arc::new(|_ctx: &(), _parent: &Value, args: Option<&value::Arguments>| {
                let n = match args.and_then(|a| a.get("n")) {
                    Some(Value::Scalar(value::Scalar::Int(n))) => *n,
                    _ => 0,
                };
                ResolverOutcome::Ready(Ok(ResolvedValue::new(Value::int(n * n))))
            }),
        );

        let outcome = execute_sync(
            &(),
            SchemaOrSource::Built(&schema),
            &resolvers,
            OperationOrSource::Source("{ f }"),
            None,
        );

        assert!(outcome.errors.is_empty());
        let data = outcome.data.expect("data present");
        assert_eq!(data.as_object().unwrap().get("f"), Some(&Value::int(9)));
    }
}
