//! End-to-end executor scenarios (spec §8): variable-default substitution,
//! non-null propagation, list completion, and mutation field ordering,
//! driven through the crate's public `execute`/`execute_sync` API against
//! a user-supplied resolver registry rather than any one executor
//! function in isolation.

use std::sync::{Arc, Mutex};

use graphql_engine_core::resolve::{FieldResult, ResolverRegistry, sync};
use graphql_engine_core::value::{Arguments, Object, Scalar};
use graphql_engine_core::{
    OperationOrSource, ResolvedValue, SchemaOrSource, Value, build_schema, execute, execute_sync,
};

fn int_arg(args: Option<&Arguments>, name: &str) -> Option<i64> {
    match args.and_then(|a| a.get(name)) {
        Some(Value::Scalar(Scalar::Int(n))) => Some(*n),
        _ => None,
    }
}

// ---------------------------------------------------------------------
// Scenario 6: variable-default substitution and non-null argument errors.
// ---------------------------------------------------------------------

fn squaring_schema() -> &'static str {
    r#"
        schema { query: Query }
        type Query { f(n: Int!): Int }
    "#
}

fn squaring_resolvers() -> ResolverRegistry<()> {
    let mut resolvers = ResolverRegistry::new();
    resolvers.register(
        "Query",
        "f",
        sync(|_ctx: &(), _parent: &Value, args: Option<&Arguments>| -> FieldResult {
            let n = int_arg(args, "n").unwrap_or(0);
            Ok(ResolvedValue::new(Value::int(n * n)))
        }),
    );
    resolvers
}

#[tokio::test]
async fn variable_default_is_used_when_the_caller_omits_it() {
    let schema = build_schema(squaring_schema()).expect("schema builds");
    let resolvers = squaring_resolvers();

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("query($x: Int = 3) { f(n: $x) }"),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let data = outcome.data.expect("data present");
    assert_eq!(data.as_object().unwrap().get("f"), Some(&Value::int(9)));
}

#[tokio::test]
async fn explicit_null_overrides_the_default_and_nulls_the_nullable_field() {
    let schema = build_schema(squaring_schema()).expect("schema builds");
    let resolvers = squaring_resolvers();

    let mut variables = Object::new();
    variables.insert("x", Value::Null);

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("query($x: Int = 3) { f(n: $x) }"),
        Some(&variables),
    )
    .await;

    assert_eq!(outcome.errors.len(), 1, "{:?}", outcome.errors);
    let data = outcome.data.expect("data present even though the field failed");
    assert_eq!(data.as_object().unwrap().get("f"), Some(&Value::Null));
}

#[test]
fn execute_sync_matches_the_async_entry_point_for_synchronous_resolvers() {
    let schema = build_schema(squaring_schema()).expect("schema builds");
    let resolvers = squaring_resolvers();

    let outcome = execute_sync(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ f(n: 4) }"),
        None,
    );

    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.data.unwrap().as_object().unwrap().get("f"),
        Some(&Value::int(16))
    );
}

// ---------------------------------------------------------------------
// Non-null propagation and list completion.
// ---------------------------------------------------------------------

fn nested_schema() -> &'static str {
    r#"
        schema { query: Query }
        type Query { dog: Dog, human: Human }
        type Dog { name: String!, friends: [Dog] }
        type Human { pets: [Pet] }
        interface Pet { name: String }
        type Cat implements Pet { name: String, friends: [Dog] }
    "#
}

#[tokio::test]
async fn non_null_violation_nulls_the_nearest_nullable_ancestor() {
    let schema = build_schema(nested_schema()).expect("schema builds");
    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "dog",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            let mut dog = Object::new();
            dog.insert("name", Value::Null);
            Ok(ResolvedValue::new(Value::Object(dog)))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ dog { name } }"),
        None,
    )
    .await;

    assert_eq!(outcome.errors.len(), 1);
    let data = outcome.data.expect("data present");
    // `Dog.name` is `String!`; `Query.dog` is nullable, so the whole `dog`
    // subtree is nulled rather than the top-level `data` itself.
    assert_eq!(data.as_object().unwrap().get("dog"), Some(&Value::Null));
}

#[tokio::test]
async fn deeply_nested_lists_complete_element_by_element() {
    let schema = build_schema(
        r#"
        schema { query: Query }
        type Query { matrix: [[[Int]]] }
        "#,
    )
    .expect("schema builds");

    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "matrix",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            let row = |vals: &[i64]| Value::List(vals.iter().map(|n| Value::int(*n)).collect());
            let plane = Value::List(vec![row(&[1, 2]), row(&[3])]);
            Ok(ResolvedValue::new(Value::List(vec![plane])))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ matrix }"),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let data = outcome.data.unwrap();
    let matrix = data.as_object().unwrap().get("matrix").unwrap();
    assert_eq!(
        matrix,
        &Value::List(vec![Value::List(vec![
            Value::List(vec![Value::int(1), Value::int(2)]),
            Value::List(vec![Value::int(3)]),
        ])])
    );
}

#[tokio::test]
async fn non_null_list_permits_a_null_element_but_not_a_null_list() {
    let schema = build_schema(
        r#"
        schema { query: Query }
        type Query { nums: [Int]! }
        "#,
    )
    .expect("schema builds");

    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "nums",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            Ok(ResolvedValue::new(Value::List(vec![
                Value::int(1),
                Value::Null,
                Value::int(3),
            ])))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ nums }"),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let data = outcome.data.unwrap();
    assert_eq!(
        data.as_object().unwrap().get("nums"),
        Some(&Value::List(vec![Value::int(1), Value::Null, Value::int(3)]))
    );
}

#[tokio::test]
async fn a_null_non_null_list_is_a_violation_that_propagates() {
    let schema = build_schema(
        r#"
        schema { query: Query }
        type Query { nums: [Int]! }
        "#,
    )
    .expect("schema builds");

    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "nums",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            Ok(ResolvedValue::new(Value::Null))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ nums }"),
        None,
    )
    .await;

    assert_eq!(outcome.errors.len(), 1);
    // `nums` is the only top-level field and it is itself non-null, so the
    // violation propagates all the way to the response root.
    assert_eq!(outcome.data, Some(Value::Null));
}

// ---------------------------------------------------------------------
// Mutation field ordering and fragment/list expansion.
// ---------------------------------------------------------------------

#[tokio::test]
async fn mutation_fields_execute_in_strict_source_order() {
    let schema = build_schema(
        r#"
        schema { query: Query, mutation: Mutation }
        type Query { noop: Boolean }
        type Mutation { first: Int, second: Int, third: Int }
        "#,
    )
    .expect("schema builds");

    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let mut resolvers = ResolverRegistry::<()>::new();
    for (field, label) in [("first", "first"), ("second", "second"), ("third", "third")] {
        let order = Arc::clone(&order);
        resolvers.register(
            "Mutation",
            field,
            sync(move |_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
                order.lock().unwrap().push(label);
                Ok(ResolvedValue::new(Value::int(0)))
            }),
        );
    }

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("mutation { third: first second: second first: third }"),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn skip_and_include_directives_drop_selections() {
    let schema = build_schema(
        r#"
        schema { query: Query }
        type Query { dog: Dog }
        type Dog { name: String, nickname: String }
        "#,
    )
    .expect("schema builds");

    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "dog",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            let mut dog = Object::new();
            dog.insert("name", Value::string("Fido"));
            dog.insert("nickname", Value::string("Fifo"));
            Ok(ResolvedValue::new(Value::Object(dog)))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source(
            "{ dog { name @skip(if: true) nickname @include(if: false) } }",
        ),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let data = outcome.data.unwrap();
    let dog = data.as_object().unwrap().get("dog").unwrap().as_object().unwrap();
    assert!(!dog.contains_key("name"));
    assert!(!dog.contains_key("nickname"));
}

#[tokio::test]
async fn recursive_object_types_execute_without_diverging() {
    let schema = build_schema(
        r#"
        schema { query: Query }
        type Query { node: Node }
        type Node { id: String, child: Node }
        "#,
    )
    .expect("schema builds");

    let mut resolvers = ResolverRegistry::<()>::new();
    resolvers.register(
        "Query",
        "node",
        sync(|_ctx: &(), _parent: &Value, _args: Option<&Arguments>| -> FieldResult {
            let mut inner = Object::new();
            inner.insert("id", Value::string("child"));
            inner.insert("child", Value::Null);
            let mut outer = Object::new();
            outer.insert("id", Value::string("root"));
            outer.insert("child", Value::Object(inner));
            Ok(ResolvedValue::new(Value::Object(outer)))
        }),
    );

    let outcome = execute(
        &(),
        SchemaOrSource::Built(&schema),
        &resolvers,
        OperationOrSource::Source("{ node { id child { id child { id } } } }"),
        None,
    )
    .await;

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    let data = outcome.data.unwrap();
    let node = data.as_object().unwrap().get("node").unwrap().as_object().unwrap();
    assert_eq!(node.get("id"), Some(&Value::string("root")));
    let child = node.get("child").unwrap().as_object().unwrap();
    assert_eq!(child.get("id"), Some(&Value::string("child")));
    assert_eq!(child.get("child"), Some(&Value::Null));
}
