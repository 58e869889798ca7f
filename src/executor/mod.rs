//! Query execution (component E): `CollectFields` / `ExecuteFields` /
//! `CompleteValue`, realized per the GraphQL spec's own algorithm (§4.E).
//!
//! Selections are cloned into the grouped field map rather than borrowed:
//! `Field` is a small, cheaply-`Clone`able AST node, and owning it sidesteps
//! threading a second lifetime parameter through the mutually-recursive
//! boxed futures below purely to track how deep into a fragment/inline
//! fragment a given selection came from.

use std::collections::HashSet;

use futures::future::{BoxFuture, join_all};
use indexmap::IndexMap;

use crate::ast::{Field, OperationDefinition, OperationType, Pos, QueryDocument, Selection, SelectionSet};
use crate::error::{ArgumentError, ExecutionError, FieldError, PathSegment, ResponseError};
use crate::registry::{FieldSlot, SchemaType, TypeDescriptor, TypeRef};
use crate::resolve::{FieldResult, ResolvedValue, ResolverRegistry};
use crate::validation::{self, ValidationOutcome};
use crate::value::{self, Arguments, Object, Value};

/// Either raw schema source or an already-built [`SchemaType`] (§9 "dynamic
/// schema-vs-state disambiguation", realized as an explicit sum type rather
/// than runtime type sniffing).
pub enum SchemaOrSource<'a> {
    Source(&'a str),
    Built(&'a SchemaType),
}

/// Either raw operation source or an already-validated document.
pub enum OperationOrSource<'a> {
    Source(&'a str),
    Validated(ValidatedOperation<'a>),
}

/// A document that has already passed [`validation::validate`], paired with
/// the operation name to run when the document declares more than one.
pub struct ValidatedOperation<'a> {
    pub document: &'a QueryDocument,
    pub operation_name: Option<&'a str>,
}

/// The result of [`execute`]/[`run`]: `data` is present whenever execution
/// was attempted at all (even if every field ended up null); it is absent
/// only when the operation could not be started (schema build failure,
/// parse failure, validation failure, or operation-selection failure).
#[derive(Debug, Default, serde::Serialize)]
pub struct ExecutionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl ExecutionOutcome {
    fn failed(message: impl Into<String>) -> Self {
        ExecutionOutcome {
            data: None,
            errors: vec![ResponseError {
                message: message.into(),
                locations: Vec::new(),
                path: Vec::new(),
            }],
        }
    }

    fn from_rule_errors(errors: &[crate::error::RuleError]) -> Self {
        ExecutionOutcome {
            data: None,
            errors: errors.iter().map(ResponseError::from).collect(),
        }
    }
}

/// A marker indicating a subtree resolved to null because a non-null field
/// within it failed; the caller must null the nearest nullable ancestor
/// instead of threading the failure as data.
struct Nulled;

/// Threaded, read-only execution state (schema, document, resolvers, the
/// caller's opaque context, and substituted variables).
pub struct ExecContext<'a, Ctx> {
    pub schema: &'a SchemaType,
    pub doc: &'a QueryDocument,
    pub resolvers: &'a ResolverRegistry<Ctx>,
    pub user_ctx: &'a Ctx,
    pub variables: &'a Object,
}

/// High-level entry point: builds/parses/validates whatever raw inputs are
/// given, then executes. Mirrors §4.E's "preparation" step.
pub async fn run<'a, Ctx>(
    user_ctx: &'a Ctx,
    schema: SchemaOrSource<'a>,
    resolvers: &'a ResolverRegistry<Ctx>,
    operation: OperationOrSource<'a>,
    variables: Option<&'a Object>,
) -> ExecutionOutcome
where
    Ctx: Send + Sync + 'static,
{
    let built_schema;
    let schema: &SchemaType = match schema {
        SchemaOrSource::Built(s) => s,
        SchemaOrSource::Source(src) => match crate::registry::build_schema(src) {
            Ok(s) => {
                built_schema = s;
                &built_schema
            }
            Err(errors) => {
                return ExecutionOutcome {
                    data: None,
                    errors: errors
                        .iter()
                        .map(|e| ResponseError {
                            message: e.to_string(),
                            locations: Vec::new(),
                            path: Vec::new(),
                        })
                        .collect(),
                };
            }
        },
    };

    let validated_doc;
    let (document, operation_name): (&QueryDocument, Option<&str>) = match operation {
        OperationOrSource::Validated(v) => (v.document, v.operation_name),
        OperationOrSource::Source(src) => {
            let outcome: ValidationOutcome = match validation::validate(schema, src, None) {
                Ok(o) => o,
                Err(parse_err) => {
                    return ExecutionOutcome::failed(format!("Could not parse document: {parse_err}"));
                }
            };
            if !outcome.is_valid() {
                return ExecutionOutcome::from_rule_errors(&outcome.errors);
            }
            validated_doc = outcome.document;
            (&validated_doc, None)
        }
    };

    let empty = Object::new();
    let variables = variables.unwrap_or(&empty);

    execute(user_ctx, schema, resolvers, document, operation_name, variables).await
}

/// Executes an already-parsed-and-validated document (§6's `execute`).
pub async fn execute<Ctx>(
    user_ctx: &Ctx,
    schema: &SchemaType,
    resolvers: &ResolverRegistry<Ctx>,
    document: &QueryDocument,
    operation_name: Option<&str>,
    variables: &Object,
) -> ExecutionOutcome
where
    Ctx: Send + Sync + 'static,
{
    let operation = match select_operation(document, operation_name) {
        Ok(op) => op,
        Err(message) => return ExecutionOutcome::failed(message),
    };

    let root_type_name = match operation.operation {
        OperationType::Query => schema.query_type.clone(),
        OperationType::Mutation => match &schema.mutation_type {
            Some(name) => name.clone(),
            None => return ExecutionOutcome::failed("schema defines no mutation root type"),
        },
        OperationType::Subscription => match &schema.subscription_type {
            Some(name) => name.clone(),
            None => return ExecutionOutcome::failed("schema defines no subscription root type"),
        },
    };

    let effective_variables = apply_variable_defaults(operation, variables);

    let ctx = ExecContext {
        schema,
        doc: document,
        resolvers,
        user_ctx,
        variables: &effective_variables,
    };

    let mut visited = HashSet::new();
    let grouped = collect_fields(&ctx, &root_type_name, &operation.selection_set, &mut visited);
    let serial = operation.operation == OperationType::Mutation;

    let (result, errors) =
        execute_fields(&ctx, root_type_name, Value::Null, grouped, Vec::new(), serial).await;

    let data = match result {
        Ok(obj) => Some(Value::Object(obj)),
        Err(Nulled) => Some(Value::Null),
    };

    ExecutionOutcome {
        data,
        errors: errors.iter().map(ResponseError::from).collect(),
    }
}

/// Layers an operation's declared variable defaults under the caller's
/// supplied variables: a variable absent from `variables` falls back to its
/// `$name: Type = default` declaration, if any; a variable present in
/// `variables` (even explicit `null`) keeps the caller's value untouched
/// (§4.E "argument merging rule"; §8 "variable substitution preserves
/// defaults when variables are absent").
fn apply_variable_defaults(operation: &OperationDefinition, variables: &Object) -> Object {
    let mut effective = variables.clone();
    for def in &operation.variable_definitions {
        if effective.contains_key(&def.name) {
            continue;
        }
        if let Some(default) = &def.default_value {
            effective.insert(def.name.clone(), value::from_ast_const(default));
        }
    }
    effective
}

fn select_operation<'a>(
    document: &'a QueryDocument,
    operation_name: Option<&str>,
) -> Result<&'a OperationDefinition, String> {
    if document.operations.is_empty() {
        return Err("no operation provided".to_string());
    }
    if let Some(name) = operation_name {
        return document
            .operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| format!("unknown operation name: `{name}`"));
    }
    if document.operations.len() == 1 {
        return Ok(&document.operations[0]);
    }
    Err("multiple operations provided without an operation name to disambiguate".to_string())
}

// ---------------------------------------------------------------------
// CollectFields
// ---------------------------------------------------------------------

fn collect_fields<Ctx>(
    ctx: &ExecContext<Ctx>,
    parent_type_name: &str,
    selection_set: &SelectionSet,
    visited_fragments: &mut HashSet<String>,
) -> IndexMap<String, Vec<Field>> {
    let mut grouped = IndexMap::new();
    collect_fields_into(ctx, parent_type_name, selection_set, visited_fragments, &mut grouped);
    grouped
}

fn collect_fields_into<Ctx>(
    ctx: &ExecContext<Ctx>,
    parent_type_name: &str,
    selection_set: &SelectionSet,
    visited_fragments: &mut HashSet<String>,
    grouped: &mut IndexMap<String, Vec<Field>>,
) {
    for sel in &selection_set.items {
        match sel {
            Selection::Field(field) => {
                if should_include(&field.directives, ctx.variables) {
                    grouped
                        .entry(field.response_key().to_string())
                        .or_default()
                        .push(field.clone());
                }
            }
            Selection::FragmentSpread(spread) => {
                if !should_include(&spread.directives, ctx.variables) {
                    continue;
                }
                if !visited_fragments.insert(spread.fragment_name.clone()) {
                    continue;
                }
                let Some(frag) = ctx.doc.fragments.iter().find(|f| f.name == spread.fragment_name) else {
                    continue;
                };
                if fragment_applies(ctx.schema, &frag.type_condition, parent_type_name) {
                    collect_fields_into(ctx, parent_type_name, &frag.selection_set, visited_fragments, grouped);
                }
            }
            Selection::InlineFragment(frag) => {
                if !should_include(&frag.directives, ctx.variables) {
                    continue;
                }
                let applies = match &frag.type_condition {
                    Some(name) => fragment_applies(ctx.schema, name, parent_type_name),
                    None => true,
                };
                if applies {
                    collect_fields_into(ctx, parent_type_name, &frag.selection_set, visited_fragments, grouped);
                }
            }
        }
    }
}

/// Whether a fragment with the given type condition applies to a concrete
/// runtime object type: same name, or the object implements the named
/// interface, or the named type is a union the object is a member of.
fn fragment_applies(schema: &SchemaType, type_condition: &str, concrete_type_name: &str) -> bool {
    if type_condition == concrete_type_name {
        return true;
    }
    if let Some(TypeDescriptor::Object { interfaces, .. }) = schema.descriptor_by_name(concrete_type_name) {
        if interfaces.iter().any(|i| i == type_condition) {
            return true;
        }
    }
    matches!(
        schema.descriptor_by_name(type_condition),
        Some(TypeDescriptor::Union { members }) if members.iter().any(|m| m == concrete_type_name)
    )
}

/// Evaluates `@skip`/`@include` on one selection: `true` means the
/// selection is kept.
fn should_include(directives: &[crate::ast::Directive], variables: &Object) -> bool {
    for directive in directives {
        let Some((_, arg_value)) = directive.arguments.iter().find(|(name, _)| name == "if") else {
            continue;
        };
        let resolved = match arg_value {
            crate::ast::Value::Boolean(b) => *b,
            crate::ast::Value::Variable(name) => match variables.get(name) {
                Some(Value::Scalar(value::Scalar::Boolean(b))) => *b,
                _ => false,
            },
            _ => false,
        };
        match directive.name.as_str() {
            "skip" if resolved => return false,
            "include" if !resolved => return false,
            _ => {}
        }
    }
    true
}

// ---------------------------------------------------------------------
// ExecuteFields / CompleteValue
// ---------------------------------------------------------------------

fn execute_fields<'a, Ctx>(
    ctx: &'a ExecContext<'a, Ctx>,
    parent_type_name: String,
    parent_value: Value,
    grouped: IndexMap<String, Vec<Field>>,
    path: Vec<PathSegment>,
    serial: bool,
) -> BoxFuture<'a, (Result<Object, Nulled>, Vec<ExecutionError>)>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        let mut errors = Vec::new();
        let mut results: Vec<(String, Result<Value, Nulled>)> = Vec::with_capacity(grouped.len());

        if serial {
            for (key, fields) in grouped {
                let mut field_path = path.clone();
                field_path.push(PathSegment::Key(key.clone()));
                let (res, errs) =
                    resolve_one(ctx, &parent_type_name, &parent_value, fields, field_path).await;
                errors.extend(errs);
                results.push((key, res));
            }
        } else {
            let futures = grouped.into_iter().map(|(key, fields)| {
                let mut field_path = path.clone();
                field_path.push(PathSegment::Key(key.clone()));
                async move {
                    let (res, errs) =
                        resolve_one(ctx, &parent_type_name, &parent_value, fields, field_path).await;
                    (key, res, errs)
                }
            });
            for (key, res, errs) in join_all(futures).await {
                errors.extend(errs);
                results.push((key, res));
            }
        }

        let failed = results.iter().any(|(_, r)| r.is_err());
        if failed {
            return (Err(Nulled), errors);
        }

        let mut object = Object::with_capacity(results.len());
        for (key, res) in results {
            match res {
                Ok(v) => object.insert(key, v),
                Err(Nulled) => unreachable!("checked above"),
            }
        }
        (Ok(object), errors)
    })
}

async fn resolve_one<Ctx>(
    ctx: &ExecContext<'_, Ctx>,
    parent_type_name: &str,
    parent_value: &Value,
    fields: Vec<Field>,
    path: Vec<PathSegment>,
) -> (Result<Value, Nulled>, Vec<ExecutionError>)
where
    Ctx: Send + Sync + 'static,
{
    let field = &fields[0];
    let location = field.position;

    if field.name == "__typename" {
        return (Ok(Value::string(parent_type_name)), Vec::new());
    }

    let field_slot: Option<FieldSlot> = ctx
        .schema
        .descriptor_by_name(parent_type_name)
        .and_then(|d| d.fields())
        .and_then(|fs| fs.get(&field.name))
        .cloned();

    let Some(slot) = field_slot else {
        return (
            Ok(Value::Null),
            vec![ExecutionError::new(
                location,
                path,
                FieldError::Internal(format!(
                    "no field registered for '{parent_type_name}.{}'",
                    field.name
                )),
            )],
        );
    };

    let args = merge_arguments(&slot, &field.arguments, ctx.variables);

    if let Err(arg_error) = check_required_arguments(&slot, &args) {
        let errors = vec![ExecutionError::new(location, path, FieldError::Argument(arg_error))];
        return if slot.type_ref.is_non_null() {
            (Err(Nulled), errors)
        } else {
            (Ok(Value::Null), errors)
        };
    }

    let resolver = ctx.resolvers.lookup(parent_type_name, &field.name);
    let outcome: FieldResult = resolver(ctx.user_ctx, parent_value, Some(&args)).resolve().await;

    let sub_selection = merge_selection_sets(&fields);

    complete_value(ctx, &slot.type_ref, outcome, sub_selection, path, location).await
}

/// Runtime counterpart to validation's `ProvidedRequiredArguments`: a
/// non-null argument must resolve to a non-null value once variables are
/// substituted (§7 `ArgumentError`). Validation only sees that *some*
/// value was provided for the argument (a literal, or a variable
/// reference backed by a default) — it cannot see that the caller's
/// variables map later overrode a defaulted variable with an explicit
/// `null` (§8 scenario 6), so this check runs again at execution time.
fn check_required_arguments(slot: &FieldSlot, args: &Arguments) -> Result<(), ArgumentError> {
    for (name, arg_slot) in &slot.arguments {
        if !arg_slot.type_ref.is_non_null() {
            continue;
        }
        match args.get(name) {
            None => {
                return Err(ArgumentError::MissingRequiredArgument { name: name.clone() });
            }
            Some(Value::Null) => {
                return Err(ArgumentError::VariableTypeMismatch {
                    name: name.clone(),
                    argument: name.clone(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn merge_selection_sets(fields: &[Field]) -> Option<SelectionSet> {
    let items: Vec<_> = fields
        .iter()
        .flat_map(|f| f.selection_set.items.iter().cloned())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(SelectionSet { items })
    }
}

/// Builds a resolver's argument bag: schema defaults overlaid by literal
/// arguments present on the selection, overlaid again by the caller's
/// variables map **only for variable-valued arguments whose key is present**
/// in that map (§4.E "argument merging").
fn merge_arguments(slot: &FieldSlot, literal_args: &[(String, crate::ast::Value)], variables: &Object) -> Arguments {
    let mut args = Arguments::new();
    for (name, arg_slot) in &slot.arguments {
        if let Some(default) = &arg_slot.default_value {
            args.insert(name.clone(), value::from_ast_const(default));
        }
    }
    for (name, literal) in literal_args {
        match literal {
            crate::ast::Value::Variable(var_name) => {
                if let Some(v) = variables.get(var_name) {
                    args.insert(name.clone(), v.clone());
                }
            }
            other => {
                args.insert(name.clone(), value::from_ast_const(other));
            }
        }
    }
    args
}

fn complete_value<'a, Ctx>(
    ctx: &'a ExecContext<'a, Ctx>,
    field_type: &'a TypeRef,
    result: FieldResult,
    sub_selection: Option<SelectionSet>,
    path: Vec<PathSegment>,
    location: Pos,
) -> BoxFuture<'a, (Result<Value, Nulled>, Vec<ExecutionError>)>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        match result {
            Err(e) => {
                let errors = vec![ExecutionError::new(location, path, e)];
                if field_type.is_non_null() {
                    (Err(Nulled), errors)
                } else {
                    (Ok(Value::Null), errors)
                }
            }
            Ok(resolved) => complete_ok(ctx, field_type, resolved, sub_selection, path, location).await,
        }
    })
}

fn complete_ok<'a, Ctx>(
    ctx: &'a ExecContext<'a, Ctx>,
    field_type: &'a TypeRef,
    resolved: ResolvedValue,
    sub_selection: Option<SelectionSet>,
    path: Vec<PathSegment>,
    location: Pos,
) -> BoxFuture<'a, (Result<Value, Nulled>, Vec<ExecutionError>)>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        match field_type {
            TypeRef::NonNull(inner) => {
                if resolved.value.is_null() {
                    return (
                        Err(Nulled),
                        vec![ExecutionError::new(location, path, FieldError::NonNullViolation)],
                    );
                }
                // A deeper failure that `inner` already swallowed into `Ok(Value::Null)`
                // (because `inner` is itself nullable) still violates *this* wrapper: a
                // non-null position can't accept null regardless of how it arrived.
                let (result, errors) = complete_ok(ctx, inner, resolved, sub_selection, path, location).await;
                match result {
                    Ok(Value::Null) => (Err(Nulled), errors),
                    other => (other, errors),
                }
            }
            TypeRef::List(inner) => {
                if resolved.value.is_null() {
                    return (Ok(Value::Null), Vec::new());
                }
                let Some(items) = resolved.value.as_list().map(<[Value]>::to_vec) else {
                    return (
                        Ok(Value::Null),
                        vec![ExecutionError::new(
                            location,
                            path,
                            FieldError::Internal("resolver returned a non-list value for a list field".to_string()),
                        )],
                    );
                };
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Vec::new();
                let mut failed = false;
                for (i, item) in items.into_iter().enumerate() {
                    let mut item_path = path.clone();
                    item_path.push(PathSegment::Index(i));
                    let item_resolved = ResolvedValue {
                        value: item,
                        concrete_type_name: resolved.concrete_type_name.clone(),
                    };
                    let (res, errs) =
                        complete_ok(ctx, inner, item_resolved, sub_selection.clone(), item_path, location).await;
                    errors.extend(errs);
                    match res {
                        Ok(v) => out.push(v),
                        Err(Nulled) => {
                            failed = true;
                            break;
                        }
                    }
                }
                // This list is nullable at this position (no enclosing `NonNull` arm
                // intercepted it): an element's own non-null violation nulls the whole
                // list rather than propagating past it (§8 "a null non-null list is a
                // violation that propagates" is about the *list itself* being null, not
                // about one of its required elements).
                if failed {
                    (Ok(Value::Null), errors)
                } else {
                    (Ok(Value::List(out)), errors)
                }
            }
            TypeRef::Named(spec) => {
                if resolved.value.is_null() {
                    return (Ok(Value::Null), Vec::new());
                }
                match ctx.schema.descriptor(spec) {
                    Some(TypeDescriptor::Scalar) | Some(TypeDescriptor::Enum { .. }) | None => {
                        (Ok(resolved.value.clone()), Vec::new())
                    }
                    Some(TypeDescriptor::Object { .. }) => {
                        let concrete_name = ctx.schema.name_of(spec).unwrap_or_default().to_string();
                        let (result, errors) =
                            complete_composite(ctx, concrete_name, resolved, sub_selection, path, location).await;
                        // Same rationale as the list case above: reached here means this
                        // field's own type isn't `NonNull`, so a required-subfield
                        // violation nulls this object rather than propagating further.
                        match result {
                            Err(Nulled) => (Ok(Value::Null), errors),
                            ok => (ok, errors),
                        }
                    }
                    Some(TypeDescriptor::Interface { .. }) | Some(TypeDescriptor::Union { .. }) => {
                        match resolved.concrete_type_name.clone() {
                            Some(name) => {
                                let (result, errors) =
                                    complete_composite(ctx, name, resolved, sub_selection, path, location).await;
                                match result {
                                    Err(Nulled) => (Ok(Value::Null), errors),
                                    ok => (ok, errors),
                                }
                            }
                            None => (
                                Err(Nulled),
                                vec![ExecutionError::new(
                                    location,
                                    path,
                                    FieldError::Internal(
                                        "resolver did not supply a concrete type name for an interface/union field"
                                            .to_string(),
                                    ),
                                )],
                            ),
                        }
                    }
                    Some(TypeDescriptor::InputObject { .. }) => (
                        Ok(Value::Null),
                        vec![ExecutionError::new(
                            location,
                            path,
                            FieldError::Internal("input object type used as an output type".to_string()),
                        )],
                    ),
                }
            }
        }
    })
}

fn complete_composite<'a, Ctx>(
    ctx: &'a ExecContext<'a, Ctx>,
    concrete_type_name: String,
    resolved: ResolvedValue,
    sub_selection: Option<SelectionSet>,
    path: Vec<PathSegment>,
    location: Pos,
) -> BoxFuture<'a, (Result<Value, Nulled>, Vec<ExecutionError>)>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        let _ = location;
        let selection_set = sub_selection.unwrap_or_default();
        let mut visited = HashSet::new();
        let grouped = collect_fields(ctx, &concrete_type_name, &selection_set, &mut visited);

        let (result, errors) = execute_fields(ctx, concrete_type_name, resolved.value, grouped, path, false).await;
        match result {
            Ok(obj) => (Ok(Value::Object(obj)), errors),
            Err(Nulled) => (Err(Nulled), errors),
        }
    })
}
