//! Owned, non-generic AST consumed by the registry builder, validator and
//! executor.
//!
//! `graphql-parser` is the external collaborator that turns schema/operation
//! source text into an AST (§6 of the spec); this module converts its output
//! once, up front, into the plain `String`-keyed shapes the rest of the
//! crate works with. Keeping the conversion in one place means the rest of
//! the crate never has to deal with `graphql-parser`'s own type names, and
//! a future parser swap only touches this file.

use std::collections::BTreeMap;

use graphql_parser::{Pos as ExternalPos, query as gq, schema as gs};

/// A 1-based source location, matching `graphql-parser`'s own `Pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize)]
pub struct Pos {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl From<ExternalPos> for Pos {
    fn from(p: ExternalPos) -> Self {
        Pos {
            line: p.line,
            column: p.column,
        }
    }
}

/// A type reference as it appears in a field, argument or variable
/// declaration: a bare name, or a name wrapped in `[...]`/`...!` any number
/// of times.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A named type reference, e.g. `String`.
    Named(String),
    /// A list wrapper, e.g. `[String]`.
    List(Box<Type>),
    /// A non-null wrapper, e.g. `String!`.
    NonNull(Box<Type>),
}

impl Type {
    /// The innermost named type this reference ultimately wraps.
    pub fn inner_name(&self) -> &str {
        match self {
            Type::Named(name) => name,
            Type::List(inner) | Type::NonNull(inner) => inner.inner_name(),
        }
    }

    /// Whether the outermost wrapper is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }
}

/// A literal or variable-reference value, as it appears in an argument,
/// default value or list/object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `$name`.
    Variable(String),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// A `value` literal with no `Variable` variant, used for schema-side
/// default values, which may never reference a variable.
pub type ConstValue = Value;

/// `@directive(arg: value, ...)` as used on a selection, fragment, variable
/// definition or schema-side field/argument declaration.
#[derive(Debug, Clone)]
pub struct Directive {
    pub position: Pos,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
}

// ---------------------------------------------------------------------
// Schema-side AST
// ---------------------------------------------------------------------

/// A parsed schema document: every `type`/`interface`/`union`/`enum`/
/// `input`/`scalar`/`directive` declaration plus the optional `schema { }`
/// block naming the root operation types.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    pub schema_definition: Option<SchemaDefinition>,
    pub types: Vec<TypeDefinition>,
    pub directive_definitions: Vec<DirectiveDefinition>,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    pub position: Pos,
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(t) => &t.name,
            TypeDefinition::Object(t) => &t.name,
            TypeDefinition::Interface(t) => &t.name,
            TypeDefinition::Union(t) => &t.name,
            TypeDefinition::Enum(t) => &t.name,
            TypeDefinition::InputObject(t) => &t.name,
        }
    }

    pub fn position(&self) -> Pos {
        match self {
            TypeDefinition::Scalar(t) => t.position,
            TypeDefinition::Object(t) => t.position,
            TypeDefinition::Interface(t) => t.position,
            TypeDefinition::Union(t) => t.position,
            TypeDefinition::Enum(t) => t.position,
            TypeDefinition::InputObject(t) => t.position,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScalarType {
    pub position: Pos,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub position: Pos,
    pub name: String,
    pub implements_interfaces: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub position: Pos,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub position: Pos,
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub position: Pos,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub position: Pos,
    pub name: String,
    pub fields: Vec<InputFieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub position: Pos,
    pub name: String,
    pub arguments: Vec<InputFieldDefinition>,
    pub field_type: Type,
}

#[derive(Debug, Clone)]
pub struct InputFieldDefinition {
    pub position: Pos,
    pub name: String,
    pub value_type: Type,
    pub default_value: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub position: Pos,
    pub name: String,
    pub arguments: Vec<InputFieldDefinition>,
}

// ---------------------------------------------------------------------
// Operation-side AST
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct QueryDocument {
    pub operations: Vec<OperationDefinition>,
    pub fragments: Vec<FragmentDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Debug, Clone)]
pub struct OperationDefinition {
    pub position: Pos,
    pub operation: OperationType,
    pub name: Option<String>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub position: Pos,
    pub name: String,
    pub var_type: Type,
    pub default_value: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct FragmentDefinition {
    pub position: Pos,
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    pub items: Vec<Selection>,
}

#[derive(Debug, Clone)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub position: Pos,
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl Field {
    /// The key this field's value is recorded under in the response map:
    /// its alias if present, else its name.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct FragmentSpread {
    pub position: Pos,
    pub fragment_name: String,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub position: Pos,
    pub type_condition: Option<String>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

// ---------------------------------------------------------------------
// Conversion from `graphql-parser`'s AST
// ---------------------------------------------------------------------

pub fn convert_schema_document(doc: &gs::Document) -> SchemaDocument {
    let mut out = SchemaDocument::default();
    for def in &doc.definitions {
        match def {
            gs::Definition::SchemaDefinition(s) => {
                out.schema_definition = Some(SchemaDefinition {
                    position: s.position.into(),
                    query: s.query.clone(),
                    mutation: s.mutation.clone(),
                    subscription: s.subscription.clone(),
                });
            }
            gs::Definition::TypeDefinition(t) => out.types.push(convert_type_definition(t)),
            gs::Definition::TypeExtension(_) => {
                // Type extensions are not part of this engine's scope.
            }
            gs::Definition::DirectiveDefinition(d) => {
                out.directive_definitions.push(DirectiveDefinition {
                    position: d.position.into(),
                    name: d.name.clone(),
                    arguments: d.arguments.iter().map(convert_input_value).collect(),
                });
            }
        }
    }
    out
}

fn convert_type_definition(t: &gs::TypeDefinition) -> TypeDefinition {
    match t {
        gs::TypeDefinition::Scalar(s) => TypeDefinition::Scalar(ScalarType {
            position: s.position.into(),
            name: s.name.clone(),
        }),
        gs::TypeDefinition::Object(o) => TypeDefinition::Object(ObjectType {
            position: o.position.into(),
            name: o.name.clone(),
            implements_interfaces: o.implements_interfaces.clone(),
            fields: o.fields.iter().map(convert_field).collect(),
        }),
        gs::TypeDefinition::Interface(i) => TypeDefinition::Interface(InterfaceType {
            position: i.position.into(),
            name: i.name.clone(),
            fields: i.fields.iter().map(convert_field).collect(),
        }),
        gs::TypeDefinition::Union(u) => TypeDefinition::Union(UnionType {
            position: u.position.into(),
            name: u.name.clone(),
            types: u.types.clone(),
        }),
        gs::TypeDefinition::Enum(e) => TypeDefinition::Enum(EnumType {
            position: e.position.into(),
            name: e.name.clone(),
            values: e.values.iter().map(|v| v.name.clone()).collect(),
        }),
        gs::TypeDefinition::InputObject(i) => TypeDefinition::InputObject(InputObjectType {
            position: i.position.into(),
            name: i.name.clone(),
            fields: i.fields.iter().map(convert_input_value).collect(),
        }),
    }
}

fn convert_field(f: &gs::Field) -> FieldDefinition {
    FieldDefinition {
        position: f.position.into(),
        name: f.name.clone(),
        arguments: f.arguments.iter().map(convert_input_value).collect(),
        field_type: convert_type(&f.field_type),
    }
}

fn convert_input_value(v: &gs::InputValue) -> InputFieldDefinition {
    InputFieldDefinition {
        position: v.position.into(),
        name: v.name.clone(),
        value_type: convert_type(&v.value_type),
        default_value: v.default_value.as_ref().map(convert_value),
    }
}

fn convert_type(t: &gs::Type) -> Type {
    match t {
        gs::Type::NamedType(name) => Type::Named(name.clone()),
        gs::Type::ListType(inner) => Type::List(Box::new(convert_type(inner))),
        gs::Type::NonNullType(inner) => Type::NonNull(Box::new(convert_type(inner))),
    }
}

fn convert_value(v: &gs::Value) -> Value {
    match v {
        gs::Value::Variable(name) => Value::Variable(name.clone()),
        gs::Value::Int(n) => Value::Int(n.as_i64().unwrap_or_default()),
        gs::Value::Float(f) => Value::Float(*f),
        gs::Value::String(s) => Value::String(s.clone()),
        gs::Value::Boolean(b) => Value::Boolean(*b),
        gs::Value::Null => Value::Null,
        gs::Value::Enum(name) => Value::Enum(name.clone()),
        gs::Value::List(items) => Value::List(items.iter().map(convert_value).collect()),
        gs::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), convert_value(v)))
                .collect(),
        ),
    }
}

fn convert_directives(directives: &[gq::Directive]) -> Vec<Directive> {
    directives
        .iter()
        .map(|d| Directive {
            position: d.position.into(),
            name: d.name.clone(),
            arguments: d
                .arguments
                .iter()
                .map(|(k, v)| (k.clone(), convert_value(v)))
                .collect(),
        })
        .collect()
}

pub fn convert_query_document(doc: &gq::Document) -> QueryDocument {
    let mut out = QueryDocument::default();
    for def in &doc.definitions {
        match def {
            gq::Definition::Operation(op) => out.operations.push(convert_operation(op)),
            gq::Definition::Fragment(f) => out.fragments.push(FragmentDefinition {
                position: f.position.into(),
                name: f.name.clone(),
                type_condition: match &f.type_condition {
                    gq::TypeCondition::On(name) => name.clone(),
                },
                directives: convert_directives(&f.directives),
                selection_set: convert_selection_set(&f.selection_set),
            }),
        }
    }
    out
}

fn convert_operation(op: &gq::OperationDefinition) -> OperationDefinition {
    match op {
        gq::OperationDefinition::SelectionSet(set) => OperationDefinition {
            position: Pos::default(),
            operation: OperationType::Query,
            name: None,
            variable_definitions: Vec::new(),
            directives: Vec::new(),
            selection_set: convert_selection_set(set),
        },
        gq::OperationDefinition::Query(q) => OperationDefinition {
            position: q.position.into(),
            operation: OperationType::Query,
            name: q.name.clone(),
            variable_definitions: q
                .variable_definitions
                .iter()
                .map(convert_variable_definition)
                .collect(),
            directives: convert_directives(&q.directives),
            selection_set: convert_selection_set(&q.selection_set),
        },
        gq::OperationDefinition::Mutation(m) => OperationDefinition {
            position: m.position.into(),
            operation: OperationType::Mutation,
            name: m.name.clone(),
            variable_definitions: m
                .variable_definitions
                .iter()
                .map(convert_variable_definition)
                .collect(),
            directives: convert_directives(&m.directives),
            selection_set: convert_selection_set(&m.selection_set),
        },
        gq::OperationDefinition::Subscription(s) => OperationDefinition {
            position: s.position.into(),
            operation: OperationType::Subscription,
            name: s.name.clone(),
            variable_definitions: s
                .variable_definitions
                .iter()
                .map(convert_variable_definition)
                .collect(),
            directives: convert_directives(&s.directives),
            selection_set: convert_selection_set(&s.selection_set),
        },
    }
}

fn convert_variable_definition(v: &gq::VariableDefinition) -> VariableDefinition {
    VariableDefinition {
        position: v.position.into(),
        name: v.name.clone(),
        var_type: convert_type(&v.var_type),
        default_value: v.default_value.as_ref().map(convert_value),
    }
}

fn convert_selection_set(set: &gq::SelectionSet) -> SelectionSet {
    SelectionSet {
        items: set.items.iter().map(convert_selection).collect(),
    }
}

fn convert_selection(sel: &gq::Selection) -> Selection {
    match sel {
        gq::Selection::Field(f) => Selection::Field(Field {
            position: f.position.into(),
            alias: f.alias.clone(),
            name: f.name.clone(),
            arguments: f
                .arguments
                .iter()
                .map(|(k, v)| (k.clone(), convert_value(v)))
                .collect(),
            directives: convert_directives(&f.directives),
            selection_set: convert_selection_set(&f.selection_set),
        }),
        gq::Selection::FragmentSpread(s) => Selection::FragmentSpread(FragmentSpread {
            position: s.position.into(),
            fragment_name: s.fragment_name.clone(),
            directives: convert_directives(&s.directives),
        }),
        gq::Selection::InlineFragment(f) => Selection::InlineFragment(InlineFragment {
            position: f.position.into(),
            type_condition: f.type_condition.as_ref().map(|tc| match tc {
                gq::TypeCondition::On(name) => name.clone(),
            }),
            directives: convert_directives(&f.directives),
            selection_set: convert_selection_set(&f.selection_set),
        }),
    }
}
