//! Structured errors with source locations (component F).
//!
//! Mirrors the shape of `jeffmo-libgraphql`'s `TypeValidationError`/
//! `OperationBuildError` enums: one `thiserror`-derived enum per failure
//! boundary, carrying whatever the caller needs to build a wire-shaped
//! error without re-deriving it from a string message.

use std::fmt;

use crate::ast::Pos;

/// A response-path segment: a response key for object fields, an index for
/// list elements.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Errors raised while building the type registry from a schema document
/// (component B).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate type definition for `{name}` at {second:?} (first defined at {first:?})")]
    DuplicateType {
        name: String,
        first: Pos,
        second: Pos,
    },

    #[error("Type `{referenced}` referenced from `{from}` is not defined in the schema")]
    UnknownTypeReference { from: String, referenced: String },

    #[error("`{wrapper}` wrapper used in a position that is not a type reference")]
    InvalidWrapper { wrapper: String },

    #[error("Could not parse schema: {0}")]
    Parse(String),

    #[error("Operation uses `{operation}` but the schema declares no such root type")]
    MissingRootType { operation: String },

    #[error(
        "`{type_name}.{field_name}` does not match the signature required by interface `{interface_name}`"
    )]
    ImplementsIncompatibleField {
        type_name: String,
        interface_name: String,
        field_name: String,
    },

    #[error("`{type_name}` implements undefined interface `{interface_name}`")]
    ImplementsUndefinedInterface {
        type_name: String,
        interface_name: String,
    },

    #[error("Directive `@{name}` is already defined")]
    DuplicateDirective { name: String },
}

/// One validation rule violation (component C).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleError {
    pub message: String,
    pub locations: Vec<Pos>,
}

impl RuleError {
    pub fn new(message: impl Into<String>, locations: &[Pos]) -> Self {
        RuleError {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Runtime argument-shape failures surfaced during execution (§7
/// `ArgumentError`).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("Missing required argument `{name}`")]
    MissingRequiredArgument { name: String },

    #[error("Unknown argument `{name}`")]
    UnknownArgument { name: String },

    #[error("Variable `${name}` does not match the type required by argument `{argument}`")]
    VariableTypeMismatch { name: String, argument: String },
}

/// A field-level failure, either signalled by a resolver or synthesized by
/// the executor (missing argument, non-null violation, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("{0}")]
    Resolver(String),

    #[error("Cannot return null for non-null field")]
    NonNullViolation,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FieldError {
    pub fn resolver(message: impl Into<String>) -> Self {
        FieldError::Resolver(message.into())
    }
}

/// One execution-time failure, with the response path and source location
/// of the field that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    pub location: Pos,
    pub path: Vec<PathSegment>,
    pub error: FieldError,
}

impl ExecutionError {
    pub fn new(location: Pos, path: Vec<PathSegment>, error: FieldError) -> Self {
        ExecutionError {
            location,
            path,
            error,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// The wire shape common to both validation and execution errors (§6):
/// `{message, locations?, path?}`, with `locations`/`path` omitted entirely
/// when empty rather than serialized as `[]`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Pos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl From<&RuleError> for ResponseError {
    fn from(e: &RuleError) -> Self {
        ResponseError {
            message: e.message.clone(),
            locations: e.locations.clone(),
            path: Vec::new(),
        }
    }
}

impl From<&ExecutionError> for ResponseError {
    fn from(e: &ExecutionError) -> Self {
        let locations = if e.location == Pos::default() {
            Vec::new()
        } else {
            vec![e.location]
        };
        ResponseError {
            message: e.error.to_string(),
            locations,
            path: e.path.clone(),
        }
    }
}

/// The top-level error surface unifying every failure family the public API
/// can return.
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    #[error("Could not parse document: {0}")]
    Parse(String),

    #[error("Schema contains {} error(s)", .0.len())]
    Schema(Vec<SchemaError>),

    #[error("Document failed validation with {} error(s)", .0.len())]
    Validation(Vec<RuleError>),

    #[error("No operation provided")]
    NoOperationProvided,

    #[error("Unknown operation name: `{0}`")]
    UnknownOperationName(String),

    #[error("Multiple operations provided without an operation name to disambiguate")]
    MultipleOperationsProvided,

    #[error("{0}")]
    Internal(String),
}
