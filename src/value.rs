//! The response value model (§3 "Response").
//!
//! `Object` is backed by an `IndexMap` so that "response map iteration
//! order = source order" (§5) holds without a separate key-order vector —
//! the same trick `juniper`'s own `value::Object` uses.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

/// A fully-resolved response value: a scalar, an ordered list, an ordered
/// object, or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Scalar(Scalar),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Scalar(Scalar::Int(v))
    }

    pub fn float(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(v.into()))
    }

    pub fn boolean(v: bool) -> Self {
        Value::Scalar(Scalar::Boolean(v))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// An ordered string-keyed map, preserving first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Object(IndexMap<String, Value>);

impl Object {
    pub fn new() -> Self {
        Object(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Object(IndexMap::with_capacity(capacity))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Object(IndexMap::from_iter(iter))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// Converts an operation-literal/const value (variable references already
/// substituted away) into a response [`Value`], used to hand resolvers
/// their by-name default lookups and to seed argument maps.
pub fn from_ast_const(value: &crate::ast::Value) -> Value {
    match value {
        crate::ast::Value::Null => Value::Null,
        crate::ast::Value::Variable(_) => {
            // Must have been substituted before reaching here; treat an
            // unresolved variable defensively as null rather than panic.
            Value::Null
        }
        crate::ast::Value::Int(i) => Value::int(*i),
        crate::ast::Value::Float(f) => Value::float(*f),
        crate::ast::Value::String(s) => Value::string(s.clone()),
        crate::ast::Value::Boolean(b) => Value::boolean(*b),
        crate::ast::Value::Enum(e) => Value::string(e.clone()),
        crate::ast::Value::List(items) => Value::List(items.iter().map(from_ast_const).collect()),
        crate::ast::Value::Object(fields) => {
            let mut obj = Object::new();
            for (k, v) in fields {
                obj.insert(k.clone(), from_ast_const(v));
            }
            Value::Object(obj)
        }
    }
}

/// A JSON-like argument map passed to resolvers: `BTreeMap` for
/// deterministic iteration when resolvers inspect the whole bag.
pub type Arguments = BTreeMap<String, Value>;
