//! Schema symbol table + type-shape registry (component B).
//!
//! Walks a parsed schema document and assigns a stable [`SpecId`] to every
//! declared type, field, argument and directive, recording a
//! [`TypeDescriptor`] for each. Downstream components (the validator, the
//! executor) never hold onto AST references across a call boundary — they
//! pass `SpecId`s and resolve them back through this registry.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use fnv::FnvHasher;
use indexmap::IndexMap;

use crate::ast::{self, ConstValue, SchemaDocument, Type};
use crate::error::SchemaError;

/// A namespaced, hashable identifier for a type/field/argument/variable
/// within one schema (or, for the validator's operation overlay, within one
/// operation). See §3 "Spec identifier" of the specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(pub String);

impl SpecId {
    fn type_id(schema_hash: u64, name: &str) -> Self {
        SpecId(format!("type.{schema_hash:x}.{name}"))
    }

    fn field_id(schema_hash: u64, parent: &str, field: &str) -> Self {
        SpecId(format!("field.{schema_hash:x}.{parent}.{field}"))
    }

    fn arg_id(schema_hash: u64, parent: &str, field: &str, arg: &str) -> Self {
        SpecId(format!("arg.{schema_hash:x}.{parent}.{field}.{arg}"))
    }

    /// The fixed spec identifier of one of the five built-in scalars. These
    /// carry no scope-hash segment, so they compare equal across schemas.
    pub fn builtin_scalar(name: &str) -> Self {
        SpecId(format!("scalar.{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// A type reference resolved into spec identifiers: a bare named type, or
/// that type wrapped in any number of `List`/`NonNull` layers. This is the
/// realization of the distilled spec's "alias for referential types".
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Named(SpecId),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn innermost(&self) -> &SpecId {
        match self {
            TypeRef::Named(id) => id,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.innermost(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The type obtained after stripping one non-null wrapper, if present.
    pub fn unwrap_non_null(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

/// The kind tag carried by every type-bearing AST node (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// An object/interface/input-object field slot: the field's own spec
/// (an alias to its declared, possibly wrapped, type) plus its arguments.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    pub type_ref: TypeRef,
    /// Empty for input-object fields, populated for output fields.
    pub arguments: IndexMap<String, ArgumentSlot>,
    /// Only meaningful for input-object fields.
    pub default_value: Option<ConstValue>,
}

#[derive(Debug, Clone)]
pub struct ArgumentSlot {
    pub type_ref: TypeRef,
    pub default_value: Option<ConstValue>,
}

impl ArgumentSlot {
    pub fn is_required(&self) -> bool {
        self.type_ref.is_non_null() && self.default_value.is_none()
    }
}

/// A fully resolved type descriptor (§3 "type registry").
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Scalar,
    Object {
        fields: IndexMap<String, FieldSlot>,
        interfaces: Vec<String>,
    },
    Interface {
        fields: IndexMap<String, FieldSlot>,
    },
    Union {
        members: Vec<String>,
    },
    Enum {
        values: Vec<String>,
    },
    InputObject {
        fields: IndexMap<String, FieldSlot>,
    },
}

impl TypeDescriptor {
    pub fn kind(&self) -> Kind {
        match self {
            TypeDescriptor::Scalar => Kind::Scalar,
            TypeDescriptor::Object { .. } => Kind::Object,
            TypeDescriptor::Interface { .. } => Kind::Interface,
            TypeDescriptor::Union { .. } => Kind::Union,
            TypeDescriptor::Enum { .. } => Kind::Enum,
            TypeDescriptor::InputObject { .. } => Kind::InputObject,
        }
    }

    pub fn fields(&self) -> Option<&IndexMap<String, FieldSlot>> {
        match self {
            TypeDescriptor::Object { fields, .. }
            | TypeDescriptor::Interface { fields }
            | TypeDescriptor::InputObject { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Object { .. } | TypeDescriptor::Interface { .. } | TypeDescriptor::Union { .. }
        )
    }

    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Scalar | TypeDescriptor::Enum { .. } | TypeDescriptor::InputObject { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct DirectiveDescriptor {
    pub arguments: IndexMap<String, ArgumentSlot>,
}

/// The immutable, `Arc`-shareable outcome of [`build_schema`]: the spec-map
/// plus the root operation type names.
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub schema_hash: u64,
    types: HashMap<String, TypeDescriptor>,
    pub directives: HashMap<String, DirectiveDescriptor>,
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

impl SchemaType {
    pub fn spec_for_name(&self, name: &str) -> Option<SpecId> {
        if BUILTIN_SCALARS.contains(&name) {
            return Some(SpecId::builtin_scalar(name));
        }
        if self.types.contains_key(name) {
            Some(SpecId::type_id(self.schema_hash, name))
        } else {
            None
        }
    }

    pub fn descriptor(&self, spec: &SpecId) -> Option<&TypeDescriptor> {
        if let Some(name) = self.name_of(spec) {
            self.types.get(name)
        } else {
            None
        }
    }

    pub fn descriptor_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Recovers the declared type name a spec identifier refers to. Builtin
    /// scalar specs carry no scope-hash segment, so their name is the
    /// suffix after `scalar.`; schema-rooted specs are `type.<hash>.<name>`.
    pub fn name_of<'a>(&self, spec: &'a SpecId) -> Option<&'a str> {
        let type_prefix = format!("type.{:x}.", self.schema_hash);
        spec.0
            .strip_prefix("scalar.")
            .or_else(|| spec.0.strip_prefix(type_prefix.as_str()))
    }

    pub fn resolve_type_ref(&self, ty: &Type) -> Result<TypeRef, String> {
        match ty {
            Type::Named(name) => self
                .spec_for_name(name)
                .map(TypeRef::Named)
                .ok_or_else(|| name.clone()),
            Type::List(inner) => Ok(TypeRef::List(Box::new(self.resolve_type_ref(inner)?))),
            Type::NonNull(inner) => Ok(TypeRef::NonNull(Box::new(self.resolve_type_ref(inner)?))),
        }
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }
}

fn schema_hash(source: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    source.hash(&mut hasher);
    hasher.finish()
}

/// Builds the type registry from schema source text (§4.B).
pub fn build_schema(source: &str) -> Result<SchemaType, Vec<SchemaError>> {
    let parsed =
        graphql_parser::schema::parse_schema(source).map_err(|e| vec![SchemaError::Parse(e.to_string())])?;
    let doc = ast::convert_schema_document(&parsed);
    build_from_document(&doc, schema_hash(source))
}

fn build_from_document(doc: &SchemaDocument, hash: u64) -> Result<SchemaType, Vec<SchemaError>> {
    let mut errors = Vec::new();
    let mut types: HashMap<String, TypeDescriptor> = HashMap::new();
    let mut positions: HashMap<String, ast::Pos> = HashMap::new();

    // Pass 1: register every declared type name, detecting duplicates, so
    // that field-type resolution in pass 2 can look any of them up
    // regardless of declaration order (recursive/forward references are
    // symbolic by name and never require the target to be built yet).
    for def in &doc.types {
        let name = def.name().to_string();
        if let Some(&first) = positions.get(&name) {
            errors.push(SchemaError::DuplicateType {
                name,
                first,
                second: def.position(),
            });
            continue;
        }
        positions.insert(name, def.position());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Pass 2: build the real descriptor for every type. Field/argument
    // types are resolved as symbolic `TypeRef`s against type *names*, so no
    // two-phase placeholder pass is needed: a field referencing a type
    // built later in this loop (or itself, or an ancestor) just stores the
    // name-derived spec id, resolved lazily by the reader.
    let stub_schema = SchemaType {
        schema_hash: hash,
        types: doc
            .types
            .iter()
            .map(|d| (d.name().to_string(), TypeDescriptor::Scalar))
            .collect(),
        directives: HashMap::new(),
        query_type: String::new(),
        mutation_type: None,
        subscription_type: None,
    };

    for def in &doc.types {
        match build_type_descriptor(def, &stub_schema) {
            Ok(descriptor) => {
                types.insert(def.name().to_string(), descriptor);
            }
            Err(e) => errors.push(e),
        }
    }

    // Pass 3: verify every referenced type name resolves (invariant ii),
    // and that declared interface implementations exist and are
    // interfaces (SchemaError::ImplementsUndefinedInterface /
    // ImplementsIncompatibleField).
    for (name, descriptor) in &types {
        if let Some(fields) = descriptor.fields() {
            for (field_name, slot) in fields {
                check_type_ref_resolves(name, field_name, &slot.type_ref, &types, &mut errors);
                for (arg_name, arg) in &slot.arguments {
                    check_type_ref_resolves(
                        &format!("{name}.{field_name}"),
                        arg_name,
                        &arg.type_ref,
                        &types,
                        &mut errors,
                    );
                }
            }
        }
        if let TypeDescriptor::Union { members } = descriptor {
            for member in members {
                if !types.contains_key(member) {
                    errors.push(SchemaError::UnknownTypeReference {
                        from: name.clone(),
                        referenced: member.clone(),
                    });
                }
            }
        }
        if let TypeDescriptor::Object { interfaces, .. } = descriptor {
            for iface in interfaces {
                match types.get(iface) {
                    Some(TypeDescriptor::Interface { fields: iface_fields }) => {
                        let own_fields = descriptor.fields().unwrap();
                        for iface_field in iface_fields.keys() {
                            if !own_fields.contains_key(iface_field) {
                                errors.push(SchemaError::ImplementsIncompatibleField {
                                    type_name: name.clone(),
                                    interface_name: iface.clone(),
                                    field_name: iface_field.clone(),
                                });
                            }
                        }
                    }
                    Some(_) => errors.push(SchemaError::ImplementsUndefinedInterface {
                        type_name: name.clone(),
                        interface_name: iface.clone(),
                    }),
                    None => errors.push(SchemaError::ImplementsUndefinedInterface {
                        type_name: name.clone(),
                        interface_name: iface.clone(),
                    }),
                }
            }
        }
    }

    let mut directives = HashMap::new();
    directives.insert(
        "include".to_string(),
        DirectiveDescriptor {
            arguments: [(
                "if".to_string(),
                ArgumentSlot {
                    type_ref: TypeRef::NonNull(Box::new(TypeRef::Named(SpecId::builtin_scalar(
                        "Boolean",
                    )))),
                    default_value: None,
                },
            )]
            .into_iter()
            .collect(),
        },
    );
    directives.insert(
        "skip".to_string(),
        DirectiveDescriptor {
            arguments: [(
                "if".to_string(),
                ArgumentSlot {
                    type_ref: TypeRef::NonNull(Box::new(TypeRef::Named(SpecId::builtin_scalar(
                        "Boolean",
                    )))),
                    default_value: None,
                },
            )]
            .into_iter()
            .collect(),
        },
    );
    for dd in &doc.directive_definitions {
        if directives.contains_key(&dd.name) {
            errors.push(SchemaError::DuplicateDirective {
                name: dd.name.clone(),
            });
            continue;
        }
        let mut args = IndexMap::new();
        for a in &dd.arguments {
            match stub_schema.resolve_type_ref(&a.value_type) {
                Ok(type_ref) => {
                    args.insert(
                        a.name.clone(),
                        ArgumentSlot {
                            type_ref,
                            default_value: a.default_value.clone(),
                        },
                    );
                }
                Err(referenced) => errors.push(SchemaError::UnknownTypeReference {
                    from: format!("@{}", dd.name),
                    referenced,
                }),
            }
        }
        directives.insert(dd.name.clone(), DirectiveDescriptor { arguments: args });
    }

    let schema_def = doc.schema_definition.clone().unwrap_or_default();
    let query_type = schema_def
        .query
        .unwrap_or_else(|| "Query".to_string());
    let mutation_type = schema_def
        .mutation
        .or_else(|| types.contains_key("Mutation").then(|| "Mutation".to_string()));
    let subscription_type = schema_def.subscription.or_else(|| {
        types
            .contains_key("Subscription")
            .then(|| "Subscription".to_string())
    });

    if !types.contains_key(&query_type) {
        errors.push(SchemaError::MissingRootType {
            operation: "query".to_string(),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SchemaType {
        schema_hash: hash,
        types,
        directives,
        query_type,
        mutation_type,
        subscription_type,
    })
}

fn check_type_ref_resolves(
    owner: &str,
    member: &str,
    type_ref: &TypeRef,
    types: &HashMap<String, TypeDescriptor>,
    errors: &mut Vec<SchemaError>,
) {
    let leaf = type_ref.innermost();
    if leaf.as_str().starts_with("scalar.") {
        return;
    }
    let name = leaf.as_str().rsplit('.').next().unwrap_or(leaf.as_str());
    if !types.contains_key(name) {
        errors.push(SchemaError::UnknownTypeReference {
            from: format!("{owner}.{member}"),
            referenced: name.to_string(),
        });
    }
}

fn build_type_descriptor(
    def: &ast::TypeDefinition,
    schema: &SchemaType,
) -> Result<TypeDescriptor, SchemaError> {
    match def {
        ast::TypeDefinition::Scalar(_) => Ok(TypeDescriptor::Scalar),
        ast::TypeDefinition::Enum(e) => Ok(TypeDescriptor::Enum {
            values: e.values.clone(),
        }),
        ast::TypeDefinition::Union(u) => Ok(TypeDescriptor::Union {
            members: u.types.clone(),
        }),
        ast::TypeDefinition::Interface(i) => Ok(TypeDescriptor::Interface {
            fields: build_fields(&i.fields, schema),
        }),
        ast::TypeDefinition::InputObject(i) => Ok(TypeDescriptor::InputObject {
            fields: build_input_fields(&i.fields, schema),
        }),
        ast::TypeDefinition::Object(o) => Ok(TypeDescriptor::Object {
            fields: build_fields(&o.fields, schema),
            interfaces: o.implements_interfaces.clone(),
        }),
    }
}

fn build_fields(fields: &[ast::FieldDefinition], schema: &SchemaType) -> IndexMap<String, FieldSlot> {
    fields
        .iter()
        .map(|f| {
            let type_ref = schema
                .resolve_type_ref(&f.field_type)
                .unwrap_or_else(|name| TypeRef::Named(SpecId(format!("type.{:x}.{}", schema.schema_hash, name))));
            let arguments = f
                .arguments
                .iter()
                .map(|a| {
                    let arg_ref = schema
                        .resolve_type_ref(&a.value_type)
                        .unwrap_or_else(|name| {
                            TypeRef::Named(SpecId(format!("type.{:x}.{}", schema.schema_hash, name)))
                        });
                    (
                        a.name.clone(),
                        ArgumentSlot {
                            type_ref: arg_ref,
                            default_value: a.default_value.clone(),
                        },
                    )
                })
                .collect();
            (
                f.name.clone(),
                FieldSlot {
                    type_ref,
                    arguments,
                    default_value: None,
                },
            )
        })
        .collect()
}

fn build_input_fields(
    fields: &[ast::InputFieldDefinition],
    schema: &SchemaType,
) -> IndexMap<String, FieldSlot> {
    fields
        .iter()
        .map(|f| {
            let type_ref = schema
                .resolve_type_ref(&f.value_type)
                .unwrap_or_else(|name| TypeRef::Named(SpecId(format!("type.{:x}.{}", schema.schema_hash, name))));
            (
                f.name.clone(),
                FieldSlot {
                    type_ref,
                    arguments: IndexMap::new(),
                    default_value: f.default_value.clone(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog: Dog, human: Human }
        type Dog { name: String }
        type Human { pets: [Pet] }
        interface Pet { name: String }
        type Cat implements Pet { name: String, friends: [Dog] }
    "#;

    #[test]
    fn resolves_every_declared_type() {
        let schema = build_schema(SCHEMA).expect("schema builds");
        assert!(schema.descriptor_by_name("Dog").is_some());
        assert!(schema.descriptor_by_name("Human").is_some());
        assert!(schema.descriptor_by_name("Pet").is_some());
        assert_eq!(schema.query_type, "Query");
    }

    #[test]
    fn recursive_object_fields_do_not_diverge() {
        let schema = build_schema(
            r#"
            type Query { a: A }
            type A { b: B }
            type B { a: A }
            "#,
        )
        .expect("schema builds despite the A <-> B cycle");
        let a = schema.descriptor_by_name("A").unwrap();
        assert!(a.fields().unwrap().contains_key("b"));
    }

    #[test]
    fn unknown_type_reference_is_an_error() {
        let errors = build_schema("type Query { a: Ghost }").unwrap_err();
        assert!(matches!(
            errors[0],
            SchemaError::UnknownTypeReference { .. }
        ));
    }

    #[test]
    fn duplicate_type_is_an_error() {
        let errors =
            build_schema("type Query { a: String }\ntype Query { b: String }").unwrap_err();
        assert!(matches!(errors[0], SchemaError::DuplicateType { .. }));
    }

    #[test]
    fn missing_query_root_is_an_error() {
        let errors = build_schema("type NotQuery { a: String }").unwrap_err();
        assert!(matches!(errors[0], SchemaError::MissingRootType { .. }));
    }
}
