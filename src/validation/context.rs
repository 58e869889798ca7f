use std::collections::HashMap;

use crate::ast::{FragmentDefinition, Pos, QueryDocument};
use crate::error::RuleError;
use crate::registry::{SchemaType, SpecId, TypeDescriptor, TypeRef};

/// Threaded validation state: the schema being validated against, the
/// ancestor-type stacks a rule reads via [`ValidatorContext::parent_type`]
/// / [`ValidatorContext::current_input_type`], and the accumulated errors.
///
/// Modeled on `juniper::validation::ValidatorContext`: rather than mutating
/// the (here, third-party-derived) AST in place, the walker threads parallel
/// state alongside it.
pub struct ValidatorContext<'a> {
    pub schema: &'a SchemaType,
    pub doc: &'a QueryDocument,
    pub fragments: HashMap<&'a str, &'a FragmentDefinition>,
    type_stack: Vec<Option<SpecId>>,
    input_type_stack: Vec<Option<TypeRef>>,
    errors: Vec<RuleError>,
}

impl<'a> ValidatorContext<'a> {
    pub fn new(schema: &'a SchemaType, doc: &'a QueryDocument) -> Self {
        let fragments = doc.fragments.iter().map(|f| (f.name.as_str(), f)).collect();
        ValidatorContext {
            schema,
            doc,
            fragments,
            type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn report_error(&mut self, message: impl Into<String>, locations: &[Pos]) {
        self.errors.push(RuleError::new(message, locations));
    }

    pub fn into_errors(self) -> Vec<RuleError> {
        let mut errors = self.errors;
        errors.sort_by(|a, b| {
            a.locations
                .first()
                .cloned()
                .cmp(&b.locations.first().cloned())
                .then_with(|| a.message.cmp(&b.message))
        });
        errors
    }

    pub(crate) fn push_type(&mut self, spec: Option<SpecId>) {
        self.type_stack.push(spec);
    }

    pub(crate) fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    pub(crate) fn push_input_type(&mut self, ty: Option<TypeRef>) {
        self.input_type_stack.push(ty);
    }

    pub(crate) fn pop_input_type(&mut self) {
        self.input_type_stack.pop();
    }

    /// The spec identifier of the type selections are currently being made
    /// against (the innermost entry on the type stack).
    pub fn current_type_spec(&self) -> Option<&SpecId> {
        self.type_stack.last().and_then(|t| t.as_ref())
    }

    /// The descriptor for [`Self::current_type_spec`], unwrapped to its
    /// base (non-list, non-non-null) form.
    pub fn parent_type(&self) -> Option<&TypeDescriptor> {
        self.current_type_spec()
            .and_then(|spec| self.schema.descriptor(spec))
    }

    pub fn parent_type_name(&self) -> Option<&str> {
        self.current_type_spec()
            .and_then(|spec| self.schema.name_of(spec))
    }

    /// The expected type of the value currently being visited (an argument
    /// value, directive argument value, or variable default).
    pub fn current_input_type(&self) -> Option<&TypeRef> {
        self.input_type_stack.last().and_then(|t| t.as_ref())
    }
}
