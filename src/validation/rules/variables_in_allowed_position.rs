use std::collections::HashMap;

use crate::ast::{OperationDefinition, Value};
use crate::registry::{SchemaType, TypeRef};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `VariablesInAllowedPosition`: a variable used at a given location must
/// have a type compatible with that location's expected type. A nullable
/// variable widens into a non-null location only if the variable carries a
/// non-null default value; a non-null variable always satisfies a nullable
/// location.
#[derive(Default)]
pub struct VariablesInAllowedPosition {
    declared: HashMap<String, (TypeRef, bool)>,
}

pub fn factory() -> VariablesInAllowedPosition {
    VariablesInAllowedPosition::default()
}

impl Visitor for VariablesInAllowedPosition {
    fn enter_operation(&mut self, ctx: &mut ValidatorContext, op: &OperationDefinition) {
        self.declared.clear();
        for def in &op.variable_definitions {
            let Ok(type_ref) = ctx.schema.resolve_type_ref(&def.var_type) else {
                continue;
            };
            self.declared
                .insert(def.name.clone(), (type_ref, def.default_value.is_some()));
        }
    }

    fn enter_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {
        let Value::Variable(var_name) = value else {
            return;
        };
        let Some((var_type, has_default)) = self.declared.get(var_name) else {
            return;
        };
        let Some(expected) = ctx.current_input_type() else {
            return;
        };
        if !is_compatible(var_type, expected, *has_default) {
            ctx.report_error(
                format!(
                    "Variable '${var_name}' of type '{}' used in position expecting type '{}'.",
                    display(ctx.schema, var_type),
                    display(ctx.schema, expected),
                ),
                &[],
            );
        }
        let _ = name;
    }
}

fn is_compatible(var_type: &TypeRef, location: &TypeRef, has_default: bool) -> bool {
    match (var_type, location) {
        (var, TypeRef::NonNull(loc_inner)) => {
            if let TypeRef::NonNull(var_inner) = var {
                is_compatible(var_inner, loc_inner, false)
            } else {
                has_default && is_compatible(var, loc_inner, false)
            }
        }
        (TypeRef::NonNull(var_inner), loc) => is_compatible(var_inner, loc, has_default),
        (TypeRef::List(var_inner), TypeRef::List(loc_inner)) => {
            is_compatible(var_inner, loc_inner, false)
        }
        (TypeRef::List(_), _) | (_, TypeRef::List(_)) => false,
        (TypeRef::Named(a), TypeRef::Named(b)) => a == b,
    }
}

fn display(schema: &SchemaType, type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Named(spec) => schema.name_of(spec).unwrap_or("<unknown>").to_string(),
        TypeRef::List(inner) => format!("[{}]", display(schema, inner)),
        TypeRef::NonNull(inner) => format!("{}!", display(schema, inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog(name: String!): Dog }
        type Dog { name: String }
    "#;

    #[test]
    fn non_null_variable_into_non_null_argument_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "query($name: String!) { dog(name: $name) { name } }",
        );
    }

    #[test]
    fn nullable_variable_into_non_null_argument_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "query($name: String) { dog(name: $name) { name } }",
            &["Variable '$name' of type 'String' used in position expecting type 'String!'."
                .to_string()],
        );
    }

    #[test]
    fn nullable_variable_with_default_into_non_null_argument_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            r#"query($name: String = "Fido") { dog(name: $name) { name } }"#,
        );
    }
}
