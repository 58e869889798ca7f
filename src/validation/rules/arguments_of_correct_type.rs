use crate::ast::Value;
use crate::registry::{SchemaType, TypeDescriptor, TypeRef};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `ArgumentsOfCorrectType`: an argument's literal value must fit the shape
/// of its declared type, including list/non-null coercion. Input scalar
/// coercion is strict (§9 Open Question (iii)): `Int` never accepts `1.0`.
pub struct ArgumentsOfCorrectType;

pub fn factory() -> ArgumentsOfCorrectType {
    ArgumentsOfCorrectType
}

impl Visitor for ArgumentsOfCorrectType {
    fn enter_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {
        let Some(type_ref) = ctx.current_input_type().cloned() else {
            return;
        };
        if let Err(message) = check_value(ctx.schema, &type_ref, value) {
            ctx.report_error(
                format!("Argument '{name}' has an invalid value: {message}"),
                &[],
            );
        }
    }
}

fn check_value(schema: &SchemaType, type_ref: &TypeRef, value: &Value) -> Result<(), String> {
    // A variable reference is checked elsewhere (`VariablesInAllowedPosition`);
    // a literal `null` is only invalid against a non-null type.
    if matches!(value, Value::Variable(_)) {
        return Ok(());
    }
    match type_ref {
        TypeRef::NonNull(inner) => {
            if matches!(value, Value::Null) {
                return Err("value is required, but null was provided".to_string());
            }
            check_value(schema, inner, value)
        }
        TypeRef::List(inner) => match value {
            Value::Null => Ok(()),
            Value::List(items) => {
                for item in items {
                    check_value(schema, inner, item)?;
                }
                Ok(())
            }
            other => check_value(schema, inner, other),
        },
        TypeRef::Named(spec) => {
            if matches!(value, Value::Null) {
                return Ok(());
            }
            let Some(descriptor) = schema.descriptor(spec) else {
                return Ok(());
            };
            let name = schema.name_of(spec).unwrap_or("<unknown>");
            match (descriptor, value) {
                (TypeDescriptor::Scalar, _) => check_scalar(name, value),
                (TypeDescriptor::Enum { values }, Value::Enum(v)) => {
                    if values.contains(v) {
                        Ok(())
                    } else {
                        Err(format!("'{v}' is not a valid value for enum '{name}'"))
                    }
                }
                (TypeDescriptor::Enum { .. }, _) => {
                    Err(format!("expected an enum value for '{name}'"))
                }
                (TypeDescriptor::InputObject { fields }, Value::Object(obj)) => {
                    for (field_name, field_slot) in fields {
                        let provided = obj.get(field_name);
                        match provided {
                            Some(v) => check_value(schema, &field_slot.type_ref, v)?,
                            None if field_slot.type_ref.is_non_null()
                                && field_slot.default_value.is_none() =>
                            {
                                return Err(format!(
                                    "input field '{field_name}' of type '{name}' is required"
                                ));
                            }
                            None => {}
                        }
                    }
                    for key in obj.keys() {
                        if !fields.contains_key(key) {
                            return Err(format!("'{key}' is not a field of input type '{name}'"));
                        }
                    }
                    Ok(())
                }
                (TypeDescriptor::InputObject { .. }, _) => {
                    Err(format!("expected an object literal for '{name}'"))
                }
                _ => Err(format!("'{name}' is not an input type")),
            }
        }
    }
}

fn check_scalar(name: &str, value: &Value) -> Result<(), String> {
    match (name, value) {
        ("Int", Value::Int(_)) => Ok(()),
        ("Float", Value::Int(_) | Value::Float(_)) => Ok(()),
        ("String" | "ID", Value::String(_)) => Ok(()),
        ("ID", Value::Int(_)) => Ok(()),
        ("Boolean", Value::Boolean(_)) => Ok(()),
        (_, Value::Null) => Ok(()),
        _ => Err(format!("expected a value of scalar type '{name}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { f(n: Int): Int, g(s: String!): String }
    "#;

    #[test]
    fn correctly_typed_int_passes() {
        expect_passes_rule(SCHEMA, factory, "{ f(n: 3) }");
    }

    #[test]
    fn float_literal_for_int_argument_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ f(n: 1.0) }",
            &["Argument 'n' has an invalid value: expected a value of scalar type 'Int'"
                .to_string()],
        );
    }

    #[test]
    fn null_for_non_null_argument_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ g(s: null) }",
            &["Argument 's' has an invalid value: value is required, but null was provided"
                .to_string()],
        );
    }
}
