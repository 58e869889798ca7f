use crate::ast::Field;
use crate::registry::TypeDescriptor;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `FieldsOnCorrectType`: a selection must name a field declared on its
/// parent type. `__typename` is always legal, even on a union, which
/// declares no fields of its own (§1.2).
pub struct FieldsOnCorrectType;

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

impl Visitor for FieldsOnCorrectType {
    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {
        if field.name == "__typename" {
            return;
        }
        let Some(parent) = ctx.parent_type() else {
            return;
        };
        let known = match parent {
            TypeDescriptor::Union { .. } => false,
            _ => parent
                .fields()
                .is_some_and(|fields| fields.contains_key(&field.name)),
        };
        if known {
            return;
        }
        let type_name = ctx.parent_type_name().unwrap_or("<unknown>").to_string();
        ctx.report_error(
            error_message(&field.name, &type_name),
            &[field.position],
        );
    }
}

fn error_message(field: &str, type_name: &str) -> String {
    format!("Cannot query field '{field}' on type '{type_name}'.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog: Dog, human: Human }
        type Dog { name: String, friends: [Dog] }
        type Human { pets: [Pet] }
        interface Pet { name: String }
        type Cat implements Pet { name: String, friends: [Dog] }
        union CatOrDog = Cat | Dog
    "#;

    #[test]
    fn known_field_passes() {
        expect_passes_rule(SCHEMA, factory, "{ dog { name } }");
    }

    #[test]
    fn nested_known_field_passes() {
        expect_passes_rule(SCHEMA, factory, "{ human { pets { name } } }");
    }

    #[test]
    fn unknown_top_level_field_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { nome } }",
            &[error_message("nome", "Dog")],
        );
    }

    #[test]
    fn unknown_nested_field_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ human { pets { nome } } }",
            &[error_message("nome", "Pet")],
        );
    }

    #[test]
    fn does_not_cascade_past_first_unresolvable_ancestor() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ human { pets { friends { nome } } } }",
            &[error_message("friends", "Pet")],
        );
    }

    #[test]
    fn typename_is_always_legal_on_a_union() {
        expect_passes_rule(SCHEMA, factory, "{ dog { __typename } }");
    }
}
