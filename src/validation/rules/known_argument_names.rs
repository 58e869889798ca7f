use crate::ast::Field;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `KnownArgumentNames`: every argument on a field selection must be
/// declared on that field.
pub struct KnownArgumentNames;

pub fn factory() -> KnownArgumentNames {
    KnownArgumentNames
}

impl Visitor for KnownArgumentNames {
    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {
        let Some(slot) = ctx
            .parent_type()
            .and_then(|d| d.fields())
            .and_then(|fields| fields.get(&field.name))
        else {
            return;
        };
        for (name, _) in &field.arguments {
            if !slot.arguments.contains_key(name) {
                ctx.report_error(
                    format!("Unknown argument '{name}' on field '{}'.", field.name),
                    &[field.position],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog(name: String): Dog }
        type Dog { name: String }
    "#;

    #[test]
    fn known_argument_passes() {
        expect_passes_rule(SCHEMA, factory, r#"{ dog(name: "Fido") { name } }"#);
    }

    #[test]
    fn unknown_argument_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            r#"{ dog(color: "red") { name } }"#,
            &["Unknown argument 'color' on field 'dog'.".to_string()],
        );
    }
}
