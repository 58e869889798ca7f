use crate::ast::Field;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `ProvidedRequiredArguments`: a required (non-null, no default) argument
/// must be present on the selection.
pub struct ProvidedRequiredArguments;

pub fn factory() -> ProvidedRequiredArguments {
    ProvidedRequiredArguments
}

impl Visitor for ProvidedRequiredArguments {
    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {
        let Some(slot) = ctx
            .parent_type()
            .and_then(|d| d.fields())
            .and_then(|fields| fields.get(&field.name))
        else {
            return;
        };
        for (name, arg) in &slot.arguments {
            if arg.is_required() && !field.arguments.iter().any(|(n, _)| n == name) {
                ctx.report_error(
                    format!(
                        "Field '{}' argument '{name}' of type '{}' is required, but it was not provided.",
                        field.name,
                        type_ref_display(ctx, &arg.type_ref),
                    ),
                    &[field.position],
                );
            }
        }
    }
}

fn type_ref_display(ctx: &ValidatorContext, type_ref: &crate::registry::TypeRef) -> String {
    let base = ctx
        .schema
        .name_of(type_ref.innermost())
        .unwrap_or("<unknown>");
    if type_ref.is_non_null() {
        format!("{base}!")
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog(name: String!, breed: String): Dog }
        type Dog { name: String }
    "#;

    #[test]
    fn provided_passes() {
        expect_passes_rule(SCHEMA, factory, r#"{ dog(name: "Fido") { name } }"#);
    }

    #[test]
    fn missing_required_argument_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { name } }",
            &["Field 'dog' argument 'name' of type 'String!' is required, but it was not provided."
                .to_string()],
        );
    }
}
