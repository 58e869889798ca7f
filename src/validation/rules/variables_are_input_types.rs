use crate::ast::VariableDefinition;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `VariablesAreInputTypes`: a variable's declared type must be a scalar,
/// enum or input-object — never an object, interface or union.
pub struct VariablesAreInputTypes;

pub fn factory() -> VariablesAreInputTypes {
    VariablesAreInputTypes
}

impl Visitor for VariablesAreInputTypes {
    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext, def: &VariableDefinition) {
        let Ok(type_ref) = ctx.schema.resolve_type_ref(&def.var_type) else {
            return;
        };
        let leaf = type_ref.innermost();
        let Some(descriptor) = ctx.schema.descriptor(leaf) else {
            return;
        };
        if !descriptor.is_input_type() {
            let name = ctx.schema.name_of(leaf).unwrap_or("<unknown>");
            ctx.report_error(
                format!(
                    "Variable '${}' cannot be of non-input type '{name}'.",
                    def.name
                ),
                &[def.position],
            );
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
        input DogFilter { name: String }
    "#;

    #[test]
    fn scalar_variable_passes() {
        expect_passes_rule(SCHEMA, factory, "query($name: String) { dog(name: $name) { name } }");
    }

    #[test]
    fn input_object_variable_passes() {
        expect_passes_rule(SCHEMA, factory, "query($f: DogFilter) { dog { name } }");
    }

    #[test]
    fn object_type_variable_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "query($d: Dog) { dog { name } }",
            &["Variable '$d' cannot be of non-input type 'Dog'.".to_string()],
        );
    }
}
