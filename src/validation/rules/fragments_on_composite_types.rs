use crate::ast::{FragmentDefinition, InlineFragment};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `FragmentsOnCompositeTypes`: a fragment's (or inline fragment's) type
/// condition must name an object, interface or union — never a scalar,
/// enum or input type.
pub struct FragmentsOnCompositeTypes;

pub fn factory() -> FragmentsOnCompositeTypes {
    FragmentsOnCompositeTypes
}

impl Visitor for FragmentsOnCompositeTypes {
    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext, frag: &FragmentDefinition) {
        check(ctx, &frag.type_condition, frag.position, || {
            format!(
                "Fragment '{}' cannot condition on non-composite type '{}'.",
                frag.name, frag.type_condition
            )
        });
    }

    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext, frag: &InlineFragment) {
        let Some(type_condition) = &frag.type_condition else {
            return;
        };
        check(ctx, type_condition, frag.position, || {
            format!("Inline fragment cannot condition on non-composite type '{type_condition}'.")
        });
    }
}

fn check(
    ctx: &mut ValidatorContext,
    type_condition: &str,
    position: crate::ast::Pos,
    message: impl FnOnce() -> String,
) {
    let Some(spec) = ctx.schema.spec_for_name(type_condition) else {
        return;
    };
    let Some(descriptor) = ctx.schema.descriptor(&spec) else {
        return;
    };
    if !descriptor.is_composite() {
        ctx.report_error(message(), &[position]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog: Dog }
        type Dog { name: String }
        union Pet = Dog
    "#;

    #[test]
    fn object_condition_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ...F } } fragment F on Dog { name }",
        );
    }

    #[test]
    fn scalar_condition_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { ...F } } fragment F on String { name }",
            &["Fragment 'F' cannot condition on non-composite type 'String'.".to_string()],
        );
    }

    #[test]
    fn union_condition_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ... on Pet { __typename } } }",
        );
    }
}
