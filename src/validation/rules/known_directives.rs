use crate::ast::Directive;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `KnownDirectives`: a directive used on a selection, fragment or variable
/// definition must be declared in the schema (or be one of the two
/// built-in `@include`/`@skip` directives, pre-registered on every schema).
/// Location validity (field vs. fragment vs. variable) is not tracked
/// separately — the two built-ins are valid everywhere this engine visits
/// directives, matching §1.2's "argument validation is reused unchanged".
pub struct KnownDirectives;

pub fn factory() -> KnownDirectives {
    KnownDirectives
}

impl Visitor for KnownDirectives {
    fn enter_directive(&mut self, ctx: &mut ValidatorContext, directive: &Directive) {
        if !ctx.schema.directives.contains_key(&directive.name) {
            ctx.report_error(
                format!("Unknown directive '{}'.", directive.name),
                &[directive.position],
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
        type Query { dog: Dog }
        type Dog { name: String }
    "#;

    #[test]
    fn builtin_include_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "query($b: Boolean!) { dog { name @include(if: $b) } }",
        );
    }

    #[test]
    fn unknown_directive_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { name @bogus } }",
            &["Unknown directive 'bogus'.".to_string()],
        );
    }
}
