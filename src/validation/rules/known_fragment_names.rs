use crate::ast::FragmentSpread;
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `KnownFragmentNames`: every `...Name` spread must name a fragment
/// actually defined somewhere in the document.
pub struct KnownFragmentNames;

pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

impl Visitor for KnownFragmentNames {
    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext, spread: &FragmentSpread) {
        if !ctx.fragments.contains_key(spread.fragment_name.as_str()) {
            ctx.report_error(
                format!("Unknown fragment '{}'.", spread.fragment_name),
                &[spread.position],
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
    fn known_fragment_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ...DogFields } } fragment DogFields on Dog { name }",
        );
    }

    #[test]
    fn unknown_fragment_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { ...DogFields } }",
            &["Unknown fragment 'DogFields'.".to_string()],
        );
    }
}
