use std::collections::HashSet;

use crate::ast::{QueryDocument, Selection, SelectionSet};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `NoUnusedFragments`: every fragment definition must be reachable from at
/// least one operation, following spreads transitively (including spreads
/// nested inside other fragments).
pub struct NoUnusedFragments;

pub fn factory() -> NoUnusedFragments {
    NoUnusedFragments
}

impl Visitor for NoUnusedFragments {
    fn enter_document(&mut self, ctx: &mut ValidatorContext, doc: &QueryDocument) {
        let mut used = HashSet::new();
        for op in &doc.operations {
            collect_spreads(&op.selection_set, ctx, &mut used);
        }
        for frag in &doc.fragments {
            if !used.contains(frag.name.as_str()) {
                ctx.report_error(
                    format!("Fragment '{}' is never used.", frag.name),
                    &[frag.position],
                );
            }
        }
    }
}

fn collect_spreads<'a>(
    set: &'a SelectionSet,
    ctx: &ValidatorContext<'a>,
    used: &mut HashSet<&'a str>,
) {
    for sel in &set.items {
        match sel {
            Selection::Field(field) => collect_spreads(&field.selection_set, ctx, used),
            Selection::InlineFragment(frag) => collect_spreads(&frag.selection_set, ctx, used),
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if used.insert(name) {
                    if let Some(frag) = ctx.fragments.get(name) {
                        collect_spreads(&frag.selection_set, ctx, used);
                    }
                }
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
        type Query { dog: Dog }
        type Dog { name: String }
    "#;

    #[test]
    fn used_fragment_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ...DogFields } } fragment DogFields on Dog { name }",
        );
    }

    #[test]
    fn unused_fragment_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { name } } fragment DogFields on Dog { name }",
            &["Fragment 'DogFields' is never used.".to_string()],
        );
    }

    #[test]
    fn transitively_used_fragment_passes() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ...A } } fragment A on Dog { ...B } fragment B on Dog { name }",
        );
    }
}
