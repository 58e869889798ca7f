use std::collections::HashSet;

use crate::ast::{QueryDocument, Selection, SelectionSet};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `NoFragmentCycles`: a fragment must never spread itself, directly or
/// through a chain of other fragments.
pub struct NoFragmentCycles;

pub fn factory() -> NoFragmentCycles {
    NoFragmentCycles
}

impl Visitor for NoFragmentCycles {
    fn enter_document(&mut self, ctx: &mut ValidatorContext, doc: &QueryDocument) {
        // A mutual cycle (A -> B -> A) is reachable from both A's and B's
        // top-level scan; once one scan reports it, every fragment in the
        // cycle is marked `reported` so the other scans skip it instead of
        // reporting the same cycle again under a different starting name.
        let mut reported: HashSet<&str> = HashSet::new();
        for frag in &doc.fragments {
            if reported.contains(frag.name.as_str()) {
                continue;
            }
            let mut visited = vec![frag.name.as_str()];
            if let Some(cycle) = find_cycle(&frag.selection_set, ctx, &mut visited) {
                let cycle_name = cycle[0];
                ctx.report_error(
                    format!("Cannot spread fragment '{cycle_name}' within itself."),
                    &[frag.position],
                );
                reported.extend(cycle);
            }
        }
    }
}

fn find_cycle<'a>(
    set: &SelectionSet,
    ctx: &ValidatorContext<'a>,
    visited: &mut Vec<&'a str>,
) -> Option<Vec<&'a str>> {
    for sel in &set.items {
        match sel {
            Selection::Field(field) => {
                if let Some(cycle) = find_cycle(&field.selection_set, ctx, visited) {
                    return Some(cycle);
                }
            }
            Selection::InlineFragment(frag) => {
                if let Some(cycle) = find_cycle(&frag.selection_set, ctx, visited) {
                    return Some(cycle);
                }
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if let Some(start) = visited.iter().position(|v| *v == name) {
                    return Some(visited[start..].to_vec());
                }
                if let Some(frag) = ctx.fragments.get(name) {
                    visited.push(frag.name.as_str());
                    let result = find_cycle(&frag.selection_set, ctx, visited);
                    visited.pop();
                    if result.is_some() {
                        return result;
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog: Dog }
        type Dog { name: String, friends: [Dog] }
    "#;

    #[test]
    fn acyclic_fragments_pass() {
        expect_passes_rule(
            SCHEMA,
            factory,
            "{ dog { ...A } } fragment A on Dog { name, friends { ...B } } fragment B on Dog { name }",
        );
    }

    #[test]
    fn direct_self_cycle_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { ...A } } fragment A on Dog { friends { ...A } }",
            &["Cannot spread fragment 'A' within itself.".to_string()],
        );
    }

    #[test]
    fn indirect_cycle_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { ...A } } fragment A on Dog { friends { ...B } } fragment B on Dog { friends { ...A } }",
            &["Cannot spread fragment 'A' within itself.".to_string()],
        );
    }
}
