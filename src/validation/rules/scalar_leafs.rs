use crate::ast::Field;
use crate::registry::{Kind, TypeDescriptor};
use crate::validation::context::ValidatorContext;
use crate::validation::visitor::Visitor;

/// `ScalarLeafs`: a field of scalar or enum type must not carry a
/// selection set — there is nothing further to select on a leaf value.
pub struct ScalarLeafs;

pub fn factory() -> ScalarLeafs {
    ScalarLeafs
}

impl Visitor for ScalarLeafs {
    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {
        let Some(descriptor) = field_return_descriptor(ctx, field) else {
            return;
        };
        let is_leaf = matches!(descriptor.kind(), Kind::Scalar | Kind::Enum);
        if is_leaf && !field.selection_set.items.is_empty() {
            ctx.report_error(
                format!(
                    "Field '{}' must not have a selection since type '{}' has no subfields.",
                    field.name,
                    ctx.parent_type_name().unwrap_or("<unknown>"),
                ),
                &[field.position],
            );
        }
    }
}

/// `NoSubselectionAllowed`: the complementary half of the same leaf-shape
/// check, addressable as its own rule name per the composite field-leaf
/// invariant.
pub struct NoSubselectionAllowed;

pub fn no_subselection_factory() -> NoSubselectionAllowed {
    NoSubselectionAllowed
}

impl Visitor for NoSubselectionAllowed {
    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {
        let Some(descriptor) = field_return_descriptor(ctx, field) else {
            return;
        };
        let is_composite = descriptor.is_composite();
        if is_composite && field.selection_set.items.is_empty() {
            ctx.report_error(
                format!(
                    "Field '{}' of type '{}' must have a selection of subfields.",
                    field.name,
                    ctx.parent_type_name().unwrap_or("<unknown>"),
                ),
                &[field.position],
            );
        }
    }
}

fn field_return_descriptor<'a>(
    ctx: &'a ValidatorContext,
    field: &Field,
) -> Option<&'a TypeDescriptor> {
    let slot = ctx
        .parent_type()
        .and_then(|d| d.fields())
        .and_then(|fields| fields.get(&field.name))?;
    ctx.schema.descriptor(slot.type_ref.innermost())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    const SCHEMA: &str = r#"
        schema { query: Query }
        type Query { dog: Dog }
        type Dog { name: String, owner: Human }
        type Human { name: String }
    "#;

    #[test]
    fn scalar_leaf_without_selection_passes() {
        expect_passes_rule(SCHEMA, factory, "{ dog { name } }");
    }

    #[test]
    fn scalar_with_selection_fails() {
        expect_fails_rule(
            SCHEMA,
            factory,
            "{ dog { name { sub } } }",
            &["Field 'name' must not have a selection since type 'Dog' has no subfields."
                .to_string()],
        );
    }

    #[test]
    fn object_with_selection_passes() {
        expect_passes_rule(SCHEMA, no_subselection_factory, "{ dog { owner { name } } }");
    }

    #[test]
    fn object_without_selection_fails() {
        expect_fails_rule(
            SCHEMA,
            no_subselection_factory,
            "{ dog { owner } }",
            &["Field 'owner' of type 'Dog' must have a selection of subfields.".to_string()],
        );
    }
}
