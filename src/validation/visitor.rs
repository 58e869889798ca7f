//! The zipper-style, multi-visitor traversal (§4.A/§9 "Zipper +
//! multi-visitor traversal"). One pass over the operation document drives
//! every composed rule; rules never mutate the AST, only the threaded
//! [`ValidatorContext`].

use crate::ast::{Directive, Field, FragmentDefinition, InlineFragment, OperationDefinition, OperationType, QueryDocument, Selection, SelectionSet, Value, VariableDefinition};
use crate::validation::context::ValidatorContext;

/// A validation rule. Every hook has a no-op default so a rule overrides
/// only the node kinds it cares about.
#[allow(unused_variables, reason = "default hooks intentionally ignore their arguments")]
pub trait Visitor {
    fn enter_document(&mut self, ctx: &mut ValidatorContext, doc: &QueryDocument) {}
    fn exit_document(&mut self, ctx: &mut ValidatorContext, doc: &QueryDocument) {}

    fn enter_operation(&mut self, ctx: &mut ValidatorContext, op: &OperationDefinition) {}
    fn exit_operation(&mut self, ctx: &mut ValidatorContext, op: &OperationDefinition) {}

    fn enter_fragment_definition(&mut self, ctx: &mut ValidatorContext, frag: &FragmentDefinition) {}
    fn exit_fragment_definition(&mut self, ctx: &mut ValidatorContext, frag: &FragmentDefinition) {}

    fn enter_variable_definition(&mut self, ctx: &mut ValidatorContext, def: &VariableDefinition) {}
    fn exit_variable_definition(&mut self, ctx: &mut ValidatorContext, def: &VariableDefinition) {}

    fn enter_selection_set(&mut self, ctx: &mut ValidatorContext, set: &SelectionSet) {}
    fn exit_selection_set(&mut self, ctx: &mut ValidatorContext, set: &SelectionSet) {}

    fn enter_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {}
    fn exit_field(&mut self, ctx: &mut ValidatorContext, field: &Field) {}

    fn enter_fragment_spread(&mut self, ctx: &mut ValidatorContext, spread: &crate::ast::FragmentSpread) {}
    fn exit_fragment_spread(&mut self, ctx: &mut ValidatorContext, spread: &crate::ast::FragmentSpread) {}

    fn enter_inline_fragment(&mut self, ctx: &mut ValidatorContext, frag: &InlineFragment) {}
    fn exit_inline_fragment(&mut self, ctx: &mut ValidatorContext, frag: &InlineFragment) {}

    fn enter_directive(&mut self, ctx: &mut ValidatorContext, directive: &Directive) {}
    fn exit_directive(&mut self, ctx: &mut ValidatorContext, directive: &Directive) {}

    fn enter_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {}
    fn exit_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {}
}

/// Composes N rules into one traversal, running them in declared order, the
/// realization of `juniper::validation::multi_visitor`'s `MultiVisitorCons`
/// without its compile-time cons-list shape — selective validation (§6)
/// needs to assemble an arbitrary runtime subset of rules, so this composes
/// over trait objects instead.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn Visitor>>,
}

impl CompositeVisitor {
    pub fn new(visitors: Vec<Box<dyn Visitor>>) -> Self {
        CompositeVisitor { visitors }
    }
}

macro_rules! forward {
    ($name:ident, $arg_ty:ty, $arg:ident) => {
        fn $name(&mut self, ctx: &mut ValidatorContext, $arg: $arg_ty) {
            for v in &mut self.visitors {
                v.$name(ctx, $arg);
            }
        }
    };
}

impl Visitor for CompositeVisitor {
    forward!(enter_document, &QueryDocument, doc);
    forward!(exit_document, &QueryDocument, doc);
    forward!(enter_operation, &OperationDefinition, op);
    forward!(exit_operation, &OperationDefinition, op);
    forward!(enter_fragment_definition, &FragmentDefinition, frag);
    forward!(exit_fragment_definition, &FragmentDefinition, frag);
    forward!(enter_variable_definition, &VariableDefinition, def);
    forward!(exit_variable_definition, &VariableDefinition, def);
    forward!(enter_selection_set, &SelectionSet, set);
    forward!(exit_selection_set, &SelectionSet, set);
    forward!(enter_field, &Field, field);
    forward!(exit_field, &Field, field);
    forward!(enter_fragment_spread, &crate::ast::FragmentSpread, spread);
    forward!(exit_fragment_spread, &crate::ast::FragmentSpread, spread);
    forward!(enter_inline_fragment, &InlineFragment, frag);
    forward!(exit_inline_fragment, &InlineFragment, frag);
    forward!(enter_directive, &Directive, directive);
    forward!(exit_directive, &Directive, directive);

    fn enter_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {
        for v in &mut self.visitors {
            v.enter_argument(ctx, name, value);
        }
    }

    fn exit_argument(&mut self, ctx: &mut ValidatorContext, name: &str, value: &Value) {
        for v in &mut self.visitors {
            v.exit_argument(ctx, name, value);
        }
    }
}

pub fn visit_document(v: &mut dyn Visitor, ctx: &mut ValidatorContext, doc: &QueryDocument) {
    v.enter_document(ctx, doc);

    for frag in &doc.fragments {
        let type_spec = ctx.schema.spec_for_name(&frag.type_condition);
        ctx.push_type(type_spec);
        v.enter_fragment_definition(ctx, frag);
        visit_directives(v, ctx, &frag.directives);
        visit_selection_set(v, ctx, &frag.selection_set);
        v.exit_fragment_definition(ctx, frag);
        ctx.pop_type();
    }

    for op in &doc.operations {
        let root_name = match op.operation {
            OperationType::Query => Some(ctx.schema.query_type.clone()),
            OperationType::Mutation => ctx.schema.mutation_type.clone(),
            OperationType::Subscription => ctx.schema.subscription_type.clone(),
        };
        let type_spec = root_name.and_then(|n| ctx.schema.spec_for_name(&n));
        ctx.push_type(type_spec);
        v.enter_operation(ctx, op);

        for def in &op.variable_definitions {
            let var_type = ctx.schema.resolve_type_ref(&def.var_type).ok();
            ctx.push_input_type(var_type);
            v.enter_variable_definition(ctx, def);
            v.exit_variable_definition(ctx, def);
            ctx.pop_input_type();
        }

        visit_directives(v, ctx, &op.directives);
        visit_selection_set(v, ctx, &op.selection_set);

        v.exit_operation(ctx, op);
        ctx.pop_type();
    }

    v.exit_document(ctx, doc);
}

fn visit_selection_set(v: &mut dyn Visitor, ctx: &mut ValidatorContext, set: &SelectionSet) {
    v.enter_selection_set(ctx, set);

    for sel in &set.items {
        match sel {
            Selection::Field(field) => visit_field(v, ctx, field),
            Selection::FragmentSpread(spread) => {
                v.enter_fragment_spread(ctx, spread);
                visit_directives(v, ctx, &spread.directives);
                v.exit_fragment_spread(ctx, spread);
            }
            Selection::InlineFragment(frag) => {
                let type_spec = frag
                    .type_condition
                    .as_ref()
                    .and_then(|n| ctx.schema.spec_for_name(n))
                    .or_else(|| ctx.current_type_spec().cloned());
                ctx.push_type(type_spec);
                v.enter_inline_fragment(ctx, frag);
                visit_directives(v, ctx, &frag.directives);
                visit_selection_set(v, ctx, &frag.selection_set);
                v.exit_inline_fragment(ctx, frag);
                ctx.pop_type();
            }
        }
    }

    v.exit_selection_set(ctx, set);
}

fn visit_field(v: &mut dyn Visitor, ctx: &mut ValidatorContext, field: &Field) {
    v.enter_field(ctx, field);

    let field_slot = ctx
        .parent_type()
        .and_then(|d| d.fields())
        .and_then(|fields| fields.get(&field.name))
        .cloned();

    for (name, value) in &field.arguments {
        let arg_type = field_slot
            .as_ref()
            .and_then(|slot| slot.arguments.get(name))
            .map(|a| a.type_ref.clone());
        ctx.push_input_type(arg_type);
        v.enter_argument(ctx, name, value);
        v.exit_argument(ctx, name, value);
        ctx.pop_input_type();
    }

    visit_directives(v, ctx, &field.directives);

    let next_type_spec = field_slot.map(|slot| slot.type_ref.innermost().clone());
    ctx.push_type(next_type_spec);
    visit_selection_set(v, ctx, &field.selection_set);
    ctx.pop_type();

    v.exit_field(ctx, field);
}

fn visit_directives(v: &mut dyn Visitor, ctx: &mut ValidatorContext, directives: &[Directive]) {
    for directive in directives {
        v.enter_directive(ctx, directive);

        let directive_args = ctx
            .schema
            .directives
            .get(&directive.name)
            .map(|dd| dd.arguments.clone());

        for (name, value) in &directive.arguments {
            let arg_type = directive_args
                .as_ref()
                .and_then(|args| args.get(name))
                .map(|a| a.type_ref.clone());
            ctx.push_input_type(arg_type);
            v.enter_argument(ctx, name, value);
            v.exit_argument(ctx, name, value);
            ctx.pop_input_type();
        }

        v.exit_directive(ctx, directive);
    }
}
