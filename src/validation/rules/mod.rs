//! One module per validation rule (§4.C), named to match the specification's
//! public rule identifiers exactly.

mod arguments_of_correct_type;
mod fields_on_correct_type;
mod fragments_on_composite_types;
mod known_argument_names;
mod known_directives;
mod known_fragment_names;
mod no_fragment_cycles;
mod no_unused_fragments;
mod provided_required_arguments;
mod scalar_leafs;
mod variables_are_input_types;
mod variables_in_allowed_position;

use crate::validation::visitor::Visitor;

/// The full set of selectable rule identifiers, in the order they're run
/// when no explicit subset is requested. `NoFragmentCycles` runs first so a
/// cyclic operation fails on that rule rather than tripping up the
/// fragment-spread walks the other rules perform.
pub const NAMES: &[&str] = &[
    "NoFragmentCycles",
    "FieldsOnCorrectType",
    "KnownArgumentNames",
    "ProvidedRequiredArguments",
    "ArgumentsOfCorrectType",
    "VariablesAreInputTypes",
    "VariablesInAllowedPosition",
    "NoUnusedFragments",
    "KnownFragmentNames",
    "FragmentsOnCompositeTypes",
    "ScalarLeafs",
    "NoSubselectionAllowed",
    "KnownDirectives",
];

/// Builds the `Visitor` for a rule by name, for runtime-selectable subsets
/// (§4.C "each rule is independently addressable").
pub fn by_name(name: &str) -> Option<Box<dyn Visitor>> {
    let visitor: Box<dyn Visitor> = match name {
        "FieldsOnCorrectType" => Box::new(fields_on_correct_type::factory()),
        "KnownArgumentNames" => Box::new(known_argument_names::factory()),
        "ProvidedRequiredArguments" => Box::new(provided_required_arguments::factory()),
        "ArgumentsOfCorrectType" => Box::new(arguments_of_correct_type::factory()),
        "VariablesAreInputTypes" => Box::new(variables_are_input_types::factory()),
        "VariablesInAllowedPosition" => Box::new(variables_in_allowed_position::factory()),
        "NoUnusedFragments" => Box::new(no_unused_fragments::factory()),
        "KnownFragmentNames" => Box::new(known_fragment_names::factory()),
        "FragmentsOnCompositeTypes" => Box::new(fragments_on_composite_types::factory()),
        "ScalarLeafs" => Box::new(scalar_leafs::factory()),
        "NoSubselectionAllowed" => Box::new(scalar_leafs::no_subselection_factory()),
        "KnownDirectives" => Box::new(known_directives::factory()),
        "NoFragmentCycles" => Box::new(no_fragment_cycles::factory()),
        _ => return None,
    };
    Some(visitor)
}
