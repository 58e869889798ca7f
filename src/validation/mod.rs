//! Query validation (component C): a single zipper pass over a parsed
//! operation document, driving a composed set of [`visitor::Visitor`]
//! rules and collecting the [`crate::error::RuleError`]s they report.

pub mod context;
pub mod rules;
mod test_harness;
pub mod visitor;

use crate::ast::{self, QueryDocument};
use crate::error::RuleError;
use crate::registry::SchemaType;
use context::ValidatorContext;
use visitor::{CompositeVisitor, visit_document};

/// The outcome of [`validate`]: the parsed document (consumed by the
/// executor if validation passed with no errors) and the errors found, if
/// any.
pub struct ValidationOutcome {
    pub document: QueryDocument,
    pub errors: Vec<RuleError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses `operation_source` and runs it through the named `rules` (or, if
/// `None`, every rule in [`rules::NAMES`]), composed into one traversal via
/// [`CompositeVisitor`].
pub fn validate(
    schema: &SchemaType,
    operation_source: &str,
    selected_rules: Option<&[&str]>,
) -> Result<ValidationOutcome, String> {
    let parsed = graphql_parser::query::parse_query(operation_source).map_err(|e| e.to_string())?;
    let document = ast::convert_query_document(&parsed);

    let names = selected_rules.unwrap_or(rules::NAMES);
    let visitors = names
        .iter()
        .filter_map(|name| rules::by_name(name))
        .collect();
    let mut composite = CompositeVisitor::new(visitors);

    let mut ctx = ValidatorContext::new(schema, &document);
    visit_document(&mut composite, &mut ctx, &document);
    let errors = ctx.into_errors();

    Ok(ValidationOutcome { document, errors })
}
