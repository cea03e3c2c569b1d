//! Source-to-source transformation passes over parsed C units.
//!
//! Each pass rewrites the original source text through staged byte
//! edits rather than re-printing a syntax tree, so formatting and
//! comments in untouched code survive every reduction step.

pub mod analysis;
pub mod error;
pub mod locate;
pub mod names;
pub mod purity;
pub mod select;
pub mod synth;
pub mod walk;

pub use error::{TransformError, TransformResult};

use crease_syntax::{FunctionIndex, ParsedUnit};
use log::debug;

use analysis::{analyze_unit, eligible_functions};
use error::invariant;
use locate::locate_statement;
use names::NameAllocator;
use select::select_instance;
use synth::synthesize;

/// Parameters supplied by the driver for one invocation.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Complexity threshold: definitions scoring above this are never
    /// inlined.
    pub max_stmts: u32,
    /// 1-based ordinal of the valid call site to transform.
    pub target_instance: usize,
    /// Count valid instances without transforming anything.
    pub query_only: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            max_stmts: 10,
            target_instance: 1,
            query_only: false,
        }
    }
}

/// Result of one invocation.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The rewritten buffer; `None` in query-only mode.
    pub source: Option<String>,
    /// Total number of valid call sites found in the unit.
    pub valid_instances: usize,
}

/// One registered source-to-source transformation.
pub trait Transformation {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn transform(
        &self,
        unit: &ParsedUnit,
        config: &TransformConfig,
    ) -> TransformResult<TransformOutput>;
}

/// Inlines exactly one call to a small function.
///
/// A function definition is an inlining source when its statement
/// weight is within the threshold and it is not variadic; a call site
/// is a candidate when its callee is such a function and every
/// argument is pure. The chosen call's callee body is copied in front
/// of the enclosing statement with parameters bound as locals and
/// returns rewritten into assignments to a fresh temporary, and the
/// call itself collapses to that temporary. The callee's own
/// definition is never altered.
#[derive(Debug, Default)]
pub struct InlineCall;

impl Transformation for InlineCall {
    fn name(&self) -> &'static str {
        "inline-call"
    }

    fn description(&self) -> &'static str {
        "inline one call to a small function at its call site"
    }

    fn transform(
        &self,
        unit: &ParsedUnit,
        config: &TransformConfig,
    ) -> TransformResult<TransformOutput> {
        let index = FunctionIndex::build(unit)?;
        let analysis = analyze_unit(unit, &index);
        let eligible = eligible_functions(&analysis, &index, config.max_stmts);
        debug!(
            "{} call site(s) collected, {} eligible function(s)",
            analysis.call_sites.len(),
            eligible.len()
        );

        let (selected, valid_instances) =
            select_instance(&analysis, &index, &eligible, config.target_instance)?;

        if config.query_only {
            return Ok(TransformOutput {
                source: None,
                valid_instances,
            });
        }

        let Some(selected) = selected else {
            return Err(TransformError::NoMoreInstances {
                requested: config.target_instance,
                available: valid_instances,
            });
        };

        let mut names = NameAllocator::scan(unit);
        let tmp_name = if selected.callee.return_type.is_void() {
            None
        } else {
            Some(names.fresh())
        };

        let enclosing = locate_statement(selected.caller.body, selected.call);
        invariant!(
            enclosing.is_some(),
            "selected call is not inside the body of `{}`",
            selected.caller.name
        );
        let enclosing = enclosing.unwrap();

        let source = synthesize(unit, &selected, &enclosing, tmp_name.as_deref())?;
        Ok(TransformOutput {
            source: Some(source),
            valid_instances,
        })
    }
}

/// Every transformation this crate registers, in a stable order.
pub fn transformations() -> Vec<Box<dyn Transformation>> {
    vec![Box::new(InlineCall)]
}

/// Looks a transformation up by its registered name.
pub fn find_transformation(name: &str) -> Option<Box<dyn Transformation>> {
    transformations().into_iter().find(|t| t.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_inline_call() {
        assert!(find_transformation("inline-call").is_some());
        assert!(find_transformation("outline-call").is_none());
    }

    #[test]
    fn default_config_matches_driver_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.max_stmts, 10);
        assert_eq!(config.target_instance, 1);
        assert!(!config.query_only);
    }
}
