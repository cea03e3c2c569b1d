//! Ordinal selection of one valid call site.
//!
//! Re-iterates the collected call-site list in encounter order,
//! counting only valid sites (eligible callee, all arguments pure),
//! and locks onto the one matching the externally supplied 1-based
//! ordinal. The scan always runs to completion so the caller learns
//! the total number of valid instances.

use crease_syntax::{FunctionDef, FunctionIndex};
use log::debug;
use rustc_hash::FxHashSet;
use tree_sitter::Node;

use crate::analysis::UnitAnalysis;
use crate::error::{invariant, TransformResult};
use crate::purity::has_pure_arguments;

/// The single call site chosen for inlining: the call expression, the
/// defining declaration of its callee, and the function containing it.
#[derive(Debug, Clone)]
pub struct SelectedInstance<'tree> {
    pub call: Node<'tree>,
    pub callee: FunctionDef<'tree>,
    pub caller: FunctionDef<'tree>,
}

/// Scans the call-site list and returns the selected instance (if the
/// ordinal was reached) together with the total valid-instance count.
pub fn select_instance<'tree>(
    analysis: &UnitAnalysis<'tree>,
    index: &FunctionIndex<'tree>,
    eligible: &FxHashSet<String>,
    target_instance: usize,
) -> TransformResult<(Option<SelectedInstance<'tree>>, usize)> {
    let mut valid_count = 0usize;
    let mut selected = None;

    for site in &analysis.call_sites {
        if !eligible.contains(&site.callee) {
            continue;
        }
        if !has_pure_arguments(&site.node) {
            continue;
        }

        valid_count += 1;
        if valid_count == target_instance && selected.is_none() {
            // The referenced declaration may be a bodyless prototype;
            // the defining redeclaration substitutes for it.
            let callee = index.definition(&site.callee).cloned();
            invariant!(
                callee.is_some(),
                "eligible callee `{}` has no defining declaration",
                site.callee
            );
            let caller = index.definition(&site.caller).cloned();
            invariant!(
                caller.is_some(),
                "call site in `{}` has no resolvable caller",
                site.caller
            );
            debug!(
                "selected instance {}: call to `{}` inside `{}`",
                target_instance, site.callee, site.caller
            );
            selected = Some(SelectedInstance {
                call: site.node,
                callee: callee.unwrap(),
                caller: caller.unwrap(),
            });
        }
    }

    debug!("unit has {} valid call site(s)", valid_count);
    Ok((selected, valid_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_unit, eligible_functions};
    use crease_syntax::{CSourceParser, ParsedUnit};

    fn parse(source: &str) -> ParsedUnit {
        CSourceParser::new().unwrap().parse_unit(source).unwrap()
    }

    const THREE_CALLS: &str = "\
int one(void) { return 1; }
int two(void) { return 2; }
int main(void) {
  int a = one();
  int b = two();
  int c = one();
  return a + b + c;
}
";

    #[test]
    fn counts_all_valid_instances() {
        let unit = parse(THREE_CALLS);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let eligible = eligible_functions(&analysis, &index, 10);
        let (selected, total) = select_instance(&analysis, &index, &eligible, 2).unwrap();
        assert_eq!(total, 3);
        assert_eq!(selected.unwrap().callee.name, "two");
    }

    #[test]
    fn ordinal_past_total_selects_nothing() {
        let unit = parse(THREE_CALLS);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let eligible = eligible_functions(&analysis, &index, 10);
        let (selected, total) = select_instance(&analysis, &index, &eligible, 4).unwrap();
        assert_eq!(total, 3);
        assert!(selected.is_none());
    }

    #[test]
    fn impure_arguments_invalidate_a_site() {
        let src = "\
int g(void) { return 1; }
int f(int x) { return x; }
int main(void) { return f(g()); }
";
        let unit = parse(src);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let eligible = eligible_functions(&analysis, &index, 10);
        let (selected, total) = select_instance(&analysis, &index, &eligible, 1).unwrap();
        // f(g()) is invalid; the nested g() is the only valid site.
        assert_eq!(total, 1);
        assert_eq!(selected.unwrap().callee.name, "g");
    }

    #[test]
    fn prototype_reference_resolves_to_definition() {
        let src = "\
int f(int x);
int main(void) { return f(2); }
int f(int x) { return x + 1; }
";
        let unit = parse(src);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let eligible = eligible_functions(&analysis, &index, 10);
        let (selected, total) = select_instance(&analysis, &index, &eligible, 1).unwrap();
        assert_eq!(total, 1);
        let selected = selected.unwrap();
        assert_eq!(selected.callee.name, "f");
        assert!(!selected.callee.return_type.is_void());
        assert_eq!(selected.caller.name, "main");
    }
}
