//! Complexity scoring and call-site collection.
//!
//! Each function definition body is walked exactly once. The walk
//! produces a statement-weight score (a structural proxy for how much
//! code one inlining would duplicate) and appends every resolvable
//! call expression to the unit-wide call-site list in encounter order.

use crease_syntax::{FunctionIndex, ParsedUnit};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use tree_sitter::Node;

use crate::walk::{walk, Flow};

/// One call expression occurrence, tagged with its resolved callee
/// name and the function whose body contains it.
#[derive(Debug, Clone)]
pub struct CallSite<'tree> {
    pub node: Node<'tree>,
    pub callee: String,
    pub caller: String,
}

/// Output of the analysis stage for one whole unit.
#[derive(Debug, Default)]
pub struct UnitAnalysis<'tree> {
    /// Every resolvable call site in the unit, in encounter order.
    pub call_sites: Vec<CallSite<'tree>>,
    /// Complexity score per function definition.
    pub scores: FxHashMap<String, u32>,
}

/// Node kinds that each add one point of statement weight. Mirrors the
/// kinds a conservative inliner refuses to duplicate in bulk: control
/// flow, blocks, declarations, and operator applications.
fn counts_toward_score(kind: &str) -> bool {
    matches!(
        kind,
        "break_statement"
            | "continue_statement"
            | "goto_statement"
            | "compound_statement"
            | "declaration"
            | "do_statement"
            | "for_statement"
            | "if_statement"
            | "return_statement"
            | "case_statement"
            | "switch_statement"
            | "while_statement"
            | "binary_expression"
            | "assignment_expression"
            | "comma_expression"
    )
}

/// Walks every function definition in the unit, scoring each body and
/// collecting call sites.
pub fn analyze_unit<'tree>(
    unit: &'tree ParsedUnit,
    index: &FunctionIndex<'tree>,
) -> UnitAnalysis<'tree> {
    let mut analysis = UnitAnalysis::default();
    for def in index.definitions() {
        let score = analyze_function(unit, index, def.name.clone(), def.body, &mut analysis);
        debug!("function `{}` scored {}", def.name, score);
        analysis.scores.insert(def.name.clone(), score);
    }
    analysis
}

fn analyze_function<'tree>(
    unit: &'tree ParsedUnit,
    index: &FunctionIndex<'tree>,
    caller: String,
    body: Node<'tree>,
    analysis: &mut UnitAnalysis<'tree>,
) -> u32 {
    let mut score = 0u32;
    walk(body, &mut |node| {
        let kind = node.kind();
        if counts_toward_score(kind) {
            score += 1;
        } else if kind == "call_expression" {
            // Only calls with a resolvable callee count; calls through
            // pointers or to undeclared names are neither scored nor
            // collected.
            if let Some(callee) = direct_callee(&node, unit, index) {
                score += 1;
                analysis.call_sites.push(CallSite {
                    node,
                    callee,
                    caller: caller.clone(),
                });
            }
        }
        Flow::Continue
    });
    score
}

/// The name of the function a call expression directly references, if
/// it resolves to a declared function in this unit.
pub fn direct_callee(
    call: &Node,
    unit: &ParsedUnit,
    index: &FunctionIndex<'_>,
) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "identifier" {
        return None;
    }
    let name = function.utf8_text(unit.source().as_bytes()).ok()?;
    index.is_declared(name).then(|| name.to_string())
}

/// Functions whose definitions may legally be inlined: score within
/// the threshold and not variadic. Eligibility is a property of the
/// definition alone, independent of any call site.
pub fn eligible_functions<'tree>(
    analysis: &UnitAnalysis<'tree>,
    index: &FunctionIndex<'tree>,
    max_stmts: u32,
) -> FxHashSet<String> {
    let mut eligible = FxHashSet::default();
    for def in index.definitions() {
        let score = analysis.scores.get(&def.name).copied().unwrap_or(0);
        if score <= max_stmts && !def.variadic {
            eligible.insert(def.name.clone());
        }
    }
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_syntax::CSourceParser;

    fn parse(source: &str) -> crease_syntax::ParsedUnit {
        CSourceParser::new().unwrap().parse_unit(source).unwrap()
    }

    #[test]
    fn scores_small_body() {
        // compound + return + binary operator = 3
        let unit = parse("int add(int a, int b) { return a + b; }\n");
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        assert_eq!(analysis.scores["add"], 3);
    }

    #[test]
    fn scores_control_flow() {
        // compound + if + return + return = 4
        let unit = parse("int sign(int x) { if (x) return 1; return 0; }\n");
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        assert_eq!(analysis.scores["sign"], 4);
    }

    #[test]
    fn assignment_counts_as_operator() {
        // compound + declaration + assignment + return = 4
        let unit = parse("int set(int x) { int y; y = x; return y; }\n");
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        assert_eq!(analysis.scores["set"], 4);
    }

    #[test]
    fn collects_call_sites_in_encounter_order() {
        let src = "int g(int x) { return x; }\n\
                   int f(int x) { return g(x); }\n\
                   int main(void) { return f(g(1)); }\n";
        let unit = parse(src);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let callees: Vec<_> = analysis.call_sites.iter().map(|c| c.callee.as_str()).collect();
        // f's body first, then main's: outer call before its argument.
        assert_eq!(callees, vec!["g", "f", "g"]);
        assert_eq!(analysis.call_sites[1].caller, "main");
    }

    #[test]
    fn unresolvable_calls_are_skipped() {
        let unit = parse("int main(void) { return mystery(1); }\n");
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        assert!(analysis.call_sites.is_empty());
        // compound + return = 2; the unresolved call adds nothing.
        assert_eq!(analysis.scores["main"], 2);
    }

    #[test]
    fn eligibility_excludes_variadic_and_oversized() {
        let src = "int v(int n, ...) { return n; }\n\
                   int small(int n) { return n; }\n\
                   int big(int n) {\n\
                     n = n + 1; n = n + 2; n = n + 3; n = n + 4;\n\
                     n = n + 5; n = n + 6; n = n + 7; n = n + 8;\n\
                     return n;\n\
                   }\n";
        let unit = parse(src);
        let index = FunctionIndex::build(&unit).unwrap();
        let analysis = analyze_unit(&unit, &index);
        let eligible = eligible_functions(&analysis, &index, 10);
        assert!(eligible.contains("small"));
        assert!(!eligible.contains("v"));
        // 8 assignments + 8 binary ops + compound + return = 18 > 10.
        assert!(!eligible.contains("big"));
    }
}
