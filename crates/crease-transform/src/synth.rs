//! Replacement-text synthesis for the selected call site.
//!
//! Works on verbatim source text throughout: the callee body is copied
//! as written (braces, comments and formatting included), parameter
//! locals are spliced in just past the opening brace, return keywords
//! are rewritten in place, and the finished block is staged as edits
//! against the caller's buffer. Nothing is committed until every step
//! has succeeded.

use crease_rewrite::EditSet;
use crease_syntax::node::statement_children;
use crease_syntax::ParsedUnit;
use log::debug;

use crate::error::{invariant, TransformResult};
use crate::locate::EnclosingStatement;
use crate::purity::call_arguments;
use crate::select::SelectedInstance;
use crate::walk::{walk, Flow};

const RETURN_KEYWORD_LEN: usize = "return".len();

/// Produces the rewritten unit source for one selected instance.
///
/// `tmp_name` is the temporary that will hold the callee's return
/// value; `None` means the callee returns void and the call produces
/// no value to capture.
pub fn synthesize(
    unit: &ParsedUnit,
    selected: &SelectedInstance<'_>,
    enclosing: &EnclosingStatement<'_>,
    tmp_name: Option<&str>,
) -> TransformResult<String> {
    let block = rewritten_body(unit, selected, tmp_name)?;

    let mut prefix = String::new();
    if enclosing.needs_braces {
        prefix.push_str("{\n");
    }
    if let Some(tmp) = tmp_name {
        prefix.push_str(&selected.callee.return_type.declare(tmp));
        prefix.push('\n');
    }
    prefix.push_str(&block);
    prefix.push('\n');

    let stmt = enclosing.stmt;
    let call = selected.call;
    let mut edits = EditSet::new();
    edits.insert_before(stmt.start_byte(), prefix);
    if enclosing.needs_braces {
        edits.insert_before(stmt.end_byte(), "\n}");
    }
    edits.replace(call.start_byte()..call.end_byte(), tmp_name.unwrap_or(""));

    debug!(
        "staged {} edit(s) for call at {}..{}",
        edits.len(),
        call.start_byte(),
        call.end_byte()
    );
    Ok(edits.apply(unit.source())?)
}

/// Copies the callee body and performs the in-block rewrites: parameter
/// locals after the opening brace, return statements turned into
/// assignments to `tmp_name` (or stripped, for void returns).
pub(crate) fn rewritten_body(
    unit: &ParsedUnit,
    selected: &SelectedInstance<'_>,
    tmp_name: Option<&str>,
) -> TransformResult<String> {
    let body = selected.callee.body;
    let body_text = unit.text_of(&body)?;
    invariant!(
        body_text.starts_with('{') && body_text.ends_with('}'),
        "callee `{}` body is not a braced block",
        selected.callee.name
    );

    let mut edits = EditSet::new();
    edits.insert_before(1, param_locals(unit, selected)?);

    let body_start = body.start_byte();
    let mut return_offsets = Vec::new();
    walk(body, &mut |node| {
        if node.kind() == "return_statement" {
            let has_value = !statement_children(&node).is_empty();
            return_offsets.push((node.start_byte() - body_start, has_value));
        }
        Flow::Continue
    });
    return_offsets.sort_by_key(|&(offset, _)| offset);

    for (offset, has_value) in return_offsets {
        invariant!(
            body_text.len() >= offset + RETURN_KEYWORD_LEN
                && &body_text[offset..offset + RETURN_KEYWORD_LEN] == "return",
            "return statement offset {} does not point at a return keyword",
            offset
        );
        let replacement = match tmp_name {
            Some(tmp) if has_value => format!("{} = ", tmp),
            _ => String::new(),
        };
        edits.replace(offset..offset + RETURN_KEYWORD_LEN, replacement);
    }

    Ok(edits.apply(&body_text)?)
}

/// One local declaration per formal parameter, in declaration order,
/// each initialized with the matching positional argument's verbatim
/// source text. A parameter with no matching argument is declared with
/// no initializer; the resulting local is uninitialized (this mirrors
/// the lack of default-argument handling in the C source being
/// reduced).
fn param_locals(unit: &ParsedUnit, selected: &SelectedInstance<'_>) -> TransformResult<String> {
    let args = call_arguments(&selected.call);
    let mut locals = String::new();
    for (index, param) in selected.callee.params.iter().enumerate() {
        let mut decl = unit.text_of(&param.node)?;
        if let Some(arg) = args.get(index) {
            decl.push_str(" = ");
            decl.push_str(&unit.text_of(arg)?);
        }
        decl.push_str(";\n");
        locals.push_str(&decl);
    }
    Ok(locals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_unit, eligible_functions};
    use crate::select::select_instance;
    use crease_syntax::{CSourceParser, FunctionIndex, ParsedUnit};

    fn parse(source: &str) -> ParsedUnit {
        CSourceParser::new().unwrap().parse_unit(source).unwrap()
    }

    fn select_first<'t>(
        unit: &'t ParsedUnit,
        index: &FunctionIndex<'t>,
    ) -> SelectedInstance<'t> {
        let analysis = analyze_unit(unit, index);
        let eligible = eligible_functions(&analysis, index, 10);
        select_instance(&analysis, index, &eligible, 1)
            .unwrap()
            .0
            .expect("no valid instance")
    }

    #[test]
    fn rewrites_value_return_into_assignment() {
        let unit = parse(
            "int add(int a, int b) { return a + b; }\nint main(void) { int x = add(1, 2); return x; }\n",
        );
        let index = FunctionIndex::build(&unit).unwrap();
        let selected = select_first(&unit, &index);
        let block = rewritten_body(&unit, &selected, Some("__trans_tmp_0")).unwrap();
        assert_eq!(block, "{int a = 1;\nint b = 2;\n __trans_tmp_0 =  a + b; }");
    }

    #[test]
    fn strips_bare_return_in_void_callee() {
        let unit = parse(
            "void ping(int n) { n = n + 1; return; }\nint main(void) { ping(3); return 0; }\n",
        );
        let index = FunctionIndex::build(&unit).unwrap();
        let selected = select_first(&unit, &index);
        let block = rewritten_body(&unit, &selected, None).unwrap();
        assert!(block.contains("int n = 3;"));
        assert!(!block.contains("return"));
        assert!(block.contains(';'));
    }

    #[test]
    fn rewrites_every_return_in_the_body() {
        let unit = parse(
            "int pick(int x) { if (x) { return 1; } return 2; }\nint main(void) { int y = pick(0); return y; }\n",
        );
        let index = FunctionIndex::build(&unit).unwrap();
        let selected = select_first(&unit, &index);
        let block = rewritten_body(&unit, &selected, Some("t")).unwrap();
        assert_eq!(block.matches("t = ").count(), 2);
        assert!(!block.contains("return"));
    }

    #[test]
    fn missing_argument_leaves_local_uninitialized() {
        let unit = parse(
            "int two(int a, int b) { return a; }\nint main(void) { int x = two(7); return x; }\n",
        );
        let index = FunctionIndex::build(&unit).unwrap();
        let selected = select_first(&unit, &index);
        let block = rewritten_body(&unit, &selected, Some("t")).unwrap();
        assert!(block.contains("int a = 7;"));
        assert!(block.contains("int b;"));
    }
}
