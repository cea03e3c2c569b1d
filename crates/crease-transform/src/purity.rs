//! Argument purity classification.
//!
//! Inlining moves each argument's evaluation out of the call and into
//! a local-variable initializer at the top of the inlined block. That
//! is only behavior-preserving for expressions that are side-effect
//! free and safe to evaluate exactly once, so anything else (nested
//! calls above all) disqualifies the whole call site.

use crease_syntax::node::statement_children;
use tree_sitter::Node;

/// Returns true iff `expr` is safe to duplicate into a local
/// initializer: a literal, a member access, a subscript with a pure
/// index, a bare variable reference, or any of those under parentheses
/// or a cast.
pub fn is_pure_expr(expr: &Node) -> bool {
    match expr.kind() {
        "number_literal"
        | "char_literal"
        | "string_literal"
        | "concatenated_string"
        | "null"
        | "true"
        | "false"
        | "identifier"
        | "field_expression" => true,

        "subscript_expression" => expr
            .child_by_field_name("index")
            .map_or(false, |index| is_pure_expr(&index)),

        "parenthesized_expression" => statement_children(expr)
            .first()
            .map_or(false, is_pure_expr),

        "cast_expression" => expr
            .child_by_field_name("value")
            .map_or(false, |value| is_pure_expr(&value)),

        _ => false,
    }
}

/// Argument expressions of a call, in positional order.
pub fn call_arguments<'tree>(call: &Node<'tree>) -> Vec<Node<'tree>> {
    call.child_by_field_name("arguments")
        .map(|args| statement_children(&args))
        .unwrap_or_default()
}

/// True iff every argument of the call passes [`is_pure_expr`].
pub fn has_pure_arguments(call: &Node) -> bool {
    call_arguments(call).iter().all(is_pure_expr)
}
