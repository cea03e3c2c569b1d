use miette::SourceSpan;
use tree_sitter::Node;

use crate::error::SyntaxError;

/// Creates a SourceSpan from a Node's byte range
pub fn create_span(node: &Node) -> SourceSpan {
    SourceSpan::new(node.start_byte().into(), node.end_byte() - node.start_byte())
}

/// Extracts text from a Node, handling UTF-8 conversion and errors
pub fn node_text(node: &Node, source: &str) -> Result<String, SyntaxError> {
    node.utf8_text(source.as_bytes())
        .map(|s| s.to_string())
        .map_err(|e| SyntaxError::NodeError {
            message: format!("Invalid UTF-8 in node text: {}", e),
            span: Some(create_span(node)),
            node_type: node.kind().to_string(),
        })
}

/// Named children of a node, with comments filtered out. Comments are
/// "extra" nodes in the C grammar and show up between statements and
/// call arguments, where the transformation must not see them.
pub fn statement_children<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Resolves a declarator chain down to its identifier, counting the
/// pointer wrappers passed on the way. Returns `None` for declarator
/// shapes the reducer does not handle (e.g. parenthesized function
/// pointer declarators).
pub fn declarator_name<'tree>(node: &Node<'tree>, source: &str) -> Option<(Node<'tree>, String)> {
    let mut current = *node;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" => {
                let name = current.utf8_text(source.as_bytes()).ok()?.to_string();
                return Some((current, name));
            }
            "pointer_declarator" | "array_declarator" | "function_declarator" | "init_declarator" => {
                current = current.child_by_field_name("declarator")?;
            }
            _ => return None,
        }
    }
}

/// Finds the `function_declarator` inside a declarator chain, if any.
pub fn function_declarator<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    let mut current = *node;
    loop {
        match current.kind() {
            "function_declarator" => return Some(current),
            "pointer_declarator" | "init_declarator" => {
                current = current.child_by_field_name("declarator")?;
            }
            _ => return None,
        }
    }
}

/// Counts the `pointer_declarator` wrappers between a declarator root
/// and its `function_declarator`. This is the number of `*`s belonging
/// to the function's return type.
pub fn pointer_depth(node: &Node) -> u32 {
    let mut depth = 0;
    let mut current = *node;
    while current.kind() == "pointer_declarator" {
        depth += 1;
        match current.child_by_field_name("declarator") {
            Some(inner) => current = inner,
            None => break,
        }
    }
    depth
}
