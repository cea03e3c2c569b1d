//! Generic preorder traversal over tree-sitter nodes.
//!
//! One walk function with a flow-control callback replaces the
//! visitor-class hierarchy a clang-based pass would use: a visitor can
//! keep descending, skip a subtree, or stop the whole walk.

use tree_sitter::Node;

/// What the traversal should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Descend into the node's children.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Abort the entire walk.
    Stop,
}

/// Walks `node` and its subtree in preorder, calling `visit` on every
/// node (the root included). Returns `false` if the walk was stopped.
pub fn walk<'tree, F>(node: Node<'tree>, visit: &mut F) -> bool
where
    F: FnMut(Node<'tree>) -> Flow,
{
    match visit(node) {
        Flow::Stop => return false,
        Flow::SkipChildren => return true,
        Flow::Continue => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !walk(child, visit) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_syntax::CSourceParser;

    #[test]
    fn visits_every_node_in_preorder() {
        let mut parser = CSourceParser::new().unwrap();
        let unit = parser.parse_unit("int x = 1;\n").unwrap();
        let mut kinds = Vec::new();
        walk(unit.root(), &mut |n| {
            kinds.push(n.kind().to_string());
            Flow::Continue
        });
        assert_eq!(kinds[0], "translation_unit");
        assert!(kinds.iter().any(|k| k == "number_literal"));
    }

    #[test]
    fn skip_children_prunes_subtree() {
        let mut parser = CSourceParser::new().unwrap();
        let unit = parser.parse_unit("int f(void) { return 1; }\n").unwrap();
        let mut saw_return = false;
        walk(unit.root(), &mut |n| match n.kind() {
            "compound_statement" => Flow::SkipChildren,
            "return_statement" => {
                saw_return = true;
                Flow::Continue
            }
            _ => Flow::Continue,
        });
        assert!(!saw_return);
    }

    #[test]
    fn stop_aborts_walk() {
        let mut parser = CSourceParser::new().unwrap();
        let unit = parser.parse_unit("int a; int b;\n").unwrap();
        let mut count = 0;
        let completed = walk(unit.root(), &mut |n| {
            if n.kind() == "declaration" {
                count += 1;
                return Flow::Stop;
            }
            Flow::Continue
        });
        assert!(!completed);
        assert_eq!(count, 1);
    }
}
