//! Finding the statement that encloses the selected call.
//!
//! The walk tracks, for every compound block, which immediate child
//! statement is "current", and descends into the non-compound branches
//! of conditionals, loops and switch labels with a brace-wrapping
//! flag: a single-statement branch cannot receive extra sibling
//! statements without first being wrapped in a fresh block.

use crease_syntax::node::statement_children;
use tree_sitter::Node;

/// The caller statement that syntactically contains the selected call,
/// plus whether synthesized siblings need a fresh brace pair.
#[derive(Debug, Clone)]
pub struct EnclosingStatement<'tree> {
    pub stmt: Node<'tree>,
    pub needs_braces: bool,
}

/// Walks `body` (the caller's compound body) and locates the enclosing
/// statement of `call`. Returns `None` when the call is not inside the
/// body, which the pass treats as an invariant violation.
pub fn locate_statement<'tree>(
    body: Node<'tree>,
    call: Node<'tree>,
) -> Option<EnclosingStatement<'tree>> {
    let mut locator = Locator {
        target: call.id(),
        current: None,
        needs_braces: false,
        found: None,
    };
    locator.visit_compound(body);
    locator.found
}

struct Locator<'tree> {
    target: usize,
    current: Option<Node<'tree>>,
    needs_braces: bool,
    found: Option<EnclosingStatement<'tree>>,
}

impl<'tree> Locator<'tree> {
    fn visit_compound(&mut self, block: Node<'tree>) {
        for child in statement_children(&block) {
            if self.found.is_some() {
                return;
            }
            self.current = Some(child);
            self.traverse(child);
        }
    }

    /// A branch that holds a single statement rather than a compound
    /// block, e.g. the then-branch of `if (x) foo();`.
    fn visit_non_compound(&mut self, stmt: Node<'tree>) {
        if stmt.kind() == "compound_statement" {
            self.visit_compound(stmt);
            return;
        }
        self.current = Some(stmt);
        let saved = self.needs_braces;
        self.needs_braces = true;
        self.traverse(stmt);
        self.needs_braces = saved;
    }

    fn traverse(&mut self, node: Node<'tree>) {
        if self.found.is_some() {
            return;
        }
        if node.id() == self.target {
            self.found = Some(EnclosingStatement {
                stmt: self.current.unwrap_or(node),
                needs_braces: self.needs_braces,
            });
            return;
        }

        match node.kind() {
            "compound_statement" => self.visit_compound(node),
            "if_statement" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.traverse(cond);
                }
                if let Some(then_branch) = node.child_by_field_name("consequence") {
                    self.visit_non_compound(then_branch);
                }
                if let Some(else_clause) = node.child_by_field_name("alternative") {
                    // The else branch sits one level down, inside the
                    // else_clause node.
                    for branch in statement_children(&else_clause) {
                        self.visit_non_compound(branch);
                    }
                }
            }
            "for_statement" => {
                for field in ["initializer", "condition", "update"] {
                    if let Some(part) = node.child_by_field_name(field) {
                        self.traverse(part);
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_non_compound(body);
                }
            }
            "while_statement" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.traverse(cond);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_non_compound(body);
                }
            }
            "do_statement" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.traverse(cond);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_non_compound(body);
                }
            }
            "case_statement" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.traverse(value);
                }
                let value_id = node.child_by_field_name("value").map(|v| v.id());
                for child in statement_children(&node) {
                    if Some(child.id()) == value_id {
                        continue;
                    }
                    self.visit_non_compound(child);
                }
            }
            _ => {
                for child in statement_children(&node) {
                    if self.found.is_some() {
                        return;
                    }
                    self.traverse(child);
                }
            }
        }
    }
}
