pub mod error;
pub mod functions;
pub mod node;

pub use error::SyntaxError;
pub use functions::{FunctionDef, FunctionIndex, FunctionInfo, Param, ReturnType};

use log::debug;
use tree_sitter::{Node, Parser, Tree};

use node::create_span;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Wraps a tree-sitter parser configured for the C grammar.
pub struct CSourceParser {
    parser: Parser,
}

impl CSourceParser {
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| SyntaxError::ParserInitError(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse C source code into a unit that owns both the source text
    /// and its syntax tree.
    pub fn parse_unit(&mut self, source: impl Into<String>) -> ParseResult<ParsedUnit> {
        let source = source.into();
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| SyntaxError::ParseError {
                message: "Failed to parse source code".to_string(),
                span: None,
            })?;
        debug!("parsed unit: {} bytes", source.len());
        Ok(ParsedUnit { source, tree })
    }
}

/// One parsed translation unit. Every node in the tree carries byte
/// offsets into `source`, which is what the rewrite machinery edits.
pub struct ParsedUnit {
    source: String,
    tree: Tree,
}

impl ParsedUnit {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Verbatim source text of a node's span.
    pub fn text_of(&self, node: &Node) -> ParseResult<String> {
        node::node_text(node, &self.source)
    }

    /// Collects every ERROR or MISSING node in the tree.
    pub fn syntax_errors(&self) -> Vec<SyntaxError> {
        let mut errors = Vec::new();
        collect_ts_errors(&self.root(), &self.source, &mut errors);
        errors
    }

    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }
}

/// Helper function to recursively collect tree-sitter errors
fn collect_ts_errors(node: &Node, source: &str, errors: &mut Vec<SyntaxError>) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxError::SyntaxError {
            message: format!(
                "unexpected {} near \"{}\"",
                if node.is_missing() { "MISSING" } else { "token" },
                node.utf8_text(source.as_bytes()).unwrap_or("[invalid UTF-8]")
            ),
            span: Some(create_span(node)),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_ts_errors(&child, source, errors);
    }
}
