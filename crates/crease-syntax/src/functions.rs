use rustc_hash::FxHashMap;
use tree_sitter::Node;

use crate::node::{declarator_name, function_declarator, node_text, pointer_depth, statement_children};
use crate::{ParsedUnit, SyntaxError};

/// The declared return type of a function, kept as source text so it
/// can be spliced back into synthesized declarations verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    /// Text of the type specifier, e.g. `unsigned long` or `struct s`.
    pub base: String,
    /// Pointer wrappers on top of the base type.
    pub pointer_depth: u32,
}

impl ReturnType {
    pub fn is_void(&self) -> bool {
        self.base == "void" && self.pointer_depth == 0
    }

    /// Renders a variable declaration of this type, e.g. `int *tmp;`.
    pub fn declare(&self, name: &str) -> String {
        let stars = "*".repeat(self.pointer_depth as usize);
        format!("{} {}{};", self.base, stars, name)
    }
}

/// One formal parameter of a function definition.
#[derive(Debug, Clone)]
pub struct Param<'tree> {
    /// The `parameter_declaration` node, e.g. `int *p`.
    pub node: Node<'tree>,
    /// Declared name, absent for unnamed prototype-style parameters.
    pub name: Option<String>,
}

/// A function definition: the only declaration of a function that can
/// serve as an inlining source.
#[derive(Debug, Clone)]
pub struct FunctionDef<'tree> {
    pub name: String,
    /// The `function_definition` node.
    pub node: Node<'tree>,
    /// The `compound_statement` body, braces included.
    pub body: Node<'tree>,
    pub params: Vec<Param<'tree>>,
    pub variadic: bool,
    pub return_type: ReturnType,
}

/// Everything known about one canonical function identity. In a single
/// C translation unit the canonical identity is the function name:
/// prototypes and the definition all redeclare the same function.
#[derive(Debug, Clone, Default)]
pub struct FunctionInfo<'tree> {
    pub definition: Option<FunctionDef<'tree>>,
    /// Number of declarations seen (prototypes plus definition).
    pub declarations: usize,
}

/// Index of every function declared at the top level of a unit.
#[derive(Debug, Default)]
pub struct FunctionIndex<'tree> {
    functions: FxHashMap<String, FunctionInfo<'tree>>,
    /// Definitions in encounter order; analysis depends on this order.
    definition_order: Vec<String>,
}

impl<'tree> FunctionIndex<'tree> {
    /// Scans the top-level declarations of a unit.
    pub fn build(unit: &'tree ParsedUnit) -> Result<FunctionIndex<'tree>, SyntaxError> {
        let mut index = FunctionIndex::default();
        index.scan(unit.root(), unit.source())?;
        Ok(index)
    }

    fn scan(&mut self, node: Node<'tree>, source: &str) -> Result<(), SyntaxError> {
        for child in statement_children(&node) {
            match child.kind() {
                "function_definition" => {
                    if let Some(def) = parse_definition(&child, source)? {
                        let info = self.functions.entry(def.name.clone()).or_default();
                        info.declarations += 1;
                        if info.definition.is_none() {
                            self.definition_order.push(def.name.clone());
                            info.definition = Some(def);
                        }
                    }
                }
                "declaration" => {
                    for name in prototype_names(&child, source) {
                        self.functions.entry(name).or_default().declarations += 1;
                    }
                }
                // Reduced test cases occasionally keep conditional or
                // linkage blocks around function definitions.
                "preproc_if" | "preproc_ifdef" | "preproc_else" | "linkage_specification" => {
                    self.scan(child, source)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionInfo<'tree>> {
        self.functions.get(name)
    }

    /// The resolved defining declaration for a function name, if the
    /// unit contains one.
    pub fn definition(&self, name: &str) -> Option<&FunctionDef<'tree>> {
        self.functions.get(name).and_then(|f| f.definition.as_ref())
    }

    /// Whether a call to `name` resolves to any declared function.
    pub fn is_declared(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Function definitions in the order they appear in the unit.
    pub fn definitions(&self) -> impl Iterator<Item = &FunctionDef<'tree>> {
        self.definition_order
            .iter()
            .filter_map(|name| self.definition(name))
    }
}

fn parse_definition<'tree>(
    node: &Node<'tree>,
    source: &str,
) -> Result<Option<FunctionDef<'tree>>, SyntaxError> {
    let (Some(type_node), Some(declarator), Some(body)) = (
        node.child_by_field_name("type"),
        node.child_by_field_name("declarator"),
        node.child_by_field_name("body"),
    ) else {
        return Ok(None);
    };

    let Some(func_decl) = function_declarator(&declarator) else {
        return Ok(None);
    };
    let Some(name_node) = func_decl.child_by_field_name("declarator") else {
        return Ok(None);
    };
    let Some((_, name)) = declarator_name(&name_node, source) else {
        return Ok(None);
    };

    let return_type = ReturnType {
        base: node_text(&type_node, source)?,
        pointer_depth: pointer_depth(&declarator),
    };

    let mut params = Vec::new();
    let mut variadic = false;
    if let Some(param_list) = func_decl.child_by_field_name("parameters") {
        for param in statement_children(&param_list) {
            match param.kind() {
                "parameter_declaration" => {
                    let name = param
                        .child_by_field_name("declarator")
                        .and_then(|d| declarator_name(&d, source))
                        .map(|(_, name)| name);
                    params.push(Param { node: param, name });
                }
                "variadic_parameter" => variadic = true,
                _ => {}
            }
        }
    }

    // `void f(void)` declares zero parameters.
    if params.len() == 1 && params[0].name.is_none() {
        if let Ok(text) = node_text(&params[0].node, source) {
            if text.trim() == "void" {
                params.clear();
            }
        }
    }

    Ok(Some(FunctionDef {
        name,
        node: *node,
        body,
        params,
        variadic,
        return_type,
    }))
}

/// Names of functions a top-level `declaration` node declares, e.g.
/// `int foo(int), bar(void);` yields `foo` and `bar`.
fn prototype_names(node: &Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for child in statement_children(node) {
        if let Some(func_decl) = function_declarator(&child) {
            if let Some(name_node) = func_decl.child_by_field_name("declarator") {
                if let Some((_, name)) = declarator_name(&name_node, source) {
                    names.push(name);
                }
            }
        }
    }
    names
}
