//! Static parsing of one Go compilation unit with tree-sitter.
//!
//! Nothing is evaluated. Any `ERROR` or `MISSING` node in the syntax tree
//! rejects the whole unit with the location of the first one found in
//! document order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tree_sitter::{Node, Parser};

use crate::error::{GoforgeError, Result};
use crate::symbols::is_exported;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Function,
    Method,
    Type,
    Const,
    Var,
}

/// One top-level declaration, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub exported: bool,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Preceded by a line comment ending on the line directly above.
    pub documented: bool,
    /// Cyclomatic complexity for functions and methods, 0 otherwise.
    pub complexity: u32,
    /// Lines spanned by the declaration.
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub package_name: String,
    pub declarations: Vec<Declaration>,
}

/// Parse the text of one Go source file.
pub fn parse_unit(path: &Path, text: &str) -> Result<CompilationUnit> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| GoforgeError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(text, None)
        .ok_or_else(|| parse_error(path, 1, 1, "parser produced no syntax tree"))?;
    let root = tree.root_node();
    let src = text.as_bytes();

    if root.has_error() {
        let (line, column, message) = first_syntax_error(root)
            .map(|n| {
                let pos = n.start_position();
                let message = if n.is_missing() {
                    format!("expected '{}'", n.kind())
                } else {
                    "syntax error".to_string()
                };
                (pos.row + 1, pos.column + 1, message)
            })
            .unwrap_or((1, 1, "syntax error".to_string()));
        return Err(parse_error(path, line, column, &message));
    }

    let mut package_name = None;
    let mut declarations = Vec::new();
    let mut prev: Option<Node> = None;

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        let documented = prev.is_some_and(|p| {
            p.kind() == "comment" && p.end_position().row + 1 == node.start_position().row
        });

        match node.kind() {
            "package_clause" => {
                package_name = find_child(node, "package_identifier").map(|n| text_of(n, src));
            }
            "function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    declarations.push(callable(node, name, DeclKind::Function, documented, src));
                }
            }
            "method_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    declarations.push(callable(node, name, DeclKind::Method, documented, src));
                }
            }
            "type_declaration" => {
                collect_specs(node, &["type_spec", "type_alias"], DeclKind::Type, documented, src, &mut declarations);
            }
            "const_declaration" => {
                collect_specs(node, &["const_spec"], DeclKind::Const, documented, src, &mut declarations);
            }
            "var_declaration" => {
                collect_specs(node, &["var_spec"], DeclKind::Var, documented, src, &mut declarations);
            }
            _ => {}
        }
        prev = Some(node);
    }

    let package_name =
        package_name.ok_or_else(|| parse_error(path, 1, 1, "expected 'package' clause"))?;

    Ok(CompilationUnit {
        path: path.to_path_buf(),
        package_name,
        declarations,
    })
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

fn callable(node: Node, name: Node, kind: DeclKind, documented: bool, src: &[u8]) -> Declaration {
    let name = text_of(name, src);
    let complexity = node
        .child_by_field_name("body")
        .map(|body| 1 + branch_points(body, src))
        .unwrap_or(1);
    Declaration {
        exported: is_exported(&name),
        name,
        kind,
        line: node.start_position().row + 1,
        documented,
        complexity,
        line_count: span(node),
    }
}

/// Grouped declarations (`const ( ... )`) yield one entry per declared name.
fn collect_specs(
    node: Node,
    spec_kinds: &[&str],
    kind: DeclKind,
    documented: bool,
    src: &[u8],
    out: &mut Vec<Declaration>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if spec_kinds.contains(&child.kind()) {
            let mut names = child.walk();
            // The field also covers the anonymous "," tokens between names.
            for name in child
                .children_by_field_name("name", &mut names)
                .filter(|n| n.is_named())
            {
                let name_text = text_of(name, src);
                out.push(Declaration {
                    exported: is_exported(&name_text),
                    name: name_text,
                    kind,
                    line: child.start_position().row + 1,
                    documented,
                    complexity: 0,
                    line_count: span(child),
                });
            }
        } else if child.kind() != "comment" {
            // var_spec_list and similar wrappers
            collect_specs(child, spec_kinds, kind, documented, src, out);
        }
    }
}

/// Decision points: conditionals, loops, switch/select cases, short-circuit operators.
fn branch_points(node: Node, src: &[u8]) -> u32 {
    let own = match node.kind() {
        "if_statement" | "for_statement" | "expression_case" | "type_case"
        | "communication_case" => 1,
        "binary_expression" => node
            .child_by_field_name("operator")
            .map(|op| matches!(text_of(op, src).as_str(), "&&" | "||") as u32)
            .unwrap_or(0),
        _ => 0,
    };
    let mut cursor = node.walk();
    let nested: u32 = node
        .named_children(&mut cursor)
        .map(|child| branch_points(child, src))
        .sum();
    own + nested
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn first_syntax_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_syntax_error)
}

fn find_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text_of(node: Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or_default().to_string()
}

fn span(node: Node) -> usize {
    node.end_position().row - node.start_position().row + 1
}

fn parse_error(path: &Path, line: usize, column: usize, message: &str) -> GoforgeError {
    GoforgeError::Parse {
        path: path.to_path_buf(),
        line,
        column,
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"package shapes

import "math"

// DefaultColor is used when no color is given.
const DefaultColor = "red"

type Circle struct {
	R float64
}

// Area returns the area of c.
func Area(c Circle) float64 {
	return math.Pi * c.R * c.R
}

func perimeter(c Circle) float64 {
	return 2 * math.Pi * c.R
}

func (c Circle) Diameter() float64 {
	return 2 * c.R
}
"#;

    fn parse(text: &str) -> CompilationUnit {
        parse_unit(Path::new("shapes.go"), text).unwrap()
    }

    #[test]
    fn package_name_and_order() {
        let unit = parse(SHAPES);
        assert_eq!(unit.package_name, "shapes");
        let names: Vec<&str> = unit.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["DefaultColor", "Circle", "Area", "perimeter", "Diameter"]);
    }

    #[test]
    fn kinds_and_export_flags() {
        let unit = parse(SHAPES);
        let by_name = |n: &str| unit.declarations.iter().find(|d| d.name == n).unwrap();
        assert_eq!(by_name("DefaultColor").kind, DeclKind::Const);
        assert_eq!(by_name("Circle").kind, DeclKind::Type);
        assert_eq!(by_name("Area").kind, DeclKind::Function);
        assert!(by_name("Area").exported);
        assert!(!by_name("perimeter").exported);
        assert_eq!(by_name("Diameter").kind, DeclKind::Method);
    }

    #[test]
    fn doc_comments_are_detected() {
        let unit = parse(SHAPES);
        let by_name = |n: &str| unit.declarations.iter().find(|d| d.name == n).unwrap();
        assert!(by_name("Area").documented);
        assert!(by_name("DefaultColor").documented);
        assert!(!by_name("perimeter").documented);
    }

    #[test]
    fn grouped_declarations_yield_each_name() {
        let unit = parse(
            "package cfg\n\nconst (\n\tA = 1\n\tb, C = 2, 3\n)\n\nvar (\n\tX int\n\ty string\n)\n\ntype (\n\tT struct{}\n\tu int\n)\n",
        );
        let names: Vec<&str> = unit.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A", "b", "C", "X", "y", "T", "u"]);
    }

    #[test]
    fn multi_name_specs_skip_separators() {
        let unit = parse("package p\n\nvar Host, port string\n\nconst Min, Max = 1, 9\n");
        let names: Vec<&str> = unit.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Host", "port", "Min", "Max"]);
        assert!(unit.declarations.iter().all(|d| d.name != ","));
    }

    #[test]
    fn complexity_counts_branches() {
        let unit = parse(
            "package p\n\nfunc F(a, b int) int {\n\tif a > 0 && b > 0 {\n\t\treturn 1\n\t}\n\tfor i := 0; i < a; i++ {\n\t\tswitch i {\n\t\tcase 1:\n\t\t\tb++\n\t\tcase 2:\n\t\t\tb--\n\t\t}\n\t}\n\treturn b\n}\n",
        );
        // 1 + if + && + for + 2 cases
        assert_eq!(unit.declarations[0].complexity, 6);
    }

    #[test]
    fn syntax_error_is_reported_with_location() {
        let err = parse_unit(Path::new("bad.go"), "package bad\n\nfunc Broken( {\n").unwrap_err();
        match err {
            GoforgeError::Parse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("bad.go"));
                assert!(line >= 3, "error should point at the broken declaration, got line {line}");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_package_clause_is_rejected() {
        assert!(parse_unit(Path::new("x.go"), "func F() {}\n").is_err());
    }
}
