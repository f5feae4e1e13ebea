use serde::Serialize;

use crate::source::{CompilationUnit, DeclKind};

/// An exported function or method that gets a generated test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestableSymbol {
    pub name: String,
}

impl TestableSymbol {
    /// Go test entry point for this symbol: `Area` → `TestArea`.
    pub fn test_name(&self) -> String {
        format!("Test{}", self.name)
    }
}

/// Go's visibility rule: an identifier is exported when its first character
/// is an upper-case letter. Fixed, not configurable.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Exported functions and methods of `unit`, in source order.
///
/// A method is named by its own identifier, so `func (s *Server) Start()`
/// yields `Start`. Types, constants and variables are never included,
/// exported or not.
pub fn testable_symbols(unit: &CompilationUnit) -> Vec<TestableSymbol> {
    unit.declarations
        .iter()
        .filter(|d| matches!(d.kind, DeclKind::Function | DeclKind::Method) && d.exported)
        .map(|d| TestableSymbol {
            name: d.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_unit;
    use std::path::Path;

    #[test]
    fn export_rule_follows_first_letter() {
        assert!(is_exported("Area"));
        assert!(is_exported("Ünicode"));
        assert!(!is_exported("perimeter"));
        assert!(!is_exported("_Hidden"));
        assert!(!is_exported(""));
    }

    #[test]
    fn shapes_yields_only_area() {
        let unit = parse_unit(
            Path::new("shapes.go"),
            "package shapes\n\nvar DefaultColor = \"red\"\n\nfunc Area(r float64) float64 { return r * r }\n\nfunc perimeter(r float64) float64 { return 4 * r }\n",
        )
        .unwrap();
        let symbols = testable_symbols(&unit);
        assert_eq!(
            symbols,
            vec![TestableSymbol {
                name: "Area".to_string()
            }]
        );
        assert_eq!(symbols[0].test_name(), "TestArea");
    }

    #[test]
    fn methods_are_included_types_are_not() {
        let unit = parse_unit(
            Path::new("srv.go"),
            "package srv\n\ntype Server struct{}\n\nfunc (s *Server) Start() error { return nil }\n\nfunc (s *Server) stop() {}\n\nfunc New() *Server { return &Server{} }\n\nfunc Run() {}\n",
        )
        .unwrap();
        let names: Vec<String> = testable_symbols(&unit).into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Start", "New", "Run"]);
    }

    #[test]
    fn no_exported_functions_is_empty_not_error() {
        let unit = parse_unit(Path::new("x.go"), "package x\n\nfunc helper() {}\n").unwrap();
        assert!(testable_symbols(&unit).is_empty());
    }
}
