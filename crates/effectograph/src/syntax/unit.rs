//! Parsed source units
//!
//! A [`SourceUnit`] wraps one parsed TypeScript file and exposes the
//! structural queries the extraction engine needs: class enumeration,
//! instance members, heritage names, import resolution, and syntax
//! diagnostics. Units are cheap, file-scoped, and never shared across
//! analysis passes.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Tree};

use super::helpers::{
    find_child_by_kind, find_children_by_kind, is_static, named_children, node_text,
    string_literal_value, walk_preorder,
};
use super::kinds;
use crate::core::EffectError;

/// Severity of a syntax diagnostic
///
/// tree-sitter ERROR nodes are reported as [`Severity::Error`] and halt
/// processing of the file; MISSING nodes (recovered-from omissions) are
/// reported as [`Severity::Warning`] and do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One syntax diagnostic with a 1-indexed source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{} at {}:{}: {}", label, self.line, self.column, self.message)
    }
}

/// One parsed TypeScript source unit
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse a source string into a unit
    ///
    /// The path is kept for diagnostics and relative import resolution; use
    /// [`SourceUnit::load`] to read and parse a file from disk.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self, EffectError> {
        let path = path.into();
        let source = source.into();

        let mut parser = Parser::new();
        let language = tree_sitter_typescript::language_typescript();
        parser.set_language(&language).map_err(|e| {
            EffectError::parse_failure(path.display().to_string(), format!("grammar error: {}", e))
        })?;

        let tree = parser.parse(&source, None).ok_or_else(|| {
            EffectError::parse_failure(path.display().to_string(), "parser produced no tree")
        })?;

        trace!(path = %path.display(), bytes = source.len(), "parsed source unit");

        Ok(Self { path, source, tree })
    }

    /// Read and parse a file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EffectError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Self::parse(path, source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node of the syntax tree
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node of this unit's tree
    pub fn text(&self, node: &Node) -> &str {
        node_text(node, &self.source)
    }

    /// Collect syntax diagnostics for the whole unit
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        walk_preorder(self.root(), &mut |node: &Node| {
            if node.is_error() {
                let position = node.start_position();
                let snippet: String = self.text(node).chars().take(40).collect();
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    message: format!("unexpected or invalid syntax near `{}`", snippet),
                    line: position.row + 1,
                    column: position.column + 1,
                });
            } else if node.is_missing() {
                let position = node.start_position();
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: format!("missing `{}`", node.kind()),
                    line: position.row + 1,
                    column: position.column + 1,
                });
            }
        });
        diagnostics
    }

    /// Check whether the unit has any error-severity diagnostics
    pub fn has_errors(&self) -> bool {
        self.root().has_error()
    }

    /// Enumerate the class declarations of the unit
    ///
    /// Classes nested under `export` statements are included; class
    /// expressions inside function bodies are not, matching the behavior of
    /// a per-file declaration scan.
    pub fn classes(&self) -> Vec<Node<'_>> {
        let mut classes = Vec::new();
        let root = self.root();
        for i in 0..root.named_child_count() {
            let Some(child) = root.named_child(i) else {
                continue;
            };
            match child.kind() {
                kinds::CLASS_DECLARATION => classes.push(child),
                kinds::EXPORT_STATEMENT => {
                    if let Some(declaration) = child.child_by_field_name("declaration") {
                        if declaration.kind() == kinds::CLASS_DECLARATION {
                            classes.push(declaration);
                        }
                    }
                }
                _ => {}
            }
        }
        classes
    }

    /// Name of a class declaration
    pub fn class_name(&self, class: &Node) -> Option<String> {
        class
            .child_by_field_name("name")
            .map(|name| self.text(&name).to_string())
    }

    /// Enumerate the instance members of a class (fields and methods,
    /// excluding static members)
    pub fn instance_members<'t>(&self, class: &Node<'t>) -> Vec<Node<'t>> {
        let Some(body) = class.child_by_field_name("body") else {
            return Vec::new();
        };
        let mut members = Vec::new();
        for i in 0..body.named_child_count() {
            let Some(member) = body.named_child(i) else {
                continue;
            };
            let is_member_kind = matches!(
                member.kind(),
                kinds::PUBLIC_FIELD_DEFINITION | kinds::METHOD_DEFINITION
            );
            if is_member_kind && !is_static(&member) {
                members.push(member);
            }
        }
        members
    }

    /// Names appearing in a class's `extends`/`implements` clauses
    pub fn heritage_names(&self, class: &Node) -> Vec<String> {
        let Some(heritage) = find_child_by_kind(class, kinds::CLASS_HERITAGE) else {
            return Vec::new();
        };
        let mut names = Vec::new();
        for clause_kind in [kinds::EXTENDS_CLAUSE, kinds::IMPLEMENTS_CLAUSE] {
            for clause in find_children_by_kind(&heritage, clause_kind) {
                for basis in named_children(&clause) {
                    if basis.kind() == kinds::TYPE_ARGUMENTS {
                        continue;
                    }
                    names.push(self.text(&basis).to_string());
                }
            }
        }
        names
    }

    /// Module specifiers of the unit's import declarations, in source order
    pub fn import_specifiers(&self) -> Vec<String> {
        let root = self.root();
        find_children_by_kind(&root, kinds::IMPORT_STATEMENT)
            .iter()
            .filter_map(|import| import.child_by_field_name("source"))
            .map(|source| string_literal_value(&source, &self.source).to_string())
            .collect()
    }

    /// Parse the units behind the statically resolvable relative imports
    ///
    /// Package imports (bare specifiers) and relative imports whose file
    /// cannot be found or read are skipped. Results are in import order.
    pub fn resolved_imports(&self) -> Vec<SourceUnit> {
        let Some(base_dir) = self.path.parent() else {
            return Vec::new();
        };
        let mut units = Vec::new();
        for specifier in self.import_specifiers() {
            if !specifier.starts_with("./") && !specifier.starts_with("../") {
                trace!(specifier = specifier.as_str(), "skipping package import");
                continue;
            }
            match resolve_module_path(base_dir, &specifier) {
                Some(module_path) => match SourceUnit::load(&module_path) {
                    Ok(unit) => units.push(unit),
                    Err(e) => {
                        debug!(specifier = specifier.as_str(), error = %e, "failed to load imported unit");
                    }
                },
                None => {
                    debug!(specifier = specifier.as_str(), "relative import does not resolve to a file");
                }
            }
        }
        units
    }
}

/// Resolve a relative module specifier against a base directory
///
/// Tries the specifier verbatim, then with the TypeScript extensions, then
/// as a directory index.
fn resolve_module_path(base_dir: &Path, specifier: &str) -> Option<PathBuf> {
    let stem = base_dir.join(specifier);
    let candidates = [
        stem.clone(),
        PathBuf::from(format!("{}.ts", stem.display())),
        PathBuf::from(format!("{}.tsx", stem.display())),
        stem.join("index.ts"),
    ];
    candidates.into_iter().find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source_has_no_errors() {
        let unit = SourceUnit::parse("test.ts", "export class Foo {}").unwrap();
        assert!(!unit.has_errors());
        assert!(unit.diagnostics().is_empty());
    }

    #[test]
    fn test_diagnostics_for_broken_source() {
        let unit = SourceUnit::parse("broken.ts", "class {{{ ???").unwrap();
        assert!(unit.has_errors());
        let diagnostics = unit.diagnostics();
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().any(Diagnostic::is_error));
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            message: "unexpected token".to_string(),
            line: 3,
            column: 14,
        };
        assert_eq!(format!("{}", diagnostic), "error at 3:14: unexpected token");
    }

    #[test]
    fn test_classes_includes_exported_declarations() {
        let source = r#"
export class Exported {}
class Local {}
function notAClass() {}
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        let classes = unit.classes();
        let names: Vec<String> = classes
            .iter()
            .filter_map(|c| unit.class_name(c))
            .collect();
        assert_eq!(names, vec!["Exported", "Local"]);
    }

    #[test]
    fn test_instance_members_excludes_static() {
        let source = r#"
class Foo {
    static counter = 0;
    first = 1;
    second(): void {}
}
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        let classes = unit.classes();
        let members = unit.instance_members(&classes[0]);
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_heritage_names() {
        let source = r#"
class A extends Base implements CommandAction, Other {}
class B implements EventAction {}
class C {}
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        let classes = unit.classes();
        assert_eq!(
            unit.heritage_names(&classes[0]),
            vec!["Base", "CommandAction", "Other"]
        );
        assert_eq!(unit.heritage_names(&classes[1]), vec!["EventAction"]);
        assert!(unit.heritage_names(&classes[2]).is_empty());
    }

    #[test]
    fn test_import_specifiers_in_source_order() {
        let source = r#"
import { Effect } from '@ngrx/effects';
import { FooCommand } from './foo.actions';
import { BarEvent } from '../events/bar';
"#;
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        assert_eq!(
            unit.import_specifiers(),
            vec!["@ngrx/effects", "./foo.actions", "../events/bar"]
        );
    }

    #[test]
    fn test_resolved_imports_skips_unresolvable() {
        let source = r#"
import { Effect } from '@ngrx/effects';
import { Missing } from './does-not-exist';
"#;
        let unit = SourceUnit::parse("/nonexistent/dir/test.ts", source).unwrap();
        assert!(unit.resolved_imports().is_empty());
    }

    #[test]
    fn test_resolved_imports_loads_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let actions_path = dir.path().join("layout.actions.ts");
        fs::write(&actions_path, "export class OpenSidenavCommand {}").unwrap();

        let effects_path = dir.path().join("layout.effects.ts");
        let source = "import { OpenSidenavCommand } from './layout.actions';";
        fs::write(&effects_path, source).unwrap();

        let unit = SourceUnit::load(&effects_path).unwrap();
        let imports = unit.resolved_imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].classes().len(), 1);
    }
}
