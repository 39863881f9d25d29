//! Action-type registry
//!
//! Maps discriminator literals (the property-access text of an action
//! class's `type` field, e.g. `LayoutCommandTypes.OpenSidenav`) to the
//! declaring class's name. The registry is rebuilt per source file from the
//! file's own class declarations and the declarations of its statically
//! resolvable relative imports; nothing is cached across files.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace, warn};
use tree_sitter::Node;

use crate::syntax::helpers::{member_name_node, node_text, string_literal_value};
use crate::syntax::{kinds, SourceUnit};

/// Recognized message-category base declarations
///
/// A class participates in the registry when its `extends`/`implements`
/// basis names one of these.
pub const ACTION_BASE_NAMES: [&str; 3] = ["CommandAction", "DocumentAction", "EventAction"];

/// The name of the nominal discriminator field on action classes
const DISCRIMINATOR_FIELD: &str = "type";

/// Discriminator literal → declared action class name
///
/// Duplicate discriminators keep the first registration; imported units are
/// scanned before the local unit, declaration order within each.
#[derive(Debug, Default)]
pub struct ActionTypeRegistry {
    entries: HashMap<String, String>,
}

impl ActionTypeRegistry {
    /// Build the registry for one source unit and its imports
    pub fn build(unit: &SourceUnit) -> Self {
        let mut registry = Self::default();
        for imported in unit.resolved_imports() {
            registry.scan(&imported);
        }
        registry.scan(unit);
        debug!(entries = registry.len(), "action-type registry built");
        registry
    }

    fn scan(&mut self, unit: &SourceUnit) {
        for class in unit.classes() {
            if !is_action_class(unit, &class) {
                continue;
            }
            let Some(class_name) = unit.class_name(&class) else {
                continue;
            };
            match discriminator_of(unit, &class) {
                Some(discriminator) => self.insert_first(discriminator, class_name),
                None => {
                    trace!(class = class_name.as_str(), "action class without a discriminator field");
                }
            }
        }
    }

    fn insert_first(&mut self, discriminator: String, class_name: String) {
        match self.entries.entry(discriminator) {
            Entry::Occupied(existing) => {
                debug!(
                    discriminator = existing.key().as_str(),
                    kept = existing.get().as_str(),
                    ignored = class_name.as_str(),
                    "duplicate discriminator, first registration wins"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(class_name);
            }
        }
    }

    /// Look up the class name registered for a discriminator
    pub fn resolve(&self, discriminator: &str) -> Option<&str> {
        self.entries.get(discriminator).map(String::as_str)
    }

    /// Resolve a discriminator, falling back to the literal itself
    ///
    /// An unresolved discriminator is not an error; the literal is used as
    /// the type name and a warning is logged.
    pub fn resolve_or_literal(&self, discriminator: &str) -> String {
        match self.resolve(discriminator) {
            Some(class_name) => class_name.to_string(),
            None => {
                warn!(discriminator, "no action class matches discriminator, using literal");
                discriminator.to_string()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check whether a class is based on one of the recognized action categories
fn is_action_class(unit: &SourceUnit, class: &Node) -> bool {
    unit.heritage_names(class)
        .iter()
        .any(|basis| ACTION_BASE_NAMES.contains(&basis.as_str()))
}

/// Read the literal value of the class's `type` field initializer
///
/// Discriminators are declared either as a property access on a type-enum
/// (`LayoutCommandTypes.OpenSidenav`) or as a plain string literal; both
/// index by their literal text.
fn discriminator_of(unit: &SourceUnit, class: &Node) -> Option<String> {
    for member in unit.instance_members(class) {
        if member.kind() != kinds::PUBLIC_FIELD_DEFINITION {
            continue;
        }
        let Some(name) = member_name_node(&member) else {
            continue;
        };
        if node_text(&name, unit.source()) != DISCRIMINATOR_FIELD {
            continue;
        }
        let value = member.child_by_field_name("value")?;
        return match value.kind() {
            kinds::MEMBER_EXPRESSION => Some(unit.text(&value).to_string()),
            kinds::STRING => Some(string_literal_value(&value, unit.source()).to_string()),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIONS: &str = r#"
export enum LayoutCommandTypes {
    OpenSidenav = '[Layout] Open Sidenav',
    CloseSidenav = '[Layout] Close Sidenav'
}

export class OpenSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.OpenSidenav;
}

export class CloseSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.CloseSidenav;
}

export class SidenavOpenedEvent implements EventAction {
    readonly type = LayoutEventTypes.SidenavOpened;
}

export class Unrelated {
    readonly type = LayoutCommandTypes.OpenSidenav;
}
"#;

    fn registry_for(source: &str) -> ActionTypeRegistry {
        let unit = SourceUnit::parse("test.ts", source).unwrap();
        ActionTypeRegistry::build(&unit)
    }

    #[test]
    fn test_build_indexes_action_classes_only() {
        let registry = registry_for(ACTIONS);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.resolve("LayoutCommandTypes.OpenSidenav"),
            Some("OpenSidenavCommand")
        );
        assert_eq!(
            registry.resolve("LayoutEventTypes.SidenavOpened"),
            Some("SidenavOpenedEvent")
        );
    }

    #[test]
    fn test_unrelated_class_is_not_indexed() {
        // `Unrelated` shares a discriminator with OpenSidenavCommand but has
        // no action basis, so the command class must win.
        let registry = registry_for(ACTIONS);
        assert_eq!(
            registry.resolve("LayoutCommandTypes.OpenSidenav"),
            Some("OpenSidenavCommand")
        );
    }

    #[test]
    fn test_duplicate_discriminator_first_match_wins() {
        let source = r#"
export class FirstCommand implements CommandAction {
    readonly type = Types.Shared;
}
export class SecondCommand implements CommandAction {
    readonly type = Types.Shared;
}
"#;
        let registry = registry_for(source);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("Types.Shared"), Some("FirstCommand"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry_for(ACTIONS);
        let first = registry.resolve_or_literal("LayoutCommandTypes.CloseSidenav");
        let second = registry.resolve_or_literal("LayoutCommandTypes.CloseSidenav");
        assert_eq!(first, second);
        assert_eq!(first, "CloseSidenavCommand");
    }

    #[test]
    fn test_unresolved_discriminator_degrades_to_literal() {
        let registry = registry_for(ACTIONS);
        assert_eq!(registry.resolve("Types.Unknown"), None);
        assert_eq!(registry.resolve_or_literal("Types.Unknown"), "Types.Unknown");
    }

    #[test]
    fn test_extends_basis_is_recognized() {
        let source = r#"
export class SaveDocument extends DocumentAction {
    readonly type = DocTypes.Save;
}
"#;
        let registry = registry_for(source);
        assert_eq!(registry.resolve("DocTypes.Save"), Some("SaveDocument"));
    }

    #[test]
    fn test_string_literal_discriminator_is_indexed_by_value() {
        let source = r#"
export class OddCommand implements CommandAction {
    readonly type = '[Odd] Go';
}
"#;
        let registry = registry_for(source);
        assert_eq!(registry.resolve("[Odd] Go"), Some("OddCommand"));
    }

    #[test]
    fn test_action_class_with_computed_discriminator_is_skipped() {
        let source = r#"
export class OddCommand implements CommandAction {
    readonly type = makeType();
}
"#;
        let registry = registry_for(source);
        assert!(registry.is_empty());
    }
}
