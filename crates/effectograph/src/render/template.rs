//! Template-driven activity renderer
//!
//! Delegates per-effect rendering to an external text template selected by
//! the effect's first tagging decorator. The decorator name, stripped of
//! leading underscores and converted to its dash-separated form, names a
//! `.puml` file in the template directory. The loaded template is an opaque
//! text-substitution function over `{{effectName}}`, `{{inputActions}}`,
//! `{{outputActions}}`, and the `{{firstEntry ...}}` variants; its own
//! document markers are stripped before the result is spliced into the
//! surrounding document.
//!
//! Templates are re-read on every render; there is no caching.

use std::fs;
use std::path::PathBuf;

use tracing::trace;

use super::{action_node, Renderer};
use crate::core::{DiagramModel, EffectDefinition, EffectError};

const TEMPLATE_EXTENSION: &str = "puml";

/// Activity renderer backed by per-decorator templates
pub struct TemplateActivityRenderer {
    template_dir: PathBuf,
}

impl TemplateActivityRenderer {
    /// Create a renderer resolving templates from the default directory
    pub fn new() -> Self {
        Self {
            template_dir: Self::default_template_dir(),
        }
    }

    /// Create a renderer with an explicit template directory
    pub fn with_template_dir(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    /// The `templates` directory next to the running executable
    pub fn default_template_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("templates")))
            .unwrap_or_else(|| PathBuf::from("templates"))
    }

    fn render_entry(&self, effect: &EffectDefinition) -> Result<String, EffectError> {
        let decorator = effect
            .tagging_decorators
            .as_ref()
            .and_then(|decorators| decorators.first())
            .ok_or_else(|| EffectError::no_tagging_decorator(&effect.name))?;

        let key = template_key(decorator);
        let path = self
            .template_dir
            .join(format!("{}.{}", key, TEMPLATE_EXTENSION));
        trace!(effect = effect.name.as_str(), template = %path.display(), "loading template");

        let template = fs::read_to_string(&path)?;
        Ok(instantiate(&template, effect))
    }
}

impl Default for TemplateActivityRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TemplateActivityRenderer {
    fn render_effects(&self, model: &DiagramModel) -> Result<Vec<String>, EffectError> {
        model
            .effects()
            .iter()
            .map(|effect| self.render_entry(effect))
            .collect()
    }
}

/// Template lookup key for a tagging decorator name
///
/// Leading underscores are dropped and the remainder is dash-separated:
/// `_ContentBasedDecider` becomes `content-based-decider`.
pub fn template_key(decorator: &str) -> String {
    kebab_case(decorator.trim_start_matches('_'))
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() {
                if prev_lower_or_digit {
                    out.push('-');
                }
                out.extend(ch.to_lowercase());
                prev_lower_or_digit = false;
            } else {
                out.push(ch);
                prev_lower_or_digit = true;
            }
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
            prev_lower_or_digit = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Substitute the effect's fields into a loaded template and strip the
/// template's own document markers
fn instantiate(template: &str, effect: &EffectDefinition) -> String {
    let inputs = effect.input_types.as_deref().unwrap_or(&[]);
    let outputs = effect.output_types.as_deref().unwrap_or(&[]);

    let first_of = |names: &[String]| names.first().cloned().unwrap_or_default();

    template
        .replace("{{firstEntry inputActions}}", &first_of(inputs))
        .replace("{{firstEntry outputActions}}", &first_of(outputs))
        .replace("{{inputActions}}", &action_lines(inputs))
        .replace("{{outputActions}}", &action_lines(outputs))
        .replace("{{effectName}}", &effect.name)
        .replacen("@startuml", "", 1)
        .replacen("@enduml", "", 1)
        .trim()
        .to_string()
}

fn action_lines(names: &[String]) -> String {
    names
        .iter()
        .map(|name| action_node(name))
        .collect::<Vec<_>>()
        .join("\n")
}
