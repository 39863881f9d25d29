//! Branching activity diagram renderer
//!
//! Each effect renders as an input lane and an output lane. Multiple inputs
//! converge through a `fork` construct; multiple outputs fan out through a
//! `split` construct whose branches each end in `detach`, since an output
//! split represents independent, non-rejoining continuations.

use tracing::trace;

use super::{action_node, Renderer};
use crate::core::{DiagramModel, EffectDefinition, EffectError};

/// Activity diagram renderer
pub struct ActivityRenderer;

impl ActivityRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_entry(&self, effect: &EffectDefinition) -> String {
        trace!(effect = effect.name.as_str(), "rendering activity entry");
        let mut lines = Vec::new();

        // Narration edges: what triggers the effect, and how it is classified
        lines.push(format!("(*) --> \"{}\"", effect.name));
        if let Some(decorators) = &effect.tagging_decorators {
            lines.push(format!("(*) --> \"{}\"", decorators.join(", ")));
        }

        lines.push("|In|".to_string());
        match effect.input_types.as_deref() {
            None | Some([]) => {}
            Some([single]) => lines.push(action_node(single)),
            Some(inputs) => {
                lines.push("fork".to_string());
                for (i, input) in inputs.iter().enumerate() {
                    if i > 0 {
                        lines.push("fork again".to_string());
                    }
                    lines.push(action_node(input));
                }
                lines.push("end fork".to_string());
            }
        }

        lines.push("|Out|".to_string());
        match effect.output_types.as_deref() {
            None | Some([]) => {
                lines.push("detach".to_string());
            }
            Some([single]) => {
                lines.push(action_node(single));
                lines.push("detach".to_string());
            }
            Some(outputs) => {
                lines.push("split".to_string());
                for (i, output) in outputs.iter().enumerate() {
                    if i > 0 {
                        lines.push("split again".to_string());
                    }
                    lines.push(action_node(output));
                    lines.push("detach".to_string());
                }
                lines.push("end split".to_string());
            }
        }

        lines.join("\n")
    }
}

impl Default for ActivityRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ActivityRenderer {
    fn render_effects(&self, model: &DiagramModel) -> Result<Vec<String>, EffectError> {
        Ok(model
            .effects()
            .iter()
            .map(|effect| self.render_entry(effect))
            .collect())
    }
}
