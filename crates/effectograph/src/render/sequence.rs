//! Relation-based sequence diagram renderer
//!
//! Emits one `(input) -> (output) : name` relation per pairing in the
//! cartesian product of an effect's input and output types. Effects with
//! either side absent contribute no relations.

use tracing::trace;

use super::Renderer;
use crate::core::{DiagramModel, EffectDefinition, EffectError};

const DIRECTION_DIRECTIVE: &str = "left to right direction";

/// Sequence diagram renderer
pub struct SequenceRenderer;

impl SequenceRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_entry(&self, effect: &EffectDefinition) -> Option<String> {
        let inputs = effect.input_types.as_deref()?;
        let outputs = effect.output_types.as_deref()?;
        trace!(
            effect = effect.name.as_str(),
            relations = inputs.len() * outputs.len(),
            "rendering sequence relations"
        );

        let mut relations = Vec::with_capacity(inputs.len() * outputs.len());
        for input in inputs {
            for output in outputs {
                relations.push(format!("({}) -> ({}) : {}", input, output, effect.name));
            }
        }
        Some(relations.join("\n"))
    }
}

impl Default for SequenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SequenceRenderer {
    fn render_effects(&self, model: &DiagramModel) -> Result<Vec<String>, EffectError> {
        let mut blocks = vec![DIRECTION_DIRECTIVE.to_string()];
        blocks.extend(
            model
                .effects()
                .iter()
                .filter_map(|effect| self.render_entry(effect)),
        );
        Ok(blocks)
    }
}
