//! Diagram rendering engine
//!
//! Turns a [`DiagramModel`] into PlantUML text. Three interchangeable
//! renderers sit behind one dispatch: the branching activity renderer, the
//! template-driven activity renderer, and the relation-based sequence
//! renderer. [`PumlRenderer`] selects the strategy and wraps the rendered
//! blocks in the `@startuml`/`@enduml` document envelope.

mod activity;
mod sequence;
mod template;

pub use activity::ActivityRenderer;
pub use sequence::SequenceRenderer;
pub use template::TemplateActivityRenderer;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, span, Level};

use crate::core::{DiagramModel, EffectError};

const DOCUMENT_HEADER: &str = "@startuml";
const DOCUMENT_FOOTER: &str = "@enduml";

/// The supported diagram kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramType {
    /// Branching activity diagram with fork/split lanes
    Activity,
    /// Activity diagram rendered through per-decorator templates
    TemplateActivity,
    /// Relation-based sequence diagram
    Sequence,
}

impl DiagramType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Activity => "activity",
            DiagramType::TemplateActivity => "template-activity",
            DiagramType::Sequence => "sequence",
        }
    }

    /// Get all valid diagram type names
    pub fn variants() -> &'static [&'static str] {
        &["activity", "template-activity", "sequence"]
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activity" => Ok(DiagramType::Activity),
            "template-activity" => Ok(DiagramType::TemplateActivity),
            "sequence" => Ok(DiagramType::Sequence),
            other => Err(EffectError::unsupported_diagram_type(other)),
        }
    }
}

/// Strategy interface implemented by every diagram renderer
///
/// Returns one rendered text block per effect (the sequence renderer also
/// prepends its direction directive); the caller joins blocks with line
/// breaks inside the document envelope.
pub trait Renderer {
    fn render_effects(&self, model: &DiagramModel) -> Result<Vec<String>, EffectError>;
}

/// Wrap an action name in the activity-node syntax
pub(crate) fn action_node(name: &str) -> String {
    format!(":{};", name)
}

/// Strategy-selecting renderer with the document envelope
pub struct PumlRenderer {
    diagram_type: DiagramType,
    template_dir: Option<PathBuf>,
}

impl PumlRenderer {
    /// Create a renderer for the given diagram type
    ///
    /// The template-driven variant resolves its templates from the default
    /// install-relative directory; use [`PumlRenderer::with_template_dir`]
    /// to override.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            template_dir: None,
        }
    }

    /// Create a renderer with an explicit template directory
    pub fn with_template_dir(diagram_type: DiagramType, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            diagram_type,
            template_dir: Some(template_dir.into()),
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    /// Render the per-effect blocks without the document envelope
    pub fn generate(&self, model: &DiagramModel) -> Result<Vec<String>, EffectError> {
        match self.diagram_type {
            DiagramType::Activity => ActivityRenderer::new().render_effects(model),
            DiagramType::TemplateActivity => {
                let renderer = match &self.template_dir {
                    Some(dir) => TemplateActivityRenderer::with_template_dir(dir),
                    None => TemplateActivityRenderer::new(),
                };
                renderer.render_effects(model)
            }
            DiagramType::Sequence => SequenceRenderer::new().render_effects(model),
        }
    }

    /// Render the complete diagram document: header, blocks, footer
    pub fn output(&self, model: &DiagramModel) -> Result<String, EffectError> {
        let render_span = span!(
            Level::INFO,
            "render_diagram",
            diagram_type = self.diagram_type.as_str(),
            effects = model.len()
        );
        let _enter = render_span.enter();

        let mut parts = vec![DOCUMENT_HEADER.to_string()];
        parts.extend(self.generate(model)?);
        parts.push(DOCUMENT_FOOTER.to_string());

        let document = parts.join("\n");
        debug!(output_len = document.len(), "rendering completed");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EffectDefinition;

    #[test]
    fn test_diagram_type_from_str() {
        assert_eq!(
            DiagramType::from_str("activity").unwrap(),
            DiagramType::Activity
        );
        assert_eq!(
            DiagramType::from_str("template-activity").unwrap(),
            DiagramType::TemplateActivity
        );
        assert_eq!(
            DiagramType::from_str("sequence").unwrap(),
            DiagramType::Sequence
        );
    }

    #[test]
    fn test_unknown_diagram_type_is_rejected() {
        let result = DiagramType::from_str("gantt");
        assert!(matches!(
            result,
            Err(EffectError::UnsupportedDiagramType { ref diagram_type }) if diagram_type == "gantt"
        ));
    }

    #[test]
    fn test_diagram_type_round_trips_through_display() {
        for name in DiagramType::variants() {
            let diagram_type = DiagramType::from_str(name).unwrap();
            assert_eq!(diagram_type.to_string(), *name);
        }
    }

    #[test]
    fn test_output_wraps_blocks_in_envelope() {
        let model = DiagramModel::new(vec![EffectDefinition::new("SIDENAV_OPENED")]);
        let renderer = PumlRenderer::new(DiagramType::Activity);
        let document = renderer.output(&model).unwrap();

        assert!(document.starts_with("@startuml\n"));
        assert!(document.ends_with("\n@enduml"));
        assert!(document.contains("SIDENAV_OPENED"));
    }

    #[test]
    fn test_output_of_empty_model_is_bare_envelope() {
        let model = DiagramModel::new(vec![]);
        let renderer = PumlRenderer::new(DiagramType::Activity);
        let document = renderer.output(&model).unwrap();
        assert_eq!(document, "@startuml\n@enduml");
    }
}
