//! Effectograph - Extract reactive effect definitions from TypeScript and
//! render them as PlantUML diagrams
//!
//! A library for locating `@Effect()` decorated class members in TypeScript
//! sources, recovering the action types they consume and produce, and
//! rendering the result as PlantUML activity or sequence diagrams.
//!
//! # Quick Start
//!
//! ```rust
//! use effectograph::{generate, DiagramType};
//!
//! let source = r#"
//! export class LayoutEffects {
//!     @Effect()
//!     SIDENAV_OPENED: Observable<SidenavOpenedEvent> = this.actions.pipe(
//!         ofType(LayoutCommandTypes.OpenSidenav),
//!         map(() => new SidenavOpenedEvent())
//!     );
//! }
//! "#;
//!
//! let puml = generate(source, DiagramType::Activity).unwrap();
//! assert!(puml.starts_with("@startuml"));
//! assert!(puml.contains("SIDENAV_OPENED"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use effectograph::extract::EffectExtractor;
//! use effectograph::render::{DiagramType, PumlRenderer};
//! use effectograph::syntax::SourceUnit;
//! use effectograph::DiagramModel;
//!
//! let source = "export class Empty {}";
//!
//! // Parse into a source unit and check diagnostics first
//! let unit = SourceUnit::parse("empty.ts", source).unwrap();
//! assert!(!unit.has_errors());
//!
//! // Extract the effect definitions
//! let effects = EffectExtractor::new(&unit).extract().unwrap();
//! assert!(effects.is_empty());
//!
//! // Render whatever was found
//! let renderer = PumlRenderer::new(DiagramType::Sequence);
//! let puml = renderer.output(&DiagramModel::new(effects)).unwrap();
//! assert!(puml.contains("left to right direction"));
//! ```

pub mod core;
pub mod extract;
pub mod render;
pub mod syntax;

pub use core::*;
pub use render::{DiagramType, PumlRenderer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{DiagramModel, EffectDefinition, EffectError};
    pub use crate::extract::{ActionTypeRegistry, EffectExtractor};
    pub use crate::render::{
        ActivityRenderer, DiagramType, PumlRenderer, Renderer, SequenceRenderer,
        TemplateActivityRenderer,
    };
    pub use crate::syntax::{Diagnostic, Severity, SourceUnit};
}

/// Extract effects from a source string and render the diagram document
///
/// This is the simplest way to turn an effects source into PlantUML text.
/// Relative imports cannot be resolved from an in-memory string, so
/// discriminators declared in other files degrade to their literal text;
/// parse from disk with [`syntax::SourceUnit::load`] when cross-file
/// resolution matters.
///
/// # Arguments
/// * `source` - TypeScript source text containing `@Effect()` members
/// * `diagram_type` - The diagram dialect to render
///
/// # Returns
/// * `Ok(String)` - The complete PlantUML document
/// * `Err` - If extraction or rendering fails
pub fn generate(source: &str, diagram_type: DiagramType) -> anyhow::Result<String> {
    let unit = syntax::SourceUnit::parse("<memory>", source)?;
    let effects = extract::EffectExtractor::new(&unit).extract()?;
    let model = DiagramModel::new(effects);
    Ok(PumlRenderer::new(diagram_type).output(&model)?)
}

/// Extract effect definitions from a source string without rendering
///
/// Useful when the extracted model needs to be inspected or post-processed
/// before rendering.
///
/// # Example
/// ```rust
/// use effectograph::extract_effects;
///
/// let source = r#"
/// export class FooEffects {
///     @Effect()
///     LOAD: Observable<LoadedEvent> = this.actions.pipe(ofType(FooTypes.Load));
/// }
/// "#;
///
/// let effects = extract_effects(source).unwrap();
/// assert_eq!(effects.len(), 1);
/// assert_eq!(effects[0].name, "LOAD");
/// ```
pub fn extract_effects(source: &str) -> anyhow::Result<Vec<EffectDefinition>> {
    let unit = syntax::SourceUnit::parse("<memory>", source)?;
    Ok(extract::EffectExtractor::new(&unit).extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
export class LayoutEffects {
    @Effect()
    SIDENAV_OPENED: Observable<SidenavOpenedEvent> = this._actions.pipe(
        ofType(LayoutCommandTypes.OpenSidenav),
        map(() => new SidenavOpenedEvent())
    );
}
"#;

    #[test]
    fn test_generate_activity() {
        let result = generate(SOURCE, DiagramType::Activity);
        assert!(result.is_ok());
        let puml = result.unwrap();
        assert!(puml.starts_with("@startuml"));
        assert!(puml.ends_with("@enduml"));
        assert!(puml.contains("|In|"));
        assert!(puml.contains("|Out|"));
    }

    #[test]
    fn test_generate_sequence() {
        let result = generate(SOURCE, DiagramType::Sequence);
        assert!(result.is_ok());
        let puml = result.unwrap();
        assert!(puml.contains("left to right direction"));
        assert!(puml.contains(": SIDENAV_OPENED"));
    }

    #[test]
    fn test_generate_source_without_effects() {
        let result = generate("export class Plain {}", DiagramType::Activity);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "@startuml\n@enduml");
    }

    #[test]
    fn test_extract_effects_resolves_local_discriminators() {
        let source = r#"
export class OpenSidenavCommand implements CommandAction {
    readonly type = LayoutCommandTypes.OpenSidenav;
}
export class LayoutEffects {
    @Effect()
    SIDENAV_OPENED: Observable<SidenavOpenedEvent> = this._actions.pipe(
        ofType(LayoutCommandTypes.OpenSidenav)
    );
}
"#;
        let effects = extract_effects(source).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(
            effects[0].input_types.as_deref(),
            Some(&["OpenSidenavCommand".to_string()][..])
        );
    }
}
