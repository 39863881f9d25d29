//! Core error types for effect extraction and diagram rendering
//!
//! This module defines the error taxonomy shared by the extraction and
//! rendering pipeline. Extraction-time ambiguities (unresolved
//! discriminators) are not errors; they degrade gracefully inside the
//! extractor. Everything here is a condition the caller has to act on.

use thiserror::Error;

/// Errors produced while analysing a source unit or rendering its diagram
#[derive(Error, Debug)]
pub enum EffectError {
    /// The source unit has error-severity syntax diagnostics. Extraction
    /// never runs on such a unit.
    #[error("compile diagnostics in {path}: {}", .messages.join("; "))]
    CompileDiagnostics { path: String, messages: Vec<String> },

    /// No `@Effect()` decorated members were found. The batch driver treats
    /// this as fatal for the file, not for the run.
    #[error("no effect definitions found in {path}")]
    NoEffectsFound { path: String },

    /// A tagging decorator supplied explicit input/output references in an
    /// unsupported shape.
    #[error("malformed tagging decorator arguments on member '{member}': {message}")]
    MalformedAnnotationArguments { member: String, message: String },

    /// The requested diagram type is not one of the supported kinds.
    #[error("unsupported diagram type '{diagram_type}', expected one of: activity, template-activity, sequence")]
    UnsupportedDiagramType { diagram_type: String },

    /// The template-driven renderer needs a tagging decorator to select a
    /// template, and the effect has none.
    #[error("no tagging decorator to select a template for effect '{effect}'")]
    NoTaggingDecoratorForTemplate { effect: String },

    /// The grammar could not be loaded or the parser produced no tree.
    #[error("failed to parse {path}: {message}")]
    ParseFailure { path: String, message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl EffectError {
    /// Create a new compile-diagnostics error
    pub fn compile_diagnostics(path: impl Into<String>, messages: Vec<String>) -> Self {
        Self::CompileDiagnostics {
            path: path.into(),
            messages,
        }
    }

    /// Create a new no-effects-found error
    pub fn no_effects_found(path: impl Into<String>) -> Self {
        Self::NoEffectsFound { path: path.into() }
    }

    /// Create a new malformed-annotation-arguments error
    pub fn malformed_annotation_arguments(
        member: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedAnnotationArguments {
            member: member.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported-diagram-type error
    pub fn unsupported_diagram_type(diagram_type: impl Into<String>) -> Self {
        Self::UnsupportedDiagramType {
            diagram_type: diagram_type.into(),
        }
    }

    /// Create a new no-tagging-decorator error
    pub fn no_tagging_decorator(effect: impl Into<String>) -> Self {
        Self::NoTaggingDecoratorForTemplate {
            effect: effect.into(),
        }
    }

    /// Create a new parse-failure error
    pub fn parse_failure(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            path: path.into(),
            message: message.into(),
        }
    }
}
