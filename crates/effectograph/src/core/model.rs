//! The renderer-agnostic diagram model
//!
//! An [`EffectDefinition`] is one extracted effect; a [`DiagramModel`] is the
//! ordered collection of effects for one source file. Both are plain data,
//! created fresh per analysis pass and discarded once the diagram text is
//! produced.

/// One extracted reactive effect definition
///
/// The optional sequences are either absent or non-empty; an empty resolved
/// list is represented as `None`, never as `Some(vec![])`. Element order is
/// source declaration order and is preserved into rendering, where it
/// controls branch order in fork/split constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDefinition {
    /// Identifier of the decorated class member
    pub name: String,
    /// Names of secondary decorators on the member, in source order,
    /// excluding the primary `Effect` decorator
    pub tagging_decorators: Option<Vec<String>>,
    /// Resolved action-type names (or raw discriminator literals when
    /// unresolved) consumed by the pipeline
    pub input_types: Option<Vec<String>>,
    /// Action-type names produced by the pipeline, from its declared
    /// generic result type
    pub output_types: Option<Vec<String>>,
}

impl EffectDefinition {
    /// Create an effect definition with no decorators and no resolved types
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagging_decorators: None,
            input_types: None,
            output_types: None,
        }
    }

    /// Attach tagging decorator names, normalizing an empty list to absent
    pub fn with_tagging_decorators(mut self, decorators: Vec<String>) -> Self {
        self.tagging_decorators = non_empty(decorators);
        self
    }

    /// Attach input type names, normalizing an empty list to absent
    pub fn with_input_types(mut self, inputs: Vec<String>) -> Self {
        self.input_types = non_empty(inputs);
        self
    }

    /// Attach output type names, normalizing an empty list to absent
    pub fn with_output_types(mut self, outputs: Vec<String>) -> Self {
        self.output_types = non_empty(outputs);
        self
    }
}

/// Normalize a possibly-empty list into the "absent" representation
pub fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Ordered collection of effect definitions for one source file
///
/// Produced once per file, consumed exactly once by a renderer, immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramModel {
    effects: Vec<EffectDefinition>,
}

impl DiagramModel {
    pub fn new(effects: Vec<EffectDefinition>) -> Self {
        Self { effects }
    }

    pub fn effects(&self) -> &[EffectDefinition] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

impl From<Vec<EffectDefinition>> for DiagramModel {
    fn from(effects: Vec<EffectDefinition>) -> Self {
        Self::new(effects)
    }
}
