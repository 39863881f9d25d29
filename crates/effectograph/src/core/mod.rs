//! Core types for effect extraction and diagram rendering
//!
//! This module defines the error taxonomy, the renderer-agnostic diagram
//! model, and the logging infrastructure shared by the pipeline.

mod error;
pub mod logging;
mod model;

pub use error::*;
pub use logging::*;
pub use model::*;
