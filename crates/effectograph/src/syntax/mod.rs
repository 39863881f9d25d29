//! Syntax tree access for TypeScript source units
//!
//! This module wraps tree-sitter with the structural queries the extraction
//! engine needs. It knows nothing about effects; it only answers questions
//! about classes, members, decorators, imports, and diagnostics.

pub mod helpers;
pub mod kinds;
mod unit;

pub use unit::{Diagnostic, Severity, SourceUnit};
