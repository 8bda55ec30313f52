//! Ermine property-based testing library.
//!
//! This is the main entry point for the Ermine library, re-exporting
//! the engine: generators with integrated shrinking, splittable seeds,
//! and the property runner.

pub use ermine_core::*;
