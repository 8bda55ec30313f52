//! Core engine for Ermine property-based testing.
//!
//! This crate provides the building blocks of the engine: splittable
//! seeds, sized ranges over pluggable arithmetic, lazy shrink trees,
//! generator combinators, and the property runner.

pub mod data;
pub mod error;
pub mod gen;
pub mod numeric;
pub mod property;
pub mod range;
pub mod shrink;
pub mod tree;

// Re-export the main types
pub use data::*;
pub use error::*;
pub use gen::*;
pub use numeric::*;
pub use property::*;
pub use range::*;
pub use shrink::*;
pub use tree::*;
