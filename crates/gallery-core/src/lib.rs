//! gallery-core: shared types for the gallery workspace.
//!
//! This crate is the foundational dependency for the other gallery crates,
//! providing the unified error type, typed integer identifiers for photos
//! and collections, and path helpers used by the thumbnail scanner.

pub mod error;
pub mod ids;
pub mod paths;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
