//! Domain layer for Graph Validator
//!
//! Violations, outcomes and traversal errors, independent of how object
//! graphs are introspected or walked.

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
