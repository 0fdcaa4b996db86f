//! Graph Validator - Recursive validation of object graphs
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Domain values (violations, outcomes, errors) are independent of traversal
//! - Introspection and its cache describe types; the traversal walks instances
//! - Field-level constraints come from each type's own check, or from `validator`

pub mod cache;
pub mod config;
pub mod constraints;
pub mod domain;
pub mod introspect;
pub mod traversal;

// Re-export main types for convenient access
pub use domain::violations::{GraphError, GraphResult, ValidationOutcome, ValidationResult};

pub use config::ValidatorConfig;

pub use introspect::{
    Descend, IntoNode, MemberInfo, MemberKind, NodeRef, PropertyDescriptor, PropertyValue,
    TypeDescriptor, Validatable,
};

pub use cache::{CacheStatistics, TypeCache};

pub use constraints::{check_with_validator, from_validation_errors};

pub use traversal::{ObjectId, RecursiveValidator, VisitedSet};

/// Validate an object graph with default settings
pub fn validate(root: &dyn Validatable) -> GraphResult<ValidationOutcome> {
    RecursiveValidator::with_defaults().validate(root)
}

/// Validate an object graph, failing with `GraphError::Invalid` on any violation.
///
/// Lets a workflow abort with `?` before doing its unit of work; the error
/// carries every violation with its root-relative member path.
pub fn ensure_valid(root: &dyn Validatable) -> GraphResult<()> {
    let outcome = validate(root)?;

    if outcome.is_valid() {
        return Ok(());
    }

    let results = outcome.into_results();
    tracing::debug!(
        "Rejecting {}: {} violation{}",
        root.type_name(),
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );
    Err(GraphError::Invalid { results })
}
