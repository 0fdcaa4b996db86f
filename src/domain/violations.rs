//! Core domain models for constraint violations and validation outcomes
//!
//! Architecture: Value Objects - Violations are immutable once created
//! - ValidationResult carries a message and the member paths it applies to
//! - Re-rooting a violation under a parent property produces a new value
//! - ValidationOutcome aggregates every violation found in one traversal

use std::fmt;

/// A single constraint violation with the member paths it applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationResult {
    message: String,
    member_names: Vec<String>,
}

impl ValidationResult {
    /// Create a new violation for the given members
    pub fn new<I, S>(message: impl Into<String>, member_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            member_names: member_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a violation that applies to a single member
    pub fn for_member(message: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            member_names: vec![member.into()],
        }
    }

    /// Human-readable description of the violation
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Member paths this violation applies to, relative to the traversal root
    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    /// Re-root this violation under a parent property.
    ///
    /// Every member path becomes `prefix + separator + path`.
    pub fn with_prefix(&self, prefix: &str, separator: &str) -> Self {
        Self {
            message: self.message.clone(),
            member_names: self
                .member_names
                .iter()
                .map(|member| format!("{prefix}{separator}{member}"))
                .collect(),
        }
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        if self.member_names.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.member_names.join(", "), self.message)
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_display())
    }
}

/// Aggregated result of validating an object graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    is_valid: bool,
    results: Vec<ValidationResult>,
}

impl ValidationOutcome {
    pub(crate) fn new(is_valid: bool, results: Vec<ValidationResult>) -> Self {
        Self { is_valid, results }
    }

    /// An outcome with no violations
    pub fn valid() -> Self {
        Self::new(true, Vec::new())
    }

    /// Whether every node in the graph passed its constraint check
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// All violations in depth-first, property-declaration order
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Consume the outcome, returning the violations
    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    /// Split into the `(all_valid, results)` pair
    pub fn into_parts(self) -> (bool, Vec<ValidationResult>) {
        (self.is_valid, self.results)
    }

    /// Violations that apply to the given member path
    pub fn results_for<'a>(&'a self, member: &'a str) -> impl Iterator<Item = &'a ValidationResult> {
        self.results
            .iter()
            .filter(move |r| r.member_names.iter().any(|m| m == member))
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::valid()
    }
}

/// Error types that can occur while traversing an object graph
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A property accessor could not read its value
    #[error("Access error on {type_name}.{property}: {message}")]
    Access {
        type_name: String,
        property: String,
        message: String,
    },

    /// The graph was deeper than the configured limit
    #[error("Depth limit of {limit} exceeded at '{path}'")]
    DepthExceeded { limit: usize, path: String },

    /// Configuration could not be loaded or was rejected
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The graph failed validation
    #[error("Validation failed with {} violation(s)", .results.len())]
    Invalid { results: Vec<ValidationResult> },
}

impl GraphError {
    /// Create an accessor error
    pub fn access(
        type_name: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Access {
            type_name: type_name.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Violations carried by an `Invalid` error
    pub fn violations(&self) -> &[ValidationResult] {
        match self {
            Self::Invalid { results } => results,
            _ => &[],
        }
    }
}

/// Result type for graph validation operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = ValidationResult::new("required", ["City", "Zip"]);

        assert_eq!(result.message(), "required");
        assert_eq!(result.member_names(), ["City", "Zip"]);
    }

    #[test]
    fn test_with_prefix_rewrites_every_member() {
        let result = ValidationResult::new("required", ["City", "Zip"]);
        let prefixed = result.with_prefix("Address", ".");

        assert_eq!(prefixed.member_names(), ["Address.City", "Address.Zip"]);
        assert_eq!(prefixed.message(), "required");
        // receiver unchanged
        assert_eq!(result.member_names(), ["City", "Zip"]);
    }

    #[test]
    fn test_prefix_composes() {
        let result = ValidationResult::for_member("required", "City")
            .with_prefix("Address", ".")
            .with_prefix("Customer", ".");

        assert_eq!(result.member_names(), ["Customer.Address.City"]);
    }

    #[test]
    fn test_prefix_without_members() {
        let result = ValidationResult::new("object invalid", Vec::<String>::new());
        assert!(result.with_prefix("Child", ".").member_names().is_empty());
    }

    #[test]
    fn test_display() {
        let result = ValidationResult::new("required", ["City", "Zip"]);
        assert_eq!(result.to_string(), "City, Zip: required");

        let bare = ValidationResult::new("broken", Vec::<String>::new());
        assert_eq!(bare.to_string(), "broken");
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = ValidationOutcome::new(
            false,
            vec![
                ValidationResult::for_member("required", "Name"),
                ValidationResult::for_member("too long", "Child.Name"),
            ],
        );

        assert!(!outcome.is_valid());
        assert_eq!(outcome.results_for("Child.Name").count(), 1);
        assert_eq!(outcome.results_for("Missing").count(), 0);

        let (valid, results) = outcome.into_parts();
        assert!(!valid);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_error_messages() {
        let err = GraphError::access("Order", "Customer", "lock poisoned");
        assert_eq!(err.to_string(), "Access error on Order.Customer: lock poisoned");

        let err = GraphError::Invalid {
            results: vec![ValidationResult::for_member("required", "Name")],
        };
        assert_eq!(err.to_string(), "Validation failed with 1 violation(s)");
        assert_eq!(err.violations().len(), 1);

        assert!(GraphError::config("bad").violations().is_empty());
    }
}
