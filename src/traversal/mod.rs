//! Recursive object-graph validation
//!
//! Architecture: Domain Service - The validator walks a graph from one root
//! - Every reachable object gets its own constraint check exactly once
//! - Child violations are re-rooted under the property that reached them
//! - A per-call visited set bounds the walk on cycles and shared references

use crate::cache::TypeCache;
use crate::config::ValidatorConfig;
use crate::domain::violations::{GraphError, GraphResult, ValidationOutcome, ValidationResult};
use crate::introspect::{NodeRef, PropertyValue, Validatable};
use rayon::prelude::*;
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

/// Reference identity of an object within one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    type_id: TypeId,
    address: usize,
}

impl ObjectId {
    /// Identity of the concrete object behind a trait reference
    pub fn of(object: &dyn Validatable) -> Self {
        Self {
            type_id: object.as_any().type_id(),
            address: object as *const _ as *const () as usize,
        }
    }
}

/// Objects already validated during one top-level call.
///
/// Shared nodes recorded through [`VisitedSet::hold`] stay alive until the
/// set is dropped, so an address in the set is never reused by a new object
/// while the traversal runs.
#[derive(Default)]
pub struct VisitedSet {
    seen: HashSet<ObjectId>,
    held: Vec<NodeRef>,
}

impl VisitedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an object; returns false if it was already present
    pub fn insert(&mut self, object: &dyn Validatable) -> bool {
        self.seen.insert(ObjectId::of(object))
    }

    /// Record a shared node and keep it alive for the rest of the call
    pub fn hold(&mut self, node: &NodeRef) -> bool {
        let inserted = self.insert(&**node);
        if inserted {
            self.held.push(Arc::clone(node));
        }
        inserted
    }

    /// Whether the object was already recorded
    pub fn contains(&self, object: &dyn Validatable) -> bool {
        self.seen.contains(&ObjectId::of(object))
    }

    /// Number of distinct objects recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl std::fmt::Debug for VisitedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitedSet")
            .field("seen", &self.seen)
            .field("held", &self.held.len())
            .finish()
    }
}

/// Validates an object and every object reachable from it
#[derive(Debug, Clone)]
pub struct RecursiveValidator {
    config: ValidatorConfig,
    cache: Arc<TypeCache>,
}

impl RecursiveValidator {
    /// Create a validator with the given configuration over the global type cache
    pub fn new(config: ValidatorConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: TypeCache::global(),
        })
    }

    /// Create a validator with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: ValidatorConfig::default(),
            cache: TypeCache::global(),
        }
    }

    /// Use a specific type cache instead of the global one
    pub fn with_cache(mut self, cache: Arc<TypeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Active traversal configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Descriptor cache used by this validator
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Validate `root` and every object reachable from it.
    ///
    /// Violations are returned depth-first in property-declaration order,
    /// with member paths relative to `root`. An object reached a second time
    /// is treated as valid, so a shared invalid object is reported once,
    /// under the first path that reached it.
    ///
    /// Errors only for traversal defects, such as a property accessor that
    /// cannot read its value; constraint violations are never errors.
    pub fn validate(&self, root: &dyn Validatable) -> GraphResult<ValidationOutcome> {
        let mut visited = VisitedSet::new();
        let mut results = Vec::new();

        let is_valid = self.visit(root, &mut results, &mut visited, 0)?;

        tracing::debug!(
            "Validated {} ({} objects visited): {} violation{}",
            root.type_name(),
            visited.len(),
            results.len(),
            if results.len() == 1 { "" } else { "s" }
        );

        Ok(ValidationOutcome::new(is_valid, results))
    }

    /// Validate independent roots in parallel, preserving input order
    pub fn validate_batch(&self, roots: &[&dyn Validatable]) -> GraphResult<Vec<ValidationOutcome>> {
        roots.par_iter().map(|root| self.validate(*root)).collect()
    }

    fn visit(
        &self,
        node: &dyn Validatable,
        results: &mut Vec<ValidationResult>,
        visited: &mut VisitedSet,
        depth: usize,
    ) -> GraphResult<bool> {
        // Marked before descending so a path back to this node short-circuits
        visited.insert(node);

        let violations = node.check_constraints();
        let mut is_valid = violations.is_empty();
        tracing::trace!(
            "Checked {} at depth {}: {} violation(s)",
            node.type_name(),
            depth,
            violations.len()
        );
        results.extend(violations);

        let descriptor = self.cache.describe(node);
        for property in descriptor.properties() {
            match property.get(node)? {
                PropertyValue::Absent => continue,
                PropertyValue::Collection(items) => {
                    if !self.config.descend_collections {
                        continue;
                    }
                    for item in items.iter().flatten() {
                        if !self.visit_child(item, property.name(), results, visited, depth)? {
                            is_valid = false;
                        }
                    }
                }
                PropertyValue::Object(child) => {
                    if !self.visit_child(&child, property.name(), results, visited, depth)? {
                        is_valid = false;
                    }
                }
            }
        }

        Ok(is_valid)
    }

    fn visit_child(
        &self,
        child: &NodeRef,
        property: &str,
        results: &mut Vec<ValidationResult>,
        visited: &mut VisitedSet,
        depth: usize,
    ) -> GraphResult<bool> {
        if visited.contains(&**child) {
            tracing::trace!("Skipping {} under {}: already validated", child.type_name(), property);
            return Ok(true);
        }

        if let Some(limit) = self.config.max_depth {
            if depth + 1 > limit {
                return Err(GraphError::DepthExceeded {
                    limit,
                    path: property.to_string(),
                });
            }
        }

        visited.hold(child);
        let mut nested = Vec::new();
        let child_valid = match self.visit(&**child, &mut nested, visited, depth + 1) {
            Ok(valid) => valid,
            Err(GraphError::DepthExceeded { limit, path }) => {
                return Err(GraphError::DepthExceeded {
                    limit,
                    path: format!("{}{}{}", property, self.config.separator, path),
                });
            }
            Err(e) => return Err(e),
        };

        if child_valid {
            return Ok(true);
        }

        results.extend(
            nested
                .iter()
                .map(|result| result.with_prefix(property, &self.config.separator)),
        );
        Ok(false)
    }
}

impl Default for RecursiveValidator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
