//! Type descriptor caching for recursive validation
//!
//! Architecture: Infrastructure Layer - The cache keeps introspection off the hot path
//! - TypeCache maps each concrete runtime type to its descriptor
//! - Descriptors are built outside any lock; concurrent first use may build twice
//! - Entries are permanent for the lifetime of the cache

use crate::introspect::{TypeDescriptor, Validatable};
use dashmap::DashMap;
use lazy_static::lazy_static;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

lazy_static! {
    static ref GLOBAL_CACHE: Arc<TypeCache> = Arc::new(TypeCache::new());
}

/// Concurrent cache of type descriptors keyed by concrete type
#[derive(Debug, Default)]
pub struct TypeCache {
    descriptors: DashMap<TypeId, Arc<TypeDescriptor>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TypeCache {
    /// Create an empty, isolated cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by default validators
    pub fn global() -> Arc<TypeCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Get the descriptor for an object's concrete type, building it on first use
    pub fn describe(&self, object: &dyn Validatable) -> Arc<TypeDescriptor> {
        let type_id = object.as_any().type_id();

        if let Some(existing) = self.descriptors.get(&type_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let descriptor = Arc::new(TypeDescriptor::of(object));
        tracing::debug!(
            "Described type {} with {} descendable propert{}",
            descriptor.type_name(),
            descriptor.properties().len(),
            if descriptor.properties().len() == 1 { "y" } else { "ies" }
        );

        // Last writer wins; any racing descriptor is equally complete
        self.descriptors.insert(type_id, Arc::clone(&descriptor));
        descriptor
    }

    /// Whether a descriptor for `T` has been cached
    pub fn contains<T: 'static>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached types
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Get cache statistics
    pub fn statistics(&self) -> CacheStatistics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        CacheStatistics {
            total_types: self.descriptors.len(),
            cache_hits: hits,
            cache_misses: misses,
            hit_rate: if hits + misses > 0 {
                (hits as f64) / ((hits + misses) as f64)
            } else {
                0.0
            },
        }
    }

    /// Drop every cached descriptor and reset the counters
    pub fn clear(&self) {
        self.descriptors.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Cache performance statistics
#[derive(Debug, Clone)]
pub struct CacheStatistics {
    pub total_types: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_rate: f64,
}

impl CacheStatistics {
    /// Format statistics for display
    pub fn format_display(&self) -> String {
        format!(
            "Type cache: {} types, {:.1}% hit rate ({} hits, {} misses)",
            self.total_types,
            self.hit_rate * 100.0,
            self.cache_hits,
            self.cache_misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::MemberInfo;
    use std::thread;

    struct Leaf;

    impl Validatable for Leaf {}

    struct Parent {
        child: Option<Arc<Leaf>>,
    }

    impl Validatable for Parent {
        fn members(&self) -> Vec<MemberInfo> {
            vec![
                MemberInfo::text("Name"),
                MemberInfo::reference("Child", |p: &Parent| &p.child),
            ]
        }
    }

    #[test]
    fn test_cache_creation() {
        let cache = TypeCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.statistics().cache_misses, 0);
    }

    #[test]
    fn test_describe_once_per_type() {
        let cache = TypeCache::new();
        let first = Parent { child: None };
        let second = Parent {
            child: Some(Arc::new(Leaf)),
        };

        let a = cache.describe(&first);
        let b = cache.describe(&second);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains::<Parent>());
        assert!(!cache.contains::<Leaf>());

        let stats = cache.statistics();
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_keyed_by_concrete_type() {
        let cache = TypeCache::new();
        let parent = Parent { child: None };
        let as_dyn: &dyn Validatable = &parent;

        let descriptor = cache.describe(as_dyn);
        cache.describe(&Leaf);

        assert_eq!(descriptor.type_id(), TypeId::of::<Parent>());
        assert_eq!(descriptor.property_names().collect::<Vec<_>>(), ["Child"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = Arc::new(TypeCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let parent = Parent { child: None };
                    cache.describe(&parent).properties().len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }

        assert_eq!(cache.len(), 1);
        let stats = cache.statistics();
        assert_eq!(stats.cache_hits + stats.cache_misses, 8);
    }

    #[test]
    fn test_statistics() {
        let cache = TypeCache::new();
        cache.hits.store(10, Ordering::Relaxed);
        cache.misses.store(5, Ordering::Relaxed);

        let stats = cache.statistics();
        assert_eq!(stats.hit_rate, 10.0 / 15.0);

        let display = stats.format_display();
        assert!(display.contains("66.7% hit rate"));
    }

    #[test]
    fn test_clear() {
        let cache = TypeCache::new();
        cache.describe(&Leaf);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.statistics().cache_misses, 0);
    }
}
