//! Process-wide plan cache (spec §3 "DFT cache", §6.2): keyed lookup that
//! hands back a shared, reference-counted [`Plan`]/[`RealPlan`] instead of
//! reconstructing one on every call, for callers (like [`crate::convolve`])
//! that would otherwise rebuild the same plan on every invocation.
//!
//! Grounded on `original_source`'s `kfr::dft_cache` (`include/kfr/dft/cache.hpp`):
//! a single process-wide cache instance, a mutex-guarded map from `(type,
//! size, kind)` to a type-erased, ref-counted plan, with `clear()` to drop
//! everything (KFR's cache is cleared explicitly at shutdown/test teardown
//! to avoid its destructor racing the allocator).

use crate::plan::{Order, Plan};
use crate::realplan::{PackFormat, RealPlan};
use crate::Num;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Complex(Order),
    Real(PackFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    ty: TypeId,
    size: usize,
    kind: Kind,
}

/// A process-wide cache of constructed plans, keyed by element type,
/// transform size, and transform kind.
///
/// Plans are expensive to construct (factorization, twiddle table
/// generation) but cheap and safe to share: [`Plan::execute`] takes `&self`
/// and every caller supplies its own scratch, so an `Arc<Plan<T>>` can be
/// handed to any number of callers without synchronization on the hot path.
pub struct DftCache {
    plans: Mutex<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
}

impl DftCache {
    fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
        }
    }

    /// The single process-wide cache instance.
    pub fn global() -> &'static DftCache {
        static INSTANCE: OnceLock<DftCache> = OnceLock::new();
        INSTANCE.get_or_init(DftCache::new)
    }

    /// Returns a shared complex plan of the given `size` and `order`,
    /// constructing and caching one on first request.
    pub fn get<T: Num>(&self, size: usize, order: Order) -> Arc<Plan<T>> {
        let key = CacheKey {
            ty: TypeId::of::<T>(),
            size,
            kind: Kind::Complex(order),
        };
        self.lookup_or_insert(key, || Plan::<T>::new(size, order, false).expect("cached plan size already validated by caller"))
    }

    /// Returns a shared real plan of the given `size` and packing format,
    /// constructing and caching one on first request.
    pub fn get_real<T: Num>(&self, size: usize, format: PackFormat) -> Arc<RealPlan<T>> {
        let key = CacheKey {
            ty: TypeId::of::<T>(),
            size,
            kind: Kind::Real(format),
        };
        self.lookup_or_insert(key, || {
            RealPlan::<T>::new(size, format, false).expect("cached real plan size already validated by caller")
        })
    }

    fn lookup_or_insert<V, F>(&self, key: CacheKey, build: F) -> Arc<V>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> V,
    {
        let mut plans = self.plans.lock().unwrap();
        if let Some(existing) = plans.get(&key) {
            return existing.clone().downcast::<V>().expect("cache key collision across distinct value types");
        }
        let value: Arc<V> = Arc::new(build());
        plans.insert(key, value.clone());
        value
    }

    /// Drops every cached plan. Subsequent [`DftCache::get`]/[`DftCache::get_real`]
    /// calls rebuild from scratch.
    pub fn clear(&self) {
        self.plans.lock().unwrap().clear();
    }

    /// Number of plans currently cached, across all element types and kinds.
    pub fn len(&self) -> usize {
        self.plans.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
