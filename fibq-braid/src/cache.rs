//! Operator caching
//!
//! Elementary exchanges and fusion transforms are expensive to build and
//! never change once built, so they are memoized per key and handed out as
//! `Arc`s. Entries are only ever inserted; readers take the shared lock.

use crate::fused::FusionTransform;
use crate::matrix::BraidMatrix;
use crate::BraidSpace;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cache key for exchange operators
///
/// `first < second` are 1-based positions inside the space; an elementary
/// generator `σ_i` is the key `(i, i + 1)`.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct OperatorKey {
    pub space: BraidSpace,
    pub first: usize,
    pub second: usize,
}

impl OperatorKey {
    pub fn elementary(space: &BraidSpace, pair: usize) -> Self {
        Self {
            space: space.clone(),
            first: pair,
            second: pair + 1,
        }
    }
}

/// Append-only store of built operators with hit/miss accounting
pub struct BraidCache {
    operators: RwLock<AHashMap<OperatorKey, Arc<BraidMatrix>>>,
    transforms: RwLock<AHashMap<SmallVec<[usize; 4]>, Arc<FusionTransform>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

static GLOBAL_CACHE: Lazy<Arc<BraidCache>> = Lazy::new(|| Arc::new(BraidCache::new()));

impl BraidCache {
    pub fn new() -> Self {
        Self {
            operators: RwLock::new(AHashMap::new()),
            transforms: RwLock::new(AHashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache shared by default builders
    pub fn global() -> Arc<BraidCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    pub fn get(&self, key: &OperatorKey) -> Option<Arc<BraidMatrix>> {
        let result = self.operators.read().get(key).cloned();
        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Insert an operator, keeping the existing one if another thread won the race
    pub fn insert(&self, key: OperatorKey, matrix: BraidMatrix) -> Arc<BraidMatrix> {
        let mut operators = self.operators.write();
        Arc::clone(operators.entry(key).or_insert_with(|| Arc::new(matrix)))
    }

    pub fn transform(&self, anyons_per_qudit: &[usize]) -> Option<Arc<FusionTransform>> {
        self.transforms.read().get(anyons_per_qudit).cloned()
    }

    pub fn insert_transform(&self, transform: FusionTransform) -> Arc<FusionTransform> {
        let key: SmallVec<[usize; 4]> = transform.basis().anyons_per_qudit().iter().copied().collect();
        let mut transforms = self.transforms.write();
        Arc::clone(transforms.entry(key).or_insert_with(|| Arc::new(transform)))
    }

    /// Number of cached exchange operators
    pub fn len(&self) -> usize {
        self.operators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl Default for BraidCache {
    fn default() -> Self {
        Self::new()
    }
}
