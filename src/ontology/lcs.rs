//! Least common subsumer resolution.
//!
//! [`LcsCache`] is shared by every worker of a comparison run. It is a sharded
//! [`DashMap`] with append-only semantics: two workers racing on the same pair
//! compute the same answer and the second write is a harmless overwrite.

use std::{
    cmp::Ordering as CmpOrdering,
    sync::atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use serde::Serialize;

use super::{graph::OntologyGraph, importance::ImportantNodes, value_objects::ClassId};

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LcsCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    /// Stored entries, counting both orderings of a pair.
    pub entries: usize,
}

impl LcsCacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = self.hits as f64 / total as f64;
            rate
        }
    }
}

/// Memoized LCS results keyed by class pair; `None` records "no subsumer".
#[derive(Debug, Default)]
pub struct LcsCache {
    entries: DashMap<(ClassId, ClassId), Option<ClassId>>,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
}

impl LcsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a pair; the outer `None` is a cache miss.
    #[must_use]
    pub fn get(&self, a: &ClassId, b: &ClassId) -> Option<Option<ClassId>> {
        let found = self
            .entries
            .get(&(a.clone(), b.clone()))
            .map(|entry| entry.value().clone());
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores `lcs` under both orderings of the pair.
    pub fn insert(&self, a: &ClassId, b: &ClassId, lcs: Option<ClassId>) {
        if a != b {
            self.entries.insert((b.clone(), a.clone()), lcs.clone());
        }
        self.entries.insert((a.clone(), b.clone()), lcs);
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LcsCacheStats {
        LcsCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

/// Finds the most informative common ancestor of two classes.
///
/// With an importance set, pairs touching a class outside of it resolve to
/// the graph root without searching. Those approximations are not cached.
#[derive(Debug, Default)]
pub struct LcsResolver {
    cache: LcsCache,
    important: Option<ImportantNodes>,
    root: Option<ClassId>,
}

impl LcsResolver {
    #[must_use]
    pub fn new(root: Option<ClassId>, important: Option<ImportantNodes>) -> Self {
        Self {
            cache: LcsCache::new(),
            important,
            root,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &LcsCache {
        &self.cache
    }

    #[must_use]
    pub fn important(&self) -> Option<&ImportantNodes> {
        self.important.as_ref()
    }

    /// Returns the LCS of `a` and `b`, or `None` when they share no ancestor.
    ///
    /// Among common ancestors with the highest IC the smallest identifier
    /// wins, which makes the result independent of argument order.
    pub fn resolve(&self, graph: &OntologyGraph, a: &ClassId, b: &ClassId) -> Option<ClassId> {
        if let Some(cached) = self.cache.get(a, b) {
            return cached;
        }

        if let Some(important) = &self.important {
            if !important.contains(a) || !important.contains(b) {
                return self.root.clone();
            }
        }

        let lcs = Self::search(graph, a, b);
        self.cache.insert(a, b, lcs.clone());
        lcs
    }

    fn search(graph: &OntologyGraph, a: &ClassId, b: &ClassId) -> Option<ClassId> {
        let (Some(left), Some(right)) = (graph.index_of(a), graph.index_of(b)) else {
            return None;
        };
        let left_ancestors = graph.ancestor_indices(left);

        graph
            .ancestor_indices(right)
            .into_iter()
            .filter(|idx| left_ancestors.contains(idx))
            .map(|idx| graph.node_at(idx))
            .max_by(|x, y| match x.ic_score().total_cmp(&y.ic_score()) {
                CmpOrdering::Equal => y.id().cmp(x.id()),
                other => other,
            })
            .map(|node| node.id().clone())
    }
}
