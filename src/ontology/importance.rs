//! Top-K selection of classes by information content.
//!
//! Selection uses a three-way partition around a pivot instead of sorting the
//! whole ontology. When the group of classes tied at the cutoff does not fit
//! the remaining budget, none of them is selected, so the result may hold
//! fewer than `K` classes.
//!
//! Degenerate classes (capped IC, no annotation below them) are never
//! candidates: they cannot be the LCS of two annotated classes.

use std::{cmp::Ordering, collections::HashSet};

use super::{graph::OntologyGraph, value_objects::ClassId};

/// Classes eligible for exact LCS search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportantNodes {
    classes: HashSet<ClassId>,
    budget: usize,
    excluded_ties: usize,
}

impl ImportantNodes {
    #[must_use]
    pub fn contains(&self, class: &ClassId) -> bool {
        self.classes.contains(class)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The requested `K`.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Size of the tie group dropped at the cutoff, 0 if none was dropped.
    #[must_use]
    pub fn excluded_ties(&self) -> usize {
        self.excluded_ties
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassId> + '_ {
        self.classes.iter()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportanceFilter;

impl ImportanceFilter {
    /// Selects up to `k` classes with the highest IC scores.
    ///
    /// Candidates are ordered by identifier before partitioning and the first
    /// remaining candidate is the pivot, so a given graph always yields the
    /// same selection.
    #[must_use]
    pub fn select(graph: &OntologyGraph, k: usize) -> ImportantNodes {
        let mut candidates: Vec<(&ClassId, f64)> = graph
            .nodes()
            .filter(|node| !node.is_degenerate())
            .map(|node| (node.id(), node.ic_score()))
            .collect();
        candidates.sort_by(|left, right| left.0.cmp(right.0));

        let mut selected = HashSet::with_capacity(k.min(candidates.len()));
        let mut remaining = k;
        let mut excluded_ties = 0;

        while remaining > 0 && !candidates.is_empty() {
            if remaining >= candidates.len() {
                selected.extend(candidates.into_iter().map(|(id, _)| id.clone()));
                break;
            }

            let pivot = candidates[0].1;
            let mut above = Vec::new();
            let mut ties = Vec::new();
            let mut below = Vec::new();
            for candidate in candidates {
                match candidate.1.total_cmp(&pivot) {
                    Ordering::Greater => above.push(candidate),
                    Ordering::Equal => ties.push(candidate),
                    Ordering::Less => below.push(candidate),
                }
            }

            if above.len() > remaining {
                candidates = above;
                continue;
            }
            remaining -= above.len();
            selected.extend(above.into_iter().map(|(id, _)| id.clone()));
            if remaining == 0 {
                break;
            }

            if ties.len() > remaining {
                excluded_ties = ties.len();
                break;
            }
            remaining -= ties.len();
            selected.extend(ties.into_iter().map(|(id, _)| id.clone()));

            candidates = below;
        }

        ImportantNodes {
            classes: selected,
            budget: k,
            excluded_ties,
        }
    }
}
