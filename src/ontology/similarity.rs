//! Entity-level similarity built on class-level LCS queries.

use std::{cmp::Ordering, collections::BTreeSet, fmt};

use serde::Serialize;

use super::{
    service::Ontology,
    value_objects::{ClassId, EntityId},
};

/// Score of one entity pair.
///
/// `lcs` is `None` when no pair of annotated classes shares an ancestor, or
/// when either entity has no annotations; `value` is then `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    pub value: f64,
    pub lcs: Option<ClassId>,
}

impl PairScore {
    #[must_use]
    pub fn none() -> Self {
        Self {
            value: 0.0,
            lcs: None,
        }
    }
}

/// A scoring function reducing two annotation sets to a [`PairScore`].
pub trait SimilarityMeasure: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `score(a, b) == score(b, a)` always holds.
    fn is_symmetric(&self) -> bool;

    fn score(
        &self,
        ontology: &Ontology,
        first: &BTreeSet<ClassId>,
        second: &BTreeSet<ClassId>,
    ) -> PairScore;
}

/// Highest IC among the LCS of every cross pair of annotated classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxIc;

impl SimilarityMeasure for MaxIc {
    fn name(&self) -> &'static str {
        "maxIC"
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn score(
        &self,
        ontology: &Ontology,
        first: &BTreeSet<ClassId>,
        second: &BTreeSet<ClassId>,
    ) -> PairScore {
        let mut best: Option<(f64, ClassId)> = None;

        for a in first {
            for b in second {
                let Some(lcs) = ontology.compute_lcs(a, b) else {
                    continue;
                };
                let Some(ic) = ontology.ic_score(&lcs) else {
                    continue;
                };
                let better = match &best {
                    None => true,
                    Some((best_ic, best_id)) => match ic.total_cmp(best_ic) {
                        Ordering::Greater => true,
                        Ordering::Equal => lcs < *best_id,
                        Ordering::Less => false,
                    },
                };
                if better {
                    best = Some((ic, lcs));
                }
            }
        }

        best.map_or_else(PairScore::none, |(value, lcs)| PairScore {
            value,
            lcs: Some(lcs),
        })
    }
}

/// Scores entity pairs against a built [`Ontology`] with one measure.
///
/// The engine holds no state of its own; the only shared mutable structure
/// it touches is the ontology's LCS cache, so it can be used from many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'a> {
    ontology: &'a Ontology,
    measure: &'a dyn SimilarityMeasure,
}

impl<'a> SimilarityEngine<'a> {
    #[must_use]
    pub fn new(ontology: &'a Ontology, measure: &'a dyn SimilarityMeasure) -> Self {
        Self { ontology, measure }
    }

    #[must_use]
    pub fn measure(&self) -> &'a dyn SimilarityMeasure {
        self.measure
    }

    /// Unknown or unannotated entities score as [`PairScore::none`].
    #[must_use]
    pub fn score_entity_pair(&self, first: &EntityId, second: &EntityId) -> PairScore {
        let annotations = self.ontology.annotations();
        self.measure.score(
            self.ontology,
            annotations.classes_of(first),
            annotations.classes_of(second),
        )
    }
}
