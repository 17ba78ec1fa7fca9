use std::{sync::Arc, time::Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use super::pairs::PairEnumerator;
use crate::{
    config::Config,
    ontology::{EntityId, MaxIc, Ontology, PairScore, SimilarityEngine, SimilarityMeasure},
};

/// Everything a worker needs to score a pair.
///
/// Built once after the ontology and shared by every worker; nothing in it
/// changes during a run apart from the ontology's LCS cache.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    ontology: Arc<Ontology>,
    measure: Arc<dyn SimilarityMeasure>,
}

impl ScoringContext {
    #[must_use]
    pub fn new(ontology: Arc<Ontology>, measure: Arc<dyn SimilarityMeasure>) -> Self {
        Self { ontology, measure }
    }

    /// Context scoring with [`MaxIc`].
    #[must_use]
    pub fn max_ic(ontology: Arc<Ontology>) -> Self {
        Self::new(ontology, Arc::new(MaxIc))
    }

    #[must_use]
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    #[must_use]
    pub fn measure(&self) -> &dyn SimilarityMeasure {
        self.measure.as_ref()
    }

    #[must_use]
    pub fn score(&self, first: &EntityId, second: &EntityId) -> PairScore {
        SimilarityEngine::new(&self.ontology, self.measure.as_ref())
            .score_entity_pair(first, second)
    }
}

/// One scored pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub first: EntityId,
    pub second: EntityId,
    pub score: PairScore,
}

/// Scores every enumerated entity pair in parallel.
#[derive(Debug, Clone)]
pub struct ComparisonRunner {
    context: ScoringContext,
    symmetric: bool,
}

impl ComparisonRunner {
    /// The run is symmetric when the configuration says so or, when it is
    /// silent, when the measure is.
    #[must_use]
    pub fn new(context: ScoringContext, config: &Config) -> Self {
        let symmetric = config.is_symmetric(context.measure());
        Self { context, symmetric }
    }

    #[must_use]
    pub fn context(&self) -> &ScoringContext {
        &self.context
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Pairs over every labeled or annotated entity of the ontology.
    #[must_use]
    pub fn enumerator(&self) -> PairEnumerator {
        PairEnumerator::new(self.context.ontology().entities(), self.symmetric)
    }

    /// Scores all pairs. Rows come back in pair order.
    #[must_use]
    pub fn run(&self) -> Vec<ComparisonRow> {
        let enumerator = self.enumerator();
        let pairs: Vec<(&EntityId, &EntityId)> = enumerator.pairs().collect();
        self.score_pairs(&pairs)
    }

    /// Scores an explicit list of pairs, keeping their order.
    #[must_use]
    pub fn score_pairs(&self, pairs: &[(&EntityId, &EntityId)]) -> Vec<ComparisonRow> {
        let started = Instant::now();
        info!(
            pairs = pairs.len(),
            symmetric = self.symmetric,
            measure = self.context.measure().name(),
            "comparison_started"
        );

        let rows: Vec<ComparisonRow> = pairs
            .par_iter()
            .map(|&(first, second)| ComparisonRow {
                first: first.clone(),
                second: second.clone(),
                score: self.context.score(first, second),
            })
            .collect();

        let cache = self.context.ontology().cache_stats();
        info!(
            pairs = rows.len(),
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            hit_rate = cache.hit_rate(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "comparison_finished"
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ComparisonRunner, ScoringContext};
    use crate::{
        config::Config,
        ontology::{ClassId, Ontology},
    };

    fn ontology() -> Arc<Ontology> {
        Arc::new(
            Ontology::builder()
                .edge("A", "R")
                .edge("B", "R")
                .edge("C", "A")
                .annotation("e1", "C")
                .annotation("e2", "B")
                .annotation("e3", "A")
                .annotation("e4", "B")
                .entity_label("e5", "No annotations")
                .build()
                .expect("valid records"),
        )
    }

    #[test]
    fn symmetry_follows_the_measure_unless_configured() {
        let context = ScoringContext::max_ic(ontology());
        assert!(ComparisonRunner::new(context.clone(), &Config::default()).is_symmetric());

        let config = Config {
            symmetric: Some(false),
            ..Config::default()
        };
        assert!(!ComparisonRunner::new(context, &config).is_symmetric());
    }

    #[test]
    fn scores_every_unordered_pair() {
        let runner = ComparisonRunner::new(ScoringContext::max_ic(ontology()), &Config::default());
        let rows = runner.run();

        assert_eq!(rows.len(), 10);
        assert!(rows.windows(2).all(|w| (&w[0].first, &w[0].second) < (&w[1].first, &w[1].second)));

        let e2_e4 = rows
            .iter()
            .find(|row| row.first.as_str() == "e2" && row.second.as_str() == "e4")
            .expect("pair is scored");
        assert_eq!(e2_e4.score.value, 1.0);
        assert_eq!(e2_e4.score.lcs, Some(ClassId::new("B").expect("valid class id")));

        let unannotated = rows.iter().filter(|row| row.second.as_str() == "e5");
        for row in unannotated {
            assert_eq!(row.score.lcs, None);
            assert_eq!(row.score.value, 0.0);
        }
    }

    #[test]
    fn asymmetric_runs_score_both_orderings() {
        let config = Config {
            symmetric: Some(false),
            ..Config::default()
        };
        let runner = ComparisonRunner::new(ScoringContext::max_ic(ontology()), &config);
        let rows = runner.run();
        assert_eq!(rows.len(), 20);
        assert!(runner.context().ontology().cache_stats().hits > 0);
    }
}
