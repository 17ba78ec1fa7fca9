//! Annotation-frequency based information content.
//!
//! `IC(c) = -log2(|derived(c)| / total)` where `derived(c)` is the union of
//! the annotations given directly to `c` or to any of its descendants, and
//! `total` the number of distinct annotated entities.
//!
//! A class whose descendant closure holds no annotation has probability zero.
//! Instead of an infinite score it receives the cap `max_finite + 1.0` and is
//! flagged degenerate, so importance selection can leave it out.

use std::collections::HashSet;

use serde::Serialize;

use super::{graph::OntologyGraph, value_objects::EntityId};

/// Outcome of a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IcSummary {
    /// Classes that received a finite IC.
    pub scored: usize,
    /// Classes with zero derived annotations, given the cap.
    pub degenerate: usize,
    /// Highest finite IC observed (0 when none).
    pub max_finite: f64,
    /// Value assigned to degenerate classes.
    pub cap: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InformationContentScorer;

impl InformationContentScorer {
    /// Scores every node of `graph`, overwriting any previous score.
    pub fn score_all(graph: &mut OntologyGraph, total_annotated: usize) -> IcSummary {
        let indices: Vec<_> = graph.indices().collect();
        let mut raw = Vec::with_capacity(indices.len());

        for &idx in &indices {
            let mut derived: HashSet<&EntityId> = HashSet::new();
            for descendant in graph.descendant_indices(idx) {
                derived.extend(graph.node_at(descendant).given_annotations());
            }
            raw.push(information_content(derived.len(), total_annotated));
        }

        let max_finite = raw.iter().flatten().copied().fold(0.0_f64, f64::max);
        let cap = max_finite + 1.0;
        let mut summary = IcSummary {
            scored: 0,
            degenerate: 0,
            max_finite,
            cap,
        };

        for (idx, score) in indices.into_iter().zip(raw) {
            let node = graph.node_at_mut(idx);
            if let Some(value) = score {
                summary.scored += 1;
                node.set_ic_score(value);
            } else {
                summary.degenerate += 1;
                node.set_capped_ic_score(cap);
            }
        }

        summary
    }
}

/// `None` when the probability is zero or undefined.
fn information_content(derived: usize, total: usize) -> Option<f64> {
    if derived == 0 || total == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let probability = derived as f64 / total as f64;
    // log2(1) is -0.0 after negation
    Some((-probability.log2()) + 0.0)
}

#[cfg(test)]
mod tests {
    use super::{information_content, InformationContentScorer};
    use crate::ontology::{
        annotations::AnnotationIndex,
        graph::OntologyGraph,
        value_objects::{ClassId, EntityId},
    };

    fn class(text: &str) -> ClassId {
        ClassId::new(text).expect("valid class id")
    }

    fn entity(text: &str) -> EntityId {
        EntityId::new(text).expect("valid entity id")
    }

    fn ic(graph: &OntologyGraph, id: &str) -> f64 {
        graph.node(&class(id)).expect("node exists").ic_score()
    }

    #[test]
    fn probability_one_is_positive_zero() {
        let value = information_content(4, 4).expect("finite");
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
        assert_eq!(information_content(1, 4), Some(2.0));
        assert_eq!(information_content(0, 4), None);
        assert_eq!(information_content(0, 0), None);
    }

    #[test]
    fn annotations_propagate_to_ancestors() {
        let mut graph = OntologyGraph::new();
        graph.add_edge(&class("A"), &class("R"));
        graph.add_edge(&class("B"), &class("R"));
        graph.add_edge(&class("C"), &class("A"));
        graph.add_node(class("D"), "unused");
        graph.add_edge(&class("D"), &class("R"));

        let mut index = AnnotationIndex::new();
        index.annotate(entity("e1"), class("C"), &mut graph);
        index.annotate(entity("e2"), class("B"), &mut graph);
        index.annotate(entity("e3"), class("A"), &mut graph);
        index.annotate(entity("e4"), class("B"), &mut graph);

        let summary =
            InformationContentScorer::score_all(&mut graph, index.annotated_entity_count());

        assert_eq!(ic(&graph, "R"), 0.0);
        assert_eq!(ic(&graph, "A"), 1.0);
        assert_eq!(ic(&graph, "B"), 1.0);
        assert_eq!(ic(&graph, "C"), 2.0);
        assert_eq!(ic(&graph, "D"), 3.0);
        assert_eq!(summary.scored, 4);
        assert_eq!(summary.degenerate, 1);
        assert_eq!(summary.max_finite, 2.0);
        assert_eq!(summary.cap, 3.0);
        assert!(graph.nodes().all(|node| node.ic_score().is_finite()));
        let degenerate: Vec<_> = graph
            .nodes()
            .filter(|node| node.is_degenerate())
            .map(|node| node.id().as_str())
            .collect();
        assert_eq!(degenerate, ["D"]);
    }

    #[test]
    fn unannotated_ontology_caps_every_class_at_one() {
        let mut graph = OntologyGraph::new();
        graph.add_edge(&class("A"), &class("R"));
        let summary = InformationContentScorer::score_all(&mut graph, 0);
        assert_eq!(summary.degenerate, 2);
        assert_eq!(ic(&graph, "R"), 1.0);
        assert_eq!(ic(&graph, "A"), 1.0);
    }
}
