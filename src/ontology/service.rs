use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    annotations::AnnotationIndex,
    graph::OntologyGraph,
    importance::{ImportanceFilter, ImportantNodes},
    information_content::{IcSummary, InformationContentScorer},
    lcs::{LcsCacheStats, LcsResolver},
    repositories::{InMemoryRecords, RecordRepository},
    similarity::{MaxIc, PairScore, SimilarityEngine},
    value_objects::{ClassId, EntityId},
};
use crate::{config::Config, Result};

/// A fully built ontology: graph, annotations, IC scores and the LCS cache.
///
/// Everything except the LCS cache is immutable once [`Ontology::build`]
/// returns, so a single instance can be shared by reference across scoring
/// threads.
#[derive(Debug)]
pub struct Ontology {
    graph: OntologyGraph,
    annotations: AnnotationIndex,
    entity_names: HashMap<EntityId, String>,
    root: Option<ClassId>,
    ic_summary: IcSummary,
    resolver: LcsResolver,
}

/// Counts describing a built ontology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OntologyStats {
    pub nodes: usize,
    pub edges: usize,
    pub roots: usize,
    pub root: Option<ClassId>,
    pub annotated_entities: usize,
    pub labeled_entities: usize,
    pub annotations: usize,
    pub information_content: IcSummary,
    pub important_nodes: Option<usize>,
    pub lcs_cache: LcsCacheStats,
}

impl Ontology {
    /// Builds an ontology from `repository`.
    ///
    /// Labels are loaded first, then edges, annotations and entity labels.
    /// A source that is unavailable is logged and skipped, leaving a
    /// partially built ontology.
    ///
    /// # Errors
    ///
    /// Fails on source errors other than missing sources and malformed rows.
    pub fn build(repository: &impl RecordRepository, config: &Config) -> Result<Self> {
        let labels = recover("class_labels", repository.class_labels())?;
        let edges = recover("class_edges", repository.class_edges())?;
        let annotation_records = recover("annotations", repository.annotations())?;
        let entity_labels = recover("entity_labels", repository.entity_labels())?;

        let mut graph = OntologyGraph::with_capacity(labels.len(), edges.len());
        for label in labels {
            if !graph.add_node(label.class.clone(), label.name) {
                debug!(class = %label.class, "class_label_ignored");
            }
        }
        for edge in &edges {
            graph.add_edge(&edge.child, &edge.parent);
        }

        let mut annotations = AnnotationIndex::new();
        for record in annotation_records {
            annotations.annotate(record.entity, record.class, &mut graph);
        }

        let mut entity_names = HashMap::with_capacity(entity_labels.len());
        for label in entity_labels {
            entity_names.entry(label.entity).or_insert(label.name);
        }

        let root = graph.find_root();
        let roots = graph.roots();
        if roots.len() > 1 {
            warn!(
                roots = roots.len(),
                root = ?root.as_ref().map(ClassId::as_str),
                "ontology_multiple_roots"
            );
        }

        let ic_summary =
            InformationContentScorer::score_all(&mut graph, annotations.annotated_entity_count());
        if ic_summary.degenerate > 0 {
            debug!(
                classes = ic_summary.degenerate,
                cap = ic_summary.cap,
                "information_content_capped"
            );
        }

        if config.thresholding.enable && config.thresholding.max_important_nodes == 0 {
            warn!("thresholding_without_budget");
        }
        let important = config
            .thresholding
            .enable
            .then(|| ImportanceFilter::select(&graph, config.thresholding.max_important_nodes));

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            entities = annotations.annotated_entity_count(),
            root = ?root.as_ref().map(ClassId::as_str),
            degenerate = ic_summary.degenerate,
            important = ?important.as_ref().map(ImportantNodes::len),
            "ontology_built"
        );

        Ok(Self {
            resolver: LcsResolver::new(root.clone(), important),
            graph,
            annotations,
            entity_names,
            root,
            ic_summary,
        })
    }

    /// Starts an in-memory build from plain string records.
    #[must_use]
    pub fn builder() -> OntologyBuilder {
        OntologyBuilder::default()
    }

    /// Least common subsumer of two classes; `None` when they share no
    /// ancestor or either is unknown.
    #[must_use]
    pub fn compute_lcs(&self, a: &ClassId, b: &ClassId) -> Option<ClassId> {
        self.resolver.resolve(&self.graph, a, b)
    }

    /// Scores two entities with the max-IC measure.
    #[must_use]
    pub fn score_entity_pair(&self, first: &EntityId, second: &EntityId) -> PairScore {
        SimilarityEngine::new(self, &MaxIc).score_entity_pair(first, second)
    }

    #[must_use]
    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    #[must_use]
    pub fn annotations(&self) -> &AnnotationIndex {
        &self.annotations
    }

    #[must_use]
    pub fn root(&self) -> Option<&ClassId> {
        self.root.as_ref()
    }

    #[must_use]
    pub fn ic_score(&self, class: &ClassId) -> Option<f64> {
        self.graph.node(class).map(|node| node.ic_score())
    }

    #[must_use]
    pub fn ic_summary(&self) -> IcSummary {
        self.ic_summary
    }

    #[must_use]
    pub fn class_name(&self, class: &ClassId) -> Option<&str> {
        self.graph.node(class).map(|node| node.name())
    }

    #[must_use]
    pub fn entity_name(&self, entity: &EntityId) -> Option<&str> {
        self.entity_names.get(entity).map(String::as_str)
    }

    /// Labeled and annotated entities together, in identifier order.
    #[must_use]
    pub fn entities(&self) -> BTreeSet<EntityId> {
        let mut entities = self.annotations.entities();
        entities.extend(self.entity_names.keys().cloned());
        entities
    }

    #[must_use]
    pub fn important_nodes(&self) -> Option<&ImportantNodes> {
        self.resolver.important()
    }

    #[must_use]
    pub fn cache_stats(&self) -> LcsCacheStats {
        self.resolver.cache().stats()
    }

    #[must_use]
    pub fn stats(&self) -> OntologyStats {
        OntologyStats {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            roots: self.graph.roots().len(),
            root: self.root.clone(),
            annotated_entities: self.annotations.annotated_entity_count(),
            labeled_entities: self.entity_names.len(),
            annotations: self.annotations.annotation_count(),
            information_content: self.ic_summary,
            important_nodes: self.important_nodes().map(ImportantNodes::len),
            lcs_cache: self.cache_stats(),
        }
    }
}

fn recover<T>(source: &'static str, loaded: Result<Vec<T>>) -> Result<Vec<T>> {
    match loaded {
        Err(err) if err.is_recoverable() => {
            warn!(source, error = %err, "source_unavailable");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Collects string records for [`Ontology::build`].
///
/// Identifiers are validated when [`OntologyBuilder::build`] runs.
#[derive(Debug, Clone, Default)]
pub struct OntologyBuilder {
    class_labels: Vec<(String, String)>,
    class_edges: Vec<(String, String)>,
    annotations: Vec<(String, String)>,
    entity_labels: Vec<(String, String)>,
    config: Config,
}

impl OntologyBuilder {
    #[must_use]
    pub fn label(mut self, class: impl Into<String>, name: impl Into<String>) -> Self {
        self.class_labels.push((class.into(), name.into()));
        self
    }

    #[must_use]
    pub fn edge(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.class_edges.push((child.into(), parent.into()));
        self
    }

    #[must_use]
    pub fn annotation(mut self, entity: impl Into<String>, class: impl Into<String>) -> Self {
        self.annotations.push((entity.into(), class.into()));
        self
    }

    #[must_use]
    pub fn entity_label(mut self, entity: impl Into<String>, name: impl Into<String>) -> Self {
        self.entity_labels.push((entity.into(), name.into()));
        self
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Restricts exact LCS search to the `k` highest-IC classes.
    #[must_use]
    pub fn thresholding(mut self, k: usize) -> Self {
        self.config.thresholding.enable = true;
        self.config.thresholding.max_important_nodes = k;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Identifier`](crate::Error::Identifier) when a record
    /// carries an invalid identifier.
    pub fn build(self) -> Result<Ontology> {
        let mut records = InMemoryRecords::new();
        for (class, name) in self.class_labels {
            records.push_class_label(ClassId::new(class)?, name);
        }
        for (child, parent) in self.class_edges {
            records.push_class_edge(ClassId::new(child)?, ClassId::new(parent)?);
        }
        for (entity, class) in self.annotations {
            records.push_annotation(EntityId::new(entity)?, ClassId::new(class)?);
        }
        for (entity, name) in self.entity_labels {
            records.push_entity_label(EntityId::new(entity)?, name);
        }
        Ontology::build(&records, &self.config)
    }
}
