//! Ontology engine: class graph, annotations, information content and least
//! common subsumer queries.
//!
//! An [`Ontology`] is built once from a [`RecordRepository`] and is read-only
//! afterwards, except for the LCS cache which is safe to fill from several
//! threads at once.

pub mod annotations;
pub mod entities;
pub mod graph;
pub mod importance;
pub mod information_content;
pub mod lcs;
pub mod repositories;
pub mod service;
pub mod similarity;
pub mod tsv;
pub mod value_objects;

pub use annotations::AnnotationIndex;
pub use entities::{OntologyNode, UNNAMED};
pub use graph::OntologyGraph;
pub use importance::{ImportanceFilter, ImportantNodes};
pub use information_content::{IcSummary, InformationContentScorer};
pub use lcs::{LcsCache, LcsCacheStats, LcsResolver};
pub use repositories::{
    Annotation, ClassEdge, ClassLabel, EntityLabel, InMemoryRecords, RecordRepository,
};
pub use service::{Ontology, OntologyBuilder, OntologyStats};
pub use similarity::{MaxIc, PairScore, SimilarityEngine, SimilarityMeasure};
pub use tsv::TsvRepository;
pub use value_objects::{ClassId, EntityId, IdentifierError};
