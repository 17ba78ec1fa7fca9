use std::collections::BTreeSet;

use super::value_objects::{ClassId, EntityId};

/// Display name given to classes referenced before (or without) a label.
pub const UNNAMED: &str = "unnamed";

/// IC value of a node that has not been scored yet.
pub const UNSCORED_IC: f64 = -1.0;

/// A single ontology class.
///
/// Nodes are owned by [`OntologyGraph`](super::graph::OntologyGraph); they
/// are only mutated while the ontology is being built.
#[derive(Clone, Debug, PartialEq)]
pub struct OntologyNode {
    id: ClassId,
    name: String,
    labeled: bool,
    given_annotations: BTreeSet<EntityId>,
    ic_score: f64,
    degenerate: bool,
}

impl OntologyNode {
    /// Creates a node carrying an explicit label.
    #[must_use]
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            labeled: true,
            given_annotations: BTreeSet::new(),
            ic_score: UNSCORED_IC,
            degenerate: false,
        }
    }

    /// Creates a placeholder node for an identity referenced without a label.
    #[must_use]
    pub fn placeholder(id: ClassId) -> Self {
        Self {
            labeled: false,
            ..Self::new(id, UNNAMED)
        }
    }

    /// Applies an explicit label.
    ///
    /// The first explicit label wins; a placeholder name is always replaced.
    /// Returns `true` when the name changed.
    pub fn apply_label(&mut self, name: impl Into<String>) -> bool {
        if self.labeled {
            return false;
        }
        self.name = name.into();
        self.labeled = true;
        true
    }

    /// Records an entity directly annotated to this class.
    pub fn add_given_annotation(&mut self, entity: EntityId) -> bool {
        self.given_annotations.insert(entity)
    }

    pub(crate) fn set_ic_score(&mut self, score: f64) {
        self.ic_score = score;
        self.degenerate = false;
    }

    /// Assigns the cap given to classes no annotated entity reaches.
    pub(crate) fn set_capped_ic_score(&mut self, cap: f64) {
        self.ic_score = cap;
        self.degenerate = true;
    }

    #[must_use]
    pub fn id(&self) -> &ClassId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `false` for placeholder nodes that never received a label.
    #[must_use]
    pub fn is_labeled(&self) -> bool {
        self.labeled
    }

    /// Entities annotated directly to this class, excluding those inherited
    /// from descendants.
    #[must_use]
    pub fn given_annotations(&self) -> &BTreeSet<EntityId> {
        &self.given_annotations
    }

    /// The information content, or [`UNSCORED_IC`] before scoring.
    #[must_use]
    pub fn ic_score(&self) -> f64 {
        self.ic_score
    }

    #[must_use]
    pub fn is_scored(&self) -> bool {
        self.ic_score >= 0.0
    }

    /// `true` when the score is the cap rather than a real IC: neither the
    /// class nor any descendant carries an annotation.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}
