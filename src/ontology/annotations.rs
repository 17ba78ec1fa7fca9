use std::collections::{BTreeSet, HashMap};

use super::{
    graph::OntologyGraph,
    value_objects::{ClassId, EntityId},
};

static EMPTY: BTreeSet<ClassId> = BTreeSet::new();

/// Entity → class annotations.
///
/// The inverse view lives on the graph nodes as
/// [`OntologyNode::given_annotations`](super::entities::OntologyNode::given_annotations);
/// [`AnnotationIndex::annotate`] is the only writer and keeps both in step.
/// An entity without annotations is absent from the index.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    entity_to_classes: HashMap<EntityId, BTreeSet<ClassId>>,
}

impl AnnotationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `entity` is directly annotated to `class`.
    ///
    /// The class node is created as a placeholder when the graph does not
    /// know it yet. Returns `false` for a repeated annotation.
    pub fn annotate(
        &mut self,
        entity: EntityId,
        class: ClassId,
        graph: &mut OntologyGraph,
    ) -> bool {
        graph
            .get_or_create_node(&class)
            .add_given_annotation(entity.clone());
        self.entity_to_classes
            .entry(entity)
            .or_default()
            .insert(class)
    }

    /// Classes `entity` is annotated with; empty for unknown entities.
    #[must_use]
    pub fn classes_of(&self, entity: &EntityId) -> &BTreeSet<ClassId> {
        self.entity_to_classes.get(entity).unwrap_or(&EMPTY)
    }

    #[must_use]
    pub fn contains(&self, entity: &EntityId) -> bool {
        self.entity_to_classes.contains_key(entity)
    }

    /// Annotated entities in identifier order.
    #[must_use]
    pub fn entities(&self) -> BTreeSet<EntityId> {
        self.entity_to_classes.keys().cloned().collect()
    }

    /// Number of distinct entities with at least one annotation.
    #[must_use]
    pub fn annotated_entity_count(&self) -> usize {
        self.entity_to_classes.len()
    }

    /// Total number of distinct `(entity, class)` annotations.
    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.entity_to_classes.values().map(BTreeSet::len).sum()
    }
}
