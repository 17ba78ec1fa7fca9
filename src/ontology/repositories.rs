//! Input records and the contract of the sources that supply them.

use serde::Serialize;

use super::value_objects::{ClassId, EntityId};
use crate::Result;

/// Display name of an ontology class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassLabel {
    pub class: ClassId,
    pub name: String,
}

/// `child is_a parent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassEdge {
    pub child: ClassId,
    pub parent: ClassId,
}

/// An entity directly described by a class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub entity: EntityId,
    pub class: ClassId,
}

/// Display name of an annotated entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityLabel {
    pub entity: EntityId,
    pub name: String,
}

/// Supplies the four record streams an ontology is built from.
///
/// Implementations report an unavailable stream with
/// [`Error::MissingSource`](crate::Error::MissingSource); the build logs it
/// and carries on with the other streams.
pub trait RecordRepository {
    /// Class identifier and display name pairs.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read.
    fn class_labels(&self) -> Result<Vec<ClassLabel>>;

    /// Child to parent edges.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read.
    fn class_edges(&self) -> Result<Vec<ClassEdge>>;

    /// Entity to class annotations.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read.
    fn annotations(&self) -> Result<Vec<Annotation>>;

    /// Entity identifier and display name pairs.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read.
    fn entity_labels(&self) -> Result<Vec<EntityLabel>>;
}

/// Records held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryRecords {
    pub class_labels: Vec<ClassLabel>,
    pub class_edges: Vec<ClassEdge>,
    pub annotations: Vec<Annotation>,
    pub entity_labels: Vec<EntityLabel>,
}

impl InMemoryRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_class_label(&mut self, class: ClassId, name: impl Into<String>) {
        self.class_labels.push(ClassLabel {
            class,
            name: name.into(),
        });
    }

    pub fn push_class_edge(&mut self, child: ClassId, parent: ClassId) {
        self.class_edges.push(ClassEdge { child, parent });
    }

    pub fn push_annotation(&mut self, entity: EntityId, class: ClassId) {
        self.annotations.push(Annotation { entity, class });
    }

    pub fn push_entity_label(&mut self, entity: EntityId, name: impl Into<String>) {
        self.entity_labels.push(EntityLabel {
            entity,
            name: name.into(),
        });
    }
}

impl RecordRepository for InMemoryRecords {
    fn class_labels(&self) -> Result<Vec<ClassLabel>> {
        Ok(self.class_labels.clone())
    }

    fn class_edges(&self) -> Result<Vec<ClassEdge>> {
        Ok(self.class_edges.clone())
    }

    fn annotations(&self) -> Result<Vec<Annotation>> {
        Ok(self.annotations.clone())
    }

    fn entity_labels(&self) -> Result<Vec<EntityLabel>> {
        Ok(self.entity_labels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryRecords, RecordRepository};
    use crate::ontology::value_objects::{ClassId, EntityId};

    #[test]
    fn in_memory_records_are_returned_in_insertion_order() {
        let mut records = InMemoryRecords::new();
        let root = ClassId::new("HP:1").expect("valid class id");
        let leaf = ClassId::new("HP:2").expect("valid class id");
        let disease = EntityId::new("OMIM:1").expect("valid entity id");

        records.push_class_label(root.clone(), "All");
        records.push_class_label(leaf.clone(), "Leaf");
        records.push_class_edge(leaf.clone(), root.clone());
        records.push_annotation(disease.clone(), leaf.clone());
        records.push_entity_label(disease, "Disease");

        let labels = records.class_labels().expect("labels");
        assert_eq!(labels[0].class, root);
        assert_eq!(labels[1].name, "Leaf");
        assert_eq!(records.class_edges().expect("edges")[0].child, leaf);
        assert_eq!(records.annotations().expect("annotations").len(), 1);
        assert_eq!(records.entity_labels().expect("entity labels")[0].name, "Disease");
    }
}
