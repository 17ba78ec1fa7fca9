use crate::ontology::EntityId;

/// Enumerates the entity pairs of a comparison run.
///
/// Entities are sorted and deduplicated; an entity is never paired with
/// itself. In symmetric mode only pairs with `first < second` are produced,
/// otherwise both orderings are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEnumerator {
    entities: Vec<EntityId>,
    symmetric: bool,
}

impl PairEnumerator {
    #[must_use]
    pub fn new(entities: impl IntoIterator<Item = EntityId>, symmetric: bool) -> Self {
        let mut entities: Vec<EntityId> = entities.into_iter().collect();
        entities.sort();
        entities.dedup();
        Self {
            entities,
            symmetric,
        }
    }

    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Number of pairs [`PairEnumerator::pairs`] yields.
    #[must_use]
    pub fn len(&self) -> usize {
        let n = self.entities.len();
        let ordered = n * n.saturating_sub(1);
        if self.symmetric {
            ordered / 2
        } else {
            ordered
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pairs in lexicographic order of `(first, second)`.
    pub fn pairs(&self) -> impl Iterator<Item = (&EntityId, &EntityId)> + '_ {
        let n = self.entities.len();
        let symmetric = self.symmetric;
        (0..n).flat_map(move |i| {
            let start = if symmetric { i + 1 } else { 0 };
            (start..n)
                .filter(move |&j| j != i)
                .map(move |j| (&self.entities[i], &self.entities[j]))
        })
    }
}
