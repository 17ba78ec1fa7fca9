//! Semantic similarity between entities annotated to an ontology.
//!
//! The engine scores pairs of entities (diseases, genotypes, ...) by the
//! information content of the least common subsumer of the classes they are
//! annotated with:
//!
//! ```
//! use ontosim::ontology::{ClassId, EntityId, Ontology};
//!
//! let ontology = Ontology::builder()
//!     .edge("HP:2", "HP:1")
//!     .edge("HP:3", "HP:1")
//!     .annotation("OMIM:1", "HP:2")
//!     .annotation("OMIM:2", "HP:2")
//!     .annotation("OMIM:3", "HP:3")
//!     .build()?;
//!
//! let score = ontology.score_entity_pair(&EntityId::new("OMIM:1")?, &EntityId::new("OMIM:2")?);
//! assert_eq!(score.lcs, Some(ClassId::new("HP:2")?));
//! # Ok::<(), ontosim::Error>(())
//! ```

pub use self::errors::{Error, Result};

#[cfg(feature = "cli")]
pub mod cli;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod logger;
pub mod ontology;
