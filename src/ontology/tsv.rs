//! Tab-separated record files.
//!
//! Every file holds two columns per line. Columns past the second are ignored,
//! blank lines are skipped and rows that cannot be split into two non-empty
//! fields (or that are not UTF-8, or whose identifiers are invalid) are
//! logged and dropped without failing the load.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::{
    repositories::{Annotation, ClassEdge, ClassLabel, EntityLabel, RecordRepository},
    value_objects::{ClassId, EntityId, IdentifierError},
};
use crate::{Error, Result};

/// Splits one line into its two leading fields.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] when fewer than two non-empty fields
/// are present.
pub fn parse_line<'a>(
    origin: &str,
    line: usize,
    raw: &'a str,
) -> Result<Option<(&'a str, &'a str)>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let mut fields = raw.split('\t').map(str::trim);
    match (fields.next(), fields.next()) {
        (Some(first), Some(second)) if !first.is_empty() && !second.is_empty() => {
            Ok(Some((first, second)))
        }
        _ => Err(Error::MalformedRecord {
            origin: origin.to_string(),
            line,
        }),
    }
}

/// Reads records from four tab-separated files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TsvRepository {
    class_labels: PathBuf,
    class_edges: PathBuf,
    annotations: PathBuf,
    entity_labels: PathBuf,
}

impl TsvRepository {
    #[must_use]
    pub fn new(
        class_labels: impl Into<PathBuf>,
        class_edges: impl Into<PathBuf>,
        annotations: impl Into<PathBuf>,
        entity_labels: impl Into<PathBuf>,
    ) -> Self {
        Self {
            class_labels: class_labels.into(),
            class_edges: class_edges.into(),
            annotations: annotations.into(),
            entity_labels: entity_labels.into(),
        }
    }
}

impl RecordRepository for TsvRepository {
    fn class_labels(&self) -> Result<Vec<ClassLabel>> {
        load(&self.class_labels, |class, name| {
            Ok(ClassLabel {
                class: ClassId::new(class)?,
                name: name.to_string(),
            })
        })
    }

    fn class_edges(&self) -> Result<Vec<ClassEdge>> {
        load(&self.class_edges, |child, parent| {
            Ok(ClassEdge {
                child: ClassId::new(child)?,
                parent: ClassId::new(parent)?,
            })
        })
    }

    fn annotations(&self) -> Result<Vec<Annotation>> {
        load(&self.annotations, |entity, class| {
            Ok(Annotation {
                entity: EntityId::new(entity)?,
                class: ClassId::new(class)?,
            })
        })
    }

    fn entity_labels(&self) -> Result<Vec<EntityLabel>> {
        load(&self.entity_labels, |entity, name| {
            Ok(EntityLabel {
                entity: EntityId::new(entity)?,
                name: name.to_string(),
            })
        })
    }
}

fn load<T, F>(path: &Path, make: F) -> Result<Vec<T>>
where
    F: Fn(&str, &str) -> Result<T, IdentifierError>,
{
    let file = File::open(path).map_err(|err| Error::missing_source(path, err))?;
    let origin = path.display().to_string();
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    let mut records = Vec::new();
    let mut skipped = 0_usize;
    let mut number = 0_usize;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        number += 1;

        let fields = match decode_line(&origin, number, &buffer)
            .and_then(|line| parse_line(&origin, number, line))
        {
            Ok(Some(fields)) => fields,
            Ok(None) => continue,
            Err(err) => {
                warn!(error = %err, "record_skipped");
                skipped += 1;
                continue;
            }
        };
        match make(fields.0, fields.1) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(origin = %origin, line = number, error = %err, "record_skipped");
                skipped += 1;
            }
        }
    }

    debug!(origin = %origin, records = records.len(), skipped, "source_loaded");
    Ok(records)
}

/// A row that is not valid UTF-8 is malformed, like a row missing a field.
fn decode_line<'a>(origin: &str, line: usize, bytes: &'a [u8]) -> Result<&'a str> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::MalformedRecord {
        origin: origin.to_string(),
        line,
    })?;
    Ok(text.trim_end_matches(|c| c == '\n' || c == '\r'))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::{parse_line, TsvRepository};
    use crate::{ontology::repositories::RecordRepository, Error};

    #[rstest]
    #[case("HP:1\tAll", Some(("HP:1", "All")))]
    #[case("HP:1\t All \textra", Some(("HP:1", "All")))]
    #[case("   ", None)]
    #[case("", None)]
    fn splits_leading_fields(#[case] raw: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(parse_line("labels", 1, raw).expect("well formed"), expected);
    }

    #[rstest]
    #[case("HP:1")]
    #[case("HP:1\t")]
    #[case("\tAll")]
    fn rejects_rows_without_two_fields(#[case] raw: &str) {
        let err = parse_line("labels", 7, raw).expect_err("malformed");
        assert!(
            matches!(err, Error::MalformedRecord { ref origin, line: 7 } if origin == "labels")
        );
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let edges = dir.path().join("edges.tsv");
        let mut file = std::fs::File::create(&edges).expect("create edges");
        writeln!(file, "HP:2\tHP:1").expect("write");
        writeln!(file, "broken row").expect("write");
        writeln!(file).expect("write");
        writeln!(file, "HP:3\tHP:1\tignored").expect("write");

        let repo = TsvRepository::new("labels.tsv", &edges, "annotations.tsv", "names.tsv");
        let records = repo.class_edges().expect("edges load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].child.as_str(), "HP:3");
    }

    #[test]
    fn rows_with_invalid_utf8_are_skipped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let annotations = dir.path().join("annotations.tsv");
        std::fs::write(&annotations, b"e1\tA\r\ne2\tB\ne\xff3\tB\n").expect("write");

        let repo = TsvRepository::new("labels.tsv", "edges.tsv", &annotations, "names.tsv");
        let records = repo.annotations().expect("annotations load");
        let entities: Vec<_> = records.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, ["e1", "e2"]);
        assert_eq!(records[0].class.as_str(), "A");
    }

    #[test]
    fn absent_file_is_a_missing_source() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = TsvRepository::new(
            dir.path().join("nope.tsv"),
            "edges.tsv",
            "annotations.tsv",
            "names.tsv",
        );
        let err = repo.class_labels().expect_err("missing file");
        assert!(matches!(err, Error::MissingSource { .. }));
    }
}
