//! Tab-separated comparison reports.
//!
//! Columns, each behind its `output` flag: first id, first name, second id,
//! second name, score, LCS class.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use tracing::info;

use super::runner::ComparisonRow;
use crate::{
    config::Output,
    ontology::{EntityId, Ontology, UNNAMED},
    Result,
};

/// Written in place of the LCS column when a pair has no common subsumer.
pub const NO_LCS_FOUND: &str = "NO LCS FOUND";

/// File name of the report inside the output directory.
pub const REPORT_FILE: &str = "scores.tsv";

/// Formats one report line, without the trailing newline.
#[must_use]
pub fn format_row(ontology: &Ontology, row: &ComparisonRow, output: &Output) -> String {
    let name = |entity: &EntityId| ontology.entity_name(entity).unwrap_or(UNNAMED).to_string();
    let mut fields = Vec::with_capacity(6);

    if output.show_identities {
        fields.push(row.first.to_string());
    }
    if output.show_names {
        fields.push(name(&row.first));
    }
    if output.show_identities {
        fields.push(row.second.to_string());
    }
    if output.show_names {
        fields.push(name(&row.second));
    }
    if output.show_max_ic {
        fields.push(row.score.value.to_string());
    }
    if output.show_lcs {
        fields.push(
            row.score
                .lcs
                .as_ref()
                .map_or_else(|| NO_LCS_FOUND.to_string(), ToString::to_string),
        );
    }

    fields.join("\t")
}

/// Formats every row, one line each.
#[must_use]
pub fn render(ontology: &Ontology, rows: &[ComparisonRow], output: &Output) -> String {
    let mut report = String::new();
    for row in rows {
        report.push_str(&format_row(ontology, row, output));
        report.push('\n');
    }
    report
}

/// Writes the report to `<output.directory>/scores.tsv`, creating the
/// directory when needed, and returns the file path.
///
/// # Errors
///
/// Fails when the directory or the file cannot be written.
pub fn write_report(
    ontology: &Ontology,
    rows: &[ComparisonRow],
    output: &Output,
) -> Result<PathBuf> {
    fs::create_dir_all(&output.directory)?;
    let path = output.directory.join(REPORT_FILE);

    let mut writer = BufWriter::new(File::create(&path)?);
    for row in rows {
        writeln!(writer, "{}", format_row(ontology, row, output))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "report_written");
    Ok(path)
}
