//! Command line interface.
//!
//! ```sh
//! ontosim --config ontology.yaml compare \
//!     --class-labels labels.tsv --class-edges edges.tsv \
//!     --annotations annotations.tsv --entity-labels names.tsv
//! ```

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use crate::{
    comparison::{write_report, ComparisonRunner, ScoringContext, NO_LCS_FOUND},
    config::Config,
    logger,
    ontology::{ClassId, Ontology, TsvRepository},
    Error, Result,
};

#[derive(Parser, Debug)]
#[command(name = "ontosim", version, about = "Ontology semantic similarity")]
pub struct Cli {
    /// Configuration file (`.yaml`/`.yml`, or `key = value` options)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The four tab-separated input files.
#[derive(Args, Debug, Clone)]
pub struct Sources {
    /// Class identifier and name per line
    #[arg(long)]
    pub class_labels: PathBuf,
    /// Child and parent class identifier per line
    #[arg(long)]
    pub class_edges: PathBuf,
    /// Entity and class identifier per line
    #[arg(long)]
    pub annotations: PathBuf,
    /// Entity identifier and name per line
    #[arg(long)]
    pub entity_labels: PathBuf,
}

impl Sources {
    #[must_use]
    pub fn repository(&self) -> TsvRepository {
        TsvRepository::new(
            &self.class_labels,
            &self.class_edges,
            &self.annotations,
            &self.entity_labels,
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every entity pair and write the report
    Compare {
        #[command(flatten)]
        sources: Sources,
        /// Overrides the configured output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the least common subsumer of two classes
    Lcs {
        #[command(flatten)]
        sources: Sources,
        first: String,
        second: String,
    },
    /// Print counts and scores of the built ontology
    Stats {
        #[command(flatten)]
        sources: Sources,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns any error raised while loading configuration or running the
/// command.
pub fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => (Config::default(), None),
    };
    logger::init(&config.logger)?;
    if let Some(err) = config_error {
        warn!(error = %err, "config_missing_using_defaults");
    }

    let text = run(cli.command, config)?;
    print!("{text}");
    Ok(())
}

/// A missing file falls back to the defaults; the error is handed back so
/// it can be logged once logging is up.
fn load_config(path: &Path) -> Result<(Config, Option<Error>)> {
    match Config::from_file(path) {
        Ok(config) => Ok((config, None)),
        Err(err @ Error::MissingSource { .. }) => Ok((Config::default(), Some(err))),
        Err(err) => Err(err),
    }
}

/// Runs one command and returns what it prints.
///
/// # Errors
///
/// Returns an error when the ontology cannot be built, when an identifier
/// argument is invalid or when the report cannot be written.
pub fn run(command: Commands, mut config: Config) -> Result<String> {
    match command {
        Commands::Compare { sources, output } => {
            if let Some(directory) = output {
                config.output.directory = directory;
            }
            let ontology = Arc::new(Ontology::build(&sources.repository(), &config)?);
            let runner = ComparisonRunner::new(ScoringContext::max_ic(ontology.clone()), &config);
            let rows = runner.run();
            let path = write_report(&ontology, &rows, &config.output)?;
            Ok(format!(
                "{} {} pairs scored, report written to {}\n",
                "done".green(),
                rows.len(),
                path.display()
            ))
        }
        Commands::Lcs {
            sources,
            first,
            second,
        } => {
            let first = ClassId::new(first)?;
            let second = ClassId::new(second)?;
            let ontology = Ontology::build(&sources.repository(), &config)?;
            Ok(lcs_line(&ontology, &first, &second))
        }
        Commands::Stats { sources, json } => {
            let ontology = Ontology::build(&sources.repository(), &config)?;
            if json {
                let mut text = serde_json::to_string_pretty(&ontology.stats())?;
                text.push('\n');
                Ok(text)
            } else {
                Ok(stats_text(&ontology))
            }
        }
    }
}

fn lcs_line(ontology: &Ontology, first: &ClassId, second: &ClassId) -> String {
    match ontology.compute_lcs(first, second) {
        Some(lcs) => format!(
            "{lcs}\t{}\t{}\n",
            ontology.class_name(&lcs).unwrap_or_default(),
            ontology.ic_score(&lcs).unwrap_or_default()
        ),
        None => format!("{NO_LCS_FOUND}\n"),
    }
}

fn stats_text(ontology: &Ontology) -> String {
    let stats = ontology.stats();
    let mut text = String::new();
    let root = stats
        .root
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let _ = writeln!(text, "{:<20} {}", "classes".bold(), stats.nodes);
    let _ = writeln!(text, "{:<20} {}", "edges".bold(), stats.edges);
    let _ = writeln!(text, "{:<20} {} ({} parentless)", "root".bold(), root, stats.roots);
    let _ = writeln!(text, "{:<20} {}", "annotated entities".bold(), stats.annotated_entities);
    let _ = writeln!(text, "{:<20} {}", "labeled entities".bold(), stats.labeled_entities);
    let _ = writeln!(text, "{:<20} {}", "annotations".bold(), stats.annotations);
    let _ = writeln!(
        text,
        "{:<20} max {} (capped {} at {})",
        "information content".bold(),
        stats.information_content.max_finite,
        stats.information_content.degenerate,
        stats.information_content.cap
    );
    if let Some(important) = stats.important_nodes {
        let _ = writeln!(text, "{:<20} {}", "important classes".bold(), important);
    }
    text
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{lcs_line, Cli, Commands};
    use crate::ontology::{ClassId, Ontology};

    fn class(text: &str) -> ClassId {
        ClassId::new(text).expect("valid class id")
    }

    #[test]
    fn parses_compare_with_global_config() {
        let cli = Cli::try_parse_from([
            "ontosim",
            "compare",
            "--class-labels",
            "l.tsv",
            "--class-edges",
            "e.tsv",
            "--annotations",
            "a.tsv",
            "--entity-labels",
            "n.tsv",
            "--config",
            "ontology.config",
        ])
        .expect("valid arguments");

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("ontology.config"))
        );
        assert!(matches!(cli.command, Commands::Compare { output: None, .. }));
    }

    #[test]
    fn lcs_requires_two_classes() {
        let err = Cli::try_parse_from([
            "ontosim",
            "lcs",
            "--class-labels",
            "l.tsv",
            "--class-edges",
            "e.tsv",
            "--annotations",
            "a.tsv",
            "--entity-labels",
            "n.tsv",
            "HP:1",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn lcs_line_reports_name_and_score() {
        let ontology = Ontology::builder()
            .label("R", "root")
            .edge("A", "R")
            .edge("B", "R")
            .edge("X", "Q")
            .annotation("e1", "A")
            .annotation("e2", "B")
            .build()
            .expect("valid records");

        assert_eq!(lcs_line(&ontology, &class("A"), &class("B")), "R\troot\t0\n");
        assert_eq!(lcs_line(&ontology, &class("A"), &class("X")), "NO LCS FOUND\n");
    }
}
