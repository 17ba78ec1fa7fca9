//! Run configuration.
//!
//! Configuration is read from a YAML document:
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: info
//!   format: compact
//! thresholding:
//!   enable: true
//!   max_important_nodes: 500
//! output:
//!   directory: output
//!   show_names: false
//! symmetric: true
//! ```
//!
//! Files without a `.yaml`/`.yml` extension are read in the flat
//! `key = value` option format (`use_thresholding = true`, ...).
//!
//! Only `thresholding` influences the ontology engine itself; `symmetric`
//! gates pair enumeration and `output` is consumed by report formatting.
use std::{
    fmt,
    path::{Path, PathBuf},
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ontology::similarity::SimilarityMeasure, Error, Result};

const OPTION_LINE: &str = r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logger: Logger,
    pub thresholding: Thresholding,
    pub output: Output,
    /// Overrides whether pairs are scored in one direction only. When unset
    /// the choice follows the symmetry of the similarity measure.
    pub symmetric: Option<bool>,
}

/// Logger configuration
///
/// The Logger is responsible for logging information, errors, and debug
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Logger {
    /// Enable log write to stdout
    pub enable: bool,
    /// Set the logger level.
    pub level: LogLevel,
    /// Set the logger format.
    pub format: Format,
    /// Override our custom tracing filter.
    ///
    /// Set this to your own filter if you want to see traces from internal
    /// libraries.
    pub override_filter: Option<String>,
    /// Set this if you want to write log to file
    pub file_appender: Option<LoggerFileAppender>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: LogLevel::default(),
            format: Format::default(),
            override_filter: None,
            file_appender: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerFileAppender {
    /// Enable logger file appender
    pub enable: bool,
    /// Enable write log to file non-blocking
    pub non_blocking: bool,
    /// Set the logger file appender level.
    pub level: LogLevel,
    /// Set the logger file appender format.
    pub format: Format,
    /// Set the logger file appender rotation.
    pub rotation: Rotation,
    /// Set the logger file appender dir
    pub dir: Option<String>,
    /// Set log filename prefix
    pub filename_prefix: Option<String>,
    /// Set log filename suffix
    pub filename_suffix: Option<String>,
    /// Set the logger file appender keep max log files.
    pub max_log_files: usize,
}

impl Default for LoggerFileAppender {
    fn default() -> Self {
        Self {
            enable: false,
            non_blocking: true,
            level: LogLevel::default(),
            format: Format::default(),
            rotation: Rotation::default(),
            dir: None,
            filename_prefix: None,
            filename_suffix: None,
            max_log_files: 7,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogLevel {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Rotation {
    #[serde(rename = "minutely")]
    Minutely,
    #[serde(rename = "hourly")]
    #[default]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "never")]
    Never,
}

/// Bounds exact LCS search to the highest-IC classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholding {
    pub enable: bool,
    pub max_important_nodes: usize,
}

/// Report layout options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Output {
    pub directory: PathBuf,
    pub show_identities: bool,
    pub show_names: bool,
    pub show_max_ic: bool,
    pub show_lcs: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            show_identities: true,
            show_names: true,
            show_max_ic: true,
            show_lcs: true,
        }
    }
}

impl Config {
    /// Loads a configuration file, picking the parser from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSource`] when the file cannot be read, and a
    /// parse error when its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|err| Error::missing_source(path, err))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Self::from_options(&content),
        }
    }

    /// Parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] on invalid documents and [`Error::Config`]
    /// when thresholding is enabled without a node budget.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses the flat `key = value` option format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `max_important_nodes` is not a number,
    /// or is missing or zero while thresholding is enabled.
    pub fn from_options(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let option_line = Regex::new(OPTION_LINE).map_err(Error::wrap)?;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(captures) = option_line.captures(line) else {
                warn!(line = index + 1, content = line, "config_option_skipped");
                continue;
            };
            let key = captures[1].to_ascii_lowercase();
            let value: String = captures[2].split_whitespace().collect();

            match key.as_str() {
                "use_thresholding" => config.thresholding.enable = parse_flag(&value),
                "max_important_nodes" => {
                    config.thresholding.max_important_nodes = value.parse().map_err(|_| {
                        Error::Config(format!(
                            "max_important_nodes must be a non-negative integer, got `{value}`"
                        ))
                    })?;
                }
                "output_directory" => config.output.directory = PathBuf::from(value),
                "show_identities" => config.output.show_identities = parse_flag(&value),
                "show_names" => config.output.show_names = parse_flag(&value),
                "show_max_ic" => config.output.show_max_ic = parse_flag(&value),
                "show_lcs" => config.output.show_lcs = parse_flag(&value),
                "symmetric" => config.symmetric = Some(parse_flag(&value)),
                other => debug!(key = other, "config_option_unknown"),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks settings that parse but cannot work together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when thresholding is enabled with a budget
    /// of zero, which would resolve every LCS to the root.
    pub fn validate(&self) -> Result<()> {
        if self.thresholding.enable && self.thresholding.max_important_nodes == 0 {
            return Err(Error::Config(
                "thresholding is enabled but max_important_nodes is 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether pair enumeration may skip one of the two orderings.
    #[must_use]
    pub fn is_symmetric(&self, measure: &dyn SimilarityMeasure) -> bool {
        self.symmetric.unwrap_or_else(|| measure.is_symmetric())
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
