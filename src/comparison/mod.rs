//! All-pairs comparison of annotated entities.
//!
//! [`PairEnumerator`] decides which pairs are scored, [`ComparisonRunner`]
//! fans them out over a rayon pool and [`report`] turns the results into
//! tab-separated lines.

pub mod pairs;
pub mod report;
pub mod runner;

pub use pairs::PairEnumerator;
pub use report::{format_row, render, write_report, NO_LCS_FOUND, REPORT_FILE};
pub use runner::{ComparisonRow, ComparisonRunner, ScoringContext};
