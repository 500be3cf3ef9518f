//! Files and terminal output produced by the `export` command.

mod graph;
mod report;
mod tabular;

use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

pub use self::{
    graph::PowerGraph,
    report::Report,
    tabular::{write_hourly, write_raw},
};

/// Output file names for the exported period.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPaths {
    pub raw: PathBuf,
    pub hourly: PathBuf,

    /// Markdown report, only for a multi-day period.
    pub report: Option<PathBuf>,
}

impl ExportPaths {
    pub fn new(output_dir: &Path, dates: &RangeInclusive<NaiveDate>) -> Self {
        let (since, until) = (dates.start(), dates.end());
        if since == until {
            Self {
                raw: output_dir.join(format!("power_{since}.csv")),
                hourly: output_dir.join(format!("hourly_{since}.csv")),
                report: None,
            }
        } else {
            let suffix = format!("{since}_to_{until}");
            Self {
                raw: output_dir.join(format!("power_{suffix}.csv")),
                hourly: output_dir.join(format!("hourly_{suffix}.csv")),
                report: Some(output_dir.join(format!("stats_{suffix}.md"))),
            }
        }
    }
}
