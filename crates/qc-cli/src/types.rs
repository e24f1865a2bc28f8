use std::path::PathBuf;

use qc_report::RenderSummary;

/// Where the page plans went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
    /// Dry run: laid out but not written.
    Discarded,
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub input: PathBuf,
    pub target: OutputTarget,
    pub summary: RenderSummary,
}
