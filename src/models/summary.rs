use std::fmt;
use std::path::PathBuf;

/// Outcome of one aggregation run, rendered as a single line for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// Today's result file already existed; nothing was fetched
    Skipped { path: PathBuf },
    Completed { items: usize, path: PathBuf },
    Failed { message: String },
}

impl RunSummary {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunSummary::Failed { .. })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunSummary::Skipped { .. } => {
                write!(f, "Aggregation skipped: Results for today already exist.")
            }
            RunSummary::Completed { items, .. } => write!(f, "Completed: {} items aggregated", items),
            RunSummary::Failed { message } => write!(f, "Critical failure: {}", message),
        }
    }
}
