use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single blamed line from `svn blame --xml --use-merge-history` output.
/// Each entry attributes one source line to the commit that last touched it
/// on the current branch, plus the original author when merge history
/// diverges from the committer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlameLine {
    pub line_number: u32,
    pub committer_revision: String,
    pub committer: String,
    /// Commit timestamp in UTC. `None` when the timestamp text in the
    /// blame output could not be parsed.
    pub committer_date: Option<DateTime<Utc>>,
    /// Original author as revealed by merge history; equal to `committer`
    /// when no merge information applies to the line.
    pub author: String,
}
