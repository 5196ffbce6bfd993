//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished deliberation is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round, version history and the final analysis
    Full,
    /// Final proposal and verdict only (default)
    #[default]
    Summary,
    /// The whole outcome as JSON
    Json,
}
