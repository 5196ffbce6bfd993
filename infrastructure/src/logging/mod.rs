//! Logging infrastructure: transcript and round-history files.
//!
//! Both writers implement the
//! [`TranscriptSink`](council_application::TranscriptSink) port and never
//! interrupt a run when the disk misbehaves.

mod jsonl_rounds;
mod transcript_file;

pub use jsonl_rounds::JsonlRoundLogger;
pub use transcript_file::TranscriptFileWriter;

use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Create `path` and its parent directories, warning instead of failing
fn create_log_file(path: &Path, what: &str) -> Option<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!("Could not create {} directory {}: {}", what, parent.display(), e);
        return None;
    }

    match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("Could not create {} file {}: {}", what, path.display(), e);
            None
        }
    }
}
