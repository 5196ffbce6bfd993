//! Transcript file writer.
//!
//! Writes one `[ROUND_<n>|<name>|<escaped content>]` line per message, the
//! format external renderers read.

use council_application::ports::transcript::TranscriptSink;
use council_domain::{Message, TranscriptLine};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct TranscriptFileWriter {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl TranscriptFileWriter {
    /// Returns `None` (after a warning) if the file cannot be created
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file = super::create_log_file(path, "transcript")?;
        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptSink for TranscriptFileWriter {
    fn on_message(&self, message: &Message) {
        let line = TranscriptLine::from_message(message).encode();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for TranscriptFileWriter {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Participant, Roster};

    #[test]
    fn test_lines_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.transcript");
        let writer = TranscriptFileWriter::new(&path).unwrap();

        let roster = Roster::default_council();
        let economist: &Participant = &roster.experts()[0];
        writer.on_message(&Message::proposal_broadcast("Open corridors", 1));
        writer.on_message(&Message::expert_feedback(
            economist,
            roster.coordinator().name(),
            "同意\r\n但需评估成本",
            1,
        ));
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "[ROUND_1|moderator|Open corridors]\n[ROUND_1|economist|同意\\n但需评估成本]\n"
        );

        let parsed = TranscriptLine::scan(&content);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].content, "同意\n但需评估成本");
    }
}
