//! Transcript line codec
//!
//! Every message is emitted as one line:
//!
//! ```text
//! [ROUND_<n>|<participant-name>|<content with newlines escaped>]
//! ```
//!
//! Consumers split on the first two `|` and reverse the newline escaping,
//! so participant names must never contain `|` (the roster rejects them).
//! Content may contain `|` freely. Carriage returns are dropped.

use crate::message::Message;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PREFIX: &str = "[ROUND_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptParseError {
    #[error("line is not wrapped in [ROUND_...]")]
    NotATranscriptLine,

    #[error("missing '|' delimiter")]
    MissingDelimiter,

    #[error("invalid round index: {0}")]
    InvalidRound(String),
}

/// One decoded transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub round: u32,
    pub participant: String,
    pub content: String,
}

impl TranscriptLine {
    pub fn new(round: u32, participant: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            round,
            participant: participant.into(),
            content: content.into(),
        }
    }

    pub fn from_message(message: &Message) -> Self {
        Self::new(message.round(), message.origin(), message.content())
    }

    /// Single-line wire form
    pub fn encode(&self) -> String {
        format!(
            "{}{}|{}|{}]",
            PREFIX,
            self.round,
            self.participant,
            escape(&self.content)
        )
    }

    /// Decode one wire line (surrounding whitespace is ignored)
    pub fn parse(line: &str) -> Result<Self, TranscriptParseError> {
        let inner = line
            .trim()
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(TranscriptParseError::NotATranscriptLine)?;

        let mut parts = inner.splitn(3, '|');
        let round = parts.next().unwrap_or_default();
        let (Some(participant), Some(content)) = (parts.next(), parts.next()) else {
            return Err(TranscriptParseError::MissingDelimiter);
        };
        let round = round
            .parse::<u32>()
            .map_err(|_| TranscriptParseError::InvalidRound(round.to_string()))?;

        Ok(Self::new(round, participant, unescape(content)))
    }

    /// Decode every transcript line found in free-form text, skipping the rest
    pub fn scan(text: &str) -> Vec<Self> {
        text.lines()
            .filter_map(|line| {
                let start = line.find(PREFIX)?;
                Self::parse(&line[start..]).ok()
            })
            .collect()
    }
}

impl std::fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

fn escape(content: &str) -> String {
    content.replace('\r', "").replace('\n', "\\n")
}

fn unescape(content: &str) -> String {
    content.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Roster;

    #[test]
    fn test_encode_escapes_newlines() {
        let line = TranscriptLine::new(3, "economist", "line one\r\nline two");
        assert_eq!(line.encode(), "[ROUND_3|economist|line one\\nline two]");
    }

    #[test]
    fn test_parse_splits_on_first_two_delimiters() {
        let line = TranscriptLine::parse("[ROUND_2|policy-office|a | b | c\\nd]").unwrap();
        assert_eq!(line.round, 2);
        assert_eq!(line.participant, "policy-office");
        assert_eq!(line.content, "a | b | c\nd");
    }

    #[test]
    fn test_parse_keeps_inner_brackets() {
        let line = TranscriptLine::parse("[ROUND_1|x|[generation failed: timeout]]").unwrap();
        assert_eq!(line.content, "[generation failed: timeout]");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TranscriptLine::parse("hello"),
            Err(TranscriptParseError::NotATranscriptLine)
        );
        assert_eq!(
            TranscriptLine::parse("[ROUND_1|only-name]"),
            Err(TranscriptParseError::MissingDelimiter)
        );
        assert_eq!(
            TranscriptLine::parse("[ROUND_x|a|b]"),
            Err(TranscriptParseError::InvalidRound("x".into()))
        );
    }

    #[test]
    fn test_from_message_and_back() {
        let roster = Roster::default_council();
        let msg = Message::coordinator_revision(
            roster.coordinator(),
            "REVISED PROPOSAL:\n低空物流试点\n\nCHANGES MADE:\n1. 增加空域管理",
            4,
        );
        let encoded = TranscriptLine::from_message(&msg).encode();
        assert!(!encoded.contains('\n'));
        let decoded = TranscriptLine::parse(&encoded).unwrap();
        assert_eq!(decoded.content, msg.content());
        assert_eq!(decoded.participant, "policy-office");
    }

    #[test]
    fn test_scan_skips_noise() {
        let text = "2024-01-01 INFO starting\n\
                    2024-01-01 INFO [ROUND_1|economist|ok]\n\
                    garbage [ROUND_|x]\n\
                    [ROUND_2|logistics|fine]";
        let lines = TranscriptLine::scan(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].participant, "economist");
        assert_eq!(lines[1].round, 2);
    }
}
