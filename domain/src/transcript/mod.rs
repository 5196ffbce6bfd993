//! Wire format consumed by external transcript renderers

pub mod line;

pub use line::{TranscriptLine, TranscriptParseError};
