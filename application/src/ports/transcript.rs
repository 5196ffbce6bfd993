//! Port for transcript emission.
//!
//! Every message appended to the log and every completed round is offered
//! to a [`TranscriptSink`]. This is separate from `tracing`-based operation
//! logs: tracing carries diagnostics, while sinks write the machine-readable
//! transcript that external renderers consume.

use council_domain::{Message, RoundRecord};
use std::sync::Arc;

/// Receiver of transcript events.
///
/// Methods are synchronous and non-fallible so a failing sink can never
/// disturb the deliberation; adapters swallow their own I/O errors.
pub trait TranscriptSink: Send + Sync {
    /// A message was appended to the log
    fn on_message(&self, message: &Message);

    /// A round was scored
    fn on_round(&self, _record: &RoundRecord) {}
}

/// No-op sink for tests and when no transcript is requested.
pub struct NoTranscript;

impl TranscriptSink for NoTranscript {
    fn on_message(&self, _message: &Message) {}
}

/// Fans events out to several sinks in order.
#[derive(Default)]
pub struct CompositeTranscript {
    sinks: Vec<Arc<dyn TranscriptSink>>,
}

impl CompositeTranscript {
    pub fn new(sinks: Vec<Arc<dyn TranscriptSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn TranscriptSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TranscriptSink for CompositeTranscript {
    fn on_message(&self, message: &Message) {
        for sink in &self.sinks {
            sink.on_message(message);
        }
    }

    fn on_round(&self, record: &RoundRecord) {
        for sink in &self.sinks {
            sink.on_round(record);
        }
    }
}
