//! Round-level deliberation types: the speaker gate, the round state
//! machine, per-round records and the final outcome.

pub mod gate;
pub mod outcome;
pub mod phase;
pub mod policy;
pub mod record;

pub use gate::{GateCheck, GateDecision, GatePolicy, GateReason, SpeakerGate};
pub use outcome::DeliberationOutcome;
pub use phase::{RoundPhase, Termination, Transition};
pub use policy::DeliberationPolicy;
pub use record::RoundRecord;
