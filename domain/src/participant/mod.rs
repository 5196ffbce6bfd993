//! Deliberation participants
//!
//! One coordinator owns the proposal; experts review it, each from a single
//! domain. Expert behaviour differs only by the data carried on
//! [`Participant`] (kind, keywords, weight), never by type.

pub mod entities;
pub mod role;
pub mod roster;

pub use entities::Participant;
pub use role::{ExpertKind, ParticipantRole};
pub use roster::{MODERATOR, Roster};
