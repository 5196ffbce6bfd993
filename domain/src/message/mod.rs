//! Messages, the append-only log, and visibility routing

pub mod entities;
pub mod log;
pub mod routing;

pub use entities::{Causation, Message, Target, failure_notice};
pub use log::MessageLog;
pub use routing::{RouteRule, RoutingFilter};
