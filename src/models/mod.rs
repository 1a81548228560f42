//! Domain models produced by ingestion

mod message;
mod scenario;

pub use message::{now_in_brazil, MessageStatus, OutboundMessage};
pub use scenario::{Channel, EncodedPayload, Scenario, Step, StepFields};
