//! Services
//!
//! Ingestion orchestration plus the ports through which persistence and
//! transport collaborators receive its output.

pub mod dispatch;
pub mod ingestion;
pub mod memory;
pub mod ports;

pub use dispatch::MessageDispatcher;
pub use ingestion::{IngestReport, ScenarioIngestionService, SheetReport};
pub use memory::{InMemoryScenarioStore, InMemoryTransport};
pub use ports::{MessageTransport, ScenarioStore, StoredScenario, StoredStep};
