//! SELIC Oracle - spreadsheet test scenarios to settlement wire messages
//!
//! Recovers a scenario/step hierarchy from loosely structured, human-authored
//! workbooks and encodes every step into its channel's wire payload.
//!
//! ## Call Chain
//! Workbook bytes -> Sheets -> ScenarioBlockParser (per sheet)
//! -> Scenario { steps } -> MessageEncoder (per step) -> caller
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use selic_oracle::ScenarioIngestionService;
//!
//! let bytes = std::fs::read("cenarios.xlsx").unwrap();
//! let scenarios = ScenarioIngestionService::default().ingest(&bytes).unwrap();
//! for scenario in &scenarios {
//!     println!("{}: {} steps", scenario.description, scenario.steps.len());
//! }
//! ```

// Core error handling
pub mod error;

// Marker tokens, column names and wire constants
pub mod config;

// Scenario, step and envelope value objects
pub mod models;

// Workbook bytes -> string grids
pub mod workbook;

// Row classification, header maps and the per-sheet state machine
pub mod parser;

// Positional and XML wire encodings
pub mod encoder;

// Ingestion orchestration and collaborator ports
pub mod services;

pub use config::{ConfigLoader, EncoderConfig, IngestConfig, SheetLayout};
pub use encoder::{FieldValue, MessageEncoder, MessageFields};
pub use error::{EncodingError, IngestError};
pub use models::{Channel, EncodedPayload, MessageStatus, OutboundMessage, Scenario, Step};
pub use parser::{HeaderMap, RowKind, ScenarioBlockParser, TableClassifier};
pub use services::{
    InMemoryScenarioStore, InMemoryTransport, IngestReport, MessageDispatcher, MessageTransport,
    ScenarioIngestionService, ScenarioStore, SheetReport, StoredScenario,
};
pub use workbook::{read_sheets, Sheet};
