//! Spreadsheet structure recovery
//!
//! Rows are classified by marker tokens, header rows become positional
//! column indexes, and a per-sheet state machine assembles scenarios and
//! their ordered steps.

pub mod amount;
pub mod block_parser;
pub mod classifier;
pub mod header_map;

pub use amount::parse_amount;
pub use block_parser::{BlockState, ScenarioBlockParser, SheetParse, SkipReason, SkippedRow};
pub use classifier::{RowKind, TableClassifier};
pub use header_map::HeaderMap;
