//! Scenario Block Parser
//!
//! Walks one sheet top to bottom as a small state machine over [`RowKind`]s:
//!
//! ```text
//! AwaitingScenarioHeader ──scenario header──▶ AwaitingStepHeader
//!          │                                          │
//!          └──────────────step header─────────────────┤
//!                                                     ▼
//!                                              CollectingSteps
//! ```
//!
//! A scenario header opens a new block: the in-progress scenario is emitted
//! if it has steps and discarded otherwise, and the step columns go out of
//! scope until the next step header. All state lives in a per-call cursor, so sheets never see
//! each other's column mappings.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SheetLayout;
use crate::encoder::MessageEncoder;
use crate::error::EncodingError;
use crate::models::{Channel, Scenario, StepFields};

use super::amount::parse_amount;
use super::classifier::{RowKind, TableClassifier};
use super::header_map::HeaderMap;

/// Where the parser is within the current scenario block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockState {
    AwaitingScenarioHeader,
    AwaitingStepHeader,
    CollectingSteps,
}

/// Why a step-data row was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// No step header is in scope for this row
    NoStepHeader,
    /// Fewer cells than the active header has columns
    ShortRow { cells: usize, columns: usize },
    /// The sequence column is absent or empty
    MissingSequence,
}

/// A dropped row, by zero-based sheet row index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Outcome of parsing one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetParse {
    pub scenarios: Vec<Scenario>,
    pub skipped: Vec<SkippedRow>,
}

pub struct ScenarioBlockParser<'a> {
    layout: &'a SheetLayout,
    encoder: &'a MessageEncoder,
}

impl<'a> ScenarioBlockParser<'a> {
    pub fn new(layout: &'a SheetLayout, encoder: &'a MessageEncoder) -> Self {
        Self { layout, encoder }
    }

    /// Parse one sheet's rows into zero or more non-empty scenarios
    ///
    /// Row anomalies are skipped and reported; only an encoder failure
    /// aborts.
    pub fn parse_sheet(
        &self,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<SheetParse, EncodingError> {
        let classifier = TableClassifier::new(self.layout);
        let mut cursor = SheetCursor::new(self.layout, sheet);

        for (index, row) in rows.iter().enumerate() {
            let row = row.as_slice();
            match classifier.classify(row, index) {
                RowKind::Blank => {}
                RowKind::ScenarioHeaderMarker => cursor.open_block(row),
                RowKind::ScenarioDescriptionMarker => cursor.describe(row),
                RowKind::StepHeaderMarker => cursor.set_step_headers(row, index),
                RowKind::StepData => self.collect_step(&mut cursor, row, index)?,
            }
        }

        Ok(cursor.finish())
    }

    fn collect_step(
        &self,
        cursor: &mut SheetCursor<'_>,
        row: &[String],
        index: usize,
    ) -> Result<(), EncodingError> {
        if let Some(reason) = cursor.rejection(row) {
            match &reason {
                SkipReason::NoStepHeader => {
                    debug!(sheet = cursor.sheet, row = index, "Row ignored before any step header")
                }
                _ => warn!(sheet = cursor.sheet, row = index, ?reason, "Row ignored"),
            }
            cursor.skipped.push(SkippedRow { row: index, reason });
            return Ok(());
        }

        let fields = self.step_fields(&cursor.step_headers, row);
        let payload = self.encoder.encode_step(&fields)?;
        cursor.current.steps.push(fields.into_step(payload));
        Ok(())
    }

    fn step_fields(&self, headers: &HeaderMap, row: &[String]) -> StepFields {
        let layout = self.layout;
        let cell = |column: &String| headers.lookup(column.as_str(), row);

        StepFields {
            description: cell(&layout.description_column).to_string(),
            step_type: cell(&layout.step_type_column).to_string(),
            channel: Channel::classify(
                cell(&layout.channel_column),
                &self.encoder.config().positional_channel,
            ),
            operation_code: cell(&layout.operation_code_column).to_string(),
            originator_account: cell(&layout.originator_account_column).to_string(),
            receiver_account: cell(&layout.receiver_account_column).to_string(),
            operation_number: cell(&layout.operation_number_column).to_string(),
            issuer: cell(&layout.issuer_column).to_string(),
            financial_amount: parse_amount(cell(&layout.financial_amount_column)),
            unit_price: parse_amount(cell(&layout.unit_price_column)),
        }
    }
}

/// Mutable per-sheet parse state
struct SheetCursor<'a> {
    layout: &'a SheetLayout,
    sheet: &'a str,
    state: BlockState,
    scenario_headers: HeaderMap,
    step_headers: HeaderMap,
    current: Scenario,
    scenarios: Vec<Scenario>,
    skipped: Vec<SkippedRow>,
}

impl<'a> SheetCursor<'a> {
    fn new(layout: &'a SheetLayout, sheet: &'a str) -> Self {
        Self {
            layout,
            sheet,
            state: BlockState::AwaitingScenarioHeader,
            scenario_headers: HeaderMap::default(),
            step_headers: HeaderMap::default(),
            current: fallback_scenario(layout, sheet),
            scenarios: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn open_block(&mut self, row: &[String]) {
        self.flush();
        // An empty block's description must not carry into the next one
        self.current = fallback_scenario(self.layout, self.sheet);
        self.scenario_headers = HeaderMap::build(row);
        self.step_headers = HeaderMap::default();
        self.state = BlockState::AwaitingStepHeader;
        debug!(
            sheet = self.sheet,
            columns = self.scenario_headers.column_count(),
            "Scenario headers identified"
        );
    }

    fn describe(&mut self, row: &[String]) {
        // A description after collected steps starts the next scenario
        self.flush();

        if self.scenario_headers.is_empty() {
            debug!(
                sheet = self.sheet,
                "Description row without scenario headers, keeping sheet default"
            );
            return;
        }

        self.current.description = self
            .scenario_headers
            .lookup(&self.layout.scenario_description_column, row)
            .to_string();
        self.current.scenario_type = self
            .scenario_headers
            .lookup(&self.layout.scenario_type_column, row)
            .to_string();
    }

    fn set_step_headers(&mut self, row: &[String], index: usize) {
        self.step_headers = HeaderMap::build(row);
        self.state = BlockState::CollectingSteps;
        debug!(
            sheet = self.sheet,
            row = index,
            columns = self.step_headers.column_count(),
            "Step headers identified"
        );
    }

    fn rejection(&self, row: &[String]) -> Option<SkipReason> {
        if self.state != BlockState::CollectingSteps {
            return Some(SkipReason::NoStepHeader);
        }
        let columns = self.step_headers.column_count();
        if row.len() < columns {
            return Some(SkipReason::ShortRow {
                cells: row.len(),
                columns,
            });
        }
        if self.sequence_cell(row).is_empty() {
            return Some(SkipReason::MissingSequence);
        }
        None
    }

    /// Sequence cell of a data row; column 0 when the header has no sequence column
    fn sequence_cell<'r>(&self, row: &'r [String]) -> &'r str {
        let offset = self
            .step_headers
            .offset(&self.layout.sequence_column)
            .unwrap_or(0);
        row.get(offset).map(String::as_str).unwrap_or("")
    }

    /// Emit the in-progress scenario if it has steps and start a fresh one
    fn flush(&mut self) {
        if self.current.steps.is_empty() {
            return;
        }
        let next = fallback_scenario(self.layout, self.sheet);
        self.scenarios.push(std::mem::replace(&mut self.current, next));
    }

    fn finish(mut self) -> SheetParse {
        self.flush();
        if self.scenarios.is_empty() {
            debug!(sheet = self.sheet, "No test steps found in sheet");
        }
        SheetParse {
            scenarios: self.scenarios,
            skipped: self.skipped,
        }
    }
}

fn fallback_scenario(layout: &SheetLayout, sheet: &str) -> Scenario {
    Scenario::new(
        layout.fallback_description(sheet),
        layout.fallback_scenario_type.clone(),
    )
}
