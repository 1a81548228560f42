//! Row classification by literal marker tokens

use serde::Serialize;

use crate::config::SheetLayout;

/// Structural role of one sheet row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowKind {
    ScenarioHeaderMarker,
    ScenarioDescriptionMarker,
    StepHeaderMarker,
    StepData,
    Blank,
}

/// Stateless classifier over the configured marker tokens
#[derive(Debug, Clone, Copy)]
pub struct TableClassifier<'a> {
    layout: &'a SheetLayout,
}

impl<'a> TableClassifier<'a> {
    pub fn new(layout: &'a SheetLayout) -> Self {
        Self { layout }
    }

    /// Classify a row given its zero-based index within the sheet
    ///
    /// Markers are checked in the order scenario header, scenario
    /// description, step header; the first match wins. Row 0 is a step
    /// header when it carries no scenario marker, for sheets that never use
    /// the explicit step marker.
    pub fn classify<S: AsRef<str>>(&self, row: &[S], index: usize) -> RowKind {
        if row.is_empty() {
            return RowKind::Blank;
        }
        if contains_token(row, &self.layout.scenario_marker) {
            return RowKind::ScenarioHeaderMarker;
        }
        if contains_token(row, &self.layout.description_marker) {
            return RowKind::ScenarioDescriptionMarker;
        }
        if index == 0 || contains_token(row, &self.layout.step_marker) {
            return RowKind::StepHeaderMarker;
        }
        RowKind::StepData
    }
}

fn contains_token<S: AsRef<str>>(row: &[S], token: &str) -> bool {
    row.iter().any(|cell| cell.as_ref() == token)
}
