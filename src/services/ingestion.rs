//! Scenario Ingestion Service
//!
//! Opens a workbook, runs the block parser over every sheet independently
//! and returns the complete scenario list, or an error for the whole call.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tracing::{info, info_span};

use crate::config::{ConfigLoader, IngestConfig};
use crate::encoder::MessageEncoder;
use crate::error::IngestError;
use crate::models::Scenario;
use crate::parser::{ScenarioBlockParser, SkippedRow};
use crate::workbook::{read_sheets, Sheet};

use super::ports::{ScenarioStore, StoredScenario};

/// Per-sheet summary of one ingestion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub scenarios: usize,
    pub steps: usize,
    pub skipped: Vec<SkippedRow>,
}

impl SheetReport {
    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }
}

/// Scenarios plus the diagnostics gathered while building them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub scenarios: Vec<Scenario>,
    pub sheets: Vec<SheetReport>,
}

impl IngestReport {
    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(Scenario::step_count).sum()
    }
}

pub struct ScenarioIngestionService {
    config: IngestConfig,
    encoder: MessageEncoder,
}

impl Default for ScenarioIngestionService {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

impl ScenarioIngestionService {
    pub fn new(config: IngestConfig) -> Self {
        let encoder = MessageEncoder::new(config.encoder.clone());
        Self { config, encoder }
    }

    /// Build from `SELIC_CONFIG` and env overrides
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ConfigLoader::from_env().load()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn encoder(&self) -> &MessageEncoder {
        &self.encoder
    }

    /// Parse workbook bytes into scenarios with encoded step payloads
    pub fn ingest(&self, bytes: &[u8]) -> Result<Vec<Scenario>, IngestError> {
        self.ingest_with_report(bytes).map(|report| report.scenarios)
    }

    pub fn ingest_path(&self, path: impl AsRef<Path>) -> Result<Vec<Scenario>, IngestError> {
        let bytes = std::fs::read(path.as_ref())?;
        self.ingest(&bytes)
    }

    pub fn ingest_with_report(&self, bytes: &[u8]) -> Result<IngestReport, IngestError> {
        let _span = info_span!("ingest_workbook", bytes = bytes.len()).entered();
        let sheets = read_sheets(bytes)?;
        self.ingest_sheets(&sheets)
    }

    /// Run the block parser over already-tabulated sheets
    pub fn ingest_sheets(&self, sheets: &[Sheet]) -> Result<IngestReport, IngestError> {
        if sheets.is_empty() {
            return Err(IngestError::EmptyWorkbook);
        }

        let parser = ScenarioBlockParser::new(&self.config.layout, &self.encoder);
        let mut report = IngestReport::default();

        for sheet in sheets {
            let parsed = parser.parse_sheet(&sheet.name, &sheet.rows)?;
            let sheet_report = SheetReport {
                sheet: sheet.name.clone(),
                scenarios: parsed.scenarios.len(),
                steps: parsed.scenarios.iter().map(Scenario::step_count).sum(),
                skipped: parsed.skipped,
            };
            info!(
                sheet = %sheet_report.sheet,
                scenarios = sheet_report.scenarios,
                steps = sheet_report.steps,
                skipped = sheet_report.skipped_rows(),
                "Sheet processed"
            );
            report.sheets.push(sheet_report);
            report.scenarios.extend(parsed.scenarios);
        }

        info!(
            sheets = report.sheets.len(),
            scenarios = report.scenarios.len(),
            steps = report.step_count(),
            "Workbook ingested"
        );
        Ok(report)
    }

    /// Ingest, then hand every scenario to the store in order
    pub async fn ingest_into(
        &self,
        bytes: &[u8],
        store: &dyn ScenarioStore,
    ) -> anyhow::Result<Vec<StoredScenario>> {
        let scenarios = self.ingest(bytes)?;

        let mut stored = Vec::with_capacity(scenarios.len());
        for scenario in &scenarios {
            let saved = store
                .save(scenario)
                .await
                .with_context(|| format!("Failed to save scenario '{}'", scenario.description))?;
            stored.push(saved);
        }
        Ok(stored)
    }
}
