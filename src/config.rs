//! Ingestion configuration
//!
//! Marker tokens, column names and wire constants. Defaults match the
//! settlement network's production spreadsheets and message layouts; a YAML
//! file and a handful of environment variables can override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Full configuration for one ingestion service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub layout: SheetLayout,
    pub encoder: EncoderConfig,
}

/// Literal tokens and column headers recognised in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Cell text that opens a scenario block (scenario header row)
    pub scenario_marker: String,
    /// Cell text that flags the scenario description row
    pub description_marker: String,
    /// Cell text that flags a step header row
    pub step_marker: String,
    /// Step column that must be non-empty for a data row to count
    pub sequence_column: String,

    pub scenario_description_column: String,
    pub scenario_type_column: String,

    pub description_column: String,
    pub step_type_column: String,
    pub channel_column: String,
    pub operation_code_column: String,
    pub originator_account_column: String,
    pub receiver_account_column: String,
    pub operation_number_column: String,
    pub issuer_column: String,
    pub financial_amount_column: String,
    pub unit_price_column: String,

    /// Scenario type used when a sheet has no description row
    pub fallback_scenario_type: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            scenario_marker: "Seq.Cenário".to_string(),
            description_marker: "***".to_string(),
            step_marker: "Seq.".to_string(),
            sequence_column: "Seq.".to_string(),
            scenario_description_column: "Descrição Cenário".to_string(),
            scenario_type_column: "Tipo Cenário".to_string(),
            description_column: "Descrição".to_string(),
            step_type_column: "TipoPassoTeste".to_string(),
            channel_column: "Canal".to_string(),
            operation_code_column: "Operação".to_string(),
            originator_account_column: "Conta Cedente".to_string(),
            receiver_account_column: "Conta Cessionária".to_string(),
            operation_number_column: "Número Comando".to_string(),
            issuer_column: "Transmissor Debito".to_string(),
            financial_amount_column: "Valor Financeiro".to_string(),
            unit_price_column: "PU".to_string(),
            fallback_scenario_type: "Importação".to_string(),
        }
    }
}

impl SheetLayout {
    /// Description given to a scenario whose sheet never names one
    pub fn fallback_description(&self, sheet: &str) -> String {
        format!("Cenário gerado da aba {}", sheet)
    }
}

/// Wire constants for both encoding policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Channel value selecting the fixed-width positional encoding
    pub positional_channel: String,
    pub positional_prefix: String,
    pub positional_trailer: String,

    pub namespace_base: String,
    pub schema_suffix: String,
    /// Prepended to the operation code to form the body tag
    pub message_prefix: String,
    pub recipient_id: String,
    pub system_domain: String,

    /// Queue that outbound envelopes are delivered to
    pub queue_name: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            positional_channel: "IOS".to_string(),
            positional_prefix: "SSEIN".to_string(),
            positional_trailer: "0".repeat(21),
            namespace_base: "http://www.bcb.gov.br/SPB/".to_string(),
            schema_suffix: ".xsd".to_string(),
            message_prefix: "SEL".to_string(),
            recipient_id: "00038121".to_string(),
            system_domain: "SPB01".to_string(),
            queue_name: "queue.RECEIVE_QUEUE".to_string(),
        }
    }
}

/// Locates and loads an [`IngestConfig`]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader that always yields the built-in defaults (plus env overrides)
    pub fn defaults() -> Self {
        Self { path: None }
    }

    /// Create loader from the SELIC_CONFIG env var, or defaults when unset
    pub fn from_env() -> Self {
        match std::env::var("SELIC_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::new(path),
            _ => Self::defaults(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the configuration file (if any), then apply env overrides
    pub fn load(&self) -> Result<IngestConfig> {
        let mut config = match &self.path {
            Some(path) => Self::load_file(path)?,
            None => IngestConfig::default(),
        };
        apply_env_overrides(&mut config);
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<IngestConfig> {
        info!("Loading ingestion configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // An empty YAML document deserializes to unit, not to a struct
        if content.trim().is_empty() {
            return Ok(IngestConfig::default());
        }

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn apply_env_overrides(config: &mut IngestConfig) {
    if let Some(value) = env_string("SELIC_POSITIONAL_CHANNEL") {
        config.encoder.positional_channel = value;
    }
    if let Some(value) = env_string("SELIC_RECIPIENT_ID") {
        config.encoder.recipient_id = value;
    }
    if let Some(value) = env_string("SELIC_SYSTEM_DOMAIN") {
        config.encoder.system_domain = value;
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_production_layout() {
        let config = IngestConfig::default();
        assert_eq!(config.layout.scenario_marker, "Seq.Cenário");
        assert_eq!(config.layout.description_marker, "***");
        assert_eq!(config.layout.step_marker, "Seq.");
        assert_eq!(config.encoder.positional_trailer.len(), 21);
        assert!(config.encoder.positional_trailer.chars().all(|c| c == '0'));
        assert_eq!(
            config.layout.fallback_description("Plan1"),
            "Cenário gerado da aba Plan1"
        );
    }

    #[test]
    fn partial_yaml_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "layout:\n  step_marker: \"Seq\"\nencoder:\n  message_prefix: \"STR\""
        )
        .unwrap();

        let loaded = ConfigLoader::new(file.path()).load_file_only().unwrap();

        assert_eq!(loaded.layout.step_marker, "Seq");
        assert_eq!(loaded.layout.scenario_marker, "Seq.Cenário");
        assert_eq!(loaded.encoder.message_prefix, "STR");
        assert_eq!(loaded.encoder.positional_prefix, "SSEIN");
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let loaded = ConfigLoader::new(file.path()).load_file_only().unwrap();
        assert_eq!(loaded, IngestConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let loader = ConfigLoader::new("/definitely/not/here/selic.yaml");
        let err = loader.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    impl ConfigLoader {
        // Env-independent variant so tests don't race on process env
        fn load_file_only(&self) -> Result<IngestConfig> {
            Self::load_file(self.path().unwrap())
        }
    }
}
