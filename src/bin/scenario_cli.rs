//! Scenario Workbook CLI
//!
//! Ingests a test-scenario workbook and prints the recovered scenarios or
//! the outbound message envelopes that would be queued.
//!
//! # Usage
//!
//! ```bash
//! # Summarise scenarios and steps
//! scenario_cli ingest --file cenarios.xlsx
//!
//! # Full scenario list as JSON
//! scenario_cli ingest --file cenarios.xlsx --format json
//!
//! # Envelopes as JSON lines (delivered to an in-memory transport)
//! scenario_cli messages --file cenarios.xlsx
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use selic_oracle::{
    IngestReport, InMemoryScenarioStore, InMemoryTransport, MessageDispatcher,
    ScenarioIngestionService, ScenarioStore,
};

#[derive(Parser)]
#[command(name = "scenario_cli")]
#[command(version = "0.1.0")]
#[command(about = "Ingest settlement test-scenario workbooks and encode their messages")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// YAML configuration overriding markers, columns and wire constants
    #[arg(long, global = true, env = "SELIC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a workbook into scenarios with encoded step payloads
    Ingest {
        /// Workbook file (.xlsx, .xls, .xlsb, .ods)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Build and queue the outbound envelope of every step
    Messages {
        /// Workbook file (.xlsx, .xls, .xlsb, .ods)
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match build_service(cli.config.clone()) {
        Ok(service) => match cli.command {
            Commands::Ingest { file } => cmd_ingest(&service, file, cli.format),
            Commands::Messages { file } => cmd_messages(&service, file).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn build_service(config: Option<PathBuf>) -> anyhow::Result<ScenarioIngestionService> {
    let loader = match config {
        Some(path) => selic_oracle::ConfigLoader::new(path),
        None => selic_oracle::ConfigLoader::defaults(),
    };
    Ok(ScenarioIngestionService::new(loader.load()?))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_ingest(
    service: &ScenarioIngestionService,
    file: PathBuf,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(&file)?;
    let report = service.ingest_with_report(&bytes)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => print_report(&report),
    }
    Ok(())
}

async fn cmd_messages(service: &ScenarioIngestionService, file: PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(&file)?;

    let store = InMemoryScenarioStore::new();
    let stored = service.ingest_into(&bytes, &store).await?;

    let transport = Arc::new(InMemoryTransport::new());
    let dispatcher = MessageDispatcher::new(transport.clone(), &service.config().encoder.queue_name);

    for record in &stored {
        dispatcher.dispatch(&record.scenario).await?;
    }
    for (_, payload) in transport.sent().await {
        println!("{}", payload);
    }

    let total: usize = store.list().await?.iter().map(|s| s.steps.len()).sum();
    eprintln!(
        "{} {} messages for {} scenarios",
        "OK".green().bold(),
        total,
        stored.len()
    );
    Ok(())
}

fn print_report(report: &IngestReport) {
    for sheet in &report.sheets {
        println!(
            "{} {} ({} scenarios, {} steps, {} rows skipped)",
            "Sheet:".cyan().bold(),
            sheet.sheet,
            sheet.scenarios,
            sheet.steps,
            sheet.skipped_rows()
        );
    }

    for scenario in &report.scenarios {
        println!(
            "\n{} {} [{}]",
            "Scenario:".green().bold(),
            scenario.description,
            scenario.scenario_type
        );
        for (idx, step) in scenario.steps.iter().enumerate() {
            println!(
                "  {:>3}. {} {} {} {}",
                idx + 1,
                step.channel.as_str().yellow(),
                step.operation_code,
                step.description,
                format!("({} bytes)", step.payload.as_str().len()).dimmed()
            );
        }
    }

    println!(
        "\n{} {} scenarios, {} steps",
        "OK".green().bold(),
        report.scenarios.len(),
        report.step_count()
    );
}
