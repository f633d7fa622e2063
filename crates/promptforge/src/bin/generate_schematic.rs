use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use promptforge::config::resolve_llm_config;
use promptforge::schematic::{CritiqueImprover, PromptBuilder, SchematicEvaluator};
use promptforge::LogFormatChoice;
use promptforge_core::{RefinementConfig, RefinementController, RunOutcome};
use promptforge_llm::LlmClient;
use promptforge_logging::{init_tracing, LogFormat, Logger};
use promptforge_score::{DocType, QualityThresholds};

#[derive(Parser, Debug)]
#[command(
    name = "generate-schematic",
    about = "Generate a scientific schematic and refine it against an automated review",
    version
)]
struct Cli {
    /// Description of the diagram to generate
    prompt: String,

    /// Output path for the final image
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum number of generation passes
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=2))]
    iterations: u32,

    /// Target publication venue, sets the quality threshold
    #[arg(long, value_enum, default_value = "default")]
    doc_type: DocTypeChoice,

    /// API key override (otherwise read from the environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Also append run events to this file as JSON lines
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DocTypeChoice {
    Journal,
    Conference,
    Poster,
    Presentation,
    Report,
    Grant,
    Thesis,
    Preprint,
    Default,
}

impl From<DocTypeChoice> for DocType {
    fn from(choice: DocTypeChoice) -> Self {
        match choice {
            DocTypeChoice::Journal => DocType::Journal,
            DocTypeChoice::Conference => DocType::Conference,
            DocTypeChoice::Poster => DocType::Poster,
            DocTypeChoice::Presentation => DocType::Presentation,
            DocTypeChoice::Report => DocType::Report,
            DocTypeChoice::Grant => DocType::Grant,
            DocTypeChoice::Thesis => DocType::Thesis,
            DocTypeChoice::Preprint => DocType::Preprint,
            DocTypeChoice::Default => DocType::Default,
        }
    }
}

/// Written alongside the final image so the critique trail survives the run.
#[derive(Serialize)]
struct ReviewLog<'a> {
    user_prompt: &'a str,
    doc_type: String,
    #[serde(flatten)]
    outcome: &'a RunOutcome,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(if cli.verbose { "debug" } else { "warn" }, log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut llm_config = resolve_llm_config(&working_dir)?;
    if let Some(ref key) = cli.api_key {
        llm_config.api_key = Some(key.clone());
    }
    let client = Arc::new(
        LlmClient::new(llm_config)
            .context("Set the OPENAI_API_KEY environment variable or pass --api-key")?,
    );

    let output_dir = cli
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let base_name = cli
        .output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schematic")
        .to_string();
    let extension = cli
        .output
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{s}"))
        .unwrap_or_else(|| ".png".to_string());

    let doc_type: DocType = cli.doc_type.into();
    let threshold = QualityThresholds::default().get(doc_type);
    let max_iterations = cli.iterations as usize;

    eprintln!("Document type: {doc_type} (quality threshold: {threshold}/10)");

    let builder = PromptBuilder::default();
    let evaluator = SchematicEvaluator::new(
        Arc::clone(&client),
        builder.clone(),
        cli.prompt.clone(),
        output_dir.clone(),
        base_name.clone(),
        extension,
        doc_type,
        threshold,
        max_iterations,
    );
    let improver = CritiqueImprover::new(builder.clone(), cli.prompt.clone());

    let logger = Arc::new(build_logger(log_format, cli.log_file.as_deref())?);
    let controller = RefinementController::new(
        &evaluator,
        &improver,
        RefinementConfig {
            tool: "generate-schematic".to_string(),
            max_iterations,
            threshold,
        },
        logger,
    );

    let outcome = controller.run(builder.initial(&cli.prompt)).await;

    if let Some(ref best) = outcome.best_artifact {
        let best_path = PathBuf::from(best);
        if best_path != cli.output {
            std::fs::copy(&best_path, &cli.output)
                .with_context(|| format!("Failed to copy best image to {}", cli.output.display()))?;
        }
    }

    let log_path = output_dir.join(format!("{base_name}_review_log.json"));
    let review_log = ReviewLog {
        user_prompt: &cli.prompt,
        doc_type: doc_type.to_string(),
        outcome: &outcome,
    };
    std::fs::write(&log_path, serde_json::to_string_pretty(&review_log)?)
        .with_context(|| format!("Failed to write {}", log_path.display()))?;

    print_outcome(&outcome, &cli.output, &log_path);
    std::process::exit(outcome.exit_code());
}

fn build_logger(format: LogFormat, log_file: Option<&Path>) -> Result<Logger> {
    match log_file {
        Some(path) => Logger::with_file(format, path)
            .with_context(|| format!("Failed to open log file {}", path.display())),
        None => Ok(Logger::new(format)),
    }
}

fn print_outcome(outcome: &RunOutcome, output: &Path, log_path: &Path) {
    eprintln!();
    if outcome.success {
        eprintln!("{}", "=== Generation Complete ===".green().bold());
    } else {
        eprintln!("{}", "=== Generation Failed ===".red().bold());
    }
    eprintln!(
        "Best score: {:.1}/10 (threshold {:.1})",
        outcome.best_score, outcome.threshold
    );
    eprintln!(
        "Passes: {}/{}{}",
        outcome.iterations_used,
        outcome.max_iterations,
        if outcome.early_stop { " (early stop)" } else { "" }
    );
    if outcome.best_artifact.is_some() {
        eprintln!("Image saved to {}", output.display());
    }
    eprintln!("Review log: {}", log_path.display());
}
