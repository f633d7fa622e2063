use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use promptforge::config::resolve_llm_config;
use promptforge::optimize::{
    default_suite, load_suite, PromptVariants, SuiteEvaluator, DEFAULT_SYSTEM_PROMPT,
    TARGET_ACCURACY,
};
use promptforge::LogFormatChoice;
use promptforge_core::{RefinementConfig, RefinementController, RunOutcome};
use promptforge_llm::LlmClient;
use promptforge_logging::{init_tracing, LogFormat, Logger};

#[derive(Parser, Debug)]
#[command(
    name = "optimize-prompt",
    about = "Iteratively optimize a prompt template against a test suite",
    version
)]
struct Cli {
    /// Path to a JSON file containing test cases
    #[arg(long)]
    test_suite: Option<PathBuf>,

    /// Base prompt template to optimize
    #[arg(
        long,
        default_value = "Classify the sentiment of: {text}\nSentiment:"
    )]
    base_prompt: String,

    /// Maximum number of optimization iterations
    #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    max_iterations: u32,

    /// Output file for the optimization trace
    #[arg(short, long, default_value = "optimization_results.json")]
    output: PathBuf,

    /// A/B test the base prompt against this prompt instead of optimizing
    #[arg(long)]
    ab_test: Option<String>,

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

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(if cli.verbose { "debug" } else { "warn" }, log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let llm_config = resolve_llm_config(&working_dir)?;
    let client = Arc::new(
        LlmClient::new(llm_config)
            .context("Set the OPENAI_API_KEY environment variable to run this tool")?,
    );

    let suite = match cli.test_suite {
        Some(ref path) => load_suite(path),
        None => {
            eprintln!("Using default test suite for sentiment analysis.");
            default_suite()
        }
    };

    let evaluator = SuiteEvaluator::new(client, suite, DEFAULT_SYSTEM_PROMPT.to_string());
    eprintln!("Test cases: {}", evaluator.suite_len());

    // A/B mode: evaluate two prompts, report, and skip the refinement loop
    if let Some(ref prompt_b) = cli.ab_test {
        let report = evaluator.compare(&cli.base_prompt, prompt_b).await;
        eprintln!();
        eprintln!("{}", "=== A/B Test ===".bold());
        eprintln!("Prompt A: {}", report.prompt_a_metrics.summary());
        eprintln!("Prompt B: {}", report.prompt_b_metrics.summary());
        eprintln!(
            "Winner: {} (accuracy improvement {:.2})",
            report.winner.bold(),
            report.improvement
        );
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&cli.output, json)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        eprintln!("Report exported to {}", cli.output.display());
        return Ok(());
    }

    let mutator = PromptVariants;
    let logger = Arc::new(build_logger(log_format, cli.log_file.as_deref())?);
    let controller = RefinementController::new(
        &evaluator,
        &mutator,
        RefinementConfig {
            tool: "optimize-prompt".to_string(),
            max_iterations: cli.max_iterations as usize,
            threshold: TARGET_ACCURACY,
        },
        logger,
    );

    let outcome = controller.run(cli.base_prompt).await;

    let json = serde_json::to_string_pretty(&outcome)?;
    std::fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    print_outcome(&outcome, &cli.output);
    std::process::exit(outcome.exit_code());
}

fn build_logger(format: LogFormat, log_file: Option<&std::path::Path>) -> Result<Logger> {
    match log_file {
        Some(path) => Logger::with_file(format, path)
            .with_context(|| format!("Failed to open log file {}", path.display())),
        None => Ok(Logger::new(format)),
    }
}

fn print_outcome(outcome: &RunOutcome, output: &PathBuf) {
    eprintln!();
    if outcome.success {
        eprintln!("{}", "=== Optimization Complete ===".green().bold());
    } else {
        eprintln!("{}", "=== Optimization Failed ===".red().bold());
    }
    eprintln!("Best accuracy: {:.2}", outcome.best_score);
    eprintln!(
        "Iterations: {}/{}{}",
        outcome.iterations_used,
        outcome.max_iterations,
        if outcome.early_stop { " (early stop)" } else { "" }
    );
    eprintln!("Best prompt:\n{}", outcome.best_candidate);
    eprintln!("Results exported to {}", output.display());
}
