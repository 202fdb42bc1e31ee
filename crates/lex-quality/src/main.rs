//! CLI entry point for the data quality auditor.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use lex_quality::pipeline::{write_outputs, write_profile};
use lex_quality::{AnalysisConfig, Analyzer, OutputPaths, ReportRenderer, TableLoader};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "ai")]
use lex_quality::ai::{
    AIProvider, GeminiConfig, GeminiProvider, OpenRouterConfig, OpenRouterProvider,
};
#[cfg(feature = "ai")]
use std::env;
#[cfg(feature = "ai")]
use std::sync::Arc;
#[cfg(feature = "ai")]
use tracing::warn;

/// Generative backend selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProvider {
    /// OpenRouter chat completions (OPENROUTER_API_KEY)
    Openrouter,
    /// Google Gemini (GEMINI_API_KEY)
    Gemini,
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "AI-optional data quality auditor",
    long_about = "Profiles a table, detects data quality issues and suggests \
                  dbt-style column tests.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENROUTER_API_KEY    API key for OpenRouter\n  \
                  GEMINI_API_KEY        API key for Gemini\n\n\
                  EXAMPLES:\n  \
                  # Profile only\n  \
                  lex-quality profile --table-path orders.csv\n\n  \
                  # Full run with rule-based analysis\n  \
                  lex-quality run --table-path orders.csv --output-dir out/ --no-ai"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and profile a table, then write the profile document
    Profile(CommonArgs),
    /// Run the full pipeline and write the profile and test documents
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the table (.csv, .parquet or .pq)
    #[arg(short = 'p', long)]
    table_path: PathBuf,

    /// Table name used in the documents
    ///
    /// Defaults to the file name without its extension
    #[arg(short = 'n', long)]
    table_name: Option<String>,

    /// Directory the documents are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Disable the generative backend (rule-based only)
    #[arg(long, default_value = "false")]
    no_ai: bool,

    /// Generative backend to use
    #[arg(long, value_enum, default_value = "openrouter")]
    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    provider: CliProvider,

    /// Model override for the selected backend
    #[arg(long)]
    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    model: Option<String>,

    /// Null fraction above which a column is flagged (0.0 - 1.0)
    #[arg(long, default_value = "0.3")]
    high_null_threshold: f64,

    /// Distinct count at or below which a column is flagged as constant
    #[arg(long, default_value = "1")]
    constant_threshold: usize,

    /// Required distinct fraction for identifier columns (0.0 - 1.0)
    #[arg(long, default_value = "1.0")]
    id_uniqueness_threshold: f64,

    /// Null fraction below which a not_null test is suggested (0.0 - 1.0)
    #[arg(long, default_value = "0.05")]
    not_null_threshold: f64,
}

/// Log filter from `RUST_LOG`, or the CLI level when it is unset.
fn log_filter(level: &str, quiet: bool) -> EnvFilter {
    let effective_level = if quiet { "warn" } else { level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level))
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level, quiet))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let common = match &cli.command {
        Command::Profile(common) => common,
        Command::Run(run) => &run.common,
    };
    // Load environment variables from .env file, RUST_LOG included
    dotenv().ok();
    init_logging(&common.log_level, common.quiet);

    let result = match &cli.command {
        Command::Profile(args) => run_profile(args),
        Command::Run(args) => run_analysis(args),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn table_name(args: &CommonArgs) -> Result<String> {
    if let Some(name) = &args.table_name {
        return Ok(name.clone());
    }
    args.table_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Cannot derive a table name from {}", args.table_path.display()))
}

/// `profile` subcommand: load, profile and write `<table>_profile.json`.
fn run_profile(args: &CommonArgs) -> Result<()> {
    let name = table_name(args)?;
    let table = TableLoader::load(&args.table_path, &name)?;

    let config = AnalysisConfig::builder().use_ai(false).build()?;
    let analyzer = Analyzer::builder().config(config).build()?;
    let profile = analyzer.profile(&table.df, &name)?;

    let path = write_profile(&profile, &args.output_dir)?;

    println!("{}", serde_json::to_string_pretty(&table.metadata)?);
    println!("Profile JSON: {}", path.display());
    Ok(())
}

/// `run` subcommand: full pipeline, both documents, printed report.
fn run_analysis(args: &RunArgs) -> Result<()> {
    let name = table_name(&args.common)?;
    let table = TableLoader::load(&args.common.table_path, &name)?;
    info!(
        "Loaded '{}': {} rows x {} columns",
        name, table.metadata.row_count, table.metadata.column_count
    );

    let config = AnalysisConfig::builder()
        .high_null_threshold(args.high_null_threshold)
        .constant_threshold(args.constant_threshold)
        .id_uniqueness_threshold(args.id_uniqueness_threshold)
        .not_null_threshold(args.not_null_threshold)
        .use_ai(!args.no_ai)
        .build()?;

    let analyzer = build_analyzer(args, config)?;

    info!("{}", "=".repeat(80));
    info!("Starting data quality analysis...");
    info!("{}", "=".repeat(80));

    let result = analyzer.analyze(&table.df, &name)?;
    let paths = write_outputs(&result, &args.common.output_dir)?;

    print_report(&result, &paths);
    Ok(())
}

fn print_report(result: &lex_quality::AnalysisResult, paths: &OutputPaths) {
    println!("\n{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}\n", "=".repeat(80));
    print!(
        "{}",
        ReportRenderer::render(&result.profile, &result.issues, &result.suggestions, paths)
    );
    println!("{}", "=".repeat(80));
}

/// Build the analyzer with optional AI support
#[cfg(feature = "ai")]
fn build_analyzer(args: &RunArgs, config: AnalysisConfig) -> Result<Analyzer> {
    if args.no_ai {
        info!("Running in rule-based mode (AI disabled)");
        return Ok(Analyzer::builder().config(config).build()?);
    }

    let provider = match make_provider(args)? {
        Some(provider) => provider,
        None => return Ok(Analyzer::builder().config(config).build()?),
    };

    Ok(Analyzer::builder()
        .config(config)
        .ai_provider(provider)
        .build()?)
}

/// Construct the selected provider, or `None` when its API key is not set.
#[cfg(feature = "ai")]
fn make_provider(args: &RunArgs) -> Result<Option<Arc<dyn AIProvider>>> {
    let key_var = match args.provider {
        CliProvider::Openrouter => "OPENROUTER_API_KEY",
        CliProvider::Gemini => "GEMINI_API_KEY",
    };
    let api_key = match env::var(key_var) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            warn!("{} not set. Falling back to rule-based analysis.", key_var);
            return Ok(None);
        }
    };

    let provider: Arc<dyn AIProvider> = match args.provider {
        CliProvider::Openrouter => {
            let mut builder = OpenRouterConfig::builder();
            if let Some(model) = &args.model {
                builder = builder.model(model.clone());
            }
            Arc::new(OpenRouterProvider::with_config(api_key, builder.build())?)
        }
        CliProvider::Gemini => {
            let mut builder = GeminiConfig::builder();
            if let Some(model) = &args.model {
                builder = builder.model(model.clone());
            }
            Arc::new(GeminiProvider::with_config(api_key, builder.build())?)
        }
    };
    Ok(Some(provider))
}

/// Build the analyzer without AI support (fallback when "ai" feature is disabled)
#[cfg(not(feature = "ai"))]
fn build_analyzer(args: &RunArgs, config: AnalysisConfig) -> Result<Analyzer> {
    if !args.no_ai {
        tracing::warn!("AI support not compiled in. Using rule-based mode.");
        tracing::warn!("Compile with --features ai to enable AI support.");
    }
    Ok(Analyzer::builder().config(config).build()?)
}
