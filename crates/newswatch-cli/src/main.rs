mod process;
mod search;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newswatch")]
#[command(about = "Collect, clean, and enrich web mentions of a roster of people")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query the search providers for every roster entry and write the raw table
    Search {
        /// Raw CSV to write (`Person, Title, Date, Source, Link`)
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        options: SearchOptions,
    },
    /// Deduplicate, filter, enrich, and classify a previously exported table
    Process {
        /// CSV produced by `search` (or an earlier `process`)
        #[arg(long)]
        input: PathBuf,

        /// Enriched CSV to write (`Person, Link, Date, Title text`)
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        options: ProcessOptions,
    },
    /// Search, then process, in one go
    Run {
        /// Also keep the raw table here
        #[arg(long)]
        raw_output: Option<PathBuf>,

        /// Enriched CSV to write
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        search: SearchOptions,

        #[command(flatten)]
        process: ProcessOptions,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderChoice {
    Google,
    News,
    /// Every provider with credentials configured
    All,
}

#[derive(Debug, Clone, Args)]
struct SearchOptions {
    /// Ask Google to order results by date
    #[arg(long)]
    sort_by_date: bool,

    #[arg(long, value_enum, default_value_t = ProviderChoice::All)]
    provider: ProviderChoice,
}

#[derive(Debug, Clone, Args)]
#[allow(clippy::struct_excessive_bools)]
struct ProcessOptions {
    /// Skip fetching pages for body text and dates
    #[arg(long)]
    skip_enrich: bool,

    /// Skip the article classifier
    #[arg(long)]
    skip_classify: bool,

    /// Newest first
    #[arg(long)]
    descending: bool,

    /// Drop rows whose classifier call fails instead of keeping them
    #[arg(long)]
    reject_on_classifier_error: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = newswatch_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let roster = newswatch_core::load_roster(&config.roster_path)?;
    tracing::info!(
        roster = %config.roster_path.display(),
        queries = roster.queries.len(),
        "roster loaded"
    );

    match cli.command {
        Commands::Search { output, options } => {
            let table = search::run_search(&config, &roster, &options).await?;
            newswatch_pipeline::export_to_path(
                &table,
                newswatch_pipeline::ExportLayout::Raw,
                &output,
            )?;
        }
        Commands::Process {
            input,
            output,
            options,
        } => {
            let table = newswatch_pipeline::import_from_path(&input)?;
            let table = process::run_process(&config, &roster, table, &options).await?;
            process::export_result(&table, &output)?;
        }
        Commands::Run {
            raw_output,
            output,
            search: search_options,
            process: process_options,
        } => {
            // Fail on a missing classifier key before spending search quota.
            process::check_classifier_config(&config, &process_options)?;
            let table = search::run_search(&config, &roster, &search_options).await?;
            if let Some(path) = raw_output {
                newswatch_pipeline::export_to_path(
                    &table,
                    newswatch_pipeline::ExportLayout::Raw,
                    &path,
                )?;
            }
            let table = process::run_process(&config, &roster, table, &process_options).await?;
            process::export_result(&table, &output)?;
        }
    }

    Ok(())
}
