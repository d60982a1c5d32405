use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use exercise_scraper::config::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use exercise_scraper::{pipeline, DataPaths, ScrapeConfig, ScrapeError};
use url::Url;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "exercise-scraper")]
#[command(about = "Scrape exercise listings and reconcile the exercise CSV tables", long_about = None)]
struct Args {
    /// Directory holding the CSV tables
    #[arg(short, long, default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the paginated exercise listing into exercises.csv
    Scrape {
        /// First listing page
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Request timeout in seconds
        #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Delay between pages in milliseconds
        #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
        delay: u64,

        /// Extra attempts for a page whose fetch failed
        #[arg(long, default_value_t = 0)]
        retries: u32,

        /// Custom user agent
        #[arg(short, long)]
        user_agent: Option<String>,

        /// Output format: csv, json, or text
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Save output to file (exercises.csv in the data dir is always written)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Split exercises.csv into unique and repeated exercises
    Filter,
    /// Merge repeated exercises over unique ones
    Consolidate,
    /// Fill the exercise list from the consolidated table
    Fill,
    /// Append inferred attributes to incomplete rows
    Process {
        /// Rows handled per batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let paths = DataPaths::in_dir(&args.data_dir);

    match args.command {
        Command::Scrape {
            base_url,
            timeout,
            delay,
            retries,
            user_agent,
            format,
            output,
        } => {
            if let Err(e) = Url::parse(&base_url) {
                return Err(ScrapeError::InvalidUrl(format!("{}: {}", base_url, e)).into());
            }

            let config = ScrapeConfig {
                base_url,
                user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                timeout: Duration::from_secs(timeout),
                delay: Duration::from_millis(delay),
                retries,
            };
            run_scrape(&config, &paths, &format, output, args.quiet).await?;
        }
        Command::Filter => {
            let (unique, repeated) = pipeline::filter_stage(&paths)?;
            log::info!("✅ {} unique, {} repeated exercises", unique, repeated);
        }
        Command::Consolidate => {
            let rows = pipeline::consolidate_stage(&paths)?;
            log::info!("✅ Consolidated {} exercises", rows);
        }
        Command::Fill => {
            let rows = pipeline::fill_stage(&paths)?;
            log::info!("✅ Filled {} exercises", rows);
        }
        Command::Process { batch_size } => {
            let rows = pipeline::process_stage(&paths, batch_size)?;
            log::info!("✅ Completed {} rows", rows);
        }
    }

    Ok(())
}

async fn run_scrape(
    config: &ScrapeConfig,
    paths: &DataPaths,
    format: &str,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    log::info!("🚀 Scraping exercises from {}", config.base_url);

    let records = pipeline::scrape(config).await?;
    log::info!("Total scraped {} entries from all pages.", records.len());

    if records.is_empty() {
        pipeline::log_empty_scrape_hints(config);
        return Ok(());
    }

    if let Some(rendered) = pipeline::emit_records(&records, paths, format, output.as_deref())? {
        if !quiet {
            println!("{}", rendered);
        }
    }

    Ok(())
}
