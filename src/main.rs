use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info, warn, Instrument};

use tariff_scraper::browser::ChromeLauncher;
use tariff_scraper::config::{Config, RunEnvironment, DEFAULT_CONFIG_PATH};
use tariff_scraper::constants;
use tariff_scraper::emit::write_json;
use tariff_scraper::logging;
use tariff_scraper::scrapers::create_scraper;
use tariff_scraper::types::{FeeRow, ScrapeOptions};

#[derive(Parser)]
#[command(name = "tariff_scraper")]
#[command(about = "Sri Lankan bank tariff table scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape tariff tables and print them as JSON
    Scrape {
        /// Banks to scrape (comma-separated). Available: hnb, seylan
        #[arg(long)]
        banks: Option<String>,
        /// Show the browser window (ignored in production)
        #[arg(long)]
        show: bool,
        /// Delay in milliseconds before each browser action
        #[arg(long, default_value_t = 0)]
        slow: u64,
        /// Write records to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Config file; defaults apply when it does not exist
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// List supported banks
    Banks,
}

async fn run_banks(bank_keys: &[String], options: &ScrapeOptions) -> anyhow::Result<Vec<FeeRow>> {
    let launcher = ChromeLauncher::new();
    let mut all_rows = Vec::new();
    let mut failed = Vec::new();

    for key in bank_keys {
        let span = tracing::info_span!("Scraping bank", bank = %key);

        let Some(scraper) = create_scraper(key) else {
            span.in_scope(|| warn!("Unknown bank specified"));
            failed.push(key.clone());
            continue;
        };

        let outcome = async {
            info!("Starting scrape of {}", scraper.bank());
            let outcome = scraper.scrape(&launcher, options).await;
            match &outcome {
                Ok(rows) => info!("{} rows from {}", rows.len(), scraper.bank()),
                Err(e) => error!("Scrape failed: {}", e),
            }
            outcome
        }
        .instrument(span)
        .await;

        match outcome {
            Ok(rows) => all_rows.extend(rows),
            Err(_) => failed.push(key.clone()),
        }
    }

    if !failed.is_empty() {
        bail!("scrape failed for: {}", failed.join(", "));
    }
    Ok(all_rows)
}

fn write_rows(rows: &[FeeRow], output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(rows, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => write_json(rows, std::io::stdout().lock()).context("Failed to write fee rows")?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            banks,
            show,
            slow,
            output,
            config,
        } => {
            let bank_keys: Vec<String> = if let Some(bank_list) = banks {
                bank_list.split(',').map(|s| s.trim().to_lowercase()).collect()
            } else {
                constants::get_supported_banks().iter().map(|s| s.to_string()).collect()
            };

            let env = RunEnvironment::from_env();
            let chrome_path = std::env::var("CHROME_PATH").ok().map(PathBuf::from);
            let config = Config::load(&config)
                .with_context(|| format!("Failed to load {}", config.display()))?;
            let options = config.scrape_options(show, slow, env, chrome_path);
            info!(?env, headless = options.launch.headless, "Resolved browser options");

            let rows = run_banks(&bank_keys, &options).await?;
            write_rows(&rows, output.as_ref())?;
        }
        Commands::Banks => {
            for key in constants::get_supported_banks() {
                println!("{}", key);
            }
        }
    }
    Ok(())
}
