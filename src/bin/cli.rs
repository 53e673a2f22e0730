//! jobdash CLI
//!
//! Local entry point for watching the backend's login-status stream and
//! inspecting collected job data.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use jobdash::{
    error::Result,
    models::{
        Config, ConnectedEvent, EVENT_CONNECTED, EVENT_LOGIN_STATUS, EVENT_PING, LoginStatusEvent,
    },
    salary::{SalaryParser, bucket_index, default_buckets},
    stats,
    storage::LocalStorage,
    stream::{EventHandler, EventStreamClient, HttpTransport, RetryPolicy, SseEvent, StreamHooks},
};

/// jobdash - Job Application Dashboard Core
#[derive(Parser, Debug)]
#[command(
    name = "jobdash",
    version,
    about = "Login-status streaming and salary analytics"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the login-status stream until Ctrl-C
    Watch {
        /// Override the stream URL from the config
        #[arg(long)]
        url: Option<String>,
    },

    /// Parse a single salary text
    Parse {
        /// Salary text, e.g. "15-25K·13薪"
        text: String,
    },

    /// Summarize collected job records
    Stats {
        /// Path to the job snapshot (default: paths.jobs_file)
        #[arg(long)]
        input: Option<String>,

        /// Keep only records reaching this salary floor (K)
        #[arg(long)]
        min_k: Option<f64>,

        /// Keep only records under this salary ceiling (K)
        #[arg(long)]
        max_k: Option<f64>,

        /// Write the summary to paths.summary_file
        #[arg(long)]
        write: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Watch { url } => run_watch(&config, url).await?,

        Command::Parse { text } => run_parse(&config, &text),

        Command::Stats {
            input,
            min_k,
            max_k,
            write,
        } => run_stats(&config, input, min_k, max_k, write).await?,

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

/// Subscribe to the login-status stream and log events until Ctrl-C.
async fn run_watch(config: &Config, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.stream.url.clone());
    log::info!("Watching login-status stream at {}", url);

    let transport = Arc::new(HttpTransport::new(&config.stream)?);
    let retry = RetryPolicy::from_config(&config.stream);
    let hooks = StreamHooks::new()
        .on_open(|| log::info!("Stream connected"))
        .on_error(|error, attempt, delay| {
            log::warn!(
                "Stream dropped (attempt {}): {}. Retrying in {:?}",
                attempt,
                error,
                delay
            );
        });

    let listeners: Vec<(String, EventHandler)> = vec![
        (
            EVENT_CONNECTED.to_string(),
            Box::new(|event: &SseEvent| match ConnectedEvent::from_json(&event.data) {
                Ok(snapshot) => {
                    for (platform, logged_in) in &snapshot.statuses {
                        log::info!(
                            "{}: {}",
                            platform,
                            if *logged_in { "logged in" } else { "logged out" }
                        );
                    }
                }
                Err(e) => log::warn!("Bad connected payload: {}", e),
            }),
        ),
        (
            EVENT_LOGIN_STATUS.to_string(),
            Box::new(
                |event: &SseEvent| match LoginStatusEvent::from_json(&event.data) {
                    Ok(status) => log::info!(
                        "{} is now {}",
                        status.platform,
                        if status.is_logged_in {
                            "logged in"
                        } else {
                            "logged out"
                        }
                    ),
                    Err(e) => log::warn!("Bad login-status payload: {}", e),
                },
            ),
        ),
        (
            EVENT_PING.to_string(),
            Box::new(|_event: &SseEvent| log::debug!("ping")),
        ),
    ];

    let client = EventStreamClient::spawn(url, transport, retry, hooks, listeners);

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down...");
    client.close().await;

    Ok(())
}

/// Parse one salary text and report the normalized range and bucket.
fn run_parse(config: &Config, text: &str) {
    let parser = SalaryParser::new(&config.salary);
    match parser.parse(text) {
        Some(range) => {
            log::info!(
                "{} => {:.1}K - {:.1}K (median {:.2}K)",
                text,
                range.low_k,
                range.high_k,
                range.median_k
            );
            let buckets = default_buckets();
            match bucket_index(&buckets, range.median_k) {
                Some(index) => log::info!("Bucket: {}", buckets[index].label),
                None => log::info!("Bucket: none (outside histogram)"),
            }
        }
        None => log::warn!("'{}' is not a recognizable salary", text),
    }
}

/// Load a job snapshot, optionally filter by salary, and print KPIs.
async fn run_stats(
    config: &Config,
    input: Option<String>,
    min_k: Option<f64>,
    max_k: Option<f64>,
    write: bool,
) -> Result<()> {
    let key = input.unwrap_or_else(|| config.paths.jobs_file.clone());
    let storage = LocalStorage::new(".");

    let records = storage.load_jobs(&key).await?;
    log::info!("Loaded {} records from {}", records.len(), key);

    let parser = SalaryParser::new(&config.salary);
    let buckets = default_buckets();

    let records = if min_k.is_some() || max_k.is_some() {
        let filtered: Vec<_> = stats::filter_by_salary(&records, &parser, min_k, max_k)
            .into_iter()
            .cloned()
            .collect();
        log::info!("{} records after salary filtering", filtered.len());
        filtered
    } else {
        records
    };

    let summary = stats::summarize(&records, &parser, &buckets);

    log::info!(
        "Total: {} records, {} with salary",
        summary.total,
        summary.with_salary
    );
    match summary.average_median_k {
        Some(average) => log::info!("Average salary: {:.2}K", average),
        None => log::info!("Average salary: n/a"),
    }
    for bar in &summary.histogram {
        log::info!("  {:>7}  {}", bar.label, bar.count);
    }

    if write {
        storage
            .save_summary(&config.paths.summary_file, &summary)
            .await?;
        log::info!("Summary written to {}", config.paths.summary_file);
    }

    Ok(())
}
