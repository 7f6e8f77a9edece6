//! HDP Ingest - queue consumer and storage tool

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use hdp_common::logging::{init_logging, LogConfig, LogLevel};
use hdp_ingest::{config::IngestConfig, consumer::IngestionConsumer, import, queue::SqsQueue, storage};

#[derive(Parser, Debug)]
#[command(name = "hdp-ingest")]
#[command(author, version, about = "HDP queue consumer and storage tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Consume weight batches from the queue into the store
    Consume {
        /// Process a single batch and exit
        #[arg(long)]
        once: bool,

        /// Override the configured receive batch size (SQS caps a receive at 10)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=10))]
        max_batch: Option<i32>,
    },

    /// Run pending schema migrations (the one-time bootstrap step)
    Migrate,

    /// Import a local diet document export directly into the store
    DietImport {
        /// Path to the document text file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("hdp-ingest".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    let mut config = IngestConfig::from_env()?;

    match cli.command {
        Command::Consume { once, max_batch } => {
            if let Some(n) = max_batch {
                config.queue.max_batch = n;
            }

            let pool = storage::create_pool(&config.database).await?;
            let queue = SqsQueue::new(&config.queue).await;
            let consumer = IngestionConsumer::new(pool, queue);

            info!("Consumer started");
            loop {
                match consumer.poll_once().await {
                    Ok(outcome) if outcome.applied > 0 => {
                        info!(
                            applied = outcome.applied,
                            acknowledged = outcome.acknowledged,
                            "Batch applied"
                        );
                    }
                    Ok(_) => {}
                    Err(e) if once => return Err(e.into()),
                    // The failed batch was not acknowledged; the queue's
                    // redelivery policy owns the retry
                    Err(e) => error!(error = %e, "Batch failed"),
                }

                if once {
                    break;
                }
            }
        }
        Command::Migrate => {
            let pool = storage::create_pool(&config.database).await?;
            sqlx::migrate!("../../migrations").run(&pool).await?;
            info!("Migrations complete");
        }
        Command::DietImport { file } => {
            let pool = storage::create_pool(&config.database).await?;
            let count = import::import_file(&pool, &file).await?;
            info!(entries = count, "Import complete");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_accepts_batch_size_override() {
        let cli =
            Cli::try_parse_from(["hdp-ingest", "consume", "--once", "--max-batch", "5"]).unwrap();

        match cli.command {
            Command::Consume { once, max_batch } => {
                assert!(once);
                assert_eq!(max_batch, Some(5));
            }
            other => panic!("parsed wrong subcommand: {other:?}"),
        }
    }

    #[test]
    fn test_consume_batch_size_defaults_to_configured_value() {
        let cli = Cli::try_parse_from(["hdp-ingest", "consume"]).unwrap();

        match cli.command {
            Command::Consume { once, max_batch } => {
                assert!(!once);
                assert_eq!(max_batch, None);
            }
            other => panic!("parsed wrong subcommand: {other:?}"),
        }
    }

    #[test]
    fn test_consume_batch_size_stays_within_queue_limit() {
        assert!(Cli::try_parse_from(["hdp-ingest", "consume", "--max-batch", "11"]).is_err());
        assert!(Cli::try_parse_from(["hdp-ingest", "consume", "--max-batch", "0"]).is_err());
    }
}
