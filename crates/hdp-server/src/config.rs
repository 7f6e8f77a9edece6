//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default AWS region for the queue client.
pub const DEFAULT_QUEUE_REGION: &str = "us-east-1";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub google: GoogleConfig,
    pub queue: QueueConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Google API configuration
///
/// `credentials` is the raw secret blob as stored (single-quoted JSON); it is
/// normalized and typed once at startup, not per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub credentials: String,
    pub sheet_id: String,
    pub doc_id: String,
}

/// Queue (SQS) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub queue_url: String,
    pub region: String,
    /// Endpoint override for local queues (elasticmq, localstack)
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("HDP_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: std::env::var("HDP_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: std::env::var("HDP_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            google: GoogleConfig {
                credentials: std::env::var("GOOGLE_CREDENTIALS").unwrap_or_default(),
                sheet_id: std::env::var("SHEET_ID").unwrap_or_default(),
                doc_id: std::env::var("DOC_ID").unwrap_or_default(),
            },
            queue: QueueConfig {
                queue_url: std::env::var("SQS_QUEUE_URL").unwrap_or_default(),
                region: std::env::var("SQS_REGION")
                    .unwrap_or_else(|_| DEFAULT_QUEUE_REGION.to_string()),
                endpoint: std::env::var("SQS_ENDPOINT").ok(),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.google.credentials.is_empty() {
            anyhow::bail!("GOOGLE_CREDENTIALS must be set");
        }

        if self.google.sheet_id.is_empty() {
            anyhow::bail!("SHEET_ID must be set");
        }

        if self.google.doc_id.is_empty() {
            anyhow::bail!("DOC_ID must be set");
        }

        if self.queue.queue_url.is_empty() {
            anyhow::bail!("SQS_QUEUE_URL must be set");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            google: GoogleConfig {
                credentials: String::new(),
                sheet_id: String::new(),
                doc_id: String::new(),
            },
            queue: QueueConfig {
                queue_url: String::new(),
                region: DEFAULT_QUEUE_REGION.to_string(),
                endpoint: None,
            },
        }
    }
}
