use std::time::Duration;

use thiserror::Error;

use reportgen_compendium::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::pool::MAX_CONCURRENCY;

const DEFAULT_MAX_CONCURRENCY: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Worker settings, read from the environment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub s3_bucket: String,
    pub sqs_queue: String,
    /// SQS endpoint override, e.g. LocalStack.
    pub sqs_endpoint: Option<String>,
    /// S3 endpoint override; implies path-style addressing.
    pub s3_endpoint: Option<String>,
    pub compendium_base_url: String,
    pub max_concurrency: usize,
    pub source_timeout: Duration,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let max_concurrency = match get("WORKER_MAX_CONCURRENCY") {
            None => DEFAULT_MAX_CONCURRENCY,
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_CONCURRENCY).contains(&n) => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "WORKER_MAX_CONCURRENCY",
                        value: v,
                    });
                }
            },
        };

        let source_timeout = match get("SOURCE_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT,
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs >= 1 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SOURCE_TIMEOUT_SECS",
                        value: v,
                    });
                }
            },
        };

        Ok(Self {
            database_url: require("DB_URL")?,
            s3_bucket: require("AWS_S3_BUCKET")?,
            sqs_queue: require("AWS_SQS_QUEUE")?,
            sqs_endpoint: get("LOCALSTACK_ENDPOINT"),
            s3_endpoint: get("LOCALSTACK_S3_ENDPOINT"),
            compendium_base_url: get("COMPENDIUM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_concurrency,
            source_timeout,
        })
    }
}
