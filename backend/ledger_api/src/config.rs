//! Application configuration loaded from environment variables.

use art_restoration::policy::policy_by_name;

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite journal database
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Policy guarding the ledger: `permissive` or `strict`
    pub ledger_policy: String,
    /// Capacity of the channel feeding the journal writer
    pub journal_buffer: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let ledger_policy = var("LEDGER_POLICY", "permissive");
        if policy_by_name(&ledger_policy).is_none() {
            return Err(ApiError::Config(format!(
                "Invalid LEDGER_POLICY {ledger_policy:?} (expected permissive or strict)"
            )));
        }

        let journal_buffer: usize = var("JOURNAL_BUFFER", "1024")
            .parse()
            .map_err(|_| ApiError::Config("Invalid JOURNAL_BUFFER".to_string()))?;
        if journal_buffer == 0 {
            return Err(ApiError::Config("JOURNAL_BUFFER must be positive".to_string()));
        }

        Ok(Config {
            database_url: var("DATABASE_URL", "sqlite:./restoration_events.db"),
            api_port: var("API_PORT", "3002")
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            ledger_policy,
            journal_buffer,
        })
    }
}
