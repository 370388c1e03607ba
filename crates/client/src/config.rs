//! Client configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_FILE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of every API path, e.g. `http://localhost:3000/api`.
    pub api_url: String,
    /// Base that server-relative document paths resolve against.
    pub file_base_url: String,
    pub request_timeout: Duration,
    /// SQLite file holding the session token.
    pub token_db_path: PathBuf,
}

impl ClientConfig {
    /// Config for a known API base; everything else takes its default.
    ///
    /// The token database goes to the system temp dir so callers that never
    /// open it don't need a data directory.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            file_base_url: api_url
                .trim_end_matches('/')
                .trim_end_matches("/api")
                .to_string(),
            api_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_db_path: std::env::temp_dir().join("fleetdesk").join("session.db"),
        }
    }

    /// Read `FLEETDESK_*` variables, logging each default that applies.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("FLEETDESK_API_URL").unwrap_or_else(|| {
            tracing::info!(default = DEFAULT_API_URL, "FLEETDESK_API_URL not set");
            DEFAULT_API_URL.to_string()
        });

        let file_base_url = var("FLEETDESK_FILE_URL").unwrap_or_else(|| {
            tracing::info!(default = DEFAULT_FILE_URL, "FLEETDESK_FILE_URL not set");
            DEFAULT_FILE_URL.to_string()
        });

        let request_timeout = match var("FLEETDESK_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("FLEETDESK_TIMEOUT_SECS is not a number: {raw:?}"))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let token_db_path = match var("FLEETDESK_TOKEN_DB") {
            Some(path) => PathBuf::from(path),
            None => {
                let path = default_token_db_path()?;
                tracing::info!(default = %path.display(), "FLEETDESK_TOKEN_DB not set");
                path
            }
        };

        Ok(Self {
            api_url,
            file_base_url,
            request_timeout,
            token_db_path,
        })
    }

    /// Absolute URL of a stored document. Blank or absent paths stay absent.
    pub fn file_url(&self, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        Some(format!(
            "{}/{}",
            self.file_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

fn default_token_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir().context("no user data directory on this platform")?;
    Ok(base.join("fleetdesk").join("session.db"))
}
