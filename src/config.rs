use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How requests authenticate against TMDB.
#[derive(Clone)]
pub enum Credential {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as a bearer header.
    Bearer(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey(..)"),
            Credential::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_base_url: String,
    pub image_base_url: String,
    pub credential: Credential,
    pub language: String,
    pub bind_addr: SocketAddr,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let credential = match (non_empty_var("TMDB_ACCESS_TOKEN"), non_empty_var("TMDB_API_KEY")) {
            (Some(token), _) => Credential::Bearer(token),
            (None, Some(key)) => Credential::ApiKey(key),
            (None, None) => {
                bail!("Missing required environment variable: TMDB_API_KEY or TMDB_ACCESS_TOKEN")
            }
        };

        let bind_addr = non_empty_var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3146")?;

        let http_timeout = non_empty_var("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            tmdb_base_url: non_empty_var("TMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string()),
            image_base_url: non_empty_var("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string()),
            credential,
            language: non_empty_var("TMDB_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
            bind_addr,
            http_timeout: Duration::from_secs(http_timeout),
        };
        info!(
            credential = ?config.credential,
            base = %config.tmdb_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
