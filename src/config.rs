//! Environment-driven settings
//!
//! Values come from the process environment, after `.env` has been loaded by
//! `dotenvy` in `main`. Only `enrich-tmdb` needs a credential; it is read from
//! `TMDB_API_KEY` or, failing that, from a secrets file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_SECRETS_PATH: &str = "secrets.txt";

#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: String,
    pub wikipedia_api_url: String,
    pub tmdb_base_url: String,
    pub tmdb_api_key: Option<String>,
    pub secrets_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            user_agent: var("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            wikipedia_api_url: var("WIKIPEDIA_API_URL")
                .unwrap_or_else(|| DEFAULT_WIKIPEDIA_API_URL.to_string()),
            tmdb_base_url: var("TMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string()),
            tmdb_api_key: var("TMDB_API_KEY"),
            secrets_path: var("SECRETS_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_SECRETS_PATH), PathBuf::from),
        }
    }

    /// The TMDB key from the environment, else from the secrets file.
    pub fn tmdb_api_key(&self) -> Result<String> {
        if let Some(key) = &self.tmdb_api_key {
            return Ok(key.clone());
        }

        debug!("TMDB_API_KEY not set, reading {}", self.secrets_path.display());
        read_secrets_key(&self.secrets_path)
    }
}

fn read_secrets_key(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path).with_context(|| {
        format!(
            "{} not found. Create it with TMDB_API_KEY=your_key_here",
            path.display()
        )
    })?;

    parse_secrets(&contents)
        .with_context(|| format!("TMDB_API_KEY or API Key not found in {}", path.display()))
}

/// Accepts `TMDB_API_KEY=<key>` or `API Key: <key>` lines.
fn parse_secrets(contents: &str) -> Option<String> {
    contents.lines().map(str::trim).find_map(|line| {
        line.strip_prefix("TMDB_API_KEY=")
            .or_else(|| line.strip_prefix("API Key:").map(str::trim))
            .map(ToString::to_string)
    })
}
