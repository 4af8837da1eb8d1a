use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::ed::client::DEFAULT_ED_API_URL;

/// Course the participation threads live in when ED_COURSE_ID is unset.
pub const DEFAULT_COURSE_ID: u64 = 84647;

/// Central configuration loaded from environment variables.
///
/// The API token comes from the environment only. The .env file is loaded
/// automatically at startup via dotenvy.
pub struct Config {
    /// Ed API bearer token. Only the scrape and merge commands need it.
    pub ed_api_token: String,
    pub ed_course_id: u64,
    /// Ed API root (defaults to the US region)
    pub ed_api_url: String,
    /// Directory for scraped posts, merged posts, and reports
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything except the token has a default, so offline commands
    /// (analyze, insights, show) work with no .env at all.
    pub fn load() -> Result<Self> {
        let ed_course_id = match env::var("ED_COURSE_ID") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("ED_COURSE_ID must be an integer, got {raw:?}"))?,
            _ => DEFAULT_COURSE_ID,
        };

        Ok(Self {
            ed_api_token: env::var("ED_API_TOKEN").unwrap_or_default(),
            ed_course_id,
            ed_api_url: env::var("ED_API_URL").unwrap_or_else(|_| DEFAULT_ED_API_URL.to_string()),
            data_dir: env::var("EDLENS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        })
    }

    /// Check that the Ed token is configured.
    /// Call this before any operation that talks to the Ed API.
    pub fn require_ed_token(&self) -> Result<()> {
        if self.ed_api_token.trim().is_empty() {
            anyhow::bail!(
                "ED_API_TOKEN not set. Add it to your .env file.\n\
                 Generate a token under Settings > API Tokens on edstem.org."
            );
        }
        Ok(())
    }
}
