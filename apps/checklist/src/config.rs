use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_FONT_DIR: &str = "fonts";

/// Process configuration loaded from environment variables (and `.env`, if present).
/// Command-line flags take precedence over these values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that non-standard font identifiers resolve against.
    pub font_dir: PathBuf,
    /// Default page limit; `--max-pages` overrides it.
    pub max_pages: Option<usize>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            font_dir: std::env::var("CHECKLIST_FONT_DIR")
                .unwrap_or_else(|_| DEFAULT_FONT_DIR.to_string())
                .into(),
            max_pages: optional_env("CHECKLIST_MAX_PAGES")
                .map(|v| {
                    v.parse::<usize>()
                        .context("CHECKLIST_MAX_PAGES must be a non-negative integer")
                })
                .transpose()?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
