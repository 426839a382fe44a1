use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// What the binary does once configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteMode {
    /// Render per request over HTTP.
    Serve,
    /// Render once and write static files to the output directory.
    Build,
}

impl FromStr for SiteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serve" => Ok(SiteMode::Serve),
            "build" => Ok(SiteMode::Build),
            other => Err(anyhow!("unknown mode '{other}' (expected 'serve' or 'build')")),
        }
    }
}

impl fmt::Display for SiteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteMode::Serve => f.write_str("serve"),
            SiteMode::Build => f.write_str("build"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_root: PathBuf,
    /// Static page, relative to `site_root`.
    pub page: PathBuf,
    /// Base URL to fetch resume data from instead of `site_root`.
    pub data_url: Option<String>,
    pub mode: SiteMode,
    pub output_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            site_root: PathBuf::from(var("SITE_ROOT", ".")),
            page: PathBuf::from(var("SITE_PAGE", "index.html")),
            data_url: lookup("SITE_DATA_URL").filter(|url| !url.trim().is_empty()),
            mode: var("SITE_MODE", "serve")
                .parse()
                .context("SITE_MODE must be 'serve' or 'build'")?,
            output_dir: PathBuf::from(var("SITE_OUTPUT_DIR", "dist")),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    /// Full path of the static page.
    pub fn page_path(&self) -> PathBuf {
        self.site_root.join(&self.page)
    }
}
