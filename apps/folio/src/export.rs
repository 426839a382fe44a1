//! Static build: one page load written to disk, with the site's assets copied alongside.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dom::serialize;
use crate::loader::DataSource;
use crate::presentation::print_view;
use crate::state::AppState;

pub const INDEX_FILE: &str = "index.html";
pub const PRINT_FILE: &str = "print.html";

/// What a static build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: Vec<PathBuf>,
    pub assets_copied: usize,
}

/// Renders the site once and writes it into `config.output_dir`.
///
/// The theme resolves with no request hints, so the output is light. `print.html` is written only
/// when the page has printable content.
pub async fn build_site(config: &Config, source: Arc<dyn DataSource>) -> Result<BuildSummary> {
    let state = AppState::from_config(config.clone(), source).await?;
    let theme = state.themes.resolve(None, None);
    let page = state.load_page(theme).await;

    let out = &config.output_dir;
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let mut summary = BuildSummary {
        assets_copied: copy_assets(config).await?,
        ..Default::default()
    };

    summary.pages.push(write_page(out, INDEX_FILE, &serialize(&page)).await?);
    match print_view(&page) {
        Some(view) => summary.pages.push(write_page(out, PRINT_FILE, &serialize(&view)).await?),
        None => warn!("Page has no printable content; skipping {PRINT_FILE}"),
    }

    info!(
        "Built {} page(s) and copied {} asset(s) into {}",
        summary.pages.len(),
        summary.assets_copied,
        out.display()
    );
    Ok(summary)
}

async fn write_page(out: &Path, name: &str, html: &str) -> Result<PathBuf> {
    let path = out.join(name);
    tokio::fs::write(&path, html)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Copies everything under the site root except the page itself, hidden entries and the output
/// directory.
async fn copy_assets(config: &Config) -> Result<usize> {
    let root = &config.site_root;
    let skip_page = tokio::fs::canonicalize(config.page_path()).await.ok();
    let skip_out = tokio::fs::canonicalize(&config.output_dir).await.ok();

    let mut copied = 0;
    let mut pending = vec![PathBuf::new()];
    while let Some(relative) = pending.pop() {
        let dir = root.join(&relative);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            let source = entry.path();
            let canonical = tokio::fs::canonicalize(&source).await.ok();
            if canonical.is_some() && (canonical == skip_page || canonical == skip_out) {
                continue;
            }

            let target_relative = relative.join(&name);
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                tokio::fs::create_dir_all(config.output_dir.join(&target_relative)).await?;
                pending.push(target_relative);
            } else if file_type.is_file() {
                tokio::fs::copy(&source, config.output_dir.join(&target_relative))
                    .await
                    .with_context(|| format!("Failed to copy {}", source.display()))?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}
