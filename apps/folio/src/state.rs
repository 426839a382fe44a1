use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::dom::{parse_html, DomNode};
use crate::loader::{load_resume, DataSource};
use crate::presentation::{ImageFallback, Theme, ThemeManager};
use crate::render::{render_resume, reveal::RevealRegistry};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable; each page load works on its own clone of `page`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where resume data is read from on every page load.
    pub source: Arc<dyn DataSource>,
    /// Parsed static page, the fallback markup every render starts from.
    pub page: Arc<DomNode>,
    pub themes: ThemeManager,
    pub images: ImageFallback,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn DataSource>, page: DomNode) -> Self {
        let page_path = config.page_path();
        let page_dir = page_path.parent().unwrap_or(&config.site_root);
        let images = ImageFallback::new(config.site_root.clone()).with_base_dir(page_dir);
        Self {
            config,
            source,
            page: Arc::new(page),
            themes: ThemeManager::new(),
            images,
        }
    }

    /// Reads and parses the static page named by `config`.
    pub async fn from_config(config: Config, source: Arc<dyn DataSource>) -> Result<Self> {
        let path = config.page_path();
        let html = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read page {}", path.display()))?;
        let page = parse_html(&html).context("Failed to parse page")?;
        info!("Loaded page template from {}", path.display());
        Ok(Self::new(config, source, page))
    }

    /// One page load: fetch the resume, render it into a fresh copy of the page, then apply the
    /// theme and image fallback. A failed fetch leaves the static markup in place.
    pub async fn load_page(&self, theme: Theme) -> DomNode {
        let mut page = DomNode::clone(&self.page);

        if let Some(document) = load_resume(self.source.as_ref()).await {
            let mut reveal = RevealRegistry::new();
            let report = render_resume(&mut page, document, Some(&mut reveal));
            debug!(
                "Rendered {} section(s); {} element(s) queued for reveal",
                report.rendered_count(),
                reveal.len()
            );
        }

        self.themes.apply(&mut page, theme);
        let replaced = self.images.apply(&mut page);
        if replaced > 0 {
            debug!("Replaced {replaced} broken image(s) with placeholders");
        }
        page
    }
}
