//! Broken-image fallback. Local images that are missing from the site root are swapped for an
//! inline SVG placeholder before the page is served, so the browser never shows a broken icon.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Url;
use tracing::warn;

use crate::dom::{DomNode, DomNodeType};

pub const ERROR_PLACEHOLDER_CLASS: &str = "error-placeholder";
const DEFAULT_ALT: &str = "图片";
const FAILED_SUFFIX: &str = "图片加载失败";
const AVATAR_FAILED_ALT: &str = "头像加载失败";

const AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200"><rect width="200" height="200" fill="#e2e8f0"/><circle cx="100" cy="80" r="35" fill="#94a3b8"/><path d="M 100 120 Q 60 120 40 160 L 160 160 Q 140 120 100 120 Z" fill="#94a3b8"/><text x="100" y="190" font-family="Arial" font-size="12" fill="#64748b" text-anchor="middle">头像加载失败</text></svg>"##;

const PROJECT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><rect width="400" height="300" fill="#f1f5f9"/><rect x="150" y="100" width="100" height="80" rx="5" fill="#cbd5e1"/><circle cx="180" cy="130" r="8" fill="#94a3b8"/><polyline points="150,180 170,160 190,170 210,150 250,180" fill="none" stroke="#94a3b8" stroke-width="3"/><text x="200" y="220" font-family="Arial" font-size="14" fill="#64748b" text-anchor="middle">图片加载失败</text></svg>"##;

const GENERIC_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><rect width="400" height="300" fill="#f8fafc"/><rect x="160" y="110" width="80" height="60" rx="4" fill="#e2e8f0"/><circle cx="185" cy="135" r="6" fill="#cbd5e1"/><polyline points="160,170 175,155 190,165 205,150 240,170" fill="none" stroke="#cbd5e1" stroke-width="2"/><text x="200" y="200" font-family="Arial" font-size="12" fill="#94a3b8" text-anchor="middle">图片加载失败</text></svg>"##;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Avatar,
    Project,
    Generic,
}

impl PlaceholderKind {
    /// `data:` URI for the placeholder image.
    pub fn data_uri(&self) -> String {
        let svg = match self {
            PlaceholderKind::Avatar => AVATAR_SVG,
            PlaceholderKind::Project => PROJECT_SVG,
            PlaceholderKind::Generic => GENERIC_SVG,
        };
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
    }

    fn alt_text(&self, original: Option<&str>) -> String {
        match self {
            PlaceholderKind::Avatar => AVATAR_FAILED_ALT.to_string(),
            _ => {
                let alt = original.filter(|a| !a.is_empty()).unwrap_or(DEFAULT_ALT);
                format!("{alt} - {FAILED_SUFFIX}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageFallback {
    site_root: PathBuf,
    /// Directory relative `src` values resolve against: the page's own directory.
    base_dir: PathBuf,
}

impl ImageFallback {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        let site_root = site_root.into();
        Self {
            base_dir: site_root.clone(),
            site_root,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Replaces every unresolvable local image with a placeholder. Returns how many were replaced.
    pub fn apply(&self, page: &mut DomNode) -> usize {
        let mut replaced = 0;
        self.visit(page, Context::default(), &mut replaced);
        replaced
    }

    fn visit(&self, node: &mut DomNode, ctx: Context, replaced: &mut usize) {
        let ctx = ctx.enter(node);
        if node.tag_name() == Some("img") && self.needs_placeholder(node) {
            let kind = if ctx.in_avatar {
                PlaceholderKind::Avatar
            } else if ctx.in_project_image {
                PlaceholderKind::Project
            } else {
                PlaceholderKind::Generic
            };
            let src = node.get_attribute("src").unwrap_or_default().to_string();
            let alt = kind.alt_text(node.get_attribute("alt"));
            node.add_class(ERROR_PLACEHOLDER_CLASS);
            node.set_attribute("src", kind.data_uri());
            node.set_attribute("alt", alt);
            warn!("Image failed to load: {src:?}; using {kind:?} placeholder");
            *replaced += 1;
        }
        for child in &mut node.children {
            self.visit(child, ctx, replaced);
        }
    }

    fn needs_placeholder(&self, img: &DomNode) -> bool {
        if img.has_class(ERROR_PLACEHOLDER_CLASS) {
            return false;
        }
        let src = img.get_attribute("src").unwrap_or_default().trim();
        if src.is_empty() {
            return true;
        }
        if is_external(src) {
            return false;
        }
        match self.local_path(src) {
            Some(path) => !path.is_file(),
            None => true,
        }
    }

    /// Resolves `src` the way a browser would (root-relative against the site root, otherwise
    /// against the page directory, percent-decoded) and maps it to a file. Anything resolving
    /// outside the site root is rejected.
    fn local_path(&self, src: &str) -> Option<PathBuf> {
        let root = absolute(&self.site_root)?;
        let url = match src.strip_prefix('/') {
            Some(rooted) => Url::from_directory_path(&root).ok()?.join(rooted),
            None => Url::from_directory_path(absolute(&self.base_dir)?)
                .ok()?
                .join(src),
        }
        .ok()?;
        if url.scheme() != "file" {
            return None;
        }
        let path = url.to_file_path().ok()?;
        path.starts_with(&root).then_some(path)
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some(
        joined
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect(),
    )
}

fn is_external(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    ["http://", "https://", "//", "data:", "blob:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_avatar: bool,
    in_project_image: bool,
}

impl Context {
    fn enter(self, node: &DomNode) -> Self {
        if !matches!(node.node_type, DomNodeType::Element { .. }) {
            return self;
        }
        Self {
            in_avatar: self.in_avatar || node.has_class("hero-avatar"),
            in_project_image: self.in_project_image || node.has_class("project-image"),
        }
    }
}
