//! Render pipeline: ResumeDocument → page DOM.
//!
//! The dispatcher visits the five sections in a fixed order. Each section writes a disjoint
//! container, so one failing or missing section never stops the others.

pub mod dates;
pub mod reveal;
pub mod sections;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dom::{DomError, DomNode};
use crate::models::ResumeDocument;
use reveal::RevealSink;
use sections::SectionOutcome;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Education,
    Skills,
    Projects,
    About,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Personal => "personal",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::About => "about",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionStatus {
    Rendered { items: usize },
    /// No data for the section; the static markup stays.
    Skipped,
    MissingContainer,
    Failed { reason: String },
}

/// What one render pass did, section by section, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub sections: Vec<(Section, SectionStatus)>,
}

impl RenderReport {
    pub fn status(&self, section: Section) -> Option<&SectionStatus> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, status)| status)
    }

    pub fn rendered_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|(_, status)| matches!(status, SectionStatus::Rendered { .. }))
            .count()
    }

    fn record(&mut self, section: Section, result: Option<Result<SectionOutcome, RenderError>>) {
        let status = match result {
            None => SectionStatus::Skipped,
            Some(Ok(SectionOutcome::Rendered { items })) => SectionStatus::Rendered { items },
            Some(Ok(SectionOutcome::MissingContainer)) => SectionStatus::MissingContainer,
            Some(Err(e)) => {
                warn!("Failed to render {section} section: {e}");
                SectionStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        self.sections.push((section, status));
    }
}

/// Renders every present, non-empty section of `document` into `page`.
///
/// The document is consumed; nothing retains it once the pass completes. The dispatcher itself
/// never touches the DOM, it only decides which section renderers run.
pub fn render_resume(
    page: &mut DomNode,
    document: ResumeDocument,
    mut sink: Option<&mut dyn RevealSink>,
) -> RenderReport {
    let mut report = RenderReport::default();

    let personal = document
        .personal
        .as_ref()
        .map(|personal| sections::render_personal(page, personal));
    report.record(Section::Personal, personal);

    let education = non_empty(&document.education)
        .map(|entries| sections::render_education(page, entries, reborrow(&mut sink)));
    report.record(Section::Education, education);

    let skills = document
        .skills
        .as_ref()
        .filter(|skills| !skills.is_empty())
        .map(|skills| sections::render_skills(page, skills, reborrow(&mut sink)));
    report.record(Section::Skills, skills);

    let projects = non_empty(&document.projects)
        .map(|projects| sections::render_projects(page, projects, reborrow(&mut sink)));
    report.record(Section::Projects, projects);

    let about = non_empty(&document.about)
        .map(|paragraphs| sections::render_about(page, paragraphs, reborrow(&mut sink)));
    report.record(Section::About, about);

    debug!(
        "Render pass complete: {} of {} sections rendered",
        report.rendered_count(),
        report.sections.len()
    );
    report
}

/// Lends the sink to one section renderer at a time.
fn reborrow<'s>(sink: &'s mut Option<&mut dyn RevealSink>) -> Option<&'s mut dyn RevealSink> {
    sink.as_mut().map(|s| &mut **s as &mut dyn RevealSink)
}

fn non_empty<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    list.as_deref().filter(|items| !items.is_empty())
}
