//! Section renderers. Each one owns a disjoint container of the page, clears it and
//! repopulates it from one slice of the resume document.

mod about;
mod education;
mod personal;
mod projects;
mod skills;

pub use about::render_about;
pub use education::render_education;
pub use personal::render_personal;
pub use projects::render_projects;
pub use skills::render_skills;

use tracing::debug;

use super::reveal::{reattach, RevealSink};
use super::RenderError;
use crate::dom::{DomNode, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The section was written; `items` counts list entries (or updated fields for personal info).
    Rendered { items: usize },
    /// The page lacks the section's container; nothing was touched.
    MissingContainer,
}

/// Replaces the children of the element matched by `container` with `items`, then hands the new
/// reveal candidates to `sink`.
pub(crate) fn repopulate(
    page: &mut DomNode,
    container: &str,
    items: Vec<DomNode>,
    sink: Option<&mut dyn RevealSink>,
) -> Result<SectionOutcome, RenderError> {
    let selector = Selector::parse(container)?;
    let Some(target) = page.query_selector_mut(&selector) else {
        debug!("Container {container} not found; leaving page untouched");
        return Ok(SectionOutcome::MissingContainer);
    };

    let count = items.len();
    target.clear_children();
    for item in items {
        target.append_child(item);
    }

    let observed = reattach(&target.children, sink);
    debug!("Rendered {count} item(s) into {container}, {observed} queued for reveal");
    Ok(SectionOutcome::Rendered { items: count })
}

/// `<span class="{class}">{text}</span>` for each entry, in order.
pub(crate) fn tag_list<'a>(class: &str, texts: impl IntoIterator<Item = &'a String>) -> Vec<DomNode> {
    texts
        .into_iter()
        .map(|text| DomNode::element("span").with_class(class).with_text(text.as_str()))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::dom::{parse_html, DomNode};

    /// The static page skeleton the renderers write into, with fallback content in every slot.
    pub const PAGE: &str = r##"<!DOCTYPE html>
<html lang="zh-CN">
<head><title>Resume</title></head>
<body>
<main id="resume-content">
  <section class="hero">
    <div class="hero-avatar"><img src="images/static.jpg" alt="static"></div>
    <h1 class="hero-name">Static Name</h1>
    <p class="hero-title">Static Title</p>
    <p class="hero-intro">Static intro</p>
    <div class="hero-contacts">
      <a href="mailto:static@example.com">Email</a>
      <a href="https://github.com/static">GitHub</a>
      <a href="https://www.linkedin.com/in/static">LinkedIn</a>
    </div>
  </section>
  <section id="education"><div class="education-list"><article>static</article></div></section>
  <section id="skills"><div class="skills-grid"><div>static</div></div></section>
  <section id="projects"><div class="projects-grid"><article>static</article></div></section>
  <section id="about"><div class="about-paragraphs"><p>static</p></div></section>
</main>
</body>
</html>"##;

    pub fn page() -> DomNode {
        parse_html(PAGE).unwrap()
    }
}
