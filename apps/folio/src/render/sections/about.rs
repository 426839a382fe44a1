use super::{repopulate, SectionOutcome};
use crate::dom::DomNode;
use crate::render::reveal::RevealSink;
use crate::render::RenderError;

const ABOUT_CONTAINER: &str = ".about-paragraphs";

/// One `p.about-paragraph` per string, in list order.
pub fn render_about(
    page: &mut DomNode,
    paragraphs: &[String],
    sink: Option<&mut dyn RevealSink>,
) -> Result<SectionOutcome, RenderError> {
    let items = paragraphs
        .iter()
        .map(|text| {
            DomNode::element("p")
                .with_class("about-paragraph")
                .with_text(text.as_str())
        })
        .collect();
    repopulate(page, ABOUT_CONTAINER, items, sink)
}
