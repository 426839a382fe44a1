use super::{repopulate, tag_list, SectionOutcome};
use crate::dom::DomNode;
use crate::models::EducationEntry;
use crate::render::dates::format_date_range;
use crate::render::reveal::{RevealSink, REVEAL_MARKER};
use crate::render::RenderError;

const EDUCATION_CONTAINER: &str = ".education-list";

/// One card per entry: school, degree label, date range and optional honor badges.
pub fn render_education(
    page: &mut DomNode,
    entries: &[EducationEntry],
    sink: Option<&mut dyn RevealSink>,
) -> Result<SectionOutcome, RenderError> {
    let items = entries.iter().map(education_card).collect();
    repopulate(page, EDUCATION_CONTAINER, items, sink)
}

fn education_card(entry: &EducationEntry) -> DomNode {
    let time_range = format_date_range(entry.start_date.as_deref(), entry.end_date.as_deref());

    let header = DomNode::element("div")
        .with_class("education-header")
        .with_child(
            DomNode::element("div")
                .with_class("education-school")
                .with_child(
                    DomNode::element("h3")
                        .with_class("school-name")
                        .with_text(entry.school.as_str()),
                )
                .with_child(
                    DomNode::element("p")
                        .with_class("education-degree")
                        .with_text(entry.degree_label()),
                ),
        )
        .with_child(
            DomNode::element("div")
                .with_class("education-time")
                .with_text(time_range),
        );

    let mut card = DomNode::element("article")
        .with_class(&format!("education-card {REVEAL_MARKER}"))
        .with_child(header);

    if let Some(honors) = entry.honors.as_ref().filter(|h| !h.is_empty()) {
        card.append_child(
            DomNode::element("div")
                .with_class("education-honors")
                .with_children(tag_list("honor-badge", honors)),
        );
    }
    card
}
