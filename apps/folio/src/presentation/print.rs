use crate::dom::{DomNode, Selector};

/// Root of the printable resume content.
pub const PRINT_ROOT: &str = "#resume-content";
/// Interactive chrome that has no place on paper.
pub const PRINT_EXCLUDED: &str = ".project-overlay, .project-links";

/// Builds the print/export view of a rendered page: the same document with `<body>` reduced to
/// the resume content, minus project overlays and link buttons. `None` without a content root.
pub fn print_view(page: &DomNode) -> Option<DomNode> {
    let root_selector = Selector::parse(PRINT_ROOT).ok()?;
    let excluded = Selector::parse(PRINT_EXCLUDED).ok()?;

    let mut content = page.query_selector(&root_selector)?.clone();
    content.remove_matching(&excluded);

    let mut view = page.clone();
    let body_selector = Selector::parse("body").ok()?;
    let body = view.query_selector_mut(&body_selector)?;
    body.clear_children();
    body.append_child(content);
    Some(view)
}
