//! Post-render reattachment: hands freshly rendered reveal candidates to an injected sink.

use crate::dom::DomNode;

/// Class marking elements eligible for scroll-triggered reveal.
pub const REVEAL_MARKER: &str = "animate-on-scroll";

/// Receives newly rendered elements that carry the reveal marker.
///
/// The render pipeline only feeds candidates; it never creates or configures the sink.
pub trait RevealSink {
    fn observe(&mut self, element: &DomNode);
}

impl<F> RevealSink for F
where
    F: FnMut(&DomNode),
{
    fn observe(&mut self, element: &DomNode) {
        self(element)
    }
}

/// Feeds every marked element in `nodes` (and their descendants) to `sink`.
/// Returns how many were observed; with no sink nothing is observed.
pub fn reattach(nodes: &[DomNode], sink: Option<&mut dyn RevealSink>) -> usize {
    let Some(sink) = sink else {
        return 0;
    };
    let mut count = 0;
    for node in nodes {
        visit(node, sink, &mut count);
    }
    count
}

fn visit(node: &DomNode, sink: &mut dyn RevealSink, count: &mut usize) {
    if node.has_class(REVEAL_MARKER) {
        sink.observe(node);
        *count += 1;
    }
    for child in &node.children {
        visit(child, sink, count);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedElement {
    pub tag_name: String,
    pub classes: Vec<String>,
}

/// Sink that records what it was asked to observe.
#[derive(Debug, Default)]
pub struct RevealRegistry {
    observed: Vec<ObservedElement>,
}

impl RevealRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn observed(&self) -> &[ObservedElement] {
        &self.observed
    }
}

impl RevealSink for RevealRegistry {
    fn observe(&mut self, element: &DomNode) {
        self.observed.push(ObservedElement {
            tag_name: element.tag_name().unwrap_or_default().to_string(),
            classes: element.classes().map(str::to_string).collect(),
        });
    }
}
