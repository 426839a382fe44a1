use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{DomError, DomNode, DomNodeType};

/// Parses a full HTML document into an owned tree.
///
/// Scripting is disabled so `<noscript>` content is kept as markup, matching what a static
/// renderer should see.
pub fn parse_html(html: &str) -> Result<DomNode, DomError> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    Ok(convert_handle(&dom.document).unwrap_or_else(|| DomNode::document(Vec::new())))
}

fn convert_handle(handle: &Handle) -> Option<DomNode> {
    let node_type = match &handle.data {
        NodeData::Document => DomNodeType::Document,
        NodeData::Doctype { name, .. } => DomNodeType::Doctype {
            name: name.to_string(),
        },
        NodeData::Element { name, attrs, .. } => DomNodeType::Element {
            tag_name: name.local.to_string(),
            attributes: attrs
                .borrow()
                .iter()
                .map(|attr| (qualified_name(&attr.name), attr.value.to_string()))
                .collect(),
        },
        NodeData::Text { contents } => DomNodeType::Text {
            content: contents.borrow().to_string(),
        },
        NodeData::Comment { contents } => DomNodeType::Comment {
            content: contents.to_string(),
        },
        NodeData::ProcessingInstruction { .. } => return None,
    };

    // Template contents live in a separate fragment; fold them back in as children.
    let children = match &handle.data {
        NodeData::Element {
            template_contents, ..
        } if template_contents.borrow().is_some() => template_contents
            .borrow()
            .as_ref()
            .map(|content| convert_children(content))
            .unwrap_or_default(),
        _ => convert_children(handle),
    };

    Some(DomNode {
        node_type,
        children,
    })
}

/// `prefix:local` for namespaced attributes such as `xlink:href`, so they serialize back intact.
fn qualified_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

fn convert_children(handle: &Handle) -> Vec<DomNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_handle)
        .collect()
}
