use super::{DomNode, DomNodeType};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serializes a tree to HTML text following the HTML fragment serialization rules closely
/// enough that `parse_html(serialize(doc))` round-trips the page structure.
pub fn serialize(node: &DomNode) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

fn write_node(node: &DomNode, raw_text_parent: bool, out: &mut String) {
    match &node.node_type {
        DomNodeType::Document => {
            for child in &node.children {
                write_node(child, false, out);
            }
        }
        DomNodeType::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        DomNodeType::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        DomNodeType::Text { content } => {
            if raw_text_parent {
                out.push_str(content);
            } else {
                escape_into(content, false, out);
            }
        }
        DomNodeType::Element {
            tag_name,
            attributes,
        } => {
            out.push('<');
            out.push_str(tag_name);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag_name.as_str()) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&tag_name.as_str());
            for child in &node.children {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(tag_name);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let node = DomNode::element("p")
            .with_attr("title", "say \"hi\" & <bye>")
            .with_text("<script>alert(1)</script> & more");
        assert_eq!(
            serialize(&node),
            "<p title=\"say &quot;hi&quot; &amp; <bye>\">&lt;script&gt;alert(1)&lt;/script&gt; &amp; more</p>"
        );
    }

    #[test]
    fn test_serialize_void_and_raw_text() {
        let node = DomNode::element("div")
            .with_child(DomNode::element("img").with_attr("src", "a.png"))
            .with_child(DomNode::element("script").with_text("if (a < b) {}"));
        assert_eq!(
            serialize(&node),
            "<div><img src=\"a.png\"><script>if (a < b) {}</script></div>"
        );
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let source = "<!DOCTYPE html><html lang=\"zh-CN\"><head><title>Resume</title></head>\
                      <body><main id=\"resume-content\"><p class=\"a\">x &amp; y</p><br></main></body></html>";
        let first = parse_html(source).unwrap();
        let again = parse_html(&serialize(&first)).unwrap();
        assert_eq!(first, again);
    }
}
