//! Owned HTML document tree.
//!
//! Pages are parsed once with html5ever into `DomNode` and cloned per page load. Renderers mutate
//! the clone through selector queries; nothing here holds references across a render pass.

mod parse;
mod selector;
mod serialize;

use thiserror::Error;

pub use parse::parse_html;
pub use selector::Selector;
pub use serialize::serialize;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Failed to parse HTML: {0}")]
    Parse(#[from] std::io::Error),

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode {
    pub node_type: DomNodeType,
    pub children: Vec<DomNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNodeType {
    Document,
    Doctype {
        name: String,
    },
    Element {
        tag_name: String,
        attributes: Vec<(String, String)>,
    },
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Construction
// ────────────────────────────────────────────────────────────────────────────

impl DomNode {
    pub fn document(children: Vec<DomNode>) -> Self {
        Self {
            node_type: DomNodeType::Document,
            children,
        }
    }

    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: DomNodeType::Element {
                tag_name: tag_name.to_ascii_lowercase(),
                attributes: Vec::new(),
            },
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_type: DomNodeType::Text {
                content: content.into(),
            },
            children: Vec::new(),
        }
    }

    /// Sets the `class` attribute, replacing any previous value.
    pub fn with_class(mut self, class: &str) -> Self {
        self.set_attribute("class", class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.set_text_content(content);
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.extend(children);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Accessors
// ────────────────────────────────────────────────────────────────────────────

impl DomNode {
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, DomNodeType::Element { .. })
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            DomNodeType::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        match &self.node_type {
            DomNodeType::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match &self.node_type {
            DomNodeType::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.get_attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn element_children(&self) -> impl Iterator<Item = &DomNode> + '_ {
        self.children.iter().filter(|c| c.is_element())
    }
}

fn collect_text(node: &DomNode, out: &mut String) {
    if let DomNodeType::Text { content } = &node.node_type {
        out.push_str(content);
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mutation
// ────────────────────────────────────────────────────────────────────────────

impl DomNode {
    /// Sets an attribute, keeping its position if it already exists. No-op on non-elements.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        if let DomNodeType::Element { attributes, .. } = &mut self.node_type {
            let value = value.into();
            match attributes
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                Some(slot) => slot.1 = value,
                None => attributes.push((name.to_string(), value)),
            }
        }
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) || !self.is_element() {
            return;
        }
        let joined = match self.get_attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = remaining.join(" ");
        self.set_attribute("class", joined);
    }

    /// Replaces all children with a single text node (or nothing for an empty string).
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.children.clear();
        if !content.is_empty() {
            self.children.push(DomNode::text(content));
        }
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn append_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// Removes every descendant element matching `selector`. Returns the number removed.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let mut paths = self.query_selector_paths(selector);
        // Sorted paths put ancestors before descendants. Nested matches go with their ancestor,
        // and deleting from the back keeps earlier paths valid.
        paths.sort();
        let mut removed = 0;
        let mut last_root: Option<Vec<usize>> = None;
        let mut roots = Vec::new();
        for path in paths {
            if let Some(prev) = &last_root {
                if path.starts_with(prev) {
                    continue;
                }
            }
            last_root = Some(path.clone());
            roots.push(path);
        }
        for path in roots.into_iter().rev() {
            if let Some((last, parent_path)) = path.split_last() {
                if let Some(parent) = self.node_at_path_mut(parent_path) {
                    if *last < parent.children.len() {
                        parent.children.remove(*last);
                        removed += 1;
                    }
                }
            }
        }
        removed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Queries
// ────────────────────────────────────────────────────────────────────────────

impl DomNode {
    /// Child-index paths (relative to `self`) of every matching descendant, in document order.
    /// `self` is never a candidate.
    pub fn query_selector_paths(&self, selector: &Selector) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut ancestors: Vec<&DomNode> = Vec::new();
        let mut path = Vec::new();
        collect_matches(self, selector, &mut ancestors, &mut path, &mut out, false);
        out
    }

    pub fn query_selector_path(&self, selector: &Selector) -> Option<Vec<usize>> {
        let mut out = Vec::new();
        let mut ancestors: Vec<&DomNode> = Vec::new();
        let mut path = Vec::new();
        collect_matches(self, selector, &mut ancestors, &mut path, &mut out, true);
        out.into_iter().next()
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<&DomNode> {
        let path = self.query_selector_path(selector)?;
        self.node_at_path(&path)
    }

    pub fn query_selector_mut(&mut self, selector: &Selector) -> Option<&mut DomNode> {
        let path = self.query_selector_path(selector)?;
        self.node_at_path_mut(&path)
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<&DomNode> {
        self.query_selector_paths(selector)
            .iter()
            .filter_map(|path| self.node_at_path(path))
            .collect()
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&DomNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut DomNode> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }
}

fn collect_matches<'a>(
    node: &'a DomNode,
    selector: &Selector,
    ancestors: &mut Vec<&'a DomNode>,
    path: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
    first_only: bool,
) -> bool {
    ancestors.push(node);
    for (index, child) in node.children.iter().enumerate() {
        if !child.is_element() {
            continue;
        }
        path.push(index);
        if selector.matches(child, ancestors) {
            out.push(path.clone());
            if first_only {
                path.pop();
                ancestors.pop();
                return true;
            }
        }
        if collect_matches(child, selector, ancestors, path, out, first_only) {
            path.pop();
            ancestors.pop();
            return true;
        }
        path.pop();
    }
    ancestors.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn page() -> DomNode {
        parse_html(
            r#"<html><body>
              <div class="hero-contacts">
                <a href="mailto:old@example.com">mail</a>
                <a href="https://github.com/old">gh</a>
              </div>
              <ul class="list"><li class="a">1</li><li class="b">2<span class="a">x</span></li></ul>
            </body></html>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_query_selector_mut_sets_attribute() {
        let mut doc = page();
        let link = doc
            .query_selector_mut(&sel(r#".hero-contacts a[href*="github"]"#))
            .unwrap();
        link.set_attribute("href", "https://github.com/new");
        let found = doc.query_selector(&sel(r#"a[href^="https://github"]"#)).unwrap();
        assert_eq!(found.get_attribute("href"), Some("https://github.com/new"));
    }

    #[test]
    fn test_query_selector_all_document_order() {
        let doc = page();
        let found = doc.query_selector_all(&sel(".a"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].tag_name(), Some("li"));
        assert_eq!(found[1].tag_name(), Some("span"));
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = page();
        let li = doc.query_selector_mut(&sel("li.b")).unwrap();
        li.set_text_content("<b>plain</b>");
        assert_eq!(li.children.len(), 1);
        assert_eq!(li.text_content(), "<b>plain</b>");
    }

    #[test]
    fn test_class_helpers() {
        let mut node = DomNode::element("div").with_class("one two");
        node.add_class("three");
        node.add_class("two");
        assert_eq!(node.get_attribute("class"), Some("one two three"));
        node.remove_class("one");
        assert_eq!(node.get_attribute("class"), Some("two three"));
        assert!(!node.has_class("one"));
    }

    #[test]
    fn test_remove_matching_handles_nested_matches() {
        let mut doc = parse_html(
            r#"<div id="root"><div class="x"><p class="x">a</p></div><p>keep</p><span class="x"></span></div>"#,
        )
        .unwrap();
        let removed = doc.remove_matching(&sel(".x"));
        assert_eq!(removed, 2);
        assert!(doc.query_selector(&sel(".x")).is_none());
        assert_eq!(doc.query_selector(&sel("#root")).unwrap().text_content(), "keep");
    }

    #[test]
    fn test_set_attribute_on_text_is_noop() {
        let mut node = DomNode::text("hello");
        node.set_attribute("href", "x");
        assert_eq!(node.get_attribute("href"), None);
    }
}
