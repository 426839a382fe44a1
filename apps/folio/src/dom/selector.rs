//! CSS selectors, parsed with `cssparser` and matched with the `selectors` crate.
//!
//! `ElementRef` adapts a borrowed `DomNode` plus its ancestor chain to `selectors::Element`.

use std::borrow::Borrow;
use std::fmt;
use std::ptr;

use cssparser::{CowRcStr, ParseError, Parser, ParserInput, SourceLocation, ToCss};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::context::{QuirksMode, SelectorCaches};
use selectors::matching::{
    matches_selector, ElementSelectorFlags, MatchingContext, MatchingForInvalidation,
    MatchingMode, NeedsSelectorFlags,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList, SelectorParseErrorKind};
use selectors::{Element, OpaqueElement};

use super::{DomError, DomNode};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// ────────────────────────────────────────────────────────────────────────────
// Selector implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolioSelectorImpl;

impl SelectorImpl for FolioSelectorImpl {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssText;
    type Identifier = CssText;
    type LocalName = CssText;
    type NamespacePrefix = CssText;
    type NamespaceUrl = CssText;
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = str;

    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

/// Owned string in the shape `selectors` wants for identifiers and attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssText(pub String);

impl From<&str> for CssText {
    fn from(s: &str) -> Self {
        CssText(s.to_string())
    }
}

impl AsRef<str> for CssText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CssText {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssText {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        dest.write_str(&self.0)
    }
}

impl precomputed_hash::PrecomputedHash for CssText {
    fn precomputed_hash(&self) -> u32 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish() as u32
    }
}

/// Pseudo-classes beyond the tree-structural ones `selectors` handles itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    AnyLink,
    Link,
    /// Never matches; there is no browsing history on the server.
    Visited,
}

impl selectors::parser::NonTSPseudoClass for PseudoClass {
    type Impl = FolioSelectorImpl;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        dest.write_str(match self {
            PseudoClass::AnyLink => ":any-link",
            PseudoClass::Link => ":link",
            PseudoClass::Visited => ":visited",
        })
    }
}

/// No pseudo-elements are supported; a static page has nothing generated to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = FolioSelectorImpl;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

struct FolioParser;

impl<'i> selectors::parser::Parser<'i> for FolioParser {
    type Impl = FolioSelectorImpl;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> Result<PseudoClass, ParseError<'i, Self::Error>> {
        match name.to_ascii_lowercase().as_str() {
            "any-link" => Ok(PseudoClass::AnyLink),
            "link" => Ok(PseudoClass::Link),
            "visited" => Ok(PseudoClass::Visited),
            _ => Err(location.new_custom_error(
                SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name),
            )),
        }
    }

    fn parse_is_and_where(&self) -> bool {
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selector
// ────────────────────────────────────────────────────────────────────────────

/// A parsed selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<FolioSelectorImpl>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let list = SelectorList::parse(&FolioParser, &mut parser, ParseRelative::No).map_err(
            |e| DomError::Selector {
                selector: source.to_string(),
                reason: format!("{:?}", e.kind),
            },
        )?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// Whether `element` matches. `ancestors` runs from the outermost node down to the parent.
    pub fn matches(&self, element: &DomNode, ancestors: &[&DomNode]) -> bool {
        if !element.is_element() {
            return false;
        }
        let element = ElementRef::new(element, ancestors);

        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.list
            .slice()
            .iter()
            .any(|selector| matches_selector(selector, 0, None, &element, &mut context))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Element adapter
// ────────────────────────────────────────────────────────────────────────────

/// A borrowed element with enough context for selector matching.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    node: &'a DomNode,
    parent: Option<&'a DomNode>,
    /// Ancestors above `parent`, outermost first.
    above_parent: &'a [&'a DomNode],
}

impl<'a> ElementRef<'a> {
    pub fn new(node: &'a DomNode, ancestors: &'a [&'a DomNode]) -> Self {
        match ancestors.split_last() {
            Some((parent, above_parent)) => Self {
                node,
                parent: Some(*parent),
                above_parent,
            },
            None => Self {
                node,
                parent: None,
                above_parent: &[],
            },
        }
    }

    fn sibling(&self, node: &'a DomNode) -> Self {
        Self { node, ..*self }
    }

    fn sibling_elements(&self) -> impl Iterator<Item = &'a DomNode> + 'a {
        self.parent
            .into_iter()
            .flat_map(|parent| parent.children.iter())
            .filter(|child| child.is_element())
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node.get_attribute(name)
    }
}

impl<'a> Element for ElementRef<'a> {
    type Impl = FolioSelectorImpl;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.parent?;
        if !parent.is_element() {
            return None;
        }
        Some(ElementRef::new(parent, self.above_parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let mut prev = None;
        for child in self.sibling_elements() {
            if ptr::eq(child, self.node) {
                return prev.map(|node| self.sibling(node));
            }
            prev = Some(child);
        }
        None
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let mut siblings = self.sibling_elements();
        siblings.by_ref().find(|child| ptr::eq(*child, self.node))?;
        siblings.next().map(|node| self.sibling(node))
    }

    /// The child's ancestor chain stops at `self`; only used for `:has()` style lookups.
    fn first_element_child(&self) -> Option<Self> {
        self.node.element_children().next().map(|child| ElementRef {
            node: child,
            parent: Some(self.node),
            above_parent: &[],
        })
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.node
            .tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(local_name))
    }

    fn has_namespace(&self, ns: &str) -> bool {
        ns.is_empty() || ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.node.tag_name(), other.node.tag_name()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssText>,
        local_name: &CssText,
        operation: &AttrSelectorOperation<&CssText>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = ns {
            let url: &str = (*url).borrow();
            if !(url.is_empty() || url == HTML_NAMESPACE) {
                return false;
            }
        }
        let Some(actual) = self.attribute(&local_name.0) else {
            return false;
        };
        match operation {
            AttrSelectorOperation::Exists => true,
            AttrSelectorOperation::WithValue {
                operator,
                case_sensitivity,
                value,
            } => operator.eval_str(actual, &value.0, *case_sensitivity),
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        pseudo: &PseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match pseudo {
            PseudoClass::AnyLink | PseudoClass::Link => self.is_link(),
            PseudoClass::Visited => false,
        }
    }

    fn match_pseudo_element(
        &self,
        pseudo: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pseudo {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.node.tag_name(), Some("a" | "area" | "link"))
            && self.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssText, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id")
            .is_some_and(|actual| case_sensitivity.eq(actual.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssText, case_sensitivity: CaseSensitivity) -> bool {
        self.node
            .classes()
            .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssText) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssText) -> Option<CssText> {
        None
    }

    fn is_part(&self, _name: &CssText) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.node.children.iter().any(|child| match &child.node_type {
            super::DomNodeType::Element { .. } => true,
            super::DomNodeType::Text { content } => !content.is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        self.has_local_name("html") && self.parent.map_or(true, |p| !p.is_element())
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn doc() -> DomNode {
        parse_html(
            r#"<body>
              <section id="about" class="section about">
                <div class="about-paragraphs"><p class="about-paragraph">one</p></div>
              </section>
              <div class="hero-contacts">
                <a href="mailto:me@example.com">m</a>
                <span><a href="https://www.linkedin.com/in/me">l</a></span>
              </div>
            </body>"#,
        )
        .unwrap()
    }

    fn count(d: &DomNode, s: &str) -> usize {
        d.query_selector_all(&Selector::parse(s).unwrap()).len()
    }

    #[test]
    fn test_compound_and_descendant() {
        let d = doc();
        assert_eq!(count(&d, "section#about.section.about p.about-paragraph"), 1);
        assert_eq!(count(&d, ".about p"), 1);
        assert_eq!(count(&d, "div#about"), 0);
    }

    #[test]
    fn test_child_combinator() {
        let d = doc();
        assert_eq!(count(&d, ".hero-contacts > a"), 1);
        assert_eq!(count(&d, ".hero-contacts a"), 2);
        assert_eq!(count(&d, ".hero-contacts > span > a"), 1);
    }

    #[test]
    fn test_attribute_operators() {
        let d = doc();
        assert_eq!(count(&d, r#"a[href^="mailto"]"#), 1);
        assert_eq!(count(&d, r#"a[href*="linkedin"]"#), 1);
        assert_eq!(count(&d, r#"a[href$='/me']"#), 1);
        assert_eq!(count(&d, "a[href]"), 2);
        assert_eq!(count(&d, r#"a[href="mailto:me@example.com"]"#), 1);
        assert_eq!(count(&d, r#"a[href^="tel"]"#), 0);
    }

    #[test]
    fn test_selector_list() {
        let d = doc();
        assert_eq!(count(&d, ".about-paragraph, .hero-contacts a"), 3);
    }

    #[test]
    fn test_structural_and_link_pseudo_classes() {
        let d = doc();
        assert_eq!(count(&d, ".hero-contacts > :first-child"), 1);
        assert_eq!(count(&d, ".hero-contacts > span:last-child"), 1);
        assert_eq!(count(&d, "a:any-link"), 2);
        assert_eq!(count(&d, "a:visited"), 0);
        assert_eq!(count(&d, "html:root"), 1);
    }

    #[test]
    fn test_matches_respects_ancestor_chain() {
        let d = doc();
        let section = d.query_selector(&Selector::parse("#about").unwrap()).unwrap();
        let wrapper = &section.children[1];
        let paragraph = &wrapper.children[0];
        let selector = Selector::parse("section.about > div > p").unwrap();
        assert!(selector.matches(paragraph, &[section, wrapper]));
        assert!(!selector.matches(paragraph, &[wrapper]));
    }

    #[test]
    fn test_invalid_selectors_rejected() {
        for bad in ["", "a,", "> a", "a >", ".", "a[=x]", "a!b", "p:hover"] {
            let err = Selector::parse(bad).unwrap_err();
            assert!(matches!(err, DomError::Selector { .. }), "accepted {bad:?}");
        }
    }
}
