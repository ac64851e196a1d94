//! HTML inspection for rendered pages.
//!
//! Served markup is parsed with html5ever into an owned element tree, so
//! implied end tags, unquoted attributes, comments and character references
//! follow the HTML parsing rules a browser applies.
//!
//! Visibility is judged from markup only: an element is hidden when it or an
//! ancestor carries `hidden`, `aria-hidden="true"` or an inline style with
//! `display: none` / `visibility: hidden`.

use std::collections::BTreeMap;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose text is not page content.
const NON_CONTENT: [&str; 3] = ["script", "style", "template"];

/// A node of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased local name
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
    visible: bool,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether the `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Whether neither this element nor any ancestor hides it.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Descendant elements in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        collect(self, &|_| true, &mut found);
        found
    }

    /// Text content with whitespace collapsed, skipping scripts and styles.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        push_text(self, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// `href` of every anchor inside the element, in document order.
    pub fn hrefs(&self) -> Vec<String> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag == "a")
            .filter_map(|e| e.attr("href"))
            .map(str::to_string)
            .collect()
    }
}

/// A parsed HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

        let children = dom
            .document
            .children
            .borrow()
            .iter()
            .filter_map(|child| convert(child, true))
            .collect();

        Self {
            root: Element {
                tag: String::new(),
                attrs: BTreeMap::new(),
                children,
                visible: true,
            },
        }
    }

    /// Text of the document `<title>`.
    pub fn title(&self) -> Option<String> {
        self.find(|e| e.tag == "title").map(Element::text)
    }

    /// Every element matching `predicate`, in document order.
    pub fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        collect(&self.root, &predicate, &mut found);
        found
    }

    /// First element matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.find_all(predicate).into_iter().next()
    }

    /// The main navigation landmark, `nav[aria-label="Main"]`.
    pub fn main_nav(&self) -> Option<&Element> {
        self.find(is_main_nav)
    }

    /// The first visible main navigation landmark.
    pub fn visible_main_nav(&self) -> Option<&Element> {
        self.find_all(is_main_nav)
            .into_iter()
            .find(|e| e.is_visible())
    }

    /// Whether any element matching `predicate` is visible.
    pub fn has_visible(&self, predicate: impl Fn(&Element) -> bool) -> bool {
        self.find_all(predicate).iter().any(|e| e.is_visible())
    }
}

fn is_main_nav(element: &Element) -> bool {
    element.tag == "nav" && element.attr("aria-label") == Some("Main")
}

fn convert(handle: &Handle, parent_visible: bool) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs: BTreeMap<String, String> = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            let visible = parent_visible && !hides(&attrs);

            let children = handle
                .children
                .borrow()
                .iter()
                .filter_map(|child| convert(child, visible))
                .collect();

            Some(Node::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children,
                visible,
            }))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        _ => None,
    }
}

fn collect<'a>(
    element: &'a Element,
    predicate: &dyn Fn(&Element) -> bool,
    found: &mut Vec<&'a Element>,
) {
    for child in &element.children {
        if let Node::Element(child) = child {
            if predicate(child) {
                found.push(child);
            }
            collect(child, predicate, found);
        }
    }
}

fn push_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(child) if NON_CONTENT.contains(&child.tag.as_str()) => {}
            Node::Element(child) => push_text(child, out),
        }
    }
}

fn hides(attrs: &BTreeMap<String, String>) -> bool {
    if attrs.contains_key("hidden") {
        return true;
    }
    if attrs
        .get("aria-hidden")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        return true;
    }
    attrs.get("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Introduction | Extended Data</title>
</head>
<body>
  <header><a href="/" class="site-title"><img src="/logo.svg" alt=""><span>Extended Data</span></a></header>
  <div class="layout">
    <nav aria-label="Main" class="sidebar">
      <ul>
        <li><details open><summary>Getting Started</summary>
          <ul><li><a href="/getting-started/" aria-current="page">Introduction</a></li></ul>
        </details></li>
        <li><details><summary>Tom &amp; Jerry</summary>
          <ul><li><a href="https://jbcom.github.io" target="_blank">jbcom Hub</a></li>
          <li><a href="/core/data-types/">Overview</a></li></ul>
        </details></li>
      </ul>
    </nav>
    <main class="main"><div class="content"><div><p>Hi</p></div></div></main>
  </div>
  <div hidden><div class="hero">Hidden hero</div></div>
</body>
</html>"#;

    #[test]
    fn extracts_title() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.title().as_deref(), Some("Introduction | Extended Data"));
        assert_eq!(Document::parse("<p>no title</p>").title(), None);
    }

    #[test]
    fn finds_main_nav_with_links() {
        let doc = Document::parse(PAGE);
        let nav = doc.main_nav().unwrap();

        assert_eq!(
            nav.hrefs(),
            vec![
                "/getting-started/".to_string(),
                "https://jbcom.github.io".to_string(),
                "/core/data-types/".to_string(),
            ]
        );
        assert!(nav.text().contains("Getting Started"));
        assert!(nav.text().contains("Tom & Jerry"));
        assert!(!nav.text().contains("Extended Data"));
    }

    #[test]
    fn visible_and_hidden_elements() {
        let doc = Document::parse(PAGE);

        assert!(doc.has_visible(|e| e.tag == "main"));
        assert!(doc.main_nav().unwrap().is_visible());
        assert!(!doc.has_visible(|e| e.has_class("hero")));
    }

    #[test]
    fn inline_styles_hide_elements() {
        let doc = Document::parse(
            r#"<div style="display : none"><main>x</main></div><nav aria-label="Main" aria-hidden="true"></nav>"#,
        );

        assert!(!doc.has_visible(|e| e.tag == "main"));
        assert!(doc.main_nav().is_some());
        assert!(doc.visible_main_nav().is_none());
    }

    #[test]
    fn unquoted_attributes() {
        let doc = Document::parse(
            "<nav aria-label=Main><a href=/getting-started/>Intro</a><a href=/core/>Core</a></nav>",
        );

        let nav = doc.main_nav().unwrap();
        assert_eq!(
            nav.hrefs(),
            vec!["/getting-started/".to_string(), "/core/".to_string()]
        );
    }

    #[test]
    fn commented_out_markup_is_ignored() {
        let doc = Document::parse(
            r#"<!-- <nav aria-label="Main"><a href="/old/">Old</a></nav> -->
<nav aria-label="Main"><a href="/new/">New</a></nav>"#,
        );

        assert_eq!(doc.main_nav().unwrap().hrefs(), vec!["/new/".to_string()]);
        assert_eq!(doc.find_all(|e| e.tag == "nav").len(), 1);
    }

    #[test]
    fn implied_end_tag_closes_hidden_paragraph() {
        let doc = Document::parse(
            r#"<body><p hidden>skip<nav aria-label="Main"><a href="/a/">A</a></nav></body>"#,
        );

        let nav = doc.main_nav().unwrap();
        assert!(nav.is_visible());
        assert!(!nav.text().contains("skip"));
    }

    #[test]
    fn attribute_values_may_contain_angle_brackets() {
        let doc = Document::parse(
            r#"<nav aria-label="Main" data-tip="a > b"><a href="/x/">X</a></nav>"#,
        );

        let nav = doc.main_nav().unwrap();
        assert_eq!(nav.attr("data-tip"), Some("a > b"));
        assert_eq!(nav.attrs.len(), 2);
        assert_eq!(nav.hrefs(), vec!["/x/".to_string()]);
    }

    #[test]
    fn character_references_are_decoded() {
        let doc = Document::parse(
            r#"<nav aria-label="Main"><a href="/a&#47;b/">A&#8212;B &copy;</a></nav>"#,
        );

        let nav = doc.main_nav().unwrap();
        assert_eq!(nav.hrefs(), vec!["/a/b/".to_string()]);
        assert_eq!(nav.text(), "A\u{2014}B \u{a9}");
    }

    #[test]
    fn text_skips_scripts_and_styles() {
        let doc = Document::parse(
            "<main><p>A</p><!-- <p>note</p> --><script>var x = '<b>B</b>';</script><style>p{}</style><p>C</p></main>",
        );

        assert_eq!(doc.find(|e| e.tag == "main").unwrap().text(), "A C");
    }

    #[test]
    fn descendants_are_in_document_order() {
        let doc = Document::parse(r#"<div class="content"><div><p>Hi</p></div></div>"#);

        let content = doc.find(|e| e.has_class("content")).unwrap();
        let tags: Vec<&str> = content
            .descendants()
            .iter()
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["div", "p"]);
    }
}
