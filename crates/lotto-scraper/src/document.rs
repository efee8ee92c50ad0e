//! Minimal DOM interface the locator and aggregator are written against.
//!
//! [`HtmlPage`] implements it over a parsed [`scraper::Html`]; tests and
//! alternative parsers only need to provide the handful of traversals below.

use std::ops::Deref;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Read-only view of a parsed HTML document.
///
/// Node handles are cheap copies that are only meaningful for the document
/// that produced them. "Document order" means a pre-order walk of the tree.
pub trait Document {
    type Node: Copy + PartialEq;

    /// Every element named `tag`, in document order.
    fn elements_by_tag(&self, tag: &str) -> Vec<Self::Node>;

    /// First text node whose content matches `pattern`.
    fn find_text(&self, pattern: &Regex) -> Option<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// First element named `tag` that follows `node` in document order,
    /// including elements nested inside `node`.
    fn find_next_by_tag(&self, node: Self::Node, tag: &str) -> Option<Self::Node>;

    /// Elements below `node` matching the CSS selector `css`. An invalid
    /// selector matches nothing.
    fn select_within(&self, node: Self::Node, css: &str) -> Vec<Self::Node>;

    /// Whitespace-collapsed text content of `node`.
    fn text(&self, node: Self::Node) -> String;
}

/// Node handle of a [`scraper::Html`] tree.
pub type DomNode<'a> = <ElementRef<'a> as Deref>::Target;

/// A parsed page plus a pre-order index of its nodes.
pub struct HtmlPage<'a> {
    order: Vec<DomNode<'a>>,
}

impl<'a> HtmlPage<'a> {
    #[must_use]
    pub fn new(html: &'a Html) -> Self {
        Self {
            order: html.tree.root().descendants().collect(),
        }
    }

    /// `true` when the page has at least one element besides the
    /// `html`/`head`/`body` scaffolding the parser always synthesizes.
    #[must_use]
    pub fn has_markup(&self) -> bool {
        self.order.iter().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| !matches!(el.name(), "html" | "head" | "body"))
        })
    }

    fn position(&self, node: DomNode<'a>) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == node)
    }
}

fn is_element_named(node: &DomNode<'_>, tag: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|el| el.name().eq_ignore_ascii_case(tag))
}

fn collapse_whitespace<'s>(parts: impl Iterator<Item = &'s str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

impl<'a> Document for HtmlPage<'a> {
    type Node = DomNode<'a>;

    fn elements_by_tag(&self, tag: &str) -> Vec<Self::Node> {
        self.order
            .iter()
            .filter(|node| is_element_named(node, tag))
            .copied()
            .collect()
    }

    fn find_text(&self, pattern: &Regex) -> Option<Self::Node> {
        self.order.iter().copied().find(|node| {
            node.value()
                .as_text()
                .is_some_and(|text| pattern.is_match(text))
        })
    }

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        node.parent()
    }

    fn find_next_by_tag(&self, node: Self::Node, tag: &str) -> Option<Self::Node> {
        let start = self.position(node)?;
        self.order[start + 1..]
            .iter()
            .find(|candidate| is_element_named(candidate, tag))
            .copied()
    }

    fn select_within(&self, node: Self::Node, css: &str) -> Vec<Self::Node> {
        let Ok(selector) = Selector::parse(css) else {
            tracing::debug!(css, "ignoring invalid selector");
            return Vec::new();
        };
        let Some(element) = ElementRef::wrap(node) else {
            return Vec::new();
        };
        element.select(&selector).map(|el| *el).collect()
    }

    fn text(&self, node: Self::Node) -> String {
        if let Some(text) = node.value().as_text() {
            return collapse_whitespace(std::iter::once(&**text));
        }
        match ElementRef::wrap(node) {
            Some(element) => collapse_whitespace(element.text()),
            None => String::new(),
        }
    }
}
