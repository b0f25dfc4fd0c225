//! # Locator Strategies
//!
//! Typed, data-driven element lookup. A [`LocatorChain`] is an ordered list
//! of strategies evaluated first-match-wins, so heuristics like "explicit
//! marker, then semantic tag, then class pattern, then position" are a list
//! a test can replace rather than nested control flow.

use quickedit_common::{query_selector, walk, Dom, NodeId};
use tracing::warn;

/// Position-based fallback among the root's element children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralPosition {
    First,
    Last,
    /// The child with the largest subtree, excluding first and last
    Main,
}

/// One way of finding an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Element carrying `attribute = stable_id`
    StableId { attribute: String, stable_id: String },
    /// CSS selector, first match in document order
    Selector(String),
    /// Element whose `id` attribute equals the value
    DomId(String),
    /// Element with an attribute, optionally with an exact value
    Attribute { name: String, value: Option<String> },
    Tag(String),
    /// Element with a class token containing the pattern (case-insensitive)
    ClassContains(String),
    Structural(StructuralPosition),
}

impl Locator {
    pub fn stable_id(attribute: impl Into<String>, stable_id: impl Into<String>) -> Self {
        Locator::StableId {
            attribute: attribute.into(),
            stable_id: stable_id.into(),
        }
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Locator::Attribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn has_attribute(name: impl Into<String>) -> Self {
        Locator::Attribute {
            name: name.into(),
            value: None,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Locator::Tag(tag.into().to_ascii_lowercase())
    }

    pub fn class_contains(pattern: impl Into<String>) -> Self {
        Locator::ClassContains(pattern.into().to_ascii_lowercase())
    }

    /// Every attached candidate in document order
    pub fn candidates<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        match self {
            Locator::StableId { attribute, stable_id } => {
                filter(dom, |d, n| d.attribute(n, attribute).as_deref() == Some(stable_id.as_str()))
            }
            Locator::Selector(selector) => match quickedit_common::query_selector_all(dom, selector) {
                Ok(nodes) => nodes,
                Err(error) => {
                    warn!(selector = %selector, error = %error, "Ignoring unparseable selector");
                    Vec::new()
                }
            },
            Locator::DomId(id) => filter(dom, |d, n| d.dom_id(n).as_deref() == Some(id.as_str())),
            Locator::Attribute { name, value } => filter(dom, |d, n| match (d.attribute(n, name), value) {
                (Some(actual), Some(expected)) => actual.eq_ignore_ascii_case(expected),
                (Some(_), None) => true,
                (None, _) => false,
            }),
            Locator::Tag(tag) => filter(dom, |d, n| d.tag_name(n) == *tag),
            Locator::ClassContains(pattern) => filter(dom, |d, n| {
                d.class_list(n)
                    .iter()
                    .any(|class| class.to_ascii_lowercase().contains(pattern.as_str()))
            }),
            Locator::Structural(position) => structural(dom, *position).into_iter().collect(),
        }
    }

    pub fn locate<D: Dom + ?Sized>(&self, dom: &D) -> Option<NodeId> {
        match self {
            // Avoid collecting every match for the common single-result cases
            Locator::Selector(selector) => match query_selector(dom, selector) {
                Ok(node) => node,
                Err(error) => {
                    warn!(selector = %selector, error = %error, "Ignoring unparseable selector");
                    None
                }
            },
            Locator::Structural(position) => structural(dom, *position),
            _ => self.candidates(dom).into_iter().next(),
        }
    }
}

/// Ordered strategies, first match wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorChain {
    pub locators: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(locators: Vec<Locator>) -> Self {
        Self { locators }
    }

    pub fn push(&mut self, locator: Locator) {
        self.locators.push(locator);
    }

    pub fn locate<D: Dom + ?Sized>(&self, dom: &D) -> Option<NodeId> {
        self.locators.iter().find_map(|locator| locator.locate(dom))
    }

    /// First candidate, in strategy order, that `accept` allows
    pub fn locate_where<D, F>(&self, dom: &D, accept: F) -> Option<NodeId>
    where
        D: Dom + ?Sized,
        F: Fn(NodeId) -> bool,
    {
        self.locators
            .iter()
            .find_map(|locator| locator.candidates(dom).into_iter().find(|n| accept(*n)))
    }
}

impl From<Vec<Locator>> for LocatorChain {
    fn from(locators: Vec<Locator>) -> Self {
        Self::new(locators)
    }
}

fn filter<D, F>(dom: &D, predicate: F) -> Vec<NodeId>
where
    D: Dom + ?Sized,
    F: Fn(&D, NodeId) -> bool,
{
    walk::find_all(dom, dom.root(), predicate)
}

fn structural<D: Dom + ?Sized>(dom: &D, position: StructuralPosition) -> Option<NodeId> {
    let children = dom.children(dom.root());
    match position {
        // A lone child is the whole page, not a header or footer
        _ if children.len() < 2 && position != StructuralPosition::Main => None,
        StructuralPosition::First => children.first().copied(),
        StructuralPosition::Last => children.last().copied(),
        StructuralPosition::Main => {
            if children.len() < 3 {
                return None;
            }
            children[1..children.len() - 1]
                .iter()
                .copied()
                .max_by_key(|child| walk::descendants(dom, *child).len())
        }
    }
}
