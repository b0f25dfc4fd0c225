//! # Stable Identity
//!
//! Durable ids for editable elements so edits survive reloads and
//! re-renders of the same markup.
//!
//! ```text
//! qe-<type>-<rank>-<sanitized page identifier>
//! ```
//!
//! `rank` is the 0-based position of the element among the elements that
//! classify as the same type, in document order at assignment time. Elements
//! nothing classifies count as `custom`. Ids are written back onto the
//! element, so a second `assign` is a lookup, and a rank already taken by
//! another attached element moves on to the next free one.
//!
//! If elements are inserted or removed above an element between sessions,
//! its recomputed id can collide with another element's old id. That is a
//! known limitation and is not corrected here.

use crate::classifier::ElementClassifier;
use crate::config::EditorConfig;
use crate::element::ElementType;
use quickedit_common::{walk, Dom, NodeId};
use tracing::debug;

/// Attribute holding an element's classification
pub const TYPE_ATTRIBUTE: &str = "data-qe-type";

/// Marker set on every element the editor may select
pub const EDITABLE_ATTRIBUTE: &str = "data-qe-editable";

/// Assigns and resolves stable ids
#[derive(Debug, Clone)]
pub struct StableIdentity {
    attribute: String,
    page_identifier: String,
}

impl StableIdentity {
    pub fn new(attribute: impl Into<String>, page_identifier: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            page_identifier: page_identifier.into(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.identity_attribute.clone(), config.page_identifier.clone())
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Existing id of `node`, if it has been assigned one
    pub fn resolve<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> Option<String> {
        dom.attribute(node, &self.attribute).filter(|id| !id.is_empty())
    }

    /// Return the element's id, computing and writing one if needed
    pub fn assign<D: Dom + ?Sized>(
        &self,
        dom: &mut D,
        node: NodeId,
        element_type: ElementType,
        classifier: &ElementClassifier,
    ) -> String {
        if let Some(existing) = self.resolve(dom, node) {
            return existing;
        }

        let mut rank = positional_index(&*dom, node, element_type, classifier);
        let mut stable_id = compose_stable_id(element_type, rank, &self.page_identifier);
        while self.find(&*dom, &stable_id).is_some_and(|holder| holder != node) {
            rank += 1;
            stable_id = compose_stable_id(element_type, rank, &self.page_identifier);
        }

        dom.set_attribute(node, &self.attribute, &stable_id);
        if dom.attribute(node, TYPE_ATTRIBUTE).is_none() {
            dom.set_attribute(node, TYPE_ATTRIBUTE, element_type.as_str());
        }
        if dom.dom_id(node).is_none() {
            dom.set_attribute(node, "id", &stable_id);
        }

        debug!(stable_id = %stable_id, rank, element_type = %element_type, "Assigned stable id");
        stable_id
    }

    /// Locate the attached element carrying `stable_id`
    pub fn find<D: Dom + ?Sized>(&self, dom: &D, stable_id: &str) -> Option<NodeId> {
        walk::descendants(dom, dom.root())
            .into_iter()
            .find(|node| dom.attribute(*node, &self.attribute).as_deref() == Some(stable_id))
    }
}

/// Number of elements preceding `node` in document order that classify as
/// `element_type`, tagged or not
pub fn positional_index<D: Dom + ?Sized>(
    dom: &D,
    node: NodeId,
    element_type: ElementType,
    classifier: &ElementClassifier,
) -> usize {
    let root = dom.root();
    walk::descendants(dom, root)
        .into_iter()
        .filter(|candidate| *candidate != root)
        .take_while(|candidate| *candidate != node)
        .filter(|candidate| {
            classifier
                .classify_element(dom, *candidate)
                .unwrap_or(ElementType::Custom)
                == element_type
        })
        .count()
}

pub fn compose_stable_id(element_type: ElementType, rank: usize, page_identifier: &str) -> String {
    format!("qe-{}-{}-{}", element_type.as_str(), rank, sanitize(page_identifier))
}

/// Strip everything but ASCII letters and digits
pub fn sanitize(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
