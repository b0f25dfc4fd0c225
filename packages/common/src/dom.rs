use crate::style::{self, StyleDeclarations};
use serde::{Deserialize, Serialize};

/// Opaque handle to a node owned by a [`Dom`] implementation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// DOM abstraction for the editor and for testing
///
/// Implementations only supply primitives. Selector matching, region
/// tagging and identity assignment are built on top of these in a
/// backend-independent way.
pub trait Dom {
    /// The document element everything else hangs from (usually `body`)
    fn root(&self) -> NodeId;

    /// Whether the node is still attached to the document
    fn is_attached(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in document order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Serialized inner content
    fn inner_html(&self, node: NodeId) -> String;

    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Resolved value of a style property, empty when the property has no value
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    /// Raw inline `style` attribute, empty when absent
    fn inline_style(&self, node: NodeId) -> String {
        self.attribute(node, "style").unwrap_or_default()
    }

    /// Set a single inline style property, leaving the others untouched
    fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        let mut declarations = StyleDeclarations::parse(&self.inline_style(node));
        declarations.set(&style::normalize_property(property), value);
        self.set_attribute(node, "style", &declarations.to_string());
    }

    /// Remove a single inline style property; drops the attribute once empty
    fn remove_style_property(&mut self, node: NodeId, property: &str) {
        let mut declarations = StyleDeclarations::parse(&self.inline_style(node));
        if !declarations.remove(&style::normalize_property(property)) {
            return;
        }
        if declarations.is_empty() {
            self.remove_attribute(node, "style");
        } else {
            self.set_attribute(node, "style", &declarations.to_string());
        }
    }

    /// DOM `id` attribute
    fn dom_id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Whitespace-separated class tokens
    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
