//! Headless, arena-backed [`Dom`] implementation
//!
//! Each node carries a "sheet" layer standing in for author stylesheets.
//! Computed styles resolve inline declarations first, then the sheet, then
//! the initial value. Inner markup is stored verbatim and is not re-parsed
//! into child nodes.

use crate::dom::{Dom, NodeId};
use crate::style::{normalize_property, StyleDeclarations};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    html: String,
    sheet: HashMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    attached: bool,
}

/// Description of an element to insert into a [`MemoryDom`]
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, String)>,
    html: String,
    sheet: HashMap<String, String>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Raw inline `style` attribute
    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Stylesheet-level value, visible through `computed_style` only
    pub fn sheet(mut self, property: &str, value: impl Into<String>) -> Self {
        self.sheet.insert(normalize_property(property), value.into());
        self
    }
}

/// In-memory document
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl MemoryDom {
    /// Create a document with an empty `body` root
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                tag: "body".to_string(),
                attributes: Vec::new(),
                html: String::new(),
                sheet: HashMap::new(),
                children: Vec::new(),
                parent: None,
                attached: true,
            }],
            root: NodeId(0),
        }
    }

    /// Append an element as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let index = self.node(parent).map(|p| p.children.len()).unwrap_or(0);
        self.insert(parent, index, spec)
    }

    /// Insert an element at `index` among `parent`'s children
    pub fn insert(&mut self, parent: NodeId, index: usize, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        let attached = self.node(parent).map(|p| p.attached).unwrap_or(false);

        self.nodes.push(NodeData {
            tag: spec.tag,
            attributes: spec.attributes,
            html: spec.html,
            sheet: spec.sheet,
            children: Vec::new(),
            parent: Some(parent),
            attached,
        });

        if let Some(p) = self.nodes.get_mut(parent.0) {
            let index = index.min(p.children.len());
            p.children.insert(index, id);
        }

        id
    }

    /// Remove a node (and its subtree) from the document
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(parent.0) {
                p.children.retain(|c| *c != node);
            }
        }

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.get_mut(current.0) {
                data.attached = false;
                stack.extend(data.children.iter().copied());
            }
        }
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.parent = None;
        }
    }

    pub fn set_sheet_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.sheet.insert(normalize_property(property), value.to_string());
        }
    }

    /// Number of nodes ever created, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        self.root
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).map(|n| n.attached).unwrap_or(false)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        match data.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attributes.retain(|(n, _)| n != name);
        }
    }

    fn inner_html(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.html.clone()).unwrap_or_default()
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if let Some(data) = self.node_mut(node) {
            data.html = html.to_string();
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        let Some(data) = self.node(node).filter(|n| n.attached) else {
            return String::new();
        };
        let property = normalize_property(property);
        let inline = StyleDeclarations::parse(&self.inline_style(node));

        if let Some(value) = inline.get(&property) {
            return value.to_string();
        }
        if let Some(value) = shorthand_background(&inline, &property) {
            return value;
        }
        if let Some(value) = data.sheet.get(&property) {
            return value.clone();
        }
        initial_value(&property).to_string()
    }
}

/// Resolve `background-color` / `background-image` out of an inline
/// `background` shorthand
fn shorthand_background(inline: &StyleDeclarations, property: &str) -> Option<String> {
    let background = inline.get("background")?;
    let is_image = background.contains("gradient(") || background.contains("url(");
    match property {
        "background-image" if is_image => Some(background.to_string()),
        "background-color" if !is_image => Some(background.to_string()),
        _ => None,
    }
}

fn initial_value(property: &str) -> &'static str {
    match property {
        "background-color" => "rgba(0, 0, 0, 0)",
        "background-image" => "none",
        "color" => "rgb(0, 0, 0)",
        "font-size" => "16px",
        "padding" | "margin" => "0px",
        "width" | "height" => "auto",
        "border-radius" => "0px",
        _ => "",
    }
}
