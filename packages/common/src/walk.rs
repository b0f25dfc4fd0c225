use crate::dom::{Dom, NodeId};

/// Visitor for traversing a DOM subtree in document order
///
/// The default `visit_node` walks every descendant. Override it to act on
/// nodes and call [`walk_children`] to keep descending, or return early to
/// prune the subtree.
pub trait DomVisitor<D: Dom + ?Sized>: Sized {
    fn visit_node(&mut self, dom: &D, node: NodeId) {
        walk_children(self, dom, node);
    }
}

pub fn walk_children<D: Dom + ?Sized, V: DomVisitor<D>>(visitor: &mut V, dom: &D, node: NodeId) {
    for child in dom.children(node) {
        visitor.visit_node(dom, child);
    }
}

/// Walk `start` and its whole subtree
pub fn walk<D: Dom + ?Sized, V: DomVisitor<D>>(visitor: &mut V, dom: &D, start: NodeId) {
    visitor.visit_node(dom, start);
}

/// Collects every node of a subtree, `start` included, in document order
pub struct Collector {
    pub nodes: Vec<NodeId>,
}

impl<D: Dom + ?Sized> DomVisitor<D> for Collector {
    fn visit_node(&mut self, dom: &D, node: NodeId) {
        self.nodes.push(node);
        walk_children(self, dom, node);
    }
}

/// All nodes under `start` (inclusive) in document order
pub fn descendants<D: Dom + ?Sized>(dom: &D, start: NodeId) -> Vec<NodeId> {
    let mut collector = Collector { nodes: Vec::new() };
    walk(&mut collector, dom, start);
    collector.nodes
}

/// Nodes under `start` (inclusive) for which `predicate` holds, in document order
pub fn find_all<D, F>(dom: &D, start: NodeId, predicate: F) -> Vec<NodeId>
where
    D: Dom + ?Sized,
    F: Fn(&D, NodeId) -> bool,
{
    descendants(dom, start)
        .into_iter()
        .filter(|node| predicate(dom, *node))
        .collect()
}

/// Whether `ancestor` is `node` or one of its ancestors
pub fn is_inclusive_ancestor<D: Dom + ?Sized>(dom: &D, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = dom.parent(n);
    }
    false
}
