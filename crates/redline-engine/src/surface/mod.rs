//! # In-Memory Surface
//!
//! An arena-backed element tree standing in for a live editable surface, and
//! [`MemoryHost`], which wraps it with a selection and a mutation-record
//! queue so the controller can drive it exactly like a real host.
//!
//! Writing markup rebuilds the whole arena under a new generation. Node ids
//! from an earlier generation stop resolving, which is how "the node you were
//! pointing at has been replaced" shows up here.

mod host;

pub use host::MemoryHost;

use crate::cursor::{self, SurfaceTree};
use crate::markup::{Element, MarkupNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Surface {
    nodes: Vec<NodeData>,
    generation: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        let mut surface = Self {
            nodes: Vec::new(),
            generation: 0,
        };
        surface.reset();
        surface
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.nodes.clear();
        self.nodes.push(NodeData {
            kind: NodeKind::Element {
                tag: "div".to_string(),
                attrs: vec![
                    ("id".to_string(), "editor".to_string()),
                    ("contenteditable".to_string(), "true".to_string()),
                ],
            },
            parent: None,
            children: Vec::new(),
        });
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: self.generation,
        }
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.index)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get_mut(id.index)
    }

    /// Replace everything under the root; all previous node ids go stale
    pub fn replace_content(&mut self, nodes: &[MarkupNode]) {
        self.reset();
        let root = self.root();
        for node in nodes {
            self.append(root, node);
        }
    }

    fn append(&mut self, parent: NodeId, node: &MarkupNode) -> NodeId {
        let kind = match node {
            MarkupNode::Text(text) => NodeKind::Text(text.clone()),
            MarkupNode::Element(element) => NodeKind::Element {
                tag: element.tag.clone(),
                attrs: element.attrs.clone(),
            },
        };
        let id = self.push(kind, parent);
        if let Some(parent) = self.data_mut(parent) {
            parent.children.push(id);
        }
        if let MarkupNode::Element(element) = node {
            for child in &element.children {
                self.append(id, child);
            }
        }
        id
    }

    fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId {
            index: self.nodes.len(),
            generation: self.generation,
        };
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    /// The root's children as markup nodes
    pub fn to_markup(&self) -> Vec<MarkupNode> {
        self.children(self.root())
            .iter()
            .filter_map(|&child| self.markup_node(child))
            .collect()
    }

    fn markup_node(&self, id: NodeId) -> Option<MarkupNode> {
        let data = self.data(id)?;
        Some(match &data.kind {
            NodeKind::Text(text) => MarkupNode::Text(text.clone()),
            NodeKind::Element { tag, attrs } => MarkupNode::Element(Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: data
                    .children
                    .iter()
                    .filter_map(|&child| self.markup_node(child))
                    .collect(),
            }),
        })
    }

    /// Whether `id` is live and connected to the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        let mut current = id;
        loop {
            if current == root {
                return true;
            }
            match self.data(current).and_then(|data| data.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map_or(&[], |data| data.children.as_slice())
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.data(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.data(id)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Concatenated text of `id` and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.data(id) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Nearest node at or above `id` satisfying `predicate`
    pub fn ancestor_or_self(
        &self,
        id: NodeId,
        predicate: impl Fn(&Surface, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            self.data(node)?;
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// First element in document order whose attribute `name` equals `value`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if self.attr(node, name) == Some(value) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev());
        }
        None
    }

    /// Insert `text` into a text node at a char offset (clamped)
    pub fn insert_text(&mut self, id: NodeId, offset: usize, text: &str) -> bool {
        match self.data_mut(id).map(|data| &mut data.kind) {
            Some(NodeKind::Text(content)) => {
                let at = byte_index(content, offset);
                content.insert_str(at, text);
                true
            }
            _ => false,
        }
    }

    /// Remove the chars `start..end` of a text node (clamped)
    pub fn delete_text(&mut self, id: NodeId, start: usize, end: usize) -> bool {
        match self.data_mut(id).map(|data| &mut data.kind) {
            Some(NodeKind::Text(content)) => {
                let from = byte_index(content, start);
                let to = byte_index(content, end.max(start));
                content.replace_range(from..to, "");
                true
            }
            _ => false,
        }
    }

    /// Add a text node as child `index` (clamped) of an element
    pub fn insert_text_node(&mut self, parent: NodeId, index: usize, text: &str) -> Option<NodeId> {
        self.tag(parent)?;
        let id = self.push(NodeKind::Text(text.to_string()), parent);
        let children = &mut self.data_mut(parent)?.children;
        children.insert(index.min(children.len()), id);
        Some(id)
    }

    /// Detach every direct child element of `parent` with the given tag
    pub fn remove_children_with_tag(&mut self, parent: NodeId, tag: &str) -> usize {
        let doomed: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&child| self.tag(child) == Some(tag))
            .collect();

        for &child in &doomed {
            if let Some(data) = self.data_mut(child) {
                data.parent = None;
            }
        }
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|child| !doomed.contains(child));
        }
        doomed.len()
    }

    fn sibling(&self, id: NodeId, forward: bool) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&node| node == id)?;
        if forward {
            siblings.get(index + 1).copied()
        } else {
            index.checked_sub(1).map(|i| siblings[i])
        }
    }
}

impl SurfaceTree for Surface {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, true)
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, false)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.data(node)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }
}

/// Byte index of the char at `offset`, or the end of `text`
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}

impl Surface {
    /// Linear char length of everything under the root
    pub fn len(&self) -> usize {
        cursor::SurfaceTree::text_len(self, self.root())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use pretty_assertions::assert_eq;

    fn surface(markup: &str) -> Surface {
        let mut surface = Surface::new();
        surface.replace_content(&parse(markup).unwrap());
        surface
    }

    #[test]
    fn replace_content_round_trips_markup() {
        let markup = "<div id=\"p\"><span>Hello <mark data-added=\"true\">big </mark>world</span></div>";
        let surface = surface(markup);
        assert_eq!(crate::markup::write(&surface.to_markup()), markup);
        assert_eq!(surface.len(), 15);
    }

    #[test]
    fn replace_content_invalidates_old_ids() {
        let mut surface = surface("<span>a</span>");
        let old = surface.children(surface.root())[0];
        assert!(surface.is_attached(old));

        surface.replace_content(&parse("<span>b</span>").unwrap());

        assert!(!surface.is_attached(old));
        assert_eq!(surface.tag(old), None);
        assert_eq!(surface.text_content(old), "");
    }

    #[test]
    fn siblings_and_parents() {
        let surface = surface("<span>a</span><span>b</span><span>c</span>");
        let root = surface.root();
        let [a, b, c] = [0, 1, 2].map(|i| surface.children(root)[i]);

        assert_eq!(surface.next_sibling(a), Some(b));
        assert_eq!(surface.previous_sibling(c), Some(b));
        assert_eq!(surface.previous_sibling(a), None);
        assert_eq!(surface.next_sibling(c), None);
        assert_eq!(surface.parent(b), Some(root));
        assert_eq!(surface.parent(root), None);
    }

    #[test]
    fn text_edits_count_chars() {
        let mut surface = surface("<span>héllo</span>");
        let span = surface.children(surface.root())[0];
        let text = surface.children(span)[0];

        assert!(surface.insert_text(text, 2, "XY"));
        assert_eq!(surface.text_content(span), "héXYllo");
        assert!(surface.delete_text(text, 0, 2));
        assert_eq!(surface.text_content(span), "XYllo");
        assert!(!surface.insert_text(span, 0, "no"));
    }

    #[test]
    fn placeholder_br_can_be_swapped_for_text() {
        let mut surface = surface("<span><br/></span>");
        let span = surface.children(surface.root())[0];
        let br = surface.children(span)[0];

        assert_eq!(surface.remove_children_with_tag(span, "br"), 1);
        assert!(!surface.is_attached(br));
        let text = surface.insert_text_node(span, 5, "Hi").unwrap();

        assert_eq!(surface.children(span), &[text]);
        assert_eq!(surface.text_content(span), "Hi");
    }

    #[test]
    fn find_by_attr_searches_in_document_order() {
        let surface = surface("<div><span id=\"x\">1</span></div><span id=\"x\">2</span>");
        let found = surface.find_by_attr("id", "x").unwrap();
        assert_eq!(surface.text_content(found), "1");
    }

    #[test]
    fn ancestor_or_self_stops_at_match() {
        let surface = surface("<div data-type=\"paragraph\"><span>text</span></div>");
        let div = surface.children(surface.root())[0];
        let text = surface.children(surface.children(div)[0])[0];

        let found = surface.ancestor_or_self(text, |s, n| s.attr(n, "data-type") == Some("paragraph"));
        assert_eq!(found, Some(div));
        assert_eq!(surface.ancestor_or_self(text, |s, n| s.tag(n) == Some("table")), None);
    }
}
