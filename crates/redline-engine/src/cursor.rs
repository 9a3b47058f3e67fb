//! # Cursor Translator
//!
//! Converts between a caret in the surface tree and a single linear
//! character offset relative to a root node, and back.
//!
//! Re-rendering replaces every node under the root, so a caret pointing at a
//! node cannot survive a render. A linear offset can: capture it before the
//! write, restore it after.
//!
//! ```text
//! root
//! ├── div ── span ── "Hello "        offsets 0..6
//! │          │       mark ── "big "  offsets 6..10
//! │          │       "world."        offsets 10..16
//! │          span ── "How are you"   offsets 16..27
//! └── div ── span ── br              (no text)
//! ```
//!
//! Offsets count `char`s. Translation only reads the tree; setting the
//! resulting caret is the [`SelectionPort`](crate::ports::SelectionPort)'s job.

/// Read-only navigation over a surface tree
pub trait SurfaceTree {
    type Node: Copy + Eq;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Content of a text node; `None` for containers
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Length in chars of all text under `node`
    fn text_len(&self, node: Self::Node) -> usize {
        match self.text(node) {
            Some(text) => text.chars().count(),
            None => children(self, node).map(|child| self.text_len(child)).sum(),
        }
    }
}

/// Iterate the direct children of `node`
pub fn children<T: SurfaceTree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    std::iter::successors(tree.first_child(node), move |&child| tree.next_sibling(child))
}

/// A collapsed selection point.
///
/// In a text node `offset` counts chars; in a container it counts children,
/// so `offset == 1` means "after the first child".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Caret<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Selection is empty or detached from the surface")]
    StaleSelection,
}

/// Linear offset of `focus` relative to `root`.
///
/// Walks backward from the focus through preceding siblings, climbing to the
/// parent whenever a node has none, summing text lengths until `root`.
pub fn capture_offset<T: SurfaceTree>(
    tree: &T,
    root: T::Node,
    focus: Option<Caret<T::Node>>,
) -> Result<usize, CursorError> {
    let focus = focus.ok_or(CursorError::StaleSelection)?;

    let mut offset = match tree.text(focus.node) {
        Some(text) => focus.offset.min(text.chars().count()),
        None => children(tree, focus.node)
            .take(focus.offset)
            .map(|child| tree.text_len(child))
            .sum(),
    };

    let mut current = focus.node;
    while current != root {
        match tree.previous_sibling(current) {
            Some(previous) => {
                offset += tree.text_len(previous);
                current = previous;
            }
            None => current = tree.parent(current).ok_or(CursorError::StaleSelection)?,
        }
    }

    Ok(offset)
}

/// Caret for a linear offset relative to `root`.
///
/// Walks forward through the children of each container, skipping those
/// whose text ends before the offset, and descends into the one containing
/// it until a text node is reached. An offset on the boundary between two
/// nodes lands at the end of the earlier one. Offsets past the end clamp to
/// the end; a root without text yields `(root, 0)`.
pub fn restore_offset<T: SurfaceTree>(tree: &T, root: T::Node, offset: usize) -> Caret<T::Node> {
    let mut remaining = offset.min(tree.text_len(root));
    let mut node = root;

    'descend: loop {
        if tree.text(node).is_some() {
            return Caret::new(node, remaining);
        }

        let mut child = tree.first_child(node);
        while let Some(current) = child {
            let len = tree.text_len(current);
            if len > 0 && remaining <= len {
                node = current;
                continue 'descend;
            }
            remaining -= len;
            child = tree.next_sibling(current);
        }

        // Only reachable when nothing under `node` has text
        return Caret::new(node, 0);
    }
}
