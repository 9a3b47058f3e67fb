//! Capabilities the controller needs from whatever hosts the live surface.
//!
//! The controller never reaches for global selection or mutation APIs; a host
//! implements these traits and is handed to it at mount time.
//! [`MemoryHost`](crate::surface::MemoryHost) is the in-memory implementation.

use crate::markup::MarkupError;
use crate::model::SentenceId;

/// Reading and replacing the rendered surface
pub trait SurfacePort {
    type Node: Copy + Eq + std::fmt::Debug;

    /// Replace everything under the surface root with `markup`
    fn write_markup(&mut self, markup: &str) -> Result<(), MarkupError>;

    /// Current surface content as markup
    fn markup(&self) -> String;

    /// The sentence enclosing `node`: its id and full text content.
    ///
    /// `None` when `node` is not inside a sentence element (or no longer
    /// part of the surface).
    fn sentence_at(&self, node: Self::Node) -> Option<(SentenceId, String)>;
}

/// Caret capture and placement in linear-offset terms
pub trait SelectionPort {
    /// Offset of the focus relative to the surface root; 0 when there is
    /// no usable selection
    fn capture_offset(&self) -> usize;

    /// Collapse the selection at `offset`, clamped to the content
    fn restore_offset(&mut self, offset: usize);

    /// Whether the selection's anchor and focus sit in different nodes
    fn spans_nodes(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Text of a text node changed
    CharacterData,
    /// Children were added or removed
    ChildList,
}

/// One content-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRecord<N> {
    pub target: N,
    pub kind: MutationKind,
}

/// Subscribing to content-change notifications
pub trait MutationPort: SurfacePort {
    /// Start recording mutations
    fn observe(&mut self);

    /// Stop recording mutations; changes made while disconnected produce no
    /// records
    fn disconnect(&mut self);

    fn is_observing(&self) -> bool;

    /// Drain the records gathered since the last call, oldest first
    fn take_records(&mut self) -> Vec<MutationRecord<Self::Node>>;
}

/// Everything the controller drives
pub trait Host: SurfacePort + SelectionPort + MutationPort {}

impl<T: SurfacePort + SelectionPort + MutationPort> Host for T {}
