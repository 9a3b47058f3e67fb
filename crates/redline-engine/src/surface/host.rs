use crate::cursor::{self, Caret, CursorError, SurfaceTree};
use crate::markup::{self, MarkupError, SENTENCE_TYPE, TYPE_ATTR};
use crate::model::SentenceId;
use crate::ports::{MutationKind, MutationPort, MutationRecord, SelectionPort, SurfacePort};
use crate::surface::{NodeId, Surface};

/// A [`Surface`] with a selection and a mutation observer.
///
/// Besides the ports, it exposes the user-side operations (placing the caret,
/// typing, deleting) that a real editable surface would receive from input
/// events. Those operations only change the tree and queue records; nothing
/// reaches the controller until it pumps the queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    surface: Surface,
    anchor: Option<Caret<NodeId>>,
    focus: Option<Caret<NodeId>>,
    observing: bool,
    records: Vec<MutationRecord<NodeId>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Visible text of the whole surface
    pub fn text(&self) -> String {
        self.surface.text_content(self.surface.root())
    }

    pub fn focus(&self) -> Option<Caret<NodeId>> {
        self.focus
    }

    pub fn anchor(&self) -> Option<Caret<NodeId>> {
        self.anchor
    }

    /// Collapse the selection at `offset` within `node`
    pub fn place_caret(&mut self, node: NodeId, offset: usize) {
        let caret = Caret::new(node, offset);
        self.anchor = Some(caret);
        self.focus = Some(caret);
    }

    pub fn select(&mut self, anchor: Caret<NodeId>, focus: Caret<NodeId>) {
        self.anchor = Some(anchor);
        self.focus = Some(focus);
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
        self.focus = None;
    }

    /// Element rendered for a sentence, if it is on the surface
    pub fn sentence_node(&self, id: SentenceId) -> Option<NodeId> {
        self.surface.find_by_attr("id", &id.to_string())
    }

    /// Put the caret `offset` chars into a sentence. Returns false when the
    /// sentence is not on the surface.
    pub fn place_caret_in_sentence(&mut self, id: SentenceId, offset: usize) -> bool {
        let Some(node) = self.sentence_node(id) else {
            return false;
        };
        let caret = cursor::restore_offset(&self.surface, node, offset);
        self.place_caret(caret.node, caret.offset);
        true
    }

    /// Type `text` at the focus, replacing a selection within one text node.
    ///
    /// A caret sitting in an element (a sentence showing only its placeholder
    /// line break) gets a new text node in place of the placeholder.
    pub fn type_text(&mut self, text: &str) -> Result<(), CursorError> {
        let focus = self.live_focus()?;

        if self.surface.text(focus.node).is_some() {
            let start = match self.anchor {
                Some(anchor) if anchor.node == focus.node && anchor.offset != focus.offset => {
                    let (start, end) = ordered(anchor.offset, focus.offset);
                    self.surface.delete_text(focus.node, start, end);
                    start
                }
                _ => focus.offset,
            };
            self.surface.insert_text(focus.node, start, text);
            self.place_caret(focus.node, start + text.chars().count());
            self.record(focus.node, MutationKind::CharacterData);
        } else {
            self.surface.remove_children_with_tag(focus.node, "br");
            let node = self
                .surface
                .insert_text_node(focus.node, focus.offset, text)
                .ok_or(CursorError::StaleSelection)?;
            self.place_caret(node, text.chars().count());
            self.record(focus.node, MutationKind::ChildList);
        }

        Ok(())
    }

    /// Delete up to `count` chars before the caret within its text node
    pub fn delete_backward(&mut self, count: usize) -> Result<(), CursorError> {
        let focus = self.live_focus()?;
        if self.surface.text(focus.node).is_none() {
            return Ok(());
        }

        let start = focus.offset.saturating_sub(count);
        if start == focus.offset {
            return Ok(());
        }
        self.surface.delete_text(focus.node, start, focus.offset);
        self.place_caret(focus.node, start);
        self.record(focus.node, MutationKind::CharacterData);
        Ok(())
    }

    fn live_focus(&self) -> Result<Caret<NodeId>, CursorError> {
        self.focus
            .filter(|caret| self.surface.is_attached(caret.node))
            .ok_or(CursorError::StaleSelection)
    }

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        if self.observing {
            self.records.push(MutationRecord { target, kind });
        }
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

impl SurfacePort for MemoryHost {
    type Node = NodeId;

    fn write_markup(&mut self, input: &str) -> Result<(), MarkupError> {
        let nodes = markup::parse(input)?;
        self.surface.replace_content(&nodes);
        self.clear_selection();
        self.record(self.surface.root(), MutationKind::ChildList);
        Ok(())
    }

    fn markup(&self) -> String {
        markup::write(&self.surface.to_markup())
    }

    fn sentence_at(&self, node: NodeId) -> Option<(SentenceId, String)> {
        if !self.surface.is_attached(node) {
            return None;
        }
        let sentence = self
            .surface
            .ancestor_or_self(node, |s, n| s.attr(n, TYPE_ATTR) == Some(SENTENCE_TYPE))?;
        let id = self.surface.attr(sentence, "id")?.parse().ok()?;
        Some((id, self.surface.text_content(sentence)))
    }
}

impl SelectionPort for MemoryHost {
    fn capture_offset(&self) -> usize {
        cursor::capture_offset(&self.surface, self.surface.root(), self.focus).unwrap_or_else(
            |err| {
                log::debug!("selection: {err}, using offset 0");
                0
            },
        )
    }

    fn restore_offset(&mut self, offset: usize) {
        let caret = cursor::restore_offset(&self.surface, self.surface.root(), offset);
        self.place_caret(caret.node, caret.offset);
    }

    fn spans_nodes(&self) -> bool {
        matches!((self.anchor, self.focus), (Some(a), Some(f)) if a.node != f.node)
    }
}

impl MutationPort for MemoryHost {
    fn observe(&mut self) {
        self.observing = true;
    }

    fn disconnect(&mut self) {
        self.observing = false;
    }

    fn is_observing(&self) -> bool {
        self.observing
    }

    fn take_records(&mut self) -> Vec<MutationRecord<NodeId>> {
        std::mem::take(&mut self.records)
    }
}
