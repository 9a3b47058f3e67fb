//! # Observation Controller
//!
//! Owns the shadow document, the history stack and the host, and runs one
//! edit cycle per burst of mutation notifications:
//!
//! ```text
//! notification ─► suppressed? ──yes──► clear flag, ignore
//!                     │no
//!                     ▼
//!       disconnect ─► diff sentence ─► render ─► checkpoint ─► observe
//! ```
//!
//! Replaying history writes to the surface while observing, which produces a
//! notification about the controller's own write. The `suppressed` flag is
//! raised before every replay so that one notification is swallowed.

use crate::annotate::diff_sentence;
use crate::commands::{HistoryDirection, KeyCommand};
use crate::error::EditError;
use crate::history::{DEFAULT_CAPACITY, HistoryStack};
use crate::model::{Document, InitialValue, SentenceId};
use crate::ports::{Host, MutationRecord};
use crate::render::{render_document, render_entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Maximum number of history entries kept
    pub history_capacity: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// What handling one notification or command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The sentence was re-annotated, rendered and checkpointed
    Committed {
        sentence: SentenceId,
        position: usize,
    },
    /// Swallowed by the suppression flag
    Suppressed,
    /// Dropped without rendering or checkpointing
    Skipped(EditError),
    /// A history entry is back on the surface
    Replayed { position: usize },
    /// Nothing further to undo or redo
    Boundary,
}

/// How the host should treat the key or paste event it reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    /// Cancel the surface's default handling of the event
    pub prevent_default: bool,
    pub outcome: Option<Outcome>,
}

impl KeyResponse {
    fn pass() -> Self {
        Self {
            prevent_default: false,
            outcome: None,
        }
    }

    fn prevent(outcome: Option<Outcome>) -> Self {
        Self {
            prevent_default: true,
            outcome,
        }
    }
}

pub struct Controller<H: Host> {
    document: Document,
    history: HistoryStack,
    host: H,
    suppressed: bool,
}

impl<H: Host> Controller<H> {
    /// Build the document, render it, record it as history entry 0 and start
    /// observing the host.
    pub fn mount(mut host: H, value: &InitialValue, options: EditorOptions) -> Result<Self, EditError> {
        let document = Document::build(value);
        let mut history = HistoryStack::with_capacity(options.history_capacity);

        host.disconnect();
        let rendered = render_document(&mut host, &document)?;
        history.checkpoint(rendered.markup, rendered.cursor);
        host.observe();

        log::info!(
            "mounted: {} paragraphs, history capacity {}",
            document.paragraphs().len(),
            history.capacity()
        );

        Ok(Self {
            document,
            history,
            host,
            suppressed: false,
        })
    }

    /// Stop observing and hand the host back
    pub fn unmount(mut self) -> H {
        self.host.disconnect();
        log::info!("unmounted after {} history entries", self.history.len());
        self.host
    }

    /// Handle one mutation record from the host
    pub fn on_mutation(&mut self, record: MutationRecord<H::Node>) -> Outcome {
        self.on_mutations(vec![record])
            .pop()
            .unwrap_or(Outcome::Skipped(EditError::Unmapped))
    }

    /// Handle an edit reported directly as a sentence and its new text
    pub fn on_external_mutation(&mut self, sentence: SentenceId, observed_text: &str) -> Outcome {
        if self.take_suppressed() {
            log::debug!("edit of {sentence}: suppressed");
            return Outcome::Suppressed;
        }
        self.commit(vec![(sentence, observed_text.to_string())])
            .pop()
            .unwrap_or(Outcome::Skipped(EditError::NotFound(sentence)))
    }

    /// Drain the host's queued records and handle them as one burst
    pub fn pump(&mut self) -> Vec<Outcome> {
        let records = self.host.take_records();
        if records.is_empty() {
            return Vec::new();
        }
        self.on_mutations(records)
    }

    /// Handle a burst of records, oldest first.
    ///
    /// Every record is resolved to its sentence and live text before anything
    /// is rendered, since a render replaces every node the later records
    /// point at. Records for a sentence already seen in the burst fold into
    /// its edit. The edited sentences are diffed, then rendered and
    /// checkpointed together, so the outcome list has one entry per edited
    /// sentence plus one per suppressed or unmapped record.
    pub fn on_mutations(&mut self, records: Vec<MutationRecord<H::Node>>) -> Vec<Outcome> {
        let mut slots = Vec::new();
        let mut edits: Vec<(SentenceId, String)> = Vec::new();

        for record in records {
            if self.take_suppressed() {
                log::debug!("mutation {:?} on {:?}: suppressed", record.kind, record.target);
                slots.push(Slot::Done(Outcome::Suppressed));
                continue;
            }
            match self.host.sentence_at(record.target) {
                Some((sentence, text)) => match edits.iter().position(|(id, _)| *id == sentence) {
                    Some(index) => edits[index].1 = text,
                    None => {
                        slots.push(Slot::Edit);
                        edits.push((sentence, text));
                    }
                },
                None => {
                    log::warn!("mutation {:?} on {:?}: not inside a sentence", record.kind, record.target);
                    slots.push(Slot::Done(Outcome::Skipped(EditError::Unmapped)));
                }
            }
        }

        let mut committed = self.commit(edits).into_iter();
        slots
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Done(outcome) => Some(outcome),
                Slot::Edit => committed.next(),
            })
            .collect()
    }

    pub fn on_history_command(&mut self, direction: HistoryDirection) -> Outcome {
        self.suppressed = true;

        let entry = match direction {
            HistoryDirection::Undo => self.history.undo(),
            HistoryDirection::Redo => self.history.redo(),
        }
        .cloned();

        let Some(entry) = entry else {
            log::debug!("{direction:?}: at history boundary");
            return Outcome::Boundary;
        };

        match Document::from_markup(entry.surface()) {
            Ok(document) => self.document = document,
            Err(err) => log::warn!("{direction:?}: keeping shadow document, {err}"),
        }
        if let Err(err) = render_entry(&mut self.host, &entry) {
            log::warn!("{direction:?}: could not render entry, {err}");
        }

        let position = self.history.position().unwrap_or_default();
        log::debug!("{direction:?}: now at entry {position}");
        Outcome::Replayed { position }
    }

    pub fn on_key(&mut self, command: KeyCommand) -> KeyResponse {
        match command {
            KeyCommand::Undo => {
                KeyResponse::prevent(Some(self.on_history_command(HistoryDirection::Undo)))
            }
            KeyCommand::Redo => {
                KeyResponse::prevent(Some(self.on_history_command(HistoryDirection::Redo)))
            }
            KeyCommand::LineBreak => KeyResponse::prevent(None),
            KeyCommand::Edit if self.host.spans_nodes() => {
                log::debug!("edit across nodes blocked");
                KeyResponse::prevent(None)
            }
            KeyCommand::Edit => KeyResponse::pass(),
        }
    }

    /// Pasting is not supported; the text is dropped
    pub fn on_paste(&mut self, text: &str) -> KeyResponse {
        log::warn!("paste of {} chars discarded", text.chars().count());
        KeyResponse::prevent(None)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    fn take_suppressed(&mut self) -> bool {
        std::mem::replace(&mut self.suppressed, false)
    }

    /// Diff each edited sentence, then render and checkpoint once. Returns
    /// one outcome per edit, in order.
    fn commit(&mut self, edits: Vec<(SentenceId, String)>) -> Vec<Outcome> {
        if edits.is_empty() {
            return Vec::new();
        }

        self.host.disconnect();
        let outcomes = self.apply_edits(edits);
        self.host.observe();

        for outcome in &outcomes {
            if let Outcome::Skipped(err) = outcome {
                log::warn!("edit dropped: {err}");
            }
        }
        outcomes
    }

    fn apply_edits(&mut self, edits: Vec<(SentenceId, String)>) -> Vec<Outcome> {
        let diffed: Vec<Result<SentenceId, EditError>> = edits
            .into_iter()
            .map(|(sentence, text)| {
                diff_sentence(&mut self.document, sentence, &text).map(|_| sentence)
            })
            .collect();

        if diffed.iter().all(Result::is_err) {
            return diffed
                .into_iter()
                .filter_map(Result::err)
                .map(Outcome::Skipped)
                .collect();
        }

        let checkpoint = render_document(&mut self.host, &self.document)
            .map(|rendered| self.history.checkpoint(rendered.markup, rendered.cursor));
        if let Ok(position) = &checkpoint {
            log::debug!("{} edits: checkpoint {position}", diffed.len());
        }

        diffed
            .into_iter()
            .map(|diffed| match (diffed, &checkpoint) {
                (Err(err), _) => Outcome::Skipped(err),
                (Ok(sentence), Ok(position)) => Outcome::Committed {
                    sentence,
                    position: *position,
                },
                (Ok(_), Err(err)) => Outcome::Skipped(err.clone().into()),
            })
            .collect()
    }
}

/// Where one record's outcome comes from
enum Slot {
    Done(Outcome),
    Edit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Run;
    use crate::ports::{MutationKind, MutationPort, SelectionPort, SurfacePort};
    use crate::surface::MemoryHost;
    use crate::tests::{demo_controller, sentence_ids};
    use pretty_assertions::assert_eq;

    #[test]
    fn mount_checkpoints_initial_render() {
        let controller = demo_controller();

        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history().position(), Some(0));
        assert_eq!(
            controller.history().current().map(|e| e.surface().to_string()),
            Some(controller.document().serialize())
        );
        assert!(controller.host().is_observing());
        assert!(!controller.is_suppressed());
    }

    #[test]
    fn mount_respects_history_capacity() {
        let controller = Controller::mount(
            MemoryHost::new(),
            &crate::tests::demo_value(),
            EditorOptions { history_capacity: 2 },
        )
        .unwrap();
        assert_eq!(controller.history().capacity(), 2);
    }

    #[test]
    fn typing_commits_highlighted_insertion() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);

        let host = controller.host_mut();
        host.place_caret_in_sentence(first, 6);
        host.type_text("big ").unwrap();
        let outcomes = controller.pump();

        assert_eq!(
            outcomes,
            vec![Outcome::Committed {
                sentence: first,
                position: 1
            }]
        );
        assert_eq!(
            controller.document().sentence(first).unwrap().runs(),
            &[Run::plain("Hello "), Run::added("big "), Run::plain("world.")]
        );
        assert_eq!(controller.host().markup(), controller.document().serialize());
        assert_eq!(controller.host().capture_offset(), 10);
    }

    #[test]
    fn own_render_does_not_notify() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);

        controller.on_external_mutation(first, "Hello big world.");

        assert!(controller.host().is_observing());
        assert!(controller.pump().is_empty());
    }

    #[test]
    fn unknown_sentence_is_skipped() {
        let mut controller = demo_controller();
        let before = controller.host().markup();
        let missing = SentenceId::new();

        let outcome = controller.on_external_mutation(missing, "text");

        assert_eq!(outcome, Outcome::Skipped(EditError::NotFound(missing)));
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.host().markup(), before);
        assert!(controller.host().is_observing());
    }

    #[test]
    fn burst_across_sentences_keeps_every_edit() {
        let mut controller = demo_controller();
        let [first, second, ..] = sentence_ids(&controller);

        let host = controller.host_mut();
        host.place_caret_in_sentence(first, 5);
        host.type_text("X").unwrap();
        host.place_caret_in_sentence(second, 3);
        host.type_text("Y").unwrap();
        let outcomes = controller.pump();

        assert_eq!(
            outcomes,
            vec![
                Outcome::Committed {
                    sentence: first,
                    position: 1
                },
                Outcome::Committed {
                    sentence: second,
                    position: 1
                },
            ]
        );
        let document = controller.document();
        assert_eq!(document.sentence(first).unwrap().original_text(), "HelloX world.");
        assert_eq!(document.sentence(second).unwrap().original_text(), "HowY are you");
        assert_eq!(controller.host().markup(), document.serialize());
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn burst_with_unknown_sentence_commits_the_rest() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);
        let root = controller.host().surface().root();

        let host = controller.host_mut();
        host.place_caret_in_sentence(first, 12);
        host.type_text("!").unwrap();
        let mut records = host.take_records();
        records.insert(
            0,
            MutationRecord {
                target: root,
                kind: MutationKind::ChildList,
            },
        );

        assert_eq!(
            controller.on_mutations(records),
            vec![
                Outcome::Skipped(EditError::Unmapped),
                Outcome::Committed {
                    sentence: first,
                    position: 1
                },
            ]
        );
    }

    #[test]
    fn record_outside_sentences_is_skipped() {
        let mut controller = demo_controller();
        let root = controller.host().surface().root();

        let outcome = controller.on_mutation(MutationRecord {
            target: root,
            kind: MutationKind::ChildList,
        });

        assert_eq!(outcome, Outcome::Skipped(EditError::Unmapped));
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn undo_restores_previous_entry_and_resyncs_document() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);
        let initial = controller.document().clone();

        controller.on_external_mutation(first, "Hello big world.");
        let outcome = controller.on_history_command(HistoryDirection::Undo);

        assert_eq!(outcome, Outcome::Replayed { position: 0 });
        assert_eq!(controller.document(), &initial);
        assert_eq!(controller.host().markup(), initial.serialize());
        assert!(controller.is_suppressed());
    }

    #[test]
    fn redo_reapplies_entry_with_its_cursor() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);

        controller.host_mut().restore_offset(6);
        controller.on_external_mutation(first, "Hello big world.");
        let committed = controller.document().clone();
        controller.on_history_command(HistoryDirection::Undo);
        controller.pump();

        let outcome = controller.on_history_command(HistoryDirection::Redo);

        assert_eq!(outcome, Outcome::Replayed { position: 1 });
        assert_eq!(controller.document(), &committed);
        assert_eq!(controller.host().capture_offset(), 6);
    }

    #[test]
    fn replay_notification_is_suppressed_once() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);
        controller.on_external_mutation(first, "Hello big world.");
        controller.on_history_command(HistoryDirection::Undo);

        assert_eq!(controller.pump(), vec![Outcome::Suppressed]);
        assert!(!controller.is_suppressed());

        let host = controller.host_mut();
        host.place_caret_in_sentence(first, 12);
        host.type_text(" Hi").unwrap();
        assert_eq!(
            controller.pump(),
            vec![Outcome::Committed {
                sentence: first,
                position: 1
            }]
        );
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn boundary_undo_keeps_suppression() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);

        assert_eq!(
            controller.on_history_command(HistoryDirection::Undo),
            Outcome::Boundary
        );
        assert!(controller.is_suppressed());
        assert!(controller.pump().is_empty());

        assert_eq!(
            controller.on_external_mutation(first, "Hello there."),
            Outcome::Suppressed
        );
        assert!(matches!(
            controller.on_external_mutation(first, "Hello there."),
            Outcome::Committed { .. }
        ));
    }

    #[test]
    fn redo_at_tip_is_boundary() {
        let mut controller = demo_controller();
        assert_eq!(
            controller.on_history_command(HistoryDirection::Redo),
            Outcome::Boundary
        );
        assert_eq!(controller.history().position(), Some(0));
    }

    #[test]
    fn edit_after_undo_discards_redo() {
        let mut controller = demo_controller();
        let [first, second, ..] = sentence_ids(&controller);

        controller.on_external_mutation(first, "Hello big world.");
        controller.on_history_command(HistoryDirection::Undo);
        controller.pump();
        controller.on_external_mutation(second, "How old are you");

        assert_eq!(controller.history().len(), 2);
        assert_eq!(
            controller.on_history_command(HistoryDirection::Redo),
            Outcome::Boundary
        );
        assert!(!controller.document().text().contains("big"));
    }

    #[test]
    fn key_commands() {
        let mut controller = demo_controller();
        let [first, ..] = sentence_ids(&controller);
        controller.on_external_mutation(first, "Hello big world.");

        let undo = controller.on_key(KeyCommand::Undo);
        assert!(undo.prevent_default);
        assert_eq!(undo.outcome, Some(Outcome::Replayed { position: 0 }));

        assert_eq!(
            controller.on_key(KeyCommand::LineBreak),
            KeyResponse {
                prevent_default: true,
                outcome: None
            }
        );
        assert!(controller.host().markup().find("<br/>").is_some());
    }

    #[test]
    fn edit_key_blocked_only_across_nodes() {
        let mut controller = demo_controller();
        let [first, second, ..] = sentence_ids(&controller);

        controller.host_mut().place_caret_in_sentence(first, 2);
        assert!(!controller.on_key(KeyCommand::Edit).prevent_default);

        let host = controller.host_mut();
        let anchor = host.focus().unwrap();
        host.place_caret_in_sentence(second, 2);
        let focus = host.focus().unwrap();
        host.select(anchor, focus);
        assert!(controller.on_key(KeyCommand::Edit).prevent_default);
    }

    #[test]
    fn paste_is_discarded() {
        let mut controller = demo_controller();
        let before = controller.host().markup();

        let response = controller.on_paste("pasted text");

        assert!(response.prevent_default);
        assert_eq!(response.outcome, None);
        assert_eq!(controller.host().markup(), before);
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn unmount_stops_observing() {
        let controller = demo_controller();
        let host = controller.unmount();
        assert!(!host.is_observing());
    }
}
