/*!
 * # redline engine
 *
 * Tracks edits to an editable rich-text surface and highlights what the user
 * inserted, word by word, with undo/redo over rendered snapshots.
 *
 * ## Architecture Overview
 *
 * ### 1. Shadow Document
 * - The canonical text lives in a [`Document`] of paragraphs and sentences
 * - The surface is always a projection of it ([`Document::serialize`])
 * - Each sentence keeps a diff baseline plus the runs currently shown
 *
 * ### 2. Sentence-Scoped Annotation
 * - A mutation is resolved to the sentence enclosing its target
 * - Only that sentence is diffed ([`annotate::diff_sentence`]), using the
 *   word diff from `redline-words`
 * - Insertions become highlighted runs; deletions simply disappear
 *
 * ### 3. Snapshot History
 * - Every committed edit pushes the rendered markup and caret offset onto a
 *   bounded [`HistoryStack`]
 * - Undo/redo re-render a stored snapshot and rebuild the document from it
 *
 * ### 4. Ports
 * - The controller talks to its host only through [`SurfacePort`],
 *   [`SelectionPort`] and [`MutationPort`]
 * - [`MemoryHost`] implements them over an in-memory element tree
 *
 * ## Usage Pattern
 *
 * ```rust
 * use redline_engine::*;
 *
 * let value = InitialValue::new(vec![vec![SentenceValue::new("The cat sat", false)]]);
 * let mut editor = Controller::mount(MemoryHost::new(), &value, EditorOptions::default()).unwrap();
 * let id = editor.document().sentences().next().unwrap().id();
 *
 * // The user types into the sentence
 * editor.host_mut().place_caret_in_sentence(id, 4);
 * editor.host_mut().type_text("big ").unwrap();
 * editor.pump();
 *
 * let runs = editor.document().sentence(id).unwrap().runs();
 * assert_eq!(runs[1], Run::added("big "));
 *
 * editor.on_history_command(HistoryDirection::Undo);
 * assert_eq!(editor.document().text(), "The cat sat");
 * ```
 */

pub mod annotate;
pub mod commands;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod history;
pub mod markup;
pub mod model;
pub mod ports;
pub mod render;
pub mod surface;

#[cfg(test)]
pub mod tests;

pub use commands::{HistoryDirection, KeyCommand};
pub use controller::{Controller, EditorOptions, KeyResponse, Outcome};
pub use cursor::{Caret, CursorError};
pub use error::EditError;
pub use history::{HistoryEntry, HistoryStack};
pub use markup::MarkupError;
pub use model::*;
pub use ports::{Host, MutationKind, MutationPort, MutationRecord, SelectionPort, SurfacePort};
pub use surface::{MemoryHost, NodeId, Surface};
