//! Shared fixtures for the unit tests.

use crate::controller::{Controller, EditorOptions};
use crate::model::{InitialValue, SentenceId, SentenceValue};
use crate::surface::MemoryHost;

/// Two paragraphs of text around an empty one
pub fn demo_value() -> InitialValue {
    InitialValue::new(vec![
        vec![
            SentenceValue::new("Hello world.", true),
            SentenceValue::new("How are you", false),
        ],
        vec![],
        vec![
            SentenceValue::new("Where are you going today?", true),
            SentenceValue::new("To the swimming pool.", true),
        ],
    ])
}

pub fn demo_controller() -> Controller<MemoryHost> {
    Controller::mount(MemoryHost::new(), &demo_value(), EditorOptions::default())
        .expect("demo value renders")
}

/// Sentence ids of [`demo_value`] in document order, placeholder included
pub fn sentence_ids(controller: &Controller<MemoryHost>) -> [SentenceId; 5] {
    let ids: Vec<SentenceId> = controller.document().sentences().map(|s| s.id()).collect();
    ids.try_into().expect("demo value has five sentences")
}
