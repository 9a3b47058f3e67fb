//! # Diff/Annotation Engine
//!
//! Re-annotates one sentence after the user edited it: the sentence's
//! baseline is diffed word by word against the text observed on the surface,
//! and the result replaces the sentence's runs.
//!
//! Only insertions are highlighted. Deleted words are dropped from the runs
//! entirely, so a deletion shows up as the text simply being gone.

use redline_words::{Change, diff_words};

use crate::error::EditError;
use crate::model::{Document, Run, SentenceId};

/// Diff a sentence against its observed text and store the new runs.
///
/// Touches exactly one sentence. The sentence's baseline becomes
/// `observed_text`, so the next diff starts from here.
pub fn diff_sentence<'d>(
    document: &'d mut Document,
    sentence_id: SentenceId,
    observed_text: &str,
) -> Result<&'d [Run], EditError> {
    let changes = {
        let sentence = document.sentence(sentence_id)?;
        diff_words(sentence.original_text(), observed_text)
    };

    let runs = runs_from_changes(&changes);
    log::debug!(
        "sentence {sentence_id}: {} changes -> {} runs",
        changes.len(),
        runs.len()
    );

    Ok(document.replace_sentence_runs(sentence_id, runs)?.runs())
}

/// Keep the non-removed spans in diff order.
///
/// Neighbouring spans that end up with the same highlight state (an equal
/// span on either side of a dropped deletion) are joined into one run.
pub fn runs_from_changes(changes: &[Change]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for change in changes.iter().filter(|c| !c.is_removed()) {
        let added = change.is_added();
        match runs.last_mut() {
            Some(last) if last.added == added => last.text.push_str(&change.value),
            _ => runs.push(Run {
                text: change.value.clone(),
                added,
            }),
        }
    }

    runs
}
