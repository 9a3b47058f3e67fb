//! # Shadow Document Model
//!
//! The canonical in-memory text structure, independent of whatever the live
//! surface currently shows. The surface is a projection of this model
//! ([`Document::serialize`]); user edits flow back in only through
//! [`Document::replace_sentence_runs`].
//!
//! ```text
//! Document
//! ├── Paragraph { id }
//! │   ├── Sentence { id, original_text, special, runs: [Run, Run, ...] }
//! │   └── Sentence { ... }
//! └── Paragraph { id }
//!     └── Sentence (placeholder, no text)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EditError;
use crate::markup::{self, MarkupError};
use crate::model::{InitialValue, SentenceValue};

/// Stable identifier of a sentence, rendered as its element `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceId(pub Uuid);

impl SentenceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SentenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SentenceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Stable identifier of a paragraph, rendered as its element `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParagraphId(pub Uuid);

impl ParagraphId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParagraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParagraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ParagraphId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A contiguous span of a sentence's rendered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    /// Inserted since the previous baseline; rendered highlighted
    pub added: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            added: false,
        }
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            added: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    id: SentenceId,
    /// Diff baseline: the text as of the last committed diff
    original_text: String,
    special: bool,
    runs: Vec<Run>,
}

impl Sentence {
    pub(crate) fn from_parts(
        id: SentenceId,
        original_text: String,
        special: bool,
        runs: Vec<Run>,
    ) -> Self {
        Self {
            id,
            original_text,
            special,
            runs,
        }
    }

    fn from_value(value: &SentenceValue) -> Self {
        let runs = if value.text.is_empty() {
            Vec::new()
        } else {
            vec![Run::plain(value.text.clone())]
        };
        Self::from_parts(SentenceId::new(), value.text.clone(), value.special, runs)
    }

    /// Stand-in sentence for an empty paragraph
    fn placeholder() -> Self {
        Self::from_parts(SentenceId::new(), String::new(), false, Vec::new())
    }

    pub fn id(&self) -> SentenceId {
        self.id
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// True when nothing would be visible (placeholder or fully deleted)
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    id: ParagraphId,
    sentences: Vec<Sentence>,
}

impl Paragraph {
    pub(crate) fn from_parts(id: ParagraphId, sentences: Vec<Sentence>) -> Self {
        Self { id, sentences }
    }

    pub fn id(&self) -> ParagraphId {
        self.id
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Build the document from the initial value.
    ///
    /// Every paragraph and sentence gets a fresh id. A paragraph without
    /// sentences gets exactly one placeholder sentence.
    pub fn build(value: &InitialValue) -> Self {
        let paragraphs = value
            .paragraphs()
            .iter()
            .map(|sentences| {
                let sentences = if sentences.is_empty() {
                    vec![Sentence::placeholder()]
                } else {
                    sentences.iter().map(Sentence::from_value).collect()
                };
                Paragraph::from_parts(ParagraphId::new(), sentences)
            })
            .collect();

        Self { paragraphs }
    }

    pub(crate) fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Rebuild a document from markup produced by [`Document::serialize`]
    pub fn from_markup(input: &str) -> Result<Self, MarkupError> {
        markup::read_document(input)
    }

    /// Surface markup for this document, run highlighting included
    pub fn serialize(&self) -> String {
        markup::write_document(self)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// All sentences in document order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.paragraphs.iter().flat_map(|p| p.sentences.iter())
    }

    pub fn sentence(&self, id: SentenceId) -> Result<&Sentence, EditError> {
        self.sentences()
            .find(|s| s.id == id)
            .ok_or(EditError::NotFound(id))
    }

    /// The paragraph owning a sentence
    pub fn paragraph_of(&self, id: SentenceId) -> Result<&Paragraph, EditError> {
        self.paragraphs
            .iter()
            .find(|p| p.sentences.iter().any(|s| s.id == id))
            .ok_or(EditError::NotFound(id))
    }

    /// Overwrite a sentence's runs and move its baseline to their text
    pub fn replace_sentence_runs(
        &mut self,
        id: SentenceId,
        runs: Vec<Run>,
    ) -> Result<&Sentence, EditError> {
        let sentence = self
            .paragraphs
            .iter_mut()
            .flat_map(|p| p.sentences.iter_mut())
            .find(|s| s.id == id)
            .ok_or(EditError::NotFound(id))?;

        sentence.original_text = runs.iter().map(|run| run.text.as_str()).collect();
        sentence.runs = runs;
        Ok(sentence)
    }

    /// Plain text, sentences concatenated and paragraphs joined by newlines
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| {
                p.sentences
                    .iter()
                    .flat_map(|s| s.runs.iter())
                    .map(|run| run.text.as_str())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
