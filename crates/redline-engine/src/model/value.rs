use serde::{Deserialize, Serialize};

/// One sentence of the initial value handed to the editor at mount time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceValue {
    pub text: String,
    #[serde(default)]
    pub special: bool,
}

impl SentenceValue {
    pub fn new(text: impl Into<String>, special: bool) -> Self {
        Self {
            text: text.into(),
            special,
        }
    }
}

/// Paragraphs of sentences, in display order.
///
/// Serializes as a bare nested array, matching the shape callers usually
/// hold the value in: `[[{"text": "Hi.", "special": true}], []]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitialValue(pub Vec<Vec<SentenceValue>>);

impl InitialValue {
    pub fn new(paragraphs: Vec<Vec<SentenceValue>>) -> Self {
        Self(paragraphs)
    }

    pub fn paragraphs(&self) -> &[Vec<SentenceValue>] {
        &self.0
    }
}

impl From<Vec<Vec<SentenceValue>>> for InitialValue {
    fn from(paragraphs: Vec<Vec<SentenceValue>>) -> Self {
        Self(paragraphs)
    }
}

/// Table-friendly form of [`InitialValue`] for formats without top-level
/// arrays (TOML):
///
/// ```toml
/// [[paragraphs]]
/// sentences = [{ text = "Hello world.", special = true }]
///
/// [[paragraphs]]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFile {
    #[serde(default)]
    pub paragraphs: Vec<ParagraphValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphValue {
    #[serde(default)]
    pub sentences: Vec<SentenceValue>,
}

impl From<ValueFile> for InitialValue {
    fn from(file: ValueFile) -> Self {
        Self(file.paragraphs.into_iter().map(|p| p.sentences).collect())
    }
}
