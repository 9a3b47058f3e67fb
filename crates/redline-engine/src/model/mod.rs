pub mod document;
pub mod value;

pub use document::{Document, Paragraph, ParagraphId, Run, Sentence, SentenceId};
pub use value::{InitialValue, ParagraphValue, SentenceValue, ValueFile};
