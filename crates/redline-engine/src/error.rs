use crate::markup::MarkupError;
use crate::model::SentenceId;

/// Reasons an edit cycle is skipped.
///
/// None of these are fatal: the controller logs them, keeps the last good
/// render and reports them through [`Outcome::Skipped`](crate::Outcome::Skipped).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Sentence not found: {0}")]
    NotFound(SentenceId),
    #[error("Mutation target is not inside a sentence")]
    Unmapped,
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),
}
