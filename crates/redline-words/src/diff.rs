//! Word-granularity diff.
//!
//! Both texts are lexed and each token is reduced to its [`TokenKey`]. The
//! key sequences go through the Myers diff from [`similar`], and the
//! resulting ops are mapped back onto token text. Replacements come out as a
//! deletion followed by an insertion.

use crate::lexer::{Token, TokenKey, lex};
use similar::{Algorithm, DiffTag, capture_diff_slices};

pub use similar::ChangeTag;

/// A contiguous span of text sharing one [`ChangeTag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub tag: ChangeTag,
    pub value: String,
}

impl Change {
    pub fn new(tag: ChangeTag, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Only insertions count as added; equal and deleted spans never do.
    pub fn is_added(&self) -> bool {
        self.tag == ChangeTag::Insert
    }

    pub fn is_removed(&self) -> bool {
        self.tag == ChangeTag::Delete
    }
}

/// Diff `old` against `new` word by word.
///
/// Equal spans carry the text from `new`, so the concatenation of all
/// non-removed values is exactly `new`. Runs of consecutive tokens with the
/// same tag are merged into one [`Change`].
pub fn diff_words(old: &str, new: &str) -> Vec<Change> {
    let old_tokens = lex(old);
    let new_tokens = lex(new);
    let old_keys: Vec<TokenKey<'_>> = old_tokens.iter().map(Token::key).collect();
    let new_keys: Vec<TokenKey<'_>> = new_tokens.iter().map(Token::key).collect();

    let mut changes = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push_span(&mut changes, ChangeTag::Equal, &new_tokens[new_range]),
            DiffTag::Delete => push_span(&mut changes, ChangeTag::Delete, &old_tokens[old_range]),
            DiffTag::Insert => push_span(&mut changes, ChangeTag::Insert, &new_tokens[new_range]),
            DiffTag::Replace => {
                push_span(&mut changes, ChangeTag::Delete, &old_tokens[old_range]);
                push_span(&mut changes, ChangeTag::Insert, &new_tokens[new_range]);
            }
        }
    }

    changes
}

fn push_span(changes: &mut Vec<Change>, tag: ChangeTag, tokens: &[Token<'_>]) {
    for token in tokens {
        push_change(changes, tag, token.text);
    }
}

fn push_change(changes: &mut Vec<Change>, tag: ChangeTag, text: &str) {
    match changes.last_mut() {
        Some(last) if last.tag == tag => last.value.push_str(text),
        _ => changes.push(Change::new(tag, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kept_text(changes: &[Change]) -> String {
        changes
            .iter()
            .filter(|c| !c.is_removed())
            .map(|c| c.value.as_str())
            .collect()
    }

    #[test]
    fn identical_text_is_one_equal_span() {
        assert_eq!(
            diff_words("Hello world.", "Hello world."),
            vec![Change::new(ChangeTag::Equal, "Hello world.")]
        );
    }

    #[test]
    fn both_empty_is_no_changes() {
        assert_eq!(diff_words("", ""), vec![]);
    }

    #[test]
    fn inserted_word_is_isolated() {
        assert_eq!(
            diff_words("The cat sat", "The big cat sat"),
            vec![
                Change::new(ChangeTag::Equal, "The "),
                Change::new(ChangeTag::Insert, "big "),
                Change::new(ChangeTag::Equal, "cat sat"),
            ]
        );
    }

    #[test]
    fn trailing_deletion() {
        assert_eq!(
            diff_words("Hello world", "Hello"),
            vec![
                Change::new(ChangeTag::Equal, "Hello"),
                Change::new(ChangeTag::Delete, " world"),
            ]
        );
    }

    #[test]
    fn replaced_word_deletes_before_inserting() {
        assert_eq!(
            diff_words("a cat", "a dog"),
            vec![
                Change::new(ChangeTag::Equal, "a "),
                Change::new(ChangeTag::Delete, "cat"),
                Change::new(ChangeTag::Insert, "dog"),
            ]
        );
    }

    #[test]
    fn punctuation_change_keeps_the_word() {
        assert_eq!(
            diff_words("How are you", "How are you?"),
            vec![
                Change::new(ChangeTag::Equal, "How are you"),
                Change::new(ChangeTag::Insert, "?"),
            ]
        );
    }

    #[test]
    fn whitespace_content_is_not_an_edit() {
        let changes = diff_words("a b", "a\u{a0}b");
        assert_eq!(changes, vec![Change::new(ChangeTag::Equal, "a\u{a0}b")]);
    }

    #[rstest]
    #[case("", "Hello")]
    #[case("Hello", "")]
    #[case("The cat sat", "The big cat sat")]
    #[case("Where are you going today?", "Where are we going tomorrow?")]
    #[case("To the swimming pool.", "To the  pool and back.")]
    #[case("one two three", "three two one")]
    fn kept_spans_rebuild_new_text(#[case] old: &str, #[case] new: &str) {
        assert_eq!(kept_text(&diff_words(old, new)), new);
    }

    #[rstest]
    #[case("", "")]
    #[case("Hello world", "Hello world")]
    #[case("one two three", "three two one")]
    #[case("a cat", "a dog")]
    fn adjacent_changes_never_share_a_tag(#[case] old: &str, #[case] new: &str) {
        let changes = diff_words(old, new);
        for pair in changes.windows(2) {
            assert_ne!(pair[0].tag, pair[1].tag);
        }
    }

    #[test]
    fn long_sentences_diff_without_a_quadratic_table() {
        let old: String = (0..20_000).map(|i| format!("w{i} ")).collect();
        let new = old.replacen("w10000 ", "w10000 inserted ", 1);

        let changes = diff_words(&old, &new);

        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1], Change::new(ChangeTag::Insert, "inserted "));
        assert_eq!(kept_text(&changes), new);
    }

    #[test]
    fn only_insertions_are_added() {
        assert!(Change::new(ChangeTag::Insert, "x").is_added());
        assert!(!Change::new(ChangeTag::Equal, "x").is_added());
        assert!(!Change::new(ChangeTag::Delete, "x").is_added());
    }
}
