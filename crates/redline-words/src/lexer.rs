//! # Lexer - Splitting Sentences Into Words
//!
//! This module breaks sentence text into tokens using the [Logos] lexer
//! generator. The tokens are the units the word diff compares.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating the token texts gives back the input:
//!
//! ```
//! use redline_words::lexer::lex;
//!
//! let input = "Where are you going today?";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! There are only three kinds:
//! - runs of word characters (letters, digits, `_`, in any script) → [`TokenKind::Word`]
//! - runs of whitespace → [`TokenKind::Whitespace`]
//! - any other single character → [`TokenKind::Punct`]
//!
//! Punctuation is one token per character so that `"world."` and `"world!"`
//! share the word and differ only in the trailing mark.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// Letters, digits and underscores
    #[regex(r"\w+")]
    Word,

    /// Spaces, tabs, newlines, non-breaking spaces
    #[regex(r"\s+")]
    Whitespace,

    /// A single character that is neither a word character nor whitespace
    #[regex(r"[^\w\s]")]
    Punct,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// What a token is compared by when diffing.
///
/// Every whitespace run maps to the same key, so replacing a space with a
/// non-breaking space is not an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKey<'a> {
    Whitespace,
    Text(TokenKind, &'a str),
}

impl<'a> Token<'a> {
    pub fn key(&self) -> TokenKey<'a> {
        match self.kind {
            TokenKind::Whitespace => TokenKey::Whitespace,
            kind => TokenKey::Text(kind, self.text),
        }
    }

    /// Whether two tokens count as the same word for diffing
    pub fn same_as(&self, other: &Token<'_>) -> bool {
        self.key() == other.key()
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Logos error means unrecognized input - treat as punctuation
        let kind = result.unwrap_or(TokenKind::Punct);
        tokens.push(Token { kind, text });
    }

    tokens
}
