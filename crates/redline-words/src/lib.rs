//! # redline-words
//!
//! Word-level text comparison for the redline editing engine.
//!
//! ## Architecture Overview
//!
//! ```text
//! Text → Lexer → Token keys → Myers diff → Changes
//!        (Logos)            (similar)
//! ```
//!
//! - [`lexer`] tokenizes a sentence into words, whitespace and punctuation.
//! - [`diff`] compares two token streams and reports equal, inserted and
//!   deleted spans in order.
//!
//! ```
//! use redline_words::{ChangeTag, diff_words};
//!
//! let changes = diff_words("The cat sat", "The big cat sat");
//! let inserted: Vec<_> = changes
//!     .iter()
//!     .filter(|c| c.tag == ChangeTag::Insert)
//!     .map(|c| c.value.as_str())
//!     .collect();
//! assert_eq!(inserted, vec!["big "]);
//! ```

pub mod diff;
pub mod lexer;

pub use diff::{Change, ChangeTag, diff_words};
pub use lexer::{Token, TokenKey, TokenKind, lex};
