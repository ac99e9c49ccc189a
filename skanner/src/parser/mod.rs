//! # skanner parser
//! This module contains the parser turning the textual form of a regular expression into a
//! [Regex] syntax tree. The full expression syntax is described in the
//! [regex module documentation](crate::regex).
//!
//! Parsing consumes the whole input: any leftover bytes make the parse fail. Expressions are
//! byte strings, so callers working with `&str` patterns pass `pattern.as_bytes()`. On failure,
//! the returned [RegexParseError] reports the byte offset of the first position the parser could
//! not make sense of:
//!
//! ```
//! use skanner::parser;
//!
//! let error = parser::regex(b"ab*)").unwrap_err();
//! assert_eq!(error.offset, 3);
//!
//! // A repetition operator needs something to repeat
//! assert!(parser::regex(b"*a").is_err());
//! // ...and ranges inside character classes must be ordered
//! assert!(parser::regex(b"[z-a]").is_err());
//! ```
//!
//! All expressions this parser accepts are guaranteed to be valid inputs to the rest of the
//! compilation pipeline.

mod regex;

use crate::regex::Regex;
use nom::{combinator::all_consuming, Finish};
use thiserror::Error;

/// The error returned when an expression is not syntactically valid: unbalanced parentheses or
/// brackets, a repetition operator with nothing to repeat, an empty group, a trailing backslash
/// or an inverted class range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("malformed regular expression at byte offset {offset}")]
pub struct RegexParseError {
    /// Byte offset into the expression at which parsing failed.
    pub offset: usize,
}

/// Parses a regular expression according to the format described in the
/// [regex module documentation](crate::regex). The whole input must be parsable, otherwise this
/// function errors with the offset of the offending byte.
pub fn regex(input: &[u8]) -> Result<Regex, RegexParseError> {
    all_consuming(regex::full_regex)(input)
        .finish()
        .map(|(_, regex)| regex)
        .map_err(|error| RegexParseError {
            offset: input.len() - error.input.len(),
        })
}
