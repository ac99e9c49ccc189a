//! # Regular expressions
//! Skanner compiles a byte-oriented regular expression dialect tailored for scanner generation.
//! An expression describes a set of byte strings; the compiled scanner reports which expressions
//! match a given input in its entirety.
//!
//! ## Syntax
//! Expressions are sequences of 8-bit characters. The reserved characters are `(`, `)`, `|`, `*`,
//! `+`, `?`, `[`, `]`, `.` and `\`; to match one of them literally it must be escaped with a
//! backslash (`\`). All other bytes match themselves. Concatenation is implicit, `|` is
//! alternation, `*`/`+` are Kleene star/plus, `?` makes the preceding atom optional, and
//! parentheses group. `.` matches any single byte. Character classes are written `[...]` with
//! single characters, inclusive ranges like `a-z`, and escapes; a leading `^` complements the
//! class over all 256 byte values.
//!
//! The predefined classes are `\d` (decimal digits), `\w` (digits, ASCII letters and `_`) and
//! `\s` (ASCII whitespace), with `\D`, `\W` and `\S` as their complements.
//!
//! Some examples:
//! * `(ab)+` matches `ab`, `abab`, `ababab`, ...
//! * `[A-Za-z_]\w*` matches identifiers such as `x`, `foo_bar` and `B2`
//! * `-?\d+` matches integers with an optional sign
//!
//! ## Operations
//! The only operation available on a parsed expression is converting it to an NFA with
//! [Regex::to_nfa] (the Thompson construction). From there, the NFA can be converted to a
//! [Dfa](crate::dfa::Dfa) which can be matched against, serialized, or both:
//! ```
//! use skanner::parser;
//!
//! let regex = parser::regex(b"(ab)+").unwrap();
//! let dfa = regex.to_nfa().to_dfa().unwrap();
//! let matcher = dfa.matcher();
//!
//! assert!(matcher.matches(b"ab"));
//! assert!(matcher.matches(b"abab"));
//! assert!(!matcher.matches(b""));
//! assert!(!matcher.matches(b"aba"));
//! ```
//!
//! Matching is anchored at both ends: an expression matches a string only if it describes the
//! whole string, not merely a prefix or an infix of it.

use std::collections::BTreeSet;
use std::iter;

/// A parsed regular expression, holding the root of its syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub tree: RegexNode,
}

/// A node in the syntax tree of a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    /// A single position matching one byte out of a set (or any byte, for the wildcard).
    Leaf(Leaf),
    /// Left followed by right.
    Concat(Box<RegexNode>, Box<RegexNode>),
    /// Left or right.
    Union(Box<RegexNode>, Box<RegexNode>),
    /// Zero or more repetitions.
    Kleene(Box<RegexNode>),
    /// Zero or one occurrence.
    Optional(Box<RegexNode>),
}

/// The matching position at the bottom of the tree: either a set of accepted bytes or the
/// wildcard `.`, which stands for every byte. The wildcard is kept symbolic rather than being
/// expanded to all 256 values, since the alphabet of the compiled scanner only contains bytes
/// that appear explicitly in some pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    symbols: SymbolSet,
    wildcard: bool,
}

impl Leaf {
    /// A leaf accepting exactly the bytes in `symbols`.
    pub fn new(symbols: SymbolSet) -> Self {
        Self {
            symbols,
            wildcard: false,
        }
    }

    /// The wildcard leaf, accepting any byte.
    pub fn wildcard() -> Self {
        Self {
            symbols: SymbolSet::default(),
            wildcard: true,
        }
    }

    /// The bytes this leaf accepts. Empty for the wildcard leaf.
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Checks if this is the wildcard leaf.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// An unordered set of byte values, stored sorted and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SymbolSet {
    bytes: Vec<u8>,
}

impl SymbolSet {
    /// The set containing only `byte`.
    pub fn singleton(byte: u8) -> Self {
        Self { bytes: vec![byte] }
    }

    /// The inclusive range `low..=high`. `low` must not exceed `high`.
    pub fn range(low: u8, high: u8) -> Self {
        debug_assert!(low <= high, "inverted range {low}-{high}");
        (low..=high).collect()
    }

    /// The decimal digits `0..9` (the `\d` class).
    pub fn digits() -> Self {
        Self::range(b'0', b'9')
    }

    /// Digits, ASCII letters and underscore (the `\w` class).
    pub fn word() -> Self {
        (b'0'..=b'9')
            .chain(b'A'..=b'Z')
            .chain(b'a'..=b'z')
            .chain(iter::once(b'_'))
            .collect()
    }

    /// Space, tab, line feed, carriage return, form feed and vertical tab (the `\s` class).
    pub fn whitespace() -> Self {
        [b' ', b'\t', b'\n', b'\r', 0x0C, 0x0B].into_iter().collect()
    }

    /// The complement of this set over the full 256-value byte space.
    pub fn complement(&self) -> Self {
        (0..=u8::MAX).filter(|&byte| !self.contains(byte)).collect()
    }

    /// Checks if `byte` is a member of this set.
    pub fn contains(&self, byte: u8) -> bool {
        self.bytes.binary_search(&byte).is_ok()
    }

    /// The number of bytes in this set.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Checks if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().copied()
    }

    /// The members in ascending order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl FromIterator<u8> for SymbolSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let bytes = iter.into_iter().collect::<BTreeSet<_>>();
        Self {
            bytes: bytes.into_iter().collect(),
        }
    }
}
