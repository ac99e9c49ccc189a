//! # Scanner generator
//! The generator is the façade over the whole compilation pipeline. Given a list of regular
//! expressions, it parses each one, builds a combined NFA via the Thompson construction, and
//! runs the subset construction, producing one [Dfa] that recognizes all patterns at once.
//!
//! Each expression is assigned a *token ID* equal to its zero-based index in the list. The
//! combined NFA gets a fresh start node with ε-edges to every pattern's sub-automaton, and every
//! sub-automaton keeps its own accepting node, tagged with its pattern's token ID. A state of
//! the resulting DFA therefore knows *every* pattern it completes, and the matcher reports the
//! full ID set for inputs matched by several patterns:
//!
//! ```
//! use skanner::generator::generate_scanner;
//!
//! let dfa = generate_scanner(&[&b"a+"[..], &b"a?"[..], &b"b"[..]]).unwrap();
//! let matcher = dfa.matcher();
//!
//! assert_eq!(matcher.matching_ids(b"a"), &[0, 1]);
//! assert_eq!(matcher.matching_ids(b""), &[1]);
//! assert_eq!(matcher.matching_ids(b"aaa"), &[0]);
//! assert_eq!(matcher.matching_ids(b"b"), &[2]);
//! ```
//!
//! Generation fails fast: the first malformed expression aborts with its pattern index, and an
//! empty expression list is rejected outright.

use crate::dfa::Dfa;
use crate::nfa::{InvariantViolation, Nfa, NfaEdge, NfaNodeFactory, ThompsonBuilder};
use crate::parser::{self, RegexParseError};
use thiserror::Error;

/// The error raised when a scanner cannot be generated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("no regular expressions to compile")]
    EmptyPatternList,
    #[error("pattern {index}: {source}")]
    Pattern {
        index: usize,
        source: RegexParseError,
    },
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Compiles a list of regular expressions into a single DFA. The expression at index *i* defines
/// token ID *i*; see the [module-level documentation](crate::generator) for the construction.
pub fn generate_scanner<S: AsRef<[u8]>>(expressions: &[S]) -> Result<Dfa, GeneratorError> {
    if expressions.is_empty() {
        return Err(GeneratorError::EmptyPatternList);
    }

    let mut factory = NfaNodeFactory::new();
    let mut builder = ThompsonBuilder::new(&mut factory);
    let mut starts = Vec::with_capacity(expressions.len());
    let mut accepting = Vec::with_capacity(expressions.len());

    for (index, expression) in expressions.iter().enumerate() {
        let regex = parser::regex(expression.as_ref())
            .map_err(|source| GeneratorError::Pattern { index, source })?;
        let fragment = builder.fragment(&regex.tree);
        starts.push(fragment.start);
        accepting.push((fragment.accept, index as u32));
    }

    let start = builder.fresh_node();
    for sub_start in starts {
        builder.connect(start, NfaEdge::epsilon(sub_start));
    }

    let mut nfa = Nfa::with_tagged_accepting(start, accepting, builder.into_nodes());
    nfa.lock();
    Ok(nfa.to_dfa()?)
}
