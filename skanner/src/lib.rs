//!# skanner
//!
//! `skanner` is a Rust library for generating scanners: it compiles a list of regular
//! expressions into a single deterministic finite automaton which, driven over an input string,
//! reports the set of patterns matching the entire string. The compiled automaton can be
//! persisted to a compact binary artifact and loaded back later, so generation and scanning can
//! run as separate programs.
//!
//! ## Usage
//!
//! ```rust
//! use skanner::dfa::serializer;
//! use skanner::generator::generate_scanner;
//!
//! // One expression per token; the index is the token ID
//! let expressions: &[&[u8]] = &[
//!     b"[A-Za-z_]\\w*", // 0: identifiers
//!     b"-?\\d+",        // 1: integers
//!     b"\\s+",          // 2: whitespace
//! ];
//! let dfa = generate_scanner(expressions).unwrap();
//!
//! let matcher = dfa.matcher();
//! assert_eq!(matcher.matching_ids(b"offset_2"), &[0]);
//! assert_eq!(matcher.matching_ids(b"-17"), &[1]);
//! assert!(matcher.matching_ids(b"2x").is_empty());
//!
//! // The automaton round-trips through its binary artifact form
//! let mut artifact = Vec::new();
//! serializer::serialize(&dfa, &mut artifact).unwrap();
//! let restored = serializer::deserialize(&mut artifact.as_slice()).unwrap();
//! assert_eq!(dfa, restored);
//! ```
//!
//! ## Pipeline
//!
//! Compilation runs in three stages, each with its own module:
//!
//! 1. [Parsing](parser::regex): the textual expression becomes a [regex] syntax tree,
//! 2. [Thompson construction](regex::Regex::to_nfa): the tree becomes an [nfa] with ε-moves,
//!    one sub-automaton per tree node,
//! 3. [Subset construction](nfa::Nfa::to_dfa): the NFA becomes a [dfa] over a reduced alphabet
//!    containing only the bytes that patterns name explicitly, with one wildcard-fallback
//!    transition per state covering all other bytes.
//!
//! The [generator] module composes all three for a whole expression list; the
//! [matcher](dfa::DfaMatcher) and [serializer](dfa::serializer) consume the result. Matching is
//! anchored at both ends: a pattern matches an input only if it describes the whole input.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing regular expressions](parser::regex) with classes, ranges, predefined classes,
//!   wildcard, grouping, alternation and the `*`/`+`/`?` repetitions
//! * [Converting regular expressions to NFAs](regex::Regex::to_nfa)
//! * [Converting NFAs to DFAs](nfa::Nfa::to_dfa) via the reduced subset construction
//! * [Compiling whole scanner definitions](generator::generate_scanner)
//! * [Matching whole strings and reporting token IDs](dfa::DfaMatcher)
//! * [Writing and reading the binary artifact format](dfa::serializer)

pub mod dfa;
pub mod generator;
pub mod nfa;
pub mod parser;
pub mod regex;

#[cfg(test)]
mod tests;
