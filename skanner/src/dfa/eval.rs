use crate::dfa::{Dfa, DEAD_STATE, START_STATE};
use std::collections::HashMap;

/// Runs a borrowed [Dfa] over input strings, recognizing whole strings only: an input matches a
/// pattern exactly when the automaton, after consuming every byte, ends in a state accepting
/// that pattern's token ID. Construction precomputes the byte-to-symbol-index table, so one
/// matcher should be reused across many inputs.
#[derive(Debug, Clone)]
pub struct DfaMatcher<'a> {
    dfa: &'a Dfa,
    symbol_indices: HashMap<u8, usize>,
}

impl<'a> DfaMatcher<'a> {
    /// Checks if the automaton accepts the whole input.
    pub fn matches(&self, input: &[u8]) -> bool {
        self.terminal_state(input)
            .map_or(false, |state| self.dfa.is_accepting(state))
    }

    /// The token IDs of every pattern matching the whole input, in ascending order. Empty if no
    /// pattern matches.
    pub fn matching_ids(&self, input: &[u8]) -> &'a [u32] {
        self.terminal_state(input)
            .map_or(&[], |state| self.dfa.accepting_ids(state))
    }

    /// Runs the automaton over the input, returning the state it ends in. Returns `None` as soon
    /// as the dead state is entered; no suffix can revive a dead run.
    fn terminal_state(&self, input: &[u8]) -> Option<u32> {
        if self.dfa.state_count() <= START_STATE as usize {
            return None;
        }
        let mut state = START_STATE;
        for &byte in input {
            state = match self.symbol_indices.get(&byte) {
                Some(&symbol_index) => self.dfa.next_state(state, symbol_index),
                None => self.dfa.wildcard_next_state(state),
            };
            if state == DEAD_STATE {
                return None;
            }
        }
        Some(state)
    }
}

impl<'a> From<&'a Dfa> for DfaMatcher<'a> {
    fn from(dfa: &'a Dfa) -> Self {
        Self {
            dfa,
            symbol_indices: dfa.symbol_indices(),
        }
    }
}
