//! The reduced power-set (subset) construction, turning a locked ε-NFA into a [Dfa]. Every DFA
//! state corresponds to a set of NFA nodes; only sets reachable from the ε-closure of the start
//! node are materialized, so the exponential worst case is rarely hit in practice.
//!
//! The DFA alphabet is *reduced*: it contains exactly the bytes named explicitly in some
//! pattern, in ascending order. Wildcard edges contribute no symbols of their own. Instead every
//! DFA state gets one extra wildcard-fallback transition, taken by the matcher for input bytes
//! outside the alphabet; within the alphabet, wildcard edges participate in the ordinary
//! per-symbol moves.

use crate::dfa::{AcceptingState, Dfa, DEAD_STATE};
use crate::nfa::state_set::StateSet;
use crate::nfa::{EdgeLabel, InvariantViolation, Nfa};
use std::collections::{BTreeSet, HashMap};

impl Nfa {
    /// Converts this NFA to a DFA using the reduced subset construction. The NFA must be locked.
    ///
    /// In the resulting DFA, state 0 is the dead state absorbing all unmatched input and state 1
    /// corresponds to the ε-closure of this NFA's start node. A DFA state is accepting iff its
    /// node set contains an accepting node, and it reports the token IDs of all such nodes in
    /// ascending order.
    pub fn to_dfa(&self) -> Result<Dfa, InvariantViolation> {
        if !self.is_locked() {
            return Err(InvariantViolation::NfaNotLocked);
        }
        SubsetConstruction::new(self).run()
    }
}

struct SubsetConstruction<'a> {
    nfa: &'a Nfa,
    alphabet: Vec<u8>,
    ids: HashMap<StateSet, u32>,
    transitions: Vec<Vec<u32>>,
    wildcard_transitions: Vec<u32>,
    accepting: Vec<AcceptingState>,
    worklist: Vec<(StateSet, u32)>,
}

impl<'a> SubsetConstruction<'a> {
    fn new(nfa: &'a Nfa) -> Self {
        let alphabet = derive_alphabet(nfa);
        Self {
            nfa,
            // State 0 is the dead state: every transition loops back to it
            transitions: vec![vec![DEAD_STATE; alphabet.len()]],
            wildcard_transitions: vec![DEAD_STATE],
            accepting: vec![AcceptingState::rejecting()],
            alphabet,
            ids: HashMap::new(),
            worklist: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Dfa, InvariantViolation> {
        let start = self.nfa.epsilon_closure(&[self.nfa.start_id()])?;
        self.intern(start);

        while let Some((set, id)) = self.worklist.pop() {
            for symbol_index in 0..self.alphabet.len() {
                let seed = self.move_on(&set, self.alphabet[symbol_index])?;
                let target = self.nfa.epsilon_closure(&seed)?;
                self.transitions[id as usize][symbol_index] = self.intern(target);
            }
            let seed = self.wildcard_move(&set)?;
            let target = self.nfa.epsilon_closure(&seed)?;
            self.wildcard_transitions[id as usize] = self.intern(target);
        }

        Ok(Dfa::new(
            self.alphabet,
            self.transitions,
            self.wildcard_transitions,
            self.accepting,
        ))
    }

    /// Looks up the DFA state for a node set, allocating a fresh one (and queueing it for
    /// exploration) the first time the set is seen. The empty set is the dead state.
    fn intern(&mut self, set: StateSet) -> u32 {
        if set.is_empty() {
            return DEAD_STATE;
        }
        if let Some(&id) = self.ids.get(&set) {
            return id;
        }
        let id = self.transitions.len() as u32;
        self.transitions.push(vec![DEAD_STATE; self.alphabet.len()]);
        self.wildcard_transitions.push(DEAD_STATE);
        self.accepting.push(self.accepting_record(&set));
        self.ids.insert(set.clone(), id);
        self.worklist.push((set, id));
        id
    }

    /// All nodes reachable from `set` by consuming `symbol`: targets of edges whose symbol set
    /// contains the byte, and of wildcard edges.
    fn move_on(&self, set: &StateSet, symbol: u8) -> Result<Vec<u32>, InvariantViolation> {
        let mut targets = Vec::new();
        for id in set.iter() {
            for edge in self.nfa.node(id)?.edges() {
                match edge.label() {
                    EdgeLabel::Symbols(symbols) if symbols.contains(symbol) => {
                        targets.push(edge.target())
                    }
                    EdgeLabel::Wildcard => targets.push(edge.target()),
                    _ => {}
                }
            }
        }
        Ok(targets)
    }

    /// All nodes reachable from `set` via wildcard edges only. This is the move for every byte
    /// outside the alphabet.
    fn wildcard_move(&self, set: &StateSet) -> Result<Vec<u32>, InvariantViolation> {
        let mut targets = Vec::new();
        for id in set.iter() {
            for edge in self.nfa.node(id)?.edges() {
                if edge.label() == &EdgeLabel::Wildcard {
                    targets.push(edge.target());
                }
            }
        }
        Ok(targets)
    }

    fn accepting_record(&self, set: &StateSet) -> AcceptingState {
        let mut ids: Vec<u32> = self
            .nfa
            .accepting_tags()
            .iter()
            .filter(|(node, _)| set.contains(*node))
            .map(|&(_, token)| token)
            .collect();
        if ids.is_empty() {
            AcceptingState::rejecting()
        } else {
            ids.sort_unstable();
            ids.dedup();
            AcceptingState::new(true, ids)
        }
    }
}

/// The union of all bytes named explicitly on some edge, in ascending order. Wildcard edges do
/// not contribute.
fn derive_alphabet(nfa: &Nfa) -> Vec<u8> {
    let mut symbols = BTreeSet::new();
    for node in nfa.nodes() {
        for edge in node.edges() {
            if let EdgeLabel::Symbols(set) = edge.label() {
                symbols.extend(set.iter());
            }
        }
    }
    symbols.into_iter().collect()
}
