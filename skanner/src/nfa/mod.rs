//! # Nondeterministic Finite Automaton with ε-moves
//! The NFA module holds the intermediate automaton of the compilation pipeline. An [Nfa] is a
//! flat collection of [NfaNode]s indexed by dense 32-bit IDs which are handed out by a single
//! [NfaNodeFactory]; edges refer to their destination by ID, never by reference, so the cyclic
//! graphs produced by the Thompson construction need no special ownership treatment.
//!
//! An NFA is built up in two phases. While *unlocked*, nodes may be added and mutated freely.
//! Calling [Nfa::lock] freezes the automaton: an ID-to-node lookup is built, [Nfa::node] becomes
//! available, and any further mutation fails with [InvariantViolation]. Only locked NFAs can be
//! converted to DFAs.
//!
//! ```
//! use skanner::nfa::{InvariantViolation, Nfa, NfaEdge, NfaNodeFactory};
//!
//! let mut factory = NfaNodeFactory::new();
//! let mut start = factory.create_node();
//! let accepting = factory.create_node();
//! start.add_edge(NfaEdge::epsilon(accepting.id()));
//!
//! let (start_id, accepting_id) = (start.id(), accepting.id());
//! let mut nfa = Nfa::new(start_id, accepting_id, vec![start, accepting]);
//!
//! // Node lookup requires the lookup table built by lock()
//! assert_eq!(nfa.node(start_id), Err(InvariantViolation::NfaNotLocked));
//! nfa.lock();
//! assert_eq!(nfa.node(start_id).unwrap().id(), start_id);
//!
//! // ...and once locked, the automaton can no longer change
//! assert_eq!(nfa.node_mut(start_id).unwrap_err(), InvariantViolation::NfaLocked);
//! ```
//!
//! Accepting nodes are tagged with the token ID of the pattern they complete. An NFA produced
//! from a single expression by [Regex::to_nfa](crate::regex::Regex::to_nfa) has exactly one
//! accepting node, tagged with token ID 0; the
//! [generator](crate::generator::generate_scanner) combines several such automata and tags each
//! accepting node with the index of its pattern.

use crate::regex::SymbolSet;
use std::collections::HashMap;
use thiserror::Error;

pub mod state_set;
mod subset;
mod thompson;

pub(crate) use thompson::ThompsonBuilder;

use state_set::StateSet;

/// The error raised on misuse of a lockable container: mutating it after [Nfa::lock], or looking
/// nodes up before the lookup table exists. These indicate programmer errors rather than bad
/// input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("the NFA is locked and cannot be modified")]
    NfaLocked,
    #[error("node lookup requires the NFA to be locked")]
    NfaNotLocked,
    #[error("no node with id {0} in this NFA")]
    UnknownNode(u32),
    #[error("the state set is locked and cannot be modified")]
    StateSetLocked,
}

/// Hands out nodes with unique, monotonically increasing IDs. All nodes of one automaton must
/// come from the same factory so that IDs are unique across the whole node collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NfaNodeFactory {
    next_id: u32,
}

impl NfaNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh node with no edges and the next free ID.
    pub fn create_node(&mut self) -> NfaNode {
        let id = self.next_id;
        self.next_id += 1;
        NfaNode {
            id,
            edges: Vec::new(),
        }
    }
}

/// A state in the NFA: its factory-assigned ID and its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaNode {
    id: u32,
    edges: Vec<NfaEdge>,
}

impl NfaNode {
    /// Gets the ID of this node.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Gets the outgoing edges of this node.
    pub fn edges(&self) -> &[NfaEdge] {
        &self.edges
    }

    /// Adds an outgoing edge to this node.
    pub fn add_edge(&mut self, edge: NfaEdge) {
        self.edges.push(edge);
    }
}

/// A directed edge to the node with ID `target`, labeled with the input it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaEdge {
    target: u32,
    label: EdgeLabel,
}

/// The label of an edge: ε (no input consumed), a finite set of bytes, or the wildcard standing
/// for every byte. The wildcard is a distinct label rather than a 256-element symbol set so that
/// it stays out of the derived DFA alphabet; it is resolved during the subset construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLabel {
    Epsilon,
    Symbols(SymbolSet),
    Wildcard,
}

impl NfaEdge {
    /// An ε-edge to `target`.
    pub fn epsilon(target: u32) -> Self {
        Self {
            target,
            label: EdgeLabel::Epsilon,
        }
    }

    /// An edge to `target` consuming any byte in `symbols`.
    pub fn symbols(target: u32, symbols: SymbolSet) -> Self {
        Self {
            target,
            label: EdgeLabel::Symbols(symbols),
        }
    }

    /// A wildcard edge to `target`, consuming any single byte.
    pub fn wildcard(target: u32) -> Self {
        Self {
            target,
            label: EdgeLabel::Wildcard,
        }
    }

    /// Gets the ID of the destination node.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Gets the label of this edge.
    pub fn label(&self) -> &EdgeLabel {
        &self.label
    }

    /// Checks if this edge consumes no input.
    pub fn is_epsilon(&self) -> bool {
        self.label == EdgeLabel::Epsilon
    }
}

/// A nondeterministic finite automaton: a start node, a set of accepting nodes tagged with token
/// IDs, and the node collection. See the [module-level documentation](crate::nfa) for the
/// lock protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    start: u32,
    accepting: Vec<(u32, u32)>,
    nodes: Vec<NfaNode>,
    lookup: Option<HashMap<u32, usize>>,
}

impl Nfa {
    /// Creates an unlocked NFA with a single accepting node, tagged with token ID 0.
    pub fn new(start_id: u32, accepting_id: u32, nodes: Vec<NfaNode>) -> Self {
        Self::with_tagged_accepting(start_id, vec![(accepting_id, 0)], nodes)
    }

    /// Creates an unlocked NFA whose accepting nodes each carry the token ID of the pattern they
    /// complete.
    pub(crate) fn with_tagged_accepting(
        start: u32,
        accepting: Vec<(u32, u32)>,
        nodes: Vec<NfaNode>,
    ) -> Self {
        Self {
            start,
            accepting,
            nodes,
            lookup: None,
        }
    }

    /// Gets the ID of the start node.
    pub fn start_id(&self) -> u32 {
        self.start
    }

    /// Gets the accepting nodes as `(node ID, token ID)` pairs.
    pub fn accepting_tags(&self) -> &[(u32, u32)] {
        &self.accepting
    }

    /// Gets all nodes of this NFA.
    pub fn nodes(&self) -> &[NfaNode] {
        &self.nodes
    }

    /// Checks if this NFA has been locked.
    pub fn is_locked(&self) -> bool {
        self.lookup.is_some()
    }

    /// Adds a node to an unlocked NFA.
    pub fn add_node(&mut self, node: NfaNode) -> Result<(), InvariantViolation> {
        if self.is_locked() {
            return Err(InvariantViolation::NfaLocked);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Gets mutable access to a node of an unlocked NFA.
    pub fn node_mut(&mut self, id: u32) -> Result<&mut NfaNode, InvariantViolation> {
        if self.is_locked() {
            return Err(InvariantViolation::NfaLocked);
        }
        self.nodes
            .iter_mut()
            .find(|node| node.id() == id)
            .ok_or(InvariantViolation::UnknownNode(id))
    }

    /// Locks this NFA: builds the ID-to-node lookup and rejects any further mutation. Locking an
    /// already locked NFA does nothing.
    pub fn lock(&mut self) {
        if self.is_locked() {
            return;
        }
        let lookup: HashMap<u32, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect();
        debug_assert!(lookup.contains_key(&self.start), "start node not in NFA");
        debug_assert!(
            self.accepting.iter().all(|(id, _)| lookup.contains_key(id)),
            "accepting node not in NFA"
        );
        debug_assert!(
            self.nodes
                .iter()
                .flat_map(NfaNode::edges)
                .all(|edge| lookup.contains_key(&edge.target())),
            "edge to a node outside this NFA"
        );
        self.lookup = Some(lookup);
    }

    /// Looks a node up by ID. The lookup table only exists on locked NFAs.
    pub fn node(&self, id: u32) -> Result<&NfaNode, InvariantViolation> {
        let lookup = self
            .lookup
            .as_ref()
            .ok_or(InvariantViolation::NfaNotLocked)?;
        let &index = lookup.get(&id).ok_or(InvariantViolation::UnknownNode(id))?;
        Ok(&self.nodes[index])
    }

    /// Computes the ε-closure of `seed`: the least set of node IDs containing `seed` that is
    /// closed under following ε-edges. The returned set is locked. Requires a locked NFA.
    pub fn epsilon_closure(&self, seed: &[u32]) -> Result<StateSet, InvariantViolation> {
        let mut closure = StateSet::new();
        let mut frontier = Vec::with_capacity(seed.len());
        for &id in seed {
            if closure.insert(id)? {
                frontier.push(id);
            }
        }
        while let Some(id) = frontier.pop() {
            for edge in self.node(id)?.edges() {
                if edge.is_epsilon() && closure.insert(edge.target())? {
                    frontier.push(edge.target());
                }
            }
        }
        closure.lock();
        Ok(closure)
    }
}
