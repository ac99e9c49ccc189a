//! The Thompson construction: structural recursion over a regex syntax tree, producing one
//! sub-automaton per node. Every sub-automaton has exactly one start and one accepting node,
//! which keeps the composition rules for concatenation, union and repetition purely a matter of
//! adding ε-edges between fragment endpoints.

use crate::nfa::{Nfa, NfaEdge, NfaNode, NfaNodeFactory};
use crate::regex::{Leaf, Regex, RegexNode};

/// The endpoints of a constructed sub-automaton.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    pub start: u32,
    pub accept: u32,
}

/// Builds NFA fragments from syntax trees. One builder accumulates the nodes of a whole
/// automaton; the generator runs every pattern of a scanner through the same builder (and the
/// same factory) so that node IDs stay unique across all patterns.
pub(crate) struct ThompsonBuilder<'a> {
    factory: &'a mut NfaNodeFactory,
    nodes: Vec<NfaNode>,
}

impl<'a> ThompsonBuilder<'a> {
    pub fn new(factory: &'a mut NfaNodeFactory) -> Self {
        Self {
            factory,
            nodes: Vec::new(),
        }
    }

    /// Builds the sub-automaton for `node` and returns its endpoints.
    pub fn fragment(&mut self, node: &RegexNode) -> Fragment {
        match node {
            RegexNode::Leaf(leaf) => self.leaf(leaf),
            RegexNode::Concat(left, right) => {
                let left = self.fragment(left);
                let right = self.fragment(right);
                self.connect(left.accept, NfaEdge::epsilon(right.start));
                Fragment {
                    start: left.start,
                    accept: right.accept,
                }
            }
            RegexNode::Union(left, right) => {
                let left = self.fragment(left);
                let right = self.fragment(right);
                let start = self.fresh_node();
                let accept = self.fresh_node();
                self.connect(start, NfaEdge::epsilon(left.start));
                self.connect(start, NfaEdge::epsilon(right.start));
                self.connect(left.accept, NfaEdge::epsilon(accept));
                self.connect(right.accept, NfaEdge::epsilon(accept));
                Fragment { start, accept }
            }
            RegexNode::Kleene(inner) => {
                let inner = self.fragment(inner);
                let start = self.fresh_node();
                let accept = self.fresh_node();
                self.connect(start, NfaEdge::epsilon(inner.start));
                self.connect(start, NfaEdge::epsilon(accept));
                self.connect(inner.accept, NfaEdge::epsilon(inner.start));
                self.connect(inner.accept, NfaEdge::epsilon(accept));
                Fragment { start, accept }
            }
            RegexNode::Optional(inner) => {
                let inner = self.fragment(inner);
                let start = self.fresh_node();
                let accept = self.fresh_node();
                self.connect(start, NfaEdge::epsilon(inner.start));
                self.connect(start, NfaEdge::epsilon(accept));
                self.connect(inner.accept, NfaEdge::epsilon(accept));
                Fragment { start, accept }
            }
        }
    }

    fn leaf(&mut self, leaf: &Leaf) -> Fragment {
        let start = self.fresh_node();
        let accept = self.fresh_node();
        let edge = if leaf.is_wildcard() {
            NfaEdge::wildcard(accept)
        } else {
            NfaEdge::symbols(accept, leaf.symbols().clone())
        };
        self.connect(start, edge);
        Fragment { start, accept }
    }

    /// Creates a fresh node and adds it to the automaton under construction.
    pub fn fresh_node(&mut self) -> u32 {
        let node = self.factory.create_node();
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Adds an edge to a node created by this builder. Nodes are stored in creation order, and
    /// the factory hands out ascending IDs, so the node can be found by binary search.
    pub fn connect(&mut self, from: u32, edge: NfaEdge) {
        let index = self
            .nodes
            .binary_search_by_key(&from, NfaNode::id)
            .expect("edges only connect nodes created by this builder");
        self.nodes[index].add_edge(edge);
    }

    pub fn into_nodes(self) -> Vec<NfaNode> {
        self.nodes
    }
}

impl Regex {
    /// Converts this regular expression to an NFA using the Thompson construction. The returned
    /// automaton is locked, has exactly one accepting node tagged with token ID 0, and is ready
    /// for [conversion to a DFA](Nfa::to_dfa).
    pub fn to_nfa(&self) -> Nfa {
        let mut factory = NfaNodeFactory::new();
        let mut builder = ThompsonBuilder::new(&mut factory);
        let fragment = builder.fragment(&self.tree);
        let mut nfa = Nfa::new(fragment.start, fragment.accept, builder.into_nodes());
        nfa.lock();
        nfa
    }
}
