//! # Pattern Automaton
//!
//! Aho–Corasick multi-pattern matcher over opcode bytes.
//!
//! ## Layout
//!
//! Nodes live in one arena and refer to each other by `NodeId`. The root is
//! node 0. Suffix and dictionary links are plain optional indices, so the
//! cross-linked graph has a single owner and needs no reference counting.
//!
//! ## Complexity
//!
//! - Build: O(total pattern length × alphabet scan per node)
//! - Search: O(input length + reported occurrences), no backtracking

use crate::domain::entities::Occurrence;
use crate::domain::value_objects::Symbol;
use crate::errors::ConfigError;
use crate::optimizer::dictionary::PatternDictionary;
use std::collections::VecDeque;

/// Index of a node in the automaton arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// One trie node: the prefix spelled by the path from the root.
#[derive(Clone, Debug)]
struct Node {
    /// Byte on the edge from the parent.
    byte: u8,
    /// Prefix length.
    depth: usize,
    parent: Option<NodeId>,
    /// Children as `(byte, node)`; opcode fan-out is small so a scan beats a map.
    children: Vec<(u8, NodeId)>,
    /// Longest proper suffix that is also a trie prefix. `None` only at the root.
    suffix: Option<NodeId>,
    /// Nearest terminal strictly along the suffix chain.
    dict: Option<NodeId>,
    /// Set when a pattern ends here.
    symbol: Option<Symbol>,
}

impl Node {
    fn new(byte: u8, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            byte,
            depth,
            parent,
            children: Vec::new(),
            suffix: None,
            dict: None,
            symbol: None,
        }
    }

    fn child(&self, byte: u8) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(b, _)| *b == byte)
            .map(|&(_, id)| id)
    }
}

/// Immutable matcher built once from the dictionary; safe to share across
/// threads.
#[derive(Clone, Debug)]
pub struct Automaton {
    nodes: Vec<Node>,
    patterns: usize,
}

impl Automaton {
    /// Build from `(symbol, pattern)` pairs.
    ///
    /// An empty set is legal and yields a matcher that reports nothing.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyPattern`] if any pattern has no bytes.
    pub fn build<'a, I>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Symbol, &'a [u8])>,
    {
        let mut automaton = Self {
            nodes: vec![Node::new(0, 0, None)],
            patterns: 0,
        };
        for (symbol, pattern) in patterns {
            automaton.add_pattern(symbol, pattern)?;
        }
        automaton.add_suffix_links();
        automaton.add_dict_links();
        Ok(automaton)
    }

    /// Build from a validated dictionary.
    ///
    /// # Errors
    ///
    /// See [`Automaton::build`].
    pub fn from_dictionary(dictionary: &PatternDictionary) -> Result<Self, ConfigError> {
        Self::build(dictionary.iter())
    }

    /// Number of patterns inserted.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// Number of trie nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn add_pattern(&mut self, symbol: Symbol, pattern: &[u8]) -> Result<(), ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern { symbol });
        }

        let mut cur = ROOT;
        for &byte in pattern {
            cur = match self.node(cur).child(byte) {
                Some(next) => next,
                None => {
                    let id = NodeId(self.nodes.len());
                    let depth = self.node(cur).depth + 1;
                    self.nodes.push(Node::new(byte, depth, Some(cur)));
                    self.nodes[cur.0].children.push((byte, id));
                    id
                }
            };
        }
        self.nodes[cur.0].symbol = Some(symbol);
        self.patterns += 1;
        Ok(())
    }

    /// Root's children first, so every shallower suffix link is resolved
    /// before it is followed.
    fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<NodeId> = self
            .node(ROOT)
            .children
            .iter()
            .map(|&(_, id)| id)
            .collect();
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.node(id).children.iter().map(|&(_, child)| child));
        }
        order
    }

    fn add_suffix_links(&mut self) {
        for id in self.breadth_first() {
            let byte = self.node(id).byte;
            let mut link = ROOT;
            let mut cur = self.node(id).parent.and_then(|p| self.node(p).suffix);
            while let Some(candidate) = cur {
                if let Some(next) = self.node(candidate).child(byte) {
                    link = next;
                    break;
                }
                cur = self.node(candidate).suffix;
            }
            self.nodes[id.0].suffix = Some(link);
        }
    }

    fn add_dict_links(&mut self) {
        for id in self.breadth_first() {
            let mut cur = self.node(id).suffix;
            while let Some(candidate) = cur {
                if self.node(candidate).symbol.is_some() {
                    break;
                }
                cur = self.node(candidate).suffix;
            }
            self.nodes[id.0].dict = cur;
        }
    }

    /// Report every pattern occurrence in `input`.
    ///
    /// For each end position, occurrences found through the dictionary-link
    /// chain come first, then the current node's own match. Results are not
    /// sorted and may overlap.
    #[must_use]
    pub fn search(&self, input: &[u8]) -> Vec<Occurrence> {
        let mut found = Vec::new();
        let mut cur = ROOT;

        for (i, &byte) in input.iter().enumerate() {
            let mut next = self.node(cur).child(byte);
            while next.is_none() {
                match self.node(cur).suffix {
                    Some(link) => {
                        cur = link;
                        next = self.node(cur).child(byte);
                    }
                    None => break,
                }
            }
            let Some(node) = next else {
                // cur is the root here
                continue;
            };
            cur = node;

            let mut dict = self.node(cur).dict;
            while let Some(id) = dict {
                let hit = self.node(id);
                if let Some(symbol) = hit.symbol {
                    found.push(Occurrence::new(symbol, i + 1 - hit.depth, i + 1));
                }
                dict = hit.dict;
            }
            if let Some(symbol) = self.node(cur).symbol {
                found.push(Occurrence::new(symbol, i + 1 - self.node(cur).depth, i + 1));
            }
        }

        found
    }
}

// =============================================================================
// TESTS
// =============================================================================
