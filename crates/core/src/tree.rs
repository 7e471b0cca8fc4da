//! Huffman tree construction.
//!
//! The tree is rebuilt independently by the compressor and the
//! decompressor from the same frequency table, so construction must be a
//! pure function of the table's contents.
//!
//! # Tie-breaking
//!
//! Nodes are merged lowest `(weight, rank)` first. Leaves are ranked in
//! ascending `Symbol` order (the sentinel last); each merged node gets the
//! next rank after every node created before it. Of the two nodes extracted
//! per step, the first becomes the `zero` branch.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::codebook::CodeTable;
use crate::frequency::{FrequencyTable, END_OF_DATA_COUNT};
use crate::symbol::Symbol;

/// A node of the encoding tree. Internal nodes own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    /// Sum of the leaf counts beneath this node.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The child on the `one` branch for `true`, `zero` for `false`.
    /// Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { zero, one, .. } => Some(if bit { &**one } else { &**zero }),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { zero, one, .. } => zero.leaf_count() + one.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { zero, one, .. } => 1 + zero.depth().max(one.depth()),
        }
    }
}

/// A node waiting in the merge queue.
#[derive(Debug)]
struct Pending {
    weight: u64,
    rank: usize,
    node: Node,
}

// Reverse ordering so BinaryHeap pops the lowest (weight, rank) first
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.weight, other.rank).cmp(&(self.weight, self.rank))
    }
}

/// A full binary prefix-code tree.
///
/// Dropping the tree releases every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingTree {
    root: Node,
}

impl EncodingTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// A table holding only the sentinel yields a single-leaf tree.
    pub fn build(table: &FrequencyTable) -> Self {
        let mut heap: BinaryHeap<Pending> = table
            .iter()
            .enumerate()
            .map(|(rank, (symbol, count))| Pending {
                weight: count as u64,
                rank,
                node: Node::Leaf {
                    symbol,
                    weight: count as u64,
                },
            })
            .collect();
        let mut next_rank = heap.len();

        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(zero), Some(one)) => {
                    let weight = zero.weight + one.weight;
                    heap.push(Pending {
                        weight,
                        rank: next_rank,
                        node: Node::Internal {
                            weight,
                            zero: Box::new(zero.node),
                            one: Box::new(one.node),
                        },
                    });
                    next_rank += 1;
                }
                (Some(last), None) => break last.node,
                // iter() always yields the sentinel, so this is the empty table
                (None, _) => {
                    break Node::Leaf {
                        symbol: Symbol::EndOfData,
                        weight: END_OF_DATA_COUNT as u64,
                    }
                }
            }
        };

        let tree = Self { root };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.weight(),
            "built encoding tree"
        );
        tree
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight, equal to the sum of all leaf counts.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// True for the degenerate tree built from a sentinel-only table.
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    /// Derive the symbol-to-path mapping for this tree.
    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_weights_conserved(node: &Node) {
        if let Node::Internal { weight, zero, one } = node {
            assert_eq!(*weight, zero.weight() + one.weight());
            assert_weights_conserved(zero);
            assert_weights_conserved(one);
        }
    }

    #[test]
    fn test_empty_input_single_leaf() {
        let table = FrequencyTable::new();
        let tree = EncodingTree::build(&table);

        assert!(tree.is_single_leaf());
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(
            tree.root(),
            &Node::Leaf {
                symbol: Symbol::EndOfData,
                weight: 1
            }
        );
    }

    #[test]
    fn test_single_repeated_byte() {
        let table = FrequencyTable::from_bytes(&[b'a'; 100]).unwrap();
        let tree = EncodingTree::build(&table);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.weight(), 101);

        // The sentinel is lighter, so it is extracted first and sits on zero
        let root = tree.root();
        assert_eq!(
            root.child(false),
            Some(&Node::Leaf {
                symbol: Symbol::EndOfData,
                weight: 1
            })
        );
        assert_eq!(
            root.child(true),
            Some(&Node::Leaf {
                symbol: Symbol::Byte(b'a'),
                weight: 100
            })
        );
    }

    #[test]
    fn test_weight_conservation() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let table = FrequencyTable::from_bytes(text).unwrap();
        let tree = EncodingTree::build(&table);

        assert_weights_conserved(tree.root());
        assert_eq!(tree.weight(), table.total_weight());
        assert_eq!(tree.leaf_count(), table.len());
    }

    #[test]
    fn test_deterministic_regardless_of_insertion_order() {
        let mut forward = FrequencyTable::new();
        let mut backward = FrequencyTable::new();
        for b in 0..=255u8 {
            forward.insert(b, 3);
        }
        for b in (0..=255u8).rev() {
            backward.insert(b, 3);
        }

        let a = EncodingTree::build(&forward);
        let b = EncodingTree::build(&backward);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equal_weights_rank_by_symbol() {
        let mut table = FrequencyTable::new();
        table.insert(b'x', 1);
        table.insert(b'y', 5);
        let tree = EncodingTree::build(&table);

        // 'x' and EOD tie at weight 1; 'x' ranks first and takes zero
        let Some(Node::Internal { zero, one, .. }) = tree.root().child(false) else {
            panic!("expected the light pair under the zero branch");
        };
        assert_eq!(
            **zero,
            Node::Leaf {
                symbol: Symbol::Byte(b'x'),
                weight: 1
            }
        );
        assert_eq!(
            **one,
            Node::Leaf {
                symbol: Symbol::EndOfData,
                weight: 1
            }
        );
    }

    #[test]
    fn test_skewed_frequencies_depth() {
        // Fibonacci-like counts force a maximally unbalanced tree
        let mut table = FrequencyTable::new();
        let mut prev = 1u32;
        let mut cur = 1u32;
        for b in 0..20u8 {
            table.insert(b, cur);
            let next = prev + cur;
            prev = cur;
            cur = next;
        }
        let tree = EncodingTree::build(&table);
        assert_eq!(tree.leaf_count(), 21);
        assert!(tree.depth() >= 19);
        assert_weights_conserved(tree.root());
    }
}
