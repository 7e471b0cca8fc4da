//! Code table derivation.
//!
//! Walks the encoding tree depth-first and records, for every leaf, the
//! path from the root: `false` for the zero branch, `true` for the one
//! branch, in root-to-leaf order. Because every symbol sits on a leaf the
//! resulting codes are prefix-free.

use std::fmt;

use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::{EncodingTree, Node};

/// A root-to-leaf bit path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Only the sentinel of a single-leaf tree has an empty code.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, indexed densely by `Symbol::index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &EncodingTree) -> Self {
        let mut codes = vec![None; Symbol::COUNT];
        let mut path = Vec::new();
        assign(tree.root(), &mut path, &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in ascending `Symbol` order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().enumerate().filter_map(|(i, code)| {
            let symbol = match u8::try_from(i) {
                Ok(b) => Symbol::Byte(b),
                Err(_) => Symbol::EndOfData,
            };
            code.as_ref().map(|c| (symbol, c))
        })
    }

    /// Payload length in bits for data with these frequencies, including
    /// the terminating sentinel code.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .map(|(symbol, count)| {
                let len = self.get(symbol).map_or(0, Code::len);
                count as u64 * len as u64
            })
            .sum()
    }
}

fn assign(node: &Node, path: &mut Vec<bool>, codes: &mut [Option<Code>]) {
    match node {
        Node::Leaf { symbol, .. } => {
            codes[symbol.index()] = Some(Code::from(path.clone()));
        }
        Node::Internal { zero, one, .. } => {
            path.push(false);
            assign(zero, path, codes);
            path.pop();

            path.push(true);
            assign(one, path, codes);
            path.pop();
        }
    }
}
