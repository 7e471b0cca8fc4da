//! Symbol frequency analysis.
//!
//! A `FrequencyTable` counts how often each byte occurs in the input. The
//! end-of-data sentinel is always present with a count of exactly 1; it is
//! implied rather than stored, so no operation can break that invariant.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read};

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;

/// Fixed count of the end-of-data sentinel.
pub const END_OF_DATA_COUNT: u32 = 1;

const SCAN_BUFFER_SIZE: usize = 8 * 1024;

/// Occurrence counts per symbol.
///
/// Byte entries always have a count of at least 1. Iteration is in
/// ascending `Symbol` order, which ends with the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u32>,
}

impl FrequencyTable {
    /// An empty table: only the sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `reader` to exhaustion and count every byte.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; SCAN_BUFFER_SIZE];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                table.record(byte)?;
            }
        }

        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_reader(data)
    }

    /// Count one more occurrence of `byte`.
    pub fn record(&mut self, byte: u8) -> Result<()> {
        let count = self.counts.entry(byte).or_insert(0);
        *count = count
            .checked_add(1)
            .ok_or(HuffmanError::FrequencyOverflow { byte })?;
        Ok(())
    }

    /// Set the count for `byte` outright. A zero count removes the entry.
    pub fn insert(&mut self, byte: u8, count: u32) {
        if count == 0 {
            self.counts.remove(&byte);
        } else {
            self.counts.insert(byte, count);
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<u32> {
        match symbol {
            Symbol::Byte(b) => self.counts.get(&b).copied(),
            Symbol::EndOfData => Some(END_OF_DATA_COUNT),
        }
    }

    /// Number of entries, sentinel included (never zero).
    pub fn len(&self) -> usize {
        self.counts.len() + 1
    }

    /// Number of distinct bytes, i.e. entries excluding the sentinel.
    pub fn distinct_bytes(&self) -> usize {
        self.counts.len()
    }

    /// True when no bytes were counted (the table holds only the sentinel).
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Byte entries in ascending byte order, sentinel excluded.
    pub fn byte_entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&b, &c)| (b, c))
    }

    /// All entries in ascending `Symbol` order, sentinel last.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u32)> + '_ {
        self.byte_entries()
            .map(|(b, c)| (Symbol::Byte(b), c))
            .chain(std::iter::once((Symbol::EndOfData, END_OF_DATA_COUNT)))
    }

    /// Sum of all counts, sentinel included.
    pub fn total_weight(&self) -> u64 {
        self.iter().map(|(_, c)| c as u64).sum()
    }
}
