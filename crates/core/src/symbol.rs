//! The alphabet the codec works over: 256 byte values plus an end-of-data
//! sentinel that never occurs in the input.

use std::fmt;

/// One symbol of the encoding alphabet.
///
/// The derived ordering puts every `Byte` before `EndOfData`, and bytes in
/// numeric order. Tree construction relies on this ordering for its
/// deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A raw input byte
    Byte(u8),
    /// Synthetic marker terminating the encoded payload
    EndOfData,
}

impl Symbol {
    /// Number of distinct symbols (256 bytes + sentinel).
    pub const COUNT: usize = 257;

    /// Dense index in `0..Symbol::COUNT`; the sentinel is 256.
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::EndOfData => 256,
        }
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::Byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "{:#04x} ({:?})", b, *b as char),
            Symbol::Byte(b) => write!(f, "{:#04x}", b),
            Symbol::EndOfData => f.write_str("EOD"),
        }
    }
}
