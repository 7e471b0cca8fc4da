//! Error types for the huffcrypt codec.
//!
//! All operations return structured errors rather than panicking, so the
//! caller (usually the command-line front end) decides how to report them.

use thiserror::Error;

use crate::symbol::Symbol;

/// Top-level error type for all operations in the codec.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to the underlying byte stream
/// - Huffman: tree construction or encode/decode failures
/// - Header: the encrypted frequency header could not be read back
/// - I/O: errors from the caller-supplied reader or writer
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., truncated payload)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Encrypted header error (truncated or implausible contents)
    #[error("malformed header: {0}")]
    Header(#[from] HeaderError),

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// The underlying byte source ran out
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// A symbol was handed to the encoder that the code table does not know.
    ///
    /// The tree is always built from the same source it encodes, so this is
    /// a caller contract violation.
    #[error("symbol {symbol} has no code in the code table")]
    SymbolNotInTable { symbol: Symbol },

    /// Bit source exhausted before the end-of-data code was reached
    #[error("payload truncated after {decoded} decoded bytes")]
    TruncatedPayload { decoded: u64 },

    /// A byte occurs more often than the 32-bit header field can record
    #[error("frequency of byte {byte:#04x} exceeds u32::MAX")]
    FrequencyOverflow { byte: u8 },
}

/// Encrypted header errors.
///
/// None of these prove a wrong password, but a wrong password is by far the
/// most common way to end up here.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Bit source exhausted while reading a header field
    #[error("header truncated while reading {field}")]
    Truncated { field: &'static str },

    /// Decrypted entry count cannot describe a byte alphabet
    #[error("entry count {count} exceeds the 256 possible byte values")]
    EntryCountOutOfRange { count: u32 },

    /// The same byte appears twice in the decrypted table
    #[error("symbol {symbol:#04x} appears more than once")]
    DuplicateSymbol { symbol: u8 },

    /// A decrypted entry carries a zero occurrence count
    #[error("symbol {symbol:#04x} has a zero frequency")]
    ZeroFrequency { symbol: u8 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True if this error means the bit source ran dry.
    pub(crate) fn is_unexpected_eof(&self) -> bool {
        matches!(self, Error::BitIo(BitIoError::UnexpectedEof))
    }
}
