//! huffcrypt-core: Huffman compression with a password-obfuscated header
//!
//! This library builds an optimal prefix code for a byte stream and writes
//! the compressed artifact as:
//! - An encrypted header: the frequency table, XORed bit by bit with a
//!   keystream derived from a password
//! - A payload: the Huffman codes of the input, terminated by the code of
//!   a synthetic end-of-data symbol
//!
//! The decompressor decrypts the table, rebuilds the identical tree and
//! walks it bit by bit until the end-of-data symbol.
//!
//! # Architecture
//!
//! - `bitio`: MSB-first bit reading/writing over byte streams
//! - `symbol`: byte alphabet plus the end-of-data sentinel
//! - `frequency`: frequency table construction
//! - `tree`: deterministic Huffman tree construction
//! - `codebook`: symbol-to-path code table
//! - `password`: password-seeded keystream
//! - `header`: encrypted header codec
//! - `codec`: payload encoder/decoder
//! - `archive`: `compress` / `decompress` orchestration
//! - `metrics`: per-run statistics
//!
//! # Example
//! ```
//! let packed = huffcrypt_core::compress_bytes(b"abracadabra", "pw").unwrap();
//! let unpacked = huffcrypt_core::decompress_bytes(&packed, "pw").unwrap();
//! assert_eq!(unpacked, b"abracadabra");
//! ```
//!
//! The header obfuscation is not encryption in any cryptographic sense.

pub mod archive;
pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod header;
pub mod metrics;
pub mod password;
pub mod symbol;
pub mod tree;

// Re-export commonly used types
pub use archive::{compress, compress_bytes, decompress, decompress_bytes};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use metrics::Metrics;
pub use symbol::Symbol;
pub use tree::EncodingTree;
