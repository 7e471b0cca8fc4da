//! Payload encoding and decoding.
//!
//! The encoder writes each byte's code root-to-leaf, then the sentinel's
//! code. The decoder walks the tree one bit at a time until it lands on
//! the sentinel leaf. Payload bits are not obfuscated.
//!
//! A single-leaf tree (empty input) has an empty sentinel code: the
//! encoder writes nothing and the decoder reads nothing.

use std::io::{ErrorKind, Read, Write};

use tracing::debug;

use crate::bitio::{BitSink, BitSource};
use crate::codebook::{Code, CodeTable};
use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::tree::{EncodingTree, Node};

const IO_BUFFER_SIZE: usize = 8 * 1024;

/// Encode every byte of `reader` into `sink`, followed by the sentinel code.
///
/// Returns the number of input bytes encoded.
///
/// # Errors
/// `HuffmanError::SymbolNotInTable` if `reader` yields a byte the table
/// was not built for.
pub fn encode<R, S>(mut reader: R, codes: &CodeTable, sink: &mut S) -> Result<u64>
where
    R: Read,
    S: BitSink + ?Sized,
{
    let mut buf = [0u8; IO_BUFFER_SIZE];
    let mut encoded = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            write_code(sink, lookup(codes, Symbol::Byte(byte))?)?;
        }
        encoded += n as u64;
    }

    write_code(sink, lookup(codes, Symbol::EndOfData)?)?;
    debug!(bytes = encoded, "encoded payload");
    Ok(encoded)
}

fn lookup(codes: &CodeTable, symbol: Symbol) -> Result<&Code> {
    codes
        .get(symbol)
        .ok_or_else(|| HuffmanError::SymbolNotInTable { symbol }.into())
}

fn write_code<S: BitSink + ?Sized>(sink: &mut S, code: &Code) -> Result<()> {
    for &bit in code.bits() {
        sink.write_bit(bit)?;
    }
    Ok(())
}

/// Decode bits from `source` using `tree` until the sentinel, writing the
/// recovered bytes to `writer`.
///
/// Returns the number of bytes written.
///
/// # Errors
/// `HuffmanError::TruncatedPayload` if `source` runs out before the
/// sentinel is reached. Bytes decoded up to that point have already been
/// written.
pub fn decode<S, W>(source: &mut S, tree: &EncodingTree, mut writer: W) -> Result<u64>
where
    S: BitSource + ?Sized,
    W: Write,
{
    // Only a sentinel-only table builds a leaf root
    let root = tree.root();
    if root.is_leaf() {
        writer.flush()?;
        return Ok(0);
    }

    let mut out = Vec::with_capacity(IO_BUFFER_SIZE);
    let mut decoded = 0u64;

    loop {
        // Root is internal, so every symbol costs at least one bit
        let mut node = root;
        let symbol = loop {
            match node {
                Node::Leaf { symbol, .. } => break *symbol,
                Node::Internal { zero, one, .. } => {
                    let bit = match source.read_bit() {
                        Ok(bit) => bit,
                        Err(e) if e.is_unexpected_eof() => {
                            writer.write_all(&out)?;
                            return Err(HuffmanError::TruncatedPayload { decoded }.into());
                        }
                        Err(e) => return Err(e),
                    };
                    node = if bit { &**one } else { &**zero };
                }
            }
        };

        match symbol {
            Symbol::EndOfData => break,
            Symbol::Byte(b) => {
                out.push(b);
                decoded += 1;
                if out.len() == IO_BUFFER_SIZE {
                    writer.write_all(&out)?;
                    out.clear();
                }
            }
        }
    }

    writer.write_all(&out)?;
    writer.flush()?;
    debug!(bytes = decoded, "decoded payload");
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{BitReader, BitWriter};
    use crate::error::Error;
    use crate::frequency::FrequencyTable;

    fn encode_to_vec(data: &[u8]) -> (EncodingTree, Vec<u8>, u64) {
        let table = FrequencyTable::from_bytes(data).unwrap();
        let tree = EncodingTree::build(&table);
        let mut writer = BitWriter::new(Vec::new());
        encode(data, &tree.code_table(), &mut writer).unwrap();
        let bits = writer.bit_len();
        (tree, writer.finish().unwrap(), bits)
    }

    #[test]
    fn test_round_trip() {
        let data = b"hello world! this is a test.";
        let (tree, bytes, _) = encode_to_vec(data);

        let mut out = Vec::new();
        let n = decode(&mut BitReader::new(bytes.as_slice()), &tree, &mut out).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn test_empty_input_writes_no_bits() {
        let (tree, bytes, bits) = encode_to_vec(b"");
        assert_eq!(bits, 0);
        assert!(bytes.is_empty());

        let mut out = Vec::new();
        let empty: &[u8] = &[];
        assert_eq!(decode(&mut BitReader::new(empty), &tree, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_leaf_tree_reads_nothing() {
        let tree = EncodingTree::build(&FrequencyTable::new());
        assert!(tree.is_single_leaf());

        let noise = [0xA5u8; 4];
        let mut reader = BitReader::new(&noise[..]);
        let mut out = Vec::new();
        assert_eq!(decode(&mut reader, &tree, &mut out).unwrap(), 0);
        assert_eq!(reader.bits_read(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_repeated_byte_one_bit_each() {
        let data = [b'a'; 100];
        let (tree, bytes, bits) = encode_to_vec(&data);
        // 100 one-bit codes plus a one-bit sentinel
        assert_eq!(bits, 101);
        assert_eq!(bytes.len(), 13);

        let mut out = Vec::new();
        decode(&mut BitReader::new(bytes.as_slice()), &tree, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_bits_match_code_table_estimate() {
        let data = b"mississippi river banks";
        let table = FrequencyTable::from_bytes(data).unwrap();
        let (tree, _, bits) = encode_to_vec(data);
        assert_eq!(bits, tree.code_table().encoded_bits(&table));
    }

    #[test]
    fn test_unknown_symbol_fails_fast() {
        let table = FrequencyTable::from_bytes(b"aaa").unwrap();
        let codes = EncodingTree::build(&table).code_table();
        let mut writer = BitWriter::new(Vec::new());

        let result = encode(&b"ab"[..], &codes, &mut writer);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::SymbolNotInTable {
                symbol: Symbol::Byte(b'b')
            }))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let data = b"abracadabra abracadabra abracadabra";
        let (tree, bytes, _) = encode_to_vec(data);

        let short = &bytes[..bytes.len() / 2];
        let mut out = Vec::new();
        let result = decode(&mut BitReader::new(short), &tree, &mut out);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::TruncatedPayload { .. }))
        ));
        assert!(out.len() < data.len());
        assert_eq!(&data[..out.len()], out.as_slice());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let data = b"abc";
        let (tree, mut bytes, _) = encode_to_vec(data);
        bytes.extend_from_slice(&[0xFF; 8]);

        let mut out = Vec::new();
        decode(&mut BitReader::new(bytes.as_slice()), &tree, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_large_input_spans_buffers() {
        let data: Vec<u8> = (0..IO_BUFFER_SIZE * 3 + 17).map(|i| (i % 7) as u8).collect();
        let (tree, bytes, _) = encode_to_vec(&data);

        let mut out = Vec::new();
        decode(&mut BitReader::new(bytes.as_slice()), &tree, &mut out).unwrap();
        assert_eq!(out, data);
    }
}
