//! Compressed artifact: encrypted header followed by the Huffman payload.
//!
//! # Layout
//!
//! ```text
//! +------------------+
//! | header           |  entry count + (symbol, frequency) pairs,
//! | (obfuscated)     |  XORed with the password stream
//! +------------------+
//! | payload          |  Huffman codes of the input bytes, then the
//! | (plain)          |  end-of-data code; zero-padded to a byte
//! +------------------+
//! ```
//!
//! There is no separator or length field between the two parts; the
//! reader knows the header layout and the payload terminates itself.
//!
//! The decompressor rebuilds the tree from the decrypted table, so a
//! wrong password yields either a header error, a truncated payload, or
//! garbage output.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use tracing::{debug, info, warn};

use crate::bitio::{BitReader, BitWriter};
use crate::codec::{decode, encode};
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::header::{read_encrypted_header, write_encrypted_header};
use crate::metrics::{Direction, Metrics};
use crate::tree::EncodingTree;

/// Compress `input` into `output`.
///
/// `input` is scanned once for frequencies, then rewound to where the scan
/// started and scanned again to encode.
pub fn compress<R, W>(mut input: R, output: W, password: &str) -> Result<Metrics>
where
    R: Read + Seek,
    W: Write,
{
    let mut metrics = Metrics::new(Direction::Compress);

    let start = input.stream_position()?;
    let table = FrequencyTable::from_reader(&mut input)?;
    let tree = EncodingTree::build(&table);
    let codes = tree.code_table();
    let estimated_bits = codes.encoded_bits(&table);
    debug!(payload_bits = estimated_bits, "derived code table");

    let mut sink = BitWriter::new(output);
    write_encrypted_header(&mut sink, &table, password)?;
    let header_bits = sink.bit_len();

    input.seek(SeekFrom::Start(start))?;
    let encoded = encode(&mut input, &codes, &mut sink)?;
    let total_bits = sink.bit_len();
    sink.finish()?;

    metrics.input_bytes = encoded;
    metrics.output_bytes = total_bits.div_ceil(8);
    metrics.distinct_symbols = table.len();
    metrics.header_bits = header_bits;
    metrics.payload_bits = total_bits - header_bits;
    metrics.complete();

    // Differs only if the input changed between the two passes
    if metrics.payload_bits != estimated_bits {
        warn!(
            expected = estimated_bits,
            actual = metrics.payload_bits,
            "input changed between frequency scan and encode pass"
        );
    }

    info!(
        input_bytes = metrics.input_bytes,
        output_bytes = metrics.output_bytes,
        symbols = metrics.distinct_symbols,
        "compressed"
    );
    Ok(metrics)
}

/// Decompress `input` into `output`.
///
/// # Errors
/// - `HeaderError` if the header is truncated or decrypts to nonsense
/// - `HuffmanError::TruncatedPayload` if the payload ends before the
///   end-of-data code; `output` then holds a partial result
pub fn decompress<R, W>(input: R, output: W, password: &str) -> Result<Metrics>
where
    R: Read,
    W: Write,
{
    let mut metrics = Metrics::new(Direction::Decompress);

    let mut source = BitReader::new(input);
    let table = read_encrypted_header(&mut source, password)?;
    let header_bits = source.bits_read();

    let tree = EncodingTree::build(&table);
    let decoded = decode(&mut source, &tree, output)?;
    let total_bits = source.bits_read();

    metrics.input_bytes = total_bits.div_ceil(8);
    metrics.output_bytes = decoded;
    metrics.distinct_symbols = table.len();
    metrics.header_bits = header_bits;
    metrics.payload_bits = total_bits - header_bits;
    metrics.complete();

    info!(
        input_bytes = metrics.input_bytes,
        output_bytes = metrics.output_bytes,
        symbols = metrics.distinct_symbols,
        "decompressed"
    );
    Ok(metrics)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(Cursor::new(data), &mut out, password)?;
    Ok(out)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out, password)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, HeaderError, HuffmanError};
    use crate::header::header_bit_len;

    #[test]
    fn test_round_trip() {
        let data = b"hello world! this is a test.";
        let compressed = compress_bytes(data, "pw").unwrap();
        assert_eq!(decompress_bytes(&compressed, "pw").unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let mut out = Vec::new();
        let metrics = compress(Cursor::new(b""), &mut out, "x").unwrap();

        assert_eq!(metrics.distinct_symbols, 1);
        assert_eq!(metrics.header_bits, 32);
        assert_eq!(metrics.payload_bits, 0);
        assert_eq!(out.len(), 4);

        assert!(decompress_bytes(&out, "x").unwrap().is_empty());
    }

    #[test]
    fn test_metrics_agree_between_directions() {
        let data = b"the rain in spain stays mainly in the plain";
        let mut compressed = Vec::new();
        let c = compress(Cursor::new(data), &mut compressed, "pw").unwrap();

        let mut restored = Vec::new();
        let d = decompress(compressed.as_slice(), &mut restored, "pw").unwrap();

        let table = FrequencyTable::from_bytes(data).unwrap();
        assert_eq!(c.header_bits, header_bit_len(&table));
        assert_eq!(c.header_bits, d.header_bits);
        assert_eq!(c.payload_bits, d.payload_bits);
        assert_eq!(c.output_bytes, compressed.len() as u64);
        assert_eq!(d.input_bytes, compressed.len() as u64);
        assert_eq!(c.input_bytes, d.output_bytes);
        assert_eq!(restored, data);
    }

    #[test]
    fn test_payload_matches_code_table_estimate() {
        let data = b"she sells sea shells by the sea shore";
        let table = FrequencyTable::from_bytes(data).unwrap();
        let estimate = EncodingTree::build(&table).code_table().encoded_bits(&table);

        let metrics = compress(Cursor::new(data), Vec::new(), "pw").unwrap();
        assert_eq!(metrics.payload_bits, estimate);
        assert_eq!(
            metrics.output_bytes,
            (header_bit_len(&table) + estimate).div_ceil(8)
        );
    }

    #[test]
    fn test_rewinds_to_scan_start() {
        let mut data = b"HEADER".to_vec();
        data.extend_from_slice(b"only this part is compressed");
        let mut cursor = Cursor::new(data);
        cursor.seek(SeekFrom::Start(6)).unwrap();

        let mut out = Vec::new();
        compress(&mut cursor, &mut out, "pw").unwrap();
        assert_eq!(
            decompress_bytes(&out, "pw").unwrap(),
            b"only this part is compressed"
        );
    }

    #[test]
    fn test_truncated_file() {
        let compressed = compress_bytes(b"some moderately long input text", "pw").unwrap();

        let result = decompress_bytes(&compressed[..3], "pw");
        assert!(matches!(result, Err(Error::Header(HeaderError::Truncated { .. }))));

        let result = decompress_bytes(&compressed[..compressed.len() - 3], "pw");
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::TruncatedPayload { .. }))
        ));
    }

    #[test]
    fn test_wrong_password() {
        let data = b"abracadabra";
        let compressed = compress_bytes(data, "pw").unwrap();
        if let Ok(out) = decompress_bytes(&compressed, "wrong") {
            assert_ne!(out, data);
        }
    }
}
