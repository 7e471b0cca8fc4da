//! Bit-level I/O over ordinary byte streams.
//!
//! `BitWriter` and `BitReader` wrap any `std::io::Write` / `std::io::Read`
//! and move single bits in MSB-first order. The header codec and the
//! payload codec only see them through the `BitSink` / `BitSource` traits.
//!
//! # Padding Rules
//! - BitWriter: pads the final incomplete byte with trailing zeros
//! - BitReader: cannot tell padding from data; the payload's end-of-data
//!   code tells the decoder where to stop
//!
//! # Example
//! ```
//! use huffcrypt_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap();   // Write 2 bits: 1, 1
//! // Total: 10111 -> padded to 10111000
//!
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b10111000]);
//!
//! let mut reader = BitReader::new(bytes.as_slice());
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::error::{BitIoError, Result};

/// Completed bytes are handed to the inner writer in batches of this size.
const FLUSH_THRESHOLD: usize = 8 * 1024;

/// Size of the read-ahead buffer used by `BitReader`.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Destination for a stream of bits.
pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> Result<()>;
}

/// Source of a stream of bits.
///
/// Returns `BitIoError::UnexpectedEof` once the underlying bytes run out.
pub trait BitSource {
    fn read_bit(&mut self) -> Result<bool>;
}

/// Writes bits MSB-first into an underlying byte writer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - `bit_buffer` holds `bit_count` bits, MSB-aligned
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Completed bytes not yet handed to `inner`
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Bytes already written to `inner`
    flushed: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: Vec::with_capacity(FLUSH_THRESHOLD),
            bit_buffer: 0,
            bit_count: 0,
            flushed: 0,
        }
    }

    /// Write up to 64 bits.
    ///
    /// Bits are written MSB-first: value=0b101 with count=3 writes 1, 0, 1.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        for shift in (0..count).rev() {
            self.push_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.bit_buffer |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;

            if self.bytes.len() >= FLUSH_THRESHOLD {
                self.flush_bytes()?;
            }
        }
        Ok(())
    }

    fn flush_bytes(&mut self) -> Result<()> {
        self.inner.write_all(&self.bytes)?;
        self.flushed += self.bytes.len() as u64;
        self.bytes.clear();
        Ok(())
    }

    /// Total number of bits written so far (including the partial byte).
    pub fn bit_len(&self) -> u64 {
        (self.flushed + self.bytes.len() as u64) * 8 + self.bit_count as u64
    }

    /// Pad the partial byte with zeros, flush everything and return the
    /// inner writer.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        self.flush_bytes()?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push_bit(bit)
    }
}

/// Reads bits MSB-first from an underlying byte reader.
///
/// Reads ahead in blocks, so the inner reader ends up positioned past the
/// last bit actually consumed.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    buffer: Vec<u8>,
    /// Valid bytes in `buffer`
    filled: usize,
    /// Next unread byte in `buffer`
    cursor: usize,
    /// Byte currently being consumed
    bit_buffer: u8,
    /// Unconsumed bits left in bit_buffer (0-8)
    bits_left: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: vec![0; READ_BUFFER_SIZE],
            filled: 0,
            cursor: 0,
            bit_buffer: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Read up to 64 bits, MSB-first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if the stream ends first
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut result = 0u64;
        for _ in 0..count {
            result = (result << 1) | self.next_bit()? as u64;
        }
        Ok(result)
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    fn next_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.bit_buffer = self.next_byte()?.ok_or(BitIoError::UnexpectedEof)?;
            self.bits_left = 8;
        }

        self.bits_left -= 1;
        self.bits_read += 1;
        Ok((self.bit_buffer >> self.bits_left) & 1 == 1)
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.cursor == self.filled {
            self.filled = loop {
                match self.inner.read(&mut self.buffer) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            self.cursor = 0;

            if self.filled == 0 {
                return Ok(None);
            }
        }

        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(Some(byte))
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<bool> {
        self.next_bit()
    }
}
