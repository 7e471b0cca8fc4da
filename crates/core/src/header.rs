//! Encrypted frequency header.
//!
//! # Header Format
//!
//! ```text
//! +----------------------+
//! | entry count N (32)   |  distinct bytes, sentinel excluded
//! +----------------------+
//! | symbol (8)           |  \
//! +----------------------+   } repeated N times, ascending byte order
//! | frequency (32)       |  /
//! +----------------------+
//! ```
//!
//! Every field is big-endian and MSB-first. Every header bit is XORed
//! with the password stream, which starts fresh for each header pass.
//! The sentinel's count is never written; the reader re-inserts it.
//!
//! A wrong password cannot be detected here. It either trips one of the
//! plausibility checks below or produces a garbage table.

use tracing::{debug, trace};

use crate::bitio::{BitSink, BitSource};
use crate::error::{HeaderError, Result};
use crate::frequency::FrequencyTable;
use crate::password::PasswordStream;

pub const COUNT_BITS: usize = 32;
pub const SYMBOL_BITS: usize = 8;
pub const FREQUENCY_BITS: usize = 32;

/// At most one entry per byte value.
const MAX_ENTRIES: u32 = 256;

/// Size of the header for `table`, in bits.
pub fn header_bit_len(table: &FrequencyTable) -> u64 {
    (COUNT_BITS + table.distinct_bytes() * (SYMBOL_BITS + FREQUENCY_BITS)) as u64
}

/// Write `table` to `sink`, obfuscated with `password`.
pub fn write_encrypted_header<S>(sink: &mut S, table: &FrequencyTable, password: &str) -> Result<()>
where
    S: BitSink + ?Sized,
{
    let mut stream = PasswordStream::new(password);
    let count = table.distinct_bytes() as u32;

    write_field(sink, &mut stream, count, COUNT_BITS)?;
    for (byte, frequency) in table.byte_entries() {
        trace!(byte, frequency, "header entry");
        write_field(sink, &mut stream, byte as u32, SYMBOL_BITS)?;
        write_field(sink, &mut stream, frequency, FREQUENCY_BITS)?;
    }

    debug!(entries = count, bits = header_bit_len(table), "wrote encrypted header");
    Ok(())
}

/// Read a header written by `write_encrypted_header` with the same password.
///
/// # Errors
/// - `HeaderError::Truncated` if the source ends inside a field
/// - `HeaderError::EntryCountOutOfRange`, `DuplicateSymbol` or
///   `ZeroFrequency` if the decrypted contents cannot describe a real table
pub fn read_encrypted_header<S>(source: &mut S, password: &str) -> Result<FrequencyTable>
where
    S: BitSource + ?Sized,
{
    let mut stream = PasswordStream::new(password);
    let mut table = FrequencyTable::new();

    let count = read_field(source, &mut stream, COUNT_BITS, "entry count")?;
    if count > MAX_ENTRIES {
        return Err(HeaderError::EntryCountOutOfRange { count }.into());
    }

    for _ in 0..count {
        let symbol = read_field(source, &mut stream, SYMBOL_BITS, "entry symbol")? as u8;
        let frequency = read_field(source, &mut stream, FREQUENCY_BITS, "entry frequency")?;
        trace!(byte = symbol, frequency, "header entry");

        if frequency == 0 {
            return Err(HeaderError::ZeroFrequency { symbol }.into());
        }
        if table.get(symbol.into()).is_some() {
            return Err(HeaderError::DuplicateSymbol { symbol }.into());
        }
        table.insert(symbol, frequency);
    }

    debug!(entries = count, "read encrypted header");
    Ok(table)
}

fn write_field<S>(sink: &mut S, stream: &mut PasswordStream, value: u32, width: usize) -> Result<()>
where
    S: BitSink + ?Sized,
{
    for shift in (0..width).rev() {
        let bit = (value >> shift) & 1 == 1;
        sink.write_bit(stream.next_bit(bit))?;
    }
    Ok(())
}

fn read_field<S>(
    source: &mut S,
    stream: &mut PasswordStream,
    width: usize,
    field: &'static str,
) -> Result<u32>
where
    S: BitSource + ?Sized,
{
    let mut value = 0u32;
    for _ in 0..width {
        let bit = match source.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.is_unexpected_eof() => return Err(HeaderError::Truncated { field }.into()),
            Err(e) => return Err(e),
        };
        value = (value << 1) | stream.next_bit(bit) as u32;
    }
    Ok(value)
}
