//! Metrics for a single compress or decompress run.
//!
//! Both orchestrators return a `Metrics` value describing what they did:
//! byte counts on either side, how the output splits between header and
//! payload, and how long it took.
//!
//! # Thread Safety
//!
//! Plain data; each run fills in its own instance.

use std::time::{Duration, Instant};

/// Which way the data flowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

#[derive(Debug, Clone)]
pub struct Metrics {
    pub direction: Direction,

    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Bytes consumed from the input
    pub input_bytes: u64,

    /// Bytes written to the output
    pub output_bytes: u64,

    // === Layout ===
    /// Distinct symbols in the frequency table, sentinel included
    pub distinct_symbols: usize,

    /// Encrypted header size in bits
    pub header_bits: u64,

    /// Huffman payload size in bits, sentinel code included
    pub payload_bits: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            distinct_symbols: 0,
            header_bits: 0,
            payload_bits: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Size of the uncompressed side.
    pub fn raw_bytes(&self) -> u64 {
        match self.direction {
            Direction::Compress => self.input_bytes,
            Direction::Decompress => self.output_bytes,
        }
    }

    /// Size of the compressed side.
    pub fn compressed_bytes(&self) -> u64 {
        match self.direction {
            Direction::Compress => self.output_bytes,
            Direction::Decompress => self.input_bytes,
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if there was no raw data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes() == 0 {
            0.0
        } else {
            self.compressed_bytes() as f64 / self.raw_bytes() as f64
        }
    }

    /// Average payload bits spent per raw byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes() == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.raw_bytes() as f64
        }
    }

    /// Compute throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let title = match self.direction {
            Direction::Compress => "Compression",
            Direction::Decompress => "Decompression",
        };

        println!("\n=== {title} Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Input:  {} bytes ({:.2} MiB)", self.input_bytes, mib(self.input_bytes));
        println!("Output: {} bytes ({:.2} MiB)", self.output_bytes, mib(self.output_bytes));
        println!();
        println!("=== Layout ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Header: {} bits ({} bytes)", self.header_bits, self.header_bits.div_ceil(8));
        println!("Payload: {} bits", self.payload_bits);
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             distinct_symbols={}\n\
             header_bits={}\n\
             payload_bits={}\n\
             compression_ratio={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.distinct_symbols,
            self.header_bits,
            self.payload_bits,
            self.compression_ratio(),
        )
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
