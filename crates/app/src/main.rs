//! huffcrypt: compress and decompress files with a password-protected
//! Huffman header.
//!
//! ## Usage
//!
//! ```bash
//! # Compress, prompting for the password
//! huffcrypt compress notes.txt notes.huf
//!
//! # Decompress with the password from the environment
//! HUFFCRYPT_PASSWORD=secret huffcrypt decompress notes.huf notes.txt
//!
//! # Verbose run without the summary
//! huffcrypt compress big.bin big.huf --password secret --log-level debug --no-metrics
//!
//! # Keep machine-readable metrics
//! huffcrypt compress notes.txt notes.huf --metrics-file notes.metrics
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use huffcrypt_core::Metrics;

mod config;

use config::{Cli, Config, Mode};

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;

    if config.print_config {
        config.print();
    }

    let password = match &config.password {
        Some(password) => password.clone(),
        None => {
            let prompt = match config.mode {
                Mode::Compress => "Enter password: ",
                Mode::Decompress => "Password: ",
            };
            config::read_password(io::stdin().lock(), io::stderr(), prompt)?
        }
    };

    let metrics = match config.mode {
        Mode::Compress => run_compress(&config, &password)?,
        Mode::Decompress => run_decompress(&config, &password)?,
    };

    if config.print_metrics {
        metrics.print_summary();
    }
    if let Some(path) = &config.metrics_file {
        write_metrics(path, &metrics)?;
    }
    Ok(())
}

fn write_metrics(path: &Path, metrics: &Metrics) -> anyhow::Result<()> {
    fs::write(path, metrics.export_text())
        .with_context(|| format!("writing metrics to {}", path.display()))
}

fn run_compress(config: &Config, password: &str) -> anyhow::Result<Metrics> {
    let input = File::open(&config.input_file)
        .with_context(|| format!("opening {}", config.input_file.display()))?;
    let output = File::create(&config.output_file)
        .with_context(|| format!("creating {}", config.output_file.display()))?;

    info!(
        input = %config.input_file.display(),
        output = %config.output_file.display(),
        "compressing"
    );
    huffcrypt_core::compress(BufReader::new(input), BufWriter::new(output), password)
        .with_context(|| format!("compressing {}", config.input_file.display()))
}

fn run_decompress(config: &Config, password: &str) -> anyhow::Result<Metrics> {
    let input = File::open(&config.input_file)
        .with_context(|| format!("opening {}", config.input_file.display()))?;
    let output = File::create(&config.output_file)
        .with_context(|| format!("creating {}", config.output_file.display()))?;

    info!(
        input = %config.input_file.display(),
        output = %config.output_file.display(),
        "decompressing"
    );
    huffcrypt_core::decompress(BufReader::new(input), BufWriter::new(output), password)
        .with_context(|| {
            format!(
                "decompressing {} (wrong password or corrupt file?)",
                config.input_file.display()
            )
        })
}
