//! Configuration for the huffcrypt command-line tool.
//!
//! Parses command-line arguments with clap and resolves them into a
//! `Config`. The password may come from `--password`, from the
//! `HUFFCRYPT_PASSWORD` environment variable, or from a prompt on stdin
//! when neither is given.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

/// Environment variable consulted when `--password` is absent.
pub const PASSWORD_ENV: &str = "HUFFCRYPT_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "huffcrypt")]
#[command(version)]
#[command(
    about = "Huffman compression with a password-protected frequency header",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Print resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,

    /// Also write metrics as key=value lines to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compress INPUT into OUTPUT
    Compress(FileArgs),
    /// Decompress INPUT into OUTPUT
    Decompress(FileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// File to read
    pub input: PathBuf,

    /// File to create or overwrite
    pub output: PathBuf,

    /// Password for the header (prompted for if absent)
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,

    // === Files ===
    pub input_file: PathBuf,
    pub output_file: PathBuf,

    /// None = prompt on stdin
    pub password: Option<String>,

    // === Behavior ===
    pub log_level: Level,
    pub print_config: bool,
    pub print_metrics: bool,
    pub metrics_file: Option<PathBuf>,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let log_level: Level = cli
            .log_level
            .parse()
            .with_context(|| format!("invalid log level: {}", cli.log_level))?;

        let (mode, files) = match cli.command {
            Command::Compress(files) => (Mode::Compress, files),
            Command::Decompress(files) => (Mode::Decompress, files),
        };

        if files.input == files.output {
            bail!("input and output must differ: {}", files.input.display());
        }

        Ok(Config {
            mode,
            input_file: files.input,
            output_file: files.output,
            password: files.password,
            log_level,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
            metrics_file: cli.metrics_file,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode:        {:?}", self.mode);
        println!("Input file:  {}", self.input_file.display());
        println!("Output file: {}", self.output_file.display());
        let password = match self.password {
            Some(_) => "(provided)",
            None => "(prompt)",
        };
        println!("Password:    {password}");
        println!("Log level:   {}", self.log_level);
        if let Some(path) = &self.metrics_file {
            println!("Metrics to:  {}", path.display());
        }
        println!();
    }
}

/// Show `prompt` on `out` and read one line from `input` as the password.
///
/// The trailing line terminator is stripped; everything else, including
/// surrounding spaces, is part of the password.
pub fn read_password<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    prompt: &str,
) -> anyhow::Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    let n = input.read_line(&mut line).context("reading password")?;
    if n == 0 {
        bail!("no password given: stdin is closed");
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let cli = Cli::try_parse_from(std::iter::once("huffcrypt").chain(args.iter().copied()))?;
        Config::from_cli(cli)
    }

    #[test]
    fn test_compress_defaults() {
        let config = parse(&["compress", "in.txt", "out.huf", "--password", "pw"]).unwrap();
        assert_eq!(config.mode, Mode::Compress);
        assert_eq!(config.input_file, PathBuf::from("in.txt"));
        assert_eq!(config.output_file, PathBuf::from("out.huf"));
        assert_eq!(config.password.as_deref(), Some("pw"));
        assert_eq!(config.log_level, Level::WARN);
        assert!(config.print_metrics);
        assert!(!config.print_config);
        assert!(config.metrics_file.is_none());
    }

    #[test]
    fn test_global_flags() {
        let config = parse(&[
            "decompress",
            "a.huf",
            "a.txt",
            "--log-level",
            "debug",
            "--no-metrics",
            "--print-config",
        ])
        .unwrap();
        assert_eq!(config.mode, Mode::Decompress);
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(!config.print_metrics);
        assert!(config.print_config);
    }

    #[test]
    fn test_metrics_file() {
        let config = parse(&["--metrics-file", "run.txt", "compress", "a", "b"]).unwrap();
        assert_eq!(config.metrics_file, Some(PathBuf::from("run.txt")));

        let config = parse(&["compress", "a", "b", "--metrics-file", "after.txt"]).unwrap();
        assert_eq!(config.metrics_file, Some(PathBuf::from("after.txt")));
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(parse(&["compress", "a", "b", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        assert!(parse(&["compress", "same", "same"]).is_err());
    }

    #[test]
    fn test_missing_paths() {
        assert!(parse(&["compress", "only-one"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_read_password_strips_newline() {
        let mut prompt = Vec::new();
        let input = &b"hunter2\r\nignored\n"[..];
        let password = read_password(input, &mut prompt, "Enter password: ").unwrap();
        assert_eq!(password, "hunter2");
        assert_eq!(prompt, b"Enter password: ");
    }

    #[test]
    fn test_read_password_keeps_spaces() {
        let password = read_password(&b"  two words  \n"[..], Vec::new(), "").unwrap();
        assert_eq!(password, "  two words  ");

        let password = read_password(&b"no newline"[..], Vec::new(), "").unwrap();
        assert_eq!(password, "no newline");

        let password = read_password(&b"\n"[..], Vec::new(), "").unwrap();
        assert_eq!(password, "");
    }

    #[test]
    fn test_read_password_closed_stdin() {
        assert!(read_password(&b""[..], Vec::new(), "").is_err());
    }
}
