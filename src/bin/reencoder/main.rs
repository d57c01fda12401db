//! Reencoder CLI tool for validating, converting and repairing Unicode text.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use reencoder::Encoding;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "reencoder")]
#[command(about = "Unicode validation and transcoding toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate files in a given encoding
    Validate(validate::ValidateArgs),
    /// Show encoding, validity and size of a string
    Info(transcode::InfoArgs),
    /// Convert text from one encoding to another
    Convert(transcode::ConvertArgs),
    /// Replace malformed sequences with U+FFFD
    Repair(transcode::RepairArgs),
    /// Generate synthetic text for benchmarking and testing
    Generate(GenerateText),
}

/// Generate synthetic text for benchmarking and testing
#[derive(Debug, Parser)]
struct GenerateText {
    /// Size of the text to generate, measured in UTF-8 bytes
    /// (supports b, kb, mb, gb - case insensitive). Examples: 1024, 1kb, 512MB
    #[arg(value_parser = parse_size)]
    size: usize,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Text pattern to generate
    #[arg(short, long, default_value = "mixed")]
    pattern: PatternArg,

    /// Encoding of the output
    #[arg(short, long, default_value = "utf-8")]
    encoding: Encoding,

    /// Number of malformed sequences to inject
    #[arg(long, default_value = "0")]
    corrupt: usize,

    /// Random seed for reproducible generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write a byte-order mark before the text
    #[arg(long)]
    bom: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum PatternArg {
    /// Pure ASCII prose
    Ascii,
    /// Latin words with accents (2-byte UTF-8)
    Latin,
    /// Greek and Cyrillic (2-byte UTF-8)
    GreekCyrillic,
    /// Chinese, Japanese and Korean (3-byte UTF-8)
    Cjk,
    /// Emoji (4-byte UTF-8, surrogate pairs in UTF-16)
    Emoji,
    /// Mostly ASCII prose with occasional non-ASCII words (default)
    Mixed,
    /// Uniform mix of all UTF-8 sequence lengths
    AllLengths,
    /// Only supplementary-plane characters
    Pathological,
}

impl From<PatternArg> for generators::TextPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Ascii => generators::TextPattern::Ascii,
            PatternArg::Latin => generators::TextPattern::Latin,
            PatternArg::GreekCyrillic => generators::TextPattern::GreekCyrillic,
            PatternArg::Cjk => generators::TextPattern::Cjk,
            PatternArg::Emoji => generators::TextPattern::Emoji,
            PatternArg::Mixed => generators::TextPattern::Mixed,
            PatternArg::AllLengths => generators::TextPattern::AllLengths,
            PatternArg::Pathological => generators::TextPattern::Pathological,
        }
    }
}

/// Parse size string like "1mb", "512KB", "2GB", "1024" (case insensitive)
fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_lowercase();

    // Try parsing as plain number first
    if let Ok(bytes) = s.parse::<usize>() {
        return Ok(bytes);
    }

    // Parse with unit suffix
    let (num_str, unit) = if s.ends_with("gb") {
        (s.trim_end_matches("gb"), 1024 * 1024 * 1024)
    } else if s.ends_with("mb") {
        (s.trim_end_matches("mb"), 1024 * 1024)
    } else if s.ends_with("kb") {
        (s.trim_end_matches("kb"), 1024)
    } else if s.ends_with('b') {
        (s.trim_end_matches('b'), 1)
    } else {
        return Err(format!(
            "Invalid size format: '{}'. Use format like '1mb', '512KB', or '1024'",
            s
        ));
    };

    num_str
        .trim()
        .parse::<usize>()
        .map(|n| n * unit)
        .map_err(|_| format!("Invalid number in size: '{}'", s))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Read a whole file, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read from stdin")?;
            Ok(input)
        }
    }
}

/// Write raw bytes to a file, or stdout when no path is given.
fn write_output(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn generate(args: GenerateText) -> Result<i32> {
    let text = generators::generate_text(args.size, args.pattern.into(), args.seed);
    let encoded = reencoder::convert(Encoding::Utf8, args.encoding, text.as_bytes())?;

    let mut bytes = Vec::with_capacity(encoded.encoded_len(args.bom));
    if args.bom {
        bytes.extend_from_slice(args.encoding.bom());
    }
    let body_start = bytes.len();
    bytes.extend_from_slice(encoded.as_bytes());

    if args.corrupt > 0 {
        let mut body = bytes.split_off(body_start);
        generators::corrupt(&mut body, args.encoding, args.corrupt, args.seed);
        bytes.append(&mut body);
    }

    write_output(&bytes, args.output.as_deref())?;
    Ok(validate::exit_codes::SUCCESS)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Command::Validate(args) => validate::run(args)?,
        Command::Info(args) => transcode::info(args)?,
        Command::Convert(args) => transcode::convert(args)?,
        Command::Repair(args) => transcode::repair(args)?,
        Command::Generate(args) => generate(args)?,
    };

    if code != validate::exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

mod generators;
mod transcode;
mod validate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        // Plain numbers
        assert_eq!(parse_size("1024").unwrap(), 1024);

        // Bytes (case insensitive)
        assert_eq!(parse_size("100b").unwrap(), 100);
        assert_eq!(parse_size("100B").unwrap(), 100);

        // Kilobytes and up
        assert_eq!(parse_size("1kb").unwrap(), 1024);
        assert_eq!(parse_size("512KB").unwrap(), 512 * 1024);
        assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("2Gb").unwrap(), 2 * 1024 * 1024 * 1024);

        // With whitespace
        assert_eq!(parse_size(" 1mb ").unwrap(), 1024 * 1024);

        // Errors
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1tb").is_err());
        assert!(parse_size("").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "reencoder", "-vv", "convert", "--from", "auto", "--to", "utf-16le", "--bom", "in.txt",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.from, transcode::SourceEncoding::Auto);
                assert_eq!(args.to, Encoding::Utf16Le);
                assert!(args.bom);
                assert_eq!(args.input, Some(PathBuf::from("in.txt")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_rejects_unknown_encoding() {
        assert!(Cli::try_parse_from(["reencoder", "validate", "latin-1"]).is_err());
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["reencoder", "generate", "1kb"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.size, 1024);
                assert_eq!(args.encoding, Encoding::Utf8);
                assert_eq!(args.corrupt, 0);
                assert!(!args.bom);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
