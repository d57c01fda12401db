//! CLI handlers for the `info`, `convert` and `repair` commands.

use anyhow::{Context, Result};
use clap::Parser;
use reencoder::{Encoding, UnicodeString, UnknownEncoding};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::validate::exit_codes;

/// An encoding given on the command line, or `auto` to detect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Detect from a byte-order mark, defaulting to UTF-8.
    Auto,
    Known(Encoding),
}

impl FromStr for SourceEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(SourceEncoding::Auto)
        } else {
            s.parse().map(SourceEncoding::Known)
        }
    }
}

impl SourceEncoding {
    /// The encoding of `input` and its content after any detected BOM.
    pub fn resolve(self, input: &[u8]) -> (Encoding, &[u8], bool) {
        match self {
            SourceEncoding::Known(encoding) => (encoding, input, false),
            SourceEncoding::Auto => match Encoding::sniff_bom(input) {
                Some((encoding, bom_len)) => {
                    log::debug!("detected {} byte-order mark", encoding);
                    (encoding, &input[bom_len..], true)
                }
                None => (Encoding::Utf8, input, false),
            },
        }
    }
}

/// Show encoding, validity and size of an input.
#[derive(Debug, Parser)]
pub struct InfoArgs {
    /// Input file (reads from stdin if omitted)
    pub input: Option<PathBuf>,

    /// Encoding of the input, or `auto` to detect it from a byte-order mark
    #[arg(short, long, default_value = "auto")]
    pub encoding: SourceEncoding,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Convert text from one encoding to another.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Input file (reads from stdin if omitted)
    pub input: Option<PathBuf>,

    /// Source encoding, or `auto` to detect it from a byte-order mark
    #[arg(short, long, default_value = "auto")]
    pub from: SourceEncoding,

    /// Target encoding
    #[arg(short, long)]
    pub to: Encoding,

    /// Write a byte-order mark before the output
    #[arg(long)]
    pub bom: bool,

    /// Replace malformed input with U+FFFD instead of failing
    #[arg(long)]
    pub repair: bool,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Replace malformed sequences with U+FFFD, keeping the encoding.
#[derive(Debug, Parser)]
pub struct RepairArgs {
    /// Encoding of the input
    pub encoding: Encoding,

    /// Input file (reads from stdin if omitted)
    pub input: Option<PathBuf>,

    /// Write a byte-order mark before the output
    #[arg(long)]
    pub bom: bool,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Machine-readable description of a string.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub encoding: &'static str,
    pub bom: bool,
    pub valid: bool,
    pub code: u32,
    pub description: &'static str,
    pub byte_len: usize,
    pub char_count: usize,
    pub multibyte: bool,
}

impl Summary {
    pub fn new(string: &UnicodeString, bom: bool) -> Self {
        Self {
            encoding: string.encoding().name(),
            bom,
            valid: string.is_valid(),
            code: string.validity().code(),
            description: string.validity().description(),
            byte_len: string.byte_len(),
            char_count: string.char_count(),
            multibyte: string.contains_multibyte(),
        }
    }
}

/// Run the info command.
pub fn info(args: InfoArgs) -> Result<i32> {
    let input = crate::read_input(args.input.as_deref())?;
    let (encoding, content, bom) = args.encoding.resolve(&input);
    let string = UnicodeString::parse(content, encoding)?;
    let summary = Summary::new(&string, bom);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("encoding:    {}{}", summary.encoding, if bom { " (BOM)" } else { "" });
        println!("validity:    {} [{}]", summary.description, summary.code);
        println!("bytes:       {}", summary.byte_len);
        println!("characters:  {}", summary.char_count);
        println!("multi-unit:  {}", if summary.multibyte { "yes" } else { "no" });
    }

    Ok(if summary.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::INVALID
    })
}

/// Run the convert command.
pub fn convert(args: ConvertArgs) -> Result<i32> {
    let input = crate::read_input(args.input.as_deref())?;
    let (source, content, _) = args.from.resolve(&input);

    let mut converted = reencoder::convert(source, args.to, content)?;
    if !converted.is_valid() {
        if !args.repair {
            eprintln!(
                "error[{}]: input is not valid {}: {}",
                converted.validity().code(),
                source,
                converted.validity()
            );
            return Ok(exit_codes::INVALID);
        }

        // Malformed input comes back in the source encoding
        let validity = converted.repair()?;
        log::info!("repaired {} input: {}", source, validity);
        converted = reencoder::convert(source, args.to, converted.as_bytes())?;
    }

    write_string(&converted, args.bom, args.output.as_deref())?;
    Ok(exit_codes::SUCCESS)
}

/// Run the repair command.
pub fn repair(args: RepairArgs) -> Result<i32> {
    let input = crate::read_input(args.input.as_deref())?;
    let mut string = UnicodeString::parse(&input, args.encoding)?;

    match reencoder::repair(Some(&mut string)) {
        Ok(validity) => log::info!("{}", validity),
        Err(reencoder::RepairError::NoOp) => log::info!("input is already valid {}", args.encoding),
        Err(err) => return Err(err).context("repair failed"),
    }

    write_string(&string, args.bom, args.output.as_deref())?;
    Ok(exit_codes::SUCCESS)
}

/// Write a string to a file, or stdout when no path is given.
fn write_string(string: &UnicodeString, bom: bool, path: Option<&Path>) -> Result<usize> {
    match path {
        Some(path) => {
            let written = string
                .write_to_file(path, bom)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} bytes to {}", written, path.display());
            Ok(written)
        }
        None => string
            .write_to(io::stdout().lock(), bom)
            .context("failed to write to stdout"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_encoding_parses_auto() {
        assert_eq!("auto".parse::<SourceEncoding>(), Ok(SourceEncoding::Auto));
        assert_eq!("AUTO".parse::<SourceEncoding>(), Ok(SourceEncoding::Auto));
        assert_eq!(
            "utf-16be".parse::<SourceEncoding>(),
            Ok(SourceEncoding::Known(Encoding::Utf16Be))
        );
        assert!("ebcdic".parse::<SourceEncoding>().is_err());
    }

    #[test]
    fn auto_strips_detected_bom() {
        let input = [0xFF, 0xFE, 0x41, 0x00];
        let (encoding, content, bom) = SourceEncoding::Auto.resolve(&input);
        assert_eq!(encoding, Encoding::Utf16Le);
        assert_eq!(content, &[0x41, 0x00]);
        assert!(bom);
    }

    #[test]
    fn auto_defaults_to_utf8() {
        let (encoding, content, bom) = SourceEncoding::Auto.resolve(b"plain");
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(content, b"plain");
        assert!(!bom);
    }

    #[test]
    fn known_encoding_keeps_bom_bytes() {
        let input = [0xEF, 0xBB, 0xBF, b'a'];
        let (encoding, content, _) = SourceEncoding::Known(Encoding::Utf8).resolve(&input);
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(content, &input);
    }

    #[test]
    fn summary_json() {
        let string = UnicodeString::parse("a😀".as_bytes(), Encoding::Utf8).unwrap();
        let json = serde_json::to_value(Summary::new(&string, false)).unwrap();
        assert_eq!(json["encoding"], "UTF-8");
        assert_eq!(json["valid"], true);
        assert_eq!(json["code"], 800);
        assert_eq!(json["byte_len"], 5);
        assert_eq!(json["char_count"], 2);
        assert_eq!(json["multibyte"], true);
    }

    #[test]
    fn summary_of_malformed_utf16() {
        let string = UnicodeString::parse(&[0x00, 0xD8], Encoding::Utf16Le).unwrap();
        let summary = Summary::new(&string, false);
        assert!(!summary.valid);
        assert_eq!(summary.code, 1601);
        assert_eq!(summary.char_count, 0);
    }
}
