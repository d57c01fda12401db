//! CLI handler for the `validate` command.

use anyhow::Result;
use clap::Parser;
use reencoder::endian::units_from_bytes;
use reencoder::outcome::ErrorKind;
use reencoder::text::utf8::{self, Utf8Error};
use reencoder::text::{self, CodeUnit, UnicodeFormat, Utf16, Utf32};
use reencoder::{
    Encoding, Family, Outcome, Utf16ErrorKind, Utf32ErrorKind, Utf8ErrorKind, Validity,
};
use std::fs;
use std::path::PathBuf;

/// Validate text files against an encoding.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Expected encoding (utf-8, utf-16be, utf-16le, utf-32be, utf-32le)
    pub encoding: Encoding,

    /// Input files to validate (reads from stdin if none provided)
    #[arg(trailing_var_arg = true)]
    pub files: Vec<PathBuf>,

    /// Quiet mode: exit code only, no output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force color output even when not a TTY
    #[arg(short = 'C', long = "color")]
    pub color: bool,

    /// Disable color output
    #[arg(short = 'M', long = "no-color")]
    pub no_color: bool,
}

/// Exit codes shared by all commands.
pub mod exit_codes {
    /// Input is well-formed.
    pub const SUCCESS: i32 = 0;
    /// Input is malformed.
    pub const INVALID: i32 = 1;
    /// I/O error (file not found, permission denied, etc.).
    pub const IO_ERROR: i32 = 2;
}

/// ANSI color codes for error output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const LOCATION: &str = "\x1b[1;34m"; // Bold blue
    pub const LINE_NUM: &str = "\x1b[0;34m"; // Blue
    pub const CARET: &str = "\x1b[1;32m"; // Bold green
    pub const MESSAGE: &str = "\x1b[0;33m"; // Yellow
}

/// Color scheme that can be disabled.
struct ColorScheme {
    error: &'static str,
    location: &'static str,
    line_num: &'static str,
    caret: &'static str,
    message: &'static str,
    reset: &'static str,
}

impl ColorScheme {
    fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                error: colors::ERROR,
                location: colors::LOCATION,
                line_num: colors::LINE_NUM,
                caret: colors::CARET,
                message: colors::MESSAGE,
                reset: colors::RESET,
            }
        } else {
            Self {
                error: "",
                location: "",
                line_num: "",
                caret: "",
                message: "",
                reset: "",
            }
        }
    }
}

/// The first malformed sequence of an input, ready for display.
#[derive(Debug)]
pub struct Failure {
    /// The outcome the library reports for the input.
    pub validity: Validity,
    /// Headline, including the offending bytes where useful.
    pub message: String,
    /// 1-indexed line of the error.
    pub line: usize,
    /// 1-indexed column of the error, in code units.
    pub column: usize,
    /// Byte offset of the malformed sequence.
    pub byte_offset: usize,
    snippet: ErrorSnippet,
}

/// Information about an error snippet.
#[derive(Debug)]
struct ErrorSnippet {
    /// The text (UTF-8) or unit dump (UTF-16/32) around the error.
    line_content: String,
    /// Number of spaces before the caret.
    caret_offset: usize,
    /// Width of the caret (number of ^ characters).
    caret_width: usize,
}

/// Run the validate command.
pub fn run(args: ValidateArgs) -> Result<i32> {
    // Determine color output
    let use_color = if args.no_color {
        false
    } else if args.color {
        true
    } else {
        atty::is(atty::Stream::Stderr)
    };

    let scheme = ColorScheme::new(use_color);

    if args.files.is_empty() {
        let input = crate::read_input(None)?;
        return validate_input(&input, None, &args, &scheme);
    }

    let mut any_invalid = false;
    let mut any_io_error = false;

    for path in &args.files {
        match fs::read(path) {
            Ok(input) => {
                let filename = path.to_string_lossy();
                let result = validate_input(&input, Some(&filename), &args, &scheme)?;
                if result == exit_codes::INVALID {
                    any_invalid = true;
                }
            }
            Err(e) => {
                any_io_error = true;
                if !args.quiet {
                    eprintln!(
                        "{}error{}: {}: {}",
                        scheme.error,
                        scheme.reset,
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    if any_io_error {
        Ok(exit_codes::IO_ERROR)
    } else if any_invalid {
        Ok(exit_codes::INVALID)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Validate a single input and print errors.
fn validate_input(
    input: &[u8],
    filename: Option<&str>,
    args: &ValidateArgs,
    scheme: &ColorScheme,
) -> Result<i32> {
    match find_failure(input, args.encoding)? {
        None => {
            log::debug!(
                "{}: valid {}",
                filename.unwrap_or("<stdin>"),
                args.encoding
            );
            Ok(exit_codes::SUCCESS)
        }
        Some(failure) => {
            if !args.quiet {
                print_failure(&failure, filename, scheme);
            }
            Ok(exit_codes::INVALID)
        }
    }
}

/// Locate the first malformed sequence of `input` read as `encoding`.
pub fn find_failure(input: &[u8], encoding: Encoding) -> Result<Option<Failure>> {
    match encoding.family() {
        Family::Utf8 => Ok(utf8::validate_utf8(input)
            .err()
            .map(|err| utf8_failure(&err, input))),
        Family::Utf16 => unit_failure::<Utf16>(input, encoding),
        Family::Utf32 => unit_failure::<Utf32>(input, encoding),
    }
}

fn utf8_failure(err: &Utf8Error, input: &[u8]) -> Failure {
    Failure {
        validity: Validity::from(err.kind),
        message: utf8_message(err, input),
        line: err.line,
        column: err.column,
        byte_offset: err.offset,
        snippet: text_snippet(input, err.offset, err.units),
    }
}

fn unit_failure<F: UnicodeFormat>(input: &[u8], encoding: Encoding) -> Result<Option<Failure>> {
    let endian = encoding.endian();
    let err = match text::validate_bytes::<F>(input, endian)? {
        Ok(_) => return Ok(None),
        Err(err) => err,
    };

    let width = <F::Unit as CodeUnit>::WIDTH;
    let units: Vec<u32> = units_from_bytes::<F::Unit>(input, endian)?
        .into_iter()
        .map(CodeUnit::to_u32)
        .collect();
    let tail = &input[units.len() * width..];

    let message = match units.get(err.offset) {
        Some(unit) => format!(
            "{} (unit 0x{:0digits$X})",
            err.kind.description(),
            unit,
            digits = width * 2
        ),
        None if !tail.is_empty() => format!(
            "{} ({} trailing byte{})",
            err.kind.description(),
            tail.len(),
            if tail.len() == 1 { "" } else { "s" }
        ),
        None => err.kind.description().to_string(),
    };

    Ok(Some(Failure {
        validity: F::validity(Outcome::Invalid(err.kind)),
        message,
        line: err.line,
        column: err.column,
        byte_offset: err.offset * width,
        snippet: unit_snippet(&units, tail, err.offset, err.units, width),
    }))
}

/// Print a formatted error message with context snippet.
fn print_failure(failure: &Failure, filename: Option<&str>, scheme: &ColorScheme) {
    eprintln!(
        "{}error[{}]{}: {}",
        scheme.error,
        failure.validity.code(),
        scheme.reset,
        failure.message
    );

    let location = format!(
        "{}:{}:{}",
        filename.unwrap_or("<stdin>"),
        failure.line,
        failure.column
    );
    eprintln!(
        "  {}--> {} (byte {}){}",
        scheme.location, location, failure.byte_offset, scheme.reset
    );

    // Calculate line number width (minimum 3 chars for alignment)
    let snippet = &failure.snippet;
    let line_num_width = failure.line.to_string().len().max(3);
    let blank_padding = " ".repeat(line_num_width + 2);

    eprintln!("{}{}|{}", blank_padding, scheme.line_num, scheme.reset);
    eprintln!(
        " {}{:>width$}{} {}|{} {}",
        scheme.line_num,
        failure.line,
        scheme.reset,
        scheme.line_num,
        scheme.reset,
        snippet.line_content,
        width = line_num_width
    );

    let padding = " ".repeat(snippet.caret_offset);
    let carets = "^".repeat(snippet.caret_width.max(1));
    let hint = match format_hint(failure.validity) {
        Some(h) => format!(" {}{}{}", scheme.message, h, scheme.reset),
        None => String::new(),
    };
    eprintln!(
        "{}{}|{} {}{}{}{}{}",
        blank_padding,
        scheme.line_num,
        scheme.reset,
        padding,
        scheme.caret,
        carets,
        scheme.reset,
        hint
    );

    eprintln!();
}

/// Headline for a UTF-8 error, naming the byte at fault.
fn utf8_message(err: &Utf8Error, input: &[u8]) -> String {
    let description = err.kind.description();
    let fault = err.offset + err.units;

    match err.kind {
        Utf8ErrorKind::InvalidLeadByte => {
            format!("{}: {}", description, utf8::format_byte(input[err.offset]))
        }
        Utf8ErrorKind::InvalidContinuationByte => match input.get(fault) {
            Some(&byte) => format!(
                "{}: {} after 0x{:02X}",
                description,
                utf8::format_byte(byte),
                input[err.offset]
            ),
            None => description.to_string(),
        },
        Utf8ErrorKind::PrematureEnd if fault < input.len() => {
            format!("{} (NUL byte at offset {})", description, fault)
        }
        Utf8ErrorKind::PrematureEnd => format!("{} (end of input)", description),
        _ => description.to_string(),
    }
}

/// Additional hint for an error outcome.
fn format_hint(validity: Validity) -> Option<&'static str> {
    match validity {
        Validity::Utf8(Outcome::Invalid(kind)) => match kind {
            Utf8ErrorKind::InvalidLeadByte => Some("bytes 0x80-0xBF are continuation bytes"),
            Utf8ErrorKind::InvalidContinuationByte => Some("expected byte 0x80-0xBF"),
            Utf8ErrorKind::Overlong2Byte
            | Utf8ErrorKind::Overlong3Byte
            | Utf8ErrorKind::Overlong4Byte => Some("use shortest possible encoding"),
            Utf8ErrorKind::SurrogatePair => Some("U+D800-U+DFFF are reserved for UTF-16"),
            Utf8ErrorKind::OutOfRange => Some("maximum is U+10FFFF"),
            Utf8ErrorKind::PrematureEnd => None,
        },
        Validity::Utf16(Outcome::Invalid(kind)) => match kind {
            Utf16ErrorKind::UnpairedHigh => Some("expected a low surrogate 0xDC00-0xDFFF"),
            Utf16ErrorKind::UnpairedLow => Some("a low surrogate must follow 0xD800-0xDBFF"),
            Utf16ErrorKind::OddLength => Some("UTF-16 data is a whole number of 2-byte units"),
            Utf16ErrorKind::PrematureEnd => None,
        },
        Validity::Utf32(Outcome::Invalid(kind)) => match kind {
            Utf32ErrorKind::OutOfRange => Some("maximum is U+10FFFF"),
            Utf32ErrorKind::Surrogate => Some("U+D800-U+DFFF are not scalar values"),
            Utf32ErrorKind::OddLength => Some("UTF-32 data is a whole number of 4-byte units"),
        },
        _ => None,
    }
}

/// Maximum displayed line width, in characters.
const MAX_WIDTH: usize = 80;

/// Units shown on either side of a UTF-16/32 error.
const CONTEXT_UNITS: usize = 6;

/// The text line holding the malformed UTF-8 sequence at `offset`.
///
/// The caret sits under the replacement characters the sequence renders as.
fn text_snippet(input: &[u8], offset: usize, len: usize) -> ErrorSnippet {
    let line_start = input[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let line_end = input[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(input.len(), |i| offset + i);
    let bad_end = (offset + len).min(line_end);

    let line: Vec<char> = String::from_utf8_lossy(&input[line_start..line_end])
        .chars()
        .collect();
    // Everything before the error is well-formed
    let error_col = String::from_utf8_lossy(&input[line_start..offset])
        .chars()
        .count();
    let caret_width = String::from_utf8_lossy(&input[offset..bad_end])
        .chars()
        .count();

    if line.len() <= MAX_WIDTH {
        return ErrorSnippet {
            line_content: line.into_iter().collect(),
            caret_offset: error_col,
            caret_width,
        };
    }

    // Truncate long lines around the error
    let start = error_col
        .saturating_sub(MAX_WIDTH / 2)
        .min(line.len() - MAX_WIDTH);
    let end = start + MAX_WIDTH;
    let mut line_content = String::new();
    let mut caret_offset = error_col - start;
    if start > 0 {
        line_content.push_str("...");
        caret_offset += 3;
    }
    line_content.extend(&line[start..end]);
    if end < line.len() {
        line_content.push_str("...");
    }

    ErrorSnippet {
        line_content,
        caret_offset,
        caret_width,
    }
}

/// A hex dump of the units around unit `offset`, with trailing partial
/// bytes shown as a final cell.
fn unit_snippet(
    units: &[u32],
    tail: &[u8],
    offset: usize,
    len: usize,
    width: usize,
) -> ErrorSnippet {
    let start = offset.saturating_sub(CONTEXT_UNITS);
    let end = (offset + len + CONTEXT_UNITS).min(units.len());

    let mut cells: Vec<String> = units[start..end]
        .iter()
        .map(|unit| format!("{:0digits$X}", unit, digits = width * 2))
        .collect();
    if end == units.len() && !tail.is_empty() {
        cells.push(tail.iter().map(|b| format!("{:02X}", b)).collect());
    }

    let caret_offset: usize = cells[..offset - start].iter().map(|c| c.len() + 1).sum();
    let caret_width = cells[offset - start..]
        .iter()
        .take(len)
        .map(|c| c.len() + 1)
        .sum::<usize>()
        .saturating_sub(1);

    ErrorSnippet {
        line_content: cells.join(" "),
        caret_offset,
        caret_width,
    }
}
