//! UTF-8 validation with detailed error reporting.
//!
//! This module provides UTF-8 validation that reports:
//! - The exact byte offset of the malformed sequence
//! - The line number (1-indexed)
//! - The column number (1-indexed, in bytes)
//! - The specific type of UTF-8 violation
//!
//! ## UTF-8 Encoding Rules
//!
//! UTF-8 is a variable-width encoding that uses 1-4 bytes per character:
//!
//! | Bytes | First byte    | Continuation bytes | Code point range     |
//! |-------|---------------|-------------------|----------------------|
//! | 1     | `0xxxxxxx`    | -                 | U+0000 - U+007F      |
//! | 2     | `110xxxxx`    | `10xxxxxx`        | U+0080 - U+07FF      |
//! | 3     | `1110xxxx`    | `10xxxxxx` × 2    | U+0800 - U+FFFF      |
//! | 4     | `11110xxx`    | `10xxxxxx` × 3    | U+10000 - U+10FFFF   |
//!
//! ## Validation Checks
//!
//! A sequence is checked in stages, and the first failing stage decides the
//! error:
//! 1. **Invalid lead bytes**: 0x80-0xBF or 0xF8-0xFF where a lead byte is expected
//! 2. **Premature end**: the input (or an embedded NUL) ends the sequence
//! 3. **Invalid continuation bytes**: non-continuation bytes where continuation expected
//! 4. **Overlong encodings**: using more bytes than necessary
//! 5. **Out of range**: code points above U+10FFFF
//! 6. **Surrogate code points**: U+D800-U+DFFF (reserved for UTF-16)
//!
//! Stage 2 scans every continuation position for a NUL before stage 3 looks
//! at any of them, so `E2 41` at the end of input is a premature end. The
//! malformed sequence occupies the bytes up to (not including) the byte that
//! failed.
//!
//! Decoding a malformed sequence yields U+FFFD and consumes a single byte;
//! the bytes after it are decoded afresh.

use alloc::string::String;

use super::{is_scalar_value, CharCheck, UnicodeFormat, ValidationError, REPLACEMENT_CHARACTER};
use crate::encoding::Family;
use crate::outcome::{Outcome, Utf8ErrorKind, Validity};

/// Error information for UTF-8 validation failures.
pub type Utf8Error = ValidationError<Utf8ErrorKind>;

/// UTF-8 bytes of U+FFFD.
pub const REPLACEMENT_BYTES: [u8; 3] = [0xEF, 0xBF, 0xBD];

/// UTF-8: byte units, one to four per scalar value.
#[derive(Debug, Clone, Copy)]
pub enum Utf8 {}

impl UnicodeFormat for Utf8 {
    type Unit = u8;
    type ErrorKind = Utf8ErrorKind;

    const FAMILY: Family = Family::Utf8;
    const MAX_UNITS: usize = 4;
    const REPLACEMENT: &'static [u8] = &REPLACEMENT_BYTES;
    const ODD_LENGTH: Option<Utf8ErrorKind> = None;

    #[inline]
    fn check_char(units: &[u8], pos: usize) -> CharCheck<Utf8ErrorKind> {
        check_sequence(units, pos)
    }

    fn decode_one(units: &[u8], pos: usize) -> (u32, usize) {
        let check = check_sequence(units, pos);
        if !check.is_valid() {
            return (REPLACEMENT_CHARACTER, 1);
        }
        (decode_checked(&units[pos..pos + check.units]), check.units)
    }

    fn encode_one(dest: &mut [u8], cp: u32) -> usize {
        match encode_code_point(cp) {
            Some((bytes, len)) => {
                dest[..len].copy_from_slice(&bytes[..len]);
                len
            }
            None => {
                dest[..REPLACEMENT_BYTES.len()].copy_from_slice(&REPLACEMENT_BYTES);
                REPLACEMENT_BYTES.len()
            }
        }
    }

    #[inline]
    fn validity(outcome: Outcome<Utf8ErrorKind>) -> Validity {
        Validity::Utf8(outcome)
    }
}

/// Validate that the input is valid UTF-8.
///
/// Returns the number of characters if the input is valid UTF-8, or an
/// `Err(Utf8Error)` with detailed information about the first validation
/// error.
///
/// # Examples
///
/// ```
/// use reencoder::text::utf8::validate_utf8;
///
/// // Valid ASCII
/// assert_eq!(validate_utf8(b"Hello, world!"), Ok(13));
///
/// // Valid multi-byte UTF-8
/// assert!(validate_utf8("日本語".as_bytes()).is_ok());
/// assert!(validate_utf8("émoji: 🎉".as_bytes()).is_ok());
///
/// // Invalid: bare continuation byte
/// assert!(validate_utf8(&[0x80]).is_err());
///
/// // Invalid: truncated sequence
/// assert!(validate_utf8(&[0xC2]).is_err());
/// ```
#[inline]
pub fn validate_utf8(input: &[u8]) -> Result<usize, Utf8Error> {
    super::validate::<Utf8>(input)
}

/// Check the sequence starting at `input[pos]`.
///
/// Bytes beyond the end of `input` read as NUL, so a sequence cut off by the
/// end of the slice is a premature end, exactly like one cut off by an
/// embedded NUL.
pub fn check_sequence(input: &[u8], pos: usize) -> CharCheck<Utf8ErrorKind> {
    let lead = input[pos];
    let seq_len = match sequence_length(lead) {
        0 => return CharCheck::invalid(Utf8ErrorKind::InvalidLeadByte, 1),
        1 => return CharCheck::valid(1),
        n => n,
    };

    let mut seq = [0u8; 4];
    for (i, slot) in seq.iter_mut().enumerate().take(seq_len) {
        *slot = input.get(pos + i).copied().unwrap_or(0);
    }

    // A NUL anywhere before the nominal end truncates the sequence
    if let Some(i) = (1..seq_len).find(|&i| seq[i] == 0x00) {
        return CharCheck::invalid(Utf8ErrorKind::PrematureEnd, i);
    }

    if let Some(i) = (1..seq_len).find(|&i| !is_continuation_byte(seq[i])) {
        return CharCheck::invalid(Utf8ErrorKind::InvalidContinuationByte, i);
    }

    let second = seq[1];
    match seq_len {
        // Lead byte 0xC0 or 0xC1 would encode < 0x80
        2 if lead < 0xC2 => CharCheck::invalid(Utf8ErrorKind::Overlong2Byte, 2),
        // E0 80..9F would encode < 0x800
        3 if lead == 0xE0 && second < 0xA0 => {
            CharCheck::invalid(Utf8ErrorKind::Overlong3Byte, 3)
        }
        // ED A0..BF encodes U+D800-U+DFFF
        3 if lead == 0xED && second >= 0xA0 => {
            CharCheck::invalid(Utf8ErrorKind::SurrogatePair, 3)
        }
        // F0 80..8F would encode < 0x10000
        4 if lead == 0xF0 && second < 0x90 => {
            CharCheck::invalid(Utf8ErrorKind::Overlong4Byte, 4)
        }
        // F5..F7, or F4 90..BF, encode > U+10FFFF
        4 if lead > 0xF4 || (lead == 0xF4 && second > 0x8F) => {
            CharCheck::invalid(Utf8ErrorKind::OutOfRange, 4)
        }
        n => CharCheck::valid(n),
    }
}

/// Check if a byte is a valid UTF-8 continuation byte (0x80-0xBF).
#[inline(always)]
pub fn is_continuation_byte(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// Get the expected sequence length from a lead byte.
/// Returns 0 for invalid lead bytes (continuation bytes or 0xF8+).
#[inline]
pub fn sequence_length(lead_byte: u8) -> usize {
    match lead_byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0, // Invalid lead byte
    }
}

/// True if any byte of `input` is outside ASCII.
#[inline]
pub fn contains_multibyte(input: &[u8]) -> bool {
    !input.is_ascii()
}

/// Decode a UTF-8 code point from a byte slice.
///
/// Returns `None` if the input is empty or starts with a malformed sequence.
/// On success, returns the decoded code point and the number of bytes consumed.
///
/// # Examples
///
/// ```
/// use reencoder::text::utf8::decode_code_point;
///
/// // ASCII
/// assert_eq!(decode_code_point(b"A"), Some(('A' as u32, 1)));
///
/// // Multi-byte
/// assert_eq!(decode_code_point("日".as_bytes()), Some((0x65E5, 3)));
///
/// // Empty input and overlong NUL
/// assert_eq!(decode_code_point(b""), None);
/// assert_eq!(decode_code_point(&[0xC0, 0x80]), None);
/// ```
pub fn decode_code_point(input: &[u8]) -> Option<(u32, usize)> {
    if input.is_empty() {
        return None;
    }

    let check = check_sequence(input, 0);
    if !check.is_valid() {
        return None;
    }

    Some((decode_checked(&input[..check.units]), check.units))
}

/// Assemble the code point of a sequence that passed [`check_sequence`].
#[inline]
fn decode_checked(seq: &[u8]) -> u32 {
    let lead = seq[0] as u32;
    match seq.len() {
        1 => lead,
        2 => ((lead & 0x1F) << 6) | (seq[1] as u32 & 0x3F),
        3 => ((lead & 0x0F) << 12) | ((seq[1] as u32 & 0x3F) << 6) | (seq[2] as u32 & 0x3F),
        _ => {
            ((lead & 0x07) << 18)
                | ((seq[1] as u32 & 0x3F) << 12)
                | ((seq[2] as u32 & 0x3F) << 6)
                | (seq[3] as u32 & 0x3F)
        }
    }
}

/// Encode a Unicode code point as UTF-8.
///
/// Returns `None` if the code point is invalid (surrogate or > U+10FFFF).
/// On success, returns the UTF-8 bytes and the number of bytes used.
///
/// # Examples
///
/// ```
/// use reencoder::text::utf8::encode_code_point;
///
/// // ASCII
/// let (bytes, len) = encode_code_point(0x41).unwrap();
/// assert_eq!(&bytes[..len], b"A");
///
/// // 2-byte character (é)
/// let (bytes, len) = encode_code_point(0xE9).unwrap();
/// assert_eq!(&bytes[..len], "é".as_bytes());
///
/// // 4-byte character (🎉)
/// let (bytes, len) = encode_code_point(0x1F389).unwrap();
/// assert_eq!(&bytes[..len], "🎉".as_bytes());
///
/// // Invalid: surrogate
/// assert!(encode_code_point(0xD800).is_none());
///
/// // Invalid: out of range
/// assert!(encode_code_point(0x110000).is_none());
/// ```
pub fn encode_code_point(cp: u32) -> Option<([u8; 4], usize)> {
    if !is_scalar_value(cp) {
        return None;
    }

    let mut buf = [0u8; 4];

    let len = if cp < 0x80 {
        buf[0] = cp as u8;
        1
    } else if cp < 0x800 {
        buf[0] = 0xC0 | ((cp >> 6) as u8);
        buf[1] = 0x80 | ((cp & 0x3F) as u8);
        2
    } else if cp < 0x10000 {
        buf[0] = 0xE0 | ((cp >> 12) as u8);
        buf[1] = 0x80 | (((cp >> 6) & 0x3F) as u8);
        buf[2] = 0x80 | ((cp & 0x3F) as u8);
        3
    } else {
        buf[0] = 0xF0 | ((cp >> 18) as u8);
        buf[1] = 0x80 | (((cp >> 12) & 0x3F) as u8);
        buf[2] = 0x80 | (((cp >> 6) & 0x3F) as u8);
        buf[3] = 0x80 | ((cp & 0x3F) as u8);
        4
    };

    Some((buf, len))
}

/// Format a byte as a human-readable string for error messages.
pub fn format_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        alloc::format!("0x{:02X} ({:?})", byte, byte as char)
    } else {
        alloc::format!("0x{:02X}", byte)
    }
}
