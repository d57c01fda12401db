//! Per-format validators and code-point codecs.
//!
//! Each encoding family implements [`UnicodeFormat`]: a bounded
//! single-character validity check, a decoder and an encoder, all working on
//! native-endian code units. Whole-sequence validation ([`validate`]) is
//! generic over the format and fails fast on the first malformed character.
//!
//! ```
//! use reencoder::text::{validate, Utf16, Utf8};
//! use reencoder::Utf16ErrorKind;
//!
//! // Valid UTF-8: the character count is returned
//! assert_eq!(validate::<Utf8>("日本語".as_bytes()), Ok(3));
//!
//! // A lone low surrogate
//! let err = validate::<Utf16>(&[0x0041, 0xDC00]).unwrap_err();
//! assert_eq!(err.kind, Utf16ErrorKind::UnpairedLow);
//! assert_eq!(err.offset, 1);
//! ```
//!
//! ## Forward progress
//!
//! Every check and every decode consumes at least one unit, including for
//! malformed input, so any loop over a buffer of `N` units finishes in at
//! most `N` steps.

pub mod unit;
pub mod utf16;
pub mod utf32;
pub mod utf8;

use alloc::vec::Vec;

pub use unit::CodeUnit;
pub use utf16::Utf16;
pub use utf32::Utf32;
pub use utf8::Utf8;

use crate::encoding::{Endian, Family};
use crate::endian::units_from_bytes;
use crate::error::Result;
use crate::outcome::{ErrorKind, Outcome, Validity};

/// U+FFFD, substituted for anything that cannot be decoded or encoded.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// The largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

const LINE_FEED: u32 = 0x0A;

/// True if `cp` is a Unicode scalar value: at most U+10FFFF and not a
/// surrogate.
#[inline]
pub const fn is_scalar_value(cp: u32) -> bool {
    cp <= MAX_CODE_POINT && !(cp >= 0xD800 && cp <= 0xDFFF)
}

/// Result of checking the character that starts at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCheck<K> {
    /// The error, or `None` if the character is well-formed.
    pub error: Option<K>,
    /// Units the character occupies. Never zero. For malformed input this
    /// may be less than the length the lead unit announced.
    pub units: usize,
}

impl<K> CharCheck<K> {
    #[inline]
    pub(crate) const fn valid(units: usize) -> Self {
        Self { error: None, units }
    }

    #[inline]
    pub(crate) const fn invalid(kind: K, units: usize) -> Self {
        Self {
            error: Some(kind),
            units,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// An encoding family's validity rules and code-point codec.
pub trait UnicodeFormat {
    /// Code unit of the family.
    type Unit: CodeUnit;

    /// Structural errors the family reports.
    type ErrorKind: ErrorKind;

    const FAMILY: Family;

    /// Most units one scalar value can occupy.
    const MAX_UNITS: usize;

    /// Encoding of U+FFFD.
    const REPLACEMENT: &'static [Self::Unit];

    /// Error for byte input whose length is not a multiple of the unit
    /// width, for multi-byte units.
    const ODD_LENGTH: Option<Self::ErrorKind>;

    /// Check the character starting at `units[pos]`, never reading past the
    /// end of `units`. `pos` must be in bounds.
    fn check_char(units: &[Self::Unit], pos: usize) -> CharCheck<Self::ErrorKind>;

    /// Decode the character starting at `units[pos]`.
    ///
    /// Malformed input decodes to U+FFFD. The returned unit count is never
    /// zero.
    fn decode_one(units: &[Self::Unit], pos: usize) -> (u32, usize);

    /// Encode `cp` at the start of `dest` and return the units written.
    ///
    /// Values that are not scalar values are written as
    /// [`REPLACEMENT`](Self::REPLACEMENT). `dest` must hold at least
    /// [`MAX_UNITS`](Self::MAX_UNITS) units.
    fn encode_one(dest: &mut [Self::Unit], cp: u32) -> usize;

    /// Tag a family outcome as a [`Validity`].
    fn validity(outcome: Outcome<Self::ErrorKind>) -> Validity;
}

/// Error information for validation failures.
///
/// Positions are in code units of the validated format: bytes for UTF-8,
/// 16-bit units for UTF-16, 32-bit units for UTF-32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError<K> {
    /// Offset of the first unit of the malformed character (0-indexed).
    pub offset: usize,
    /// Number of units the malformed character occupies (at least 1).
    pub units: usize,
    /// The line number where the error occurred (1-indexed).
    pub line: usize,
    /// The column (unit position within the line, 1-indexed).
    pub column: usize,
    /// The kind of error.
    pub kind: K,
}

impl<K: core::fmt::Display> core::fmt::Display for ValidationError<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at offset {}, line {}, column {}",
            self.kind, self.offset, self.line, self.column
        )
    }
}

#[cfg(any(test, feature = "std"))]
impl<K: core::fmt::Debug + core::fmt::Display> std::error::Error for ValidationError<K> {}

/// Validate a whole sequence of native-endian units.
///
/// Returns the number of characters on success, or the first error.
pub fn validate<F: UnicodeFormat>(
    units: &[F::Unit],
) -> core::result::Result<usize, ValidationError<F::ErrorKind>> {
    let mut pos = 0;
    let mut chars = 0;
    let mut line = 1;
    let mut line_start = 0;

    while pos < units.len() {
        // Track newlines for error reporting
        if pos > 0 && units[pos - 1].to_u32() == LINE_FEED {
            line += 1;
            line_start = pos;
        }

        let check = F::check_char(units, pos);
        if let Some(kind) = check.error {
            return Err(ValidationError {
                offset: pos,
                units: check.units,
                line,
                column: pos - line_start + 1,
                kind,
            });
        }

        pos += check.units;
        chars += 1;
    }

    Ok(chars)
}

/// Validate a byte stream holding units in byte order `endian`.
///
/// A length that is not a multiple of the unit width is rejected before any
/// character is examined; the error then points at the trailing partial
/// unit.
pub fn validate_bytes<F: UnicodeFormat>(
    bytes: &[u8],
    endian: Endian,
) -> Result<core::result::Result<usize, ValidationError<F::ErrorKind>>> {
    let units: Vec<F::Unit> = units_from_bytes(bytes, endian)?;

    if bytes.len() % <F::Unit as CodeUnit>::WIDTH != 0 {
        if let Some(kind) = F::ODD_LENGTH {
            let offset = units.len();
            let (line, column) = locate(&units, offset);
            return Ok(Err(ValidationError {
                offset,
                units: 1,
                line,
                column,
                kind,
            }));
        }
    }

    Ok(validate::<F>(&units))
}

/// Line and column (both 1-indexed) of unit `offset`.
fn locate<U: CodeUnit>(units: &[U], offset: usize) -> (usize, usize) {
    let prefix = &units[..offset.min(units.len())];
    let line = 1 + prefix
        .iter()
        .filter(|unit| unit.to_u32() == LINE_FEED)
        .count();
    let line_start = prefix
        .iter()
        .rposition(|unit| unit.to_u32() == LINE_FEED)
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

/// Whole-sequence validation as a [`Validity`], plus the character count
/// (zero unless valid).
pub fn validity_of<F: UnicodeFormat>(units: &[F::Unit]) -> (Validity, usize) {
    match validate::<F>(units) {
        Ok(chars) => (F::validity(Outcome::Valid), chars),
        Err(err) => (F::validity(Outcome::Invalid(err.kind)), 0),
    }
}
