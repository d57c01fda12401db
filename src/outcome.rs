//! Validity outcomes and their numeric codes.
//!
//! Each encoding family has its own set of structural errors
//! ([`Utf8ErrorKind`], [`Utf16ErrorKind`], [`Utf32ErrorKind`]). An
//! [`Outcome`] is either valid, valid after repair, or one of those errors,
//! and a [`Validity`] tags the outcome with its family.
//!
//! ## Codes
//!
//! Outcomes also have numeric codes in disjoint bands, so a bare code can be
//! rendered without knowing its encoding:
//!
//! | Family | Valid | Errors      | Repaired |
//! |--------|-------|-------------|----------|
//! | UTF-8  | 800   | 801 - 808   | 809      |
//! | UTF-16 | 1600  | 1601 - 1604 | 1605     |
//! | UTF-32 | 3200  | 3201 - 3203 | 3204     |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::encoding::{Encoding, Family};

/// Text rendered for codes and enum values outside every band.
pub const NO_DESCRIPTION: &str = "no description";

/// Band offset of UTF-8 outcome codes.
pub const UTF8_BAND: u32 = 800;
/// Band offset of UTF-16 outcome codes.
pub const UTF16_BAND: u32 = 1600;
/// Band offset of UTF-32 outcome codes.
pub const UTF32_BAND: u32 = 3200;

/// A family-specific structural error.
pub trait ErrorKind: Copy + Eq + core::fmt::Debug + core::fmt::Display + 'static {
    /// The family whose validator reports this error.
    const FAMILY: Family;

    /// Offset of the family's code band.
    const BAND: u32;

    /// Every error of the family, in code order.
    const ALL: &'static [Self];

    /// Human-readable description.
    fn description(self) -> &'static str;

    /// Position of the error within [`ALL`](Self::ALL).
    fn ordinal(self) -> u32;
}

/// Structural errors found by the UTF-8 validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Utf8ErrorKind {
    /// A byte that cannot start a sequence (0x80-0xBF, 0xF8-0xFF).
    InvalidLeadByte,

    /// The input (or an embedded NUL) ended the sequence early.
    PrematureEnd,

    /// A byte outside 0x80-0xBF appeared where a continuation byte was expected.
    InvalidContinuationByte,

    /// A 2-byte sequence encoding a value below U+0080 (lead 0xC0 or 0xC1).
    Overlong2Byte,

    /// A 3-byte sequence encoding a value below U+0800.
    Overlong3Byte,

    /// A 4-byte sequence encoding a value below U+10000.
    Overlong4Byte,

    /// A 4-byte sequence encoding a value above U+10FFFF.
    OutOfRange,

    /// A 3-byte sequence encoding a surrogate (U+D800-U+DFFF).
    SurrogatePair,
}

impl ErrorKind for Utf8ErrorKind {
    const FAMILY: Family = Family::Utf8;
    const BAND: u32 = UTF8_BAND;
    const ALL: &'static [Self] = &[
        Self::InvalidLeadByte,
        Self::PrematureEnd,
        Self::InvalidContinuationByte,
        Self::Overlong2Byte,
        Self::Overlong3Byte,
        Self::Overlong4Byte,
        Self::OutOfRange,
        Self::SurrogatePair,
    ];

    fn description(self) -> &'static str {
        match self {
            Self::InvalidLeadByte => "Invalid leading byte",
            Self::PrematureEnd => "String ended before the sequence completed",
            Self::InvalidContinuationByte => "Invalid continuation byte",
            Self::Overlong2Byte => "Overlong encoding for 2-byte sequence",
            Self::Overlong3Byte => "Overlong encoding for 3-byte sequence",
            Self::Overlong4Byte => "Overlong encoding for 4-byte sequence",
            Self::OutOfRange => "Out of valid Unicode range (U+10FFFF+)",
            Self::SurrogatePair => "Surrogate code point detected (U+D800-U+DFFF)",
        }
    }

    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Structural errors found by the UTF-16 validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Utf16ErrorKind {
    /// A high surrogate was the last unit of the input.
    PrematureEnd,

    /// A high surrogate was not followed by a low surrogate.
    UnpairedHigh,

    /// A low surrogate appeared without a preceding high surrogate.
    UnpairedLow,

    /// The byte length is not a multiple of two.
    OddLength,
}

impl ErrorKind for Utf16ErrorKind {
    const FAMILY: Family = Family::Utf16;
    const BAND: u32 = UTF16_BAND;
    const ALL: &'static [Self] = &[
        Self::PrematureEnd,
        Self::UnpairedHigh,
        Self::UnpairedLow,
        Self::OddLength,
    ];

    fn description(self) -> &'static str {
        match self {
            Self::PrematureEnd => "String ended before the surrogate pair completed",
            Self::UnpairedHigh => "Unpaired high surrogate",
            Self::UnpairedLow => "Unpaired low surrogate",
            Self::OddLength => "Byte length is not a multiple of 2",
        }
    }

    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Structural errors found by the UTF-32 validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Utf32ErrorKind {
    /// A unit above U+10FFFF.
    OutOfRange,

    /// A unit in the surrogate range U+D800-U+DFFF.
    Surrogate,

    /// The byte length is not a multiple of four.
    OddLength,
}

impl ErrorKind for Utf32ErrorKind {
    const FAMILY: Family = Family::Utf32;
    const BAND: u32 = UTF32_BAND;
    const ALL: &'static [Self] = &[Self::OutOfRange, Self::Surrogate, Self::OddLength];

    fn description(self) -> &'static str {
        match self {
            Self::OutOfRange => "Out of valid Unicode range (U+10FFFF+)",
            Self::Surrogate => "Surrogate code point detected (U+D800-U+DFFF)",
            Self::OddLength => "Byte length is not a multiple of 4",
        }
    }

    fn ordinal(self) -> u32 {
        self as u32
    }
}

macro_rules! display_via_description {
    ($($ty:ty),*) => {
        $(
            impl core::fmt::Display for $ty {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.write_str(self.description())
                }
            }
        )*
    };
}

display_via_description!(Utf8ErrorKind, Utf16ErrorKind, Utf32ErrorKind);

/// Validity of a string in one encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome<K> {
    /// Well-formed as given.
    Valid,
    /// Well-formed after malformed runs were replaced with U+FFFD.
    Repaired,
    /// Malformed; the first error found.
    Invalid(K),
}

impl<K: ErrorKind> Outcome<K> {
    /// Numeric code within the family's band.
    pub fn code(self) -> u32 {
        match self {
            Outcome::Valid => K::BAND,
            Outcome::Invalid(kind) => K::BAND + 1 + kind.ordinal(),
            Outcome::Repaired => K::BAND + 1 + K::ALL.len() as u32,
        }
    }

    /// Decode a code from this family's band.
    pub fn from_code(code: u32) -> Option<Self> {
        let offset = code.checked_sub(K::BAND)? as usize;
        match offset {
            0 => Some(Outcome::Valid),
            n if n <= K::ALL.len() => Some(Outcome::Invalid(K::ALL[n - 1])),
            n if n == K::ALL.len() + 1 => Some(Outcome::Repaired),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match (self, K::FAMILY) {
            (Outcome::Invalid(kind), _) => kind.description(),
            (Outcome::Valid, Family::Utf8) => "Well-formed UTF-8 string",
            (Outcome::Valid, Family::Utf16) => "Well-formed UTF-16 string",
            (Outcome::Valid, Family::Utf32) => "Well-formed UTF-32 string",
            (Outcome::Repaired, Family::Utf8) => "Well-formed UTF-8 string (repaired)",
            (Outcome::Repaired, Family::Utf16) => "Well-formed UTF-16 string (repaired)",
            (Outcome::Repaired, Family::Utf32) => "Well-formed UTF-32 string (repaired)",
        }
    }

    /// The error, if the outcome is not valid.
    #[inline]
    pub fn error(self) -> Option<K> {
        match self {
            Outcome::Invalid(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Outcome of validating, converting or repairing a string, tagged with its
/// encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Validity {
    Utf8(Outcome<Utf8ErrorKind>),
    Utf16(Outcome<Utf16ErrorKind>),
    Utf32(Outcome<Utf32ErrorKind>),
}

impl Validity {
    /// The valid outcome for `family`.
    pub const fn valid(family: Family) -> Self {
        match family {
            Family::Utf8 => Validity::Utf8(Outcome::Valid),
            Family::Utf16 => Validity::Utf16(Outcome::Valid),
            Family::Utf32 => Validity::Utf32(Outcome::Valid),
        }
    }

    /// The repaired outcome for `family`.
    pub const fn repaired(family: Family) -> Self {
        match family {
            Family::Utf8 => Validity::Utf8(Outcome::Repaired),
            Family::Utf16 => Validity::Utf16(Outcome::Repaired),
            Family::Utf32 => Validity::Utf32(Outcome::Repaired),
        }
    }

    pub const fn family(self) -> Family {
        match self {
            Validity::Utf8(_) => Family::Utf8,
            Validity::Utf16(_) => Family::Utf16,
            Validity::Utf32(_) => Family::Utf32,
        }
    }

    /// True for both the valid and the repaired outcome.
    pub const fn is_valid(self) -> bool {
        !self.is_invalid()
    }

    /// True only for the repaired outcome.
    pub const fn is_repaired(self) -> bool {
        matches!(
            self,
            Validity::Utf8(Outcome::Repaired)
                | Validity::Utf16(Outcome::Repaired)
                | Validity::Utf32(Outcome::Repaired)
        )
    }

    /// True for any structural error.
    pub const fn is_invalid(self) -> bool {
        matches!(
            self,
            Validity::Utf8(Outcome::Invalid(_))
                | Validity::Utf16(Outcome::Invalid(_))
                | Validity::Utf32(Outcome::Invalid(_))
        )
    }

    /// Numeric code in the family's band.
    pub fn code(self) -> u32 {
        match self {
            Validity::Utf8(outcome) => outcome.code(),
            Validity::Utf16(outcome) => outcome.code(),
            Validity::Utf32(outcome) => outcome.code(),
        }
    }

    /// Decode a code from any band.
    pub fn from_code(code: u32) -> Option<Self> {
        Outcome::from_code(code)
            .map(Validity::Utf8)
            .or_else(|| Outcome::from_code(code).map(Validity::Utf16))
            .or_else(|| Outcome::from_code(code).map(Validity::Utf32))
    }

    /// Decode a code, accepting only the band of `encoding`'s family.
    pub fn from_code_in(encoding: Encoding, code: u32) -> Option<Self> {
        Self::from_code(code).filter(|validity| validity.family() == encoding.family())
    }

    pub fn description(self) -> &'static str {
        match self {
            Validity::Utf8(outcome) => outcome.description(),
            Validity::Utf16(outcome) => outcome.description(),
            Validity::Utf32(outcome) => outcome.description(),
        }
    }
}

impl core::fmt::Display for Validity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

impl From<Utf8ErrorKind> for Validity {
    fn from(kind: Utf8ErrorKind) -> Self {
        Validity::Utf8(Outcome::Invalid(kind))
    }
}

impl From<Utf16ErrorKind> for Validity {
    fn from(kind: Utf16ErrorKind) -> Self {
        Validity::Utf16(Outcome::Invalid(kind))
    }
}

impl From<Utf32ErrorKind> for Validity {
    fn from(kind: Utf32ErrorKind) -> Self {
        Validity::Utf32(Outcome::Invalid(kind))
    }
}

/// Render any outcome code as text.
///
/// Codes outside every band render as `"no description"`.
pub fn describe_outcome(code: u32) -> &'static str {
    Validity::from_code(code)
        .map(Validity::description)
        .unwrap_or(NO_DESCRIPTION)
}

/// Render an outcome code as text, accepting only the band of `encoding`.
pub fn describe_outcome_in(encoding: Encoding, code: u32) -> &'static str {
    Validity::from_code_in(encoding, code)
        .map(Validity::description)
        .unwrap_or(NO_DESCRIPTION)
}

/// Why a repair did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepairError {
    /// No descriptor was supplied.
    NoStruct,
    /// The descriptor is already valid or already repaired.
    NoOp,
    /// An allocation failed; the descriptor is unchanged.
    OutOfMemory,
}

impl core::fmt::Display for RepairError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoStruct => write!(f, "no string to repair"),
            Self::NoOp => write!(f, "string is already well-formed"),
            Self::OutOfMemory => write!(f, "memory allocation failed during repair"),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for RepairError {}
