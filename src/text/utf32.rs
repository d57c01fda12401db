//! UTF-32 validation. Every unit is one code point.

use super::{CharCheck, UnicodeFormat, ValidationError, MAX_CODE_POINT, REPLACEMENT_CHARACTER};
use crate::encoding::Family;
use crate::outcome::{Outcome, Utf32ErrorKind, Validity};

/// Error information for UTF-32 validation failures.
pub type Utf32Error = ValidationError<Utf32ErrorKind>;

/// UTF-32: one 32-bit unit per scalar value.
#[derive(Debug, Clone, Copy)]
pub enum Utf32 {}

impl UnicodeFormat for Utf32 {
    type Unit = u32;
    type ErrorKind = Utf32ErrorKind;

    const FAMILY: Family = Family::Utf32;
    const MAX_UNITS: usize = 1;
    const REPLACEMENT: &'static [u32] = &[REPLACEMENT_CHARACTER];
    const ODD_LENGTH: Option<Utf32ErrorKind> = Some(Utf32ErrorKind::OddLength);

    #[inline]
    fn check_char(units: &[u32], pos: usize) -> CharCheck<Utf32ErrorKind> {
        match units[pos] {
            cp if cp > MAX_CODE_POINT => CharCheck::invalid(Utf32ErrorKind::OutOfRange, 1),
            0xD800..=0xDFFF => CharCheck::invalid(Utf32ErrorKind::Surrogate, 1),
            _ => CharCheck::valid(1),
        }
    }

    #[inline]
    fn decode_one(units: &[u32], pos: usize) -> (u32, usize) {
        match Self::check_char(units, pos).error {
            None => (units[pos], 1),
            Some(_) => (REPLACEMENT_CHARACTER, 1),
        }
    }

    #[inline]
    fn encode_one(dest: &mut [u32], cp: u32) -> usize {
        dest[0] = if super::is_scalar_value(cp) {
            cp
        } else {
            REPLACEMENT_CHARACTER
        };
        1
    }

    #[inline]
    fn validity(outcome: Outcome<Utf32ErrorKind>) -> Validity {
        Validity::Utf32(outcome)
    }
}

/// Validate native-endian UTF-32 units, returning the character count.
#[inline]
pub fn validate_utf32(units: &[u32]) -> Result<usize, Utf32Error> {
    super::validate::<Utf32>(units)
}
