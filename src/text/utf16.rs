//! UTF-16 validation and surrogate-pair coding.
//!
//! Units outside U+D800-U+DFFF stand for themselves. A high surrogate
//! (U+D800-U+DBFF) must be followed by a low surrogate (U+DC00-U+DFFF); the
//! pair encodes one supplementary-plane code point.

use super::{CharCheck, UnicodeFormat, ValidationError, REPLACEMENT_CHARACTER};
use crate::encoding::Family;
use crate::outcome::{Outcome, Utf16ErrorKind, Validity};

/// Error information for UTF-16 validation failures.
pub type Utf16Error = ValidationError<Utf16ErrorKind>;

/// UTF-16: 16-bit units, one or two per scalar value.
#[derive(Debug, Clone, Copy)]
pub enum Utf16 {}

#[inline]
pub const fn is_high_surrogate(unit: u16) -> bool {
    unit >= 0xD800 && unit <= 0xDBFF
}

#[inline]
pub const fn is_low_surrogate(unit: u16) -> bool {
    unit >= 0xDC00 && unit <= 0xDFFF
}

#[inline]
pub const fn is_surrogate(unit: u16) -> bool {
    unit >= 0xD800 && unit <= 0xDFFF
}

impl UnicodeFormat for Utf16 {
    type Unit = u16;
    type ErrorKind = Utf16ErrorKind;

    const FAMILY: Family = Family::Utf16;
    const MAX_UNITS: usize = 2;
    const REPLACEMENT: &'static [u16] = &[0xFFFD];
    const ODD_LENGTH: Option<Utf16ErrorKind> = Some(Utf16ErrorKind::OddLength);

    fn check_char(units: &[u16], pos: usize) -> CharCheck<Utf16ErrorKind> {
        let first = units[pos];
        if !is_surrogate(first) {
            return CharCheck::valid(1);
        }
        if is_low_surrogate(first) {
            return CharCheck::invalid(Utf16ErrorKind::UnpairedLow, 1);
        }

        match units.get(pos + 1) {
            None => CharCheck::invalid(Utf16ErrorKind::PrematureEnd, 1),
            Some(&second) if is_low_surrogate(second) => CharCheck::valid(2),
            Some(_) => CharCheck::invalid(Utf16ErrorKind::UnpairedHigh, 1),
        }
    }

    fn decode_one(units: &[u16], pos: usize) -> (u32, usize) {
        let check = Self::check_char(units, pos);
        match (check.error, check.units) {
            (Some(_), used) => (REPLACEMENT_CHARACTER, used),
            (None, 1) => (units[pos] as u32, 1),
            (None, used) => (combine_surrogates(units[pos], units[pos + 1]), used),
        }
    }

    fn encode_one(dest: &mut [u16], cp: u32) -> usize {
        match encode_code_point(cp) {
            Some((pair, len)) => {
                dest[..len].copy_from_slice(&pair[..len]);
                len
            }
            None => {
                dest[0] = REPLACEMENT_CHARACTER as u16;
                1
            }
        }
    }

    #[inline]
    fn validity(outcome: Outcome<Utf16ErrorKind>) -> Validity {
        Validity::Utf16(outcome)
    }
}

/// Validate native-endian UTF-16 units, returning the character count.
///
/// ```
/// use reencoder::text::utf16::validate_utf16;
/// use reencoder::Utf16ErrorKind;
///
/// assert_eq!(validate_utf16(&[0x0041, 0xD83C, 0xDF89]), Ok(2));
/// assert_eq!(
///     validate_utf16(&[0xD83C]).unwrap_err().kind,
///     Utf16ErrorKind::PrematureEnd
/// );
/// ```
#[inline]
pub fn validate_utf16(units: &[u16]) -> Result<usize, Utf16Error> {
    super::validate::<Utf16>(units)
}

/// Code point of a high/low surrogate pair.
#[inline]
pub fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x10000 + (((high as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00)
}

/// Encode a code point as one unit or a surrogate pair.
///
/// Returns `None` for surrogates and values above U+10FFFF.
pub fn encode_code_point(cp: u32) -> Option<([u16; 2], usize)> {
    if !super::is_scalar_value(cp) {
        return None;
    }

    if cp < 0x10000 {
        return Some(([cp as u16, 0], 1));
    }

    let offset = cp - 0x10000;
    let high = 0xD800 | (offset >> 10) as u16;
    let low = 0xDC00 | (offset & 0x3FF) as u16;
    Some(([high, low], 2))
}

/// True if any character takes two units, that is if any unit is a
/// surrogate.
#[inline]
pub fn contains_multibyte(units: &[u16]) -> bool {
    units.iter().any(|&unit| is_surrogate(unit))
}
