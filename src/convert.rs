//! Cross-encoding conversion.
//!
//! [`convert`] validates the whole source first. Malformed input is never
//! transcoded: the result is a descriptor in the source encoding that
//! carries the error. Valid input is decoded one character at a time and
//! re-encoded into a growing target buffer, then wrapped through the target
//! encoding's parse path, which validates again and stores the units in the
//! target byte order.
//!
//! ```
//! use reencoder::{convert, Encoding};
//!
//! let utf16 = convert(Encoding::Utf8, Encoding::Utf16Le, "hé🎉".as_bytes())?;
//! assert_eq!(utf16.as_bytes(), &[0x68, 0x00, 0xE9, 0x00, 0x3C, 0xD8, 0x89, 0xDF]);
//! assert_eq!(utf16.char_count(), 3);
//!
//! // Malformed input comes back in the source encoding
//! let bad = convert(Encoding::Utf8, Encoding::Utf32Be, &[0xC0, 0x80])?;
//! assert_eq!(bad.encoding(), Encoding::Utf8);
//! assert!(!bad.is_valid());
//! # Ok::<(), reencoder::Error>(())
//! ```

use alloc::vec::Vec;
use log::debug;

use crate::buffer::{GrowBuffer, GrowthPolicy};
use crate::encoding::{Encoding, Family};
use crate::endian::units_from_bytes;
use crate::error::{expect_family, Result};
use crate::string::UnicodeString;
use crate::text::{self, CodeUnit, UnicodeFormat, Utf16, Utf32, Utf8};

/// Convert `input`, stored in `source`'s byte order, to `target`.
pub fn convert(source: Encoding, target: Encoding, input: &[u8]) -> Result<UnicodeString> {
    convert_with(&GrowthPolicy::default(), source, target, input)
}

/// [`convert`] with an explicit output growth policy.
pub fn convert_with(
    policy: &GrowthPolicy,
    source: Encoding,
    target: Encoding,
    input: &[u8],
) -> Result<UnicodeString> {
    match source.family() {
        Family::Utf8 => convert_units_with::<Utf8>(policy, input, source, target),
        Family::Utf16 => convert_bytes::<Utf16>(policy, input, source, target),
        Family::Utf32 => convert_bytes::<Utf32>(policy, input, source, target),
    }
}

fn convert_bytes<S: UnicodeFormat>(
    policy: &GrowthPolicy,
    input: &[u8],
    source: Encoding,
    target: Encoding,
) -> Result<UnicodeString> {
    if input.len() % <S::Unit as CodeUnit>::WIDTH != 0 {
        debug!(
            "rejecting {} input of {} bytes: not a whole number of units",
            source,
            input.len()
        );
        return UnicodeString::parse(input, source);
    }

    let units = units_from_bytes::<S::Unit>(input, source.endian())?;
    convert_units_with::<S>(policy, &units, source, target)
}

/// Convert native-endian units of family `S`, declared as `source`, to
/// `target`.
pub fn convert_units<S: UnicodeFormat>(
    units: &[S::Unit],
    source: Encoding,
    target: Encoding,
) -> Result<UnicodeString> {
    convert_units_with::<S>(&GrowthPolicy::default(), units, source, target)
}

/// [`convert_units`] with an explicit output growth policy.
pub fn convert_units_with<S: UnicodeFormat>(
    policy: &GrowthPolicy,
    units: &[S::Unit],
    source: Encoding,
    target: Encoding,
) -> Result<UnicodeString> {
    expect_family(source, S::FAMILY)?;

    if let Err(err) = text::validate::<S>(units) {
        debug!("rejecting malformed {} input: {}", source, err);
        return UnicodeString::from_units::<S>(units, source);
    }

    debug!("converting {} {} units to {}", units.len(), source, target);
    let converted = match target.family() {
        Family::Utf8 => finish::<S, Utf8>(policy, units, target),
        Family::Utf16 => finish::<S, Utf16>(policy, units, target),
        Family::Utf32 => finish::<S, Utf32>(policy, units, target),
    }?;
    debug!(
        "converted to {} bytes of {} ({} characters)",
        converted.byte_len(),
        target,
        converted.char_count()
    );

    Ok(converted)
}

fn finish<S: UnicodeFormat, T: UnicodeFormat>(
    policy: &GrowthPolicy,
    units: &[S::Unit],
    target: Encoding,
) -> Result<UnicodeString> {
    let out = transcode::<S, T>(units, policy)?;
    UnicodeString::from_units::<T>(content(&out), target)
}

/// The units before the terminator.
#[inline]
pub(crate) fn content<U>(terminated: &[U]) -> &[U] {
    terminated.split_last().map_or(terminated, |(_, rest)| rest)
}

/// Re-encode every character of `src` as family `T`.
///
/// Malformed source characters become U+FFFD. The returned units end with a
/// single zero terminator unit that is not part of the content.
pub fn transcode<S: UnicodeFormat, T: UnicodeFormat>(
    src: &[S::Unit],
    policy: &GrowthPolicy,
) -> Result<Vec<T::Unit>> {
    let mut out = GrowBuffer::<T::Unit>::new(policy.clone());
    let mut read = 0;
    let mut written = 0;

    while read < src.len() {
        let (cp, used) = S::decode_one(src, read);
        read += used;

        out.ensure_capacity(written + T::MAX_UNITS)?;
        written += T::encode_one(&mut out.as_mut_slice()[written..], cp);
    }

    if out.capacity() <= written {
        out.grow_one()?;
    }
    out.as_mut_slice()[written] = <T::Unit as CodeUnit>::ZERO;

    Ok(out.into_units(written + 1))
}
