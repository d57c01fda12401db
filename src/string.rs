//! The Unicode string descriptor.
//!
//! A [`UnicodeString`] owns the bytes of a string in its declared encoding
//! and byte order, followed by a zero terminator of the encoding's unit
//! width. It records the validity of those bytes and, when they are
//! well-formed, the number of characters.
//!
//! Malformed input still produces a descriptor: the validity then names the
//! first error and the character count is zero.
//!
//! ```
//! use reencoder::{Encoding, UnicodeString};
//!
//! let s = UnicodeString::from_utf16_units(&[0x0048, 0xD83C, 0xDF89], Encoding::Utf16Be)?;
//! assert!(s.is_valid());
//! assert_eq!(s.char_count(), 2);
//! assert_eq!(s.as_bytes(), &[0x00, 0x48, 0xD8, 0x3C, 0xDF, 0x89]);
//! assert_eq!(s.as_bytes_with_terminator().len(), 8);
//! # Ok::<(), reencoder::Error>(())
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::encoding::{Encoding, Endian, Family};
use crate::endian::{units_from_bytes, write_units};
use crate::error::{expect_family, try_with_capacity, Result};
use crate::outcome::{Outcome, Validity};
use crate::text::{self, utf16, utf8, CodeUnit, UnicodeFormat, Utf16, Utf32, Utf8};

/// A string in one of the five Unicode encoding forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeString {
    encoding: Encoding,
    /// Content followed by the terminator.
    bytes: Vec<u8>,
    validity: Validity,
    char_count: usize,
    byte_len: usize,
}

impl UnicodeString {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Build a descriptor from native-endian units of family `F`, stored in
    /// the byte order of `target`.
    ///
    /// Fails with [`Error::EncodingMismatch`](crate::Error::EncodingMismatch)
    /// if `target` is not in `F`'s family.
    pub fn from_units<F: UnicodeFormat>(units: &[F::Unit], target: Encoding) -> Result<Self> {
        expect_family(target, F::FAMILY)?;

        let (validity, char_count) = text::validity_of::<F>(units);
        let byte_len = units.len() * <F::Unit as CodeUnit>::WIDTH;
        let mut bytes = try_with_capacity(byte_len + target.terminator_width())?;
        bytes.resize(byte_len + target.terminator_width(), 0);
        write_units(&mut bytes, units, target.endian());

        Ok(Self {
            encoding: target,
            bytes,
            validity,
            char_count,
            byte_len,
        })
    }

    /// Build a UTF-8 descriptor.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        Self::from_units::<Utf8>(bytes, Encoding::Utf8)
    }

    /// Build a UTF-16 descriptor from native-endian units, stored in the byte
    /// order of `target`.
    pub fn from_utf16_units(units: &[u16], target: Encoding) -> Result<Self> {
        Self::from_units::<Utf16>(units, target)
    }

    /// Build a UTF-32 descriptor from native-endian units, stored in the byte
    /// order of `target`.
    pub fn from_utf32_units(units: &[u32], target: Encoding) -> Result<Self> {
        Self::from_units::<Utf32>(units, target)
    }

    /// Build a descriptor from a byte stream whose units are in the byte
    /// order of `source`, storing them in the byte order of `target`.
    ///
    /// Both encodings must be in the same family. For UTF-16 and UTF-32, a
    /// byte length that is not a multiple of the unit width yields an
    /// odd-length descriptor in the `source` encoding holding `bytes`
    /// verbatim.
    ///
    /// ```
    /// use reencoder::{Encoding, UnicodeString};
    ///
    /// let s = UnicodeString::from_bytes(&[0x41, 0x00], Encoding::Utf16Le, Encoding::Utf16Be)?;
    /// assert_eq!(s.as_bytes(), &[0x00, 0x41]);
    /// # Ok::<(), reencoder::Error>(())
    /// ```
    pub fn from_bytes(bytes: &[u8], source: Encoding, target: Encoding) -> Result<Self> {
        expect_family(target, source.family())?;

        match source.family() {
            Family::Utf8 => Self::from_units::<Utf8>(bytes, target),
            Family::Utf16 => Self::from_unit_bytes::<Utf16>(bytes, source, target),
            Family::Utf32 => Self::from_unit_bytes::<Utf32>(bytes, source, target),
        }
    }

    /// Build a descriptor from bytes already in `encoding`'s byte order.
    pub fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        Self::from_bytes(bytes, encoding, encoding)
    }

    fn from_unit_bytes<F: UnicodeFormat>(
        bytes: &[u8],
        source: Encoding,
        target: Encoding,
    ) -> Result<Self> {
        if bytes.len() % <F::Unit as CodeUnit>::WIDTH != 0 {
            if let Some(kind) = F::ODD_LENGTH {
                return Self::raw(bytes, source, F::validity(Outcome::Invalid(kind)));
            }
        }

        let units = units_from_bytes::<F::Unit>(bytes, source.endian())?;
        Self::from_units::<F>(&units, target)
    }

    /// Copy `bytes` verbatim, with no validation.
    fn raw(bytes: &[u8], encoding: Encoding, validity: Validity) -> Result<Self> {
        let mut stored = try_with_capacity(bytes.len() + encoding.terminator_width())?;
        stored.extend_from_slice(bytes);
        stored.resize(bytes.len() + encoding.terminator_width(), 0);

        Ok(Self {
            encoding,
            bytes: stored,
            validity,
            char_count: 0,
            byte_len: bytes.len(),
        })
    }

    /// Duplicate the descriptor, reporting allocation failure instead of
    /// aborting.
    pub fn try_clone(&self) -> Result<Self> {
        let mut bytes = try_with_capacity(self.bytes.len())?;
        bytes.extend_from_slice(&self.bytes);

        Ok(Self { bytes, ..*self })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[inline]
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Number of characters; zero unless the string is valid or repaired.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Content length in bytes, excluding the terminator.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }

    /// True if the string is valid or was repaired.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    /// Content bytes in the declared byte order, excluding the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.byte_len]
    }

    /// Content bytes followed by the zero terminator.
    #[inline]
    pub fn as_bytes_with_terminator(&self) -> &[u8] {
        &self.bytes
    }

    /// The content as native-endian units of family `F`.
    ///
    /// A trailing partial unit of an odd-length string is left out.
    pub fn to_units<F: UnicodeFormat>(&self) -> Result<Vec<F::Unit>> {
        expect_family(self.encoding, F::FAMILY)?;
        units_from_bytes(self.as_bytes(), self.encoding.endian())
    }

    /// True if any character occupies more than one code unit.
    pub fn contains_multibyte(&self) -> bool {
        match self.encoding.family() {
            Family::Utf8 => utf8::contains_multibyte(self.as_bytes()),
            Family::Utf16 => {
                let endian = self.encoding.endian();
                self.as_bytes().chunks_exact(2).any(|pair| {
                    let unit = match endian {
                        Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
                        Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
                    };
                    utf16::is_surrogate(unit)
                })
            }
            Family::Utf32 => false,
        }
    }

    /// Decode the content into a Rust string, replacing malformed sequences
    /// with U+FFFD.
    pub fn to_string_lossy(&self) -> Result<String> {
        match self.encoding.family() {
            Family::Utf8 => decode_lossy::<Utf8>(self.as_bytes()),
            Family::Utf16 => decode_lossy::<Utf16>(&self.to_units::<Utf16>()?),
            Family::Utf32 => decode_lossy::<Utf32>(&self.to_units::<Utf32>()?),
        }
    }

    /// Mark a freshly re-encoded string as repaired.
    pub(crate) fn mark_repaired(&mut self) {
        self.validity = Validity::repaired(self.encoding.family());
    }
}

fn decode_lossy<F: UnicodeFormat>(units: &[F::Unit]) -> Result<String> {
    let mut out = String::new();
    out.try_reserve(units.len())?;

    let mut pos = 0;
    while pos < units.len() {
        let (cp, used) = F::decode_one(units, pos);
        out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
        pos += used;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::outcome::{Utf16ErrorKind, Utf32ErrorKind, Utf8ErrorKind};

    // =========================================================================
    // Native-unit constructors
    // =========================================================================

    mod native_units {
        use super::*;

        #[test]
        fn utf8_descriptor() {
            let s = UnicodeString::from_utf8("héllo".as_bytes()).unwrap();
            assert_eq!(s.encoding(), Encoding::Utf8);
            assert_eq!(s.validity(), Validity::valid(Family::Utf8));
            assert_eq!(s.char_count(), 5);
            assert_eq!(s.byte_len(), 6);
            assert_eq!(s.as_bytes_with_terminator(), b"h\xC3\xA9llo\0");
        }

        #[test]
        fn utf16_target_byte_order() {
            let units = [0x00E9u16, 0xD83C, 0xDF89];
            let be = UnicodeString::from_utf16_units(&units, Encoding::Utf16Be).unwrap();
            assert_eq!(be.as_bytes(), &[0x00, 0xE9, 0xD8, 0x3C, 0xDF, 0x89]);
            let le = UnicodeString::from_utf16_units(&units, Encoding::Utf16Le).unwrap();
            assert_eq!(le.as_bytes(), &[0xE9, 0x00, 0x3C, 0xD8, 0x89, 0xDF]);
            assert_eq!(le.char_count(), 2);
            assert_eq!(le.as_bytes_with_terminator().len(), 8);
        }

        #[test]
        fn utf32_terminator_width() {
            let s = UnicodeString::from_utf32_units(&[0x1F389], Encoding::Utf32Le).unwrap();
            assert_eq!(s.as_bytes_with_terminator(), &[0x89, 0xF3, 0x01, 0x00, 0, 0, 0, 0]);
        }

        #[test]
        fn invalid_units_are_kept_with_zero_count() {
            let s = UnicodeString::from_utf16_units(&[0x41, 0xDC00], Encoding::Utf16Be).unwrap();
            assert_eq!(s.validity(), Validity::from(Utf16ErrorKind::UnpairedLow));
            assert_eq!(s.char_count(), 0);
            assert_eq!(s.as_bytes(), &[0x00, 0x41, 0xDC, 0x00]);

            let s = UnicodeString::from_utf8(&[0xC0, 0x80]).unwrap();
            assert_eq!(s.validity(), Validity::from(Utf8ErrorKind::Overlong2Byte));
        }

        #[test]
        fn family_mismatch() {
            assert_eq!(
                UnicodeString::from_utf16_units(&[0x41], Encoding::Utf32Be),
                Err(Error::EncodingMismatch {
                    expected: Family::Utf16,
                    found: Encoding::Utf32Be
                })
            );
        }

        #[test]
        fn empty_input() {
            let s = UnicodeString::from_utf32_units(&[], Encoding::Utf32Be).unwrap();
            assert!(s.is_valid());
            assert!(s.is_empty());
            assert_eq!(s.char_count(), 0);
            assert_eq!(s.as_bytes_with_terminator(), &[0, 0, 0, 0]);
        }
    }

    // =========================================================================
    // Byte-stream parsing
    // =========================================================================

    mod byte_streams {
        use super::*;

        #[test]
        fn source_and_target_order_differ() {
            let le = [0x3C, 0xD8, 0x89, 0xDF];
            let s = UnicodeString::from_bytes(&le, Encoding::Utf16Le, Encoding::Utf16Be).unwrap();
            assert_eq!(s.encoding(), Encoding::Utf16Be);
            assert_eq!(s.as_bytes(), &[0xD8, 0x3C, 0xDF, 0x89]);
            assert_eq!(s.char_count(), 1);
        }

        #[test]
        fn parse_keeps_bytes() {
            let bytes = [0x00, 0x00, 0x00, 0x41, 0x00, 0x10, 0xFF, 0xFF];
            let s = UnicodeString::parse(&bytes, Encoding::Utf32Be).unwrap();
            assert_eq!(s.as_bytes(), &bytes);
            assert_eq!(s.char_count(), 2);
        }

        #[test]
        fn odd_length_is_rejected_wholesale() {
            let s = UnicodeString::from_bytes(&[0x41, 0x00, 0x42], Encoding::Utf16Le, Encoding::Utf16Be)
                .unwrap();
            assert_eq!(s.validity(), Validity::from(Utf16ErrorKind::OddLength));
            assert_eq!(s.encoding(), Encoding::Utf16Le);
            assert_eq!(s.as_bytes(), &[0x41, 0x00, 0x42]);
            assert_eq!(s.as_bytes_with_terminator(), &[0x41, 0x00, 0x42, 0, 0]);
            assert_eq!(s.char_count(), 0);

            let s = UnicodeString::parse(&[0, 0, 0xD8, 0, 0], Encoding::Utf32Be).unwrap();
            assert_eq!(s.validity(), Validity::from(Utf32ErrorKind::OddLength));
        }

        #[test]
        fn cross_family_is_an_error() {
            assert!(matches!(
                UnicodeString::from_bytes(b"ab", Encoding::Utf8, Encoding::Utf16Le),
                Err(Error::EncodingMismatch { .. })
            ));
        }
    }

    // =========================================================================
    // Accessors and duplication
    // =========================================================================

    mod accessors {
        use super::*;

        #[test]
        fn try_clone_is_deep_and_equal() {
            let s = UnicodeString::from_utf8("日本".as_bytes()).unwrap();
            let copy = s.try_clone().unwrap();
            assert_eq!(copy, s);
            assert_ne!(copy.as_bytes().as_ptr(), s.as_bytes().as_ptr());
        }

        #[test]
        fn units_round_trip() {
            let s = UnicodeString::from_utf16_units(&[0x61, 0xFFFD], Encoding::Utf16Le).unwrap();
            assert_eq!(s.to_units::<Utf16>().unwrap(), vec![0x61, 0xFFFD]);
            assert!(s.to_units::<Utf8>().is_err());
        }

        #[test]
        fn multibyte_per_family() {
            assert!(!UnicodeString::from_utf8(b"ascii").unwrap().contains_multibyte());
            assert!(UnicodeString::from_utf8("é".as_bytes()).unwrap().contains_multibyte());

            let bmp = UnicodeString::from_utf16_units(&[0xE9], Encoding::Utf16Be).unwrap();
            assert!(!bmp.contains_multibyte());
            let pair = UnicodeString::from_utf16_units(&[0xD83C, 0xDF89], Encoding::Utf16Le).unwrap();
            assert!(pair.contains_multibyte());

            let wide = UnicodeString::from_utf32_units(&[0x1F389], Encoding::Utf32Be).unwrap();
            assert!(!wide.contains_multibyte());
        }

        #[test]
        fn lossy_text() {
            let s = UnicodeString::from_utf16_units(&[0x48, 0xDC00, 0x69], Encoding::Utf16Be).unwrap();
            assert_eq!(s.to_string_lossy().unwrap(), "H\u{FFFD}i");

            let s = UnicodeString::from_utf8(b"ok\xE2\x82").unwrap();
            assert_eq!(s.to_string_lossy().unwrap(), "ok\u{FFFD}\u{FFFD}");
        }
    }
}
