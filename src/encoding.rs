//! Encoding forms, byte orders and byte-order marks.
//!
//! ## Byte-Order Marks
//!
//! | Encoding  | BOM bytes       |
//! |-----------|-----------------|
//! | UTF-8     | `EF BB BF`      |
//! | UTF-16BE  | `FE FF`         |
//! | UTF-16LE  | `FF FE`         |
//! | UTF-32BE  | `00 00 FE FF`   |
//! | UTF-32LE  | `FF FE 00 00`   |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::outcome::NO_DESCRIPTION;

/// UTF-8 byte-order mark.
pub const BOM_UTF8: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 big-endian byte-order mark.
pub const BOM_UTF16BE: [u8; 2] = [0xFE, 0xFF];
/// UTF-16 little-endian byte-order mark.
pub const BOM_UTF16LE: [u8; 2] = [0xFF, 0xFE];
/// UTF-32 big-endian byte-order mark.
pub const BOM_UTF32BE: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];
/// UTF-32 little-endian byte-order mark.
pub const BOM_UTF32LE: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];

/// Byte order of multi-byte code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// Byte order of the running system, determined by a runtime probe.
    #[inline]
    pub fn native() -> Self {
        if crate::endian::system_is_little_endian() {
            Endian::Little
        } else {
            Endian::Big
        }
    }
}

/// An encoding family, independent of byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Family {
    Utf8,
    Utf16,
    Utf32,
}

impl Family {
    /// Width of one code unit in bytes.
    #[inline]
    pub const fn unit_width(self) -> usize {
        match self {
            Family::Utf8 => 1,
            Family::Utf16 => 2,
            Family::Utf32 => 4,
        }
    }

    /// The encoding of this family in native byte order.
    pub fn native(self) -> Encoding {
        match (self, Endian::native()) {
            (Family::Utf8, _) => Encoding::Utf8,
            (Family::Utf16, Endian::Big) => Encoding::Utf16Be,
            (Family::Utf16, Endian::Little) => Encoding::Utf16Le,
            (Family::Utf32, Endian::Big) => Encoding::Utf32Be,
            (Family::Utf32, Endian::Little) => Encoding::Utf32Le,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Family::Utf8 => "UTF-8",
            Family::Utf16 => "UTF-16",
            Family::Utf32 => "UTF-32",
        }
    }
}

impl core::fmt::Display for Family {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete encoding: family plus byte order.
///
/// The discriminants (0 through 4, in declaration order) are what
/// [`describe_encoding`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Encoding {
    Utf8 = 0,
    Utf16Be = 1,
    Utf16Le = 2,
    Utf32Be = 3,
    Utf32Le = 4,
}

impl Encoding {
    /// All encodings, in discriminant order.
    pub const ALL: [Encoding; 5] = [
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Utf32Be,
        Encoding::Utf32Le,
    ];

    #[inline]
    pub const fn family(self) -> Family {
        match self {
            Encoding::Utf8 => Family::Utf8,
            Encoding::Utf16Be | Encoding::Utf16Le => Family::Utf16,
            Encoding::Utf32Be | Encoding::Utf32Le => Family::Utf32,
        }
    }

    /// Byte order of the encoding's code units.
    ///
    /// UTF-8 is byte-oriented; it reports the native order so that callers
    /// can treat it uniformly (a swap is never needed for 1-byte units).
    pub fn endian(self) -> Endian {
        match self {
            Encoding::Utf8 => Endian::native(),
            Encoding::Utf16Be | Encoding::Utf32Be => Endian::Big,
            Encoding::Utf16Le | Encoding::Utf32Le => Endian::Little,
        }
    }

    /// Width of one code unit in bytes.
    #[inline]
    pub const fn unit_width(self) -> usize {
        self.family().unit_width()
    }

    /// Width of the NUL terminator that follows a descriptor's content.
    #[inline]
    pub const fn terminator_width(self) -> usize {
        self.unit_width()
    }

    /// The byte-order mark for this encoding.
    pub const fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &BOM_UTF8,
            Encoding::Utf16Be => &BOM_UTF16BE,
            Encoding::Utf16Le => &BOM_UTF16LE,
            Encoding::Utf32Be => &BOM_UTF32BE,
            Encoding::Utf32Le => &BOM_UTF32LE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Utf32Le => "UTF-32LE",
        }
    }

    /// Look an encoding up by its discriminant.
    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Detect a leading byte-order mark.
    ///
    /// Returns the encoding it announces and the BOM length. UTF-32LE is
    /// checked before UTF-16LE since its BOM begins with the UTF-16LE one.
    ///
    /// # Examples
    ///
    /// ```
    /// use reencoder::Encoding;
    ///
    /// assert_eq!(Encoding::sniff_bom(&[0xEF, 0xBB, 0xBF, b'A']), Some((Encoding::Utf8, 3)));
    /// assert_eq!(Encoding::sniff_bom(&[0xFF, 0xFE, 0x41, 0x00]), Some((Encoding::Utf16Le, 2)));
    /// assert_eq!(Encoding::sniff_bom(b"plain"), None);
    /// ```
    pub fn sniff_bom(bytes: &[u8]) -> Option<(Encoding, usize)> {
        [
            Encoding::Utf32Le,
            Encoding::Utf32Be,
            Encoding::Utf8,
            Encoding::Utf16Le,
            Encoding::Utf16Be,
        ]
        .into_iter()
        .find(|encoding| bytes.starts_with(encoding.bom()))
        .map(|encoding| (encoding, encoding.bom().len()))
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an encoding label fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding;

impl core::fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "unknown encoding (expected one of utf-8, utf-16be, utf-16le, utf-32be, utf-32le)"
        )
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for UnknownEncoding {}

impl core::str::FromStr for Encoding {
    type Err = UnknownEncoding;

    /// Parse a label such as `utf-8`, `UTF16LE` or `utf_32be`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut normalized = [0u8; 8];
        let mut len = 0;
        for byte in s.trim().bytes() {
            if byte == b'-' || byte == b'_' {
                continue;
            }
            if len == normalized.len() {
                return Err(UnknownEncoding);
            }
            normalized[len] = byte.to_ascii_lowercase();
            len += 1;
        }

        match &normalized[..len] {
            b"utf8" => Ok(Encoding::Utf8),
            b"utf16be" => Ok(Encoding::Utf16Be),
            b"utf16le" => Ok(Encoding::Utf16Le),
            b"utf32be" => Ok(Encoding::Utf32Be),
            b"utf32le" => Ok(Encoding::Utf32Le),
            _ => Err(UnknownEncoding),
        }
    }
}

/// Render an encoding discriminant as text.
///
/// Values outside `0..=4` render as `"no description"`.
pub fn describe_encoding(raw: u32) -> &'static str {
    Encoding::from_u32(raw)
        .map(Encoding::name)
        .unwrap_or(NO_DESCRIPTION)
}
