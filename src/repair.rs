//! Repair of malformed strings.
//!
//! Repair re-encodes a string into its own encoding. Well-formed runs pass
//! through untouched. A malformed UTF-8 byte becomes one U+FFFD and decoding
//! resumes at the next byte, so `C0 80` becomes two replacements. A
//! malformed UTF-16 or UTF-32 unit becomes one U+FFFD. A trailing partial
//! unit left by an odd byte length also becomes one U+FFFD.
//!
//! ```
//! use reencoder::{Family, UnicodeString, Validity};
//!
//! // A truncated 3-byte lead followed by ASCII
//! let mut s = UnicodeString::from_utf8(b"ab\xE2cd")?;
//! assert_eq!(s.repair(), Ok(Validity::repaired(Family::Utf8)));
//! assert_eq!(s.as_bytes(), b"ab\xEF\xBF\xBDcd");
//! assert_eq!(s.char_count(), 5);
//! # Ok::<(), reencoder::Error>(())
//! ```

use log::debug;

use crate::buffer::GrowthPolicy;
use crate::convert::{content, transcode};
use crate::encoding::Family;
use crate::endian::units_from_bytes;
use crate::error::Result;
use crate::outcome::{RepairError, Validity};
use crate::string::UnicodeString;
use crate::text::{CodeUnit, UnicodeFormat, Utf16, Utf32, Utf8};

/// Repair `string` in place.
///
/// Returns the new validity, or why nothing was done: no string
/// ([`RepairError::NoStruct`]), a string that is already valid or repaired
/// ([`RepairError::NoOp`]) or an allocation failure
/// ([`RepairError::OutOfMemory`]). On failure the string is unchanged.
pub fn repair(string: Option<&mut UnicodeString>) -> core::result::Result<Validity, RepairError> {
    match string {
        Some(string) => string.repair(),
        None => Err(RepairError::NoStruct),
    }
}

impl UnicodeString {
    /// Replace malformed subsequences with U+FFFD. See [`repair`].
    pub fn repair(&mut self) -> core::result::Result<Validity, RepairError> {
        self.repair_with(&GrowthPolicy::default())
    }

    /// [`repair`](Self::repair) with an explicit output growth policy.
    pub fn repair_with(
        &mut self,
        policy: &GrowthPolicy,
    ) -> core::result::Result<Validity, RepairError> {
        if self.is_valid() {
            return Err(RepairError::NoOp);
        }

        let rebuilt = match self.encoding().family() {
            Family::Utf8 => rebuild::<Utf8>(self, policy),
            Family::Utf16 => rebuild::<Utf16>(self, policy),
            Family::Utf32 => rebuild::<Utf32>(self, policy),
        };
        let mut repaired = rebuilt.map_err(|_| RepairError::OutOfMemory)?;
        debug_assert!(repaired.is_valid());
        repaired.mark_repaired();

        debug!(
            "repaired {} string ({}): {} -> {} bytes",
            self.encoding(),
            self.validity(),
            self.byte_len(),
            repaired.byte_len()
        );
        *self = repaired;
        Ok(self.validity())
    }
}

fn rebuild<F: UnicodeFormat>(string: &UnicodeString, policy: &GrowthPolicy) -> Result<UnicodeString> {
    let bytes = string.as_bytes();
    let mut units = units_from_bytes::<F::Unit>(bytes, string.encoding().endian())?;

    if bytes.len() % <F::Unit as CodeUnit>::WIDTH != 0 {
        units.try_reserve_exact(F::REPLACEMENT.len())?;
        units.extend_from_slice(F::REPLACEMENT);
    }

    let out = transcode::<F, F>(&units, policy)?;
    UnicodeString::from_units::<F>(content(&out), string.encoding())
}
