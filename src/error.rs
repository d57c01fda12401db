//! Operation-level failures.
//!
//! Malformed input is never an error here: it is reported as data through
//! [`Validity`](crate::Validity). This type only covers the cases where an
//! operation could not produce a descriptor at all.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use crate::encoding::{Encoding, Family};

/// An operation failed to produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A buffer allocation failed or its size overflowed.
    OutOfMemory,

    /// An encoding argument does not belong to the family the operation
    /// works on (for example a UTF-8 target for UTF-16 code units).
    EncodingMismatch {
        /// Family the operation requires.
        expected: Family,
        /// Encoding that was supplied.
        found: Encoding,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "memory allocation failed"),
            Self::EncodingMismatch { expected, found } => {
                write!(f, "expected a {} encoding, found {}", expected, found)
            }
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Shorthand for results of fallible operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Check that `encoding` belongs to `family`.
#[inline]
pub(crate) fn expect_family(encoding: Encoding, family: Family) -> Result<()> {
    if encoding.family() == family {
        Ok(())
    } else {
        Err(Error::EncodingMismatch {
            expected: family,
            found: encoding,
        })
    }
}

/// Allocate an empty vector able to hold `capacity` elements without
/// reallocating, reporting failure instead of aborting.
#[inline]
pub(crate) fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(capacity)?;
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Error::OutOfMemory.to_string(), "memory allocation failed");
        let mismatch = Error::EncodingMismatch {
            expected: Family::Utf16,
            found: Encoding::Utf32Le,
        };
        assert_eq!(mismatch.to_string(), "expected a UTF-16 encoding, found UTF-32LE");
    }

    #[test]
    fn family_check() {
        assert!(expect_family(Encoding::Utf16Be, Family::Utf16).is_ok());
        assert!(expect_family(Encoding::Utf8, Family::Utf8).is_ok());
        assert_eq!(
            expect_family(Encoding::Utf8, Family::Utf32),
            Err(Error::EncodingMismatch {
                expected: Family::Utf32,
                found: Encoding::Utf8
            })
        );
    }

    #[test]
    fn capacity_overflow_is_out_of_memory() {
        assert_eq!(try_with_capacity::<u32>(usize::MAX).err(), Some(Error::OutOfMemory));
        assert!(try_with_capacity::<u8>(16).unwrap().capacity() >= 16);
    }
}
