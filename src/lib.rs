//! # Reencoder
//!
//! Validation, transcoding and repair of Unicode strings across UTF-8,
//! UTF-16 (BE/LE) and UTF-32 (BE/LE).
//!
//! Every operation produces a [`UnicodeString`]: an owned, zero-terminated
//! byte buffer in a declared encoding and byte order, together with the
//! [`Validity`] of those bytes and their character count. Malformed input is
//! reported as data, never as an error; only allocation failure (and
//! mismatched encoding arguments) stop an operation.
//!
//! ## Module Organization
//!
//! - [`text`] - Per-format validators and code-point codecs
//! - [`encoding`] - Encodings, byte orders and byte-order marks
//! - [`outcome`] - Validity outcomes and their numeric codes
//! - [`convert`](mod@convert) - Cross-encoding conversion
//! - [`repair`](mod@repair) - Replacement of malformed subsequences with U+FFFD
//! - [`buffer`] - Growable output buffers
//! - [`endian`] - Runtime endianness probe and byte swapping
//!
//! ## Quick Start
//!
//! ```
//! use reencoder::{convert, Encoding, UnicodeString};
//!
//! // UTF-8 to UTF-16LE
//! let s = convert(Encoding::Utf8, Encoding::Utf16Le, "héllo".as_bytes())?;
//! assert_eq!(s.char_count(), 5);
//! assert_eq!(&s.as_bytes()[..4], &[0x68, 0x00, 0xE9, 0x00]);
//!
//! // Malformed input is data
//! let mut bad = UnicodeString::from_utf8(b"ab\xE2cd")?;
//! assert_eq!(bad.validity().code(), 803);
//! assert_eq!(bad.validity().description(), "Invalid continuation byte");
//!
//! // Repair replaces the malformed run with U+FFFD
//! bad.repair().unwrap();
//! assert_eq!(bad.as_bytes(), "ab\u{FFFD}cd".as_bytes());
//! # Ok::<(), reencoder::Error>(())
//! ```
//!
//! ## Features
//!
//! - `std` (default) - Writers for `std::io::Write` sinks and files
//! - `serde` - Enable serialization/deserialization support
//! - `cli` - The `reencoder` command-line tool

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

// =============================================================================
// Core modules
// =============================================================================

/// Per-format validators and code-point codecs.
pub mod text;

pub mod encoding;
pub mod outcome;

/// Operation-level errors.
pub mod error;

pub mod buffer;
pub mod endian;

// =============================================================================
// Descriptor and operations
// =============================================================================

pub mod string;

pub mod convert;
pub mod repair;

mod writer;

// =============================================================================
// Public re-exports
// =============================================================================

pub use buffer::{GrowBuffer, GrowthPolicy};
pub use convert::{convert, convert_units, convert_units_with, convert_with, transcode};
pub use encoding::{describe_encoding, Encoding, Endian, Family, UnknownEncoding};
pub use error::{Error, Result};
pub use outcome::{
    describe_outcome, describe_outcome_in, Outcome, RepairError, Utf16ErrorKind, Utf32ErrorKind,
    Utf8ErrorKind, Validity,
};
pub use repair::repair;
pub use string::UnicodeString;
pub use text::{UnicodeFormat, ValidationError};
