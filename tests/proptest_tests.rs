//! Property-based tests against the standard library's Unicode handling.

use proptest::prelude::*;
use reencoder::text::utf16::validate_utf16;
use reencoder::text::utf8::validate_utf8;
use reencoder::text::{UnicodeFormat, Utf16, Utf32, Utf8};
use reencoder::{convert, Encoding, UnicodeString};

/// A valid string with arbitrary bytes spliced in at one position.
fn spliced_utf8() -> impl Strategy<Value = Vec<u8>> {
    (
        any::<String>(),
        prop::collection::vec(any::<u8>(), 0..6),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(text, noise, at)| {
            let mut bytes = text.into_bytes();
            let pos = at.index(bytes.len() + 1);
            bytes.splice(pos..pos, noise);
            bytes
        })
}

/// Walk `units` with `decode_one`, checking every step makes progress.
fn decode_all<F: UnicodeFormat>(units: &[F::Unit]) -> Result<usize, TestCaseError> {
    let mut pos = 0;
    let mut steps = 0;
    while pos < units.len() {
        let (cp, used) = F::decode_one(units, pos);
        prop_assert!(used >= 1 && used <= F::MAX_UNITS);
        prop_assert!(pos + used <= units.len());
        prop_assert!(char::from_u32(cp).is_some());
        pos += used;
        steps += 1;
    }
    Ok(steps)
}

proptest! {
    #[test]
    fn utf8_agrees_with_std(bytes in prop_oneof![
        prop::collection::vec(any::<u8>(), 0..48),
        spliced_utf8(),
    ]) {
        match (validate_utf8(&bytes), core::str::from_utf8(&bytes)) {
            (Ok(chars), Ok(text)) => prop_assert_eq!(chars, text.chars().count()),
            (Err(err), Err(std_err)) => {
                prop_assert_eq!(err.offset, std_err.valid_up_to());
                prop_assert!(err.units >= 1);
            }
            (ours, theirs) => prop_assert!(false, "disagree: {:?} vs {:?}", ours, theirs),
        }
    }

    #[test]
    fn utf16_agrees_with_std(units in prop::collection::vec(
        prop_oneof![any::<u16>(), 0xD800u16..0xE000, 0u16..0x80],
        0..32,
    )) {
        let first_error = {
            let mut offset = 0;
            let mut found = None;
            for decoded in char::decode_utf16(units.iter().copied()) {
                match decoded {
                    Ok(c) => offset += c.len_utf16(),
                    Err(_) => {
                        found = Some(offset);
                        break;
                    }
                }
            }
            found
        };

        match validate_utf16(&units) {
            Ok(chars) => {
                prop_assert_eq!(first_error, None);
                prop_assert_eq!(chars, char::decode_utf16(units.iter().copied()).count());
            }
            Err(err) => prop_assert_eq!(Some(err.offset), first_error),
        }
    }

    #[test]
    fn decoding_always_makes_progress(
        bytes in prop::collection::vec(any::<u8>(), 0..48),
        wide in prop::collection::vec(any::<u16>(), 0..24),
        words in prop::collection::vec(any::<u32>(), 0..12),
    ) {
        decode_all::<Utf8>(&bytes)?;
        decode_all::<Utf16>(&wide)?;
        prop_assert_eq!(decode_all::<Utf32>(&words)?, words.len());
    }

    #[test]
    fn valid_text_round_trips(text in any::<String>()) {
        for encoding in Encoding::ALL {
            let encoded = convert(Encoding::Utf8, encoding, text.as_bytes()).unwrap();
            prop_assert!(encoded.is_valid());
            prop_assert_eq!(encoded.char_count(), text.chars().count());

            let back = convert(encoding, Encoding::Utf8, encoded.as_bytes()).unwrap();
            prop_assert_eq!(back.as_bytes(), text.as_bytes());
        }
    }

    #[test]
    fn repair_yields_valid_text_and_keeps_valid_prefix(bytes in spliced_utf8()) {
        let mut s = UnicodeString::from_utf8(&bytes).unwrap();
        let prefix = match core::str::from_utf8(&bytes) {
            Ok(_) => {
                prop_assert!(s.repair().is_err());
                return Ok(());
            }
            Err(err) => err.valid_up_to(),
        };

        let validity = s.repair().unwrap();
        prop_assert!(validity.is_repaired());
        prop_assert!(core::str::from_utf8(s.as_bytes()).is_ok());
        prop_assert!(s.as_bytes().starts_with(&bytes[..prefix]));
        prop_assert_eq!(&s.as_bytes()[prefix..prefix + 3], "\u{FFFD}".as_bytes());
        prop_assert!(s.repair().is_err());
    }

    #[test]
    fn utf32_repair_replaces_each_bad_unit(words in prop::collection::vec(
        prop_oneof![0u32..0x11_0000, 0xD800u32..0xE000, 0x11_0000u32..=u32::MAX],
        1..16,
    )) {
        let bad = words.iter().filter(|&&w| char::from_u32(w).is_none()).count();
        let mut s = UnicodeString::from_utf32_units(&words, Encoding::Utf32Le).unwrap();
        if bad == 0 {
            prop_assert!(s.is_valid());
            return Ok(());
        }

        s.repair().unwrap();
        prop_assert_eq!(s.char_count(), words.len());
        let lossy = s.to_string_lossy().unwrap();
        prop_assert!(lossy.chars().filter(|&c| c == '\u{FFFD}').count() >= bad, "expected at least {} replacement chars", bad);
    }
}
