//! End-to-end tests for conversion, repair and serialization.

use reencoder::{
    convert, describe_encoding, describe_outcome, describe_outcome_in, repair, Encoding, Family,
    RepairError, UnicodeString, Utf16ErrorKind, Utf32ErrorKind, Utf8ErrorKind, Validity,
};

const SAMPLES: &[&str] = &[
    "",
    "plain ASCII",
    "Grüße aus Köln",
    "Ελληνικά и русский",
    "日本語のテキスト",
    "emoji 🎉🚀 and 𝄞 music",
    "boundaries \u{7F}\u{80}\u{7FF}\u{800}\u{FFFF}\u{10000}\u{10FFFF}",
    "multi\nline\r\ntext\n",
];

// ============================================================================
// Lossless round trips
// ============================================================================

#[test]
fn every_pair_round_trips() {
    for text in SAMPLES {
        for source in Encoding::ALL {
            let encoded = convert(Encoding::Utf8, source, text.as_bytes()).unwrap();
            assert!(encoded.is_valid());

            for target in Encoding::ALL {
                let converted = convert(source, target, encoded.as_bytes()).unwrap();
                assert_eq!(converted.encoding(), target);
                assert_eq!(converted.char_count(), text.chars().count());

                let back = convert(target, Encoding::Utf8, converted.as_bytes()).unwrap();
                assert_eq!(back.as_bytes(), text.as_bytes(), "{} -> {}", source, target);
            }
        }
    }
}

#[test]
fn chain_through_every_family() {
    let text = "a é 日 🎉";
    let utf16 = convert(Encoding::Utf8, Encoding::Utf16Le, text.as_bytes()).unwrap();
    let utf32 = convert(Encoding::Utf16Le, Encoding::Utf32Le, utf16.as_bytes()).unwrap();
    let utf8 = convert(Encoding::Utf32Le, Encoding::Utf8, utf32.as_bytes()).unwrap();

    assert_eq!(utf16.byte_len(), 2 * text.encode_utf16().count());
    assert_eq!(utf32.byte_len(), 4 * text.chars().count());
    assert_eq!(utf8.as_bytes(), text.as_bytes());
}

#[test]
fn known_byte_layouts() {
    let s = convert(Encoding::Utf8, Encoding::Utf16Be, "€𝄞".as_bytes()).unwrap();
    assert_eq!(s.as_bytes(), &[0x20, 0xAC, 0xD8, 0x34, 0xDD, 0x1E]);

    let s = convert(Encoding::Utf8, Encoding::Utf32Le, "€".as_bytes()).unwrap();
    assert_eq!(s.as_bytes(), &[0xAC, 0x20, 0x00, 0x00]);
}

// ============================================================================
// Structural errors
// ============================================================================

#[test]
fn overlong_nul_is_rejected() {
    let s = UnicodeString::from_utf8(&[0xC0, 0x80]).unwrap();
    assert_eq!(s.validity(), Validity::from(Utf8ErrorKind::Overlong2Byte));
    assert_eq!(s.validity().code(), 804);
    assert_eq!(s.char_count(), 0);
}

#[test]
fn utf8_error_codes() {
    let cases: &[(&[u8], u32)] = &[
        (&[0x80], 801),
        (&[0xE2, 0x82], 802),
        (&[0xE2, 0x41], 802),
        (&[0xE2, 0x41, 0x00], 802),
        (&[0xE2, 0x28, 0xA1], 803),
        (&[0xC1, 0xBF], 804),
        (&[0xE0, 0x9F, 0xBF], 805),
        (&[0xF0, 0x8F, 0xBF, 0xBF], 806),
        (&[0xF4, 0x90, 0x80, 0x80], 807),
        (&[0xED, 0xA0, 0x80], 808),
    ];
    for (bytes, code) in cases {
        let s = UnicodeString::from_utf8(bytes).unwrap();
        assert_eq!(s.validity().code(), *code, "{:02X?}", bytes);
        assert_eq!(describe_outcome(*code), s.validity().description());
    }
}

#[test]
fn surrogate_pairing() {
    let paired = UnicodeString::from_utf16_units(&[0xD83D, 0xDE00], Encoding::Utf16Le).unwrap();
    assert!(paired.is_valid());
    assert_eq!(paired.char_count(), 1);
    assert!(paired.contains_multibyte());

    let utf32 = convert(Encoding::Utf16Le, Encoding::Utf32Be, paired.as_bytes()).unwrap();
    assert_eq!(utf32.as_bytes(), &[0x00, 0x01, 0xF6, 0x00]);

    let reversed = UnicodeString::from_utf16_units(&[0xDE00, 0xD83D], Encoding::Utf16Le).unwrap();
    assert_eq!(reversed.validity(), Validity::from(Utf16ErrorKind::UnpairedLow));

    let dangling = UnicodeString::from_utf16_units(&[0x41, 0xD83D], Encoding::Utf16Be).unwrap();
    assert_eq!(dangling.validity(), Validity::from(Utf16ErrorKind::PrematureEnd));
}

#[test]
fn code_point_range_boundary() {
    let top = UnicodeString::from_utf32_units(&[0x10FFFF], Encoding::Utf32Be).unwrap();
    assert!(top.is_valid());
    let above = UnicodeString::from_utf32_units(&[0x110000], Encoding::Utf32Be).unwrap();
    assert_eq!(above.validity(), Validity::from(Utf32ErrorKind::OutOfRange));
    assert_eq!(above.validity().code(), 3201);

    assert!(UnicodeString::from_utf8(&[0xF4, 0x8F, 0xBF, 0xBF]).unwrap().is_valid());
    assert!(!UnicodeString::from_utf8(&[0xF4, 0x90, 0x80, 0x80]).unwrap().is_valid());
}

#[test]
fn odd_byte_lengths() {
    let s = UnicodeString::parse(&[0x41, 0x00, 0x42], Encoding::Utf16Le).unwrap();
    assert_eq!(s.validity().code(), 1604);
    assert_eq!(s.byte_len(), 3);

    let s = UnicodeString::parse(&[0, 0, 0, 0x41, 0], Encoding::Utf32Be).unwrap();
    assert_eq!(s.validity().code(), 3203);

    let s = convert(Encoding::Utf32Le, Encoding::Utf8, &[0x41, 0, 0]).unwrap();
    assert_eq!(s.encoding(), Encoding::Utf32Le);
    assert!(!s.is_valid());
}

#[test]
fn malformed_source_stays_in_source_encoding() {
    let s = convert(Encoding::Utf16Be, Encoding::Utf8, &[0xDC, 0x00]).unwrap();
    assert_eq!(s.encoding(), Encoding::Utf16Be);
    assert_eq!(s.as_bytes(), &[0xDC, 0x00]);
    assert_eq!(s.validity().code(), 1603);
}

#[test]
fn terminator_width_follows_encoding() {
    for encoding in Encoding::ALL {
        let s = convert(Encoding::Utf8, encoding, b"ok").unwrap();
        let with = s.as_bytes_with_terminator();
        assert_eq!(with.len(), s.byte_len() + encoding.terminator_width());
        assert!(with[s.byte_len()..].iter().all(|&b| b == 0));
    }
}

// ============================================================================
// Repair
// ============================================================================

#[test]
fn repair_replaces_malformed_runs() {
    let mut s = UnicodeString::from_utf8(b"ab\xE2\x82cd\xFF").unwrap();
    assert_eq!(s.repair(), Ok(Validity::repaired(Family::Utf8)));
    assert_eq!(s.validity().code(), 809);
    assert_eq!(s.to_string_lossy().unwrap(), "ab\u{FFFD}\u{FFFD}cd\u{FFFD}");
    assert_eq!(s.char_count(), 7);
}

#[test]
fn repair_truncated_lead_before_ascii() {
    let mut s = UnicodeString::from_utf8(b"x\xE2y").unwrap();
    s.repair().unwrap();
    assert_eq!(s.as_bytes(), "x\u{FFFD}y".as_bytes());
    assert_eq!(s.validity(), Validity::repaired(Family::Utf8));
}

#[test]
fn repair_is_idempotent_in_every_family() {
    let inputs: [(&[u8], Encoding); 3] = [
        (b"\xC0\x80x", Encoding::Utf8),
        (&[0x00, 0xD8, 0x41, 0x00], Encoding::Utf16Le),
        (&[0x00, 0x00, 0xD8, 0x00], Encoding::Utf32Be),
    ];
    for (bytes, encoding) in inputs {
        let mut s = UnicodeString::parse(bytes, encoding).unwrap();
        let validity = repair(Some(&mut s)).unwrap();
        assert!(validity.is_repaired());
        assert_eq!(s.encoding(), encoding);

        let once = s.clone();
        assert_eq!(repair(Some(&mut s)), Err(RepairError::NoOp));
        assert_eq!(s, once);
    }
}

#[test]
fn repaired_string_converts() {
    let mut s = UnicodeString::from_utf16_units(&[0x48, 0xDFFF, 0x69], Encoding::Utf16Be).unwrap();
    s.repair().unwrap();

    let utf8 = convert(Encoding::Utf16Be, Encoding::Utf8, s.as_bytes()).unwrap();
    assert_eq!(utf8.as_bytes(), "H\u{FFFD}i".as_bytes());
    assert_eq!(utf8.validity(), Validity::valid(Family::Utf8));
}

#[test]
fn repair_without_string() {
    assert_eq!(repair(None), Err(RepairError::NoStruct));
}

// ============================================================================
// Byte-order marks and serialization
// ============================================================================

#[test]
fn bom_round_trip() {
    for encoding in Encoding::ALL {
        let s = convert(Encoding::Utf8, encoding, "BOM ✓".as_bytes()).unwrap();

        let mut buf = vec![0u8; s.encoded_len(true)];
        assert_eq!(s.write_to_slice(&mut buf, true), buf.len());

        let (detected, bom_len) = Encoding::sniff_bom(&buf).unwrap();
        assert_eq!(detected, encoding);
        let parsed = UnicodeString::parse(&buf[bom_len..], detected).unwrap();
        assert_eq!(parsed, s);
    }
}

#[test]
fn write_to_file_without_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let s = convert(Encoding::Utf8, Encoding::Utf16Le, "file ✓".as_bytes()).unwrap();
    let written = s.write_to_file(&path, false).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(written, bytes.len());
    assert_eq!(bytes, s.as_bytes());
}

#[test]
fn write_to_file_with_bom_truncates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &[0xAA; 64]).unwrap();

    let s = UnicodeString::from_utf8(b"short").unwrap();
    assert_eq!(s.write_to_file(file.path(), true).unwrap(), 8);
    assert_eq!(std::fs::read(file.path()).unwrap(), b"\xEF\xBB\xBFshort");
}

// ============================================================================
// Descriptions
// ============================================================================

#[test]
fn descriptions_outside_known_ranges() {
    assert_eq!(describe_outcome(0), "no description");
    assert_eq!(describe_outcome(810), "no description");
    assert_eq!(describe_encoding(5), "no description");
    assert_eq!(describe_outcome_in(Encoding::Utf16Le, 801), "no description");
    assert_eq!(
        describe_outcome_in(Encoding::Utf16Le, 1602),
        "Unpaired high surrogate"
    );
}
