//! Text generators for benchmarking and testing.
//!
//! Text is generated as UTF-8 and converted to the requested encoding by the
//! caller. [`corrupt`] then injects malformed sequences into the encoded
//! bytes so that validators and repair have something to find.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reencoder::text::utf8;
use reencoder::{Encoding, Endian, Family};

/// Pattern types for text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPattern {
    /// Pure ASCII (7-bit, single-byte sequences)
    Ascii,
    /// Latin Extended characters (2-byte sequences: accents, diacritics)
    Latin,
    /// Greek and Cyrillic (2-byte sequences)
    GreekCyrillic,
    /// Chinese/Japanese/Korean (3-byte sequences)
    Cjk,
    /// Emoji and symbols (4-byte sequences)
    Emoji,
    /// Mixed realistic content (prose with occasional non-ASCII)
    Mixed,
    /// Uniform mix of all sequence lengths (1-4 bytes)
    AllLengths,
    /// Pathological: supplementary-plane characters only
    Pathological,
}

const SENTENCES: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Pack my box with five dozen liquor jugs.",
    "How vexingly quick daft zebras jump!",
    "The five boxing wizards jump quickly.",
    "Sphinx of black quartz, judge my vow.",
    "Two driven jocks help fax my big quiz.",
    "Sympathizing would fix Quaker objectives.",
    "A wizard's job is to vex chumps quickly in fog.",
];

const LATIN: &[&str] = &[
    "café", "résumé", "naïve", "über", "fiancée", "déjà", "façade", "jalapeño", "señor",
    "mañana", "Ångström", "smörgåsbord", "Müller", "Øresund", "Łódź", "crème brûlée",
];

const GREEK_CYRILLIC: &[&str] = &[
    "αλφα", "βήτα", "γάμμα", "Ελληνικά", "φιλοσοφία", "Привет", "мир", "Москва",
    "Україна", "спасибо", "библиотека", "Σωκράτης",
];

const CJK: &[&str] = &[
    "日本語", "中文", "한국어", "こんにちは", "你好世界", "東京", "北京", "서울",
    "漢字", "カタカナ", "ひらがな", "文字化け",
];

const EMOJI: &[&str] = &[
    "🎉", "🚀", "🌍", "💻", "🔥", "😀", "🦀", "🎸", "🍕", "🌈", "👍", "🧪",
];

const ALL_LENGTHS: &[&str] = &["A", "z", "7", "é", "ß", "Ж", "日", "€", "한", "🎉", "𝄞", "😀"];

const PATHOLOGICAL: &[&str] = &["𝄞", "𝕳", "𐀀", "🎉", "😀", "🦀", "𠀀", "\u{10FFFD}"];

/// Generate text of exactly `target_size` UTF-8 bytes.
///
/// Without a seed the output is deterministic but not random.
pub fn generate_text(target_size: usize, pattern: TextPattern, seed: Option<u64>) -> String {
    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let mut result = String::with_capacity(target_size);

    let (pieces, separator): (&[&str], &str) = match pattern {
        TextPattern::Ascii => (SENTENCES, " "),
        TextPattern::Latin => (LATIN, " "),
        TextPattern::GreekCyrillic => (GREEK_CYRILLIC, " "),
        TextPattern::Cjk => (CJK, "、"),
        TextPattern::Emoji => (EMOJI, ""),
        TextPattern::Mixed => (SENTENCES, " "),
        TextPattern::AllLengths => (ALL_LENGTHS, ""),
        TextPattern::Pathological => (PATHOLOGICAL, ""),
    };

    let mut line_len = 0;
    let mut count = 0usize;
    loop {
        let idx = rng
            .as_mut()
            .map(|r| r.gen_range(0..pieces.len()))
            .unwrap_or(count % pieces.len());
        let mut piece = pieces[idx];

        // Mixed prose: roughly one word in five is non-ASCII
        if pattern == TextPattern::Mixed {
            let roll = rng.as_mut().map(|r| r.gen_range(0..5)).unwrap_or(count % 5);
            if roll == 0 {
                let pool = [LATIN, GREEK_CYRILLIC, CJK, EMOJI][count % 4];
                piece = pool[count % pool.len()];
            }
        }
        count += 1;

        let sep = if line_len == 0 {
            ""
        } else if line_len + piece.len() > 72 {
            line_len = 0;
            "\n"
        } else {
            separator
        };

        if result.len() + sep.len() + piece.len() > target_size {
            break;
        }
        result.push_str(sep);
        result.push_str(piece);
        line_len += piece.len() + sep.len();
    }

    // Pad to the exact size with ASCII
    while result.len() < target_size {
        result.push(' ');
    }
    result
}

/// Malformed UTF-8 sequences, one per error kind the validator reports.
const MALFORMED_UTF8: &[&[u8]] = &[
    &[0x80],                   // stray continuation byte
    &[0xFF],                   // invalid lead byte
    &[0xC0, 0x80],             // overlong NUL
    &[0xE0, 0x80, 0xAF],       // overlong 3-byte
    &[0xED, 0xA0, 0x80],       // encoded surrogate
    &[0xF4, 0x90, 0x80, 0x80], // above U+10FFFF
    &[0xE2, 0x28, 0xA1],       // bad continuation
];

const MALFORMED_UTF16: &[u16] = &[0xD800, 0xDBFF, 0xDC00, 0xDFFF];

const MALFORMED_UTF32: &[u32] = &[0xD800, 0xDFFF, 0x11_0000, 0xFFFF_FFFF];

/// Insert `count` malformed sequences into `bytes`, which hold well-formed
/// text in `encoding`.
///
/// Sequences are inserted at character boundaries so that each one is
/// reported on its own.
pub fn corrupt(bytes: &mut Vec<u8>, encoding: Encoding, count: usize, seed: Option<u64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or(0));
    let width = encoding.unit_width();

    for _ in 0..count {
        let mut pos = rng.gen_range(0..=bytes.len() / width) * width;
        if encoding.family() == Family::Utf8 {
            while pos < bytes.len() && utf8::is_continuation_byte(bytes[pos]) {
                pos += 1;
            }
        }

        let garbage = malformed_sequence(encoding, &mut rng);
        log::trace!("injecting {:02X?} at byte {}", garbage, pos);
        bytes.splice(pos..pos, garbage);
    }
}

fn malformed_sequence(encoding: Encoding, rng: &mut ChaCha8Rng) -> Vec<u8> {
    let endian = encoding.endian();
    match encoding.family() {
        Family::Utf8 => MALFORMED_UTF8[rng.gen_range(0..MALFORMED_UTF8.len())].to_vec(),
        Family::Utf16 => {
            let unit = MALFORMED_UTF16[rng.gen_range(0..MALFORMED_UTF16.len())];
            match endian {
                Endian::Big => unit.to_be_bytes().to_vec(),
                Endian::Little => unit.to_le_bytes().to_vec(),
            }
        }
        Family::Utf32 => {
            let unit = MALFORMED_UTF32[rng.gen_range(0..MALFORMED_UTF32.len())];
            match endian {
                Endian::Big => unit.to_be_bytes().to_vec(),
                Endian::Little => unit.to_le_bytes().to_vec(),
            }
        }
    }
}
