//! Endianness detection and code-unit byte swapping.
//!
//! In-memory code units are native-endian. A descriptor's bytes, and any
//! byte stream handed to the parse paths, carry a declared byte order
//! instead. Materialising units into bytes (or reading them back) swaps
//! each unit exactly when the declared order differs from the system's.

use alloc::vec::Vec;

use crate::encoding::Endian;
use crate::error::{try_with_capacity, Result};
use crate::text::CodeUnit;

/// Determine whether the system stores integers little-endian.
///
/// Decided by inspecting the in-memory layout of a known value rather than
/// by a compile-time flag. The answer is a pure function of the platform,
/// so it is safe to call from anywhere.
#[inline]
pub fn system_is_little_endian() -> bool {
    // BE: 0x0102 -> 01 02, LE: 0x0102 -> 02 01
    let probe: u16 = 0x0102;
    probe.to_ne_bytes()[0] == 0x02
}

/// Byte-swap every unit of `src` into the byte-oriented `dest`.
///
/// `dest` must hold at least `src.len() * U::WIDTH` bytes; any excess is
/// left untouched.
pub fn swap_into<U: CodeUnit>(dest: &mut [u8], src: &[U]) {
    debug_assert!(dest.len() >= src.len() * U::WIDTH);

    for (chunk, unit) in dest.chunks_exact_mut(U::WIDTH).zip(src) {
        let swapped = unit.swap_bytes();
        chunk.copy_from_slice(bytemuck::bytes_of(&swapped));
    }
}

/// Write native-endian `src` units into `dest` using the byte order `endian`.
///
/// `dest` must hold at least `src.len() * U::WIDTH` bytes.
pub fn write_units<U: CodeUnit>(dest: &mut [u8], src: &[U], endian: Endian) {
    if U::WIDTH == 1 || endian == Endian::native() {
        let raw: &[u8] = bytemuck::cast_slice(src);
        dest[..raw.len()].copy_from_slice(raw);
    } else {
        swap_into(dest, src);
    }
}

/// Read code units stored in byte order `endian` into native-endian units.
///
/// Trailing bytes that do not fill a whole unit are ignored; callers that
/// care reject such input beforehand.
pub fn units_from_bytes<U: CodeUnit>(bytes: &[u8], endian: Endian) -> Result<Vec<U>> {
    let mut units = try_with_capacity(bytes.len() / U::WIDTH)?;
    let chunks = bytes.chunks_exact(U::WIDTH);

    match endian {
        Endian::Big => units.extend(chunks.map(U::from_be_slice)),
        Endian::Little => units.extend(chunks.map(U::from_le_slice)),
    }

    Ok(units)
}
