//! Fixed-width code units.
//!
//! A code unit is the storage element of an encoding form: `u8` for UTF-8,
//! `u16` for UTF-16 and `u32` for UTF-32. In memory, units are always held in
//! native byte order; the [`endian`](crate::endian) module converts them to
//! and from a declared byte order.

use bytemuck::Pod;

/// A fixed-width Unicode code unit (`u8`, `u16` or `u32`).
pub trait CodeUnit: Pod + Default + Eq + core::fmt::Debug + 'static {
    /// Width of one unit in bytes.
    const WIDTH: usize;

    /// The all-zero terminator unit.
    const ZERO: Self;

    /// Widen the unit to a `u32` for inspection.
    fn to_u32(self) -> u32;

    /// Narrow a `u32` to this unit width, discarding high bits.
    fn from_u32(value: u32) -> Self;

    /// Reverse the byte order of the unit.
    fn swap_bytes(self) -> Self;

    /// Read a unit stored big-endian. `bytes.len()` must equal `WIDTH`.
    fn from_be_slice(bytes: &[u8]) -> Self;

    /// Read a unit stored little-endian. `bytes.len()` must equal `WIDTH`.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! code_unit_impl {
    ($ty:ty, $width:expr) => {
        impl CodeUnit for $ty {
            const WIDTH: usize = $width;
            const ZERO: Self = 0;

            #[inline(always)]
            fn to_u32(self) -> u32 {
                self as u32
            }

            #[inline(always)]
            fn from_u32(value: u32) -> Self {
                value as $ty
            }

            #[inline(always)]
            fn swap_bytes(self) -> Self {
                <$ty>::swap_bytes(self)
            }

            #[inline]
            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(bytes);
                <$ty>::from_be_bytes(raw)
            }

            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

code_unit_impl!(u8, 1);
code_unit_impl!(u16, 2);
code_unit_impl!(u32, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(<u8 as CodeUnit>::WIDTH, 1);
        assert_eq!(<u16 as CodeUnit>::WIDTH, 2);
        assert_eq!(<u32 as CodeUnit>::WIDTH, 4);
    }

    #[test]
    fn swap_is_involution() {
        assert_eq!(CodeUnit::swap_bytes(0x1234u16), 0x3412);
        assert_eq!(CodeUnit::swap_bytes(0x0001_F389u32), 0x89F3_0100);
        assert_eq!(CodeUnit::swap_bytes(CodeUnit::swap_bytes(0xD83Cu16)), 0xD83C);
        assert_eq!(CodeUnit::swap_bytes(0x41u8), 0x41);
    }

    #[test]
    fn read_with_byte_order() {
        assert_eq!(<u16 as CodeUnit>::from_be_slice(&[0xFE, 0xFF]), 0xFEFF);
        assert_eq!(<u16 as CodeUnit>::from_le_slice(&[0xFF, 0xFE]), 0xFEFF);
        assert_eq!(
            <u32 as CodeUnit>::from_be_slice(&[0x00, 0x01, 0xF3, 0x89]),
            0x1F389
        );
        assert_eq!(
            <u32 as CodeUnit>::from_le_slice(&[0x89, 0xF3, 0x01, 0x00]),
            0x1F389
        );
    }

    #[test]
    fn narrowing() {
        assert_eq!(<u16 as CodeUnit>::from_u32(0x1_FFFD), 0xFFFD);
        assert_eq!(<u8 as CodeUnit>::from_u32(0x141), 0x41);
        assert_eq!(0xDC00u16.to_u32(), 0xDC00);
    }
}
