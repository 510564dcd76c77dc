//! Fixed-width integer support.
//!
//! [`FixedWidth`] is implemented for every primitive integer type from `u8`
//! to `i128`. `usize` and `isize` are left out on purpose: their width is a
//! property of the target, not of the layout.

use crate::config::ByteOrder;

/// An integer with a fixed encoded width.
pub trait FixedWidth: Copy + Sized + 'static {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Largest byte length this type can carry as a length prefix.
    const MAX_LEN: u64;

    /// Append `self` to `out` in `order`.
    fn append_to(self, order: ByteOrder, out: &mut Vec<u8>);

    /// Rebuild a value from exactly [`Self::WIDTH`] bytes.
    ///
    /// Panics when `bytes.len() != Self::WIDTH`.
    fn read_from(bytes: &[u8], order: ByteOrder) -> Self;

    /// Convert a byte length into a prefix value, if it fits.
    fn from_len(len: usize) -> Option<Self>;

    /// Convert a prefix value back into a byte length, if it is one.
    fn to_len(self) -> Option<usize>;

    /// Widen for diagnostics; saturates for `u128` values above `i128::MAX`.
    fn lossy_i128(self) -> i128;
}

macro_rules! impl_fixed_width {
    ($($t:ty),* $(,)?) => {$(
        impl FixedWidth for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();

            const MAX_LEN: u64 = if (<$t>::MAX as u128) > (u64::MAX as u128) {
                u64::MAX
            } else {
                <$t>::MAX as u64
            };

            #[inline]
            fn append_to(self, order: ByteOrder, out: &mut Vec<u8>) {
                match order.resolve() {
                    ByteOrder::Big => out.extend_from_slice(&self.to_be_bytes()),
                    _ => out.extend_from_slice(&self.to_le_bytes()),
                }
            }

            #[inline]
            fn read_from(bytes: &[u8], order: ByteOrder) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                match order.resolve() {
                    ByteOrder::Big => <$t>::from_be_bytes(raw),
                    _ => <$t>::from_le_bytes(raw),
                }
            }

            #[inline]
            fn from_len(len: usize) -> Option<Self> {
                <$t>::try_from(len).ok()
            }

            #[inline]
            fn to_len(self) -> Option<usize> {
                usize::try_from(self).ok()
            }

            #[inline]
            fn lossy_i128(self) -> i128 {
                i128::try_from(self).unwrap_or(i128::MAX)
            }
        }
    )*};
}

impl_fixed_width!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);
