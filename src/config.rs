//! Codec configuration.
//!
//! A [`Config`] travels with every [`ByteCursor`](crate::ByteCursor) and
//! [`ByteSink`](crate::ByteSink). It decides two things the wire layout
//! depends on but the framework cannot infer:
//!
//! - the byte order of fixed-width integers ([`ByteOrder`]),
//! - the width of length prefixes written for strings, sequences and maps
//!   when no explicit width is requested ([`LengthWidth`]).
//!
//! The encoder and decoder of a given layout must use the same `Config`.
//! Nothing in the byte stream records it.

use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, EncodeError};
use crate::int::FixedWidth;
use crate::sink::ByteSink;

/// Byte order of fixed-width integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first (network order).
    Big,
    /// Whatever the compiling target uses.
    #[default]
    Native,
}

impl ByteOrder {
    /// Resolve [`ByteOrder::Native`] to the concrete order of this target.
    pub const fn resolve(self) -> Self {
        match self {
            ByteOrder::Native if cfg!(target_endian = "big") => ByteOrder::Big,
            ByteOrder::Native => ByteOrder::Little,
            other => other,
        }
    }
}

/// Width of a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthWidth {
    /// One byte, lengths up to 255.
    U8,
    /// Two bytes.
    U16,
    /// Four bytes.
    #[default]
    U32,
    /// Eight bytes.
    U64,
}

impl LengthWidth {
    /// Number of bytes the prefix occupies.
    pub const fn size(self) -> usize {
        match self {
            LengthWidth::U8 => 1,
            LengthWidth::U16 => 2,
            LengthWidth::U32 => 4,
            LengthWidth::U64 => 8,
        }
    }

    /// Largest length the prefix can carry.
    pub const fn max(self) -> u64 {
        match self {
            LengthWidth::U8 => u8::MAX as u64,
            LengthWidth::U16 => u16::MAX as u64,
            LengthWidth::U32 => u32::MAX as u64,
            LengthWidth::U64 => u64::MAX,
        }
    }

    pub(crate) fn write(self, len: usize, sink: &mut ByteSink) -> Result<(), EncodeError> {
        fn put<L: FixedWidth>(len: usize, sink: &mut ByteSink) -> Result<(), EncodeError> {
            let prefix = L::from_len(len).ok_or(EncodeError::LengthOverflow {
                len,
                max: L::MAX_LEN,
            })?;
            sink.encode_int(prefix);
            Ok(())
        }
        match self {
            LengthWidth::U8 => put::<u8>(len, sink),
            LengthWidth::U16 => put::<u16>(len, sink),
            LengthWidth::U32 => put::<u32>(len, sink),
            LengthWidth::U64 => put::<u64>(len, sink),
        }
    }

    pub(crate) fn read(self, cursor: &mut ByteCursor<'_>) -> Result<usize, DecodeError> {
        fn take<L: FixedWidth>(cursor: &mut ByteCursor<'_>) -> Result<usize, DecodeError> {
            let bytes = cursor.try_consume(L::WIDTH)?;
            let prefix = L::read_from(bytes, cursor.config().byte_order);
            prefix
                .to_len()
                .ok_or(DecodeError::LengthOverflow(prefix.lossy_i128()))
        }
        match self {
            LengthWidth::U8 => take::<u8>(cursor),
            LengthWidth::U16 => take::<u16>(cursor),
            LengthWidth::U32 => take::<u32>(cursor),
            LengthWidth::U64 => take::<u64>(cursor),
        }
    }
}

/// Layout settings shared by an encoder and its matching decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Byte order of every fixed-width integer.
    pub byte_order: ByteOrder,
    /// Prefix width used by `String`, `Vec<T>` and the serde bridge.
    pub length_width: LengthWidth,
}

impl Config {
    /// Little-endian integers, `u32` length prefixes.
    pub const LITTLE_ENDIAN: Config = Config {
        byte_order: ByteOrder::Little,
        length_width: LengthWidth::U32,
    };

    /// Big-endian integers, `u32` length prefixes.
    pub const BIG_ENDIAN: Config = Config {
        byte_order: ByteOrder::Big,
        length_width: LengthWidth::U32,
    };

    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub const fn with_length_width(mut self, length_width: LengthWidth) -> Self {
        self.length_width = length_width;
        self
    }
}
