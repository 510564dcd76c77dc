//! The decoding side: a read position over a borrowed byte slice.
//!
//! Operations that take an explicit byte count (`skip`, `consume`,
//! `decode_int`, `decode_bytes`, `decode_string`) treat running past the end
//! of the input as a programming error in the decode routine and panic, the
//! same way slice indexing does. Operations whose length comes from the input
//! itself (`decode_prefixed_string`, `decode_length` and the serde bridge)
//! report a truncated input as [`DecodeError::UnexpectedEof`] instead.

use crate::codable::Decodable;
use crate::config::{ByteOrder, Config};
use crate::error::{DecodeError, OutOfBounds};
use crate::int::FixedWidth;
use crate::text::TextEncoding;

/// A read cursor. `0 <= position <= bytes.len()` holds at all times.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
    config: Config,
}

impl<'a> ByteCursor<'a> {
    /// Cursor at the start of `bytes` with the default [`Config`].
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, Config::default())
    }

    pub fn with_config(bytes: &'a [u8], config: Config) -> Self {
        ByteCursor {
            bytes,
            position: 0,
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Everything read so far.
    pub fn consumed(&self) -> &'a [u8] {
        &self.bytes[..self.position]
    }

    /// Everything not yet read.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    pub fn remaining_len(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.bytes.len()
    }

    // ── Positioning ────────────────────────────────────────────────────────

    /// Advance by `count` bytes.
    ///
    /// # Panics
    ///
    /// When fewer than `count` bytes remain.
    #[track_caller]
    pub fn skip(&mut self, count: usize) {
        if let Err(err) = self.try_skip(count) {
            panic!("byte cursor overrun at offset {}: {err}", self.position);
        }
    }

    /// Advance by `count` bytes, or fail without moving.
    pub fn try_skip(&mut self, count: usize) -> Result<(), OutOfBounds> {
        let remaining = self.remaining_len();
        if count > remaining {
            return Err(OutOfBounds {
                requested: count,
                remaining,
            });
        }
        self.position += count;
        Ok(())
    }

    /// Return the next `count` bytes and advance past them.
    ///
    /// # Panics
    ///
    /// When fewer than `count` bytes remain.
    #[track_caller]
    pub fn consume(&mut self, count: usize) -> &'a [u8] {
        let anchor = self.position;
        self.skip(count);
        &self.bytes[anchor..self.position]
    }

    /// Checked form of [`consume`](Self::consume).
    pub fn try_consume(&mut self, count: usize) -> Result<&'a [u8], OutOfBounds> {
        let anchor = self.position;
        self.try_skip(count)?;
        Ok(&self.bytes[anchor..self.position])
    }

    // ── Integers ───────────────────────────────────────────────────────────

    /// Read an `I` in the configured byte order.
    #[track_caller]
    pub fn decode_int<I: FixedWidth>(&mut self) -> I {
        self.decode_int_with(self.config.byte_order)
    }

    /// Read an `I` in an explicit byte order.
    #[track_caller]
    pub fn decode_int_with<I: FixedWidth>(&mut self, order: ByteOrder) -> I {
        I::read_from(self.consume(I::WIDTH), order)
    }

    #[track_caller]
    pub fn u8(&mut self) -> u8 {
        self.decode_int()
    }

    /// Checked form of [`decode_int`](Self::decode_int).
    pub fn try_decode_int<I: FixedWidth>(&mut self) -> Result<I, OutOfBounds> {
        let order = self.config.byte_order;
        Ok(I::read_from(self.try_consume(I::WIDTH)?, order))
    }

    /// Read a length prefix of the configured [`LengthWidth`](crate::LengthWidth).
    pub fn decode_length(&mut self) -> Result<usize, DecodeError> {
        self.config.length_width.read(self)
    }

    // ── Raw bytes ──────────────────────────────────────────────────────────

    /// Copy the next `count` bytes out.
    #[track_caller]
    pub fn decode_bytes(&mut self, count: usize) -> Vec<u8> {
        self.consume(count).to_vec()
    }

    #[track_caller]
    pub fn decode_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.consume(N));
        out
    }

    // ── Strings ────────────────────────────────────────────────────────────

    /// Decode `length` bytes of text.
    #[track_caller]
    pub fn decode_string(
        &mut self,
        length: usize,
        encoding: TextEncoding,
    ) -> Result<String, DecodeError> {
        let offset = self.position;
        encoding.decode(self.consume(length), offset)
    }

    #[track_caller]
    pub fn ascii(&mut self, length: usize) -> Result<String, DecodeError> {
        self.decode_string(length, TextEncoding::Ascii)
    }

    #[track_caller]
    pub fn utf8(&mut self, length: usize) -> Result<String, DecodeError> {
        self.decode_string(length, TextEncoding::Utf8)
    }

    /// Decode text preceded by its byte length as an `L`.
    ///
    /// Must be paired with [`ByteSink::encode_prefixed_string`](crate::ByteSink::encode_prefixed_string)
    /// using the same `L`; nothing in the stream checks that.
    pub fn decode_prefixed_string<L: FixedWidth>(
        &mut self,
        encoding: TextEncoding,
    ) -> Result<String, DecodeError> {
        let prefix: L = L::read_from(self.try_consume(L::WIDTH)?, self.config.byte_order);
        let length = prefix
            .to_len()
            .ok_or(DecodeError::LengthOverflow(prefix.lossy_i128()))?;
        let offset = self.position;
        encoding.decode(self.try_consume(length)?, offset)
    }

    pub fn ascii_prefixed<L: FixedWidth>(&mut self) -> Result<String, DecodeError> {
        self.decode_prefixed_string::<L>(TextEncoding::Ascii)
    }

    pub fn utf8_prefixed<L: FixedWidth>(&mut self) -> Result<String, DecodeError> {
        self.decode_prefixed_string::<L>(TextEncoding::Utf8)
    }

    // ── Nested values ──────────────────────────────────────────────────────

    /// Decode a `T` at the current position.
    pub fn decode_value<T: Decodable>(&mut self) -> Result<T, T::Error> {
        T::decode(self)
    }

    // ── Whole-input entry points ───────────────────────────────────────────

    /// Decode one `T` from the start of `bytes`. Leftover bytes are ignored.
    pub fn decode_all<T: Decodable>(bytes: &[u8], config: Config) -> Result<T, T::Error> {
        Self::decode_partial(bytes, config).map(|(value, _)| value)
    }

    /// Decode one `T` and report how many bytes it took.
    pub fn decode_partial<T: Decodable>(
        bytes: &[u8],
        config: Config,
    ) -> Result<(T, usize), T::Error> {
        let mut cursor = ByteCursor::with_config(bytes, config);
        let value = T::decode(&mut cursor)?;
        Ok((value, cursor.position))
    }

    /// Decode one `T` and remove the bytes it took from the front of `bytes`.
    ///
    /// Trailing bytes stay in place so the next call can pick up the next
    /// value. On failure `bytes` is not modified.
    pub fn decode_and_drain<T: Decodable>(
        bytes: &mut Vec<u8>,
        config: Config,
    ) -> Result<T, T::Error> {
        let (value, consumed) = Self::decode_partial(bytes, config)?;
        bytes.drain(..consumed);
        Ok(value)
    }
}
