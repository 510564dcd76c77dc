//! The encoding side: an append-only byte buffer.

use crate::codable::Encodable;
use crate::config::{ByteOrder, Config};
use crate::error::EncodeError;
use crate::int::FixedWidth;
use crate::text::TextEncoding;
use crate::writer::Writable;

/// A growable output buffer. Bytes are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteSink {
    bytes: Vec<u8>,
    config: Config,
}

impl ByteSink {
    /// Empty sink with the default [`Config`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        ByteSink {
            bytes: Vec::new(),
            config,
        }
    }

    /// Empty sink with room for `capacity` bytes and the default [`Config`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_config(capacity, Config::default())
    }

    pub fn with_capacity_and_config(capacity: usize, config: Config) -> Self {
        ByteSink {
            bytes: Vec::with_capacity(capacity),
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the sink and return everything written.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    // ── Integers ───────────────────────────────────────────────────────────

    /// Append `value` in the configured byte order.
    pub fn encode_int<I: FixedWidth>(&mut self, value: I) {
        self.encode_int_with(value, self.config.byte_order);
    }

    /// Append `value` in an explicit byte order.
    pub fn encode_int_with<I: FixedWidth>(&mut self, value: I, order: ByteOrder) {
        value.append_to(order, &mut self.bytes);
    }

    pub fn u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    /// Append a length prefix of the configured [`LengthWidth`](crate::LengthWidth).
    pub fn encode_length(&mut self, len: usize) -> Result<(), EncodeError> {
        self.config.length_width.write(len, self)
    }

    // ── Raw bytes ──────────────────────────────────────────────────────────

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn extend_bytes<I: IntoIterator<Item = u8>>(&mut self, bytes: I) {
        self.bytes.extend(bytes);
    }

    /// Append anything [`Writable`], including a composed
    /// [`Component`](crate::Component).
    pub fn write<W: Writable + ?Sized>(&mut self, value: &W) {
        value.write_to(&mut self.bytes);
    }

    // ── Strings ────────────────────────────────────────────────────────────

    /// Append `text` under `encoding`, without a length prefix.
    ///
    /// Nothing is appended when `text` cannot be represented.
    pub fn encode_string(&mut self, text: &str, encoding: TextEncoding) -> Result<(), EncodeError> {
        encoding.encode_into(text, &mut self.bytes)
    }

    pub fn encode_ascii(&mut self, text: &str) -> Result<(), EncodeError> {
        self.encode_string(text, TextEncoding::Ascii)
    }

    pub fn encode_utf8(&mut self, text: &str) {
        self.bytes.extend_from_slice(text.as_bytes());
    }

    /// Append the encoded byte length of `text` as an `L`, then the bytes.
    ///
    /// Fails with [`EncodeError::LengthOverflow`] when the length does not
    /// fit in `L`; nothing is appended in that case.
    pub fn encode_prefixed_string<L: FixedWidth>(
        &mut self,
        text: &str,
        encoding: TextEncoding,
    ) -> Result<(), EncodeError> {
        let encoded = encoding.encode(text)?;
        let prefix = L::from_len(encoded.len()).ok_or(EncodeError::LengthOverflow {
            len: encoded.len(),
            max: L::MAX_LEN,
        })?;
        self.encode_int(prefix);
        self.bytes.extend_from_slice(&encoded);
        Ok(())
    }

    pub fn ascii_prefixed<L: FixedWidth>(&mut self, text: &str) -> Result<(), EncodeError> {
        self.encode_prefixed_string::<L>(text, TextEncoding::Ascii)
    }

    pub fn utf8_prefixed<L: FixedWidth>(&mut self, text: &str) -> Result<(), EncodeError> {
        self.encode_prefixed_string::<L>(text, TextEncoding::Utf8)
    }

    // ── Nested values ──────────────────────────────────────────────────────

    /// Append the encoding of `value`.
    pub fn encode_value<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<(), T::Error> {
        value.encode(self)
    }

    // ── Whole-value entry points ───────────────────────────────────────────

    /// Encode `value` into a fresh buffer.
    pub fn encode_all<T: Encodable + ?Sized>(value: &T, config: Config) -> Result<Vec<u8>, T::Error> {
        let mut sink = ByteSink::with_config(config);
        value.encode(&mut sink)?;
        Ok(sink.into_bytes())
    }

    /// Encode `value` and append it to `bytes`.
    ///
    /// `bytes` is only touched once the whole value has encoded, so a failure
    /// never leaves half a value behind.
    pub fn encode_into<T: Encodable + ?Sized>(
        value: &T,
        bytes: &mut Vec<u8>,
        config: Config,
    ) -> Result<(), T::Error> {
        let encoded = Self::encode_all(value, config)?;
        bytes.extend_from_slice(&encoded);
        Ok(())
    }
}
