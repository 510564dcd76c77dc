//! # binary-codable
//!
//! A small binary codec built around a read cursor and a write sink.
//!
//! ## Overview
//!
//! - [`ByteCursor`] walks a borrowed byte slice; [`Decodable`] types pull
//!   themselves off it in a fixed order.
//! - [`ByteSink`] accumulates output; [`Encodable`] types push themselves
//!   onto it.
//! - [`Writer`] types describe their layout declaratively as a
//!   [`Component`], built from leaves and control constructs that always
//!   write in authored order.
//! - The [`ser`] and [`de`] modules carry any serde type through the same
//!   primitives; [`Serde`] adapts such a type to the contracts above.
//!
//! The framework adds no header, magic number or version to the output. The
//! layout is exactly what the encode routines write, and the decode routines
//! must read it back in the same order under the same [`Config`].
//!
//! ## Byte order
//!
//! Integers use [`ByteOrder::Native`] unless the [`Config`] says otherwise.
//! Data that crosses machines should pick [`Config::LITTLE_ENDIAN`] or
//! [`Config::BIG_ENDIAN`] on both ends.
//!
//! ## Example
//!
//! ```rust
//! use binary_codable::{ByteCursor, ByteSink, Decodable, DecodeError, Encodable, EncodeError};
//!
//! #[derive(Debug, PartialEq)]
//! struct Hello {
//!     version: u16,
//!     name: String,
//! }
//!
//! impl Encodable for Hello {
//!     type Error = EncodeError;
//!
//!     fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
//!         sink.encode_int(self.version);
//!         sink.ascii_prefixed::<u8>(&self.name)
//!     }
//! }
//!
//! impl Decodable for Hello {
//!     type Error = DecodeError;
//!
//!     fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
//!         let version = cursor.decode_int();
//!         let name = cursor.ascii_prefixed::<u8>()?;
//!         Ok(Hello { version, name })
//!     }
//! }
//!
//! let hello = Hello { version: 2, name: "ok".into() };
//! let bytes = binary_codable::to_bytes(&hello).unwrap();
//! assert_eq!(bytes.len(), 2 + 1 + 2);
//! assert_eq!(binary_codable::from_bytes::<Hello>(&bytes).unwrap(), hello);
//! ```

pub mod codable;
pub mod config;
pub mod cursor;
pub mod de;
pub mod error;
pub mod int;
pub mod ser;
pub mod sink;
pub mod text;
pub mod writer;

pub use codable::{Decodable, Encodable, Serde};
pub use config::{ByteOrder, Config, LengthWidth};
pub use cursor::ByteCursor;
pub use error::{DecodeError, EncodeError, OutOfBounds};
pub use int::FixedWidth;
pub use sink::ByteSink;
pub use text::TextEncoding;
pub use writer::{Component, IntoComponent, Writable, Writer};

use bytes::{Buf, BytesMut};
use std::fmt;

// ── Decoding ───────────────────────────────────────────────────────────────

/// Decode one `T` from the start of `bytes` with the default [`Config`].
/// Bytes after the value are ignored.
pub fn from_bytes<T>(bytes: &[u8]) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    from_bytes_with(bytes, Config::default())
}

pub fn from_bytes_with<T>(bytes: &[u8], config: Config) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    from_bytes_partial_with(bytes, config).map(|(value, _)| value)
}

/// Decode one `T` and return it with the unconsumed tail of `bytes`.
pub fn from_bytes_partial<T>(bytes: &[u8]) -> Result<(T, &[u8]), T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    from_bytes_partial_with(bytes, Config::default())
}

pub fn from_bytes_partial_with<T>(bytes: &[u8], config: Config) -> Result<(T, &[u8]), T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    match ByteCursor::decode_partial::<T>(bytes, config) {
        Ok((value, consumed)) => {
            tracing::trace!(consumed, remaining = bytes.len() - consumed, "decoded value");
            Ok((value, &bytes[consumed..]))
        }
        Err(err) => {
            tracing::debug!(input_len = bytes.len(), error = ?err, "decode failed");
            Err(err)
        }
    }
}

/// Decode one `T` from the front of `bytes` and remove the bytes it used.
///
/// Anything after the value stays in `bytes`, which makes this the building
/// block for pulling framed messages out of an accumulating buffer. On
/// failure `bytes` is left untouched.
///
/// Length prefixes, tags, `bool`, `char`, strings and every
/// [`Serde`] value report a partial frame as
/// [`DecodeError::UnexpectedEof`]. Integers, floats and byte arrays decode
/// with [`Infallible`](std::convert::Infallible) and read through the
/// panicking cursor operations, so a frame cut inside one of them panics.
/// Buffers that may hold a partial frame of such types should check the
/// frame length first or go through [`Serde`].
pub fn drain_from<T>(bytes: &mut Vec<u8>) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    drain_from_with(bytes, Config::default())
}

pub fn drain_from_with<T>(bytes: &mut Vec<u8>, config: Config) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    let (value, consumed) = match ByteCursor::decode_partial::<T>(bytes, config) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(buffered = bytes.len(), error = ?err, "drain failed");
            return Err(err);
        }
    };
    bytes.drain(..consumed);
    tracing::trace!(consumed, left = bytes.len(), "drained value");
    Ok(value)
}

/// [`drain_from`] for a [`BytesMut`] receive buffer.
pub fn drain_from_buf<T>(buf: &mut BytesMut) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    drain_from_buf_with(buf, Config::default())
}

pub fn drain_from_buf_with<T>(buf: &mut BytesMut, config: Config) -> Result<T, T::Error>
where
    T: Decodable,
    T::Error: fmt::Debug,
{
    let (value, consumed) = match ByteCursor::decode_partial::<T>(&buf[..], config) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(buffered = buf.len(), error = ?err, "drain failed");
            return Err(err);
        }
    };
    buf.advance(consumed);
    tracing::trace!(consumed, left = buf.len(), "drained value");
    Ok(value)
}

// ── Encoding ───────────────────────────────────────────────────────────────

/// Encode `value` into a fresh buffer with the default [`Config`].
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>, T::Error>
where
    T: Encodable + ?Sized,
    T::Error: fmt::Debug,
{
    to_bytes_with(value, Config::default())
}

pub fn to_bytes_with<T>(value: &T, config: Config) -> Result<Vec<u8>, T::Error>
where
    T: Encodable + ?Sized,
    T::Error: fmt::Debug,
{
    match ByteSink::encode_all(value, config) {
        Ok(bytes) => {
            tracing::trace!(produced = bytes.len(), "encoded value");
            Ok(bytes)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "encode failed");
            Err(err)
        }
    }
}

/// Encode `value` and append it to `bytes`.
///
/// `bytes` is unchanged if encoding fails.
pub fn to_bytes_into<T>(value: &T, bytes: &mut Vec<u8>) -> Result<(), T::Error>
where
    T: Encodable + ?Sized,
    T::Error: fmt::Debug,
{
    to_bytes_into_with(value, bytes, Config::default())
}

pub fn to_bytes_into_with<T>(value: &T, bytes: &mut Vec<u8>, config: Config) -> Result<(), T::Error>
where
    T: Encodable + ?Sized,
    T::Error: fmt::Debug,
{
    let encoded = to_bytes_with(value, config)?;
    bytes.extend_from_slice(&encoded);
    Ok(())
}
