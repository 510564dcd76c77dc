//! The `Decodable` / `Encodable` contracts and their built-in impls.
//!
//! A type declares its failure kind through the associated `Error` type.
//! Types that always decode (or encode) successfully use
//! [`Infallible`], and containers that can fail lift their element errors
//! with `From`, which both [`DecodeError`] and [`EncodeError`] implement for
//! `Infallible`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, EncodeError};
use crate::sink::ByteSink;
use crate::text::TextEncoding;
use crate::writer::Component;

/// A type that can construct itself from a [`ByteCursor`].
pub trait Decodable: Sized {
    /// Failure raised when the bytes are present but invalid for `Self`.
    type Error;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, Self::Error>;
}

/// A type that can append its byte representation to a [`ByteSink`].
pub trait Encodable {
    /// Failure raised when the value cannot be represented.
    type Error;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Self::Error>;
}

impl<T: Encodable + ?Sized> Encodable for &T {
    type Error = T::Error;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Self::Error> {
        (**self).encode(sink)
    }
}

// ── Integers and floats ────────────────────────────────────────────────────

macro_rules! impl_codable_int {
    ($($t:ty),* $(,)?) => {$(
        impl Decodable for $t {
            type Error = Infallible;

            fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, Infallible> {
                Ok(cursor.decode_int())
            }
        }

        impl Encodable for $t {
            type Error = Infallible;

            fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
                sink.encode_int(*self);
                Ok(())
            }
        }
    )*};
}

impl_codable_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

macro_rules! impl_codable_float {
    ($($t:ty => $bits:ty),* $(,)?) => {$(
        impl Decodable for $t {
            type Error = Infallible;

            fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, Infallible> {
                Ok(<$t>::from_bits(cursor.decode_int::<$bits>()))
            }
        }

        impl Encodable for $t {
            type Error = Infallible;

            fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
                sink.encode_int(self.to_bits());
                Ok(())
            }
        }
    )*};
}

impl_codable_float!(f32 => u32, f64 => u64);

// ── Small scalars ──────────────────────────────────────────────────────────

impl Decodable for bool {
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        match cursor.try_decode_int::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }
}

impl Encodable for bool {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        sink.u8(u8::from(*self));
        Ok(())
    }
}

impl Decodable for char {
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        let scalar: u32 = cursor.try_decode_int()?;
        char::from_u32(scalar).ok_or(DecodeError::InvalidChar(scalar))
    }
}

impl Encodable for char {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        sink.encode_int(u32::from(*self));
        Ok(())
    }
}

impl Decodable for () {
    type Error = Infallible;

    fn decode(_cursor: &mut ByteCursor<'_>) -> Result<Self, Infallible> {
        Ok(())
    }
}

impl Encodable for () {
    type Error = Infallible;

    fn encode(&self, _sink: &mut ByteSink) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Fixed-size byte arrays travel raw, with no length prefix.
impl<const N: usize> Decodable for [u8; N] {
    type Error = Infallible;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, Infallible> {
        Ok(cursor.decode_array())
    }
}

impl<const N: usize> Encodable for [u8; N] {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        sink.append_bytes(self);
        Ok(())
    }
}

// ── Containers ─────────────────────────────────────────────────────────────

/// One tag byte (0 = absent, 1 = present) followed by the value.
impl<T> Decodable for Option<T>
where
    T: Decodable,
    DecodeError: From<T::Error>,
{
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        match cursor.try_decode_int::<u8>()? {
            0 => Ok(None),
            1 => Ok(Some(cursor.decode_value::<T>()?)),
            other => Err(DecodeError::InvalidTag(other)),
        }
    }
}

impl<T> Encodable for Option<T>
where
    T: Encodable,
{
    type Error = T::Error;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), T::Error> {
        match self {
            None => sink.u8(0),
            Some(value) => {
                sink.u8(1);
                sink.encode_value(value)?;
            }
        }
        Ok(())
    }
}

/// UTF-8 bytes preceded by their length in the configured prefix width.
impl Decodable for String {
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        let length = cursor.decode_length()?;
        let offset = cursor.position();
        let bytes = cursor.try_consume(length)?;
        TextEncoding::Utf8.decode(bytes, offset)
    }
}

impl Encodable for str {
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        sink.encode_length(self.len())?;
        sink.encode_utf8(self);
        Ok(())
    }
}

impl Encodable for String {
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        self.as_str().encode(sink)
    }
}

/// Element count in the configured prefix width, then each element.
///
/// Elements that occupy no bytes (such as `()`) cannot be counted against
/// the input, so for them the count may not exceed the bytes left after
/// the prefix. A larger count fails with [`DecodeError::LengthOverflow`].
impl<T> Decodable for Vec<T>
where
    T: Decodable,
    DecodeError: From<T::Error>,
{
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        let count = cursor.decode_length()?;
        let available = cursor.remaining_len();
        // A corrupt count must not drive a huge allocation up front.
        let mut items = Vec::with_capacity(count.min(available));
        while items.len() < count {
            let start = cursor.position();
            items.push(cursor.decode_value::<T>()?);
            if cursor.position() == start && items.len() < count && count > available {
                return Err(DecodeError::LengthOverflow(count as i128));
            }
        }
        Ok(items)
    }
}

impl<T> Encodable for [T]
where
    T: Encodable,
    EncodeError: From<T::Error>,
{
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        sink.encode_length(self.len())?;
        for item in self {
            sink.encode_value(item)?;
        }
        Ok(())
    }
}

impl<T> Encodable for Vec<T>
where
    T: Encodable,
    EncodeError: From<T::Error>,
{
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        self.as_slice().encode(sink)
    }
}

/// A composed writer is always encodable; it cannot fail.
impl Encodable for Component<'_> {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        sink.write(self);
        Ok(())
    }
}

// ── serde adapter ──────────────────────────────────────────────────────────

/// Carries a serde type through the [`Decodable`] / [`Encodable`] contracts.
///
/// The layout is the one described in [`crate::ser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Serde<T>(pub T);

impl<T> Serde<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> Decodable for Serde<T> {
    type Error = DecodeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        crate::de::deserialize(cursor).map(Serde)
    }
}

impl<T: Serialize> Encodable for Serde<T> {
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        crate::ser::serialize(&self.0, sink)
    }
}
