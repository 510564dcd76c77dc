//! serde bridge, encoding side.
//!
//! Any `T: Serialize` can be written into a [`ByteSink`] with the same
//! primitive rules the [`Encodable`](crate::Encodable) impls use, so
//! hand-written and derived layouts interoperate.
//!
//! ## Layout
//! - `bool`: one byte, 0 or 1
//! - integers: natural width, in the sink's byte order
//! - `f32` / `f64`: IEEE 754 bits as `u32` / `u64`
//! - `char`: Unicode scalar as `u32`
//! - strings, byte buffers: length prefix + bytes (UTF-8 for strings)
//! - sequences, maps: element (pair) count prefix + elements
//! - `Option`: tag byte (0 = None, 1 = Some) + value
//! - unit, unit structs: nothing
//! - enum variants: `u32` variant index + fields
//! - structs, tuples: fields consecutively, no prefix
//!
//! Length prefixes use the sink's [`LengthWidth`](crate::LengthWidth).

use serde::ser::{self, Serialize};

use crate::error::EncodeError;
use crate::sink::ByteSink;

type Result<T> = std::result::Result<T, EncodeError>;

/// Serialize `value` onto the end of `sink`.
pub fn serialize<T: Serialize + ?Sized>(value: &T, sink: &mut ByteSink) -> Result<()> {
    value.serialize(&mut Serializer::new(sink))
}

/// The serializer. Borrows the sink for the duration of one value.
pub struct Serializer<'a> {
    sink: &'a mut ByteSink,
}

impl<'a> Serializer<'a> {
    pub fn new(sink: &'a mut ByteSink) -> Self {
        Serializer { sink }
    }

    fn write_prefixed(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.encode_length(bytes.len())?;
        self.sink.append_bytes(bytes);
        Ok(())
    }
}

impl<'s, 'a> ser::Serializer for &'s mut Serializer<'a> {
    type Ok = ();
    type Error = EncodeError;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    /// bool → one byte, 0 or 1
    fn serialize_bool(self, v: bool) -> Result<()> {
        self.sink.u8(u8::from(v));
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_i128(self, v: i128) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.sink.u8(v);
        Ok(())
    }
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }
    fn serialize_u128(self, v: u128) -> Result<()> {
        self.sink.encode_int(v);
        Ok(())
    }

    /// f32 → IEEE 754 bits as `u32`
    fn serialize_f32(self, v: f32) -> Result<()> {
        self.sink.encode_int(v.to_bits());
        Ok(())
    }
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.sink.encode_int(v.to_bits());
        Ok(())
    }

    /// char → Unicode scalar as `u32`
    fn serialize_char(self, v: char) -> Result<()> {
        self.sink.encode_int(u32::from(v));
        Ok(())
    }

    /// str → length prefix + UTF-8 bytes
    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_prefixed(v.as_bytes())
    }

    /// Byte buffer → length prefix + raw bytes
    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write_prefixed(v)
    }

    /// None → tag byte 0
    fn serialize_none(self) -> Result<()> {
        self.sink.u8(0);
        Ok(())
    }

    /// Some → tag byte 1, then the value
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        self.sink.u8(1);
        value.serialize(self)
    }

    /// Unit → nothing
    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    /// Unit variant → `u32` variant index
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.sink.encode_int(variant_index);
        Ok(())
    }

    /// Newtype struct → the inner value, no wrapper
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    /// Newtype variant → `u32` variant index, then the value
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.sink.encode_int(variant_index);
        value.serialize(self)
    }

    /// Sequence → element count prefix, then the elements.
    /// The count must be known up front.
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        let len = len.ok_or(EncodeError::LengthRequired)?;
        self.sink.encode_length(len)?;
        Ok(self)
    }

    /// Tuple → elements back to back, no prefix
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    /// Tuple variant → `u32` variant index, then the fields
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.sink.encode_int(variant_index);
        Ok(self)
    }

    /// Map → pair count prefix, then key, value, key, value, ...
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        let len = len.ok_or(EncodeError::LengthRequired)?;
        self.sink.encode_length(len)?;
        Ok(self)
    }

    /// Struct → fields in declaration order, no names
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    /// Struct variant → `u32` variant index, then the fields
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.sink.encode_int(variant_index);
        Ok(self)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

macro_rules! forward_element {
    ($($t:ident),*) => {$(
        impl<'s, 'a> ser::$t for &'s mut Serializer<'a> {
            type Ok = ();
            type Error = EncodeError;

            fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }

            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    )*};
}

macro_rules! forward_field {
    ($($t:ident),*) => {$(
        impl<'s, 'a> ser::$t for &'s mut Serializer<'a> {
            type Ok = ();
            type Error = EncodeError;

            fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }

            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    )*};
}

macro_rules! forward_named_field {
    ($($t:ident),*) => {$(
        impl<'s, 'a> ser::$t for &'s mut Serializer<'a> {
            type Ok = ();
            type Error = EncodeError;

            fn serialize_field<T: Serialize + ?Sized>(
                &mut self,
                _key: &'static str,
                value: &T,
            ) -> Result<()> {
                value.serialize(&mut **self)
            }

            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    )*};
}

forward_element!(SerializeSeq, SerializeTuple);
forward_field!(SerializeTupleStruct, SerializeTupleVariant);
forward_named_field!(SerializeStruct, SerializeStructVariant);

impl<'s, 'a> ser::SerializeMap for &'s mut Serializer<'a> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}
