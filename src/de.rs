//! serde bridge, decoding side. The layout is described in [`crate::ser`].
//!
//! Every read here is checked: a truncated input surfaces as
//! [`DecodeError::UnexpectedEof`] rather than a cursor panic, because the
//! lengths being read come from the input itself.

use serde::de::{
    self, Deserialize, DeserializeOwned, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::int::FixedWidth;
use crate::text::TextEncoding;

type Result<T> = std::result::Result<T, DecodeError>;

/// Deserialize one owned `T` at the cursor's position.
pub fn deserialize<T: DeserializeOwned>(cursor: &mut ByteCursor<'_>) -> Result<T> {
    T::deserialize(&mut Deserializer::new(cursor))
}

/// Deserialize a `T` that may borrow from the cursor's input.
pub fn deserialize_borrowed<'de, T: Deserialize<'de>>(cursor: &mut ByteCursor<'de>) -> Result<T> {
    T::deserialize(&mut Deserializer::new(cursor))
}

/// The deserializer. Borrows the cursor for the duration of one value.
pub struct Deserializer<'c, 'de> {
    cursor: &'c mut ByteCursor<'de>,
}

impl<'c, 'de> Deserializer<'c, 'de> {
    pub fn new(cursor: &'c mut ByteCursor<'de>) -> Self {
        Deserializer { cursor }
    }

    fn take(&mut self, n: usize) -> Result<&'de [u8]> {
        Ok(self.cursor.try_consume(n)?)
    }

    fn read<I: FixedWidth>(&mut self) -> Result<I> {
        let order = self.cursor.config().byte_order;
        Ok(I::read_from(self.take(I::WIDTH)?, order))
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    fn read_prefixed(&mut self) -> Result<&'de [u8]> {
        let len = self.cursor.decode_length()?;
        self.take(len)
    }

    fn read_str(&mut self) -> Result<&'de str> {
        let len = self.cursor.decode_length()?;
        let offset = self.cursor.position();
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidText {
            encoding: TextEncoding::Utf8,
            offset,
        })
    }
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'_, 'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(DecodeError::Unsupported(
            "deserialize_any (the layout is not self-describing)",
        ))
    }

    /// One byte; anything but 0 or 1 is `InvalidBool`.
    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.read_u8()? {
            0 => visitor.visit_bool(false),
            1 => visitor.visit_bool(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.read()?)
    }
    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.read()?)
    }
    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.read()?)
    }
    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.read()?)
    }
    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.read()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.read()?)
    }
    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.read()?)
    }
    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.read()?)
    }
    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.read()?)
    }
    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u128(self.read()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(f32::from_bits(self.read()?))
    }
    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(f64::from_bits(self.read()?))
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let scalar: u32 = self.read()?;
        let c = char::from_u32(scalar).ok_or(DecodeError::InvalidChar(scalar))?;
        visitor.visit_char(c)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.read_str()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.read_str()?.to_owned())
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_bytes(self.read_prefixed()?)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_byte_buf(self.read_prefixed()?.to_vec())
    }

    /// Tag byte 0 or 1; anything else is `InvalidTag`.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.read_u8()? {
            0 => visitor.visit_none(),
            1 => visitor.visit_some(self),
            other => Err(DecodeError::InvalidTag(other)),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    /// Element count prefix, then the elements.
    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.cursor.decode_length()?;
        visitor.visit_seq(Counted::from_prefix(self, count))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self, len))
    }

    /// Pair count prefix, then alternating keys and values.
    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.cursor.decode_length()?;
        visitor.visit_map(Counted::from_prefix(self, count))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self, fields.len()))
    }

    /// `u32` variant index, checked against the variant count.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(Variant {
            de: self,
            known: variants.len(),
        })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.read()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(DecodeError::Unsupported(
            "deserialize_ignored_any (the layout is not self-describing)",
        ))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Sequence, tuple, struct and map access over a known element count.
struct Counted<'a, 'c, 'de> {
    de: &'a mut Deserializer<'c, 'de>,
    remaining: usize,
    /// Set for a count read from the input that exceeds the bytes left.
    /// Such a count is only honoured while every element consumes input.
    oversized: Option<usize>,
    /// Cursor position at the start of the previous element.
    mark: Option<usize>,
}

impl<'a, 'c, 'de> Counted<'a, 'c, 'de> {
    /// A count fixed by the type (tuples, structs, variants).
    fn new(de: &'a mut Deserializer<'c, 'de>, count: usize) -> Self {
        Counted {
            de,
            remaining: count,
            oversized: None,
            mark: None,
        }
    }

    /// A count read from the input (sequences, maps).
    fn from_prefix(de: &'a mut Deserializer<'c, 'de>, count: usize) -> Self {
        let oversized = (count > de.cursor.remaining_len()).then_some(count);
        Counted {
            de,
            remaining: count,
            oversized,
            mark: None,
        }
    }

    /// Claim the next element, or report that the count is exhausted.
    fn advance(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            return Ok(false);
        }
        let position = self.de.cursor.position();
        if let Some(count) = self.oversized {
            if self.mark == Some(position) {
                return Err(DecodeError::LengthOverflow(count as i128));
            }
        }
        self.mark = Some(position);
        self.remaining -= 1;
        Ok(true)
    }
}

impl<'de> SeqAccess<'de> for Counted<'_, '_, 'de> {
    type Error = DecodeError;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if !self.advance()? {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        // Capped so a corrupt count cannot pre-allocate unbounded memory.
        Some(self.remaining.min(self.de.cursor.remaining_len()))
    }
}

impl<'de> MapAccess<'de> for Counted<'_, '_, 'de> {
    type Error = DecodeError;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if !self.advance()? {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining.min(self.de.cursor.remaining_len()))
    }
}

struct Variant<'a, 'c, 'de> {
    de: &'a mut Deserializer<'c, 'de>,
    known: usize,
}

impl<'a, 'c, 'de> EnumAccess<'de> for Variant<'a, 'c, 'de> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant)> {
        let index: u32 = self.de.read()?;
        if index as usize >= self.known {
            return Err(DecodeError::InvalidDiscriminant(index));
        }
        let value = seed.deserialize(de::value::U32Deserializer::<DecodeError>::new(index))?;
        Ok((value, self))
    }
}

impl<'de> VariantAccess<'de> for Variant<'_, '_, 'de> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self.de, len))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self.de, fields.len()))
    }
}
