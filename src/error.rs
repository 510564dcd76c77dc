use serde::{de, ser};
use std::convert::Infallible;
use std::fmt;

use crate::text::TextEncoding;

/// A checked cursor operation asked for more bytes than were left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("requested {requested} bytes but only {remaining} remain")]
pub struct OutOfBounds {
    pub requested: usize,
    pub remaining: usize,
}

/// Errors raised while decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended before a length-driven read could complete.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// Bytes are not valid text in the declared encoding.
    #[error("invalid {encoding} text at offset {offset}")]
    InvalidText {
        encoding: TextEncoding,
        offset: usize,
    },

    /// A boolean byte was neither 0 nor 1.
    #[error("invalid boolean byte: {0:#04x} (must be 0 or 1)")]
    InvalidBool(u8),

    /// An optional-value tag was neither 0 nor 1.
    #[error("invalid option tag: {0:#04x} (must be 0 or 1)")]
    InvalidTag(u8),

    /// An enum discriminant has no matching variant.
    #[error("invalid discriminant value: {0}")]
    InvalidDiscriminant(u32),

    /// A `u32` is not a Unicode scalar value.
    #[error("invalid char scalar: {0:#x}")]
    InvalidChar(u32),

    /// A length prefix is negative or does not fit in `usize`.
    #[error("length prefix {0} is not a valid length")]
    LengthOverflow(i128),

    /// The layout cannot express this request.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A custom message from a `Deserialize` impl.
    #[error("{0}")]
    Message(String),
}

/// Errors raised while encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// ASCII was required but the text contains `ch` at byte `offset`.
    #[error("non-ASCII character {ch:?} at byte {offset}")]
    NonAscii { offset: usize, ch: char },

    /// `ch` has no representation in `encoding`.
    #[error("character {ch:?} cannot be represented in {encoding}")]
    Unrepresentable { encoding: TextEncoding, ch: char },

    /// A byte or element count does not fit the length prefix.
    #[error("length {len} exceeds prefix maximum {max}")]
    LengthOverflow { len: usize, max: u64 },

    /// A sequence or map length was not known ahead of time.
    #[error("sequence length must be known before encoding")]
    LengthRequired,

    /// The layout cannot express this value.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A custom message from a `Serialize` impl.
    #[error("{0}")]
    Message(String),
}

impl From<OutOfBounds> for DecodeError {
    fn from(err: OutOfBounds) -> Self {
        DecodeError::UnexpectedEof {
            needed: err.requested,
            remaining: err.remaining,
        }
    }
}

impl From<Infallible> for DecodeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<Infallible> for EncodeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }
}
