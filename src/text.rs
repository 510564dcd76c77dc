//! Text encodings understood by the cursor and the sink.
//!
//! Decoding is strict for every encoding: a byte sequence that is not valid
//! under the chosen encoding is reported as
//! [`DecodeError::InvalidText`], never patched with replacement characters.

use std::fmt;

use crate::error::{DecodeError, EncodeError};

/// A byte-oriented text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// 7-bit US-ASCII, one byte per character.
    Ascii,
    /// UTF-8.
    Utf8,
    /// UTF-16, little-endian code units, no byte order mark.
    Utf16Le,
    /// UTF-16, big-endian code units, no byte order mark.
    Utf16Be,
    /// ISO-8859-1, one byte per character, U+0000..=U+00FF.
    Latin1,
}

impl TextEncoding {
    /// Append the encoded form of `text` to `out`.
    ///
    /// On failure `out` is left exactly as it was.
    pub fn encode_into(self, text: &str, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match self {
            TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            TextEncoding::Ascii => {
                if let Some((offset, ch)) = text.char_indices().find(|(_, c)| !c.is_ascii()) {
                    return Err(EncodeError::NonAscii { offset, ch });
                }
                out.extend_from_slice(text.as_bytes());
            }
            TextEncoding::Latin1 => {
                if let Some(ch) = text.chars().find(|c| u32::from(*c) > 0xFF) {
                    return Err(EncodeError::Unrepresentable { encoding: self, ch });
                }
                out.extend(text.chars().map(|c| u32::from(c) as u8));
            }
            TextEncoding::Utf16Le => {
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            }
            TextEncoding::Utf16Be => {
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            }
        }
        Ok(())
    }

    /// Encode `text` into a fresh buffer.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(text.len());
        self.encode_into(text, &mut out)?;
        Ok(out)
    }

    /// Decode `bytes` strictly.
    ///
    /// `offset` is only used to locate a failure in the enclosing input.
    pub fn decode(self, bytes: &[u8], offset: usize) -> Result<String, DecodeError> {
        let invalid = DecodeError::InvalidText {
            encoding: self,
            offset,
        };
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| invalid),
            TextEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(invalid);
                }
                // ASCII is a subset of UTF-8.
                std::str::from_utf8(bytes)
                    .map(str::to_owned)
                    .map_err(|_| invalid)
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(invalid);
                }
                let big = self == TextEncoding::Utf16Be;
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if big {
                        u16::from_be_bytes(pair)
                    } else {
                        u16::from_le_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| invalid)
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Ascii => "ASCII",
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Latin1 => "ISO-8859-1",
        };
        f.write_str(name)
    }
}
