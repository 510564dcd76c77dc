use binary_codable::{
    ByteCursor, ByteSink, Component, Config, DecodeError, Decodable, Encodable, EncodeError,
    LengthWidth, OutOfBounds, TextEncoding, drain_from, drain_from_buf, from_bytes,
    from_bytes_partial, from_bytes_with, to_bytes, to_bytes_into, to_bytes_with,
};
use bytes::BytesMut;
use hex_literal::hex;
use std::convert::Infallible;

// ── Fixtures ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Circle(u32),
    Square(u16),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum ShapeError {
    #[error("unknown shape tag {0}")]
    UnknownTag(u8),
}

impl Decodable for Shape {
    type Error = ShapeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, ShapeError> {
        match cursor.u8() {
            0 => Ok(Shape::Circle(cursor.decode_int())),
            1 => Ok(Shape::Square(cursor.decode_int())),
            tag => Err(ShapeError::UnknownTag(tag)),
        }
    }
}

impl Encodable for Shape {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        match *self {
            Shape::Circle(radius) => {
                sink.u8(0);
                sink.encode_int(radius);
            }
            Shape::Square(side) => {
                sink.u8(1);
                sink.encode_int(side);
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Pair(Shape, Shape);

impl Decodable for Pair {
    type Error = ShapeError;

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, ShapeError> {
        Ok(Pair(cursor.decode_value()?, cursor.decode_value()?))
    }
}

impl Encodable for Pair {
    type Error = Infallible;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), Infallible> {
        sink.encode_value(&self.0)?;
        sink.encode_value(&self.1)
    }
}

/// Tag followed by ASCII text; fails after the tag is written.
struct Label(String);

impl Encodable for Label {
    type Error = EncodeError;

    fn encode(&self, sink: &mut ByteSink) -> Result<(), EncodeError> {
        sink.encode_int(0xBEEFu16);
        sink.encode_ascii(&self.0)
    }
}

// ── Integers ───────────────────────────────────────────────────────────────

#[test]
fn test_u16_258_roundtrip() {
    let bytes = to_bytes(&258u16).unwrap();
    assert_eq!(bytes, 258u16.to_ne_bytes());

    let mut cursor = ByteCursor::new(&bytes);
    assert_eq!(cursor.decode_int::<u16>(), 258);
    assert_eq!(cursor.position(), 2);
    assert!(cursor.is_exhausted());
}

#[test]
fn test_explicit_byte_orders() {
    assert_eq!(
        to_bytes_with(&0x0102_0304u32, Config::BIG_ENDIAN).unwrap(),
        hex!("01020304")
    );
    assert_eq!(
        to_bytes_with(&0x0102_0304u32, Config::LITTLE_ENDIAN).unwrap(),
        hex!("04030201")
    );
    assert_eq!(
        from_bytes_with::<i16>(&hex!("fffe"), Config::BIG_ENDIAN).unwrap(),
        -2
    );
}

#[test]
fn test_int_with_overrides_config() {
    let mut sink = ByteSink::with_config(Config::LITTLE_ENDIAN);
    sink.encode_int(1u16);
    sink.encode_int_with(1u16, binary_codable::ByteOrder::Big);
    assert_eq!(sink.as_bytes(), hex!("0100 0001"));

    let bytes = sink.into_bytes();
    let mut cursor = ByteCursor::with_config(&bytes, Config::LITTLE_ENDIAN);
    assert_eq!(cursor.decode_int::<u16>(), 1);
    assert_eq!(cursor.decode_int_with::<u16>(binary_codable::ByteOrder::Big), 1);
}

#[test]
fn test_all_int_widths_roundtrip() {
    let config = Config::BIG_ENDIAN;
    let mut sink = ByteSink::with_config(config);
    sink.encode_int(u8::MAX);
    sink.encode_int(i8::MIN);
    sink.encode_int(u32::MAX - 1);
    sink.encode_int(i64::MIN + 7);
    sink.encode_int(u128::MAX / 3);
    assert_eq!(sink.len(), 1 + 1 + 4 + 8 + 16);

    let bytes = sink.into_bytes();
    let mut cursor = ByteCursor::with_config(&bytes, config);
    assert_eq!(cursor.decode_int::<u8>(), u8::MAX);
    assert_eq!(cursor.decode_int::<i8>(), i8::MIN);
    assert_eq!(cursor.decode_int::<u32>(), u32::MAX - 1);
    assert_eq!(cursor.decode_int::<i64>(), i64::MIN + 7);
    assert_eq!(cursor.decode_int::<u128>(), u128::MAX / 3);
    assert!(cursor.is_exhausted());
}

// ── Cursor bounds ──────────────────────────────────────────────────────────

#[test]
fn test_consume_splits_consumed_and_remaining() {
    let input = [1u8, 2, 3, 4, 5];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(cursor.consume(2), [1, 2]);
    assert_eq!(cursor.consumed(), [1, 2]);
    assert_eq!(cursor.remaining(), [3, 4, 5]);
    assert_eq!(cursor.remaining_len(), 3);

    cursor.skip(3);
    assert!(cursor.is_exhausted());
    assert!(cursor.consume(0).is_empty());
}

#[test]
#[should_panic(expected = "byte cursor overrun")]
fn test_consume_past_end_panics() {
    let input = [1u8, 2, 3];
    let mut cursor = ByteCursor::new(&input);
    let _ = cursor.consume(4);
}

#[test]
#[should_panic(expected = "byte cursor overrun")]
fn test_decode_int_past_end_panics() {
    let input = [1u8, 2, 3];
    let mut cursor = ByteCursor::new(&input);
    let _ = cursor.decode_int::<u32>();
}

#[test]
fn test_try_consume_reports_without_moving() {
    let input = [1u8, 2, 3];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(
        cursor.try_consume(4).unwrap_err(),
        OutOfBounds {
            requested: 4,
            remaining: 3
        }
    );
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.try_consume(3).unwrap(), [1, 2, 3]);
    assert!(cursor.try_skip(1).is_err());
}

#[test]
fn test_decode_bytes_and_array() {
    let input = [9u8, 8, 7, 6, 5];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(cursor.decode_bytes(2), vec![9, 8]);
    let rest: [u8; 3] = cursor.decode_array();
    assert_eq!(rest, [7, 6, 5]);
}

// ── Strings ────────────────────────────────────────────────────────────────

#[test]
fn test_ascii_prefixed_roundtrip_at_255() {
    let text = "a".repeat(255);
    let mut sink = ByteSink::new();
    sink.ascii_prefixed::<u8>(&text).unwrap();
    assert_eq!(sink.len(), 256);
    assert_eq!(sink.as_bytes()[0], 255);

    let bytes = sink.into_bytes();
    let mut cursor = ByteCursor::new(&bytes);
    assert_eq!(cursor.ascii_prefixed::<u8>().unwrap(), text);
    assert!(cursor.is_exhausted());
}

#[test]
fn test_prefix_overflow_is_declared_failure() {
    let text = "a".repeat(256);
    let mut sink = ByteSink::new();
    let err = sink.ascii_prefixed::<u8>(&text).unwrap_err();
    assert_eq!(err, EncodeError::LengthOverflow { len: 256, max: 255 });
    assert!(sink.is_empty(), "nothing may be written on overflow");
}

#[test]
fn test_utf8_prefix_counts_bytes() {
    let mut sink = ByteSink::new();
    sink.utf8_prefixed::<u8>("é!").unwrap();
    assert_eq!(sink.as_bytes(), hex!("03 c3a9 21"));

    let bytes = sink.into_bytes();
    let mut cursor = ByteCursor::new(&bytes);
    assert_eq!(cursor.utf8_prefixed::<u8>().unwrap(), "é!");
}

#[test]
fn test_wider_prefix_follows_byte_order() {
    let mut sink = ByteSink::with_config(Config::BIG_ENDIAN);
    sink.encode_prefixed_string::<u16>("ok", TextEncoding::Ascii).unwrap();
    assert_eq!(sink.as_bytes(), hex!("0002 6f6b"));
}

#[test]
fn test_non_ascii_rejected_without_writing() {
    let mut sink = ByteSink::new();
    sink.u8(7);
    let err = sink.encode_ascii("naïve").unwrap_err();
    assert_eq!(err, EncodeError::NonAscii { offset: 2, ch: 'ï' });
    assert_eq!(sink.as_bytes(), [7]);
}

#[test]
fn test_general_encodings_write_bytes() {
    let mut sink = ByteSink::new();
    sink.encode_string("hé", TextEncoding::Utf16Le).unwrap();
    sink.encode_string("hé", TextEncoding::Utf16Be).unwrap();
    sink.encode_string("hé", TextEncoding::Latin1).unwrap();
    assert_eq!(sink.as_bytes(), hex!("6800e900 006800e9 68e9"));

    let bytes = sink.into_bytes();
    let mut cursor = ByteCursor::new(&bytes);
    assert_eq!(cursor.decode_string(4, TextEncoding::Utf16Le).unwrap(), "hé");
    assert_eq!(cursor.decode_string(4, TextEncoding::Utf16Be).unwrap(), "hé");
    assert_eq!(cursor.decode_string(2, TextEncoding::Latin1).unwrap(), "hé");
}

#[test]
fn test_unrepresentable_character_is_reported() {
    let mut sink = ByteSink::new();
    let err = sink.encode_string("5€", TextEncoding::Latin1).unwrap_err();
    assert_eq!(
        err,
        EncodeError::Unrepresentable {
            encoding: TextEncoding::Latin1,
            ch: '€'
        }
    );
    assert!(sink.is_empty());
}

#[test]
fn test_strict_text_decoding() {
    let input = [b'o', 0xFF];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(
        cursor.utf8(2).unwrap_err(),
        DecodeError::InvalidText {
            encoding: TextEncoding::Utf8,
            offset: 0
        }
    );

    let input = [b'o', b'k', 0x80];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(cursor.ascii(2).unwrap(), "ok");
    assert_eq!(
        cursor.ascii(1).unwrap_err(),
        DecodeError::InvalidText {
            encoding: TextEncoding::Ascii,
            offset: 2
        }
    );

    let input = [0x41, 0x00, 0x42];
    let mut cursor = ByteCursor::new(&input);
    assert!(matches!(
        cursor.decode_string(3, TextEncoding::Utf16Le),
        Err(DecodeError::InvalidText { .. })
    ));
}

#[test]
fn test_truncated_prefixed_string_is_an_error() {
    let input = [5u8, b'a'];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(
        cursor.ascii_prefixed::<u8>().unwrap_err(),
        DecodeError::UnexpectedEof {
            needed: 5,
            remaining: 1
        }
    );
}

#[test]
fn test_negative_prefix_is_an_error() {
    let input = [0xFFu8];
    let mut cursor = ByteCursor::new(&input);
    assert_eq!(
        cursor.ascii_prefixed::<i8>().unwrap_err(),
        DecodeError::LengthOverflow(-1)
    );
}

// ── Contracts ──────────────────────────────────────────────────────────────

#[test]
fn test_custom_type_roundtrip() {
    let pair = Pair(Shape::Circle(9), Shape::Square(4));
    let bytes = to_bytes(&pair).unwrap();
    assert_eq!(bytes.len(), 1 + 4 + 1 + 2);
    assert_eq!(from_bytes::<Pair>(&bytes).unwrap(), pair);
}

#[test]
fn test_declared_failure_propagates_unchanged() {
    let input = [0u8, 1, 0, 0, 0, 7];
    assert_eq!(from_bytes::<Pair>(&input), Err(ShapeError::UnknownTag(7)));
}

#[test]
fn test_builtin_containers_roundtrip() {
    let words = vec!["alpha".to_string(), String::new(), "γ".to_string()];
    let bytes = to_bytes(&words).unwrap();
    assert_eq!(from_bytes::<Vec<String>>(&bytes).unwrap(), words);

    let maybe: Option<u32> = Some(42);
    let bytes = to_bytes(&maybe).unwrap();
    assert_eq!(bytes[0], 1);
    assert_eq!(from_bytes::<Option<u32>>(&bytes).unwrap(), maybe);
    assert_eq!(to_bytes(&None::<u32>).unwrap(), [0]);

    let bytes = to_bytes(&(true)).unwrap();
    assert_eq!(bytes, [1]);
    assert!(from_bytes::<bool>(&bytes).unwrap());

    let bytes = to_bytes(&std::f64::consts::PI).unwrap();
    assert_eq!(
        from_bytes::<f64>(&bytes).unwrap().to_bits(),
        std::f64::consts::PI.to_bits()
    );

    let bytes = to_bytes(&'λ').unwrap();
    assert_eq!(from_bytes::<char>(&bytes).unwrap(), 'λ');

    let bytes = to_bytes(&[0xDEu8, 0xAD]).unwrap();
    assert_eq!(bytes, [0xDE, 0xAD]);
    assert_eq!(from_bytes::<[u8; 2]>(&bytes).unwrap(), [0xDE, 0xAD]);

    assert!(to_bytes(&()).unwrap().is_empty());
    from_bytes::<()>(&[]).unwrap();
}

#[test]
fn test_invalid_scalars() {
    assert_eq!(from_bytes::<bool>(&[2]), Err(DecodeError::InvalidBool(2)));
    assert_eq!(from_bytes::<Option<u8>>(&[3, 0]), Err(DecodeError::InvalidTag(3)));
    assert_eq!(
        from_bytes_with::<char>(&hex!("0000d800"), Config::BIG_ENDIAN),
        Err(DecodeError::InvalidChar(0xD800))
    );
}

#[test]
fn test_string_and_vec_prefix_width_comes_from_config() {
    let config = Config::BIG_ENDIAN.with_length_width(LengthWidth::U8);
    assert_eq!(to_bytes_with(&vec![1u8, 2, 3], config).unwrap(), [3, 1, 2, 3]);
    assert_eq!(to_bytes_with("hi", config).unwrap(), [2, b'h', b'i']);
    assert_eq!(
        to_bytes_with(&vec![0u8; 300], config).unwrap_err(),
        EncodeError::LengthOverflow { len: 300, max: 255 }
    );

    let bytes = to_bytes_with(&"hi".to_string(), Config::BIG_ENDIAN).unwrap();
    assert_eq!(bytes, hex!("00000002 6869"));
}

#[test]
fn test_truncated_string_is_an_error() {
    let bytes = hex!("00000009 61");
    assert_eq!(
        from_bytes_with::<String>(&bytes, Config::BIG_ENDIAN),
        Err(DecodeError::UnexpectedEof {
            needed: 9,
            remaining: 1
        })
    );
}

#[test]
fn test_component_is_encodable() {
    let component = Component::byte(0xAB).then(Component::bytes(&b"cd"[..]));
    assert_eq!(to_bytes(&component).unwrap(), [0xAB, b'c', b'd']);
}

// ── Entry points ───────────────────────────────────────────────────────────

#[test]
fn test_top_level_ignores_leftover() {
    let input = [1u8, 2, 3];
    assert_eq!(from_bytes::<u8>(&input).unwrap(), 1);
    assert_eq!(
        ByteCursor::decode_all::<u8>(&input, Config::default()).unwrap(),
        1
    );
}

#[test]
fn test_partial_reports_tail() {
    let mut buf = to_bytes(&Shape::Square(5)).unwrap();
    buf.extend(to_bytes(&Shape::Circle(6)).unwrap());
    buf.extend([0xFF, 0xFF]);

    let (first, rest) = from_bytes_partial::<Shape>(&buf).unwrap();
    assert_eq!(first, Shape::Square(5));
    let (second, remaining) = from_bytes_partial::<Shape>(rest).unwrap();
    assert_eq!(second, Shape::Circle(6));
    assert_eq!(remaining, [0xFF, 0xFF]);

    let (_, consumed) = ByteCursor::decode_partial::<Shape>(&buf, Config::default()).unwrap();
    assert_eq!(consumed, 3);
}

#[test]
fn test_drain_leaves_trailing_bytes() {
    let mut buf = to_bytes(&0xABCDu16).unwrap();
    buf.extend([9, 8, 7]);
    let value: u16 = drain_from(&mut buf).unwrap();
    assert_eq!(value, 0xABCD);
    assert_eq!(buf, [9, 8, 7]);
}

#[test]
fn test_drain_streams_values_from_growing_buffer() {
    let mut buf = Vec::new();
    to_bytes_into(&Shape::Circle(1), &mut buf).unwrap();
    to_bytes_into(&Shape::Square(2), &mut buf).unwrap();
    // Half of a third frame has arrived.
    buf.extend([1u8]);

    assert_eq!(drain_from::<Shape>(&mut buf).unwrap(), Shape::Circle(1));
    assert_eq!(drain_from::<Shape>(&mut buf).unwrap(), Shape::Square(2));
    assert_eq!(buf, [1]);
}

#[test]
fn test_failed_drain_leaves_buffer_untouched() {
    let mut buf = vec![0u8, 2, 0xAA];
    assert_eq!(
        drain_from::<Vec<bool>>(&mut buf),
        Err(DecodeError::UnexpectedEof {
            needed: 4,
            remaining: 3
        })
    );
    assert_eq!(buf, [0, 2, 0xAA]);

    let mut buf = vec![2u8, 1];
    assert_eq!(drain_from::<bool>(&mut buf), Err(DecodeError::InvalidBool(2)));
    assert_eq!(buf, [2, 1]);
}

#[test]
fn test_cursor_drain_static() {
    let mut buf = vec![7u8, 8, 9];
    let first: u8 = ByteCursor::decode_and_drain(&mut buf, Config::default()).unwrap();
    assert_eq!(first, 7);
    assert_eq!(buf, [8, 9]);
}

#[test]
fn test_drain_from_bytes_mut() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&to_bytes(&Shape::Square(3)).unwrap());
    buf.extend_from_slice(&[0xEE]);

    assert_eq!(drain_from_buf::<Shape>(&mut buf).unwrap(), Shape::Square(3));
    assert_eq!(&buf[..], [0xEE]);

    assert_eq!(
        drain_from_buf::<Shape>(&mut buf),
        Err(ShapeError::UnknownTag(0xEE))
    );
    assert_eq!(&buf[..], [0xEE]);
}

#[test]
fn test_encode_into_appends() {
    let mut out = vec![0xEE];
    to_bytes_into(&Label("ok".into()), &mut out).unwrap();
    let mut expected = vec![0xEE];
    expected.extend_from_slice(&0xBEEFu16.to_ne_bytes());
    expected.extend_from_slice(b"ok");
    assert_eq!(out, expected);
}

#[test]
fn test_failed_encode_leaves_target_untouched() {
    let mut out = vec![0xEE];
    let err = to_bytes_into(&Label("café".into()), &mut out).unwrap_err();
    assert!(matches!(err, EncodeError::NonAscii { ch: 'é', .. }));
    assert_eq!(out, [0xEE]);

    let err = ByteSink::encode_into(&Label("ü".into()), &mut out, Config::default()).unwrap_err();
    assert!(matches!(err, EncodeError::NonAscii { offset: 0, .. }));
    assert_eq!(out, [0xEE]);
}

#[test]
fn test_errors_display() {
    assert_eq!(
        DecodeError::InvalidBool(2).to_string(),
        "invalid boolean byte: 0x02 (must be 0 or 1)"
    );
    assert_eq!(
        EncodeError::LengthOverflow { len: 256, max: 255 }.to_string(),
        "length 256 exceeds prefix maximum 255"
    );
    assert_eq!(
        DecodeError::InvalidText {
            encoding: TextEncoding::Utf16Be,
            offset: 3
        }
        .to_string(),
        "invalid UTF-16BE text at offset 3"
    );
}

// ── Hostile and partial input ──────────────────────────────────────────────

#[test]
fn test_corrupt_count_of_zero_width_elements_fails() {
    let config = Config::LITTLE_ENDIAN.with_length_width(LengthWidth::U64);
    assert!(matches!(
        from_bytes_with::<Vec<()>>(&[0xFF; 8], config),
        Err(DecodeError::LengthOverflow(_))
    ));
    assert!(matches!(
        from_bytes_with::<Vec<()>>(&[0xFF; 4], Config::LITTLE_ENDIAN),
        Err(DecodeError::LengthOverflow(_))
    ));
}

#[test]
fn test_zero_width_elements_within_input_still_decode() {
    let units = from_bytes_with::<Vec<()>>(&hex!("03000000 aabbcc"), Config::LITTLE_ENDIAN).unwrap();
    assert_eq!(units.len(), 3);

    let bytes = to_bytes_with(&vec![()], Config::LITTLE_ENDIAN).unwrap();
    assert_eq!(bytes, hex!("01000000"));
    assert_eq!(
        from_bytes_with::<Vec<()>>(&bytes, Config::LITTLE_ENDIAN).unwrap(),
        vec![()]
    );
}

#[test]
fn test_truncated_tags_are_errors() {
    let eof = |needed, remaining| DecodeError::UnexpectedEof { needed, remaining };
    assert_eq!(from_bytes::<Option<String>>(&[]), Err(eof(1, 0)));
    assert_eq!(from_bytes::<bool>(&[]), Err(eof(1, 0)));
    assert_eq!(from_bytes::<char>(&[0x41, 0]), Err(eof(4, 2)));
}

#[test]
fn test_try_decode_int() {
    let input = hex!("0102 03");
    let mut cursor = ByteCursor::with_config(&input, Config::BIG_ENDIAN);
    assert_eq!(cursor.try_decode_int::<u16>(), Ok(0x0102));
    assert_eq!(
        cursor.try_decode_int::<u16>(),
        Err(OutOfBounds {
            requested: 2,
            remaining: 1
        })
    );
    assert_eq!(cursor.position(), 2);
}

#[test]
fn test_drain_partial_checked_frame_is_an_error() {
    let mut buf = to_bytes(&Some("hello".to_string())).unwrap();
    buf.truncate(buf.len() - 2);
    let before = buf.clone();

    assert_eq!(
        drain_from::<Option<String>>(&mut buf),
        Err(DecodeError::UnexpectedEof {
            needed: 5,
            remaining: 3
        })
    );
    assert_eq!(buf, before);
}

#[test]
#[should_panic(expected = "byte cursor overrun")]
fn test_drain_partial_integer_frame_panics() {
    let mut buf = vec![1u8, 2];
    let _ = drain_from::<u32>(&mut buf);
}

// ── Failure kinds without Display ──────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct Magic;

impl Decodable for Magic {
    type Error = ();

    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, ()> {
        match cursor.try_decode_int::<u8>() {
            Ok(0xAA) => Ok(Magic),
            _ => Err(()),
        }
    }
}

impl Encodable for Magic {
    type Error = ();

    fn encode(&self, sink: &mut ByteSink) -> Result<(), ()> {
        sink.u8(0xAA);
        Ok(())
    }
}

#[test]
fn test_entry_points_accept_any_debug_failure() {
    assert_eq!(to_bytes(&Magic), Ok(vec![0xAA]));
    assert_eq!(from_bytes::<Magic>(&[0xAA]), Ok(Magic));
    assert_eq!(from_bytes::<Magic>(&[0x00]), Err(()));

    let mut buf = vec![0x00, 0xAA];
    assert_eq!(drain_from::<Magic>(&mut buf), Err(()));
    assert_eq!(buf, [0x00, 0xAA]);
}

// ── Sink construction ──────────────────────────────────────────────────────

#[test]
fn test_sink_constructors() {
    let sink = ByteSink::with_capacity(16);
    assert!(sink.is_empty());
    assert_eq!(sink.config(), Config::default());

    let mut sink = ByteSink::with_capacity_and_config(4, Config::BIG_ENDIAN);
    assert_eq!(sink.config(), Config::BIG_ENDIAN);
    sink.encode_int(0x0102u16);
    assert_eq!(sink.as_bytes(), hex!("0102"));
}
