//! Composable, order-preserving writers.
//!
//! A [`Writer`] describes its serialized form as a [`Component`]: an ordered
//! list of write steps assembled from leaves (bytes, integers, other
//! [`Writable`] values) and control constructs (`when`, `optional`, `branch`,
//! `for_each`, `sequence`). Every construct returns a `Component`, so the
//! branches of a conditional are interchangeable and nesting is transparent.
//!
//! The one rule the module guarantees: the bytes a component writes are the
//! bytes of its leaves concatenated in the order they were authored.
//!
//! ```rust
//! use binary_codable::{layout, Component, Writable, Writer};
//!
//! struct Greeting<'a> {
//!     version: u8,
//!     name: Option<&'a str>,
//! }
//!
//! impl Writer for Greeting<'_> {
//!     fn writer(&self) -> Component<'_> {
//!         layout![
//!             self.version,
//!             Component::optional(self.name.map(|n| Component::bytes(n.as_bytes()))),
//!         ]
//!     }
//! }
//!
//! let hello = Greeting { version: 1, name: Some("hi") };
//! assert_eq!(hello.to_bytes(), [1, b'h', b'i']);
//!
//! let anonymous = Greeting { version: 1, name: None };
//! assert_eq!(anonymous.to_bytes(), [1]);
//! ```
//!
//! Integers written through a component use the target's native byte order
//! unless an explicit order is given with [`Component::int_with`]; the
//! component does not see the [`Config`](crate::Config) of the sink it is
//! eventually written into.

use std::borrow::Cow;
use std::fmt;

use crate::config::ByteOrder;
use crate::error::EncodeError;
use crate::int::FixedWidth;
use crate::text::TextEncoding;

/// Something that can append itself to a byte buffer and never fails.
pub trait Writable {
    fn write_to(&self, bytes: &mut Vec<u8>);

    /// Write into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes);
        bytes
    }
}

/// A type whose layout is described by a composed [`Component`].
///
/// Implementing `Writer` makes the type [`Writable`].
pub trait Writer {
    fn writer(&self) -> Component<'_>;
}

impl<T: Writer + ?Sized> Writable for T {
    fn write_to(&self, bytes: &mut Vec<u8>) {
        self.writer().write_to(bytes);
    }
}

impl Writable for [u8] {
    fn write_to(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(self);
    }
}

impl Writable for Vec<u8> {
    fn write_to(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(self);
    }
}

enum Step<'a> {
    Bytes(Cow<'a, [u8]>),
    Value(&'a dyn Writable),
    Deferred(Box<dyn Fn(&mut Vec<u8>) + 'a>),
}

/// A flattened, ordered write action.
#[derive(Default)]
pub struct Component<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> Component<'a> {
    // ── Leaves ─────────────────────────────────────────────────────────────

    /// Writes nothing.
    pub fn empty() -> Self {
        Component { steps: Vec::new() }
    }

    fn step(step: Step<'a>) -> Self {
        Component { steps: vec![step] }
    }

    /// A single raw byte.
    pub fn byte(byte: u8) -> Self {
        Self::step(Step::Bytes(Cow::Owned(vec![byte])))
    }

    /// A run of raw bytes, borrowed or owned.
    pub fn bytes(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::step(Step::Bytes(bytes.into()))
    }

    /// A fixed-width integer in native byte order.
    pub fn int<I: FixedWidth>(value: I) -> Self {
        Self::int_with(value, ByteOrder::Native)
    }

    /// A fixed-width integer in an explicit byte order.
    pub fn int_with<I: FixedWidth>(value: I, order: ByteOrder) -> Self {
        let mut bytes = Vec::with_capacity(I::WIDTH);
        value.append_to(order, &mut bytes);
        Self::step(Step::Bytes(Cow::Owned(bytes)))
    }

    /// Another writable value, written when this component is.
    pub fn value<W: Writable + ?Sized>(value: &'a W) -> Self {
        // Unsized writables such as `[u8]` cannot become trait objects.
        Self::from_fn(move |bytes| value.write_to(bytes))
    }

    /// A sequence of writable values, in iteration order.
    pub fn values<W, I>(values: I) -> Self
    where
        W: Writable + 'a,
        I: IntoIterator<Item = &'a W>,
    {
        Component {
            steps: values
                .into_iter()
                .map(|value| Step::Value(value as &'a dyn Writable))
                .collect(),
        }
    }

    /// An arbitrary write action.
    pub fn from_fn<F>(write: F) -> Self
    where
        F: Fn(&mut Vec<u8>) + 'a,
    {
        Self::step(Step::Deferred(Box::new(write)))
    }

    /// Encoded text, validated now so that writing cannot fail later.
    pub fn text(text: &str, encoding: TextEncoding) -> Result<Self, EncodeError> {
        Ok(Self::bytes(encoding.encode(text)?))
    }

    /// Encoded text preceded by its byte length as a native-order `L`.
    pub fn text_prefixed<L: FixedWidth>(
        text: &str,
        encoding: TextEncoding,
    ) -> Result<Self, EncodeError> {
        let encoded = encoding.encode(text)?;
        let prefix = L::from_len(encoded.len()).ok_or(EncodeError::LengthOverflow {
            len: encoded.len(),
            max: L::MAX_LEN,
        })?;
        Ok(Self::int(prefix).then(Self::bytes(encoded)))
    }

    pub fn ascii_prefixed<L: FixedWidth>(text: &str) -> Result<Self, EncodeError> {
        Self::text_prefixed::<L>(text, TextEncoding::Ascii)
    }

    // ── Composition ────────────────────────────────────────────────────────

    /// Concatenate components in iteration order.
    pub fn sequence<I>(components: I) -> Self
    where
        I: IntoIterator<Item = Component<'a>>,
    {
        components
            .into_iter()
            .fold(Self::empty(), |acc, next| acc.then(next))
    }

    /// `self` followed by `next`.
    pub fn then(mut self, next: Component<'a>) -> Self {
        self.steps.extend(next.steps);
        self
    }

    /// `component` when `condition` holds, nothing otherwise.
    pub fn when(condition: bool, component: Component<'a>) -> Self {
        if condition { component } else { Self::empty() }
    }

    /// The component if present, nothing otherwise.
    pub fn optional(component: Option<Component<'a>>) -> Self {
        component.unwrap_or_default()
    }

    /// Exactly one of two components.
    pub fn branch(condition: bool, then: Component<'a>, otherwise: Component<'a>) -> Self {
        if condition { then } else { otherwise }
    }

    /// One component per item, concatenated in iteration order.
    pub fn for_each<T, I, F>(items: I, each: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Component<'a>,
    {
        Self::sequence(items.into_iter().map(each))
    }

    /// Number of steps after flattening. Empty components have none.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Writable for Component<'_> {
    fn write_to(&self, bytes: &mut Vec<u8>) {
        for step in &self.steps {
            match step {
                Step::Bytes(run) => bytes.extend_from_slice(run),
                Step::Value(value) => value.write_to(bytes),
                Step::Deferred(write) => write(bytes),
            }
        }
    }
}

impl fmt::Debug for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl<'a> FromIterator<Component<'a>> for Component<'a> {
    fn from_iter<I: IntoIterator<Item = Component<'a>>>(iter: I) -> Self {
        Self::sequence(iter)
    }
}

/// Conversion used by [`layout!`](crate::layout) for each of its expressions.
pub trait IntoComponent<'a> {
    fn into_component(self) -> Component<'a>;
}

impl<'a> IntoComponent<'a> for Component<'a> {
    fn into_component(self) -> Component<'a> {
        self
    }
}

macro_rules! int_into_component {
    ($($t:ty),*) => {$(
        impl<'a> IntoComponent<'a> for $t {
            fn into_component(self) -> Component<'a> {
                Component::int(self)
            }
        }
    )*};
}

int_into_component!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl<'a, W: Writable + ?Sized> IntoComponent<'a> for &'a W {
    fn into_component(self) -> Component<'a> {
        Component::value(self)
    }
}

/// Build a [`Component`] from a list of expressions, written in order.
///
/// Each expression may be a [`Component`], a fixed-width integer (a raw byte
/// is a `u8`), or a reference to anything [`Writable`].
///
/// ```rust
/// use binary_codable::{layout, Component, Writable};
///
/// let flag = true;
/// let body = layout![
///     0xAAu8,
///     Component::when(flag, Component::byte(0x01)),
///     &b"xy"[..],
/// ];
/// assert_eq!(body.to_bytes(), [0xAA, 0x01, b'x', b'y']);
/// ```
#[macro_export]
macro_rules! layout {
    () => {
        $crate::Component::empty()
    };
    ($($part:expr),+ $(,)?) => {
        $crate::Component::sequence([
            $($crate::IntoComponent::into_component($part)),+
        ])
    };
}
