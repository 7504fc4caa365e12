//! The field-iteration contract the tree builder walks messages through.
//!
//! A [`ReflectMessage`] enumerates its populated fields in declaration order
//! and reports each one as a closed set of [`FieldValue`] shapes. The builder
//! dispatches on that shape alone and never inspects the concrete message type.

#[cfg(feature = "prost-reflect")]
mod dynamic;

use std::borrow::Cow;

/// A runtime-introspectable message.
pub trait ReflectMessage {
    /// The fully qualified message name, e.g. `tutorial.AddressBook`.
    fn full_name(&self) -> Cow<'_, str>;

    /// The populated fields of the message, in schema declaration order.
    fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_>;
}

/// One populated field of a message.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// The declared field name, used verbatim as the element name.
    pub name: Cow<'a, str>,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: FieldValue<'a>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The shape of a field value.
#[derive(Clone)]
pub enum FieldValue<'a> {
    Scalar(Scalar<'a>),
    Message(&'a dyn ReflectMessage),
    RepeatedScalar(Vec<Scalar<'a>>),
    RepeatedMessage(Vec<&'a dyn ReflectMessage>),
    /// Map entries as `(key, value)` pairs. Keys are bool, integer or string scalars.
    Map(Vec<(Scalar<'a>, MapValue<'a>)>),
    /// A field kind outside the supported set, described by its kind name.
    Unsupported(String),
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            FieldValue::Message(m) => f.debug_tuple("Message").field(&m.full_name()).finish(),
            FieldValue::RepeatedScalar(items) => f.debug_tuple("RepeatedScalar").field(items).finish(),
            FieldValue::RepeatedMessage(items) => f.debug_tuple("RepeatedMessage").field(&items.len()).finish(),
            FieldValue::Map(entries) => f.debug_tuple("Map").field(&entries.len()).finish(),
            FieldValue::Unsupported(kind) => f.debug_tuple("Unsupported").field(kind).finish(),
        }
    }
}

/// The value side of a map entry.
#[derive(Clone)]
pub enum MapValue<'a> {
    Scalar(Scalar<'a>),
    Message(&'a dyn ReflectMessage),
}

/// A single primitive value. Enumerations carry their numeric code.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Enum(i32),
}

impl Scalar<'_> {
    /// Whether this is the zero value of its kind. Negative zero is not.
    pub fn is_default(&self) -> bool {
        match self {
            Scalar::Bool(b) => !*b,
            Scalar::I32(v) | Scalar::Enum(v) => *v == 0,
            Scalar::I64(v) => *v == 0,
            Scalar::U32(v) => *v == 0,
            Scalar::U64(v) => *v == 0,
            Scalar::F32(v) => v.to_bits() == 0,
            Scalar::F64(v) => v.to_bits() == 0,
            Scalar::String(s) => s.is_empty(),
            Scalar::Bytes(b) => b.is_empty(),
        }
    }
}

impl From<bool> for Scalar<'_> {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar<'_> {
    fn from(v: i32) -> Self {
        Scalar::I32(v)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<u32> for Scalar<'_> {
    fn from(v: u32) -> Self {
        Scalar::U32(v)
    }
}

impl From<u64> for Scalar<'_> {
    fn from(v: u64) -> Self {
        Scalar::U64(v)
    }
}

impl From<f32> for Scalar<'_> {
    fn from(v: f32) -> Self {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(v: &'a str) -> Self {
        Scalar::String(Cow::Borrowed(v))
    }
}

impl From<String> for Scalar<'_> {
    fn from(v: String) -> Self {
        Scalar::String(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Scalar<'a> {
    fn from(v: &'a [u8]) -> Self {
        Scalar::Bytes(Cow::Borrowed(v))
    }
}
