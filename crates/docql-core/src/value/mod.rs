//! Module: value
//! Responsibility: host-side literal values carried as query operands.
//! Does not own: the wire representation (`term::Datum`) or conversion policy.
//! Boundary: operands are captured verbatim here and converted only while a
//! term is generated.


use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Dynamic host value. Keys of `Map` are themselves values so that callers
/// can describe any host structure; whether a given shape is representable
/// on the wire is decided by the converter factory, not here.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float(f64),
    Int(i64),
    /// Ordered list of values; order is preserved through conversion.
    List(Vec<Self>),
    /// Key/value entries in insertion order.
    Map(Vec<(Self, Self)>),
    Null,
    Text(String),
    Uint(u64),
}

impl Value {
    /// Build a map value with text keys, the common shape for documents.
    #[must_use]
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Self::Text(k.into()), v.into()))
                .collect(),
        )
    }

    /// Build a list value from anything convertible into values.
    #[must_use]
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Blob(_) => ValueKind::Blob,
            Self::Bool(_) => ValueKind::Bool,
            Self::Float(_) => ValueKind::Float,
            Self::Int(_) => ValueKind::Int,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
            Self::Uint(_) => ValueKind::Uint,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

///
/// ValueKind
///
/// Discriminant-only view of `Value`, used to ask a converter factory
/// whether a kind is representable before converting it.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Blob,
    Bool,
    Float,
    Int,
    List,
    Map,
    Null,
    Text,
    Uint,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Blob => "blob",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int => "int",
            Self::List => "list",
            Self::Map => "map",
            Self::Null => "null",
            Self::Text => "text",
            Self::Uint => "uint",
        };

        f.write_str(label)
    }
}

// ----------------------------------------------------------------------
// Conversions from host primitives
// ----------------------------------------------------------------------

macro_rules! impl_from_for_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    f32 => Float,
    f64 => Float,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    String => Text,
    &str => Text,
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}
