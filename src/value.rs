//! Tagged values accepted by the encoder.
//!
//! `Value<O>` is the only input shape the encoder understands. Hosts adapt
//! their native values into it; anything without a direct mapping goes into
//! [`Value::Other`] and is turned into text through a [`Stringify`]
//! capability supplied with the encoder.

use std::fmt::Display;

use crate::error::{BoxError, EncodeError, EncodeResult};

/// A value to encode as (part of) one COPY record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<O> {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes, not necessarily UTF-8.
    Bytes(Vec<u8>),
    /// Ordered elements, flattened inline into the record.
    Sequence(Vec<Value<O>>),
    /// SQL NULL, written as `\N`.
    Null,
    /// Opaque host value, rendered through [`Stringify`].
    Other(O),
}

impl<O> Value<O> {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(b.into())
    }

    pub fn seq(items: impl IntoIterator<Item = Value<O>>) -> Self {
        Value::Sequence(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "sequence",
            Value::Null => "null",
            Value::Other(_) => "other",
        }
    }
}

impl<O> From<&str> for Value<O> {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<O> From<String> for Value<O> {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<O> From<Vec<u8>> for Value<O> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl<O> From<&[u8]> for Value<O> {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<O> From<Vec<Value<O>>> for Value<O> {
    fn from(items: Vec<Value<O>>) -> Self {
        Value::Sequence(items)
    }
}

impl<O, T: Into<Value<O>>> From<Option<T>> for Value<O> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Host capability: turn an opaque value into a human-readable string.
pub trait Stringify<O> {
    fn stringify(&self, value: &O) -> EncodeResult<String>;
}

/// Stringify through `Display`. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayStringify;

impl<O: Display> Stringify<O> for DisplayStringify {
    fn stringify(&self, value: &O) -> EncodeResult<String> {
        Ok(value.to_string())
    }
}

/// Any `Fn(&O) -> Result<String, E>` works as a stringifier.
/// Errors come back as [`EncodeError::Conversion`].
impl<O, F, E> Stringify<O> for F
where
    F: Fn(&O) -> Result<String, E>,
    E: Into<BoxError>,
{
    fn stringify(&self, value: &O) -> EncodeResult<String> {
        self(value).map_err(EncodeError::conversion)
    }
}
