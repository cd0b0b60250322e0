//! COPY text encoder.
//!
//! Walks a [`Value`] tree and writes one COPY text record into the
//! encoder's own [`CopyBuffer`]:
//!
//! - Text / Bytes: escaped byte by byte (see [`crate::escape`])
//! - Null: `\N`
//! - Sequence: elements inline, tab separated, no brackets at any depth
//! - Other: stringified by the injected [`Stringify`], then encoded as text
//!
//! No record terminator is written; that is up to the caller.

use std::fmt::Display;

use bytes::{Bytes, BytesMut};

use crate::buffer::CopyBuffer;
use crate::config::{DEFAULT_MAX_DEPTH, EncoderConfig};
use crate::error::{EncodeError, EncodeResult};
use crate::escape;
use crate::value::{DisplayStringify, Stringify, Value};

const DELIMITER: u8 = b'\t';
const NULL_MARKER: &[u8; 2] = b"\\N";

/// Encodes values to COPY text, reusing one output buffer across calls.
///
/// Takes `&mut self`, so a single instance is never shared between
/// concurrent calls. Keep one per thread or put it behind a `Mutex`.
#[derive(Debug)]
pub struct CopyEncoder<S = DisplayStringify> {
    buffer: CopyBuffer,
    stringify: S,
    max_depth: usize,
}

impl CopyEncoder<DisplayStringify> {
    /// Encoder that renders `Other` values through `Display`.
    pub fn new() -> Self {
        Self::with_stringify(DisplayStringify)
    }
}

impl Default for CopyEncoder<DisplayStringify> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CopyEncoder<S> {
    /// Encoder with a caller-supplied stringify capability.
    pub fn with_stringify(stringify: S) -> Self {
        Self {
            buffer: CopyBuffer::new(),
            stringify,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Build from configuration, reserving the initial capacity.
    pub fn from_config(config: &EncoderConfig, stringify: S) -> EncodeResult<Self> {
        let buffer = CopyBuffer::with_capacity(config.initial_capacity)?;
        tracing::debug!(
            capacity = buffer.capacity(),
            max_depth = config.max_depth,
            "copy encoder ready"
        );
        Ok(Self {
            buffer,
            stringify,
            max_depth: config.max_depth,
        })
    }

    /// Override the nesting bound.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Current buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Encode `value` as one record and return an owned copy of the bytes.
    pub fn encode<O>(&mut self, value: &Value<O>) -> EncodeResult<Bytes>
    where
        S: Stringify<O>,
    {
        let len = self.encode_record(value)?;
        Ok(Bytes::copy_from_slice(&self.buffer.as_slice()[..len]))
    }

    /// Encode `value` and append the record to `out`.
    /// Returns the number of bytes appended.
    pub fn encode_into<O>(&mut self, value: &Value<O>, out: &mut BytesMut) -> EncodeResult<usize>
    where
        S: Stringify<O>,
    {
        let len = self.encode_record(value)?;
        out.extend_from_slice(&self.buffer.as_slice()[..len]);
        Ok(len)
    }

    fn encode_record<O>(&mut self, value: &Value<O>) -> EncodeResult<usize>
    where
        S: Stringify<O>,
    {
        self.buffer.reset();
        self.encode_value(value, 0, true, 0).inspect_err(|e| {
            tracing::debug!(kind = value.kind(), error = %e, "record not encoded");
        })
    }

    /// Write `value` at `offset` and return the offset past it.
    fn encode_value<O>(
        &mut self,
        value: &Value<O>,
        offset: usize,
        suppress_delimiter: bool,
        depth: usize,
    ) -> EncodeResult<usize>
    where
        S: Stringify<O>,
    {
        debug_assert_eq!(offset, self.buffer.len());

        // Keyed on position, not offset: an empty leading field still
        // gets its tab so a record of n fields always has n - 1 delimiters.
        let mut offset = offset;
        if !suppress_delimiter {
            self.buffer.push(DELIMITER)?;
            offset += 1;
        }

        match value {
            Value::Text(s) => self.encode_escaped(s.as_bytes(), offset),
            Value::Bytes(b) => self.encode_escaped(b, offset),
            Value::Sequence(items) => {
                if depth >= self.max_depth {
                    return Err(EncodeError::NestingTooDeep {
                        limit: self.max_depth,
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    offset = self.encode_value(item, offset, i == 0, depth + 1)?;
                }
                Ok(offset)
            }
            Value::Null => {
                self.buffer.append(NULL_MARKER)?;
                Ok(offset + NULL_MARKER.len())
            }
            Value::Other(o) => {
                let text = self.stringify.stringify(o)?;
                self.encode_escaped(text.as_bytes(), offset)
            }
        }
    }

    fn encode_escaped(&mut self, bytes: &[u8], offset: usize) -> EncodeResult<usize> {
        let size = escape::measure(bytes);
        let end = offset
            .checked_add(size)
            .ok_or_else(|| EncodeError::out_of_memory(usize::MAX))?;
        self.buffer.ensure_capacity(end)?;
        escape::write(bytes, self.buffer.as_mut_vec());
        debug_assert_eq!(self.buffer.len(), end);
        Ok(end)
    }
}

/// Encode one value with a short-lived encoder, stringifying `Other`
/// through `Display`.
pub fn encode<O: Display>(value: &Value<O>) -> EncodeResult<Bytes> {
    CopyEncoder::new().encode(value)
}
