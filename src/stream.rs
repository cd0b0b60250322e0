//! Record streams built on top of the encoder.
//!
//! The encoder produces one record without a terminator. This module is the
//! caller side: it joins records with `\n` to form a COPY text stream, either
//! into an `io::Write` or into a single `BytesMut` batch.

use std::io::{BufRead, Write};

use bytes::BytesMut;

use crate::encoder::CopyEncoder;
use crate::error::{EncodeResult, StreamError};
use crate::json::{JsonStringify, parse_record};
use crate::value::{Stringify, Value};

const RECORD_TERMINATOR: &[u8] = b"\n";

/// Writes newline-terminated COPY records to `W`.
pub struct CopyWriter<W, S> {
    inner: W,
    encoder: CopyEncoder<S>,
    records: u64,
}

impl<W: Write, S> CopyWriter<W, S> {
    pub fn new(inner: W, encoder: CopyEncoder<S>) -> Self {
        Self {
            inner,
            encoder,
            records: 0,
        }
    }

    /// Encode `value` as one record and write it with its terminator.
    /// Nothing is written if encoding fails.
    pub fn write_record<O>(&mut self, value: &Value<O>) -> Result<(), StreamError>
    where
        S: Stringify<O>,
    {
        let record = self.encoder.encode(value)?;
        self.inner.write_all(&record)?;
        self.inner.write_all(RECORD_TERMINATOR)?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> Result<(), StreamError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> Result<W, StreamError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Encode `rows` into one buffer of newline-terminated records,
/// ready to go out as a single CopyData payload.
pub fn encode_batch<O, S>(encoder: &mut CopyEncoder<S>, rows: &[Value<O>]) -> EncodeResult<BytesMut>
where
    S: Stringify<O>,
{
    let mut buf = BytesMut::new();
    for row in rows {
        encoder.encode_into(row, &mut buf)?;
        buf.extend_from_slice(RECORD_TERMINATOR);
    }
    tracing::debug!(rows = rows.len(), bytes = buf.len(), "encoded copy batch");
    Ok(buf)
}

/// Totals from [`copy_ndjson`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub records: u64,
    pub skipped: u64,
}

/// Read one JSON value per line and write one COPY record per value.
///
/// Blank lines are ignored. A line that is not valid JSON aborts with
/// [`StreamError::InvalidJson`], or is counted and skipped when
/// `skip_invalid` is set.
pub fn copy_ndjson<R, W>(
    reader: R,
    writer: &mut CopyWriter<W, JsonStringify>,
    skip_invalid: bool,
) -> Result<CopySummary, StreamError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = CopySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value = match parse_record(&line) {
            Ok(value) => value,
            Err(e) if skip_invalid => {
                tracing::warn!(line = line_no, error = %e, "skipping invalid JSON");
                summary.skipped += 1;
                continue;
            }
            Err(source) => {
                return Err(StreamError::InvalidJson {
                    line: line_no,
                    source,
                });
            }
        };

        writer.write_record(&value)?;
        summary.records += 1;
    }

    Ok(summary)
}
