//! # pgencode — PostgreSQL COPY text encoding
//!
//! Turns a tagged value (text, bytes, nested sequence, null, or an opaque
//! host value) into the text format read by `COPY ... FROM STDIN`:
//! tab-delimited fields, backslash-escaped control bytes, `\N` for null.
//!
//! ## Quick Example
//!
//! ```
//! use pgencode::{CopyEncoder, Value};
//!
//! let mut encoder = CopyEncoder::new();
//! let row: Value<i64> = Value::seq(["x".into(), Value::Null, Value::Other(42)]);
//! let bytes = encoder.encode(&row).unwrap();
//! assert_eq!(&bytes[..], b"x\t\\N\t42");
//! ```
//!
//! ## Escaping
//!
//! | Bytes         | Output              |
//! |---------------|---------------------|
//! | `0x20..=0x7E` | unchanged           |
//! | `0x08..=0x0D` | `\b \t \n \v \f \r` |
//! | other         | `\xHH`              |
//!
//! Records carry no terminator; [`stream::CopyWriter`] adds the `\n`.

pub mod buffer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod json;
pub mod stream;
pub mod value;

pub use buffer::CopyBuffer;
pub use config::EncoderConfig;
pub use encoder::{CopyEncoder, encode};
pub use error::{ConfigError, EncodeError, EncodeResult, StreamError};
pub use json::{JsonStringify, JsonValue};
pub use stream::{CopySummary, CopyWriter, copy_ndjson, encode_batch};
pub use value::{DisplayStringify, Stringify, Value};

pub mod prelude {
    pub use crate::config::EncoderConfig;
    pub use crate::encoder::CopyEncoder;
    pub use crate::error::*;
    pub use crate::json::{JsonStringify, JsonValue};
    pub use crate::stream::{CopySummary, CopyWriter, copy_ndjson};
    pub use crate::value::{DisplayStringify, Stringify, Value};
}
