//! JSON host adapter.
//!
//! Maps `serde_json::Value` onto the encoder's tagged values:
//!
//! | JSON             | Value            |
//! |------------------|------------------|
//! | `null`           | `Null`           |
//! | string           | `Text`           |
//! | array            | `Sequence`       |
//! | number / bool    | `Other` → `1.5`, `true` |
//! | object           | `Other` → compact JSON text |

use serde_json::Value as Json;

use crate::error::{EncodeError, EncodeResult};
use crate::value::{Stringify, Value};

/// Tagged value carrying JSON scalars and objects as `Other`.
pub type JsonValue = Value<Json>;

impl From<Json> for Value<Json> {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            other => Value::Other(other),
        }
    }
}

/// Renders JSON scalars the way PostgreSQL expects them in COPY text:
/// numbers and booleans bare, objects as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStringify;

impl Stringify<Json> for JsonStringify {
    fn stringify(&self, value: &Json) -> EncodeResult<String> {
        match value {
            Json::Bool(b) => Ok(b.to_string()),
            Json::Number(n) => Ok(n.to_string()),
            Json::String(s) => Ok(s.clone()),
            other => serde_json::to_string(other).map_err(EncodeError::conversion),
        }
    }
}

/// Parse one line of JSON into a tagged value.
pub fn parse_record(line: &str) -> serde_json::Result<JsonValue> {
    serde_json::from_str::<Json>(line).map(Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CopyEncoder;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn enc(json: Json) -> Vec<u8> {
        CopyEncoder::with_stringify(JsonStringify)
            .encode(&Value::from(json))
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_mapping() {
        assert_eq!(JsonValue::from(json!(null)), Value::Null);
        assert_eq!(JsonValue::from(json!("a")), Value::Text("a".to_string()));
        assert_eq!(JsonValue::from(json!(7)), Value::Other(json!(7)));
        assert_eq!(
            JsonValue::from(json!(["a", null])),
            Value::Sequence(vec![Value::Text("a".to_string()), Value::Null])
        );
    }

    #[test]
    fn test_encode_mixed_record() {
        assert_eq!(enc(json!([1, "a", null, true])), b"1\ta\t\\N\ttrue");
    }

    #[test]
    fn test_encode_float() {
        assert_eq!(enc(json!([2.5, -0.125])), b"2.5\t-0.125");
    }

    #[test]
    fn test_object_is_compact_json() {
        // serde_json already escaped the newline; its backslash passes through.
        assert_eq!(enc(json!({"k": "v\n"})), b"{\"k\":\"v\\n\"}");
    }

    #[test]
    fn test_parse_record() {
        let value = parse_record(r#"[[1, 2], [3]]"#).unwrap();
        let out = CopyEncoder::with_stringify(JsonStringify).encode(&value).unwrap();
        assert_eq!(&out[..], b"1\t2\t3");
    }

    #[test]
    fn test_parse_record_rejects_garbage() {
        assert!(parse_record("[1,").is_err());
    }
}
