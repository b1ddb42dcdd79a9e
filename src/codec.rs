//! JSON codec for records.
//!
//! Integers, floats, text, booleans and lists map onto native JSON. The four
//! kinds JSON cannot carry exactly (complex, decimal, rational, path) are
//! wrapped in a two-key tagged object:
//!
//! ```json
//! {"__custom_type__": "Fraction", "__value__": "1/3"}
//! ```
//!
//! The tag vocabulary lives in [`WIRE_TAGS`]. Encoding writes the kind's
//! canonical text (the `Display` of [`Value`]); decoding parses it back with
//! the same parser the CLI uses, so decimals and rationals come back exact.
//!
//! Decoding drops top-level keys the schema does not declare and then goes
//! through normal record construction, so a document that decodes cleanly
//! but holds the wrong kinds still fails validation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Number, Value as Json};
use tracing::debug;

use crate::error::RootConfigError;
use crate::literal;
use crate::record::Record;
use crate::schema::{FieldDescriptor, Schema};
use crate::types::{Kind, Value};

pub const CUSTOM_TYPE_KEY: &str = "__custom_type__";
pub const CUSTOM_VALUE_KEY: &str = "__value__";

/// One entry of the tag registry: a kind, its JSON tag, and its text codec.
#[derive(Debug, Clone, Copy)]
pub struct WireTag {
    pub kind: Kind,
    pub tag: &'static str,
    pub encode: fn(&Value) -> Result<String, String>,
    pub decode: fn(&str) -> Result<Value, String>,
}

pub static WIRE_TAGS: [WireTag; 4] = [
    WireTag {
        kind: Kind::Complex,
        tag: "complex",
        encode: encode_text,
        decode: decode_complex,
    },
    WireTag {
        kind: Kind::Decimal,
        tag: "Decimal",
        encode: encode_text,
        decode: decode_decimal,
    },
    WireTag {
        kind: Kind::Rational,
        tag: "Fraction",
        encode: encode_text,
        decode: decode_rational,
    },
    WireTag {
        kind: Kind::Path,
        tag: "Path",
        encode: encode_path,
        decode: decode_path,
    },
];

fn encode_text(value: &Value) -> Result<String, String> {
    Ok(value.to_string())
}

/// Paths must be valid UTF-8 to survive the trip through JSON text.
fn encode_path(value: &Value) -> Result<String, String> {
    match value {
        Value::Path(path) => path
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| format!("path {} is not valid UTF-8", path.display())),
        other => encode_text(other),
    }
}

fn decode_complex(text: &str) -> Result<Value, String> {
    literal::parse(Kind::Complex, text)
}

fn decode_decimal(text: &str) -> Result<Value, String> {
    literal::parse(Kind::Decimal, text)
}

fn decode_rational(text: &str) -> Result<Value, String> {
    literal::parse(Kind::Rational, text)
}

fn decode_path(text: &str) -> Result<Value, String> {
    literal::parse(Kind::Path, text)
}

pub fn wire_tag_for_kind(kind: Kind) -> Option<&'static WireTag> {
    WIRE_TAGS.iter().find(|t| t.kind == kind)
}

pub fn wire_tag_for_name(tag: &str) -> Option<&'static WireTag> {
    WIRE_TAGS.iter().find(|t| t.tag == tag)
}

/// Encode a record as a JSON object, fields in declaration order.
pub fn encode(record: &Record) -> Result<Map<String, Json>, RootConfigError> {
    let mut map = Map::new();
    for (name, value) in record.iter() {
        map.insert(name.to_string(), encode_value(name, value)?);
    }
    Ok(map)
}

fn encode_value(key: &str, value: &Value) -> Result<Json, RootConfigError> {
    match value {
        Value::Integer(i) => Ok(Json::from(*i)),
        Value::Float(x) => {
            Number::from_f64(*x)
                .map(Json::Number)
                .ok_or_else(|| RootConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("{x} cannot be represented in JSON"),
                })
        }
        Value::Text(s) => Ok(Json::String(s.clone())),
        Value::Boolean(b) => Ok(Json::Bool(*b)),
        Value::List(items) => items
            .iter()
            .map(|item| encode_value(key, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        Value::Rational(_) | Value::Decimal(_) | Value::Complex(_) | Value::Path(_) => {
            wrap(key, value)
        }
    }
}

fn wrap(key: &str, value: &Value) -> Result<Json, RootConfigError> {
    let tag = value
        .kind()
        .and_then(wire_tag_for_kind)
        .ok_or_else(|| RootConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("no wire tag registered for {}", value.type_name()),
        })?;
    let mut wrapped = Map::new();
    wrapped.insert(CUSTOM_TYPE_KEY.to_string(), Json::String(tag.tag.to_string()));
    let text = (tag.encode)(value).map_err(|reason| RootConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    })?;
    wrapped.insert(CUSTOM_VALUE_KEY.to_string(), Json::String(text));
    Ok(Json::Object(wrapped))
}

/// Decode a JSON object into a validated record.
pub fn decode(map: &Map<String, Json>, schema: Arc<Schema>) -> Result<Record, RootConfigError> {
    let mut provided = HashMap::new();
    for (key, json) in map {
        let Some(field) = schema.field(key) else {
            debug!(schema = schema.name(), key = %key, "ignoring unknown key");
            continue;
        };
        provided.insert(key.clone(), decode_value(field, json)?);
    }
    Record::construct(schema, provided)
}

fn decode_value(field: &FieldDescriptor, json: &Json) -> Result<Value, RootConfigError> {
    match json {
        Json::Bool(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => decode_number(field.name(), n),
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Array(items) => items
            .iter()
            .map(|item| decode_value(field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Json::Object(obj) => match as_wire_tag(obj) {
            Some((tag, text)) => unwrap_tag(field.name(), tag, text),
            None => Err(RootConfigError::type_mismatch(
                field.name(),
                field.declared_type(),
                "object",
            )),
        },
        Json::Null => Err(RootConfigError::type_mismatch(
            field.name(),
            field.declared_type(),
            "null",
        )),
    }
}

fn decode_number(key: &str, n: &Number) -> Result<Value, RootConfigError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    if n.is_u64() {
        return Err(RootConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{n} is out of range for an integer"),
        });
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| RootConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{n} is not a representable number"),
        })
}

/// The `(tag, value)` pair if `obj` has exactly the two wire-tag keys.
fn as_wire_tag(obj: &Map<String, Json>) -> Option<(&Json, &Json)> {
    if obj.len() != 2 {
        return None;
    }
    Some((obj.get(CUSTOM_TYPE_KEY)?, obj.get(CUSTOM_VALUE_KEY)?))
}

fn unwrap_tag(key: &str, tag: &Json, text: &Json) -> Result<Value, RootConfigError> {
    let Json::String(tag) = tag else {
        return Err(RootConfigError::UnsupportedTag(tag.to_string()));
    };
    let entry = wire_tag_for_name(tag).ok_or_else(|| RootConfigError::UnsupportedTag(tag.clone()))?;
    let Json::String(text) = text else {
        return Err(RootConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("the text of a tagged {tag} must be a string"),
        });
    };
    (entry.decode)(text).map_err(|reason| RootConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    })
}

/// Encode a record as compact JSON text.
pub fn to_text(record: &Record) -> Result<String, RootConfigError> {
    Ok(serde_json::to_string(&Json::Object(encode(record)?))?)
}

/// Encode a record as indented JSON text.
pub fn to_text_pretty(record: &Record) -> Result<String, RootConfigError> {
    Ok(serde_json::to_string_pretty(&Json::Object(encode(record)?))?)
}

/// Decode JSON text holding a single object into a validated record.
pub fn from_text(text: &str, schema: Arc<Schema>) -> Result<Record, RootConfigError> {
    let json: Json = serde_json::from_str(text)?;
    let Json::Object(map) = json else {
        return Err(RootConfigError::InvalidValue {
            key: "<document>".into(),
            reason: "expected a JSON object".into(),
        });
    };
    decode(&map, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{ratio, single_field, train_record};
    use crate::types::DeclaredType;
    use bigdecimal::BigDecimal;
    use num_complex::Complex64;
    use serde_json::json;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn record_of(declared: impl Into<DeclaredType>, value: Value) -> Record {
        Record::new(Arc::new(single_field("x", declared)), [("x", value)]).unwrap()
    }

    #[test]
    fn rational_is_tagged() {
        let record = record_of(Kind::Rational, Value::Rational(ratio(1, 3)));
        assert_eq!(
            to_text(&record).unwrap(),
            r#"{"x":{"__custom_type__":"Fraction","__value__":"1/3"}}"#
        );
    }

    #[test]
    fn rational_decodes_exactly() {
        let schema = Arc::new(single_field("x", Kind::Rational));
        let record = from_text(
            r#"{"x": {"__custom_type__": "Fraction", "__value__": "1/3"}}"#,
            schema,
        )
        .unwrap();
        assert_eq!(record.get("x"), Some(&Value::Rational(ratio(1, 3))));
    }

    #[test]
    fn every_tag_is_registered_once() {
        for kind in [Kind::Complex, Kind::Decimal, Kind::Rational, Kind::Path] {
            let tag = wire_tag_for_kind(kind).unwrap();
            assert_eq!(wire_tag_for_name(tag.tag).unwrap().kind, kind);
        }
        for kind in [Kind::Integer, Kind::Float, Kind::Text, Kind::Boolean] {
            assert!(wire_tag_for_kind(kind).is_none());
        }
    }

    #[test]
    fn native_kinds_are_not_tagged() {
        let record = record_of(Kind::Integer, Value::Integer(7));
        assert_eq!(encode(&record).unwrap()["x"], json!(7));
        let record = record_of(Kind::Boolean, Value::Boolean(true));
        assert_eq!(encode(&record).unwrap()["x"], json!(true));
        let record = record_of(Kind::Float, Value::Float(1.0));
        assert_eq!(to_text(&record).unwrap(), r#"{"x":1.0}"#);
    }

    #[test]
    fn list_elements_are_tagged() {
        let record = record_of(
            DeclaredType::list_of(Kind::Decimal),
            Value::List(vec![Value::Decimal(BigDecimal::from_str("0.01").unwrap())]),
        );
        assert_eq!(
            encode(&record).unwrap()["x"],
            json!([{"__custom_type__": "Decimal", "__value__": "0.01"}])
        );
    }

    #[test]
    fn full_record_round_trips() {
        let record = train_record();
        let text = to_text(&record).unwrap();
        let decoded = from_text(&text, Arc::clone(record.schema())).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn exotic_values_round_trip() {
        let cases = [
            (
                Kind::Decimal,
                Value::Decimal(
                    BigDecimal::from_str("3.14159265358979323846264338327950288").unwrap(),
                ),
            ),
            (Kind::Rational, Value::Rational(ratio(2, 3))),
            (Kind::Rational, Value::Rational(ratio(-5, 1))),
            (Kind::Complex, Value::Complex(Complex64::new(-1.5, 2.25))),
            (Kind::Complex, Value::Complex(Complex64::new(0.0, -1.0))),
            (Kind::Path, Value::Path(PathBuf::from("/tmp/datasets"))),
            (Kind::Float, Value::Float(0.1)),
        ];
        for (kind, value) in cases {
            let record = record_of(kind, value.clone());
            let decoded =
                from_text(&to_text(&record).unwrap(), Arc::clone(record.schema())).unwrap();
            assert_eq!(decoded.get("x"), Some(&value), "{kind}");
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let schema = Arc::new(single_field("x", Kind::Integer));
        let record = from_text(r#"{"x": 1, "added_later": "whatever"}"#, schema).unwrap();
        assert_eq!(record.values(), &[Value::Integer(1)]);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let schema = Arc::new(single_field("x", Kind::Rational));
        let err = from_text(
            r#"{"x": {"__custom_type__": "Quaternion", "__value__": "1"}}"#,
            schema,
        )
        .unwrap_err();
        assert!(matches!(err, RootConfigError::UnsupportedTag(tag) if tag == "Quaternion"));
    }

    #[test]
    fn malformed_tag_text_is_rejected() {
        let schema = Arc::new(single_field("x", Kind::Rational));
        let err = from_text(
            r#"{"x": {"__custom_type__": "Fraction", "__value__": "one third"}}"#,
            schema,
        )
        .unwrap_err();
        assert!(matches!(err, RootConfigError::InvalidValue { .. }));
    }

    #[test]
    fn tag_with_extra_key_is_a_plain_object() {
        let schema = Arc::new(single_field("x", Kind::Rational));
        let err = from_text(
            r#"{"x": {"__custom_type__": "Fraction", "__value__": "1/3", "extra": 1}}"#,
            schema,
        )
        .unwrap_err();
        assert!(matches!(err, RootConfigError::TypeMismatch { actual, .. } if actual == "object"));
    }

    #[test]
    fn decoded_values_are_still_validated() {
        let schema = Arc::new(single_field("x", Kind::Rational));
        let err = from_text(r#"{"x": 0.5}"#, schema).unwrap_err();
        assert!(matches!(err, RootConfigError::TypeMismatch { .. }));

        let schema = Arc::new(single_field("x", Kind::Integer));
        let err = from_text(r#"{"x": true}"#, schema).unwrap_err();
        assert!(matches!(err, RootConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn null_is_a_type_mismatch() {
        let schema = Arc::new(single_field("x", Kind::Integer));
        let err = from_text(r#"{"x": null}"#, schema).unwrap_err();
        assert!(matches!(err, RootConfigError::TypeMismatch { actual, .. } if actual == "null"));
    }

    #[test]
    fn non_finite_float_cannot_be_encoded() {
        let record = record_of(Kind::Float, Value::Float(f64::NAN));
        assert!(matches!(
            to_text(&record),
            Err(RootConfigError::InvalidValue { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_cannot_be_encoded() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/tmp/\xff.json"));
        let record = record_of(Kind::Path, Value::Path(path));
        assert!(matches!(
            to_text(&record),
            Err(RootConfigError::InvalidValue { key, .. }) if key == "x"
        ));

        let record = record_of(
            DeclaredType::list_of(Kind::Path),
            Value::List(vec![Value::Path(PathBuf::from(OsStr::from_bytes(b"/tmp/\xff")))]),
        );
        assert!(matches!(encode(&record), Err(RootConfigError::InvalidValue { .. })));
    }

    #[test]
    fn document_must_be_an_object() {
        let schema = Arc::new(single_field("x", Kind::Integer));
        assert!(matches!(
            from_text("[1, 2]", schema.clone()),
            Err(RootConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            from_text("{not json", schema),
            Err(RootConfigError::Json(_))
        ));
    }

    #[test]
    fn record_serializes_through_serde() {
        let record = record_of(Kind::Path, Value::Path(PathBuf::from("/bin")));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"x": {"__custom_type__": "Path", "__value__": "/bin"}})
        );
    }
}
