//! Validated record instances.
//!
//! A [`Record`] holds one value per declared field, in declaration order.
//! Every constructor fills omitted fields from their defaults and then runs
//! [`validate`](crate::validate::validate) exactly once; a `Record` that
//! exists is always valid and is never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_complex::Complex64;
use num_rational::BigRational;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::codec;
use crate::error::RootConfigError;
use crate::schema::Schema;
use crate::types::Value;
use crate::validate::validate;

#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    pub fn builder(schema: Arc<Schema>) -> RecordBuilder {
        RecordBuilder {
            schema,
            values: HashMap::new(),
        }
    }

    /// Construct from named values. Names the schema does not declare are
    /// an error.
    pub fn new<K, I>(schema: Arc<Schema>, values: I) -> Result<Self, RootConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut provided = HashMap::new();
        for (name, value) in values {
            let name = name.into();
            if !schema.contains(&name) {
                return Err(RootConfigError::UnknownField(name));
            }
            provided.insert(name, value);
        }
        Self::construct(schema, provided)
    }

    /// Construct from named values, silently dropping names the schema does
    /// not declare.
    pub fn from_dict<K, I>(schema: Arc<Schema>, values: I) -> Result<Self, RootConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut provided = HashMap::new();
        for (name, value) in values {
            let name = name.into();
            if schema.contains(&name) {
                provided.insert(name, value);
            } else {
                debug!(schema = schema.name(), key = %name, "ignoring unknown key");
            }
        }
        Self::construct(schema, provided)
    }

    /// Construct from values given in declaration order.
    ///
    /// Only positional fields take part; keyword-only fields and any
    /// positional fields past the end of `values` fall back to defaults.
    pub fn from_positional(
        schema: Arc<Schema>,
        values: Vec<Value>,
    ) -> Result<Self, RootConfigError> {
        let positional: Vec<&str> = schema
            .fields()
            .iter()
            .filter(|f| f.is_positional())
            .map(|f| f.name())
            .collect();
        if values.len() > positional.len() {
            return Err(RootConfigError::Configuration(format!(
                "{} takes {} positional values but {} were given",
                schema.name(),
                positional.len(),
                values.len()
            )));
        }
        let provided: HashMap<String, Value> = positional
            .into_iter()
            .map(str::to_string)
            .zip(values)
            .collect();
        Self::construct(schema, provided)
    }

    /// Fill defaults, validate, and lay values out in declaration order.
    pub(crate) fn construct(
        schema: Arc<Schema>,
        mut provided: HashMap<String, Value>,
    ) -> Result<Self, RootConfigError> {
        for field in schema.fields() {
            if !provided.contains_key(field.name())
                && let Some(default) = field.default_for_omitted()
            {
                provided.insert(field.name().to_string(), default);
            }
        }

        validate(&schema, &provided)?;

        let values = schema
            .fields()
            .iter()
            .map(|field| {
                provided
                    .remove(field.name())
                    .ok_or_else(|| RootConfigError::MissingValue(field.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(schema = schema.name(), fields = values.len(), "record validated");
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .fields()
            .iter()
            .position(|f| f.name() == name)
            .map(|i| &self.values[i])
    }

    /// Read a field as a concrete Rust type.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T, RootConfigError> {
        let value = self
            .get(name)
            .ok_or_else(|| RootConfigError::UnknownField(name.to_string()))?;
        T::from_value(value).ok_or_else(|| {
            RootConfigError::type_mismatch(name, std::any::type_name::<T>(), value.type_name())
        })
    }

    /// `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Re-validate with one field replaced. The original is left untouched.
    pub fn with(&self, name: &str, value: impl Into<Value>) -> Result<Self, RootConfigError> {
        if !self.schema.contains(name) {
            return Err(RootConfigError::UnknownField(name.to_string()));
        }
        let mut provided: HashMap<String, Value> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        provided.insert(name.to_string(), value.into());
        Self::construct(Arc::clone(&self.schema), provided)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={}", value.repr())?;
        }
        f.write_str(")")
    }
}

/// Serializes the tagged JSON form produced by [`codec::encode`].
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = codec::encode(self).map_err(<S::Error as serde::ser::Error>::custom)?;
        let mut map = serializer.serialize_map(Some(encoded.len()))?;
        for (key, value) in &encoded {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Builder for [`Record`]: set fields by name, then validate once.
pub struct RecordBuilder {
    schema: Arc<Schema>,
    values: HashMap<String, Value>,
}

impl RecordBuilder {
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn build(self) -> Result<Record, RootConfigError> {
        Record::new(self.schema, self.values)
    }
}

/// Conversion from a field value to a concrete Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_value!(i64, Integer);
from_value!(BigRational, Rational);
from_value!(BigDecimal, Decimal);
from_value!(f64, Float);
from_value!(Complex64, Complex);
from_value!(String, Text);
from_value!(bool, Boolean);
from_value!(PathBuf, Path);

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{ratio, train_schema};
    use crate::schema::FieldDescriptor;
    use crate::types::{DeclaredType, Kind};

    fn required() -> Vec<(&'static str, Value)> {
        vec![
            ("batch_size", Value::Integer(128)),
            ("lpf_pole", Value::Complex(Complex64::new(0.0, 1.0))),
            ("learning_rates", Value::List(vec![])),
            ("optimizer", Value::from("Adam")),
        ]
    }

    #[test]
    fn defaults_fill_omitted_fields() {
        let record = Record::new(train_schema(), required()).unwrap();
        assert_eq!(record.get("debug"), Some(&Value::Boolean(false)));
        assert_eq!(record.get("random_seed"), Some(&Value::Integer(1)));
        assert_eq!(record.get("model_version"), Some(&Value::Integer(2)));
        assert_eq!(
            record.get("ratios"),
            Some(&Value::List(vec![Value::Rational(ratio(1, 3))]))
        );
    }

    #[test]
    fn values_follow_declaration_order() {
        let record = Record::new(train_schema(), required()).unwrap();
        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            [
                "batch_size",
                "lpf_pole",
                "learning_rates",
                "optimizer",
                "debug",
                "random_seed",
                "model_version",
                "dataset_path",
                "ratios"
            ]
        );
    }

    #[test]
    fn missing_required_field() {
        let mut values = required();
        values.retain(|(k, _)| *k != "optimizer");
        assert!(matches!(
            Record::new(train_schema(), values),
            Err(RootConfigError::MissingValue(name)) if name == "optimizer"
        ));
    }

    #[test]
    fn new_rejects_unknown_field() {
        let mut values = required();
        values.push(("i_am_an_imposter", Value::from("whatever")));
        assert!(matches!(
            Record::new(train_schema(), values),
            Err(RootConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn from_dict_drops_unknown_field() {
        let mut values = required();
        values.push(("i_am_an_imposter", Value::from("whatever")));
        let record = Record::from_dict(train_schema(), values).unwrap();
        assert!(record.get("i_am_an_imposter").is_none());
    }

    #[test]
    fn positional_construction() {
        let record = Record::from_positional(
            train_schema(),
            vec![
                Value::Integer(64),
                Value::Complex(Complex64::new(1.0, -1.0)),
                Value::List(vec![]),
                Value::from("AdamW"),
                Value::Boolean(true),
            ],
        )
        .unwrap();
        assert_eq!(record.extract::<i64>("batch_size").unwrap(), 64);
        assert!(record.extract::<bool>("debug").unwrap());
        assert_eq!(record.extract::<i64>("random_seed").unwrap(), 1);
    }

    #[test]
    fn positional_skips_keyword_only_fields() {
        let schema = Arc::new(
            Schema::builder("Config")
                .field(FieldDescriptor::new("a", Kind::Integer))
                .field(FieldDescriptor::new("b", Kind::Text).default_value("x").keyword_only())
                .field(FieldDescriptor::new("c", Kind::Boolean))
                .build(),
        );
        let record =
            Record::from_positional(schema.clone(), vec![Value::Integer(1), Value::Boolean(true)])
                .unwrap();
        assert_eq!(record.get("b"), Some(&Value::from("x")));
        assert_eq!(record.get("c"), Some(&Value::Boolean(true)));

        let err = Record::from_positional(
            schema,
            vec![Value::Integer(1), Value::Boolean(true), Value::from("y")],
        )
        .unwrap_err();
        assert!(matches!(err, RootConfigError::Configuration(_)));
    }

    #[test]
    fn extract_typed_values() {
        let record = Record::new(train_schema(), required()).unwrap();
        let ratios: Vec<BigRational> = record.extract("ratios").unwrap();
        assert_eq!(ratios, vec![ratio(1, 3)]);
        assert!(matches!(
            record.extract::<String>("batch_size"),
            Err(RootConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            record.extract::<i64>("nope"),
            Err(RootConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn with_revalidates() {
        let record = Record::new(train_schema(), required()).unwrap();
        let changed = record.with("optimizer", "RMSProp").unwrap();
        assert_eq!(changed.get("optimizer"), Some(&Value::from("RMSProp")));
        assert_eq!(record.get("optimizer"), Some(&Value::from("Adam")));
        assert!(matches!(
            record.with("optimizer", "SGD"),
            Err(RootConfigError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let schema = Arc::new(
            Schema::builder("Config")
                .field(FieldDescriptor::new("name", Kind::Text))
                .field(FieldDescriptor::new("mode", DeclaredType::choice([1i64, 2])))
                .build(),
        );
        let record = Record::builder(schema)
            .set("name", "run")
            .set("mode", 2i64)
            .build()
            .unwrap();
        assert_eq!(record.to_string(), "Config(name='run', mode=2)");
    }
}
