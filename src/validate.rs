//! Construction-time validation: check every field's runtime value against
//! its classified shape.
//!
//! Fields are visited in declaration order and the first offending field
//! stops the walk. Nothing is coerced; in particular a boolean is never
//! accepted where an integer is declared, or the other way round.

use std::collections::HashMap;

use crate::classify::classify;
use crate::error::RootConfigError;
use crate::schema::{FieldDescriptor, Schema};
use crate::types::{Kind, Shape, Value};

/// Validate `values` against `schema`.
///
/// Keys in `values` that the schema does not declare are not looked at;
/// callers filter or reject them beforehand.
pub fn validate(schema: &Schema, values: &HashMap<String, Value>) -> Result<(), RootConfigError> {
    for field in schema.fields() {
        let name = field.name();
        let value = values
            .get(name)
            .ok_or_else(|| RootConfigError::MissingValue(name.to_string()))?;

        let shape = classify(field.declared_type()).map_err(|source| RootConfigError::Schema {
            field: name.to_string(),
            source,
        })?;

        check_value(field, &shape, value)?;
    }
    Ok(())
}

fn check_value(
    field: &FieldDescriptor,
    shape: &Shape,
    value: &Value,
) -> Result<(), RootConfigError> {
    let name = field.name();
    match shape {
        Shape::Singleton(kind) => expect_kind(name, *kind, value),
        Shape::ChoiceSet(choices) => {
            if choices.contains(value) {
                Ok(())
            } else {
                Err(RootConfigError::InvalidChoice {
                    field: name.to_string(),
                    value: value.clone(),
                    choices: choices.clone(),
                })
            }
        }
        Shape::Sequence(kind) => {
            let Value::List(items) = value else {
                return Err(RootConfigError::type_mismatch(
                    name,
                    format!("list[{kind}]"),
                    value.type_name(),
                ));
            };
            for item in items {
                expect_kind(name, *kind, item)?;
            }
            Ok(())
        }
        Shape::Unsupported => Err(RootConfigError::UnsupportedType {
            field: name.to_string(),
            declared: field.declared_type().clone(),
        }),
    }
}

fn expect_kind(name: &str, kind: Kind, value: &Value) -> Result<(), RootConfigError> {
    if value.kind() == Some(kind) {
        Ok(())
    } else {
        Err(RootConfigError::type_mismatch(name, kind, value.type_name()))
    }
}
