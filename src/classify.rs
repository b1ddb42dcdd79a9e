//! Type classification: map a [`DeclaredType`] onto one of the four shapes
//! the rest of the library understands.
//!
//! Classification is pure and total. Shapes the library simply does not
//! model (unions, opaque types, bare markers) come back as
//! [`Shape::Unsupported`] and the caller decides what to do with them;
//! shapes that are recognised but malformed (mixed-type choices, a list
//! with two element types) are a [`SchemaError`].

use crate::error::SchemaError;
use crate::types::{DeclaredType, Shape, Value};

/// Reduce a declared type to the shape validation and CLI derivation work with.
pub fn classify(declared: &DeclaredType) -> Result<Shape, SchemaError> {
    match declared {
        DeclaredType::Singleton(kind) => Ok(Shape::Singleton(*kind)),
        DeclaredType::Choice(values) if values.is_empty() => Ok(Shape::Unsupported),
        DeclaredType::Choice(values) => classify_choices(values),
        DeclaredType::List(args) if args.is_empty() => Ok(Shape::Unsupported),
        DeclaredType::List(args) => classify_sequence(args),
        DeclaredType::Union(_) | DeclaredType::Opaque(_) => Ok(Shape::Unsupported),
    }
}

fn classify_choices(values: &[Value]) -> Result<Shape, SchemaError> {
    let mut kinds = Vec::with_capacity(values.len());
    for value in values {
        let kind = value.kind().ok_or_else(|| SchemaError::UnsupportedChoice {
            value: value.repr(),
            type_name: value.type_name(),
        })?;
        kinds.push(kind);
    }

    // Report the first adjacent pair that disagrees.
    for (pair, kind_pair) in values.windows(2).zip(kinds.windows(2)) {
        if kind_pair[0] != kind_pair[1] {
            return Err(SchemaError::MixedChoices {
                first: pair[0].repr(),
                first_kind: kind_pair[0],
                second: pair[1].repr(),
                second_kind: kind_pair[1],
            });
        }
    }

    Ok(Shape::ChoiceSet(values.to_vec()))
}

fn classify_sequence(args: &[DeclaredType]) -> Result<Shape, SchemaError> {
    let [element] = args else {
        return Err(SchemaError::SequenceArity(args.len()));
    };
    match element {
        DeclaredType::Singleton(kind) => Ok(Shape::Sequence(*kind)),
        other => Err(SchemaError::UnsupportedElement(other.to_string())),
    }
}
