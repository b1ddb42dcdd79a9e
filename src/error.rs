use std::path::PathBuf;

use thiserror::Error;

use crate::types::{DeclaredType, Kind, Value, join_repr};

/// A declared type whose shape is recognised but malformed.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum SchemaError {
    #[error("choice {value} has type `{type_name}`, which is not a supported singleton type")]
    UnsupportedChoice {
        value: String,
        type_name: &'static str,
    },

    #[error(
        "all choices must share one type, but found {first} of type `{first_kind}` \
         followed by {second} of type `{second_kind}`"
    )]
    MixedChoices {
        first: String,
        first_kind: Kind,
        second: String,
        second_kind: Kind,
    },

    #[error("a list takes exactly one element type, but {0} were given")]
    SequenceArity(usize),

    #[error("list element type `{0}` is not a supported singleton type")]
    UnsupportedElement(String),
}

/// Every error the library returns.
///
/// An unsupported declared type and an unknown Wire Tag are kept apart:
/// [`UnsupportedType`](Self::UnsupportedType) is a schema authoring problem
/// tied to a field, while [`UnsupportedTag`](Self::UnsupportedTag) comes
/// from the JSON document being decoded and names only the tag.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum RootConfigError {
    #[error("Invalid type declaration for '{field}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::schema)))]
    Schema { field: String, source: SchemaError },

    #[error("'{0}' expects a value, but nothing is provided")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::missing_value)))]
    MissingValue(String),

    #[error("'{field}' is expected to be a(n) {expected}, but got {actual}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::type_mismatch)))]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("'{field}': {} is not one of [{}]", .value.repr(), join_repr(.choices))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::invalid_choice)))]
    InvalidChoice {
        field: String,
        value: Value,
        choices: Vec<Value>,
    },

    #[error("'{field}' is declared as `{declared}`, which is not supported")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::unsupported_type)))]
    UnsupportedType {
        field: String,
        declared: DeclaredType,
    },

    /// A tagged JSON object whose tag is not in the registry.
    #[error("Unknown custom type tag '{0}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::unsupported_tag)))]
    UnsupportedTag(String),

    #[error("Unknown field '{0}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::unknown_field)))]
    UnknownField(String),

    #[error("Invalid value for '{key}': {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::invalid_value)))]
    InvalidValue { key: String, reason: String },

    #[error("Configuration error: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(rootconfig::configuration)))]
    Configuration(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "clap")]
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl RootConfigError {
    pub(crate) fn type_mismatch(
        field: &str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        RootConfigError::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
