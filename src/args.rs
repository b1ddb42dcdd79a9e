//! Derive command-line argument specifications from a schema.
//!
//! This is framework-agnostic: it produces one [`ArgSpec`] per field, in
//! declaration order, describing the flag name, how to coerce its text, and
//! whether it is required. The clap adapter (the `cli` module, behind the
//! `clap` feature) turns these into a `clap::Command`; any other parser can
//! consume them the same way.
//!
//! Every field becomes a keyword argument. `batch_size` becomes
//! `--batch-size`; sequence fields take zero or more values, everything
//! else takes exactly one.

use tracing::trace;

use crate::classify::classify;
use crate::error::RootConfigError;
use crate::schema::{FieldDescriptor, Schema};
use crate::types::{Kind, Multiplicity, Shape, Value};

/// Options for CLI derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    prefix_chars: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            prefix_chars: "-".to_string(),
        }
    }
}

impl CliOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters allowed to introduce an option (default: `"-"`).
    pub fn prefix_chars(mut self, chars: &str) -> Self {
        self.prefix_chars = chars.to_string();
        self
    }

    /// The character used to build flag names: `-` if allowed, otherwise the
    /// first prefix character.
    pub fn marker(&self) -> Result<char, RootConfigError> {
        if self.prefix_chars.contains('-') {
            return Ok('-');
        }
        self.prefix_chars.chars().next().ok_or_else(|| {
            RootConfigError::Configuration(
                "at least one prefix character is needed for keyword CLI arguments".into(),
            )
        })
    }
}

/// How one field is exposed on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    /// Field this argument fills.
    pub field: String,
    /// Kind the argument text is parsed as.
    pub coercion: Kind,
    pub required: bool,
    /// Value used when the flag is absent. Always `None` for required fields.
    pub default: Option<Value>,
    /// Allowed values, in declaration order, with their original kinds.
    pub choices: Option<Vec<Value>>,
    pub multiplicity: Multiplicity,
    pub help: Option<String>,
}

impl ArgSpec {
    /// Convert one argument token into a value.
    ///
    /// Booleans only accept `true` or `false`, in any case.
    pub fn coerce(&self, text: &str) -> Result<Value, String> {
        self.coercion.parse(text)
    }

    /// Coerce, then check the result against `choices`.
    pub fn accept(&self, text: &str) -> Result<Value, String> {
        let value = self.coerce(text)?;
        match &self.choices {
            Some(choices) if !choices.contains(&value) => Err(format!(
                "{} is not one of [{}]",
                value.repr(),
                crate::types::join_repr(choices)
            )),
            _ => Ok(value),
        }
    }
}

/// `--` + field name with `_` replaced, using `marker` for both.
pub fn flag_name(field: &str, marker: char) -> String {
    let mut flag = String::with_capacity(field.len() + 2);
    flag.push(marker);
    flag.push(marker);
    flag.extend(field.chars().map(|c| if c == '_' { marker } else { c }));
    flag
}

/// Derive `(flag name, spec)` pairs for every field, in declaration order.
///
/// Fails before looking at any field if `options` has no prefix character.
pub fn derive_cli_specs(
    schema: &Schema,
    options: &CliOptions,
) -> Result<Vec<(String, ArgSpec)>, RootConfigError> {
    let marker = options.marker()?;
    schema
        .fields()
        .iter()
        .map(|field| {
            let flag = flag_name(field.name(), marker);
            let spec = derive_spec(field)?;
            trace!(
                flag = %flag,
                coercion = %spec.coercion,
                required = spec.required,
                "derived CLI argument"
            );
            Ok((flag, spec))
        })
        .collect()
}

fn derive_spec(field: &FieldDescriptor) -> Result<ArgSpec, RootConfigError> {
    let shape = classify(field.declared_type()).map_err(|source| RootConfigError::Schema {
        field: field.name().to_string(),
        source,
    })?;

    let (coercion, choices, multiplicity) = match shape {
        Shape::Sequence(kind) => (kind, None, Multiplicity::ZeroOrMore),
        Shape::ChoiceSet(values) => {
            let kind = values
                .first()
                .and_then(Value::kind)
                .ok_or_else(|| RootConfigError::UnsupportedType {
                    field: field.name().to_string(),
                    declared: field.declared_type().clone(),
                })?;
            (kind, Some(values), Multiplicity::Single)
        }
        Shape::Singleton(Kind::Boolean) => (
            Kind::Boolean,
            Some(vec![Value::Boolean(true), Value::Boolean(false)]),
            Multiplicity::Single,
        ),
        Shape::Singleton(kind) => (kind, None, Multiplicity::Single),
        Shape::Unsupported => {
            return Err(RootConfigError::UnsupportedType {
                field: field.name().to_string(),
                declared: field.declared_type().clone(),
            });
        }
    };

    Ok(ArgSpec {
        field: field.name().to_string(),
        coercion,
        required: field.is_required(),
        default: field.default_for_omitted(),
        choices,
        multiplicity,
        help: field.help_text().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::fixtures::test::{ratio, single_field, train_schema};
    use crate::types::DeclaredType;

    fn specs() -> Vec<(String, ArgSpec)> {
        derive_cli_specs(&train_schema(), &CliOptions::default()).unwrap()
    }

    fn spec(flag: &str) -> ArgSpec {
        specs()
            .into_iter()
            .find(|(f, _)| f == flag)
            .map(|(_, s)| s)
            .unwrap_or_else(|| panic!("no spec for {flag}"))
    }

    #[test]
    fn every_flag_is_a_long_option() {
        let flags: Vec<String> = specs().into_iter().map(|(f, _)| f).collect();
        assert_eq!(
            flags,
            [
                "--batch-size",
                "--lpf-pole",
                "--learning-rates",
                "--optimizer",
                "--debug",
                "--random-seed",
                "--model-version",
                "--dataset-path",
                "--ratios"
            ]
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(specs(), specs());
    }

    #[test]
    fn singleton_coercions() {
        assert_eq!(spec("--lpf-pole").coercion, Kind::Complex);
        let seed = spec("--random-seed");
        assert_eq!(seed.coercion, Kind::Integer);
        assert_eq!(seed.default, Some(Value::Integer(1)));
        assert!(!seed.required);
        assert_eq!(seed.multiplicity, Multiplicity::Single);
    }

    #[test]
    fn required_fields_have_no_default() {
        let batch = spec("--batch-size");
        assert!(batch.required);
        assert_eq!(batch.default, None);
        assert_eq!(batch.help.as_deref(), Some("Samples per step."));
    }

    #[test]
    fn sequence_takes_zero_or_more() {
        let ratios = spec("--ratios");
        assert_eq!(ratios.coercion, Kind::Rational);
        assert_eq!(ratios.multiplicity, Multiplicity::ZeroOrMore);
        assert_eq!(
            ratios.default,
            Some(Value::List(vec![Value::Rational(ratio(1, 3))]))
        );
    }

    #[test]
    fn choices_keep_their_kind() {
        let version = spec("--model-version");
        assert_eq!(version.coercion, Kind::Integer);
        assert_eq!(version.default, Some(Value::Integer(2)));
        assert_eq!(
            version.choices,
            Some(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        );

        let optimizer = spec("--optimizer");
        assert_eq!(optimizer.coercion, Kind::Text);
        assert!(optimizer.required);
        assert_eq!(optimizer.choices.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn boolean_uses_strict_parser() {
        let debug = spec("--debug");
        assert_eq!(
            debug.choices,
            Some(vec![Value::Boolean(true), Value::Boolean(false)])
        );
        assert_eq!(debug.coerce("True"), Ok(Value::Boolean(true)));
        assert_eq!(debug.coerce("false"), Ok(Value::Boolean(false)));
        assert!(debug.coerce("FFalse").is_err());
        assert!(debug.coerce("notabool").is_err());
        assert!(debug.coerce("1").is_err());
    }

    #[test]
    fn accept_checks_choices() {
        let optimizer = spec("--optimizer");
        assert_eq!(optimizer.accept("Adam"), Ok(Value::from("Adam")));
        assert!(optimizer.accept("SGD").is_err());

        let version = spec("--model-version");
        assert_eq!(version.accept("3"), Ok(Value::Integer(3)));
        assert!(version.accept("4").is_err());
        assert!(version.accept("one").is_err());
    }

    #[test]
    fn custom_marker() {
        let schema = single_field("batch_size", Kind::Integer);
        let specs = derive_cli_specs(&schema, &CliOptions::new().prefix_chars("+")).unwrap();
        assert_eq!(specs[0].0, "++batch+size");

        let specs = derive_cli_specs(&schema, &CliOptions::new().prefix_chars("+-")).unwrap();
        assert_eq!(specs[0].0, "--batch-size");
    }

    #[test]
    fn empty_prefix_chars_fail_before_any_field() {
        let schema = single_field("broken", DeclaredType::Opaque("dict".into()));
        let err = derive_cli_specs(&schema, &CliOptions::new().prefix_chars("")).unwrap_err();
        assert!(matches!(err, RootConfigError::Configuration(_)));
    }

    #[test]
    fn unsupported_field_is_rejected() {
        let schema = single_field("x", DeclaredType::Union(vec![Kind::Integer.into()]));
        assert!(matches!(
            derive_cli_specs(&schema, &CliOptions::default()),
            Err(RootConfigError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn malformed_field_is_a_schema_error() {
        let schema = single_field("x", DeclaredType::list_of(DeclaredType::choice(["a"])));
        assert!(matches!(
            derive_cli_specs(&schema, &CliOptions::default()),
            Err(RootConfigError::Schema {
                source: SchemaError::UnsupportedElement(_),
                ..
            })
        ));
    }
}
