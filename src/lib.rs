//! Typed, validated configuration objects for experiment-style tools.
//! Declare the fields once; get validation, a command line, and a JSON file
//! format that round-trips exactly.
//!
//! A configuration is described by a [`Schema`]: an ordered list of
//! [`FieldDescriptor`]s, each with a name, a [`DeclaredType`], an optional
//! default, and optional help text. Values conforming to a schema live in a
//! [`Record`], which is validated once at construction and immutable after.
//!
//! ```
//! use std::sync::Arc;
//! use rootconfig::{CliOptions, DeclaredType, FieldDescriptor, Kind, Schema, parse_from};
//!
//! let schema = Arc::new(
//!     Schema::builder("TrainConfig")
//!         .field(FieldDescriptor::new("batch_size", Kind::Integer))
//!         .field(FieldDescriptor::new("optimizer", DeclaredType::choice(["Adam", "AdamW"])))
//!         .field(FieldDescriptor::new("ratios", DeclaredType::list_of(Kind::Rational)))
//!         .build(),
//! );
//!
//! let record = parse_from(
//!     Arc::clone(&schema),
//!     ["--batch-size", "64", "--optimizer", "AdamW", "--ratios", "1/3", "2/3"],
//!     &CliOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     rootconfig::codec::to_text(&record).unwrap(),
//!     r#"{"batch_size":64,"optimizer":"AdamW","ratios":[{"__custom_type__":"Fraction","__value__":"1/3"},{"__custom_type__":"Fraction","__value__":"2/3"}]}"#,
//! );
//! ```
//!
//! # Kinds
//!
//! Every field's type reduces to one of eight singleton [`Kind`]s, or to a
//! choice among literals of one kind, or to a list of one kind:
//!
//! | Kind | Rust value | CLI literal | JSON form |
//! |------|-----------|-------------|-----------|
//! | `integer` | `i64` | `42` | number |
//! | `rational` | `BigRational` | `1/3`, `0.25` | tagged `Fraction` |
//! | `decimal` | `BigDecimal` | `1e-3` | tagged `Decimal` |
//! | `float` | `f64` | `0.5` | number |
//! | `complex` | `Complex64` | `1+2j` | tagged `complex` |
//! | `text` | `String` | `Adam` | string |
//! | `boolean` | `bool` | `true`, `FALSE` | `true`/`false` |
//! | `path` | `PathBuf` | `/data` | tagged `Path` |
//!
//! Kinds are exact. An integer is never a boolean, a float is never an
//! integer, and a choice of `[1, 2, 3]` does not accept `2.0`.
//!
//! # Classification
//!
//! [`classify`] maps a [`DeclaredType`] to a [`Shape`]. Unions, opaque types,
//! bare lists, and empty choices are [`Shape::Unsupported`]. A choice that
//! mixes kinds, a list with more than one type argument, or a list whose
//! element is not a singleton kind is a [`SchemaError`], since those
//! declarations are malformed rather than merely unsupported.
//! [`Schema::check`] runs this over every field up front.
//!
//! # Validation
//!
//! Every constructor ([`Record::new`], [`Record::from_dict`],
//! [`Record::from_positional`], JSON decoding, CLI parsing) fills omitted
//! fields from their defaults and then validates all fields in declaration
//! order, stopping at the first failure. Default factories are called afresh
//! for every record.
//!
//! # Command line
//!
//! [`derive_cli_specs`] turns a schema into one [`ArgSpec`] per field. Every
//! field becomes a long flag: `batch_size` is `--batch-size`. Sequences take
//! zero or more values; `--ratios` alone yields an empty list. Booleans take
//! an explicit `true` or `false` in any case and nothing else. Fields
//! without a default are required.
//!
//! The specs are parser-agnostic. For [clap](https://docs.rs/clap) users, an
//! optional adapter (behind the `clap` Cargo feature, on by default) builds
//! a `clap::Command` from them ([`build_command`], [`augment_command`]) and
//! parses straight into a [`Record`] ([`parse_from`]). To use rootconfig
//! without clap:
//!
//! ```toml
//! rootconfig = { version = "...", default-features = false }
//! ```
//!
//! # JSON and Wire Tags
//!
//! Records encode to a flat JSON object keyed by field name. Integers,
//! floats, text, booleans, and lists use native JSON. The other kinds are
//! wrapped in a Wire Tag:
//!
//! ```json
//! {"__custom_type__": "Fraction", "__value__": "1/3"}
//! ```
//!
//! The tag registry is [`codec::WIRE_TAGS`]. Decoding replaces every object
//! of exactly that form by the decoded value; an unknown tag name fails with
//! [`RootConfigError::UnsupportedTag`]. Keys the schema does not declare are
//! ignored on decode. [`read_record`] and [`write_record`] do the same
//! against files.
//!
//! # Typed structs
//!
//! The [`RootConfig`] trait connects a plain struct to a schema and provides
//! `from_dict`, `from_json_str`, `from_json_file`, `parse_args`, and the
//! matching encoders on top of three small conversions.
//!
//! # Error handling
//!
//! All fallible operations return [`RootConfigError`]. Schema problems found
//! by the classifier carry the field name and a [`SchemaError`]. With the
//! `rich-errors` feature, errors also implement `miette::Diagnostic`.

pub mod codec;
pub mod error;
pub mod types;

mod args;
mod classify;
#[cfg(feature = "clap")]
mod cli;
mod config;
mod file;
mod literal;
mod record;
mod schema;
mod validate;

#[cfg(test)]
mod fixtures;

pub use args::{ArgSpec, CliOptions, derive_cli_specs, flag_name};
pub use classify::classify;
#[cfg(feature = "clap")]
pub use cli::{augment_command, build_command, parse_env, parse_from, record_from_matches};
pub use config::RootConfig;
pub use error::{RootConfigError, SchemaError};
pub use file::{read_record, write_record};
pub use literal::{format_complex, parse_bool, parse_complex, parse_rational};
pub use record::{FromValue, Record, RecordBuilder};
pub use schema::{DefaultFactory, FieldDefault, FieldDescriptor, Schema, SchemaBuilder};
pub use types::{DeclaredType, Kind, Multiplicity, Shape, Value};
pub use validate::validate;
