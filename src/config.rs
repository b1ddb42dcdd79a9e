//! Typed configuration structs.
//!
//! [`RootConfig`] connects a plain Rust struct to a [`Schema`]. Implement the
//! three required methods and every entry point (dictionary, JSON text, JSON
//! file, positional values, command line) comes for free. Each one builds a
//! validated [`Record`] first and converts it with
//! [`from_record`](RootConfig::from_record), so an invalid struct is never
//! produced.
//!
//! ```
//! use std::sync::{Arc, LazyLock};
//! use rootconfig::{FieldDescriptor, Kind, Record, RootConfig, RootConfigError, Schema};
//!
//! struct Job {
//!     workers: i64,
//!     name: String,
//! }
//!
//! static JOB: LazyLock<Arc<Schema>> = LazyLock::new(|| {
//!     Arc::new(
//!         Schema::builder("Job")
//!             .field(FieldDescriptor::new("workers", Kind::Integer).default_value(4i64))
//!             .field(FieldDescriptor::new("name", Kind::Text))
//!             .build(),
//!     )
//! });
//!
//! impl RootConfig for Job {
//!     fn schema() -> Arc<Schema> {
//!         Arc::clone(&JOB)
//!     }
//!
//!     fn from_record(record: &Record) -> Result<Self, RootConfigError> {
//!         Ok(Self {
//!             workers: record.extract("workers")?,
//!             name: record.extract("name")?,
//!         })
//!     }
//!
//!     fn to_record(&self) -> Result<Record, RootConfigError> {
//!         Record::builder(Self::schema())
//!             .set("workers", self.workers)
//!             .set("name", self.name.as_str())
//!             .build()
//!     }
//! }
//!
//! let job = Job::from_json_str(r#"{"name": "nightly"}"#).unwrap();
//! assert_eq!(job.workers, 4);
//! assert_eq!(job.to_json_string().unwrap(), r#"{"workers":4,"name":"nightly"}"#);
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value as Json};

use crate::args::{ArgSpec, CliOptions, derive_cli_specs};
use crate::codec;
use crate::error::RootConfigError;
use crate::file;
use crate::record::Record;
use crate::schema::Schema;
use crate::types::Value;

pub trait RootConfig: Sized {
    /// The schema every instance is validated against.
    fn schema() -> Arc<Schema>;

    /// Convert a validated record into the typed struct.
    fn from_record(record: &Record) -> Result<Self, RootConfigError>;

    /// Convert the struct back into a validated record.
    fn to_record(&self) -> Result<Record, RootConfigError>;

    /// Build from named values, ignoring names the schema does not declare.
    fn from_dict<K, I>(values: I) -> Result<Self, RootConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::from_record(&Record::from_dict(Self::schema(), values)?)
    }

    /// Build from values in declaration order. Only positional fields
    /// participate.
    fn from_positional(values: Vec<Value>) -> Result<Self, RootConfigError> {
        Self::from_record(&Record::from_positional(Self::schema(), values)?)
    }

    /// Decode a JSON object, resolving Wire Tags.
    fn from_json_map(map: &Map<String, Json>) -> Result<Self, RootConfigError> {
        Self::from_record(&codec::decode(map, Self::schema())?)
    }

    fn from_json_str(text: &str) -> Result<Self, RootConfigError> {
        Self::from_record(&codec::from_text(text, Self::schema())?)
    }

    fn from_json_file(path: &Path) -> Result<Self, RootConfigError> {
        Self::from_record(&file::read_record(path, Self::schema())?)
    }

    /// Encode as a JSON object with Wire Tags.
    fn to_map(&self) -> Result<Map<String, Json>, RootConfigError> {
        codec::encode(&self.to_record()?)
    }

    fn to_json_string(&self) -> Result<String, RootConfigError> {
        codec::to_text(&self.to_record()?)
    }

    fn to_json_file(&self, path: &Path) -> Result<(), RootConfigError> {
        file::write_record(path, &self.to_record()?)
    }

    /// Argument specifications for every field, in declaration order.
    fn cli_specs(options: &CliOptions) -> Result<Vec<(String, ArgSpec)>, RootConfigError> {
        derive_cli_specs(&Self::schema(), options)
    }

    #[cfg(feature = "clap")]
    fn command() -> Result<clap::Command, RootConfigError> {
        crate::cli::build_command(&Self::schema(), &CliOptions::default())
    }

    /// Add this config's flags to an existing clap command.
    #[cfg(feature = "clap")]
    fn augment_command(command: clap::Command) -> Result<clap::Command, RootConfigError> {
        crate::cli::augment_command(command, &Self::schema(), &CliOptions::default())
    }

    /// Build from matches of a command returned by
    /// [`augment_command`](RootConfig::augment_command).
    #[cfg(feature = "clap")]
    fn from_matches(matches: &clap::ArgMatches) -> Result<Self, RootConfigError> {
        let record =
            crate::cli::record_from_matches(Self::schema(), matches, &CliOptions::default())?;
        Self::from_record(&record)
    }

    /// Parse arguments (without the program name).
    #[cfg(feature = "clap")]
    fn parse_args<I, T>(args: I, options: &CliOptions) -> Result<Self, RootConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString>,
    {
        Self::from_record(&crate::cli::parse_from(Self::schema(), args, options)?)
    }

    /// Parse the process arguments, letting clap print usage and exit on
    /// malformed input.
    #[cfg(feature = "clap")]
    fn parse_env_args() -> Result<Self, RootConfigError> {
        Self::from_record(&crate::cli::parse_env(Self::schema(), &CliOptions::default())?)
    }
}
