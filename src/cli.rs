//! Clap adapter for rootconfig.
//!
//! This module is the **optional integration layer** between the
//! framework-agnostic [`ArgSpec`]s and the [clap](https://docs.rs/clap)
//! parser. It is compiled only when the `clap` Cargo feature is enabled (on
//! by default).
//!
//! Clap does all the token work: matching `--flag value`, rejecting unknown
//! flags and stray positionals, enforcing required arguments, and running
//! each argument's coercion. A coercion failure, including a bad boolean
//! literal or a value outside the declared choices, is a clap error. Exiting
//! the process on such errors is left to clap via [`clap::Error::exit`].
//!
//! Clap only understands `-` as an option prefix. When a schema is derived
//! with another marker (say `+`, giving `++batch+size`), tokens that name a
//! derived flag (`++batch+size` or `++batch+size=3`) are rewritten to their
//! `--batch-size` form before clap sees them. Any other token is passed
//! through untouched, so a value such as `++x` stays a value. A token that
//! starts with `--` is not a flag under such a marker and is rejected as an
//! unknown argument; values that begin with `--` cannot be given this way.
//!
//! Flags share a namespace with the arguments clap generates itself and
//! with any the caller already put on the command. A field whose flag would
//! clash (a field named `help`, for instance) is a
//! [`Configuration`](RootConfigError::Configuration) error.

use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::args::{ArgSpec, CliOptions, derive_cli_specs};
use crate::error::RootConfigError;
use crate::record::Record;
use crate::schema::Schema;
use crate::types::{Multiplicity, Value, join_repr};

/// Build a standalone command named after the schema, with the schema doc as
/// its about text.
pub fn build_command(schema: &Schema, options: &CliOptions) -> Result<Command, RootConfigError> {
    let mut command = Command::new(schema.name().to_string());
    if let Some(doc) = schema.doc() {
        command = command.about(doc.to_string());
    }
    augment_command(command, schema, options)
}

/// Add one argument per field to an existing command.
pub fn augment_command(
    command: Command,
    schema: &Schema,
    options: &CliOptions,
) -> Result<Command, RootConfigError> {
    let specs = derive_cli_specs(schema, options)?;
    check_collisions(&command, &specs)?;
    let command = command.args_override_self(true);
    Ok(specs
        .into_iter()
        .fold(command, |command, (_, spec)| command.arg(to_arg(spec))))
}

fn long_name(field: &str) -> String {
    field.replace('_', "-")
}

/// Ids and long names already taken on `command`, including the ones clap
/// adds on its own.
fn taken_names(command: &Command) -> Vec<String> {
    let mut taken = Vec::new();
    if !command.is_disable_help_flag_set() {
        taken.push("help".to_string());
    }
    if !command.is_disable_version_flag_set()
        && (command.get_version().is_some() || command.get_long_version().is_some())
    {
        taken.push("version".to_string());
    }
    for arg in command.get_arguments() {
        taken.push(arg.get_id().as_str().to_string());
        if let Some(long) = arg.get_long() {
            taken.push(long.to_string());
        }
    }
    taken
}

fn check_collisions(
    command: &Command,
    specs: &[(String, ArgSpec)],
) -> Result<(), RootConfigError> {
    let mut taken = taken_names(command);
    for (flag, spec) in specs {
        let long = long_name(&spec.field);
        if let Some(name) = [&spec.field, &long].into_iter().find(|n| taken.contains(*n)) {
            return Err(RootConfigError::Configuration(format!(
                "field '{}' cannot be exposed as {flag}: '{name}' is already in use",
                spec.field
            )));
        }
        taken.push(spec.field.clone());
        taken.push(long);
    }
    Ok(())
}

fn to_arg(spec: ArgSpec) -> Arg {
    let long = long_name(&spec.field);
    let mut arg = Arg::new(spec.field.clone())
        .long(long)
        .value_name(spec.coercion.metavar())
        .required(spec.required)
        .help(help_text(&spec))
        .action(ArgAction::Set);

    arg = match spec.multiplicity {
        Multiplicity::Single => arg.num_args(1),
        Multiplicity::ZeroOrMore => arg.num_args(0..),
    };
    if spec.coercion.is_numeric() {
        arg = arg.allow_negative_numbers(true);
    }

    arg.value_parser(move |text: &str| spec.accept(text))
}

fn help_text(spec: &ArgSpec) -> String {
    let mut parts = Vec::new();
    if let Some(help) = &spec.help {
        parts.push(help.clone());
    }
    if let Some(choices) = &spec.choices {
        parts.push(format!("[choices: {}]", join_repr(choices)));
    }
    if let Some(default) = &spec.default {
        parts.push(format!("[default: {}]", default.repr()));
    }
    parts.join(" ")
}

/// Read a validated record out of matches produced by a command built with
/// [`build_command`] or [`augment_command`].
///
/// Absent flags take their field's default; a sequence flag given with no
/// values yields an empty list.
pub fn record_from_matches(
    schema: Arc<Schema>,
    matches: &ArgMatches,
    options: &CliOptions,
) -> Result<Record, RootConfigError> {
    let specs = derive_cli_specs(&schema, options)?;
    let mut provided = HashMap::new();
    for (_, spec) in specs {
        let id = spec.field.as_str();
        let supplied = matches.contains_id(id);
        let value = match spec.multiplicity {
            Multiplicity::ZeroOrMore if supplied => Some(Value::List(
                matches
                    .get_many::<Value>(id)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            )),
            Multiplicity::Single if supplied => matches.get_one::<Value>(id).cloned(),
            _ => spec.default,
        };
        if let Some(value) = value {
            provided.insert(spec.field, value);
        }
    }
    Record::construct(schema, provided)
}

/// Parse `args` (without the program name) into a validated record.
pub fn parse_from<I, T>(
    schema: Arc<Schema>,
    args: I,
    options: &CliOptions,
) -> Result<Record, RootConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let marker = options.marker()?;
    let mut command = build_command(&schema, options)?.no_binary_name(true);
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let args = if marker == '-' {
        args
    } else {
        let flags = flag_table(&schema, options)?;
        args.into_iter()
            .map(|arg| rewrite_token(arg, &flags))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|token| {
                command.error(
                    ErrorKind::UnknownArgument,
                    format!("unexpected argument '{token}' found"),
                )
            })?
    };
    debug!(schema = schema.name(), args = args.len(), "parsing command line");
    let matches = command.try_get_matches_from(args)?;
    record_from_matches(schema, &matches, options)
}

/// Parse the process arguments. Clap errors (including `--help`) print and
/// exit; validation errors are returned.
pub fn parse_env(schema: Arc<Schema>, options: &CliOptions) -> Result<Record, RootConfigError> {
    match parse_from(schema, std::env::args_os().skip(1), options) {
        Err(RootConfigError::Cli(err)) => err.exit(),
        other => other,
    }
}

/// Derived flag (`++batch+size`) to the long form clap parses (`--batch-size`).
fn flag_table(
    schema: &Schema,
    options: &CliOptions,
) -> Result<HashMap<String, String>, RootConfigError> {
    Ok(derive_cli_specs(schema, options)?
        .into_iter()
        .map(|(flag, spec)| (flag, format!("--{}", long_name(&spec.field))))
        .collect())
}

/// Rewrite a token naming a derived flag. Returns the token text as the
/// error when it would otherwise reach clap as a `--` option.
fn rewrite_token(token: OsString, flags: &HashMap<String, String>) -> Result<OsString, String> {
    let Some(text) = token.to_str() else {
        return Ok(token);
    };
    let (name, value) = match text.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (text, None),
    };
    if let Some(long) = flags.get(name) {
        return Ok(match value {
            Some(value) => OsString::from(format!("{long}={value}")),
            None => OsString::from(long),
        });
    }
    if text.starts_with("--") {
        return Err(text.to_string());
    }
    Ok(token)
}
