//! # rootconfig demo application
//!
//! A pretend training launcher that shows how a typed config struct gets a
//! command line and a JSON file format from one schema. It does not train
//! anything.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example train_demo -- --batch-size 64 --lpf-pole 0.5-2j \
//!     --learning-rates 1e-2 1e-3 --optimizer AdamW --save run.json
//! cargo run --example train_demo -- --load run.json
//! RUST_LOG=rootconfig=debug cargo run --example train_demo -- --help
//! ```
//!
//! `--load` reads a previously saved file instead of the config flags.

mod config;

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use rootconfig::{RootConfig, RootConfigError};

use config::TrainConfig;

fn command() -> Result<Command, RootConfigError> {
    let command = Command::new("train-demo")
        .about("Launch a pretend training run.")
        .arg(
            Arg::new("save")
                .long("save")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the resolved config to FILE as JSON"),
        )
        .arg(
            Arg::new("load")
                .long("load")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .exclusive(true)
                .help("Read the config from FILE instead of the flags"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the config as JSON"),
        );
    TrainConfig::augment_command(command)
}

fn run(matches: &ArgMatches) -> Result<(), RootConfigError> {
    let config = match matches.get_one::<PathBuf>("load") {
        Some(path) => TrainConfig::from_json_file(path)?,
        None => TrainConfig::from_matches(matches)?,
    };

    if matches.get_flag("json") {
        println!("{}", config.to_json_string()?);
    } else {
        println!("{}", config.to_record()?);
    }

    if let Some(path) = matches.get_one::<PathBuf>("save") {
        config.to_json_file(path)?;
        println!("saved to {}", path.display());
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = command().unwrap_or_else(|e| {
        eprintln!("Invalid config schema:\n{e}");
        std::process::exit(2);
    });
    let matches = command.get_matches();

    run(&matches).unwrap_or_else(|e| {
        eprintln!("Config error:\n{e}");
        std::process::exit(1);
    });
}
