//! The gsunit command-line interface.
//!
//! Parses arguments, installs the tracing subscriber, and dispatches to the
//! subcommand handlers. Handlers return whether the run was green; any error
//! is rendered and turned into a non-zero exit.

use std::error::Error;
use std::path::Path;
use std::{fs, process};

use clap::Parser;
use serde::Deserialize;
use termcolor::ColorChoice;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, GsUnitArgs};
use crate::dynamic;
use crate::equality::deep_equals;
use crate::error::{print_error, GsError};
use crate::report::{NullSink, StdoutSink};
use crate::suite::GsUnit;
use crate::value::Value;

pub mod args;
pub mod output;
pub mod selftest;

type CliResult = Result<bool, Box<dyn Error>>;

/// The main entry point for the CLI.
pub fn run() {
    let args = GsUnitArgs::parse();
    init_tracing();
    let color = output::color_choice(args.color);

    let result = match args.command {
        Command::Selftest { json } => handle_selftest(color, json),
        Command::Compare { expected, actual } => handle_compare(color, &expected, &actual),
        Command::Check { script, json } => handle_check(color, &script, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            match e.downcast::<GsError>() {
                Ok(error) => print_error(*error),
                Err(e) => eprintln!("Error: {}", e),
            }
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber filtered by `GSUNIT_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GSUNIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn instance(color: ColorChoice, json: bool) -> GsUnit {
    if json {
        GsUnit::with_output(NullSink)
    } else {
        GsUnit::with_output(StdoutSink::new(color))
    }
}

fn finish(gs: &GsUnit, color: ColorChoice, json: bool) -> CliResult {
    let summary = gs.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(color, &summary);
    }
    Ok(!summary.has_failures())
}

/// Handles the `selftest` subcommand.
fn handle_selftest(color: ColorChoice, json: bool) -> CliResult {
    let gs = instance(color, json);
    selftest::run(&gs)?;
    finish(&gs, color, json)
}

/// Handles the `compare` subcommand.
fn handle_compare(color: ColorChoice, expected: &Path, actual: &Path) -> CliResult {
    let expected_json = read_json(expected)?;
    let actual_json = read_json(actual)?;
    let verdict = deep_equals(&Value::from(expected_json.clone()), &Value::from(actual_json.clone()));
    debug!(equal = verdict.equal, path = ?verdict.path, "compared documents");
    output::print_verdict(
        color,
        &verdict,
        &serde_json::to_string_pretty(&expected_json)?,
        &serde_json::to_string_pretty(&actual_json)?,
    );
    Ok(verdict.equal)
}

/// A JSON script: either a bare list of cases or a named suite.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Script {
    Suite {
        describe: String,
        cases: Vec<Case>,
    },
    Cases(Vec<Case>),
}

#[derive(Debug, Deserialize)]
struct Case {
    it: String,
    #[serde(rename = "assert")]
    assertion: String,
    #[serde(default)]
    args: Vec<serde_json::Value>,
}

/// Handles the `check` subcommand.
fn handle_check(color: ColorChoice, path: &Path, json: bool) -> CliResult {
    let source = fs::read_to_string(path)?;
    let (description, cases) = match serde_json::from_str::<Script>(&source)? {
        Script::Suite { describe, cases } => (describe, cases),
        Script::Cases(cases) => (path.display().to_string(), cases),
    };
    info!(cases = cases.len(), script = %path.display(), "running script");

    let gs = instance(color, json);
    gs.describe(&description, || {
        for case in &cases {
            let args: Vec<Value> = case.args.iter().cloned().map(Value::from).collect();
            gs.it(&case.it, || dynamic::call(&case.assertion, &args))?;
        }
        Ok(())
    })?;
    finish(&gs, color, json)
}

fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn Error>> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&source)?)
}
