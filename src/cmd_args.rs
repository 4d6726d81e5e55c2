// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::config_file::{parse_config, ConfigFileOptions, DEFAULT_CONFIG_PATH};
use crate::errors::*;
use crate::output::{OutputFormat, OutputOptions};
use crate::EXIT_TOOL_ERROR;

use fault_demos::{RunMode, RunOptions, Step};

use clap::App;
use clap::Arg;
use clap::ArgMatches;
use clap::ErrorKind as ClapErrorKind;

use std::ffi::OsString;

static RUN_MODES: [&str; 2] = ["sequential", "isolated"];
static OUTPUT_FORMATS: [&str; 2] = ["text", "json"];
static STEP_NAMES: [&str; 5] = [
    "null-dereference",
    "bounds-check",
    "unbounded-loop",
    "substring-range",
    "dead-branch",
];

/// What the command line asks for.
#[derive(Debug, Clone)]
pub enum CliAction {
    /// Print the demonstrations and exit.
    List,
    Run(RunOptions),
}

fn parse_multiple_args(cmd_matches: &ArgMatches, name: &str) -> Vec<String> {
    match cmd_matches.values_of(name) {
        Some(x) => x.into_iter().map(|x| x.to_string()).collect(),
        None => Vec::new(),
    }
}

pub fn get_args() -> Result<(CliAction, OutputOptions)> {
    get_args_from(::std::env::args_os())
}

pub fn get_args_from<I, T>(args: I) -> Result<(CliAction, OutputOptions)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd_matches = match get_app_definition().get_matches_from_safe(args) {
        Ok(matches) => matches,
        Err(error) => {
            eprintln!("{}", error.message);
            match error.kind {
                ClapErrorKind::HelpDisplayed => ::std::process::exit(0),
                ClapErrorKind::VersionDisplayed => ::std::process::exit(0),
                _ => ::std::process::exit(EXIT_TOOL_ERROR),
            }
        }
    };

    let output_options = OutputOptions {
        verbose: cmd_matches.is_present("verbose"),
        silent: cmd_matches.is_present("silent"),
        format: match cmd_matches.value_of("format") {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        },
    };

    if cmd_matches.is_present("list") {
        return Ok((CliAction::List, output_options));
    }

    let config_opt = cmd_matches.value_of("config");
    let required = config_opt.is_some();

    let file_options = parse_config(config_opt.unwrap_or(DEFAULT_CONFIG_PATH), required)?;

    let run_options = merge_options(&cmd_matches, file_options)?;

    Ok((CliAction::Run(run_options), output_options))
}

/// Combine command line arguments with the configuration file. Arguments take precedence; skipped steps add up.
fn merge_options(cmd_matches: &ArgMatches, file_options: ConfigFileOptions) -> Result<RunOptions> {
    let mode = match cmd_matches.value_of("mode") {
        Some(mode) => mode.parse::<RunMode>()?,
        None => file_options.mode.unwrap_or_default(),
    };

    let max_loop_iterations = match cmd_matches.value_of("max_iterations") {
        Some(value) => Some(value.parse::<u64>().map_err(|err| {
            ErrorKind::InvalidOption("--max-iterations".to_string(), err.to_string())
        })?),
        None => file_options.max_loop_iterations,
    };

    let mut skipped_steps = file_options.skip;
    for name in parse_multiple_args(cmd_matches, "skip") {
        let step = name.parse::<Step>()?;
        if !skipped_steps.contains(&step) {
            skipped_steps.push(step);
        }
    }

    Ok(RunOptions {
        mode,
        max_loop_iterations,
        skipped_steps,
        cancellation: None,
    })
}

fn get_app_definition<'a, 'b>() -> App<'a, 'b> {
    App::new("buggy")
        .about("Runs five runtime fault demonstrations in a fixed order and reports how each one ends")
        .arg(
            Arg::with_name("mode")
                .short("m")
                .long("mode")
                .value_name("MODE")
                .help("`sequential` stops at the first uncaught fault (default). `isolated` runs every step regardless of the others")
                .takes_value(true)
                .possible_values(&RUN_MODES),
        )
        .arg(
            Arg::with_name("max_iterations")
                .short("n")
                .long("max-iterations")
                .value_name("N")
                .help("Stop watching the unbounded loop after N iterations. Without this, a sequential run that reaches the loop never ends")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("skip")
                .multiple(true)
                .long("skip")
                .value_name("STEP")
                .help("Demonstrations that should not run")
                .takes_value(true)
                .possible_values(&STEP_NAMES),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (default: buggy.toml)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("`json` prints the full run report on standard output instead of the demonstration lines")
                .takes_value(true)
                .possible_values(&OUTPUT_FORMATS),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .conflicts_with("silent")
                .help("Print a per-step summary and debug logging on standard error"),
        )
        .arg(
            Arg::with_name("silent")
                .short("s")
                .long("silent")
                .conflicts_with("verbose")
                .help("Turn on silent mode to not print anything"),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .help("List the demonstrations in execution order and exit"),
        )
        // Any other argument is accepted and never read
        .arg(
            Arg::with_name("ignored")
                .multiple(true)
                .hidden(true),
        )
}
