// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This is the command-line interface to the fault_demos crate. Details about the command-line options can be
//! obtained by running `buggy --help`.
//!
//! Without arguments it prints the recovery message of the first demonstration and is then terminated by the
//! uncaught fault of the second one, with exit code 101.
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate error_chain;

mod cmd_args;
mod config_file;
mod output;

#[allow(deprecated)]
pub mod errors {
    error_chain! {
        links {
            Demos(::fault_demos::errors::Error, ::fault_demos::errors::ErrorKind);
        }

        errors {
            ConfigLoad(path: String, reason: Option<String>) {
                description("Config file not found")
                display("Unable to read config file `{}`{}", path, reason.as_ref().map(|x| format!(": {}", x)).unwrap_or_else(|| "".to_string()))
            }
            InvalidOption(option: String, reason: String) {
                description("Invalid command line option")
                display("Invalid value for `{}`: {}", option, reason)
            }
        }
    }
}

use crate::cmd_args::CliAction;
use crate::output::OutputOptions;

use std::io;
use std::process;

use tracing::Level;

/// Exit code for usage and configuration errors.
pub const EXIT_TOOL_ERROR: i32 = 2;

fn init_logging(options: &OutputOptions) {
    if options.silent {
        return;
    }

    let level = if options.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Standard output belongs to the demonstrations
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// CLI entrypoint
pub fn main() {
    // Parse cmd arguments
    let (action, output_options) = match cmd_args::get_args() {
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_TOOL_ERROR);
        }
        Ok(r) => r,
    };

    init_logging(&output_options);

    let run_options = match action {
        CliAction::List => {
            output::print_steps();
            return;
        }
        CliAction::Run(run_options) => run_options,
    };

    // Execute demonstrations
    let result = if output_options.echo_demonstrations() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        fault_demos::run_demonstrations(&run_options, &mut handle)
    } else {
        fault_demos::run_demonstrations(&run_options, &mut io::sink())
    };

    match result {
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_TOOL_ERROR);
        }
        Ok(report) => {
            output::print_results(&output_options, &report);

            // Mirror the way the demonstrated program would have ended
            process::exit(report.exit_code());
        }
    }
}

#[cfg(test)]
mod test {
    extern crate assert_cli;

    /// Without arguments only the recovery message is printed before the bounds fault ends the run
    #[test]
    fn test_default_run_terminates_with_fault() {
        assert_cli::Assert::main_binary()
            .stdout().is("Caught NullPointerException: String is null")
            .stderr().contains("fatal fault in step 2 (bounds-check): index out of bounds: the len is 3 but the index is 3")
            .fails_with(101)
            .unwrap();
    }

    /// The fault is reported once, by the fault report and not by the log
    #[test]
    fn test_default_run_reports_fault_once() {
        assert_cli::Assert::main_binary()
            .stderr().is("fatal fault in step 2 (bounds-check): index out of bounds: the len is 3 but the index is 3")
            .stderr().doesnt_contain("uncaught fault terminates the run")
            .fails_with(101)
            .unwrap();
    }

    /// Arguments that are not options are ignored, so the run is the same as without arguments
    #[test]
    fn test_stray_arguments_are_ignored() {
        assert_cli::Assert::main_binary()
            .with_args(&["extra", "arguments"])
            .stdout().is("Caught NullPointerException: String is null")
            .fails_with(101)
            .unwrap();
    }

    /// Test that skipping the bounds check lands the run in the loop, and never past it
    #[test]
    fn test_run_without_bounds_check_stalls() {
        assert_cli::Assert::main_binary()
            .with_args(&["--skip", "bounds-check", "--max-iterations", "3"])
            .stdout().contains("Infinite Loop!\nInfinite Loop!\nInfinite Loop!")
            .stdout().doesnt_contain("This code is unreachable!")
            .stderr().contains("observation stopped in step 3 (unbounded-loop) after 3 line(s)")
            .fails_with(1)
            .unwrap();
    }

    #[test]
    fn test_isolated_run_reports_contained_faults() {
        assert_cli::Assert::main_binary()
            .with_args(&["--mode", "isolated", "--verbose"])
            .stdout().contains("Caught NullPointerException: String is null")
            .stderr().contains("5 of 5 demonstrations ran in isolated mode")
            .stderr().contains("run finished")
            .fails_with(1)
            .unwrap();
    }

    #[test]
    fn test_clean_run_succeeds() {
        assert_cli::Assert::main_binary()
            .with_args(&["--skip", "bounds-check", "unbounded-loop", "substring-range"])
            .stdout().doesnt_contain("This code is unreachable!")
            .succeeds()
            .unwrap();
    }

    #[test]
    fn test_json_report() {
        assert_cli::Assert::main_binary()
            .with_args(&["--format", "json"])
            .stdout().contains("\"state\": \"terminated\"")
            .stdout().doesnt_contain("String is null\n")
            .fails_with(101)
            .unwrap();
    }

    #[test]
    fn test_list_steps() {
        assert_cli::Assert::main_binary()
            .with_args(&["--list"])
            .stdout().contains(" 3 unbounded-loop")
            .succeeds()
            .unwrap();
    }

    /// Test that an explicitly requested config file must exist
    #[test]
    fn test_missing_config_file() {
        assert_cli::Assert::main_binary()
            .with_args(&["--config", "does-not-exist.toml"])
            .stderr().contains("Unable to read config file `does-not-exist.toml`: File does not exist")
            .fails_with(2)
            .unwrap();
    }

    #[test]
    fn test_silent_run_prints_nothing() {
        assert_cli::Assert::main_binary()
            .with_args(&["--silent"])
            .stdout().is("")
            .fails_with(101)
            .unwrap();
    }
}
