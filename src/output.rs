// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Run report output
//!
//! This module formats the [RunReport](../fault_demos/struct.RunReport.html) of a run. The lines printed by the
//! demonstrations themselves go to standard output while they run; everything in here is printed afterwards.
//!
//! ## Output modes
//!
//! ### 1. Text
//! If a fatal fault ended the run, a single fault report on standard error, for example
//! ```text
//! fatal fault in step 2 (bounds-check): index out of bounds: the len is 3 but the index is 3
//! ```
//! If observation of the unbounded loop stopped, a note on standard error says so.
//!
//! ### 2. Verbose text
//! As text, followed by a summary on standard error with one line per step:
//! ```text
//! 2 of 5 demonstrations ran in sequential mode
//!  1 null-dereference  recovered (read through a reference that holds no value): Caught NullPointerException: String is null [1 line(s)]
//!  2 bounds-check      fatal: index out of bounds: the len is 3 but the index is 3 [0 line(s)]
//!  3 unbounded-loop    not reached
//!  ...
//! run terminated by fatal fault in step 2 (bounds-check): index out of bounds: the len is 3 but the index is 3
//! ```
//!
//! ### 3. JSON
//! The full report, pretty-printed on standard output. Demonstration lines are suppressed in this mode so that
//! standard output stays valid JSON.
use fault_demos::{RunReport, RunnerState, Step};

/// Format of the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Set of options on how to format the output.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// The silent flag for when no output should be printed.
    pub silent: bool,
    /// The verbose flag for a per-step summary and debug logging.
    pub verbose: bool,
    pub format: OutputFormat,
}

impl OutputOptions {
    /// Whether the lines printed by the demonstrations should reach standard output.
    pub fn echo_demonstrations(&self) -> bool {
        !self.silent && self.format == OutputFormat::Text
    }
}

/// A struct consisting of a vector containing the output streams
pub struct OutputStreamsCollection {
    pub streams: Vec<Box<dyn OutputStream>>,
}

/// Trait marking objects that are able to output a run report in a particular format, to a particular destination
pub trait OutputStream {
    fn print_output(&self, report: &RunReport);
}

/// Reports how the run ended, if it did not simply finish
#[derive(Debug, Clone)]
struct FaultReportOutputStream {}

impl OutputStream for FaultReportOutputStream {
    fn print_output(&self, report: &RunReport) {
        if let Some(line) = fault_report(report) {
            eprintln!("{}", line)
        }
    }
}

/// Struct that handles the verbose per-step summary
#[derive(Debug, Clone)]
struct SummaryOutputStream {}

impl OutputStream for SummaryOutputStream {
    fn print_output(&self, report: &RunReport) {
        for line in summary(report) {
            eprintln!("{}", line)
        }
    }
}

/// Struct that prints the full report as JSON
#[derive(Debug, Clone)]
struct JsonOutputStream {}

impl OutputStream for JsonOutputStream {
    fn print_output(&self, report: &RunReport) {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to serialize run report: {}", e),
        }
    }
}

/// The single line describing how the run ended, if it ended abnormally.
pub fn fault_report(report: &RunReport) -> Option<String> {
    match report.state {
        RunnerState::Terminated { step, kind } => Some(format!(
            "fatal fault in step {} ({}): {}",
            step.number(),
            step,
            kind
        )),
        RunnerState::Stalled(step) => Some(format!(
            "observation stopped in step {} ({}) after {} line(s); the loop never terminates",
            step.number(),
            step,
            report
                .steps
                .last()
                .map(|step_report| step_report.lines_written)
                .unwrap_or(0)
        )),
        _ => None,
    }
}

/// The verbose summary, one entry per line.
pub fn summary(report: &RunReport) -> Vec<String> {
    let selected = report.steps.len() + report.not_reached.len();
    let mut lines = vec![format!(
        "{} of {} demonstrations ran in {} mode",
        report.steps.len(),
        selected,
        report.mode
    )];

    for step_report in &report.steps {
        lines.push(format!(
            "{:2} {:17} {} [{} line(s)]",
            step_report.step.number(),
            step_report.step.name(),
            step_report.outcome,
            step_report.lines_written
        ));
    }
    for step in &report.not_reached {
        lines.push(format!("{:2} {:17} not reached", step.number(), step.name()));
    }

    lines.push(format!("run {}", report.state));
    lines
}

fn get_output_streams(options: &OutputOptions) -> Box<OutputStreamsCollection> {
    let mut output_stream_vec: Vec<Box<dyn OutputStream>> = Vec::new();

    if options.silent {
        return Box::new(OutputStreamsCollection { streams: vec![] });
    }

    match options.format {
        OutputFormat::Json => output_stream_vec.push(Box::new(JsonOutputStream {})),
        OutputFormat::Text => {
            output_stream_vec.push(Box::new(FaultReportOutputStream {}));
            if options.verbose {
                output_stream_vec.push(Box::new(SummaryOutputStream {}));
            }
        }
    }

    Box::new(OutputStreamsCollection {
        streams: output_stream_vec,
    })
}

/// Print the report in the format specified by the options parameter.
pub fn print_results(options: &OutputOptions, report: &RunReport) {
    let output_streams = get_output_streams(options);

    for outputstream in output_streams.streams {
        outputstream.print_output(report)
    }
}

/// Print the demonstrations in execution order, one per line.
pub fn print_steps() {
    for step in Step::all() {
        println!("{:2} {:17} {}", step.number(), step.name(), step.description());
    }
}
