// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Fault demonstrations
//!
//! This crate runs five small demonstrations of common runtime faults, in a fixed order:
//!
//! 1. `null-dereference`: reading the length of a text value that holds no value. Recovered.
//! 2. `bounds-check`: reading index 3 of `[1, 2, 3]`. Fatal.
//! 3. `unbounded-loop`: a loop whose counter is never advanced. Never terminates.
//! 4. `substring-range`: slicing `"Buggy"` from offset 10. Fatal.
//! 5. `dead-branch`: a print guarded by `1 == 2`. Never runs.
//!
//! Every demonstration returns a tagged [Outcome](enum.Outcome.html) instead of raising, so the runner
//! decides what a fatal fault means. In [RunMode::Sequential](enum.RunMode.html) a fatal fault ends the run,
//! exactly like an uncaught fault ends a process. In [RunMode::Isolated](enum.RunMode.html) every step runs.
//!
//! The entry point is [run_demonstrations](fn.run_demonstrations.html).
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate serde_derive;

mod demos;
mod report;

pub use crate::demos::dead_branch::UNREACHABLE_LINE;
pub use crate::demos::null_dereference::RECOVERY_MESSAGE;
pub use crate::demos::unbounded_loop::LOOP_LINE;
pub use crate::demos::{DemoContext, Demonstration};
pub use crate::report::{RunReport, RunnerState, StepReport};
pub use crate::report::{EXIT_CLEAN, EXIT_FATAL_FAULT, EXIT_FAULTS_OBSERVED};

use crate::errors::*;

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{debug, info};

/// Iteration cap of the unbounded loop in isolated mode, when none is configured.
pub const DEFAULT_ISOLATED_LOOP_CAP: u64 = 3;

/// The demonstrations, in the order they are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    NullDereference,
    BoundsCheck,
    UnboundedLoop,
    SubstringRange,
    DeadBranch,
}

static ALL_STEPS: [Step; 5] = [
    Step::NullDereference,
    Step::BoundsCheck,
    Step::UnboundedLoop,
    Step::SubstringRange,
    Step::DeadBranch,
];

impl Step {
    /// All steps, in execution order.
    pub fn all() -> &'static [Step] {
        &ALL_STEPS
    }

    /// 1-based position of the step in the run.
    pub fn number(self) -> usize {
        match self {
            Step::NullDereference => 1,
            Step::BoundsCheck => 2,
            Step::UnboundedLoop => 3,
            Step::SubstringRange => 4,
            Step::DeadBranch => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::NullDereference => "null-dereference",
            Step::BoundsCheck => "bounds-check",
            Step::UnboundedLoop => "unbounded-loop",
            Step::SubstringRange => "substring-range",
            Step::DeadBranch => "dead-branch",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::NullDereference => "Read the length of a text value that holds no value",
            Step::BoundsCheck => "Read index 3 of the 3-element sequence [1, 2, 3]",
            Step::UnboundedLoop => "Loop while a counter that is never advanced stays non-negative",
            Step::SubstringRange => "Take the substring of \"Buggy\" starting at offset 10",
            Step::DeadBranch => "Print only if 1 == 2",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Step> {
        Step::all()
            .iter()
            .find(|step| step.name() == s)
            .cloned()
            .ok_or_else(|| ErrorKind::UnknownStep(s.to_string()).into())
    }
}

/// The kinds of fault the demonstrations trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FaultKind {
    /// A value was read through a reference that holds nothing.
    NullReference,
    /// A sequence was read outside of its bounds.
    IndexOutOfRange { index: usize, len: usize },
    /// Text was extracted starting past its end.
    StringIndexOutOfRange { begin: usize, len: usize },
}

impl Display for FaultKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            FaultKind::NullReference => write!(f, "read through a reference that holds no value"),
            FaultKind::IndexOutOfRange { index, len } => write!(
                f,
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
            FaultKind::StringIndexOutOfRange { begin, len } => write!(
                f,
                "byte index {} is out of range of a string of length {}",
                begin, len
            ),
        }
    }
}

/// Tagged result of running a single demonstration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// The step ran to its end without faulting.
    Completed,
    /// The fault was intercepted where it happened and `message` was printed instead.
    Recovered { kind: FaultKind, message: String },
    /// The fault was not intercepted.
    Fatal { kind: FaultKind },
    /// The observation window closed while the loop guard still held.
    NeverTerminates { iterations: u64, counter: i32 },
    /// The guarded block was skipped because its guard can never hold.
    Unreachable,
}

impl Outcome {
    pub fn is_fatal(&self) -> bool {
        match self {
            Outcome::Fatal { .. } => true,
            _ => false,
        }
    }

    /// The fault this outcome carries, recovered or not.
    pub fn fault(&self) -> Option<FaultKind> {
        match *self {
            Outcome::Recovered { kind, .. } | Outcome::Fatal { kind } => Some(kind),
            _ => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Recovered { kind, message } => write!(f, "recovered ({}): {}", kind, message),
            Outcome::Fatal { kind } => write!(f, "fatal: {}", kind),
            Outcome::NeverTerminates {
                iterations,
                counter,
            } => write!(
                f,
                "never terminates: guard still held after {} iteration(s), counter = {}",
                iterations, counter
            ),
            Outcome::Unreachable => write!(f, "unreachable: guarded block never ran"),
        }
    }
}

/// How the runner reacts to a fatal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// A fatal fault ends the run. Steps after it are not reached.
    Sequential,
    /// Every selected step runs, whatever its neighbours did.
    Isolated,
}

impl Default for RunMode {
    fn default() -> RunMode {
        RunMode::Sequential
    }
}

impl Display for RunMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RunMode::Sequential => write!(f, "sequential"),
            RunMode::Isolated => write!(f, "isolated"),
        }
    }
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<RunMode> {
        match s {
            "sequential" => Ok(RunMode::Sequential),
            "isolated" => Ok(RunMode::Isolated),
            _ => Err(ErrorKind::UnknownMode(s.to_string()).into()),
        }
    }
}

/// Shared flag that stops the unbounded loop at its next iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Struct containing all the options that can be passed to [run_demonstrations](fn.run_demonstrations.html).
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Number of loop iterations to observe before giving up on the unbounded loop.
    ///
    /// `None` means the loop is watched until cancelled, which in sequential mode without a
    /// cancellation token is forever.
    pub max_loop_iterations: Option<u64>,
    /// Steps that are neither run nor reported as not reached.
    pub skipped_steps: Vec<Step>,
    pub cancellation: Option<CancellationToken>,
}

impl RunOptions {
    /// Iteration cap that applies to this run. Isolated runs are always capped.
    pub fn loop_cap(&self) -> Option<u64> {
        match self.mode {
            RunMode::Sequential => self.max_loop_iterations,
            RunMode::Isolated => Some(
                self.max_loop_iterations
                    .unwrap_or(DEFAULT_ISOLATED_LOOP_CAP),
            ),
        }
    }

    /// The steps that will run, in execution order.
    pub fn selected_steps(&self) -> Vec<Step> {
        Step::all()
            .iter()
            .filter(|step| !self.skipped_steps.contains(step))
            .cloned()
            .collect()
    }
}

/// Main entry point of the `fault_demos` crate.
///
/// Runs the selected demonstrations in order, writing their lines to `sink`, and returns a
/// [RunReport](struct.RunReport.html) describing what every step did and where the run ended.
///
/// # Errors
/// * If a line could not be written to `sink`.
///
/// Demonstrated faults are never errors; they are reported as [Outcome](enum.Outcome.html)s.
pub fn run_demonstrations(options: &RunOptions, sink: &mut dyn Write) -> Result<RunReport> {
    let demonstrations = demos::get_demonstrations(options);
    let mut context = DemoContext::new(sink, options.loop_cap(), options.cancellation.clone());
    let mut report = RunReport::new(options.mode);

    let mut remaining = demonstrations.iter();
    while let Some(demonstration) = remaining.next() {
        let step = demonstration.step();
        report.state = RunnerState::Running(step);

        let step_report = run_single(demonstration.as_ref(), &mut context)?;

        let halt = match (options.mode, &step_report.outcome) {
            (RunMode::Sequential, Outcome::Fatal { kind }) => {
                info!(step = step.name(), fault = %kind, "uncaught fault terminates the run");
                Some(RunnerState::Terminated { step, kind: *kind })
            }
            (RunMode::Sequential, Outcome::NeverTerminates { .. }) => {
                Some(RunnerState::Stalled(step))
            }
            (RunMode::Isolated, Outcome::Fatal { kind }) => {
                info!(step = step.name(), fault = %kind, "fatal fault contained");
                None
            }
            _ => None,
        };

        report.steps.push(step_report);

        if let Some(state) = halt {
            report.state = state;
            report.not_reached = remaining.map(|d| d.step()).collect();
            return Ok(report);
        }
    }

    report.state = RunnerState::Finished;
    Ok(report)
}

/// Runs a single demonstration on its own, regardless of `options.skipped_steps`.
pub fn run_step(step: Step, options: &RunOptions, sink: &mut dyn Write) -> Result<StepReport> {
    let demonstration = demos::get_demonstration(step, options);
    let mut context = DemoContext::new(sink, options.loop_cap(), options.cancellation.clone());
    run_single(demonstration.as_ref(), &mut context)
}

fn run_single(demonstration: &dyn Demonstration, context: &mut DemoContext) -> Result<StepReport> {
    let step = demonstration.step();
    debug!(step = step.name(), number = step.number() as u64, "starting demonstration");

    context.reset_line_count();
    let outcome = demonstration
        .run(context)
        .chain_err(|| ErrorKind::Demonstration(step.name().to_string()))?;

    if let Outcome::Recovered { ref kind, .. } = outcome {
        info!(step = step.name(), fault = %kind, "fault recovered");
    }
    debug!(step = step.name(), outcome = %outcome, "finished demonstration");

    Ok(StepReport {
        step,
        outcome,
        lines_written: context.lines_written(),
    })
}

#[allow(deprecated)]
pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
        }

        errors {
            UnknownStep(name: String) {
                description("Unknown demonstration step")
                display("Unknown demonstration step `{}`, expected one of: null-dereference, bounds-check, unbounded-loop, substring-range, dead-branch", name)
            }
            UnknownMode(name: String) {
                description("Unknown run mode")
                display("Unknown run mode `{}`, expected `sequential` or `isolated`", name)
            }
            Demonstration(step: String) {
                description("Demonstration could not write its output")
                display("Demonstration `{}` could not write its output", step)
            }
        }
    }
}
