// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::FaultKind;
use crate::Outcome;
use crate::RunMode;
use crate::Step;

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// Every reached step completed without a fatal fault.
pub const EXIT_CLEAN: i32 = 0;
/// Fatal faults were contained, or the run stalled in the unbounded loop.
pub const EXIT_FAULTS_OBSERVED: i32 = 1;
/// The run was terminated by an uncaught fault. Same code as a Rust panic.
pub const EXIT_FATAL_FAULT: i32 = 101;

/// Where the runner is, or where it ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "kebab-case")]
pub enum RunnerState {
    NotStarted,
    Running(Step),
    /// Terminated by an uncaught fault in `step`.
    Terminated { step: Step, kind: FaultKind },
    /// Observation stopped while `step` was still running.
    Stalled(Step),
    Finished,
}

impl Display for RunnerState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            RunnerState::NotStarted => write!(f, "not started"),
            RunnerState::Running(step) => write!(f, "running step {} ({})", step.number(), step),
            RunnerState::Terminated { step, kind } => write!(
                f,
                "terminated by fatal fault in step {} ({}): {}",
                step.number(),
                step,
                kind
            ),
            RunnerState::Stalled(step) => write!(
                f,
                "stalled in step {} ({}), which never terminates",
                step.number(),
                step
            ),
            RunnerState::Finished => write!(f, "finished"),
        }
    }
}

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Outcome,
    /// Lines the step wrote to the output sink.
    pub lines_written: u64,
}

/// Result of a run: the outcome of every step that ran and the state the runner ended in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub state: RunnerState,
    pub steps: Vec<StepReport>,
    /// Selected steps that never ran because the run ended before them.
    pub not_reached: Vec<Step>,
}

impl RunReport {
    pub fn new(mode: RunMode) -> RunReport {
        RunReport {
            mode,
            state: RunnerState::NotStarted,
            steps: Vec::new(),
            not_reached: Vec::new(),
        }
    }

    pub fn outcome_of(&self, step: Step) -> Option<&Outcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    /// All fatal faults, in the order they occurred.
    pub fn fatal_faults(&self) -> Vec<(Step, FaultKind)> {
        self.steps
            .iter()
            .filter_map(|report| match report.outcome {
                Outcome::Fatal { kind } => Some((report.step, kind)),
                _ => None,
            })
            .collect()
    }

    pub fn lines_written(&self) -> u64 {
        self.steps.iter().map(|report| report.lines_written).sum()
    }

    /// Process exit code matching the way the run ended.
    pub fn exit_code(&self) -> i32 {
        match self.state {
            RunnerState::Terminated { .. } => EXIT_FATAL_FAULT,
            RunnerState::Stalled(_) => EXIT_FAULTS_OBSERVED,
            RunnerState::Finished if !self.fatal_faults().is_empty() => EXIT_FAULTS_OBSERVED,
            _ => EXIT_CLEAN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn step_report(step: Step, outcome: Outcome) -> StepReport {
        StepReport {
            step,
            outcome,
            lines_written: 0,
        }
    }

    #[test]
    fn test_exit_code_terminated() {
        let mut report = RunReport::new(RunMode::Sequential);
        report.state = RunnerState::Terminated {
            step: Step::BoundsCheck,
            kind: FaultKind::IndexOutOfRange { index: 3, len: 3 },
        };
        assert_eq!(report.exit_code(), EXIT_FATAL_FAULT);
    }

    #[test]
    fn test_exit_code_finished_with_contained_faults() {
        let mut report = RunReport::new(RunMode::Isolated);
        report.steps.push(step_report(
            Step::SubstringRange,
            Outcome::Fatal {
                kind: FaultKind::StringIndexOutOfRange { begin: 10, len: 5 },
            },
        ));
        report.state = RunnerState::Finished;

        assert_eq!(report.exit_code(), EXIT_FAULTS_OBSERVED);
        assert_eq!(
            report.fatal_faults(),
            vec![(
                Step::SubstringRange,
                FaultKind::StringIndexOutOfRange { begin: 10, len: 5 }
            )]
        );
    }

    #[test]
    fn test_exit_code_clean() {
        let mut report = RunReport::new(RunMode::Sequential);
        report
            .steps
            .push(step_report(Step::DeadBranch, Outcome::Unreachable));
        report.state = RunnerState::Finished;

        assert_eq!(report.exit_code(), EXIT_CLEAN);
        assert_eq!(report.outcome_of(Step::DeadBranch), Some(&Outcome::Unreachable));
        assert_eq!(report.outcome_of(Step::BoundsCheck), None);
    }

    #[test]
    fn test_state_display() {
        let state = RunnerState::Terminated {
            step: Step::BoundsCheck,
            kind: FaultKind::IndexOutOfRange { index: 3, len: 3 },
        };
        assert_eq!(
            state.to_string(),
            "terminated by fatal fault in step 2 (bounds-check): index out of bounds: the len is 3 but the index is 3"
        );
    }
}
