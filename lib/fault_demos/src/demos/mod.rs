// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub mod bounds_check;
pub mod dead_branch;
pub mod null_dereference;
pub mod substring_range;
pub mod unbounded_loop;

use crate::errors::*;
use crate::CancellationToken;
use crate::Outcome;
use crate::RunOptions;
use crate::Step;

use std::io::Write;

use crate::demos::bounds_check::get_bounds_check_demonstration;
use crate::demos::dead_branch::get_dead_branch_demonstration;
use crate::demos::null_dereference::get_null_dereference_demonstration;
use crate::demos::substring_range::get_substring_range_demonstration;
use crate::demos::unbounded_loop::get_unbounded_loop_demonstration;

/// Trait marking structs that demonstrate a single runtime fault.
///
/// A demonstration reports what happened as an `Outcome`. The `Err` case is reserved for failures
/// of the output sink; a demonstrated fault is never an error.
pub trait Demonstration {
    fn step(&self) -> Step;
    fn run(&self, context: &mut DemoContext) -> Result<Outcome>;
}

/// Everything a demonstration may touch while it runs: where its lines go and how long the
/// unbounded loop is watched.
pub struct DemoContext<'a> {
    sink: &'a mut dyn Write,
    lines_written: u64,
    loop_cap: Option<u64>,
    cancellation: Option<CancellationToken>,
}

impl<'a> DemoContext<'a> {
    pub fn new(
        sink: &'a mut dyn Write,
        loop_cap: Option<u64>,
        cancellation: Option<CancellationToken>,
    ) -> DemoContext<'a> {
        DemoContext {
            sink,
            lines_written: 0,
            loop_cap,
            cancellation,
        }
    }

    /// Write a single line of demonstration output.
    pub fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.sink, "{}", line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines emitted since the last reset.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn reset_line_count(&mut self) {
        self.lines_written = 0;
    }

    /// Whether a loop that has run `iterations` times should stop being observed.
    pub fn observation_closed(&self, iterations: u64) -> bool {
        if self.loop_cap.map_or(false, |cap| iterations >= cap) {
            return true;
        }
        self.cancellation
            .as_ref()
            .map_or(false, |token| token.is_cancelled())
    }
}

pub fn get_demonstration(step: Step, options: &RunOptions) -> Box<dyn Demonstration> {
    match step {
        Step::NullDereference => get_null_dereference_demonstration(options),
        Step::BoundsCheck => get_bounds_check_demonstration(options),
        Step::UnboundedLoop => get_unbounded_loop_demonstration(options),
        Step::SubstringRange => get_substring_range_demonstration(options),
        Step::DeadBranch => get_dead_branch_demonstration(options),
    }
}

/// Builds the demonstrations selected by `options`, in execution order.
pub fn get_demonstrations(options: &RunOptions) -> Vec<Box<dyn Demonstration>> {
    options
        .selected_steps()
        .into_iter()
        .map(|step| get_demonstration(step, options))
        .collect()
}
