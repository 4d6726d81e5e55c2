// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::demos::DemoContext;
use crate::demos::Demonstration;
use crate::errors::*;
use crate::Outcome;
use crate::RunOptions;
use crate::Step;

/// Line guarded by a condition that never holds.
pub const UNREACHABLE_LINE: &str = "This code is unreachable!";

const LHS: i32 = 1;
const RHS: i32 = 2;

/// Prints `UNREACHABLE_LINE` only when `lhs == rhs`.
fn guarded_print(context: &mut DemoContext, lhs: i32, rhs: i32) -> Result<Outcome> {
    if lhs == rhs {
        context.emit(UNREACHABLE_LINE)?;
        return Ok(Outcome::Completed);
    }
    Ok(Outcome::Unreachable)
}

struct DeadBranchDemonstration {}

impl Demonstration for DeadBranchDemonstration {
    fn step(&self) -> Step {
        Step::DeadBranch
    }

    fn run(&self, context: &mut DemoContext) -> Result<Outcome> {
        guarded_print(context, LHS, RHS)
    }
}

pub fn get_dead_branch_demonstration(_options: &RunOptions) -> Box<dyn Demonstration> {
    Box::new(DeadBranchDemonstration {})
}
