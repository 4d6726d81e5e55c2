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

use tracing::info;

/// Line printed on every iteration of the loop.
pub const LOOP_LINE: &str = "Infinite Loop!";

fn guard_holds(counter: i32) -> bool {
    counter >= 0
}

/// Loops while a counter stays non-negative, without ever advancing the counter.
///
/// The only ways out are the iteration cap and the cancellation token of the context, checked
/// once per iteration. Without either, `run` does not return.
struct UnboundedLoopDemonstration {}

impl Demonstration for UnboundedLoopDemonstration {
    fn step(&self) -> Step {
        Step::UnboundedLoop
    }

    fn run(&self, context: &mut DemoContext) -> Result<Outcome> {
        let counter: i32 = 0;
        let mut iterations: u64 = 0;

        while guard_holds(counter) {
            if context.observation_closed(iterations) {
                info!(
                    iterations,
                    counter, "observation stopped while the loop guard still holds"
                );
                return Ok(Outcome::NeverTerminates {
                    iterations,
                    counter,
                });
            }
            context.emit(LOOP_LINE)?;
            iterations += 1;
        }

        Ok(Outcome::Completed)
    }
}

pub fn get_unbounded_loop_demonstration(_options: &RunOptions) -> Box<dyn Demonstration> {
    Box::new(UnboundedLoopDemonstration {})
}
