// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::demos::DemoContext;
use crate::demos::Demonstration;
use crate::errors::*;
use crate::FaultKind;
use crate::Outcome;
use crate::RunOptions;
use crate::Step;

static NUMBERS: [i32; 3] = [1, 2, 3];

// One past the last valid index.
const INDEX: usize = 3;

/// Element `index` of `values`, or an index fault when it lies outside the sequence.
pub fn read_element(values: &[i32], index: usize) -> std::result::Result<i32, FaultKind> {
    values
        .get(index)
        .cloned()
        .ok_or(FaultKind::IndexOutOfRange {
            index,
            len: values.len(),
        })
}

/// Reads past the end of a 3-element sequence. The fault is not intercepted.
struct BoundsCheckDemonstration {}

impl Demonstration for BoundsCheckDemonstration {
    fn step(&self) -> Step {
        Step::BoundsCheck
    }

    fn run(&self, context: &mut DemoContext) -> Result<Outcome> {
        match read_element(&NUMBERS, INDEX) {
            Ok(value) => {
                context.emit(&value.to_string())?;
                Ok(Outcome::Completed)
            }
            Err(kind) => Ok(Outcome::Fatal { kind }),
        }
    }
}

pub fn get_bounds_check_demonstration(_options: &RunOptions) -> Box<dyn Demonstration> {
    Box::new(BoundsCheckDemonstration {})
}
