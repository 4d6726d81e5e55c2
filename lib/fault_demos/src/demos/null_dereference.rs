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

/// Line printed when reading the absent value is intercepted.
pub const RECOVERY_MESSAGE: &str = "Caught NullPointerException: String is null";

/// Length of `text`, or a null-reference fault when there is no text to measure.
pub fn text_length(text: Option<&str>) -> std::result::Result<usize, FaultKind> {
    text.map(str::len).ok_or(FaultKind::NullReference)
}

/// Reads the length of a value that holds nothing, and recovers from the fault.
struct NullDereferenceDemonstration {}

impl Demonstration for NullDereferenceDemonstration {
    fn step(&self) -> Step {
        Step::NullDereference
    }

    fn run(&self, context: &mut DemoContext) -> Result<Outcome> {
        let absent: Option<&str> = None;

        match text_length(absent) {
            Ok(len) => {
                context.emit(&len.to_string())?;
                Ok(Outcome::Completed)
            }
            Err(kind) => {
                context.emit(RECOVERY_MESSAGE)?;
                Ok(Outcome::Recovered {
                    kind,
                    message: RECOVERY_MESSAGE.to_string(),
                })
            }
        }
    }
}

pub fn get_null_dereference_demonstration(_options: &RunOptions) -> Box<dyn Demonstration> {
    Box::new(NullDereferenceDemonstration {})
}
