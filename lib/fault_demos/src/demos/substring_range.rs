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

static TEXT: &str = "Buggy";
const BEGIN: usize = 10;

/// The tail of `text` starting at byte `begin`.
///
/// Fails when `begin` lies past the end of `text` or inside a multi-byte character. Starting
/// exactly at the end yields an empty string.
pub fn substring_from(text: &str, begin: usize) -> std::result::Result<&str, FaultKind> {
    text.get(begin..).ok_or(FaultKind::StringIndexOutOfRange {
        begin,
        len: text.len(),
    })
}

struct SubstringRangeDemonstration {}

impl Demonstration for SubstringRangeDemonstration {
    fn step(&self) -> Step {
        Step::SubstringRange
    }

    fn run(&self, context: &mut DemoContext) -> Result<Outcome> {
        match substring_from(TEXT, BEGIN) {
            Ok(tail) => {
                context.emit(tail)?;
                Ok(Outcome::Completed)
            }
            Err(kind) => Ok(Outcome::Fatal { kind }),
        }
    }
}

pub fn get_substring_range_demonstration(_options: &RunOptions) -> Box<dyn Demonstration> {
    Box::new(SubstringRangeDemonstration {})
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_substring_within_range() {
        assert_eq!(substring_from("Buggy", 2), Ok("ggy"));
        assert_eq!(substring_from("Buggy", 5), Ok(""));
    }

    #[test]
    fn test_substring_past_end() {
        assert_eq!(
            substring_from("Buggy", 10),
            Err(FaultKind::StringIndexOutOfRange { begin: 10, len: 5 })
        );
    }

    #[test]
    fn test_substring_inside_character() {
        assert!(substring_from("Bügy", 2).is_err());
    }

    #[test]
    fn test_substring_range_is_fatal() {
        let mut buffer = Vec::new();
        let outcome = {
            let mut context = DemoContext::new(&mut buffer, None, None);
            SubstringRangeDemonstration {}.run(&mut context).unwrap()
        };

        assert_eq!(
            outcome,
            Outcome::Fatal {
                kind: FaultKind::StringIndexOutOfRange { begin: 10, len: 5 }
            }
        );
        assert!(buffer.is_empty());
    }
}
