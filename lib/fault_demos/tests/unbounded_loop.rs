// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[cfg(test)]
mod test {
    use fault_demos::*;

    use std::io;
    use std::thread;
    use std::time::Duration;

    /// The loop keeps running with no cap until another thread cancels it. The counter never moves.
    #[test]
    pub fn test_uncapped_loop_runs_until_cancelled() {
        let token = CancellationToken::new();
        let options = RunOptions {
            cancellation: Some(token.clone()),
            ..RunOptions::default()
        };

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        });

        let report = run_step(Step::UnboundedLoop, &options, &mut io::sink()).unwrap();
        canceller.join().unwrap();

        match report.outcome {
            Outcome::NeverTerminates {
                iterations,
                counter,
            } => {
                assert_eq!(counter, 0);
                assert_eq!(iterations, report.lines_written);
            }
            other => panic!("Expected the loop to still be running, got {:?}", other),
        }
    }

    /// Scenario without the bounds fault, watched until cancellation: steps 4 and 5 stay unreached
    #[test]
    pub fn test_cancelled_sequential_run_never_reaches_later_steps() {
        let token = CancellationToken::new();
        let options = RunOptions {
            skipped_steps: vec![Step::BoundsCheck],
            cancellation: Some(token.clone()),
            ..RunOptions::default()
        };

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        });

        let report = run_demonstrations(&options, &mut io::sink()).unwrap();
        canceller.join().unwrap();

        assert_eq!(report.state, RunnerState::Stalled(Step::UnboundedLoop));
        assert_eq!(
            report.not_reached,
            vec![Step::SubstringRange, Step::DeadBranch]
        );
    }

    /// Over any bounded window the loop prints one line per iteration
    #[test]
    pub fn test_loop_output_grows_with_window() {
        for cap in &[1u64, 2, 50, 500] {
            let options = RunOptions {
                max_loop_iterations: Some(*cap),
                ..RunOptions::default()
            };
            let mut buffer = Vec::new();
            let report = run_step(Step::UnboundedLoop, &options, &mut buffer).unwrap();
            let output = String::from_utf8(buffer).unwrap();

            assert_eq!(output.lines().count() as u64, *cap);
            assert!(output.lines().all(|line| line == LOOP_LINE));
            assert_eq!(
                report.outcome,
                Outcome::NeverTerminates {
                    iterations: *cap,
                    counter: 0,
                }
            );
        }
    }
}
