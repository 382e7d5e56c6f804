//! # Actions
//!
//! Everything that can happen to a console becomes an `Action`.
//! User edits the buffer? That's `Action::TextChanged(text)`.
//! Interpreter returns? That's `Action::RunFinished(result)`.
//!
//! `update()` applies an action to the console and returns an `Effect`
//! telling the caller what to do next. The interpreter call itself happens
//! elsewhere (see `runner`), between `Run` and `RunFinished`.
//!
//! ```text
//! Console + Action  →  update()  →  Console' + Effect
//! ```

use chrono::Local;
use log::{debug, info, warn};

use crate::core::state::{Console, OutputPolicy, RunPhase};
use crate::interpreter::RunResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The editor buffer now holds this text.
    TextChanged(String),
    /// The user asked to run the current source.
    Run,
    /// The interpreter returned a verdict.
    RunFinished(RunResult),
    /// The interpreter call faulted; no verdict exists for this run.
    RunAborted,
    Quit,
}

/// What the caller must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Invoke the interpreter on `console.source` with `console.output` as sink.
    Interpret,
    /// A run finished; bring the output pane into view.
    RevealOutput,
    Quit,
}

pub fn update(console: &mut Console, action: Action) -> Effect {
    match action {
        Action::TextChanged(text) => {
            if text == console.source {
                return Effect::None;
            }
            console.source = text;
            if console.phase.is_terminal() {
                console.phase = RunPhase::Idle;
            }
            Effect::None
        }
        Action::Run => {
            if console.phase == RunPhase::Running {
                warn!("Run requested while a run is in flight, ignoring");
                return Effect::None;
            }
            // Order matters: output first, then the error, then the call.
            console.output.clear();
            console.generation += 1;
            console.error = None;
            console.last_result = None;
            console.phase = RunPhase::Running;
            console.status_message = String::from("Running...");
            info!(
                "Run #{} started ({} bytes of source)",
                console.run_count + 1,
                console.source.len()
            );
            Effect::Interpret
        }
        Action::RunFinished(result) => {
            if console.phase != RunPhase::Running {
                warn!("RunFinished outside of a run, ignoring: {:?}", result);
                return Effect::None;
            }
            console.run_count += 1;
            let finished_at = Local::now();
            console.finished_at = Some(finished_at);
            match &result {
                RunResult::Success => {
                    console.phase = RunPhase::Succeeded;
                    console.status_message =
                        format!("Run #{} succeeded at {}", console.run_count, finished_at.format("%H:%M:%S"));
                }
                RunResult::Failure(message) => {
                    console.phase = RunPhase::Failed;
                    console.error = Some(message.clone());
                    if console.output_policy == OutputPolicy::Discard {
                        debug!("Discarding {} entries of partial output", console.output.len());
                        console.output.clear();
                    }
                    console.status_message =
                        format!("Run #{} failed at {}", console.run_count, finished_at.format("%H:%M:%S"));
                }
            }
            info!(
                "Run #{} finished: {:?} ({} output entries)",
                console.run_count,
                console.phase,
                console.output.len()
            );
            console.last_result = Some(result);
            Effect::RevealOutput
        }
        Action::RunAborted => {
            console.phase = RunPhase::Idle;
            console.status_message = String::from("Interpreter fault");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::{OutputEntry, OutputSink};
    use crate::test_support::test_console;

    #[test]
    fn test_text_changed_replaces_source() {
        let mut console = test_console("");
        let effect = update(&mut console, Action::TextChanged("set x = 1".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(console.source, "set x = 1");
    }

    #[test]
    fn test_text_changed_keeps_output_and_error() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        console.output.append(OutputEntry::new("kept"));
        update(&mut console, Action::RunFinished(RunResult::Failure("boom".into())));

        update(&mut console, Action::TextChanged("print(2)".into()));

        assert_eq!(console.output.texts(), vec!["kept"]);
        assert_eq!(console.error.as_deref(), Some("boom"));
        assert_eq!(console.phase, RunPhase::Idle);
    }

    #[test]
    fn test_same_text_is_a_no_op() {
        let mut console = test_console("print(1)");
        update(&mut console, Action::Run);
        update(&mut console, Action::RunFinished(RunResult::Success));
        assert_eq!(console.phase, RunPhase::Succeeded);

        update(&mut console, Action::TextChanged("print(1)".into()));
        assert_eq!(console.phase, RunPhase::Succeeded);
    }

    #[test]
    fn test_run_clears_output_and_error_before_interpreting() {
        let mut console = test_console("");
        console.output.append(OutputEntry::new("stale"));
        console.error = Some("stale error".into());

        let effect = update(&mut console, Action::Run);

        assert_eq!(effect, Effect::Interpret);
        assert_eq!(console.generation, 1);
        assert!(console.output.is_empty());
        assert!(console.error.is_none());
        assert_eq!(console.phase, RunPhase::Running);
    }

    #[test]
    fn test_aborted_run_still_counts_as_a_new_generation() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        update(&mut console, Action::RunFinished(RunResult::Success));
        update(&mut console, Action::Run);
        update(&mut console, Action::RunAborted);

        assert_eq!(console.run_count, 1);
        assert_eq!(console.generation, 2);
    }

    #[test]
    fn test_run_while_running_is_ignored() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        console.output.append(OutputEntry::new("in flight"));

        assert_eq!(update(&mut console, Action::Run), Effect::None);
        assert_eq!(console.output.texts(), vec!["in flight"]);
    }

    #[test]
    fn test_success_reveals_output() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        let effect = update(&mut console, Action::RunFinished(RunResult::Success));

        assert_eq!(effect, Effect::RevealOutput);
        assert_eq!(console.phase, RunPhase::Succeeded);
        assert_eq!(console.last_result, Some(RunResult::Success));
        assert!(console.error.is_none());
        assert_eq!(console.run_count, 1);
        assert!(console.finished_at.is_some());
        assert!(console.status_message.contains("succeeded"));
    }

    #[test]
    fn test_failure_sets_error_and_retains_output() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        console.output.append(OutputEntry::new("before the error"));
        update(
            &mut console,
            Action::RunFinished(RunResult::Failure("Runtime error: division by zero".into())),
        );

        assert_eq!(console.phase, RunPhase::Failed);
        assert_eq!(console.error.as_deref(), Some("Runtime error: division by zero"));
        assert_eq!(console.output.texts(), vec!["before the error"]);
    }

    #[test]
    fn test_discard_policy_clears_output_on_failure() {
        let mut console = test_console("").with_output_policy(OutputPolicy::Discard);
        update(&mut console, Action::Run);
        console.output.append(OutputEntry::new("partial"));
        update(&mut console, Action::RunFinished(RunResult::Failure("boom".into())));

        assert!(console.output.is_empty());
        assert_eq!(console.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_discard_policy_keeps_output_on_success() {
        let mut console = test_console("").with_output_policy(OutputPolicy::Discard);
        update(&mut console, Action::Run);
        console.output.append(OutputEntry::new("fine"));
        update(&mut console, Action::RunFinished(RunResult::Success));

        assert_eq!(console.output.texts(), vec!["fine"]);
    }

    #[test]
    fn test_run_finished_outside_run_is_ignored() {
        let mut console = test_console("");
        let effect = update(&mut console, Action::RunFinished(RunResult::Success));
        assert_eq!(effect, Effect::None);
        assert_eq!(console.phase, RunPhase::Idle);
        assert_eq!(console.run_count, 0);
    }

    #[test]
    fn test_run_aborted_returns_to_idle() {
        let mut console = test_console("");
        update(&mut console, Action::Run);
        assert_eq!(update(&mut console, Action::RunAborted), Effect::None);
        assert_eq!(console.phase, RunPhase::Idle);
        assert!(console.last_result.is_none());
    }

    #[test]
    fn test_quit() {
        let mut console = test_console("");
        assert_eq!(update(&mut console, Action::Quit), Effect::Quit);
    }
}
