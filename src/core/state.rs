//! # Console State
//!
//! Everything one execution console owns, in one place. No terminal types
//! here; presentation state lives in the `tui` module.
//!
//! ```text
//! Console
//! ├── interpreter: Arc<dyn Interpreter>  // external engine
//! ├── source: String                     // current editor text
//! ├── output: OutputPanel                // entries of the current run
//! ├── phase: RunPhase                    // Idle → Running → Succeeded/Failed
//! ├── last_result: Option<RunResult>     // verdict of the latest run
//! ├── error: Option<String>              // displayed diagnostic
//! ├── output_policy: OutputPolicy        // keep or drop output on failure
//! ├── run_count: u64                     // completed runs
//! ├── generation: u64                    // runs started, faulted ones included
//! ├── finished_at: Option<DateTime>      // when the latest run completed
//! └── status_message: String             // title bar text
//! ```
//!
//! State changes only happen through `update(console, action)` in action.rs.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::output::OutputPanel;
use crate::core::runner;
use crate::interpreter::{Interpreter, InterpreterFault, ProcessInterpreter, RunResult};

/// Where a console is in its run lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Succeeded | RunPhase::Failed)
    }
}

/// What happens to output already appended when a run fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPolicy {
    /// Keep whatever the program printed before the error.
    #[default]
    Retain,
    /// Clear the panel so only the diagnostic remains.
    Discard,
}

pub struct Console {
    pub interpreter: Arc<dyn Interpreter>,
    pub source: String,
    pub output: OutputPanel,
    pub phase: RunPhase,
    pub last_result: Option<RunResult>,
    pub error: Option<String>,
    pub output_policy: OutputPolicy,
    pub run_count: u64,
    /// Bumped every time the output is cleared for a new run.
    pub generation: u64,
    pub finished_at: Option<DateTime<Local>>,
    pub status_message: String,
}

impl Console {
    pub fn new(interpreter: Arc<dyn Interpreter>, source: impl Into<String>) -> Self {
        Self {
            interpreter,
            source: source.into(),
            output: OutputPanel::new(),
            phase: RunPhase::Idle,
            last_result: None,
            error: None,
            output_policy: OutputPolicy::default(),
            run_count: 0,
            generation: 0,
            finished_at: None,
            status_message: String::from("Ctrl+R to run"),
        }
    }

    /// Console backed by the configured external interpreter.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let interpreter = ProcessInterpreter::new(
            config.interpreter_command.clone(),
            config.interpreter_args.clone(),
            config.source_mode,
            config.scratch_path.clone(),
        );
        Self::new(Arc::new(interpreter), config.initial_source.clone())
            .with_output_policy(config.output_policy)
    }

    pub fn with_output_policy(mut self, policy: OutputPolicy) -> Self {
        self.output_policy = policy;
        self
    }

    /// Replaces the source text. Output and the error display are untouched.
    pub fn on_text_change(&mut self, new_text: impl Into<String>) {
        update(self, Action::TextChanged(new_text.into()));
    }

    /// Clears output and error, runs the interpreter on the current source,
    /// and records the verdict.
    ///
    /// Returns `Effect::RevealOutput` once the run has a verdict. A fault is
    /// returned as-is after the console falls back to `Idle`.
    pub fn run(&mut self) -> Result<Effect, InterpreterFault> {
        runner::run(self)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn output(&self) -> &OutputPanel {
        &self.output
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last_result.as_ref()
    }

    pub fn interpreter_name(&self) -> &str {
        self.interpreter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_console;

    #[test]
    fn test_console_new_defaults() {
        let console = test_console("print(1)");
        assert_eq!(console.phase(), RunPhase::Idle);
        assert_eq!(console.source(), "print(1)");
        assert!(console.output().is_empty());
        assert!(console.error().is_none());
        assert!(console.last_result().is_none());
        assert_eq!(console.output_policy, OutputPolicy::Retain);
        assert_eq!(console.interpreter_name(), "scripted");
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!RunPhase::Idle.is_terminal());
        assert!(!RunPhase::Running.is_terminal());
        assert!(RunPhase::Succeeded.is_terminal());
        assert!(RunPhase::Failed.is_terminal());
    }

    #[test]
    fn test_output_policy_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            on_failure: OutputPolicy,
        }
        let w: Wrapper = toml::from_str(r#"on_failure = "discard""#).unwrap();
        assert_eq!(w.on_failure, OutputPolicy::Discard);
    }

    #[test]
    fn test_from_config_uses_configured_command_and_policy() {
        use crate::core::config::{IcepadConfig, resolve};

        let mut resolved = resolve(&IcepadConfig::default(), Some("ice-nightly"));
        resolved.output_policy = OutputPolicy::Discard;
        resolved.initial_source = "print(2)".to_string();

        let console = Console::from_config(&resolved);
        assert_eq!(console.interpreter_name(), "ice-nightly");
        assert_eq!(console.output_policy, OutputPolicy::Discard);
        assert_eq!(console.source(), "print(2)");
    }
}
