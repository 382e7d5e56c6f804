use serde::{Deserialize, Serialize};

/// Outcome of one interpreter invocation.
///
/// Exactly one exists per run. It is dropped and replaced when the next run
/// starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Success,
    /// Diagnostic text, shown verbatim in the error display.
    Failure(String),
}

impl RunResult {
    /// Maps the interpreter's string return convention onto a result:
    /// an empty diagnostic means the program finished without error.
    pub fn from_diagnostic(diagnostic: impl Into<String>) -> Self {
        let diagnostic = diagnostic.into();
        if diagnostic.is_empty() {
            RunResult::Success
        } else {
            RunResult::Failure(diagnostic)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            RunResult::Success => None,
            RunResult::Failure(message) => Some(message),
        }
    }
}

/// How the source text reaches an external interpreter process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Write a scratch file and pass its path as the last argument.
    #[default]
    File,
    /// Pipe the source to the child's stdin.
    Stdin,
}
