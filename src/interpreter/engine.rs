use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::core::output::OutputSink;
use super::types::RunResult;

/// The interpreter call failed as a whole, as opposed to the program failing.
///
/// A program error is a normal `RunResult::Failure`. A fault means the host
/// could not run the interpreter at all and is never folded into a result.
#[derive(Debug)]
pub enum InterpreterFault {
    /// The interpreter process could not be started.
    Spawn { program: String, source: io::Error },
    /// The source could not be handed to the interpreter.
    Scratch { path: PathBuf, source: io::Error },
    /// Reading from or waiting on the interpreter failed mid-run.
    Io(io::Error),
}

impl fmt::Display for InterpreterFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpreterFault::Spawn { program, source } => {
                write!(f, "failed to start interpreter '{program}': {source}")
            }
            InterpreterFault::Scratch { path, source } => {
                write!(f, "failed to write scratch file {}: {source}", path.display())
            }
            InterpreterFault::Io(e) => write!(f, "interpreter I/O error: {e}"),
        }
    }
}

impl std::error::Error for InterpreterFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterpreterFault::Spawn { source, .. } | InterpreterFault::Scratch { source, .. } => {
                Some(source)
            }
            InterpreterFault::Io(e) => Some(e),
        }
    }
}

impl From<InterpreterFault> for io::Error {
    fn from(fault: InterpreterFault) -> Self {
        io::Error::other(fault)
    }
}

/// Runs a whole program synchronously.
///
/// Output produced while the program executes goes to `output`, in the order
/// the program's print primitive is called. The return value only carries the
/// verdict.
pub trait Interpreter: Send + Sync {
    /// Returns the name shown in the title bar.
    fn name(&self) -> &str;

    fn interpret(
        &self,
        source: &str,
        output: &mut dyn OutputSink,
    ) -> Result<RunResult, InterpreterFault>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fault_display_names_program() {
        let fault = InterpreterFault::Spawn {
            program: "ice".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let text = fault.to_string();
        assert!(text.contains("'ice'"));
        assert!(text.contains("not found"));
        assert!(fault.source().is_some());
    }

    #[test]
    fn test_fault_converts_to_io_error() {
        let fault = InterpreterFault::Io(io::Error::other("broken pipe"));
        let err: io::Error = fault.into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(err.to_string().contains("broken pipe"));
    }
}
