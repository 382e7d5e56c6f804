pub mod engine;
pub mod process;
pub mod types;

pub use engine::{Interpreter, InterpreterFault};
pub use process::ProcessInterpreter;
pub use types::{RunResult, SourceMode};
