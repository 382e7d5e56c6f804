//! Drives one run: `Run` → interpreter call → `RunFinished` / `RunAborted`.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};

use crate::core::action::{Action, Effect, update};
use crate::core::state::Console;
use crate::interpreter::InterpreterFault;

/// Runs the console's current source to completion.
///
/// The interpreter writes straight into `console.output`, so entries appear
/// in the order the program prints them. The verdict is applied only after
/// the call returns.
pub fn run(console: &mut Console) -> Result<Effect, InterpreterFault> {
    if update(console, Action::Run) != Effect::Interpret {
        return Ok(Effect::None);
    }

    let interpreter = Arc::clone(&console.interpreter);
    let started = Instant::now();
    let outcome = interpreter.interpret(&console.source, &mut console.output);
    debug!(
        "Interpreter '{}' returned after {}ms",
        interpreter.name(),
        started.elapsed().as_millis()
    );

    match outcome {
        Ok(result) => Ok(update(console, Action::RunFinished(result))),
        Err(fault) => {
            error!("Interpreter fault: {}", fault);
            update(console, Action::RunAborted);
            Err(fault)
        }
    }
}
