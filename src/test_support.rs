//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use crate::core::output::{OutputEntry, OutputSink};
use crate::core::state::Console;
use crate::interpreter::{Interpreter, InterpreterFault, RunResult};

/// An in-process stand-in for the Ice interpreter.
///
/// Understands just enough to drive console tests: statements separated by
/// `;` or newlines, `set name = literal`, and `print(args...)`, which joins
/// its arguments into one entry the way the `ice` CLI prints one line. Unknown identifiers are runtime errors;
/// anything else unparseable is a syntax error. Output appended before an
/// error stays appended.
pub struct ScriptedInterpreter;

impl Interpreter for ScriptedInterpreter {
    fn name(&self) -> &str {
        "scripted"
    }

    fn interpret(
        &self,
        source: &str,
        output: &mut dyn OutputSink,
    ) -> Result<RunResult, InterpreterFault> {
        let mut vars: HashMap<&str, String> = HashMap::new();
        for statement in split_top_level(source, &[';', '\n']) {
            let statement = statement.trim();
            if statement.is_empty() || statement.starts_with("--") {
                continue;
            }
            if let Err(message) = execute(statement, &mut vars, output) {
                return Ok(RunResult::Failure(message));
            }
        }
        Ok(RunResult::Success)
    }
}

fn execute<'s>(
    statement: &'s str,
    vars: &mut HashMap<&'s str, String>,
    output: &mut dyn OutputSink,
) -> Result<(), String> {
    if let Some(rest) = statement.strip_prefix("set ") {
        let (name, value) = rest
            .split_once('=')
            .ok_or_else(|| format!("Syntax error: expected '=' in '{statement}'"))?;
        let name = name.trim();
        if !is_identifier(name) {
            return Err(format!("Syntax error: bad variable name '{name}'"));
        }
        let value = evaluate(value.trim(), vars)?;
        vars.insert(name, value);
        return Ok(());
    }

    if let Some(args) = statement
        .strip_prefix("print(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut line = String::new();
        for arg in split_top_level(args, &[',']) {
            let arg = arg.trim();
            if !arg.is_empty() {
                line.push_str(&evaluate(arg, vars)?);
            }
        }
        output.append(OutputEntry::new(line));
        return Ok(());
    }

    evaluate(statement, vars).map(|_| ())
}

fn evaluate(expr: &str, vars: &HashMap<&str, String>) -> Result<String, String> {
    for quote in ['"', '\''] {
        if let Some(inner) = expr
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(inner.to_string());
        }
    }
    if expr.parse::<f64>().is_ok() || matches!(expr, "true" | "false" | "null") {
        return Ok(expr.to_string());
    }
    if is_identifier(expr) {
        return vars
            .get(expr)
            .cloned()
            .ok_or_else(|| format!("Runtime error: undefined identifier '{expr}'"));
    }
    Err(format!("Syntax error: unexpected '{expr}'"))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits on any of `separators` outside string literals.
fn split_top_level<'s>(text: &'s str, separators: &[char]) -> Vec<&'s str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if separators.contains(&c) => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// An interpreter whose invocation itself fails.
pub struct FaultingInterpreter;

impl Interpreter for FaultingInterpreter {
    fn name(&self) -> &str {
        "faulting"
    }

    fn interpret(
        &self,
        _source: &str,
        _output: &mut dyn OutputSink,
    ) -> Result<RunResult, InterpreterFault> {
        Err(InterpreterFault::Io(io::Error::other("engine unavailable")))
    }
}

/// Creates a console backed by the scripted interpreter.
pub fn test_console(source: &str) -> Console {
    test_console_with(ScriptedInterpreter, source)
}

pub fn test_console_with(interpreter: impl Interpreter + 'static, source: &str) -> Console {
    Console::new(Arc::new(interpreter), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputPanel;

    fn run(source: &str) -> (RunResult, Vec<String>) {
        let mut panel = OutputPanel::new();
        let result = ScriptedInterpreter.interpret(source, &mut panel).unwrap();
        let texts = panel.texts().into_iter().map(String::from).collect();
        (result, texts)
    }

    #[test]
    fn test_print_joins_arguments_into_one_entry() {
        let (result, texts) = run(r#"print("a; b", 2, true)"#);
        assert_eq!(result, RunResult::Success);
        assert_eq!(texts, vec!["a; b2true"]);
    }

    #[test]
    fn test_set_then_print() {
        let (result, texts) = run("set x = 'hi'\nprint(x)");
        assert_eq!(result, RunResult::Success);
        assert_eq!(texts, vec!["hi"]);
    }

    #[test]
    fn test_errors() {
        let (result, _) = run("print(missing)");
        assert_eq!(
            result,
            RunResult::Failure("Runtime error: undefined identifier 'missing'".into())
        );
        let (result, _) = run("print(1 +)");
        assert!(matches!(result, RunResult::Failure(m) if m.starts_with("Syntax error")));
    }
}
