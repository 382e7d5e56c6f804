//! External interpreter process.
//!
//! Runs the Ice command-line interpreter (or anything with the same shape)
//! as a child process. Each line the child writes to stdout becomes one
//! `OutputEntry` the moment it is read, so long-running programs show output
//! progressively, with terminal colour codes stripped. The exit status
//! decides success. The diagnostic is stderr when there is any; the stock
//! `ice` CLI prints its error as the last stdout line instead, and that line
//! is lifted out of the entries and used as the message.

use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;

use log::{debug, info, warn};

use crate::core::output::{OutputEntry, OutputSink};
use super::engine::{Interpreter, InterpreterFault};
use super::types::{RunResult, SourceMode};

pub struct ProcessInterpreter {
    program: String,
    args: Vec<String>,
    source_mode: SourceMode,
    scratch_path: PathBuf,
}

impl ProcessInterpreter {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        source_mode: SourceMode,
        scratch_path: PathBuf,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            source_mode,
            scratch_path,
        }
    }

    /// Default scratch location: `~/.icepad/scratch.ic`, or the temp dir
    /// when there is no home directory.
    pub fn default_scratch_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".icepad"))
            .unwrap_or_else(std::env::temp_dir)
            .join("scratch.ic")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match self.source_mode {
            SourceMode::File => {
                command.arg(&self.scratch_path).stdin(Stdio::null());
            }
            SourceMode::Stdin => {
                command.stdin(Stdio::piped());
            }
        }
        command
    }
}

/// Prefixes the `ice` CLI puts in front of the one-line error it prints to
/// stdout before exiting with status 1.
const STDOUT_DIAGNOSTIC_PREFIXES: &[&str] = &[
    "Parsing error:",
    "Syntax error:",
    "Runtime error:",
    "Internal error:",
];

impl Interpreter for ProcessInterpreter {
    fn name(&self) -> &str {
        &self.program
    }

    /// Streams stdout into `output` one line behind the child: the newest
    /// line is held back until the next one arrives, so a trailing stdout
    /// diagnostic can become the failure message instead of an entry.
    fn interpret(
        &self,
        source: &str,
        output: &mut dyn OutputSink,
    ) -> Result<RunResult, InterpreterFault> {
        if self.source_mode == SourceMode::File {
            write_scratch(&self.scratch_path, source)?;
        }

        let child = self
            .command()
            .spawn()
            .map_err(|source| InterpreterFault::Spawn {
                program: self.program.clone(),
                source,
            })?;
        info!("Spawned interpreter '{}' (pid={})", self.program, child.id());
        let mut child = ChildGuard::new(child);

        // The child may fill either pipe before draining stdin, so both the
        // writer and the stderr reader live on their own threads.
        let stdin_writer = child.stdin().map(|mut stdin| {
            let source = source.to_owned();
            thread::spawn(move || -> io::Result<()> {
                stdin.write_all(source.as_bytes())?;
                stdin.flush()
            })
        });

        let stderr_reader = child.stderr().map(|mut stderr| {
            thread::spawn(move || -> io::Result<String> {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf)?;
                Ok(String::from_utf8_lossy(&buf).into_owned())
            })
        });

        let mut line_count = 0usize;
        let mut held: Option<String> = None;
        if let Some(stdout) = child.stdout() {
            let mut reader = BufReader::new(stdout);
            let mut line = Vec::new();
            loop {
                line.clear();
                let read = reader.read_until(b'\n', &mut line).map_err(InterpreterFault::Io)?;
                if read == 0 {
                    break;
                }
                if let Some(previous) = held.replace(decode_line(&line)) {
                    output.append(OutputEntry::new(previous));
                }
                line_count += 1;
            }
        }

        if let Some(handle) = stdin_writer {
            match join(handle)? {
                Ok(()) => {}
                // The child exited without reading everything; its exit
                // status tells the story.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("Interpreter closed stdin early");
                }
                Err(e) => return Err(InterpreterFault::Io(e)),
            }
        }

        let stderr = match stderr_reader {
            Some(handle) => join(handle)?.map_err(InterpreterFault::Io)?,
            None => String::new(),
        };

        let status = child.wait().map_err(InterpreterFault::Io)?;
        debug!(
            "Interpreter '{}' finished: {} (lines={}, stderr_len={})",
            self.program,
            status,
            line_count,
            stderr.len()
        );

        let stderr = strip_ansi_escapes::strip_str(&stderr).trim().to_string();
        if status.success() {
            if !stderr.is_empty() {
                warn!("Interpreter succeeded but wrote to stderr: {}", stderr);
            }
            flush(output, held);
            return Ok(RunResult::Success);
        }

        if !stderr.is_empty() {
            flush(output, held);
            return Ok(RunResult::Failure(stderr));
        }
        match held {
            Some(last) if is_stdout_diagnostic(&last) => {
                debug!("Using trailing stdout line as the diagnostic");
                Ok(RunResult::Failure(last))
            }
            held => {
                flush(output, held);
                Ok(RunResult::Failure(format!("{} exited with {}", self.program, status)))
            }
        }
    }
}

/// Owns a spawned child until it has been waited on. Dropping it early (an
/// error path) kills and reaps the child so no zombie is left behind.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    fn stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    fn stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        warn!("Killing interpreter pid={} after a failed run", self.child.id());
        if let Err(e) = self.child.kill() {
            debug!("kill failed: {}", e);
        }
        if let Err(e) = self.child.wait() {
            warn!("Failed to reap interpreter: {}", e);
        }
    }
}

fn flush(output: &mut dyn OutputSink, held: Option<String>) {
    if let Some(line) = held {
        output.append(OutputEntry::new(line));
    }
}

fn is_stdout_diagnostic(line: &str) -> bool {
    STDOUT_DIAGNOSTIC_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

fn write_scratch(path: &Path, source: &str) -> Result<(), InterpreterFault> {
    let to_fault = |source| InterpreterFault::Scratch {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_fault)?;
    }
    fs::write(path, source).map_err(to_fault)
}

fn join<T>(handle: thread::JoinHandle<T>) -> Result<T, InterpreterFault> {
    handle
        .join()
        .map_err(|_| InterpreterFault::Io(io::Error::other("interpreter pipe thread panicked")))
}

/// Strips the line terminator and terminal colour codes, and tolerates
/// non-UTF-8 output.
fn decode_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(&strip_ansi_escapes::strip(raw)).into_owned();
    text.trim_end_matches(['\n', '\r']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputPanel;

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"Hello World\n"), "Hello World");
        assert_eq!(decode_line(b"crlf\r\n"), "crlf");
        assert_eq!(decode_line(b"no newline"), "no newline");
        assert_eq!(decode_line(b"\n"), "");
    }

    #[test]
    fn test_missing_program_is_a_fault() {
        let interpreter = ProcessInterpreter::new(
            "icepad-definitely-not-installed",
            Vec::new(),
            SourceMode::Stdin,
            std::env::temp_dir().join("icepad-unused.ic"),
        );
        let mut panel = OutputPanel::new();
        let result = interpreter.interpret("print(1)", &mut panel);

        assert!(matches!(result, Err(InterpreterFault::Spawn { .. })));
        assert!(panel.is_empty());
    }

    #[test]
    fn test_default_scratch_path_has_ic_extension() {
        let path = ProcessInterpreter::default_scratch_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("ic"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_mode_streams_lines_in_order() {
        let interpreter = ProcessInterpreter::new("cat", Vec::new(), SourceMode::Stdin, PathBuf::new());
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("1\n2\n3\n", &mut panel).unwrap();

        assert_eq!(result, RunResult::Success);
        assert_eq!(panel.texts(), vec!["1", "2", "3"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_keeps_partial_output_and_uses_stderr() {
        let interpreter = ProcessInterpreter::new(
            "sh",
            vec![
                "-c".into(),
                "echo partial; echo 'Runtime error: boom' >&2; exit 1".into(),
            ],
            SourceMode::Stdin,
            PathBuf::new(),
        );
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("", &mut panel).unwrap();

        assert_eq!(result, RunResult::Failure("Runtime error: boom".into()));
        assert_eq!(panel.texts(), vec!["partial"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_without_stderr_reports_status() {
        let interpreter = ProcessInterpreter::new(
            "sh",
            vec!["-c".into(), "exit 3".into()],
            SourceMode::Stdin,
            PathBuf::new(),
        );
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("", &mut panel).unwrap();

        match result {
            RunResult::Failure(message) => assert!(message.starts_with("sh exited with")),
            RunResult::Success => panic!("expected failure"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_passes_scratch_path() {
        let scratch = std::env::temp_dir()
            .join(format!("icepad-test-{}", std::process::id()))
            .join("scratch.ic");
        let interpreter = ProcessInterpreter::new("cat", Vec::new(), SourceMode::File, scratch.clone());
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("print(\"from file\")\n", &mut panel).unwrap();

        assert_eq!(result, RunResult::Success);
        assert_eq!(panel.texts(), vec!["print(\"from file\")"]);
        let _ = fs::remove_dir_all(scratch.parent().unwrap());
    }

    #[test]
    fn test_decode_line_strips_colour_codes() {
        assert_eq!(
            decode_line(b"\x1b[31mRuntime error\x1b[0m: x is not defined\n"),
            "Runtime error: x is not defined"
        );
    }

    #[test]
    fn test_stdout_diagnostic_prefixes() {
        assert!(is_stdout_diagnostic("Syntax error: Expected ')'"));
        assert!(is_stdout_diagnostic("Parsing error: Unterminated string"));
        assert!(!is_stdout_diagnostic("print says Runtime error: nope"));
        assert!(!is_stdout_diagnostic("42"));
    }

    #[cfg(unix)]
    #[test]
    fn test_ice_style_stdout_diagnostic_becomes_the_failure() {
        let interpreter = ProcessInterpreter::new(
            "sh",
            vec![
                "-c".into(),
                "echo partial; printf '\\033[31mRuntime error\\033[0m: x is not defined\\n'; exit 1"
                    .into(),
            ],
            SourceMode::Stdin,
            PathBuf::new(),
        );
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("", &mut panel).unwrap();

        assert_eq!(
            result,
            RunResult::Failure("Runtime error: x is not defined".into())
        );
        assert_eq!(panel.texts(), vec!["partial"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_plain_last_line_stays_an_entry_on_failure() {
        let interpreter = ProcessInterpreter::new(
            "sh",
            vec!["-c".into(), "echo one; echo two; exit 2".into()],
            SourceMode::Stdin,
            PathBuf::new(),
        );
        let mut panel = OutputPanel::new();

        let result = interpreter.interpret("", &mut panel).unwrap();

        assert!(matches!(result, RunResult::Failure(m) if m.starts_with("sh exited with")));
        assert_eq!(panel.texts(), vec!["one", "two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dropped_guard_kills_and_reaps_child() {
        use std::time::{Duration, Instant};

        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let started = Instant::now();
        drop(ChildGuard::new(child));

        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_waited_guard_reports_status() {
        let child = Command::new("sh").args(["-c", "exit 0"]).spawn().unwrap();
        let mut guard = ChildGuard::new(child);

        assert!(guard.wait().unwrap().success());
        assert!(guard.reaped);
    }
}
