use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icepad::core::config::{self, ResolvedConfig};
use icepad::core::state::Console;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "icepad", about = "Interactive console for the Ice language")]
struct Args {
    /// Source file to load into the editor
    file: Option<PathBuf>,

    /// Interpreter command (overrides config and ICEPAD_INTERPRETER)
    #[arg(short, long)]
    interpreter: Option<String>,

    /// Run the source once, print the output and exit
    #[arg(long)]
    headless: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize file logger - writes to icepad.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("icepad.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("icepad: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut config = config::resolve(&file_config, args.interpreter.as_deref());

    if let Some(path) = &args.file {
        match fs::read_to_string(path) {
            Ok(source) => config.initial_source = source,
            Err(e) => {
                eprintln!("icepad: cannot read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!(
        "icepad starting up with interpreter: {} ({:?} mode)",
        config.interpreter_command,
        config.source_mode
    );

    let result = if args.headless {
        run_headless(&config)
    } else {
        icepad::tui::run(config)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("icepad exited with error: {}", e);
            eprintln!("icepad: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs once without a terminal UI: entries to stdout, the diagnostic to stderr.
fn run_headless(config: &ResolvedConfig) -> std::io::Result<ExitCode> {
    let mut console = Console::from_config(config);
    console.run()?;

    for entry in console.output().entries() {
        println!("{}", entry.text);
    }
    match console.error() {
        Some(error) => {
            eprintln!("{}", error);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}
