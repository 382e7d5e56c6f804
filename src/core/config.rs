//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.icepad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::state::OutputPolicy;
pub use crate::language::DEFAULT_INDENT_UNIT;
use crate::interpreter::SourceMode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IcepadConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub initial_source: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InterpreterConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub source_mode: Option<SourceMode>,
    pub scratch_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    pub indent_unit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub on_failure: Option<OutputPolicy>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub header_threshold: Option<u16>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_INTERPRETER: &str = "ice";
pub const DEFAULT_HEADER_THRESHOLD: u16 = 10;
pub const DEFAULT_INITIAL_SOURCE: &str = r#"print("Hello World")"#;

/// Indent units above this are clamped.
const MAX_INDENT_UNIT: usize = 8;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub initial_source: String,
    pub interpreter_command: String,
    pub interpreter_args: Vec<String>,
    pub source_mode: SourceMode,
    pub scratch_path: PathBuf,
    pub indent_unit: usize,
    pub output_policy: OutputPolicy,
    pub header_threshold: u16,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the directory holding icepad's files, `~/.icepad`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".icepad"))
}

/// Returns the path to `~/.icepad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.icepad/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `IcepadConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<IcepadConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(IcepadConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(IcepadConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<IcepadConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: IcepadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# icepad configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# initial_source = 'print("Hello World")'

# [interpreter]
# command = "ice"                    # Or set ICEPAD_INTERPRETER env var
# args = []
# source_mode = "file"               # "file" (path as last arg) or "stdin"
# scratch_file = "scratch.ic"        # Relative to ~/.icepad/

# [editor]
# indent_unit = 2

# [output]
# on_failure = "retain"              # "retain" or "discard" partial output

# [layout]
# header_threshold = 10              # Output rows scrolled before the header reacts
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_interpreter` comes from `--interpreter` (None = not specified).
pub fn resolve(config: &IcepadConfig, cli_interpreter: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_interpreter, std::env::var("ICEPAD_INTERPRETER").ok())
}

fn resolve_with_env(
    config: &IcepadConfig,
    cli_interpreter: Option<&str>,
    env_interpreter: Option<String>,
) -> ResolvedConfig {
    // Interpreter: CLI → env → config → default
    let interpreter_command = cli_interpreter
        .map(|s| s.to_string())
        .or(env_interpreter)
        .or_else(|| config.interpreter.command.clone())
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

    let indent_unit = match config.editor.indent_unit {
        Some(0) => {
            warn!("indent_unit = 0 is not usable, falling back to {}", DEFAULT_INDENT_UNIT);
            DEFAULT_INDENT_UNIT
        }
        Some(n) => n.min(MAX_INDENT_UNIT),
        None => DEFAULT_INDENT_UNIT,
    };

    ResolvedConfig {
        initial_source: config
            .general
            .initial_source
            .clone()
            .unwrap_or_else(|| DEFAULT_INITIAL_SOURCE.to_string()),
        interpreter_command,
        interpreter_args: config.interpreter.args.clone().unwrap_or_default(),
        source_mode: config.interpreter.source_mode.unwrap_or_default(),
        scratch_path: resolve_scratch_path(config),
        indent_unit,
        output_policy: config.output.on_failure.unwrap_or_default(),
        header_threshold: config
            .layout
            .header_threshold
            .unwrap_or(DEFAULT_HEADER_THRESHOLD),
    }
}

/// Scratch file: relative names live under `~/.icepad/`, absolute paths are kept.
fn resolve_scratch_path(config: &IcepadConfig) -> PathBuf {
    match config.interpreter.scratch_file.as_deref() {
        Some(file) if Path::new(file).is_absolute() => PathBuf::from(file),
        Some(file) => config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(file),
        None => crate::interpreter::ProcessInterpreter::default_scratch_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = IcepadConfig::default();
        assert!(config.interpreter.command.is_none());
        assert!(config.general.initial_source.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = IcepadConfig::default();
        let resolved = resolve_with_env(&config, None, None);
        assert_eq!(resolved.interpreter_command, DEFAULT_INTERPRETER);
        assert!(resolved.interpreter_args.is_empty());
        assert_eq!(resolved.source_mode, SourceMode::File);
        assert_eq!(resolved.indent_unit, DEFAULT_INDENT_UNIT);
        assert_eq!(resolved.output_policy, OutputPolicy::Retain);
        assert_eq!(resolved.header_threshold, DEFAULT_HEADER_THRESHOLD);
        assert_eq!(resolved.initial_source, DEFAULT_INITIAL_SOURCE);
        assert_eq!(
            resolved.scratch_path.file_name().and_then(|n| n.to_str()),
            Some("scratch.ic")
        );
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = IcepadConfig {
            general: GeneralConfig {
                initial_source: Some("set x = 1".to_string()),
            },
            interpreter: InterpreterConfig {
                command: Some("/opt/ice/bin/ice".to_string()),
                args: Some(vec!["--quiet".to_string()]),
                source_mode: Some(SourceMode::Stdin),
                scratch_file: Some("/tmp/icepad.ic".to_string()),
            },
            editor: EditorConfig { indent_unit: Some(4) },
            output: OutputConfig {
                on_failure: Some(OutputPolicy::Discard),
            },
            layout: LayoutConfig {
                header_threshold: Some(3),
            },
        };
        let resolved = resolve_with_env(&config, None, None);
        assert_eq!(resolved.initial_source, "set x = 1");
        assert_eq!(resolved.interpreter_command, "/opt/ice/bin/ice");
        assert_eq!(resolved.interpreter_args, vec!["--quiet".to_string()]);
        assert_eq!(resolved.source_mode, SourceMode::Stdin);
        assert_eq!(resolved.scratch_path, PathBuf::from("/tmp/icepad.ic"));
        assert_eq!(resolved.indent_unit, 4);
        assert_eq!(resolved.output_policy, OutputPolicy::Discard);
        assert_eq!(resolved.header_threshold, 3);
    }

    #[test]
    fn test_resolve_interpreter_precedence() {
        let config = IcepadConfig {
            interpreter: InterpreterConfig {
                command: Some("from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let env = Some("from-env".to_string());
        assert_eq!(
            resolve_with_env(&config, Some("from-cli"), env.clone()).interpreter_command,
            "from-cli"
        );
        assert_eq!(
            resolve_with_env(&config, None, env).interpreter_command,
            "from-env"
        );
        assert_eq!(
            resolve_with_env(&config, None, None).interpreter_command,
            "from-config"
        );
    }

    #[test]
    fn test_indent_unit_is_sanitized() {
        let mut config = IcepadConfig::default();
        config.editor.indent_unit = Some(0);
        assert_eq!(resolve_with_env(&config, None, None).indent_unit, DEFAULT_INDENT_UNIT);

        config.editor.indent_unit = Some(64);
        assert_eq!(resolve_with_env(&config, None, None).indent_unit, MAX_INDENT_UNIT);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
initial_source = 'print("hi")'

[interpreter]
command = "ice"
args = ["-x"]
source_mode = "stdin"

[editor]
indent_unit = 4

[output]
on_failure = "discard"

[layout]
header_threshold = 2
"#;
        let config: IcepadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.general.initial_source.as_deref(),
            Some(r#"print("hi")"#)
        );
        assert_eq!(config.interpreter.args, Some(vec!["-x".to_string()]));
        assert_eq!(config.interpreter.source_mode, Some(SourceMode::Stdin));
        assert_eq!(config.editor.indent_unit, Some(4));
        assert_eq!(config.output.on_failure, Some(OutputPolicy::Discard));
        assert_eq!(config.layout.header_threshold, Some(2));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[interpreter]
command = "my-ice"
"#;
        let config: IcepadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interpreter.command.as_deref(), Some("my-ice"));
        assert!(config.interpreter.args.is_none());
        assert!(config.output.on_failure.is_none());
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let toml_str = r#"
[output]
on_failure = "sometimes"
"#;
        assert!(toml::from_str::<IcepadConfig>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_from_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("icepad-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[editor]\nindent_unit = \"two\"\n").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
