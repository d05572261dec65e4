//! Parser-wide settings.
//!
//! [`ParserConfig`] holds everything about a parser that is not an option:
//! names used for help and version, the positional policy, the texts shown
//! in help output, and the [`ExitStrategy`]. It serializes with `serde` so the
//! same fields can be embedded in declaration files.
//!
//! # Example YAML
//!
//! ```yaml
//! app_name: linecount
//! version: "1.2.0"
//! description: Counts lines of code.
//! positional_count: one_or_more
//! positional_var_name: PATH
//! exit: return
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::ValueCount;

/// What the parser does once it has a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExitStrategy {
    /// Print help or version to stdout and exit 0; print errors to stderr and
    /// exit 2.
    #[default]
    Terminate,
    /// Hand every outcome and error back to the caller.
    Return,
}

/// Parser-wide configuration.
///
/// # Examples
///
/// ```
/// use argspec_core::{ExitStrategy, ParserConfig, ValueCount};
///
/// let config = ParserConfig {
///     app_name: "linecount".to_string(),
///     positional_count: ValueCount::OneOrMore,
///     exit: ExitStrategy::Return,
///     ..ParserConfig::default()
/// };
/// assert_eq!(config.help_name, "help");
/// assert_eq!(config.positional_var_name, "FILE");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Program name shown in usage and version text.
    pub app_name: String,
    /// Version string; empty means no version option.
    pub version: String,
    /// Long name of the help option (`--help`).
    pub help_name: String,
    /// Long name of the version option (`--version`).
    pub version_name: String,
    pub description: String,
    pub positional_help: String,
    pub end_notes: String,
    pub positional_var_name: String,
    pub positional_count: ValueCount,
    pub exit: ExitStrategy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            version: String::new(),
            help_name: "help".to_string(),
            version_name: "version".to_string(),
            description: String::new(),
            positional_help: String::new(),
            end_notes: String::new(),
            positional_var_name: "FILE".to_string(),
            positional_count: ValueCount::ZeroOrMore,
            exit: ExitStrategy::Terminate,
        }
    }
}

/// The file stem of the running executable, or `app` if unavailable.
fn default_app_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "app".to_string())
}
