//! Declaration documents: a whole parser described as data.
//!
//! A [`ParserDecl`] carries the parser-wide settings (the same fields as
//! [`ParserConfig`], flattened), the main registry's options and the
//! subcommands. It is read from YAML or JSON and turned into a live parser
//! by [`ParserDecl::build`](crate::ParserDecl::build).
//!
//! # Example YAML
//!
//! ```yaml
//! app_name: linecount
//! version: "1.0.0"
//! positional_count: one_or_more
//! options:
//!   - name: language
//!     help: Languages to count
//!     kind: { type: strs }
//!   - name: maxwidth
//!     help: Widest line
//!     kind: { type: int, default: 56, min: 20, max: 10000 }
//! subcommands:
//!   - name: special
//!     help: Special counting
//!     options:
//!       - name: extra
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use argspec_core::{ParserConfig, ValueCount};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A complete parser declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParserDecl {
    #[serde(flatten)]
    pub config: ParserConfig,
    /// Options of the main registry, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<SubCommandDecl>,
}

/// One declared option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub name: String,
    /// Explicit short name; when absent the first character of `name` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Declares the option without any short name.
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_short: bool,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub kind: KindDecl,
    /// Arity of a list option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_count: Option<ValueCount>,
    /// Lets a single-value option appear without a value.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_implicit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
}

impl OptionDecl {
    /// A flag with the given name and no help text.
    pub fn flag(name: &str) -> Self {
        Self::new(name, KindDecl::Flag)
    }

    pub fn new(name: &str, kind: KindDecl) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            no_short: false,
            help: String::new(),
            kind,
            value_count: None,
            allow_implicit: false,
            var_name: None,
            hidden: false,
            required: false,
        }
    }
}

/// The value kind of an option and its kind-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindDecl {
    #[default]
    Flag,
    Int {
        #[serde(default)]
        default: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Real {
        #[serde(default)]
        default: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Str {
        #[serde(default)]
        default: String,
        /// Restricts the value to one of these strings.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
    Strs,
    Ints,
    Reals,
}

/// A declared subcommand with its own options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCommandDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_short: bool,
    #[serde(default)]
    pub help: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ParserDecl {
    /// Loads a declaration from disk.
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let decl: Self = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        tracing::debug!(
            path = %path.display(),
            app = %decl.config.app_name,
            options = decl.options.len(),
            subcommands = decl.subcommands.len(),
            "loaded declaration"
        );
        Ok(decl)
    }

    /// Writes the declaration to disk, choosing the format the same way as
    /// [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialization fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
