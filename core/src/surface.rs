//! The declared option surface: what help renderers and tooling see.
//!
//! A surface is a read-only, serializable snapshot of a parser's
//! declarations. Hidden options are left out.

use serde::Serialize;

use crate::option::ArgOption;
use crate::types::{ValueCount, ValueType};

/// One option as presented to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSurface {
    pub long_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    pub help: String,
    pub value_type: ValueType,
    pub value_count: ValueCount,
    /// Value placeholder text, e.g. `WIDTH`, `[LEVEL]` or `<FILE1> [FILE2 ...]`.
    pub arity: String,
    pub var_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub required: bool,
}

impl OptionSurface {
    pub(crate) fn from_option(option: &ArgOption) -> Self {
        let count = option.value_count();
        Self {
            long_name: option.long_name().to_string(),
            short_name: option.short_name(),
            help: option.help().to_string(),
            value_type: option.value_type(),
            value_count: count,
            arity: arity_text(option.var_name(), count),
            var_name: option.var_name().to_string(),
            default: option.default_text(),
            required: option.is_required(),
        }
    }

    /// A flag-like entry for the built-in help and version options.
    pub(crate) fn builtin(long_name: &str, short_name: Option<char>, help: &str) -> Self {
        Self {
            long_name: long_name.to_string(),
            short_name,
            help: help.to_string(),
            value_type: ValueType::Flag,
            value_count: ValueCount::Zero,
            arity: String::new(),
            var_name: String::new(),
            default: None,
            required: false,
        }
    }

    /// The left-hand column of an options table, e.g. `-w, --width WIDTH`.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::Parser;
    ///
    /// let mut parser = Parser::new("app");
    /// parser.int("width", "Line width", 80).unwrap();
    /// let surface = parser.surface();
    /// assert_eq!(surface.options[0].label(), "-w, --width WIDTH");
    /// ```
    pub fn label(&self) -> String {
        let mut label = match self.short_name {
            Some(short) => format!("-{short}, --{}", self.long_name),
            None => format!("--{}", self.long_name),
        };
        if !self.arity.is_empty() {
            label.push(' ');
            label.push_str(&self.arity);
        }
        label
    }
}

/// The positional argument policy as presented to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalSurface {
    pub var_name: String,
    pub help: String,
    pub count: ValueCount,
    pub arity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCommandSurface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    pub help: String,
    pub help_option: OptionSurface,
    pub options: Vec<OptionSurface>,
}

/// Everything a help renderer needs to describe a parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParserSurface {
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub description: String,
    pub help_option: OptionSurface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_option: Option<OptionSurface>,
    pub positionals: PositionalSurface,
    pub options: Vec<OptionSurface>,
    pub subcommands: Vec<SubCommandSurface>,
    pub end_notes: String,
}

impl ParserSurface {
    pub fn find_subcommand(&self, name: &str) -> Option<&SubCommandSurface> {
        self.subcommands.iter().find(|s| s.name == name)
    }
}

/// Placeholder text for `count` values named `var_name`.
///
/// # Examples
///
/// ```
/// use argspec_core::{ValueCount, arity_text};
///
/// assert_eq!(arity_text("N", ValueCount::One), "N");
/// assert_eq!(arity_text("N", ValueCount::ZeroOrOne), "[N]");
/// assert_eq!(arity_text("N", ValueCount::OneOrMore), "<N1> [N2 ...]");
/// assert_eq!(arity_text("N", ValueCount::Three), "<N1> <N2> <N3>");
/// ```
pub fn arity_text(var_name: &str, count: ValueCount) -> String {
    let numbered = |n: usize| {
        (1..=n)
            .map(|i| format!("<{var_name}{i}>"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    match count {
        ValueCount::Zero => String::new(),
        ValueCount::ZeroOrOne => format!("[{var_name}]"),
        ValueCount::One => var_name.to_string(),
        ValueCount::ZeroOrMore => format!("[{var_name}1 [{var_name}2 ...]]"),
        ValueCount::OneOrMore => format!("<{var_name}1> [{var_name}2 ...]"),
        ValueCount::Two => numbered(2),
        ValueCount::Three => numbered(3),
        ValueCount::Four => numbered(4),
    }
}

/// Surfaces of the options shown to users; hidden options are left out.
pub(crate) fn visible(options: &[ArgOption]) -> Vec<OptionSurface> {
    options
        .iter()
        .filter(|option| !option.is_hidden())
        .map(OptionSurface::from_option)
        .collect()
}
