//! Option registries: the implicit main registry and named subcommands.
//!
//! Every parser owns one main registry (empty name) plus zero or more named
//! subcommands. A registry keeps its options in declaration order and hands
//! out typed [`Arg`] handles from its factories.

use std::collections::HashMap;

use crate::option::{Arg, ArgOption, Multi, OptionId, OptionKind, Single};
use crate::validate::{
    DeclarationError, check_name, choice_validator, int_range_validator, int_validator,
    real_range_validator, real_validator, str_validator,
};

/// Handle for a declared subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubCommandId(pub(crate) usize);

/// A named collection of options.
#[derive(Debug)]
pub struct SubCommand {
    index: usize,
    name: String,
    short_name: Option<char>,
    help: String,
    options: Vec<ArgOption>,
    help_name: String,
    version_name: Option<String>,
}

impl SubCommand {
    pub(crate) fn main(help_name: &str, version_name: &str) -> Self {
        Self {
            index: 0,
            name: String::new(),
            short_name: None,
            help: String::new(),
            options: Vec::new(),
            help_name: help_name.to_string(),
            version_name: Some(version_name.to_string()),
        }
    }

    pub(crate) fn named(index: usize, name: &str, help: &str, help_name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            short_name: name.chars().next(),
            help: help.to_string(),
            options: Vec::new(),
            help_name: help_name.to_string(),
            version_name: None,
        }
    }

    pub fn id(&self) -> SubCommandId {
        SubCommandId(self.index)
    }

    /// The subcommand's name; empty for the main registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_main(&self) -> bool {
        self.index == 0
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Options in declaration order.
    pub fn options(&self) -> &[ArgOption] {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut [ArgOption] {
        &mut self.options
    }

    pub(crate) fn set_short_name(&mut self, short: Option<char>) {
        self.short_name = short;
    }

    /// Returns `true` if any option in this registry currently uses `short`.
    pub fn has_short(&self, short: char) -> bool {
        self.options.iter().any(|o| o.short_name() == Some(short))
    }

    /// Finds an option by long name.
    pub fn find(&self, long_name: &str) -> Option<&ArgOption> {
        self.options.iter().find(|o| o.long_name() == long_name)
    }

    /// Builds the long-name and short-name lookup tables for this registry.
    pub(crate) fn name_tables(&self) -> (HashMap<String, usize>, HashMap<char, usize>) {
        let mut longs = HashMap::with_capacity(self.options.len());
        let mut shorts = HashMap::with_capacity(self.options.len());
        for (index, option) in self.options.iter().enumerate() {
            longs.insert(option.long_name().to_string(), index);
            if let Some(short) = option.short_name() {
                shorts.entry(short).or_insert(index);
            }
        }
        (longs, shorts)
    }

    pub(crate) fn reset(&mut self) {
        self.options.iter_mut().for_each(ArgOption::reset);
    }

    /// Adds a flag: `false` unless given.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{ExitStrategy, Outcome, Parser};
    ///
    /// let mut parser = Parser::new("app");
    /// parser.set_exit_strategy(ExitStrategy::Return);
    /// let all = parser.flag("all", "Include hidden files").unwrap();
    /// assert_eq!(parser.parse(["-a"]).unwrap(), Outcome::Parsed);
    /// assert!(parser.value(&all));
    /// ```
    pub fn flag(&mut self, name: &str, help: &str) -> Result<Arg<bool>, DeclarationError> {
        self.add(name, help, OptionKind::Flag { value: false })
    }

    pub fn int(&mut self, name: &str, help: &str, default: i64) -> Result<Arg<i64>, DeclarationError> {
        self.add(name, help, OptionKind::Int(Single::new(default, int_validator())))
    }

    /// Adds an int option that only accepts values in `minimum..=maximum`.
    pub fn int_in_range(
        &mut self,
        name: &str,
        help: &str,
        minimum: i64,
        maximum: i64,
        default: i64,
    ) -> Result<Arg<i64>, DeclarationError> {
        if minimum > maximum {
            return Err(DeclarationError::InvalidRange {
                option: name.to_string(),
                minimum: minimum.to_string(),
                maximum: maximum.to_string(),
            });
        }
        let validator = int_range_validator(minimum, maximum);
        self.add(name, help, OptionKind::Int(Single::new(default, validator)))
    }

    pub fn real(&mut self, name: &str, help: &str, default: f64) -> Result<Arg<f64>, DeclarationError> {
        self.add(name, help, OptionKind::Real(Single::new(default, real_validator())))
    }

    /// Adds a real option that only accepts values in `minimum..=maximum`.
    pub fn real_in_range(
        &mut self,
        name: &str,
        help: &str,
        minimum: f64,
        maximum: f64,
        default: f64,
    ) -> Result<Arg<f64>, DeclarationError> {
        if minimum.is_nan() || maximum.is_nan() || minimum > maximum {
            return Err(DeclarationError::InvalidRange {
                option: name.to_string(),
                minimum: minimum.to_string(),
                maximum: maximum.to_string(),
            });
        }
        let validator = real_range_validator(minimum, maximum);
        self.add(name, help, OptionKind::Real(Single::new(default, validator)))
    }

    /// Adds a string option. Given values must be nonempty.
    pub fn string(&mut self, name: &str, help: &str, default: &str) -> Result<Arg<String>, DeclarationError> {
        let kind = OptionKind::Str(Single::new(default.to_string(), str_validator()));
        self.add(name, help, kind)
    }

    /// Adds a string option restricted to `choices`.
    ///
    /// The default must itself be one of the choices, unless it is empty.
    pub fn choice(
        &mut self,
        name: &str,
        help: &str,
        default: &str,
        choices: &[&str],
    ) -> Result<Arg<String>, DeclarationError> {
        if choices.is_empty() {
            return Err(DeclarationError::InvalidChoices {
                option: name.to_string(),
                reason: "no choices given".to_string(),
            });
        }
        if !default.is_empty() && !choices.contains(&default) {
            return Err(DeclarationError::InvalidChoices {
                option: name.to_string(),
                reason: format!("default {default:?} is not a choice"),
            });
        }
        let choices = choices.iter().map(ToString::to_string).collect();
        let kind = OptionKind::Str(Single::new(default.to_string(), choice_validator(choices)));
        self.add(name, help, kind)
    }

    /// Adds a string list option (one or more values unless changed).
    pub fn strings(&mut self, name: &str, help: &str) -> Result<Arg<Vec<String>>, DeclarationError> {
        self.add(name, help, OptionKind::StrList(Multi::new(str_validator())))
    }

    pub fn ints(&mut self, name: &str, help: &str) -> Result<Arg<Vec<i64>>, DeclarationError> {
        self.add(name, help, OptionKind::IntList(Multi::new(int_validator())))
    }

    pub fn reals(&mut self, name: &str, help: &str) -> Result<Arg<Vec<f64>>, DeclarationError> {
        self.add(name, help, OptionKind::RealList(Multi::new(real_validator())))
    }

    fn add<T>(&mut self, name: &str, help: &str, kind: OptionKind) -> Result<Arg<T>, DeclarationError> {
        check_name(name, "option")?;
        if self.help_name == name {
            return Err(DeclarationError::ReservedHelpName(name.to_string()));
        }
        if self.version_name.as_deref() == Some(name) {
            return Err(DeclarationError::ReservedVersionName(name.to_string()));
        }
        if self.find(name).is_some() {
            return Err(DeclarationError::DuplicateLongName(name.to_string()));
        }

        let id = OptionId {
            command: self.index,
            index: self.options.len(),
        };
        tracing::trace!(command = %self.name, option = name, "declared option");
        self.options.push(ArgOption::new(name, help, kind));
        Ok(Arg::new(id))
    }
}
