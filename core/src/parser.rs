//! The parser: declarations, the parsing state machine and result access.
//!
//! A [`Parser`] owns the main registry, any subcommands, the positional
//! policy and the [`ExitStrategy`]. [`Parser::parse`] runs in two passes:
//! the tokenizer classifies every argument, then a small state machine
//! (scanning options, or in positionals after `--`) binds values, routes the
//! rest to positionals and checks the final counts.
//!
//! # Examples
//!
//! ```
//! use argspec_core::{ExitStrategy, Outcome, Parser, ValueCount};
//!
//! let mut parser = Parser::new("lc");
//! parser.set_exit_strategy(ExitStrategy::Return);
//! parser.set_positional_count(ValueCount::OneOrMore);
//! let language = parser.strings("language", "Languages to count").unwrap();
//! let width = parser.int_in_range("maxwidth", "Widest line", 20, 10_000, 80).unwrap();
//! let summary = parser.flag("summary", "Totals only").unwrap();
//!
//! let outcome = parser.parse(["-l", "rust", "go", "--summary", "-m=120", "--", "src"]).unwrap();
//! assert_eq!(outcome, Outcome::Parsed);
//! assert_eq!(parser.value(&language), vec!["rust".to_string(), "go".to_string()]);
//! assert_eq!(parser.value(&width), 120);
//! assert!(parser.value(&summary));
//! assert_eq!(parser.positionals(), ["src"]);
//! ```

use std::fmt;
use std::process;

use tracing::debug;

use crate::config::{ExitStrategy, ParserConfig};
use crate::error::{ParseError, Result};
use crate::help::{HelpRenderer, PlainHelp};
use crate::option::{Arg, ArgOption, FromValue, OptionId, OptionKind};
use crate::registry::{SubCommand, SubCommandId};
use crate::surface::{
    OptionSurface, ParserSurface, PositionalSurface, SubCommandSurface, arity_text, visible,
};
use crate::token::{Token, Tokenizer};
use crate::types::{Value, ValueCount};
use crate::validate::{DeclarationError, check_name, validate_parser};

const HELP_TEXT: &str = "Show help and quit.";
const VERSION_TEXT: &str = "Show version and quit.";

/// The successful result of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Arguments were parsed; read values through the handles.
    Parsed,
    /// Help was requested. Carries the rendered text.
    Help(String),
    /// The version was requested. Carries the version text.
    Version(String),
}

/// A command-line parser.
pub struct Parser {
    config: ParserConfig,
    commands: Vec<SubCommand>,
    positionals: Vec<String>,
    active: usize,
    renderer: Box<dyn HelpRenderer>,
}

impl Parser {
    pub fn new(app_name: &str) -> Self {
        Self::with_config(ParserConfig {
            app_name: app_name.to_string(),
            ..ParserConfig::default()
        })
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let main = SubCommand::main(&config.help_name, &config.version_name);
        Self {
            config,
            commands: vec![main],
            positionals: Vec::new(),
            active: 0,
            renderer: Box::new(PlainHelp),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_version(&mut self, version: &str) {
        self.config.version = version.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.config.description = description.to_string();
    }

    pub fn set_end_notes(&mut self, end_notes: &str) {
        self.config.end_notes = end_notes.to_string();
    }

    pub fn set_positional_help(&mut self, help: &str) {
        self.config.positional_help = help.to_string();
    }

    pub fn set_positional_count(&mut self, count: ValueCount) {
        self.config.positional_count = count;
    }

    /// Sets the placeholder used for positionals in usage text.
    pub fn set_positional_var_name(&mut self, var_name: &str) -> std::result::Result<(), DeclarationError> {
        if var_name.is_empty() {
            return Err(DeclarationError::EmptyPositionalVarName);
        }
        check_name(var_name, "positional var name")?;
        self.config.positional_var_name = var_name.to_string();
        Ok(())
    }

    pub fn set_exit_strategy(&mut self, exit: ExitStrategy) {
        self.config.exit = exit;
    }

    pub fn set_renderer(&mut self, renderer: impl HelpRenderer + 'static) {
        self.renderer = Box::new(renderer);
    }

    /// The main registry.
    pub fn main_command(&mut self) -> &mut SubCommand {
        &mut self.commands[0]
    }

    /// All registries; index 0 is the main registry.
    pub fn commands(&self) -> &[SubCommand] {
        &self.commands
    }

    pub fn command(&self, id: SubCommandId) -> &SubCommand {
        &self.commands[id.0]
    }

    pub fn command_mut(&mut self, id: SubCommandId) -> &mut SubCommand {
        &mut self.commands[id.0]
    }

    /// Declares a subcommand and returns it for adding options.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{ExitStrategy, Parser};
    ///
    /// let mut parser = Parser::new("uxf");
    /// parser.set_exit_strategy(ExitStrategy::Return);
    /// let build = parser.subcommand("build", "Build a file").unwrap();
    /// let debug = build.flag("debug", "Keep symbols").unwrap();
    ///
    /// parser.parse(["build", "-d"]).unwrap();
    /// assert_eq!(parser.selected_subcommand(), Some("build"));
    /// assert!(parser.value(&debug));
    /// ```
    pub fn subcommand(&mut self, name: &str, help: &str) -> std::result::Result<&mut SubCommand, DeclarationError> {
        check_name(name, "subcommand")?;
        if name == self.config.help_name {
            return Err(DeclarationError::ReservedHelpName(name.to_string()));
        }
        if self.commands.iter().skip(1).any(|c| c.name() == name) {
            return Err(DeclarationError::DuplicateSubCommand(name.to_string()));
        }
        let index = self.commands.len();
        self.commands.push(SubCommand::named(
            index,
            name,
            help,
            &self.config.help_name,
        ));
        Ok(&mut self.commands[index])
    }

    /// Changes or removes a subcommand's one-letter alias.
    pub fn set_subcommand_short_name(
        &mut self,
        id: SubCommandId,
        short: Option<char>,
    ) -> std::result::Result<(), DeclarationError> {
        if let Some(short) = short {
            let taken = self
                .commands
                .iter()
                .skip(1)
                .any(|c| c.id() != id && (c.short_name() == Some(short) || c.name() == short.to_string()));
            if taken {
                return Err(DeclarationError::DuplicateSubCommand(short.to_string()));
            }
        }
        self.commands[id.0].set_short_name(short);
        Ok(())
    }

    pub fn flag(&mut self, name: &str, help: &str) -> std::result::Result<Arg<bool>, DeclarationError> {
        self.commands[0].flag(name, help)
    }

    pub fn int(&mut self, name: &str, help: &str, default: i64) -> std::result::Result<Arg<i64>, DeclarationError> {
        self.commands[0].int(name, help, default)
    }

    pub fn int_in_range(
        &mut self,
        name: &str,
        help: &str,
        minimum: i64,
        maximum: i64,
        default: i64,
    ) -> std::result::Result<Arg<i64>, DeclarationError> {
        self.commands[0].int_in_range(name, help, minimum, maximum, default)
    }

    pub fn real(&mut self, name: &str, help: &str, default: f64) -> std::result::Result<Arg<f64>, DeclarationError> {
        self.commands[0].real(name, help, default)
    }

    pub fn real_in_range(
        &mut self,
        name: &str,
        help: &str,
        minimum: f64,
        maximum: f64,
        default: f64,
    ) -> std::result::Result<Arg<f64>, DeclarationError> {
        self.commands[0].real_in_range(name, help, minimum, maximum, default)
    }

    pub fn string(&mut self, name: &str, help: &str, default: &str) -> std::result::Result<Arg<String>, DeclarationError> {
        self.commands[0].string(name, help, default)
    }

    pub fn choice(
        &mut self,
        name: &str,
        help: &str,
        default: &str,
        choices: &[&str],
    ) -> std::result::Result<Arg<String>, DeclarationError> {
        self.commands[0].choice(name, help, default, choices)
    }

    pub fn strings(&mut self, name: &str, help: &str) -> std::result::Result<Arg<Vec<String>>, DeclarationError> {
        self.commands[0].strings(name, help)
    }

    pub fn ints(&mut self, name: &str, help: &str) -> std::result::Result<Arg<Vec<i64>>, DeclarationError> {
        self.commands[0].ints(name, help)
    }

    pub fn reals(&mut self, name: &str, help: &str) -> std::result::Result<Arg<Vec<f64>>, DeclarationError> {
        self.commands[0].reals(name, help)
    }

    /// Overrides the derived short name; `None` leaves the option long-only.
    pub fn set_short_name<T>(&mut self, arg: &Arg<T>, short: Option<char>) -> std::result::Result<(), DeclarationError> {
        let OptionId { command, index } = arg.id();
        if let Some(short) = short {
            if !short.is_alphanumeric() {
                return Err(DeclarationError::InvalidName {
                    what: "short name",
                    name: short.to_string(),
                });
            }
            let options = self.commands[command].options();
            if let Some(other) = options
                .iter()
                .enumerate()
                .find(|(i, o)| *i != index && o.short_name() == Some(short))
            {
                return Err(DeclarationError::DuplicateShortName {
                    short,
                    first: other.1.long_name().to_string(),
                    second: options[index].long_name().to_string(),
                });
            }
        }
        self.option_mut(arg.id()).set_short_name(short);
        Ok(())
    }

    /// Sets the placeholder used for this option's values in usage text.
    pub fn set_var_name<T>(&mut self, arg: &Arg<T>, var_name: &str) -> std::result::Result<(), DeclarationError> {
        let option = self.option_mut(arg.id());
        if matches!(option.kind, OptionKind::Flag { .. }) {
            return Err(unsupported(option, "var name"));
        }
        if var_name.is_empty() {
            return Err(DeclarationError::EmptyVarName(option.long_name().to_string()));
        }
        check_name(var_name, "var name")?;
        option.set_var_name(var_name);
        Ok(())
    }

    /// Lets a single-value option be given without a value, reading as its
    /// default.
    pub fn set_allow_implicit<T>(&mut self, arg: &Arg<T>, allow: bool) -> std::result::Result<(), DeclarationError> {
        let option = self.option_mut(arg.id());
        match &mut option.kind {
            OptionKind::Int(single) => single.allow_implicit = allow,
            OptionKind::Real(single) => single.allow_implicit = allow,
            OptionKind::Str(single) => single.allow_implicit = allow,
            _ => return Err(unsupported(option, "implicit values")),
        }
        Ok(())
    }

    /// Changes how many values a list option takes.
    ///
    /// Only `ZeroOrMore`, `OneOrMore`, `Two`, `Three` and `Four` apply.
    pub fn set_value_count<T>(&mut self, arg: &Arg<T>, count: ValueCount) -> std::result::Result<(), DeclarationError> {
        let option = self.option_mut(arg.id());
        let allowed = matches!(
            count,
            ValueCount::ZeroOrMore
                | ValueCount::OneOrMore
                | ValueCount::Two
                | ValueCount::Three
                | ValueCount::Four
        );
        if !allowed {
            return Err(unsupported(option, &format!("{count} values")));
        }
        match &mut option.kind {
            OptionKind::StrList(multi) => multi.count = count,
            OptionKind::IntList(multi) => multi.count = count,
            OptionKind::RealList(multi) => multi.count = count,
            _ => return Err(unsupported(option, "a value count")),
        }
        Ok(())
    }

    /// Hidden options still parse but are left out of help and the surface.
    pub fn set_hidden<T>(&mut self, arg: &Arg<T>, hidden: bool) {
        self.option_mut(arg.id()).set_hidden(hidden);
    }

    /// Marks the option for [`check_required`](Self::check_required).
    pub fn set_required<T>(&mut self, arg: &Arg<T>, required: bool) {
        self.option_mut(arg.id()).set_required(required);
    }

    /// The declared option behind a handle.
    pub fn option<T>(&self, arg: &Arg<T>) -> &ArgOption {
        let OptionId { command, index } = arg.id();
        &self.commands[command].options()[index]
    }

    fn option_mut(&mut self, id: OptionId) -> &mut ArgOption {
        &mut self.commands[id.command].options_mut()[id.index]
    }

    /// The option's typed value: bound value, else default, else empty.
    pub fn value<T: FromValue>(&self, arg: &Arg<T>) -> T {
        let option = self.option(arg);
        let value = option.value();
        let value_type = value.value_type();
        T::from_value(value).unwrap_or_else(|| {
            panic!(
                "BUG: handle for --{} does not match its {value_type} value",
                option.long_name()
            )
        })
    }

    /// Returns `true` if the option's name appeared in the last parse.
    pub fn given<T>(&self, arg: &Arg<T>) -> bool {
        self.option(arg).given()
    }

    /// Every option of the active registry with its value, in declaration
    /// order.
    pub fn values(&self) -> Vec<(&str, Value)> {
        self.commands[self.active]
            .options()
            .iter()
            .map(|option| (option.long_name(), option.value()))
            .collect()
    }

    /// Positional arguments from the last parse, in encounter order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// The subcommand selected by the last parse, if any.
    pub fn selected_subcommand(&self) -> Option<&str> {
        (self.active != 0).then(|| self.commands[self.active].name())
    }

    /// Checks the declarations, returning the first problem found.
    pub fn validate(&self) -> std::result::Result<(), DeclarationError> {
        match validate_parser(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Forgets the results of any previous parse.
    pub fn reset(&mut self) {
        self.commands.iter_mut().for_each(SubCommand::reset);
        self.positionals.clear();
        self.active = 0;
    }

    /// Parses `args` (program name already stripped).
    ///
    /// Results of an earlier parse are cleared first. On error all results
    /// are cleared again, so nothing half-parsed is left to read. With
    /// [`ExitStrategy::Terminate`] help, version and errors end the process
    /// instead of returning.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        self.reset();
        let result = self.run(&args);
        if result.is_err() {
            self.reset();
        }
        self.settle(result)
    }

    /// Parses a whitespace-separated line. No quoting is recognized.
    pub fn parse_line(&mut self, line: &str) -> Result<Outcome> {
        self.parse(line.split_whitespace())
    }

    /// Parses the process arguments, skipping the program name.
    pub fn parse_env(&mut self) -> Result<Outcome> {
        self.parse(std::env::args().skip(1))
    }

    fn run(&mut self, args: &[String]) -> Result<Outcome> {
        self.validate()?;

        let version_name =
            (!self.config.version.is_empty()).then_some(self.config.version_name.as_str());
        let tokenized =
            Tokenizer::new(&mut self.commands, &self.config.help_name, version_name).tokenize(args)?;
        self.active = tokenized.active;
        let tokens = tokenized.tokens;

        let mut detached_left = tokens
            .iter()
            .filter(|t| matches!(t, Token::Value { attached: false, .. }))
            .count();
        let mut current: Option<OptionId> = None;
        let mut in_positionals = false;

        for token in tokens {
            match token {
                Token::Help => {
                    return Ok(Outcome::Help(self.help_text(self.selected_subcommand())));
                }
                Token::Version => return Ok(Outcome::Version(self.version_text())),
                Token::PositionalsFollow => {
                    in_positionals = true;
                    current = None;
                }
                Token::Name { option, .. } => current = Some(option),
                Token::Value { text, attached } => {
                    if in_positionals {
                        detached_left -= 1;
                        self.positionals.push(text);
                        continue;
                    }
                    let remaining = detached_left;
                    if !attached {
                        detached_left -= 1;
                    }
                    self.route_value(current, text, attached, remaining)?;
                }
            }
        }

        self.check_positionals()?;
        self.check_values()?;
        debug!(
            subcommand = self.selected_subcommand().unwrap_or(""),
            positionals = self.positionals.len(),
            "parsed"
        );
        Ok(Outcome::Parsed)
    }

    /// Binds a value to the current option, or routes it to positionals.
    ///
    /// A given option claims a detached value unless it can already stand
    /// and the detached values left (this one included) are only just
    /// enough to reach the positional minimum.
    fn route_value(
        &mut self,
        current: Option<OptionId>,
        text: String,
        attached: bool,
        remaining: usize,
    ) -> Result<()> {
        if let Some(id) = current {
            let missing = self
                .config
                .positional_count
                .minimum()
                .saturating_sub(self.positionals.len());
            let option = self.option_mut(id);
            if option.wants_value() {
                let yields = !attached && option.can_stand() && remaining <= missing;
                if !yields {
                    return option.add_value(&text).map_err(|reason| ParseError::InvalidValue {
                        option: option.long_name().to_string(),
                        reason,
                    });
                }
                debug!(option = option.long_name(), value = %text, "value left for positionals");
            }
        }
        if attached {
            return Err(ParseError::UnexpectedValue(text));
        }
        debug!(value = %text, "positional");
        self.positionals.push(text);
        Ok(())
    }

    fn check_positionals(&self) -> Result<()> {
        let expected = self.config.positional_count;
        let got = self.positionals.len();
        if expected.accepts(got) {
            Ok(())
        } else {
            Err(ParseError::WrongPositionalCount { expected, got })
        }
    }

    fn check_values(&self) -> Result<()> {
        for option in self.commands[self.active].options() {
            option.check().map_err(ParseError::WrongValueCount)?;
        }
        Ok(())
    }

    fn settle(&self, result: Result<Outcome>) -> Result<Outcome> {
        if self.config.exit == ExitStrategy::Return {
            return result;
        }
        match result {
            Ok(Outcome::Help(text) | Outcome::Version(text)) => {
                println!("{text}");
                process::exit(0);
            }
            Ok(outcome) => Ok(outcome),
            Err(err) => self.terminate(&err),
        }
    }

    fn terminate(&self, err: &ParseError) -> ! {
        eprintln!("{}", err.report());
        process::exit(2)
    }

    /// Routes an error through the exit strategy: terminates, or returns it.
    fn report(&self, err: ParseError) -> ParseError {
        if self.config.exit == ExitStrategy::Terminate {
            self.terminate(&err);
        }
        err
    }

    /// Reports a caller-side problem found after parsing (code 100).
    ///
    /// With [`ExitStrategy::Terminate`] this does not return.
    pub fn on_error(&self, message: &str) -> ParseError {
        self.report(ParseError::User(message.to_string()))
    }

    /// Reports that a required option was not given (code 101).
    ///
    /// With [`ExitStrategy::Terminate`] this does not return.
    pub fn on_missing<T>(&self, arg: &Arg<T>) -> ParseError {
        self.report(missing(self.option(arg)))
    }

    /// Reports the first option marked required that the last parse did not
    /// see, in declaration order within the active registry.
    pub fn check_required(&self) -> Result<()> {
        match self.commands[self.active]
            .options()
            .iter()
            .find(|o| o.is_required() && !o.given())
        {
            Some(option) => Err(self.report(missing(option))),
            None => Ok(()),
        }
    }

    /// `<app> v<version>`.
    pub fn version_text(&self) -> String {
        format!("{} v{}", self.config.app_name, self.config.version)
    }

    /// Renders help for the main registry, or for the named subcommand.
    pub fn help_text(&self, subcommand: Option<&str>) -> String {
        self.renderer.render(&self.surface(), subcommand)
    }

    /// A snapshot of every visible declaration.
    pub fn surface(&self) -> ParserSurface {
        let main = &self.commands[0];
        let help_option = |command: &SubCommand| {
            let short = (!command.has_short('h')).then_some('h');
            OptionSurface::builtin(&self.config.help_name, short, HELP_TEXT)
        };
        let version_option = (!self.config.version.is_empty()).then(|| {
            let short = ['v', 'V'].into_iter().find(|c| !main.has_short(*c));
            OptionSurface::builtin(&self.config.version_name, short, VERSION_TEXT)
        });

        ParserSurface {
            app_name: self.config.app_name.clone(),
            version: (!self.config.version.is_empty()).then(|| self.config.version.clone()),
            description: self.config.description.clone(),
            help_option: help_option(main),
            version_option,
            positionals: PositionalSurface {
                var_name: self.config.positional_var_name.clone(),
                help: self.config.positional_help.clone(),
                count: self.config.positional_count,
                arity: arity_text(
                    &self.config.positional_var_name,
                    self.config.positional_count,
                ),
            },
            options: visible(main.options()),
            subcommands: self
                .commands
                .iter()
                .skip(1)
                .map(|command| SubCommandSurface {
                    name: command.name().to_string(),
                    short_name: command.short_name(),
                    help: command.help().to_string(),
                    help_option: help_option(command),
                    options: visible(command.options()),
                })
                .collect(),
            end_notes: self.config.end_notes.clone(),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_config(ParserConfig::default())
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .field("commands", &self.commands)
            .field("positionals", &self.positionals)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn unsupported(option: &ArgOption, setting: &str) -> DeclarationError {
    DeclarationError::Unsupported {
        option: option.long_name().to_string(),
        setting: setting.to_string(),
    }
}

fn missing(option: &ArgOption) -> ParseError {
    let message = match option.short_name() {
        Some(short) => format!(
            "option -{short} (or --{}) is required",
            option.long_name()
        ),
        None => format!("option --{} is required", option.long_name()),
    };
    ParseError::Missing(message)
}
