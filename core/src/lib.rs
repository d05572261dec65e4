//! Command-line argument parsing: typed options, subcommands and a
//! positional policy.
//!
//! This crate turns an argument vector into typed, validated values, or into
//! a precise error carrying a numeric code:
//!
//! - [`Parser`] owns the declarations and runs the parse, returning an
//!   [`Outcome`] or a [`ParseError`].
//! - Options are declared through factories ([`Parser::flag`],
//!   [`Parser::int_in_range`], [`Parser::choice`], [`Parser::strings`], ...)
//!   that return typed [`Arg`] handles.
//! - [`SubCommand`] registries hold each subcommand's own options; the
//!   implicit main registry always exists.
//! - [`ValueCount`] describes how many values an option or the positional
//!   list accepts.
//! - Validators ([`int_range_validator`], [`choice_validator`], ...) convert
//!   raw text into values; declaration checks ([`validate_parser`]) catch
//!   configuration mistakes before anything is parsed.
//! - [`ParserSurface`] describes the declarations for help renderers such as
//!   [`PlainHelp`].
//!
//! # Example
//!
//! ```
//! use argspec_core::*;
//!
//! let mut parser = Parser::new("uxfcompare");
//! parser.set_exit_strategy(ExitStrategy::Return);
//! parser.set_positional_count(ValueCount::Two);
//! parser.set_positional_var_name("UXF").unwrap();
//! let equivalent = parser.flag("equivalent", "Compare for equivalence").unwrap();
//! let format = parser.choice("format", "Output format", "text", &["text", "json"]).unwrap();
//!
//! let outcome = parser.parse(["-e", "--format", "json", "a.uxf", "b.uxf"]).unwrap();
//! assert_eq!(outcome, Outcome::Parsed);
//! assert!(parser.value(&equivalent));
//! assert_eq!(parser.value(&format), "json");
//! assert_eq!(parser.positionals(), ["a.uxf", "b.uxf"]);
//!
//! let err = parser.parse(["a.uxf"]).unwrap_err();
//! assert_eq!(err.report(), "error #108: expected two positional arguments, got 1");
//! ```

mod config;
mod error;
mod help;
mod option;
mod parser;
mod registry;
mod surface;
mod token;
mod types;
mod validate;

pub use config::{ExitStrategy, ParserConfig};
pub use error::{
    E_INVALID_VALUE, E_MISSING, E_UNEXPECTED_VALUE, E_UNRECOGNIZED_OPTION, E_USER,
    E_WRONG_POSITIONAL_COUNT, ParseError, Result,
};
pub use help::{HelpRenderer, PlainHelp};
pub use option::{Arg, ArgOption, FromValue, OptionId};
pub use parser::{Outcome, Parser};
pub use registry::{SubCommand, SubCommandId};
pub use surface::{OptionSurface, ParserSurface, PositionalSurface, SubCommandSurface, arity_text};
pub use token::Token;
pub use types::*;
pub use validate::{
    DeclarationError, E_EMPTY_POSITIONAL_VAR_NAME, E_EMPTY_VAR_NAME, E_INVALID_HELP_OPTION,
    E_INVALID_NAME, E_INVALID_VERSION_OPTION, Validator, check_name, choice_validator,
    int_range_validator, int_validator, real_range_validator, real_validator, str_validator,
    validate_command, validate_parser,
};
