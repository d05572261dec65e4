//! Declaration checks and value validators.
//!
//! Two kinds of validation live here. Declaration checks catch structural
//! mistakes in the way a parser was configured (bad names, duplicate short or
//! long names, reserved help/version names) before any argument is looked at.
//! Validators are the per-option functions that turn raw argument text into a
//! typed value or a rejection message.
//!
//! # Examples
//!
//! ```
//! use argspec_core::{Parser, validate_parser};
//!
//! let mut parser = Parser::new("app");
//! parser.flag("summary", "Show a summary").unwrap();
//! parser.flag("sort", "Sort the output").unwrap();
//! // both options derived `-s`
//! assert!(!validate_parser(&parser).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::Parser;
use crate::registry::SubCommand;

/// Validation function for option values.
///
/// Receives the option's long name (for messages) and the raw text, and
/// returns the typed value or a message explaining the rejection.
pub type Validator<T> = Arc<dyn Fn(&str, &str) -> Result<T, String> + Send + Sync>;

/// Code for bad option, subcommand and variable names.
pub const E_INVALID_NAME: i32 = 109;
/// Code for an empty option variable name.
pub const E_EMPTY_VAR_NAME: i32 = 105;
/// Code for an empty positional variable name.
pub const E_EMPTY_POSITIONAL_VAR_NAME: i32 = 110;
/// Code for a user-declared help option.
pub const E_INVALID_HELP_OPTION: i32 = 103;
/// Code for a user-declared version option.
pub const E_INVALID_VERSION_OPTION: i32 = 104;

/// Configuration mistakes, reported before any argument is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Name is empty or not identifier-shaped.
    #[error("expected identifier name for {what}, got {name:?}")]
    InvalidName { what: &'static str, name: String },
    /// Option variable name set to the empty string.
    #[error("option {0}'s var name cannot be empty")]
    EmptyVarName(String),
    /// Positional variable name set to the empty string.
    #[error("positional var name cannot be empty")]
    EmptyPositionalVarName,
    /// Two options in one registry share a long name.
    #[error("duplicate option --{0}")]
    DuplicateLongName(String),
    /// Two options in one registry share a short name.
    #[error("duplicate short option -{short} (--{first} and --{second})")]
    DuplicateShortName {
        short: char,
        first: String,
        second: String,
    },
    /// Two subcommands share a name or short name.
    #[error("duplicate subcommand {0}")]
    DuplicateSubCommand(String),
    /// An option or subcommand tried to take the help name.
    #[error("only auto-generated help is supported ({0} is reserved)")]
    ReservedHelpName(String),
    /// An option tried to take the version name.
    #[error("only auto-generated version is supported ({0} is reserved)")]
    ReservedVersionName(String),
    /// A choice option with no choices, or a default outside them.
    #[error("option {option} has invalid choices: {reason}")]
    InvalidChoices { option: String, reason: String },
    /// A range option whose minimum exceeds its maximum.
    #[error("option {option} has an empty range: {minimum} > {maximum}")]
    InvalidRange {
        option: String,
        minimum: String,
        maximum: String,
    },
    /// A setting that does not apply to this kind of option.
    #[error("option {option} does not support {setting}")]
    Unsupported { option: String, setting: String },
}

impl DeclarationError {
    /// Numeric code used when the error is reported.
    pub const fn code(&self) -> i32 {
        match self {
            Self::EmptyVarName(_) => E_EMPTY_VAR_NAME,
            Self::EmptyPositionalVarName => E_EMPTY_POSITIONAL_VAR_NAME,
            Self::ReservedHelpName(_) => E_INVALID_HELP_OPTION,
            Self::ReservedVersionName(_) => E_INVALID_VERSION_OPTION,
            _ => E_INVALID_NAME,
        }
    }
}

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}[\p{L}\p{N}_]*$").expect("identifier pattern is valid")
});

/// Checks that `name` starts with a letter and continues with letters,
/// digits or underscores.
///
/// # Examples
///
/// ```
/// use argspec_core::check_name;
///
/// assert!(check_name("maxwidth", "option").is_ok());
/// assert!(check_name("max_width2", "option").is_ok());
/// assert!(check_name("2wide", "option").is_err());
/// assert!(check_name("", "option").is_err());
/// ```
pub fn check_name(name: &str, what: &'static str) -> Result<(), DeclarationError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(DeclarationError::InvalidName {
            what,
            name: name.to_string(),
        })
    }
}

/// Validates every registry of a parser.
///
/// Returns the problems found, stopping at the first one per registry. An
/// empty vector means the parser is ready to parse.
pub fn validate_parser(parser: &Parser) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for command in parser.commands() {
        if !command.is_main() {
            if !seen.insert(command.name().to_string()) {
                errors.push(DeclarationError::DuplicateSubCommand(
                    command.name().to_string(),
                ));
            }
            if let Some(short) = command.short_name()
                && !seen.insert(short.to_string())
            {
                errors.push(DeclarationError::DuplicateSubCommand(short.to_string()));
            }
        }
        errors.extend(validate_command(command));
    }

    errors
}

/// Validates one registry: long and short names must be unique.
pub fn validate_command(command: &SubCommand) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let mut longs: HashSet<&str> = HashSet::new();
    let mut shorts: Vec<(char, &str)> = Vec::new();

    for option in command.options() {
        if !longs.insert(option.long_name()) {
            errors.push(DeclarationError::DuplicateLongName(
                option.long_name().to_string(),
            ));
            return errors;
        }
        if let Some(short) = option.short_name() {
            if let Some((_, first)) = shorts.iter().find(|(c, _)| *c == short) {
                errors.push(DeclarationError::DuplicateShortName {
                    short,
                    first: first.to_string(),
                    second: option.long_name().to_string(),
                });
                return errors;
            }
            shorts.push((short, option.long_name()));
        }
    }

    errors
}

/// Accepts any text that parses as an `i64`.
pub fn int_validator() -> Validator<i64> {
    Arc::new(|name, raw| parse_int(name, raw))
}

/// Accepts integers within `minimum..=maximum`.
///
/// # Examples
///
/// ```
/// use argspec_core::int_range_validator;
///
/// let validate = int_range_validator(0, 100);
/// assert_eq!(validate("count", "42"), Ok(42));
/// assert_eq!(
///     validate("count", "150"),
///     Err("option count's maximum is 100, got 150".to_string())
/// );
/// ```
pub fn int_range_validator(minimum: i64, maximum: i64) -> Validator<i64> {
    Arc::new(move |name, raw| {
        let value = parse_int(name, raw)?;
        if value < minimum {
            Err(format!("option {name}'s minimum is {minimum}, got {value}"))
        } else if value > maximum {
            Err(format!("option {name}'s maximum is {maximum}, got {value}"))
        } else {
            Ok(value)
        }
    })
}

/// Accepts any text that parses as an `f64`.
pub fn real_validator() -> Validator<f64> {
    Arc::new(|name, raw| parse_real(name, raw))
}

/// Accepts reals within `minimum..=maximum`.
pub fn real_range_validator(minimum: f64, maximum: f64) -> Validator<f64> {
    Arc::new(move |name, raw| {
        let value = parse_real(name, raw)?;
        if value < minimum {
            Err(format!("option {name}'s minimum is {minimum}, got {value}"))
        } else if value > maximum {
            Err(format!("option {name}'s maximum is {maximum}, got {value}"))
        } else {
            Ok(value)
        }
    })
}

/// Accepts any nonempty string.
pub fn str_validator() -> Validator<String> {
    Arc::new(|name, raw| {
        if raw.is_empty() {
            Err(format!("option {name} expected a nonempty string"))
        } else {
            Ok(raw.to_string())
        }
    })
}

/// Accepts exactly one of `choices`.
///
/// Short choice lists are spelled out in the rejection message; long ones
/// are summarized by count.
pub fn choice_validator(choices: Vec<String>) -> Validator<String> {
    Arc::new(move |name, raw| {
        if choices.iter().any(|choice| choice == raw) {
            return Ok(raw.to_string());
        }
        let listed = if choices.len() < 9 {
            format!(": {}", choices.join(" "))
        } else {
            format!(" the {} valid choices", choices.len())
        };
        Err(format!(
            "option {name}'s value of {raw:?} is not one of{listed}"
        ))
    })
}

fn parse_int(name: &str, raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("option {name}'s value of {raw:?} isn't an int"))
}

fn parse_real(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("option {name}'s value of {raw:?} isn't a real"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name_rules() {
        assert!(check_name("verbose", "option").is_ok());
        assert!(check_name("größe", "option").is_ok());
        assert!(check_name("v2", "option").is_ok());
        assert_eq!(
            check_name("9lives", "option"),
            Err(DeclarationError::InvalidName {
                what: "option",
                name: "9lives".to_string()
            })
        );
        assert!(check_name("with-dash", "option").is_err());
        assert!(check_name("_x", "option").is_err());
    }

    #[test]
    fn test_int_validator_rejects_text() {
        let validate = int_validator();
        assert_eq!(validate("width", "-12"), Ok(-12));
        assert_eq!(
            validate("width", "wide"),
            Err("option width's value of \"wide\" isn't an int".to_string())
        );
    }

    #[test]
    fn test_int_range_minimum() {
        let validate = int_range_validator(20, 10_000);
        assert_eq!(
            validate("maxwidth", "5"),
            Err("option maxwidth's minimum is 20, got 5".to_string())
        );
        assert_eq!(validate("maxwidth", "20"), Ok(20));
        assert_eq!(validate("maxwidth", "10000"), Ok(10_000));
    }

    #[test]
    fn test_real_range() {
        let validate = real_range_validator(0.0, 1.0);
        assert_eq!(validate("ratio", "0.25"), Ok(0.25));
        assert_eq!(
            validate("ratio", "1.5"),
            Err("option ratio's maximum is 1, got 1.5".to_string())
        );
        assert!(validate("ratio", "half").is_err());
    }

    #[test]
    fn test_str_validator_rejects_empty() {
        let validate = str_validator();
        assert_eq!(validate("out", "x"), Ok("x".to_string()));
        assert_eq!(
            validate("out", ""),
            Err("option out expected a nonempty string".to_string())
        );
    }

    #[test]
    fn test_choice_validator_messages() {
        let validate = choice_validator(vec!["json".into(), "yaml".into()]);
        assert_eq!(validate("format", "yaml"), Ok("yaml".to_string()));
        assert_eq!(
            validate("format", "xml"),
            Err("option format's value of \"xml\" is not one of: json yaml".to_string())
        );

        let many = (0..10).map(|i| format!("c{i}")).collect();
        let validate = choice_validator(many);
        assert_eq!(
            validate("level", "c42"),
            Err("option level's value of \"c42\" is not one of the 10 valid choices".to_string())
        );
    }

    #[test]
    fn test_declaration_codes() {
        assert_eq!(DeclarationError::EmptyPositionalVarName.code(), 110);
        assert_eq!(DeclarationError::ReservedHelpName("help".into()).code(), 103);
        assert_eq!(
            DeclarationError::DuplicateLongName("x".into()).code(),
            E_INVALID_NAME
        );
    }
}
