//! The tokenizer: raw arguments in, classified tokens out.
//!
//! Classification needs the active registry's name tables, which change when
//! a subcommand is selected, so the tokenizer owns the switch. It also marks
//! options as given the moment their names are recognized. Everything else
//! (binding values, routing positionals, checking counts) is left to the
//! parser, which walks the finished token list once.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::option::{OptionId, OptionKind};
use crate::registry::SubCommand;

/// One classified argument, or one part of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An option name (`--width`, or `-w` within a cluster) and its option.
    Name { text: String, option: OptionId },
    /// A value. `attached` values came in the same argument as an option name
    /// (`--width=9`, `-w=9`, `-w9`) and can only belong to that option.
    Value { text: String, attached: bool },
    /// The `--` marker: everything after it is positional.
    PositionalsFollow,
    /// A help request. Always the last token.
    Help,
    /// A version request. Always the last token.
    Version,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { text, .. } => write!(f, "name {text}"),
            Self::Value { text, attached } if *attached => write!(f, "attached value {text:?}"),
            Self::Value { text, .. } => write!(f, "value {text:?}"),
            Self::PositionalsFollow => f.write_str("--"),
            Self::Help => f.write_str("help"),
            Self::Version => f.write_str("version"),
        }
    }
}

/// The tokens for one argument vector plus the registry left active.
#[derive(Debug)]
pub(crate) struct Tokenized {
    pub(crate) active: usize,
    pub(crate) tokens: Vec<Token>,
}

pub(crate) struct Tokenizer<'a> {
    commands: &'a mut [SubCommand],
    help_name: &'a str,
    version_name: Option<&'a str>,
    active: usize,
    selected: bool,
    longs: HashMap<String, usize>,
    shorts: HashMap<char, usize>,
    short_help: bool,
    version_short: Option<char>,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    /// `version_name` is `None` when the parser has no version.
    pub(crate) fn new(
        commands: &'a mut [SubCommand],
        help_name: &'a str,
        version_name: Option<&'a str>,
    ) -> Self {
        let mut tokenizer = Self {
            commands,
            help_name,
            version_name,
            active: 0,
            selected: false,
            longs: HashMap::new(),
            shorts: HashMap::new(),
            short_help: true,
            version_short: None,
            tokens: Vec::new(),
        };
        tokenizer.activate(0);
        tokenizer
    }

    /// Makes `index` the active registry and rebuilds the name tables.
    fn activate(&mut self, index: usize) {
        let command = &self.commands[index];
        let (longs, shorts) = command.name_tables();
        self.longs = longs;
        self.shorts = shorts;
        self.short_help = !self.shorts.contains_key(&'h');
        self.version_short = match self.version_name {
            Some(_) if index == 0 => ['v', 'V'].into_iter().find(|c| !self.shorts.contains_key(c)),
            _ => None,
        };
        self.active = index;
    }

    pub(crate) fn tokenize(mut self, args: &[String]) -> Result<Tokenized, ParseError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if self.is_help(arg) {
                self.push(Token::Help);
                break;
            }
            if self.is_version(arg) {
                self.push(Token::Version);
                break;
            }
            if arg == "--" {
                self.push(Token::PositionalsFollow);
                for rest in args.by_ref() {
                    self.push_value(rest, false);
                }
                break;
            }
            if let Some(body) = arg.strip_prefix("--") {
                self.long_option(body)?;
                continue;
            }
            if arg.len() > 1 && arg.starts_with('-') && !looks_numeric(arg) {
                self.short_cluster(&arg[1..])?;
                continue;
            }
            if !self.selected && self.commands.len() > 1 {
                if arg == self.help_name {
                    self.push(Token::Help);
                    break;
                }
                if let Some(index) = self.find_subcommand(arg) {
                    debug!(subcommand = %self.commands[index].name(), "selected subcommand");
                    self.selected = true;
                    self.activate(index);
                    continue;
                }
            }
            self.push_value(arg, false);
        }

        Ok(Tokenized {
            active: self.active,
            tokens: self.tokens,
        })
    }

    fn is_help(&self, arg: &str) -> bool {
        (self.short_help && arg == "-h")
            || arg
                .strip_prefix("--")
                .is_some_and(|name| name == self.help_name)
    }

    fn is_version(&self, arg: &str) -> bool {
        let Some(version_name) = self.version_name else {
            return false;
        };
        if self.active != 0 {
            return false;
        }
        if arg.strip_prefix("--").is_some_and(|name| name == version_name) {
            return true;
        }
        let mut chars = arg.chars();
        chars.next() == Some('-') && chars.next() == self.version_short && chars.next().is_none()
    }

    /// `--name` or `--name=value`, prefix already stripped.
    fn long_option(&mut self, body: &str) -> Result<(), ParseError> {
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some(&index) = self.longs.get(name) else {
            return Err(ParseError::UnrecognizedOption(format!("--{name}")));
        };
        self.push_name(format!("--{name}"), index);
        if let Some(value) = value {
            self.push_value(value, true);
        }
        Ok(())
    }

    /// A cluster such as `vxc`, `oVALUE`, `o=VALUE` or `vo=VALUE`, dash
    /// already stripped.
    fn short_cluster(&mut self, body: &str) -> Result<(), ParseError> {
        // An empty `=` value counts as no value at all.
        let (text, pending) = match body.split_once('=') {
            Some((text, pending)) => (text, Some(pending).filter(|p| !p.is_empty())),
            None => (body, None),
        };
        if text.is_empty() {
            return Err(ParseError::UnrecognizedOption(format!("-{body}")));
        }

        for (at, c) in text.char_indices() {
            trace!(short = %c, rest = &text[at..], "scanning short cluster");
            let Some(&index) = self.shorts.get(&c) else {
                if at == 0 || pending.is_some() {
                    return Err(ParseError::UnrecognizedOption(format!("-{c}")));
                }
                return Err(ParseError::UnexpectedValue(text[at..].to_string()));
            };
            self.push_name(format!("-{c}"), index);

            let rest = &text[at + c.len_utf8()..];
            let is_flag = matches!(
                self.commands[self.active].options()[index].kind,
                OptionKind::Flag { .. }
            );
            if !is_flag && !rest.is_empty() {
                self.push_value(rest, true);
                break;
            }
        }

        if let Some(pending) = pending {
            self.push_value(pending, true);
        }
        Ok(())
    }

    fn find_subcommand(&self, arg: &str) -> Option<usize> {
        let mut chars = arg.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };
        self.commands
            .iter()
            .skip(1)
            .position(|command| {
                command.name() == arg || (single.is_some() && command.short_name() == single)
            })
            .map(|position| position + 1)
    }

    fn push_name(&mut self, text: String, index: usize) {
        self.commands[self.active].options_mut()[index].mark_given();
        let option = OptionId {
            command: self.active,
            index,
        };
        self.push(Token::Name { text, option });
    }

    fn push_value(&mut self, text: &str, attached: bool) {
        self.push(Token::Value {
            text: text.to_string(),
            attached,
        });
    }

    fn push(&mut self, token: Token) {
        debug!(%token, "token");
        self.tokens.push(token);
    }
}

/// Negative-number guard: anything that parses as an integer or a real
/// (`-5`, `-2.5`, `-1e3`, `-inf`, `-NaN`) is a value, not a cluster.
fn looks_numeric(arg: &str) -> bool {
    arg.parse::<i64>().is_ok() || arg.parse::<f64>().is_ok()
}
