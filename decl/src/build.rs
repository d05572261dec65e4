//! Turning a [`ParserDecl`] into a live parser, and reporting parse results.

use std::collections::BTreeMap;

use argspec_core::{
    Arg, ExitStrategy, Outcome, ParseError, Parser, ParserConfig, ParserSurface, SubCommandId,
    Value,
};
use serde::Serialize;

use crate::decl::{KindDecl, OptionDecl, ParserDecl};
use crate::error::{DeclError, Result};

/// A parser built from a declaration, with an untyped handle for every
/// declared option.
///
/// The parser always uses [`ExitStrategy::Return`]: help, version and errors
/// come back from [`parse`](Self::parse) instead of ending the process.
#[derive(Debug)]
pub struct Built {
    parser: Parser,
    /// Handles by long name, indexed like [`Parser::commands`].
    handles: Vec<BTreeMap<String, Arg<Value>>>,
}

/// What a parse produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Parsed,
    Help,
    Version,
}

/// One option's result in a [`ParseReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedValue {
    pub given: bool,
    pub value: Value,
}

/// A serializable summary of one parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub app_name: String,
    pub outcome: ReportOutcome,
    /// Help or version text, for those outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<String>,
    /// Every option of the active registry, by long name.
    pub options: BTreeMap<String, ReportedValue>,
    pub positionals: Vec<String>,
}

impl ParserDecl {
    /// Declares everything in this document on a fresh parser.
    ///
    /// Explicit short names are applied after all options of a registry
    /// exist, so an explicit short may take over a character that another
    /// option of the same registry only had by derivation, as long as that
    /// option also declares its own short (or `no_short`).
    ///
    /// # Errors
    ///
    /// Returns [`DeclError::Declaration`] for anything the parser rejects,
    /// including colliding short names, and [`DeclError::Invalid`] for
    /// contradictory settings such as `short` together with `no_short`.
    pub fn build(&self) -> Result<Built> {
        let mut parser = Parser::with_config(ParserConfig {
            exit: ExitStrategy::Return,
            ..self.config.clone()
        });
        parser.set_positional_var_name(&self.config.positional_var_name)?;

        let mut handles = vec![declare(&mut parser, None, &self.options)?];

        for sub in &self.subcommands {
            if sub.short.is_some() && sub.no_short {
                return Err(DeclError::Invalid(format!(
                    "subcommand {} sets both short and no_short",
                    sub.name
                )));
            }
            let id = parser.subcommand(&sub.name, &sub.help)?.id();
            if sub.short.is_some() || sub.no_short {
                parser.set_subcommand_short_name(id, None)?;
            }
            handles.push(declare(&mut parser, Some(id), &sub.options)?);
        }
        // Explicit subcommand shorts last, as for options.
        for (index, sub) in self.subcommands.iter().enumerate() {
            if let Some(short) = sub.short {
                let id = parser.commands()[index + 1].id();
                parser.set_subcommand_short_name(id, Some(short))?;
            }
        }

        parser.validate()?;
        tracing::debug!(
            app = %parser.config().app_name,
            subcommands = self.subcommands.len(),
            "built parser from declaration"
        );
        Ok(Built { parser, handles })
    }
}

fn declare(
    parser: &mut Parser,
    command: Option<SubCommandId>,
    decls: &[OptionDecl],
) -> Result<BTreeMap<String, Arg<Value>>> {
    let mut declared = Vec::with_capacity(decls.len());
    for decl in decls {
        if decl.short.is_some() && decl.no_short {
            return Err(DeclError::Invalid(format!(
                "option {} sets both short and no_short",
                decl.name
            )));
        }
        let registry = match command {
            Some(id) => parser.command_mut(id),
            None => parser.main_command(),
        };
        let help = decl.help.as_str();
        let name = decl.name.as_str();
        let arg = match &decl.kind {
            KindDecl::Flag => registry.flag(name, help)?.untyped(),
            KindDecl::Int { default, min, max } => match (min, max) {
                (None, None) => registry.int(name, help, *default)?.untyped(),
                _ => registry
                    .int_in_range(
                        name,
                        help,
                        min.unwrap_or(i64::MIN),
                        max.unwrap_or(i64::MAX),
                        *default,
                    )?
                    .untyped(),
            },
            KindDecl::Real { default, min, max } => match (min, max) {
                (None, None) => registry.real(name, help, *default)?.untyped(),
                _ => registry
                    .real_in_range(
                        name,
                        help,
                        min.unwrap_or(f64::MIN),
                        max.unwrap_or(f64::MAX),
                        *default,
                    )?
                    .untyped(),
            },
            KindDecl::Str { default, choices } if choices.is_empty() => {
                registry.string(name, help, default)?.untyped()
            }
            KindDecl::Str { default, choices } => {
                let choices: Vec<&str> = choices.iter().map(String::as_str).collect();
                registry.choice(name, help, default, &choices)?.untyped()
            }
            KindDecl::Strs => registry.strings(name, help)?.untyped(),
            KindDecl::Ints => registry.ints(name, help)?.untyped(),
            KindDecl::Reals => registry.reals(name, help)?.untyped(),
        };

        if decl.short.is_some() || decl.no_short {
            parser.set_short_name(&arg, None)?;
        }
        if let Some(count) = decl.value_count {
            parser.set_value_count(&arg, count)?;
        }
        if decl.allow_implicit {
            parser.set_allow_implicit(&arg, true)?;
        }
        if let Some(var_name) = &decl.var_name {
            parser.set_var_name(&arg, var_name)?;
        }
        parser.set_hidden(&arg, decl.hidden);
        parser.set_required(&arg, decl.required);
        declared.push((decl, arg));
    }

    for (decl, arg) in &declared {
        if let Some(short) = decl.short {
            parser.set_short_name(arg, Some(short))?;
        }
    }

    Ok(declared
        .into_iter()
        .map(|(decl, arg)| (decl.name.clone(), arg))
        .collect())
}

impl Built {
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Mutable access, e.g. to install a custom help renderer.
    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    pub fn surface(&self) -> ParserSurface {
        self.parser.surface()
    }

    /// The handle of option `name` in `subcommand`, or in the main registry
    /// when `subcommand` is `None`.
    pub fn handle(&self, subcommand: Option<&str>, name: &str) -> Option<Arg<Value>> {
        let index = match subcommand {
            None => 0,
            Some(sub) => self
                .parser
                .commands()
                .iter()
                .position(|command| !command.is_main() && command.name() == sub)?,
        };
        self.handles.get(index)?.get(name).copied()
    }

    /// The current value of an option, see [`handle`](Self::handle).
    pub fn value(&self, subcommand: Option<&str>, name: &str) -> Option<Value> {
        self.handle(subcommand, name)
            .map(|arg| self.parser.value(&arg))
    }

    /// Parses `args` and summarizes the result.
    ///
    /// Required options are checked after a successful parse.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of a failed parse or of a missing required
    /// option.
    pub fn parse<I, S>(&mut self, args: I) -> std::result::Result<ParseReport, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (outcome, text) = match self.parser.parse(args)? {
            Outcome::Parsed => {
                self.parser.check_required()?;
                (ReportOutcome::Parsed, None)
            }
            Outcome::Help(text) => (ReportOutcome::Help, Some(text)),
            Outcome::Version(text) => (ReportOutcome::Version, Some(text)),
        };
        Ok(self.report(outcome, text))
    }

    fn report(&self, outcome: ReportOutcome, text: Option<String>) -> ParseReport {
        let subcommand = self.parser.selected_subcommand();
        let options = if outcome == ReportOutcome::Parsed {
            let index = match subcommand {
                None => 0,
                Some(sub) => self
                    .parser
                    .commands()
                    .iter()
                    .position(|command| !command.is_main() && command.name() == sub)
                    .unwrap_or(0),
            };
            self.handles[index]
                .iter()
                .map(|(name, arg)| {
                    let reported = ReportedValue {
                        given: self.parser.given(arg),
                        value: self.parser.value(arg),
                    };
                    (name.clone(), reported)
                })
                .collect()
        } else {
            BTreeMap::new()
        };

        ParseReport {
            app_name: self.parser.config().app_name.clone(),
            outcome,
            text,
            subcommand: subcommand.map(str::to_string),
            options,
            positionals: self.parser.positionals().to_vec(),
        }
    }
}
