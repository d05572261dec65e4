//! Help text rendering.
//!
//! The parser never formats help itself: it builds a [`ParserSurface`] and
//! hands it to a [`HelpRenderer`]. [`PlainHelp`] is the default, producing
//! unwrapped, uncoloured text.

use crate::surface::{OptionSurface, ParserSurface};

/// Turns a parser surface into help text.
///
/// `subcommand` names the selected subcommand when help was requested after
/// one, and is `None` for the main help.
pub trait HelpRenderer: Send + Sync {
    fn render(&self, surface: &ParserSurface, subcommand: Option<&str>) -> String;
}

/// Plain two-column help text.
///
/// # Examples
///
/// ```
/// use argspec_core::{HelpRenderer, Parser, PlainHelp};
///
/// let mut parser = Parser::new("app");
/// parser.flag("all", "Show everything").unwrap();
/// let text = PlainHelp.render(&parser.surface(), None);
/// assert!(text.starts_with("usage: app [OPTIONS]"));
/// assert!(text.contains("  -a, --all   Show everything"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHelp;

impl HelpRenderer for PlainHelp {
    fn render(&self, surface: &ParserSurface, subcommand: Option<&str>) -> String {
        let mut sections: Vec<String> = Vec::new();

        let selected = subcommand.and_then(|name| surface.find_subcommand(name));
        let mut usage = format!("usage: {}", surface.app_name);
        if let Some(selected) = selected {
            usage.push(' ');
            usage.push_str(&selected.name);
        }
        usage.push_str(" [OPTIONS]");
        if selected.is_none() && !surface.subcommands.is_empty() {
            usage.push_str(" [SUBCOMMAND [OPTIONS]]");
        }
        if !surface.positionals.arity.is_empty() {
            usage.push(' ');
            usage.push_str(&surface.positionals.arity);
        }
        sections.push(usage);

        let description = match selected {
            Some(selected) => selected.help.as_str(),
            None => surface.description.as_str(),
        };
        if !description.is_empty() {
            sections.push(description.to_string());
        }

        if !surface.positionals.arity.is_empty() {
            let rows = vec![(
                surface.positionals.arity.clone(),
                surface.positionals.help.clone(),
            )];
            sections.push(table("positional arguments:", &rows));
        }

        let mut options: Vec<&OptionSurface> = Vec::new();
        match selected {
            Some(selected) => {
                options.push(&selected.help_option);
                options.extend(&selected.options);
            }
            None => {
                options.push(&surface.help_option);
                options.extend(&surface.version_option);
                options.extend(&surface.options);
            }
        }
        let rows: Vec<(String, String)> = options
            .into_iter()
            .map(|option| (option.label(), option_help(option)))
            .collect();
        sections.push(table("optional arguments:", &rows));

        if selected.is_none() && !surface.subcommands.is_empty() {
            let rows: Vec<(String, String)> = surface
                .subcommands
                .iter()
                .map(|sub| {
                    let label = match sub.short_name {
                        Some(short) => format!("{short}, {}", sub.name),
                        None => sub.name.clone(),
                    };
                    (label, sub.help.clone())
                })
                .collect();
            sections.push(table("subcommands:", &rows));
        }

        if selected.is_none() && !surface.end_notes.is_empty() {
            sections.push(surface.end_notes.clone());
        }

        sections.join("\n\n")
    }
}

fn option_help(option: &OptionSurface) -> String {
    let mut help = option.help.clone();
    if let Some(default) = &option.default {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("[default: {default}]"));
    }
    if option.required {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str("(required)");
    }
    help
}

fn table(title: &str, rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::from(title);
    for (label, help) in rows {
        out.push('\n');
        if help.is_empty() {
            out.push_str(&format!("  {label}"));
        } else {
            out.push_str(&format!("  {label:<width$}  {help}"));
        }
    }
    out
}
