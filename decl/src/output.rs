//! Output formatting for parse reports and parser surfaces.

use argspec_core::{OptionSurface, ParserSurface};

use crate::build::{ParseReport, ReportOutcome};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats a parser surface in the requested output format.
pub fn format_surface(surface: &ParserSurface, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(surface)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(surface).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(surface_to_markdown(surface)),
        OutputFormat::Table => Ok(surface_to_table(surface)),
    }
}

fn outcome_name(outcome: ReportOutcome) -> &'static str {
    match outcome {
        ReportOutcome::Parsed => "parsed",
        ReportOutcome::Help => "help",
        ReportOutcome::Version => "version",
    }
}

fn report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Parse Report: {}\n\n", report.app_name));
    out.push_str(&format!("- **Outcome:** {}\n", outcome_name(report.outcome)));
    if let Some(ref sub) = report.subcommand {
        out.push_str(&format!("- **Subcommand:** {sub}\n"));
    }

    if let Some(ref text) = report.text {
        out.push_str(&format!("\n```text\n{text}\n```\n"));
    }

    if !report.options.is_empty() {
        out.push_str("\n## Options\n\n");
        out.push_str("| Option | Given | Value |\n");
        out.push_str("|--------|-------|-------|\n");
        for (name, reported) in &report.options {
            let given = if reported.given { "yes" } else { "no" };
            out.push_str(&format!("| `--{name}` | {given} | {} |\n", reported.value));
        }
    }

    if !report.positionals.is_empty() {
        out.push_str("\n## Positionals\n\n");
        for positional in &report.positionals {
            out.push_str(&format!("- `{positional}`\n"));
        }
    }

    out
}

fn report_to_table(report: &ParseReport) -> String {
    let mut out = String::new();

    if let Some(ref text) = report.text {
        out.push_str(text);
        out.push('\n');
        return out;
    }

    out.push_str(&format!(
        "App: {}  Outcome: {}",
        report.app_name,
        outcome_name(report.outcome)
    ));
    if let Some(ref sub) = report.subcommand {
        out.push_str(&format!("  Subcommand: {sub}"));
    }
    out.push('\n');

    if !report.options.is_empty() {
        out.push_str("\nOptions:\n");
        let max_name = report
            .options
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(4);
        for (name, reported) in &report.options {
            let given = if reported.given { "given" } else { "-" };
            out.push_str(&format!(
                "  {:<width$}  {given:<5}  {}\n",
                name,
                reported.value,
                width = max_name
            ));
        }
    }

    if !report.positionals.is_empty() {
        out.push_str("\nPositionals:\n");
        for positional in &report.positionals {
            out.push_str(&format!("  {positional}\n"));
        }
    }

    out
}

fn options_markdown(out: &mut String, options: &[OptionSurface]) {
    out.push_str("| Option | Arity | Default | Description |\n");
    out.push_str("|--------|-------|---------|-------------|\n");
    for option in options {
        let name = match option.short_name {
            Some(short) => format!("-{short}, --{}", option.long_name),
            None => format!("--{}", option.long_name),
        };
        let default = option.default.as_deref().unwrap_or("");
        let required = if option.required { " (required)" } else { "" };
        out.push_str(&format!(
            "| `{name}` | {} | {default} | {}{required} |\n",
            option.arity, option.help
        ));
    }
    out.push('\n');
}

fn surface_to_markdown(surface: &ParserSurface) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", surface.app_name));

    if !surface.description.is_empty() {
        out.push_str(&format!("{}\n\n", surface.description));
    }

    if let Some(ref version) = surface.version {
        out.push_str(&format!("**Version:** {version}\n\n"));
    }

    if !surface.positionals.arity.is_empty() {
        out.push_str("## Arguments\n\n");
        out.push_str(&format!(
            "`{}` {}\n\n",
            surface.positionals.arity, surface.positionals.help
        ));
    }

    if !surface.options.is_empty() {
        out.push_str("## Options\n\n");
        options_markdown(&mut out, &surface.options);
    }

    if !surface.subcommands.is_empty() {
        out.push_str("## Subcommands\n\n");
        out.push_str("| Subcommand | Description |\n");
        out.push_str("|------------|-------------|\n");
        for sub in &surface.subcommands {
            out.push_str(&format!("| `{}` | {} |\n", sub.name, sub.help));
        }
        out.push('\n');

        for sub in surface.subcommands.iter().filter(|s| !s.options.is_empty()) {
            out.push_str(&format!("### {}\n\n", sub.name));
            options_markdown(&mut out, &sub.options);
        }
    }

    out
}

fn surface_to_table(surface: &ParserSurface) -> String {
    let mut out = String::new();

    out.push_str(&format!("App: {}", surface.app_name));
    if let Some(ref version) = surface.version {
        out.push_str(&format!("  Version: {version}"));
    }
    out.push('\n');

    if !surface.description.is_empty() {
        out.push_str(&format!("  {}\n", surface.description));
    }

    if !surface.options.is_empty() {
        out.push_str("\nOptions:\n");
        let labels: Vec<String> = surface.options.iter().map(OptionSurface::label).collect();
        let max_name = labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(4);
        for (label, option) in labels.iter().zip(&surface.options) {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                label,
                option.help,
                width = max_name
            ));
        }
    }

    if !surface.subcommands.is_empty() {
        out.push_str("\nSubcommands:\n");
        let max_name = surface
            .subcommands
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(4);

        for sub in &surface.subcommands {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                sub.name,
                sub.help,
                width = max_name
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserDecl;

    const DECL: &str = r#"
app_name: lc
version: "1.0.0"
description: Counts lines.
options:
  - name: language
    help: Languages to count
    kind: { type: strs }
  - name: maxwidth
    help: Widest line
    kind: { type: int, default: 56 }
subcommands:
  - name: special
    help: Special counting
    options:
      - name: extra
        help: Extra detail
"#;

    fn sample_report() -> ParseReport {
        let mut built = ParserDecl::from_yaml_str(DECL).unwrap().build().unwrap();
        built.parse(["-l", "go", "rs", "-m", "80", "--", "a.rs"]).unwrap()
    }

    #[test]
    fn test_format_report_json() {
        let json = format_report(&sample_report(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"outcome\": \"parsed\""));
        assert!(json.contains("\"value\": 80"));
        assert!(!json.contains("\"subcommand\""));
    }

    #[test]
    fn test_format_report_yaml() {
        let yaml = format_report(&sample_report(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("app_name: lc"));
        assert!(yaml.contains("- a.rs"));
    }

    #[test]
    fn test_format_report_markdown() {
        let md = format_report(&sample_report(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Parse Report: lc"));
        assert!(md.contains("**Outcome:** parsed"));
        assert!(md.contains("| `--language` | yes | go rs |"));
        assert!(md.contains("- `a.rs`"));
    }

    #[test]
    fn test_format_report_table() {
        let table = format_report(&sample_report(), OutputFormat::Table).unwrap();
        assert!(table.starts_with("App: lc  Outcome: parsed\n"));
        assert!(table.contains("  maxwidth  given  80"));
        assert!(table.contains("Positionals:\n  a.rs"));
    }

    #[test]
    fn test_format_report_table_help_is_text() {
        let mut built = ParserDecl::from_yaml_str(DECL).unwrap().build().unwrap();
        let report = built.parse(["-v"]).unwrap();
        let table = format_report(&report, OutputFormat::Table).unwrap();
        assert_eq!(table, "lc v1.0.0\n");
    }

    #[test]
    fn test_format_surface_markdown() {
        let built = ParserDecl::from_yaml_str(DECL).unwrap().build().unwrap();
        let md = format_surface(&built.surface(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# lc"));
        assert!(md.contains("**Version:** 1.0.0"));
        assert!(md.contains("`-m, --maxwidth`"));
        assert!(md.contains("| `special` | Special counting |"));
        assert!(md.contains("### special"));
    }

    #[test]
    fn test_format_surface_table() {
        let built = ParserDecl::from_yaml_str(DECL).unwrap().build().unwrap();
        let table = format_surface(&built.surface(), OutputFormat::Table).unwrap();
        assert!(table.contains("App: lc  Version: 1.0.0"));
        let row = table
            .lines()
            .find(|line| line.contains("--maxwidth"))
            .unwrap();
        assert!(row.starts_with("  -m, --maxwidth MAXWIDTH "));
        assert!(row.ends_with("  Widest line"));
        assert!(table.contains("  special  Special counting"));
    }

    #[test]
    fn test_table_columns_align_for_non_ascii_names() {
        let decl = ParserDecl::from_yaml_str(
            r#"
app_name: img
options:
  - name: größe
    help: Target size
    kind: { type: int, default: 1 }
  - name: width
    short: W
    help: Target width
    kind: { type: int, default: 1 }
"#,
        )
        .unwrap();
        let mut built = decl.build().unwrap();

        let report = built.parse(["-g", "2"]).unwrap();
        let table = format_report(&report, OutputFormat::Table).unwrap();
        assert!(table.contains("  größe  given  2\n"));
        assert!(table.contains("  width  -      1\n"));

        let table = format_surface(&built.surface(), OutputFormat::Table).unwrap();
        let columns: Vec<usize> = table
            .lines()
            .filter(|line| line.contains("Target"))
            .filter_map(|line| line.find("Target").map(|at| line[..at].chars().count()))
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_format_surface_json() {
        let built = ParserDecl::from_yaml_str(DECL).unwrap().build().unwrap();
        let json = format_surface(&built.surface(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"app_name\": \"lc\""));
    }
}
