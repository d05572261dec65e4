use std::path::{Path, PathBuf};

use argspec_core::{ExitStrategy, Parser as ArgParser};
use argspec_decl::{Built, ParserDecl, format_report, format_surface};
use clap::{Args, Parser, Subcommand};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

impl From<CliOutputFormat> for argspec_decl::OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argspec", version = PACKAGE_VERSION)]
#[command(about = "Check, describe and try out declarative argument parsers")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, argspec_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a declaration file and report whether it builds.
    Check(CheckArgs),
    /// Show the options, positionals and subcommands a declaration defines.
    Describe(DescribeArgs),
    /// Parse an argument list against a declaration and print the result.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Declaration files (.yaml, .yml or .json).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Declaration file.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
    /// Print the parser's own help text instead of a description.
    #[arg(long)]
    help_text: bool,
    /// Subcommand whose help text to print, with --help-text.
    #[arg(long, requires = "help_text")]
    subcommand: Option<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Declaration file.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Whitespace-separated argument line, instead of arguments after `--`.
    #[arg(long, conflicts_with = "args")]
    line: Option<String>,
    /// Let the declared parser print help, version and errors itself and exit.
    #[arg(long)]
    terminate: bool,
    /// Arguments to parse.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Describe(args) => run_describe(args),
        Command::Parse(args) => run_parse(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_built(path: &Path) -> Result<Built, String> {
    let decl = ParserDecl::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    decl.build()
        .map_err(|err| format!("Failed to build '{}': {err}", path.display()))
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failures = 0usize;
    for path in &args.inputs {
        match load_built(path) {
            Ok(built) => {
                let parser = built.parser();
                let options: usize = parser.commands().iter().map(|c| c.options().len()).sum();
                println!(
                    "ok: {} ({} options, {} subcommands)",
                    path.display(),
                    options,
                    parser.commands().len() - 1
                );
            }
            Err(err) => {
                eprintln!("{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{failures} of {} declarations failed",
            args.inputs.len()
        ));
    }
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let built = load_built(&args.input)?;

    if args.help_text {
        let parser = built.parser();
        if let Some(name) = &args.subcommand {
            if !parser.commands().iter().any(|c| !c.is_main() && c.name() == name) {
                return Err(format!("unknown subcommand '{name}'"));
            }
        }
        println!("{}", parser.help_text(args.subcommand.as_deref()));
        return Ok(());
    }

    let output = format_surface(&built.surface(), args.format.into())?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let mut built = load_built(&args.input)?;
    let argv: Vec<String> = match &args.line {
        Some(line) => line.split_whitespace().map(str::to_string).collect(),
        None => args.args.clone(),
    };
    tracing::debug!(input = %args.input.display(), args = ?argv, "parsing");

    if args.terminate {
        return run_parse_terminating(built.parser_mut(), &argv);
    }

    match built.parse(&argv) {
        Ok(report) => {
            let output = format_report(&report, args.format.into())?;
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.report());
            std::process::exit(2);
        }
    }
}

/// Hands the exit decision to the declared parser: help and version go to
/// stdout with status 0, errors to stderr with status 2.
fn run_parse_terminating(parser: &mut ArgParser, argv: &[String]) -> Result<(), String> {
    parser.set_exit_strategy(ExitStrategy::Terminate);
    if parser.parse(argv).is_ok() && parser.check_required().is_ok() {
        let values: Vec<String> = parser
            .values()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("{}", values.join(" "));
        if !parser.positionals().is_empty() {
            println!("{}", parser.positionals().join(" "));
        }
    }
    Ok(())
}
