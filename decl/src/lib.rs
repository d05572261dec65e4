//! Declarative front end for `argspec-core` parsers.
//!
//! A whole parser (settings, options, subcommands) can be described in a
//! YAML or JSON document, loaded into a [`ParserDecl`], and built into a
//! live [`Built`] parser that reports every parse as a serializable
//! [`ParseReport`].
//!
//! # Example
//!
//! ```
//! use argspec_decl::{ParserDecl, ReportOutcome};
//! use argspec_core::Value;
//!
//! let decl = ParserDecl::from_yaml_str(r#"
//! app_name: uxfcompare
//! positional_count: two
//! positional_var_name: UXF
//! options:
//!   - name: equivalent
//!     help: Compare for equivalence
//! "#).unwrap();
//!
//! let mut built = decl.build().unwrap();
//! let report = built.parse(["-e", "a.uxf", "b.uxf"]).unwrap();
//! assert_eq!(report.outcome, ReportOutcome::Parsed);
//! assert_eq!(report.options["equivalent"].value, Value::Flag(true));
//! assert_eq!(report.positionals, ["a.uxf", "b.uxf"]);
//! ```

mod build;
mod decl;
mod error;
mod output;

pub use build::{Built, ParseReport, ReportOutcome, ReportedValue};
pub use decl::{KindDecl, OptionDecl, ParserDecl, SubCommandDecl};
pub use error::{DeclError, Result};
pub use output::{OutputFormat, format_report, format_surface};
