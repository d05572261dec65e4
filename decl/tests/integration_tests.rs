use std::path::PathBuf;

use argspec_core::{ParseError, Value, ValueCount};
use argspec_decl::{
    DeclError, KindDecl, OptionDecl, OutputFormat, ParserDecl, ReportOutcome, format_report,
    format_surface,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_fixture() {
    let decl = ParserDecl::load(&fixture("linecount.yaml")).unwrap();
    assert_eq!(decl.config.app_name, "lc");
    assert_eq!(decl.options.len(), 7);
    assert_eq!(decl.subcommands.len(), 1);
    assert_eq!(decl.subcommands[0].options.len(), 2);
}

#[test]
fn test_load_json_fixture() {
    let decl = ParserDecl::load(&fixture("uxfcompare.json")).unwrap();
    assert_eq!(decl.config.positional_count, ValueCount::Two);
    assert_eq!(decl.config.positional_var_name, "UXF");
    assert!(decl.options[2].no_short);
    assert_eq!(decl.options[3].kind, KindDecl::Ints);
}

#[test]
fn test_yaml_with_json_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lc.json");
    std::fs::copy(fixture("linecount.yaml"), &path).unwrap();
    assert!(matches!(ParserDecl::load(&path), Err(DeclError::Json(_))));
}

// ---------------------------------------------------------------------------
// Parsing through a built declaration
// ---------------------------------------------------------------------------

#[test]
fn test_linecount_mixed_line() {
    let mut built = ParserDecl::load(&fixture("linecount.yaml"))
        .unwrap()
        .build()
        .unwrap();
    let report = built
        .parse("-sS -l h red -e zOld t -L d -i peek -- file1.cpp file2.d".split_whitespace())
        .unwrap();

    assert_eq!(report.outcome, ReportOutcome::Parsed);
    assert_eq!(report.subcommand, None);
    assert_eq!(
        report.options["language"].value,
        Value::StrList(vec!["h".into(), "red".into()])
    );
    assert_eq!(report.options["summary"].value, Value::Flag(true));
    assert!(!report.options["maxwidth"].given);
    assert_eq!(report.options["maxwidth"].value, Value::Int(56));
    assert_eq!(report.positionals, ["file1.cpp", "file2.d"]);
}

#[test]
fn test_linecount_subcommand_report() {
    let mut built = ParserDecl::load(&fixture("linecount.yaml"))
        .unwrap()
        .build()
        .unwrap();
    let report = built.parse(["s", "-e", "-m98", "a.rs"]).unwrap();

    assert_eq!(report.subcommand.as_deref(), Some("special"));
    assert_eq!(report.options.len(), 2);
    assert_eq!(report.options["maxwidth"].value, Value::Int(98));
    assert_eq!(report.options["extra"].value, Value::Flag(true));
    assert_eq!(built.value(None, "maxwidth"), Some(Value::Int(56)));
}

#[test]
fn test_linecount_errors_carry_codes() {
    let mut built = ParserDecl::load(&fixture("linecount.yaml"))
        .unwrap()
        .build()
        .unwrap();
    let err = built.parse(["-m", "5"]).unwrap_err();
    assert_eq!(err.code(), 102);
    let err = built.parse(["--colour"]).unwrap_err();
    assert_eq!(err.report(), "error #106: unrecognized option --colour");
}

#[test]
fn test_uxfcompare_positional_policy() {
    let mut built = ParserDecl::load(&fixture("uxfcompare.json"))
        .unwrap()
        .build()
        .unwrap();

    let report = built
        .parse(["-f", "json", "--tolerance", "a.uxf", "b.uxf"])
        .unwrap();
    assert_eq!(report.options["format"].value, Value::Str("json".into()));
    assert!(report.options["tolerance"].given);
    assert_eq!(report.options["tolerance"].value, Value::Real(0.0));
    assert_eq!(report.positionals, ["a.uxf", "b.uxf"]);

    let err = built.parse(["a.uxf"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::WrongPositionalCount {
            expected: ValueCount::Two,
            got: 1
        }
    );

    let err = built.parse(["-f", "xml", "a.uxf", "b.uxf"]).unwrap_err();
    assert_eq!(err.code(), 102);
}

#[test]
fn test_uxfcompare_hidden_option_parses_but_is_not_shown() {
    let mut built = ParserDecl::load(&fixture("uxfcompare.json"))
        .unwrap()
        .build()
        .unwrap();
    let report = built.parse(["-c", "1", "3", "a.uxf", "b.uxf"]).unwrap();
    assert_eq!(report.options["columns"].value, Value::IntList(vec![1, 3]));

    let surface = built.surface();
    assert!(surface.options.iter().all(|o| o.long_name != "columns"));
    let tolerance = surface
        .options
        .iter()
        .find(|o| o.long_name == "tolerance")
        .unwrap();
    assert_eq!(tolerance.short_name, None);
    assert_eq!(tolerance.arity, "[EPS]");
}

// ---------------------------------------------------------------------------
// Declaration errors
// ---------------------------------------------------------------------------

#[test]
fn test_reserved_option_name() {
    let decl = ParserDecl {
        options: vec![OptionDecl::flag("help")],
        ..ParserDecl::default()
    };
    let err = decl.build().unwrap_err();
    assert_eq!(err.code(), Some(103));
    assert!(err.to_string().starts_with("declaration error #103:"));
}

#[test]
fn test_empty_var_name() {
    let mut level = OptionDecl::new(
        "level",
        KindDecl::Int {
            default: 0,
            min: None,
            max: None,
        },
    );
    level.var_name = Some(String::new());
    let decl = ParserDecl {
        options: vec![level],
        ..ParserDecl::default()
    };
    assert_eq!(decl.build().unwrap_err().code(), Some(105));
}

#[test]
fn test_empty_positional_var_name() {
    let mut decl = ParserDecl::default();
    decl.config.positional_var_name = String::new();
    assert_eq!(decl.build().unwrap_err().code(), Some(110));
}

#[test]
fn test_bad_choice_default() {
    let decl = ParserDecl::from_yaml_str(
        "options:\n  - name: format\n    kind: { type: str, default: xml, choices: [text, json] }\n",
    )
    .unwrap();
    assert!(matches!(decl.build(), Err(DeclError::Declaration(_))));
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[test]
fn test_report_and_surface_formats() {
    let mut built = ParserDecl::load(&fixture("linecount.yaml"))
        .unwrap()
        .build()
        .unwrap();
    let report = built.parse(["special", "-e"]).unwrap();

    let json = format_report(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["subcommand"], "special");
    assert_eq!(value["options"]["extra"]["given"], true);

    let table = format_report(&report, OutputFormat::Table).unwrap();
    assert!(table.contains("Subcommand: special"));

    let yaml = format_surface(&built.surface(), OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("app_name: lc"));
    assert!(yaml.contains("name: special"));
}
