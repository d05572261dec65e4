use argspec_core::{
    Arg, DeclarationError, ExitStrategy, HelpRenderer, Outcome, ParseError, Parser,
    ParserConfig, ParserSurface, ValueCount,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Options of a line-counting tool, with a `special` subcommand.
struct LineCount {
    parser: Parser,
    language: Arg<Vec<String>>,
    skip_language: Arg<Vec<String>>,
    exclude: Arg<Vec<String>>,
    include: Arg<Vec<String>>,
    sort_by_lines: Arg<bool>,
    summary: Arg<bool>,
    max_width: Arg<i64>,
    extra: Arg<bool>,
    special_width: Arg<i64>,
}

fn line_count() -> LineCount {
    let mut parser = Parser::with_config(ParserConfig {
        app_name: "lc".to_string(),
        version: "1.0.0".to_string(),
        exit: ExitStrategy::Return,
        ..ParserConfig::default()
    });
    let language = parser.strings("language", "Languages to count").unwrap();
    let skip_language = parser.strings("skiplanguage", "Languages to skip").unwrap();
    parser.set_short_name(&skip_language, Some('L')).unwrap();
    let exclude = parser.strings("exclude", "Paths to exclude").unwrap();
    let include = parser.strings("include", "Paths to include").unwrap();
    let sort_by_lines = parser.flag("sortbylines", "Sort by lines").unwrap();
    let summary = parser.flag("summary", "Totals only").unwrap();
    parser.set_short_name(&summary, Some('S')).unwrap();
    let max_width = parser
        .int_in_range("maxwidth", "Widest line", 20, 10_000, 56)
        .unwrap();

    let special = parser.subcommand("special", "Special counting").unwrap();
    let extra = special.flag("extra", "Extra detail").unwrap();
    let special_width = special
        .int_in_range("maxwidth", "Widest line", 20, 10_000, 80)
        .unwrap();

    LineCount {
        parser,
        language,
        skip_language,
        exclude,
        include,
        sort_by_lines,
        summary,
        max_width,
        extra,
        special_width,
    }
}

fn words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

// ---------------------------------------------------------------------------
// Main registry
// ---------------------------------------------------------------------------

#[test]
fn test_mixed_options_and_double_dash() {
    let mut lc = line_count();
    let line = "-sS -l h red -e zOld t -L d -i peek -- file1.cpp file2.d";
    assert_eq!(lc.parser.parse(words(line)).unwrap(), Outcome::Parsed);

    let p = &lc.parser;
    assert_eq!(p.value(&lc.language), ["h", "red"]);
    assert_eq!(p.value(&lc.exclude), ["zOld", "t"]);
    assert_eq!(p.value(&lc.skip_language), ["d"]);
    assert_eq!(p.value(&lc.include), ["peek"]);
    assert_eq!(p.positionals(), ["file1.cpp", "file2.d"]);
    assert!(p.value(&lc.summary));
    assert!(p.value(&lc.sort_by_lines));
    assert_eq!(p.value(&lc.max_width), 56);
    assert!(!p.value(&lc.extra));
    assert_eq!(p.selected_subcommand(), None);
}

#[test]
fn test_single_value_then_positionals() {
    let mut lc = line_count();
    let line = "-S -l h red -e zOld t -L d -i peek -m 40 file1.cpp file2.d";
    lc.parser.parse(words(line)).unwrap();

    let p = &lc.parser;
    assert_eq!(p.value(&lc.skip_language), ["d"]);
    assert_eq!(p.value(&lc.max_width), 40);
    assert_eq!(p.positionals(), ["file1.cpp", "file2.d"]);
    assert!(!p.given(&lc.sort_by_lines));
}

#[test]
fn test_lists_swallow_trailing_words() {
    let mut lc = line_count();
    let line = "-l go h red -e zOld t test -s -L f77 asm -i peek unz";
    lc.parser.parse(words(line)).unwrap();

    let p = &lc.parser;
    assert_eq!(p.value(&lc.language), ["go", "h", "red"]);
    assert_eq!(p.value(&lc.exclude), ["zOld", "t", "test"]);
    assert_eq!(p.value(&lc.skip_language), ["f77", "asm"]);
    assert_eq!(p.value(&lc.include), ["peek", "unz"]);
    assert!(p.positionals().is_empty());
    assert!(p.value(&lc.sort_by_lines));
    assert!(!p.value(&lc.summary));
    assert_eq!(p.value(&lc.max_width), 56);
}

#[test]
fn test_attached_values() {
    let mut lc = line_count();
    lc.parser.parse(["-m60"]).unwrap();
    assert_eq!(lc.parser.value(&lc.max_width), 60);
    lc.parser.parse(["--maxwidth=25"]).unwrap();
    assert_eq!(lc.parser.value(&lc.max_width), 25);
    lc.parser.parse(["--maxwidth=99", "-S"]).unwrap();
    assert_eq!(lc.parser.value(&lc.max_width), 99);
    assert!(lc.parser.value(&lc.summary));
}

#[test]
fn test_option_missing_its_value() {
    let mut lc = line_count();
    for line in ["--maxwidth -s", "-m -S", "--maxwidth"] {
        let err = lc.parser.parse(words(line)).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongValueCount(
                "expected exactly one value for maxwidth, got none".to_string()
            ),
            "{line}"
        );
    }
}

#[test]
fn test_out_of_range() {
    let mut lc = line_count();
    let err = lc.parser.parse(["-m", "5"]).unwrap_err();
    assert_eq!(
        err.report(),
        "error #102: invalid value for maxwidth: option maxwidth's minimum is 20, got 5"
    );
}

#[test]
fn test_flag_followed_by_junk() {
    let mut lc = line_count();
    let err = lc.parser.parse(["-S4"]).unwrap_err();
    assert_eq!(err, ParseError::UnexpectedValue("4".to_string()));
    assert_eq!(err.code(), 107);
}

#[test]
fn test_unknown_options() {
    let mut lc = line_count();
    let err = lc.parser.parse(["--colour"]).unwrap_err();
    assert_eq!(err.report(), "error #106: unrecognized option --colour");
    let err = lc.parser.parse(["-q"]).unwrap_err();
    assert_eq!(err, ParseError::UnrecognizedOption("-q".to_string()));
}

#[test]
fn test_lone_dash_is_positional() {
    let mut lc = line_count();
    lc.parser.parse(["-S", "-"]).unwrap();
    assert_eq!(lc.parser.positionals(), ["-"]);
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[test]
fn test_subcommand_options() {
    let mut lc = line_count();
    lc.parser
        .parse(words("special -e -m98 file1.cpp file2.d"))
        .unwrap();

    let p = &lc.parser;
    assert_eq!(p.selected_subcommand(), Some("special"));
    assert!(p.value(&lc.extra));
    assert_eq!(p.value(&lc.special_width), 98);
    assert_eq!(p.value(&lc.max_width), 56);
    assert!(p.value(&lc.exclude).is_empty());
    assert!(!p.value(&lc.summary));
    assert_eq!(p.positionals(), ["file1.cpp", "file2.d"]);
}

#[test]
fn test_subcommand_by_short_name() {
    let mut lc = line_count();
    lc.parser.parse(["-S", "s", "-e"]).unwrap();
    assert!(lc.parser.value(&lc.summary));
    assert!(lc.parser.value(&lc.extra));
}

#[test]
fn test_second_subcommand_word_is_positional() {
    let mut lc = line_count();
    lc.parser.parse(["special", "special"]).unwrap();
    assert_eq!(lc.parser.positionals(), ["special"]);
}

#[test]
fn test_subcommand_help() {
    let mut lc = line_count();
    let Outcome::Help(text) = lc.parser.parse(["special", "--help"]).unwrap() else {
        panic!("expected help");
    };
    assert!(text.starts_with("usage: lc special [OPTIONS]"));
    assert!(text.contains("--extra"));
    assert!(!text.contains("--language"));

    let Outcome::Help(text) = lc.parser.parse(["help"]).unwrap() else {
        panic!("expected help");
    };
    assert!(text.contains("subcommands:"));
}

#[test]
fn test_version_only_in_main() {
    let mut lc = line_count();
    assert_eq!(
        lc.parser.parse(["-v"]).unwrap(),
        Outcome::Version("lc v1.0.0".to_string())
    );
    assert!(matches!(
        lc.parser.parse(["special", "--version"]),
        Err(ParseError::UnrecognizedOption(_))
    ));
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[test]
fn test_colliding_derived_short_names() {
    let mut parser = Parser::new("app");
    parser.set_exit_strategy(ExitStrategy::Return);
    parser.flag("summary", "").unwrap();
    parser.flag("sortbylines", "").unwrap();
    let err = parser.parse(["--summary"]).unwrap_err();
    assert_eq!(err.code(), 109);
    assert!(matches!(
        parser.validate(),
        Err(DeclarationError::DuplicateShortName { short: 's', .. })
    ));
}

#[test]
fn test_colliding_subcommand_short_names() {
    let mut parser = Parser::new("app");
    parser.set_exit_strategy(ExitStrategy::Return);
    parser.subcommand("build", "").unwrap();
    let bench = parser.subcommand("bench", "").unwrap().id();
    assert!(parser.validate().is_err());
    parser.set_subcommand_short_name(bench, Some('B')).unwrap();
    assert!(parser.validate().is_ok());
    parser.parse(["B"]).unwrap();
    assert_eq!(parser.selected_subcommand(), Some("bench"));
}

#[test]
fn test_reserved_and_invalid_names() {
    let mut parser = Parser::new("app");
    assert_eq!(
        parser.flag("help", "").unwrap_err().code(),
        103
    );
    assert_eq!(
        parser.int("version", "", 0).unwrap_err().code(),
        104
    );
    assert!(matches!(
        parser.subcommand("1st", ""),
        Err(DeclarationError::InvalidName { .. })
    ));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

struct Terse;

impl HelpRenderer for Terse {
    fn render(&self, surface: &ParserSurface, subcommand: Option<&str>) -> String {
        let names: Vec<&str> = match subcommand.and_then(|s| surface.find_subcommand(s)) {
            Some(sub) => sub.options.iter().map(|o| o.long_name.as_str()).collect(),
            None => surface.options.iter().map(|o| o.long_name.as_str()).collect(),
        };
        format!("{}: {}", surface.app_name, names.join(","))
    }
}

#[test]
fn test_custom_renderer() {
    let mut lc = line_count();
    lc.parser.set_renderer(Terse);
    assert_eq!(
        lc.parser.parse(["-h"]).unwrap(),
        Outcome::Help(
            "lc: language,skiplanguage,exclude,include,sortbylines,summary,maxwidth".to_string()
        )
    );
}

#[test]
fn test_surface_serializes() {
    let mut parser = Parser::new("app");
    parser.set_positional_count(ValueCount::OneOrMore);
    let level = parser.int("level", "Detail level", 1).unwrap();
    parser.set_allow_implicit(&level, true).unwrap();
    parser.set_var_name(&level, "N").unwrap();

    let json = serde_json::to_value(parser.surface()).unwrap();
    assert_eq!(json["options"][0]["arity"], "[N]");
    assert_eq!(json["options"][0]["value_count"], "zero_or_one");
    assert_eq!(json["positionals"]["arity"], "<FILE1> [FILE2 ...]");
    assert_eq!(json["help_option"]["short_name"], "h");
}
