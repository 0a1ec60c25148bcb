//! Multi-line sessions through LogParser
//!
//! Directives apply in line order, and a failed line never stops the lines
//! after it.

use readlog::readlog::config::{Config, Loader, OverlapPolicy};
use readlog::readlog::item::CustomValue;
use readlog::readlog::testing::assert_item;
use readlog::{ErrorKind, LogParser};

fn parser() -> LogParser {
    LogParser::new(Config::defaults().unwrap()).unwrap()
}

const LOG: &str = r"\ Reading log
📕Jane Doe - First|Lexpub 0141439556|2022/01/01|2022/01/10
\ {custom_columns: [{name: price, kind: numeric}]}
|📕Second|Libby|2022/02/01|2022/02/03|||||12.5
\Fiction: 📕Planned One 🔊Planned Two
";

#[test]
fn test_directive_adds_custom_column_to_later_rows_only() {
    let report = parser().parse_str(LOG);
    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(report.items.len(), 4);

    assert!(report.items[0].custom.is_empty());
    assert_item(&report.items[1])
        .title("Second")
        .custom("price", Some(CustomValue::Number(12.5)));
    assert_item(&report.items[2])
        .title("Planned One")
        .custom("price", None);
}

#[test]
fn test_errors_are_reported_with_line_numbers() {
    let report = parser().parse_str("📕One\n\n📕Dup, 🔊Dup\n|📕Two|||||10x\n📕Three\n");
    assert_eq!(report.items.len(), 2);

    let lines: Vec<(usize, ErrorKind)> = report
        .errors
        .iter()
        .map(|e| (e.line_number, e.error.kind()))
        .collect();
    assert_eq!(
        lines,
        vec![
            (3, ErrorKind::DuplicateIdentifier),
            (4, ErrorKind::UnparsableExplicitValue)
        ]
    );
    assert_eq!(report.errors[1].line, "|📕Two|||||10x");
}

#[test]
fn test_out_of_range_duration_fails_only_its_line() {
    let report = parser().parse_str("📕One\n|📕Two|Libby 99999999:00\n📕Three\n");
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line_number, 2);
    assert_eq!(
        report.errors[0].error.kind(),
        ErrorKind::UnparsableExplicitValue
    );
}

#[test]
fn test_directive_can_relax_overlap_policy() {
    let overlapping = "|📕A Title|Lexpub ⚡Libby|2022/01/01, 2022/01/03 v2|2022/01/05, 2022/01/10";
    let mut parser = parser();

    let err = parser.parse_line(overlapping).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidChronology);

    parser
        .parse_line(r"\ {overlap_policy: distinct_variants}")
        .unwrap();
    assert_eq!(parser.config().overlap_policy, OverlapPolicy::DistinctVariants);
    assert_eq!(parser.parse_line(overlapping).unwrap().len(), 1);
}

#[test]
fn test_malformed_directive_keeps_previous_configuration() {
    let mut parser = parser();
    let err = parser.parse_line(r"\ {skip_compact_planned: maybe}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDirective);
    assert!(!parser.config().skip_compact_planned);
    assert_eq!(parser.parse_line(r"\📕Still Parsed").unwrap().len(), 1);
}

#[test]
fn test_loader_override_enables_catch_all() {
    let config = Loader::new()
        .set_override("catch_all_errors", true)
        .unwrap()
        .build()
        .unwrap();
    let mut parser = LogParser::new(config).unwrap();

    let err = parser
        .parse_line(r"\ {fragments: {pages: '[0-9'}}")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unparsable);

    let err = parser.parse_line("|📕A Title|||||10x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparsableExplicitValue);
}
