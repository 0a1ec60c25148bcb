//! Row-level parsing tests
//!
//! One line in, items (or one typed error) out, against the built-in defaults:
//! - Use assert_item for structure verification
//! - Error rows are checked by kind, never by message text

use readlog::readlog::config::Config;
use readlog::readlog::grammar::Grammar;
use readlog::readlog::item::{Item, Length, Progress, Rating};
use readlog::readlog::testing::{assert_item, parse_line};
use readlog::{parse_row, ErrorKind, RowOutcome};
use rstest::rstest;

fn try_parse(line: &str) -> Result<Vec<Item>, ErrorKind> {
    let grammar = Grammar::compile(Config::defaults().unwrap()).unwrap();
    parse_row(line, &grammar)
        .map(RowOutcome::into_items)
        .map_err(|e| e.kind())
}

#[test]
fn test_end_to_end_row() {
    let items =
        parse_line("📕Jane Doe - A Title -- in A Series, #2|Lexpub 0141439556|2022/01/01 2022/01/10");
    assert_eq!(items.len(), 1);

    assert_item(&items[0])
        .author("Jane Doe")
        .title("A Title")
        .rating(None)
        .variant_count(1)
        .variant(0, |v| {
            v.format("print")
                .series(&[("A Series", Some(2))])
                .sources(&[("Lexpub", None)])
                .isbn("0141439556");
        })
        .experience_count(1)
        .experience(0, |e| {
            e.dates("2022/01/01", "2022/01/10")
                .progress(Progress::Fraction(1.0))
                .variant_index(0);
        });
}

#[test]
fn test_row_without_sources_has_one_default_variant() {
    let items = parse_line("📕A Title");
    assert_item(&items[0]).variant_count(1).variant(0, |v| {
        v.format("print")
            .series(&[])
            .sources(&[])
            .no_isbn()
            .length(None)
            .extra_info(&[]);
    });
}

#[test]
fn test_row_without_dates_is_not_started() {
    let config = Config::defaults().unwrap();
    let items = parse_line("4|📕A Title|Lexpub");
    assert_eq!(items[0].experiences, vec![config.template.not_started()]);
}

#[test]
fn test_head_progress_without_dates() {
    let items = parse_line("DNF p50 📕A Title");
    assert_item(&items[0]).experience(0, |e| {
        e.no_dates().progress(Progress::Pages(50));
    });
}

#[test]
fn test_full_row() {
    let items = parse_line(
        "4.5|⚡Jane Doe - A Title|https://archive.org/details/x 320p|2021/03/01, 2023/05/02 🤝🏼Book Club|2021/03/20, 2023/06/01|Fiction|320|💬Short take -- longer thoughts",
    );
    assert_item(&items[0])
        .rating(Some(Rating::Decimal(4.5)))
        .genres(&["fiction"])
        .variant(0, |v| {
            v.format("ebook")
                .sources(&[("Internet Archive", Some("https://archive.org/details/x"))])
                .length(Some(Length::Pages(320)));
        })
        .experience_count(2)
        .experience(1, |e| {
            e.dates("2023/05/02", "2023/06/01")
                .group("Book Club")
                .amount(Some(Length::Pages(320)));
        });
    assert_eq!(items[0].notes.len(), 2);
    assert!(items[0].notes[0].blurb);
    assert_eq!(items[0].notes[0].content, "Short take");
}

#[test]
fn test_compact_planned_row() {
    let items = parse_line(r"\History @Hoopla: 📕Jane Doe - One @Libby 🔊Two -- in A Series");
    assert_eq!(items.len(), 2);
    assert_item(&items[0])
        .author("Jane Doe")
        .title("One")
        .genres(&["history"])
        .variant(0, |v| {
            v.sources(&[("Hoopla", None), ("Libby", None)]);
        });
    assert_item(&items[1])
        .title("Two")
        .genres(&["history"])
        .variant(0, |v| {
            v.format("audiobook").series(&[("A Series", None)]);
        });
}

#[rstest]
#[case::blank("")]
#[case::whitespace("   \t ")]
#[case::comment(r"\ just a note")]
#[case::comment_with_pipes(r"\ 5|not|a|row")]
fn test_rows_without_items(#[case] line: &str) {
    assert_eq!(try_parse(line), Ok(Vec::new()));
}

#[rstest]
#[case::duplicate_titles("📕Same Title, 🔊Same Title", ErrorKind::DuplicateIdentifier)]
#[case::two_identifiers("|📕A Title|Lexpub 0141439556 B00ABCDEFG", ErrorKind::DuplicateIdentifier)]
#[case::bad_length("|📕A Title|||||10x", ErrorKind::UnparsableExplicitValue)]
#[case::huge_duration("|📕A Title|||||99999999:00", ErrorKind::UnparsableExplicitValue)]
#[case::huge_head_progress("99999999:00 📕A Title", ErrorKind::UnparsableExplicitValue)]
#[case::bad_rating("great|📕A Title", ErrorKind::UnparsableExplicitValue)]
#[case::bad_date("|📕A Title||2022/13/01", ErrorKind::UnparsableExplicitValue)]
#[case::blank_head("5|", ErrorKind::MissingRequiredField)]
#[case::blank_title("📕Jane Doe -", ErrorKind::MissingRequiredField)]
#[case::overlap(
    "|📕A Title||2022/01/01, 2022/01/03|2022/01/05, 2022/01/10",
    ErrorKind::InvalidChronology
)]
#[case::end_before_start("|📕A Title||2022/01/10|2022/01/01", ErrorKind::InvalidChronology)]
#[case::malformed_directive(r"\ {enabled_columns: 5}", ErrorKind::MalformedDirective)]
fn test_rejected_rows(#[case] line: &str, #[case] expected: ErrorKind) {
    assert_eq!(try_parse(line), Err(expected));
}

#[test]
fn test_ignored_characters_are_removed() {
    let items = parse_line("✅📕A Title");
    assert_item(&items[0]).title("A Title");
}
