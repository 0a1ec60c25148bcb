//! Fluent assertion API for parsed items
//!
//! ```text
//! assert_item(&items[0])
//!     .author("Jane Doe")
//!     .title("A Title")
//!     .variant_count(1)
//!     .variant(0, |v| {
//!         v.format("print").isbn("0141439556");
//!     })
//!     .experience(0, |e| {
//!         e.dates("2022/01/01", "2022/01/10").progress(Progress::Fraction(1.0));
//!     });
//! ```
//!
//! Every assertion panics with the path of the value it checked
//! (`item "A Title" > variant 0 > format`).

use crate::readlog::config::Config;
use crate::readlog::item::{
    CustomValue, DateRange, Experience, Item, Length, Note, Progress, Rating, Series, Source,
    Variant,
};
use crate::readlog::grammar::Grammar;
use crate::readlog::parsing::parse_row;
use chrono::NaiveDate;

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for an item
pub fn assert_item(item: &Item) -> ItemAssertion<'_> {
    ItemAssertion {
        item,
        context: format!("item {:?}", item.title),
    }
}

/// Parse one line with the default configuration, panicking on failure.
pub fn parse_line(line: &str) -> Vec<Item> {
    let config = Config::defaults().expect("embedded defaults deserialize");
    parse_line_with(config, line)
}

/// Parse one line with `config`, panicking on failure.
pub fn parse_line_with(config: Config, line: &str) -> Vec<Item> {
    let grammar = Grammar::compile(config).expect("grammar compiles");
    match parse_row(line, &grammar) {
        Ok(outcome) => outcome.into_items(),
        Err(e) => panic!("failed to parse {line:?}: {e}"),
    }
}

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y/%m/%d")
        .unwrap_or_else(|e| panic!("bad date {text:?} in assertion: {e}"))
}

// ============================================================================
// Item Assertions
// ============================================================================

pub struct ItemAssertion<'a> {
    item: &'a Item,
    context: String,
}

impl<'a> ItemAssertion<'a> {
    pub fn title(self, expected: &str) -> Self {
        assert_eq!(self.item.title, expected, "{}: title", self.context);
        self
    }

    pub fn author(self, expected: &str) -> Self {
        assert_eq!(
            self.item.author.as_deref(),
            Some(expected),
            "{}: author",
            self.context
        );
        self
    }

    pub fn no_author(self) -> Self {
        assert_eq!(self.item.author, None, "{}: author", self.context);
        self
    }

    pub fn rating(self, expected: Option<Rating>) -> Self {
        assert_eq!(self.item.rating, expected, "{}: rating", self.context);
        self
    }

    pub fn genres(self, expected: &[&str]) -> Self {
        assert_eq!(self.item.genres, expected, "{}: genres", self.context);
        self
    }

    pub fn notes(self, expected: &[Note]) -> Self {
        assert_eq!(self.item.notes, expected, "{}: notes", self.context);
        self
    }

    pub fn custom(self, name: &str, expected: Option<CustomValue>) -> Self {
        assert_eq!(
            self.item.custom.get(name),
            Some(&expected),
            "{}: custom column {name:?}",
            self.context
        );
        self
    }

    pub fn variant_count(self, expected: usize) -> Self {
        assert_eq!(
            self.item.variants.len(),
            expected,
            "{}: expected {} variants, found {}",
            self.context,
            expected,
            self.item.variants.len()
        );
        self
    }

    pub fn experience_count(self, expected: usize) -> Self {
        assert_eq!(
            self.item.experiences.len(),
            expected,
            "{}: expected {} experiences, found {}",
            self.context,
            expected,
            self.item.experiences.len()
        );
        self
    }

    /// Run assertions on the variant at `index`
    pub fn variant<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(VariantAssertion<'_>),
    {
        let variant = self.item.variants.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no variant {index}, found {}",
                self.context,
                self.item.variants.len()
            )
        });
        assertion(VariantAssertion {
            variant,
            context: format!("{} > variant {index}", self.context),
        });
        self
    }

    /// Run assertions on the experience at `index`
    pub fn experience<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ExperienceAssertion<'_>),
    {
        let experience = self.item.experiences.get(index).unwrap_or_else(|| {
            panic!(
                "{}: no experience {index}, found {}",
                self.context,
                self.item.experiences.len()
            )
        });
        assertion(ExperienceAssertion {
            experience,
            context: format!("{} > experience {index}", self.context),
        });
        self
    }
}

// ============================================================================
// Variant Assertions
// ============================================================================

pub struct VariantAssertion<'a> {
    variant: &'a Variant,
    context: String,
}

impl<'a> VariantAssertion<'a> {
    pub fn format(self, expected: &str) -> Self {
        assert_eq!(
            self.variant.format.as_deref(),
            Some(expected),
            "{}: format",
            self.context
        );
        self
    }

    pub fn isbn(self, expected: &str) -> Self {
        assert_eq!(
            self.variant.isbn.as_deref(),
            Some(expected),
            "{}: isbn",
            self.context
        );
        self
    }

    pub fn no_isbn(self) -> Self {
        assert_eq!(self.variant.isbn, None, "{}: isbn", self.context);
        self
    }

    pub fn length(self, expected: Option<Length>) -> Self {
        assert_eq!(self.variant.length, expected, "{}: length", self.context);
        self
    }

    /// Expected series as `(name, volume)` pairs
    pub fn series(self, expected: &[(&str, Option<u32>)]) -> Self {
        let expected: Vec<Series> = expected
            .iter()
            .map(|(name, volume)| Series {
                name: name.to_string(),
                volume: *volume,
            })
            .collect();
        assert_eq!(self.variant.series, expected, "{}: series", self.context);
        self
    }

    /// Expected sources as `(name, url)` pairs
    pub fn sources(self, expected: &[(&str, Option<&str>)]) -> Self {
        let expected: Vec<Source> = expected
            .iter()
            .map(|(name, url)| Source {
                name: name.to_string(),
                url: url.map(str::to_string),
            })
            .collect();
        assert_eq!(self.variant.sources, expected, "{}: sources", self.context);
        self
    }

    pub fn extra_info(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.variant.extra_info, expected,
            "{}: extra info",
            self.context
        );
        self
    }
}

// ============================================================================
// Experience Assertions
// ============================================================================

pub struct ExperienceAssertion<'a> {
    experience: &'a Experience,
    context: String,
}

impl<'a> ExperienceAssertion<'a> {
    fn only_span(&self) -> &crate::readlog::item::Span {
        match self.experience.spans.as_slice() {
            [span] => span,
            spans => panic!("{}: expected one span, found {}", self.context, spans.len()),
        }
    }

    /// Dates of the experience's only span, `YYYY/MM/DD`; an empty string is
    /// a missing date.
    pub fn dates(self, start: &str, end: &str) -> Self {
        let parse = |s: &str| (!s.is_empty()).then(|| date(s));
        let expected = DateRange {
            start: parse(start),
            end: parse(end),
        };
        assert_eq!(
            self.only_span().dates,
            Some(expected),
            "{}: dates",
            self.context
        );
        self
    }

    pub fn no_dates(self) -> Self {
        assert_eq!(self.only_span().dates, None, "{}: dates", self.context);
        self
    }

    pub fn progress(self, expected: Progress) -> Self {
        assert_eq!(
            self.only_span().progress,
            Some(expected),
            "{}: progress",
            self.context
        );
        self
    }

    pub fn no_progress(self) -> Self {
        assert_eq!(self.only_span().progress, None, "{}: progress", self.context);
        self
    }

    pub fn amount(self, expected: Option<Length>) -> Self {
        assert_eq!(self.only_span().amount, expected, "{}: amount", self.context);
        self
    }

    pub fn variant_index(self, expected: usize) -> Self {
        assert_eq!(
            self.experience.variant_index, expected,
            "{}: variant index",
            self.context
        );
        self
    }

    pub fn group(self, expected: &str) -> Self {
        assert_eq!(
            self.experience.group.as_deref(),
            Some(expected),
            "{}: group",
            self.context
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluent_assertions_pass() {
        let items = parse_line("📕Jane Doe - A Title|Lexpub|2022/01/01|2022/01/10");
        assert_item(&items[0])
            .author("Jane Doe")
            .title("A Title")
            .variant_count(1)
            .variant(0, |v| {
                v.format("print").sources(&[("Lexpub", None)]).no_isbn();
            })
            .experience(0, |e| {
                e.dates("2022/01/01", "2022/01/10")
                    .progress(Progress::Fraction(1.0))
                    .variant_index(0);
            });
    }

    #[test]
    #[should_panic(expected = "title")]
    fn test_wrong_title_panics() {
        let items = parse_line("📕A Title");
        assert_item(&items[0]).title("Other");
    }

    #[test]
    #[should_panic(expected = "no variant 3")]
    fn test_missing_variant_panics() {
        let items = parse_line("📕A Title");
        assert_item(&items[0]).variant(3, |_| {});
    }
}
