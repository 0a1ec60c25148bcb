//! Row Classification
//!
//! Decides what kind of row a line is before any column is looked at. The
//! tests are purely syntactic: a comment prefix, a `{...}` directive body, and
//! whether any format marker occurs in the line.

use crate::readlog::config::Config;
use crate::readlog::grammar::Grammar;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Whitespace, or a comment without format markers. Yields no items.
    Blank,
    /// A comment carrying a `{...}` mapping that updates the configuration.
    CustomConfigDirective,
    /// A comment listing planned items after format markers.
    CompactPlanned,
    Regular,
}

/// Determine the kind of a line.
///
/// Classification follows this order:
/// 1. Blank lines and plain comments
/// 2. Config directives
/// 3. Compact planned rows (comment with a format marker)
/// 4. Default to a regular row
pub fn classify_row(line: &str, grammar: &Grammar) -> RowKind {
    if is_blank(line, grammar) {
        return RowKind::Blank;
    }

    if is_directive(line, grammar) {
        return RowKind::CustomConfigDirective;
    }

    if is_comment(line, grammar.config()) {
        return RowKind::CompactPlanned;
    }

    RowKind::Regular
}

/// Remove the configured ignored characters (e.g. status checkmarks).
pub fn strip_ignored<'a>(line: &'a str, config: &Config) -> Cow<'a, str> {
    let ignored = &config.ignored_characters;
    if ignored.is_empty() || !line.chars().any(|c| ignored.contains(c)) {
        return Cow::Borrowed(line);
    }
    Cow::Owned(line.chars().filter(|c| !ignored.contains(*c)).collect())
}

pub(crate) fn is_comment(line: &str, config: &Config) -> bool {
    line.trim_start().starts_with(config.comment_character.as_str())
}

fn is_blank(line: &str, grammar: &Grammar) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    is_comment(line, grammar.config())
        && !grammar.has_format_marker(line)
        && !is_directive(line, grammar)
}

fn is_directive(line: &str, grammar: &Grammar) -> bool {
    grammar.directive().is_match(line)
}
