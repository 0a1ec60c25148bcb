//! Row layout
//!
//! Maps the raw column strings of a row onto column kinds. A regular row is
//! split at the column separator and its columns are laid out in the order
//! the configuration enables them, custom columns last. A compact planned row
//! has a single column: everything after the comment character.

use super::classification::is_comment;
use crate::readlog::config::Config;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::{ColumnKind, Grammar};
use std::collections::BTreeMap;

/// Raw column text of one row, by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowColumns<'a> {
    standard: BTreeMap<ColumnKind, &'a str>,
    custom: BTreeMap<String, &'a str>,
}

impl<'a> RowColumns<'a> {
    /// Text of a standard column, if it is present and not blank.
    pub fn get(&self, kind: ColumnKind) -> Option<&'a str> {
        self.standard.get(&kind).copied().filter(|s| !s.is_empty())
    }

    /// Text of a custom column, if it is present and not blank.
    pub fn custom(&self, name: &str) -> Option<&'a str> {
        self.custom.get(name).copied().filter(|s| !s.is_empty())
    }

    pub fn custom_values(&self) -> impl Iterator<Item = (&str, &'a str)> {
        self.custom.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Lay out the columns of a regular row.
pub fn regular_columns<'a>(line: &'a str, grammar: &Grammar) -> Result<RowColumns<'a>> {
    let config = grammar.config();
    let raw: Vec<&str> = line
        .split(config.column_separator.as_str())
        .map(str::trim)
        .collect();

    let mut standard = config.standard_columns();
    // A row may leave out the rating entirely and start with the head.
    if standard.first() == Some(&ColumnKind::Rating)
        && raw.first().is_some_and(|first| grammar.has_format_marker(first))
    {
        standard.remove(0);
    }

    let declared = standard.len() + config.custom_columns.len();
    if raw.len() > declared {
        tracing::warn!(
            declared,
            found = raw.len(),
            "row has more columns than configured, ignoring the surplus"
        );
    }

    let mut columns = RowColumns::default();
    let mut values = raw.into_iter();
    for (kind, value) in standard.iter().zip(values.by_ref()) {
        columns.standard.insert(*kind, value);
    }
    for (custom, value) in config.custom_columns.iter().zip(values) {
        columns.custom.insert(custom.name.clone(), value);
    }

    if columns.get(ColumnKind::Head).is_none() {
        return Err(ParseError::MissingRequiredField {
            field: "head",
            detail: format!("no item in row {line:?}"),
        });
    }
    Ok(columns)
}

/// The single column of a compact planned row.
pub fn compact_columns<'a>(line: &'a str, config: &Config) -> RowColumns<'a> {
    let text = line.trim();
    let text = if is_comment(text, config) {
        text[config.comment_character.len()..].trim()
    } else {
        text
    };
    let mut columns = RowColumns::default();
    columns.standard.insert(ColumnKind::CompactPlannedHead, text);
    columns
}
