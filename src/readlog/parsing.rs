//! Row parsing
//!
//! Entry point of the pipeline for one line:
//!
//! ```text
//! line ─ strip ignored chars ─ classify ─┬─ Blank ─────────── no items
//!                                        ├─ Directive ─────── new grammar
//!                                        └─ Compact/Regular ─ layout ─ segment ─ extract ─ items
//! ```
//!
//! Parsing one line never changes the grammar it was given. A directive row
//! returns the grammar that later lines should use; threading it forward is
//! the caller's job (see [`LogParser`](crate::readlog::driver::LogParser)).

pub mod classification;
pub mod heads;
pub mod layout;
pub mod segmentation;

pub use classification::{classify_row, strip_ignored, RowKind};
pub use layout::RowColumns;
pub use segmentation::{segment_column, Piece, Segment, SegmentedColumn};

use crate::readlog::attributes::{self, RowContext};
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::Grammar;
use crate::readlog::item::Item;
use serde_yaml::Value;

/// What one line produced.
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// Parsed items, possibly none.
    Items(Vec<Item>),
    /// A config directive: the grammar for the lines that follow.
    Directive(Box<Grammar>),
}

impl RowOutcome {
    /// Items of the row; a directive has none.
    pub fn into_items(self) -> Vec<Item> {
        match self {
            RowOutcome::Items(items) => items,
            RowOutcome::Directive(_) => Vec::new(),
        }
    }
}

/// Parse one line against a compiled grammar.
pub fn parse_row(line: &str, grammar: &Grammar) -> Result<RowOutcome> {
    let config = grammar.config();
    let line = strip_ignored(line, config);
    let kind = classify_row(&line, grammar);
    tracing::debug!(?kind, line = %line, "classified row");

    let columns = match kind {
        RowKind::Blank => return Ok(RowOutcome::Items(Vec::new())),
        RowKind::CustomConfigDirective => {
            return parse_directive(&line, grammar).map(|g| RowOutcome::Directive(Box::new(g)))
        }
        RowKind::CompactPlanned if config.skip_compact_planned => {
            return Ok(RowOutcome::Items(Vec::new()))
        }
        RowKind::CompactPlanned => layout::compact_columns(&line, config),
        RowKind::Regular => layout::regular_columns(&line, grammar)?,
    };

    let row = RowContext::new(kind, &columns, grammar)?;
    attributes::build_items(&row).map(RowOutcome::Items)
}

/// Merge a directive body into the current configuration and compile it.
fn parse_directive(line: &str, grammar: &Grammar) -> Result<Grammar> {
    let body = grammar
        .directive()
        .captures(line)
        .and_then(|caps| caps.name("body"))
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::MalformedDirective(format!("no {{...}} body in {line:?}")))?;

    let patch = match serde_yaml::from_str::<Value>(body) {
        Ok(Value::Mapping(patch)) => patch,
        Ok(_) => {
            return Err(ParseError::MalformedDirective(format!(
                "expected a mapping, found {body:?}"
            )))
        }
        Err(e) => return Err(ParseError::MalformedDirective(e.to_string())),
    };

    let config = grammar.config().merge_directive(&patch)?;
    tracing::debug!(keys = patch.len(), "applied config directive");
    Grammar::compile(config)
}
