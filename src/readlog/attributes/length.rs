//! Length
//!
//! A length is a page count or a duration, never both. The dedicated Length
//! column is the row-wide fallback; a length token inside a variant's details
//! overrides it for that variant. A populated Length column that is neither
//! shape is an error rather than a silently dropped value.

use super::RowContext;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::{ColumnKind, TokenPatterns};
use crate::readlog::item::Length;
use crate::readlog::microformats::{length_from_fields, parse_pages, parse_time};

/// Length declared in the Length column of a row.
pub fn column_length(row: &RowContext<'_>) -> Result<Option<Length>> {
    let Some(column) = row.column(ColumnKind::Length) else {
        return Ok(None);
    };
    column.ensure_matched()?;
    match column.segments().next() {
        Some(segment) => length_from_fields("length", &segment.fields),
        None => Err(ParseError::unparsable(
            "length",
            column.raw.as_str(),
            "expected a page count or h:mm",
        )),
    }
}

/// Find and remove a length token (`247p` or `h:mm`) from variant details.
pub fn take_length_token(details: &mut String, tokens: &TokenPatterns) -> Result<Option<Length>> {
    let pages = tokens
        .pages_length
        .captures(details.as_str())
        .and_then(|caps| caps.name("pages"))
        .map(|m| (m.as_str().to_string(), m.range()));
    if let Some((pages, range)) = pages {
        let pages = parse_pages("sources", &pages)?;
        // drop the trailing `p` as well
        details.replace_range(range.start..range.end + 1, " ");
        return Ok(Some(Length::Pages(pages)));
    }

    let time = tokens
        .time_length
        .find(details.as_str())
        .map(|m| (m.as_str().to_string(), m.range()));
    if let Some((time, range)) = time {
        let time = parse_time("sources", &time)?;
        details.replace_range(range, " ");
        return Ok(Some(Length::Duration(time)));
    }
    Ok(None)
}
