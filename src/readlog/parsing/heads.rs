//! Head Splitter
//!
//! A column that packs several items (or several variants) into one string is
//! cut at every format marker:
//!
//! ```text
//! "DNF 50% 📕Jane Doe - A Title, 🔊Someone Else - Another"
//!  └─prefix─┘└────── piece 0 ─────┘ └───── piece 1 ─────┘
//! ```
//!
//! Text before the first marker goes through the column's pre-format pattern
//! (a progress prefix for regular heads, genre and source declarations for
//! compact rows). Whatever that pattern leaves over is stray text and is
//! dropped. Columns without a pre-format pattern keep that text as a leading
//! piece of its own.

use crate::readlog::grammar::{CompiledColumn, Fields};
use regex::Regex;

/// Pieces of a column, cut at format markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadSplit<'a> {
    /// Fields captured by the pre-format pattern.
    pub prefix: Fields,
    pub pieces: Vec<&'a str>,
}

pub fn split_heads<'a>(raw: &'a str, column: &CompiledColumn, marker: &Regex) -> HeadSplit<'a> {
    let starts: Vec<usize> = marker.find_iter(raw).map(|m| m.start()).collect();

    let Some(&first) = starts.first() else {
        let (prefix, rest) = strip_prefix(raw, column);
        let pieces = Some(clean(rest)).filter(|p| !p.is_empty()).into_iter().collect();
        return HeadSplit { prefix, pieces };
    };

    let (prefix, stray) = strip_prefix(&raw[..first], column);
    let mut pieces = Vec::with_capacity(starts.len() + 1);
    let stray = clean(stray);
    if !stray.is_empty() {
        if column.pre_format.is_some() {
            tracing::trace!(stray, "dropping text before the first format marker");
        } else {
            pieces.push(stray);
        }
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(raw.len());
        let piece = clean(&raw[start..end]);
        if !piece.is_empty() {
            pieces.push(piece);
        }
    }

    HeadSplit { prefix, pieces }
}

fn strip_prefix<'a>(text: &'a str, column: &CompiledColumn) -> (Fields, &'a str) {
    match column
        .pre_format
        .as_ref()
        .and_then(|pattern| pattern.match_prefix(text, column.def.flatten))
    {
        Some((fields, end)) => (fields, &text[end..]),
        None => (Fields::new(), text),
    }
}

/// Trim whitespace and trailing list punctuation.
fn clean(piece: &str) -> &str {
    piece.trim().trim_end_matches([',', ';']).trim_end()
}
