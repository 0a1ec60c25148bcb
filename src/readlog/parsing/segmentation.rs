//! Column Segmenter
//!
//! Turns one column's raw text into field maps:
//!
//! 1. Columns that split by format marker are cut into pieces
//!    ([`split_heads`]); other columns are a single piece.
//! 2. Each piece is cut into segments at the column separator.
//! 3. Segment k is matched against the candidates for position k; the first
//!    matching pattern wins. There is no backtracking: a segment is never
//!    retried against another position's candidates.
//!
//! Unmatched segments are dropped from the result but remembered, so columns
//! whose content must not be silently lost can report them.

use super::heads::split_heads;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::{ColumnKind, CompiledColumn, Fields, Grammar};

/// One matched segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position within the piece, counting blank segments too.
    pub position: usize,
    /// Name of the pattern that matched.
    pub pattern: &'static str,
    pub fields: Fields,
}

/// One item head, one variant, or the whole text of a single-piece column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Piece {
    pub text: String,
    pub segments: Vec<Segment>,
    pub unmatched: Vec<String>,
}

impl Piece {
    /// Fields of segment 0, if it matched.
    pub fn first(&self) -> Option<&Fields> {
        self.segments
            .iter()
            .find(|s| s.position == 0)
            .map(|s| &s.fields)
    }

    /// Matched segments after the first.
    pub fn later(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.position > 0)
    }

    /// All segment fields merged in order.
    pub fn merged(&self) -> Fields {
        let mut merged = Fields::new();
        for segment in &self.segments {
            merged.merge(segment.fields.clone());
        }
        merged
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedColumn {
    pub kind: ColumnKind,
    pub raw: String,
    /// Fields captured before the first format marker.
    pub prefix: Fields,
    pub pieces: Vec<Piece>,
}

impl SegmentedColumn {
    pub fn first_piece(&self) -> Option<&Piece> {
        self.pieces.first()
    }

    /// Matched segments of every piece, in order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.pieces.iter().flat_map(|p| p.segments.iter())
    }

    /// Fail if any segment matched none of the column's patterns.
    pub fn ensure_matched(&self) -> Result<()> {
        match self.pieces.iter().flat_map(|p| p.unmatched.iter()).next() {
            Some(text) => Err(ParseError::unparsable(
                self.kind.name(),
                text.as_str(),
                "matches none of the column's patterns",
            )),
            None => Ok(()),
        }
    }
}

/// Segment a column's raw text.
pub fn segment_column(raw: &str, column: &CompiledColumn, grammar: &Grammar) -> SegmentedColumn {
    let (prefix, pieces) = if column.def.split_by_format {
        let split = split_heads(raw, column, grammar.format_marker());
        (split.prefix, split.pieces)
    } else {
        (Fields::new(), vec![raw.trim()])
    };

    SegmentedColumn {
        kind: column.kind(),
        raw: raw.to_string(),
        prefix,
        pieces: pieces
            .into_iter()
            .map(|text| segment_piece(text, column))
            .collect(),
    }
}

/// Split one piece at the column separator and match each segment.
pub fn segment_piece(text: &str, column: &CompiledColumn) -> Piece {
    let parts: Vec<&str> = match &column.separator {
        Some(separator) => separator.split(text).collect(),
        None => vec![text],
    };

    let mut piece = Piece {
        text: text.to_string(),
        ..Piece::default()
    };
    for (position, part) in parts.into_iter().enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let matched = column.candidates(position).find_map(|matcher| {
            matcher
                .match_fields(part, column.def.flatten)
                .map(|fields| (matcher.name(), fields))
        });
        match matched {
            Some((pattern, fields)) => piece.segments.push(Segment {
                position,
                pattern,
                fields,
            }),
            None => {
                tracing::trace!(
                    column = column.kind().name(),
                    position,
                    segment = part,
                    "no pattern matched, dropping segment"
                );
                piece.unmatched.push(part.to_string());
            }
        }
    }
    piece
}
