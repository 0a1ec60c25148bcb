//! Attribute Extractors
//!
//! One extractor per item attribute. Each reads the segmented columns of the
//! row plus the item's own head piece, and falls back to the configuration's
//! item template when nothing was written.
//!
//! Extractors are dispatched through [`Attribute`], a closed set matched
//! exhaustively, and run in [`Attribute::ORDER`]. Experiences depend on the
//! variants already extracted for the same item, so they come after them.

pub mod custom;
pub mod experiences;
pub mod genres;
pub mod length;
pub mod notes;
pub mod rating;
pub mod series;
pub mod sources;
pub mod title;
pub mod variants;

use crate::readlog::config::{Config, Template};
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::{ColumnKind, Grammar};
use crate::readlog::item::{Item, Length};
use crate::readlog::parsing::{segment_column, Piece, RowColumns, RowKind, SegmentedColumn};
use std::collections::{BTreeMap, HashSet};

/// Attributes of an item, each with its own extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Title,
    Author,
    Rating,
    Genres,
    Variants,
    Experiences,
    Notes,
    Custom,
}

impl Attribute {
    pub const ORDER: [Attribute; 8] = [
        Attribute::Title,
        Attribute::Author,
        Attribute::Rating,
        Attribute::Genres,
        Attribute::Variants,
        Attribute::Experiences,
        Attribute::Notes,
        Attribute::Custom,
    ];

    /// Run this attribute's extractor and store its value on `item`.
    pub fn extract(self, ctx: &ItemContext<'_, '_>, item: &mut Item) -> Result<()> {
        match self {
            Attribute::Title => item.title = title::title(ctx)?,
            Attribute::Author => item.author = title::author(ctx),
            Attribute::Rating => item.rating = rating::extract(ctx)?,
            Attribute::Genres => item.genres = genres::extract(ctx),
            Attribute::Variants => item.variants = variants::extract(ctx)?,
            Attribute::Experiences => {
                item.experiences = experiences::extract(ctx, &item.variants)?
            }
            Attribute::Notes => item.notes = notes::extract(ctx),
            Attribute::Custom => item.custom = custom::extract(ctx)?,
        }
        Ok(())
    }
}

/// Segmented columns of one row, shared by every item of the row.
#[derive(Debug, Clone)]
pub struct RowContext<'g> {
    pub grammar: &'g Grammar,
    pub kind: RowKind,
    /// The head column (or the compact row's only column).
    pub head: SegmentedColumn,
    columns: BTreeMap<ColumnKind, SegmentedColumn>,
    custom: BTreeMap<String, String>,
}

impl<'g> RowContext<'g> {
    pub fn new(kind: RowKind, columns: &RowColumns<'_>, grammar: &'g Grammar) -> Result<Self> {
        let head_kind = match kind {
            RowKind::CompactPlanned => ColumnKind::CompactPlannedHead,
            _ => ColumnKind::Head,
        };
        let head_raw = columns
            .get(head_kind)
            .ok_or_else(|| ParseError::MissingRequiredField {
                field: "head",
                detail: "the head column is empty".to_string(),
            })?;
        let head = segment_column(head_raw, grammar.column(head_kind), grammar);

        let segmented = ColumnKind::STANDARD
            .iter()
            .filter(|kind| **kind != ColumnKind::Head)
            .filter_map(|kind| {
                columns
                    .get(*kind)
                    .map(|raw| (*kind, segment_column(raw, grammar.column(*kind), grammar)))
            })
            .collect();

        let custom = columns
            .custom_values()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Ok(Self {
            grammar,
            kind,
            head,
            columns: segmented,
            custom,
        })
    }

    pub fn config(&self) -> &'g Config {
        self.grammar.config()
    }

    pub fn template(&self) -> &'g Template {
        &self.grammar.config().template
    }

    pub fn is_compact(&self) -> bool {
        self.kind == RowKind::CompactPlanned
    }

    /// A populated standard column.
    pub fn column(&self, kind: ColumnKind) -> Option<&SegmentedColumn> {
        self.columns.get(&kind)
    }

    /// Raw text of a custom column, if populated.
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// What an extractor sees: the row, and which item of the row it is building.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'r, 'g> {
    pub row: &'r RowContext<'g>,
    /// Position of the item within the row.
    pub index: usize,
    pub head: &'r Piece,
    /// Length declared in the Length column.
    pub column_length: Option<Length>,
}

impl<'r, 'g> ItemContext<'r, 'g> {
    pub fn template(&self) -> &'g Template {
        self.row.template()
    }

    pub fn config(&self) -> &'g Config {
        self.row.config()
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.row.grammar
    }
}

/// Build every item of a row. Any failure discards the whole row.
pub fn build_items(row: &RowContext<'_>) -> Result<Vec<Item>> {
    let column_length = length::column_length(row)?;

    let mut items = Vec::with_capacity(row.head.pieces.len());
    for (index, head) in row.head.pieces.iter().enumerate() {
        let ctx = ItemContext {
            row,
            index,
            head,
            column_length,
        };
        let mut item = row.template().item.clone();
        for attribute in Attribute::ORDER {
            attribute.extract(&ctx, &mut item)?;
        }
        items.push(item);
    }

    let mut titles = HashSet::new();
    if let Some(duplicate) = items.iter().find(|item| !titles.insert(item.title.as_str())) {
        return Err(ParseError::DuplicateIdentifier {
            what: "title",
            value: duplicate.title.clone(),
        });
    }

    Ok(items)
}
