//! Series membership, from the segments after the first of a head or variant.
//!
//! `in Name` is a series without a volume, `[in ]Name[,] #N` one with volume N.
//! Anything else in those positions is extra info, read by the variants
//! extractor from the same segments.

use crate::readlog::error::{ParseError, Result};
use crate::readlog::item::Series;
use crate::readlog::parsing::Piece;

pub fn from_piece(piece: &Piece) -> Result<Vec<Series>> {
    piece
        .later()
        .filter_map(|segment| {
            let name = segment.fields.scalar("series_name")?;
            let volume = segment
                .fields
                .scalar("series_volume")
                .map(|volume| {
                    volume.parse::<u32>().map_err(|_| {
                        ParseError::unparsable("series", volume, "volume out of range")
                    })
                })
                .transpose();
            Some(volume.map(|volume| Series {
                name: name.to_string(),
                volume,
            }))
        })
        .collect()
}

/// Extra info segments of a piece.
pub fn extra_info(piece: &Piece) -> Vec<String> {
    piece
        .later()
        .flat_map(|segment| segment.fields.list("extra_info").iter().cloned())
        .collect()
}
