//! Notes column
//!
//! Segments separated by ` -- `. A leading blurb glyph marks a summary note,
//! a leading private glyph a note not meant for sharing; both may be present
//! in either order. Blurbs are listed first, the order is otherwise kept.

use super::ItemContext;
use crate::readlog::grammar::ColumnKind;
use crate::readlog::item::Note;

pub fn extract(ctx: &ItemContext<'_, '_>) -> Vec<Note> {
    let Some(column) = ctx.row.column(ColumnKind::Notes) else {
        return ctx.template().item.notes.clone();
    };
    let sentinels = &ctx.config().sentinels;

    let (mut notes, others): (Vec<Note>, Vec<Note>) = column
        .segments()
        .filter_map(|segment| {
            let content = segment.fields.scalar("content")?;
            let glyphs = segment.fields.scalar("sentinels").unwrap_or_default();
            Some(Note {
                blurb: glyphs.contains(sentinels.blurb.as_str()),
                private: glyphs.contains(sentinels.private.as_str()),
                content: content.to_string(),
            })
        })
        .partition(|note| note.blurb);
    notes.extend(others);
    notes
}
