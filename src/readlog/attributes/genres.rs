//! Genres: the Genres column wins over genres declared in a compact row prefix.

use super::ItemContext;
use crate::readlog::grammar::ColumnKind;

pub fn extract(ctx: &ItemContext<'_, '_>) -> Vec<String> {
    let from_column: Vec<String> = ctx
        .row
        .column(ColumnKind::Genres)
        .map(|column| {
            column
                .segments()
                .flat_map(|s| s.fields.list("genre").iter())
                .map(|genre| genre.to_string())
                .collect()
        })
        .unwrap_or_default();

    let from_prefix: Vec<String> = ctx
        .row
        .head
        .prefix
        .scalar("genres")
        .map(|genres| {
            ctx.grammar()
                .tokens()
                .name_separator
                .split(genres)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let genres = normalize(if from_column.is_empty() {
        from_prefix
    } else {
        from_column
    });
    if genres.is_empty() {
        ctx.template().item.genres.clone()
    } else {
        genres
    }
}

/// Lower-case and drop blanks.
fn normalize(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|genre| genre.trim().to_lowercase())
        .filter(|genre| !genre.is_empty())
        .collect()
}
