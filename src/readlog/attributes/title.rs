//! Author and title, from the first segment of an item head.

use super::ItemContext;
use crate::readlog::error::{ParseError, Result};

pub fn title(ctx: &ItemContext<'_, '_>) -> Result<String> {
    let title = ctx
        .head
        .first()
        .and_then(|fields| fields.scalar("title"))
        .ok_or_else(|| ParseError::MissingRequiredField {
            field: "title",
            detail: format!("no title in {:?}", ctx.head.text),
        })?;

    if title.ends_with('-') {
        return Err(ParseError::MissingRequiredField {
            field: "title",
            detail: format!("dangling separator in {:?}", ctx.head.text),
        });
    }
    Ok(title.to_string())
}

pub fn author(ctx: &ItemContext<'_, '_>) -> Option<String> {
    ctx.head
        .first()
        .and_then(|fields| fields.scalar("author"))
        .map(str::to_string)
        .or_else(|| ctx.template().item.author.clone())
}
