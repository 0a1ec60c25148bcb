//! Variants
//!
//! The head contributes what every variant of the item shares: its format
//! marker, series and extra info (and, in compact rows, `@Source` tokens).
//! Each piece of the Sources column then adds one variant on top of that,
//! where a variant-level format or length overrides the head-level one.
//! Without a Sources column the head alone makes one variant.
//!
//! A variant equal to the template variant carries no information and is left
//! out.

use super::{series, sources, ItemContext};
use crate::readlog::error::Result;
use crate::readlog::grammar::ColumnKind;
use crate::readlog::item::Variant;
use crate::readlog::parsing::Piece;

pub fn extract(ctx: &ItemContext<'_, '_>) -> Result<Vec<Variant>> {
    let base = head_variant(ctx)?;

    let variants = match ctx.row.column(ColumnKind::Sources) {
        Some(column) if !column.pieces.is_empty() => column
            .pieces
            .iter()
            .map(|piece| source_variant(ctx, &base, piece))
            .collect::<Result<Vec<_>>>()?,
        _ => vec![base],
    };

    let template = &ctx.template().variant;
    Ok(variants.into_iter().filter(|v| v != template).collect())
}

fn head_variant(ctx: &ItemContext<'_, '_>) -> Result<Variant> {
    let template = &ctx.template().variant;
    let head = ctx.head;

    let format = format_of(ctx, head).or_else(|| template.format.clone());
    let series = series::from_piece(head)?;
    let extra_info = series::extra_info(head);

    let mut found_sources = Vec::new();
    if ctx.row.is_compact() {
        if let Some(prefix) = ctx.row.head.prefix.scalar("sources") {
            found_sources.extend(sources::from_at_tokens(prefix));
        }
        for tokens in head.merged().list("sources") {
            found_sources.extend(sources::from_at_tokens(tokens));
        }
    }

    Ok(Variant {
        format,
        series: or_template(series, &template.series),
        sources: or_template(found_sources, &template.sources),
        isbn: template.isbn.clone(),
        length: ctx.column_length.or(template.length),
        extra_info: or_template(extra_info, &template.extra_info),
    })
}

fn source_variant(ctx: &ItemContext<'_, '_>, base: &Variant, piece: &Piece) -> Result<Variant> {
    let details = match piece.first().and_then(|fields| fields.scalar("details")) {
        Some(details) => sources::scan_details(details, ctx.grammar())?,
        None => sources::Details::default(),
    };

    let mut variant = base.clone();
    if let Some(format) = format_of(ctx, piece) {
        variant.format = Some(format);
    }
    variant.series.extend(series::from_piece(piece)?);
    variant.extra_info.extend(series::extra_info(piece));
    variant.sources.extend(details.sources);
    variant.isbn = details.isbn.or(variant.isbn);
    variant.length = details.length.or(variant.length);
    Ok(variant)
}

/// Format name of the marker opening a piece.
fn format_of(ctx: &ItemContext<'_, '_>, piece: &Piece) -> Option<String> {
    piece
        .first()
        .and_then(|fields| fields.scalar("format_emoji"))
        .and_then(|emoji| ctx.config().format_name(emoji))
        .map(str::to_string)
}

fn or_template<T: Clone>(found: Vec<T>, template: &[T]) -> Vec<T> {
    if found.is_empty() {
        template.to_vec()
    } else {
        found
    }
}

#[cfg(test)]
mod tests {
    use crate::readlog::config::Config;
    use crate::readlog::grammar::Grammar;
    use crate::readlog::item::{Item, Length, Series, Source};
    use crate::readlog::parsing::{parse_row, RowOutcome};

    fn parse(line: &str) -> Vec<Item> {
        let grammar = Grammar::compile(Config::defaults().unwrap()).unwrap();
        parse_row(line, &grammar).unwrap().into_items()
    }

    fn named(name: &str) -> Source {
        Source {
            name: name.into(),
            url: None,
        }
    }

    #[test]
    fn test_head_only_variant_has_format() {
        let items = parse("📕A Title");
        assert_eq!(items[0].variants.len(), 1);
        let variant = &items[0].variants[0];
        assert_eq!(variant.format.as_deref(), Some("print"));
        assert!(variant.sources.is_empty());
        assert_eq!(variant.isbn, None);
    }

    #[test]
    fn test_variant_without_any_data_is_omitted() {
        let items = parse("|Plain Title");
        assert!(items[0].variants.is_empty());
    }

    #[test]
    fn test_multiple_variants_override_format() {
        let items = parse("📕A Title -- in A Series|Lexpub 300p ⚡Libby 0141439556");
        let variants = &items[0].variants;
        assert_eq!(variants.len(), 2);

        assert_eq!(variants[0].format.as_deref(), Some("print"));
        assert_eq!(variants[0].sources, vec![named("Lexpub")]);
        assert_eq!(variants[0].length, Some(Length::Pages(300)));

        assert_eq!(variants[1].format.as_deref(), Some("ebook"));
        assert_eq!(variants[1].sources, vec![named("Libby")]);
        assert_eq!(variants[1].isbn.as_deref(), Some("0141439556"));
        assert_eq!(variants[1].length, None);

        for variant in variants {
            assert_eq!(
                variant.series,
                vec![Series {
                    name: "A Series".into(),
                    volume: None
                }]
            );
        }
    }

    #[test]
    fn test_variant_length_overrides_length_column() {
        let items = parse("|📕A Title|Lexpub 120p||||300");
        assert_eq!(items[0].variants[0].length, Some(Length::Pages(120)));
    }

    #[test]
    fn test_variant_series_and_extra_info() {
        let items = parse("📕A Title|Lexpub -- B Series #3 -- unabridged");
        let variant = &items[0].variants[0];
        assert_eq!(
            variant.series,
            vec![Series {
                name: "B Series".into(),
                volume: Some(3)
            }]
        );
        assert_eq!(variant.extra_info, vec!["unabridged".to_string()]);
    }

    #[test]
    fn test_compact_sources() {
        let items = parse(r"\FICTION @Hoopla: 📕One @Libby 🔊Two");
        assert_eq!(items[0].variants[0].sources, vec![named("Hoopla"), named("Libby")]);
        assert_eq!(items[1].variants[0].sources, vec![named("Hoopla")]);
        assert_eq!(items[1].variants[0].format.as_deref(), Some("audiobook"));
    }
}
