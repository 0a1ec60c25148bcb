//! Experiences
//!
//! Start and end dates are paired by position. A row may list more end dates
//! than start dates (a reread finished without a new start); the missing start
//! is left empty. Each pair becomes one experience with one span:
//!
//! - `dates`: the pair; an end missing from the End Dates column falls back to
//!   an end date written inline after the start date
//! - `amount`: length of the referenced variant (`vN`, 1-based), else the
//!   Length column
//! - `progress`: the start token's marker, else the head's marker (on the most
//!   recent session of the first item only), else finished if there is an end
//!   date, else the template default
//!
//! Without any dates the item gets a progress-only experience when its head
//! carries a progress marker, otherwise the template's "not started" one.
//! Compact rows always get the "not started" experience.

use super::ItemContext;
use crate::readlog::chronology;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::ColumnKind;
use crate::readlog::item::{DateRange, Experience, Length, Progress, Span, Variant};
use crate::readlog::microformats::{parse_date, progress_from_fields};
use chrono::NaiveDate;

/// One entry of the Start Dates column.
#[derive(Debug, Clone, Default, PartialEq)]
struct StartEntry {
    start: Option<NaiveDate>,
    inline_end: Option<NaiveDate>,
    progress: Option<Progress>,
    /// 1-based variant reference.
    variant: Option<usize>,
    group: Option<String>,
}

pub fn extract(ctx: &ItemContext<'_, '_>, variants: &[Variant]) -> Result<Vec<Experience>> {
    let template = ctx.template();
    if ctx.row.is_compact() {
        return Ok(vec![template.not_started()]);
    }

    let head_progress = if ctx.index == 0 {
        progress_from_fields("head", &ctx.row.head.prefix)?
    } else {
        None
    };
    let starts = start_entries(ctx)?;
    let ends = end_dates(ctx)?;

    let count = starts.len().max(ends.len());
    if count == 0 {
        let experience = match head_progress {
            Some(progress) => Experience {
                spans: vec![Span {
                    dates: template.span.dates,
                    amount: amount_of(ctx, variants, template.experience.variant_index),
                    progress: Some(progress),
                }],
                ..template.experience.clone()
            },
            None => template.not_started(),
        };
        return Ok(vec![experience]);
    }

    let mut experiences = Vec::with_capacity(count);
    for i in 0..count {
        let entry = starts.get(i);
        let start = entry.and_then(|e| e.start);
        let end = ends.get(i).copied().or_else(|| entry.and_then(|e| e.inline_end));

        let variant_index = match entry.and_then(|e| e.variant) {
            Some(number) => resolve_variant(number, variants)?,
            None => template.experience.variant_index,
        };

        let progress = entry
            .and_then(|e| e.progress)
            .or(if i + 1 == count { head_progress } else { None })
            .or(end.map(|_| Progress::Fraction(1.0)))
            .or(template.span.progress);

        let dates = if start.is_some() || end.is_some() {
            Some(DateRange { start, end })
        } else {
            template.span.dates
        };

        experiences.push(Experience {
            spans: vec![Span {
                dates,
                amount: amount_of(ctx, variants, variant_index),
                progress,
            }],
            group: entry
                .and_then(|e| e.group.clone())
                .or_else(|| template.experience.group.clone()),
            variant_index,
        });
    }

    chronology::validate(&experiences, ctx.config().overlap_policy)?;
    Ok(experiences)
}

fn amount_of(
    ctx: &ItemContext<'_, '_>,
    variants: &[Variant],
    variant_index: usize,
) -> Option<Length> {
    variants
        .get(variant_index)
        .and_then(|v| v.length)
        .or(ctx.column_length)
        .or(ctx.template().span.amount)
}

fn resolve_variant(number: usize, variants: &[Variant]) -> Result<usize> {
    if number == 0 || number > variants.len() {
        return Err(ParseError::unparsable(
            "start dates",
            format!("v{number}"),
            format!("the item has {} variant(s)", variants.len()),
        ));
    }
    Ok(number - 1)
}

fn start_entries(ctx: &ItemContext<'_, '_>) -> Result<Vec<StartEntry>> {
    let Some(column) = ctx.row.column(ColumnKind::StartDates) else {
        return Ok(Vec::new());
    };
    column.ensure_matched()?;

    column
        .segments()
        .map(|segment| {
            let fields = &segment.fields;
            Ok(StartEntry {
                start: fields
                    .scalar("start_date")
                    .map(|d| parse_date("start dates", d))
                    .transpose()?,
                inline_end: fields
                    .scalar("inline_end_date")
                    .map(|d| parse_date("start dates", d))
                    .transpose()?,
                progress: progress_from_fields("start dates", fields)?,
                variant: fields
                    .scalar("variant")
                    .map(|v| {
                        v.parse::<usize>().map_err(|_| {
                            ParseError::unparsable("start dates", v, "invalid variant number")
                        })
                    })
                    .transpose()?,
                group: fields.scalar("group").map(str::to_string),
            })
        })
        .collect()
}

fn end_dates(ctx: &ItemContext<'_, '_>) -> Result<Vec<NaiveDate>> {
    let Some(column) = ctx.row.column(ColumnKind::EndDates) else {
        return Ok(Vec::new());
    };
    column.ensure_matched()?;

    column
        .segments()
        .filter_map(|segment| segment.fields.scalar("end_date"))
        .map(|date| parse_date("end dates", date))
        .collect()
}
