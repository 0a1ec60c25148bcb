//! Micro-format values
//!
//! Conversions from the small tokens that several columns share (dates,
//! progress markers, page counts, durations) into typed values. The patterns
//! that find these tokens live in the grammar; this module only interprets
//! text a pattern has already accepted, so most failures here are values that
//! have the right shape but an impossible content (month 13, a 400% progress).

use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::Fields;
use crate::readlog::item::{Length, Progress, TimeLength};
use chrono::NaiveDate;

/// Parse `YYYY/MM/DD` (or with `-`) into a calendar date.
pub fn parse_date(column: &'static str, text: &str) -> Result<NaiveDate> {
    let mut parts = text.trim().split(['/', '-']).map(str::parse::<u32>);
    let (Some(Ok(year)), Some(Ok(month)), Some(Ok(day)), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::unparsable(column, text, "expected a date like 2022/01/31"));
    };
    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| ParseError::unparsable(column, text, "not a calendar date"))
}

pub fn parse_pages(column: &'static str, text: &str) -> Result<u32> {
    text.trim()
        .trim_start_matches('p')
        .trim_end_matches('p')
        .trim()
        .parse()
        .map_err(|_| ParseError::unparsable(column, text, "expected a page count"))
}

pub fn parse_time(column: &'static str, text: &str) -> Result<TimeLength> {
    text.parse()
        .map_err(|reason: String| ParseError::unparsable(column, text, reason))
}

/// Interpret a progress token: `NN%`, `pNN` or `h:mm`.
pub fn parse_progress(column: &'static str, text: &str) -> Result<Progress> {
    let text = text.trim();
    if let Some(percent) = text.strip_suffix('%') {
        let percent: u32 = percent
            .parse()
            .map_err(|_| ParseError::unparsable(column, text, "expected a percentage"))?;
        if percent > 100 {
            return Err(ParseError::unparsable(column, text, "percentage above 100"));
        }
        return Ok(Progress::Fraction(f64::from(percent) / 100.0));
    }
    if text.starts_with('p') {
        return parse_pages(column, text).map(Progress::Pages);
    }
    if text.contains(':') {
        return parse_time(column, text).map(Progress::Time);
    }
    Err(ParseError::unparsable(column, text, "expected NN%, pNN or h:mm"))
}

/// Progress from the `dnf` and `progress` captures of a segment.
///
/// An explicit progress token wins; a bare DNF means nothing was finished.
pub fn progress_from_fields(column: &'static str, fields: &Fields) -> Result<Option<Progress>> {
    match fields.scalar("progress") {
        Some(token) => parse_progress(column, token).map(Some),
        None if fields.contains("dnf") => Ok(Some(Progress::Fraction(0.0))),
        None => Ok(None),
    }
}

/// Length from the `pages` or `time` capture of a segment.
pub fn length_from_fields(column: &'static str, fields: &Fields) -> Result<Option<Length>> {
    if let Some(pages) = fields.scalar("pages") {
        return parse_pages(column, pages).map(|p| Some(Length::Pages(p)));
    }
    if let Some(time) = fields.scalar("time") {
        return parse_time(column, time).map(|t| Some(Length::Duration(t)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readlog::error::ErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_both_separators() {
        assert_eq!(parse_date("start dates", "2022/01/05").unwrap(), date(2022, 1, 5));
        assert_eq!(parse_date("start dates", "2022-1-5").unwrap(), date(2022, 1, 5));
    }

    #[test]
    fn test_parse_date_rejects_impossible_dates() {
        let err = parse_date("end dates", "2022/02/30").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnparsableExplicitValue);
        assert!(parse_date("end dates", "2022/13/01").is_err());
        assert!(parse_date("end dates", "yesterday").is_err());
    }

    #[test]
    fn test_parse_progress_variants() {
        assert_eq!(parse_progress("head", "50%").unwrap(), Progress::Fraction(0.5));
        assert_eq!(parse_progress("head", "p220").unwrap(), Progress::Pages(220));
        assert_eq!(
            parse_progress("head", "2:30").unwrap(),
            Progress::Time(TimeLength::from_minutes(150))
        );
        assert!(parse_progress("head", "150%").is_err());
    }

    #[test]
    fn test_bare_dnf_is_zero_progress() {
        let mut fields = Fields::new();
        fields.insert("dnf", "DNF".into(), false);
        assert_eq!(
            progress_from_fields("start dates", &fields).unwrap(),
            Some(Progress::Fraction(0.0))
        );

        fields.insert("progress", "30%".into(), false);
        assert_eq!(
            progress_from_fields("start dates", &fields).unwrap(),
            Some(Progress::Fraction(0.3))
        );
    }

    #[test]
    fn test_length_from_fields() {
        let mut fields = Fields::new();
        assert_eq!(length_from_fields("length", &fields).unwrap(), None);
        fields.insert("pages", "247".into(), false);
        assert_eq!(
            length_from_fields("length", &fields).unwrap(),
            Some(Length::Pages(247))
        );
    }
}
