//! Experience Date Validator
//!
//! Checks the date spans of one item, in the order they are listed:
//!
//! - a span's end may not precede its start
//! - with two or more spans, a span may not start before an earlier span
//!   started, end before an earlier span ended, or start before an earlier
//!   span ended (overlap)
//!
//! Which spans are compared depends on the overlap policy: `reject` compares
//! every pair, `distinct_variants` only spans that read the same variant.
//! Placeholder (missing) dates take no part in a comparison.

use crate::readlog::config::OverlapPolicy;
use crate::readlog::error::ChronologyFault;
use crate::readlog::item::{DateRange, Experience};

pub fn validate(experiences: &[Experience], policy: OverlapPolicy) -> Result<(), ChronologyFault> {
    let spans: Vec<(usize, DateRange)> = experiences
        .iter()
        .flat_map(|experience| {
            experience
                .spans
                .iter()
                .filter_map(|span| span.dates)
                .map(move |dates| (experience.variant_index, dates))
        })
        .collect();

    for (_, dates) in &spans {
        if let (Some(start), Some(end)) = (dates.start, dates.end) {
            if end < start {
                return Err(ChronologyFault::EndBeforeStart { start, end });
            }
        }
    }

    for (i, (variant, current)) in spans.iter().enumerate() {
        for (earlier_variant, earlier) in &spans[..i] {
            if policy == OverlapPolicy::DistinctVariants && earlier_variant != variant {
                continue;
            }
            check_pair(earlier, current, *variant)?;
        }
    }
    Ok(())
}

fn check_pair(
    earlier: &DateRange,
    current: &DateRange,
    variant: usize,
) -> Result<(), ChronologyFault> {
    if let (Some(previous), Some(start)) = (earlier.start, current.start) {
        if start < previous {
            return Err(ChronologyFault::StartRegression {
                previous,
                current: start,
            });
        }
    }
    if let (Some(previous), Some(end)) = (earlier.end, current.end) {
        if end < previous {
            return Err(ChronologyFault::EndRegression {
                previous,
                current: end,
            });
        }
    }
    if let (Some(previous_end), Some(start)) = (earlier.end, current.start) {
        if start < previous_end {
            return Err(ChronologyFault::Overlap { start, variant });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readlog::item::Span;
    use chrono::NaiveDate;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y/%m/%d").unwrap())
    }

    fn session(start: &str, end: &str, variant_index: usize) -> Experience {
        let parse = |s: &str| if s.is_empty() { None } else { date(s) };
        Experience {
            spans: vec![Span {
                dates: Some(DateRange {
                    start: parse(start),
                    end: parse(end),
                }),
                amount: None,
                progress: None,
            }],
            group: None,
            variant_index,
        }
    }

    #[test]
    fn test_ordered_sessions_pass() {
        let sessions = vec![
            session("2021/01/01", "2021/01/10", 0),
            session("2022/01/01", "2022/01/10", 0),
            session("2023/01/01", "", 0),
        ];
        assert_eq!(validate(&sessions, OverlapPolicy::Reject), Ok(()));
    }

    #[test]
    fn test_end_before_start() {
        let sessions = vec![session("2022/01/10", "2022/01/01", 0)];
        assert!(matches!(
            validate(&sessions, OverlapPolicy::Reject),
            Err(ChronologyFault::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_start_regression() {
        let sessions = vec![
            session("2022/01/01", "", 0),
            session("2021/01/01", "", 0),
        ];
        assert!(matches!(
            validate(&sessions, OverlapPolicy::Reject),
            Err(ChronologyFault::StartRegression { .. })
        ));
    }

    #[test]
    fn test_end_regression() {
        let sessions = vec![
            session("", "2022/01/10", 0),
            session("", "2022/01/05", 0),
        ];
        assert!(matches!(
            validate(&sessions, OverlapPolicy::Reject),
            Err(ChronologyFault::EndRegression { .. })
        ));
    }

    #[test]
    fn test_overlap_depends_on_policy() {
        let sessions = vec![
            session("2022/01/01", "2022/01/05", 0),
            session("2022/01/03", "2022/01/10", 0),
        ];
        for policy in [OverlapPolicy::Reject, OverlapPolicy::DistinctVariants] {
            assert!(matches!(
                validate(&sessions, policy),
                Err(ChronologyFault::Overlap { variant: 0, .. })
            ));
        }

        let sessions = vec![
            session("2022/01/01", "2022/01/05", 0),
            session("2022/01/03", "2022/01/10", 1),
        ];
        assert!(validate(&sessions, OverlapPolicy::Reject).is_err());
        assert_eq!(validate(&sessions, OverlapPolicy::DistinctVariants), Ok(()));
    }

    #[test]
    fn test_placeholder_start_is_skipped() {
        let sessions = vec![
            session("2022/01/01", "2022/01/05", 0),
            session("", "2022/03/01", 0),
        ];
        assert_eq!(validate(&sessions, OverlapPolicy::Reject), Ok(()));
    }
}
