//! Item records
//!
//! The output unit of a parse. Every field is always present: either a parsed
//! value or the default taken from the configuration's template.
//!
//! ```text
//! Item
//! ├── rating, author, title, genres, notes, custom
//! ├── variants[]     format, series[], sources[], isbn, length, extra_info[]
//! └── experiences[]  spans[] (dates, amount, progress), group, variant_index
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One item (book, audiobook, course...) parsed from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub rating: Option<Rating>,
    pub author: Option<String>,
    pub title: String,
    pub genres: Vec<String>,
    pub variants: Vec<Variant>,
    pub experiences: Vec<Experience>,
    pub notes: Vec<Note>,
    /// Values of configuration-declared custom columns, keyed by column name.
    pub custom: BTreeMap<String, Option<CustomValue>>,
}

/// A rating keeps the shape it was written in: `4` stays an integer, `4.5` a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Integer(i64),
    Decimal(f64),
}

/// One edition/format/source of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub format: Option<String>,
    pub series: Vec<Series>,
    pub sources: Vec<Source>,
    pub isbn: Option<String>,
    pub length: Option<Length>,
    pub extra_info: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub volume: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: Option<String>,
}

/// Declared length of a variant. Page count and duration are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Pages(u32),
    Duration(TimeLength),
}

/// A duration written as `h:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeLength {
    minutes: u32,
}

impl TimeLength {
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for TimeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for TimeLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected h:mm, found {s:?}"))?;
        let hours: u32 = hours
            .parse()
            .map_err(|_| format!("invalid hours in {s:?}"))?;
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| format!("invalid minutes in {s:?}"))?;
        if minutes >= 60 {
            return Err(format!("minutes out of range in {s:?}"));
        }
        hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .map(Self::from_minutes)
            .ok_or_else(|| format!("duration out of range in {s:?}"))
    }
}

impl From<TimeLength> for String {
    fn from(value: TimeLength) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimeLength {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A reading of an item: one or more spans against one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub spans: Vec<Span>,
    /// Co-reader or reading group, e.g. a book club.
    pub group: Option<String>,
    /// 0-based index into the item's variants.
    pub variant_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub dates: Option<DateRange>,
    pub amount: Option<Length>,
    pub progress: Option<Progress>,
}

/// A date range whose start may be a placeholder (an end date listed without
/// a matching start date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// How far a session got.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    /// Fraction of the whole, `1.0` meaning finished.
    Fraction(f64),
    Pages(u32),
    Time(TimeLength),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Summary-length note, listed before the others.
    pub blurb: bool,
    pub private: bool,
    pub content: String,
}

/// Scalar value of a custom column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Number(f64),
    Text(String),
}
