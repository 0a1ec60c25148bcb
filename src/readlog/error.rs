//! Error types for row parsing

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for row parsing
pub type Result<T> = std::result::Result<T, ParseError>;

/// Why a row could not be turned into items. Every variant aborts the current
/// line only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A mandatory column or field is empty
    #[error("missing {field}: {detail}")]
    MissingRequiredField { field: &'static str, detail: String },

    /// Two items share a title, or a variant carries two ISBN/ASINs
    #[error("duplicate {what}: {value:?}")]
    DuplicateIdentifier { what: &'static str, value: String },

    /// A populated column whose content matches none of its patterns
    #[error("could not parse {column} {value:?}: {reason}")]
    UnparsableExplicitValue {
        column: &'static str,
        value: String,
        reason: String,
    },

    /// Reading sessions are out of order
    #[error("invalid chronology: {0}")]
    InvalidChronology(#[from] ChronologyFault),

    /// A config directive row whose body is not a valid mapping
    #[error("malformed config directive: {0}")]
    MalformedDirective(String),

    /// The configuration produced a grammar that does not compile
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all report for failures outside the kinds above
    #[error("line could not be parsed: {0}")]
    Unparsable(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            ParseError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            ParseError::UnparsableExplicitValue { .. } => ErrorKind::UnparsableExplicitValue,
            ParseError::InvalidChronology(_) => ErrorKind::InvalidChronology,
            ParseError::MalformedDirective(_) => ErrorKind::MalformedDirective,
            ParseError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ParseError::Unparsable(_) => ErrorKind::Unparsable,
        }
    }

    pub(crate) fn unparsable(
        column: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParseError::UnparsableExplicitValue {
            column,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Fieldless mirror of [`ParseError`] for matching on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequiredField,
    DuplicateIdentifier,
    UnparsableExplicitValue,
    InvalidChronology,
    MalformedDirective,
    InvalidConfig,
    Unparsable,
}

impl ErrorKind {
    /// Kinds that are always reported as-is, even in catch-all mode.
    pub fn is_classified(self) -> bool {
        !matches!(self, ErrorKind::InvalidConfig | ErrorKind::Unparsable)
    }
}

/// A date-ordering fault between or within reading sessions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChronologyFault {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("start date {current} is before the previous start date {previous}")]
    StartRegression {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("end date {current} is before the previous end date {previous}")]
    EndRegression {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("session starting {start} overlaps an earlier session of variant index {variant}")]
    Overlap { start: NaiveDate, variant: usize },
}
