//! Column Grammar Tables
//!
//! Each column type is described by data, not code:
//! 1. whether its text is first split into pieces at format markers
//! 2. an optional pre-format pattern for text before the first marker
//! 3. the separator that cuts a piece into segments
//! 4. an ordered list of candidate patterns, each tagged with the segment
//!    positions it applies to
//! 5. the field names coerced into lists
//!
//! Segment k is matched against the candidates for position k in declaration
//! order; the first match wins and later candidates are not tried. Patterns
//! are templates: `%name%` placeholders are filled from the configuration's
//! fragments when the grammar is compiled.

use serde::{Deserialize, Serialize};

/// The columns a row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Rating,
    Head,
    Sources,
    StartDates,
    EndDates,
    Genres,
    Length,
    Notes,
    /// The single column of a compact planned row.
    #[serde(skip)]
    CompactPlannedHead,
}

impl ColumnKind {
    /// Standard columns in the order they appear in a regular row.
    pub const STANDARD: [ColumnKind; 8] = [
        ColumnKind::Rating,
        ColumnKind::Head,
        ColumnKind::Sources,
        ColumnKind::StartDates,
        ColumnKind::EndDates,
        ColumnKind::Genres,
        ColumnKind::Length,
        ColumnKind::Notes,
    ];

    pub const ALL: [ColumnKind; 9] = [
        ColumnKind::Rating,
        ColumnKind::Head,
        ColumnKind::Sources,
        ColumnKind::StartDates,
        ColumnKind::EndDates,
        ColumnKind::Genres,
        ColumnKind::Length,
        ColumnKind::Notes,
        ColumnKind::CompactPlannedHead,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColumnKind::Rating => "rating",
            ColumnKind::Head => "head",
            ColumnKind::Sources => "sources",
            ColumnKind::StartDates => "start dates",
            ColumnKind::EndDates => "end dates",
            ColumnKind::Genres => "genres",
            ColumnKind::Length => "length",
            ColumnKind::Notes => "notes",
            ColumnKind::CompactPlannedHead => "compact planned head",
        }
    }

    /// Position of this kind in [`ColumnKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which segment positions a pattern applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Rest,
    Any,
}

impl Position {
    pub fn applies(self, index: usize) -> bool {
        match self {
            Position::First => index == 0,
            Position::Rest => index > 0,
            Position::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub position: Position,
    pub name: &'static str,
    pub template: &'static str,
}

const fn rule(position: Position, name: &'static str, template: &'static str) -> PatternRule {
    PatternRule {
        position,
        name,
        template,
    }
}

/// Definition of one column type.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub kind: ColumnKind,
    pub split_by_format: bool,
    pub pre_format: Option<&'static str>,
    pub separator: Option<&'static str>,
    pub rules: &'static [PatternRule],
    pub flatten: &'static [&'static str],
}

const LONG_SEPARATOR: &str = r"\s+--\s+";
const LIST_SEPARATOR: &str = r"\s*,\s*";

/// Leading DNF/progress marker of a regular head, before the first item.
const PROGRESS_PREFIX: &str = r"^\s*(?:(?P<dnf>%dnf%)(?:\s+|$))?(?:(?P<progress>%percent%|%page_progress%|%time%)(?:\s+|$))?";

/// Genre and source declarations of a compact row, before the first item.
const COMPACT_PREFIX: &str = r"^\s*(?P<genres>[^@:]*?)\s*(?P<sources>(?:@[^@:]+)*)\s*:\s*$";

/// Series and extra info share these patterns in heads and variants. Series
/// patterns come first so that a series segment never reads as extra info.
const HEAD_RULES: &[PatternRule] = &[
    rule(
        Position::First,
        "author_title",
        r"^(?:(?P<format_emoji>%format%)\s*)?(?:(?P<author>[^-\s].*?)\s+-\s+)?(?P<title>.*)$",
    ),
    rule(
        Position::Rest,
        "series_with_volume",
        r"^(?:in\s+)?(?P<series_name>.+?),?\s*#(?P<series_volume>\d+)$",
    ),
    rule(Position::Rest, "series", r"^in\s+(?P<series_name>.+)$"),
    rule(Position::Rest, "extra_info", r"^(?P<extra_info>.+)$"),
];

const SOURCES_RULES: &[PatternRule] = &[
    rule(
        Position::First,
        "variant_details",
        r"^(?:(?P<format_emoji>%format%)\s*)?(?P<details>.*)$",
    ),
    rule(
        Position::Rest,
        "series_with_volume",
        r"^(?:in\s+)?(?P<series_name>.+?),?\s*#(?P<series_volume>\d+)$",
    ),
    rule(Position::Rest, "series", r"^in\s+(?P<series_name>.+)$"),
    rule(Position::Rest, "extra_info", r"^(?P<extra_info>.+)$"),
];

/// Compact items may end any segment with `@Source` tokens.
const COMPACT_RULES: &[PatternRule] = &[
    rule(
        Position::First,
        "author_title",
        r"^(?P<format_emoji>%format%)\s*(?:(?P<author>[^-\s].*?)\s+-\s+)?(?P<title>.+?)(?P<sources>(?:\s+@[^@]+)*)$",
    ),
    rule(
        Position::Rest,
        "series_with_volume",
        r"^(?:in\s+)?(?P<series_name>.+?),?\s*#(?P<series_volume>\d+)(?P<sources>(?:\s+@[^@]+)*)$",
    ),
    rule(
        Position::Rest,
        "series",
        r"^in\s+(?P<series_name>.+?)(?P<sources>(?:\s+@[^@]+)*)$",
    ),
    rule(
        Position::Rest,
        "extra_info",
        r"^(?P<extra_info>.+?)(?P<sources>(?:\s+@[^@]+)*)$",
    ),
];

const RATING_RULES: &[PatternRule] = &[rule(
    Position::Any,
    "rating",
    r"^(?P<rating>\d+(?:\.\d+)?)$",
)];

const START_DATE_RULES: &[PatternRule] = &[rule(
    Position::Any,
    "start_entry",
    r"^(?:(?P<dnf>%dnf%)\s*)?(?:(?P<progress>%percent%|%page_progress%|%time%)\s*)?(?P<start_date>%date%)?(?:\s*(?:-|\.\.)?\s*(?P<inline_end_date>%date%))?(?:\s*v(?P<variant>\d+))?(?:\s*%group%\s*(?P<group>.+))?$",
)];

const END_DATE_RULES: &[PatternRule] =
    &[rule(Position::Any, "end_date", r"^(?P<end_date>%date%)$")];

const GENRE_RULES: &[PatternRule] = &[rule(Position::Any, "genre", r"^(?P<genre>.+)$")];

const LENGTH_RULES: &[PatternRule] = &[
    rule(Position::Any, "pages", r"^(?P<pages>%pages%)\s*p?$"),
    rule(Position::Any, "time", r"^(?P<time>%time%)$"),
];

const NOTE_RULES: &[PatternRule] = &[rule(
    Position::Any,
    "note",
    r"^(?P<sentinels>(?:%blurb%|%private%|\s)*)(?P<content>.*)$",
)];

static RATING: ColumnDef = ColumnDef {
    kind: ColumnKind::Rating,
    split_by_format: false,
    pre_format: None,
    separator: None,
    rules: RATING_RULES,
    flatten: &[],
};

static HEAD: ColumnDef = ColumnDef {
    kind: ColumnKind::Head,
    split_by_format: true,
    pre_format: Some(PROGRESS_PREFIX),
    separator: Some(LONG_SEPARATOR),
    rules: HEAD_RULES,
    flatten: &["extra_info", "series_name", "series_volume"],
};

static SOURCES: ColumnDef = ColumnDef {
    kind: ColumnKind::Sources,
    split_by_format: true,
    pre_format: None,
    separator: Some(LONG_SEPARATOR),
    rules: SOURCES_RULES,
    flatten: &["extra_info", "series_name", "series_volume"],
};

static START_DATES: ColumnDef = ColumnDef {
    kind: ColumnKind::StartDates,
    split_by_format: false,
    pre_format: None,
    separator: Some(LIST_SEPARATOR),
    rules: START_DATE_RULES,
    flatten: &[],
};

static END_DATES: ColumnDef = ColumnDef {
    kind: ColumnKind::EndDates,
    split_by_format: false,
    pre_format: None,
    separator: Some(LIST_SEPARATOR),
    rules: END_DATE_RULES,
    flatten: &[],
};

static GENRES: ColumnDef = ColumnDef {
    kind: ColumnKind::Genres,
    split_by_format: false,
    pre_format: None,
    separator: Some(LIST_SEPARATOR),
    rules: GENRE_RULES,
    flatten: &["genre"],
};

static LENGTH: ColumnDef = ColumnDef {
    kind: ColumnKind::Length,
    split_by_format: false,
    pre_format: None,
    separator: None,
    rules: LENGTH_RULES,
    flatten: &[],
};

static NOTES: ColumnDef = ColumnDef {
    kind: ColumnKind::Notes,
    split_by_format: false,
    pre_format: None,
    separator: Some(LONG_SEPARATOR),
    rules: NOTE_RULES,
    flatten: &[],
};

static COMPACT_PLANNED_HEAD: ColumnDef = ColumnDef {
    kind: ColumnKind::CompactPlannedHead,
    split_by_format: true,
    pre_format: Some(COMPACT_PREFIX),
    separator: Some(LONG_SEPARATOR),
    rules: COMPACT_RULES,
    flatten: &["extra_info", "series_name", "series_volume", "sources"],
};

/// The definition of a column type.
pub fn column_def(kind: ColumnKind) -> &'static ColumnDef {
    match kind {
        ColumnKind::Rating => &RATING,
        ColumnKind::Head => &HEAD,
        ColumnKind::Sources => &SOURCES,
        ColumnKind::StartDates => &START_DATES,
        ColumnKind::EndDates => &END_DATES,
        ColumnKind::Genres => &GENRES,
        ColumnKind::Length => &LENGTH,
        ColumnKind::Notes => &NOTES,
        ColumnKind::CompactPlannedHead => &COMPACT_PLANNED_HEAD,
    }
}
