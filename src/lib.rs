//! # readlog
//!
//! A parser for pipe-delimited personal reading logs.
//!
//! Each line of a reading log is classified by shape, split into columns and
//! segments, and turned into zero or more [`Item`](readlog::item::Item) records.
//!
//! File Layout
//!
//! src/readlog
//!   ├── config       Configuration data, embedded defaults and layering
//!   ├── grammar      Column pattern tables compiled against a configuration
//!   ├── parsing      Row classification, head splitting, column segmentation
//!   ├── attributes   Per-attribute extractors producing item fields
//!   ├── chronology   Date-span validation across reading sessions
//!   └── driver       Line-ordered session that threads configuration forward
//!
//! For testing helpers, see the [testing module](readlog::testing).

pub mod readlog;

pub use readlog::driver::{LineError, LogParser, Report};
pub use readlog::error::{ErrorKind, ParseError};
pub use readlog::item::Item;
pub use readlog::parsing::{parse_row, RowOutcome};
