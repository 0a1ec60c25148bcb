//! Log parsing session
//!
//! [`parse_row`] is pure: it never changes the grammar it reads. A
//! [`LogParser`] owns the grammar of one processing session and threads it
//! forward in line order, so a config directive affects the lines after it
//! and never the lines before.
//!
//! In catch-all mode (`catch_all_errors`) failures outside the classified
//! kinds, including panics inside a row parse, are reported as a generic
//! "line could not be parsed" error for that line instead of propagating.

use crate::readlog::config::Config;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::Grammar;
use crate::readlog::item::Item;
use crate::readlog::parsing::{parse_row, RowOutcome};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, error};

/// A failed line, for batch reports.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line_number}: {error}")]
pub struct LineError {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
    pub error: ParseError,
}

/// Everything parsed from a text, with the lines that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub items: Vec<Item>,
    pub errors: Vec<LineError>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LogParser {
    grammar: Grammar,
}

impl LogParser {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            grammar: Grammar::compile(config)?,
        })
    }

    /// The grammar the next line will be parsed with.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn config(&self) -> &Config {
        self.grammar.config()
    }

    /// Parse the next line. A directive line updates the session and yields
    /// no items.
    pub fn parse_line(&mut self, line: &str) -> Result<Vec<Item>> {
        if !self.config().catch_all_errors {
            return self.apply(line);
        }

        catch_all(line, || self.apply(line))
    }

    /// Parse every line of `text` in order. A failed line is recorded and
    /// parsing continues with the next one.
    pub fn parse_str(&mut self, text: &str) -> Report {
        let mut report = Report::default();
        for (index, line) in text.lines().enumerate() {
            match self.parse_line(line) {
                Ok(items) => report.items.extend(items),
                Err(error) => report.errors.push(LineError {
                    line_number: index + 1,
                    line: line.to_string(),
                    error,
                }),
            }
        }
        debug!(
            items = report.items.len(),
            errors = report.errors.len(),
            "parsed log"
        );
        report
    }

    fn apply(&mut self, line: &str) -> Result<Vec<Item>> {
        match parse_row(line, &self.grammar)? {
            RowOutcome::Items(items) => Ok(items),
            RowOutcome::Directive(grammar) => {
                self.grammar = *grammar;
                debug!("configuration updated by directive");
                Ok(Vec::new())
            }
        }
    }
}

/// Run one line's parse, reporting anything outside the classified error
/// kinds (a panic included) as [`ParseError::Unparsable`].
fn catch_all<F>(line: &str, parse: F) -> Result<Vec<Item>>
where
    F: FnOnce() -> Result<Vec<Item>>,
{
    match catch_unwind(AssertUnwindSafe(parse)) {
        Ok(Ok(items)) => Ok(items),
        Ok(Err(e)) if e.kind().is_classified() => Err(e),
        Ok(Err(e)) => Err(ParseError::Unparsable(e.to_string())),
        Err(panic_payload) => {
            let panic_msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            error!(line, panic_msg = %panic_msg, "row parser panicked");
            Err(ParseError::Unparsable(panic_msg))
        }
    }
}
