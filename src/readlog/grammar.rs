//! Compiled grammar
//!
//! A [`Grammar`] is a [`Config`] with every pattern it implies compiled once:
//! the format-marker alternation, the directive shape, the per-column pattern
//! tables from [`columns`] with their placeholders filled in, and the token
//! scanners used inside variant details.
//!
//! Compiling is the only step that can fail on a bad fragment; parsing a line
//! against a compiled grammar only reads it.

pub mod columns;
pub mod fragments;
pub mod matcher;

pub use columns::{column_def, ColumnDef, ColumnKind, Position};
pub use fragments::FragmentSet;
pub use matcher::{FieldValue, Fields, PatternMatcher};

use crate::readlog::config::Config;
use crate::readlog::error::ParseError;
use regex::Regex;

/// One compiled candidate pattern of a column.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub position: Position,
    pub matcher: PatternMatcher,
}

/// A column definition with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledColumn {
    pub def: &'static ColumnDef,
    pub pre_format: Option<PatternMatcher>,
    pub separator: Option<Regex>,
    pub rules: Vec<CompiledRule>,
}

impl CompiledColumn {
    /// Candidate matchers for segment `position`, in declaration order.
    pub fn candidates(&self, position: usize) -> impl Iterator<Item = &PatternMatcher> {
        self.rules
            .iter()
            .filter(move |rule| rule.position.applies(position))
            .map(|rule| &rule.matcher)
    }

    pub fn kind(&self) -> ColumnKind {
        self.def.kind
    }
}

/// Scanners for the free-form details segment of a variant.
#[derive(Debug, Clone)]
pub struct TokenPatterns {
    pub url: Regex,
    /// ISBN or ASIN, whole tokens only.
    pub identifier: Regex,
    pub pages_length: Regex,
    pub time_length: Regex,
    pub name_separator: Regex,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    config: Config,
    format_marker: Regex,
    directive: Regex,
    columns: Vec<CompiledColumn>,
    tokens: TokenPatterns,
}

impl Grammar {
    /// Compile every pattern the configuration implies.
    pub fn compile(config: Config) -> Result<Self, ParseError> {
        let fragments = FragmentSet::from_config(&config);

        let format_marker = compile_regex("format marker", &expand(&fragments, "%format%")?)?;
        let directive = compile_regex(
            "directive",
            &format!(
                r"^\s*{}\s*(?P<body>\{{.*\}})\s*$",
                regex::escape(&config.comment_character)
            ),
        )?;

        let columns = ColumnKind::ALL
            .iter()
            .map(|kind| compile_column(column_def(*kind), &fragments))
            .collect::<Result<Vec<_>, _>>()?;

        let tokens = TokenPatterns {
            url: compile_regex("url", &expand(&fragments, "%url%")?)?,
            identifier: compile_regex(
                "identifier",
                &expand(&fragments, r"\b(?:%isbn%|%asin%)\b")?,
            )?,
            pages_length: compile_regex(
                "pages length",
                &expand(&fragments, r"\b(?P<pages>%pages%)p\b")?,
            )?,
            time_length: compile_regex(
                "time length",
                &expand(&fragments, r"\b(?P<time>%time%)\b")?,
            )?,
            name_separator: compile_regex("name separator", r"\s*,\s*")?,
        };

        tracing::debug!(
            formats = config.formats.len(),
            columns = config.enabled_columns.len(),
            "compiled grammar"
        );

        Ok(Self {
            config,
            format_marker,
            directive,
            columns,
            tokens,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn format_marker(&self) -> &Regex {
        &self.format_marker
    }

    pub fn has_format_marker(&self, text: &str) -> bool {
        self.format_marker.is_match(text)
    }

    pub fn directive(&self) -> &Regex {
        &self.directive
    }

    pub fn column(&self, kind: ColumnKind) -> &CompiledColumn {
        &self.columns[kind.index()]
    }

    pub fn tokens(&self) -> &TokenPatterns {
        &self.tokens
    }
}

fn compile_column(
    def: &'static ColumnDef,
    fragments: &FragmentSet,
) -> Result<CompiledColumn, ParseError> {
    let pre_format = def
        .pre_format
        .map(|template| matcher(fragments, "pre_format", template))
        .transpose()?;
    let separator = def
        .separator
        .map(|pattern| compile_regex("separator", pattern))
        .transpose()?;
    let rules = def
        .rules
        .iter()
        .map(|rule| {
            Ok(CompiledRule {
                position: rule.position,
                matcher: matcher(fragments, rule.name, rule.template)?,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    Ok(CompiledColumn {
        def,
        pre_format,
        separator,
        rules,
    })
}

fn matcher(
    fragments: &FragmentSet,
    name: &'static str,
    template: &str,
) -> Result<PatternMatcher, ParseError> {
    PatternMatcher::new(name, &expand(fragments, template)?)
        .map_err(|e| ParseError::InvalidConfig(e.to_string()))
}

fn expand(fragments: &FragmentSet, template: &str) -> Result<String, ParseError> {
    fragments
        .expand(template)
        .map_err(|e| ParseError::InvalidConfig(e.to_string()))
}

fn compile_regex(name: &str, pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|e| ParseError::InvalidConfig(format!("{name} pattern: {e}")))
}
