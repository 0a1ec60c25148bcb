//! Micro-format fragments
//!
//! Column patterns are written as templates with `%name%` placeholders. The
//! placeholders are filled from the configuration: regex fragments (dates,
//! ISBNs, URLs, progress markers), the alternation of format emojis, and the
//! escaped sentinel glyphs. Every fragment is wrapped in a non-capturing group
//! so it can sit next to quantifiers and alternations safely.

use crate::readlog::config::{strip_variation_selector, Config};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%([a-z_]+)%").unwrap());

/// Matches nothing; stands in for an empty format list.
const NEVER: &str = r"[^\s\S]";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FragmentError {
    #[error("unknown placeholder %{0}% in pattern template")]
    UnknownPlaceholder(String),
}

/// Named regex fragments available to pattern templates.
#[derive(Debug, Clone)]
pub struct FragmentSet {
    fragments: BTreeMap<&'static str, String>,
}

impl FragmentSet {
    pub fn from_config(config: &Config) -> Self {
        let f = &config.fragments;
        let mut fragments = BTreeMap::new();
        fragments.insert("date", group(&f.date));
        fragments.insert("isbn", group(&f.isbn));
        fragments.insert("asin", group(&f.asin));
        fragments.insert("url", group(&f.url));
        fragments.insert("pages", group(&f.pages));
        fragments.insert("time", group(&f.time));
        fragments.insert("percent", group(&f.percent));
        fragments.insert("page_progress", group(&f.page_progress));
        fragments.insert("dnf", group(&f.dnf));
        fragments.insert("format", format_alternation(config.formats.values()));
        fragments.insert("blurb", group(&regex::escape(&config.sentinels.blurb)));
        fragments.insert("private", group(&regex::escape(&config.sentinels.private)));
        fragments.insert("group", group(&regex::escape(&config.sentinels.group)));
        Self { fragments }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(String::as_str)
    }

    /// Replace every `%name%` in `template` with its fragment.
    pub fn expand(&self, template: &str) -> Result<String, FragmentError> {
        if let Some(unknown) = PLACEHOLDER
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .find(|name| !self.fragments.contains_key(name.as_str()))
        {
            return Err(FragmentError::UnknownPlaceholder(unknown));
        }
        Ok(PLACEHOLDER
            .replace_all(template, |caps: &regex::Captures| {
                self.fragments[&caps[1]].clone()
            })
            .into_owned())
    }
}

fn group(fragment: &str) -> String {
    format!("(?:{fragment})")
}

/// Alternation of format markers, longest first so that multi-codepoint
/// emojis win over their prefixes. The variation selector is optional.
pub fn format_alternation<'a>(markers: impl Iterator<Item = &'a String>) -> String {
    let mut escaped: Vec<String> = markers
        .map(|m| strip_variation_selector(m))
        .filter(|m| !m.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return NEVER.to_string();
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    format!("(?:{})\u{FE0F}?", escaped.join("|"))
}
