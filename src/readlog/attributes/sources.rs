//! Sources and identifiers from a variant's details segment
//!
//! The details segment is free-form. It is scanned in a fixed order, and each
//! recognized token is cut out before the next scan:
//!
//! 1. URLs, named after their domain (`source_names_from_urls`), else the
//!    default source name
//! 2. one ISBN or ASIN; a second one is an error
//! 3. a length token (`247p` or `h:mm`)
//! 4. whatever remains, split at commas, as bare source names
//!
//! Compact rows name sources with `@Name` tokens instead.

use super::length::take_length_token;
use crate::readlog::config::Config;
use crate::readlog::error::{ParseError, Result};
use crate::readlog::grammar::Grammar;
use crate::readlog::item::{Length, Source};

/// What a details segment holds besides the format marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Details {
    pub sources: Vec<Source>,
    pub isbn: Option<String>,
    pub length: Option<Length>,
}

pub fn scan_details(details: &str, grammar: &Grammar) -> Result<Details> {
    let tokens = grammar.tokens();
    let config = grammar.config();

    let mut sources: Vec<Source> = tokens
        .url
        .find_iter(details)
        .map(|m| url_source(m.as_str(), config))
        .collect();
    let mut rest = tokens.url.replace_all(details, " ").into_owned();

    let identifiers: Vec<String> = tokens
        .identifier
        .find_iter(&rest)
        .map(|m| m.as_str().to_string())
        .collect();
    if let Some(second) = identifiers.get(1) {
        return Err(ParseError::DuplicateIdentifier {
            what: "isbn",
            value: second.clone(),
        });
    }
    let isbn = identifiers.into_iter().next();
    rest = tokens.identifier.replace_all(&rest, " ").into_owned();

    let length = take_length_token(&mut rest, tokens)?;
    let rest = grammar.format_marker().replace_all(&rest, " ");

    sources.extend(
        tokens
            .name_separator
            .split(rest.trim())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Source {
                name: name.to_string(),
                url: None,
            }),
    );

    Ok(Details {
        sources,
        isbn,
        length,
    })
}

/// Sources written as `@Name @Other Name`.
pub fn from_at_tokens(text: &str) -> Vec<Source> {
    text.split('@')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Source {
            name: name.to_string(),
            url: None,
        })
        .collect()
}

fn url_source(url: &str, config: &Config) -> Source {
    Source {
        name: config.source_name_for_host(url_host(url)).to_string(),
        url: Some(url.to_string()),
    }
}

fn url_host(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = without_scheme
        .find(['/', '?', '#', ':'])
        .unwrap_or(without_scheme.len());
    &without_scheme[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readlog::error::ErrorKind;
    use crate::readlog::item::TimeLength;

    fn grammar() -> Grammar {
        Grammar::compile(Config::defaults().unwrap()).unwrap()
    }

    fn named(name: &str) -> Source {
        Source {
            name: name.into(),
            url: None,
        }
    }

    #[test]
    fn test_name_and_isbn() {
        let details = scan_details("Lexpub 0141439556", &grammar()).unwrap();
        assert_eq!(details.sources, vec![named("Lexpub")]);
        assert_eq!(details.isbn.as_deref(), Some("0141439556"));
        assert_eq!(details.length, None);
    }

    #[test]
    fn test_urls_come_first_and_are_named_by_domain() {
        let details = scan_details(
            "Hoopla, https://www.youtube.com/watch?v=abc, https://example.com/x 1:30",
            &grammar(),
        )
        .unwrap();
        assert_eq!(
            details.sources,
            vec![
                Source {
                    name: "YouTube".into(),
                    url: Some("https://www.youtube.com/watch?v=abc".into()),
                },
                Source {
                    name: "site".into(),
                    url: Some("https://example.com/x".into()),
                },
                named("Hoopla"),
            ]
        );
        assert_eq!(
            details.length,
            Some(Length::Duration(TimeLength::from_minutes(90)))
        );
    }

    #[test]
    fn test_two_identifiers_are_an_error() {
        let err = scan_details("0141439556 B00ABCDEFG", &grammar()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentifier);
    }

    #[test]
    fn test_at_tokens() {
        assert_eq!(
            from_at_tokens("@Hoopla @Lexpub Library"),
            vec![named("Hoopla"), named("Lexpub Library")]
        );
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("https://archive.org/details/x"), "archive.org");
        assert_eq!(url_host("http://localhost:8080"), "localhost");
    }
}
