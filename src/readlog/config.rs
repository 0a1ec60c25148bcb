//! Configuration for the reading-log grammar.
//!
//! `defaults/readlog.default.yaml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`Config`].
//!
//! The same layering (a deep merge of YAML mappings) applies custom config
//! directive rows: a directive yields a new `Config`, the previous one is left
//! untouched.

use crate::readlog::error::ParseError;
use crate::readlog::grammar::ColumnKind;
use crate::readlog::item::{CustomValue, Experience, Item, Span, Variant};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_YAML: &str = include_str!("../../defaults/readlog.default.yaml");

/// Top-level configuration consumed by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub comment_character: String,
    pub column_separator: String,
    /// Characters stripped from a line before it is parsed.
    pub ignored_characters: String,
    pub skip_compact_planned: bool,
    /// Downgrade unclassified failures to a generic "line could not be parsed".
    pub catch_all_errors: bool,
    pub overlap_policy: OverlapPolicy,
    pub enabled_columns: Vec<ColumnKind>,
    pub custom_columns: Vec<CustomColumn>,
    /// Format name to emoji marker.
    pub formats: BTreeMap<String, String>,
    /// URL domain to source name.
    pub source_names_from_urls: BTreeMap<String, String>,
    pub default_source_name: String,
    pub sentinels: Sentinels,
    pub fragments: Fragments,
    pub template: Template,
}

/// How overlapping reading sessions of one item are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Any two overlapping sessions are an error.
    Reject,
    /// Sessions may overlap only when they read different variants.
    DistinctVariants,
}

/// A column declared purely in configuration, placed after the standard columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomColumn {
    pub name: String,
    pub kind: CustomKind,
    #[serde(default)]
    pub default: Option<CustomValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomKind {
    Numeric,
    Text,
}

/// Glyphs with a fixed meaning inside columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    pub blurb: String,
    pub private: String,
    pub group: String,
}

/// Regex fragments substituted into the column pattern tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragments {
    pub date: String,
    pub isbn: String,
    pub asin: String,
    pub url: String,
    pub pages: String,
    pub time: String,
    pub percent: String,
    pub page_progress: String,
    pub dnf: String,
}

/// Canonical default records. Extractors fall back to these, never to
/// constants of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub item: Item,
    pub variant: Variant,
    pub experience: Experience,
    pub span: Span,
}

impl Template {
    /// The experience of an item that has not been started.
    pub fn not_started(&self) -> Experience {
        Experience {
            spans: vec![self.span.clone()],
            ..self.experience.clone()
        }
    }
}

impl Config {
    /// The embedded defaults, without any user layers.
    pub fn defaults() -> Result<Self, ConfigError> {
        Loader::new().build()
    }

    /// Standard columns in row order. Disabled columns are left out.
    pub fn standard_columns(&self) -> Vec<ColumnKind> {
        let mut columns: Vec<ColumnKind> = ColumnKind::STANDARD
            .iter()
            .copied()
            .filter(|kind| self.enabled_columns.contains(kind))
            .collect();
        columns.dedup();
        columns
    }

    /// Format name for a marker emoji. A trailing variation selector is ignored.
    pub fn format_name(&self, emoji: &str) -> Option<&str> {
        let wanted = strip_variation_selector(emoji);
        self.formats
            .iter()
            .find(|(_, marker)| strip_variation_selector(marker) == wanted)
            .map(|(name, _)| name.as_str())
    }

    /// Source name for a URL host: exact domain or any parent domain listed in
    /// `source_names_from_urls`, else `default_source_name`.
    pub fn source_name_for_host(&self, host: &str) -> &str {
        let host = host.trim_start_matches("www.");
        self.source_names_from_urls
            .iter()
            .find(|(domain, _)| {
                host == domain.as_str()
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .map(|(_, name)| name.as_str())
            .unwrap_or(&self.default_source_name)
    }

    /// Apply a directive body on top of this configuration.
    ///
    /// The merged document must still deserialize into a `Config`; unknown
    /// shapes are reported as a malformed directive.
    pub fn merge_directive(&self, patch: &Mapping) -> Result<Config, ParseError> {
        let mut base = serde_yaml::to_value(self)
            .map_err(|e| ParseError::MalformedDirective(e.to_string()))?;
        deep_merge(&mut base, Value::Mapping(patch.clone()));
        serde_yaml::from_value(base).map_err(|e| ParseError::MalformedDirective(e.to_string()))
    }
}

pub(crate) fn strip_variation_selector(s: &str) -> &str {
    s.trim_end_matches('\u{FE0F}')
}

/// Recursively merge `overlay` into `base`. Mappings merge key by key; any
/// other value replaces what was there.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Errors raised while loading configuration layers.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid override {key:?}: {reason}")]
    Override { key: String, reason: String },
}

#[derive(Debug, Clone)]
enum Layer {
    Embedded,
    File { path: PathBuf, required: bool },
    Override { key: String, value: Value },
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    layers: Vec<Layer>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::Embedded],
        }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Apply a single key/value override (useful for CLI settings). Dotted keys
    /// address nested mappings.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<Value>,
    {
        if key.split('.').any(str::is_empty) {
            return Err(ConfigError::Override {
                key: key.to_string(),
                reason: "empty key segment".to_string(),
            });
        }
        self.layers.push(Layer::Override {
            key: key.to_string(),
            value: value.into(),
        });
        Ok(self)
    }

    /// Finalize the layers and deserialize the resulting configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut merged = Value::Mapping(Mapping::new());
        for layer in self.layers {
            match layer {
                Layer::Embedded => deep_merge(&mut merged, serde_yaml::from_str(DEFAULT_YAML)?),
                Layer::File { path, required } => match std::fs::read_to_string(&path) {
                    Ok(source) => deep_merge(&mut merged, serde_yaml::from_str(&source)?),
                    Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(source) => return Err(ConfigError::Io { path, source }),
                },
                Layer::Override { key, value } => {
                    let nested = key.rsplit('.').fold(value, |inner, segment| {
                        let mut map = Mapping::new();
                        map.insert(Value::String(segment.to_string()), inner);
                        Value::Mapping(map)
                    });
                    deep_merge(&mut merged, nested);
                }
            }
        }
        Ok(serde_yaml::from_value(merged)?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.column_separator, "|");
        assert_eq!(config.comment_character, "\\");
        assert_eq!(config.formats.get("print").map(String::as_str), Some("📕"));
        assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
        assert!(config.template.item.genres.is_empty());
    }

    #[test]
    fn test_standard_columns_follow_row_order() {
        let mut config = Config::defaults().unwrap();
        config.enabled_columns = vec![ColumnKind::Notes, ColumnKind::Head, ColumnKind::Rating];
        assert_eq!(
            config.standard_columns(),
            vec![ColumnKind::Rating, ColumnKind::Head, ColumnKind::Notes]
        );
    }

    #[test]
    fn test_format_name_ignores_variation_selector() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.format_name("🎞"), Some("video"));
        assert_eq!(config.format_name("🎞\u{FE0F}"), Some("video"));
        assert_eq!(config.format_name("🦀"), None);
    }

    #[test]
    fn test_source_name_for_host() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.source_name_for_host("www.youtube.com"), "YouTube");
        assert_eq!(config.source_name_for_host("m.youtube.com"), "YouTube");
        assert_eq!(config.source_name_for_host("notyoutube.com"), "site");
        assert_eq!(config.source_name_for_host("example.org"), "site");
    }

    #[test]
    fn test_override_nested_key() {
        let config = Loader::new()
            .set_override("sentinels.blurb", "📝")
            .unwrap()
            .set_override("skip_compact_planned", true)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.sentinels.blurb, "📝");
        assert_eq!(config.sentinels.private, "🔒");
        assert!(config.skip_compact_planned);
    }

    #[test]
    fn test_override_rejects_empty_segment() {
        assert!(Loader::new().set_override("sentinels..blurb", "x").is_err());
    }

    #[test]
    fn test_optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/readlog.yaml")
            .build()
            .unwrap();
        assert_eq!(config, Config::defaults().unwrap());
    }

    #[test]
    fn test_required_file_must_exist() {
        let result = Loader::new().with_file("/nonexistent/readlog.yaml").build();
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_merge_directive_replaces_lists_and_merges_maps() {
        let config = Config::defaults().unwrap();
        let patch: Mapping =
            serde_yaml::from_str("{enabled_columns: [head, genres], formats: {zine: '📰'}}")
                .unwrap();
        let merged = config.merge_directive(&patch).unwrap();
        assert_eq!(merged.enabled_columns, vec![ColumnKind::Head, ColumnKind::Genres]);
        assert_eq!(merged.formats.get("zine").map(String::as_str), Some("📰"));
        assert_eq!(merged.formats.get("print").map(String::as_str), Some("📕"));
        // the original is untouched
        assert_eq!(config.enabled_columns.len(), 8);
    }

    #[test]
    fn test_merge_directive_rejects_bad_shape() {
        let config = Config::defaults().unwrap();
        let patch: Mapping = serde_yaml::from_str("{enabled_columns: 5}").unwrap();
        assert!(matches!(
            config.merge_directive(&patch),
            Err(ParseError::MalformedDirective(_))
        ));
    }

    #[test]
    fn test_not_started_experience_has_one_default_span() {
        let config = Config::defaults().unwrap();
        let experience = config.template.not_started();
        assert_eq!(experience.spans, vec![config.template.span.clone()]);
        assert_eq!(experience.variant_index, 0);
        assert_eq!(experience.group, None);
    }
}
