//! Key segmentation.

use regex::Regex;

use crate::config::ConfigError;
use crate::convert::TYPE_ATTRIBUTE;

/// The configured key delimiter.
///
/// A single-character delimiter is matched literally. Anything longer is a
/// regular expression, so `\.|/` accepts both `a.b` and `a/b`.
#[derive(Debug, Clone)]
pub struct Delimiter {
    source: String,
    pattern: Regex,
}

/// Position of a delimiter occurrence within a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterMatch {
    start: usize,
    end: usize,
}

/// The node that owns a `type` pseudo-attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    /// A bare `type` key: the whole bag describes one object.
    Root,
    /// A key such as `ds.type` declares the node `ds`.
    Key(String),
}

impl Delimiter {
    pub fn new(delimiter: &str) -> Result<Self, ConfigError> {
        if delimiter.is_empty() {
            return Err(ConfigError::MissingDelimiter);
        }
        let expression = if delimiter.chars().count() == 1 {
            regex::escape(delimiter)
        } else {
            delimiter.to_string()
        };
        let pattern = Regex::new(&expression).map_err(|source| ConfigError::InvalidDelimiter {
            pattern: delimiter.to_string(),
            source,
        })?;
        Ok(Self {
            source: delimiter.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the delimiter text if it is matched literally.
    pub fn literal(&self) -> Option<&str> {
        (self.source.chars().count() == 1).then_some(self.source.as_str())
    }

    /// Splits `key` into its path segments, dropping empty ones.
    pub fn split<'k>(&self, key: &'k str) -> Vec<&'k str> {
        self.pattern.split(key).filter(|segment| !segment.is_empty()).collect()
    }

    /// Finds the last delimiter occurrence that has text on both sides.
    pub fn last_match(&self, key: &str) -> Option<DelimiterMatch> {
        self.pattern
            .find_iter(key)
            .filter(|m| m.start() < m.end() && m.start() > 0 && m.end() < key.len())
            .last()
            .map(|m| DelimiterMatch {
                start: m.start(),
                end: m.end(),
            })
    }

    /// Returns the owning node if `key` is a `type` pseudo-attribute.
    pub fn type_owner(&self, key: &str) -> Option<NodePath> {
        if key == TYPE_ATTRIBUTE {
            return Some(NodePath::Root);
        }
        let m = self.last_match(key)?;
        (m.leaf_name(key) == TYPE_ATTRIBUTE).then(|| NodePath::Key(m.parent_path(key).to_string()))
    }
}

impl DelimiterMatch {
    /// Everything before the delimiter.
    pub fn parent_path<'k>(&self, key: &'k str) -> &'k str {
        &key[..self.start]
    }

    /// Everything after the delimiter.
    pub fn leaf_name<'k>(&self, key: &'k str) -> &'k str {
        &key[self.end..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Delimiter {
        Delimiter::new(".").unwrap()
    }

    #[test]
    fn test_single_char_is_literal() {
        let delimiter = dot();
        assert_eq!(delimiter.split("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(delimiter.split("abc"), vec!["abc"]);
        assert_eq!(delimiter.literal(), Some("."));
    }

    #[test]
    fn test_pattern_delimiter() {
        let delimiter = Delimiter::new(r"\.|/").unwrap();
        assert_eq!(delimiter.split("a/b.c"), vec!["a", "b", "c"]);
        assert_eq!(delimiter.literal(), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Delimiter::new("(.");
        assert!(matches!(result, Err(ConfigError::InvalidDelimiter { .. })));
    }

    #[test]
    fn test_empty_delimiter() {
        assert!(matches!(Delimiter::new(""), Err(ConfigError::MissingDelimiter)));
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(dot().split(".a..b."), vec!["a", "b"]);
    }

    #[test]
    fn test_last_match_splits_at_last_occurrence() {
        let key = "a.b.c";
        let m = dot().last_match(key).unwrap();
        assert_eq!(m.parent_path(key), "a.b");
        assert_eq!(m.leaf_name(key), "c");
    }

    #[test]
    fn test_last_match_needs_text_on_both_sides() {
        let delimiter = dot();
        assert_eq!(delimiter.last_match("plain"), None);
        assert_eq!(delimiter.last_match(".a"), None);
        assert_eq!(delimiter.last_match("a."), None);
        let m = delimiter.last_match("a.b.").unwrap();
        assert_eq!(m.parent_path("a.b."), "a");
    }

    #[test]
    fn test_multi_char_match_width() {
        let delimiter = Delimiter::new("::").unwrap();
        let key = "java::comp::env";
        let m = delimiter.last_match(key).unwrap();
        assert_eq!(m.parent_path(key), "java::comp");
        assert_eq!(m.leaf_name(key), "env");
    }

    #[test]
    fn test_type_owner() {
        let delimiter = dot();
        assert_eq!(delimiter.type_owner("type"), Some(NodePath::Root));
        assert_eq!(delimiter.type_owner("ds.type"), Some(NodePath::Key("ds".into())));
        assert_eq!(
            delimiter.type_owner("a.b.type"),
            Some(NodePath::Key("a.b".into()))
        );
        assert_eq!(delimiter.type_owner("ds.types"), None);
        assert_eq!(delimiter.type_owner("dstype"), None);
        assert_eq!(delimiter.type_owner("type.name"), None);
        assert_eq!(delimiter.type_owner(".type"), None);
    }

    #[test]
    fn test_type_owner_with_slash_delimiter() {
        let delimiter = Delimiter::new("/").unwrap();
        assert_eq!(
            delimiter.type_owner("Sybase/type"),
            Some(NodePath::Key("Sybase".into()))
        );
        assert_eq!(delimiter.type_owner("Sybase.type"), None);
    }
}
