use crate::value::PropertyBag;

use super::source::{append, PropertySource};
use super::ConfigError;

/// A property source built from prefixed environment variables.
///
/// `MYAPP__DS__URL=jdbc:test` with prefix `MYAPP` and separator `__` becomes
/// the key `ds.url` (segments lowercased, joined with `.` unless another
/// joiner is set). Keys are sorted so the bag order is stable.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
    joiner: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
            joiner: ".".to_string(),
        }
    }

    /// Sets the text placed between key segments, normally the loader delimiter.
    pub fn joined_with(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }

    fn collect(&self, vars: impl IntoIterator<Item = (String, String)>) -> PropertyBag {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut bag = PropertyBag::new();

        for (key, value) in vars {
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }

            let key = path_str
                .split(&self.separator)
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>()
                .join(&self.joiner);
            append(&mut bag, key, value);
        }

        bag.sort_keys();
        bag
    }
}

impl PropertySource for EnvSource {
    fn properties(&self) -> Result<PropertyBag, ConfigError> {
        Ok(self.collect(std::env::vars()))
    }
}
