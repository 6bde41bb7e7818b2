use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Options controlling how property keys map onto the naming tree.
///
/// The delimiter has no default. A config without one is accepted here and
/// rejected when a [`Loader`](crate::Loader) is constructed from it.
///
/// ## Example
///
/// ```
/// use naming_loader::LoaderConfig;
///
/// let config = LoaderConfig::new()
///     .with_delimiter(".")
///     .with_colon_replace("--");
/// assert_eq!(config.delimiter(), Some("."));
/// ```
///
/// The same options can be read from a TOML file:
///
/// ```toml
/// delimiter = "/"
/// colon-replace = "--"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[must_use]
pub struct LoaderConfig {
    delimiter: Option<String>,
    colon_replace: Option<String>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key delimiter.
    ///
    /// A single character is matched literally; anything longer is treated
    /// as a regular expression, e.g. `\.|/`.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Sets the token that stands in for `:` in file and directory names.
    pub fn with_colon_replace(mut self, token: impl Into<String>) -> Self {
        self.colon_replace = Some(token.into());
        self
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    pub fn colon_replace(&self) -> Option<&str> {
        self.colon_replace.as_deref()
    }

    /// Parses loader options from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads loader options from a TOML file. The file must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Replaces every occurrence of the colon token in `name` with `:`.
    pub fn apply_colon_replace(&self, name: &str) -> String {
        match self.colon_replace.as_deref() {
            Some(token) if !token.is_empty() && name.contains(token) => name.replace(token, ":"),
            _ => name.to_string(),
        }
    }
}
