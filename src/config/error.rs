use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("the delimiter option is mandatory")]
    MissingDelimiter,

    #[error("invalid delimiter pattern '{pattern}': {source}")]
    InvalidDelimiter {
        pattern: String,
        source: regex::Error,
    },

    #[error("required file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse XML file '{path}': {source}")]
    XmlParseError {
        path: PathBuf,
        source: quick_xml::Error,
    },

    #[error("failed to deserialize loader config: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("unsupported property file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("cannot flatten non-scalar value at '{0}'")]
    NonScalarValue(String),

    #[error("cannot flatten nested table '{0}' without a literal delimiter")]
    NestedTable(String),
}
