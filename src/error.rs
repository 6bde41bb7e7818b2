use crate::config::ConfigError;
use crate::convert::BoxError;
use thiserror::Error;

/// Top-level error type for the naming-loader library.
///
/// Every variant is fatal to the load call that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("illegal node/branch clash at '{segment}': found {found}")]
    StructuralClash { segment: String, found: String },

    #[error("unable to find converter '{0}'")]
    ConverterNotFound(String),

    #[error("unable to create converter '{converter}': {source}")]
    ConverterInstantiation {
        converter: String,
        source: BoxError,
    },

    #[error("conversion to '{type_name}' failed: {source}")]
    Conversion { type_name: String, source: BoxError },

    #[error("not implemented: {0}")]
    UnsupportedOperation(String),
}
