//! Pluggable converters that turn raw attributes into bound values.

mod builtin;
mod registry;

pub use builtin::{ScalarConverter, ScalarKind, TableConverter};
pub use registry::{ConverterFactory, ConverterRegistry};

use thiserror::Error;

use crate::{PropertyBag, Value};

/// Boxed error returned by converters and converter factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Attribute holding the raw value of a scalar typed node.
pub const VALUE_TO_CONVERT: &str = "valueToConvert";

/// Attribute holding a typed node's declared type name.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Attribute naming an explicit converter for one typed node.
pub const CONVERTER_ATTRIBUTE: &str = "converter";

/// Turns the attributes of one typed node into a value.
///
/// `attributes` always contains the `type` entry. Scalar nodes carry their
/// raw value under [`VALUE_TO_CONVERT`]; composite nodes carry one entry per
/// attribute. Converters must not touch the naming tree.
pub trait Converter: Send + Sync {
    fn convert(&self, attributes: &PropertyBag, type_name: &str) -> Result<Value, BoxError>;
}

impl<F> Converter for F
where
    F: Fn(&PropertyBag, &str) -> Result<Value, BoxError> + Send + Sync,
{
    fn convert(&self, attributes: &PropertyBag, type_name: &str) -> Result<Value, BoxError> {
        self(attributes, type_name)
    }
}

/// Errors raised by the built-in converters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("no single 'valueToConvert' attribute for type '{type_name}'")]
    MissingValue { type_name: String },

    #[error("cannot convert {value:?} to '{type_name}': {reason}")]
    Invalid {
        type_name: String,
        value: String,
        reason: String,
    },
}
