pub mod bind;
pub mod config;
pub mod context;
pub mod convert;
mod error;
mod loader;
mod value;

pub use config::{ConfigError, LoaderConfig, PropertySource};
pub use context::{Context, Node};
pub use convert::{Converter, ConverterRegistry};
pub use error::Error;
pub use loader::Loader;
pub use value::{PropertyBag, RawValue, Value};
