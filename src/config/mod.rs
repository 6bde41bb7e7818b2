//! Loader configuration and property sources.

mod builder;
mod env;
mod error;
mod file;
mod ini;
mod properties;
mod source;
mod xml;

pub use builder::LoaderConfig;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use ini::parse_ini;
pub use properties::parse_properties;
pub use source::PropertySource;
pub use xml::parse_xml;
