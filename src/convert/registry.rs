use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::Error;

use super::builtin::{ScalarConverter, ScalarKind, TableConverter};
use super::{BoxError, Converter};

/// Produces a converter on demand. Factories may fail, e.g. when the
/// converter needs a resource that is unavailable.
pub type ConverterFactory = Arc<dyn Fn() -> Result<Arc<dyn Converter>, BoxError> + Send + Sync>;

/// Maps declared type names, and explicit converter identifiers, to
/// converter factories.
///
/// A registry is built once by the caller and lent to a
/// [`Loader`](crate::Loader); nothing mutates it during a load.
///
/// ## Example
///
/// ```
/// use naming_loader::convert::BoxError;
/// use naming_loader::{ConverterRegistry, PropertyBag, Value};
///
/// let mut registry = ConverterRegistry::with_defaults();
/// registry.register(
///     "Upper",
///     |attributes: &PropertyBag, _type_name: &str| -> Result<Value, BoxError> {
///         let raw = attributes["valueToConvert"].as_str().unwrap_or_default();
///         Ok(Value::Text(raw.to_uppercase()))
///     },
/// );
/// assert!(registry.contains_type("Upper"));
/// assert!(registry.contains_type("Integer"));
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_type: HashMap<String, ConverterFactory>,
    by_name: HashMap<String, ConverterFactory>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in scalar converters and the
    /// `Table` composite converter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (type_name, kind) in [
            ("Long", ScalarKind::Long),
            ("Integer", ScalarKind::Integer),
            ("Short", ScalarKind::Short),
            ("Byte", ScalarKind::Byte),
            ("Double", ScalarKind::Double),
            ("Float", ScalarKind::Float),
            ("Boolean", ScalarKind::Boolean),
            ("String", ScalarKind::String),
            ("Character", ScalarKind::Character),
            ("Date", ScalarKind::Date),
        ] {
            registry.register(type_name, ScalarConverter::new(kind));
        }
        registry.register("Table", TableConverter);
        registry
    }

    /// Registers a shared converter for a declared type name.
    pub fn register(&mut self, type_name: impl Into<String>, converter: impl Converter + 'static) -> &mut Self {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        self.register_factory(type_name, move || Ok(converter.clone()))
    }

    /// Registers a factory for a declared type name. The factory runs each
    /// time a node of that type is converted.
    pub fn register_factory<F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn Converter>, BoxError> + Send + Sync + 'static,
    {
        self.by_type.insert(type_name.into(), Arc::new(factory));
        self
    }

    /// Registers a converter that typed nodes select explicitly with a
    /// `converter` attribute.
    pub fn register_named(&mut self, id: impl Into<String>, converter: impl Converter + 'static) -> &mut Self {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        self.register_named_factory(id, move || Ok(converter.clone()))
    }

    pub fn register_named_factory<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn Converter>, BoxError> + Send + Sync + 'static,
    {
        self.by_name.insert(id.into(), Arc::new(factory));
        self
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    /// Looks up the converter for a declared type.
    ///
    /// An unregistered type is not an error and yields `Ok(None)`.
    pub fn lookup(&self, type_name: &str) -> Result<Option<Arc<dyn Converter>>, Error> {
        self.by_type
            .get(type_name)
            .map(|factory| instantiate(type_name, factory))
            .transpose()
    }

    /// Resolves an explicitly named converter.
    pub fn resolve_named(&self, id: &str) -> Result<Arc<dyn Converter>, Error> {
        let factory = self
            .by_name
            .get(id)
            .ok_or_else(|| Error::ConverterNotFound(id.to_string()))?;
        instantiate(id, factory)
    }
}

fn instantiate(id: &str, factory: &ConverterFactory) -> Result<Arc<dyn Converter>, Error> {
    factory().map_err(|source| Error::ConverterInstantiation {
        converter: id.to_string(),
        source,
    })
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.by_type.keys().collect();
        let mut names: Vec<&String> = self.by_name.keys().collect();
        types.sort();
        names.sort();
        f.debug_struct("ConverterRegistry")
            .field("types", &types)
            .field("named", &names)
            .finish()
    }
}
