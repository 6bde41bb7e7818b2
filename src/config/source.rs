use crate::value::PropertyBag;

use super::ConfigError;

/// Produces one flat property bag, e.g. from a file or the environment.
pub trait PropertySource: Send + Sync + std::fmt::Debug {
    fn properties(&self) -> Result<PropertyBag, ConfigError>;
}

/// Inserts `value` under `key`, collecting repeated keys into a list.
pub(crate) fn append(bag: &mut PropertyBag, key: String, value: String) {
    match bag.get_mut(&key) {
        Some(existing) => existing.push(value),
        None => {
            bag.insert(key, value.into());
        }
    }
}
