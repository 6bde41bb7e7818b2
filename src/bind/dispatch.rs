//! Selection and invocation of converters for typed nodes.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::convert::{Converter, ConverterRegistry, CONVERTER_ATTRIBUTE, VALUE_TO_CONVERT};
use crate::{Error, PropertyBag, RawValue, Value};

/// Converts one typed node's attributes into the value to bind.
///
/// An explicit `converter` attribute wins over the declared type. A type
/// with no registered converter passes its raw value through unchanged.
/// A list under `valueToConvert` is converted element by element.
pub fn convert(attributes: &PropertyBag, type_name: &str, registry: &ConverterRegistry) -> Result<Value, Error> {
    if let Some(id) = attributes.get(CONVERTER_ATTRIBUTE).and_then(RawValue::as_str) {
        let converter = registry.resolve_named(id)?;
        return invoke(converter.as_ref(), attributes, type_name);
    }

    let Some(converter) = registry.lookup(type_name)? else {
        debug!(type_name, "no converter registered, passing raw value through");
        return Ok(pass_through(attributes));
    };

    match attributes.get(VALUE_TO_CONVERT) {
        Some(RawValue::List(values)) => fan_out(&converter, values, type_name),
        _ => invoke(converter.as_ref(), attributes, type_name),
    }
}

fn fan_out(converter: &Arc<dyn Converter>, values: &[String], type_name: &str) -> Result<Value, Error> {
    values
        .iter()
        .map(|value| {
            let mut single = PropertyBag::new();
            single.insert(VALUE_TO_CONVERT.to_string(), RawValue::Single(value.clone()));
            invoke(converter.as_ref(), &single, type_name)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn invoke(converter: &dyn Converter, attributes: &PropertyBag, type_name: &str) -> Result<Value, Error> {
    converter
        .convert(attributes, type_name)
        .map_err(|source| Error::Conversion {
            type_name: type_name.to_string(),
            source,
        })
}

fn pass_through(attributes: &PropertyBag) -> Value {
    match attributes.get(VALUE_TO_CONVERT) {
        Some(raw) => Value::from(raw.clone()),
        None => Value::Table(
            attributes
                .iter()
                .map(|(name, raw)| (name.clone(), Value::from(raw.clone())))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}
