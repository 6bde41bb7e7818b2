//! Built-in converters for common scalar types and attribute tables.

use indexmap::IndexMap;

use crate::{PropertyBag, Value};

use super::{BoxError, ConvertError, Converter, CONVERTER_ATTRIBUTE, TYPE_ATTRIBUTE, VALUE_TO_CONVERT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    String,
    Character,
    /// RFC 3339 date, time or datetime, parsed with TOML's datetime grammar.
    Date,
}

/// Parses the single `valueToConvert` attribute into a scalar value.
#[derive(Debug, Clone, Copy)]
pub struct ScalarConverter {
    kind: ScalarKind,
}

impl ScalarConverter {
    pub fn new(kind: ScalarKind) -> Self {
        Self { kind }
    }

    fn parse(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self.kind {
            ScalarKind::Long => raw.parse::<i64>().map(Value::Integer).map_err(|e| e.to_string()),
            ScalarKind::Integer => raw
                .parse::<i32>()
                .map(|i| Value::Integer(i.into()))
                .map_err(|e| e.to_string()),
            ScalarKind::Short => raw
                .parse::<i16>()
                .map(|i| Value::Integer(i.into()))
                .map_err(|e| e.to_string()),
            ScalarKind::Byte => raw
                .parse::<i8>()
                .map(|i| Value::Integer(i.into()))
                .map_err(|e| e.to_string()),
            ScalarKind::Double => raw.parse::<f64>().map(Value::Float).map_err(|e| e.to_string()),
            ScalarKind::Float => raw
                .parse::<f32>()
                .map(|f| Value::Float(f.into()))
                .map_err(|e| e.to_string()),
            ScalarKind::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err("expected 'true' or 'false'".to_string())
                }
            }
            ScalarKind::String => Ok(Value::Text(raw.to_string())),
            ScalarKind::Character => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Text(c.to_string())),
                    _ => Err("expected exactly one character".to_string()),
                }
            }
            ScalarKind::Date => raw
                .parse::<toml::value::Datetime>()
                .map(Value::Datetime)
                .map_err(|e| e.to_string()),
        }
    }
}

impl Converter for ScalarConverter {
    fn convert(&self, attributes: &PropertyBag, type_name: &str) -> Result<Value, BoxError> {
        let raw = attributes
            .get(VALUE_TO_CONVERT)
            .and_then(|raw| raw.as_str())
            .ok_or_else(|| ConvertError::MissingValue {
                type_name: type_name.to_string(),
            })?;

        self.parse(raw).map_err(|reason| {
            ConvertError::Invalid {
                type_name: type_name.to_string(),
                value: raw.to_string(),
                reason,
            }
            .into()
        })
    }
}

/// Collects a composite node's attributes into a [`Value::Table`].
///
/// The `type` and `converter` attributes are dropped; every other attribute
/// keeps its raw text (or list of texts).
#[derive(Debug, Clone, Copy, Default)]
pub struct TableConverter;

impl Converter for TableConverter {
    fn convert(&self, attributes: &PropertyBag, _type_name: &str) -> Result<Value, BoxError> {
        let table: IndexMap<String, Value> = attributes
            .iter()
            .filter(|(name, _)| name.as_str() != TYPE_ATTRIBUTE && name.as_str() != CONVERTER_ATTRIBUTE)
            .map(|(name, raw)| (name.clone(), Value::from(raw.clone())))
            .collect();
        Ok(Value::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawValue;

    fn scalar_bag(raw: &str) -> PropertyBag {
        let mut bag = PropertyBag::new();
        bag.insert(TYPE_ATTRIBUTE.to_string(), RawValue::from("ignored"));
        bag.insert(VALUE_TO_CONVERT.to_string(), RawValue::from(raw));
        bag
    }

    fn convert(kind: ScalarKind, raw: &str) -> Result<Value, BoxError> {
        ScalarConverter::new(kind).convert(&scalar_bag(raw), "T")
    }

    #[test]
    fn test_integer_kinds() {
        assert_eq!(convert(ScalarKind::Integer, "42").unwrap(), Value::Integer(42));
        assert_eq!(convert(ScalarKind::Long, " -7 ").unwrap(), Value::Integer(-7));
        assert!(convert(ScalarKind::Byte, "300").is_err());
        assert!(convert(ScalarKind::Short, "40000").is_err());
        assert!(convert(ScalarKind::Integer, "4x").is_err());
    }

    #[test]
    fn test_float_and_boolean() {
        assert_eq!(convert(ScalarKind::Double, "2.5").unwrap(), Value::Float(2.5));
        assert_eq!(convert(ScalarKind::Boolean, "TRUE").unwrap(), Value::Boolean(true));
        assert_eq!(convert(ScalarKind::Boolean, "false").unwrap(), Value::Boolean(false));
        assert!(convert(ScalarKind::Boolean, "yes").is_err());
    }

    #[test]
    fn test_character() {
        assert_eq!(convert(ScalarKind::Character, "x").unwrap(), Value::from("x"));
        assert!(convert(ScalarKind::Character, "xy").is_err());
    }

    #[test]
    fn test_date() {
        let value = convert(ScalarKind::Date, "2024-03-01").unwrap();
        match value {
            Value::Datetime(dt) => assert_eq!(dt.to_string(), "2024-03-01"),
            other => panic!("expected datetime, got {other:?}"),
        }
        assert!(convert(ScalarKind::Date, "yesterday").is_err());
    }

    #[test]
    fn test_missing_value() {
        let err = ScalarConverter::new(ScalarKind::Integer)
            .convert(&PropertyBag::new(), "Integer")
            .unwrap_err();
        assert!(err.to_string().contains("valueToConvert"));
    }

    #[test]
    fn test_table_converter_drops_reserved_attributes() {
        let mut bag = PropertyBag::new();
        bag.insert("type".into(), RawValue::from("DataSource"));
        bag.insert("converter".into(), RawValue::from("tables"));
        bag.insert("url".into(), RawValue::from("jdbc:test"));
        bag.insert("user".into(), RawValue::from("sa"));

        let value = TableConverter.convert(&bag, "DataSource").unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["url", "user"]);
        assert_eq!(table["url"], Value::from("jdbc:test"));
    }
}
