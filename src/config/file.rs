//! File-based property source.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::value::{PropertyBag, RawValue};

use super::ini::parse_ini;
use super::properties::parse_properties;
use super::source::PropertySource;
use super::xml::parse_xml;
use super::ConfigError;

/// A property source that reads one `.properties`, `.toml`, `.ini` or `.xml`
/// file.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist yield an empty bag.
///
/// Nested TOML tables, ini sections and XML elements are flattened into
/// delimited keys, so `[ds] url = "u"` becomes `ds.url` with a `.`
/// separator. Without a separator only top-level entries are accepted.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
    separator: Option<String>,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, reading fails if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
            separator: None,
        }
    }

    /// Sets the text used to join nested table, section or element names
    /// into keys.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Returns true if the file extension is one this source can read.
    pub fn is_supported(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("properties" | "toml" | "ini" | "xml")
        )
    }
}

impl PropertySource for FileSource {
    fn properties(&self) -> Result<PropertyBag, ConfigError> {
        let Some(contents) = read_file(&self.path, self.required)? else {
            return Ok(PropertyBag::new());
        };

        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("properties") => Ok(parse_properties(&contents)),
            Some("toml") => {
                let table: Table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                    path: self.path.clone(),
                    source: e,
                })?;
                let mut bag = PropertyBag::new();
                flatten_table(&mut bag, None, table, self.separator.as_deref())?;
                Ok(bag)
            }
            Some("ini") => parse_ini(&contents, self.separator.as_deref()),
            Some("xml") => parse_xml(&contents, self.separator.as_deref(), &self.path),
            _ => Err(ConfigError::UnsupportedFormat(self.path.clone())),
        }
    }
}

/// Reads a file to a string.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn read_file(path: &Path, required: bool) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn flatten_table(
    bag: &mut PropertyBag,
    prefix: Option<&str>,
    table: Table,
    separator: Option<&str>,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = match prefix {
            Some(prefix) => match separator {
                Some(separator) => format!("{prefix}{separator}{name}"),
                None => return Err(ConfigError::NestedTable(prefix.to_string())),
            },
            None => name,
        };

        match value {
            Value::Table(nested) => flatten_table(bag, Some(&key), nested, separator)?,
            Value::Array(items) => {
                let values = items
                    .into_iter()
                    .map(|item| scalar_to_string(item).ok_or_else(|| ConfigError::NonScalarValue(key.clone())))
                    .collect::<Result<Vec<_>, _>>()?;
                bag.insert(key, RawValue::List(values));
            }
            scalar => {
                let text = scalar_to_string(scalar).ok_or_else(|| ConfigError::NonScalarValue(key.clone()))?;
                bag.insert(key, RawValue::Single(text));
            }
        }
    }
    Ok(())
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_properties_file() {
        let file = temp_file(".properties", "a.b=1\nc=2\n");
        let bag = FileSource::new(file.path(), true).properties().unwrap();
        assert_eq!(bag["a.b"], RawValue::from("1"));
        assert_eq!(bag["c"], RawValue::from("2"));
    }

    #[test]
    fn test_toml_file_flattens_tables() {
        let file = temp_file(
            ".toml",
            r#"
            timeout = 30
            hosts = ["a", "b"]

            [ds]
            type = "DataSource"
            url = "jdbc:test"
            "#,
        );
        let bag = FileSource::new(file.path(), true)
            .with_separator(".")
            .properties()
            .unwrap();
        assert_eq!(bag["timeout"], RawValue::from("30"));
        assert_eq!(bag["hosts"], RawValue::List(vec!["a".into(), "b".into()]));
        assert_eq!(bag["ds.type"], RawValue::from("DataSource"));
        assert_eq!(bag["ds.url"], RawValue::from("jdbc:test"));
    }

    #[test]
    fn test_toml_nested_table_without_separator() {
        let file = temp_file(".toml", "[ds]\nurl = \"u\"\n");
        let result = FileSource::new(file.path(), true).properties();
        assert!(matches!(result, Err(ConfigError::NestedTable(key)) if key == "ds"));
    }

    #[test]
    fn test_toml_array_of_tables_rejected() {
        let file = temp_file(".toml", "[[servers]]\nname = \"a\"\n");
        let result = FileSource::new(file.path(), true).with_separator(".").properties();
        assert!(matches!(result, Err(ConfigError::NonScalarValue(_))));
    }

    #[test]
    fn test_toml_parse_error() {
        let file = temp_file(".toml", "not toml at all = = =");
        let result = FileSource::new(file.path(), true).properties();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_file_source_required_missing() {
        let source = FileSource::new("/nonexistent/path/jndi.properties", true);
        let result = source.properties();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::new("/nonexistent/path/jndi.properties", false);
        let bag = source.properties().unwrap();

        assert!(bag.is_empty());
    }

    #[test]
    fn test_ini_file_prefixes_sections() {
        let file = temp_file(".ini", "name=demo\n[db]\ntype=Table\nurl=u\n");
        let bag = FileSource::new(file.path(), true)
            .with_separator("/")
            .properties()
            .unwrap();
        assert_eq!(bag["name"], RawValue::from("demo"));
        assert_eq!(bag["db/type"], RawValue::from("Table"));
        assert_eq!(bag["db/url"], RawValue::from("u"));
    }

    #[test]
    fn test_xml_file_joins_nested_elements() {
        let file = temp_file(
            ".xml",
            "<jndi><timeout>30</timeout><db><type>Table</type><url>u</url></db></jndi>",
        );
        let bag = FileSource::new(file.path(), true)
            .with_separator(".")
            .properties()
            .unwrap();
        assert_eq!(bag["timeout"], RawValue::from("30"));
        assert_eq!(bag["db.type"], RawValue::from("Table"));
        assert_eq!(bag["db.url"], RawValue::from("u"));
    }

    #[test]
    fn test_xml_parse_error() {
        let file = temp_file(".xml", "<jndi><db></jndi>");
        let result = FileSource::new(file.path(), true).with_separator(".").properties();
        assert!(matches!(result, Err(ConfigError::XmlParseError { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".yaml", "a: 1\n");
        let result = FileSource::new(file.path(), true).properties();
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_is_supported() {
        assert!(FileSource::is_supported(Path::new("a/b.properties")));
        assert!(FileSource::is_supported(Path::new("b.toml")));
        assert!(FileSource::is_supported(Path::new("c.ini")));
        assert!(FileSource::is_supported(Path::new("d.xml")));
        assert!(!FileSource::is_supported(Path::new("e.yaml")));
        assert!(!FileSource::is_supported(Path::new("README")));
    }
}
