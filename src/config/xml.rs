//! Parser for `.xml` property files.
//!
//! The document element is only a wrapper. Every element below it adds one
//! key segment and its text becomes the value, so
//! `<config><db><url>u</url></db></config>` yields `db.url`. Attributes
//! become one more segment after their element's path.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::value::PropertyBag;

use super::source::append;
use super::ConfigError;

/// Parses XML text into a bag, preserving document order.
///
/// `path` only labels syntax errors. Keys deeper than one segment need a
/// separator; without one they fail with [`ConfigError::NestedTable`].
pub fn parse_xml(contents: &str, separator: Option<&str>, path: &Path) -> Result<PropertyBag, ConfigError> {
    let syntax = |source: quick_xml::Error| ConfigError::XmlParseError {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_str(contents);
    reader.config_mut().trim_text(true);

    let mut bag = PropertyBag::new();
    let mut elements: Vec<String> = Vec::new();

    loop {
        match reader.read_event().map_err(syntax)? {
            Event::Start(element) => {
                elements.push(element_name(&element));
                collect_attributes(&mut bag, &element, &elements, separator, path)?;
            }
            Event::Empty(element) => {
                elements.push(element_name(&element));
                collect_attributes(&mut bag, &element, &elements, separator, path)?;
                elements.pop();
            }
            Event::End(_) => {
                elements.pop();
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(syntax)?;
                insert(&mut bag, &elements, None, text.into_owned(), separator)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                insert(&mut bag, &elements, None, text, separator)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(bag)
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn collect_attributes(
    bag: &mut PropertyBag,
    element: &BytesStart<'_>,
    elements: &[String],
    separator: Option<&str>,
    path: &Path,
) -> Result<(), ConfigError> {
    let syntax = |source: quick_xml::Error| ConfigError::XmlParseError {
        path: path.to_path_buf(),
        source,
    };

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| syntax(e.into()))?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(syntax)?.into_owned();
        insert(bag, elements, Some(name), value, separator)?;
    }
    Ok(())
}

/// Binds `value` at the element path below the document element.
fn insert(
    bag: &mut PropertyBag,
    elements: &[String],
    attribute: Option<String>,
    value: String,
    separator: Option<&str>,
) -> Result<(), ConfigError> {
    let mut segments: Vec<&str> = elements.iter().skip(1).map(String::as_str).collect();
    if let Some(attribute) = attribute.as_deref() {
        segments.push(attribute);
    }

    let key = match (segments.as_slice(), separator) {
        ([], _) => return Ok(()),
        ([single], _) => single.to_string(),
        (segments, Some(separator)) => segments.join(separator),
        ([first, ..], None) => return Err(ConfigError::NestedTable(first.to_string())),
    };
    append(bag, key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RawValue;
    use pretty_assertions::assert_eq;

    fn parse(contents: &str, separator: Option<&str>) -> Result<PropertyBag, ConfigError> {
        parse_xml(contents, separator, Path::new("test.xml"))
    }

    #[test]
    fn test_nested_elements_become_delimited_keys() {
        let bag = parse(
            r#"<?xml version="1.0"?>
            <config>
                <!-- comment -->
                <name>demo</name>
                <db>
                    <type>Table</type>
                    <url><![CDATA[jdbc:test?a=1&b=2]]></url>
                </db>
            </config>"#,
            Some("."),
        )
        .unwrap();

        let keys: Vec<&str> = bag.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "db.type", "db.url"]);
        assert_eq!(bag["db.url"], RawValue::from("jdbc:test?a=1&b=2"));
    }

    #[test]
    fn test_attributes_and_entities() {
        let bag = parse(
            r#"<config><pool size="8" name="a &amp; b"/><note>x &lt; y</note></config>"#,
            Some("/"),
        )
        .unwrap();
        assert_eq!(bag["pool/size"], RawValue::from("8"));
        assert_eq!(bag["pool/name"], RawValue::from("a & b"));
        assert_eq!(bag["note"], RawValue::from("x < y"));
    }

    #[test]
    fn test_repeated_elements_become_list() {
        let bag = parse("<config><port>80</port><port>443</port></config>", Some(".")).unwrap();
        assert_eq!(bag["port"], RawValue::List(vec!["80".into(), "443".into()]));
    }

    #[test]
    fn test_nested_without_separator() {
        let result = parse("<config><db><url>u</url></db></config>", None);
        assert!(matches!(result, Err(ConfigError::NestedTable(first)) if first == "db"));
    }

    #[test]
    fn test_malformed_document() {
        let result = parse("<config><db></config>", Some("."));
        assert!(matches!(result, Err(ConfigError::XmlParseError { .. })));
    }
}
