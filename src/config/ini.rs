//! Parser for `.ini` text.
//!
//! Entries use the `.properties` line syntax. A `[section]` header prefixes
//! every following key with the section name and the separator, so
//! `[db]` then `url=u` yields `db.url`. `;` and `#` start comments.

use crate::value::PropertyBag;

use super::properties::{logical_lines, split_entry, unescape};
use super::source::append;
use super::ConfigError;

/// Parses ini text into a bag, preserving key order.
///
/// Keys inside a section need a separator; without one they fail with
/// [`ConfigError::NestedTable`].
pub fn parse_ini(contents: &str, separator: Option<&str>) -> Result<PropertyBag, ConfigError> {
    let mut bag = PropertyBag::new();
    let mut section: Option<String> = None;

    for line in logical_lines(contents, &[';', '#']) {
        let trimmed = line.trim_end();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            let header = header.trim();
            section = (!header.is_empty()).then(|| header.to_string());
            continue;
        }

        let (key, value) = split_entry(trimmed);
        let key = unescape(key);
        let key = match (&section, separator) {
            (None, _) => key,
            (Some(section), Some(separator)) => format!("{section}{separator}{key}"),
            (Some(section), None) => return Err(ConfigError::NestedTable(section.clone())),
        };
        append(&mut bag, key, unescape(value.trim_start()));
    }

    Ok(bag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RawValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sections_prefix_keys() {
        let bag = parse_ini(
            "; global settings\n\
             name = demo\n\
             \n\
             [db]\n\
             # connection\n\
             type = Table\n\
             url = jdbc:test\n\
             [ cache ]\n\
             size=8\n",
            Some("."),
        )
        .unwrap();

        let keys: Vec<&str> = bag.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "db.type", "db.url", "cache.size"]);
        assert_eq!(bag["db.url"], RawValue::from("jdbc:test"));
        assert_eq!(bag["cache.size"], RawValue::from("8"));
    }

    #[test]
    fn test_custom_separator() {
        let bag = parse_ini("[java:comp]\nenv=x\n", Some("/")).unwrap();
        assert_eq!(bag["java:comp/env"], RawValue::from("x"));
    }

    #[test]
    fn test_section_without_separator() {
        let result = parse_ini("top=1\n[db]\nurl=u\n", None);
        assert!(matches!(result, Err(ConfigError::NestedTable(section)) if section == "db"));
    }

    #[test]
    fn test_keys_before_any_section_need_no_separator() {
        let bag = parse_ini("a=1\nb=2\n", None).unwrap();
        assert_eq!(bag.len(), 2);
    }
}
