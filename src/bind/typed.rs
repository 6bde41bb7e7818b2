//! Discovery of typed nodes.

use indexmap::IndexMap;

use crate::convert::TYPE_ATTRIBUTE;
use crate::{PropertyBag, RawValue};

use super::path::{Delimiter, NodePath};

/// A node whose attributes are gathered and converted as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    path: NodePath,
    type_name: String,
    attributes: PropertyBag,
}

impl TypeNode {
    fn new(path: NodePath, declared: &RawValue) -> Self {
        // A repeated type key keeps its last declaration.
        let type_name = match declared {
            RawValue::Single(name) => name.clone(),
            RawValue::List(names) => names.last().cloned().unwrap_or_default(),
        };
        let mut attributes = PropertyBag::new();
        attributes.insert(TYPE_ATTRIBUTE.to_string(), RawValue::Single(type_name.clone()));
        Self {
            path,
            type_name,
            attributes,
        }
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn attributes(&self) -> &PropertyBag {
        &self.attributes
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.attributes.insert(name.into(), value);
    }
}

/// Finds every `type` pseudo-attribute in `bag`.
///
/// The result is keyed by owning node and ordered by discovery, each node
/// holding only its declared type so far.
pub fn extract_type_nodes(bag: &PropertyBag, delimiter: &Delimiter) -> IndexMap<NodePath, TypeNode> {
    bag.iter()
        .filter_map(|(key, value)| {
            let path = delimiter.type_owner(key)?;
            Some((path.clone(), TypeNode::new(path, value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bag(entries: &[(&str, &str)]) -> PropertyBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), RawValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_no_type_keys() {
        let nodes = extract_type_nodes(&bag(&[("a.b", "1"), ("c", "2")]), &Delimiter::new(".").unwrap());
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_root_and_namespaced_nodes() {
        let nodes = extract_type_nodes(
            &bag(&[
                ("url", "u"),
                ("type", "Widget"),
                ("ds.type", "DataSource"),
                ("a.b.type", "Integer"),
            ]),
            &Delimiter::new(".").unwrap(),
        );

        let paths: Vec<&NodePath> = nodes.keys().collect();
        assert_eq!(
            paths,
            vec![
                &NodePath::Root,
                &NodePath::Key("ds".into()),
                &NodePath::Key("a.b".into()),
            ]
        );
        assert_eq!(nodes[&NodePath::Root].type_name(), "Widget");
        assert_eq!(nodes[&NodePath::Key("ds".into())].type_name(), "DataSource");
    }

    #[test]
    fn test_node_starts_with_type_attribute_only() {
        let nodes = extract_type_nodes(&bag(&[("db.type", "Integer"), ("db", "42")]), &Delimiter::new(".").unwrap());
        let node = &nodes[&NodePath::Key("db".into())];
        assert_eq!(node.attributes(), &bag(&[("type", "Integer")]));
    }

    #[test]
    fn test_repeated_type_keeps_last() {
        let mut input = PropertyBag::new();
        input.insert("type".into(), RawValue::List(vec!["A".into(), "B".into()]));
        let nodes = extract_type_nodes(&input, &Delimiter::new(".").unwrap());
        assert_eq!(nodes[&NodePath::Root].type_name(), "B");
    }
}
