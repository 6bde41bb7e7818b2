//! In-memory naming tree.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::trace;

use crate::{Error, Value};

/// A named child of a [`Context`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A container holding further named children.
    Branch(Context),
    /// A bound value with no children.
    Leaf(Value),
}

impl Node {
    pub fn as_context(&self) -> Option<&Context> {
        match self {
            Node::Branch(ctx) => Some(ctx),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Branch(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Node::Branch(_) => "a branch".to_string(),
            Node::Leaf(value) => format!("the value {value}"),
        }
    }
}

/// A branch of the naming tree.
///
/// Branches are created lazily and shared by every bag that names them. A
/// name is bound either to a branch or to a leaf, never both; [`bind`] and
/// [`subcontext`] refuse to turn one into the other. Only [`rebind`]
/// replaces a node regardless of its kind.
///
/// [`bind`]: Self::bind
/// [`subcontext`]: Self::subcontext
/// [`rebind`]: Self::rebind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    bindings: BTreeMap<String, Node>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Node> {
        self.bindings.get(name)
    }

    /// Follows `path` through nested branches.
    pub fn lookup_path(&self, path: &[&str]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.lookup(segment)?.as_context()?;
        }
        current.lookup(last)
    }

    /// Returns the value bound at `path`, if that node is a leaf.
    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        self.lookup_path(path)?.as_value()
    }

    /// Returns the branch named `name`, creating it if absent.
    ///
    /// Fails with [`Error::StructuralClash`] if `name` is bound to a leaf.
    pub fn subcontext(&mut self, name: &str) -> Result<&mut Context, Error> {
        let node = self.bindings.entry(name.to_string()).or_insert_with(|| {
            trace!(name, "creating subcontext");
            Node::Branch(Context::new())
        });
        match node {
            Node::Branch(ctx) => Ok(ctx),
            leaf @ Node::Leaf(_) => Err(Error::StructuralClash {
                segment: name.to_string(),
                found: leaf.describe(),
            }),
        }
    }

    /// Binds `value` as a leaf, overwriting an existing leaf of the same name.
    ///
    /// Fails with [`Error::StructuralClash`] if `name` is bound to a branch.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), Error> {
        match self.bindings.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                trace!(name, %value, "bind");
                slot.insert(Node::Leaf(value));
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                if matches!(slot.get(), Node::Branch(_)) {
                    return Err(Error::StructuralClash {
                        segment: name.to_string(),
                        found: slot.get().describe(),
                    });
                }
                trace!(name, %value, "bind over existing value");
                slot.insert(Node::Leaf(value));
                Ok(())
            }
        }
    }

    /// Binds `value` as a leaf, replacing whatever was bound at `name`.
    pub fn rebind(&mut self, name: &str, value: Value) {
        trace!(name, %value, "rebind");
        self.bindings.insert(name.to_string(), Node::Leaf(value));
    }

    /// Child names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
