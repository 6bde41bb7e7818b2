use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::convert::{ConverterRegistry, VALUE_TO_CONVERT};
use crate::{Context, Error, PropertyBag, Value};

use super::dispatch;
use super::path::{Delimiter, NodePath};
use super::subcontext;
use super::typed::{extract_type_nodes, TypeNode};

/// Where one bag's bindings land, as paths below a root context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    target: Vec<String>,
    object: Option<ObjectSlot>,
}

/// The slot a whole-bag object is rebound into: a name in a parent branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSlot {
    parent: Vec<String>,
    name: String,
}

impl Placement {
    /// Binds directly into the branch at `target`.
    pub fn at(target: Vec<String>) -> Self {
        Self { target, object: None }
    }

    /// Names the slot used when the bag carries a bare `type` key.
    pub fn with_object(mut self, slot: ObjectSlot) -> Self {
        self.object = Some(slot);
        self
    }

    pub fn target(&self) -> &[String] {
        &self.target
    }

    pub fn object(&self) -> Option<&ObjectSlot> {
        self.object.as_ref()
    }
}

impl ObjectSlot {
    pub fn new(parent: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            parent,
            name: name.into(),
        }
    }

    pub fn parent(&self) -> &[String] {
        &self.parent
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How the binder treats one key of a bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A `type` key; already consumed by type-node discovery.
    PseudoAttribute,
    /// The value becomes attribute `name` of a typed node.
    Attribute { node: NodePath, name: String },
    /// The value is bound as-is at the key's path.
    Direct,
}

/// Binds property bags into a [`Context`], converting typed nodes.
#[derive(Debug, Clone)]
pub struct Binder<'r> {
    delimiter: Delimiter,
    registry: &'r ConverterRegistry,
}

impl<'r> Binder<'r> {
    pub fn new(delimiter: Delimiter, registry: &'r ConverterRegistry) -> Self {
        Self { delimiter, registry }
    }

    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Classifies `key` against the typed nodes discovered in its bag.
    pub fn classify(&self, key: &str, nodes: &IndexMap<NodePath, TypeNode>) -> Disposition {
        if self.delimiter.type_owner(key).is_some() {
            return Disposition::PseudoAttribute;
        }
        if nodes.contains_key(&NodePath::Root) {
            return Disposition::Attribute {
                node: NodePath::Root,
                name: key.to_string(),
            };
        }

        let exact = NodePath::Key(key.to_string());
        if nodes.contains_key(&exact) {
            return Disposition::Attribute {
                node: exact,
                name: VALUE_TO_CONVERT.to_string(),
            };
        }

        if let Some(m) = self.delimiter.last_match(key) {
            let owner = NodePath::Key(m.parent_path(key).to_string());
            if nodes.contains_key(&owner) {
                return Disposition::Attribute {
                    node: owner,
                    name: m.leaf_name(key).to_string(),
                };
            }
        }

        Disposition::Direct
    }

    /// Binds every key of `bag` below `root` according to `placement`.
    ///
    /// Untyped keys are bound as text leaves, creating branches for each
    /// delimited segment. Typed nodes are converted once all keys have been
    /// classified; a bag with a bare `type` key becomes a single object
    /// rebound into the placement's object slot.
    ///
    /// Binding is not transactional. Direct keys are bound while the bag is
    /// classified, so a later conversion failure returns the error with
    /// those leaves (and any branches created for them) left in `root`.
    pub fn bind(&self, bag: PropertyBag, root: &mut Context, placement: &Placement) -> Result<(), Error> {
        let mut nodes = extract_type_nodes(&bag, &self.delimiter);
        debug!(
            target_path = ?placement.target(),
            keys = bag.len(),
            typed_nodes = nodes.len(),
            "binding property bag"
        );

        if nodes.contains_key(&NodePath::Root) && placement.object().is_none() {
            return Err(Error::UnsupportedOperation(
                "a bag with a bare 'type' key needs a name to be bound under".to_string(),
            ));
        }

        let target = subcontext::resolve(placement.target(), root)?;

        for (key, value) in bag {
            match self.classify(&key, &nodes) {
                Disposition::PseudoAttribute => {}
                Disposition::Attribute { node, name } => {
                    if let Some(type_node) = nodes.get_mut(&node) {
                        trace!(key = %key, attribute = %name, "collected typed attribute");
                        type_node.insert(name, value);
                    }
                }
                Disposition::Direct => self.bind_path(target, &key, Value::from(value))?,
            }
        }

        let mut object = None;
        for (path, node) in &nodes {
            let value = dispatch::convert(node.attributes(), node.type_name(), self.registry)?;
            match path {
                NodePath::Root => object = Some(value),
                NodePath::Key(key) => self.bind_path(target, key, value)?,
            }
        }

        if let (Some(value), Some(slot)) = (object, placement.object()) {
            subcontext::resolve(slot.parent(), root)?.rebind(slot.name(), value);
        }
        Ok(())
    }

    fn bind_path(&self, target: &mut Context, key: &str, value: Value) -> Result<(), Error> {
        let segments = self.delimiter.split(key);
        let Some((leaf, parents)) = segments.split_last() else {
            warn!(key, "skipping key with no name segments");
            return Ok(());
        };
        subcontext::resolve(parents, target)?.bind(leaf, value)
    }
}
