//! Node and plug storage.

use mayamock_core::{NodeId, Value};
use mayamock_schema::AttrDef;
use std::collections::BTreeMap;

/// A live attribute plug on a node.
///
/// Multi attributes additionally hold a sparse index -> value map; the
/// scalar `value` is unused for them. Driven state is not stored here - it
/// is derived from the graph's connection list.
#[derive(Debug, Clone)]
pub struct Plug {
    /// The attribute definition this plug was instantiated from. Dynamic
    /// attributes carry their own definition.
    pub def: AttrDef,
    /// Whether the attribute was added at runtime rather than declared by
    /// the node type.
    pub user_defined: bool,
    /// Current value (scalar attributes).
    pub value: Value,
    /// Element values for multi attributes, keyed by logical index.
    pub elements: BTreeMap<u32, Value>,
}

impl Plug {
    /// Instantiate a plug at its declared default.
    pub fn from_def(def: &AttrDef, user_defined: bool) -> Self {
        Self {
            def: def.clone(),
            user_defined,
            value: def.default.clone(),
            elements: BTreeMap::new(),
        }
    }

    /// Value of one element of a multi plug; unset elements read as the
    /// declared default, matching the host's implicit element semantics.
    pub fn element_value(&self, index: u32) -> Value {
        self.elements
            .get(&index)
            .cloned()
            .unwrap_or_else(|| self.def.default.clone())
    }
}

/// A node instance in the scene graph.
///
/// The parent link is a weak back-reference by id; children are owned by the
/// graph's child index, not by this struct.
#[derive(Debug, Clone)]
pub struct Node {
    /// Session-unique id.
    pub id: NodeId,
    /// Current node name, unique within the session.
    pub name: String,
    /// Node type name, resolved in the schema store at creation.
    pub type_name: String,
    /// Parent node in the DAG hierarchy, if any.
    pub parent: Option<NodeId>,
    /// Plugs in resolved-schema order, dynamic attributes appended.
    plugs: Vec<Plug>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        type_name: String,
        plugs: Vec<Plug>,
    ) -> Self {
        Self {
            id,
            name,
            type_name,
            parent: None,
            plugs,
        }
    }

    /// Get a plug by attribute name.
    pub fn plug(&self, attr: &str) -> Option<&Plug> {
        self.plugs.iter().find(|p| p.def.name == attr)
    }

    pub(crate) fn plug_mut(&mut self, attr: &str) -> Option<&mut Plug> {
        self.plugs.iter_mut().find(|p| p.def.name == attr)
    }

    /// All plugs, in attribute order.
    pub fn plugs(&self) -> &[Plug] {
        &self.plugs
    }

    pub(crate) fn push_plug(&mut self, plug: Plug) {
        self.plugs.push(plug);
    }

    pub(crate) fn remove_plug(&mut self, attr: &str) {
        self.plugs.retain(|p| p.def.name != attr);
    }
}
