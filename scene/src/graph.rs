//! Scene graph storage and operations.

use crate::connection::{Connection, PlugAddr};
use crate::error::{SceneError, SceneResult};
use crate::naming;
use crate::node::{Node, Plug};
use mayamock_core::{NodeId, Value};
use mayamock_schema::{AttrDef, SchemaStore};
use std::collections::{HashMap, HashSet, VecDeque};

/// The in-memory attribute graph for one session.
///
/// Owns every node, plug, and connection. Node creation is validated against
/// the borrowed schema store; all mutating operations validate before they
/// touch state, so a failed call leaves the graph unchanged. Connections are
/// kept in one session-ordered list; declaration order is propagation order.
#[derive(Debug)]
pub struct SceneGraph<'s> {
    /// The read-only type catalog for this session.
    schema: &'s SchemaStore,
    /// Node storage.
    nodes: HashMap<NodeId, Node>,
    /// Name index. Node names are unique within the session.
    names: HashMap<String, NodeId>,
    /// Child index; ownership of children is here, not on the parent node.
    children: HashMap<NodeId, Vec<NodeId>>,
    /// Connections in declaration order.
    connections: Vec<Connection>,
    /// Next node id. Ids are never reused.
    next_node_id: u64,
}

impl<'s> SceneGraph<'s> {
    /// Create an empty graph over a loaded schema store.
    pub fn new(schema: &'s SchemaStore) -> Self {
        Self {
            schema,
            nodes: HashMap::new(),
            names: HashMap::new(),
            children: HashMap::new(),
            connections: Vec::new(),
            next_node_id: 1,
        }
    }

    /// The schema store this graph was created against.
    pub fn schema(&self) -> &'s SchemaStore {
        self.schema
    }

    // ==================== Node Operations ====================

    /// Create a node of the given type.
    ///
    /// With no requested name, the host's auto-naming applies: `<type><N>`
    /// with `N` counting from 1. A requested name is conformed first, then
    /// disambiguated by suffix numbering if it collides.
    pub fn create_node(&mut self, type_name: &str, requested: Option<&str>) -> SceneResult<NodeId> {
        let def = self
            .schema
            .resolve_type(type_name)
            .map_err(|_| SceneError::unknown_type(type_name))?;
        if def.is_abstract {
            return Err(SceneError::abstract_type(type_name));
        }
        let attrs = self
            .schema
            .resolved_attrs(type_name)
            .map_err(|_| SceneError::unknown_type(type_name))?;

        let name = match requested {
            Some(raw) => {
                let conformed = naming::conform_node_name(raw);
                if conformed.is_empty() {
                    return Err(SceneError::invalid_name(raw));
                }
                self.unique_name(&conformed)
            }
            None => self.unique_name_from_stem(type_name),
        };

        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;

        let plugs: Vec<Plug> = attrs.iter().map(|a| Plug::from_def(a, false)).collect();
        let node = Node::new(id, name.clone(), type_name.to_string(), plugs);

        self.names.insert(name, id);
        self.children.insert(id, Vec::new());
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Delete a node.
    ///
    /// All connections touching the node's plugs are removed first. A node
    /// with children fails `HasChildren` unless `recursive` is set, in which
    /// case children are deleted depth-first before the node itself.
    pub fn delete_node(&mut self, id: NodeId, recursive: bool) -> SceneResult<()> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))?;
        let name = node.name.clone();
        let parent = node.parent;

        let kids: Vec<NodeId> = self.children.get(&id).cloned().unwrap_or_default();
        if !kids.is_empty() {
            if !recursive {
                return Err(SceneError::has_children(name));
            }
            for kid in kids {
                self.delete_node(kid, true)?;
            }
        }

        self.connections
            .retain(|c| c.src.node != id && c.dst.node != id);

        if let Some(parent) = parent {
            if let Some(list) = self.children.get_mut(&parent) {
                list.retain(|c| *c != id);
            }
        }
        self.children.remove(&id);
        if let Some(node) = self.nodes.remove(&id) {
            self.names.remove(&node.name);
        }
        Ok(())
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))
    }

    /// Get a node by name.
    pub fn node_by_name(&self, name: &str) -> SceneResult<&Node> {
        self.names
            .get(name)
            .and_then(|id| self.nodes.get(id))
            .ok_or_else(|| SceneError::node_not_found(name))
    }

    /// Look up a node id by name.
    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// All nodes, unordered.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Rename a node, returning the name actually assigned after
    /// conformance and disambiguation.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> SceneResult<String> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))?;
        let old_name = node.name.clone();

        let conformed = naming::conform_node_name(new_name);
        if conformed.is_empty() {
            return Err(SceneError::invalid_name(new_name));
        }
        if conformed == old_name {
            return Ok(old_name);
        }
        let unique = self.unique_name(&conformed);

        self.names.remove(&old_name);
        self.names.insert(unique.clone(), id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = unique.clone();
        }
        Ok(unique)
    }

    // ==================== Hierarchy Operations ====================

    /// Move a node under a new parent, or to the scene root with `None`.
    /// Fails `Cycle` when the new parent is the node itself or one of its
    /// descendants.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> SceneResult<()> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))?;
        let name = node.name.clone();
        let old_parent = node.parent;

        if let Some(parent) = new_parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SceneError::node_not_found(parent.to_string()));
            }
            if parent == id || self.is_descendant(parent, id) {
                return Err(SceneError::Cycle(name));
            }
        }

        if let Some(old) = old_parent {
            if let Some(list) = self.children.get_mut(&old) {
                list.retain(|c| *c != id);
            }
        }
        if let Some(parent) = new_parent {
            self.children.entry(parent).or_default().push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = new_parent;
        }
        Ok(())
    }

    /// Direct children of a node, in parenting order.
    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        self.node(id)?;
        Ok(self.children.get(&id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// All descendants of a node, depth-first.
    pub fn descendants(&self, id: NodeId) -> SceneResult<Vec<NodeId>> {
        self.node(id)?;
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .children
            .get(&id)
            .map(|c| c.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(kids) = self.children.get(&current) {
                stack.extend(kids.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Full dag path of a node: pipe-joined ancestry with a root anchor.
    pub fn dag_path(&self, id: NodeId) -> SceneResult<String> {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            let node = self.node(cursor)?;
            parts.push(node.name.clone());
            current = node.parent;
        }
        parts.reverse();
        Ok(format!("|{}", parts.join("|")))
    }

    /// Whether `candidate` is a descendant of `root`.
    fn is_descendant(&self, candidate: NodeId, root: NodeId) -> bool {
        let mut stack = VecDeque::new();
        stack.push_back(root);
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(kids) = self.children.get(&current) {
                for kid in kids {
                    if *kid == candidate {
                        return true;
                    }
                    stack.push_back(*kid);
                }
            }
        }
        false
    }

    // ==================== Attribute Operations ====================

    /// Read a plug's current value.
    ///
    /// A multi plug read without an index returns the element values as a
    /// list in index order; an unset element reads as the declared default.
    pub fn get_attr(&self, addr: &PlugAddr) -> SceneResult<Value> {
        let (_, plug) = self.plug_ref(addr)?;
        Ok(match addr.index {
            Some(i) => plug.element_value(i),
            None if plug.def.multi => Value::List(plug.elements.values().cloned().collect()),
            None => plug.value.clone(),
        })
    }

    /// Set a plug's value directly.
    ///
    /// Fails `ReadOnlyAttribute` if the attribute is not writable or is
    /// currently driven by a connection; fails `TypeMismatch` when the value
    /// does not conform to the declared type. On success the new value is
    /// pushed through every outgoing connection transitively, in connection
    /// declaration order.
    pub fn set_attr(&mut self, addr: &PlugAddr, value: Value) -> SceneResult<()> {
        let (_, plug) = self.plug_ref(addr)?;
        let path = self.display_plug(addr);
        if !plug.def.writable {
            return Err(SceneError::read_only(path));
        }
        if plug.def.multi && addr.index.is_none() {
            // Multi values are set per element.
            return Err(SceneError::read_only(path));
        }
        if self.is_driven(addr) {
            return Err(SceneError::read_only(path));
        }
        let coerced = plug
            .def
            .attr_type
            .coerce(value)
            .map_err(|e| SceneError::type_mismatch(path, e.expected, e.actual))?;

        if let Some(node) = self.nodes.get_mut(&addr.node) {
            if let Some(plug) = node.plug_mut(&addr.attr) {
                match addr.index {
                    Some(i) => {
                        plug.elements.insert(i, coerced);
                    }
                    None => plug.value = coerced,
                }
            }
        }
        self.propagate_from(addr.clone());
        Ok(())
    }

    /// Add a dynamic (user-defined) attribute to a live node.
    pub fn add_attr(&mut self, id: NodeId, def: AttrDef) -> SceneResult<()> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))?;
        if node.plug(&def.name).is_some() {
            return Err(SceneError::attribute_exists(&node.name, &def.name));
        }
        let mut def = def;
        if def.default.is_null() && !matches!(def.attr_type, mayamock_core::AttrType::Message) {
            def.default = def.attr_type.zero_value();
        } else {
            def.default = def.attr_type.coerce(def.default).map_err(|e| {
                SceneError::type_mismatch(
                    format!("{}.{}", node.name, def.name),
                    e.expected,
                    e.actual,
                )
            })?;
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            let plug = Plug::from_def(&def, true);
            node.push_plug(plug);
        }
        Ok(())
    }

    /// Remove a dynamic attribute, dropping any connections it holds first.
    /// Schema-declared attributes cannot be deleted.
    pub fn delete_attr(&mut self, id: NodeId, attr: &str) -> SceneResult<()> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| SceneError::node_not_found(id.to_string()))?;
        let plug = node
            .plug(attr)
            .ok_or_else(|| SceneError::no_such_attribute(&node.name, attr))?;
        if !plug.user_defined {
            return Err(SceneError::static_attribute(&node.name, attr));
        }
        self.connections.retain(|c| {
            !(c.src.node == id && c.src.attr == attr) && !(c.dst.node == id && c.dst.attr == attr)
        });
        if let Some(node) = self.nodes.get_mut(&id) {
            node.remove_plug(attr);
        }
        Ok(())
    }

    // ==================== Connection Operations ====================

    /// Connect a source plug to a destination plug.
    ///
    /// The destination's value is eagerly overwritten from the source, and
    /// from then on it is driven: direct sets are rejected until the
    /// connection is removed. Connecting into a multi destination without an
    /// explicit index assigns the next free element.
    pub fn connect(&mut self, src: PlugAddr, dst: PlugAddr) -> SceneResult<()> {
        let (_, src_plug) = self.plug_ref(&src)?;
        let src_path = self.display_plug(&src);
        if !src_plug.def.readable || !src_plug.def.connectable {
            return Err(SceneError::not_connectable(src_path));
        }
        let src_type = src_plug.def.attr_type.clone();

        let (_, dst_plug) = self.plug_ref(&dst)?;
        let dst_multi = dst_plug.def.multi;
        let dst_type = dst_plug.def.attr_type.clone();
        if !dst_plug.def.connectable {
            return Err(SceneError::not_connectable(self.display_plug(&dst)));
        }
        if !dst_plug.def.writable {
            return Err(SceneError::read_only(self.display_plug(&dst)));
        }

        let mut dst = dst;
        if dst_multi && dst.index.is_none() {
            dst.index = Some(self.next_free_index(&dst));
        }

        if src == dst {
            return Err(SceneError::Cycle(self.display_plug(&dst)));
        }
        if !dst_type.accepts_source(&src_type) {
            return Err(SceneError::type_mismatch(
                self.display_plug(&dst),
                dst_type.label(),
                src_type.label(),
            ));
        }
        if self.connections.iter().any(|c| c.dst == dst) {
            return Err(SceneError::already_connected(self.display_plug(&dst)));
        }

        self.connections.push(Connection::new(src.clone(), dst.clone()));
        if let Ok(value) = self.read_plug(&src) {
            self.write_driven(&dst, value);
        }
        self.propagate_from(dst);
        Ok(())
    }

    /// Remove the connection from `src` to `dst`.
    ///
    /// The destination keeps the last propagated value and becomes directly
    /// settable again.
    pub fn disconnect(&mut self, src: &PlugAddr, dst: &PlugAddr) -> SceneResult<()> {
        let position = self
            .connections
            .iter()
            .position(|c| &c.src == src && &c.dst == dst)
            .ok_or_else(|| {
                SceneError::not_connected(self.display_plug(src), self.display_plug(dst))
            })?;
        self.connections.remove(position);
        Ok(())
    }

    /// All connections, in declaration order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections whose destination is the given plug. An index-less
    /// address on a multi attribute matches every element.
    pub fn incoming(&self, addr: &PlugAddr) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| {
                if addr.index.is_none() {
                    c.dst.same_attr(addr)
                } else {
                    &c.dst == addr
                }
            })
            .collect()
    }

    /// Connections whose source is the given plug.
    pub fn outgoing(&self, addr: &PlugAddr) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| {
                if addr.index.is_none() {
                    c.src.same_attr(addr)
                } else {
                    &c.src == addr
                }
            })
            .collect()
    }

    /// All connections touching any plug of a node.
    pub fn node_connections(&self, id: NodeId) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.src.node == id || c.dst.node == id)
            .collect()
    }

    /// Whether a plug currently has an incoming connection.
    pub fn is_driven(&self, addr: &PlugAddr) -> bool {
        self.connections.iter().any(|c| &c.dst == addr)
    }

    /// Render a plug address as `node.attr[index]` using the node's current
    /// name (the raw id when the node is gone).
    pub fn display_plug(&self, addr: &PlugAddr) -> String {
        let owner = self
            .nodes
            .get(&addr.node)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| addr.node.to_string());
        match addr.index {
            Some(i) => format!("{}.{}[{}]", owner, addr.attr, i),
            None => format!("{}.{}", owner, addr.attr),
        }
    }

    // ==================== Internals ====================

    /// Resolve an address to its node and plug, validating the element index
    /// against the multi flag.
    fn plug_ref(&self, addr: &PlugAddr) -> SceneResult<(&Node, &Plug)> {
        let node = self
            .nodes
            .get(&addr.node)
            .ok_or_else(|| SceneError::node_not_found(addr.node.to_string()))?;
        let plug = node
            .plug(&addr.attr)
            .ok_or_else(|| SceneError::no_such_attribute(&node.name, &addr.attr))?;
        if let Some(i) = addr.index {
            if !plug.def.multi {
                return Err(SceneError::no_such_attribute(
                    &node.name,
                    format!("{}[{}]", addr.attr, i),
                ));
            }
        }
        Ok((node, plug))
    }

    fn read_plug(&self, addr: &PlugAddr) -> SceneResult<Value> {
        self.get_attr(addr)
    }

    /// Write a driven value, conforming it to the destination type. A value
    /// that fails conversion at propagation time (out-of-range enum index)
    /// rides through unconverted.
    fn write_driven(&mut self, addr: &PlugAddr, value: Value) {
        if let Some(node) = self.nodes.get_mut(&addr.node) {
            if let Some(plug) = node.plug_mut(&addr.attr) {
                let coerced = plug
                    .def
                    .attr_type
                    .coerce(value.clone())
                    .unwrap_or(value);
                match addr.index {
                    Some(i) => {
                        plug.elements.insert(i, coerced);
                    }
                    None => plug.value = coerced,
                }
            }
        }
    }

    /// Eager push propagation from a plug whose value just changed. Follows
    /// outgoing connections transitively in declaration order; the visited
    /// set makes a lap over a multi-hop cycle terminate.
    fn propagate_from(&mut self, start: PlugAddr) {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut visited: HashSet<PlugAddr> = HashSet::new();

        while let Some(source) = queue.pop_front() {
            let targets: Vec<PlugAddr> = self
                .connections
                .iter()
                .filter(|c| c.src == source)
                .map(|c| c.dst.clone())
                .collect();
            if targets.is_empty() {
                continue;
            }
            let value = match self.read_plug(&source) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for target in targets {
                if !visited.insert(target.clone()) {
                    continue;
                }
                self.write_driven(&target, value.clone());
                queue.push_back(target);
            }
        }
    }

    /// First free element index of a multi destination: the lowest index not
    /// used by an incoming connection or a set element.
    fn next_free_index(&self, addr: &PlugAddr) -> u32 {
        let mut used: HashSet<u32> = self
            .connections
            .iter()
            .filter(|c| c.dst.same_attr(addr))
            .filter_map(|c| c.dst.index)
            .collect();
        if let Some(node) = self.nodes.get(&addr.node) {
            if let Some(plug) = node.plug(&addr.attr) {
                used.extend(plug.elements.keys().copied());
            }
        }
        (0..).find(|i| !used.contains(i)).unwrap_or(0)
    }

    /// Disambiguate a requested name against the name index: strip trailing
    /// digits to get the stem, then take the lowest free `<stem><N>`.
    fn unique_name(&self, requested: &str) -> String {
        if !self.names.contains_key(requested) {
            return requested.to_string();
        }
        let (stem, number) = naming::split_trailing_digits(requested);
        let start = number.map(|n| n + 1).unwrap_or(1);
        self.unique_name_numbered(stem, start)
    }

    /// Auto-name from a stem, numbering from 1 (`transform1`, `transform2`).
    fn unique_name_from_stem(&self, stem: &str) -> String {
        self.unique_name_numbered(stem, 1)
    }

    fn unique_name_numbered(&self, stem: &str, start: u64) -> String {
        let mut n = start;
        loop {
            let candidate = format!("{}{}", stem, n);
            if !self.names.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mayamock_schema::SchemaStore;

    fn plug(graph: &SceneGraph<'_>, name: &str, attr: &str) -> PlugAddr {
        PlugAddr::new(graph.node_id_by_name(name).unwrap(), attr)
    }

    #[test]
    fn test_create_node_initializes_defaults() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let id = graph.create_node("transform", None).unwrap();

        let defaults = schema.resolved_attrs("transform").unwrap();
        let node = graph.node(id).unwrap();
        assert_eq!(node.plugs().len(), defaults.len());
        for def in defaults {
            let plug = node.plug(&def.name).unwrap();
            assert_eq!(plug.value, def.default, "default of {}", def.name);
        }
    }

    #[test]
    fn test_auto_names_count_from_one() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", None).unwrap();
        let b = graph.create_node("transform", None).unwrap();
        assert_eq!(graph.node(a).unwrap().name, "transform1");
        assert_eq!(graph.node(b).unwrap().name, "transform2");
    }

    #[test]
    fn test_requested_name_collision_is_suffixed() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", Some("pCube")).unwrap();
        let b = graph.create_node("transform", Some("pCube")).unwrap();
        assert_eq!(graph.node(a).unwrap().name, "pCube");
        assert_eq!(graph.node(b).unwrap().name, "pCube1");
    }

    #[test]
    fn test_unknown_type_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let err = graph.create_node("unknownType", None).unwrap_err();
        assert!(matches!(err, SceneError::UnknownType { .. }));
    }

    #[test]
    fn test_abstract_type_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let err = graph.create_node("dagNode", None).unwrap_err();
        assert!(matches!(err, SceneError::AbstractType { .. }));
    }

    #[test]
    fn test_set_and_get_attr() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("pCube")).unwrap();
        let tx = plug(&graph, "pCube", "translateX");

        graph.set_attr(&tx, Value::Int(5)).unwrap();
        assert_eq!(graph.get_attr(&tx).unwrap(), Value::Float(5.0));
    }

    #[test]
    fn test_get_unknown_attr_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let id = graph.create_node("transform", None).unwrap();
        let err = graph.get_attr(&PlugAddr::new(id, "bogus")).unwrap_err();
        assert!(matches!(err, SceneError::NoSuchAttribute { .. }));
    }

    #[test]
    fn test_set_read_only_attr_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("multiplyDivide", Some("mult")).unwrap();
        let out = plug(&graph, "mult", "outputX");
        let err = graph.set_attr(&out, Value::Float(1.0)).unwrap_err();
        assert!(matches!(err, SceneError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn test_connection_drives_destination() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");

        graph.set_attr(&a_tx, Value::Float(3.0)).unwrap();
        graph.connect(a_tx.clone(), b_tx.clone()).unwrap();
        // Connecting overwrites the destination eagerly.
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(3.0));

        // Setting the source propagates within the same call.
        graph.set_attr(&a_tx, Value::Float(9.0)).unwrap();
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(9.0));

        // The driven destination rejects direct sets.
        let err = graph.set_attr(&b_tx, Value::Float(1.0)).unwrap_err();
        assert!(matches!(err, SceneError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn test_propagation_is_transitive() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        graph.create_node("transform", Some("c")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");
        let c_tx = plug(&graph, "c", "translateX");

        graph.connect(a_tx.clone(), b_tx.clone()).unwrap();
        graph.connect(b_tx.clone(), c_tx.clone()).unwrap();
        graph.set_attr(&a_tx, Value::Float(7.0)).unwrap();
        assert_eq!(graph.get_attr(&c_tx).unwrap(), Value::Float(7.0));
    }

    #[test]
    fn test_disconnect_restores_writability_and_keeps_value() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");

        graph.set_attr(&a_tx, Value::Float(4.0)).unwrap();
        graph.connect(a_tx.clone(), b_tx.clone()).unwrap();
        graph.disconnect(&a_tx, &b_tx).unwrap();

        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(4.0));
        graph.set_attr(&b_tx, Value::Float(1.5)).unwrap();
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_disconnect_unconnected_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");
        let err = graph.disconnect(&a_tx, &b_tx).unwrap_err();
        assert!(matches!(err, SceneError::NotConnected { .. }));
    }

    #[test]
    fn test_second_incoming_connection_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        graph.create_node("transform", Some("c")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");
        let c_tx = plug(&graph, "c", "translateX");

        graph.connect(a_tx, c_tx.clone()).unwrap();
        let err = graph.connect(b_tx, c_tx).unwrap_err();
        assert!(matches!(err, SceneError::AlreadyConnected { .. }));
    }

    #[test]
    fn test_incompatible_types_fail() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("mesh", Some("aShape")).unwrap();
        let tx = plug(&graph, "a", "translateX");
        let in_mesh = plug(&graph, "aShape", "inMesh");
        let err = graph.connect(tx, in_mesh).unwrap_err();
        assert!(matches!(err, SceneError::TypeMismatch { .. }));
    }

    #[test]
    fn test_single_plug_self_loop_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        let tx = plug(&graph, "a", "translateX");
        let err = graph.connect(tx.clone(), tx).unwrap_err();
        assert!(matches!(err, SceneError::Cycle(_)));
    }

    #[test]
    fn test_multi_hop_cycle_is_permitted_and_settles() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");

        graph.connect(a_tx.clone(), b_tx.clone()).unwrap();
        graph.connect(b_tx.clone(), a_tx.clone()).unwrap();
        graph.set_attr(&a_tx, Value::Float(2.0)).unwrap();
        assert_eq!(graph.get_attr(&a_tx).unwrap(), Value::Float(2.0));
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_multi_destination_assigns_indices() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        graph.create_node("plusMinusAverage", Some("sum")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");
        let input = plug(&graph, "sum", "input1D");

        graph.connect(a_tx.clone(), input.clone()).unwrap();
        graph.connect(b_tx.clone(), input.clone()).unwrap();

        let incoming = graph.incoming(&input);
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[0].dst.index, Some(0));
        assert_eq!(incoming[1].dst.index, Some(1));

        graph.set_attr(&a_tx, Value::Float(1.0)).unwrap();
        graph.set_attr(&b_tx, Value::Float(2.0)).unwrap();
        assert_eq!(
            graph.get_attr(&input).unwrap(),
            Value::List(vec![Value::Float(1.0), Value::Float(2.0)])
        );
    }

    #[test]
    fn test_delete_node_cascades_connections() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");

        graph.connect(a_tx, b_tx.clone()).unwrap();
        graph.delete_node(a, false).unwrap();

        assert!(graph.connections().is_empty());
        assert!(!graph.is_driven(&b_tx));
        graph.set_attr(&b_tx, Value::Float(1.0)).unwrap();
    }

    #[test]
    fn test_delete_with_children_requires_recursive() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let parent = graph.create_node("transform", Some("group")).unwrap();
        let child = graph.create_node("transform", Some("leaf")).unwrap();
        graph.reparent(child, Some(parent)).unwrap();

        let err = graph.delete_node(parent, false).unwrap_err();
        assert!(matches!(err, SceneError::HasChildren { .. }));

        graph.delete_node(parent, true).unwrap();
        assert!(graph.node(parent).is_err());
        assert!(graph.node(child).is_err());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_deleted_node_lookup_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let id = graph.create_node("transform", None).unwrap();
        graph.delete_node(id, false).unwrap();
        let err = graph.delete_node(id, false).unwrap_err();
        assert!(matches!(err, SceneError::NodeNotFound { .. }));
    }

    #[test]
    fn test_reparent_to_descendant_fails() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", Some("a")).unwrap();
        let b = graph.create_node("transform", Some("b")).unwrap();
        let c = graph.create_node("transform", Some("c")).unwrap();
        graph.reparent(b, Some(a)).unwrap();
        graph.reparent(c, Some(b)).unwrap();

        let err = graph.reparent(a, Some(c)).unwrap_err();
        assert!(matches!(err, SceneError::Cycle(_)));
        let err = graph.reparent(a, Some(a)).unwrap_err();
        assert!(matches!(err, SceneError::Cycle(_)));
    }

    #[test]
    fn test_dag_path_and_descendants() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", Some("a")).unwrap();
        let b = graph.create_node("transform", Some("b")).unwrap();
        let c = graph.create_node("transform", Some("c")).unwrap();
        graph.reparent(b, Some(a)).unwrap();
        graph.reparent(c, Some(b)).unwrap();

        assert_eq!(graph.dag_path(c).unwrap(), "|a|b|c");
        assert_eq!(graph.descendants(a).unwrap(), vec![b, c]);
        assert_eq!(graph.children(a).unwrap(), &[b]);
    }

    #[test]
    fn test_rename_returns_disambiguated_name() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("pCube")).unwrap();
        let other = graph.create_node("transform", Some("other")).unwrap();

        let assigned = graph.rename(other, "pCube").unwrap();
        assert_eq!(assigned, "pCube1");
        assert_eq!(graph.node(other).unwrap().name, "pCube1");
        assert!(graph.node_by_name("other").is_err());
    }

    #[test]
    fn test_dynamic_attr_lifecycle() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        let a = graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();

        graph
            .add_attr(a, AttrDef::new("customWeight", mayamock_core::AttrType::Float))
            .unwrap();
        let custom = plug(&graph, "a", "customWeight");
        let b_tx = plug(&graph, "b", "translateX");
        graph.set_attr(&custom, Value::Float(0.5)).unwrap();
        graph.connect(custom.clone(), b_tx.clone()).unwrap();
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(0.5));

        graph.delete_attr(a, "customWeight").unwrap();
        assert!(graph.get_attr(&custom).is_err());
        assert!(graph.connections().is_empty());

        let err = graph.delete_attr(a, "translateX").unwrap_err();
        assert!(matches!(err, SceneError::StaticAttribute { .. }));
    }

    #[test]
    fn test_failed_set_leaves_downstream_unchanged() {
        let schema = SchemaStore::minimal();
        let mut graph = SceneGraph::new(&schema);
        graph.create_node("transform", Some("a")).unwrap();
        graph.create_node("transform", Some("b")).unwrap();
        let a_tx = plug(&graph, "a", "translateX");
        let b_tx = plug(&graph, "b", "translateX");

        graph.set_attr(&a_tx, Value::Float(3.0)).unwrap();
        graph.connect(a_tx.clone(), b_tx.clone()).unwrap();

        let err = graph.set_attr(&a_tx, Value::String("oops".into()));
        assert!(err.is_err());
        assert_eq!(graph.get_attr(&a_tx).unwrap(), Value::Float(3.0));
        assert_eq!(graph.get_attr(&b_tx).unwrap(), Value::Float(3.0));
    }
}
