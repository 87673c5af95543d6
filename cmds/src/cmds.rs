//! The command interpreter: one entry point per emulated command.

use crate::error::{CmdError, CmdResult};
use crate::path::parse_plug_path;
use crate::session::Session;
use mayamock_core::{AttrType, NodeId, Value};
use mayamock_schema::{AttrDef, SchemaStore};
use mayamock_scene::{naming, Connection, PlugAddr};

/// Result shape of `connectionInfo`, which answers with a single plug path
/// or a list depending on the flag used.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionQuery {
    /// The source plug driving the queried destination; empty when undriven.
    Source(String),
    /// Every destination plug driven by the queried source.
    Destinations(Vec<String>),
}

/// Stateless command façade over a [`Session`].
///
/// Commands accept the host's string addressing everywhere: node names, dag
/// paths, `*` wildcards, and `node.attr[index]` plug paths. Return shapes
/// mirror the host, including `None` instead of an empty list where the host
/// answers that way.
#[derive(Debug)]
pub struct Cmds<'s> {
    session: Session<'s>,
}

impl<'s> Cmds<'s> {
    /// Wrap an existing session.
    pub fn new(session: Session<'s>) -> Self {
        Self { session }
    }

    /// Start a fresh session over a schema store and wrap it.
    pub fn from_schema(schema: &'s SchemaStore) -> Self {
        Self::new(Session::new(schema))
    }

    /// The wrapped session.
    pub fn session(&self) -> &Session<'s> {
        &self.session
    }

    /// Mutable access to the wrapped session.
    pub fn session_mut(&mut self) -> &mut Session<'s> {
        &mut self.session
    }

    /// Tear the interpreter down, handing the session back.
    pub fn into_session(self) -> Session<'s> {
        self.session
    }

    // ==================== Commands ====================

    /// `createNode`: create a node, optionally named and parented, select
    /// it, and return the name actually assigned.
    pub fn create_node(
        &mut self,
        type_name: &str,
        name: Option<&str>,
        parent: Option<&str>,
    ) -> CmdResult<String> {
        let parent_id = match parent {
            Some(p) => Some(
                self.resolve_node(p)
                    .ok_or_else(|| CmdError::no_object_matches(p))?,
            ),
            None => None,
        };
        let id = self
            .session
            .graph_mut()
            .create_node(type_name, name)
            .map_err(|e| CmdError::scene("createNode", e))?;
        if let Some(parent_id) = parent_id {
            self.session
                .graph_mut()
                .reparent(id, Some(parent_id))
                .map_err(|e| CmdError::scene("createNode", e))?;
        }
        let created = self.session.graph().node(id).map(|n| n.name.clone());
        let created = created.map_err(|e| CmdError::scene("createNode", e))?;
        self.session.set_selection(vec![id]);
        Ok(created)
    }

    /// `connectAttr`: connect a source plug to a destination plug.
    pub fn connect_attr(&mut self, src: &str, dst: &str) -> CmdResult<()> {
        let src_addr = self
            .resolve_plug(src)
            .ok_or_else(|| CmdError::source_attr_not_found(src))?;
        let dst_addr = self
            .resolve_plug(dst)
            .ok_or_else(|| CmdError::destination_attr_not_found(dst))?;

        if self.find_connection(&src_addr, &dst_addr).is_some() {
            self.warning(&format!("'{}' is already connected to '{}'.", src, dst));
            return Err(CmdError::CommandFailed);
        }

        self.session
            .graph_mut()
            .connect(src_addr, dst_addr)
            .map_err(|e| CmdError::scene("connectAttr", e))
    }

    /// `disconnectAttr`: remove the connection between two plugs.
    pub fn disconnect_attr(&mut self, src: &str, dst: &str) -> CmdResult<()> {
        let src_addr = self
            .resolve_plug(src)
            .ok_or_else(|| CmdError::source_attr_not_found(src))?;
        let dst_addr = self
            .resolve_plug(dst)
            .ok_or_else(|| CmdError::destination_attr_not_found(dst))?;

        match self.find_connection(&src_addr, &dst_addr) {
            Some(conn) => self
                .session
                .graph_mut()
                .disconnect(&conn.src, &conn.dst)
                .map_err(|e| CmdError::scene("disconnectAttr", e)),
            None => Err(CmdError::not_connected(src, dst)),
        }
    }

    /// `setAttr`: set the value of an attribute.
    pub fn set_attr(&mut self, path: &str, value: impl Into<Value>) -> CmdResult<()> {
        let addr = self
            .resolve_plug(path)
            .ok_or_else(|| CmdError::no_object_matches(path))?;
        self.session
            .graph_mut()
            .set_attr(&addr, value.into())
            .map_err(|e| CmdError::scene("setAttr", e))
    }

    /// `getAttr`: read the value of an attribute.
    pub fn get_attr(&self, path: &str) -> CmdResult<Value> {
        let addr = self
            .resolve_plug(path)
            .ok_or_else(|| CmdError::no_object_matches(path))?;
        self.session
            .graph()
            .get_attr(&addr)
            .map_err(|e| CmdError::scene("getAttr", e))
    }

    /// `listConnections`: connections of a plug or of every plug on a node.
    ///
    /// `source` selects incoming peers, `destination` outgoing peers; with
    /// `plugs` the peers render as plug paths instead of node names. Returns
    /// `None` when nothing is connected, like the host.
    pub fn list_connections(
        &self,
        path: &str,
        source: bool,
        destination: bool,
        plugs: bool,
    ) -> CmdResult<Option<Vec<String>>> {
        let graph = self.session.graph();
        let mut peers: Vec<PlugAddr> = Vec::new();

        if let Some(addr) = self.resolve_plug(path) {
            if source {
                peers.extend(graph.incoming(&addr).into_iter().map(|c| c.src.clone()));
            }
            if destination {
                peers.extend(graph.outgoing(&addr).into_iter().map(|c| c.dst.clone()));
            }
        } else if let Some(id) = self.resolve_node(path) {
            for conn in graph.node_connections(id) {
                if source && conn.dst.node == id {
                    peers.push(conn.src.clone());
                }
                if destination && conn.src.node == id {
                    peers.push(conn.dst.clone());
                }
            }
        } else {
            return Err(CmdError::no_object_matches(path));
        }

        if peers.is_empty() {
            return Ok(None);
        }
        let rendered = peers
            .into_iter()
            .map(|peer| {
                if plugs {
                    graph.display_plug(&peer)
                } else {
                    graph
                        .node(peer.node)
                        .map(|n| n.name.clone())
                        .unwrap_or_else(|_| peer.node.to_string())
                }
            })
            .collect();
        Ok(Some(rendered))
    }

    /// `listRelatives`: hierarchy neighbors of a node. With no flag set the
    /// host lists children. Returns `None` when there is nothing to list.
    pub fn list_relatives(
        &self,
        name: &str,
        children: bool,
        parent: bool,
        all_descendents: bool,
    ) -> CmdResult<Option<Vec<String>>> {
        let id = self
            .resolve_node(name)
            .ok_or_else(|| CmdError::no_object_matches(name))?;
        let graph = self.session.graph();
        let list_children = children || (!parent && !all_descendents);

        let mut ids: Vec<NodeId> = Vec::new();
        if all_descendents {
            ids.extend(
                graph
                    .descendants(id)
                    .map_err(|e| CmdError::scene("listRelatives", e))?,
            );
        } else if list_children {
            ids.extend(
                graph
                    .children(id)
                    .map_err(|e| CmdError::scene("listRelatives", e))?,
            );
        }
        if parent {
            if let Ok(node) = graph.node(id) {
                ids.extend(node.parent);
            }
        }

        if ids.is_empty() {
            return Ok(None);
        }
        let names = ids
            .into_iter()
            .filter_map(|id| graph.node(id).ok().map(|n| n.name.clone()))
            .collect();
        Ok(Some(names))
    }

    /// `delete`: delete nodes and their hierarchies. Targets are resolved
    /// up front; the call aborts on the first name that does not resolve.
    pub fn delete(&mut self, names: &[&str]) -> CmdResult<()> {
        let mut ids = Vec::new();
        for name in names {
            ids.push(
                self.resolve_node(name)
                    .ok_or_else(|| CmdError::no_object_matches(*name))?,
            );
        }
        for id in ids {
            // A target may already be gone as part of an earlier hierarchy.
            if self.session.graph().node(id).is_err() {
                continue;
            }
            self.session
                .graph_mut()
                .delete_node(id, true)
                .map_err(|e| CmdError::scene("delete", e))?;
        }
        Ok(())
    }

    /// `rename`: rename a node, returning the name actually assigned.
    pub fn rename(&mut self, old: &str, new: &str) -> CmdResult<String> {
        let id = self
            .resolve_node(old)
            .ok_or_else(|| CmdError::no_object_matches(old))?;
        self.session
            .graph_mut()
            .rename(id, new)
            .map_err(|e| CmdError::scene("rename", e))
    }

    /// `ls`: list nodes, sorted. `pattern` accepts `*` wildcards and dag
    /// paths; `long` renders full dag paths.
    pub fn ls(
        &self,
        pattern: Option<&str>,
        type_filter: Option<&str>,
        selection: bool,
        long: bool,
    ) -> Vec<String> {
        let graph = self.session.graph();
        let regex = pattern.map(naming::pattern_to_regex);
        let mut out: Vec<String> = Vec::new();
        for node in graph.nodes() {
            let Ok(dag) = graph.dag_path(node.id) else {
                continue;
            };
            if let Some(regex) = &regex {
                if !regex.is_match(&dag) {
                    continue;
                }
            }
            if let Some(wanted) = type_filter {
                if node.type_name != wanted {
                    continue;
                }
            }
            if selection && !self.session.selection().contains(&node.id) {
                continue;
            }
            out.push(if long { dag } else { node.name.clone() });
        }
        out.sort_unstable();
        out
    }

    /// `addAttr`: add a dynamic attribute to each target node.
    pub fn add_attr(
        &mut self,
        objects: &[&str],
        long_name: Option<&str>,
        short_name: Option<&str>,
        attr_type: Option<AttrType>,
        default: Option<Value>,
    ) -> CmdResult<()> {
        let name = long_name
            .or(short_name)
            .ok_or(CmdError::MissingAttributeName)?;
        let attr_type = attr_type.unwrap_or(AttrType::Float);

        for object in objects {
            let id = self
                .resolve_node(object)
                .ok_or_else(|| CmdError::no_object_matches(*object))?;
            let mut def = AttrDef::new(name, attr_type.clone());
            if let Some(value) = &default {
                def = def.with_default(value.clone());
            }
            self.session
                .graph_mut()
                .add_attr(id, def)
                .map_err(|e| CmdError::scene("addAttr", e))?;
        }
        Ok(())
    }

    /// `deleteAttr`: remove a dynamic attribute from a node.
    pub fn delete_attr(&mut self, node: &str, attr: &str) -> CmdResult<()> {
        let id = self
            .resolve_node(node)
            .ok_or_else(|| CmdError::no_object_matches(node))?;
        self.session
            .graph_mut()
            .delete_attr(id, attr)
            .map_err(|e| CmdError::scene("deleteAttr", e))
    }

    /// `listAttr`: attribute names of each target, in attribute order.
    pub fn list_attr(&self, objects: &[&str], user_defined: bool) -> CmdResult<Vec<String>> {
        let graph = self.session.graph();
        let mut out = Vec::new();
        for object in objects {
            let id = self
                .resolve_node(object)
                .ok_or_else(|| CmdError::no_object_matches(*object))?;
            if let Ok(node) = graph.node(id) {
                out.extend(
                    node.plugs()
                        .iter()
                        .filter(|p| !user_defined || p.user_defined)
                        .map(|p| p.def.name.clone()),
                );
            }
        }
        Ok(out)
    }

    /// `nodeType`: the type name of a node.
    pub fn node_type(&self, name: &str) -> CmdResult<String> {
        let id = self
            .resolve_node(name)
            .ok_or_else(|| CmdError::no_object_matches(name))?;
        self.session
            .graph()
            .node(id)
            .map(|n| n.type_name.clone())
            .map_err(|e| CmdError::scene("nodeType", e))
    }

    /// `objExists`: whether any node or plug matches the pattern.
    pub fn obj_exists(&self, pattern: &str) -> bool {
        self.resolve_node(pattern).is_some() || self.resolve_plug(pattern).is_some()
    }

    /// `select`: replace the selection with the named nodes, in call order.
    /// Names that do not resolve are ignored.
    pub fn select(&mut self, names: &[&str]) {
        let ids: Vec<NodeId> = names.iter().filter_map(|n| self.resolve_node(n)).collect();
        self.session.set_selection(ids);
    }

    /// `parent`: parent every listed node under the last one, or unparent
    /// all of them with `world`.
    pub fn parent(&mut self, objects: &[&str], world: bool) -> CmdResult<()> {
        if world {
            for object in objects {
                let id = self
                    .resolve_node(object)
                    .ok_or_else(|| CmdError::no_object_matches(*object))?;
                self.session
                    .graph_mut()
                    .reparent(id, None)
                    .map_err(|e| CmdError::scene("parent", e))?;
            }
            return Ok(());
        }

        let Some((parent_name, children)) = objects.split_last() else {
            return Ok(());
        };
        let parent_id = self
            .resolve_node(parent_name)
            .ok_or_else(|| CmdError::no_object_matches(*parent_name))?;
        for child in children {
            let child_id = self
                .resolve_node(child)
                .ok_or_else(|| CmdError::no_object_matches(*child))?;
            self.session
                .graph_mut()
                .reparent(child_id, Some(parent_id))
                .map_err(|e| CmdError::scene("parent", e))?;
        }
        Ok(())
    }

    /// `connectionInfo`: query one side of a plug's connections. Exactly one
    /// flag must be set.
    pub fn connection_info(
        &self,
        path: &str,
        source_from_destination: bool,
        destination_from_source: bool,
    ) -> CmdResult<ConnectionQuery> {
        let addr = self
            .resolve_plug(path)
            .ok_or_else(|| CmdError::no_object_matches(path))?;
        let graph = self.session.graph();
        match (source_from_destination, destination_from_source) {
            (true, false) => Ok(ConnectionQuery::Source(
                graph
                    .incoming(&addr)
                    .first()
                    .map(|c| graph.display_plug(&c.src))
                    .unwrap_or_default(),
            )),
            (false, true) => Ok(ConnectionQuery::Destinations(
                graph
                    .outgoing(&addr)
                    .iter()
                    .map(|c| graph.display_plug(&c.dst))
                    .collect(),
            )),
            (true, true) => Err(CmdError::ConflictingFlags),
            (false, false) => Err(CmdError::MissingFlag),
        }
    }

    /// `warning`: log a message to the script-editor channel.
    pub fn warning(&self, msg: &str) {
        log::warn!(target: "mayamock", "{}", msg);
    }

    // ==================== Argument Resolution ====================

    /// Resolve a node reference: exact name first, then dag-path or wildcard
    /// pattern, taking the first match in dag order.
    fn resolve_node(&self, name_or_path: &str) -> Option<NodeId> {
        let graph = self.session.graph();
        if let Some(id) = graph.node_id_by_name(name_or_path) {
            return Some(id);
        }
        let regex = naming::pattern_to_regex(name_or_path);
        let mut matches: Vec<(String, NodeId)> = graph
            .nodes()
            .filter_map(|node| {
                let dag = graph.dag_path(node.id).ok()?;
                regex.is_match(&dag).then_some((dag, node.id))
            })
            .collect();
        matches.sort();
        matches.first().map(|(_, id)| *id)
    }

    /// Resolve a `node.attr[index]` path to a live plug address.
    fn resolve_plug(&self, path: &str) -> Option<PlugAddr> {
        let parsed = parse_plug_path(path)?;
        let id = self.resolve_node(parsed.node)?;
        let node = self.session.graph().node(id).ok()?;
        let plug = node.plug(parsed.attr)?;
        if parsed.index.is_some() && !plug.def.multi {
            return None;
        }
        Some(PlugAddr {
            node: id,
            attr: parsed.attr.to_string(),
            index: parsed.index,
        })
    }

    /// Find an existing connection between the two addresses, treating an
    /// index-less multi destination as matching any of its elements.
    fn find_connection(&self, src: &PlugAddr, dst: &PlugAddr) -> Option<Connection> {
        self.session
            .graph()
            .connections()
            .iter()
            .find(|c| {
                c.src == *src
                    && (c.dst == *dst || (dst.index.is_none() && c.dst.same_attr(dst)))
            })
            .cloned()
    }
}
