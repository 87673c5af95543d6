//! Session state: the explicit stand-in for the host's global scene.

use mayamock_core::NodeId;
use mayamock_schema::SchemaStore;
use mayamock_scene::SceneGraph;

/// One mock session: an attribute graph, the loaded schema store, and the
/// current selection.
///
/// The host keeps this state in an implicit process-wide singleton; here the
/// lifecycle is explicit. Creating a session starts an empty scene; dropping
/// it releases every node, plug, and connection at once.
#[derive(Debug)]
pub struct Session<'s> {
    /// The session's attribute graph.
    graph: SceneGraph<'s>,
    /// Currently selected nodes, in selection order.
    selection: Vec<NodeId>,
}

impl<'s> Session<'s> {
    /// Start a session over a loaded schema store.
    pub fn new(schema: &'s SchemaStore) -> Self {
        Self {
            graph: SceneGraph::new(schema),
            selection: Vec::new(),
        }
    }

    /// The schema store this session was started with.
    pub fn schema(&self) -> &'s SchemaStore {
        self.graph.schema()
    }

    /// Get a reference to the attribute graph.
    pub fn graph(&self) -> &SceneGraph<'s> {
        &self.graph
    }

    /// Get a mutable reference to the attribute graph.
    pub fn graph_mut(&mut self) -> &mut SceneGraph<'s> {
        &mut self.graph
    }

    /// The current selection.
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replace the current selection. Ids that no longer resolve are
    /// dropped.
    pub fn set_selection(&mut self, ids: Vec<NodeId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.graph.node(*id).is_ok())
            .collect();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mayamock_schema::SchemaStore;

    #[test]
    fn test_selection_drops_stale_ids() {
        let schema = SchemaStore::minimal();
        let mut session = Session::new(&schema);
        let id = session.graph_mut().create_node("transform", None).unwrap();
        session.graph_mut().delete_node(id, false).unwrap();
        session.set_selection(vec![id]);
        assert!(session.selection().is_empty());
    }
}
