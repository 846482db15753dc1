//! Platform orchestrator
//!
//! Owns one base graph plus everything derived from it: the filtered graph,
//! the forest view over the filtered graph, the current selection and the
//! bound renderer. Every mutation runs as one step:
//!
//! 1. apply to the base graph (stop here on failure),
//! 2. let the renderer patch itself or flag a full re-render,
//! 3. rebuild the filtered graph, then the forest (replaying expansions),
//! 4. notify listeners in registration order and push a snapshot to every
//!    subscriber queue.

pub mod listener;
pub mod renderer;
pub mod subscriber;
pub mod workspace;

pub use listener::{ListenerRegistry, UpdateListener};
pub use renderer::{Renderer, TextRenderer};
pub use subscriber::{SubscriberHub, SubscriberId, TreeViewPayload};
pub use workspace::{Workspace, WorkspaceError, WorkspaceId, WorkspaceManager, WorkspaceResult};

use crate::config::PlatformConfig;
use crate::filter::{Filter, FilterDescriptor};
use crate::forest::{ForestView, TreeId};
use crate::graph::{AttributeMap, Edge, Graph, GraphData, GraphEvent, GraphResult, Node, VertexId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

pub struct Platform {
    graph: Graph,
    filtered: Graph,
    forest: ForestView,
    selected: Option<VertexId>,
    renderer: Option<Box<dyn Renderer>>,
    needs_full_render: bool,
    listeners: Arc<ListenerRegistry>,
    subscribers: SubscriberHub,
}

impl Platform {
    pub fn new(graph: Graph) -> Self {
        let filtered = graph.rebuild_filtered_graph();
        let forest = ForestView::build(&filtered);
        Self {
            graph,
            filtered,
            forest,
            selected: None,
            renderer: None,
            needs_full_render: true,
            listeners: Arc::new(ListenerRegistry::new()),
            subscribers: SubscriberHub::new(),
        }
    }

    /// Empty platform with the configured directedness
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(Graph::new(config.directed))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn filtered_graph(&self) -> &Graph {
        &self.filtered
    }

    pub fn forest(&self) -> &ForestView {
        &self.forest
    }

    // ---- vertex operations ----

    pub fn add_vertex(&mut self, node: Node) -> bool {
        let event = GraphEvent::NodeAdded(node.clone());
        self.apply(event, |graph| graph.add_vertex(node))
    }

    /// Replace the attributes of an existing vertex
    pub fn edit_vertex(&mut self, node: Node) -> bool {
        let event = GraphEvent::NodeEdited(node.clone());
        self.apply(event, |graph| graph.edit_vertex(&node))
    }

    pub fn delete_vertex(&mut self, id: &VertexId) -> bool {
        match self.graph.delete_vertex(id) {
            Ok(removed) => {
                if self.selected.as_ref() == Some(id) {
                    self.selected = None;
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.on_selection_changed(None);
                    }
                }
                self.commit(GraphEvent::NodeRemoved(removed));
                true
            }
            Err(err) => {
                debug!("delete_vertex rejected: {}", err);
                false
            }
        }
    }

    /// Insert a fresh vertex with the next free numeric id
    pub fn create_vertex(&mut self) -> Node {
        let node = self.graph.create_vertex();
        self.commit(GraphEvent::NodeAdded(node.clone()));
        node
    }

    // ---- edge operations ----

    pub fn create_edge(&mut self, source: &VertexId, target: &VertexId, attrs: AttributeMap) -> bool {
        match self.graph.create_edge(source, target, attrs) {
            Ok(_) => {
                let stored = self.graph.edge(source, target).cloned().unwrap_or_default();
                let edge = Edge::with_attributes(source.clone(), target.clone(), stored);
                self.commit(GraphEvent::LinkAdded(edge));
                true
            }
            Err(err) => {
                debug!("create_edge rejected: {}", err);
                false
            }
        }
    }

    /// Re-target the first outgoing edge of `source` to `new_target`
    pub fn edit_edge(&mut self, source: &VertexId, new_target: &VertexId, attrs: AttributeMap) -> bool {
        match self.graph.edit_edge(source, new_target, attrs) {
            Ok((previous_target, edge)) => {
                self.commit(GraphEvent::LinkEdited {
                    source: source.clone(),
                    previous_target,
                    edge,
                });
                true
            }
            Err(err) => {
                debug!("edit_edge rejected: {}", err);
                false
            }
        }
    }

    pub fn delete_edge(&mut self, source: &VertexId, target: &VertexId) -> bool {
        let event = GraphEvent::LinkRemoved {
            source: source.clone(),
            target: target.clone(),
        };
        self.apply(event, |graph| graph.delete_edge(source, target))
    }

    // ---- filters ----

    pub fn add_filter(&mut self, filter: Filter) {
        self.graph.add_filter(filter);
        self.commit(GraphEvent::FiltersChanged);
    }

    pub fn remove_filter(&mut self, index: usize) -> bool {
        self.apply(GraphEvent::FiltersChanged, |graph| {
            graph.remove_filter(index).map(|_| ())
        })
    }

    pub fn clear_filters(&mut self) {
        self.graph.clear_filters();
        self.commit(GraphEvent::FiltersChanged);
    }

    pub fn list_filters(&self) -> Vec<FilterDescriptor> {
        self.graph.filters().descriptors()
    }

    // ---- whole-graph operations ----

    /// Empty the base graph, keeping directedness and filters
    pub fn clear_graph(&mut self) {
        self.graph.clear();
        if self.selected.take().is_some() {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.on_selection_changed(None);
            }
        }
        self.commit(GraphEvent::GraphReplaced);
    }

    /// Swap in another graph and return the previous one
    pub fn replace_graph(&mut self, graph: Graph) -> Graph {
        let previous = std::mem::replace(&mut self.graph, graph);
        self.selected = None;
        self.forest.forget_expansions();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.on_selection_changed(None);
        }
        self.commit(GraphEvent::GraphReplaced);
        self.needs_full_render = true;
        previous
    }

    /// Vertices and links of the filtered graph
    pub fn get_graph_data(&self) -> GraphData {
        self.filtered.graph_data()
    }

    pub fn get_tree_view(&self) -> TreeViewPayload {
        TreeViewPayload {
            selected_id: self.selected.clone(),
            treeview: self.forest.serialize(&self.filtered),
        }
    }

    pub fn render_outline(&self) -> String {
        self.forest.render_outline(&self.filtered)
    }

    /// Community document of the base graph
    pub fn export_community(&self) -> serde_json::Result<String> {
        self.graph.to_community_json()
    }

    // ---- tree navigation ----

    pub fn expand_tree(&mut self, tree_id: TreeId) -> bool {
        if !self.forest.expand(&self.filtered, tree_id) {
            debug!("expand_tree: unknown tree id {}", tree_id);
            return false;
        }
        self.publish();
        true
    }

    pub fn collapse_tree(&mut self, tree_id: TreeId) -> bool {
        if !self.forest.collapse(tree_id) {
            debug!("collapse_tree: unknown tree id {}", tree_id);
            return false;
        }
        self.publish();
        true
    }

    // ---- selection ----

    /// Select a vertex of the base graph and reveal it in the forest
    pub fn select_node(&mut self, id: &VertexId) -> Option<Node> {
        let node = self.graph.get_vertex(id)?.clone();
        self.selected = Some(id.clone());
        if !self.forest.expand_path_to_node(&self.filtered, id) {
            debug!("Selected vertex {} is not visible in the forest", id);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.on_selection_changed(Some(&node));
        }
        self.publish();
        Some(node)
    }

    pub fn deselect_node(&mut self) {
        self.selected = None;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.on_selection_changed(None);
        }
        self.publish();
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.graph.get_vertex(id))
    }

    // ---- renderer binding ----

    /// Bind a renderer, returning the previously bound one
    pub fn set_renderer(&mut self, mut renderer: Box<dyn Renderer>) -> Option<Box<dyn Renderer>> {
        let mut previous = self.renderer.take();
        if let Some(old) = previous.as_mut() {
            old.on_switched_from();
        }
        renderer.on_switched_to();
        debug!("Renderer switched to {}", renderer.name());
        self.renderer = Some(renderer);
        self.needs_full_render = true;
        previous
    }

    pub fn needs_full_render(&self) -> bool {
        self.needs_full_render
    }

    /// Full render of the filtered graph; `None` without a bound renderer
    pub fn render_main_view(&mut self) -> Option<String> {
        let selected = self.selected.as_ref().and_then(|id| self.graph.get_vertex(id));
        let output = self.renderer.as_mut()?.render(&self.filtered, selected);
        self.needs_full_render = false;
        Some(output)
    }

    // ---- observers ----

    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    pub fn add_listener(&self, listener: Arc<dyn UpdateListener>) -> bool {
        self.listeners.attach(listener)
    }

    pub fn remove_listener(&self, listener: &Arc<dyn UpdateListener>) -> bool {
        self.listeners.detach(listener)
    }

    pub fn subscribe(&self) -> (SubscriberId, UnboundedReceiver<Arc<TreeViewPayload>>) {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ---- internals ----

    fn apply<F>(&mut self, event: GraphEvent, op: F) -> bool
    where
        F: FnOnce(&mut Graph) -> GraphResult<()>,
    {
        match op(&mut self.graph) {
            Ok(()) => {
                self.commit(event);
                true
            }
            Err(err) => {
                debug!("{} rejected: {}", event.operation(), err);
                false
            }
        }
    }

    fn commit(&mut self, event: GraphEvent) {
        debug!("Committing {}", event.operation());
        let patched = self
            .renderer
            .as_mut()
            .map(|renderer| renderer.apply_event(&event))
            .unwrap_or(false);
        if !patched {
            self.needs_full_render = true;
        }
        self.refresh();
        self.publish();
    }

    fn refresh(&mut self) {
        self.filtered = self.graph.rebuild_filtered_graph();
        self.forest.rebuild(&self.filtered);
    }

    fn publish(&self) {
        self.listeners.notify();
        if !self.subscribers.is_empty() {
            self.subscribers.publish(self.get_tree_view());
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new(Graph::default())
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("vertices", &self.graph.vertex_count())
            .field("visible", &self.filtered.vertex_count())
            .field("selected", &self.selected)
            .field("renderer", &self.renderer.as_ref().map(|r| r.name().to_string()))
            .finish()
    }
}
