//! Pluggable renderer binding
//!
//! A renderer turns the filtered graph into a main view. It may patch itself
//! incrementally from a [`GraphEvent`]; if it declines, the platform asks for a
//! full render the next time the view is requested.

use crate::graph::{Graph, GraphEvent, Node};

pub trait Renderer: Send {
    fn name(&self) -> &str;

    /// Produce the full main view for `graph`
    fn render(&mut self, graph: &Graph, selected: Option<&Node>) -> String;

    /// Apply a mutation incrementally; `false` requests a full re-render
    fn apply_event(&mut self, _event: &GraphEvent) -> bool {
        false
    }

    fn on_switched_to(&mut self) {}

    fn on_switched_from(&mut self) {}

    fn on_selection_changed(&mut self, _selected: Option<&Node>) {}
}

/// Plain-text listing of vertices and links, always rendered in full
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&mut self, graph: &Graph, selected: Option<&Node>) -> String {
        let mut lines = Vec::with_capacity(graph.vertex_count());
        for node in graph.vertices() {
            let mark = if selected.map(Node::id) == Some(node.id()) { '*' } else { ' ' };
            let attrs: Vec<String> = node
                .attributes()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            lines.push(format!("{} {} [{}]", mark, node.id(), attrs.join(", ")));
        }
        for edge in graph.edges() {
            lines.push(format!("  {} -> {}", edge.source, edge.target));
        }
        lines.join("\n")
    }
}
