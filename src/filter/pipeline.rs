//! Ordered filter pipeline
//!
//! Filters are applied in list order, each narrowing the surviving vertex set
//! left by the previous one. Edges are then re-derived from the original
//! adjacency: an edge survives when both of its endpoints did.

use super::predicate::{Filter, FilterDescriptor};
use crate::graph::{Graph, GraphError, GraphResult, Node};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    filters: Vec<Filter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Remove the filter at `index`, preserving the order of the rest
    pub fn remove(&mut self, index: usize) -> GraphResult<Filter> {
        if index >= self.filters.len() {
            return Err(GraphError::FilterIndexOutOfRange {
                index,
                len: self.filters.len(),
            });
        }
        Ok(self.filters.remove(index))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Filter> {
        self.filters.get(index)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn descriptors(&self) -> Vec<FilterDescriptor> {
        self.filters.iter().map(Filter::describe).collect()
    }

    /// Vertices of `base` that pass every filter, in vertex order
    pub fn surviving<'g>(&self, base: &'g Graph) -> Vec<&'g Node> {
        let mut survivors: Vec<&Node> = base.vertices().collect();
        for filter in &self.filters {
            survivors.retain(|node| filter.matches(node));
        }
        survivors
    }

    /// Build the filtered graph of `base`.
    ///
    /// The result has the same directedness, carries no filters of its own, and
    /// holds clones of the surviving vertices plus every stored adjacency entry
    /// whose endpoints both survived, with its original attributes.
    pub fn apply(&self, base: &Graph) -> Graph {
        let mut filtered = Graph::new(base.is_directed());

        for node in self.surviving(base) {
            if let Err(err) = filtered.add_vertex(node.clone()) {
                warn!("Skipping vertex while filtering: {}", err);
            }
        }

        for (source, targets) in base.outgoing_entries() {
            if !filtered.has_vertex(source) {
                continue;
            }
            for (target, attrs) in targets {
                if filtered.has_vertex(target) {
                    filtered.insert_edge_if_absent(source, target, attrs.clone());
                }
            }
        }

        debug!(
            "Filtered graph rebuilt: {}/{} vertices, {}/{} edges, {} filters",
            filtered.vertex_count(),
            base.vertex_count(),
            filtered.edge_count(),
            base.edge_count(),
            self.filters.len()
        );
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ComparisonOp;
    use crate::graph::{AttributeMap, VertexId};

    fn aged(id: &str, age: i64) -> Node {
        let mut node = Node::new(id);
        node.set_attribute("age", age).unwrap();
        node
    }

    fn ages() -> Graph {
        let mut graph = Graph::directed();
        graph.add_vertex(aged("A", 10)).unwrap();
        graph.add_vertex(aged("B", 20)).unwrap();
        graph.add_vertex(aged("C", 30)).unwrap();
        graph
    }

    fn ids(graph: &Graph) -> Vec<String> {
        graph.vertex_ids().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_filters_intersect_in_order() {
        let mut graph = ages();
        graph.add_filter(Filter::comparison("age", ComparisonOp::Gt, 15i64));
        graph.add_filter(Filter::comparison("age", ComparisonOp::Lt, 25i64));

        let filtered = graph.rebuild_filtered_graph();
        assert_eq!(ids(&filtered), vec!["B"]);
        assert!(filtered.filters().is_empty());
        // Base graph untouched
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn test_search_filter() {
        let mut graph = Graph::undirected();
        let mut a = Node::new("A");
        a.set_attribute("name", "phone").unwrap();
        let mut b = Node::new("B");
        b.set_attribute("name", "tv").unwrap();
        graph.add_vertex(a).unwrap();
        graph.add_vertex(b).unwrap();
        graph.add_filter(Filter::search("pho"));

        assert_eq!(ids(&graph.rebuild_filtered_graph()), vec!["A"]);
    }

    #[test]
    fn test_no_filters_is_full_copy() {
        let mut graph = ages();
        let mut attrs = AttributeMap::new();
        attrs.insert("w".to_string(), 1i64.into());
        graph.create_edge(&VertexId::new("A"), &VertexId::new("B"), attrs).unwrap();

        let filtered = graph.rebuild_filtered_graph();
        assert_eq!(ids(&filtered), vec!["A", "B", "C"]);
        assert_eq!(filtered.edges(), graph.edges());
    }

    #[test]
    fn test_edges_need_both_endpoints() {
        let mut graph = ages();
        let a = VertexId::new("A");
        let b = VertexId::new("B");
        let c = VertexId::new("C");
        graph.create_edge(&a, &b, AttributeMap::new()).unwrap();
        graph.create_edge(&b, &c, AttributeMap::new()).unwrap();
        graph.add_filter(Filter::comparison("age", ComparisonOp::Ge, 20i64));

        let filtered = graph.rebuild_filtered_graph();
        assert!(!filtered.has_edge(&a, &b));
        assert!(filtered.has_edge(&b, &c));
        assert_eq!(filtered.edge_count(), 1);
    }

    #[test]
    fn test_undirected_mirror_survives() {
        let mut graph = Graph::undirected();
        graph.add_vertex(aged("A", 10)).unwrap();
        graph.add_vertex(aged("B", 20)).unwrap();
        let a = VertexId::new("A");
        let b = VertexId::new("B");
        graph.create_edge(&a, &b, AttributeMap::new()).unwrap();

        let filtered = graph.rebuild_filtered_graph();
        assert!(!filtered.is_directed());
        assert!(filtered.has_edge(&a, &b));
        assert!(filtered.has_edge(&b, &a));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut pipeline = FilterPipeline::new();
        pipeline.push(Filter::search("a"));
        pipeline.push(Filter::search("b"));
        pipeline.push(Filter::search("c"));

        assert_eq!(pipeline.remove(1).unwrap(), Filter::search("b"));
        assert_eq!(pipeline.get(1), Some(&Filter::search("c")));
        assert!(pipeline.remove(2).is_err());
        assert_eq!(pipeline.len(), 2);
    }
}
