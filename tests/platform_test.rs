use graph_explorer::{
    AttributeMap, ComparisonOp, Filter, Node, Platform, UpdateListener, VertexId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn vid(s: &str) -> VertexId {
    VertexId::new(s)
}

fn person(id: &str, name: &str, age: i64) -> Node {
    let mut node = Node::new(id);
    node.set_attribute("name", name).unwrap();
    node.set_attribute("age", age).unwrap();
    node
}

#[test]
fn test_listeners_notified_per_mutation() {
    let mut platform = Platform::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let listener: Arc<dyn UpdateListener> = Arc::new(move || -> anyhow::Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    assert!(platform.add_listener(Arc::clone(&listener)));
    assert!(!platform.add_listener(Arc::clone(&listener)));

    platform.add_vertex(person("A", "Ann", 10));
    platform.add_vertex(person("B", "Ben", 20));
    platform.create_edge(&vid("A"), &vid("B"), AttributeMap::new());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Failed mutations never notify
    platform.add_vertex(person("A", "Ann", 10));
    platform.create_edge(&vid("A"), &vid("ghost"), AttributeMap::new());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert!(platform.remove_listener(&listener));
    platform.add_vertex(person("C", "Cy", 30));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_filter_pipeline_through_platform() {
    let mut platform = Platform::default();
    platform.add_vertex(person("A", "phone", 10));
    platform.add_vertex(person("B", "tv", 20));
    platform.add_vertex(person("C", "radio", 30));
    platform.create_edge(&vid("A"), &vid("B"), AttributeMap::new());

    platform.add_filter(Filter::search("pho"));
    let data = platform.get_graph_data();
    assert_eq!(data.nodes.len(), 1);
    assert_eq!(data.nodes[0]["id"], "A");
    assert!(data.links.is_empty());

    platform.clear_filters();
    platform.add_filter(Filter::comparison("age", ComparisonOp::Gt, 15i64));
    platform.add_filter(Filter::comparison("age", ComparisonOp::Lt, 25i64));
    let data = platform.get_graph_data();
    assert_eq!(data.nodes.len(), 1);
    assert_eq!(data.nodes[0]["id"], "B");

    let filters = serde_json::to_value(platform.list_filters()).unwrap();
    assert_eq!(
        filters,
        serde_json::json!([
            {"attribute": "age", "type": "gt", "value": 15},
            {"attribute": "age", "type": "lt", "value": 25}
        ])
    );
}

#[test]
fn test_forest_is_built_over_filtered_graph() {
    let mut platform = Platform::default();
    platform.add_vertex(person("A", "Ann", 10));
    platform.add_vertex(person("B", "Ben", 20));
    platform.create_edge(&vid("A"), &vid("B"), AttributeMap::new());
    assert_eq!(platform.get_tree_view().treeview.len(), 1);

    platform.add_filter(Filter::comparison("age", ComparisonOp::Ge, 20i64));
    let view = platform.get_tree_view();
    assert_eq!(view.treeview.len(), 1);
    assert_eq!(view.treeview[0].node_id, vid("B"));
    assert!(!view.treeview[0].is_expandable);
}

#[test]
fn test_tree_view_json_shape() {
    let mut platform = Platform::default();
    platform.add_vertex(person("A", "Ann", 10));
    platform.add_vertex(person("B", "Ben", 20));
    platform.create_edge(&vid("A"), &vid("B"), AttributeMap::new());
    let root = platform.forest().find_tree_id(&[vid("A")]).unwrap();
    platform.expand_tree(root);
    platform.select_node(&vid("B"));

    let json = serde_json::to_value(platform.get_tree_view()).unwrap();
    assert_eq!(json["selected_id"], "B");
    let root = &json["treeview"][0];
    assert_eq!(root["tree_id"], root_tree_id(&platform));
    assert_eq!(root["attributes"], serde_json::json!({"id": "A", "name": "Ann", "age": 10}));
    assert_eq!(root["is_expanded"], true);
    assert_eq!(root["children"][0]["node_id"], "B");
    assert_eq!(root["children"][0]["children"], serde_json::json!([]));
}

fn root_tree_id(platform: &Platform) -> String {
    platform
        .forest()
        .find_tree_id(&[vid("A")])
        .map(|id| id.to_string())
        .unwrap_or_default()
}

#[test]
fn test_select_absent_vertex() {
    let mut platform = Platform::default();
    platform.add_vertex(person("A", "Ann", 10));
    platform.select_node(&vid("A"));

    assert!(platform.select_node(&vid("ghost")).is_none());
    assert_eq!(platform.get_tree_view().selected_id, Some(vid("A")));
}
