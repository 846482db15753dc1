use graph_explorer::{AttributeMap, AttributeValue, ErrorCategory, Graph, GraphError, Node, VertexId};

fn vid(s: &str) -> VertexId {
    VertexId::new(s)
}

#[test]
fn test_duplicate_add_leaves_graph_unchanged() {
    let mut graph = Graph::undirected();
    let mut first = Node::new("A");
    first.set_attribute("color", "red").unwrap();
    graph.add_vertex(first).unwrap();

    let mut second = Node::new("A");
    second.set_attribute("color", "blue").unwrap();
    let err = graph.add_vertex(second).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);

    assert_eq!(graph.vertex_count(), 1);
    let stored = graph.get_vertex(&vid("A")).unwrap();
    assert_eq!(stored.get_attribute("color"), Some(&AttributeValue::from("red")));
}

#[test]
fn test_edit_vertex_replaces_attributes() {
    let mut graph = Graph::undirected();
    let mut node = Node::new("A");
    node.set_attribute("color", "red").unwrap();
    graph.add_vertex(node).unwrap();

    let mut edited = Node::new("A");
    edited.set_attribute("size", 3i64).unwrap();
    graph.edit_vertex(&edited).unwrap();

    let stored = graph.get_vertex(&vid("A")).unwrap();
    assert_eq!(
        serde_json::Value::Object(stored.attributes_with_id()),
        serde_json::json!({"id": "A", "size": 3})
    );
}

#[test]
fn test_delete_vertex_removes_incident_edges() {
    for directed in [true, false] {
        let mut graph = Graph::new(directed);
        for id in ["A", "B", "C"] {
            graph.add_vertex(Node::new(id)).unwrap();
        }
        graph.create_edge(&vid("A"), &vid("B"), AttributeMap::new()).unwrap();
        graph.create_edge(&vid("B"), &vid("C"), AttributeMap::new()).unwrap();
        graph.create_edge(&vid("C"), &vid("A"), AttributeMap::new()).unwrap();

        graph.delete_vertex(&vid("B")).unwrap();
        assert!(graph
            .edges()
            .iter()
            .all(|e| e.source != vid("B") && e.target != vid("B")));
        assert!(graph.has_edge(&vid("C"), &vid("A")));
    }
}

#[test]
fn test_undirected_edge_visible_from_both_ends() {
    let mut graph = Graph::undirected();
    graph.add_vertex(Node::new("a")).unwrap();
    graph.add_vertex(Node::new("b")).unwrap();
    let mut attrs = AttributeMap::new();
    attrs.insert("w".to_string(), AttributeValue::Integer(1));
    graph.create_edge(&vid("a"), &vid("b"), attrs.clone()).unwrap();

    let (outgoing, _) = graph.connected_nodes(&vid("b"));
    assert!(outgoing.iter().any(|n| n.id() == &vid("a")));
    assert_eq!(graph.edge(&vid("a"), &vid("b")), Some(&attrs));
    assert_eq!(graph.edge(&vid("b"), &vid("a")), Some(&attrs));
}

#[test]
fn test_edge_errors_are_not_found() {
    let mut graph = Graph::directed();
    graph.add_vertex(Node::new("A")).unwrap();
    let err = graph
        .create_edge(&vid("A"), &vid("ghost"), AttributeMap::new())
        .unwrap_err();
    assert_eq!(err, GraphError::InvalidEdgeTarget(vid("ghost")));
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(
        graph.delete_edge(&vid("A"), &vid("ghost")).unwrap_err().category(),
        ErrorCategory::NotFound
    );
}

#[test]
fn test_community_export() {
    let mut graph = Graph::directed();
    let mut ann = Node::new("ann");
    ann.set_attribute("type", "member").unwrap();
    ann.set_attribute("name", "Ann").unwrap();
    let mut ben = Node::new("ben");
    ben.set_attribute("type", "member").unwrap();
    ben.set_attribute("name", "Ben").unwrap();
    let mut shop = Node::new("shop");
    shop.set_attribute("type", "place").unwrap();
    graph.add_vertex(ann).unwrap();
    graph.add_vertex(ben).unwrap();
    graph.add_vertex(shop).unwrap();
    graph.create_edge(&vid("ann"), &vid("ben"), AttributeMap::new()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&graph.to_community_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "community": {
                "members": [
                    {"type": "member", "name": "Ann", "friends": [{"type": "member", "name": "Ben"}]},
                    {"type": "member", "name": "Ben", "friends": []}
                ]
            }
        })
    );
}
