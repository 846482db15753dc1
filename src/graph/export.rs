//! Community document export
//!
//! A single-schema hierarchical document consumed by an external saver: every
//! vertex whose `type` attribute is the text `"member"` becomes a record under
//! `community.members`, carrying its attributes (without `id`) plus a
//! `friends` array built from the attribute maps of its outgoing-edge targets.

use super::node::{attributes_to_json, Node};
use super::store::Graph;
use serde::Serialize;
use serde_json::{Map, Value};

const MEMBER_TYPE: &str = "member";

#[derive(Debug, Clone, Serialize)]
pub struct CommunityDocument {
    pub community: Community,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Community {
    pub members: Vec<Map<String, Value>>,
}

impl Graph {
    /// Build the community document from the base vertices and edges
    pub fn to_community_document(&self) -> CommunityDocument {
        let members = self
            .vertices()
            .filter(|node| is_member(node))
            .map(|node| {
                let mut record = attributes_to_json(node.attributes());
                let friends: Vec<Value> = self
                    .connected_nodes(node.id())
                    .0
                    .into_iter()
                    .map(|friend| Value::Object(attributes_to_json(friend.attributes())))
                    .collect();
                record.insert("friends".to_string(), Value::Array(friends));
                record
            })
            .collect();

        CommunityDocument {
            community: Community { members },
        }
    }

    /// Pretty-printed (2-space indented) community document
    pub fn to_community_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_community_document())
    }
}

fn is_member(node: &Node) -> bool {
    node.get_attribute("type")
        .and_then(|value| value.as_text())
        .is_some_and(|kind| kind == MEMBER_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttributeMap, VertexId};

    fn member(id: &str, name: &str) -> Node {
        let mut node = Node::new(id);
        node.set_attribute("type", "member").unwrap();
        node.set_attribute("name", name).unwrap();
        node
    }

    #[test]
    fn test_members_with_friends() {
        let mut graph = Graph::directed();
        graph.add_vertex(member("1", "Ana")).unwrap();
        graph.add_vertex(member("2", "Bo")).unwrap();
        let mut club = Node::new("3");
        club.set_attribute("type", "club").unwrap();
        graph.add_vertex(club).unwrap();
        graph
            .create_edge(&VertexId::new("1"), &VertexId::new("2"), AttributeMap::new())
            .unwrap();

        let document = serde_json::to_value(graph.to_community_document()).unwrap();
        assert_eq!(
            document,
            serde_json::json!({
                "community": {
                    "members": [
                        {"type": "member", "name": "Ana", "friends": [{"type": "member", "name": "Bo"}]},
                        {"type": "member", "name": "Bo", "friends": []}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_pretty_layout() {
        let mut graph = Graph::directed();
        graph.add_vertex(member("1", "Ana")).unwrap();
        let expected = "{\n  \"community\": {\n    \"members\": [\n      {\n        \"type\": \"member\",\n        \"name\": \"Ana\",\n        \"friends\": []\n      }\n    ]\n  }\n}";
        assert_eq!(graph.to_community_json().unwrap(), expected);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::undirected();
        assert!(graph.to_community_document().community.members.is_empty());
    }
}
