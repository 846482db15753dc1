//! Vertex implementation
//!
//! A vertex carries an immutable id plus an attribute map. The id is exposed
//! under the reserved `id` key when attributes are serialized, but can never be
//! written through the attribute API.

use super::property::{AttributeMap, AttributeValue};
use super::store::{GraphError, GraphResult};
use super::types::VertexId;
use serde::Serialize;
use serde_json::{Map, Value};

/// Reserved attribute key holding the vertex id
pub const ID_KEY: &str = "id";

/// A vertex in the attributed graph
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Attributes associated with this vertex (never contains `id`)
    attributes: AttributeMap,
}

impl Node {
    /// Create a vertex with no attributes
    pub fn new(id: impl Into<VertexId>) -> Self {
        Node {
            id: id.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Create a vertex from an attribute map, validating every key
    pub fn with_attributes(id: impl Into<VertexId>, attributes: AttributeMap) -> GraphResult<Self> {
        let mut node = Node::new(id);
        for (key, value) in attributes {
            node.set_attribute(key, value)?;
        }
        Ok(node)
    }

    /// Create a vertex from an untyped JSON object.
    ///
    /// An `id` entry in the object is ignored in favour of the explicit id;
    /// values of unsupported kinds fail the whole conversion.
    pub fn from_json(id: impl Into<VertexId>, object: &Map<String, Value>) -> GraphResult<Self> {
        let mut node = Node::new(id);
        for (key, value) in object {
            if key == ID_KEY {
                continue;
            }
            let value = AttributeValue::from_json(key, value)?;
            node.attributes.insert(key.clone(), value);
        }
        Ok(node)
    }

    pub fn id(&self) -> &VertexId {
        &self.id
    }

    /// Set an attribute value, returning the previous value
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<Option<AttributeValue>> {
        let key = key.into();
        if key == ID_KEY {
            return Err(GraphError::ReservedAttribute(key));
        }
        Ok(self.attributes.insert(key, value.into()))
    }

    /// Remove an attribute; `Ok(false)` if it was not present
    pub fn remove_attribute(&mut self, key: &str) -> GraphResult<bool> {
        if key == ID_KEY {
            return Err(GraphError::ReservedAttribute(key.to_string()));
        }
        Ok(self.attributes.shift_remove(key).is_some())
    }

    /// Get an attribute value
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Attributes without the reserved id
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Drop every attribute (the id is untouched)
    pub(crate) fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    /// Attributes as a JSON object with `id` first
    pub fn attributes_with_id(&self) -> Map<String, Value> {
        let mut object = Map::with_capacity(self.attributes.len() + 1);
        object.insert(ID_KEY.to_string(), Value::String(self.id.as_str().to_string()));
        object.extend(attributes_to_json(&self.attributes));
        object
    }
}

/// Serialize an attribute map into an ordered JSON object
pub fn attributes_to_json(attributes: &AttributeMap) -> Map<String, Value> {
    attributes
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::to_value(v).unwrap_or(Value::Null)))
        .collect()
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.attributes == other.attributes
    }
}
