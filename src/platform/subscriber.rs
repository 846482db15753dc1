//! Snapshot queues for streaming consumers
//!
//! Every successful mutation pushes a fully serialized tree view into one
//! unbounded queue per subscriber. Consumers drain at their own pace; a
//! subscriber whose receiver was dropped is removed on the next publish.

use crate::forest::TreeRecord;
use crate::graph::VertexId;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

pub type SubscriberId = u64;

/// Selection plus forest, as returned by `get_tree_view`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeViewPayload {
    pub selected_id: Option<VertexId>,
    pub treeview: Vec<TreeRecord>,
}

#[derive(Debug, Default)]
pub struct SubscriberHub {
    next_id: AtomicU64,
    queues: Mutex<Vec<(SubscriberId, UnboundedSender<Arc<TreeViewPayload>>)>>,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> (SubscriberId, UnboundedReceiver<Arc<TreeViewPayload>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, tx));
        debug!("Subscriber {} attached", id);
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let before = queues.len();
        queues.retain(|(sid, _)| *sid != id);
        queues.len() != before
    }

    pub fn len(&self) -> usize {
        self.queues.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueue `payload` for every live subscriber. Never blocks.
    pub fn publish(&self, payload: TreeViewPayload) -> usize {
        let payload = Arc::new(payload);
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues.retain(|(id, tx)| match tx.send(Arc::clone(&payload)) {
            Ok(()) => true,
            Err(_) => {
                warn!("Subscriber {} disconnected, dropping its queue", id);
                false
            }
        });
        queues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(selected: Option<&str>) -> TreeViewPayload {
        TreeViewPayload {
            selected_id: selected.map(VertexId::new),
            treeview: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let hub = SubscriberHub::new();
        let (_, mut first) = hub.subscribe();
        let (_, mut second) = hub.subscribe();

        assert_eq!(hub.publish(payload(Some("A"))), 2);
        assert_eq!(first.recv().await.unwrap().selected_id, Some(VertexId::new("A")));
        assert_eq!(second.recv().await.unwrap().selected_id, Some(VertexId::new("A")));
    }

    #[test]
    fn test_slow_subscriber_queues_up() {
        let hub = SubscriberHub::new();
        let (_, mut rx) = hub.subscribe();
        for _ in 0..100 {
            hub.publish(payload(None));
        }
        let mut drained = 0;
        while rx.try_recv().is_ok() {
            drained += 1;
        }
        assert_eq!(drained, 100);
    }

    #[test]
    fn test_disconnected_subscriber_dropped() {
        let hub = SubscriberHub::new();
        let (_, rx) = hub.subscribe();
        let (id, _keep) = hub.subscribe();
        drop(rx);

        assert_eq!(hub.publish(payload(None)), 1);
        assert_eq!(hub.len(), 1);
        assert!(hub.unsubscribe(id));
        assert!(hub.is_empty());
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_value(payload(None)).unwrap();
        assert_eq!(json, serde_json::json!({"selected_id": null, "treeview": []}));
    }
}
