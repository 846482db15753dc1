//! Update listeners
//!
//! Listeners are told that state changed, not what changed; they pull fresh
//! state from the platform themselves. Dispatch isolates failures: an error or
//! a panic in one listener is logged and the remaining listeners still run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use tracing::{error, warn};

pub trait UpdateListener: Send + Sync {
    fn on_graph_updated(&self) -> anyhow::Result<()>;
}

impl<F> UpdateListener for F
where
    F: Fn() -> anyhow::Result<()> + Send + Sync,
{
    fn on_graph_updated(&self) -> anyhow::Result<()> {
        self()
    }
}

/// Ordered listener list, safe to mutate while a notification is running
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn UpdateListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the same `Arc` is never added twice
    pub fn attach(&self, listener: Arc<dyn UpdateListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    pub fn detach(&self, listener: &Arc<dyn UpdateListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener in registration order; returns how many succeeded
    pub fn notify(&self) -> usize {
        let snapshot: Vec<Arc<dyn UpdateListener>> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        let mut delivered = 0;
        for (position, listener) in snapshot.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener.on_graph_updated())) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => warn!("Update listener #{} failed: {:#}", position, err),
                Err(_) => error!("Update listener #{} panicked", position),
            }
        }
        delivered
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Arc<dyn UpdateListener> {
        let log = Arc::clone(log);
        Arc::new(move || -> anyhow::Result<()> {
            log.lock().unwrap().push(name);
            Ok(())
        })
    }

    #[test]
    fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.attach(recorder(&log, "first"));
        registry.attach(recorder(&log, "second"));

        assert_eq!(registry.notify(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_same_listener_not_added_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        let listener = recorder(&log, "only");
        assert!(registry.attach(Arc::clone(&listener)));
        assert!(!registry.attach(Arc::clone(&listener)));
        assert_eq!(registry.len(), 1);

        assert!(registry.detach(&listener));
        assert!(!registry.detach(&listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failures_are_isolated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.attach(Arc::new(|| -> anyhow::Result<()> { anyhow::bail!("boom") }));
        registry.attach(Arc::new(|| -> anyhow::Result<()> { panic!("listener panic") }));
        registry.attach(recorder(&log, "survivor"));

        assert_eq!(registry.notify(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
    }

    #[test]
    fn test_detach_during_notify() {
        let registry = Arc::new(ListenerRegistry::new());
        let slot: Arc<Mutex<Option<Arc<dyn UpdateListener>>>> = Arc::new(Mutex::new(None));

        let reg = Arc::clone(&registry);
        let me = Arc::clone(&slot);
        let listener: Arc<dyn UpdateListener> = Arc::new(move || -> anyhow::Result<()> {
            if let Some(this) = me.lock().unwrap().take() {
                reg.detach(&this);
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(Arc::clone(&listener));
        registry.attach(listener);

        assert_eq!(registry.notify(), 1);
        assert!(registry.is_empty());
    }
}
