//! Workspace registry
//!
//! Each workspace owns its own [`Platform`]; exactly one is active at a time.
//! Ids are `{prefix}{n}` with `n` counting up from 1 and never reused.

use super::Platform;
use crate::config::PlatformConfig;
use crate::graph::Graph;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

pub type WorkspaceId = String;

/// Workspace errors
#[derive(Error, Debug, PartialEq)]
pub enum WorkspaceError {
    /// Workspace not found
    #[error("Workspace not found: {0}")]
    NotFound(WorkspaceId),

    /// Closing would leave no workspace
    #[error("Cannot close {0}: it is the last workspace")]
    LastWorkspace(WorkspaceId),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Debug)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub created_at: DateTime<Utc>,
    pub platform: Platform,
}

#[derive(Debug)]
pub struct WorkspaceManager {
    config: PlatformConfig,
    workspaces: IndexMap<WorkspaceId, Workspace>,
    active: Option<WorkspaceId>,
    counter: usize,
}

impl WorkspaceManager {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            workspaces: IndexMap::new(),
            active: None,
            counter: 1,
        }
    }

    /// Create a workspace around `graph` (or an empty configured graph) and
    /// make it the active one
    pub fn create_workspace(&mut self, graph: Option<Graph>) -> WorkspaceId {
        let id = format!("{}{}", self.config.workspace_prefix, self.counter);
        self.counter += 1;

        let platform = match graph {
            Some(graph) => Platform::new(graph),
            None => Platform::from_config(&self.config),
        };
        self.workspaces.insert(
            id.clone(),
            Workspace {
                id: id.clone(),
                created_at: Utc::now(),
                platform,
            },
        );
        self.active = Some(id.clone());
        info!("Created workspace: {}", id);
        id
    }

    pub fn switch_workspace(&mut self, id: &str) -> WorkspaceResult<()> {
        if !self.workspaces.contains_key(id) {
            return Err(WorkspaceError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        debug!("Switched to workspace: {}", id);
        Ok(())
    }

    /// Close a workspace. The last remaining one can not be closed; closing
    /// the active one activates the first remaining workspace.
    pub fn close_workspace(&mut self, id: &str) -> WorkspaceResult<Workspace> {
        if !self.workspaces.contains_key(id) {
            return Err(WorkspaceError::NotFound(id.to_string()));
        }
        if self.workspaces.len() == 1 {
            return Err(WorkspaceError::LastWorkspace(id.to_string()));
        }

        let closed = self
            .workspaces
            .shift_remove(id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))?;
        if self.active.as_deref() == Some(id) {
            self.active = self.workspaces.keys().next().cloned();
        }
        info!("Closed workspace: {}", id);
        Ok(closed)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Workspace> {
        self.active.as_ref().and_then(|id| self.workspaces.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Workspace> {
        let id = self.active.as_ref()?;
        self.workspaces.get_mut(id)
    }

    pub fn get(&self, id: &str) -> WorkspaceResult<&Workspace> {
        self.workspaces
            .get(id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> WorkspaceResult<&mut Workspace> {
        self.workspaces
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    /// Workspace ids in creation order
    pub fn list(&self) -> Vec<WorkspaceId> {
        self.workspaces.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new(PlatformConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, VertexId};

    #[test]
    fn test_create_activates() {
        let mut manager = WorkspaceManager::default();
        let first = manager.create_workspace(None);
        let second = manager.create_workspace(None);

        assert_eq!(first, "workspace1");
        assert_eq!(second, "workspace2");
        assert_eq!(manager.active_id(), Some("workspace2"));
        assert_eq!(manager.list(), vec![first, second]);
    }

    #[test]
    fn test_workspaces_are_isolated() {
        let mut manager = WorkspaceManager::default();
        let first = manager.create_workspace(None);
        manager.create_workspace(None);

        manager
            .active_mut()
            .unwrap()
            .platform
            .add_vertex(Node::new("only-in-second"));

        manager.switch_workspace(&first).unwrap();
        let active = manager.active().unwrap();
        assert!(!active.platform.graph().has_vertex(&VertexId::new("only-in-second")));
    }

    #[test]
    fn test_switch_unknown() {
        let mut manager = WorkspaceManager::default();
        manager.create_workspace(None);
        assert_eq!(
            manager.switch_workspace("nope"),
            Err(WorkspaceError::NotFound("nope".to_string()))
        );
        assert_eq!(manager.active_id(), Some("workspace1"));
    }

    #[test]
    fn test_close_rules() {
        let mut manager = WorkspaceManager::default();
        let first = manager.create_workspace(None);
        assert!(matches!(
            manager.close_workspace(&first),
            Err(WorkspaceError::LastWorkspace(_))
        ));

        let second = manager.create_workspace(None);
        let third = manager.create_workspace(None);
        manager.switch_workspace(&second).unwrap();

        let closed = manager.close_workspace(&second).unwrap();
        assert_eq!(closed.id, second);
        assert_eq!(manager.active_id(), Some(first.as_str()));

        // Closing an inactive workspace leaves the active one alone
        manager.close_workspace(&third).unwrap();
        assert_eq!(manager.active_id(), Some(first.as_str()));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_ids_not_reused() {
        let mut manager = WorkspaceManager::default();
        manager.create_workspace(None);
        let second = manager.create_workspace(None);
        manager.close_workspace(&second).unwrap();
        assert_eq!(manager.create_workspace(None), "workspace3");
    }

    #[test]
    fn test_configured_defaults() {
        let config = PlatformConfig {
            directed: true,
            workspace_prefix: "ws-".to_string(),
            ..PlatformConfig::default()
        };
        let mut manager = WorkspaceManager::new(config);
        let id = manager.create_workspace(None);
        assert_eq!(id, "ws-1");
        assert!(manager.get(&id).unwrap().platform.graph().is_directed());

        let explicit = manager.create_workspace(Some(Graph::undirected()));
        assert!(!manager.get(&explicit).unwrap().platform.graph().is_directed());
    }
}
