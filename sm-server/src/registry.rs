//! ProcessRegistry: live instances by name. Owned by the event loop alone.

use crate::{InstanceHandle, Result as SupervisorResult, SupervisorError};

use std::collections::HashMap;
use std::sync::Arc;

use sm_core::Spec;

/// Point-in-time view of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSnapshot {
    pub name: String,
    pub id: u64,
    pub pid: Option<u32>,
    pub spec: Arc<Spec>,
}

#[derive(Debug, Default)]
pub struct ProcessRegistry {
    instances: HashMap<String, InstanceHandle>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `handle` under `name`. An existing entry is never overwritten.
    #[track_caller]
    pub fn register(&mut self, name: &str, handle: InstanceHandle) -> SupervisorResult<()> {
        if self.instances.contains_key(name) {
            return Err(SupervisorError::already_running(name));
        }
        self.instances.insert(name.to_string(), handle);
        Ok(())
    }

    #[track_caller]
    pub fn unregister(&mut self, name: &str) -> SupervisorResult<InstanceHandle> {
        self.instances
            .remove(name)
            .ok_or_else(|| SupervisorError::not_running(name))
    }

    pub fn get(&self, name: &str) -> Option<&InstanceHandle> {
        self.instances.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InstanceHandle> {
        self.instances.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Whether `name` is registered with this exact spawn id.
    pub fn is_current(&self, name: &str, id: u64) -> bool {
        self.get(name).is_some_and(|h| h.id() == id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Entries sorted by name.
    pub fn snapshot(&self) -> Vec<InstanceSnapshot> {
        let mut snapshot: Vec<InstanceSnapshot> = self
            .instances
            .iter()
            .map(|(name, handle)| InstanceSnapshot {
                name: name.clone(),
                id: handle.id(),
                pid: handle.pid(),
                spec: Arc::clone(handle.spec()),
            })
            .collect();
        snapshot.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
    }

    /// Remove every entry, sorted by name.
    pub fn drain(&mut self) -> Vec<(String, InstanceHandle)> {
        let mut drained: Vec<_> = self.instances.drain().collect();
        drained.sort_by(|a, b| a.0.cmp(&b.0));
        drained
    }
}
