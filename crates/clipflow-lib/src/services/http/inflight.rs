// In-flight request registry and cancellation handles
// Feature: Unified HTTP Client (001-http-client)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use uuid::Uuid;

/// Cancellation handle for one pending call.
///
/// Cloneable so the caller can keep a copy while the dispatcher awaits the
/// transport. The signal is sticky: cancelling before the dispatcher starts
/// listening still aborts the call.
#[derive(Clone)]
pub struct RequestHandle {
    id: Uuid,
    cancel: Arc<Notify>,
}

impl RequestHandle {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancel: Arc::new(Notify::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolves once the handle is cancelled
    pub(crate) async fn cancelled(&self) {
        self.cancel.notified().await;
    }

    fn trigger(&self) {
        self.cancel.notify_one();
    }
}

impl Default for RequestHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandle").field("id", &self.id).finish()
    }
}

/// Registry of pending calls, keyed by handle identity. An entry is created
/// when a call is issued and removed when it settles; no entry outlives its
/// call.
#[derive(Default)]
pub struct InflightRegistry {
    entries: Mutex<HashMap<Uuid, RequestHandle>>,
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending call. The returned guard deregisters on drop,
    /// which the dispatcher relies on for every settlement path.
    pub fn register(self: &Arc<Self>, handle: &RequestHandle) -> InflightGuard {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(handle.id(), handle.clone());
        }
        InflightGuard {
            registry: Arc::clone(self),
            id: handle.id(),
        }
    }

    /// Cancel a pending call. Returns `true` if the call was still pending;
    /// cancelling an already-settled call is a no-op.
    pub fn cancel(&self, handle: &RequestHandle) -> bool {
        let removed = self
            .entries
            .lock()
            .map(|mut entries| entries.remove(&handle.id()))
            .unwrap_or(None);
        match removed {
            Some(pending) => {
                pending.trigger();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: &RequestHandle) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(&handle.id()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: Uuid) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(&id);
        }
    }
}

/// Scoped registration of one pending call
pub struct InflightGuard {
    registry: Arc<InflightRegistry>,
    id: Uuid,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_removed_when_guard_drops() {
        let registry = Arc::new(InflightRegistry::new());
        let handle = RequestHandle::new();
        let guard = registry.register(&handle);
        assert!(registry.contains(&handle));
        assert_eq!(registry.len(), 1);
        drop(guard);
        assert!(!registry.contains(&handle));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cancel_pending_removes_entry() {
        let registry = Arc::new(InflightRegistry::new());
        let handle = RequestHandle::new();
        let _guard = registry.register(&handle);
        assert!(registry.cancel(&handle));
        assert!(!registry.contains(&handle));
    }

    #[test]
    fn test_cancel_settled_is_noop() {
        let registry = Arc::new(InflightRegistry::new());
        let handle = RequestHandle::new();
        {
            let _guard = registry.register(&handle);
        }
        assert!(!registry.cancel(&handle));
        assert!(!registry.cancel(&handle));
    }

    #[tokio::test]
    async fn test_cancel_signal_is_sticky() {
        let registry = Arc::new(InflightRegistry::new());
        let handle = RequestHandle::new();
        let _guard = registry.register(&handle);
        // Trigger before anyone is listening
        registry.cancel(&handle);
        // The stored permit must still resolve a later listener
        handle.cancelled().await;
    }
}
