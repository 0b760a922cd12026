// Loading indicator coordination
// Feature: Unified HTTP Client (001-http-client)
//
// Tracks how many in-flight requests opted into the visible loading
// indicator. A request only becomes visible after a short grace period so
// fast responses never flash the indicator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Grace period before a tracked request surfaces the indicator
pub const LOADING_GRACE_MS: u64 = 300;

#[derive(Default)]
struct GuardState {
    /// The grace timer fired and `begin()` was called
    shown: bool,
    /// The guard was dropped; a late timer must not call `begin()`
    closed: bool,
}

/// Process-scoped loading counter. Owned by the `ApiClient` and injected
/// where needed rather than living as ambient module state.
pub struct LoadingCoordinator {
    visible: AtomicUsize,
    grace: Duration,
}

impl LoadingCoordinator {
    pub fn new() -> Self {
        Self::with_grace(Duration::from_millis(LOADING_GRACE_MS))
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self {
            visible: AtomicUsize::new(0),
            grace,
        }
    }

    /// Whether any request is currently surfacing the loading indicator
    pub fn is_loading(&self) -> bool {
        self.visible.load(Ordering::SeqCst) > 0
    }

    pub fn begin(&self) {
        self.visible.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement, floored at zero
    pub fn end(&self) {
        let _ = self
            .visible
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            });
    }

    /// Track one request. The returned guard arms the grace timer; dropping
    /// it cancels the timer and, if the indicator was shown, ends it. Drop
    /// runs on every settlement path, so the counter can never leak.
    pub fn track(self: &Arc<Self>) -> LoadingGuard {
        let state = Arc::new(Mutex::new(GuardState::default()));
        let coordinator = Arc::clone(self);
        let task_state = Arc::clone(&state);
        let grace = self.grace;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if let Ok(mut guard_state) = task_state.lock() {
                if !guard_state.closed {
                    coordinator.begin();
                    guard_state.shown = true;
                }
            }
        });

        LoadingGuard {
            coordinator: Arc::clone(self),
            state,
            timer,
        }
    }
}

impl Default for LoadingCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped handle for one tracked request
pub struct LoadingGuard {
    coordinator: Arc<LoadingCoordinator>,
    state: Arc<Mutex<GuardState>>,
    timer: JoinHandle<()>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.timer.abort();
        if let Ok(mut guard_state) = self.state.lock() {
            guard_state.closed = true;
            if guard_state.shown {
                self.coordinator.end();
            }
        }
    }
}
