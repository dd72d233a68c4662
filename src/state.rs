//! Composition of the registry and buffer model into a single `WMState`
//! value, plus the debug-only invariant checker.

#[cfg(debug_assertions)]
use tracing::error;

use crate::buffer::Buffer;
use crate::registry::{AppRegistry, Pid, BUFFER_COUNT, UNASSIGNED};

/// `active_buffer` before any `SwitchBuffer` has ever succeeded.
pub const UNINITIALIZED: i8 = -1;

/// All mutable state the core carries. Owned by the surrounding process;
/// mutated only through the registry mutators and the action reducer.
pub struct WMState {
    pub registry: AppRegistry,
    pub buffers: [Buffer; BUFFER_COUNT],
    pub active_buffer: i8,
    pub is_passthrough_mode: bool,
}

impl Default for WMState {
    fn default() -> Self {
        WMState {
            registry: AppRegistry::new(),
            buffers: [Buffer::default(); BUFFER_COUNT],
            active_buffer: UNINITIALIZED,
            is_passthrough_mode: false,
        }
    }
}

impl WMState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the app to exist and have a non-negative `buffer_index`;
    /// any other case is a no-op.
    pub fn set_focused(&mut self, pid: Pid) {
        let Some(app) = self.registry.find_app(pid) else {
            return;
        };
        if app.buffer_index == UNASSIGNED {
            return;
        }
        self.buffers[app.buffer_index as usize].last_focused_pid = pid;
    }

    /// Reads `buffers[index].last_focused_pid`, repairing it to `0` in
    /// place if it no longer points at an app assigned to that buffer
    /// (invariant 5 is repaired lazily on read).
    pub fn last_focused(&mut self, index: usize) -> Pid {
        let pid = self.buffers[index].last_focused_pid;
        if pid == 0 {
            return 0;
        }
        match self.registry.find_app(pid) {
            Some(app) if app.buffer_index == index as i8 => pid,
            _ => {
                self.buffers[index].last_focused_pid = 0;
                0
            }
        }
    }

    /// Debug-only check of invariants 1-4 (invariant 5 is self-repairing,
    /// see [`WMState::last_focused`]). A violation indicates a programming
    /// bug in the core itself, not a caller error; release builds continue
    /// with undefined behavior.
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) {
        for (i, app) in self.registry.apps().iter().enumerate() {
            match self.registry.find_app_index(app.pid) {
                Some(found) if found == i => {}
                _ => {
                    error!(pid = app.pid, index = i, "hash index does not resolve to its app");
                }
            }
            if app.buffer_index < UNASSIGNED || app.buffer_index >= BUFFER_COUNT as i8 {
                error!(pid = app.pid, buffer_index = app.buffer_index, "buffer_index out of range");
            }
        }
        if self.active_buffer < UNINITIALIZED || self.active_buffer >= BUFFER_COUNT as i8 {
            error!(active_buffer = self.active_buffer, "active_buffer out of range");
        }
        debug_assert!(
            self.registry
                .apps()
                .iter()
                .enumerate()
                .all(|(i, app)| self.registry.find_app_index(app.pid) == Some(i)),
            "hash index / dense array invariant violated"
        );
    }
}
