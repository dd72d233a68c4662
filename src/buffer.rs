//! The buffer model: per-workspace focus tracking. Buffers carry no
//! membership list of their own — membership is always derived by scanning
//! the registry, so there is a single source of truth for assignment.

use crate::registry::Pid;

/// A single workspace's focus state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Buffer {
    pub last_focused_pid: Pid,
}
