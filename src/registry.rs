//! The application registry: a dense array of [`App`] plus an
//! open-addressed pid -> index hash table, giving O(1) amortized lookup with
//! zero allocation beyond the fixed-size backing arrays.

use tracing::debug;

/// Opaque OS process identifier. Non-zero and unique within a registry.
pub type Pid = i32;

pub const MAX_APPS: usize = 128;
pub const PID_MAP_SIZE: usize = 256;
pub const BUFFER_COUNT: usize = 5;
pub const BUNDLE_ID_MAX: usize = 128;

/// Sentinel for "not assigned to any buffer".
pub const UNASSIGNED: i8 = -1;

/// A tracked application.
#[derive(Debug, Clone)]
pub struct App {
    pub pid: Pid,
    pub bundle_identifier: String,
    pub buffer_index: i8,
    pub is_managed: bool,
    pub is_floating: bool,
}

impl Default for App {
    fn default() -> Self {
        App {
            pid: 0,
            bundle_identifier: String::new(),
            buffer_index: UNASSIGNED,
            is_managed: false,
            is_floating: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PidMapEntry {
    pid: Pid,
    app_index: u16,
}

/// Dense array of apps plus the pid->index hash index.
pub struct AppRegistry {
    apps: Box<[App; MAX_APPS]>,
    app_count: usize,
    pid_map: Box<[PidMapEntry; PID_MAP_SIZE]>,
}

impl Default for AppRegistry {
    fn default() -> Self {
        AppRegistry {
            apps: Box::new(std::array::from_fn(|_| App::default())),
            app_count: 0,
            pid_map: Box::new([PidMapEntry::default(); PID_MAP_SIZE]),
        }
    }
}

fn hash(pid: Pid) -> usize {
    (pid as i64).rem_euclid(PID_MAP_SIZE as i64) as usize
}

fn truncate_bundle_id(bundle_identifier: &str) -> String {
    if bundle_identifier.len() < BUNDLE_ID_MAX {
        return bundle_identifier.to_owned();
    }
    let mut end = BUNDLE_ID_MAX - 1;
    while !bundle_identifier.is_char_boundary(end) {
        end -= 1;
    }
    bundle_identifier[..end].to_owned()
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_count(&self) -> usize {
        self.app_count
    }

    pub fn apps(&self) -> &[App] {
        &self.apps[..self.app_count]
    }

    fn probe_find(&self, pid: Pid) -> Option<usize> {
        let start = hash(pid);
        for offset in 0..PID_MAP_SIZE {
            let slot = (start + offset) % PID_MAP_SIZE;
            let entry = &self.pid_map[slot];
            if entry.pid == 0 {
                return None;
            }
            if entry.pid == pid {
                return Some(slot);
            }
        }
        None
    }

    fn probe_insert(&mut self, pid: Pid, app_index: usize) {
        let start = hash(pid);
        for offset in 0..PID_MAP_SIZE {
            let slot = (start + offset) % PID_MAP_SIZE;
            let entry = &mut self.pid_map[slot];
            if entry.pid == 0 || entry.pid == pid {
                entry.pid = pid;
                entry.app_index = app_index as u16;
                return;
            }
        }
        // Unreachable: PID_MAP_SIZE > 2 * MAX_APPS guarantees room.
    }

    /// Clears the hash entry for `pid` and reinserts the contiguous run of
    /// entries that followed it, preserving probe-sequence reachability
    /// without tombstones.
    fn remove_from_index(&mut self, pid: Pid) {
        let Some(slot) = self.probe_find(pid) else {
            return;
        };
        self.pid_map[slot] = PidMapEntry::default();

        let mut displaced = Vec::new();
        let mut cursor = (slot + 1) % PID_MAP_SIZE;
        while self.pid_map[cursor].pid != 0 {
            displaced.push(self.pid_map[cursor]);
            self.pid_map[cursor] = PidMapEntry::default();
            cursor = (cursor + 1) % PID_MAP_SIZE;
        }
        for entry in displaced {
            self.probe_insert(entry.pid, entry.app_index as usize);
        }
    }

    /// Registers a new app, or returns the existing index if `pid` is
    /// already registered (idempotent; `bundle_identifier` is not
    /// overwritten on a repeat call). Fails on `pid == 0` or a full
    /// registry.
    pub fn register_app(&mut self, pid: Pid, bundle_identifier: &str) -> Option<usize> {
        if pid == 0 {
            return None;
        }
        if let Some(index) = self.find_app_index(pid) {
            return Some(index);
        }
        if self.app_count >= MAX_APPS {
            return None;
        }
        let index = self.app_count;
        self.apps[index] = App {
            pid,
            bundle_identifier: truncate_bundle_id(bundle_identifier),
            buffer_index: UNASSIGNED,
            is_managed: true,
            is_floating: false,
        };
        self.app_count += 1;
        self.probe_insert(pid, index);
        debug!(pid, index, "registered app");
        Some(index)
    }

    /// No-op if `pid` is absent. Otherwise removes it from the hash index
    /// and compacts the dense array by swapping the last slot into the
    /// freed one.
    pub fn unregister_app(&mut self, pid: Pid) {
        let Some(index) = self.find_app_index(pid) else {
            return;
        };
        self.remove_from_index(pid);

        let last = self.app_count - 1;
        if index != last {
            self.apps[index] = self.apps[last].clone();
            let moved_pid = self.apps[index].pid;
            if let Some(slot) = self.probe_find(moved_pid) {
                self.pid_map[slot].app_index = index as u16;
            }
        }
        self.apps[last] = App::default();
        self.app_count -= 1;
        debug!(pid, "unregistered app");
    }

    pub fn find_app_index(&self, pid: Pid) -> Option<usize> {
        self.probe_find(pid).map(|slot| self.pid_map[slot].app_index as usize)
    }

    pub fn find_app(&self, pid: Pid) -> Option<&App> {
        self.find_app_index(pid).map(|index| &self.apps[index])
    }

    fn find_app_mut(&mut self, pid: Pid) -> Option<&mut App> {
        let index = self.find_app_index(pid)?;
        Some(&mut self.apps[index])
    }

    /// Sets `buffer_index`. Invalid range (`< -1` or `>= BUFFER_COUNT`) or an
    /// absent pid is a no-op.
    pub fn assign_to_buffer(&mut self, pid: Pid, buffer_index: i32) {
        if buffer_index < -1 || buffer_index >= BUFFER_COUNT as i32 {
            return;
        }
        let Some(app) = self.find_app_mut(pid) else {
            return;
        };
        app.buffer_index = buffer_index as i8;
    }

    pub fn set_floating(&mut self, pid: Pid, flag: bool) {
        if let Some(app) = self.find_app_mut(pid) {
            app.is_floating = flag;
        }
    }

    /// Pids assigned to `buffer_index`, in registration order.
    pub fn buffer_pids(&self, buffer_index: usize) -> Vec<Pid> {
        self.apps()
            .iter()
            .filter(|app| app.buffer_index == buffer_index as i8)
            .map(|app| app.pid)
            .collect()
    }
}
