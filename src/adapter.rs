//! The typed seam for the platform window-adapter: the OS-level integration
//! that actually owns windows, hides/shows/raises them, and applies frames.
//! No implementation ships here — that lives outside this crate — but the
//! contract is still part of it: a core with no typed boundary for its own
//! external collaborator would be an incomplete crate.

use crate::geometry::Rect;
use crate::registry::Pid;

/// Operations the adapter that actually owns OS windows must provide.
/// `Actions::process`/`process_with_layout` never call these directly —
/// they return an [`crate::actions::Effects`] value instead — but the
/// adapter applies that value through exactly this surface.
pub trait PlatformAdapter {
    /// Hides the window(s) belonging to `pid`.
    fn hide(&mut self, pid: Pid);

    /// Shows the window(s) belonging to `pid`.
    fn show(&mut self, pid: Pid);

    /// Raises `pid` to the front of the stacking order. Called in the
    /// order effects list them; reordering is not permitted.
    fn raise(&mut self, pid: Pid);

    /// Applies a new frame to `pid`'s window.
    fn apply_frame(&mut self, pid: Pid, frame: Rect);

    /// The pid of the OS-level focused window, if any.
    fn focused_pid(&self) -> Option<Pid>;
}
