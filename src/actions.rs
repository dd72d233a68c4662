//! Action taxonomy, the effects bundle, and the reducer.
//!
//! The base reducer, [`process`], fully implements `SwitchBuffer`,
//! `MoveBuffer`, and `TogglePassthrough`, and is total and side-effect-free
//! for the rest: it has neither a screen rect nor the config, so it cannot
//! compute a snap frame or a dwindle pass. [`process_with_layout`] is the
//! completion of those remaining variants, layered directly on top.

use tracing::debug;

use crate::config::WMConfig;
use crate::geometry::Rect;
use crate::layout;
use crate::registry::{Pid, BUFFER_COUNT};
use crate::state::WMState;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchBuffer(usize),
    /// `target_pid` is a sentinel (`0`) when sourced from a static binding;
    /// the caller fills in the real pid (typically the active buffer's
    /// focused app) before dispatch.
    MoveBuffer(Pid, usize),
    SnapLeft,
    SnapRight,
    SnapTop,
    SnapBottom,
    SnapMaximize,
    SnapCenter,
    SnapTopLeft,
    SnapTopRight,
    SnapBottomLeft,
    SnapBottomRight,
    Retile,
    TogglePassthrough,
    ToggleFloating,
    LaunchBundle(String),
    None,
}

impl Action {
    fn is_snap(&self) -> bool {
        matches!(
            self,
            Action::SnapLeft
                | Action::SnapRight
                | Action::SnapTop
                | Action::SnapBottom
                | Action::SnapMaximize
                | Action::SnapCenter
                | Action::SnapTopLeft
                | Action::SnapTopRight
                | Action::SnapBottomLeft
                | Action::SnapBottomRight
        )
    }
}

/// The declarative outcome of processing one action. The adapter applies
/// these fields in order: hide, show, raise, frame_changes, launch.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub to_hide: Vec<Pid>,
    pub to_show: Vec<Pid>,
    pub to_raise: Vec<Pid>,
    pub frame_changes: Vec<(Pid, Rect)>,
    pub layout_buffer: Option<usize>,
    pub launch_bundle: Option<String>,
}

impl Effects {
    pub fn needs_layout(&self) -> bool {
        self.layout_buffer.is_some()
    }

    /// Appends `pid` to `to_raise` only if it is not already present.
    fn raise_unique(&mut self, pid: Pid) {
        if !self.to_raise.contains(&pid) {
            self.to_raise.push(pid);
        }
    }
}

/// The base reducer: `SwitchBuffer`, `MoveBuffer`, and `TogglePassthrough`
/// in full; everything else is a deterministic no-op (`false`, empty
/// effects) pending geometry — see [`process_with_layout`].
pub fn process(state: &mut WMState, action: &Action) -> (bool, Effects) {
    debug!(?action, "processing action");
    match action {
        Action::SwitchBuffer(target) => switch_buffer(state, *target),
        Action::MoveBuffer(pid, target) => move_buffer(state, *pid, *target),
        Action::TogglePassthrough => {
            state.is_passthrough_mode = !state.is_passthrough_mode;
            (true, Effects::default())
        }
        _ => (false, Effects::default()),
    }
}

fn switch_buffer(state: &mut WMState, target: usize) -> (bool, Effects) {
    if target >= BUFFER_COUNT {
        return (false, Effects::default());
    }
    if state.active_buffer == target as i8 {
        return (false, Effects::default());
    }

    let mut effects = Effects::default();
    let old = state.active_buffer;

    effects.to_show = state.registry.buffer_pids(target);
    if old >= 0 {
        effects.to_hide = state.registry.buffer_pids(old as usize);
    }

    let raised = match state.last_focused(target) {
        0 => effects.to_show.first().copied(),
        pid => Some(pid),
    };
    if let Some(pid) = raised {
        effects.to_raise.push(pid);
    }

    effects.layout_buffer = Some(target);
    state.active_buffer = target as i8;
    (true, effects)
}

fn move_buffer(state: &mut WMState, pid: Pid, target: usize) -> (bool, Effects) {
    if target >= BUFFER_COUNT {
        return (false, Effects::default());
    }
    let Some(app) = state.registry.find_app(pid) else {
        return (false, Effects::default());
    };
    if app.buffer_index == target as i8 {
        return (false, Effects::default());
    }

    state.registry.assign_to_buffer(pid, target as i32);

    if state.active_buffer == target as i8 {
        let mut effects = Effects::default();
        effects.to_show.push(pid);
        effects.raise_unique(pid);
        effects.layout_buffer = Some(target);
        return (true, effects);
    }

    let (success, mut effects) = switch_buffer(state, target);
    if success {
        effects.raise_unique(pid);
    }
    (success, effects)
}

/// Completes the variants the base reducer leaves as no-ops: the ten
/// `Snap*` variants, `ToggleFloating`, `Retile`, and `LaunchBundle`. Needs
/// the config and the active screen rect, neither of which `WMState` owns.
pub fn process_with_layout(state: &mut WMState, config: &WMConfig, screen: Rect, action: &Action) -> (bool, Effects) {
    if action.is_snap() {
        return snap(state, config, screen, action);
    }
    match action {
        Action::ToggleFloating => toggle_floating(state, config, screen),
        Action::Retile => retile(state, config, screen),
        Action::LaunchBundle(bundle_id) => {
            let mut effects = Effects::default();
            effects.launch_bundle = Some(bundle_id.clone());
            (true, effects)
        }
        Action::None => (false, Effects::default()),
        _ => process(state, action),
    }
}

fn active_focused_pid(state: &mut WMState) -> Option<Pid> {
    if state.active_buffer < 0 {
        return None;
    }
    match state.last_focused(state.active_buffer as usize) {
        0 => None,
        pid => Some(pid),
    }
}

fn snap(state: &mut WMState, config: &WMConfig, screen: Rect, action: &Action) -> (bool, Effects) {
    let Some(pid) = active_focused_pid(state) else {
        return (false, Effects::default());
    };
    state.registry.set_floating(pid, true);
    let rect = layout::compute_snap(action, screen, config);
    let mut effects = Effects::default();
    effects.frame_changes.push((pid, rect));
    (true, effects)
}

fn toggle_floating(state: &mut WMState, config: &WMConfig, screen: Rect) -> (bool, Effects) {
    let Some(pid) = active_focused_pid(state) else {
        return (false, Effects::default());
    };
    let Some(app) = state.registry.find_app(pid) else {
        return (false, Effects::default());
    };
    let becoming_floating = !app.is_floating;
    state.registry.set_floating(pid, becoming_floating);

    let mut effects = Effects::default();
    if becoming_floating {
        let rect = layout::compute_snap(&Action::SnapCenter, screen, config);
        effects.frame_changes.push((pid, rect));
    } else if state.active_buffer >= 0 {
        effects.layout_buffer = Some(state.active_buffer as usize);
    }
    (true, effects)
}

fn retile(state: &mut WMState, config: &WMConfig, screen: Rect) -> (bool, Effects) {
    if state.active_buffer < 0 {
        return (false, Effects::default());
    }
    let buffer = state.active_buffer as usize;
    let frames = layout::compute_dwindle(state, config, buffer, screen);
    let mut effects = Effects::default();
    effects.frame_changes = frames;
    effects.layout_buffer = Some(buffer);
    (true, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WMConfig;

    fn populated_state() -> WMState {
        let mut state = WMState::new();
        state.registry.register_app(1234, "com.apple.Terminal").unwrap();
        state.registry.register_app(5678, "com.google.Chrome").unwrap();
        state.registry.register_app(9012, "com.spotify.client").unwrap();
        state.registry.assign_to_buffer(1234, 0);
        state.registry.assign_to_buffer(5678, 0);
        state.registry.assign_to_buffer(9012, 1);
        state.active_buffer = 0;
        state
    }

    #[test]
    fn switch_buffer_scenario_2() {
        let mut state = populated_state();
        let (success, effects) = process(&mut state, &Action::SwitchBuffer(1));

        assert!(success);
        assert_eq!(effects.to_show, vec![9012]);
        assert_eq!(effects.to_hide.len(), 2);
        assert!(effects.to_hide.contains(&1234) && effects.to_hide.contains(&5678));
        assert_eq!(effects.to_raise, vec![9012]);
        assert!(effects.needs_layout());
        assert_eq!(effects.layout_buffer, Some(1));
        assert_eq!(state.active_buffer, 1);
    }

    #[test]
    fn switch_buffer_raises_last_focused_over_registration_order_scenario_3() {
        let mut state = populated_state();
        state.registry.assign_to_buffer(5678, 1);
        state.set_focused(5678);

        let (success, effects) = process(&mut state, &Action::SwitchBuffer(1));
        assert!(success);
        assert_eq!(effects.to_raise, vec![5678]);
    }

    #[test]
    fn switch_buffer_same_buffer_is_rejected() {
        let mut state = populated_state();
        let (success, effects) = process(&mut state, &Action::SwitchBuffer(0));
        assert!(!success);
        assert!(effects.to_hide.is_empty() && effects.to_show.is_empty());
        assert_eq!(state.active_buffer, 0);
    }

    #[test]
    fn switch_buffer_out_of_range_fails() {
        let mut state = populated_state();
        let (success, _) = process(&mut state, &Action::SwitchBuffer(BUFFER_COUNT));
        assert!(!success);
    }

    #[test]
    fn switch_buffer_from_uninitialized_emits_no_hides() {
        let mut state = WMState::new();
        state.registry.register_app(1, "a").unwrap();
        state.registry.assign_to_buffer(1, 0);

        let (success, effects) = process(&mut state, &Action::SwitchBuffer(0));
        assert!(success);
        assert!(effects.to_hide.is_empty());
        assert_eq!(effects.to_show, vec![1]);
    }

    #[test]
    fn switch_buffer_empty_target_has_no_raise() {
        let mut state = populated_state();
        let (success, effects) = process(&mut state, &Action::SwitchBuffer(2));
        assert!(success);
        assert!(effects.to_show.is_empty());
        assert!(effects.to_raise.is_empty());
    }

    #[test]
    fn move_buffer_to_active_buffer_shows_and_raises_without_switch() {
        let mut state = populated_state();
        let (success, effects) = process(&mut state, &Action::MoveBuffer(9012, 0));

        assert!(success);
        assert_eq!(effects.to_show, vec![9012]);
        assert_eq!(effects.to_raise, vec![9012]);
        assert_eq!(effects.layout_buffer, Some(0));
        assert_eq!(state.registry.find_app(9012).unwrap().buffer_index, 0);
    }

    #[test]
    fn move_buffer_to_other_buffer_switches_and_raises_moved_pid_last() {
        let mut state = populated_state();
        state.registry.assign_to_buffer(5678, 1);
        state.set_focused(5678);

        let (success, effects) = process(&mut state, &Action::MoveBuffer(1234, 1));

        assert!(success);
        assert_eq!(state.active_buffer, 1);
        assert_eq!(*effects.to_raise.last().unwrap(), 1234);
        assert_eq!(effects.to_raise, vec![5678, 1234]);
    }

    #[test]
    fn move_buffer_rejects_same_buffer_and_absent_pid() {
        let mut state = populated_state();
        assert!(!process(&mut state, &Action::MoveBuffer(1234, 0)).0);
        assert!(!process(&mut state, &Action::MoveBuffer(99999, 0)).0);
    }

    #[test]
    fn toggle_passthrough_flips_and_flips_back() {
        let mut state = WMState::new();
        assert!(!state.is_passthrough_mode);
        let (success, _) = process(&mut state, &Action::TogglePassthrough);
        assert!(success && state.is_passthrough_mode);
        let (success, _) = process(&mut state, &Action::TogglePassthrough);
        assert!(success && !state.is_passthrough_mode);
    }

    #[test]
    fn base_reducer_is_a_noop_for_unmechanized_variants() {
        let mut state = populated_state();
        let before = state.registry.find_app(1234).unwrap().is_floating;
        let (success, effects) = process(&mut state, &Action::SnapLeft);
        assert!(!success);
        assert!(effects.to_hide.is_empty() && effects.frame_changes.is_empty());
        assert_eq!(state.registry.find_app(1234).unwrap().is_floating, before);
    }

    #[test]
    fn process_with_layout_snap_floats_and_places_the_focused_app() {
        let mut state = populated_state();
        state.set_focused(1234);
        let config = WMConfig::new();
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);

        let (success, effects) = process_with_layout(&mut state, &config, screen, &Action::SnapMaximize);

        assert!(success);
        assert!(state.registry.find_app(1234).unwrap().is_floating);
        assert_eq!(effects.frame_changes.len(), 1);
        assert_eq!(effects.frame_changes[0].0, 1234);
    }

    #[test]
    fn process_with_layout_snap_fails_without_a_focused_app() {
        let mut state = WMState::new();
        state.active_buffer = 0;
        let config = WMConfig::new();
        let (success, _) = process_with_layout(&mut state, &config, Rect::new(0.0, 0.0, 100.0, 100.0), &Action::SnapLeft);
        assert!(!success);
    }

    #[test]
    fn process_with_layout_toggle_floating_round_trips() {
        let mut state = populated_state();
        state.set_focused(1234);
        let config = WMConfig::new();
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);

        let (success, effects) = process_with_layout(&mut state, &config, screen, &Action::ToggleFloating);
        assert!(success);
        assert!(state.registry.find_app(1234).unwrap().is_floating);
        assert_eq!(effects.frame_changes.len(), 1);

        let (success, effects) = process_with_layout(&mut state, &config, screen, &Action::ToggleFloating);
        assert!(success);
        assert!(!state.registry.find_app(1234).unwrap().is_floating);
        assert_eq!(effects.layout_buffer, Some(0));
    }

    #[test]
    fn process_with_layout_retile_recomputes_dwindle() {
        let mut state = populated_state();
        let config = WMConfig::new();
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);

        let (success, effects) = process_with_layout(&mut state, &config, screen, &Action::Retile);
        assert!(success);
        assert_eq!(effects.frame_changes.len(), 2);
        assert_eq!(effects.layout_buffer, Some(0));
    }

    #[test]
    fn process_with_layout_retile_fails_when_uninitialized() {
        let mut state = WMState::new();
        let config = WMConfig::new();
        let (success, _) = process_with_layout(&mut state, &config, Rect::new(0.0, 0.0, 100.0, 100.0), &Action::Retile);
        assert!(!success);
    }

    #[test]
    fn process_with_layout_launch_bundle_sets_the_field_without_mutating_state() {
        let mut state = populated_state();
        let config = WMConfig::new();
        let (success, effects) =
            process_with_layout(&mut state, &config, Rect::new(0.0, 0.0, 100.0, 100.0), &Action::LaunchBundle("com.example.app".into()));
        assert!(success);
        assert_eq!(effects.launch_bundle.as_deref(), Some("com.example.app"));
    }

    #[test]
    fn process_with_layout_none_always_fails() {
        let mut state = populated_state();
        let config = WMConfig::new();
        let (success, _) = process_with_layout(&mut state, &config, Rect::new(0.0, 0.0, 100.0, 100.0), &Action::None);
        assert!(!success);
    }
}
