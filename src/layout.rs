//! Layout geometry: the dwindle recursion and the ten snap regions.

use crate::actions::Action;
use crate::config::WMConfig;
use crate::geometry::Rect;
use crate::registry::Pid;
use crate::state::WMState;

/// Computes the dwindle layout for `buffer_index`: every non-floating app
/// assigned to that buffer, in registration order, paired with its frame.
pub fn compute_dwindle(
    state: &WMState,
    config: &WMConfig,
    buffer_index: usize,
    screen: Rect,
) -> Vec<(Pid, Rect)> {
    let pids: Vec<Pid> = state
        .registry
        .apps()
        .iter()
        .filter(|app| app.buffer_index == buffer_index as i8 && !app.is_floating)
        .map(|app| app.pid)
        .collect();

    let gaps = config.gaps_outer;
    let area = screen.apply_gaps(gaps.top as f64, gaps.right as f64, gaps.bottom as f64, gaps.left as f64);

    let mut frames = Vec::with_capacity(pids.len());
    dwindle_recurse(&pids, area, config, 0, &mut frames);
    frames
}

fn dwindle_recurse(pids: &[Pid], area: Rect, config: &WMConfig, depth: u32, out: &mut Vec<(Pid, Rect)>) {
    match pids {
        [] => {}
        [only] => out.push((*only, area)),
        [first, rest @ ..] => {
            let inner = config.gaps_inner;
            if depth % 2 == 0 {
                let gap = inner.left as f64;
                let half = (area.width - gap) / 2.0;
                out.push((*first, Rect::new(area.x, area.y, half, area.height)));
                let remainder = Rect::new(area.x + half + gap, area.y, area.width - half - gap, area.height);
                dwindle_recurse(rest, remainder, config, depth + 1, out);
            } else {
                let gap = inner.top as f64;
                let half = (area.height - gap) / 2.0;
                out.push((*first, Rect::new(area.x, area.y + half + gap, area.width, half)));
                let remainder = Rect::new(area.x, area.y, area.width, area.height - half - gap);
                dwindle_recurse(rest, remainder, config, depth + 1, out);
            }
        }
    }
}

/// Computes the placement rect for one of the ten snap actions. Returns
/// `screen` unchanged for any other action, mirroring the ported source's
/// `default: return screen;` fallback.
pub fn compute_snap(action: &Action, screen: Rect, config: &WMConfig) -> Rect {
    let gaps = config.gaps_outer;
    let inner = config.gaps_inner;
    let usable = screen.apply_gaps(gaps.top as f64, gaps.right as f64, gaps.bottom as f64, gaps.left as f64);
    let (x, y, w, h) = (usable.x, usable.y, usable.width, usable.height);
    let half_w = (w - inner.left as f64) / 2.0;
    let half_h = (h - inner.top as f64) / 2.0;

    match action {
        Action::SnapLeft => Rect::new(x, y, half_w, h),
        Action::SnapRight => Rect::new(x + half_w + inner.left as f64, y, half_w, h),
        Action::SnapTop => Rect::new(x, y + half_h + inner.top as f64, w, half_h),
        Action::SnapBottom => Rect::new(x, y, w, half_h),
        Action::SnapMaximize => Rect::new(x, y, w, h),
        Action::SnapCenter => {
            let center_w = screen.width * 0.6;
            let center_h = screen.height * 0.7;
            Rect::new(
                screen.x + (screen.width - center_w) / 2.0,
                screen.y + (screen.height - center_h) / 2.0,
                center_w,
                center_h,
            )
        }
        Action::SnapTopLeft => Rect::new(x, y + half_h + inner.top as f64, half_w, half_h),
        Action::SnapTopRight => {
            Rect::new(x + half_w + inner.left as f64, y + half_h + inner.top as f64, half_w, half_h)
        }
        Action::SnapBottomLeft => Rect::new(x, y, half_w, half_h),
        Action::SnapBottomRight => Rect::new(x + half_w + inner.left as f64, y, half_w, half_h),
        _ => screen,
    }
}
