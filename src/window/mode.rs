//! The window-mode classifier: a pure function from cached properties to a
//! [WindowMode], plus the per-mode geometry policies that follow from it.
use super::{FullscreenMonitors, Properties, SizeHints, WindowType};
use crate::geometry::{adjust_for_window_gravity, Rect};

/// One of the four window modes. Determines geometry policy, border width
/// and the `_NET_WM_ALLOWED_ACTIONS` table a window advertises.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WindowMode {
    Tiling,
    Popup,
    Fullscreen,
    Dock,
}

/// Fixed `_NET_WM_ACTION_*` atom name table per mode (spec §6).
pub const fn allowed_actions(mode: WindowMode) -> &'static [&'static str] {
    match mode {
        WindowMode::Tiling => &[
            "_NET_WM_ACTION_MAXIMIZE_HORZ",
            "_NET_WM_ACTION_MAXIMIZE_VERT",
            "_NET_WM_ACTION_FULLSCREEN",
            "_NET_WM_ACTION_CHANGE_DESKTOP",
            "_NET_WM_ACTION_CLOSE",
        ],
        WindowMode::Popup => &[
            "_NET_WM_ACTION_MOVE",
            "_NET_WM_ACTION_RESIZE",
            "_NET_WM_ACTION_MINIMIZE",
            "_NET_WM_ACTION_SHADE",
            "_NET_WM_ACTION_STICK",
            "_NET_WM_ACTION_MAXIMIZE_HORZ",
            "_NET_WM_ACTION_MAXIMIZE_VERT",
            "_NET_WM_ACTION_FULLSCREEN",
            "_NET_WM_ACTION_CHANGE_DESKTOP",
            "_NET_WM_ACTION_CLOSE",
            "_NET_WM_ACTION_ABOVE",
            "_NET_WM_ACTION_BELOW",
        ],
        WindowMode::Fullscreen => &[
            "_NET_WM_ACTION_CHANGE_DESKTOP",
            "_NET_WM_ACTION_CLOSE",
            "_NET_WM_ACTION_ABOVE",
            "_NET_WM_ACTION_BELOW",
        ],
        WindowMode::Dock => &[],
    }
}

/// Border width a window should carry while in `mode`, given the configured
/// default and whether the client manages its own decorations.
pub fn border_width(mode: WindowMode, configured: u32, client_handles_decorations: bool) -> u32 {
    match mode {
        WindowMode::Tiling => configured,
        WindowMode::Popup => {
            if client_handles_decorations {
                0
            } else {
                configured
            }
        }
        WindowMode::Fullscreen | WindowMode::Dock => 0,
    }
}

/// Predict the mode a window should be in from its cached properties.
/// First match wins, evaluated in the fixed order below.
pub fn predict_window_mode(props: &Properties) -> WindowMode {
    if props.is_fullscreen_state {
        return WindowMode::Fullscreen;
    }
    if props.has_window_type(WindowType::Dock) {
        return WindowMode::Dock;
    }
    if !props.strut.is_empty() {
        return WindowMode::Dock;
    }
    if props.transient_for.is_some() {
        return WindowMode::Popup;
    }
    if props.has_window_type(WindowType::Normal) {
        return WindowMode::Tiling;
    }
    if let (Some(min), Some(max)) = (props.size_hints.min_size, props.size_hints.max_size) {
        if min.0 == max.0 || min.1 == max.1 {
            return WindowMode::Popup;
        }
    }
    if !props.window_types.is_empty() {
        return WindowMode::Popup;
    }
    WindowMode::Tiling
}

/// Derive popup geometry: reuse saved geometry if present, else derive from
/// size hints (preferred size, clamped by min/max, centered if unpositioned),
/// then apply the window-gravity adjustment if a gravity hint was given.
pub fn configure_popup_size(
    size_hints: &SizeHints,
    saved: Option<Rect>,
    monitor: Rect,
) -> Rect {
    if let Some(r) = saved {
        return apply_gravity(size_hints, r, r);
    }

    let (mut w, mut h) = size_hints
        .size
        .unwrap_or((monitor.w * 2 / 3, monitor.h * 2 / 3));

    if let Some((min_w, min_h)) = size_hints.min_size {
        w = w.max(min_w);
        h = h.max(min_h);
    }
    if let Some((max_w, max_h)) = size_hints.max_size {
        w = w.min(max_w);
        h = h.min(max_h);
    }

    let (x, y) = size_hints.position.unwrap_or((
        monitor.x + (monitor.w as i32 - w as i32) / 2,
        monitor.y + (monitor.h as i32 - h as i32) / 2,
    ));

    apply_gravity(size_hints, Rect::new(x, y, w, h), Rect::new(x, y, w, h))
}

fn apply_gravity(size_hints: &SizeHints, old: Rect, new: Rect) -> Rect {
    match size_hints.win_gravity {
        Some(g) => {
            let (x, y) = adjust_for_window_gravity(g, new.x, new.y, (old.w, old.h), (new.w, new.h));
            Rect { x, y, ..new }
        }
        None => new,
    }
}

/// Fullscreen geometry: the client-requested monitor span if non-degenerate,
/// else the full rect of the monitor containing the window's current center.
pub fn configure_fullscreen_size(fsm: Option<FullscreenMonitors>, containing_monitor: Rect) -> Rect {
    match fsm {
        Some(f) if !f.is_degenerate() => f.rect(),
        _ => containing_monitor,
    }
}

/// Dock geometry: size hints if given, else a rect aligned to the first
/// non-zero reserved strut side; falls back to a fixed 64x32 placeholder.
pub fn configure_dock_size(props: &Properties, monitor: Rect, current: Rect) -> Rect {
    let (mut w, mut h) = props.size_hints.size.unwrap_or((0, 0));
    let (mut x, mut y) = props.size_hints.position.unwrap_or((current.x, current.y));

    if w == 0 || h == 0 {
        let strut = &props.strut;
        if strut.reserved.left != 0 {
            x = monitor.x;
            let (sy, ey) = strut.left_range.unwrap_or((monitor.y, monitor.y));
            y = sy;
            w = strut.reserved.left;
            h = (ey - sy + 1).max(0) as u32;
        } else if strut.reserved.top != 0 {
            let (sx, ex) = strut.top_range.unwrap_or((monitor.x, monitor.x));
            x = sx;
            y = monitor.y;
            w = (ex - sx + 1).max(0) as u32;
            h = strut.reserved.top;
        } else if strut.reserved.right != 0 {
            x = monitor.x + monitor.w as i32 - strut.reserved.right as i32;
            let (sy, ey) = strut.right_range.unwrap_or((monitor.y, monitor.y));
            y = sy;
            w = strut.reserved.right;
            h = (ey - sy + 1).max(0) as u32;
        } else if strut.reserved.bottom != 0 {
            let (sx, ex) = strut.bottom_range.unwrap_or((monitor.x, monitor.x));
            x = sx;
            y = monitor.y + monitor.h as i32 - strut.reserved.bottom as i32;
            w = (ex - sx + 1).max(0) as u32;
            h = strut.reserved.bottom;
        } else {
            w = 64;
            h = 32;
        }
    }

    apply_gravity(&props.size_hints, Rect::new(x, y, w, h), Rect::new(x, y, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{MotifHints, Strut};

    fn props() -> Properties {
        Properties::default()
    }

    #[test]
    fn fullscreen_state_wins_over_everything_else() {
        let mut p = props();
        p.is_fullscreen_state = true;
        p.window_types = vec![WindowType::Dock];
        assert_eq!(predict_window_mode(&p), WindowMode::Fullscreen);
    }

    #[test]
    fn strut_alone_implies_dock() {
        let mut p = props();
        p.strut.reserved.bottom = 32;
        assert_eq!(predict_window_mode(&p), WindowMode::Dock);
    }

    #[test]
    fn transient_for_implies_popup() {
        let mut p = props();
        p.transient_for = Some(super::super::Xid(7));
        assert_eq!(predict_window_mode(&p), WindowMode::Popup);
    }

    #[test]
    fn equal_min_max_width_implies_popup() {
        let mut p = props();
        p.size_hints.min_size = Some((300, 200));
        p.size_hints.max_size = Some((300, 400));
        assert_eq!(predict_window_mode(&p), WindowMode::Popup);
    }

    #[test]
    fn no_signals_falls_back_to_tiling() {
        assert_eq!(predict_window_mode(&props()), WindowMode::Tiling);
    }

    #[test]
    fn popup_geometry_reuses_saved_rect() {
        let hints = SizeHints::default();
        let monitor = Rect::new(0, 0, 1920, 1080);
        let saved = Rect::new(10, 10, 300, 200);
        assert_eq!(configure_popup_size(&hints, Some(saved), monitor), saved);
    }

    #[test]
    fn popup_geometry_centers_when_unpositioned() {
        let mut hints = SizeHints::default();
        hints.size = Some((300, 200));
        let monitor = Rect::new(0, 0, 800, 600);
        let r = configure_popup_size(&hints, None, monitor);
        assert_eq!(r.w, 300);
        assert_eq!(r.h, 200);
        assert_eq!(r.x, 250);
        assert_eq!(r.y, 200);
    }

    #[test]
    fn dock_geometry_falls_back_to_default_size() {
        let p = props();
        let monitor = Rect::new(0, 0, 800, 600);
        let r = configure_dock_size(&p, monitor, Rect::default());
        assert_eq!((r.w, r.h), (64, 32));
    }

    #[test]
    fn border_width_honors_motif_no_decorations() {
        let hints = MotifHints {
            client_handles_decorations: true,
        };
        assert_eq!(border_width(WindowMode::Popup, 2, hints.client_handles_decorations), 0);
        let _ = Strut::default();
    }
}
