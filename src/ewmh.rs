//! Root-window EWMH advertisement: the small slice of the spec this window
//! manager keeps up to date for panels, pagers and fullscreen-aware clients.
//!
//! See <https://specifications.freedesktop.org/wm-spec/wm-spec-latest.html>.
use crate::error::Result;
use crate::geometry::Rect;
use crate::monitor::MonitorSet;
use crate::window::{Registry, Xid};
use crate::x::XConn;

/// The WM name advertised via `_NET_SUPPORTING_WM_CHECK`/`_NET_WM_NAME`.
pub const WM_NAME: &str = "fensterchef";

/// The atoms listed in `_NET_SUPPORTED`.
pub const SUPPORTED_ATOMS: &[&str] = &[
    "_NET_SUPPORTED",
    "_NET_SUPPORTING_WM_CHECK",
    "_NET_CLIENT_LIST",
    "_NET_WORKAREA",
    "_NET_WM_STATE",
    "_NET_WM_STATE_FULLSCREEN",
    "_NET_WM_STRUT_PARTIAL",
    "_NET_WM_WINDOW_TYPE",
    "_NET_CLOSE_WINDOW",
    "_NET_WM_MOVERESIZE",
    "_NET_MOVERESIZE_WINDOW",
];

/// Create the 1x1 check window at (-1,-1) and advertise `_NET_SUPPORTED` and
/// `_NET_SUPPORTING_WM_CHECK` on the root window. Called once at startup.
pub fn startup<X: XConn>(x: &mut X) -> Result<Xid> {
    let root = x.root();
    let check_window = x.create_utility_window()?;
    x.configure(check_window, Rect::new(-1, -1, 1, 1))?;
    x.set_property_text(check_window, "_NET_WM_NAME", WM_NAME)?;
    x.set_property_windows(check_window, "_NET_SUPPORTING_WM_CHECK", &[check_window])?;
    x.set_property_windows(root, "_NET_SUPPORTING_WM_CHECK", &[check_window])?;
    x.set_property_atoms(root, "_NET_SUPPORTED", SUPPORTED_ATOMS)?;
    Ok(check_window)
}

/// Refresh `_NET_CLIENT_LIST` (numeric id order) and `_NET_WORKAREA`
/// (per-monitor work area). Called once per event-loop iteration.
pub fn refresh<X: XConn>(x: &mut X, registry: &Registry, monitors: &MonitorSet) -> Result<()> {
    let root = x.root();

    let mut ids: Vec<(u32, Xid)> = registry
        .global_list()
        .into_iter()
        .filter_map(|w| {
            let window = registry.get(w)?;
            Some((window.numeric_id?, window.xid))
        })
        .collect();
    ids.sort_by_key(|&(numeric_id, _)| numeric_id);
    let client_list: Vec<Xid> = ids.into_iter().map(|(_, xid)| xid).collect();
    x.set_property_windows(root, "_NET_CLIENT_LIST", &client_list)?;

    let work_areas: Vec<Rect> = monitors.iter().map(|m| m.work_area()).collect();
    x.set_property_rects(root, "_NET_WORKAREA", &work_areas)?;

    Ok(())
}
