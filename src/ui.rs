//! The notification/picker contract: rendering and interactive picking are
//! external collaborators (see §1 Non-goals); this only defines the seam the
//! core calls through.
use crate::geometry::Point;
use crate::window::Xid;

/// Display a transient on-screen message centred on `at`. Implemented by the
/// rendering layer; the core only ever calls through this trait.
pub trait Notifier {
    fn notify(&mut self, text: &str, at: Point);
}

/// Let the user interactively pick a managed window (e.g. for `SHOW-WINDOW-LIST`).
/// Implemented by the rendering/input layer; returns `None` if the picker was
/// cancelled.
pub trait WindowPicker {
    fn pick_window(&mut self, candidates: &[Xid]) -> Option<Xid>;
}
