//! The X11 transport contract: the external collaborator that owns wire
//! requests/replies, property caching and keysym translation. The CORE only
//! ever talks to it through this trait.
pub mod event;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::bindings::{ModifierSet, MouseButton};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::monitor::MonitorInput;
use crate::window::Xid;
use fensterchef_keysyms::XKeySym;

pub use event::XEvent;

/// Everything the core engine needs from the X server, abstracted behind a
/// trait so the engine is testable without a live display connection.
pub trait XConn {
    /// The id of the root window this WM manages.
    fn root(&self) -> Xid;

    /// Block until at least one event is available, then return the next one.
    fn next_event(&mut self) -> Result<XEvent>;

    /// Return the next already-queued event without blocking, or `None` if
    /// none is pending. Used to drain every currently-available event within
    /// one loop iteration after `next_event` wakes it.
    fn poll_event(&mut self) -> Result<Option<XEvent>>;

    /// Flush all requests queued since the last flush.
    fn flush(&mut self) -> Result<()>;

    fn map(&mut self, window: Xid) -> Result<()>;
    fn unmap(&mut self, window: Xid) -> Result<()>;

    /// Proxy a configure request/apply a computed geometry verbatim.
    fn configure(&mut self, window: Xid, rect: Rect) -> Result<()>;
    fn set_border_width(&mut self, window: Xid, width: u32) -> Result<()>;
    fn set_border_color(&mut self, window: Xid, pixel: u32) -> Result<()>;

    /// Set input focus to `window`, or revert to the WM's fallback utility
    /// window when `None`.
    fn set_input_focus(&mut self, window: Option<Xid>) -> Result<()>;
    fn raise(&mut self, window: Xid) -> Result<()>;

    fn kill(&mut self, window: Xid) -> Result<()>;
    /// Send the polite `WM_DELETE_WINDOW` client message.
    fn send_delete_window(&mut self, window: Xid) -> Result<()>;

    fn set_property_atoms(&mut self, window: Xid, name: &str, values: &[&str]) -> Result<()>;
    fn set_property_text(&mut self, window: Xid, name: &str, text: &str) -> Result<()>;
    fn set_property_rects(&mut self, window: Xid, name: &str, rects: &[Rect]) -> Result<()>;
    fn set_property_windows(&mut self, window: Xid, name: &str, values: &[Xid]) -> Result<()>;

    /// Create a 1x1 utility window at (-1,-1), used for the EWMH check
    /// window and the focus-fallback window.
    fn create_utility_window(&mut self) -> Result<Xid>;

    fn warp_pointer(&mut self, pos: Point) -> Result<()>;
    fn cursor_position(&mut self) -> Result<Point>;

    fn grab_key(&mut self, symbol: XKeySym, modifiers: ModifierSet) -> Result<()>;
    fn ungrab_all_keys(&mut self) -> Result<()>;
    fn grab_button(&mut self, button: MouseButton, modifiers: ModifierSet) -> Result<()>;
    fn ungrab_all_buttons(&mut self) -> Result<()>;

    /// Query RandR (or equivalent) for the currently connected outputs.
    fn screens(&mut self) -> Result<Vec<MonitorInput>>;
}

/// Convenience methods layered over [XConn] with one canonical
/// implementation, the way the teacher's `XConnExt` sits over its `XConn`.
pub trait XConnExt: XConn + Sized {
    /// Refresh every key/button grab from scratch: ungrab everything, then
    /// grab the full ignore-modifier power set for every configured binding.
    fn regrab(&mut self, bindings: &crate::bindings::BindingTable) -> Result<()> {
        self.ungrab_all_keys()?;
        for (symbol, modifiers) in bindings.grab_combinations() {
            self.grab_key(symbol, modifiers)?;
        }
        self.ungrab_all_buttons()?;
        for (button, modifiers) in bindings.grab_button_combinations() {
            self.grab_button(button, modifiers)?;
        }
        Ok(())
    }
}

impl<X: XConn> XConnExt for X {}
