//! A mock implementation of [super::XConn] that is easier to implement for
//! use in tests.
//! This module and its contents are only available when testing.
use super::{XConn, XEvent};
use crate::bindings::{ModifierSet, MouseButton};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::monitor::MonitorInput;
use crate::window::Xid;
use fensterchef_keysyms::XKeySym;

/// All methods on this trait that return a Result will return
/// `Error::UnimplementedMock` by default unless an implementation is
/// provided. `mock_root` always returns id 0 and the remaining no-op methods
/// default to `Ok(())`/an empty collection.
///
/// Any implementation of `MockXConn` automatically implements [XConn] by
/// forwarding calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_next_event(&mut self) -> Result<XEvent> {
        Err(Error::UnimplementedMock)
    }

    fn mock_poll_event(&mut self) -> Result<Option<XEvent>> {
        Ok(None)
    }

    fn mock_flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn mock_map(&mut self, window: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_unmap(&mut self, window: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_configure(&mut self, window: Xid, rect: Rect) -> Result<()> {
        Ok(())
    }

    fn mock_set_border_width(&mut self, window: Xid, width: u32) -> Result<()> {
        Ok(())
    }

    fn mock_set_border_color(&mut self, window: Xid, pixel: u32) -> Result<()> {
        Ok(())
    }

    fn mock_set_input_focus(&mut self, window: Option<Xid>) -> Result<()> {
        Ok(())
    }

    fn mock_raise(&mut self, window: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_kill(&mut self, window: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_send_delete_window(&mut self, window: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_set_property_atoms(&mut self, window: Xid, name: &str, values: &[&str]) -> Result<()> {
        Ok(())
    }

    fn mock_set_property_text(&mut self, window: Xid, name: &str, text: &str) -> Result<()> {
        Ok(())
    }

    fn mock_set_property_rects(&mut self, window: Xid, name: &str, rects: &[Rect]) -> Result<()> {
        Ok(())
    }

    fn mock_set_property_windows(&mut self, window: Xid, name: &str, values: &[Xid]) -> Result<()> {
        Ok(())
    }

    fn mock_create_utility_window(&mut self) -> Result<Xid> {
        Err(Error::UnimplementedMock)
    }

    fn mock_warp_pointer(&mut self, pos: Point) -> Result<()> {
        Ok(())
    }

    fn mock_cursor_position(&mut self) -> Result<Point> {
        Ok(Point::default())
    }

    fn mock_grab_key(&mut self, symbol: XKeySym, modifiers: ModifierSet) -> Result<()> {
        Ok(())
    }

    fn mock_ungrab_all_keys(&mut self) -> Result<()> {
        Ok(())
    }

    fn mock_grab_button(&mut self, button: MouseButton, modifiers: ModifierSet) -> Result<()> {
        Ok(())
    }

    fn mock_ungrab_all_buttons(&mut self) -> Result<()> {
        Ok(())
    }

    fn mock_screens(&mut self) -> Result<Vec<MonitorInput>> {
        Ok(Vec::new())
    }
}

impl<T: MockXConn> XConn for T {
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn next_event(&mut self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn poll_event(&mut self) -> Result<Option<XEvent>> {
        self.mock_poll_event()
    }

    fn flush(&mut self) -> Result<()> {
        self.mock_flush()
    }

    fn map(&mut self, window: Xid) -> Result<()> {
        self.mock_map(window)
    }

    fn unmap(&mut self, window: Xid) -> Result<()> {
        self.mock_unmap(window)
    }

    fn configure(&mut self, window: Xid, rect: Rect) -> Result<()> {
        self.mock_configure(window, rect)
    }

    fn set_border_width(&mut self, window: Xid, width: u32) -> Result<()> {
        self.mock_set_border_width(window, width)
    }

    fn set_border_color(&mut self, window: Xid, pixel: u32) -> Result<()> {
        self.mock_set_border_color(window, pixel)
    }

    fn set_input_focus(&mut self, window: Option<Xid>) -> Result<()> {
        self.mock_set_input_focus(window)
    }

    fn raise(&mut self, window: Xid) -> Result<()> {
        self.mock_raise(window)
    }

    fn kill(&mut self, window: Xid) -> Result<()> {
        self.mock_kill(window)
    }

    fn send_delete_window(&mut self, window: Xid) -> Result<()> {
        self.mock_send_delete_window(window)
    }

    fn set_property_atoms(&mut self, window: Xid, name: &str, values: &[&str]) -> Result<()> {
        self.mock_set_property_atoms(window, name, values)
    }

    fn set_property_text(&mut self, window: Xid, name: &str, text: &str) -> Result<()> {
        self.mock_set_property_text(window, name, text)
    }

    fn set_property_rects(&mut self, window: Xid, name: &str, rects: &[Rect]) -> Result<()> {
        self.mock_set_property_rects(window, name, rects)
    }

    fn set_property_windows(&mut self, window: Xid, name: &str, values: &[Xid]) -> Result<()> {
        self.mock_set_property_windows(window, name, values)
    }

    fn create_utility_window(&mut self) -> Result<Xid> {
        self.mock_create_utility_window()
    }

    fn warp_pointer(&mut self, pos: Point) -> Result<()> {
        self.mock_warp_pointer(pos)
    }

    fn cursor_position(&mut self) -> Result<Point> {
        self.mock_cursor_position()
    }

    fn grab_key(&mut self, symbol: XKeySym, modifiers: ModifierSet) -> Result<()> {
        self.mock_grab_key(symbol, modifiers)
    }

    fn ungrab_all_keys(&mut self) -> Result<()> {
        self.mock_ungrab_all_keys()
    }

    fn grab_button(&mut self, button: MouseButton, modifiers: ModifierSet) -> Result<()> {
        self.mock_grab_button(button, modifiers)
    }

    fn ungrab_all_buttons(&mut self) -> Result<()> {
        self.mock_ungrab_all_buttons()
    }

    fn screens(&mut self) -> Result<Vec<MonitorInput>> {
        self.mock_screens()
    }
}

/// A `MockXConn` that accepts every default, useful where a test only cares
/// about pure state transitions and never inspects X-facing effects.
#[derive(Default)]
pub struct StubXConn;

impl MockXConn for StubXConn {}
