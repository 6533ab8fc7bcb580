//! The typed event stream the transport layer is assumed to provide.
//!
//! The transport owns wire decoding, property caching and keysym
//! translation; by the time an event reaches the core it carries already
//! resolved data (a [crate::window::Properties] diff, a keysym, a button
//! index) rather than raw X protocol fields.
use crate::bindings::{KeyCode, ModifierSet, MouseButton};
use crate::geometry::{Point, Rect};
use crate::monitor::MonitorInput;
use crate::window::{Properties, Xid};

/// Which field of a window's cached properties a `PROPERTY_NOTIFY` refreshed.
#[derive(Debug, Clone)]
pub enum PropertyUpdate {
    /// The transport has already re-read and re-decoded every property.
    Full(Properties),
    /// Only the strut reservation changed; avoids a full property re-read.
    Strut(crate::window::Strut),
}

/// One of the three `_NET_WM_MOVERESIZE`-family client messages this core
/// reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    CloseWindow(Xid),
    MoveResize(Xid, crate::moveresize::Direction, Point),
    MoveResizeCancel(Xid),
}

/// A single typed event, already decoded by the transport layer.
#[derive(Debug, Clone)]
pub enum XEvent {
    Create(Xid),
    MapRequest(Xid),
    ConfigureRequest(Xid, Rect),
    ConfigureNotify(Xid, Rect),
    Unmap(Xid),
    Destroy(Xid),
    PropertyNotify(Xid, PropertyUpdate),
    KeyPress(KeyCode),
    KeyRelease(KeyCode),
    ButtonPress(Xid, MouseButton, ModifierSet, Point),
    ButtonRelease(Xid, MouseButton, ModifierSet, Point),
    MotionNotify(Point),
    MappingNotify,
    ScreenChange(Vec<MonitorInput>),
    ClientMessage(ClientMessage),
}

impl std::fmt::Display for XEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
