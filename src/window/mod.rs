//! The window entity and the registry that cross-links every managed window.
//!
//! Per the arena-plus-index design note, cyclic structures (the focus chain,
//! the Z-order, the taken-list) are modelled as `Option<WindowId>` linkage
//! fields stored on the [Window] itself, with the owning [Registry] holding
//! only the list heads. This sidesteps the aliasing problems an intrusive
//! doubly-linked list would run into under Rust's ownership rules while
//! keeping the same O(1) link/unlink operations the C original relies on.
pub mod mode;

use crate::error::{Error, Result};
use crate::geometry::{Extents, Rect, WindowGravity};
use std::collections::HashMap;
use std::time::Instant;

pub use mode::WindowMode;

/// Opaque X11 window id, as reported by the transport layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Xid(pub u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// Stable arena index identifying one managed window independent of its X id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) u32);

/// EWMH `_NET_WM_WINDOW_TYPE` categories the classifier and registry care about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowType {
    Normal,
    Dock,
    Dialog,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Desktop,
}

/// ICCCM `WM_SIZE_HINTS`, stored as the resolved optional fields rather than
/// the raw flags word.
#[derive(Debug, Clone, Default)]
pub struct SizeHints {
    /// `P_POSITION`
    pub position: Option<(i32, i32)>,
    /// `P_SIZE`
    pub size: Option<(u32, u32)>,
    /// `P_MIN_SIZE`
    pub min_size: Option<(u32, u32)>,
    /// `P_MAX_SIZE`
    pub max_size: Option<(u32, u32)>,
    /// `P_WIN_GRAVITY`
    pub win_gravity: Option<WindowGravity>,
}

/// Motif `_MOTIF_WM_HINTS`, reduced to the one flag the mode classifier and
/// border policy consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotifHints {
    /// The client requested to manage its own decorations (no WM border).
    pub client_handles_decorations: bool,
}

/// `_NET_WM_STRUT_PARTIAL`: pixel reservation on each root edge, plus the
/// start/end coordinate range of the reservation along the opposite axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strut {
    pub reserved: Extents,
    pub left_range: Option<(i32, i32)>,
    pub top_range: Option<(i32, i32)>,
    pub right_range: Option<(i32, i32)>,
    pub bottom_range: Option<(i32, i32)>,
}

impl Strut {
    pub fn is_empty(&self) -> bool {
        self.reserved == Extents::default()
    }
}

/// `_NET_WM_FULLSCREEN_MONITORS`, already resolved to pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FullscreenMonitors {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FullscreenMonitors {
    /// `top == bottom` is how the property signals "unset" in practice: a
    /// client that wants a genuine 1px-tall fullscreen rect has no way to
    /// ask for one through this property, so this matches upstream intent.
    pub fn is_degenerate(&self) -> bool {
        self.top == self.bottom
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            (self.right - self.left).max(0) as u32,
            (self.bottom - self.top).max(0) as u32,
        )
    }
}

/// Cached X properties a [Window] carries, refreshed on `PROPERTY_NOTIFY`.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pub name: Option<String>,
    pub class: Option<String>,
    pub transient_for: Option<Xid>,
    pub window_types: Vec<WindowType>,
    pub is_fullscreen_state: bool,
    pub size_hints: SizeHints,
    pub motif_hints: MotifHints,
    pub strut: Strut,
    pub fullscreen_monitors: Option<FullscreenMonitors>,
}

impl Properties {
    pub fn has_window_type(&self, ty: WindowType) -> bool {
        self.window_types.contains(&ty)
    }
}

/// One managed client window.
#[derive(Debug)]
pub struct Window {
    pub xid: Xid,
    /// Assigned at first show; `None` beforehand.
    pub numeric_id: Option<u32>,
    pub properties: Properties,
    pub mode: WindowMode,
    pub previous_mode: WindowMode,
    pub is_mode_forced: bool,
    pub is_visible: bool,
    pub was_ever_mapped: bool,
    pub position: Rect,
    /// Geometry remembered from the last time this window was in POPUP mode.
    pub saved_popup_geometry: Option<Rect>,
    /// Timestamp of the most recent unanswered polite close request.
    pub last_close_request: Option<Instant>,

    next_in_global_list: Option<WindowId>,
    focus_prev: Option<WindowId>,
    focus_next: Option<WindowId>,
    stack_above: Option<WindowId>,
    stack_below: Option<WindowId>,
    previous_taken: Option<WindowId>,
}

impl Window {
    fn new(xid: Xid) -> Self {
        Self {
            xid,
            numeric_id: None,
            properties: Properties::default(),
            mode: WindowMode::Tiling,
            previous_mode: WindowMode::Tiling,
            is_mode_forced: false,
            is_visible: false,
            was_ever_mapped: false,
            position: Rect::default(),
            saved_popup_geometry: None,
            last_close_request: None,
            next_in_global_list: None,
            focus_prev: None,
            focus_next: None,
            stack_above: None,
            stack_below: None,
            previous_taken: None,
        }
    }
}

enum Slot {
    Occupied(Window),
    Free { next_free: Option<u32> },
}

/// The global window list plus its four cross-linked views.
#[derive(Default)]
pub struct Registry {
    arena: Vec<Slot>,
    free_head: Option<u32>,
    by_xid: HashMap<Xid, WindowId>,
    first_window: Option<WindowId>,
    focus_front: Option<WindowId>,
    z_top: Option<WindowId>,
    z_bottom: Option<WindowId>,
    taken_head: Option<WindowId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        match self.arena.get(id.0 as usize)? {
            Slot::Occupied(w) => Some(w),
            Slot::Free { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        match self.arena.get_mut(id.0 as usize)? {
            Slot::Occupied(w) => Some(w),
            Slot::Free { .. } => None,
        }
    }

    fn require(&self, id: WindowId) -> Result<&Window> {
        self.get(id).ok_or(Error::UnknownWindow(self.xid_of(id)))
    }

    fn require_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        let xid = self.xid_of(id);
        self.get_mut(id).ok_or(Error::UnknownWindow(xid))
    }

    fn xid_of(&self, id: WindowId) -> Xid {
        self.get(id).map(|w| w.xid).unwrap_or(Xid(0))
    }

    pub fn window_of_xid(&self, xid: Xid) -> Option<WindowId> {
        self.by_xid.get(&xid).copied()
    }

    /// The X id of `id`, or `Error::UnknownWindow` if it has been destroyed.
    pub fn require_xid(&self, id: WindowId) -> Result<Xid> {
        self.require(id).map(|w| w.xid)
    }

    /// Register a freshly created X window (`CREATE_NOTIFY`). Returns the new
    /// window's id; it is not yet part of the focus chain, Z-order or any
    /// numeric-id ordering until shown.
    pub fn insert(&mut self, xid: Xid) -> WindowId {
        let window = Window::new(xid);
        let id = match self.free_head.take() {
            Some(idx) => {
                let next_free = match &self.arena[idx as usize] {
                    Slot::Free { next_free } => *next_free,
                    Slot::Occupied(_) => unreachable!(),
                };
                self.free_head = next_free;
                self.arena[idx as usize] = Slot::Occupied(window);
                WindowId(idx)
            }
            None => {
                let idx = self.arena.len() as u32;
                self.arena.push(Slot::Occupied(window));
                WindowId(idx)
            }
        };
        self.by_xid.insert(xid, id);
        self.insert_into_global_list(id);
        id
    }

    fn insert_into_global_list(&mut self, id: WindowId) {
        match self.first_window {
            None => self.first_window = Some(id),
            Some(head) => {
                let mut cur = head;
                loop {
                    let next = self.get(cur).and_then(|w| w.next_in_global_list);
                    match next {
                        Some(n) => cur = n,
                        None => break,
                    }
                }
                self.get_mut(cur).unwrap().next_in_global_list = Some(id);
            }
        }
    }

    /// Iterate the global list in its linked order (unassigned windows first
    /// in insertion order, then ascending by numeric id once assigned).
    pub fn global_list(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut cur = self.first_window;
        while let Some(id) = cur {
            out.push(id);
            cur = self.get(id).and_then(|w| w.next_in_global_list);
        }
        out
    }

    /// Assign the smallest free numeric id `>= 1` to a window being shown for
    /// the first time, reinserting it in ascending-id order in the global list.
    pub fn assign_numeric_id(&mut self, id: WindowId) -> Result<u32> {
        if self.require(id)?.numeric_id.is_some() {
            return Ok(self.get(id).unwrap().numeric_id.unwrap());
        }

        let mut prev: Option<WindowId> = None;
        let mut cur = self.first_window;
        let mut expected = 1u32;
        let mut insert_after: Option<WindowId> = None;
        while let Some(cid) = cur {
            if cid == id {
                cur = self.get(cid).and_then(|w| w.next_in_global_list);
                continue;
            }
            let Some(n) = self.get(cid).and_then(|w| w.numeric_id) else {
                cur = self.get(cid).and_then(|w| w.next_in_global_list);
                continue;
            };
            if n != expected {
                break;
            }
            expected += 1;
            insert_after = Some(cid);
            prev = Some(cid);
            cur = self.get(cid).and_then(|w| w.next_in_global_list);
        }
        let _ = prev;

        self.unlink_from_global_list(id);
        self.require_mut(id)?.numeric_id = Some(expected);

        match insert_after {
            None => {
                let old_head = self.first_window;
                self.get_mut(id).unwrap().next_in_global_list = old_head;
                self.first_window = Some(id);
            }
            Some(after) => {
                let after_next = self.get(after).unwrap().next_in_global_list;
                self.get_mut(id).unwrap().next_in_global_list = after_next;
                self.get_mut(after).unwrap().next_in_global_list = Some(id);
            }
        }

        Ok(expected)
    }

    fn unlink_from_global_list(&mut self, id: WindowId) {
        if self.first_window == Some(id) {
            self.first_window = self.get(id).unwrap().next_in_global_list;
            return;
        }
        let mut cur = self.first_window;
        while let Some(cid) = cur {
            let next = self.get(cid).unwrap().next_in_global_list;
            if next == Some(id) {
                let after = self.get(id).unwrap().next_in_global_list;
                self.get_mut(cid).unwrap().next_in_global_list = after;
                return;
            }
            cur = next;
        }
    }

    /// Unlink `id` from every list and free its arena slot. Never touches the
    /// underlying X id; the caller (the transport layer) owns that.
    pub fn destroy(&mut self, id: WindowId) -> Result<()> {
        self.require(id)?;
        self.remove_from_focus_chain(id);
        self.remove_from_z_order(id);
        self.unlink_from_taken_list(id);
        self.unlink_from_global_list(id);

        let xid = self.get(id).unwrap().xid;
        self.by_xid.remove(&xid);

        self.arena[id.0 as usize] = Slot::Free {
            next_free: self.free_head,
        };
        self.free_head = Some(id.0);
        Ok(())
    }

    // -- Focus chain: cyclic, contains exactly the visible windows. -------

    /// Move `w` to the front of the focus chain (most-recently-focused),
    /// inserting it if it is not already a member.
    pub fn set_focus_window(&mut self, id: WindowId) -> Result<()> {
        self.require(id)?;
        self.remove_from_focus_chain(id);
        match self.focus_front {
            None => {
                self.get_mut(id).unwrap().focus_prev = Some(id);
                self.get_mut(id).unwrap().focus_next = Some(id);
                self.focus_front = Some(id);
            }
            Some(front) => {
                let back = self.get(front).unwrap().focus_prev.unwrap();
                self.get_mut(id).unwrap().focus_prev = Some(back);
                self.get_mut(id).unwrap().focus_next = Some(front);
                self.get_mut(back).unwrap().focus_next = Some(id);
                self.get_mut(front).unwrap().focus_prev = Some(id);
                self.focus_front = Some(id);
            }
        }
        Ok(())
    }

    pub fn remove_from_focus_chain(&mut self, id: WindowId) {
        let (prev, next) = match self.get(id) {
            Some(w) => (w.focus_prev, w.focus_next),
            None => return,
        };
        let (Some(prev), Some(next)) = (prev, next) else {
            return;
        };
        if prev == id {
            // sole member
            self.focus_front = None;
        } else {
            self.get_mut(prev).unwrap().focus_next = Some(next);
            self.get_mut(next).unwrap().focus_prev = Some(prev);
            if self.focus_front == Some(id) {
                self.focus_front = Some(next);
            }
        }
        let w = self.get_mut(id).unwrap();
        w.focus_prev = None;
        w.focus_next = None;
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focus_front
    }

    pub fn is_in_focus_chain(&self, id: WindowId) -> bool {
        self.get(id).map(|w| w.focus_next.is_some()).unwrap_or(false)
    }

    /// Walk the cyclic focus chain by `steps` (negative walks backward).
    pub fn traverse_focus_chain(&self, from: WindowId, steps: i32) -> Option<WindowId> {
        let mut cur = from;
        if steps >= 0 {
            for _ in 0..steps {
                cur = self.get(cur)?.focus_next?;
            }
        } else {
            for _ in 0..(-steps) {
                cur = self.get(cur)?.focus_prev?;
            }
        }
        Some(cur)
    }

    // -- Z-order: linear, no wrap, ever-mapped windows. --------------------

    pub fn set_window_above(&mut self, id: WindowId) -> Result<()> {
        self.require(id)?;
        self.remove_from_z_order(id);
        match self.z_top {
            None => {
                self.z_top = Some(id);
                self.z_bottom = Some(id);
            }
            Some(top) => {
                self.get_mut(top).unwrap().stack_above = Some(id);
                self.get_mut(id).unwrap().stack_below = Some(top);
                self.z_top = Some(id);
            }
        }
        Ok(())
    }

    /// Insert `id` just above the first ever-mapped window, per the "new
    /// windows start near the bottom of the stack" rule.
    pub fn link_into_stacking_order(&mut self, id: WindowId) {
        let mut anchor = self.z_bottom;
        while let Some(a) = anchor {
            if self.get(a).map(|w| w.was_ever_mapped).unwrap_or(false) {
                break;
            }
            anchor = self.get(a).and_then(|w| w.stack_above);
        }
        match anchor {
            None => {
                // no other ever-mapped window yet; becomes the whole stack
                self.z_top = Some(id);
                self.z_bottom = Some(id);
            }
            Some(a) => {
                let above = self.get(a).unwrap().stack_above;
                self.get_mut(id).unwrap().stack_below = Some(a);
                self.get_mut(id).unwrap().stack_above = above;
                self.get_mut(a).unwrap().stack_above = Some(id);
                match above {
                    Some(ab) => self.get_mut(ab).unwrap().stack_below = Some(id),
                    None => self.z_top = Some(id),
                }
            }
        }
    }

    fn remove_from_z_order(&mut self, id: WindowId) {
        let (above, below) = match self.get(id) {
            Some(w) => (w.stack_above, w.stack_below),
            None => return,
        };
        match above {
            Some(a) => self.get_mut(a).unwrap().stack_below = below,
            None => self.z_top = below,
        }
        match below {
            Some(b) => self.get_mut(b).unwrap().stack_above = above,
            None => self.z_bottom = above,
        }
        if let Some(w) = self.get_mut(id) {
            w.stack_above = None;
            w.stack_below = None;
        }
    }

    pub fn above(&self, id: WindowId) -> Option<WindowId> {
        self.get(id).and_then(|w| w.stack_above)
    }

    pub fn below(&self, id: WindowId) -> Option<WindowId> {
        self.get(id).and_then(|w| w.stack_below)
    }

    pub fn z_bottom(&self) -> Option<WindowId> {
        self.z_bottom
    }

    pub fn z_top(&self) -> Option<WindowId> {
        self.z_top
    }

    /// Move focus to the next visible window above in Z-order, wrapping to
    /// the bottom-most visible window if none is above.
    pub fn traverse_focus(&self, from: WindowId) -> Option<WindowId> {
        let mut cur = self.above(from);
        while let Some(c) = cur {
            if self.get(c).map(|w| w.is_visible).unwrap_or(false) {
                return Some(c);
            }
            cur = self.above(c);
        }
        let mut cur = self.z_bottom;
        while let Some(c) = cur {
            if self.get(c).map(|w| w.is_visible).unwrap_or(false) {
                return Some(c);
            }
            cur = self.below(c);
        }
        None
    }

    // -- Taken list: singly linked stack of hidden tiling windows. ---------

    pub fn push_taken(&mut self, id: WindowId) {
        let head = self.taken_head;
        if let Some(w) = self.get_mut(id) {
            w.previous_taken = head;
        }
        self.taken_head = Some(id);
    }

    pub fn pop_taken(&mut self) -> Option<WindowId> {
        let head = self.taken_head?;
        self.taken_head = self.get(head).and_then(|w| w.previous_taken);
        if let Some(w) = self.get_mut(head) {
            w.previous_taken = None;
        }
        Some(head)
    }

    pub fn unlink_from_taken_list(&mut self, id: WindowId) {
        if self.taken_head == Some(id) {
            self.taken_head = self.get(id).and_then(|w| w.previous_taken);
            if let Some(w) = self.get_mut(id) {
                w.previous_taken = None;
            }
            return;
        }
        let mut cur = self.taken_head;
        while let Some(c) = cur {
            let next = self.get(c).and_then(|w| w.previous_taken);
            if next == Some(id) {
                let after = self.get(id).and_then(|w| w.previous_taken);
                self.get_mut(c).unwrap().previous_taken = after;
                self.get_mut(id).unwrap().previous_taken = None;
                return;
            }
            cur = next;
        }
    }

    pub fn taken_list(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut cur = self.taken_head;
        while let Some(c) = cur {
            out.push(c);
            cur = self.get(c).and_then(|w| w.previous_taken);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_fill_the_lowest_free_gap() {
        let mut reg = Registry::new();
        let a = reg.insert(Xid(1));
        let b = reg.insert(Xid(2));
        let c = reg.insert(Xid(3));
        assert_eq!(reg.assign_numeric_id(a).unwrap(), 1);
        assert_eq!(reg.assign_numeric_id(b).unwrap(), 2);
        assert_eq!(reg.assign_numeric_id(c).unwrap(), 3);
        reg.destroy(b).unwrap();
        let d = reg.insert(Xid(4));
        assert_eq!(reg.assign_numeric_id(d).unwrap(), 2);
    }

    #[test]
    fn focus_chain_is_cyclic() {
        let mut reg = Registry::new();
        let a = reg.insert(Xid(1));
        let b = reg.insert(Xid(2));
        reg.set_focus_window(a).unwrap();
        reg.set_focus_window(b).unwrap();
        assert_eq!(reg.focused(), Some(b));
        assert_eq!(reg.traverse_focus_chain(b, 1), Some(a));
        assert_eq!(reg.traverse_focus_chain(a, 1), Some(b));
    }

    #[test]
    fn destroy_unlinks_from_every_list() {
        let mut reg = Registry::new();
        let a = reg.insert(Xid(1));
        reg.set_focus_window(a).unwrap();
        reg.set_window_above(a).unwrap();
        reg.push_taken(a);
        reg.destroy(a).unwrap();
        assert_eq!(reg.focused(), None);
        assert_eq!(reg.z_top(), None);
        assert!(reg.taken_list().is_empty());
        assert!(reg.window_of_xid(Xid(1)).is_none());
    }

    #[test]
    fn z_order_traverse_focus_wraps_to_bottom() {
        let mut reg = Registry::new();
        let a = reg.insert(Xid(1));
        let b = reg.insert(Xid(2));
        reg.get_mut(a).unwrap().is_visible = true;
        reg.get_mut(b).unwrap().is_visible = true;
        reg.set_window_above(a).unwrap();
        reg.set_window_above(b).unwrap();
        assert_eq!(reg.traverse_focus(b), Some(a));
    }

    /// Assigned numeric ids never collide among currently live windows,
    /// across an arbitrary interleaving of inserts and destroys (§8 item 6).
    #[quickcheck_macros::quickcheck]
    fn numeric_ids_are_always_unique_among_live_windows(ops: Vec<bool>) -> bool {
        let mut reg = Registry::new();
        let mut live: Vec<WindowId> = Vec::new();
        let mut next_xid = 1u32;

        for insert in ops.into_iter().take(40) {
            if insert || live.is_empty() {
                let id = reg.insert(Xid(next_xid));
                next_xid += 1;
                if reg.assign_numeric_id(id).is_err() {
                    return false;
                }
                live.push(id);
            } else {
                let id = live.remove(0);
                if reg.destroy(id).is_err() {
                    return false;
                }
            }

            let mut seen = std::collections::HashSet::new();
            for &id in &live {
                if let Some(n) = reg.get(id).and_then(|w| w.numeric_id) {
                    if !seen.insert(n) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
