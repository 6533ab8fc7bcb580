//! The focus manager: exactly one focused window and one focused frame per
//! process, kept in sync with the X input focus and the border colour.
use crate::error::Result;
use crate::frame::{FrameArena, FrameId};
use crate::geometry::Point;
use crate::window::{Registry, WindowId, Xid};
use crate::x::XConn;

/// Owns the single `focus_frame` pointer and the X id of the fallback
/// utility window focus reverts to when no managed window is focused.
pub struct FocusManager {
    pub focus_frame: FrameId,
    fallback_focus: Xid,
}

impl FocusManager {
    pub fn new(focus_frame: FrameId, fallback_focus: Xid) -> Self {
        Self {
            focus_frame,
            fallback_focus,
        }
    }

    /// The X id of the utility window focus reverts to when no managed
    /// window is focused.
    pub fn fallback_focus(&self) -> Xid {
        self.fallback_focus
    }

    /// Set the X input focus to `window` (or the fallback utility window),
    /// paint its border with `focused_border`, and move it to the front of
    /// the registry's focus chain.
    pub fn set_focus_window<X: XConn>(
        &mut self,
        x: &mut X,
        registry: &mut Registry,
        window: Option<WindowId>,
        focused_border: u32,
    ) -> Result<()> {
        match window {
            Some(id) => {
                let xid = registry.require_xid(id)?;
                x.set_input_focus(Some(xid))?;
                x.set_border_color(xid, focused_border)?;
                registry.set_focus_window(id)?;
            }
            None => {
                x.set_input_focus(Some(self.fallback_focus))?;
            }
        }
        Ok(())
    }

    /// Focus `window`. If it inhabits a frame, that frame becomes the focus
    /// frame too (mirroring the focused frame following the focused window);
    /// otherwise only the window focus changes.
    pub fn set_focus_window_with_frame<X: XConn>(
        &mut self,
        x: &mut X,
        registry: &mut Registry,
        frames: &FrameArena,
        window: Option<WindowId>,
        focused_border: u32,
    ) -> Result<()> {
        let Some(id) = window else {
            return self.set_focus_window(x, registry, None, focused_border);
        };
        if frames.window(self.focus_frame) == Some(id) {
            return self.set_focus_window(x, registry, Some(id), focused_border);
        }
        match frame_holding_window(frames, self.focus_frame, id) {
            Some(frame) => self.set_focus_frame(x, registry, frames, frame, focused_border),
            None => self.set_focus_window(x, registry, Some(id), focused_border),
        }
    }

    /// Make `frame` the focus frame and focus whatever window it holds, if any.
    pub fn set_focus_frame<X: XConn>(
        &mut self,
        x: &mut X,
        registry: &mut Registry,
        frames: &FrameArena,
        frame: FrameId,
        focused_border: u32,
    ) -> Result<()> {
        self.set_focus_window(x, registry, frames.window(frame), focused_border)?;
        self.focus_frame = frame;
        Ok(())
    }

    /// Move to the next visible window above in Z-order, wrapping to the
    /// bottom-most visible window if none is above.
    pub fn traverse_focus<X: XConn>(
        &mut self,
        x: &mut X,
        registry: &mut Registry,
        frames: &FrameArena,
        focused_border: u32,
    ) -> Result<()> {
        let Some(current) = registry.focused() else {
            return Ok(());
        };
        if let Some(next) = registry.traverse_focus(current) {
            self.set_focus_window_with_frame(x, registry, frames, Some(next), focused_border)?;
        }
        Ok(())
    }

    /// Walk the cyclic focus chain by `steps` (negative walks backward).
    pub fn traverse_focus_chain<X: XConn>(
        &mut self,
        x: &mut X,
        registry: &mut Registry,
        frames: &FrameArena,
        steps: i32,
        focused_border: u32,
    ) -> Result<()> {
        let Some(current) = registry.focused() else {
            return Ok(());
        };
        if let Some(next) = registry.traverse_focus_chain(current, steps) {
            self.set_focus_window_with_frame(x, registry, frames, Some(next), focused_border)?;
        }
        Ok(())
    }
}

/// Find the leaf frame of the monitor tree rooted at `root` that holds
/// `window`, if any.
pub fn frame_holding_window(frames: &FrameArena, root: FrameId, window: WindowId) -> Option<FrameId> {
    let top = frames.root_of(root);
    frames.leaves(top).into_iter().find(|&l| frames.window(l) == Some(window))
}

/// Find the frame adjacent to `from` just past the given edge point, used by
/// the `MOVE-{UP,LEFT,RIGHT,DOWN}` actions.
pub fn frame_at_adjacent_point(frames: &FrameArena, root: FrameId, point: Point) -> Option<FrameId> {
    frames.frame_at_point(frames.root_of(root), point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SplitDirection;
    use crate::geometry::Rect;
    use crate::x::mock::StubXConn;

    #[test]
    fn focusing_a_window_follows_it_into_its_frame() {
        let mut frames = FrameArena::new();
        let root = frames.new_root(Rect::new(0, 0, 800, 600));
        let (left, right) = frames.split(root, SplitDirection::Horizontal).unwrap();
        let mut registry = Registry::new();
        let w = registry.insert(Xid(1));
        frames.set_window(right, Some(w)).unwrap();

        let mut x = StubXConn;
        let mut focus = FocusManager::new(left, Xid(0));
        focus.set_focus_window_with_frame(&mut x, &mut registry, &frames, Some(w), 0).unwrap();
        assert_eq!(focus.focus_frame, right);
        assert_eq!(registry.focused(), Some(w));
    }

    #[test]
    fn traverse_focus_wraps_through_registry() {
        let mut frames = FrameArena::new();
        let root = frames.new_root(Rect::new(0, 0, 800, 600));
        let mut registry = Registry::new();
        let a = registry.insert(Xid(1));
        let b = registry.insert(Xid(2));
        registry.get_mut(a).unwrap().is_visible = true;
        registry.get_mut(b).unwrap().is_visible = true;
        registry.set_window_above(a).unwrap();
        registry.set_window_above(b).unwrap();
        registry.set_focus_window(b).unwrap();

        let mut x = StubXConn;
        let mut focus = FocusManager::new(root, Xid(0));
        focus.traverse_focus(&mut x, &mut registry, &frames, 0).unwrap();
        assert_eq!(registry.focused(), Some(a));
    }
}
