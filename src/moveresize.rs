//! The interactive move/resize state machine: at most one active drag,
//! cancellable by a cancel message, a fresh press, or the target unmapping.
use crate::geometry::{Point, Rect};
use crate::window::WindowId;

/// The window minimum extent, matching the C original's `WINDOW_MINIMUM_SIZE`.
pub const WINDOW_MINIMUM_SIZE: u32 = 4;
/// Upper bound on a window's width or height; guards against runaway resizes.
pub const WINDOW_MAXIMUM_SIZE: u32 = 1_000_000;
/// Minimum pixels of a window that must remain within some monitor.
pub const WINDOW_MINIMUM_VISIBLE_SIZE: u32 = 8;

/// Which edge/corner is being dragged, or a plain translation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Move,
}

/// The single in-flight drag.
#[derive(Debug, Clone, Copy)]
pub struct Active {
    pub window: WindowId,
    pub direction: Direction,
    pub initial: Rect,
    pub anchor: Point,
}

/// The move/resize state machine: either idle, or tracking one active drag.
#[derive(Debug, Default)]
pub enum MoveResize {
    #[default]
    Idle,
    Active(Active),
}

impl MoveResize {
    /// Begin a new drag. If one was already active, it is cancelled first and
    /// its restore geometry is returned alongside the newly started drag.
    pub fn start(
        &mut self,
        window: WindowId,
        direction: Direction,
        initial: Rect,
        anchor: Point,
    ) -> Option<(WindowId, Rect)> {
        let restore = self.cancel();
        *self = MoveResize::Active(Active {
            window,
            direction,
            initial,
            anchor,
        });
        restore
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MoveResize::Active(_))
    }

    pub fn active_window(&self) -> Option<WindowId> {
        match self {
            MoveResize::Active(a) => Some(a.window),
            MoveResize::Idle => None,
        }
    }

    /// Compute the geometry a motion event to `pointer` would produce,
    /// without committing any state transition.
    pub fn motion(&self, pointer: Point) -> Option<(WindowId, Rect)> {
        match self {
            MoveResize::Active(a) => Some((a.window, apply_delta(a.initial, a.anchor, pointer, a.direction))),
            MoveResize::Idle => None,
        }
    }

    /// End the drag on button release, committing whatever geometry is
    /// currently applied. Returns the window that was released.
    pub fn release(&mut self) -> Option<WindowId> {
        match std::mem::take(self) {
            MoveResize::Active(a) => Some(a.window),
            MoveResize::Idle => None,
        }
    }

    /// Cancel the active drag, if any, returning `(window, initial_geometry)`
    /// so the caller can restore it.
    pub fn cancel(&mut self) -> Option<(WindowId, Rect)> {
        match std::mem::take(self) {
            MoveResize::Active(a) => Some((a.window, a.initial)),
            MoveResize::Idle => None,
        }
    }

    /// Cancel if `window` is the active drag's target (its X window vanished).
    pub fn cancel_if_target(&mut self, window: WindowId) -> bool {
        if self.active_window() == Some(window) {
            *self = MoveResize::Idle;
            true
        } else {
            false
        }
    }
}

/// Apply a drag's accumulated pointer delta to its initial geometry.
fn apply_delta(initial: Rect, anchor: Point, pointer: Point, direction: Direction) -> Rect {
    let dx = (pointer.x - anchor.x) as i64;
    let dy = (pointer.y - anchor.y) as i64;

    let mut r = initial;
    use Direction::*;
    if matches!(direction, Move) {
        r.x = initial.x + dx as i32;
        r.y = initial.y + dy as i32;
        return r;
    }
    if matches!(direction, West | NorthWest | SouthWest) {
        let new_w = (initial.w as i64 - dx).max(0);
        r.x = initial.x + (initial.w as i64 - new_w) as i32;
        r.w = new_w as u32;
    }
    if matches!(direction, East | NorthEast | SouthEast) {
        r.w = (initial.w as i64 + dx).max(0) as u32;
    }
    if matches!(direction, North | NorthWest | NorthEast) {
        let new_h = (initial.h as i64 - dy).max(0);
        r.y = initial.y + (initial.h as i64 - new_h) as i32;
        r.h = new_h as u32;
    }
    if matches!(direction, South | SouthWest | SouthEast) {
        r.h = (initial.h as i64 + dy).max(0) as u32;
    }
    r
}

/// Clamp a candidate size to `[WINDOW_MINIMUM_SIZE, WINDOW_MAXIMUM_SIZE]`.
pub fn clamp_size(w: u32, h: u32) -> (u32, u32) {
    (
        w.clamp(WINDOW_MINIMUM_SIZE, WINDOW_MAXIMUM_SIZE),
        h.clamp(WINDOW_MINIMUM_SIZE, WINDOW_MAXIMUM_SIZE),
    )
}

/// Nudge `rect`'s position so that at least [WINDOW_MINIMUM_VISIBLE_SIZE]
/// pixels overlap the monitor `rect` overlaps best.
pub fn ensure_minimum_visible(rect: Rect, monitors: &[Rect]) -> Rect {
    let Some(best) = monitors.iter().max_by_key(|m| rect.overlap_area(m)) else {
        return rect;
    };
    let visible = WINDOW_MINIMUM_VISIBLE_SIZE as i32;

    let lo_x = best.x - rect.w as i32 + visible;
    let hi_x = best.x + best.w as i32 - visible;
    let (lo_x, hi_x) = (lo_x.min(hi_x), lo_x.max(hi_x));

    let lo_y = best.y - rect.h as i32 + visible;
    let hi_y = best.y + best.h as i32 - visible;
    let (lo_y, hi_y) = (lo_y.min(hi_y), lo_y.max(hi_y));

    Rect {
        x: rect.x.clamp(lo_x, hi_x),
        y: rect.y.clamp(lo_y, hi_y),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w() -> WindowId {
        crate::window::WindowId(1)
    }

    #[test]
    fn move_translates_origin_only() {
        let initial = Rect::new(100, 100, 400, 300);
        let r = apply_delta(initial, Point::new(0, 0), Point::new(200, 50), Direction::Move);
        assert_eq!(r, Rect::new(300, 150, 400, 300));
    }

    #[test]
    fn south_east_resize_grows_from_fixed_origin() {
        let initial = Rect::new(0, 0, 100, 100);
        let r = apply_delta(initial, Point::new(0, 0), Point::new(20, 30), Direction::SouthEast);
        assert_eq!(r, Rect::new(0, 0, 120, 130));
    }

    #[test]
    fn north_west_resize_moves_origin_and_shrinks() {
        let initial = Rect::new(100, 100, 200, 200);
        let r = apply_delta(initial, Point::new(0, 0), Point::new(20, 20), Direction::NorthWest);
        assert_eq!(r, Rect::new(120, 120, 180, 180));
    }

    #[test]
    fn cancel_restores_initial_geometry() {
        let mut sm = MoveResize::default();
        let initial = Rect::new(100, 100, 400, 300);
        sm.start(w(), Direction::Move, initial, Point::new(0, 0));
        sm.motion(Point::new(200, 50));
        let (window, restore) = sm.cancel().unwrap();
        assert_eq!(window, w());
        assert_eq!(restore, initial);
        assert!(!sm.is_active());
    }

    #[test]
    fn a_fresh_press_while_active_restores_the_previous_drag() {
        let mut sm = MoveResize::default();
        let first = Rect::new(0, 0, 100, 100);
        sm.start(w(), Direction::Move, first, Point::new(0, 0));
        let restore = sm.start(w(), Direction::Move, Rect::new(50, 50, 10, 10), Point::new(0, 0));
        assert_eq!(restore, Some((w(), first)));
    }
}
