//! Geometry primitives shared by the window registry, frame tree and monitor set.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An x,y coordinate pair relative to the root window.
///
/// Signed so that secondary monitors placed to the left of or above the
/// primary monitor (a negative-origin RandR layout) can be represented.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// Absolute x coordinate
    pub x: i32,
    /// Absolute y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new [Point].
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A rectangular region: top left corner plus extent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    /// x-coordinate of the top left corner
    pub x: i32,
    /// y-coordinate of the top left corner
    pub y: i32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl Rect {
    /// Create a new [Rect].
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// The top left corner of this rect.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The midpoint of this rectangle.
    pub fn midpoint(&self) -> Point {
        Point::new(self.x + self.w as i32 / 2, self.y + self.h as i32 / 2)
    }

    /// `true` if `p` lies within this rect: `x in [x, x+w)` and `y in [y, y+h)`.
    ///
    /// This is the corrected form of the C original's self-contradictory
    /// `is_point_in_frame` (see spec §9 source ambiguities): the bug subtracted
    /// width from x and then compared `x < x`, which can never hold.
    pub fn contains_point<P: Into<Point>>(&self, p: P) -> bool {
        let p = p.into();
        p.x >= self.x && p.x < self.x + self.w as i32 && p.y >= self.y && p.y < self.y + self.h as i32
    }

    /// Center this rect inside of `enclosing`. Returns `None` if it can't fit.
    pub fn centered_in(&self, enclosing: &Rect) -> Option<Self> {
        if self.w > enclosing.w || self.h > enclosing.h {
            return None;
        }
        Some(Self {
            x: enclosing.x + (enclosing.w as i32 - self.w as i32) / 2,
            y: enclosing.y + (enclosing.h as i32 - self.h as i32) / 2,
            ..*self
        })
    }

    /// Shrink this rect by `border` pixels uniformly on every side. Clamps to a
    /// zero-size rect rather than underflowing if `border` exceeds the extent.
    pub fn shrink(&self, border: u32) -> Self {
        let dw = border.saturating_mul(2);
        Self {
            x: self.x + border as i32,
            y: self.y + border as i32,
            w: self.w.saturating_sub(dw),
            h: self.h.saturating_sub(dw),
        }
    }

    /// `true` if `other` overlaps this rect by at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w as i32
            && other.x < self.x + self.w as i32
            && self.y < other.y + other.h as i32
            && other.y < self.y + self.h as i32
    }

    /// The area of overlap between this rect and `other`, in pixels.
    pub fn overlap_area(&self, other: &Rect) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        let x0 = self.x.max(other.x);
        let x1 = (self.x + self.w as i32).min(other.x + other.w as i32);
        let y0 = self.y.max(other.y);
        let y1 = (self.y + self.h as i32).min(other.y + other.h as i32);
        (x1 - x0) as u32 * (y1 - y0) as u32
    }
}

/// Pixel reservation on each of the four sides of a rect: gaps, struts and
/// Motif-style borders are all expressed with this shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Extents {
    /// Reservation on the left edge
    pub left: u32,
    /// Reservation on the top edge
    pub top: u32,
    /// Reservation on the right edge
    pub right: u32,
    /// Reservation on the bottom edge
    pub bottom: u32,
}

impl Extents {
    /// Construct an [Extents] with the same value on every side.
    pub fn uniform(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    /// Apply this extents as an inward reservation: shrink `r` by `self` on
    /// each side, clamping at zero once a side's reservation would exceed
    /// the rect's remaining extent along that axis.
    pub fn apply_inward(&self, r: Rect) -> Rect {
        let width_used = self.left + self.right;
        let height_used = self.top + self.bottom;
        Rect {
            x: r.x + self.left as i32,
            y: r.y + self.top as i32,
            w: if width_used > 0 && r.w < width_used {
                0
            } else {
                r.w - width_used
            },
            h: if height_used > 0 && r.h < height_used {
                0
            } else {
                r.h - height_used
            },
        }
    }
}

/// ICCCM `WM_SIZE_HINTS` window gravity: which anchor point of the window a
/// resize should keep fixed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowGravity {
    /// No gravity hint was set; the top left corner is the anchor
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    /// Static: the window content's origin (ignoring the border) is the anchor
    Static,
}

impl Default for WindowGravity {
    fn default() -> Self {
        Self::NorthWest
    }
}

/// Adjust `(x, y)` so that resizing from `old_size` to `new_size` keeps the
/// point indicated by `gravity` fixed on screen, per ICCCM `P_WIN_GRAVITY`.
///
/// Grounded in `window_state.c`'s `adjust_for_window_gravity`: only the
/// origin moves, the caller is expected to already have `new_size` chosen.
pub fn adjust_for_window_gravity(
    gravity: WindowGravity,
    x: i32,
    y: i32,
    old_size: (u32, u32),
    new_size: (u32, u32),
) -> (i32, i32) {
    let dw = new_size.0 as i32 - old_size.0 as i32;
    let dh = new_size.1 as i32 - old_size.1 as i32;

    use WindowGravity::*;
    let (fx, fy) = match gravity {
        NorthWest | North | NorthEast => (0, 0),
        West | Center | East => (0, 1),
        SouthWest | South | SouthEast => (0, 2),
        Static => (0, 0),
    };
    let (hx, _) = match gravity {
        NorthWest | West | SouthWest => (0, 0),
        North | Center | South => (1, 0),
        NorthEast | East | SouthEast => (2, 0),
        Static => (0, 0),
    };

    let _ = fy; // silence unused warnings from the match arms above sharing shape
    let new_x = x - (hx * dw) / 2;
    let new_y = y - (fx * dh) / 2;
    (new_x, new_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point((0, 0)));
        assert!(r.contains_point((9, 9)));
        assert!(!r.contains_point((10, 10)));
        assert!(!r.contains_point((-1, 0)));
    }

    #[test]
    fn extents_apply_inward_clamps_to_zero() {
        let r = Rect::new(0, 0, 10, 10);
        let e = Extents::uniform(20);
        let out = e.apply_inward(r);
        assert_eq!(out.w, 0);
        assert_eq!(out.h, 0);
    }

    #[test]
    fn centered_in_respects_enclosing_bounds() {
        let inner = Rect::new(0, 0, 100, 50);
        let outer = Rect::new(0, 0, 800, 600);
        let c = inner.centered_in(&outer).unwrap();
        assert_eq!(c.x, 350);
        assert_eq!(c.y, 275);
    }

    #[test]
    fn overlap_area_of_disjoint_rects_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert_eq!(a.overlap_area(&b), 0);
    }
}
