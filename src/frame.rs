//! The per-monitor frame tree: a binary tree of frames, each either split
//! into two children or a leaf holding at most one window.
//!
//! Parent/child links are modelled the same way as the window registry's
//! cross-links (arena-plus-index, see `window::mod`): pure index rewiring
//! instead of intrusive pointers, so split/remove/replace are ordinary
//! mutation of `Vec` slots rather than manual lifetime juggling.
use crate::error::{Error, Result};
use crate::geometry::{Extents, Rect};
use crate::window::WindowId;

/// Stable arena index identifying one frame, internal or leaf.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameId(pub(crate) u32);

/// The axis along which an internal frame's two children are arranged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

enum Content {
    Leaf(Option<WindowId>),
    Split {
        left: FrameId,
        right: FrameId,
        direction: SplitDirection,
    },
}

struct FrameNode {
    parent: Option<FrameId>,
    rect: Rect,
    content: Content,
}

enum Slot {
    Occupied(FrameNode),
    Free { next_free: Option<u32> },
}

/// Owns every frame across every monitor. Monitors hold only the [FrameId]
/// of their root; the arena is the single source of truth for geometry.
#[derive(Default)]
pub struct FrameArena {
    arena: Vec<Slot>,
    free_head: Option<u32>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: FrameNode) -> FrameId {
        match self.free_head.take() {
            Some(idx) => {
                let next_free = match &self.arena[idx as usize] {
                    Slot::Free { next_free } => *next_free,
                    Slot::Occupied(_) => unreachable!(),
                };
                self.free_head = next_free;
                self.arena[idx as usize] = Slot::Occupied(node);
                FrameId(idx)
            }
            None => {
                let idx = self.arena.len() as u32;
                self.arena.push(Slot::Occupied(node));
                FrameId(idx)
            }
        }
    }

    fn free(&mut self, id: FrameId) {
        self.arena[id.0 as usize] = Slot::Free {
            next_free: self.free_head,
        };
        self.free_head = Some(id.0);
    }

    fn node(&self, id: FrameId) -> Option<&FrameNode> {
        match self.arena.get(id.0 as usize)? {
            Slot::Occupied(n) => Some(n),
            Slot::Free { .. } => None,
        }
    }

    fn node_mut(&mut self, id: FrameId) -> Option<&mut FrameNode> {
        match self.arena.get_mut(id.0 as usize)? {
            Slot::Occupied(n) => Some(n),
            Slot::Free { .. } => None,
        }
    }

    fn require(&self, id: FrameId) -> Result<&FrameNode> {
        self.node(id).ok_or(Error::UnknownFrame(id))
    }

    fn require_mut(&mut self, id: FrameId) -> Result<&mut FrameNode> {
        self.node_mut(id).ok_or(Error::UnknownFrame(id))
    }

    /// Create a new, parentless leaf frame: the root of a monitor.
    pub fn new_root(&mut self, rect: Rect) -> FrameId {
        self.alloc(FrameNode {
            parent: None,
            rect,
            content: Content::Leaf(None),
        })
    }

    pub fn rect(&self, id: FrameId) -> Rect {
        self.node(id).map(|n| n.rect).unwrap_or_default()
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn is_leaf(&self, id: FrameId) -> bool {
        matches!(self.node(id).map(|n| &n.content), Some(Content::Leaf(_)))
    }

    pub fn children(&self, id: FrameId) -> Option<(FrameId, FrameId, SplitDirection)> {
        match self.node(id)?.content {
            Content::Split {
                left,
                right,
                direction,
            } => Some((left, right, direction)),
            Content::Leaf(_) => None,
        }
    }

    pub fn window(&self, id: FrameId) -> Option<WindowId> {
        match self.node(id)?.content {
            Content::Leaf(w) => w,
            Content::Split { .. } => None,
        }
    }

    pub fn set_window(&mut self, id: FrameId, window: Option<WindowId>) -> Result<()> {
        match &mut self.require_mut(id)?.content {
            Content::Leaf(w) => {
                *w = window;
                Ok(())
            }
            Content::Split { .. } => Err(Error::OperationInvalid(
                "cannot attach a window to a split frame".into(),
            )),
        }
    }

    pub fn root_of(&self, id: FrameId) -> FrameId {
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            cur = p;
        }
        cur
    }

    /// Collect the leaves of the subtree rooted at `id`, in left-to-right order.
    pub fn leaves(&self, id: FrameId) -> Vec<FrameId> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out);
        out
    }

    fn collect_leaves(&self, id: FrameId, out: &mut Vec<FrameId>) {
        match self.node(id).map(|n| &n.content) {
            Some(Content::Leaf(_)) => out.push(id),
            Some(Content::Split { left, right, .. }) => {
                let (left, right) = (*left, *right);
                self.collect_leaves(left, out);
                self.collect_leaves(right, out);
            }
            None => {}
        }
    }

    /// Find the leaf containing `point`, descending from `root`. `None` if
    /// the point falls outside `root` entirely (a malformed tree).
    pub fn frame_at_point(&self, root: FrameId, point: crate::geometry::Point) -> Option<FrameId> {
        let mut cur = root;
        if !self.rect(cur).contains_point(point) {
            return None;
        }
        loop {
            match self.children(cur) {
                None => return Some(cur),
                Some((left, right, _)) => {
                    if self.rect(left).contains_point(point) {
                        cur = left;
                    } else if self.rect(right).contains_point(point) {
                        cur = right;
                    } else {
                        return None;
                    }
                }
            }
        }
    }

    /// Split a leaf frame into two children along `direction`, moving its
    /// window (if any) into the left child. Returns the new children.
    pub fn split(&mut self, id: FrameId, direction: SplitDirection) -> Result<(FrameId, FrameId)> {
        let (rect, window) = match &self.require(id)?.content {
            Content::Leaf(w) => (self.require(id)?.rect, *w),
            Content::Split { .. } => {
                return Err(Error::OperationInvalid("frame is not a leaf".into()))
            }
        };

        let left = self.alloc(FrameNode {
            parent: Some(id),
            rect,
            content: Content::Leaf(window),
        });
        let right = self.alloc(FrameNode {
            parent: Some(id),
            rect,
            content: Content::Leaf(None),
        });

        self.require_mut(id)?.content = Content::Split {
            left,
            right,
            direction,
        };
        self.resize(id, rect)?;
        Ok((left, right))
    }

    /// Remove `frame`, transplanting its sibling's content into their shared
    /// parent. Returns the window that was vacated, if any, so the caller
    /// can push it onto the taken list.
    pub fn remove(&mut self, frame: FrameId) -> Result<Option<WindowId>> {
        let parent = self
            .parent(frame)
            .ok_or_else(|| Error::OperationInvalid("cannot remove the monitor root frame".into()))?;

        let (left, right) = match self.children(parent) {
            Some((l, r, _)) => (l, r),
            None => unreachable!("parent of a frame is always a split"),
        };
        let sibling = if left == frame { right } else { left };

        let vacated = self.leaves(frame).into_iter().find_map(|l| self.window(l));

        self.replace(parent, sibling)?;
        self.free(frame);
        self.free(sibling);
        Ok(vacated)
    }

    /// Transplant `src`'s content (children or window) into `dst`, clearing
    /// `src`, then recompute geometry for the affected subtree.
    pub fn replace(&mut self, dst: FrameId, src: FrameId) -> Result<()> {
        let src_content = match &self.require(src)?.content {
            Content::Split {
                left,
                right,
                direction,
            } => Content::Split {
                left: *left,
                right: *right,
                direction: *direction,
            },
            Content::Leaf(w) => Content::Leaf(*w),
        };

        if let Content::Split { left, right, .. } = &src_content {
            self.require_mut(*left)?.parent = Some(dst);
            self.require_mut(*right)?.parent = Some(dst);
        }

        self.require_mut(dst)?.content = src_content;
        self.require_mut(src)?.content = Content::Leaf(None);

        let rect = self.rect(dst);
        self.resize(dst, rect)
    }

    /// Update this frame's geometry, partitioning it into its children
    /// (preserving their previous size ratio along the split axis, or an
    /// even 1/2 split if either child had collapsed to zero extent).
    pub fn resize(&mut self, id: FrameId, rect: Rect) -> Result<()> {
        self.require_mut(id)?.rect = rect;

        let Some((left, right, direction)) = self.children(id) else {
            return Ok(());
        };

        match direction {
            SplitDirection::Horizontal => {
                let (lw, rw) = (self.rect(left).w, self.rect(right).w);
                let left_w = if lw == 0 || rw == 0 {
                    rect.w / 2
                } else {
                    (rect.w as u64 * lw as u64 / (lw as u64 + rw as u64)) as u32
                };
                self.resize(left, Rect::new(rect.x, rect.y, left_w, rect.h))?;
                self.resize(
                    right,
                    Rect::new(rect.x + left_w as i32, rect.y, rect.w - left_w, rect.h),
                )?;
            }
            SplitDirection::Vertical => {
                let (lh, rh) = (self.rect(left).h, self.rect(right).h);
                let left_h = if lh == 0 || rh == 0 {
                    rect.h / 2
                } else {
                    (rect.h as u64 * lh as u64 / (lh as u64 + rh as u64)) as u32
                };
                self.resize(left, Rect::new(rect.x, rect.y, rect.w, left_h))?;
                self.resize(
                    right,
                    Rect::new(rect.x, rect.y + left_h as i32, rect.w, rect.h - left_h),
                )?;
            }
        }
        Ok(())
    }

    /// Compute the gap extents a leaf applies to its contained window: each
    /// side uses the configured outer gap if that edge coincides with the
    /// *root* frame's edge, else the inner gap of the opposite axis.
    pub fn gaps(&self, id: FrameId, inner: Extents, outer: Extents) -> Extents {
        let root = self.rect(self.root_of(id));
        let r = self.rect(id);

        Extents {
            left: if root.x == r.x { outer.left } else { inner.right },
            top: if root.y == r.y { outer.top } else { inner.bottom },
            right: if root.x + root.w as i32 == r.x + r.w as i32 {
                outer.right
            } else {
                inner.left
            },
            bottom: if root.y + root.h as i32 == r.y + r.h as i32 {
                outer.bottom
            } else {
                inner.top
            },
        }
    }

    /// Release every frame in the subtree rooted at `id` back to the free
    /// list. Used when a monitor is unplugged and no surviving monitor
    /// adopts its tree (§4.5 step 3).
    pub fn free_subtree(&mut self, id: FrameId) {
        if let Some((left, right, _)) = self.children(id) {
            self.free_subtree(left);
            self.free_subtree(right);
        }
        self.free(id);
    }

    /// `true` if the subtree rooted at `id` exactly partitions `id`'s own
    /// rectangle without overlap. Used by property tests.
    pub fn partitions_without_overlap(&self, id: FrameId) -> bool {
        let leaves = self.leaves(id);
        for (i, &a) in leaves.iter().enumerate() {
            for &b in &leaves[i + 1..] {
                if self.rect(a).overlap_area(&self.rect(b)) != 0 {
                    return false;
                }
            }
        }
        let total: u64 = leaves.iter().map(|l| self.rect(*l).w as u64 * self.rect(*l).h as u64).sum();
        let whole = self.rect(id);
        total == whole.w as u64 * whole.h as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_then_remove_is_identity() {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 800, 600));
        let w = WindowId(1);
        arena.set_window(root, Some(w)).unwrap();

        let (left, right) = arena.split(root, SplitDirection::Horizontal).unwrap();
        assert_eq!(arena.rect(left), Rect::new(0, 0, 400, 600));
        assert_eq!(arena.rect(right), Rect::new(400, 0, 400, 600));
        assert_eq!(arena.window(left), Some(w));

        arena.remove(right).unwrap();
        assert!(arena.is_leaf(root));
        assert_eq!(arena.rect(root), Rect::new(0, 0, 800, 600));
        assert_eq!(arena.window(root), Some(w));
    }

    #[test]
    fn remove_root_is_an_error() {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 800, 600));
        assert!(arena.remove(root).is_err());
    }

    #[test]
    fn resize_preserves_child_ratio() {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 300, 600));
        let (left, right) = arena.split(root, SplitDirection::Horizontal).unwrap();
        assert_eq!(arena.rect(left).w, 150);
        assert_eq!(arena.rect(right).w, 150);

        arena.resize(root, Rect::new(0, 0, 900, 600)).unwrap();
        assert_eq!(arena.rect(left).w, 450);
        assert_eq!(arena.rect(right).w, 450);
    }

    #[test]
    fn gaps_use_outer_only_at_root_edges() {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 800, 600));
        let (left, right) = arena.split(root, SplitDirection::Horizontal).unwrap();
        let inner = Extents::uniform(4);
        let outer = Extents::uniform(10);

        let lg = arena.gaps(left, inner, outer);
        assert_eq!(lg.left, 10);
        assert_eq!(lg.right, 4);

        let rg = arena.gaps(right, inner, outer);
        assert_eq!(rg.left, 4);
        assert_eq!(rg.right, 10);
    }

    #[test]
    fn tree_partitions_root_without_overlap() {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 800, 600));
        let (_, right) = arena.split(root, SplitDirection::Horizontal).unwrap();
        arena.split(right, SplitDirection::Vertical).unwrap();
        assert!(arena.partitions_without_overlap(root));
    }

    /// Any sequence of splits on any leaf still tiles the root rect exactly,
    /// with no two leaves overlapping (§8 item 3).
    #[quickcheck_macros::quickcheck]
    fn arbitrary_split_sequence_partitions_without_overlap(directions: Vec<bool>) -> bool {
        let mut arena = FrameArena::new();
        let root = arena.new_root(Rect::new(0, 0, 1920, 1080));
        let mut leaves = vec![root];
        for horizontal in directions.into_iter().take(12) {
            let Some(target) = leaves.pop() else { break };
            let direction = if horizontal { SplitDirection::Horizontal } else { SplitDirection::Vertical };
            match arena.split(target, direction) {
                Ok((left, right)) => {
                    leaves.push(left);
                    leaves.push(right);
                }
                Err(_) => leaves.push(target),
            }
        }
        arena.partitions_without_overlap(root)
    }
}
