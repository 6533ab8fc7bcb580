//! Named monitors, each owning exactly one per-monitor frame tree, and the
//! RandR hot-plug merge algorithm that keeps tree ownership stable across
//! reconfiguration.
use crate::frame::FrameArena;
use crate::frame::FrameId;
use crate::geometry::{Extents, Point, Rect};
use crate::window::WindowId;

/// The synthetic monitor synthesized when RandR reports no outputs at all.
pub const VIRTUAL_MONITOR_NAME: &str = "#Virtual";

/// A named output: position, size, accumulated strut reservations, and the
/// one frame tree it owns.
#[derive(Debug)]
pub struct Monitor {
    pub name: String,
    pub rect: Rect,
    pub struts: Extents,
    pub is_primary: bool,
    pub root_frame: FrameId,
}

impl Monitor {
    pub fn work_area(&self) -> Rect {
        self.struts.apply_inward(self.rect)
    }
}

/// One output as reported by a RandR query, before it is reconciled against
/// existing monitor ownership.
#[derive(Debug, Clone)]
pub struct MonitorInput {
    pub name: String,
    pub rect: Rect,
    pub is_primary: bool,
}

/// The outcome of a [MonitorSet::merge] call.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Windows that were in an abandoned monitor's tree and must be pushed
    /// onto the taken list.
    pub abandoned_windows: Vec<WindowId>,
    /// Set if the previous focus frame belonged to an abandoned monitor; the
    /// caller should refocus the primary monitor's root frame.
    pub focus_frame_abandoned: bool,
}

/// The live set of monitors. Ownership of each monitor's frame tree survives
/// a merge whenever its name is still present in the new RandR snapshot.
#[derive(Default)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
}

impl MonitorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monitor> {
        self.monitors.iter_mut()
    }

    pub fn by_name(&self, name: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.name == name)
    }

    /// The RandR-flagged primary monitor, or the first monitor if none is
    /// flagged (e.g. right after the synthetic virtual monitor is created).
    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| self.monitors.first())
    }

    pub fn monitor_containing(&self, p: Point) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.rect.contains_point(p))
            .or_else(|| self.primary())
    }

    fn monitor_containing_index(&self, p: Point) -> Option<usize> {
        self.monitors
            .iter()
            .position(|m| m.rect.contains_point(p))
    }

    /// Reconcile `incoming` against the current monitor list:
    ///
    /// 1. An empty `incoming` synthesizes one virtual monitor covering
    ///    `fallback_rect`.
    /// 2. Monitors whose name survives adopt their old root frame unchanged.
    /// 3. Old monitors whose name did not survive donate their frame to a
    ///    same-slot-count new monitor that needs one; any leftover is
    ///    abandoned and its windows returned for the taken list.
    pub fn merge(
        &mut self,
        mut incoming: Vec<MonitorInput>,
        frames: &mut FrameArena,
        current_focus_frame: FrameId,
        fallback_rect: Rect,
    ) -> (MergeOutcome, Option<FrameId>) {
        if incoming.is_empty() {
            incoming.push(MonitorInput {
                name: VIRTUAL_MONITOR_NAME.to_string(),
                rect: fallback_rect,
                is_primary: true,
            });
        }

        let mut old = std::mem::take(&mut self.monitors);
        let mut needs_frame: Vec<usize> = Vec::new();
        let mut new_monitors: Vec<Option<Monitor>> = Vec::with_capacity(incoming.len());

        for input in &incoming {
            if let Some(pos) = old.iter().position(|m| m.name == input.name) {
                let mut adopted = old.remove(pos);
                adopted.rect = input.rect;
                adopted.is_primary = input.is_primary;
                frames.resize(adopted.root_frame, adopted.work_area()).ok();
                new_monitors.push(Some(adopted));
            } else {
                new_monitors.push(None);
                needs_frame.push(new_monitors.len() - 1);
            }
        }

        let mut outcome = MergeOutcome::default();
        let current_focus_root = current_focus_frame_root(frames, current_focus_frame);

        for old_monitor in old {
            let owned_current_focus = current_focus_root == old_monitor.root_frame;

            if let Some(slot) = needs_frame.pop() {
                let rect = incoming[slot].rect;
                frames.resize(old_monitor.root_frame, rect).ok();
                new_monitors[slot] = Some(Monitor {
                    name: incoming[slot].name.clone(),
                    rect,
                    struts: Extents::default(),
                    is_primary: incoming[slot].is_primary,
                    root_frame: old_monitor.root_frame,
                });
            } else {
                outcome
                    .abandoned_windows
                    .extend(frames.leaves(old_monitor.root_frame).into_iter().filter_map(|l| frames.window(l)));
                if owned_current_focus {
                    outcome.focus_frame_abandoned = true;
                }
                frames.free_subtree(old_monitor.root_frame);
            }
        }

        for slot in needs_frame {
            let rect = incoming[slot].rect;
            let root = frames.new_root(rect);
            new_monitors[slot] = Some(Monitor {
                name: incoming[slot].name.clone(),
                rect,
                struts: Extents::default(),
                is_primary: incoming[slot].is_primary,
                root_frame: root,
            });
        }

        self.monitors = new_monitors.into_iter().map(|m| m.expect("every slot filled")).collect();

        let new_focus = if outcome.focus_frame_abandoned {
            self.primary().map(|m| m.root_frame)
        } else {
            None
        };

        (outcome, new_focus)
    }

    /// Zero every monitor's struts, re-attribute each visible window's strut
    /// to the monitor containing it, then resize each monitor's root frame
    /// to the resulting work area.
    pub fn reconfigure_frame_sizes(&mut self, frames: &mut FrameArena, window_struts: &[(Rect, Extents)]) {
        for m in &mut self.monitors {
            m.struts = Extents::default();
        }
        for &(wrect, strut) in window_struts {
            if strut == Extents::default() {
                continue;
            }
            if let Some(idx) = self.monitor_containing_index(wrect.midpoint()) {
                let m = &mut self.monitors[idx];
                m.struts.left = m.struts.left.saturating_add(strut.left);
                m.struts.top = m.struts.top.saturating_add(strut.top);
                m.struts.right = m.struts.right.saturating_add(strut.right);
                m.struts.bottom = m.struts.bottom.saturating_add(strut.bottom);
            }
        }
        for m in &self.monitors {
            frames.resize(m.root_frame, m.work_area()).ok();
        }
    }
}

fn current_focus_frame_root(frames: &FrameArena, focus_frame: FrameId) -> FrameId {
    frames.root_of(focus_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SplitDirection;

    fn input(name: &str, rect: Rect, primary: bool) -> MonitorInput {
        MonitorInput {
            name: name.to_string(),
            rect,
            is_primary: primary,
        }
    }

    #[test]
    fn hotplug_preserves_surviving_monitor_tree_and_abandons_the_rest() {
        let mut frames = FrameArena::new();
        let mut set = MonitorSet::new();

        let (outcome, _) = set.merge(
            vec![
                input("A", Rect::new(0, 0, 1920, 1080), true),
                input("B", Rect::new(1920, 0, 1920, 1080), false),
            ],
            &mut frames,
            FrameId(0),
            Rect::new(0, 0, 1920, 1080),
        );
        assert!(outcome.abandoned_windows.is_empty());

        let a_root = set.by_name("A").unwrap().root_frame;
        let (left_a, _right_a) = frames.split(a_root, SplitDirection::Horizontal).unwrap();
        let b_root = set.by_name("B").unwrap().root_frame;
        let (left_b, _) = frames.split(b_root, SplitDirection::Vertical).unwrap();
        frames.set_window(left_b, Some(WindowId(9))).unwrap();

        // second merge: only "A" survives
        let (outcome, new_focus) = set.merge(
            vec![input("A", Rect::new(0, 0, 1920, 1080), true)],
            &mut frames,
            a_root,
            Rect::new(0, 0, 1920, 1080),
        );
        assert_eq!(outcome.abandoned_windows, vec![WindowId(9)]);
        assert!(new_focus.is_none());
        assert_eq!(set.by_name("A").unwrap().root_frame, a_root);
        assert!(frames.is_leaf(left_a));

        // third merge: "A" and new "C" -- C should receive nothing (no
        // abandoned tree left to adopt since "B" was already dropped), but
        // must still end up with a valid root frame of its own.
        let (_outcome, _) = set.merge(
            vec![
                input("A", Rect::new(0, 0, 1920, 1080), true),
                input("C", Rect::new(1920, 0, 1920, 1080), false),
            ],
            &mut frames,
            a_root,
            Rect::new(0, 0, 1920, 1080),
        );
        assert_eq!(set.by_name("A").unwrap().root_frame, a_root);
        assert!(set.by_name("C").is_some());
    }

    #[test]
    fn empty_randr_snapshot_synthesizes_virtual_monitor() {
        let mut frames = FrameArena::new();
        let mut set = MonitorSet::new();
        set.merge(vec![], &mut frames, FrameId(0), Rect::new(0, 0, 1024, 768));
        assert_eq!(set.by_name(VIRTUAL_MONITOR_NAME).unwrap().rect, Rect::new(0, 0, 1024, 768));
    }
}
