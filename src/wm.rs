//! The aggregate orchestrator: owns every other module's state and drives
//! the single-threaded event loop (§4.9, §5).
use std::time::{Duration, Instant};

use crate::action::{Action, ActionCode, Value};
use crate::bindings::ModifierSet;
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::ewmh;
use crate::focus::{self, FocusManager};
use crate::frame::{FrameArena, FrameId, SplitDirection};
use crate::geometry::{Point, Rect};
use crate::monitor::MonitorSet;
use crate::moveresize::{self, MoveResize};
use crate::shell;
use crate::ui::{Notifier, WindowPicker};
use crate::window::mode::{self, WindowMode};
use crate::window::{Registry, WindowId, Xid};
use crate::x::event::{ClientMessage, PropertyUpdate};
use crate::x::{XConn, XConnExt, XEvent};

use tracing::{debug, trace, warn};

/// A second `CLOSE-WINDOW` within this many seconds of the first escalates
/// from the polite `WM_DELETE_WINDOW` message to `KillClient`.
pub const REQUEST_CLOSE_MAX_DURATION: Duration = Duration::from_secs(3);

/// Owns every piece of window-manager state and the X connection itself,
/// the way the teacher's `WindowManager<X>` does.
pub struct Wm<X: XConn> {
    x: X,
    pub registry: Registry,
    pub frames: FrameArena,
    pub monitors: MonitorSet,
    pub focus: FocusManager,
    pub moveresize: MoveResize,
    pub config: Configuration,
    check_window: Xid,
    running: bool,
    reload_requested: bool,
}

impl<X: XConn> Wm<X> {
    /// Perform startup: advertise EWMH support, create the focus-fallback
    /// utility window, query the initial monitor layout and focus the
    /// primary monitor's root frame.
    pub fn new(mut x: X, config: Configuration) -> Result<Self> {
        let check_window = ewmh::startup(&mut x)?;
        let fallback_focus = x
            .create_utility_window()
            .map_err(|_| Error::UtilityWindowCreationFailed("focus fallback window".into()))?;
        x.configure(fallback_focus, Rect::new(-1, -1, 1, 1))?;

        let mut frames = FrameArena::new();
        let mut monitors = MonitorSet::new();
        let screens = x.screens()?;
        let fallback_rect = screens.first().map(|s| s.rect).unwrap_or(Rect::new(0, 0, 1920, 1080));
        monitors.merge(screens, &mut frames, FrameId(0), fallback_rect);

        let focus_frame = monitors.primary().map(|m| m.root_frame).expect("merge always installs a monitor");

        Ok(Self {
            x,
            registry: Registry::new(),
            frames,
            monitors,
            focus: FocusManager::new(focus_frame, fallback_focus),
            moveresize: MoveResize::default(),
            config,
            check_window,
            running: true,
            reload_requested: false,
        })
    }

    /// Run until `QUIT` clears the running flag or a fatal error occurs.
    ///
    /// Mirrors the teacher's `WindowManager::run`: ignore `SIGCHLD` so
    /// detached shell children never become zombies, regrab bindings once,
    /// then loop on `next_event` → `handle_xevent`, draining every
    /// already-queued event via `poll_event` before reloading and flushing.
    pub fn run(&mut self, notifier: &mut dyn Notifier, picker: &mut dyn WindowPicker) -> Result<()> {
        if let Err(e) = unsafe { nix::sys::signal::signal(nix::sys::signal::Signal::SIGCHLD, nix::sys::signal::SigHandler::SigIgn) } {
            warn!(%e, "unable to install SIGCHLD handler");
        }

        self.x.regrab(&self.config.bindings)?;

        while self.running {
            match self.x.next_event() {
                Ok(event) => {
                    trace!(?event, "dispatching event");
                    if let Err(e) = self.handle_xevent(event, notifier, picker) {
                        warn!(%e, "event handler returned an error; invariants were restored locally");
                    }

                    // Drain every event already queued before reloading and
                    // flushing, rather than handling one event per iteration.
                    loop {
                        match self.x.poll_event() {
                            Ok(Some(event)) => {
                                trace!(?event, "dispatching queued event");
                                if let Err(e) = self.handle_xevent(event, notifier, picker) {
                                    warn!(%e, "event handler returned an error; invariants were restored locally");
                                }
                            }
                            Ok(None) => break,
                            Err(e) => {
                                warn!(%e, "error polling queued X event");
                                break;
                            }
                        }
                    }

                    if self.reload_requested {
                        debug!("configuration reload was requested; caller must supply a new Configuration");
                        self.reload_requested = false;
                    }

                    if let Err(e) = ewmh::refresh(&mut self.x, &self.registry, &self.monitors) {
                        warn!(%e, "failed to refresh EWMH root properties");
                    }

                    self.x.flush()?;
                }
                Err(e) => warn!(%e, "error pulling next X event"),
            }
        }
        Ok(())
    }

    fn handle_xevent(&mut self, event: XEvent, notifier: &mut dyn Notifier, picker: &mut dyn WindowPicker) -> Result<()> {
        use XEvent::*;
        match event {
            Create(xid) => {
                if xid != self.check_window && xid != self.focus.fallback_focus() {
                    self.registry.insert(xid);
                }
            }
            MapRequest(xid) => self.on_map_request(xid)?,
            ConfigureRequest(xid, rect) => self.x.configure(xid, rect)?,
            ConfigureNotify(xid, rect) => {
                if let Some(id) = self.registry.window_of_xid(xid) {
                    self.registry.get_mut(id).unwrap().position = rect;
                }
            }
            Unmap(xid) => {
                if let Some(id) = self.registry.window_of_xid(xid) {
                    self.moveresize.cancel_if_target(id);
                    self.hide_window(id)?;
                }
            }
            Destroy(xid) => {
                if let Some(id) = self.registry.window_of_xid(xid) {
                    self.moveresize.cancel_if_target(id);
                    self.registry.destroy(id)?;
                }
            }
            PropertyNotify(xid, update) => self.on_property_notify(xid, update)?,
            KeyPress(code) => self.on_key(code.symbol, code.modifiers, false, notifier, picker)?,
            KeyRelease(code) => self.on_key(code.symbol, code.modifiers, true, notifier, picker)?,
            ButtonPress(xid, button, modifiers, pointer) => {
                self.on_button_press(xid, button, modifiers, pointer, notifier, picker)?
            }
            ButtonRelease(..) => {
                self.moveresize.release();
            }
            MotionNotify(pointer) => self.on_motion(pointer)?,
            MappingNotify => self.x.regrab(&self.config.bindings)?,
            ScreenChange(screens) => self.on_screen_change(screens)?,
            ClientMessage(message) => self.on_client_message(message)?,
        }
        Ok(())
    }

    // -- Window lifecycle --------------------------------------------------

    fn on_map_request(&mut self, xid: Xid) -> Result<()> {
        let id = match self.registry.window_of_xid(xid) {
            Some(id) => id,
            None => self.registry.insert(xid),
        };
        self.show_window(id)?;
        self.focus.set_focus_window_with_frame(&mut self.x, &mut self.registry, &self.frames, Some(id), self.focused_border())?;
        Ok(())
    }

    fn on_property_notify(&mut self, xid: Xid, update: PropertyUpdate) -> Result<()> {
        let Some(id) = self.registry.window_of_xid(xid) else {
            return Ok(());
        };
        let strut_changed = match update {
            PropertyUpdate::Full(props) => {
                let changed_strut = self.registry.get(id).map(|w| w.properties.strut) != Some(props.strut);
                self.registry.get_mut(id).unwrap().properties = props;
                self.repredict_mode(id)?;
                changed_strut
            }
            PropertyUpdate::Strut(strut) => {
                self.registry.get_mut(id).unwrap().properties.strut = strut;
                true
            }
        };
        if strut_changed {
            self.reconfigure_monitor_frame_sizes()?;
        }
        Ok(())
    }

    fn repredict_mode(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        let predicted = mode::predict_window_mode(&window.properties);
        if !window.is_mode_forced {
            self.set_window_mode(id, predicted, false)?;
        }
        Ok(())
    }

    /// §4.2 / `window_state.c::set_window_mode`: transition a window's mode,
    /// popping it out of or into the tiling layout as needed and
    /// resynchronizing its border width and allowed-actions atom table.
    pub fn set_window_mode(&mut self, id: WindowId, new_mode: WindowMode, force: bool) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        if window.mode == new_mode || (window.is_mode_forced && !force) {
            return Ok(());
        }
        let was_visible = window.is_visible;
        let previous_mode = window.mode;
        let xid = window.xid;

        self.registry.get_mut(id).unwrap().is_mode_forced = force;

        if was_visible {
            if previous_mode == WindowMode::Tiling {
                if let Some(frame) = focus::frame_holding_window(&self.frames, self.focus.focus_frame, id) {
                    self.frames.set_window(frame, None)?;
                    self.refill_void_if_configured(frame)?;
                }
            }

            let monitor_rect = self.monitor_rect_for_window(id);
            let new_rect = match new_mode {
                WindowMode::Tiling => {
                    let frame = self.focus.focus_frame;
                    if let Some(previous) = self.frames.window(frame) {
                        self.hide_window_abruptly(previous)?;
                    }
                    self.frames.set_window(frame, Some(id))?;
                    let gaps = self.frames.gaps(frame, self.config.gaps_inner, self.config.gaps_outer);
                    shrink_by_gaps(self.frames.rect(frame), gaps, self.config.border_size)
                }
                WindowMode::Popup => {
                    let props = self.registry.get(id).unwrap().properties.clone();
                    let saved = self.registry.get(id).unwrap().saved_popup_geometry;
                    mode::configure_popup_size(&props.size_hints, saved, monitor_rect)
                }
                WindowMode::Fullscreen => {
                    let props = self.registry.get(id).unwrap().properties.clone();
                    mode::configure_fullscreen_size(props.fullscreen_monitors, monitor_rect)
                }
                WindowMode::Dock => {
                    let props = self.registry.get(id).unwrap().properties.clone();
                    let current = self.registry.get(id).unwrap().position;
                    mode::configure_dock_size(&props, monitor_rect, current)
                }
            };
            self.registry.get_mut(id).unwrap().position = new_rect;
            self.x.configure(xid, new_rect)?;
            self.registry.set_window_above(id)?;
        } else if previous_mode == WindowMode::Tiling {
            self.registry.unlink_from_taken_list(id);
        }

        let client_handles_decorations = self.registry.get(id).unwrap().properties.motif_hints.client_handles_decorations;
        let border = mode::border_width(new_mode, self.config.border_size, client_handles_decorations);
        self.x.set_border_width(xid, border)?;

        let window = self.registry.get_mut(id).unwrap();
        window.previous_mode = window.mode;
        window.mode = new_mode;
        if new_mode == WindowMode::Popup {
            window.saved_popup_geometry = Some(window.position);
        }

        self.x.set_property_atoms(xid, "_NET_WM_ALLOWED_ACTIONS", mode::allowed_actions(new_mode))?;
        Ok(())
    }

    /// Map a window to the X server, assigning it its permanent numeric id
    /// and placing it in the layout/stack appropriate to its mode.
    pub fn show_window(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        if window.is_visible {
            return Ok(());
        }
        let xid = window.xid;
        let was_ever_mapped = window.was_ever_mapped;

        if !was_ever_mapped {
            self.registry.assign_numeric_id(id)?;
            self.registry.get_mut(id).unwrap().was_ever_mapped = true;
            self.registry.link_into_stacking_order(id);
        }

        if !self.registry.get(id).unwrap().is_mode_forced {
            let predicted = mode::predict_window_mode(&self.registry.get(id).unwrap().properties);
            self.registry.get_mut(id).unwrap().mode = predicted;
        }

        self.registry.get_mut(id).unwrap().is_visible = true;

        let monitor_rect = self.monitor_rect_for_window(id);
        let mode = self.registry.get(id).unwrap().mode;
        let mut previous_to_abandon = None;
        let new_rect = match mode {
            WindowMode::Tiling => {
                let frame = match focus::frame_holding_window(&self.frames, self.focus.focus_frame, id) {
                    Some(frame) => frame,
                    None => {
                        previous_to_abandon = self.frames.window(self.focus.focus_frame);
                        self.frames.set_window(self.focus.focus_frame, Some(id))?;
                        self.focus.focus_frame
                    }
                };
                let gaps = self.frames.gaps(frame, self.config.gaps_inner, self.config.gaps_outer);
                shrink_by_gaps(self.frames.rect(frame), gaps, self.config.border_size)
            }
            WindowMode::Popup => {
                let props = self.registry.get(id).unwrap().properties.clone();
                let saved = self.registry.get(id).unwrap().saved_popup_geometry;
                mode::configure_popup_size(&props.size_hints, saved, monitor_rect)
            }
            WindowMode::Fullscreen => {
                let props = self.registry.get(id).unwrap().properties.clone();
                mode::configure_fullscreen_size(props.fullscreen_monitors, monitor_rect)
            }
            WindowMode::Dock => {
                let props = self.registry.get(id).unwrap().properties.clone();
                let current = self.registry.get(id).unwrap().position;
                mode::configure_dock_size(&props, monitor_rect, current)
            }
        };
        self.registry.get_mut(id).unwrap().position = new_rect;
        self.x.configure(xid, new_rect)?;
        self.x.map(xid)?;
        self.registry.unlink_from_taken_list(id);

        if let Some(previous) = previous_to_abandon {
            self.hide_window_abruptly(previous)?;
        }

        if !self.registry.get(id).unwrap().properties.strut.is_empty() {
            self.reconfigure_monitor_frame_sizes()?;
        }
        Ok(())
    }

    /// Unmap a window, popping it out of the tiling layout (per
    /// `tiling.auto_remove_void`/`tiling.auto_fill_void`) or handing focus to
    /// a Z-order neighbour, and pushing it onto the taken list.
    pub fn hide_window(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        if !window.is_visible {
            return Ok(());
        }
        let xid = window.xid;
        let mode = window.mode;
        let was_focused = self.registry.focused() == Some(id);

        self.registry.get_mut(id).unwrap().is_visible = false;

        match mode {
            WindowMode::Tiling => {
                let mut refocused = false;
                if let Some(frame) = focus::frame_holding_window(&self.frames, self.focus.focus_frame, id) {
                    self.frames.set_window(frame, None)?;
                    if self.config.tiling.auto_remove_void && self.frames.parent(frame).is_some() {
                        let parent = self.frames.parent(frame);
                        self.frames.remove(frame)?;
                        if let Some(parent) = parent {
                            self.reload_subtree(parent)?;
                        }
                    } else if self.config.tiling.auto_fill_void {
                        self.refill_void_if_configured(frame)?;
                        if was_focused {
                            let refill = self.frames.window(frame);
                            self.focus.set_focus_window(&mut self.x, &mut self.registry, refill, self.focused_border())?;
                            refocused = true;
                        }
                    }
                }
                if was_focused && !refocused {
                    self.focus.set_focus_window(&mut self.x, &mut self.registry, None, self.focused_border())?;
                }
                self.registry.push_taken(id);
            }
            WindowMode::Popup | WindowMode::Fullscreen | WindowMode::Dock => {
                if was_focused {
                    let neighbour = self.registry.below(id).or_else(|| self.registry.above(id));
                    self.focus.set_focus_window_with_frame(&mut self.x, &mut self.registry, &self.frames, neighbour, self.focused_border())?;
                }
            }
        }

        self.x.unmap(xid)?;

        if !self.registry.get(id).unwrap().properties.strut.is_empty() {
            self.reconfigure_monitor_frame_sizes()?;
        }
        Ok(())
    }

    /// Hide a window without touching the tiling layout or focus; used when
    /// a new window is replacing it in the same frame.
    fn hide_window_abruptly(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        if !window.is_visible {
            return Ok(());
        }
        let xid = window.xid;
        self.registry.get_mut(id).unwrap().is_visible = false;
        self.x.unmap(xid)?;
        self.registry.push_taken(id);
        if self.registry.focused() == Some(id) {
            self.focus.set_focus_window(&mut self.x, &mut self.registry, None, self.focused_border())?;
        }
        Ok(())
    }

    fn refill_void_if_configured(&mut self, frame: FrameId) -> Result<()> {
        if !self.config.tiling.auto_fill_void {
            return Ok(());
        }
        if let Some(refill) = self.registry.pop_taken() {
            self.frames.set_window(frame, Some(refill))?;
            self.show_window(refill)?;
        }
        Ok(())
    }

    /// The first `CLOSE-WINDOW` sends the polite `WM_DELETE_WINDOW` message
    /// and records a timestamp; a second request within
    /// [REQUEST_CLOSE_MAX_DURATION] escalates to `KillClient`.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        let xid = window.xid;
        let now = Instant::now();
        let escalate = window
            .last_close_request
            .is_some_and(|t| now.duration_since(t) <= REQUEST_CLOSE_MAX_DURATION);

        if escalate {
            self.x.kill(xid)?;
        } else {
            self.registry.get_mut(id).unwrap().last_close_request = Some(now);
            self.x.send_delete_window(xid)?;
        }
        Ok(())
    }

    // -- Input ---------------------------------------------------------------

    fn on_key(
        &mut self,
        symbol: fensterchef_keysyms::XKeySym,
        modifiers: ModifierSet,
        is_release: bool,
        notifier: &mut dyn Notifier,
        picker: &mut dyn WindowPicker,
    ) -> Result<()> {
        let Some(matched) = self.config.bindings.match_key(symbol, modifiers, is_release) else {
            return Ok(());
        };
        let actions = matched.actions.to_vec();
        let target = self.registry.focused();
        for action in &actions {
            self.do_action(action, target, notifier, picker)?;
        }
        Ok(())
    }

    fn on_button_press(
        &mut self,
        xid: Xid,
        button: crate::bindings::MouseButton,
        modifiers: ModifierSet,
        pointer: Point,
        notifier: &mut dyn Notifier,
        picker: &mut dyn WindowPicker,
    ) -> Result<()> {
        if self.moveresize.is_active() {
            if let Some((id, restore)) = self.moveresize.cancel() {
                self.apply_moveresize_geometry(id, restore)?;
            }
            return Ok(());
        }

        if let Some(matched) = self.config.bindings.match_button(button, modifiers, false) {
            let actions = matched.actions.to_vec();
            let target = self.registry.window_of_xid(xid);
            for action in &actions {
                self.do_action(action, target, notifier, picker)?;
            }
            return Ok(());
        }

        let Some(id) = self.registry.window_of_xid(xid) else {
            return Ok(());
        };
        if self.registry.get(id).map(|w| w.mode) == Some(WindowMode::Popup) {
            let initial = self.registry.get(id).unwrap().position;
            self.moveresize.start(id, moveresize::Direction::Move, initial, pointer);
        }
        Ok(())
    }

    fn on_motion(&mut self, pointer: Point) -> Result<()> {
        if let Some((id, rect)) = self.moveresize.motion(pointer) {
            self.apply_moveresize_geometry(id, rect)?;
        }
        Ok(())
    }

    fn apply_moveresize_geometry(&mut self, id: WindowId, rect: Rect) -> Result<()> {
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        let xid = window.xid;
        let monitor_rects: Vec<Rect> = self.monitors.iter().map(|m| m.rect).collect();
        let (w, h) = moveresize::clamp_size(rect.w, rect.h);
        let clamped = moveresize::ensure_minimum_visible(Rect { w, h, ..rect }, &monitor_rects);
        self.registry.get_mut(id).unwrap().position = clamped;
        if self.registry.get(id).unwrap().mode == WindowMode::Popup {
            self.registry.get_mut(id).unwrap().saved_popup_geometry = Some(clamped);
        }
        self.x.configure(xid, clamped)
    }

    fn on_client_message(&mut self, message: ClientMessage) -> Result<()> {
        match message {
            ClientMessage::CloseWindow(xid) => {
                if let Some(id) = self.registry.window_of_xid(xid) {
                    self.close_window(id)?;
                }
            }
            ClientMessage::MoveResize(xid, direction, anchor) => {
                let Some(id) = self.registry.window_of_xid(xid) else {
                    return Ok(());
                };
                if self.registry.get(id).map(|w| w.mode) != Some(WindowMode::Popup) {
                    return Ok(());
                }
                if let Some((prev, restore)) = {
                    let initial = self.registry.get(id).unwrap().position;
                    self.moveresize.start(id, direction, initial, anchor)
                } {
                    self.apply_moveresize_geometry(prev, restore)?;
                }
            }
            ClientMessage::MoveResizeCancel(xid) => {
                if let Some(id) = self.registry.window_of_xid(xid) {
                    if self.moveresize.active_window() == Some(id) {
                        if let Some((id, restore)) = self.moveresize.cancel() {
                            self.apply_moveresize_geometry(id, restore)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn on_screen_change(&mut self, screens: Vec<crate::monitor::MonitorInput>) -> Result<()> {
        let fallback_rect = self.monitors.primary().map(|m| m.rect).unwrap_or(Rect::new(0, 0, 1920, 1080));
        let (outcome, new_focus) = self.monitors.merge(screens, &mut self.frames, self.focus.focus_frame, fallback_rect);
        for id in outcome.abandoned_windows {
            self.registry.push_taken(id);
        }
        if let Some(root) = new_focus {
            self.focus.focus_frame = root;
        }
        self.reconfigure_monitor_frame_sizes()?;
        Ok(())
    }

    /// §4.5 step 5: zero every monitor's struts, re-attribute each visible
    /// window's strut to the monitor containing it, then resize every
    /// monitor's root frame to the resulting work area and resync every
    /// leaf's window to its new geometry.
    fn reconfigure_monitor_frame_sizes(&mut self) -> Result<()> {
        let window_struts: Vec<(Rect, crate::geometry::Extents)> = self
            .registry
            .global_list()
            .into_iter()
            .filter_map(|id| {
                let w = self.registry.get(id)?;
                if w.is_visible && !w.properties.strut.is_empty() {
                    Some((w.position, w.properties.strut.reserved))
                } else {
                    None
                }
            })
            .collect();
        self.monitors.reconfigure_frame_sizes(&mut self.frames, &window_struts);
        self.reload_all_monitor_frames()
    }

    /// §4.3: resynchronize a leaf's window with its current gap-shrunk
    /// geometry. Called after every operation that changes a frame's rect
    /// (`split`/`remove`/`resize`) for each leaf it touches.
    fn reload_frame(&mut self, frame: FrameId) -> Result<()> {
        let Some(id) = self.frames.window(frame) else {
            return Ok(());
        };
        let Some(window) = self.registry.get(id) else {
            return Ok(());
        };
        let xid = window.xid;
        let gaps = self.frames.gaps(frame, self.config.gaps_inner, self.config.gaps_outer);
        let rect = shrink_by_gaps(self.frames.rect(frame), gaps, self.config.border_size);
        self.registry.get_mut(id).unwrap().position = rect;
        self.x.configure(xid, rect)
    }

    /// [Self::reload_frame] for every leaf of the subtree rooted at `frame`.
    fn reload_subtree(&mut self, frame: FrameId) -> Result<()> {
        for leaf in self.frames.leaves(frame) {
            self.reload_frame(leaf)?;
        }
        Ok(())
    }

    fn reload_all_monitor_frames(&mut self) -> Result<()> {
        let roots: Vec<FrameId> = self.monitors.iter().map(|m| m.root_frame).collect();
        for root in roots {
            self.reload_subtree(root)?;
        }
        Ok(())
    }

    fn monitor_rect_for_window(&self, id: WindowId) -> Rect {
        let point = self.registry.get(id).map(|w| w.position.midpoint()).unwrap_or_default();
        self.monitors.monitor_containing(point).map(|m| m.rect).unwrap_or_default()
    }

    fn focused_border(&self) -> u32 {
        self.config.notification.border_color
    }

    // -- Action dispatcher -----------------------------------------------

    /// §4.7: perform the operation named by `action.code`.
    pub fn do_action(
        &mut self,
        action: &Action,
        target: Option<WindowId>,
        notifier: &mut dyn Notifier,
        picker: &mut dyn WindowPicker,
    ) -> Result<()> {
        use ActionCode::*;
        match action.code {
            None => {}
            ReloadConfiguration => self.reload_requested = true,
            CloseWindow => {
                if let Some(id) = target {
                    self.close_window(id)?;
                }
            }
            MinimizeWindow => {
                if let Some(id) = target {
                    self.hide_window(id)?;
                }
            }
            FocusWindow => {
                self.focus.set_focus_window_with_frame(&mut self.x, &mut self.registry, &self.frames, target, self.focused_border())?;
            }
            InitiateMove => {
                if let Some(id) = target {
                    let initial = self.registry.get(id).map(|w| w.position).unwrap_or_default();
                    let anchor = self.x.cursor_position().unwrap_or_default();
                    self.moveresize.start(id, moveresize::Direction::Move, initial, anchor);
                }
            }
            InitiateResize => {
                if let Some(id) = target {
                    let initial = self.registry.get(id).map(|w| w.position).unwrap_or_default();
                    let anchor = self.x.cursor_position().unwrap_or_default();
                    self.moveresize.start(id, moveresize::Direction::SouthEast, initial, anchor);
                }
            }
            NextWindow => self.focus_adjacent_hidden_window(1, notifier)?,
            PreviousWindow => self.focus_adjacent_hidden_window(-1, notifier)?,
            RemoveFrame => {
                let parent = self.frames.parent(self.focus.focus_frame);
                match self.frames.remove(self.focus.focus_frame) {
                    Ok(vacated) => {
                        if let Some(id) = vacated {
                            self.registry.push_taken(id);
                        }
                        let new_focus = parent
                            .and_then(|p| self.frames.leaves(p).into_iter().next())
                            .unwrap_or(self.focus.focus_frame);
                        if let Some(p) = parent {
                            self.reload_subtree(p)?;
                        }
                        self.focus.set_focus_frame(&mut self.x, &mut self.registry, &self.frames, new_focus, self.focused_border())?;
                    }
                    Err(e) => {
                        debug!(%e, "remove-frame rejected");
                        notifier.notify("Can not remove the last frame", self.frames.rect(self.focus.focus_frame).midpoint());
                    }
                }
            }
            ToggleTiling => {
                if let Some(id) = target {
                    let current = self.registry.get(id).map(|w| w.mode);
                    let next = if current == Some(WindowMode::Tiling) { WindowMode::Popup } else { WindowMode::Tiling };
                    self.set_window_mode(id, next, true)?;
                }
            }
            TraverseFocus => {
                self.focus.traverse_focus_chain(&mut self.x, &mut self.registry, &self.frames, -1, self.focused_border())?;
                if let Some(id) = self.registry.focused() {
                    self.registry.set_window_above(id)?;
                }
            }
            ToggleFullscreen => {
                if let Some(id) = target {
                    let window = self.registry.get(id);
                    let next = match window {
                        Some(w) if w.mode == WindowMode::Fullscreen => w.previous_mode,
                        _ => WindowMode::Fullscreen,
                    };
                    self.set_window_mode(id, next, true)?;
                }
            }
            SplitHorizontally => {
                self.frames.split(self.focus.focus_frame, SplitDirection::Horizontal)?;
                self.reload_subtree(self.focus.focus_frame)?;
            }
            SplitVertically => {
                self.frames.split(self.focus.focus_frame, SplitDirection::Vertical)?;
                self.reload_subtree(self.focus.focus_frame)?;
            }
            MoveUp | MoveLeft | MoveRight | MoveDown => self.move_focus_frame(action.code)?,
            ShowWindowList => {
                let candidates: Vec<Xid> = self.registry.global_list().into_iter().filter_map(|id| self.registry.get(id).map(|w| w.xid)).collect();
                if let Some(xid) = picker.pick_window(&candidates) {
                    if let Some(id) = self.registry.window_of_xid(xid) {
                        if !self.registry.get(id).unwrap().is_visible {
                            self.show_window(id)?;
                        }
                        self.focus.set_focus_window_with_frame(&mut self.x, &mut self.registry, &self.frames, Some(id), self.focused_border())?;
                    }
                }
            }
            Run => {
                if let Value::String(command) = &action.parameter {
                    shell::run(command)?;
                }
            }
            ShowMessage => {
                if let Value::String(text) = &action.parameter {
                    notifier.notify(text, self.frames.rect(self.focus.focus_frame).midpoint());
                }
            }
            ShowMessageRun => {
                if let Value::String(command) = &action.parameter {
                    let text = shell::run_and_capture_one_line(command)?;
                    notifier.notify(&text, self.frames.rect(self.focus.focus_frame).midpoint());
                }
            }
            ResizeBy => {
                if let Value::Quad(left, top, right, bottom) = action.parameter.clone() {
                    self.resize_by(target, left, top, right, bottom)?;
                }
            }
            Quit => self.running = false,
        }
        Ok(())
    }

    /// `NEXT-WINDOW`/`PREVIOUS-WINDOW`: scan the global list circularly for a
    /// tiling, hidden, ever-mapped window; forward for next, same scan
    /// reversed for previous so wraparound is symmetric.
    fn focus_adjacent_hidden_window(&mut self, direction: i32, notifier: &mut dyn Notifier) -> Result<()> {
        let all = self.registry.global_list();
        let candidates: Vec<WindowId> = if direction >= 0 {
            all.into_iter()
                .filter(|&id| self.is_hidden_tiling_ever_mapped(id))
                .collect()
        } else {
            all.into_iter()
                .rev()
                .filter(|&id| self.is_hidden_tiling_ever_mapped(id))
                .collect()
        };
        match candidates.into_iter().next() {
            Some(id) => {
                self.show_window(id)?;
                self.registry.set_window_above(id)?;
                self.focus.set_focus_window_with_frame(&mut self.x, &mut self.registry, &self.frames, Some(id), self.focused_border())?;
            }
            None => notifier.notify("No other window", self.frames.rect(self.focus.focus_frame).midpoint()),
        }
        Ok(())
    }

    fn is_hidden_tiling_ever_mapped(&self, id: WindowId) -> bool {
        self.registry
            .get(id)
            .is_some_and(|w| !w.is_visible && w.mode == WindowMode::Tiling && w.was_ever_mapped)
    }

    fn move_focus_frame(&mut self, code: ActionCode) -> Result<()> {
        let rect = self.frames.rect(self.focus.focus_frame);
        let probe = match code {
            ActionCode::MoveUp => Point::new(rect.x, rect.y - 1),
            ActionCode::MoveLeft => Point::new(rect.x - 1, rect.y),
            ActionCode::MoveRight => Point::new(rect.x + rect.w as i32, rect.y),
            ActionCode::MoveDown => Point::new(rect.x, rect.y + rect.h as i32),
            _ => return Ok(()),
        };
        if let Some(frame) = focus::frame_at_adjacent_point(&self.frames, self.focus.focus_frame, probe) {
            self.focus.set_focus_frame(&mut self.x, &mut self.registry, &self.frames, frame, self.focused_border())?;
        }
        Ok(())
    }

    /// `RESIZE-BY (left,top,right,bottom)`: bump each frame edge (resizing
    /// the sibling accordingly) if `target` sits in a frame, else adjust
    /// popup geometry directly.
    fn resize_by(&mut self, target: Option<WindowId>, left: i32, top: i32, right: i32, bottom: i32) -> Result<()> {
        let Some(id) = target else { return Ok(()) };
        match focus::frame_holding_window(&self.frames, self.focus.focus_frame, id) {
            Some(frame) => {
                let r = self.frames.rect(frame);
                let nx = r.x - left;
                let ny = r.y - top;
                let nw = (r.w as i32 + left + right).max(moveresize::WINDOW_MINIMUM_SIZE as i32) as u32;
                let nh = (r.h as i32 + top + bottom).max(moveresize::WINDOW_MINIMUM_SIZE as i32) as u32;
                self.frames.resize(frame, Rect::new(nx, ny, nw, nh))?;
                self.reload_subtree(frame)
            }
            None => {
                let Some(window) = self.registry.get(id) else {
                    return Ok(());
                };
                let r = window.position;
                let nx = r.x - left;
                let ny = r.y - top;
                let (nw, nh) = moveresize::clamp_size(
                    (r.w as i32 + left + right).max(0) as u32,
                    (r.h as i32 + top + bottom).max(0) as u32,
                );
                self.apply_moveresize_geometry(id, Rect::new(nx, ny, nw, nh))
            }
        }
    }
}

/// Final geometry a tiling window receives inside its frame: the frame rect
/// shrunk by gaps, then by the border width on every side (so the border
/// itself, not just the content, lands inside the gap).
fn shrink_by_gaps(frame_rect: Rect, gaps: crate::geometry::Extents, border_size: u32) -> Rect {
    let gapped = gaps.apply_inward(frame_rect);
    gapped.shrink(border_size)
}
