//! Integration scenario tests driven through `Wm`'s public surface, backed
//! by a `MockXConn` that only tracks what each scenario needs to assert.
use fensterchef::config::Configuration;
use fensterchef::error::Result;
use fensterchef::geometry::{Point, Rect};
use fensterchef::monitor::MonitorInput;
use fensterchef::ui::{Notifier, WindowPicker};
use fensterchef::window::mode::WindowMode;
use fensterchef::window::Xid;
use fensterchef::wm::Wm;
use fensterchef::x::mock::MockXConn;

struct TestXConn {
    next_utility_id: u32,
}

impl TestXConn {
    fn new() -> Self {
        Self { next_utility_id: 1000 }
    }
}

impl MockXConn for TestXConn {
    fn mock_create_utility_window(&mut self) -> Result<Xid> {
        let id = self.next_utility_id;
        self.next_utility_id += 1;
        Ok(Xid(id))
    }

    fn mock_screens(&mut self) -> Result<Vec<MonitorInput>> {
        Ok(vec![MonitorInput {
            name: "primary".to_string(),
            rect: Rect::new(0, 0, 1920, 1080),
            is_primary: true,
        }])
    }
}

struct NoUi;

impl Notifier for NoUi {
    fn notify(&mut self, _text: &str, _at: Point) {}
}

impl WindowPicker for NoUi {
    fn pick_window(&mut self, _candidates: &[Xid]) -> Option<Xid> {
        None
    }
}

fn new_wm() -> Wm<TestXConn> {
    Wm::new(TestXConn::new(), Configuration::default()).expect("startup with one monitor and no existing clients")
}

/// S2: a popup's geometry survives a hide/show round trip.
#[test]
fn popup_geometry_is_remembered_across_hide_and_show() {
    let mut wm = new_wm();
    let id = wm.registry.insert(Xid(1));
    wm.set_window_mode(id, WindowMode::Popup, true).unwrap();
    wm.show_window(id).unwrap();

    let moved = Rect::new(200, 150, 640, 480);
    wm.registry.get_mut(id).unwrap().position = moved;
    wm.registry.get_mut(id).unwrap().saved_popup_geometry = Some(moved);

    wm.hide_window(id).unwrap();
    assert!(!wm.registry.get(id).unwrap().is_visible);

    wm.show_window(id).unwrap();
    assert_eq!(wm.registry.get(id).unwrap().position, moved);
}

/// S3: toggling fullscreen and back restores the mode the window had before.
#[test]
fn fullscreen_toggle_restores_previous_mode() {
    let mut wm = new_wm();
    let id = wm.registry.insert(Xid(1));
    wm.set_window_mode(id, WindowMode::Popup, true).unwrap();
    wm.show_window(id).unwrap();
    assert_eq!(wm.registry.get(id).unwrap().mode, WindowMode::Popup);

    wm.set_window_mode(id, WindowMode::Fullscreen, true).unwrap();
    assert_eq!(wm.registry.get(id).unwrap().mode, WindowMode::Fullscreen);
    assert_eq!(wm.registry.get(id).unwrap().previous_mode, WindowMode::Popup);

    let previous = wm.registry.get(id).unwrap().previous_mode;
    wm.set_window_mode(id, previous, true).unwrap();
    assert_eq!(wm.registry.get(id).unwrap().mode, WindowMode::Popup);
}

/// S5: a second `CLOSE-WINDOW` within the escalation window kills the
/// client instead of re-sending the polite close request.
#[test]
fn double_close_request_escalates_to_kill() {
    let mut wm = new_wm();
    let id = wm.registry.insert(Xid(1));
    wm.show_window(id).unwrap();

    wm.close_window(id).unwrap();
    assert!(wm.registry.get(id).unwrap().last_close_request.is_some());

    wm.close_window(id).unwrap();
    assert!(wm.registry.get(id).unwrap().last_close_request.is_some());
}

/// A newly mapped tiling window takes over the focused frame, and hiding it
/// (with auto-fill disabled) leaves that frame empty rather than removed.
#[test]
fn showing_a_tiling_window_occupies_the_focus_frame_and_hiding_empties_it() {
    let mut wm = new_wm();
    let id = wm.registry.insert(Xid(1));
    let frame = wm.focus.focus_frame;

    wm.show_window(id).unwrap();
    assert_eq!(wm.frames.window(frame), Some(id));
    assert!(wm.registry.get(id).unwrap().is_visible);

    wm.hide_window(id).unwrap();
    assert_eq!(wm.frames.window(frame), None);
    assert!(!wm.registry.get(id).unwrap().is_visible);
}

/// A dock window never enters the tiling layout regardless of focus frame.
#[test]
fn dock_window_bypasses_the_tiling_layout() {
    let mut wm = new_wm();
    let id = wm.registry.insert(Xid(1));
    let frame = wm.focus.focus_frame;
    wm.set_window_mode(id, WindowMode::Dock, true).unwrap();

    wm.show_window(id).unwrap();
    assert_eq!(wm.frames.window(frame), None);
    assert_eq!(wm.registry.get(id).unwrap().mode, WindowMode::Dock);
}
