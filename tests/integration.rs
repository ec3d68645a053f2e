//! Integration tests for autoclose-tui.
//!
//! These tests exercise the public API from outside the crate: overlays are
//! opened against a headless app, driven through the [`Pilot`], and every
//! close they receive is recorded in a shared trace.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use autoclose_tui::app::{App, AppConfig};
use autoclose_tui::autoclose::{
    AutoClose, AutoCloseConfig, CloseReason, DispatchOutcome, KeyPhase, KeyReleaseMode,
    MousePhase, OverlaySource, SubscriberHandle, SubscriptionOptions,
};
use autoclose_tui::dom::{NodeData, NodeId};
use autoclose_tui::event::{EventType, GlobalEvent, Key, MouseBtn};
use autoclose_tui::geometry::Region;
use autoclose_tui::testing::Pilot;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

type Trace = Rc<RefCell<Vec<String>>>;

/// An overlay that records its closes and unsubscribes, like a real popover.
struct TestOverlay {
    name: &'static str,
    window: NodeId,
    toggle: Option<NodeId>,
    policy: Cell<AutoClose>,
    handle: RefCell<Option<SubscriberHandle>>,
    trace: Trace,
}

impl OverlaySource for TestOverlay {
    fn auto_close(&self) -> AutoClose {
        self.policy.get()
    }

    fn elements_inside(&self) -> Vec<NodeId> {
        vec![self.window]
    }

    fn toggling_element(&self) -> Option<NodeId> {
        self.toggle
    }

    fn close(&self, _event: &GlobalEvent, reason: CloseReason) {
        self.trace
            .borrow_mut()
            .push(format!("{}:{}", self.name, reason));
        if let Some(handle) = self.handle.borrow().as_ref() {
            handle.unsubscribe();
        }
    }
}

impl TestOverlay {
    fn is_open(&self) -> bool {
        self.handle
            .borrow()
            .as_ref()
            .is_some_and(SubscriberHandle::is_subscribed)
    }
}

/// Screen layout (80x24):
///
/// ```text
/// (0,0) toggle button 10x1
/// (10,5) window A 20x5     (40,5) window B 20x5
/// everything else: body
/// ```
struct Scene {
    pilot: Pilot,
    toggle: NodeId,
    window_a: NodeId,
    window_b: NodeId,
    trace: Trace,
}

const OUTSIDE: (u16, u16) = (1, 20);
const IN_A: (u16, u16) = (15, 7);
const IN_B: (u16, u16) = (45, 7);
const ON_TOGGLE: (u16, u16) = (2, 0);

fn scene_with(config: AppConfig) -> Scene {
    let mut pilot = Pilot::with_config(config);
    let app = pilot.app_mut();
    let body = app.dom.insert(NodeData::new("Body"));
    let toggle = app.dom.insert_child(body, NodeData::new("Button"));
    let window_a = app.dom.insert_child(body, NodeData::new("Popover"));
    let window_b = app.dom.insert_child(body, NodeData::new("Menu"));
    app.place(body, Region::new(0, 0, 80, 24));
    app.place(toggle, Region::new(0, 0, 10, 1));
    app.place(window_a, Region::new(10, 5, 20, 5));
    app.place(window_b, Region::new(40, 5, 20, 5));
    Scene {
        pilot,
        toggle,
        window_a,
        window_b,
        trace: Rc::default(),
    }
}

fn scene() -> Scene {
    scene_with(AppConfig::default())
}

fn open(
    app: &App,
    scene: &Scene,
    name: &'static str,
    window: NodeId,
    policy: AutoClose,
    options: SubscriptionOptions,
) -> Rc<TestOverlay> {
    let overlay = Rc::new(TestOverlay {
        name,
        window,
        toggle: Some(scene.toggle),
        policy: Cell::new(policy),
        handle: RefCell::new(None),
        trace: Rc::clone(&scene.trace),
    });
    let handle = app.autoclose.handle(&overlay, options);
    handle.subscribe();
    *overlay.handle.borrow_mut() = Some(handle);
    overlay
}

impl Scene {
    fn open_a(&self, policy: AutoClose) -> Rc<TestOverlay> {
        open(
            self.pilot.app(),
            self,
            "A",
            self.window_a,
            policy,
            SubscriptionOptions::default(),
        )
    }

    fn open_b(&self, policy: AutoClose) -> Rc<TestOverlay> {
        open(
            self.pilot.app(),
            self,
            "B",
            self.window_b,
            policy,
            SubscriptionOptions::default(),
        )
    }

    fn click(&mut self, (x, y): (u16, u16)) -> Vec<DispatchOutcome> {
        self.pilot.click(x, y)
    }

    fn trace(&self) -> String {
        self.trace.borrow().join("\n")
    }

    fn subscriptions(&self) -> usize {
        self.pilot.app().autoclose.subscription_count()
    }
}

fn closed(reason: CloseReason, event_type: EventType) -> DispatchOutcome {
    DispatchOutcome::Closed { reason, event_type }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn test_double_subscribe_registers_once() {
    let s = scene();
    let a = s.open_a(AutoClose::Always);
    let handle = a.handle.borrow().clone().unwrap();
    assert!(!handle.subscribe());
    assert_eq!(s.subscriptions(), 1);
    assert!(handle.unsubscribe());
    assert!(!handle.unsubscribe());
    assert_eq!(s.subscriptions(), 0);
}

#[test]
fn test_listeners_independent_of_overlay_count() {
    let s = scene();
    let _a = s.open_a(AutoClose::Always);
    let _b = s.open_b(AutoClose::Always);
    assert_eq!(s.pilot.app().autoclose.listener_count(), 5);
    assert_eq!(s.subscriptions(), 2);
}

// ---------------------------------------------------------------------------
// Escape
// ---------------------------------------------------------------------------

#[test]
fn test_escape_closes_on_keyup_and_unsubscribes() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);

    let outcomes = s.pilot.press_escape();
    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Ignored,
            closed(CloseReason::Escape, EventType::KeyUp)
        ]
    );
    assert!(!a.is_open());
    assert_eq!(s.subscriptions(), 0);
    assert_eq!(s.trace(), "A:escape");
}

#[test]
fn test_escape_closes_newest_only() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    let b = s.open_b(AutoClose::Always);

    s.pilot.press_escape();
    assert!(a.is_open());
    assert!(!b.is_open());

    s.pilot.press_escape();
    assert!(!a.is_open());
    insta::assert_snapshot!(s.trace(), @r"
    B:escape
    A:escape
    ");
}

#[test]
fn test_other_keys_never_close() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    s.pilot.press_key(Key::Enter);
    s.pilot.press_key(Key::Char('q'));
    assert!(a.is_open());
}

#[test]
fn test_keydown_phase() {
    let mut s = scene();
    let a = open(
        s.pilot.app(),
        &s,
        "A",
        s.window_a,
        AutoClose::Always,
        SubscriptionOptions::new().with_key_event(KeyPhase::KeyDown),
    );
    let outcomes = s.pilot.press_escape();
    assert_eq!(
        outcomes,
        vec![
            closed(CloseReason::Escape, EventType::KeyDown),
            DispatchOutcome::Ignored
        ]
    );
    assert!(!a.is_open());
}

#[test]
fn test_reported_release_mode() {
    let config = AppConfig::new()
        .with_autoclose(AutoCloseConfig::new().with_key_release(KeyReleaseMode::Reported));
    let mut s = scene_with(config);
    let a = s.open_a(AutoClose::Always);

    assert_eq!(s.pilot.press_escape(), vec![DispatchOutcome::Ignored]);
    assert!(a.is_open());
    assert_eq!(
        s.pilot.release_key(Key::Escape),
        vec![closed(CloseReason::Escape, EventType::KeyUp)]
    );
    assert!(!a.is_open());
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

#[test]
fn test_nested_outside_press_closes_one_at_a_time() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    let b = s.open_b(AutoClose::Always);

    let outcomes = s.click(OUTSIDE);
    assert_eq!(
        outcomes,
        vec![
            closed(CloseReason::OutsideClick, EventType::MouseDown),
            DispatchOutcome::Ignored,
            DispatchOutcome::Suppressed,
        ]
    );
    assert!(a.is_open());
    assert!(!b.is_open());

    s.click(OUTSIDE);
    assert!(!a.is_open());
    insta::assert_snapshot!(s.trace(), @r"
    B:outside_click
    A:outside_click
    ");
}

#[test]
fn test_press_in_older_overlay_closes_newer() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    let b = s.open_b(AutoClose::Always);

    s.click(IN_A);
    assert!(!b.is_open());
    assert!(a.is_open());
    assert_eq!(s.trace(), "B:outside_click");
}

#[test]
fn test_inside_click_closes_once() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);

    let outcomes = s.click(IN_A);
    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Ignored,
            DispatchOutcome::Ignored,
            closed(CloseReason::InsideClick, EventType::Click),
        ]
    );
    assert!(!a.is_open());
    assert_eq!(s.trace(), "A:inside_click");
}

#[test]
fn test_policy_inside_matrix() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Inside);

    s.click(OUTSIDE);
    assert!(a.is_open());
    s.click(IN_A);
    assert!(!a.is_open());

    let a = s.open_a(AutoClose::Inside);
    s.pilot.press_escape();
    assert!(!a.is_open());
    insta::assert_snapshot!(s.trace(), @r"
    A:inside_click
    A:escape
    ");
}

#[test]
fn test_policy_outside_matrix() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Outside);

    s.click(IN_A);
    assert!(a.is_open());
    s.click(OUTSIDE);
    assert!(!a.is_open());

    let a = s.open_a(AutoClose::Outside);
    s.pilot.press_escape();
    assert!(!a.is_open());
    insta::assert_snapshot!(s.trace(), @r"
    A:outside_click
    A:escape
    ");
}

#[test]
fn test_policy_never_matrix() {
    let mut s = scene();
    let a = s.open_a(AutoClose::from(false));

    s.click(OUTSIDE);
    s.click(IN_A);
    s.pilot.press_escape();
    assert!(a.is_open());
    assert_eq!(s.trace(), "");
}

#[test]
fn test_policy_changes_take_effect_immediately() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Never);
    s.pilot.press_escape();
    assert!(a.is_open());

    a.policy.set("outside".parse().unwrap());
    s.pilot.press_escape();
    assert!(!a.is_open());
}

#[test]
fn test_toggling_element_never_takes_outside_path() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);

    let outcomes = s.click(ON_TOGGLE);
    assert!(outcomes.iter().all(|o| !o.is_closed()));
    assert!(a.is_open());

    // The toggle's own handler closes the overlay.
    let handle = a.handle.borrow().clone().unwrap();
    assert!(!handle.toggle());
    assert!(!a.is_open());
    assert_eq!(s.trace(), "");
}

#[test]
fn test_mouseup_phase_closes_on_release() {
    let mut s = scene();
    let a = open(
        s.pilot.app(),
        &s,
        "A",
        s.window_a,
        AutoClose::Always,
        SubscriptionOptions::new().with_mouse_event(MousePhase::MouseUp),
    );

    let down = s.pilot.mouse_down(MouseBtn::Left, OUTSIDE.0, OUTSIDE.1);
    assert_eq!(down, vec![DispatchOutcome::Ignored]);
    assert!(a.is_open());

    let up = s.pilot.mouse_up(MouseBtn::Left, OUTSIDE.0, OUTSIDE.1);
    assert_eq!(
        up,
        vec![
            closed(CloseReason::OutsideClick, EventType::MouseUp),
            DispatchOutcome::Suppressed,
        ]
    );
}

#[test]
fn test_right_click_ignored() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    s.pilot.right_click(OUTSIDE.0, OUTSIDE.1);
    s.pilot.right_click(IN_A.0, IN_A.1);
    assert!(a.is_open());
}

#[test]
fn test_press_in_b_then_release_in_a_does_not_click_inside() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Inside);

    s.pilot.mouse_down(MouseBtn::Left, IN_B.0, IN_B.1);
    let up = s.pilot.mouse_up(MouseBtn::Left, IN_A.0, IN_A.1);
    // The click lands on the common ancestor, the body.
    assert_eq!(up, vec![DispatchOutcome::Ignored, DispatchOutcome::Ignored]);
    assert!(a.is_open());
}

#[test]
fn test_right_press_during_left_press_keeps_the_click() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Inside);

    assert_eq!(
        s.pilot.mouse_down(MouseBtn::Left, IN_A.0, IN_A.1),
        vec![DispatchOutcome::Ignored]
    );
    assert_eq!(
        s.pilot.mouse_down(MouseBtn::Right, OUTSIDE.0, OUTSIDE.1),
        vec![DispatchOutcome::Ignored]
    );
    let up = s.pilot.mouse_up(MouseBtn::Left, IN_A.0, IN_A.1);
    assert_eq!(
        up,
        vec![
            DispatchOutcome::Ignored,
            closed(CloseReason::InsideClick, EventType::Click),
        ]
    );
    assert!(!a.is_open());
    assert_eq!(s.trace(), "A:inside_click");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_dropping_overlay_unsubscribes() {
    let s = scene();
    let a = s.open_a(AutoClose::Always);
    assert_eq!(s.subscriptions(), 1);
    drop(a);
    assert_eq!(s.subscriptions(), 0);
}

#[test]
fn test_removed_window_counts_as_outside() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    let window = s.window_a;
    s.pilot.app_mut().remove(window);

    s.click(IN_A);
    assert!(!a.is_open());
    assert_eq!(s.trace(), "A:outside_click");
}

#[test]
fn test_shutdown_removes_listeners() {
    let mut s = scene();
    let a = s.open_a(AutoClose::Always);
    s.pilot.app_mut().shutdown();

    assert_eq!(s.pilot.app().autoclose.listener_count(), 0);
    s.pilot.press_escape();
    s.click(OUTSIDE);
    assert!(a.is_open());
}
