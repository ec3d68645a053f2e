//! The subscription contract between an overlay and the dispatch policy.

use super::policy::{CloseReason, KeyPhase, MousePhase};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::event::global::GlobalEvent;

/// What a policy predicate gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    /// The event being dispatched.
    pub event: &'a GlobalEvent,
    /// Whether the event target lies inside the overlay. Always `false` when
    /// the subscription declares no inside test.
    pub target_inside: bool,
}

/// One open overlay's auto-close behaviour.
///
/// Implementations are consulted on every dispatched event, so predicates must
/// reflect the overlay's current state rather than a snapshot taken at
/// subscription time. Most overlays get an implementation from
/// [`AutoCloseCoordinator::handle`](super::AutoCloseCoordinator::handle); the
/// trait is public so custom policies can be plugged in directly.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use autoclose_tui::autoclose::{
///     AutoCloseConfig, AutoCloseCoordinator, CloseReason, DispatchOutcome, Payload,
///     SubscriptionSpec,
/// };
/// use autoclose_tui::dom::Dom;
/// use autoclose_tui::event::{EventType, GlobalEvent, Key, MouseBtn};
///
/// struct EscapeOnly;
///
/// impl SubscriptionSpec for EscapeOnly {
///     fn should_auto_close(&self) -> bool {
///         true
///     }
///     fn should_close_on_escape(&self, _: &Payload<'_>) -> bool {
///         true
///     }
///     fn should_close_on_click_outside(&self, _: &Payload<'_>) -> bool {
///         false
///     }
///     fn should_close_on_click_inside(&self, _: &Payload<'_>) -> bool {
///         false
///     }
///     fn close(&self, _: &GlobalEvent, _: CloseReason) {}
/// }
///
/// let dom = Dom::new();
/// let mut coordinator = AutoCloseCoordinator::new(AutoCloseConfig::default());
/// let handle = coordinator.handle_for_spec(Rc::new(EscapeOnly));
/// handle.subscribe();
///
/// let press = GlobalEvent::mouse(EventType::MouseDown, MouseBtn::Left, None);
/// assert_eq!(coordinator.dispatch(&dom, &press), DispatchOutcome::Ignored);
///
/// let escape = GlobalEvent::key(EventType::KeyUp, Key::Escape, None);
/// assert_eq!(
///     coordinator.dispatch(&dom, &escape),
///     DispatchOutcome::Closed {
///         reason: CloseReason::Escape,
///         event_type: EventType::KeyUp,
///     }
/// );
/// ```
pub trait SubscriptionSpec {
    /// Master switch.
    fn should_auto_close(&self) -> bool;

    /// Whether an Escape key event in the [`key_event`](Self::key_event)
    /// phase closes the overlay.
    fn should_close_on_escape(&self, payload: &Payload<'_>) -> bool;

    /// Whether a primary-button press in the
    /// [`mouse_event`](Self::mouse_event) phase closes the overlay.
    ///
    /// Also asked for presses whose target is inside, with
    /// `payload.target_inside` set. Returning `true` there closes on an
    /// inside press.
    fn should_close_on_click_outside(&self, payload: &Payload<'_>) -> bool;

    /// Whether a synthesized click on a target inside the overlay closes it.
    fn should_close_on_click_inside(&self, payload: &Payload<'_>) -> bool;

    /// `None` when the subscription has no notion of "inside".
    fn is_target_inside(&self, _dom: &Dom, _target: Option<NodeId>) -> Option<bool> {
        None
    }

    /// Whether the target is the element that toggles this overlay.
    fn is_target_toggling_element(&self, _dom: &Dom, _target: Option<NodeId>) -> bool {
        false
    }

    /// Keyboard phase the Escape check listens to. `Default` means keyup.
    fn key_event(&self) -> KeyPhase {
        KeyPhase::Default
    }

    /// Pointer phase the outside check listens to. `Default` means mousedown.
    fn mouse_event(&self) -> MousePhase {
        MousePhase::Default
    }

    /// Close the overlay. Called at most once per physical user action, and
    /// free to unsubscribe (or subscribe other handles) re-entrantly.
    fn close(&self, event: &GlobalEvent, reason: CloseReason);
}
