//! Dispatch policy: which subscription, if any, closes for a given event.
//!
//! Three scans, one per physical action category:
//!
//! - **click** resolves inside clicks,
//! - **mouse** (`mousedown`/`mouseup`) resolves outside clicks,
//! - **key** (`keydown`/`keyup`, Escape only) resolves Escape.
//!
//! Every scan walks subscriptions newest first and stops at the first match,
//! so one user action closes at most one overlay. The only state carried
//! between events is whether the current press already closed something via
//! the mouse scan; if it did, the `click` that follows is suppressed.

use std::rc::Rc;

use tracing::{debug, trace};

use super::policy::CloseReason;
use super::spec::{Payload, SubscriptionSpec};
use crate::dom::tree::Dom;
use crate::event::global::{EventType, GlobalEvent};

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A subscription was asked to close.
    Closed {
        reason: CloseReason,
        event_type: EventType,
    },
    /// No subscription reacted.
    Ignored,
    /// The click scan was skipped because the mouse scan already handled
    /// this physical action.
    Suppressed,
}

impl DispatchOutcome {
    /// Whether a close was issued.
    pub fn is_closed(self) -> bool {
        matches!(self, DispatchOutcome::Closed { .. })
    }
}

/// What the mouse scan concluded for the current press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MouseResolution {
    #[default]
    Unknown,
    Closed,
    Ignored,
}

/// The scan procedures plus their one piece of cross-event state.
#[derive(Debug, Default)]
pub struct DispatchPolicy {
    mouse: MouseResolution,
}

impl DispatchPolicy {
    /// Create a policy with no press in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `event` to the matching scan over `subscriptions` (newest first).
    pub fn dispatch(
        &mut self,
        subscriptions: &[Rc<dyn SubscriptionSpec>],
        dom: &Dom,
        event: &GlobalEvent,
    ) -> DispatchOutcome {
        match event.event_type {
            EventType::Click => self.click_scan(subscriptions, dom, event),
            EventType::MouseDown | EventType::MouseUp => {
                self.mouse_scan(subscriptions, dom, event)
            }
            EventType::KeyDown | EventType::KeyUp => key_scan(subscriptions, dom, event),
        }
    }

    #[cfg(test)]
    pub(crate) fn mouse_handled(&self) -> bool {
        self.mouse == MouseResolution::Closed
    }

    fn click_scan(
        &mut self,
        subscriptions: &[Rc<dyn SubscriptionSpec>],
        dom: &Dom,
        event: &GlobalEvent,
    ) -> DispatchOutcome {
        if !event.is_primary_button() {
            return DispatchOutcome::Ignored;
        }
        if self.mouse == MouseResolution::Closed {
            trace!("click suppressed: press already closed an overlay");
            return DispatchOutcome::Suppressed;
        }

        for (index, spec) in subscriptions.iter().enumerate() {
            let Some(inside) = spec.is_target_inside(dom, event.target) else {
                continue;
            };
            if !spec.should_auto_close() {
                continue;
            }
            let payload = Payload {
                event,
                target_inside: inside,
            };
            if !spec.should_close_on_click_inside(&payload) {
                continue;
            }
            if !inside {
                trace!(index, "click outside subscription");
                continue;
            }
            return fire(spec.as_ref(), index, dom, event, CloseReason::InsideClick);
        }
        DispatchOutcome::Ignored
    }

    fn mouse_scan(
        &mut self,
        subscriptions: &[Rc<dyn SubscriptionSpec>],
        dom: &Dom,
        event: &GlobalEvent,
    ) -> DispatchOutcome {
        if !event.is_primary_button() {
            return DispatchOutcome::Ignored;
        }
        if event.event_type == EventType::MouseDown {
            self.mouse = MouseResolution::Unknown;
        }

        for (index, spec) in subscriptions.iter().enumerate() {
            if !spec.mouse_event().matches(event.event_type) {
                continue;
            }
            if !spec.should_auto_close() {
                continue;
            }
            if spec.is_target_toggling_element(dom, event.target) {
                trace!(index, "press on toggling element");
                continue;
            }
            let inside = spec.is_target_inside(dom, event.target) == Some(true);
            let payload = Payload {
                event,
                target_inside: inside,
            };
            if inside {
                // Inside targets only close here when the outside predicate
                // explicitly opts back in.
                if !spec.should_close_on_click_outside(&payload) {
                    continue;
                }
            } else if !spec.should_close_on_click_outside(&payload) {
                continue;
            }
            self.mouse = MouseResolution::Closed;
            return fire(spec.as_ref(), index, dom, event, CloseReason::OutsideClick);
        }

        if self.mouse == MouseResolution::Unknown {
            self.mouse = MouseResolution::Ignored;
        }
        DispatchOutcome::Ignored
    }
}

fn key_scan(
    subscriptions: &[Rc<dyn SubscriptionSpec>],
    dom: &Dom,
    event: &GlobalEvent,
) -> DispatchOutcome {
    if !event.is_escape() {
        return DispatchOutcome::Ignored;
    }

    for (index, spec) in subscriptions.iter().enumerate() {
        if !spec.key_event().matches(event.event_type) {
            continue;
        }
        if !spec.should_auto_close() {
            continue;
        }
        let payload = Payload {
            event,
            target_inside: spec.is_target_inside(dom, event.target) == Some(true),
        };
        if !spec.should_close_on_escape(&payload) {
            continue;
        }
        return fire(spec.as_ref(), index, dom, event, CloseReason::Escape);
    }
    DispatchOutcome::Ignored
}

fn fire(
    spec: &dyn SubscriptionSpec,
    index: usize,
    dom: &Dom,
    event: &GlobalEvent,
    reason: CloseReason,
) -> DispatchOutcome {
    let target = event
        .target
        .and_then(|id| dom.get(id))
        .map_or("document", |data| data.widget_type.as_str());
    debug!(index, %reason, event_type = %event.event_type, target, "closing overlay");
    spec.close(event, reason);
    DispatchOutcome::Closed {
        reason,
        event_type: event.event_type,
    }
}
