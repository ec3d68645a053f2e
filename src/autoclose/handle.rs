//! Subscriber handles and the overlay-backed subscription spec.
//!
//! An overlay implements [`OverlaySource`], a pull-based view of its current
//! state, and gets a [`SubscriberHandle`] from the coordinator. The handle
//! turns participation on and off; the policy predicates are derived from
//! [`OverlaySource::auto_close`] each time an event is dispatched.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::policy::{AutoClose, CloseReason, KeyPhase, MousePhase};
use super::registry::{Registry, SubscriptionKey};
use super::spec::{Payload, SubscriptionSpec};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::event::global::GlobalEvent;

// ---------------------------------------------------------------------------
// OverlaySource
// ---------------------------------------------------------------------------

/// The overlay side of an auto-close subscription.
///
/// All getters are called during dispatch and must report live state.
pub trait OverlaySource {
    /// Current auto-close setting.
    fn auto_close(&self) -> AutoClose;

    /// Nodes that count as "inside" the overlay (its window, and usually its
    /// anchor or menu).
    fn elements_inside(&self) -> Vec<NodeId>;

    /// The node whose own handler opens and closes the overlay.
    fn toggling_element(&self) -> Option<NodeId> {
        None
    }

    /// Tear the overlay down. Implementations are expected to unsubscribe
    /// their handle.
    fn close(&self, event: &GlobalEvent, reason: CloseReason);
}

/// Event-phase options for a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubscriptionOptions {
    pub key_event: KeyPhase,
    pub mouse_event: MousePhase,
}

impl SubscriptionOptions {
    /// Default phases: Escape on `keyup`, outside clicks on `mousedown`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyboard phase (builder).
    pub fn with_key_event(mut self, phase: KeyPhase) -> Self {
        self.key_event = phase;
        self
    }

    /// Set the outside-click pointer phase (builder).
    pub fn with_mouse_event(mut self, phase: MousePhase) -> Self {
        self.mouse_event = phase;
        self
    }
}

// ---------------------------------------------------------------------------
// OverlaySpec
// ---------------------------------------------------------------------------

/// [`SubscriptionSpec`] derived from an [`OverlaySource`].
///
/// Holds the source weakly so an overlay can own its own handle. Once the
/// overlay is dropped the spec goes inert.
pub(crate) struct OverlaySpec {
    source: Weak<dyn OverlaySource>,
    options: SubscriptionOptions,
}

impl OverlaySpec {
    pub(crate) fn new(source: Weak<dyn OverlaySource>, options: SubscriptionOptions) -> Self {
        Self { source, options }
    }

    fn policy(&self) -> AutoClose {
        self.source
            .upgrade()
            .map_or(AutoClose::Never, |source| source.auto_close())
    }
}

impl SubscriptionSpec for OverlaySpec {
    fn should_auto_close(&self) -> bool {
        self.policy().is_enabled()
    }

    fn should_close_on_escape(&self, _payload: &Payload<'_>) -> bool {
        self.policy().closes_on_escape()
    }

    fn should_close_on_click_outside(&self, payload: &Payload<'_>) -> bool {
        self.policy().closes_on_outside() && !payload.target_inside
    }

    fn should_close_on_click_inside(&self, _payload: &Payload<'_>) -> bool {
        self.policy().closes_on_inside()
    }

    fn is_target_inside(&self, dom: &Dom, target: Option<NodeId>) -> Option<bool> {
        let Some(target) = target else {
            return Some(false);
        };
        let inside = self.source.upgrade().is_some_and(|source| {
            source
                .elements_inside()
                .into_iter()
                .any(|element| dom.contains_node(element, target))
        });
        Some(inside)
    }

    fn is_target_toggling_element(&self, dom: &Dom, target: Option<NodeId>) -> bool {
        let Some(target) = target else {
            return false;
        };
        self.source
            .upgrade()
            .and_then(|source| source.toggling_element())
            .is_some_and(|toggle| dom.contains_node(toggle, target))
    }

    fn key_event(&self) -> KeyPhase {
        self.options.key_event
    }

    fn mouse_event(&self) -> MousePhase {
        self.options.mouse_event
    }

    fn close(&self, event: &GlobalEvent, reason: CloseReason) {
        if let Some(source) = self.source.upgrade() {
            source.close(event, reason);
        }
    }
}

// ---------------------------------------------------------------------------
// SubscriberHandle
// ---------------------------------------------------------------------------

struct HandleInner {
    registry: Weak<RefCell<Registry>>,
    spec: Rc<dyn SubscriptionSpec>,
    key: Cell<Option<SubscriptionKey>>,
}

impl HandleInner {
    fn release(&self) -> bool {
        let Some(key) = self.key.take() else {
            return false;
        };
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        // Dispatch never holds the registry across close callbacks.
        let removed = match registry.try_borrow_mut() {
            Ok(mut registry) => registry.remove(key),
            Err(_) => false,
        };
        if removed {
            debug!(?key, "unsubscribed");
        }
        removed
    }
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        self.release();
    }
}

/// An overlay's switch for auto-close participation.
///
/// Cheap to clone; clones share state. Dropping the last clone unsubscribes.
/// All operations are idempotent and never panic.
#[derive(Clone)]
pub struct SubscriberHandle {
    inner: Rc<HandleInner>,
}

impl SubscriberHandle {
    pub(crate) fn new(registry: Weak<RefCell<Registry>>, spec: Rc<dyn SubscriptionSpec>) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                registry,
                spec,
                key: Cell::new(None),
            }),
        }
    }

    /// Join the registry on top of every existing subscription.
    ///
    /// Returns `true` if this call activated the handle, `false` if it was
    /// already active or the coordinator is gone.
    pub fn subscribe(&self) -> bool {
        if self.is_subscribed() {
            return false;
        }
        let Some(registry) = self.inner.registry.upgrade() else {
            return false;
        };
        let Ok(mut registry) = registry.try_borrow_mut() else {
            return false;
        };
        let key = registry.insert(Rc::clone(&self.inner.spec));
        self.inner.key.set(Some(key));
        debug!(?key, active = registry.len(), "subscribed");
        true
    }

    /// Leave the registry. Returns `true` if this call deactivated the handle.
    pub fn unsubscribe(&self) -> bool {
        self.inner.release()
    }

    /// Flip participation. Returns the new state.
    pub fn toggle(&self) -> bool {
        if self.is_subscribed() {
            self.unsubscribe();
            false
        } else {
            self.subscribe()
        }
    }

    /// Whether the handle currently has a live registry entry.
    pub fn is_subscribed(&self) -> bool {
        let Some(key) = self.inner.key.get() else {
            return false;
        };
        self.inner
            .registry
            .upgrade()
            .is_some_and(|registry| registry.try_borrow().is_ok_and(|r| r.contains(key)))
    }
}

impl fmt::Debug for SubscriberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberHandle")
            .field("key", &self.inner.key.get())
            .finish()
    }
}
