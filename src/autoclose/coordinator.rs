//! The process-scoped auto-close coordinator.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span};

use super::config::AutoCloseConfig;
use super::dispatch::{DispatchOutcome, DispatchPolicy};
use super::handle::{OverlaySource, OverlaySpec, SubscriberHandle, SubscriptionOptions};
use super::registry::Registry;
use super::spec::SubscriptionSpec;
use super::tap::{GlobalTap, TargetContext};
use crate::dom::tree::Dom;
use crate::event::global::GlobalEvent;
use crate::event::input::InputEvent;

/// Owns the registry, the global listeners and the dispatch state.
///
/// Create one at application start and keep it for the application's
/// lifetime. Overlays only ever see [`SubscriberHandle`]s; listener
/// installation stays private.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use autoclose_tui::autoclose::{
///     AutoClose, AutoCloseCoordinator, CloseReason, OverlaySource, SubscriptionOptions,
/// };
/// use autoclose_tui::dom::{Dom, NodeData, NodeId};
/// use autoclose_tui::event::{EventType, GlobalEvent, Key};
///
/// struct Tooltip {
///     window: NodeId,
///     closed: Cell<bool>,
/// }
///
/// impl OverlaySource for Tooltip {
///     fn auto_close(&self) -> AutoClose {
///         AutoClose::Always
///     }
///     fn elements_inside(&self) -> Vec<NodeId> {
///         vec![self.window]
///     }
///     fn close(&self, _event: &GlobalEvent, reason: CloseReason) {
///         assert_eq!(reason, CloseReason::Escape);
///         self.closed.set(true);
///     }
/// }
///
/// let mut dom = Dom::new();
/// let window = dom.insert(NodeData::new("Tooltip"));
/// let tooltip = Rc::new(Tooltip { window, closed: Cell::new(false) });
///
/// let mut coordinator = AutoCloseCoordinator::default();
/// let handle = coordinator.handle(&tooltip, SubscriptionOptions::default());
/// handle.subscribe();
///
/// coordinator.dispatch(&dom, &GlobalEvent::key(EventType::KeyUp, Key::Escape, None));
/// assert!(tooltip.closed.get());
/// ```
pub struct AutoCloseCoordinator {
    registry: Rc<RefCell<Registry>>,
    tap: GlobalTap,
    policy: DispatchPolicy,
}

impl AutoCloseCoordinator {
    /// Create a coordinator and install its listeners.
    pub fn new(config: AutoCloseConfig) -> Self {
        let mut tap = GlobalTap::new(config);
        tap.install();
        debug!(listeners = tap.listener_count(), "auto-close coordinator started");
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
            tap,
            policy: DispatchPolicy::new(),
        }
    }

    /// Create a handle for an overlay.
    ///
    /// The coordinator keeps only a weak reference to `overlay`, so the overlay
    /// may store the returned handle inside itself.
    pub fn handle<O>(&self, overlay: &Rc<O>, options: SubscriptionOptions) -> SubscriberHandle
    where
        O: OverlaySource + 'static,
    {
        let source: Weak<dyn OverlaySource> = Rc::downgrade(overlay) as Weak<dyn OverlaySource>;
        self.handle_for_spec(Rc::new(OverlaySpec::new(source, options)))
    }

    /// Create a handle for a custom [`SubscriptionSpec`].
    pub fn handle_for_spec(&self, spec: Rc<dyn SubscriptionSpec>) -> SubscriberHandle {
        SubscriberHandle::new(Rc::downgrade(&self.registry), spec)
    }

    /// Feed one raw input event through the tap and dispatch every document
    /// event it produces.
    pub fn handle_input(
        &mut self,
        ctx: TargetContext<'_>,
        input: &InputEvent,
    ) -> Vec<DispatchOutcome> {
        let events = self.tap.translate(ctx, input);
        events
            .iter()
            .map(|event| self.dispatch(ctx.dom, event))
            .collect()
    }

    /// Dispatch a single document event.
    ///
    /// Events of a type with no installed listener (for example after
    /// [`shutdown`](Self::shutdown)) are ignored.
    pub fn dispatch(&mut self, dom: &Dom, event: &GlobalEvent) -> DispatchOutcome {
        if !self.tap.is_listening(event.event_type) {
            return DispatchOutcome::Ignored;
        }
        let _span = debug_span!("autoclose_dispatch", event_type = %event.event_type).entered();
        let subscriptions = self.registry.borrow().snapshot();
        self.policy.dispatch(&subscriptions, dom, event)
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Number of installed document listeners: 5 while running, 0 after
    /// shutdown.
    pub fn listener_count(&self) -> usize {
        self.tap.listener_count()
    }

    /// Whether the listeners are installed.
    pub fn is_running(&self) -> bool {
        self.tap.is_installed()
    }

    /// The configuration in effect.
    pub fn config(&self) -> &AutoCloseConfig {
        self.tap.config()
    }

    /// Remove the document listeners. Subscriptions stay registered but no
    /// longer receive events. Idempotent.
    pub fn shutdown(&mut self) {
        if self.tap.is_installed() {
            self.tap.teardown();
            debug!("auto-close coordinator stopped");
        }
    }
}

impl Default for AutoCloseCoordinator {
    fn default() -> Self {
        Self::new(AutoCloseConfig::default())
    }
}

impl Drop for AutoCloseCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for AutoCloseCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoCloseCoordinator")
            .field("registry", &self.registry)
            .field("tap", &self.tap)
            .field("policy", &self.policy)
            .finish()
    }
}
