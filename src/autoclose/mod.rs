//! Auto-close coordination for overlays.
//!
//! A single [`AutoCloseCoordinator`] listens to document-level `click`,
//! `mousedown`, `mouseup`, `keydown` and `keyup` events and decides which open
//! overlay, if any, closes in response. Overlays participate through a
//! [`SubscriberHandle`]: subscribe on open, unsubscribe on close.
//!
//! - [`policy`]: the [`AutoClose`] setting, event-phase selectors, close reasons
//! - [`spec`]: the [`SubscriptionSpec`] contract
//! - [`registry`]: newest-first subscription storage
//! - [`dispatch`]: the click, mouse and key scans
//! - [`handle`]: [`OverlaySource`] and [`SubscriberHandle`]
//! - [`tap`]: listener installation and raw input translation

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod handle;
pub mod policy;
pub mod registry;
pub mod spec;
pub mod tap;

pub use config::{AutoCloseConfig, KeyReleaseMode};
pub use coordinator::AutoCloseCoordinator;
pub use dispatch::{DispatchOutcome, DispatchPolicy};
pub use handle::{OverlaySource, SubscriberHandle, SubscriptionOptions};
pub use policy::{AutoClose, CloseReason, KeyPhase, MousePhase, ParseAutoCloseError};
pub use registry::{Registry, SubscriptionKey};
pub use spec::{Payload, SubscriptionSpec};
pub use tap::{GlobalTap, TargetContext};
