//! App struct: lifecycle, input routing, focus.
//!
//! [`App`] ties together the DOM, the hit-test map and the auto-close
//! coordinator. Everything except [`App::poll_input`] works without a real
//! terminal, which is how the [`Pilot`](crate::testing::Pilot) drives it.

use std::io;
use std::time::Duration;

use crate::autoclose::{AutoCloseConfig, AutoCloseCoordinator, DispatchOutcome, TargetContext};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::event::input::InputEvent;
use crate::geometry::Region;
use crate::layout::spatial::SpatialMap;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Auto-close coordinator settings.
    pub autoclose: AutoCloseConfig,
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auto-close settings (builder).
    pub fn with_autoclose(mut self, autoclose: AutoCloseConfig) -> Self {
        self.autoclose = autoclose;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// Owns the DOM, the spatial map used for pointer targeting, the focused node
/// and the auto-close coordinator.
#[derive(Debug)]
pub struct App {
    /// The node tree.
    pub dom: Dom,
    /// Screen regions, front to back.
    pub hits: SpatialMap,
    /// The process-scoped auto-close coordinator.
    pub autoclose: AutoCloseCoordinator,
    /// Application configuration.
    pub config: AppConfig,
    focused: Option<NodeId>,
    running: bool,
}

impl App {
    /// Create an app and start its auto-close coordinator.
    pub fn new(config: AppConfig) -> Self {
        Self {
            dom: Dom::new(),
            hits: SpatialMap::new(),
            autoclose: AutoCloseCoordinator::new(config.autoclose.clone()),
            config,
            focused: None,
            running: true,
        }
    }

    /// Give `node` a screen region, in front of everything placed so far.
    pub fn place(&mut self, node: NodeId, region: Region) {
        self.hits.push(node, region);
    }

    /// Remove `node` and its subtree from both the DOM and the hit map.
    pub fn remove(&mut self, node: NodeId) {
        for id in self.dom.descendants(node) {
            self.hits.remove(id);
        }
        self.dom.remove(node);
        if self.focused.is_some_and(|f| !self.dom.contains(f)) {
            self.focused = None;
        }
    }

    /// Move keyboard focus. Unknown nodes clear focus.
    pub fn focus(&mut self, node: NodeId) {
        self.focused = self.dom.contains(node).then_some(node);
    }

    /// Clear keyboard focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The node keyboard events currently target.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Route one input event through the auto-close coordinator.
    ///
    /// Returns one outcome per document event the input produced. Nothing is
    /// routed once the app has shut down.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<DispatchOutcome> {
        if !self.running {
            return Vec::new();
        }
        let ctx = TargetContext {
            dom: &self.dom,
            hits: &self.hits,
            focused: self.focused,
        };
        self.autoclose.handle_input(ctx, &event)
    }

    /// Wait up to `timeout` for the next terminal event.
    pub fn poll_input(timeout: Duration) -> io::Result<Option<InputEvent>> {
        if crossterm::event::poll(timeout)? {
            Ok(Some(crossterm::event::read()?.into()))
        } else {
            Ok(None)
        }
    }

    /// Stop routing input and remove the coordinator's listeners.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.autoclose.shutdown();
    }

    /// Whether the app is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
