//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) and provides methods to
//! simulate user input (key presses, mouse presses and clicks) and collect
//! the auto-close outcomes each input produced.

use crate::app::{App, AppConfig};
use crate::autoclose::DispatchOutcome;
use crate::event::input::{
    InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent,
};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```
/// use autoclose_tui::testing::Pilot;
/// use autoclose_tui::event::Key;
///
/// let mut pilot = Pilot::new();
/// let outcomes = pilot.press_key(Key::Char('a'));
/// assert_eq!(outcomes.len(), 2);
/// assert!(pilot.is_running());
/// ```
#[derive(Debug, Default)]
pub struct Pilot {
    app: App,
}

impl Pilot {
    /// Create a pilot around a default app.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pilot from an [`AppConfig`].
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            app: App::new(config),
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Send a raw input event.
    pub fn send(&mut self, event: InputEvent) -> Vec<DispatchOutcome> {
        self.app.handle_input(event)
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> Vec<DispatchOutcome> {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Vec<DispatchOutcome> {
        self.send(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Simulate a reported key release. Only produces events when the app is
    /// configured with [`KeyReleaseMode::Reported`](crate::autoclose::KeyReleaseMode).
    pub fn release_key(&mut self, key: Key) -> Vec<DispatchOutcome> {
        self.send(InputEvent::Key(KeyEvent::release(key, Modifiers::NONE)))
    }

    /// Simulate pressing Escape.
    pub fn press_escape(&mut self) -> Vec<DispatchOutcome> {
        self.press_key(Key::Escape)
    }

    /// Press `button` at (x, y) without releasing it.
    pub fn mouse_down(&mut self, button: MouseBtn, x: u16, y: u16) -> Vec<DispatchOutcome> {
        self.send(InputEvent::Mouse(MouseEvent::new(
            MouseAction::Down(button),
            x,
            y,
        )))
    }

    /// Release `button` at (x, y).
    pub fn mouse_up(&mut self, button: MouseBtn, x: u16, y: u16) -> Vec<DispatchOutcome> {
        self.send(InputEvent::Mouse(MouseEvent::new(MouseAction::Up(button), x, y)))
    }

    /// Simulate a full left-button click at (x, y): press, then release.
    ///
    /// Returns the outcomes of both halves in delivery order.
    pub fn click(&mut self, x: u16, y: u16) -> Vec<DispatchOutcome> {
        self.click_with(MouseBtn::Left, x, y)
    }

    /// Simulate a full right-button click at (x, y).
    pub fn right_click(&mut self, x: u16, y: u16) -> Vec<DispatchOutcome> {
        self.click_with(MouseBtn::Right, x, y)
    }

    fn click_with(&mut self, button: MouseBtn, x: u16, y: u16) -> Vec<DispatchOutcome> {
        let mut outcomes = self.mouse_down(button, x, y);
        outcomes.extend(self.mouse_up(button, x, y));
        outcomes
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Whether the app is still running.
    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
