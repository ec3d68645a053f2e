//! Coordinator configuration.

/// How `keyup` events are obtained.
///
/// Most terminals only report key presses. Without releases, subscriptions
/// listening on `keyup` (the default) would never see Escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyReleaseMode {
    /// Emit `keyup` right after every `keydown`; reported releases are dropped.
    #[default]
    Synthesized,
    /// Trust the terminal to report releases (keyboard enhancement enabled).
    Reported,
}

/// Configuration for the auto-close coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCloseConfig {
    /// Source of `keyup` events.
    pub key_release: KeyReleaseMode,
    /// Whether a `click` is synthesized from each matching down/up pair.
    pub synthesize_clicks: bool,
}

impl Default for AutoCloseConfig {
    fn default() -> Self {
        Self {
            key_release: KeyReleaseMode::Synthesized,
            synthesize_clicks: true,
        }
    }
}

impl AutoCloseConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key release mode (builder).
    pub fn with_key_release(mut self, mode: KeyReleaseMode) -> Self {
        self.key_release = mode;
        self
    }

    /// Enable or disable click synthesis (builder).
    pub fn with_click_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_clicks = enabled;
        self
    }
}
