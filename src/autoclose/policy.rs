//! Auto-close policy values and event-phase selectors.

use std::fmt;
use std::str::FromStr;

use crate::event::global::EventType;

// ---------------------------------------------------------------------------
// AutoClose
// ---------------------------------------------------------------------------

/// When an open overlay closes itself.
///
/// | value     | inside click | outside click | Escape |
/// |-----------|--------------|---------------|--------|
/// | `Always`  | yes          | yes           | yes    |
/// | `Inside`  | yes          | no            | yes    |
/// | `Outside` | no           | yes           | yes    |
/// | `Never`   | no           | no            | no     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutoClose {
    /// `true`
    #[default]
    Always,
    /// `false`
    Never,
    /// `"inside"`
    Inside,
    /// `"outside"`
    Outside,
}

impl AutoClose {
    /// Master switch: anything but `Never`.
    pub fn is_enabled(self) -> bool {
        self != AutoClose::Never
    }

    /// Whether clicks inside the overlay close it.
    pub fn closes_on_inside(self) -> bool {
        matches!(self, AutoClose::Always | AutoClose::Inside)
    }

    /// Whether clicks outside the overlay close it.
    pub fn closes_on_outside(self) -> bool {
        matches!(self, AutoClose::Always | AutoClose::Outside)
    }

    /// Whether Escape closes the overlay.
    pub fn closes_on_escape(self) -> bool {
        self.is_enabled()
    }

    /// The configuration spelling of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            AutoClose::Always => "true",
            AutoClose::Never => "false",
            AutoClose::Inside => "inside",
            AutoClose::Outside => "outside",
        }
    }
}

impl From<bool> for AutoClose {
    fn from(enabled: bool) -> Self {
        if enabled {
            AutoClose::Always
        } else {
            AutoClose::Never
        }
    }
}

/// Error returned when an auto-close setting cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid auto-close value `{value}`: expected `true`, `false`, `inside` or `outside`")]
pub struct ParseAutoCloseError {
    pub value: String,
}

impl FromStr for AutoClose {
    type Err = ParseAutoCloseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "true" => Ok(AutoClose::Always),
            "false" => Ok(AutoClose::Never),
            "inside" => Ok(AutoClose::Inside),
            "outside" => Ok(AutoClose::Outside),
            other => Err(ParseAutoCloseError {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AutoClose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event phases
// ---------------------------------------------------------------------------

/// Which keyboard phase a subscription reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPhase {
    /// Nothing chosen: react on `keyup`.
    #[default]
    Default,
    KeyDown,
    KeyUp,
    /// Both `keydown` and `keyup`.
    Any,
}

impl KeyPhase {
    /// Whether a key event of `event_type` qualifies.
    pub fn matches(self, event_type: EventType) -> bool {
        match self {
            KeyPhase::Default | KeyPhase::KeyUp => event_type == EventType::KeyUp,
            KeyPhase::KeyDown => event_type == EventType::KeyDown,
            KeyPhase::Any => event_type.is_key(),
        }
    }
}

/// Which pointer phase a subscription uses for outside-click detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MousePhase {
    /// Nothing chosen: react on `mousedown`.
    #[default]
    Default,
    MouseDown,
    MouseUp,
    /// Both `mousedown` and `mouseup`.
    Any,
}

impl MousePhase {
    /// Whether a pointer event of `event_type` qualifies.
    pub fn matches(self, event_type: EventType) -> bool {
        match self {
            MousePhase::Default | MousePhase::MouseDown => event_type == EventType::MouseDown,
            MousePhase::MouseUp => event_type == EventType::MouseUp,
            MousePhase::Any => {
                matches!(event_type, EventType::MouseDown | EventType::MouseUp)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CloseReason
// ---------------------------------------------------------------------------

/// Why the coordinator asked an overlay to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    Escape,
    OutsideClick,
    InsideClick,
}

impl CloseReason {
    /// Stable snake-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::Escape => "escape",
            CloseReason::OutsideClick => "outside_click",
            CloseReason::InsideClick => "inside_click",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
