//! Document-level events as seen by global listeners.
//!
//! A [`GlobalEvent`] is what the auto-close machinery dispatches on: one of the
//! five listened [`EventType`]s, the node it targets and the button or key that
//! produced it. The global tap builds these from raw [`InputEvent`]s.
//!
//! [`InputEvent`]: super::input::InputEvent

use std::fmt;

use super::input::{Key, Modifiers, MouseBtn};
use crate::dom::node::NodeId;
use crate::geometry::Offset;

/// The document event types a global listener can be installed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseDown,
    MouseUp,
    KeyDown,
    KeyUp,
}

impl EventType {
    /// Every listened event type, in installation order.
    pub const ALL: [EventType; 5] = [
        EventType::Click,
        EventType::MouseDown,
        EventType::MouseUp,
        EventType::KeyDown,
        EventType::KeyUp,
    ];

    /// The DOM name of this event type.
    pub fn name(self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
        }
    }

    /// Whether this is a pointer event type.
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            EventType::Click | EventType::MouseDown | EventType::MouseUp
        )
    }

    /// Whether this is a keyboard event type.
    pub fn is_key(self) -> bool {
        matches!(self, EventType::KeyDown | EventType::KeyUp)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single document-level event.
///
/// `target` is `None` when the event hit no node (the bare document) or, for
/// keyboard events, when nothing is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEvent {
    pub event_type: EventType,
    pub target: Option<NodeId>,
    /// Set for pointer events.
    pub button: Option<MouseBtn>,
    /// Set for keyboard events.
    pub key: Option<Key>,
    pub modifiers: Modifiers,
    /// Pointer position in cells, for pointer events.
    pub position: Option<Offset>,
}

impl GlobalEvent {
    /// A pointer event of the given type.
    pub fn mouse(event_type: EventType, button: MouseBtn, target: Option<NodeId>) -> Self {
        debug_assert!(event_type.is_mouse(), "{event_type} is not a mouse event");
        Self {
            event_type,
            target,
            button: Some(button),
            key: None,
            modifiers: Modifiers::NONE,
            position: None,
        }
    }

    /// A keyboard event of the given type.
    pub fn key(event_type: EventType, key: Key, target: Option<NodeId>) -> Self {
        debug_assert!(event_type.is_key(), "{event_type} is not a key event");
        Self {
            event_type,
            target,
            button: None,
            key: Some(key),
            modifiers: Modifiers::NONE,
            position: None,
        }
    }

    /// Set the modifiers (builder).
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the pointer position (builder).
    pub fn at(mut self, position: Offset) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether this is a pointer event from the primary button.
    pub fn is_primary_button(&self) -> bool {
        self.button.is_some_and(MouseBtn::is_primary)
    }

    /// Whether this is a keyboard event for the Escape key.
    pub fn is_escape(&self) -> bool {
        self.key.is_some_and(Key::is_escape)
    }
}
