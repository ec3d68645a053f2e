//! Event system: raw input, document-level events, click synthesis.

pub mod click;
pub mod global;
pub mod input;

pub use click::{Click, ClickSynthesizer};
pub use global::{EventType, GlobalEvent};
pub use input::{
    InputEvent, Key, KeyEvent, KeyKind, Modifiers, MouseAction, MouseBtn, MouseEvent,
    ParseKeyError,
};
