//! Click synthesis from button down/up pairs.
//!
//! Terminals report presses and releases but never clicks. [`ClickSynthesizer`]
//! pairs a release with the pending press of the same button and produces a
//! [`Click`] whose target follows DOM rules: the nearest node containing both
//! the press target and the release target.
//!
//! ## Click Generation Rules
//!
//! 1. **Button match**: the release must be for a pressed button. Each button
//!    is tracked on its own, so pressing another button in between does not
//!    cancel a pending press.
//! 2. **Same target**: the click targets that node.
//! 3. **Different targets**: the click targets their common ancestor, or the
//!    bare document (`None`) when they share none.
//! 4. **No active press**: no click.

use super::input::MouseBtn;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// A press waiting for its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Press {
    button: MouseBtn,
    target: Option<NodeId>,
}

/// A synthesized click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub button: MouseBtn,
    pub target: Option<NodeId>,
}

/// Pairs button presses with releases.
#[derive(Debug, Clone, Default)]
pub struct ClickSynthesizer {
    /// At most one entry per button.
    pending: Vec<Press>,
}

impl ClickSynthesizer {
    /// Create a synthesizer with no pending press.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press of `button` on `target`, replacing any earlier press of
    /// the same button.
    pub fn on_down(&mut self, button: MouseBtn, target: Option<NodeId>) {
        self.pending.retain(|press| press.button != button);
        self.pending.push(Press { button, target });
    }

    /// Record a release of `button` on `target`, returning the click it completes.
    pub fn on_up(&mut self, dom: &Dom, button: MouseBtn, target: Option<NodeId>) -> Option<Click> {
        let index = self.pending.iter().position(|press| press.button == button)?;
        let press = self.pending.swap_remove(index);
        let target = match (press.target, target) {
            (Some(down), Some(up)) if down == up => Some(down),
            (Some(down), Some(up)) => dom.common_ancestor(down, up),
            _ => None,
        };
        Some(Click { button, target })
    }

    #[cfg(test)]
    pub(crate) fn is_pressed(&self, button: MouseBtn) -> bool {
        self.pending.iter().any(|press| press.button == button)
    }

    /// Forget every pending press.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
