//! Global event tap: the document-level listeners.
//!
//! One listener per [`EventType`] is installed for the lifetime of the
//! coordinator, however many overlays are open. The tap also turns raw
//! terminal input into the document events those listeners receive: it
//! resolves pointer targets through the [`SpatialMap`], pairs presses with
//! releases into clicks, and synthesizes `keyup` when the terminal does not
//! report key releases.

use tracing::trace;

use super::config::{AutoCloseConfig, KeyReleaseMode};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::event::click::ClickSynthesizer;
use crate::event::global::{EventType, GlobalEvent};
use crate::event::input::{InputEvent, KeyEvent, KeyKind, MouseAction, MouseEvent};
use crate::geometry::Offset;
use crate::layout::spatial::SpatialMap;

/// Where the tap resolves event targets.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub dom: &'a Dom,
    pub hits: &'a SpatialMap,
    /// Target of keyboard events.
    pub focused: Option<NodeId>,
}

/// The installed listeners and input translation state.
#[derive(Debug)]
pub struct GlobalTap {
    listeners: Vec<EventType>,
    clicks: ClickSynthesizer,
    config: AutoCloseConfig,
}

impl GlobalTap {
    /// Create a tap with no listeners installed.
    pub fn new(config: AutoCloseConfig) -> Self {
        Self {
            listeners: Vec::with_capacity(EventType::ALL.len()),
            clicks: ClickSynthesizer::new(),
            config,
        }
    }

    /// Install one listener per event type. Idempotent.
    pub fn install(&mut self) {
        for event_type in EventType::ALL {
            if !self.listeners.contains(&event_type) {
                self.listeners.push(event_type);
                trace!(%event_type, "listener installed");
            }
        }
    }

    /// Remove every listener and forget any half-finished press.
    pub fn teardown(&mut self) {
        for event_type in self.listeners.drain(..) {
            trace!(%event_type, "listener removed");
        }
        self.clicks.reset();
    }

    /// Whether a listener for `event_type` is installed.
    pub fn is_listening(&self, event_type: EventType) -> bool {
        self.listeners.contains(&event_type)
    }

    /// Whether the tap is installed at all.
    pub fn is_installed(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Number of installed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The configuration this tap translates with.
    pub fn config(&self) -> &AutoCloseConfig {
        &self.config
    }

    /// Translate one raw input event into the document events it produces,
    /// in delivery order. Events without an installed listener are dropped.
    pub fn translate(&mut self, ctx: TargetContext<'_>, input: &InputEvent) -> Vec<GlobalEvent> {
        let mut events = match input {
            InputEvent::Key(key) => self.translate_key(ctx, key),
            InputEvent::Mouse(mouse) => self.translate_mouse(ctx, mouse),
            _ => Vec::new(),
        };
        events.retain(|event| self.is_listening(event.event_type));
        events
    }

    fn translate_key(&self, ctx: TargetContext<'_>, key: &KeyEvent) -> Vec<GlobalEvent> {
        let make = |event_type| {
            GlobalEvent::key(event_type, key.code, ctx.focused).with_modifiers(key.modifiers)
        };
        match (key.kind, self.config.key_release) {
            (KeyKind::Press | KeyKind::Repeat, KeyReleaseMode::Synthesized) => {
                vec![make(EventType::KeyDown), make(EventType::KeyUp)]
            }
            (KeyKind::Press | KeyKind::Repeat, KeyReleaseMode::Reported) => {
                vec![make(EventType::KeyDown)]
            }
            (KeyKind::Release, KeyReleaseMode::Reported) => vec![make(EventType::KeyUp)],
            (KeyKind::Release, KeyReleaseMode::Synthesized) => Vec::new(),
        }
    }

    fn translate_mouse(&mut self, ctx: TargetContext<'_>, mouse: &MouseEvent) -> Vec<GlobalEvent> {
        let position = Offset::from((mouse.x, mouse.y));
        let target = ctx.hits.node_at(position, ctx.dom);
        let make = |event_type, button, target| {
            GlobalEvent::mouse(event_type, button, target)
                .with_modifiers(mouse.modifiers)
                .at(position)
        };
        match mouse.kind {
            MouseAction::Down(button) => {
                self.clicks.on_down(button, target);
                vec![make(EventType::MouseDown, button, target)]
            }
            MouseAction::Up(button) => {
                let mut events = vec![make(EventType::MouseUp, button, target)];
                let click = self.clicks.on_up(ctx.dom, button, target);
                if self.config.synthesize_clicks {
                    if let Some(click) = click {
                        events.push(make(EventType::Click, click.button, click.target));
                    }
                }
                events
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::node::NodeData;
    use crate::event::input::{Key, Modifiers, MouseBtn};
    use crate::geometry::Region;

    struct Scene {
        dom: Dom,
        hits: SpatialMap,
        body: NodeId,
        left: NodeId,
        right: NodeId,
    }

    fn scene() -> Scene {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("Body"));
        let left = dom.insert_child(body, NodeData::new("Left"));
        let right = dom.insert_child(body, NodeData::new("Right"));
        let mut hits = SpatialMap::new();
        hits.push(body, Region::new(0, 0, 40, 10));
        hits.push(left, Region::new(0, 0, 10, 10));
        hits.push(right, Region::new(20, 0, 10, 10));
        Scene {
            dom,
            hits,
            body,
            left,
            right,
        }
    }

    fn ctx(s: &Scene) -> TargetContext<'_> {
        TargetContext {
            dom: &s.dom,
            hits: &s.hits,
            focused: None,
        }
    }

    fn installed(config: AutoCloseConfig) -> GlobalTap {
        let mut tap = GlobalTap::new(config);
        tap.install();
        tap
    }

    fn mouse(kind: MouseAction, x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(kind, x, y))
    }

    fn types(events: &[GlobalEvent]) -> Vec<EventType> {
        events.iter().map(|e| e.event_type).collect()
    }

    // ── Listener lifecycle ───────────────────────────────────────────

    #[test]
    fn install_is_idempotent() {
        let mut tap = GlobalTap::new(AutoCloseConfig::default());
        assert!(!tap.is_installed());
        tap.install();
        tap.install();
        assert_eq!(tap.listener_count(), 5);
        for event_type in EventType::ALL {
            assert!(tap.is_listening(event_type));
        }
    }

    #[test]
    fn teardown_removes_all_listeners() {
        let mut tap = installed(AutoCloseConfig::default());
        tap.teardown();
        assert_eq!(tap.listener_count(), 0);
        let s = scene();
        let events = tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 1, 1));
        assert!(events.is_empty());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn press_synthesizes_keyup() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        let input = InputEvent::Key(KeyEvent::new(Key::Escape, Modifiers::NONE));
        let events = tap.translate(ctx(&s), &input);
        assert_eq!(types(&events), vec![EventType::KeyDown, EventType::KeyUp]);
        assert!(events.iter().all(GlobalEvent::is_escape));
    }

    #[test]
    fn synthesized_mode_drops_reported_release() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        let input = InputEvent::Key(KeyEvent::release(Key::Escape, Modifiers::NONE));
        assert!(tap.translate(ctx(&s), &input).is_empty());
    }

    #[test]
    fn reported_mode_maps_kinds_one_to_one() {
        let s = scene();
        let mut tap =
            installed(AutoCloseConfig::new().with_key_release(KeyReleaseMode::Reported));
        let press = InputEvent::Key(KeyEvent::new(Key::Escape, Modifiers::NONE));
        let release = InputEvent::Key(KeyEvent::release(Key::Escape, Modifiers::NONE));
        assert_eq!(types(&tap.translate(ctx(&s), &press)), vec![EventType::KeyDown]);
        assert_eq!(types(&tap.translate(ctx(&s), &release)), vec![EventType::KeyUp]);
    }

    #[test]
    fn key_events_target_focused_node() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        let focused = TargetContext {
            focused: Some(s.left),
            ..ctx(&s)
        };
        let input = InputEvent::Key(KeyEvent::new(Key::Escape, Modifiers::NONE));
        let events = tap.translate(focused, &input);
        assert!(events.iter().all(|e| e.target == Some(s.left)));
    }

    // ── Mouse ────────────────────────────────────────────────────────

    #[test]
    fn down_up_same_node_yields_click() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        let down = tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 2, 2));
        let up = tap.translate(ctx(&s), &mouse(MouseAction::Up(MouseBtn::Left), 3, 3));

        assert_eq!(types(&down), vec![EventType::MouseDown]);
        assert_eq!(down[0].target, Some(s.left));
        assert_eq!(down[0].position, Some(Offset::new(2, 2)));
        assert_eq!(types(&up), vec![EventType::MouseUp, EventType::Click]);
        assert_eq!(up[1].target, Some(s.left));
    }

    #[test]
    fn drag_across_nodes_clicks_common_ancestor() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 2, 2));
        let up = tap.translate(ctx(&s), &mouse(MouseAction::Up(MouseBtn::Left), 22, 2));
        assert_eq!(up[0].target, Some(s.right));
        assert_eq!(up[1].target, Some(s.body));
    }

    #[test]
    fn pointer_off_every_node_targets_document() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        let down = tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 60, 20));
        assert_eq!(down[0].target, None);
    }

    #[test]
    fn click_synthesis_can_be_disabled() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::new().with_click_synthesis(false));
        tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 2, 2));
        let up = tap.translate(ctx(&s), &mouse(MouseAction::Up(MouseBtn::Left), 2, 2));
        assert_eq!(types(&up), vec![EventType::MouseUp]);
    }

    #[test]
    fn moves_and_scrolls_are_not_routed() {
        let s = scene();
        let mut tap = installed(AutoCloseConfig::default());
        assert!(tap
            .translate(ctx(&s), &mouse(MouseAction::Moved, 1, 1))
            .is_empty());
        assert!(tap
            .translate(ctx(&s), &mouse(MouseAction::ScrollUp, 1, 1))
            .is_empty());
        assert!(tap
            .translate(ctx(&s), &InputEvent::Resize { width: 1, height: 1 })
            .is_empty());
    }

    #[test]
    fn stale_region_falls_through_to_node_behind() {
        let mut s = scene();
        s.dom.remove(s.right);
        let mut tap = installed(AutoCloseConfig::default());
        let down = tap.translate(ctx(&s), &mouse(MouseAction::Down(MouseBtn::Left), 22, 2));
        assert_eq!(down[0].target, Some(s.body));
    }
}
