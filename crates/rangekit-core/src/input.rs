//! Input events delivered by the host and the host-side composition root.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::drag::{DragController, DragOutcome};
use crate::error::WidgetResult;
use crate::keyboard::KeyCommand;
use crate::value_space::Track;
use crate::widget::{
    hit_test_handles, HandleKind, InstanceRegistry, WidgetConfig, WidgetId, WidgetValue,
    HANDLE_HIT_TOLERANCE,
};

/// Key name that cancels an active drag.
pub const CANCEL_KEY: &str = "Escape";

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// A handle of a widget.
    Handle { widget: WidgetId, handle: HandleKind },
    /// The track of a widget, away from its handles.
    Track { widget: WidgetId },
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        track: Track,
        position: Point,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// Pointer capture was lost; treated like a cancel.
    Cancel,
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Owns a registry and a drag controller and routes host input into them.
///
/// Destroying a widget through the host also drops any drag on it, so the
/// controller never sees a session outlive its instance.
#[derive(Debug, Default)]
pub struct WidgetHost {
    registry: InstanceRegistry,
    drag: DragController,
    /// Handle that receives key events.
    focus: Option<(WidgetId, HandleKind)>,
}

impl WidgetHost {
    /// Create a host around an existing registry.
    pub fn new(registry: InstanceRegistry) -> Self {
        Self {
            registry,
            drag: DragController::new(),
            focus: None,
        }
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InstanceRegistry {
        &mut self.registry
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Create a widget in the owned registry.
    pub fn create(&mut self, config: &WidgetConfig) -> WidgetResult<WidgetId> {
        self.registry.create(config)
    }

    /// Destroy a widget, cancelling its drag and focus first.
    pub fn destroy(&mut self, id: WidgetId) -> bool {
        self.drag.cancel_for(id);
        if self.focus.is_some_and(|(w, _)| w == id) {
            self.focus = None;
        }
        self.registry.destroy(id)
    }

    /// Give keyboard focus to a handle.
    pub fn focus(&mut self, id: WidgetId, handle: HandleKind) -> WidgetResult<()> {
        self.registry.get(id)?.check_handle(handle)?;
        self.focus = Some((id, handle));
        Ok(())
    }

    pub fn focused(&self) -> Option<(WidgetId, HandleKind)> {
        self.focus
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Resolve what a press at `point` on widget `id` hits.
    pub fn target_at(&self, id: WidgetId, track: &Track, point: Point) -> WidgetResult<PointerTarget> {
        let instance = self.registry.get(id)?;
        Ok(match hit_test_handles(instance, track, point, HANDLE_HIT_TOLERANCE) {
            Some(handle) => PointerTarget::Handle { widget: id, handle },
            None => PointerTarget::Track { widget: id },
        })
    }

    /// Process a pointer event. Returns the widget value it produced, if any.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<WidgetValue> {
        match event {
            PointerEvent::Down {
                target,
                track,
                position,
            } => {
                let (widget, outcome) = match target {
                    PointerTarget::Handle { widget, handle } => (
                        widget,
                        self.drag
                            .begin_drag(&mut self.registry, widget, handle, track, position),
                    ),
                    PointerTarget::Track { widget } => (
                        widget,
                        self.drag.press_track(&mut self.registry, widget, track, position),
                    ),
                };
                if outcome != DragOutcome::Started {
                    return None;
                }
                if let Some(session) = self.drag.session() {
                    self.focus = Some((session.widget, session.handle));
                }
                self.registry.get(widget).ok().map(|instance| instance.value())
            }
            PointerEvent::Move { position } => self.drag.update_drag(&mut self.registry, position),
            PointerEvent::Up { .. } => self.drag.end_drag(&mut self.registry, true),
            PointerEvent::Cancel => self.drag.end_drag(&mut self.registry, false),
        }
    }

    /// Process a key event. Returns the widget value it produced, if any.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<WidgetValue> {
        let KeyEvent::Pressed(key) = event else {
            return None;
        };
        if key == CANCEL_KEY {
            return self.drag.end_drag(&mut self.registry, false);
        }

        let command = KeyCommand::from_key(key)?;
        let (id, handle) = self.focus?;
        match self.registry.apply_key(id, handle, command) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Dropping key {} for {}: {}", key, id, e);
                None
            }
        }
    }

    /// Tear down the host and its registry.
    pub fn teardown(mut self) {
        if let Some(session) = self.drag.session() {
            let widget = session.widget;
            self.drag.cancel_for(widget);
        }
        self.registry.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(widget: WidgetId, handle: HandleKind, x: f64) -> PointerEvent {
        PointerEvent::Down {
            target: PointerTarget::Handle { widget, handle },
            track: Track::horizontal(100.0),
            position: Point::new(x, 0.0),
        }
    }

    fn mv(x: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, 0.0),
        }
    }

    #[test]
    fn test_pointer_drag_roundtrip() {
        let mut host = WidgetHost::default();
        let id = host.create(&WidgetConfig::new(0.0, 100.0, 1.0)).unwrap();

        host.handle_pointer_event(down(id, HandleKind::Single, 0.0));
        assert_eq!(host.handle_pointer_event(mv(42.0)), Some(WidgetValue::Single(42.0)));
        host.handle_pointer_event(PointerEvent::Up {
            position: Point::new(42.0, 0.0),
        });

        assert!(!host.drag().is_dragging());
        assert_eq!(host.registry().get(id).unwrap().value(), WidgetValue::Single(42.0));
        assert_eq!(host.focused(), Some((id, HandleKind::Single)));
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut host = WidgetHost::default();
        let id = host
            .create(&WidgetConfig::new(0.0, 100.0, 1.0).with_value(10.0))
            .unwrap();

        host.handle_pointer_event(down(id, HandleKind::Single, 10.0));
        host.handle_pointer_event(mv(70.0));
        let value = host.handle_key_event(&KeyEvent::Pressed("Escape".to_string()));

        assert_eq!(value, Some(WidgetValue::Single(10.0)));
        assert!(!host.drag().is_dragging());
    }

    #[test]
    fn test_pointer_cancel_restores() {
        let mut host = WidgetHost::default();
        let id = host
            .create(&WidgetConfig::new(0.0, 100.0, 1.0).with_value(10.0))
            .unwrap();

        host.handle_pointer_event(down(id, HandleKind::Single, 10.0));
        host.handle_pointer_event(mv(70.0));
        host.handle_pointer_event(PointerEvent::Cancel);

        assert_eq!(host.registry().get(id).unwrap().value(), WidgetValue::Single(10.0));
    }

    #[test]
    fn test_keys_step_focused_handle() {
        let mut host = WidgetHost::default();
        let id = host
            .create(&WidgetConfig::new(0.0, 100.0, 1.0).with_values(20.0, 60.0))
            .unwrap();
        host.focus(id, HandleKind::End).unwrap();

        let value = host.handle_key_event(&KeyEvent::Pressed("ArrowRight".to_string()));
        assert_eq!(value, Some(WidgetValue::Dual { start: 20.0, end: 61.0 }));

        let value = host.handle_key_event(&KeyEvent::Pressed("Home".to_string()));
        assert_eq!(value, Some(WidgetValue::Dual { start: 20.0, end: 20.0 }));

        assert_eq!(host.handle_key_event(&KeyEvent::Released("Home".to_string())), None);
        assert_eq!(host.handle_key_event(&KeyEvent::Pressed("q".to_string())), None);
    }

    #[test]
    fn test_focus_rejects_wrong_handle() {
        let mut host = WidgetHost::default();
        let id = host.create(&WidgetConfig::default()).unwrap();
        assert!(host.focus(id, HandleKind::Start).is_err());
        assert_eq!(host.focused(), None);
    }

    #[test]
    fn test_destroy_mid_drag() {
        let mut host = WidgetHost::default();
        let id = host.create(&WidgetConfig::default()).unwrap();

        host.handle_pointer_event(down(id, HandleKind::Single, 50.0));
        assert!(host.destroy(id));
        assert!(!host.drag().is_dragging());
        assert_eq!(host.focused(), None);
        assert_eq!(host.handle_pointer_event(mv(10.0)), None);
        assert_eq!(host.handle_pointer_event(PointerEvent::Cancel), None);
    }

    #[test]
    fn test_refused_down_on_disabled() {
        let mut host = WidgetHost::default();
        let id = host
            .create(&WidgetConfig::default().with_disabled(true))
            .unwrap();
        assert_eq!(host.handle_pointer_event(down(id, HandleKind::Single, 0.0)), None);
        assert!(!host.drag().is_dragging());
        assert_eq!(host.focused(), None);
    }

    #[test]
    fn test_target_at() {
        let mut host = WidgetHost::default();
        let id = host
            .create(&WidgetConfig::new(0.0, 100.0, 1.0).with_value(50.0))
            .unwrap();
        let track = Track::horizontal(100.0);

        assert_eq!(
            host.target_at(id, &track, Point::new(52.0, 0.0)).unwrap(),
            PointerTarget::Handle { widget: id, handle: HandleKind::Single }
        );
        assert_eq!(
            host.target_at(id, &track, Point::new(90.0, 0.0)).unwrap(),
            PointerTarget::Track { widget: id }
        );
    }

    #[test]
    fn test_track_press_then_drag() {
        let mut host = WidgetHost::default();
        let id = host.create(&WidgetConfig::new(0.0, 100.0, 1.0)).unwrap();
        let track = Track::horizontal(100.0);

        let value = host.handle_pointer_event(PointerEvent::Down {
            target: PointerTarget::Track { widget: id },
            track,
            position: Point::new(30.0, 0.0),
        });
        assert_eq!(value, Some(WidgetValue::Single(30.0)));
        assert_eq!(host.handle_pointer_event(mv(35.0)), Some(WidgetValue::Single(35.0)));
    }
}
