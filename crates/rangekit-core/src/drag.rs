//! Drag gesture state machine.
//!
//! One [`DragController`] tracks at most one gesture. The host routes
//! pointer-down, pointer-move and pointer-up into it; the controller turns
//! pointer positions into values and commits them through the registry.
//!
//! ```text
//! Idle --begin_drag--> Dragging --end_drag(true)--> Idle   (committed)
//!                      Dragging --end_drag(false)-> Idle   (cancelled, value restored)
//!                      Dragging --cancel_for(id)--> Idle   (instance destroyed)
//! ```

use kurbo::{Point, Vec2};

use crate::value_space::Track;
use crate::widget::{
    nearest_handle, HandleKind, InstanceRegistry, SetOptions, WidgetEvent, WidgetId, WidgetValue,
};

/// An active drag on one handle of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// The widget being dragged.
    pub widget: WidgetId,
    /// The handle being dragged.
    pub handle: HandleKind,
    /// Track geometry captured when the drag started.
    pub track: Track,
    /// Pointer position at drag start.
    pub start_point: Point,
    /// Latest pointer position.
    pub current_point: Point,
    /// Widget value at drag start, restored on cancel.
    pub original_value: WidgetValue,
}

impl DragSession {
    /// Pointer movement since the drag started.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// State of a [`DragController`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Why a drag could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The widget does not exist (typically destroyed under a stale UI event).
    NotFound,
    /// The widget is disabled.
    Disabled,
    /// The handle does not exist in the widget's mode.
    WrongHandle,
    /// Another live drag is in progress on this controller.
    AlreadyDragging,
    /// The press hit nothing draggable.
    Missed,
}

/// Result of trying to start a drag.
///
/// Refusal is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started,
    Refused(RefusalReason),
}

impl DragOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, DragOutcome::Started)
    }
}

/// Drives one drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Check if `id` is the widget being dragged.
    pub fn is_dragging_widget(&self, id: WidgetId) -> bool {
        self.session().is_some_and(|s| s.widget == id)
    }

    /// Grab `handle` of widget `id`.
    ///
    /// The value does not change until the pointer moves.
    pub fn begin_drag(
        &mut self,
        registry: &mut InstanceRegistry,
        id: WidgetId,
        handle: HandleKind,
        track: Track,
        start: Point,
    ) -> DragOutcome {
        if let Some(session) = self.session() {
            if registry.contains(session.widget) {
                log::warn!("Refusing drag on {}: already dragging {}", id, session.widget);
                return DragOutcome::Refused(RefusalReason::AlreadyDragging);
            }
            // Left over from a widget destroyed behind our back
            self.state = DragState::Idle;
        }

        let instance = match registry.get(id) {
            Ok(instance) => instance,
            Err(_) => {
                log::debug!("Refusing drag on {}: not found", id);
                return DragOutcome::Refused(RefusalReason::NotFound);
            }
        };
        if instance.is_disabled() {
            log::debug!("Refusing drag on {}: disabled", id);
            return DragOutcome::Refused(RefusalReason::Disabled);
        }
        if instance.check_handle(handle).is_err() {
            log::warn!("Refusing drag on {}: no {:?} handle in {:?} mode", id, handle, instance.mode());
            return DragOutcome::Refused(RefusalReason::WrongHandle);
        }

        let original_value = instance.value();
        self.state = DragState::Dragging(DragSession {
            widget: id,
            handle,
            track,
            start_point: start,
            current_point: start,
            original_value,
        });
        log::debug!("Drag started on {} ({:?}) at {:?}", id, handle, original_value);
        registry.emit(WidgetEvent::DragStarted {
            id,
            handle,
            value: original_value,
        });
        DragOutcome::Started
    }

    /// Press on the track away from any handle.
    ///
    /// The nearest handle jumps to the value under the pointer and a drag
    /// on that handle begins.
    pub fn press_track(
        &mut self,
        registry: &mut InstanceRegistry,
        id: WidgetId,
        track: Track,
        point: Point,
    ) -> DragOutcome {
        let (handle, target) = match registry.get(id) {
            Ok(instance) => {
                let target = track.value_at(instance.range(), instance.orientation(), point);
                (nearest_handle(&instance.value(), target), target)
            }
            Err(_) => return DragOutcome::Refused(RefusalReason::NotFound),
        };

        let outcome = self.begin_drag(registry, id, handle, track, point);
        if outcome.is_started() {
            // The jump is part of the gesture, so cancelling reverts it too
            if let Err(e) = registry.set_handle_value(id, handle, target, SetOptions::default()) {
                log::warn!("Track press on {} could not move {:?}: {}", id, handle, e);
            }
        }
        outcome
    }

    /// Move the dragged handle to the value under `point`.
    ///
    /// No-op unless dragging. Returns the committed value. Cheap enough to
    /// call on every pointer-move event; a repeated position changes nothing.
    pub fn update_drag(&mut self, registry: &mut InstanceRegistry, point: Point) -> Option<WidgetValue> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let Ok(instance) = registry.get(session.widget) else {
            log::debug!("Dropping drag on destroyed widget {}", session.widget);
            self.state = DragState::Idle;
            return None;
        };

        session.current_point = point;
        let target = session
            .track
            .value_at(instance.range(), instance.orientation(), point);
        log::trace!("Drag {} ({:?}) -> {}", session.widget, session.handle, target);

        registry
            .set_handle_value(session.widget, session.handle, target, SetOptions::default())
            .ok()
    }

    /// Finish the gesture.
    ///
    /// With `commit == false` the value captured at drag start is restored.
    /// Always returns to `Idle`. Returns the widget's final value, or `None`
    /// if there was no drag or the widget no longer exists.
    pub fn end_drag(&mut self, registry: &mut InstanceRegistry, commit: bool) -> Option<WidgetValue> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        if !registry.contains(session.widget) {
            log::debug!("Drag ended on destroyed widget {}", session.widget);
            return None;
        }

        if !commit {
            if let Err(e) = registry.set_value(session.widget, session.original_value, SetOptions::default()) {
                log::warn!("Could not restore {} after cancelled drag: {}", session.widget, e);
            }
        }
        let value = registry.get(session.widget).ok()?.value();
        log::debug!(
            "Drag {} on {} at {:?}",
            if commit { "committed" } else { "cancelled" },
            session.widget,
            value
        );
        registry.emit(WidgetEvent::DragEnded {
            id: session.widget,
            value,
            committed: commit,
        });
        Some(value)
    }

    /// Drop the session if it belongs to `id`, without touching any value.
    ///
    /// Call when the widget is destroyed. Returns whether a session was dropped.
    pub fn cancel_for(&mut self, id: WidgetId) -> bool {
        if self.is_dragging_widget(id) {
            log::debug!("Drag on {} cancelled by destroy", id);
            self.state = DragState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{WidgetConfig, WidgetMode};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(config: WidgetConfig) -> (InstanceRegistry, DragController, WidgetId) {
        let mut registry = InstanceRegistry::new();
        let id = registry.create(&config).unwrap();
        (registry, DragController::new(), id)
    }

    fn at(x: f64) -> Point {
        Point::new(x, 0.0)
    }

    #[test]
    fn test_drag_commit() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::new(0.0, 100.0, 1.0));
        let track = Track::horizontal(100.0);

        assert!(drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(10.0)).is_started());
        assert!(drag.is_dragging_widget(id));
        assert_eq!(drag.update_drag(&mut registry, at(50.0)), Some(WidgetValue::Single(50.0)));
        assert_eq!(drag.end_drag(&mut registry, true), Some(WidgetValue::Single(50.0)));
        assert_eq!(*drag.state(), DragState::Idle);
        assert_eq!(registry.get(id).unwrap().value(), WidgetValue::Single(50.0));
    }

    #[test]
    fn test_drag_cancel_restores() {
        let (mut registry, mut drag, id) =
            setup(WidgetConfig::new(0.0, 100.0, 1.0).with_value(30.0));
        let track = Track::horizontal(200.0);

        drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(60.0));
        drag.update_drag(&mut registry, at(180.0));
        assert_eq!(registry.get(id).unwrap().value(), WidgetValue::Single(90.0));

        assert_eq!(drag.end_drag(&mut registry, false), Some(WidgetValue::Single(30.0)));
        assert_eq!(registry.get(id).unwrap().value(), WidgetValue::Single(30.0));
    }

    #[test]
    fn test_refusals() {
        let (mut registry, mut drag, id) =
            setup(WidgetConfig::new(0.0, 100.0, 1.0).with_disabled(true));
        let track = Track::horizontal(100.0);

        assert_eq!(
            drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(0.0)),
            DragOutcome::Refused(RefusalReason::Disabled)
        );
        registry.set_disabled(id, false).unwrap();
        assert_eq!(
            drag.begin_drag(&mut registry, id, HandleKind::Start, track, at(0.0)),
            DragOutcome::Refused(RefusalReason::WrongHandle)
        );
        assert_eq!(
            drag.begin_drag(&mut registry, uuid::Uuid::new_v4(), HandleKind::Single, track, at(0.0)),
            DragOutcome::Refused(RefusalReason::NotFound)
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_second_drag_refused() {
        let mut registry = InstanceRegistry::new();
        let a = registry.create(&WidgetConfig::default()).unwrap();
        let b = registry.create(&WidgetConfig::default()).unwrap();
        let mut drag = DragController::new();
        let track = Track::horizontal(100.0);

        assert!(drag.begin_drag(&mut registry, a, HandleKind::Single, track, at(0.0)).is_started());
        assert_eq!(
            drag.begin_drag(&mut registry, b, HandleKind::Single, track, at(0.0)),
            DragOutcome::Refused(RefusalReason::AlreadyDragging)
        );
    }

    #[test]
    fn test_disable_mid_drag_keeps_session() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::new(0.0, 100.0, 1.0));
        let track = Track::horizontal(100.0);
        drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(0.0));
        registry.set_disabled(id, true).unwrap();
        assert_eq!(drag.update_drag(&mut registry, at(20.0)), Some(WidgetValue::Single(20.0)));
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::new(0.0, 100.0, 1.0));
        assert_eq!(drag.update_drag(&mut registry, at(50.0)), None);
        assert_eq!(drag.end_drag(&mut registry, true), None);
        assert_eq!(registry.get(id).unwrap().value(), WidgetValue::Single(0.0));
    }

    #[test]
    fn test_destroyed_widget_drops_session() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::new(0.0, 100.0, 1.0));
        let track = Track::horizontal(100.0);
        drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(0.0));

        registry.destroy(id);
        assert_eq!(drag.update_drag(&mut registry, at(40.0)), None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.end_drag(&mut registry, false), None);
    }

    #[test]
    fn test_stale_session_does_not_block_new_drag() {
        let mut registry = InstanceRegistry::new();
        let a = registry.create(&WidgetConfig::default()).unwrap();
        let b = registry.create(&WidgetConfig::default()).unwrap();
        let mut drag = DragController::new();
        let track = Track::horizontal(100.0);

        drag.begin_drag(&mut registry, a, HandleKind::Single, track, at(0.0));
        registry.destroy(a);
        assert!(drag.begin_drag(&mut registry, b, HandleKind::Single, track, at(0.0)).is_started());
        assert!(drag.is_dragging_widget(b));
    }

    #[test]
    fn test_cancel_for() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::new(0.0, 100.0, 1.0));
        let track = Track::horizontal(100.0);
        drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(0.0));

        assert!(!drag.cancel_for(uuid::Uuid::new_v4()));
        assert!(drag.cancel_for(id));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_dual_handles_never_cross() {
        let (mut registry, mut drag, id) =
            setup(WidgetConfig::new(0.0, 100.0, 1.0).with_values(20.0, 60.0));
        let track = Track::horizontal(100.0);

        drag.begin_drag(&mut registry, id, HandleKind::Start, track, at(20.0));
        let value = drag.update_drag(&mut registry, at(95.0));
        assert_eq!(value, Some(WidgetValue::Dual { start: 60.0, end: 60.0 }));
        drag.end_drag(&mut registry, true);

        drag.begin_drag(&mut registry, id, HandleKind::End, track, at(60.0));
        let value = drag.update_drag(&mut registry, at(10.0));
        assert_eq!(value, Some(WidgetValue::Dual { start: 60.0, end: 60.0 }));
    }

    #[test]
    fn test_press_track_moves_nearest_handle() {
        let (mut registry, mut drag, id) =
            setup(WidgetConfig::new(0.0, 100.0, 1.0).with_values(20.0, 60.0));
        let track = Track::horizontal(100.0);

        assert!(drag.press_track(&mut registry, id, track, at(80.0)).is_started());
        assert_eq!(drag.session().map(|s| s.handle), Some(HandleKind::End));
        assert_eq!(
            registry.get(id).unwrap().value(),
            WidgetValue::Dual { start: 20.0, end: 80.0 }
        );

        // Cancelling reverts the jump
        drag.end_drag(&mut registry, false);
        assert_eq!(
            registry.get(id).unwrap().value(),
            WidgetValue::Dual { start: 20.0, end: 60.0 }
        );
    }

    #[test]
    fn test_vertical_drag() {
        let (mut registry, mut drag, id) = setup(
            WidgetConfig::new(0.0, 100.0, 1.0)
                .with_orientation(crate::value_space::Orientation::Vertical),
        );
        let track = Track::vertical(200.0);
        drag.begin_drag(&mut registry, id, HandleKind::Single, track, Point::new(0.0, 200.0));
        assert_eq!(
            drag.update_drag(&mut registry, Point::new(0.0, 50.0)),
            Some(WidgetValue::Single(75.0))
        );
    }

    #[test]
    fn test_drag_events() {
        let (mut registry, mut drag, id) =
            setup(WidgetConfig::new(0.0, 10.0, 1.0).with_mode(WidgetMode::Single));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        registry.subscribe(id, move |e| sink.borrow_mut().push(*e)).unwrap();
        let track = Track::horizontal(10.0);

        drag.begin_drag(&mut registry, id, HandleKind::Single, track, at(0.0));
        drag.update_drag(&mut registry, at(4.0));
        drag.update_drag(&mut registry, at(4.0));
        drag.end_drag(&mut registry, true);

        assert_eq!(
            *events.borrow(),
            vec![
                WidgetEvent::DragStarted {
                    id,
                    handle: HandleKind::Single,
                    value: WidgetValue::Single(0.0),
                },
                WidgetEvent::Changed { id, value: WidgetValue::Single(4.0) },
                WidgetEvent::DragEnded {
                    id,
                    value: WidgetValue::Single(4.0),
                    committed: true,
                },
            ]
        );
    }

    #[test]
    fn test_session_delta() {
        let (mut registry, mut drag, id) = setup(WidgetConfig::default());
        drag.begin_drag(&mut registry, id, HandleKind::Single, Track::horizontal(100.0), at(10.0));
        drag.update_drag(&mut registry, Point::new(35.0, 4.0));
        let delta = drag.session().unwrap().delta();
        assert!((delta.x - 25.0).abs() < f64::EPSILON);
        assert!((delta.y - 4.0).abs() < f64::EPSILON);
    }
}
