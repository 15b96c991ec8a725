//! Handle definitions and hit testing.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::state::{WidgetInstance, WidgetMode, WidgetValue};
use crate::value_space::Track;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Which handle of a widget an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// The only handle of a single-mode widget.
    Single,
    /// Lower handle of a dual widget.
    Start,
    /// Upper handle of a dual widget.
    End,
}

impl HandleKind {
    /// The widget mode this handle belongs to.
    pub fn mode(self) -> WidgetMode {
        match self {
            HandleKind::Single => WidgetMode::Single,
            HandleKind::Start | HandleKind::End => WidgetMode::Dual,
        }
    }
}

/// A handle with its screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handles of an instance laid out on `track`.
pub fn get_handles(instance: &WidgetInstance, track: &Track) -> Vec<Handle> {
    let range = instance.range();
    let orientation = instance.orientation();
    match instance.value() {
        WidgetValue::Single(v) => vec![Handle::new(
            HandleKind::Single,
            track.point_at(range, orientation, v),
        )],
        WidgetValue::Dual { start, end } => vec![
            Handle::new(HandleKind::Start, track.point_at(range, orientation, start)),
            Handle::new(HandleKind::End, track.point_at(range, orientation, end)),
        ],
    }
}

/// Find which handle (if any) is hit at `point`.
///
/// When both dual handles overlap, the end handle is returned first so a
/// collapsed range can still be widened by dragging up. A pair collapsed at
/// `max` can only open downward, so there the start handle wins.
pub fn hit_test_handles(
    instance: &WidgetInstance,
    track: &Track,
    point: Point,
    tolerance: f64,
) -> Option<HandleKind> {
    let mut handles = get_handles(instance, track);
    let collapsed_at_max = matches!(
        instance.value(),
        WidgetValue::Dual { start, .. } if start >= instance.range().max
    );
    if !collapsed_at_max {
        handles.reverse();
    }
    handles
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Handle a click on the track at `value` should move.
///
/// Dual widgets pick `Start` when the value lies below the midpoint of the
/// two handles and `End` otherwise.
pub fn nearest_handle(value: &WidgetValue, target: f64) -> HandleKind {
    match value {
        WidgetValue::Single(_) => HandleKind::Single,
        WidgetValue::Dual { start, end } => {
            let mid = (start + end) / 2.0;
            if target < mid {
                HandleKind::Start
            } else {
                HandleKind::End
            }
        }
    }
}
