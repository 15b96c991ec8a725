//! Change notification: observer subscriptions and the render sink.

use serde::Serialize;
use uuid::Uuid;

use super::handles::HandleKind;
use super::state::{WidgetId, WidgetInstance, WidgetValue};
use crate::value_space::{Orientation, value_to_percent};

/// Identifier returned by [`InstanceRegistry::subscribe`](super::InstanceRegistry::subscribe).
pub type SubscriptionId = Uuid;

/// Something observers may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WidgetEvent {
    /// A value was committed (including live drag updates).
    Changed { id: WidgetId, value: WidgetValue },
    /// A drag gesture grabbed one of the handles.
    DragStarted {
        id: WidgetId,
        handle: HandleKind,
        value: WidgetValue,
    },
    /// A drag gesture finished. `committed` is false for cancelled drags.
    DragEnded {
        id: WidgetId,
        value: WidgetValue,
        committed: bool,
    },
}

impl WidgetEvent {
    /// The widget this event concerns.
    pub fn id(&self) -> WidgetId {
        match self {
            WidgetEvent::Changed { id, .. }
            | WidgetEvent::DragStarted { id, .. }
            | WidgetEvent::DragEnded { id, .. } => *id,
        }
    }
}

/// Immutable view of an instance handed to the render sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSnapshot {
    pub id: WidgetId,
    pub value: WidgetValue,
    /// Position of the single handle, or of the start handle.
    pub percent: f64,
    /// Position of the end handle of a dual widget.
    pub percent_end: Option<f64>,
    pub orientation: Orientation,
    pub disabled: bool,
}

impl WidgetSnapshot {
    /// Capture the current state of an instance.
    pub fn of(instance: &WidgetInstance) -> Self {
        let range = instance.range();
        let (percent, percent_end) = match instance.value() {
            WidgetValue::Single(v) => (value_to_percent(range, v), None),
            WidgetValue::Dual { start, end } => (
                value_to_percent(range, start),
                Some(value_to_percent(range, end)),
            ),
        };
        Self {
            id: instance.id(),
            value: instance.value(),
            percent,
            percent_end,
            orientation: instance.orientation(),
            disabled: instance.is_disabled(),
        }
    }
}

/// Visual side of a widget, implemented by the host.
pub trait RenderSink {
    /// Draw or update the widget described by `snapshot`.
    fn render(&mut self, snapshot: &WidgetSnapshot);

    /// The widget was destroyed; drop whatever was drawn for it.
    fn destroyed(&mut self, _id: WidgetId) {}
}

impl<F> RenderSink for F
where
    F: FnMut(&WidgetSnapshot),
{
    fn render(&mut self, snapshot: &WidgetSnapshot) {
        self(snapshot)
    }
}

type Listener = Box<dyn FnMut(&WidgetEvent)>;

/// Observer list, keyed by widget.
#[derive(Default)]
pub(crate) struct Subscribers {
    entries: Vec<(SubscriptionId, WidgetId, Listener)>,
}

impl Subscribers {
    pub fn add(&mut self, widget: WidgetId, listener: Listener) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.entries.push((id, widget, listener));
        id
    }

    pub fn remove(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _, _)| *id != subscription);
        self.entries.len() != before
    }

    /// Drop every subscription of a widget.
    pub fn remove_widget(&mut self, widget: WidgetId) {
        self.entries.retain(|(_, w, _)| *w != widget);
    }

    pub fn emit(&mut self, event: &WidgetEvent) {
        let widget = event.id();
        for (_, w, listener) in self.entries.iter_mut() {
            if *w == widget {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
