//! Registry owning every live widget instance.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use super::events::{RenderSink, SubscriptionId, Subscribers, WidgetEvent, WidgetSnapshot};
use super::handles::HandleKind;
use super::state::{WidgetConfig, WidgetId, WidgetInstance, WidgetValue};
use crate::error::{WidgetError, WidgetResult};
use crate::keyboard::KeyCommand;
use crate::value_space::ValueRange;

/// Options for value mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Skip observer and render notification.
    pub silent: bool,
}

impl SetOptions {
    /// Options for an update nobody should hear about.
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Owns the mapping from id to [`WidgetInstance`].
///
/// This is the single source of truth for whether a widget still exists.
/// Hosts construct one explicitly and pass it to whatever creates widgets;
/// there is no global instance.
pub struct InstanceRegistry {
    instances: HashMap<WidgetId, WidgetInstance>,
    subscribers: Subscribers,
    render_sink: Option<Box<dyn RenderSink>>,
}

impl InstanceRegistry {
    /// Create an empty registry without a render sink.
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            subscribers: Subscribers::default(),
            render_sink: None,
        }
    }

    /// Create a registry that renders through `sink`.
    pub fn with_render_sink(sink: impl RenderSink + 'static) -> Self {
        let mut registry = Self::new();
        registry.set_render_sink(sink);
        registry
    }

    /// Install or replace the render sink.
    pub fn set_render_sink(&mut self, sink: impl RenderSink + 'static) {
        self.render_sink = Some(Box::new(sink));
    }

    /// Create a widget and return its id.
    pub fn create(&mut self, config: &WidgetConfig) -> WidgetResult<WidgetId> {
        let id = Uuid::new_v4();
        let instance = WidgetInstance::from_config(id, config)?;
        log::debug!(
            "Created widget {} ({:?}, {:?}) with value {:?}",
            id,
            instance.mode(),
            instance.orientation(),
            instance.value()
        );
        self.instances.insert(id, instance);
        self.render(id);
        Ok(id)
    }

    /// Look up a widget.
    pub fn get(&self, id: WidgetId) -> WidgetResult<&WidgetInstance> {
        self.instances.get(&id).ok_or(WidgetError::NotFound(id))
    }

    /// Check if a widget exists.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.instances.contains_key(&id)
    }

    /// All live widget ids, in no particular order.
    pub fn ids(&self) -> Vec<WidgetId> {
        self.instances.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Capture what the render sink would receive for a widget.
    pub fn snapshot(&self, id: WidgetId) -> WidgetResult<WidgetSnapshot> {
        self.get(id).map(WidgetSnapshot::of)
    }

    /// Remove a widget. Returns whether it existed; unknown ids are a no-op.
    ///
    /// This does not know about drag sessions. Hosts that drag should destroy
    /// through [`WidgetHost`](crate::WidgetHost), which cancels the session too.
    pub fn destroy(&mut self, id: WidgetId) -> bool {
        if self.instances.remove(&id).is_none() {
            return false;
        }
        self.subscribers.remove_widget(id);
        if let Some(sink) = self.render_sink.as_mut() {
            sink.destroyed(id);
        }
        log::debug!("Destroyed widget {}", id);
        true
    }

    /// Replace the whole value of a widget.
    ///
    /// Values are snapped to the step grid. A dual pair whose start lies
    /// above its end is corrected by pulling start down to end.
    pub fn set_value(
        &mut self,
        id: WidgetId,
        value: WidgetValue,
        options: SetOptions,
    ) -> WidgetResult<WidgetValue> {
        let instance = self.get(id)?;
        instance.check_value(&value)?;
        let value = value.normalized(instance.range());
        self.commit(id, value, options)
    }

    /// Move one handle. The handle is clamped against the other one.
    pub fn set_handle_value(
        &mut self,
        id: WidgetId,
        handle: HandleKind,
        value: f64,
        options: SetOptions,
    ) -> WidgetResult<WidgetValue> {
        let value = self.get(id)?.with_handle_at(handle, value)?;
        self.commit(id, value, options)
    }

    /// Apply a keyboard step to one handle.
    ///
    /// Returns `Ok(None)` when the widget is disabled and the key is ignored.
    pub fn apply_key(
        &mut self,
        id: WidgetId,
        handle: HandleKind,
        command: KeyCommand,
    ) -> WidgetResult<Option<WidgetValue>> {
        let instance = self.get(id)?;
        instance.check_handle(handle)?;
        if instance.is_disabled() {
            return Ok(None);
        }
        let Some(target) = command.target(instance.range(), &instance.value(), handle) else {
            return Ok(None);
        };
        self.set_handle_value(id, handle, target, SetOptions::default())
            .map(Some)
    }

    /// Enable or disable a widget. Disabled widgets refuse new drags.
    pub fn set_disabled(&mut self, id: WidgetId, disabled: bool) -> WidgetResult<()> {
        let instance = self.instances.get_mut(&id).ok_or(WidgetError::NotFound(id))?;
        if instance.is_disabled() != disabled {
            instance.set_disabled(disabled);
            self.render(id);
        }
        Ok(())
    }

    /// Reconfigure the range of a widget, re-snapping its value.
    pub fn set_range(&mut self, id: WidgetId, range: ValueRange) -> WidgetResult<WidgetValue> {
        range.validate()?;
        let instance = self.instances.get_mut(&id).ok_or(WidgetError::NotFound(id))?;
        let before = instance.value();
        instance.replace_range(range);
        let after = instance.value();
        if before != after {
            self.subscribers.emit(&WidgetEvent::Changed { id, value: after });
        }
        self.render(id);
        Ok(after)
    }

    /// Observe events of one widget until unsubscribed or destroyed.
    pub fn subscribe(
        &mut self,
        id: WidgetId,
        listener: impl FnMut(&WidgetEvent) + 'static,
    ) -> WidgetResult<SubscriptionId> {
        self.get(id)?;
        Ok(self.subscribers.add(id, Box::new(listener)))
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.subscribers.remove(subscription)
    }

    /// Tear the registry down, destroying every widget.
    pub fn teardown(mut self) {
        for id in self.ids() {
            self.destroy(id);
        }
        log::debug!("Instance registry torn down");
    }

    /// Send an event to the widget's observers.
    pub(crate) fn emit(&mut self, event: WidgetEvent) {
        self.subscribers.emit(&event);
    }

    fn commit(
        &mut self,
        id: WidgetId,
        value: WidgetValue,
        options: SetOptions,
    ) -> WidgetResult<WidgetValue> {
        let instance = self.instances.get_mut(&id).ok_or(WidgetError::NotFound(id))?;
        if instance.value() == value {
            return Ok(value);
        }
        instance.replace_value(value);
        if !options.silent {
            self.subscribers.emit(&WidgetEvent::Changed { id, value });
            self.render(id);
        }
        Ok(value)
    }

    fn render(&mut self, id: WidgetId) {
        let (Some(sink), Some(instance)) = (self.render_sink.as_mut(), self.instances.get(&id))
        else {
            return;
        };
        sink.render(&WidgetSnapshot::of(instance));
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("instances", &self.instances)
            .field("subscriptions", &self.subscribers.len())
            .field("render_sink", &self.render_sink.is_some())
            .finish()
    }
}
