//! Widget instance data: configuration, mode and current value.

use crate::error::{WidgetError, WidgetResult};
use crate::value_space::{Orientation, ValueRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::handles::HandleKind;

/// Unique identifier of a widget instance.
pub type WidgetId = Uuid;

/// Number of handles a widget has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetMode {
    /// One handle, one value.
    #[default]
    Single,
    /// Two handles bounding a sub-range.
    Dual,
}

/// Current value of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetValue {
    Single(f64),
    Dual { start: f64, end: f64 },
}

impl WidgetValue {
    /// The mode this value belongs to.
    pub fn mode(&self) -> WidgetMode {
        match self {
            WidgetValue::Single(_) => WidgetMode::Single,
            WidgetValue::Dual { .. } => WidgetMode::Dual,
        }
    }

    /// Value of one handle, if the handle exists in this mode.
    pub fn get(&self, handle: HandleKind) -> Option<f64> {
        match (self, handle) {
            (WidgetValue::Single(v), HandleKind::Single) => Some(*v),
            (WidgetValue::Dual { start, .. }, HandleKind::Start) => Some(*start),
            (WidgetValue::Dual { end, .. }, HandleKind::End) => Some(*end),
            _ => None,
        }
    }

    /// The single value, if this is a single-handle value.
    pub fn as_single(&self) -> Option<f64> {
        match self {
            WidgetValue::Single(v) => Some(*v),
            WidgetValue::Dual { .. } => None,
        }
    }

    /// The `(start, end)` pair, if this is a dual-handle value.
    pub fn as_dual(&self) -> Option<(f64, f64)> {
        match self {
            WidgetValue::Single(_) => None,
            WidgetValue::Dual { start, end } => Some((*start, *end)),
        }
    }

    /// Snap every component into `range` and restore `start <= end`.
    ///
    /// An inverted pair is corrected by pulling `start` down to `end`.
    pub(crate) fn normalized(self, range: &ValueRange) -> Self {
        match self {
            WidgetValue::Single(v) => WidgetValue::Single(range.snap(v)),
            WidgetValue::Dual { start, end } => {
                let end = range.snap(end);
                let start = range.snap(start).min(end);
                WidgetValue::Dual { start, end }
            }
        }
    }
}

/// Host-supplied configuration used by [`InstanceRegistry::create`](super::InstanceRegistry::create).
///
/// Field names follow the JSON hosts already send (`min`, `max`, `step`,
/// `value`, `orientation`, ...). Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub mode: WidgetMode,
    /// Initial value of a single-handle widget.
    pub value: f64,
    /// Initial start of a dual widget (defaults to `min`).
    pub value_start: Option<f64>,
    /// Initial end of a dual widget (defaults to `max`).
    pub value_end: Option<f64>,
    pub orientation: Orientation,
    pub disabled: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            mode: WidgetMode::Single,
            value: 50.0,
            value_start: None,
            value_end: None,
            orientation: Orientation::Horizontal,
            disabled: false,
        }
    }
}

impl WidgetConfig {
    /// Create a single-handle config over `[min, max]` with the given step.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            value: min,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Unknown fields are ignored, missing ones defaulted.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: WidgetMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the initial single value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Switch to dual mode with the given initial pair.
    pub fn with_values(mut self, start: f64, end: f64) -> Self {
        self.mode = WidgetMode::Dual;
        self.value_start = Some(start);
        self.value_end = Some(end);
        self
    }

    /// Set whether the widget starts disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The range described by this config, validated.
    pub fn range(&self) -> WidgetResult<ValueRange> {
        ValueRange::new(self.min, self.max, self.step)
    }

    /// Initial value, snapped into `range`.
    pub fn initial_value(&self, range: &ValueRange) -> WidgetValue {
        let raw = match self.mode {
            WidgetMode::Single => WidgetValue::Single(self.value),
            WidgetMode::Dual => WidgetValue::Dual {
                start: self.value_start.unwrap_or(range.min),
                end: self.value_end.unwrap_or(range.max),
            },
        };
        raw.normalized(range)
    }
}

/// One live widget owned by the registry.
///
/// Fields are private: every mutation goes through the registry so the
/// step and ordering invariants hold for every value a caller can observe.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInstance {
    id: WidgetId,
    range: ValueRange,
    value: WidgetValue,
    orientation: Orientation,
    disabled: bool,
}

impl WidgetInstance {
    pub(crate) fn from_config(id: WidgetId, config: &WidgetConfig) -> WidgetResult<Self> {
        let range = config.range()?;
        Ok(Self {
            id,
            range,
            value: config.initial_value(&range),
            orientation: config.orientation,
            disabled: config.disabled,
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn range(&self) -> &ValueRange {
        &self.range
    }

    pub fn value(&self) -> WidgetValue {
        self.value
    }

    pub fn mode(&self) -> WidgetMode {
        self.value.mode()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Config that recreates this instance with its current value.
    pub fn to_config(&self) -> WidgetConfig {
        let mut config = WidgetConfig {
            min: self.range.min,
            max: self.range.max,
            step: self.range.step,
            mode: self.mode(),
            orientation: self.orientation,
            disabled: self.disabled,
            ..WidgetConfig::default()
        };
        match self.value {
            WidgetValue::Single(v) => config.value = v,
            WidgetValue::Dual { start, end } => {
                config.value_start = Some(start);
                config.value_end = Some(end);
            }
        }
        config
    }

    /// Check that `handle` exists on this instance.
    pub fn check_handle(&self, handle: HandleKind) -> WidgetResult<()> {
        if handle.mode() != self.mode() {
            return Err(WidgetError::InvalidMode {
                expected: self.mode(),
                found: handle.mode(),
            });
        }
        Ok(())
    }

    /// Check that `value` has the same shape as this instance's value.
    pub fn check_value(&self, value: &WidgetValue) -> WidgetResult<()> {
        if value.mode() != self.mode() {
            return Err(WidgetError::InvalidMode {
                expected: self.mode(),
                found: value.mode(),
            });
        }
        Ok(())
    }

    /// Value `value` would become if `handle` were moved to `target`.
    ///
    /// The moved handle is clamped against the other one; handles never cross.
    pub(crate) fn with_handle_at(&self, handle: HandleKind, target: f64) -> WidgetResult<WidgetValue> {
        self.check_handle(handle)?;
        let target = self.range.snap(target);
        Ok(match (self.value, handle) {
            (WidgetValue::Dual { end, .. }, HandleKind::Start) => WidgetValue::Dual {
                start: target.min(end),
                end,
            },
            (WidgetValue::Dual { start, .. }, HandleKind::End) => WidgetValue::Dual {
                start,
                end: target.max(start),
            },
            _ => WidgetValue::Single(target),
        })
    }

    pub(crate) fn replace_value(&mut self, value: WidgetValue) {
        self.value = value;
    }

    pub(crate) fn replace_range(&mut self, range: ValueRange) {
        self.range = range;
        self.value = self.value.normalized(&range);
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}
