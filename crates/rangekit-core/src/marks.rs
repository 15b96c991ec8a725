//! Tick marks and labelled marks along a track.

use serde::{Deserialize, Serialize};

use crate::value_space::{value_to_percent, ValueRange};
use crate::widget::WidgetValue;

/// An unlabelled tick on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub percent: f64,
}

/// Upper bound on the number of ticks [`ticks`] produces.
pub const MAX_TICKS: usize = 1000;

/// Evenly spaced ticks from `min` every `interval`, up to `max`.
///
/// A non-positive interval yields no ticks, as does an interval so small
/// that the track would need more than [`MAX_TICKS`] of them.
pub fn ticks(range: &ValueRange, interval: f64) -> Vec<Tick> {
    if !interval.is_finite() || interval <= 0.0 {
        return Vec::new();
    }
    // Counting in whole intervals avoids drift from repeated addition
    let count = (range.span() / interval + 1e-9).floor();
    if !count.is_finite() || count >= MAX_TICKS as f64 {
        log::warn!("Skipping ticks: interval {} gives {} ticks over {:?}", interval, count, range);
        return Vec::new();
    }
    (0..=count as usize)
        .map(|i| {
            let value = range.clamp(range.min + i as f64 * interval);
            Tick {
                value,
                percent: value_to_percent(range, value),
            }
        })
        .collect()
}

/// A labelled position on the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub value: f64,
    pub label: String,
}

impl Mark {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// A mark resolved against a widget's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkState<'a> {
    pub mark: &'a Mark,
    pub percent: f64,
    /// Inside the selected part of the track.
    pub active: bool,
}

/// Resolve marks for rendering.
///
/// Single widgets light every mark up to the value; dual widgets light the
/// marks between start and end inclusive.
pub fn mark_states<'a>(range: &ValueRange, value: &WidgetValue, marks: &'a [Mark]) -> Vec<MarkState<'a>> {
    marks
        .iter()
        .map(|mark| {
            let active = match *value {
                WidgetValue::Single(v) => mark.value <= v,
                WidgetValue::Dual { start, end } => mark.value >= start && mark.value <= end,
            };
            MarkState {
                mark,
                percent: value_to_percent(range, mark.value),
                active,
            }
        })
        .collect()
}
