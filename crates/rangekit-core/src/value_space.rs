//! Pure conversion between pointer positions and widget values.
//!
//! Nothing in here holds state. The registry and the drag controller both
//! route every value they accept through [`ValueRange::snap`], so the
//! "aligned to step, clamped to bounds" rule lives in exactly one place.

use crate::error::{WidgetError, WidgetResult};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Numeric domain of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lowest selectable value.
    pub min: f64,
    /// Highest selectable value.
    pub max: f64,
    /// Distance between two neighbouring values.
    pub step: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

impl ValueRange {
    /// Create a validated range.
    pub fn new(min: f64, max: f64, step: f64) -> WidgetResult<Self> {
        let range = Self { min, max, step };
        range.validate()?;
        Ok(range)
    }

    /// Check `min <= max`, `step > 0` and that all three are finite.
    pub fn validate(&self) -> WidgetResult<()> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.step.is_finite();
        if !finite || self.min > self.max || self.step <= 0.0 {
            return Err(WidgetError::InvalidRange {
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Width of the range (`max - min`).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into `[min, max]`. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Round `raw` to the nearest multiple of `step` counted from `min`, then clamp.
    ///
    /// Inputs at or beyond a bound return that bound exactly, so `max` stays
    /// reachable even when the span is not a whole number of steps.
    pub fn snap(&self, raw: f64) -> f64 {
        if self.span() <= 0.0 || raw.is_nan() || raw <= self.min {
            return self.min;
        }
        if raw >= self.max {
            return self.max;
        }

        let steps = ((raw - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;

        // Float noise near the ends must not produce a value just past a bound
        let tolerance = self.step * 1e-9;
        if snapped >= self.max - tolerance {
            self.max
        } else if snapped <= self.min + tolerance {
            self.min
        } else {
            snapped
        }
    }

    /// Raw value `steps` grid positions away from `value` (negative moves down).
    ///
    /// An off-grid `value` (only `max` can be one) counts the nearest grid
    /// value in the direction of travel as the first step. The result is not
    /// clamped; pass it through [`snap`](Self::snap).
    pub fn step_by(&self, value: f64, steps: f64) -> f64 {
        let index = (value - self.min) / self.step;
        let nearest = index.round();
        let base = if (index - nearest).abs() < 1e-6 {
            nearest
        } else if steps < 0.0 {
            index.floor() + 1.0
        } else {
            index.ceil() - 1.0
        };
        self.min + (base + steps) * self.step
    }

    /// Check whether `value` is a committed-value candidate: inside the range
    /// and aligned to the step grid (or exactly `max`).
    pub fn is_aligned(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if value == self.max {
            return true;
        }
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-6
    }
}

/// Map a pointer offset along the track to a snapped value.
///
/// A zero (or negative) `axis_length` is treated as percent 0.
pub fn position_to_value(range: &ValueRange, axis_length: f64, offset_along_axis: f64) -> f64 {
    let percent = if axis_length > 0.0 {
        (offset_along_axis / axis_length).max(0.0).min(1.0)
    } else {
        0.0
    };
    percent_to_value(range, percent)
}

/// Map a fraction of the track (`0.0..=1.0`) to a snapped value.
pub fn percent_to_value(range: &ValueRange, percent: f64) -> f64 {
    let percent = percent.max(0.0).min(1.0);
    if percent >= 1.0 {
        return range.snap(range.max);
    }
    range.snap(range.min + percent * range.span())
}

/// Inverse of [`percent_to_value`], used to place handles.
pub fn value_to_percent(range: &ValueRange, value: f64) -> f64 {
    let span = range.span();
    if span <= 0.0 {
        return 0.0;
    }
    ((value - range.min) / span).max(0.0).min(1.0)
}

/// Which pointer axis drives the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Values grow left to right.
    #[default]
    Horizontal,
    /// Values grow bottom to top.
    Vertical,
}

/// Screen-space extent of a widget's track.
///
/// The host measures its layout and hands the rectangle in when a gesture
/// starts; the core never asks for it on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track rectangle in screen coordinates.
    pub bounds: Rect,
}

impl Track {
    /// Create a track from its bounding rectangle.
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Horizontal track of the given length starting at the origin.
    pub fn horizontal(length: f64) -> Self {
        Self::new(Rect::new(0.0, 0.0, length, 0.0))
    }

    /// Vertical track of the given length starting at the origin.
    pub fn vertical(length: f64) -> Self {
        Self::new(Rect::new(0.0, 0.0, 0.0, length))
    }

    /// Length of the value axis.
    pub fn length(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.bounds.width(),
            Orientation::Vertical => self.bounds.height(),
        }
    }

    /// Offset of `point` along the value axis, measured from the `min` end.
    pub fn offset(&self, orientation: Orientation, point: Point) -> f64 {
        match orientation {
            Orientation::Horizontal => point.x - self.bounds.x0,
            // Vertical tracks have `min` at the bottom
            Orientation::Vertical => self.bounds.y1 - point.y,
        }
    }

    /// Snapped value under `point`.
    pub fn value_at(&self, range: &ValueRange, orientation: Orientation, point: Point) -> f64 {
        position_to_value(range, self.length(orientation), self.offset(orientation, point))
    }

    /// Screen position of a handle showing `value`, centred on the cross axis.
    pub fn point_at(&self, range: &ValueRange, orientation: Orientation, value: f64) -> Point {
        let percent = value_to_percent(range, value);
        let center = self.bounds.center();
        match orientation {
            Orientation::Horizontal => {
                Point::new(self.bounds.x0 + percent * self.bounds.width(), center.y)
            }
            Orientation::Vertical => {
                Point::new(center.x, self.bounds.y1 - percent * self.bounds.height())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64, step: f64) -> ValueRange {
        ValueRange::new(min, max, step).unwrap()
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(ValueRange::new(10.0, 0.0, 1.0).is_err());
        assert!(ValueRange::new(0.0, 10.0, 0.0).is_err());
        assert!(ValueRange::new(0.0, 10.0, -1.0).is_err());
        assert!(ValueRange::new(0.0, f64::INFINITY, 1.0).is_err());
        assert!(ValueRange::new(5.0, 5.0, 1.0).is_ok());
    }

    #[test]
    fn test_position_to_value_basic() {
        let r = range(0.0, 100.0, 1.0);
        assert!((position_to_value(&r, 200.0, 100.0) - 50.0).abs() < f64::EPSILON);
        assert!((position_to_value(&r, 200.0, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((position_to_value(&r, 200.0, 200.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_position_to_value_clamps() {
        let r = range(0.0, 100.0, 10.0);
        assert_eq!(position_to_value(&r, 200.0, 195.0), 100.0);
        assert_eq!(position_to_value(&r, 200.0, 500.0), 100.0);
        assert_eq!(position_to_value(&r, 200.0, -20.0), 0.0);
    }

    #[test]
    fn test_position_to_value_steps() {
        let r = range(0.0, 100.0, 10.0);
        // 46% -> 46 -> nearest multiple of 10
        assert_eq!(position_to_value(&r, 100.0, 46.0), 50.0);
        assert_eq!(position_to_value(&r, 100.0, 44.0), 40.0);
    }

    #[test]
    fn test_step_offset_from_min() {
        let r = range(3.0, 23.0, 5.0);
        // raw 10.5 -> (10.5 - 3) / 5 = 1.5 -> rounds to 2 -> 13
        assert_eq!(position_to_value(&r, 20.0, 7.5), 13.0);
    }

    #[test]
    fn test_zero_axis_length() {
        let r = range(10.0, 20.0, 1.0);
        assert_eq!(position_to_value(&r, 0.0, 50.0), 10.0);
    }

    #[test]
    fn test_degenerate_range() {
        let r = range(7.0, 7.0, 1.0);
        assert_eq!(position_to_value(&r, 100.0, 0.0), 7.0);
        assert_eq!(position_to_value(&r, 100.0, 80.0), 7.0);
        assert_eq!(value_to_percent(&r, 7.0), 0.0);
    }

    #[test]
    fn test_max_reachable_when_span_not_divisible() {
        let r = range(0.0, 10.0, 3.0);
        assert_eq!(position_to_value(&r, 100.0, 100.0), 10.0);
        assert_eq!(position_to_value(&r, 100.0, 95.0), 9.0);
    }

    #[test]
    fn test_fractional_steps_stay_in_bounds() {
        let r = range(0.0, 0.3, 0.1);
        assert_eq!(percent_to_value(&r, 1.0), 0.3);
        assert!(r.is_aligned(percent_to_value(&r, 0.66)));
    }

    #[test]
    fn test_value_to_percent() {
        let r = range(0.0, 200.0, 1.0);
        assert!((value_to_percent(&r, 50.0) - 0.25).abs() < f64::EPSILON);
        assert_eq!(value_to_percent(&r, -10.0), 0.0);
        assert_eq!(value_to_percent(&r, 300.0), 1.0);
    }

    #[test]
    fn test_snap_nan_collapses_to_min() {
        let r = range(2.0, 8.0, 1.0);
        assert_eq!(r.snap(f64::NAN), 2.0);
    }

    #[test]
    fn test_track_horizontal_offset() {
        let track = Track::new(Rect::new(100.0, 20.0, 300.0, 40.0));
        let r = range(0.0, 100.0, 1.0);
        assert_eq!(track.length(Orientation::Horizontal), 200.0);
        assert_eq!(track.value_at(&r, Orientation::Horizontal, Point::new(150.0, 30.0)), 25.0);
    }

    #[test]
    fn test_track_vertical_grows_upward() {
        let track = Track::new(Rect::new(0.0, 0.0, 10.0, 200.0));
        let r = range(0.0, 100.0, 1.0);
        assert_eq!(track.value_at(&r, Orientation::Vertical, Point::new(5.0, 200.0)), 0.0);
        assert_eq!(track.value_at(&r, Orientation::Vertical, Point::new(5.0, 0.0)), 100.0);
        assert_eq!(track.value_at(&r, Orientation::Vertical, Point::new(5.0, 150.0)), 25.0);
    }

    #[test]
    fn test_track_point_at() {
        let track = Track::new(Rect::new(0.0, 0.0, 200.0, 10.0));
        let r = range(0.0, 100.0, 1.0);
        let p = track.point_at(&r, Orientation::Horizontal, 75.0);
        assert!((p.x - 150.0).abs() < f64::EPSILON);
        assert!((p.y - 5.0).abs() < f64::EPSILON);
    }
}
