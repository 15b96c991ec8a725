//! Ready-made configurations for the concrete widgets built on the core.

use crate::value_space::Orientation;
use crate::widget::WidgetConfig;

/// Seek granularity of a media progress bar, in seconds.
pub const SEEK_STEP: f64 = 0.1;
/// Volume granularity.
pub const VOLUME_STEP: f64 = 0.01;

/// Plain horizontal slider over `0..=100`, starting at 50.
pub fn slider() -> WidgetConfig {
    WidgetConfig::default()
}

/// Vertical slider over `0..=100`, starting at 50.
pub fn vertical_slider() -> WidgetConfig {
    WidgetConfig::default().with_orientation(Orientation::Vertical)
}

/// Two-handle slider over `[min, max]` with both handles at the ends.
pub fn range_slider(min: f64, max: f64) -> WidgetConfig {
    WidgetConfig::new(min, max, 1.0).with_values(min, max)
}

/// Media progress bar over `0..=duration_secs`, starting at 0.
///
/// An unknown (non-finite or negative) duration yields an empty range.
pub fn seek_bar(duration_secs: f64) -> WidgetConfig {
    let duration = if duration_secs.is_finite() {
        duration_secs.max(0.0)
    } else {
        0.0
    };
    WidgetConfig::new(0.0, duration, SEEK_STEP)
}

/// Volume control over `0..=1`, starting at full volume.
pub fn volume() -> WidgetConfig {
    WidgetConfig::new(0.0, 1.0, VOLUME_STEP).with_value(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{InstanceRegistry, WidgetMode, WidgetValue};

    #[test]
    fn test_presets_are_valid() {
        for config in [slider(), vertical_slider(), range_slider(10.0, 20.0), seek_bar(180.0), volume()] {
            assert!(config.range().is_ok(), "{:?}", config);
        }
    }

    #[test]
    fn test_range_slider_is_dual() {
        let mut registry = InstanceRegistry::new();
        let id = registry.create(&range_slider(10.0, 20.0)).unwrap();
        let instance = registry.get(id).unwrap();
        assert_eq!(instance.mode(), WidgetMode::Dual);
        assert_eq!(instance.value(), WidgetValue::Dual { start: 10.0, end: 20.0 });
    }

    #[test]
    fn test_seek_bar_unknown_duration() {
        let config = seek_bar(f64::NAN);
        assert_eq!(config.max, 0.0);
        assert!(config.range().is_ok());
    }

    #[test]
    fn test_volume_starts_full() {
        let mut registry = InstanceRegistry::new();
        let id = registry.create(&volume()).unwrap();
        assert_eq!(registry.get(id).unwrap().value(), WidgetValue::Single(1.0));
    }
}
