//! Keyboard stepping for focused handles.

use serde::{Deserialize, Serialize};

use crate::widget::{HandleKind, WidgetValue};
use crate::value_space::ValueRange;

/// How many steps a page key moves.
pub const PAGE_STEPS: f64 = 10.0;

/// A value-changing key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCommand {
    /// One step up.
    Increment,
    /// One step down.
    Decrement,
    /// [`PAGE_STEPS`] steps up.
    PageUp,
    /// [`PAGE_STEPS`] steps down.
    PageDown,
    /// Jump to the lowest value the handle may take.
    Home,
    /// Jump to the highest value the handle may take.
    End,
}

impl KeyCommand {
    /// Parse a key name as delivered by the host's key events.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "ArrowUp" => Some(KeyCommand::Increment),
            "ArrowLeft" | "ArrowDown" => Some(KeyCommand::Decrement),
            "PageUp" => Some(KeyCommand::PageUp),
            "PageDown" => Some(KeyCommand::PageDown),
            "Home" => Some(KeyCommand::Home),
            "End" => Some(KeyCommand::End),
            _ => None,
        }
    }

    /// Raw target for `handle`, before snapping and ordering.
    ///
    /// `Home` on the end handle of a dual widget stops at the start handle,
    /// and `End` on the start handle stops at the end handle.
    pub fn target(self, range: &ValueRange, value: &WidgetValue, handle: HandleKind) -> Option<f64> {
        let current = value.get(handle)?;
        Some(match self {
            KeyCommand::Increment => range.step_by(current, 1.0),
            KeyCommand::Decrement => range.step_by(current, -1.0),
            KeyCommand::PageUp => range.step_by(current, PAGE_STEPS),
            KeyCommand::PageDown => range.step_by(current, -PAGE_STEPS),
            KeyCommand::Home => match value {
                WidgetValue::Dual { start, .. } if handle == HandleKind::End => *start,
                _ => range.min,
            },
            KeyCommand::End => match value {
                WidgetValue::Dual { end, .. } if handle == HandleKind::Start => *end,
                _ => range.max,
            },
        })
    }
}
