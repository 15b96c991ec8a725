//! Error types shared by the registry and its helpers.

use crate::widget::{WidgetId, WidgetMode};
use thiserror::Error;

/// Errors returned by widget operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    /// The range is unusable: `min > max`, `step <= 0`, or a bound is not finite.
    #[error("Invalid range: min={min}, max={max}, step={step}")]
    InvalidRange { min: f64, max: f64, step: f64 },
    /// The id was destroyed or never created.
    #[error("Widget not found: {0}")]
    NotFound(WidgetId),
    /// A single-handle operation on a dual widget, or the other way round.
    #[error("Invalid mode: expected {expected:?}, found {found:?}")]
    InvalidMode { expected: WidgetMode, found: WidgetMode },
    /// Crop bounds, minimum size or aspect ratio cannot hold a selection.
    #[error("Invalid crop area: {0}")]
    InvalidCrop(&'static str),
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
