//! Rangekit Core Library
//!
//! Instance registry and drag state machine shared by slider-like widgets:
//! single and dual sliders, media seek bars and volume controls, plus the
//! corner-dragged selection of an image cropper.
//!
//! - [`value_space`]: pointer position to stepped value and back
//! - [`widget`]: instances, the registry that owns them, observers
//! - [`drag`]: the pointer-drag state machine
//! - [`input`]: host events and the [`WidgetHost`] composition root
//! - [`crop`]: crop selection with move and corner resize
//!
//! Rendering and persistence are collaborators supplied by the host.

pub mod crop;
pub mod drag;
pub mod error;
pub mod format;
pub mod input;
pub mod keyboard;
pub mod marks;
pub mod presets;
pub mod storage;
pub mod value_space;
pub mod widget;

pub use crop::{CropArea, CropConfig, CropController, CropHandle};
pub use drag::{DragController, DragOutcome, DragSession, DragState, RefusalReason};
pub use error::{WidgetError, WidgetResult};
pub use input::{KeyEvent, PointerEvent, PointerTarget, WidgetHost};
pub use keyboard::KeyCommand;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use value_space::{percent_to_value, position_to_value, value_to_percent, Orientation, Track, ValueRange};
pub use widget::{
    HandleKind, InstanceRegistry, RenderSink, SetOptions, SubscriptionId, WidgetConfig, WidgetEvent,
    WidgetId, WidgetInstance, WidgetMode, WidgetSnapshot, WidgetValue,
};
