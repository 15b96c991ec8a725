//! Widget instances and the registry that owns them.
//!
//! - Instance data with its step and ordering invariants
//! - Handles and hit testing against a track
//! - Observer subscriptions and the render sink
//!
//! Instances are plain data. Only the registry mutates them.

mod events;
mod handles;
mod registry;
mod state;

pub use events::{RenderSink, SubscriptionId, WidgetEvent, WidgetSnapshot};
pub use handles::{
    get_handles, hit_test_handles, nearest_handle, Handle, HandleKind, HANDLE_HIT_TOLERANCE,
};
pub use registry::{InstanceRegistry, SetOptions};
pub use state::{WidgetConfig, WidgetId, WidgetInstance, WidgetMode, WidgetValue};
