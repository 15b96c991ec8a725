//! Crop selection: move the rectangle, resize it by its corners.
//!
//! A [`CropArea`] keeps its selection inside fixed image bounds, no smaller
//! than the minimum size and, when an aspect ratio is set, locked to it.
//! [`CropController`] runs the same press / move / release / cancel life
//! cycle as [`DragController`](crate::drag::DragController); the rectangle
//! at press time is restored on cancel.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::drag::{DragOutcome, RefusalReason};
use crate::error::{WidgetError, WidgetResult};

/// Corner hit tolerance in screen pixels.
pub const CORNER_HIT_TOLERANCE: f64 = 12.0;

/// Corner positions of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }

    /// The corner diagonally across.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Where this corner sits on `rect`.
    pub fn of(self, rect: &Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }
}

/// What a crop gesture manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropHandle {
    /// The whole selection.
    Move,
    /// One corner; the opposite corner stays put.
    Corner(Corner),
}

/// Host-supplied configuration of a crop area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Image area the selection must stay inside.
    pub bounds: Rect,
    /// Initial selection. Defaults to the largest fit inside `bounds`.
    pub rect: Option<Rect>,
    pub min_width: f64,
    pub min_height: f64,
    /// Width divided by height, e.g. `16.0 / 9.0`.
    pub aspect_ratio: Option<f64>,
    pub disabled: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 300.0, 300.0),
            rect: None,
            min_width: 50.0,
            min_height: 50.0,
            aspect_ratio: None,
            disabled: false,
        }
    }
}

impl CropConfig {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the initial selection.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Set the minimum selection size.
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Lock the selection to `ratio` (width / height).
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    fn validate(&self) -> WidgetResult<()> {
        let b = self.bounds;
        if ![b.x0, b.y0, b.x1, b.y1].iter().all(|v| v.is_finite()) || b.x0 >= b.x1 || b.y0 >= b.y1 {
            return Err(WidgetError::InvalidCrop("bounds must be a finite, non-empty rectangle"));
        }
        let min_ok = |v: f64| v.is_finite() && v >= 0.0;
        if !min_ok(self.min_width) || !min_ok(self.min_height) {
            return Err(WidgetError::InvalidCrop("minimum size must be finite and non-negative"));
        }
        if self.min_width > b.width() || self.min_height > b.height() {
            return Err(WidgetError::InvalidCrop("minimum size exceeds the bounds"));
        }
        if let Some(ratio) = self.aspect_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(WidgetError::InvalidCrop("aspect ratio must be finite and positive"));
            }
        }
        Ok(())
    }
}

/// A crop selection inside fixed bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CropArea {
    bounds: Rect,
    rect: Rect,
    min_width: f64,
    min_height: f64,
    aspect_ratio: Option<f64>,
    disabled: bool,
}

impl CropArea {
    pub fn new(config: &CropConfig) -> WidgetResult<Self> {
        config.validate()?;
        let mut area = Self {
            bounds: config.bounds,
            rect: config.bounds,
            min_width: config.min_width,
            min_height: config.min_height,
            aspect_ratio: config.aspect_ratio,
            disabled: config.disabled,
        };
        area.rect = area.fit(config.rect.unwrap_or(config.bounds));
        Ok(area)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current selection.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Replace the selection, fitted to the size limits and the bounds.
    pub fn set_rect(&mut self, rect: Rect) -> Rect {
        self.rect = self.fit(rect);
        self.rect
    }

    /// Selection relative to the bounds, each edge in `0.0..=1.0`.
    ///
    /// Multiply by the source image size to get the pixel crop.
    pub fn relative(&self) -> Rect {
        let b = self.bounds;
        Rect::new(
            (self.rect.x0 - b.x0) / b.width(),
            (self.rect.y0 - b.y0) / b.height(),
            (self.rect.x1 - b.x0) / b.width(),
            (self.rect.y1 - b.y0) / b.height(),
        )
    }

    /// Corner handles at their screen positions.
    pub fn corners(&self) -> [(Corner, Point); 4] {
        Corner::ALL.map(|corner| (corner, corner.of(&self.rect)))
    }

    /// What a press at `point` grabs. Corners win over the selection body.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<CropHandle> {
        let corner = self
            .corners()
            .into_iter()
            .find(|(_, p)| (point - *p).hypot2() <= tolerance * tolerance)
            .map(|(corner, _)| CropHandle::Corner(corner));
        corner.or_else(|| self.rect.contains(point).then_some(CropHandle::Move))
    }

    /// `from` shifted by `delta`, stopped at the bounds.
    pub fn moved(&self, from: Rect, delta: Vec2) -> Rect {
        let b = self.bounds;
        let x0 = (from.x0 + delta.x).min(b.x1 - from.width()).max(b.x0);
        let y0 = (from.y0 + delta.y).min(b.y1 - from.height()).max(b.y0);
        Rect::new(x0, y0, x0 + from.width(), y0 + from.height())
    }

    /// `from` with `corner` dragged by `delta` and the opposite corner fixed.
    ///
    /// Corners never pass the fixed one; the minimum size stops them first.
    /// With an aspect lock, right-hand corners follow the width and
    /// left-hand corners follow the height.
    pub fn resized(&self, from: Rect, corner: Corner, delta: Vec2) -> Rect {
        let anchor = corner.opposite().of(&from);
        let dragged = corner.of(&from) + delta;
        let right = corner.is_right();
        let bottom = corner.is_bottom();

        let width = if right { dragged.x - anchor.x } else { anchor.x - dragged.x };
        let height = if bottom { dragged.y - anchor.y } else { anchor.y - dragged.y };
        let mut width = width.max(self.min_width);
        let mut height = height.max(self.min_height);
        if let Some(ratio) = self.aspect_ratio {
            if right {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
        }

        // Room between the fixed corner and the bounds edge being dragged toward
        let room_x = if right { self.bounds.x1 - anchor.x } else { anchor.x - self.bounds.x0 };
        let room_y = if bottom { self.bounds.y1 - anchor.y } else { anchor.y - self.bounds.y0 };
        let (width, height) = self.limit(width, height, room_x, room_y);

        let x0 = if right { anchor.x } else { anchor.x - width };
        let y0 = if bottom { anchor.y } else { anchor.y - height };
        Rect::new(x0, y0, x0 + width, y0 + height)
    }

    /// Fit an arbitrary rectangle: size limits first, then keep its centre
    /// as far as the bounds allow.
    fn fit(&self, rect: Rect) -> Rect {
        let rect = rect.abs();
        let mut width = rect.width().max(self.min_width);
        let mut height = rect.height().max(self.min_height);
        if let Some(ratio) = self.aspect_ratio {
            height = width / ratio;
        }
        (width, height) = self.limit(width, height, self.bounds.width(), self.bounds.height());

        let b = self.bounds;
        let center = rect.center();
        let x0 = (center.x - width / 2.0).min(b.x1 - width).max(b.x0);
        let y0 = (center.y - height / 2.0).min(b.y1 - height).max(b.y0);
        Rect::new(x0, y0, x0 + width, y0 + height)
    }

    /// Cap a size at `max_width` x `max_height`, shrinking the other side
    /// too when an aspect lock is set.
    fn limit(&self, width: f64, height: f64, max_width: f64, max_height: f64) -> (f64, f64) {
        let mut width = width.min(max_width);
        let mut height = height.min(max_height);
        if let Some(ratio) = self.aspect_ratio {
            if width / height > ratio {
                width = height * ratio;
            } else {
                height = width / ratio;
            }
        }
        (width, height)
    }
}

/// An active crop gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSession {
    pub handle: CropHandle,
    pub start_point: Point,
    pub current_point: Point,
    /// Selection at press time, restored on cancel.
    pub original_rect: Rect,
}

impl CropSession {
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// Drives one crop gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct CropController {
    session: Option<CropSession>,
}

impl CropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Grab `handle` at `point`. The selection does not change until the pointer moves.
    pub fn begin(&mut self, area: &CropArea, handle: CropHandle, point: Point) -> DragOutcome {
        if self.session.is_some() {
            log::warn!("Refusing crop gesture: already dragging");
            return DragOutcome::Refused(RefusalReason::AlreadyDragging);
        }
        if area.is_disabled() {
            log::debug!("Refusing crop gesture: disabled");
            return DragOutcome::Refused(RefusalReason::Disabled);
        }
        log::debug!("Crop gesture {:?} started at {:?}", handle, area.rect());
        self.session = Some(CropSession {
            handle,
            start_point: point,
            current_point: point,
            original_rect: area.rect(),
        });
        DragOutcome::Started
    }

    /// Hit-test `point` and begin a gesture on whatever it lands on.
    pub fn press(&mut self, area: &CropArea, point: Point, tolerance: f64) -> DragOutcome {
        match area.hit_test(point, tolerance) {
            Some(handle) => self.begin(area, handle, point),
            None => DragOutcome::Refused(RefusalReason::Missed),
        }
    }

    /// Apply the pointer movement since the press. No-op unless dragging.
    pub fn update(&mut self, area: &mut CropArea, point: Point) -> Option<Rect> {
        let session = self.session.as_mut()?;
        session.current_point = point;
        let delta = session.delta();
        area.rect = match session.handle {
            CropHandle::Move => area.moved(session.original_rect, delta),
            CropHandle::Corner(corner) => area.resized(session.original_rect, corner, delta),
        };
        log::trace!("Crop {:?} -> {:?}", session.handle, area.rect);
        Some(area.rect)
    }

    /// Finish the gesture; `commit == false` restores the press-time selection.
    pub fn end(&mut self, area: &mut CropArea, commit: bool) -> Option<Rect> {
        let session = self.session.take()?;
        if !commit {
            area.rect = session.original_rect;
        }
        log::debug!(
            "Crop gesture {} at {:?}",
            if commit { "committed" } else { "cancelled" },
            area.rect
        );
        Some(area.rect)
    }
}
