//! Replays a short pointer and keyboard session and logs what the widgets render.
//!
//! Run with `RUST_LOG=debug` to also see the core's own log output.

use kurbo::{Point, Rect};
use rangekit_core::format::{format_time, format_value};
use rangekit_core::storage::{load_widget, save_widget};
use rangekit_core::crop::{Corner, CORNER_HIT_TOLERANCE};
use rangekit_core::{
    presets, CropArea, CropConfig, CropController, CropHandle, InstanceRegistry, KeyEvent, MemoryStore, PointerEvent, RenderSink, Track,
    WidgetError, WidgetHost, WidgetId, WidgetSnapshot, WidgetValue,
};

/// Render sink that writes every snapshot to the log as JSON.
struct LogSink;

impl RenderSink for LogSink {
    fn render(&mut self, snapshot: &WidgetSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => log::info!("render {}", json),
            Err(e) => log::error!("Failed to encode snapshot: {}", e),
        }
    }

    fn destroyed(&mut self, id: WidgetId) {
        log::info!("remove {}", id);
    }
}

fn describe(value: WidgetValue, step: f64) -> String {
    match value {
        WidgetValue::Single(v) => format_value(v, step),
        WidgetValue::Dual { start, end } => {
            format!("{} - {}", format_value(start, step), format_value(end, step))
        }
    }
}

/// Drag a handle from `from` to `to` in a few pointer moves.
fn drag(host: &mut WidgetHost, id: WidgetId, track: Track, from: Point, to: Point) {
    let target = match host.target_at(id, &track, from) {
        Ok(target) => target,
        Err(e) => {
            log::warn!("No target: {}", e);
            return;
        }
    };
    host.handle_pointer_event(PointerEvent::Down {
        target,
        track,
        position: from,
    });
    for i in 1..=4 {
        let t = i as f64 / 4.0;
        host.handle_pointer_event(PointerEvent::Move {
            position: from.lerp(to, t),
        });
    }
    host.handle_pointer_event(PointerEvent::Up { position: to });
}

fn main() -> Result<(), WidgetError> {
    env_logger::init();
    log::info!("Starting rangekit demo");

    let mut host = WidgetHost::new(InstanceRegistry::with_render_sink(LogSink));

    // Price filter: two handles on a 300px track
    let price = host.create(&presets::range_slider(0.0, 500.0))?;
    host.registry_mut().subscribe(price, |event| {
        log::info!("price event {:?}", event);
    })?;
    let price_track = Track::new(Rect::new(20.0, 40.0, 320.0, 46.0));
    drag(
        &mut host,
        price,
        price_track,
        Point::new(20.0, 43.0),
        Point::new(80.0, 43.0),
    );
    // Pull the end handle below the start one; it stops at the start handle
    drag(
        &mut host,
        price,
        price_track,
        Point::new(320.0, 43.0),
        Point::new(50.0, 43.0),
    );
    let step = host.registry().get(price)?.range().step;
    log::info!("price range: {}", describe(host.registry().get(price)?.value(), step));

    // Volume: keyboard only
    let volume = host.create(&presets::volume())?;
    host.focus(volume, rangekit_core::HandleKind::Single)?;
    for key in ["PageDown", "PageDown", "ArrowDown", "End", "Home", "ArrowUp"] {
        host.handle_key_event(&KeyEvent::Pressed(key.to_string()));
    }
    let volume_step = host.registry().get(volume)?.range().step;
    log::info!("volume: {}", describe(host.registry().get(volume)?.value(), volume_step));

    // Seek bar: a drag cancelled with Escape leaves playback where it was
    let seek = host.create(&presets::seek_bar(215.0))?;
    let seek_track = Track::horizontal(430.0);
    let target = host.target_at(seek, &seek_track, Point::new(0.0, 0.0))?;
    host.handle_pointer_event(PointerEvent::Down {
        target,
        track: seek_track,
        position: Point::new(0.0, 0.0),
    });
    host.handle_pointer_event(PointerEvent::Move {
        position: Point::new(250.0, 0.0),
    });
    if let Some(WidgetValue::Single(t)) = host.registry().get(seek).ok().map(|i| i.value()) {
        log::info!("scrubbing at {}", format_time(t));
    }
    host.handle_key_event(&KeyEvent::Pressed("Escape".to_string()));
    if let WidgetValue::Single(t) = host.registry().get(seek)?.value() {
        log::info!("playback stays at {}", format_time(t));
    }

    // Persist the price filter and bring it back
    let store = MemoryStore::new();
    match save_widget(&store, "price-filter", host.registry(), price) {
        Ok(()) => {}
        Err(e) => log::error!("Failed to save price filter: {}", e),
    }
    host.destroy(price);
    match load_widget(&store, "price-filter") {
        Ok(config) => {
            let restored = host.create(&config)?;
            log::info!(
                "restored price range: {}",
                describe(host.registry().get(restored)?.value(), config.step)
            );
        }
        Err(e) => log::error!("Failed to restore price filter: {}", e),
    }

    host.teardown();

    // Avatar crop: square selection on a 640x480 image, resized then moved
    let mut avatar = CropArea::new(&CropConfig::new(Rect::new(0.0, 0.0, 640.0, 480.0)).with_aspect_ratio(1.0))?;
    let mut crop = CropController::new();
    crop.begin(&avatar, CropHandle::Corner(Corner::BottomRight), Point::new(560.0, 480.0));
    crop.update(&mut avatar, Point::new(400.0, 400.0));
    crop.end(&mut avatar, true);
    let inside = avatar.rect().center();
    crop.press(&avatar, inside, CORNER_HIT_TOLERANCE);
    crop.update(&mut avatar, inside + kurbo::Vec2::new(-500.0, 0.0));
    crop.end(&mut avatar, true);
    log::info!("crop {:?} (relative {:?})", avatar.rect(), avatar.relative());
    Ok(())
}
