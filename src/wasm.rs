use wasm_bindgen::prelude::*;

use crate::{ImageSet, ViewerConfig, ViewerController};
use lightbox_ui::{
    ChromeElement, Event, HitTarget, KeyCode, MouseButton, Point, Size, Touch, WheelDelta,
};
use web_time::Instant;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Trace).is_err() {
        // A logger is already installed; keep it
        return;
    }
    log::set_max_level(crate::LogLevel::default().to_level_filter());
    log::info!("Lightbox WASM starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn hit_target(target: Option<String>) -> HitTarget {
    match target.as_deref() {
        Some("close") => HitTarget::Chrome(ChromeElement::Close),
        Some("previous") => HitTarget::Chrome(ChromeElement::Previous),
        Some("next") => HitTarget::Chrome(ChromeElement::Next),
        Some("thumbnails") => HitTarget::Chrome(ChromeElement::ThumbnailStrip),
        _ => HitTarget::Stage,
    }
}

/// DOM `MouseEvent.button` numbering.
fn mouse_button(button: u16) -> MouseButton {
    match button {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        other => MouseButton::Other(other),
    }
}

/// DOM `KeyboardEvent.key` names.
fn key_code(key: &str) -> Option<KeyCode> {
    match key {
        "Escape" | "Esc" => Some(KeyCode::Escape),
        "ArrowLeft" | "Left" => Some(KeyCode::Left),
        "ArrowRight" | "Right" => Some(KeyCode::Right),
        "ArrowUp" | "Up" => Some(KeyCode::Up),
        "ArrowDown" | "Down" => Some(KeyCode::Down),
        "Enter" => Some(KeyCode::Enter),
        " " => Some(KeyCode::Space),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

/// Touches flattened as `[id, x, y, id, x, y, ...]`.
fn touches(data: &[f64]) -> Vec<Touch> {
    data.chunks_exact(3)
        .map(|t| Touch::new(t[0] as u64, Point::new(t[1] as f32, t[2] as f32)))
        .collect()
}

/// Browser handle around a [`ViewerController`].
#[wasm_bindgen]
pub struct WasmLightbox {
    controller: ViewerController,
}

#[wasm_bindgen]
impl WasmLightbox {
    /// `images_json` is a JSON list of `{ "url": ..., "alt": ... }` objects.
    #[wasm_bindgen(constructor)]
    pub fn new(
        images_json: &str,
        initial_index: usize,
        width: f32,
        height: f32,
        config_json: Option<String>,
    ) -> Result<WasmLightbox, JsValue> {
        let images: ImageSet = serde_json::from_str(images_json).map_err(to_js)?;
        let config = match config_json {
            Some(json) => ViewerConfig::from_json(&json).map_err(to_js)?,
            None => ViewerConfig::default(),
        };
        log::set_max_level(config.log_level.to_level_filter());
        let controller = ViewerController::new(images, initial_index, &config, Size::new(width, height))
            .map_err(to_js)?;
        Ok(Self { controller })
    }

    fn dispatch(&mut self, event: Event) {
        self.controller.handle_event(&event, Instant::now());
    }

    /// Register the close notification.
    pub fn on_close(&mut self, callback: js_sys::Function) {
        self.controller.set_on_close(move || {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("Close callback failed: {:?}", e);
            }
        });
    }

    pub fn mouse_down(&mut self, button: u16, x: f32, y: f32, target: Option<String>) {
        self.dispatch(Event::MousePressed {
            button: mouse_button(button),
            position: Point::new(x, y),
            target: hit_target(target),
        });
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.dispatch(Event::MouseMoved {
            position: Point::new(x, y),
        });
    }

    pub fn mouse_up(&mut self, button: u16, x: f32, y: f32) {
        self.dispatch(Event::MouseReleased {
            button: mouse_button(button),
            position: Point::new(x, y),
        });
    }

    pub fn touch_start(&mut self, data: &[f64], target: Option<String>) {
        self.dispatch(Event::TouchStart {
            touches: touches(data),
            target: hit_target(target),
        });
    }

    pub fn touch_move(&mut self, data: &[f64]) {
        self.dispatch(Event::TouchMove {
            touches: touches(data),
        });
    }

    pub fn touch_end(&mut self, data: &[f64]) {
        self.dispatch(Event::TouchEnd {
            touches: touches(data),
        });
    }

    pub fn touch_cancel(&mut self) {
        self.dispatch(Event::TouchCancel);
    }

    /// `delta_mode` follows `WheelEvent.deltaMode` (0 = pixels, 1 = lines).
    pub fn wheel(&mut self, delta_mode: u32, dx: f32, dy: f32, x: f32, y: f32) {
        let delta = match delta_mode {
            1 => WheelDelta::Lines { x: dx, y: dy },
            _ => WheelDelta::Pixels { x: dx, y: dy },
        };
        self.dispatch(Event::Wheel {
            delta,
            position: Point::new(x, y),
        });
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(key) = key_code(key) {
            self.dispatch(Event::KeyPressed { key });
        }
    }

    pub fn window_blur(&mut self) {
        self.dispatch(Event::WindowBlur);
    }

    pub fn global_pointer_up(&mut self) {
        self.dispatch(Event::GlobalPointerUp);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.dispatch(Event::Resized {
            viewport: Size::new(width, height),
        });
    }

    pub fn image_loaded(&mut self, width: f32, height: f32) {
        self.dispatch(Event::ImageLoaded {
            natural: Size::new(width, height),
        });
    }

    pub fn next(&mut self) {
        self.controller.next(Instant::now());
    }

    pub fn previous(&mut self) {
        self.controller.previous(Instant::now());
    }

    pub fn slide_to(&mut self, index: usize) {
        self.controller.slide_to(index, Instant::now());
    }

    pub fn open_at(&mut self, index: usize) {
        self.controller.open_at(index);
    }

    pub fn thumbnail_strip_clicked(&mut self, x: f32) {
        self.controller.thumbnail_strip_clicked(x, Instant::now());
    }

    pub fn close(&mut self) {
        self.controller.close(Instant::now());
    }

    pub fn active_index(&self) -> usize {
        self.controller.active_index()
    }

    pub fn needs_tick(&self) -> bool {
        self.controller.needs_tick()
    }

    /// Advance animations and return the frame to draw as JSON.
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let now = Instant::now();
        self.controller.tick(now);
        serde_json::to_string(&self.controller.frame(now)).map_err(to_js)
    }
}
