//! Browser bindings
//!
//! The page owns the canvas, the event listeners and the
//! `requestAnimationFrame` loop; it forwards `KeyboardEvent.code` strings,
//! focus changes and frame timestamps here and draws the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::platform::input::Button;
use crate::session::Session;
use crate::sim::playlist_from_json;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Tile Chase starting...");
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// `tuning_json` may be omitted to use the built-in balance
    #[wasm_bindgen(constructor)]
    pub fn new(playlist_json: &str, tuning_json: Option<String>) -> Result<WebSession, JsValue> {
        let playlist = playlist_from_json(playlist_json).map_err(js_error)?;
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let inner = Session::new(&playlist, tuning).map_err(js_error)?;
        Ok(WebSession { inner })
    }

    pub fn play(&mut self) {
        self.inner.play();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    #[wasm_bindgen(js_name = focusGained)]
    pub fn focus_gained(&mut self) {
        self.inner.focus_gained();
    }

    #[wasm_bindgen(js_name = focusLost)]
    pub fn focus_lost(&mut self) {
        self.inner.focus_lost();
    }

    /// Returns whether the key is bound (so the page can `preventDefault`)
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(button) = Button::from_key_code(code) else {
            return false;
        };
        self.inner.key_down(button);
        true
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, code: &str) -> bool {
        let Some(button) = Button::from_key_code(code) else {
            return false;
        };
        self.inner.key_up(button);
        true
    }

    /// Drain the ticks owed at `now_ms`; returns how many ran
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.inner.frame(now_ms)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.inner.snapshot().to_json().map_err(js_error)
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
