use screen_review_core::{CompareSession, HostContext};
use screen_review_protocol::CompareMode;
use wasm_bindgen::prelude::*;

use crate::{js_error, parse_json, parse_variant, to_json};

/// One open compare overlay.
#[wasm_bindgen]
pub struct CompareHandle {
    session: CompareSession,
}

#[wasm_bindgen]
impl CompareHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(host_json: &str) -> Result<CompareHandle, JsError> {
        let host: HostContext = parse_json(host_json, "host context")?;
        let session = CompareSession::open(&host).map_err(js_error)?;
        Ok(Self { session })
    }

    /// Current panes as a JSON array of compare commands.
    pub fn commands(&self) -> Result<String, JsError> {
        to_json(&self.session.commands())
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<String, JsError> {
        let mode: CompareMode = parse_variant(mode)?;
        self.session.set_mode(mode);
        self.commands()
    }

    pub fn cycle_mode(&mut self) -> Result<String, JsError> {
        self.session.cycle_mode();
        self.commands()
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<String, JsError> {
        self.session.set_opacity(opacity);
        self.commands()
    }

    pub fn swap(&mut self) -> Result<String, JsError> {
        self.session.swap();
        self.commands()
    }

    pub fn set_left(&mut self, screen: &str) -> Result<String, JsError> {
        self.session.set_left(screen).map_err(js_error)?;
        self.commands()
    }

    pub fn set_right(&mut self, screen: &str) -> Result<String, JsError> {
        self.session.set_right(screen).map_err(js_error)?;
        self.commands()
    }

    pub fn step_right(&mut self, delta: i32) -> Result<String, JsError> {
        self.session.step_right(delta as isize);
        self.commands()
    }
}
