use std::cell::RefCell;
use std::rc::{Rc, Weak};

use screen_review_core::ports::ListenerRegistration;
use screen_review_core::{HostContext, PreviewSession, ReviewResult};
use screen_review_protocol::{LayoutMode, PreviewCommand, PreviewConfig, SurfaceId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlIFrameElement;

use crate::frame::{AnimationFrameScheduler, IframeDocument};
use crate::{js_error, parse_json, parse_variant, to_json};

/// One open responsive preview.
///
/// Created when the overlay opens and freed when it closes. Mutating calls
/// return the host commands as a JSON array.
#[wasm_bindgen]
pub struct PreviewHandle {
    session: Rc<RefCell<PreviewSession>>,
}

#[wasm_bindgen]
impl PreviewHandle {
    /// `host_json` is `{ appId, screens, selectedScreen }`; `config_json`
    /// may be `{}` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host_json: &str, config_json: &str) -> Result<PreviewHandle, JsError> {
        let host: HostContext = parse_json(host_json, "host context")?;
        let config: PreviewConfig = parse_json(config_json, "preview config")?;
        let session = PreviewSession::open(&host, config).map_err(js_error)?;
        Ok(Self {
            session: Rc::new(RefCell::new(session)),
        })
    }

    pub fn rebuild(&self) -> Result<String, JsError> {
        self.commands(|s| Ok(s.rebuild()))
    }

    pub fn set_layout(&self, mode: &str) -> Result<String, JsError> {
        let mode: LayoutMode = parse_variant(mode)?;
        self.commands(|s| Ok(s.set_layout(mode)))
    }

    pub fn toggle_breakpoint(&self, index: usize) -> Result<String, JsError> {
        self.commands(|s| s.toggle_breakpoint(index))
    }

    pub fn set_custom_width(&self, width: u32) -> Result<String, JsError> {
        self.commands(|s| s.set_custom_width(width))
    }

    pub fn clear_custom(&self) -> Result<String, JsError> {
        self.commands(|s| Ok(s.clear_custom()))
    }

    pub fn promote(&self, index: usize) -> Result<String, JsError> {
        self.commands(|s| s.promote(index))
    }

    pub fn set_screen(&self, screen_id: &str) -> Result<String, JsError> {
        self.commands(|s| s.set_screen(screen_id))
    }

    pub fn next_screen(&self) -> Result<String, JsError> {
        self.commands(|s| Ok(s.next_screen()))
    }

    pub fn previous_screen(&self) -> Result<String, JsError> {
        self.commands(|s| Ok(s.previous_screen()))
    }

    pub fn set_zoom_to_fit(&self, enabled: bool) -> Result<String, JsError> {
        self.commands(|s| Ok(s.set_zoom_to_fit(enabled)))
    }

    pub fn set_container(&self, width: f64, height: f64) -> Result<String, JsError> {
        self.commands(|s| Ok(s.set_container(width, height)))
    }

    pub fn set_sync_enabled(&self, enabled: bool) -> Result<(), JsError> {
        self.session
            .try_borrow_mut()
            .map_err(js_error)?
            .set_sync_enabled(enabled);
        Ok(())
    }

    /// Bind a loaded iframe to the surface from a `mount-surface` command.
    ///
    /// Call from the iframe's `load` handler, then call `surface_loaded`.
    /// Returns false when the surface was discarded in the meantime.
    pub fn attach(&self, surface_json: &str, frame: HtmlIFrameElement) -> Result<bool, JsError> {
        let id: SurfaceId = parse_json(surface_json, "surface id")?;
        let document = IframeDocument::new(frame);
        let registration = match document.window() {
            Ok(window) => self.listen_for_scroll(id, &window)?,
            Err(err) => {
                log::warn!("preview: no window for surface {id:?}: {err}");
                ListenerRegistration::none()
            }
        };
        let mut session = self.session.try_borrow_mut().map_err(js_error)?;
        Ok(session.attach(id, Box::new(document), registration))
    }

    /// Run detection for a loaded surface. Returns a `show-findings`
    /// command, or `undefined` for a discarded or unreadable surface.
    pub fn surface_loaded(&self, surface_json: &str) -> Result<Option<String>, JsError> {
        let id: SurfaceId = parse_json(surface_json, "surface id")?;
        let findings = self
            .session
            .try_borrow_mut()
            .map_err(js_error)?
            .surface_loaded(id);
        findings
            .map(|findings| to_json(&PreviewCommand::ShowFindings { surface: id, findings }))
            .transpose()
    }

    pub fn generation(&self) -> f64 {
        self.session.borrow().generation() as f64
    }

    fn commands(
        &self,
        f: impl FnOnce(&mut PreviewSession) -> ReviewResult<Vec<PreviewCommand>>,
    ) -> Result<String, JsError> {
        let mut session = self.session.try_borrow_mut().map_err(js_error)?;
        let commands = f(&mut session).map_err(js_error)?;
        to_json(&commands)
    }

    fn listen_for_scroll(
        &self,
        id: SurfaceId,
        window: &web_sys::Window,
    ) -> Result<ListenerRegistration, JsError> {
        let session: Weak<RefCell<PreviewSession>> = Rc::downgrade(&self.session);
        let on_scroll = Closure::<dyn FnMut()>::new(move || {
            let Some(session) = session.upgrade() else {
                return;
            };
            // Scroll events dispatched while the session is busy are dropped.
            if let Ok(mut session) = session.try_borrow_mut() {
                session.surface_scrolled(id, &AnimationFrameScheduler);
            }
        });
        window
            .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("failed to listen for scroll: {e:?}")))?;

        let target = window.clone();
        Ok(ListenerRegistration::new(move || {
            let _ = target
                .remove_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
            drop(on_scroll);
        }))
    }
}
