//! Port implementations over real browser primitives.

use std::cell::Cell;
use std::rc::Rc;

use screen_review_core::ports::{AccessError, Scheduler, SurfaceDocument};
use screen_review_protocol::{BoxExtent, ElementProbe, LayoutProbe, ScrollMetrics, TextOverflow};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlIFrameElement, Window};

#[allow(clippy::needless_pass_by_value)]
fn denied(err: JsValue) -> AccessError {
    AccessError::Denied(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// A same-origin iframe rendering one surface.
pub(crate) struct IframeDocument {
    frame: HtmlIFrameElement,
}

impl IframeDocument {
    pub(crate) fn new(frame: HtmlIFrameElement) -> Self {
        Self { frame }
    }

    pub(crate) fn window(&self) -> Result<Window, AccessError> {
        self.frame.content_window().ok_or(AccessError::NotLoaded)
    }

    fn document(&self) -> Result<Document, AccessError> {
        // `contentDocument` is null for cross-origin frames.
        self.frame
            .content_document()
            .ok_or_else(|| AccessError::Denied("frame document is not reachable".into()))
    }

    fn root(&self) -> Result<(Document, Element), AccessError> {
        let document = self.document()?;
        let root = document.document_element().ok_or(AccessError::NotLoaded)?;
        Ok((document, root))
    }
}

fn extent(element: &Element) -> BoxExtent {
    BoxExtent {
        scroll_width: f64::from(element.scroll_width()),
        client_width: f64::from(element.client_width()),
        scroll_height: f64::from(element.scroll_height()),
        client_height: f64::from(element.client_height()),
    }
}

fn probe_element(window: &Window, element: &Element) -> Result<ElementProbe, AccessError> {
    if !element.is_connected() {
        return Err(AccessError::Detached);
    }
    let style = window
        .get_computed_style(element)
        .map_err(denied)?
        .ok_or(AccessError::Detached)?;
    let text_overflow = style.get_property_value("text-overflow").map_err(denied)?;
    let rect = element.get_bounding_client_rect();
    Ok(ElementProbe {
        text_overflow: TextOverflow::parse(&text_overflow),
        scroll_width: f64::from(element.scroll_width()),
        client_width: f64::from(element.client_width()),
        rect_right: rect.right(),
        rect_width: rect.width(),
    })
}

impl SurfaceDocument for IframeDocument {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, AccessError> {
        let window = self.window()?;
        let (document, root) = self.root()?;
        let body = document
            .body()
            .map(|body| extent(&body))
            .unwrap_or_default();
        Ok(ScrollMetrics {
            document_element: extent(&root),
            body,
            scroll_x: window.scroll_x().map_err(denied)?,
            scroll_y: window.scroll_y().map_err(denied)?,
        })
    }

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), AccessError> {
        self.window()?.scroll_to_with_x_and_y(x, y);
        Ok(())
    }

    fn layout_probe(&self) -> Result<LayoutProbe, AccessError> {
        let (document, root) = self.root()?;
        let body = document.body().ok_or(AccessError::NotLoaded)?;
        Ok(LayoutProbe {
            body_scroll_width: f64::from(body.scroll_width()),
            client_width: f64::from(root.client_width()),
        })
    }

    fn elements(&self) -> Result<Vec<Result<ElementProbe, AccessError>>, AccessError> {
        let window = self.window()?;
        let document = self.document()?;
        let nodes = document.query_selector_all("*").map_err(denied)?;
        Ok((0..nodes.length())
            .map(|i| {
                let node = nodes.item(i).ok_or(AccessError::Detached)?;
                let element = node
                    .dyn_into::<Element>()
                    .map_err(|_| AccessError::Detached)?;
                probe_element(&window, &element)
            })
            .collect())
    }
}

/// Runs deferred tasks on the next animation frame.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AnimationFrameScheduler;

impl Scheduler for AnimationFrameScheduler {
    fn next_tick(&self, task: Box<dyn FnOnce()>) {
        let slot = Rc::new(Cell::new(Some(task)));
        let pending = Rc::clone(&slot);
        let callback = Closure::once_into_js(move || {
            if let Some(task) = pending.take() {
                task();
            }
        });
        let scheduled = web_sys::window()
            .map(|window| {
                window
                    .request_animation_frame(callback.unchecked_ref::<js_sys::Function>())
                    .is_ok()
            })
            .unwrap_or(false);
        if !scheduled {
            log::warn!("requestAnimationFrame unavailable, running task immediately");
            if let Some(task) = slot.take() {
                task();
            }
        }
    }
}
