//! JSON page models standing in for rendered screens.
//!
//! A page model describes each screen's box geometry well enough to lay it
//! out at any viewport width, which is all the terminal previewer needs.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use screen_review_core::HostContext;
use screen_review_core::ports::{StaticDocument, StaticElement};
use screen_review_protocol::PreviewConfig;
use serde::Deserialize;

/// One box on a screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub left: f64,
    /// Fixed width in px. Absent means the box fills the viewport from `left`.
    #[serde(default)]
    pub width: Option<f64>,
    /// Width the text needs. Wider than the box means an ellipsis.
    #[serde(default)]
    pub text_width: Option<f64>,
}

impl PageElement {
    /// Box width at `viewport` px.
    pub fn box_width(&self, viewport: f64) -> f64 {
        self.width.unwrap_or(viewport - self.left).max(0.0)
    }

    fn render(&self, viewport: f64) -> StaticElement {
        let width = self.box_width(viewport);
        match self.text_width {
            Some(text) if text > width => StaticElement::ellipsis(self.left, width, text),
            _ => StaticElement::block(self.left, width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenModel {
    pub height: f64,
    /// Below this width the body stops shrinking and scrolls sideways.
    #[serde(default)]
    pub min_width: f64,
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

impl ScreenModel {
    /// Lay the screen out in a `viewport` by `viewport_height` frame.
    pub fn render(&self, viewport: f64, viewport_height: f64) -> StaticDocument {
        let elements: Vec<StaticElement> =
            self.elements.iter().map(|e| e.render(viewport)).collect();
        let content_width = elements
            .iter()
            .map(|e| e.probe.rect_right)
            .fold(viewport.max(self.min_width), f64::max);
        StaticDocument::new(viewport, viewport_height)
            .with_content(content_width, self.height.max(viewport_height))
            .with_elements(elements)
    }
}

/// An app's screens plus the preview settings to open them with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub app: String,
    /// Screen to open first. Defaults to the first screen.
    #[serde(default)]
    pub selected: Option<String>,
    pub screens: BTreeMap<String, ScreenModel>,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl PageModel {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let model: PageModel = serde_json::from_slice(data).context("invalid page model")?;
        if model.screens.is_empty() {
            bail!("page model for {:?} has no screens", model.app);
        }
        Ok(model)
    }

    pub fn screen(&self, id: &str) -> Option<&ScreenModel> {
        self.screens.get(id)
    }

    pub fn host_context(&self) -> HostContext {
        let screens: Vec<String> = self.screens.keys().cloned().collect();
        let selected = self
            .selected
            .clone()
            .or_else(|| screens.first().cloned())
            .unwrap_or_default();
        HostContext::new(self.app.clone(), screens, selected)
    }
}

#[cfg(test)]
mod tests {
    use screen_review_core::ports::SurfaceDocument;

    use super::*;

    const MODEL: &str = r#"{
        "app": "shop",
        "screens": {
            "cart": { "height": 900 },
            "home": {
                "height": 2400,
                "minWidth": 480,
                "elements": [
                    { "name": "hero" },
                    { "name": "title", "left": 16, "width": 200, "textWidth": 260 },
                    { "name": "promo", "left": 300, "width": 420 }
                ]
            }
        }
    }"#;

    #[test]
    fn host_context_defaults_to_first_screen() {
        let model = PageModel::parse(MODEL.as_bytes()).unwrap();
        let host = model.host_context();
        assert_eq!(host.screens, vec!["cart".to_string(), "home".to_string()]);
        assert_eq!(host.selected_screen.as_deref(), Some("cart"));
    }

    #[test]
    fn narrow_viewport_overflows() {
        let model = PageModel::parse(MODEL.as_bytes()).unwrap();
        let doc = model.screen("home").unwrap().render(375.0, 940.0);
        let probe = doc.layout_probe().unwrap();
        assert_eq!(probe.client_width, 375.0);
        assert_eq!(probe.body_scroll_width, 720.0);
    }

    #[test]
    fn wide_viewport_fits() {
        let model = PageModel::parse(MODEL.as_bytes()).unwrap();
        let doc = model.screen("home").unwrap().render(1280.0, 940.0);
        assert_eq!(doc.content_width, 1280.0);
        assert_eq!(doc.elements[0].probe.rect_width, 1280.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = PageModel::parse(br#"{"app":"shop","screens":{}}"#).unwrap_err();
        assert!(err.to_string().contains("no screens"));
    }
}
