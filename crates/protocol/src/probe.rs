//! Measurements read from a rendered document.
//!
//! Hosts fill these in from whatever embeds the screen (an iframe in the
//! browser, a page model in the terminal previewer). The engine never reads
//! a document any other way.

use serde::{Deserialize, Serialize};

/// Scroll and client extents of one box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxExtent {
    pub scroll_width: f64,
    pub client_width: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// The root (`<html>`) element.
    pub document_element: BoxExtent,
    /// The `<body>` element. Only its scroll extents are used.
    pub body: BoxExtent,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ScrollMetrics {
    /// Maximum horizontal scroll travel.
    ///
    /// Takes the larger of the root and body scroll widths since browsers
    /// disagree on which one carries the document extent.
    pub fn max_scroll_x(&self) -> f64 {
        let scroll_width = self
            .document_element
            .scroll_width
            .max(self.body.scroll_width);
        (scroll_width - self.document_element.client_width).max(0.0)
    }

    /// Maximum vertical scroll travel.
    pub fn max_scroll_y(&self) -> f64 {
        let scroll_height = self
            .document_element
            .scroll_height
            .max(self.body.scroll_height);
        (scroll_height - self.document_element.client_height).max(0.0)
    }

    /// Scroll position as a fraction of travel on each axis, in `[0, 1]`.
    pub fn scroll_ratio(&self) -> (f64, f64) {
        (
            ratio(self.scroll_x, self.max_scroll_x()),
            ratio(self.scroll_y, self.max_scroll_y()),
        )
    }
}

fn ratio(offset: f64, max: f64) -> f64 {
    if max > 0.0 && offset.is_finite() {
        (offset / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Computed `text-overflow` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextOverflow {
    #[default]
    Clip,
    Ellipsis,
    /// Any other value (custom strings, `fade`, ...).
    Other,
}

impl TextOverflow {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "clip" => TextOverflow::Clip,
            "ellipsis" => TextOverflow::Ellipsis,
            _ => TextOverflow::Other,
        }
    }
}

/// Style and geometry of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementProbe {
    #[serde(default)]
    pub text_overflow: TextOverflow,
    pub scroll_width: f64,
    pub client_width: f64,
    /// Right edge of the bounding box, relative to the viewport.
    pub rect_right: f64,
    pub rect_width: f64,
}

/// Document-level width measurements used for overflow detection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutProbe {
    pub body_scroll_width: f64,
    /// Client width of the root element, i.e. the surface's viewport.
    pub client_width: f64,
}
