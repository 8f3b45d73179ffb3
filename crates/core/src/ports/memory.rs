use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use screen_review_protocol::{BoxExtent, ElementProbe, LayoutProbe, ScrollMetrics, TextOverflow};

use super::{AccessError, KeyValueStore, StorageError, SurfaceDocument};

/// `KeyValueStore` backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// When set, every write fails with this message.
    pub fail_writes: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(reason) = &self.fail_writes {
            return Err(StorageError::Write(reason.clone()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One element of a `StaticDocument`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticElement {
    pub probe: ElementProbe,
    /// Reads of this element fail as if it were detached.
    pub detached: bool,
}

impl StaticElement {
    /// A block spanning `[left, left + width]` with no clipped text.
    pub fn block(left: f64, width: f64) -> Self {
        Self {
            probe: ElementProbe {
                text_overflow: TextOverflow::Clip,
                scroll_width: width,
                client_width: width,
                rect_right: left + width,
                rect_width: width,
            },
            detached: false,
        }
    }

    /// A text box of `width` whose content needs `text_width`, clipped with an ellipsis.
    pub fn ellipsis(left: f64, width: f64, text_width: f64) -> Self {
        let mut element = Self::block(left, width);
        element.probe.text_overflow = TextOverflow::Ellipsis;
        element.probe.scroll_width = text_width;
        element
    }

    pub fn detached() -> Self {
        Self {
            probe: ElementProbe::default(),
            detached: true,
        }
    }
}

/// An in-memory rendered document with fixed geometry.
///
/// Scrolling clamps to the available travel the way browsers do.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDocument {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub elements: Vec<StaticElement>,
    /// When false, every access fails as a cross-origin frame would.
    pub accessible: bool,
    /// Number of `scroll_to` calls received.
    pub scroll_calls: usize,
}

impl StaticDocument {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            content_width: viewport_width,
            content_height: viewport_height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            elements: Vec::new(),
            accessible: true,
            scroll_calls: 0,
        }
    }

    pub fn with_content(mut self, width: f64, height: f64) -> Self {
        self.content_width = width;
        self.content_height = height;
        self
    }

    pub fn with_elements(mut self, elements: Vec<StaticElement>) -> Self {
        self.elements = elements;
        self
    }

    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    /// Wrap for sharing between a test (or renderer) and the engine.
    pub fn shared(self) -> Rc<RefCell<StaticDocument>> {
        Rc::new(RefCell::new(self))
    }

    fn check_access(&self) -> Result<(), AccessError> {
        if self.accessible {
            Ok(())
        } else {
            Err(AccessError::Denied("cross-origin frame".into()))
        }
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            document_element: BoxExtent {
                scroll_width: self.content_width.max(self.viewport_width),
                client_width: self.viewport_width,
                scroll_height: self.content_height.max(self.viewport_height),
                client_height: self.viewport_height,
            },
            body: BoxExtent {
                scroll_width: self.content_width,
                client_width: self.viewport_width,
                scroll_height: self.content_height,
                client_height: self.content_height,
            },
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
        }
    }
}

impl SurfaceDocument for StaticDocument {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, AccessError> {
        self.check_access()?;
        Ok(self.metrics())
    }

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), AccessError> {
        self.check_access()?;
        let metrics = self.metrics();
        self.scroll_x = x.clamp(0.0, metrics.max_scroll_x());
        self.scroll_y = y.clamp(0.0, metrics.max_scroll_y());
        self.scroll_calls += 1;
        Ok(())
    }

    fn layout_probe(&self) -> Result<LayoutProbe, AccessError> {
        self.check_access()?;
        Ok(LayoutProbe {
            body_scroll_width: self.content_width,
            client_width: self.viewport_width,
        })
    }

    fn elements(&self) -> Result<Vec<Result<ElementProbe, AccessError>>, AccessError> {
        self.check_access()?;
        Ok(self
            .elements
            .iter()
            .map(|element| {
                if element.detached {
                    Err(AccessError::Detached)
                } else {
                    Ok(element.probe)
                }
            })
            .collect())
    }
}

impl SurfaceDocument for Rc<RefCell<StaticDocument>> {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, AccessError> {
        self.borrow().scroll_metrics()
    }

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), AccessError> {
        self.borrow_mut().scroll_to(x, y)
    }

    fn layout_probe(&self) -> Result<LayoutProbe, AccessError> {
        self.borrow().layout_probe()
    }

    fn elements(&self) -> Result<Vec<Result<ElementProbe, AccessError>>, AccessError> {
        self.borrow().elements()
    }
}
