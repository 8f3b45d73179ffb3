//! Seams between the engine and whatever hosts it.
//!
//! The engine only touches rendered documents, storage, elements and the
//! event loop through these traits. `memory` provides in-process
//! implementations used by tests and the terminal previewer.

pub mod memory;

use std::cell::RefCell;
use std::fmt;

use screen_review_protocol::{ElementProbe, LayoutProbe, ScrollMetrics};
use thiserror::Error;

pub use memory::{MemoryStore, StaticDocument, StaticElement};

/// A document or element could not be read or written.
///
/// Typical causes are cross-origin frames and nodes detached mid-navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("document is not accessible: {0}")]
    Denied(String),
    #[error("element is detached")]
    Detached,
    #[error("document is not loaded")]
    NotLoaded,
}

/// Read/write access to one embedded rendering surface.
pub trait SurfaceDocument {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, AccessError>;

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), AccessError>;

    fn layout_probe(&self) -> Result<LayoutProbe, AccessError>;

    /// Every element in the document. Individual reads may fail without
    /// failing the whole enumeration.
    fn elements(&self) -> Result<Vec<Result<ElementProbe, AccessError>>, AccessError>;
}

/// Cooperative single-tick deferral (animation frame, timer, task queue).
pub trait Scheduler {
    fn next_tick(&self, task: Box<dyn FnOnce()>);
}

/// A scheduler that queues tasks until the caller drains them.
#[derive(Default)]
pub struct TickQueue {
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run everything queued before this call. Tasks queued while running
    /// wait for the next tick.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.pending.borrow_mut());
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl Scheduler for TickQueue {
    fn next_tick(&self, task: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push(task);
    }
}

impl fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickQueue").field("pending", &self.len()).finish()
    }
}

/// A host event-listener binding, released when dropped.
///
/// Surfaces own their registration, so discarding a surface always detaches
/// its listeners.
pub struct ListenerRegistration {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerRegistration {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A registration with nothing to release.
    pub fn none() -> Self {
        Self { release: None }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable string key-value storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// An element whose inline style can be captured and rewritten.
///
/// Implementations are handles: cloning the `Rc` that holds one refers to
/// the same element.
pub trait StyleTarget {
    /// Inline `style` attribute text.
    fn style_text(&self) -> Result<String, AccessError>;

    fn set_style_text(&self, css: &str) -> Result<(), AccessError>;

    fn set_property(&self, property: &str, value: &str) -> Result<(), AccessError>;

    /// Short description for notices, e.g. `div.card`.
    fn describe(&self) -> String;
}
