//! Multi-viewport responsive preview.
//!
//! `ViewportSet` decides which breakpoints are shown and how, `scale`
//! fits each surface into the container, `ScrollSync` keeps surfaces at the
//! same relative scroll position, and `detect` inspects each surface once
//! it has loaded. `PreviewSession` ties them together for one open overlay.

pub mod detect;
pub mod scale;
pub mod scroll_sync;
pub mod session;
pub mod viewports;

pub use detect::detect_issues;
pub use scale::{ScaleInput, compute_scale};
pub use scroll_sync::{ScrollSync, SyncOutcome};
pub use session::{PreviewSession, Surface};
pub use viewports::ViewportSet;
