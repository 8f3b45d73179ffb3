//! Design-review engine: responsive multi-viewport preview, screen
//! comparison, and reusable style presets.
//!
//! Everything here is host-agnostic. Hosts execute the commands the
//! sessions return and feed events back through the `ports` traits.

pub mod compare;
pub mod error;
pub mod host;
pub mod overlay;
pub mod ports;
pub mod presets;
pub mod preview;

pub use compare::CompareSession;
pub use error::{ReviewError, ReviewResult};
pub use host::{HostContext, screen_path};
pub use overlay::Overlay;
pub use preview::PreviewSession;
