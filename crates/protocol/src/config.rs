use serde::{Deserialize, Serialize};

use crate::types::{Breakpoint, LayoutMode};

/// Initial preview settings supplied by the host.
///
/// Every field has a default, so hosts can send `{}` or any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub breakpoints: Vec<Breakpoint>,
    pub layout: LayoutMode,
    pub zoom_to_fit: bool,
    pub sync_enabled: bool,
    pub container_width: f64,
    pub container_height: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoint::defaults(),
            layout: LayoutMode::ParallelRow,
            zoom_to_fit: true,
            sync_enabled: true,
            container_width: 1200.0,
            container_height: 800.0,
        }
    }
}
