use serde::{Deserialize, Serialize};

use crate::findings::Findings;
use crate::types::{CompareMode, LayoutMode, SurfaceId, SurfaceRole};

/// A single instruction for the host that owns the preview chrome.
///
/// The engine emits a `Vec<PreviewCommand>` for every state change. Hosts
/// execute them in order; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PreviewCommand {
    /// Remove every mounted surface (and whatever listeners the host bound to them).
    ClearSurfaces,

    /// Arrange subsequent surfaces using this layout.
    SetLayout { mode: LayoutMode },

    /// Create an embedded frame for one breakpoint.
    MountSurface {
        surface: SurfaceId,
        label: String,
        /// Document to load, relative to the host viewer root.
        src: String,
        /// Intrinsic (unscaled) viewport width in CSS pixels.
        width: u32,
        height: u32,
        /// Visual scale applied with a top-left transform origin.
        scale: f64,
        role: SurfaceRole,
        sandbox: String,
    },

    /// Change the visual scale of an already mounted surface.
    SetScale { surface: SurfaceId, scale: f64 },

    /// Show detection results under a surface.
    ShowFindings {
        surface: SurfaceId,
        findings: Findings,
    },

    /// Nothing to preview.
    EmptyState { message: String },
}

/// Which pane of the compare overlay a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaneSide {
    Left,
    Right,
}

/// CSS `mix-blend-mode` for a compare pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    Normal,
    Difference,
}

impl BlendMode {
    pub fn css(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Difference => "difference",
        }
    }
}

/// Instructions for the host that owns the compare overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CompareCommand {
    SetCompareMode { mode: CompareMode },
    MountPane {
        side: PaneSide,
        screen: String,
        src: String,
        opacity: f64,
        blend: BlendMode,
        /// Whether the pane is stacked over the other one.
        stacked: bool,
    },
}
