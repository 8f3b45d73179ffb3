pub mod commands;
pub mod config;
pub mod findings;
pub mod preset;
pub mod probe;
pub mod theme;
pub mod types;

pub use commands::{BlendMode, CompareCommand, PaneSide, PreviewCommand};
pub use config::PreviewConfig;
pub use findings::{Findings, Issue, IssueKind};
pub use preset::{Preset, PresetSource};
pub use probe::{BoxExtent, ElementProbe, LayoutProbe, ScrollMetrics, TextOverflow};
pub use theme::ThemeToken;
pub use types::{
    Breakpoint, CompareMode, LayoutMode, SurfaceId, SurfaceRole, CUSTOM_BREAKPOINT_NAME,
    MAX_CUSTOM_WIDTH, MIN_CUSTOM_WIDTH,
};
