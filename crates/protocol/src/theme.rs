use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Border,

    TextPrimary,
    TextMuted,

    // Toolbar
    ToolbarBackground,
    ToolbarText,
    ToolbarActive,

    // Surfaces
    SurfaceFrame,
    SurfacePromoted,
    SurfaceThumbnail,
    SurfaceContent,

    // Findings
    IssueOverflow,
    IssueTruncation,
    IssueOffscreen,
    IssueClean,

    EmptyState,
}
