use serde::{Deserialize, Serialize};

/// Name given to the transient user-supplied breakpoint.
pub const CUSTOM_BREAKPOINT_NAME: &str = "Custom";
/// Smallest accepted custom viewport width in CSS pixels.
pub const MIN_CUSTOM_WIDTH: u32 = 200;
/// Largest accepted custom viewport width in CSS pixels.
pub const MAX_CUSTOM_WIDTH: u32 = 3840;

/// A named simulated viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    /// Viewport width in CSS pixels. Always positive.
    pub width: u32,
    /// Display hint for the toolbar (usually an emoji).
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, width: u32, icon: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            width,
            icon: icon.into(),
            enabled,
        }
    }

    /// The transient custom breakpoint. Width validation happens in the
    /// viewport set, not here.
    pub fn custom(width: u32) -> Self {
        Self::new(CUSTOM_BREAKPOINT_NAME, width, "✏️", true)
    }

    /// Built-in breakpoints in declaration order.
    pub fn defaults() -> Vec<Breakpoint> {
        vec![
            Self::new("Mobile", 375, "📱", true),
            Self::new("Tablet", 768, "📲", true),
            Self::new("Laptop", 1280, "💻", true),
            Self::new("Desktop", 1920, "🖥️", false),
        ]
    }

    /// Label shown above a rendering surface.
    pub fn label(&self) -> String {
        format!("{} · {}px", self.name, self.width)
    }
}

/// How the active surfaces are arranged in the preview chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// All surfaces side by side in one row.
    #[default]
    ParallelRow,
    /// Surfaces stacked vertically, each with the full width.
    Stacked,
    /// One promoted surface with the rest as thumbnails.
    Focus,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [LayoutMode::ParallelRow, LayoutMode::Stacked, LayoutMode::Focus];

    pub fn next(self) -> Self {
        match self {
            LayoutMode::ParallelRow => LayoutMode::Stacked,
            LayoutMode::Stacked => LayoutMode::Focus,
            LayoutMode::Focus => LayoutMode::ParallelRow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LayoutMode::ParallelRow => "Side by side",
            LayoutMode::Stacked => "Stacked",
            LayoutMode::Focus => "Focus",
        }
    }
}

/// Role a surface plays within the current layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceRole {
    /// Regular surface in row or stacked layouts.
    Main,
    /// The enlarged surface in focus layout.
    Promoted,
    /// A demoted surface in focus layout.
    Thumbnail,
}

/// Identifies a rendering surface within one rebuild of the active set.
///
/// The generation increments on every rebuild, so an id handed out before a
/// rebuild never matches a live surface afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId {
    pub generation: u64,
    pub index: usize,
}

impl SurfaceId {
    pub fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }
}

/// Comparison presentation for two screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    #[default]
    SideBySide,
    /// Right screen drawn over the left at the session opacity.
    Blend,
    /// Right screen drawn over the left with a difference blend.
    Difference,
}

impl CompareMode {
    pub fn next(self) -> Self {
        match self {
            CompareMode::SideBySide => CompareMode::Blend,
            CompareMode::Blend => CompareMode::Difference,
            CompareMode::Difference => CompareMode::SideBySide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&LayoutMode::ParallelRow).unwrap();
        assert_eq!(json, "\"parallel-row\"");
        let mode: LayoutMode = serde_json::from_str("\"focus\"").unwrap();
        assert_eq!(mode, LayoutMode::Focus);
    }

    #[test]
    fn breakpoint_enabled_defaults_to_true() {
        let bp: Breakpoint = serde_json::from_str(r#"{"name":"Watch","width":200}"#).unwrap();
        assert!(bp.enabled);
        assert_eq!(bp.label(), "Watch · 200px");
    }

    #[test]
    fn modes_cycle_back_to_start() {
        let mut mode = LayoutMode::ParallelRow;
        for _ in 0..LayoutMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, LayoutMode::ParallelRow);
        assert_eq!(CompareMode::Difference.next(), CompareMode::SideBySide);
    }
}
