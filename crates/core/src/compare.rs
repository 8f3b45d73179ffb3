//! Two-screen comparison overlay.

use screen_review_protocol::{BlendMode, CompareCommand, CompareMode, PaneSide};

use crate::error::{ReviewError, ReviewResult};
use crate::host::{HostContext, screen_path, step_screen};

pub const DEFAULT_OPACITY: f64 = 0.5;

/// State of one open compare overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareSession {
    app_id: String,
    screens: Vec<String>,
    left: String,
    right: String,
    mode: CompareMode,
    opacity: f64,
}

impl CompareSession {
    /// Compare the selected screen with the next one in the catalog.
    pub fn open(host: &HostContext) -> ReviewResult<Self> {
        let selection = host.require_selection()?;
        let right = step_screen(&selection.screens, &selection.screen_id, 1)
            .unwrap_or(&selection.screen_id)
            .to_string();
        Ok(Self {
            app_id: selection.app_id,
            screens: selection.screens,
            left: selection.screen_id,
            right,
            mode: CompareMode::default(),
            opacity: DEFAULT_OPACITY,
        })
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_mode(&mut self, mode: CompareMode) {
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> CompareMode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Opacity of the right pane in blend mode, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() {
            DEFAULT_OPACITY
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    pub fn set_left(&mut self, screen: &str) -> ReviewResult<()> {
        self.left = self.known_screen(screen)?;
        Ok(())
    }

    pub fn set_right(&mut self, screen: &str) -> ReviewResult<()> {
        self.right = self.known_screen(screen)?;
        Ok(())
    }

    /// Move the right pane through the catalog, wrapping at both ends.
    pub fn step_right(&mut self, delta: isize) -> &str {
        if let Some(next) = step_screen(&self.screens, &self.right, delta) {
            self.right = next.to_string();
        }
        &self.right
    }

    pub fn commands(&self) -> Vec<CompareCommand> {
        let stacked = self.mode != CompareMode::SideBySide;
        let (right_opacity, right_blend) = match self.mode {
            CompareMode::SideBySide => (1.0, BlendMode::Normal),
            CompareMode::Blend => (self.opacity, BlendMode::Normal),
            CompareMode::Difference => (1.0, BlendMode::Difference),
        };
        vec![
            CompareCommand::SetCompareMode { mode: self.mode },
            CompareCommand::MountPane {
                side: PaneSide::Left,
                screen: self.left.clone(),
                src: screen_path(&self.app_id, &self.left),
                opacity: 1.0,
                blend: BlendMode::Normal,
                stacked: false,
            },
            CompareCommand::MountPane {
                side: PaneSide::Right,
                screen: self.right.clone(),
                src: screen_path(&self.app_id, &self.right),
                opacity: right_opacity,
                blend: right_blend,
                stacked,
            },
        ]
    }

    fn known_screen(&self, screen: &str) -> ReviewResult<String> {
        if self.screens.iter().any(|s| s == screen) {
            Ok(screen.to_string())
        } else {
            Err(ReviewError::UnknownScreen(screen.to_string()))
        }
    }
}
