use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, ReviewResult};

/// Sandbox flags for embedded screens: scripts run, top-level navigation is blocked.
pub const SURFACE_SANDBOX: &str = "allow-same-origin allow-scripts";

/// The host viewer's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostContext {
    pub app_id: Option<String>,
    /// Screen identifiers of the current app, in catalog order.
    pub screens: Vec<String>,
    pub selected_screen: Option<String>,
}

/// An app plus a screen, both known to be chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub app_id: String,
    pub screens: Vec<String>,
    pub screen_id: String,
}

impl HostContext {
    pub fn new(app_id: impl Into<String>, screens: Vec<String>, selected: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            screens,
            selected_screen: Some(selected.into()),
        }
    }

    /// Resolves the selection, failing when no app or no screen is chosen.
    pub fn require_selection(&self) -> ReviewResult<Selection> {
        let app_id = non_empty(self.app_id.as_deref()).ok_or(ReviewError::MissingSelection)?;
        let screen_id =
            non_empty(self.selected_screen.as_deref()).ok_or(ReviewError::MissingSelection)?;
        Ok(Selection {
            app_id: app_id.to_string(),
            screens: self.screens.clone(),
            screen_id: screen_id.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Document path for a screen: `{app}/screens/{screen}.html`.
pub fn screen_path(app_id: &str, screen_id: &str) -> String {
    format!("{app_id}/screens/{screen_id}.html")
}

/// Screen `delta` steps away from `current` in `screens`, wrapping at both ends.
///
/// A screen missing from the catalog steps from the start.
pub fn step_screen<'a>(screens: &'a [String], current: &str, delta: isize) -> Option<&'a str> {
    if screens.is_empty() {
        return None;
    }
    let len = screens.len() as isize;
    let position = screens.iter().position(|s| s == current).unwrap_or(0) as isize;
    let next = (position + delta).rem_euclid(len) as usize;
    screens.get(next).map(String::as_str)
}
