use thiserror::Error;

use crate::ports::{AccessError, StorageError};

pub type ReviewResult<T> = Result<T, ReviewError>;

/// Errors surfaced to the user as a transient notice.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("custom width must be between {min} and {max}px (got {width})")]
    InvalidCustomWidth { width: u32, min: u32, max: u32 },
    #[error("no breakpoint at index {0}")]
    BreakpointIndex(usize),
    #[error("no surface at index {0} to focus")]
    FocusIndex(usize),
    #[error("select an app and a screen first")]
    MissingSelection,
    #[error("screen {0:?} is not part of the current app")]
    UnknownScreen(String),
    #[error("preset name cannot be empty")]
    InvalidPresetName,
    #[error("no style properties to save")]
    EmptyStyle,
    #[error("preset {0} not found")]
    PresetNotFound(String),
    #[error("invalid import file: {0}")]
    Import(String),
    #[error("import file contains no valid presets")]
    NoValidPresets,
    #[error("nothing to undo")]
    UndoEmpty,
    #[error("could not undo {preset_name:?}: {source}")]
    UndoFailed {
        preset_name: String,
        #[source]
        source: AccessError,
    },
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
