use crate::error::ReviewResult;

/// Key that dismisses the open overlay.
pub const CLOSE_KEY: &str = "Escape";

/// Holds at most one open overlay session.
///
/// The session is created by `open_with` and dropped by `close`; nothing
/// outlives a close.
#[derive(Debug)]
pub struct Overlay<T> {
    active: Option<T>,
}

impl<T> Default for Overlay<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T> Overlay<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open a fresh session, replacing any open one. On error the overlay
    /// keeps its previous state.
    pub fn open_with(&mut self, create: impl FnOnce() -> ReviewResult<T>) -> ReviewResult<&mut T> {
        let session = create()?;
        log::debug!("overlay opened");
        Ok(self.active.insert(session))
    }

    /// Drop the open session, returning whether one was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.active.take().is_some();
        if was_open {
            log::debug!("overlay closed");
        }
        was_open
    }

    /// Close when open, otherwise open. Returns whether the overlay is open afterwards.
    pub fn toggle_with(&mut self, create: impl FnOnce() -> ReviewResult<T>) -> ReviewResult<bool> {
        if self.close() {
            return Ok(false);
        }
        self.open_with(create)?;
        Ok(true)
    }

    /// Global key handler. Returns true when the key closed the overlay.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == CLOSE_KEY && self.close()
    }

    pub fn get(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut()
    }
}
