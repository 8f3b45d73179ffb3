use std::fmt;
use std::rc::Rc;

use crate::error::{ReviewError, ReviewResult};
use crate::ports::StyleTarget;

/// Entries kept before the oldest is discarded.
pub const UNDO_LIMIT: usize = 50;

/// Style of one element before a preset was applied to it.
pub struct UndoEntry {
    pub target: Rc<dyn StyleTarget>,
    /// Label of the surface the element lives in.
    pub surface: String,
    pub screen_id: String,
    pub original_style_text: String,
    pub preset_id: String,
    pub preset_name: String,
}

impl fmt::Debug for UndoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoEntry")
            .field("target", &self.target.describe())
            .field("surface", &self.surface)
            .field("screen_id", &self.screen_id)
            .field("preset_name", &self.preset_name)
            .finish_non_exhaustive()
    }
}

/// Global last-in-first-out undo history across presets and elements.
#[derive(Debug)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
    limit: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::with_limit(UNDO_LIMIT)
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry `undo` would restore next.
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.last()
    }

    pub fn push(&mut self, entry: UndoEntry) {
        if self.entries.len() == self.limit {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Restore the most recent entry.
    ///
    /// The entry is consumed even when its element is gone; the remaining
    /// history is unaffected either way.
    pub fn undo(&mut self) -> ReviewResult<UndoEntry> {
        let entry = self.entries.pop().ok_or(ReviewError::UndoEmpty)?;
        match entry.target.set_style_text(&entry.original_style_text) {
            Ok(()) => {
                log::info!(
                    "presets: undid {:?} on {}",
                    entry.preset_name,
                    entry.target.describe()
                );
                Ok(entry)
            }
            Err(source) => {
                log::warn!("presets: undo of {:?} failed: {source}", entry.preset_name);
                Err(ReviewError::UndoFailed {
                    preset_name: entry.preset_name,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::testing::FakeElement;

    fn entry(target: &Rc<FakeElement>, original: &str, preset: &str) -> UndoEntry {
        UndoEntry {
            target: Rc::clone(target) as Rc<dyn StyleTarget>,
            surface: "Mobile · 375px".into(),
            screen_id: "home".into(),
            original_style_text: original.into(),
            preset_id: preset.into(),
            preset_name: preset.into(),
        }
    }

    #[test]
    fn undo_is_last_in_first_out() {
        let a = Rc::new(FakeElement::new("div.a", "color: blue;"));
        let b = Rc::new(FakeElement::new("div.b", ""));
        let mut stack = UndoStack::new();
        stack.push(entry(&a, "color: blue;", "first"));
        a.set_style_text("color: red;").unwrap();
        stack.push(entry(&b, "", "second"));
        b.set_style_text("padding: 4px;").unwrap();

        assert_eq!(stack.undo().unwrap().preset_name, "second");
        assert_eq!(b.style_text().unwrap(), "");
        assert_eq!(stack.undo().unwrap().preset_name, "first");
        assert_eq!(a.style_text().unwrap(), "color: blue;");
        assert!(matches!(stack.undo(), Err(ReviewError::UndoEmpty)));
    }

    #[test]
    fn detached_element_fails_without_corrupting_stack() {
        let a = Rc::new(FakeElement::new("div.a", "color: blue;"));
        let gone = Rc::new(FakeElement::new("div.gone", ""));
        let mut stack = UndoStack::new();
        stack.push(entry(&a, "color: blue;", "kept"));
        stack.push(entry(&gone, "", "lost"));
        gone.detach();

        match stack.undo() {
            Err(ReviewError::UndoFailed { preset_name, .. }) => assert_eq!(preset_name, "lost"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek().unwrap().preset_name, "kept");
        assert!(stack.undo().is_ok());
    }

    #[test]
    fn oldest_entries_fall_off() {
        let a = Rc::new(FakeElement::new("div.a", ""));
        let mut stack = UndoStack::with_limit(2);
        stack.push(entry(&a, "", "one"));
        stack.push(entry(&a, "", "two"));
        stack.push(entry(&a, "", "three"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.undo().unwrap().preset_name, "three");
        assert_eq!(stack.undo().unwrap().preset_name, "two");
    }
}
