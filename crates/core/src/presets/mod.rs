//! Captured style presets: storage, application and undo.

pub mod capture;
pub mod store;
pub mod undo;

use std::rc::Rc;

pub use capture::{capture_style, categorize};
pub use store::{ImportSummary, PresetStore, STORAGE_KEY, export_file_name};
pub use undo::{UndoEntry, UndoStack};

use crate::error::{ReviewError, ReviewResult};
use crate::ports::{KeyValueStore, StyleTarget};

/// Where an element being styled lives.
#[derive(Debug, Clone, Copy)]
pub struct ApplyScope<'a> {
    /// Label of the surface showing the element.
    pub surface: &'a str,
    pub screen_id: &'a str,
}

/// Apply a preset's properties to `target`, recording an undo entry first.
///
/// Failing to persist the usage count is logged and does not fail the call.
pub fn apply_preset<S: KeyValueStore>(
    store: &mut PresetStore<S>,
    undo: &mut UndoStack,
    preset_id: &str,
    target: Rc<dyn StyleTarget>,
    scope: ApplyScope<'_>,
) -> ReviewResult<()> {
    let preset = store
        .get(preset_id)
        .cloned()
        .ok_or_else(|| ReviewError::PresetNotFound(preset_id.to_string()))?;
    let original_style_text = target.style_text()?;

    undo.push(UndoEntry {
        target: Rc::clone(&target),
        surface: scope.surface.to_string(),
        screen_id: scope.screen_id.to_string(),
        original_style_text,
        preset_id: preset.id.clone(),
        preset_name: preset.name.clone(),
    });

    for (property, value) in &preset.style {
        target.set_property(property, value)?;
    }
    // Usage counts are best-effort.
    if let Err(err) = store.record_use(&preset.id) {
        log::warn!("presets: usage count for {:?} not saved: {err}", preset.name);
    }
    log::info!("presets: applied {:?} to {}", preset.name, target.describe());
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use crate::ports::{AccessError, StyleTarget};

    /// An element whose inline style is a list of declarations.
    pub struct FakeElement {
        name: String,
        declarations: RefCell<Vec<(String, String)>>,
        detached: Cell<bool>,
    }

    impl FakeElement {
        pub fn new(name: &str, style: &str) -> Self {
            let element = Self {
                name: name.to_string(),
                declarations: RefCell::new(Vec::new()),
                detached: Cell::new(false),
            };
            element.declarations.replace(parse(style));
            element
        }

        pub fn detach(&self) {
            self.detached.set(true);
        }

        fn check(&self) -> Result<(), AccessError> {
            if self.detached.get() {
                Err(AccessError::Detached)
            } else {
                Ok(())
            }
        }
    }

    fn parse(style: &str) -> Vec<(String, String)> {
        style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect()
    }

    impl StyleTarget for FakeElement {
        fn style_text(&self) -> Result<String, AccessError> {
            self.check()?;
            Ok(self
                .declarations
                .borrow()
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>()
                .join(" "))
        }

        fn set_style_text(&self, css: &str) -> Result<(), AccessError> {
            self.check()?;
            self.declarations.replace(parse(css));
            Ok(())
        }

        fn set_property(&self, property: &str, value: &str) -> Result<(), AccessError> {
            self.check()?;
            let mut declarations = self.declarations.borrow_mut();
            match declarations.iter_mut().find(|(k, _)| k == property) {
                Some(existing) => existing.1 = value.to_string(),
                None => declarations.push((property.to_string(), value.to_string())),
            }
            Ok(())
        }

        fn describe(&self) -> String {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeElement;
    use super::*;
    use crate::ports::MemoryStore;
    use screen_review_protocol::PresetSource;
    use std::collections::BTreeMap;

    const SCOPE: ApplyScope<'static> = ApplyScope {
        surface: "Tablet · 768px",
        screen_id: "home",
    };

    fn store() -> (PresetStore<MemoryStore>, String) {
        let mut store = PresetStore::load(MemoryStore::new());
        let style = BTreeMap::from([
            ("color".to_string(), "red".to_string()),
            ("padding".to_string(), "8px".to_string()),
        ]);
        let id = store
            .create("Alert", None, style, PresetSource::default())
            .unwrap()
            .id
            .clone();
        (store, id)
    }

    #[test]
    fn apply_then_undo_restores_original() {
        let (mut store, id) = store();
        let mut undo = UndoStack::new();
        let element = Rc::new(FakeElement::new("p.note", "color: blue;"));

        apply_preset(&mut store, &mut undo, &id, element.clone(), SCOPE).unwrap();
        assert_eq!(element.style_text().unwrap(), "color: red; padding: 8px;");
        assert_eq!(store.get(&id).unwrap().usage_count, 1);
        assert_eq!(undo.peek().unwrap().surface, "Tablet · 768px");

        undo.undo().unwrap();
        assert_eq!(element.style_text().unwrap(), "color: blue;");
    }

    #[test]
    fn unknown_preset_pushes_nothing() {
        let (mut store, _) = store();
        let mut undo = UndoStack::new();
        let element = Rc::new(FakeElement::new("p", ""));
        assert!(matches!(
            apply_preset(&mut store, &mut undo, "missing", element, SCOPE),
            Err(ReviewError::PresetNotFound(_))
        ));
        assert!(undo.is_empty());
    }

    #[test]
    fn detached_target_is_rejected_before_mutation() {
        let (mut store, id) = store();
        let mut undo = UndoStack::new();
        let element = Rc::new(FakeElement::new("p", ""));
        element.detach();
        assert!(matches!(
            apply_preset(&mut store, &mut undo, &id, element, SCOPE),
            Err(ReviewError::Access(_))
        ));
        assert!(undo.is_empty());
        assert_eq!(store.get(&id).unwrap().usage_count, 0);
    }

    #[test]
    fn unsaved_usage_count_still_applies() {
        let (seed, id) = store();
        let mut storage = MemoryStore::with_entry(STORAGE_KEY, &seed.export_json().unwrap());
        storage.fail_writes = Some("quota exceeded".into());
        let mut store = PresetStore::load(storage);
        let mut undo = UndoStack::new();
        let element = Rc::new(FakeElement::new("p", "color: blue;"));

        apply_preset(&mut store, &mut undo, &id, element.clone(), SCOPE).unwrap();
        assert_eq!(element.style_text().unwrap(), "color: red; padding: 8px;");
        assert_eq!(undo.len(), 1);
        assert_eq!(store.get(&id).unwrap().usage_count, 0);
    }
}
