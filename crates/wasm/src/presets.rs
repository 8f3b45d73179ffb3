use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::Utc;
use screen_review_core::ports::{AccessError, KeyValueStore, StorageError, StyleTarget};
use screen_review_core::presets::capture::PROPERTY_FAMILIES;
use screen_review_core::presets::{
    ApplyScope, PresetStore, UndoStack, apply_preset, capture_style, categorize, export_file_name,
};
use screen_review_protocol::PresetSource;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Storage};

use crate::{js_error, to_json};

fn describe_js(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`, when the page is allowed to use it.
pub(crate) struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub(crate) fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("presets: localStorage unavailable, presets will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe_js(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(describe_js(&e)))
    }
}

/// A DOM element inside a preview surface.
pub(crate) struct DomElement {
    element: HtmlElement,
}

impl DomElement {
    fn check_connected(&self) -> Result<(), AccessError> {
        if self.element.is_connected() {
            Ok(())
        } else {
            Err(AccessError::Detached)
        }
    }

    fn classes(&self) -> Vec<String> {
        self.element
            .class_name()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Computed values of every captured property.
    fn computed_style(&self) -> Result<BTreeMap<String, String>, AccessError> {
        self.check_connected()?;
        let window = self
            .element
            .owner_document()
            .and_then(|doc| doc.default_view())
            .ok_or(AccessError::Detached)?;
        let style = window
            .get_computed_style(&self.element)
            .map_err(|e| AccessError::Denied(describe_js(&e)))?
            .ok_or(AccessError::Detached)?;
        let mut computed = BTreeMap::new();
        for property in PROPERTY_FAMILIES.iter().flat_map(|(_, props)| props.iter()) {
            if let Ok(value) = style.get_property_value(property) {
                computed.insert((*property).to_string(), value);
            }
        }
        Ok(computed)
    }
}

impl StyleTarget for DomElement {
    fn style_text(&self) -> Result<String, AccessError> {
        self.check_connected()?;
        Ok(self.element.style().css_text())
    }

    fn set_style_text(&self, css: &str) -> Result<(), AccessError> {
        self.check_connected()?;
        self.element.style().set_css_text(css);
        Ok(())
    }

    fn set_property(&self, property: &str, value: &str) -> Result<(), AccessError> {
        self.check_connected()?;
        self.element
            .style()
            .set_property(property, value)
            .map_err(|e| AccessError::Denied(describe_js(&e)))
    }

    fn describe(&self) -> String {
        let tag = self.element.tag_name().to_lowercase();
        match self.classes().first() {
            Some(class) => format!("{tag}.{class}"),
            None => tag,
        }
    }
}

/// Preset library plus the undo history of applied presets.
#[wasm_bindgen]
pub struct PresetHandle {
    store: PresetStore<LocalStorage>,
    undo: UndoStack,
}

#[wasm_bindgen]
impl PresetHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PresetHandle {
        Self {
            store: PresetStore::load(LocalStorage::open()),
            undo: UndoStack::new(),
        }
    }

    /// All presets as a JSON array.
    pub fn list(&self) -> Result<String, JsError> {
        to_json(&self.store.list())
    }

    /// Save the captured style of `element` as a new preset. Without a
    /// category, one is derived from the captured properties.
    pub fn capture(
        &mut self,
        name: &str,
        category: Option<String>,
        element: HtmlElement,
        screen_id: &str,
        app: &str,
    ) -> Result<String, JsError> {
        let target = DomElement { element };
        let style = capture_style(&target.computed_style().map_err(js_error)?);
        let category = category.unwrap_or_else(|| categorize(&style).to_string());
        let source = PresetSource {
            tag: target.element.tag_name().to_lowercase(),
            classes: target.classes(),
            screen_id: screen_id.to_string(),
            app: app.to_string(),
        };
        let preset = self
            .store
            .create(name, Some(&category), style, source)
            .map_err(js_error)?;
        to_json(preset)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), JsError> {
        self.store.rename(id, name).map_err(js_error)
    }

    pub fn duplicate(&mut self, id: &str) -> Result<String, JsError> {
        let copy = self.store.duplicate(id).map_err(js_error)?;
        to_json(copy)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), JsError> {
        self.store.delete(id).map(|_| ()).map_err(js_error)
    }

    pub fn apply(
        &mut self,
        id: &str,
        element: HtmlElement,
        surface: &str,
        screen_id: &str,
    ) -> Result<(), JsError> {
        let target: Rc<dyn StyleTarget> = Rc::new(DomElement { element });
        apply_preset(
            &mut self.store,
            &mut self.undo,
            id,
            target,
            ApplyScope { surface, screen_id },
        )
        .map_err(js_error)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Undo the most recent application; returns the preset name.
    pub fn undo(&mut self) -> Result<String, JsError> {
        self.undo
            .undo()
            .map(|entry| entry.preset_name)
            .map_err(js_error)
    }

    pub fn export_json(&self) -> Result<String, JsError> {
        self.store.export_json().map_err(js_error)
    }

    /// Suggested download name, timestamped now.
    pub fn export_file_name(&self) -> String {
        export_file_name(Utc::now())
    }

    /// Returns `{ imported, dropped }` as JSON.
    pub fn import_json(&mut self, payload: &str) -> Result<String, JsError> {
        let summary = self.store.import_json(payload).map_err(js_error)?;
        to_json(&serde_json::json!({
            "imported": summary.imported,
            "dropped": summary.dropped,
        }))
    }
}

impl Default for PresetHandle {
    fn default() -> Self {
        Self::new()
    }
}
