use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use screen_review_protocol::{Preset, PresetSource};
use serde_json::Value;

use super::capture::DEFAULT_CATEGORY;
use crate::error::{ReviewError, ReviewResult};
use crate::ports::KeyValueStore;

/// Storage key holding the JSON array of presets.
pub const STORAGE_KEY: &str = "screen-review.presets";

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Entries missing `id`, `name` or a non-empty `style`.
    pub dropped: usize,
}

/// Ordered preset collection persisted in a key-value store.
///
/// Every mutation is written through before it becomes visible; a failed
/// write leaves the in-memory list unchanged.
#[derive(Debug)]
pub struct PresetStore<S> {
    storage: S,
    presets: Vec<Preset>,
}

impl<S: KeyValueStore> PresetStore<S> {
    /// Load presets from `storage`. Missing, unreadable or corrupt data
    /// yields an empty store.
    pub fn load(storage: S) -> Self {
        let presets = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("presets: ignoring corrupt storage: {err}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("presets: storage unavailable: {err}");
                Vec::new()
            }
        };
        Self { storage, presets }
    }

    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Save a new preset at the end of the list.
    pub fn create(
        &mut self,
        name: &str,
        category: Option<&str>,
        style: BTreeMap<String, String>,
        source: PresetSource,
    ) -> ReviewResult<&Preset> {
        let name = valid_name(name)?;
        if style.is_empty() {
            return Err(ReviewError::EmptyStyle);
        }
        let preset = Preset {
            id: new_id(),
            name,
            category: category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            style,
            source,
            created_at: Utc::now(),
            usage_count: 0,
        };
        log::info!("presets: saved {:?} ({} properties)", preset.name, preset.style.len());
        let mut next = self.presets.clone();
        next.push(preset);
        self.commit(next)?;
        Ok(&self.presets[self.presets.len() - 1])
    }

    pub fn rename(&mut self, id: &str, name: &str) -> ReviewResult<()> {
        let name = valid_name(name)?;
        let index = self.index_of(id)?;
        let mut next = self.presets.clone();
        next[index].name = name;
        self.commit(next)
    }

    /// Copy a preset right after the original, with a fresh id and usage count.
    pub fn duplicate(&mut self, id: &str) -> ReviewResult<&Preset> {
        let index = self.index_of(id)?;
        let original = &self.presets[index];
        let copy = Preset {
            id: new_id(),
            name: format!("{} (copy)", original.name),
            created_at: Utc::now(),
            usage_count: 0,
            ..original.clone()
        };
        let mut next = self.presets.clone();
        next.insert(index + 1, copy);
        self.commit(next)?;
        Ok(&self.presets[index + 1])
    }

    pub fn delete(&mut self, id: &str) -> ReviewResult<Preset> {
        let index = self.index_of(id)?;
        let mut next = self.presets.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn record_use(&mut self, id: &str) -> ReviewResult<u32> {
        let index = self.index_of(id)?;
        let mut next = self.presets.clone();
        next[index].usage_count = next[index].usage_count.saturating_add(1);
        let count = next[index].usage_count;
        self.commit(next)?;
        Ok(count)
    }

    /// The full list as indented JSON.
    pub fn export_json(&self) -> ReviewResult<String> {
        Ok(serde_json::to_string_pretty(&self.presets)?)
    }

    /// Append presets from an exported JSON array.
    ///
    /// A payload that is not a JSON array is rejected outright. Entries
    /// without a string `id`, a non-empty string `name` and an object `style`
    /// holding at least one string or number value are dropped one by one;
    /// if none survive, the import is rejected.
    /// Survivors get fresh ids so they never collide with existing presets.
    pub fn import_json(&mut self, payload: &str) -> ReviewResult<ImportSummary> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|err| ReviewError::Import(format!("not valid JSON: {err}")))?;
        let entries = value
            .as_array()
            .ok_or_else(|| ReviewError::Import("expected a JSON array of presets".into()))?;

        let now = Utc::now();
        let imported: Vec<Preset> = entries
            .iter()
            .filter_map(|entry| preset_from_entry(entry, now))
            .collect();
        let dropped = entries.len() - imported.len();
        if dropped > 0 {
            log::warn!("presets: dropped {dropped} malformed import entries");
        }
        if imported.is_empty() {
            return Err(ReviewError::NoValidPresets);
        }

        let summary = ImportSummary {
            imported: imported.len(),
            dropped,
        };
        let mut next = self.presets.clone();
        next.extend(imported);
        self.commit(next)?;
        log::info!("presets: imported {}", summary.imported);
        Ok(summary)
    }

    fn index_of(&self, id: &str) -> ReviewResult<usize> {
        self.presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ReviewError::PresetNotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<Preset>) -> ReviewResult<()> {
        let raw = serde_json::to_string(&next)?;
        self.storage.set(STORAGE_KEY, &raw)?;
        self.presets = next;
        Ok(())
    }
}

/// Download name for an export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("presets-{}.json", now.format("%Y%m%d-%H%M%S"))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn valid_name(name: &str) -> ReviewResult<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(ReviewError::InvalidPresetName)
    } else {
        Ok(name.to_string())
    }
}

fn preset_from_entry(entry: &Value, now: DateTime<Utc>) -> Option<Preset> {
    entry.get("id")?.as_str()?;
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let style: BTreeMap<String, String> = entry
        .get("style")?
        .as_object()?
        .iter()
        .filter_map(|(property, value)| match value {
            Value::String(s) => Some((property.clone(), s.clone())),
            Value::Number(n) => Some((property.clone(), n.to_string())),
            _ => None,
        })
        .collect();
    if style.is_empty() {
        return None;
    }

    let category = entry
        .get("category")
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CATEGORY);
    let source = entry
        .get("source")
        .cloned()
        .and_then(|s| serde_json::from_value(s).ok())
        .unwrap_or_default();
    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or(now, |t| t.with_timezone(&Utc));

    Some(Preset {
        id: new_id(),
        name: name.to_string(),
        category: category.to_string(),
        style,
        source,
        created_at,
        usage_count: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryStore;
    use chrono::TimeZone;

    fn style(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store_with_card() -> (PresetStore<MemoryStore>, String) {
        let mut store = PresetStore::load(MemoryStore::new());
        let id = store
            .create(
                "Card",
                Some("color"),
                style(&[("color", "red")]),
                PresetSource::default(),
            )
            .unwrap()
            .id
            .clone();
        (store, id)
    }

    #[test]
    fn create_persists_and_reloads() {
        let (store, id) = store_with_card();
        let reloaded = PresetStore::load(store.storage().clone());
        assert_eq!(reloaded.list().len(), 1);
        assert_eq!(reloaded.get(&id).unwrap().name, "Card");
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let store = PresetStore::load(MemoryStore::with_entry(STORAGE_KEY, "{not json"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn create_validates_input() {
        let mut store = PresetStore::load(MemoryStore::new());
        assert!(matches!(
            store.create("  ", None, style(&[("color", "red")]), PresetSource::default()),
            Err(ReviewError::InvalidPresetName)
        ));
        assert!(matches!(
            store.create("Empty", None, BTreeMap::new(), PresetSource::default()),
            Err(ReviewError::EmptyStyle)
        ));
        let preset = store
            .create("Plain", Some(" "), style(&[("gap", "4px")]), PresetSource::default())
            .unwrap();
        assert_eq!(preset.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn rename_duplicate_delete() {
        let (mut store, id) = store_with_card();
        store.rename(&id, " Hero card ").unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Hero card");

        store.record_use(&id).unwrap();
        let copy_id = store.duplicate(&id).unwrap().id.clone();
        assert_ne!(copy_id, id);
        let copy = store.get(&copy_id).unwrap();
        assert_eq!(copy.name, "Hero card (copy)");
        assert_eq!(copy.usage_count, 0);
        assert_eq!(store.list()[1].id, copy_id);

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.name, "Hero card");
        assert_eq!(store.list().len(), 1);
        assert!(matches!(
            store.delete(&id),
            Err(ReviewError::PresetNotFound(_))
        ));
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let (mut store, id) = store_with_card();
        store.storage.fail_writes = Some("quota exceeded".into());
        assert!(matches!(store.rename(&id, "Other"), Err(ReviewError::Storage(_))));
        assert_eq!(store.get(&id).unwrap().name, "Card");
    }

    #[test]
    fn import_drops_malformed_entries() {
        let (mut store, _) = store_with_card();
        let summary = store
            .import_json(
                r#"[
                    {"id":"x","name":"Card","style":{"color":"red"}},
                    {"name":"bad"},
                    {"id":"y","name":"Hollow","style":{"color":true}},
                    {"id":"z","name":"Empty","style":{}}
                ]"#,
            )
            .unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, dropped: 3 });
        assert_eq!(store.list().len(), 2);
        let imported = &store.list()[1];
        assert_ne!(imported.id, "x");
        assert_eq!(imported.category, DEFAULT_CATEGORY);
        assert_eq!(imported.style, style(&[("color", "red")]));
    }

    #[test]
    fn import_regenerates_colliding_ids() {
        let (mut store, id) = store_with_card();
        let payload = store.export_json().unwrap();
        store.import_json(&payload).unwrap();
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0].id, id);
        assert_ne!(store.list()[1].id, id);
    }

    #[test]
    fn import_rejects_non_arrays_and_all_invalid() {
        let (mut store, _) = store_with_card();
        assert!(matches!(store.import_json("{\"id\":\"x\"}"), Err(ReviewError::Import(_))));
        assert!(matches!(store.import_json("not json"), Err(ReviewError::Import(_))));
        assert!(matches!(
            store.import_json(r#"[{"name":"bad"}, 3]"#),
            Err(ReviewError::NoValidPresets)
        ));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn export_is_indented_and_named_by_time() {
        let (store, _) = store_with_card();
        let json = store.export_json().unwrap();
        assert!(json.starts_with("[\n"));
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(export_file_name(now), "presets-20260304-050607.json");
    }
}
