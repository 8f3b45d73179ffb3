use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a preset's style was captured from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetSource {
    pub tag: String,
    pub classes: Vec<String>,
    pub screen_id: String,
    pub app: String,
}

/// A named, reusable set of CSS property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub category: String,
    /// CSS property name → value.
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub source: PresetSource,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u32,
}

impl Preset {
    /// Inline declaration text, e.g. `color: red; padding: 4px;`.
    pub fn css_text(&self) -> String {
        self.style
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let preset = Preset {
            id: "p1".into(),
            name: "Card".into(),
            category: "color".into(),
            style: BTreeMap::from([
                ("color".to_string(), "red".to_string()),
                ("padding".to_string(), "4px".to_string()),
            ]),
            source: PresetSource {
                tag: "div".into(),
                classes: vec!["card".into()],
                screen_id: "home".into(),
                app: "demo".into(),
            },
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            usage_count: 2,
        };
        let json = serde_json::to_value(&preset).unwrap();
        assert_eq!(json["usageCount"], 2);
        assert_eq!(json["source"]["screenId"], "home");
        assert_eq!(preset.css_text(), "color: red; padding: 4px;");
    }
}
