use std::collections::BTreeMap;

/// Captured CSS properties, grouped by the category they imply.
pub const PROPERTY_FAMILIES: &[(&str, &[&str])] = &[
    (
        "typography",
        &[
            "font-family",
            "font-size",
            "font-weight",
            "font-style",
            "line-height",
            "letter-spacing",
            "text-align",
            "text-transform",
            "text-decoration",
        ],
    ),
    ("color", &["color", "background-color", "background-image", "opacity"]),
    (
        "spacing",
        &[
            "padding",
            "padding-top",
            "padding-right",
            "padding-bottom",
            "padding-left",
            "margin",
            "margin-top",
            "margin-right",
            "margin-bottom",
            "margin-left",
            "gap",
        ],
    ),
    (
        "border",
        &[
            "border",
            "border-width",
            "border-style",
            "border-color",
            "border-radius",
        ],
    ),
    ("effects", &["box-shadow", "text-shadow", "filter"]),
    (
        "layout",
        &[
            "display",
            "flex-direction",
            "justify-content",
            "align-items",
            "width",
            "height",
            "max-width",
        ],
    ),
];

/// Category for presets whose style spans no known family.
pub const DEFAULT_CATEGORY: &str = "general";
/// Category for presets whose style spans several families.
pub const MIXED_CATEGORY: &str = "mixed";

/// Values that carry no information worth saving.
const INITIAL_VALUES: &[&str] = &[
    "none",
    "normal",
    "auto",
    "0px",
    "rgba(0, 0, 0, 0)",
    "transparent",
];

fn family_of(property: &str) -> Option<&'static str> {
    PROPERTY_FAMILIES
        .iter()
        .find(|(_, properties)| properties.contains(&property))
        .map(|(family, _)| *family)
}

/// Keep the captured properties of a computed style, minus empty and initial values.
pub fn capture_style(computed: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    computed
        .iter()
        .filter(|(property, _)| family_of(property).is_some())
        .map(|(property, value)| (property.clone(), value.trim().to_string()))
        .filter(|(_, value)| !value.is_empty() && !INITIAL_VALUES.contains(&value.as_str()))
        .collect()
}

/// Category implied by a style's property families.
pub fn categorize(style: &BTreeMap<String, String>) -> &'static str {
    let mut families = style.keys().filter_map(|property| family_of(property));
    let Some(first) = families.next() else {
        return DEFAULT_CATEGORY;
    };
    if families.all(|family| family == first) {
        first
    } else {
        MIXED_CATEGORY
    }
}
