use serde_json::Value;
use std::collections::BTreeMap;

/// CSS-like property name → value, keyed in camelCase (`fontSize`, `marginBottom`)
pub type StyleMap = BTreeMap<String, Value>;

/// Properties whose numeric values carry no unit
const UNITLESS: &[&str] = &[
    "opacity",
    "zIndex",
    "fontWeight",
    "lineHeight",
    "flex",
    "flexGrow",
    "flexShrink",
    "order",
];

/// Convert a camelCase style key to its CSS property name.
///
/// Keys that already contain a dash are passed through untouched.
pub fn css_property_name(key: &str) -> String {
    if key.contains('-') {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Render a style value as CSS text.
///
/// Returns `None` for values with no CSS representation (objects, arrays,
/// booleans, null, empty strings).
pub fn css_value(property: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => {
            if UNITLESS.contains(&property) {
                Some(n.to_string())
            } else if n.as_f64() == Some(0.0) {
                Some("0".to_string())
            } else {
                Some(format!("{}px", n))
            }
        }
        _ => None,
    }
}

/// Convert a whole style map into `(css-name, css-value)` pairs, skipping
/// values that cannot be expressed.
pub fn css_declarations(style: &StyleMap) -> Vec<(String, String)> {
    style
        .iter()
        .filter_map(|(key, value)| css_value(key, value).map(|v| (css_property_name(key), v)))
        .collect()
}
