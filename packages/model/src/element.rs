use crate::breakpoint::Breakpoint;
use crate::kind::ElementKind;
use crate::style::StyleMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Type-specific configuration (`src`, `alt`, `href`, `target`, `tag`, `editable`, ...)
pub type Settings = BTreeMap<String, Value>;

/// A node in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    /// Unique within the page tree; assigned at creation, never reused
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Display text or a structured payload; meaning depends on `kind`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    #[serde(default)]
    pub properties: ElementProperties,

    /// Present (possibly empty) for container kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PageElement>>,
}

/// Property bag carried by every element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Default (desktop) appearance
    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,

    /// Per-breakpoint overrides; an absent or empty breakpoint falls back to `style`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveStyles>,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<StyleMap>,
}

impl ResponsiveStyles {
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&StyleMap> {
        match breakpoint {
            Breakpoint::Desktop => self.desktop.as_ref(),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Mobile => self.mobile.as_ref(),
        }
    }

    /// Store a breakpoint override; an empty map removes it
    pub fn set(&mut self, breakpoint: Breakpoint, style: StyleMap) {
        let slot = match breakpoint {
            Breakpoint::Desktop => &mut self.desktop,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Mobile => &mut self.mobile,
        };
        *slot = if style.is_empty() { None } else { Some(style) };
    }

    pub fn is_empty(&self) -> bool {
        self.desktop.is_none() && self.tablet.is_none() && self.mobile.is_none()
    }
}

impl ElementProperties {
    /// Effective style at a breakpoint: the override if present and non-empty,
    /// otherwise the base `style`.
    pub fn resolve_style(&self, breakpoint: Breakpoint) -> &StyleMap {
        match self.responsive.as_ref().and_then(|r| r.get(breakpoint)) {
            Some(overrides) if !overrides.is_empty() => overrides,
            _ => &self.style,
        }
    }

    /// Class names split on whitespace
    pub fn classes(&self) -> Vec<&str> {
        self.class_name
            .as_deref()
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}

impl PageElement {
    /// Create an empty element; container kinds start with an empty child list.
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        let children = if kind.is_container() { Some(Vec::new()) } else { None };
        Self {
            id: id.into(),
            kind,
            content: None,
            properties: ElementProperties::default(),
            children,
        }
    }

    pub fn with_content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.properties.class_name = Some(class_name.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.style.insert(key.into(), value.into());
        self
    }

    pub fn with_responsive(
        mut self,
        breakpoint: Breakpoint,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let responsive = self.properties.responsive.get_or_insert_with(Default::default);
        let mut style = responsive.get(breakpoint).cloned().unwrap_or_default();
        style.insert(key.into(), value.into());
        responsive.set(breakpoint, style);
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<PageElement>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_child(mut self, child: PageElement) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Children in render order (empty for leaves)
    pub fn children(&self) -> &[PageElement] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Display text: a string `content`, or the `text` field of a structured payload
    pub fn content_text(&self) -> Option<&str> {
        match self.content.as_ref()? {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("text").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(PageElement::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_style_prefers_override() {
        let element = PageElement::new("a", ElementKind::Text)
            .with_style("color", "red")
            .with_responsive(Breakpoint::Mobile, "color", "blue");

        assert_eq!(element.properties.resolve_style(Breakpoint::Mobile)["color"], "blue");
        assert_eq!(element.properties.resolve_style(Breakpoint::Desktop)["color"], "red");
        assert_eq!(element.properties.resolve_style(Breakpoint::Tablet)["color"], "red");
    }

    #[test]
    fn test_empty_override_falls_back() {
        let mut element = PageElement::new("a", ElementKind::Text).with_style("color", "red");
        // Loaded documents can still carry `{}` overrides
        element.properties.responsive = Some(ResponsiveStyles {
            tablet: Some(StyleMap::new()),
            ..ResponsiveStyles::default()
        });

        assert_eq!(element.properties.resolve_style(Breakpoint::Tablet)["color"], "red");
    }

    #[test]
    fn test_setting_empty_override_removes_it() {
        let mut responsive = ResponsiveStyles::default();
        let mut style = StyleMap::new();
        style.insert("color".into(), json!("red"));

        responsive.set(Breakpoint::Mobile, style);
        assert!(!responsive.is_empty());

        responsive.set(Breakpoint::Mobile, StyleMap::new());
        assert_eq!(responsive.mobile, None);
        assert!(responsive.is_empty());
    }

    #[test]
    fn test_container_starts_with_children() {
        assert_eq!(PageElement::new("g", ElementKind::Grid).children, Some(vec![]));
        assert_eq!(PageElement::new("b", ElementKind::Button).children, None);
    }

    #[test]
    fn test_content_text_reads_structured_payload() {
        let element = PageElement::new("h", ElementKind::Heading)
            .with_content(json!({"text": "Title", "level": "h1"}));
        assert_eq!(element.content_text(), Some("Title"));
    }

    #[test]
    fn test_deserialize_original_shape() {
        let json = r##"{
            "id": "abc",
            "type": "button",
            "content": "Click Me",
            "parentId": "ignored",
            "properties": {
                "className": "btn primary",
                "style": {"display": "inline-block"},
                "settings": {"href": "#", "target": "_self", "editable": true}
            }
        }"##;

        let element: PageElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind, ElementKind::Button);
        assert_eq!(element.properties.classes(), vec!["btn", "primary"]);
        assert_eq!(element.properties.setting_str("target"), Some("_self"));
        assert!(element.children.is_none());
    }
}
