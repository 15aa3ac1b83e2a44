//! # Properties Panel
//!
//! Form model for the selected element. Every form is a pure function of
//! `(element, breakpoint)`; edits leave the panel only through
//! [`PropertiesPanel::update_property`] and
//! [`PropertiesPanel::update_responsive_property`], which hand a fresh
//! [`ElementPatch`] to the caller instead of touching the tree.

use crate::mutations::{ContentUpdate, ElementPatch};
use pagecraft_model::{tree, Breakpoint, ElementKind, PageElement, StyleMap};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Preset swatches offered by every color field
pub const COLOR_PRESETS: [&str; 20] = [
    "#000000", "#ffffff", "#374151", "#6b7280", "#9ca3af", "#ef4444", "#f97316", "#f59e0b",
    "#eab308", "#84cc16", "#22c55e", "#10b981", "#06b6d4", "#0ea5e9", "#3b82f6", "#6366f1",
    "#8b5cf6", "#a855f7", "#d946ef", "#ec4899",
];

const FONT_SIZES: &[(&str, &str)] = &[
    ("text-xs", "Extra Small"),
    ("text-sm", "Small"),
    ("text-base", "Base"),
    ("text-lg", "Large"),
    ("text-xl", "Extra Large"),
    ("text-2xl", "2X Large"),
    ("text-3xl", "3X Large"),
    ("text-4xl", "4X Large"),
];

const FONT_WEIGHTS: &[(&str, &str)] = &[
    ("font-light", "Light"),
    ("font-normal", "Normal"),
    ("font-medium", "Medium"),
    ("font-semibold", "Semibold"),
    ("font-bold", "Bold"),
];

const TEXT_ALIGN: &[(&str, &str)] = &[
    ("text-left", "Left"),
    ("text-center", "Center"),
    ("text-right", "Right"),
    ("text-justify", "Justify"),
];

const DISPLAY: &[(&str, &str)] = &[
    ("block", "Block"),
    ("inline-block", "Inline Block"),
    ("flex", "Flex"),
    ("grid", "Grid"),
    ("hidden", "Hidden"),
];

const POSITION: &[(&str, &str)] = &[
    ("static", "Static"),
    ("relative", "Relative"),
    ("absolute", "Absolute"),
    ("fixed", "Fixed"),
    ("sticky", "Sticky"),
];

const LINK_TARGETS: &[(&str, &str)] = &[("_self", "Same window"), ("_blank", "New window")];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("No element is selected")]
    NoSelection,

    #[error("Invalid property path '{0}' (expected style.<key>, settings.<key>, content or className)")]
    InvalidPath(String),
}

/// Address of an editable value on an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum PropertyPath {
    Style(String),
    Setting(String),
    Content,
    ClassName,
}

impl FromStr for PropertyPath {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PanelError::InvalidPath(s.to_string());
        match s {
            "content" => Ok(PropertyPath::Content),
            "className" => Ok(PropertyPath::ClassName),
            _ => match s.split_once('.') {
                Some(("style", key)) if !key.is_empty() => Ok(PropertyPath::Style(key.to_string())),
                Some(("settings", key)) if !key.is_empty() => {
                    Ok(PropertyPath::Setting(key.to_string()))
                }
                _ => Err(invalid()),
            },
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Style(key) => write!(f, "style.{}", key),
            PropertyPath::Setting(key) => write!(f, "settings.{}", key),
            PropertyPath::Content => f.write_str("content"),
            PropertyPath::ClassName => f.write_str("className"),
        }
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTab {
    Style,
    Layout,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum Control {
    Select { options: Vec<SelectOption> },
    Color { presets: &'static [&'static str] },
    Text { placeholder: &'static str },
    TextArea { placeholder: &'static str },
}

/// Which update entry point a field commits through
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "camelCase")]
pub enum FieldTarget {
    /// Written to `responsive[<current breakpoint>]`
    Responsive(String),
    /// Written through a [`PropertyPath`]
    Property(PropertyPath),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub label: &'static str,
    pub target: FieldTarget,
    pub control: Control,
    /// Current value, read at the panel's breakpoint
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSection {
    pub tab: PanelTab,
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView<'a> {
    /// Nothing selected, or the selected id no longer resolves
    Empty,
    Editing {
        element: &'a PageElement,
        breakpoint: Breakpoint,
        sections: Vec<FormSection>,
    },
}

impl PanelView<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, PanelView::Empty)
    }
}

/// Properties panel bound to one tree, selection and breakpoint
#[derive(Debug, Clone, Copy)]
pub struct PropertiesPanel<'a> {
    elements: &'a [PageElement],
    selected: Option<&'a str>,
    breakpoint: Breakpoint,
}

impl<'a> PropertiesPanel<'a> {
    pub fn new(elements: &'a [PageElement], selected: Option<&'a str>, breakpoint: Breakpoint) -> Self {
        Self {
            elements,
            selected,
            breakpoint,
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// The selected element, if the selection still resolves
    pub fn element(&self) -> Option<&'a PageElement> {
        let id = self.selected?;
        let element = tree::find_by_id(self.elements, id);
        if element.is_none() {
            debug!(element_id = id, "stale selection, showing empty panel");
        }
        element
    }

    pub fn view(&self) -> PanelView<'a> {
        match self.element() {
            Some(element) => PanelView::Editing {
                element,
                breakpoint: self.breakpoint,
                sections: form_sections(element, self.breakpoint),
            },
            None => PanelView::Empty,
        }
    }

    /// Commit a value at `path` (`style.<key>`, `settings.<key>`, `content`, `className`).
    ///
    /// Builds a fresh property bag (or content value) and passes it to
    /// `on_update` together with the element id.
    pub fn update_property<F>(&self, path: &str, value: Value, on_update: F) -> Result<(), PanelError>
    where
        F: FnOnce(&str, ElementPatch),
    {
        let element = self.element().ok_or(PanelError::NoSelection)?;
        let path: PropertyPath = path.parse()?;

        let mut properties = element.properties.clone();
        let patch = match path {
            PropertyPath::Content => ElementPatch {
                content: Some(match value {
                    Value::Null => ContentUpdate::Clear,
                    value => ContentUpdate::Set(value),
                }),
                properties: None,
            },
            PropertyPath::Style(key) => {
                set_or_remove(&mut properties.style, key, value);
                ElementPatch::properties(properties)
            }
            PropertyPath::Setting(key) => {
                set_or_remove(&mut properties.settings, key, value);
                ElementPatch::properties(properties)
            }
            PropertyPath::ClassName => {
                properties.class_name = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                };
                ElementPatch::properties(properties)
            }
        };

        on_update(&element.id, patch);
        Ok(())
    }

    /// Merge `key = value` into the current breakpoint's effective style and
    /// store the result as that breakpoint's override. The base `style` and
    /// other breakpoints are left alone.
    pub fn update_responsive_property<F>(&self, key: &str, value: Value, on_update: F) -> Result<(), PanelError>
    where
        F: FnOnce(&str, ElementPatch),
    {
        let element = self.element().ok_or(PanelError::NoSelection)?;

        let mut style = element.properties.resolve_style(self.breakpoint).clone();
        set_or_remove(&mut style, key.to_string(), value);

        let mut properties = element.properties.clone();
        let responsive = properties.responsive.get_or_insert_with(Default::default);
        responsive.set(self.breakpoint, style);
        if responsive.is_empty() {
            properties.responsive = None;
        }

        on_update(&element.id, ElementPatch::properties(properties));
        Ok(())
    }
}

/// `null` clears the key
fn set_or_remove(map: &mut StyleMap, key: String, value: Value) {
    if value.is_null() {
        map.remove(&key);
    } else {
        map.insert(key, value);
    }
}

fn options(pairs: &[(&'static str, &'static str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|&(value, label)| SelectOption { value, label })
        .collect()
}

fn style_field(label: &'static str, key: &str, control: Control, style: &StyleMap) -> FormField {
    FormField {
        label,
        target: FieldTarget::Responsive(key.to_string()),
        control,
        value: style.get(key).cloned(),
    }
}

fn property_field(label: &'static str, path: PropertyPath, control: Control, value: Option<Value>) -> FormField {
    FormField {
        label,
        target: FieldTarget::Property(path),
        control,
        value,
    }
}

fn color() -> Control {
    Control::Color {
        presets: &COLOR_PRESETS,
    }
}

fn text(placeholder: &'static str) -> Control {
    Control::Text { placeholder }
}

/// All form sections for `element` as seen at `breakpoint`
pub fn form_sections(element: &PageElement, breakpoint: Breakpoint) -> Vec<FormSection> {
    let style = element.properties.resolve_style(breakpoint);
    let setting = |key: &str| element.properties.settings.get(key).cloned();

    let mut sections = vec![
        FormSection {
            tab: PanelTab::Style,
            title: "Typography",
            fields: vec![
                style_field("Font Size", "fontSize", Control::Select { options: options(FONT_SIZES) }, style),
                style_field("Font Weight", "fontWeight", Control::Select { options: options(FONT_WEIGHTS) }, style),
                style_field("Text Align", "textAlign", Control::Select { options: options(TEXT_ALIGN) }, style),
            ],
        },
        FormSection {
            tab: PanelTab::Style,
            title: "Colors",
            fields: vec![
                style_field("Text Color", "color", color(), style),
                style_field("Background", "backgroundColor", color(), style),
                style_field("Border Color", "borderColor", color(), style),
            ],
        },
        FormSection {
            tab: PanelTab::Style,
            title: "Spacing",
            fields: vec![
                style_field("Margin", "margin", text("16px or 1rem"), style),
                style_field("Padding", "padding", text("16px or 1rem"), style),
            ],
        },
        FormSection {
            tab: PanelTab::Layout,
            title: "Layout",
            fields: vec![
                style_field("Display", "display", Control::Select { options: options(DISPLAY) }, style),
                style_field("Position", "position", Control::Select { options: options(POSITION) }, style),
                style_field("Width", "width", text("auto"), style),
                style_field("Height", "height", text("auto"), style),
            ],
        },
    ];

    if element.kind.has_text_content() {
        sections.push(FormSection {
            tab: PanelTab::Settings,
            title: "Content",
            fields: vec![property_field(
                "Text Content",
                PropertyPath::Content,
                Control::TextArea {
                    placeholder: "Enter content...",
                },
                element.content.clone(),
            )],
        });
    }

    match element.kind {
        ElementKind::Image => sections.push(FormSection {
            tab: PanelTab::Settings,
            title: "Image",
            fields: vec![
                property_field(
                    "Image URL",
                    PropertyPath::Setting("src".into()),
                    text("https://example.com/image.jpg"),
                    setting("src"),
                ),
                property_field(
                    "Alt Text",
                    PropertyPath::Setting("alt".into()),
                    text("Describe the image..."),
                    setting("alt"),
                ),
            ],
        }),
        ElementKind::Button => sections.push(FormSection {
            tab: PanelTab::Settings,
            title: "Link",
            fields: vec![
                property_field(
                    "Link URL",
                    PropertyPath::Setting("href".into()),
                    text("https://example.com"),
                    setting("href"),
                ),
                property_field(
                    "Link Target",
                    PropertyPath::Setting("target".into()),
                    Control::Select {
                        options: options(LINK_TARGETS),
                    },
                    setting("target"),
                ),
            ],
        }),
        _ => {}
    }

    sections.push(FormSection {
        tab: PanelTab::Settings,
        title: "Advanced",
        fields: vec![property_field(
            "CSS Classes",
            PropertyPath::ClassName,
            text("custom-class another-class"),
            element.properties.class_name.clone().map(Value::String),
        )],
    });

    sections
}
