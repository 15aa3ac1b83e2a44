use serde::{Deserialize, Serialize};
use std::fmt;

/// The type tag of a page element.
///
/// Serialized as the plain tag string (`"text"`, `"grid"`, ...). Tags this
/// build does not know are kept as [`ElementKind::Unknown`] so that loading and
/// saving a page never drops elements written by a newer editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Text,
    Heading,
    Image,
    Button,
    Container,
    Section,
    Grid,
    Columns,
    Hero,
    Card,
    Navigation,
    Form,
    Video,
    Map,
    Unknown(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Heading => "heading",
            ElementKind::Image => "image",
            ElementKind::Button => "button",
            ElementKind::Container => "container",
            ElementKind::Section => "section",
            ElementKind::Grid => "grid",
            ElementKind::Columns => "columns",
            ElementKind::Hero => "hero",
            ElementKind::Card => "card",
            ElementKind::Navigation => "navigation",
            ElementKind::Form => "form",
            ElementKind::Video => "video",
            ElementKind::Map => "map",
            ElementKind::Unknown(tag) => tag,
        }
    }

    /// Container kinds own a `children` list; leaves never gain children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ElementKind::Container
                | ElementKind::Section
                | ElementKind::Grid
                | ElementKind::Columns
                | ElementKind::Hero
                | ElementKind::Card
                | ElementKind::Navigation
                | ElementKind::Form
        )
    }

    /// Kinds whose `content` is display text.
    pub fn has_text_content(&self) -> bool {
        matches!(
            self,
            ElementKind::Text | ElementKind::Heading | ElementKind::Button
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ElementKind::Unknown(_))
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => ElementKind::Text,
            "heading" => ElementKind::Heading,
            "image" => ElementKind::Image,
            "button" => ElementKind::Button,
            "container" => ElementKind::Container,
            "section" => ElementKind::Section,
            "grid" => ElementKind::Grid,
            "columns" => ElementKind::Columns,
            "hero" => ElementKind::Hero,
            "card" => ElementKind::Card,
            "navigation" => ElementKind::Navigation,
            "form" => ElementKind::Form,
            "video" => ElementKind::Video,
            "map" => ElementKind::Map,
            _ => ElementKind::Unknown(tag),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        ElementKind::from(tag.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Unknown(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
