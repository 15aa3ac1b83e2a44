use crate::vnode::VNode;
use pagecraft_model::{css_declarations, Breakpoint, ElementKind, PageElement};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Class carried by every element in editor mode
pub const ELEMENT_CLASS: &str = "pb-element";
/// Class carried by the selected element in editor mode
pub const SELECTED_CLASS: &str = "pb-selected";
/// Class of the hint shown inside empty containers in editor mode
pub const DROP_ZONE_CLASS: &str = "pb-drop-zone";

const TEXT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "div", "a", "blockquote", "label", "small",
    "strong", "em",
];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];
const MEDIA_SCHEMES: &[&str] = &["http", "https"];

/// Errors that stop a single element from rendering.
///
/// Never returned to callers of [`Renderer::render`]: the failing element is
/// replaced by a [`VNode::Placeholder`] and its siblings render normally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Malformed content for {kind} element: expected text, found {found}")]
    MalformedContent { kind: String, found: &'static str },

    #[error("Unsupported tag '{tag}' for {kind} element")]
    UnsupportedTag { kind: String, tag: String },

    #[error("Missing source for {0} element")]
    MissingSource(String),

    #[error("Source URL scheme not allowed for {0} element")]
    UnsafeSource(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode<'a> {
    /// Canvas rendering: nodes carry their element id and selection marker
    Editor { selected: Option<&'a str> },
    /// Read-only rendering with no editor affordances
    Preview,
}

impl RenderMode<'_> {
    pub fn is_editor(&self) -> bool {
        matches!(self, RenderMode::Editor { .. })
    }
}

/// Renders page elements to virtual nodes at one breakpoint.
///
/// Rendering only reads the tree.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    breakpoint: Breakpoint,
    mode: RenderMode<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(breakpoint: Breakpoint, mode: RenderMode<'a>) -> Self {
        Self { breakpoint, mode }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn mode(&self) -> RenderMode<'a> {
        self.mode
    }

    /// Render a sequence of sibling elements in order
    pub fn render_all(&self, elements: &[PageElement]) -> Vec<VNode> {
        elements.iter().map(|element| self.render(element)).collect()
    }

    /// Render one element and its subtree.
    ///
    /// A failure inside the subtree degrades only the failing element.
    pub fn render(&self, element: &PageElement) -> VNode {
        match self.try_render(element) {
            Ok(node) => node,
            Err(err) => {
                warn!(
                    element_id = %element.id,
                    kind = %element.kind,
                    error = %err,
                    "Element rendered as placeholder"
                );
                VNode::placeholder(
                    &element.id,
                    format!("Could not render {} element", element.kind),
                    err.to_string(),
                )
            }
        }
    }

    fn try_render(&self, element: &PageElement) -> Result<VNode, RenderError> {
        let node = match &element.kind {
            ElementKind::Text => {
                let tag = tag_setting(element, "p", TEXT_TAGS)?;
                let mut node = VNode::element(tag);
                if tag == "a" {
                    node = node.with_attr("href", link_href(element));
                }
                self.with_text(node, element)?
            }
            ElementKind::Heading => {
                let tag = tag_setting(element, "h2", HEADING_TAGS)?;
                self.with_text(VNode::element(tag), element)?
            }
            ElementKind::Button => {
                let link = VNode::element("a")
                    .with_attr("href", link_href(element))
                    .with_attr(
                        "target",
                        element.properties.setting_str("target").unwrap_or("_self"),
                    );
                self.with_text(link, element)?
            }
            ElementKind::Image => {
                let src = source(element)?;
                VNode::element("img")
                    .with_attr("src", src)
                    .with_attr("alt", element.properties.setting_str("alt").unwrap_or("Image"))
            }
            ElementKind::Video => {
                let src = source(element)?;
                VNode::element("video")
                    .with_attr("src", src)
                    .with_attr("controls", "controls")
            }
            ElementKind::Map => {
                let src = source(element)?;
                VNode::element("iframe")
                    .with_attr("src", src)
                    .with_attr("title", element.properties.setting_str("title").unwrap_or("Map"))
                    .with_attr("loading", "lazy")
            }
            ElementKind::Section => self.container(VNode::element("section"), element),
            ElementKind::Navigation => self.container(VNode::element("nav"), element),
            ElementKind::Form => {
                let mut form = VNode::element("form").with_attr(
                    "method",
                    element.properties.setting_str("method").unwrap_or("POST"),
                );
                if let Some(action) = element.properties.setting_str("action") {
                    match allowed_url(action, LINK_SCHEMES) {
                        Some(action) => form = form.with_attr("action", action),
                        None => warn!(element_id = %element.id, "Dropped form action with disallowed scheme"),
                    }
                }
                self.container(form, element)
            }
            ElementKind::Container
            | ElementKind::Grid
            | ElementKind::Columns
            | ElementKind::Hero
            | ElementKind::Card => self.container(VNode::element("div"), element),
            ElementKind::Unknown(tag) => {
                debug!(element_id = %element.id, tag = %tag, "Unknown element type");
                return Ok(VNode::placeholder(
                    &element.id,
                    format!("Unknown element type: {}", tag),
                    "This element type is not supported by this editor",
                ));
            }
        };

        Ok(self.decorate(node, element))
    }

    fn with_text(&self, node: VNode, element: &PageElement) -> Result<VNode, RenderError> {
        let node = match text_content(element)? {
            Some(text) => node.with_child(VNode::text(text)),
            None => node,
        };
        if self.mode.is_editor() && editable(element) {
            Ok(node.with_attr("data-editable", "true"))
        } else {
            Ok(node)
        }
    }

    fn container(&self, node: VNode, element: &PageElement) -> VNode {
        let children = element.children();
        if children.is_empty() && self.mode.is_editor() {
            return node.with_child(
                VNode::element("div")
                    .with_class(DROP_ZONE_CLASS)
                    .with_child(VNode::text("Drop components here")),
            );
        }
        node.with_children(self.render_all(children))
    }

    /// Apply the element's classes and breakpoint style, plus editor markers
    fn decorate(&self, mut node: VNode, element: &PageElement) -> VNode {
        for class in element.properties.classes() {
            node = node.with_class(class);
        }
        for (name, value) in css_declarations(element.properties.resolve_style(self.breakpoint)) {
            node = node.with_style(name, value);
        }

        if let RenderMode::Editor { selected } = self.mode {
            node = node
                .with_element_id(&element.id)
                .with_attr("data-element-type", element.kind.as_str())
                .with_class(ELEMENT_CLASS);
            if selected == Some(element.id.as_str()) {
                node = node.with_class(SELECTED_CLASS);
            }
        }
        node
    }
}

fn editable(element: &PageElement) -> bool {
    element
        .properties
        .settings
        .get("editable")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn tag_setting<'e>(
    element: &'e PageElement,
    default: &'static str,
    allowed: &[&str],
) -> Result<&'e str, RenderError> {
    match element.properties.settings.get("tag") {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(tag)) if allowed.contains(&tag.as_str()) => Ok(tag.as_str()),
        Some(other) => Err(RenderError::UnsupportedTag {
            kind: element.kind.to_string(),
            tag: match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            },
        }),
    }
}

fn source(element: &PageElement) -> Result<&str, RenderError> {
    let src = element
        .properties
        .setting_str("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .ok_or_else(|| RenderError::MissingSource(element.kind.to_string()))?;
    allowed_url(src, MEDIA_SCHEMES).ok_or_else(|| RenderError::UnsafeSource(element.kind.to_string()))
}

/// `href` setting, or `#` when unset or its scheme is not allowed
fn link_href(element: &PageElement) -> &str {
    let Some(href) = element.properties.setting_str("href") else {
        return "#";
    };
    allowed_url(href, LINK_SCHEMES).unwrap_or_else(|| {
        warn!(element_id = %element.id, "Replaced link with disallowed scheme");
        "#"
    })
}

/// Relative references pass; absolute URLs need one of `schemes`
fn allowed_url<'u>(url: &'u str, schemes: &[&str]) -> Option<&'u str> {
    let url = url.trim();
    // Browsers drop tabs, newlines and control characters before reading the scheme
    let compact: String = url
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();

    match url_scheme(&compact) {
        None => Some(url),
        Some(scheme) if schemes.iter().any(|s| scheme.eq_ignore_ascii_case(s)) => Some(url),
        Some(_) => None,
    }
}

fn url_scheme(url: &str) -> Option<&str> {
    let end = url.find(|c| matches!(c, ':' | '/' | '?' | '#'))?;
    url[end..].starts_with(':').then(|| &url[..end])
}

fn text_content(element: &PageElement) -> Result<Option<String>, RenderError> {
    let malformed = |found| RenderError::MalformedContent {
        kind: element.kind.to_string(),
        found,
    };

    match &element.content {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Object(map)) => match map.get("text") {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            _ => Err(malformed("an object without text")),
        },
        Some(Value::Array(_)) => Err(malformed("an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn preview() -> Renderer<'static> {
        Renderer::new(Breakpoint::Desktop, RenderMode::Preview)
    }

    #[test]
    fn test_text_defaults_to_paragraph() {
        let node = preview().render(&PageElement::new("t", ElementKind::Text).with_content("Hi"));
        assert_eq!(node.tag(), Some("p"));
        assert_eq!(node.text_content(), "Hi");
    }

    #[test]
    fn test_text_tag_setting() {
        let element = PageElement::new("t", ElementKind::Text)
            .with_content("Title")
            .with_setting("tag", "h1");
        assert_eq!(preview().render(&element).tag(), Some("h1"));

        let element = PageElement::new("t", ElementKind::Text).with_setting("tag", "script");
        let node = preview().render(&element);
        assert!(node.is_placeholder());
    }

    #[test]
    fn test_link_text_carries_href() {
        let element = PageElement::new("n", ElementKind::Text)
            .with_content("About")
            .with_setting("tag", "a")
            .with_setting("href", "/about");
        let node = preview().render(&element);
        assert_eq!(node.tag(), Some("a"));
        assert_eq!(node.attr("href"), Some("/about"));
    }

    #[test]
    fn test_structured_content() {
        let element =
            PageElement::new("h", ElementKind::Heading).with_content(json!({"text": "Welcome"}));
        let node = preview().render(&element);
        assert_eq!(node.tag(), Some("h2"));
        assert_eq!(node.text_content(), "Welcome");

        let bad = PageElement::new("h", ElementKind::Heading).with_content(json!({"level": 2}));
        assert!(preview().render(&bad).is_placeholder());
    }

    #[test]
    fn test_button_link_defaults() {
        let node = preview().render(&PageElement::new("b", ElementKind::Button).with_content("Go"));
        assert_eq!(node.tag(), Some("a"));
        assert_eq!(node.attr("href"), Some("#"));
        assert_eq!(node.attr("target"), Some("_self"));
    }

    #[test]
    fn test_image_requires_source() {
        let image = PageElement::new("i", ElementKind::Image).with_setting("src", "/a.png");
        let node = preview().render(&image);
        assert_eq!(node.attr("src"), Some("/a.png"));
        assert_eq!(node.attr("alt"), Some("Image"));

        let missing = preview().render(&PageElement::new("i", ElementKind::Image));
        match missing {
            VNode::Placeholder { element_id, reason, .. } => {
                assert_eq!(element_id, "i");
                assert_eq!(reason, "Missing source for image element");
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_script_links_fall_back_to_hash() {
        let button = PageElement::new("b", ElementKind::Button)
            .with_content("Go")
            .with_setting("href", "javascript:alert(document.cookie)");
        assert_eq!(preview().render(&button).attr("href"), Some("#"));

        let link = PageElement::new("n", ElementKind::Text)
            .with_setting("tag", "a")
            .with_setting("href", " Java\tScript:alert(1)");
        assert_eq!(preview().render(&link).attr("href"), Some("#"));

        for href in ["https://example.com", "mailto:hi@example.com", "tel:+123", "/about", "#top", "pricing"] {
            let button = PageElement::new("b", ElementKind::Button).with_setting("href", href);
            assert_eq!(preview().render(&button).attr("href"), Some(href));
        }
    }

    #[test]
    fn test_media_with_disallowed_scheme_is_a_placeholder() {
        for src in ["javascript:alert(1)", "data:text/html,<script>x</script>"] {
            let video = PageElement::new("v", ElementKind::Video).with_setting("src", src);
            match preview().render(&video) {
                VNode::Placeholder { reason, .. } => {
                    assert_eq!(reason, "Source URL scheme not allowed for video element");
                }
                other => panic!("expected placeholder, got {:?}", other),
            }
        }

        let map = PageElement::new("m", ElementKind::Map).with_setting("src", "https://maps.example.com/embed");
        assert_eq!(preview().render(&map).attr("src"), Some("https://maps.example.com/embed"));
    }

    #[test]
    fn test_form_action_with_disallowed_scheme_is_dropped() {
        let form = PageElement::new("f", ElementKind::Form).with_setting("action", "javascript:steal()");
        let node = preview().render(&form);
        assert_eq!(node.tag(), Some("form"));
        assert_eq!(node.attr("action"), None);
    }

    #[test]
    fn test_form_method_and_action() {
        let form = PageElement::new("f", ElementKind::Form).with_setting("action", "/api/contact");
        let node = preview().render(&form);
        assert_eq!(node.attr("method"), Some("POST"));
        assert_eq!(node.attr("action"), Some("/api/contact"));
    }

    #[test]
    fn test_styles_follow_breakpoint() {
        let element = PageElement::new("t", ElementKind::Text)
            .with_style("fontSize", 16)
            .with_responsive(Breakpoint::Mobile, "fontSize", 12);

        let desktop = preview().render(&element);
        let mobile = Renderer::new(Breakpoint::Mobile, RenderMode::Preview).render(&element);
        assert_eq!(desktop.style("font-size"), Some("16px"));
        assert_eq!(mobile.style("font-size"), Some("12px"));
    }

    #[test]
    fn test_editor_markers() {
        let element = PageElement::new("s", ElementKind::Section)
            .with_class("py-16 px-4")
            .with_child(PageElement::new("t", ElementKind::Text).with_content("A"));
        let renderer = Renderer::new(Breakpoint::Desktop, RenderMode::Editor { selected: Some("t") });
        let node = renderer.render(&element);

        assert!(node.has_class("py-16"));
        assert!(node.has_class(ELEMENT_CLASS));
        assert!(!node.has_class(SELECTED_CLASS));
        let child = node.find_element("t").unwrap();
        assert!(child.has_class(SELECTED_CLASS));

        // Preview carries none of it
        let plain = preview().render(&element);
        assert!(!plain.has_class(ELEMENT_CLASS));
        assert!(plain.find_element("t").is_none());
    }

    #[test]
    fn test_empty_container_drop_zone_in_editor_only() {
        let element = PageElement::new("c", ElementKind::Container);
        let editor = Renderer::new(Breakpoint::Desktop, RenderMode::Editor { selected: None });

        assert!(editor.render(&element).children()[0].has_class(DROP_ZONE_CLASS));
        assert!(preview().render(&element).children().is_empty());
    }
}
