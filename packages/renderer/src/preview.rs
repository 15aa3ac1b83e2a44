//! Read-only responsive preview

use crate::html::{self, HtmlOptions};
use crate::render::{RenderMode, Renderer};
use crate::vnode::VNode;
use pagecraft_model::{Breakpoint, PageData};
use serde::Serialize;

/// Frame constraints for simulating a device class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub breakpoint: Breakpoint,
    /// Maximum frame width in pixels; `None` fills the available width
    pub max_width: Option<u32>,
    pub scale: f32,
}

impl Viewport {
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        let (max_width, scale) = match breakpoint {
            Breakpoint::Desktop => (None, 1.0),
            Breakpoint::Tablet => (Some(768), 0.9),
            Breakpoint::Mobile => (Some(375), 0.8),
        };
        Self {
            breakpoint,
            max_width,
            scale,
        }
    }

    /// CSS declarations applied to the preview frame
    pub fn frame_styles(&self) -> Vec<(&'static str, String)> {
        let mut styles = match self.max_width {
            Some(px) => vec![("max-width", format!("{}px", px)), ("width", "100%".to_string())],
            None => vec![("width", "100%".to_string())],
        };
        if self.scale != 1.0 {
            styles.push(("transform", format!("scale({})", self.scale)));
            styles.push(("transform-origin", "top center".to_string()));
        }
        styles.push(("margin", "0 auto".to_string()));
        styles
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::for_breakpoint(Breakpoint::Desktop)
    }
}

/// Renders a page inside a device frame.
///
/// Takes no selection and offers no way to change the page.
#[derive(Debug, Clone, Copy)]
pub struct ResponsivePreview {
    viewport: Viewport,
}

impl ResponsivePreview {
    pub fn new(breakpoint: Breakpoint) -> Self {
        Self {
            viewport: Viewport::for_breakpoint(breakpoint),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn render(&self, page: &PageData) -> VNode {
        let breakpoint = self.viewport.breakpoint;
        let renderer = Renderer::new(breakpoint, RenderMode::Preview);

        let mut frame = VNode::element("div")
            .with_class("pb-preview-frame")
            .with_class(format!("pb-preview-{}", breakpoint))
            .with_attr("data-breakpoint", breakpoint.as_str());
        for (name, value) in self.viewport.frame_styles() {
            frame = frame.with_style(name, value);
        }
        frame.with_children(renderer.render_all(&page.elements))
    }
}

/// Standalone HTML document with the page framed at a breakpoint
pub fn preview_html(page: &PageData, breakpoint: Breakpoint, options: &HtmlOptions) -> String {
    let frame = ResponsivePreview::new(breakpoint).render(page);
    html::document(page, &[frame], options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ELEMENT_CLASS;
    use pagecraft_model::{ElementKind, PageElement};

    #[test]
    fn test_viewport_presets() {
        let tablet = Viewport::for_breakpoint(Breakpoint::Tablet);
        assert_eq!(tablet.max_width, Some(768));
        assert_eq!(tablet.scale, 0.9);

        let mobile = Viewport::for_breakpoint(Breakpoint::Mobile);
        assert_eq!(mobile.max_width, Some(375));
        assert_eq!(mobile.scale, 0.8);

        let desktop = Viewport::default();
        assert_eq!(desktop.max_width, None);
        assert_eq!(desktop.scale, 1.0);
    }

    #[test]
    fn test_frame_carries_viewport() {
        let page = PageData::new(vec![PageElement::new("t", ElementKind::Text).with_content("Hi")]);
        let frame = ResponsivePreview::new(Breakpoint::Mobile).render(&page);

        assert_eq!(frame.style("max-width"), Some("375px"));
        assert_eq!(frame.style("transform"), Some("scale(0.8)"));
        assert_eq!(frame.attr("data-breakpoint"), Some("mobile"));
        assert_eq!(frame.children().len(), 1);
        assert!(!frame.children()[0].has_class(ELEMENT_CLASS));
    }

    #[test]
    fn test_desktop_frame_is_unscaled() {
        let frame = ResponsivePreview::new(Breakpoint::Desktop).render(&PageData::default());
        assert_eq!(frame.style("width"), Some("100%"));
        assert_eq!(frame.style("transform"), None);
    }
}
