use crate::render::{RenderMode, Renderer};
use crate::vnode::VNode;
use pagecraft_model::{Breakpoint, PageData};

/// Editor-mode view of a whole page.
///
/// The selection is borrowed from whoever owns it; the canvas never changes
/// the page or the selection.
#[derive(Debug, Clone, Copy)]
pub struct Canvas<'a> {
    page: &'a PageData,
    breakpoint: Breakpoint,
    selected: Option<&'a str>,
}

impl<'a> Canvas<'a> {
    pub fn new(page: &'a PageData, breakpoint: Breakpoint, selected: Option<&'a str>) -> Self {
        Self {
            page,
            breakpoint,
            selected,
        }
    }

    pub fn renderer(&self) -> Renderer<'a> {
        Renderer::new(
            self.breakpoint,
            RenderMode::Editor {
                selected: self.selected,
            },
        )
    }

    /// Root nodes in page order
    pub fn render(&self) -> Vec<VNode> {
        self.renderer().render_all(&self.page.elements)
    }

    /// Root nodes wrapped in the canvas surface element
    pub fn render_surface(&self) -> VNode {
        let surface = VNode::element("div")
            .with_class("pb-canvas")
            .with_attr("data-breakpoint", self.breakpoint.as_str());

        if self.page.elements.is_empty() {
            return surface.with_child(
                VNode::element("div")
                    .with_class("pb-canvas-empty")
                    .with_child(VNode::text("Drag components here to start building")),
            );
        }
        surface.with_children(self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SELECTED_CLASS;
    use pagecraft_model::{ElementKind, PageElement};

    #[test]
    fn test_empty_page_shows_hint() {
        let page = PageData::default();
        let surface = Canvas::new(&page, Breakpoint::Desktop, None).render_surface();
        assert!(surface.children()[0].has_class("pb-canvas-empty"));
    }

    #[test]
    fn test_stale_selection_marks_nothing() {
        let page = PageData::new(vec![PageElement::new("a", ElementKind::Text)]);
        let nodes = Canvas::new(&page, Breakpoint::Tablet, Some("gone")).render();
        assert!(!nodes[0].has_class(SELECTED_CLASS));
    }
}
