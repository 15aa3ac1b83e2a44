//! # Pagecraft Renderer
//!
//! Turns a page tree into virtual nodes and HTML.
//!
//! ```text
//! PageData ──► Renderer (breakpoint, mode) ──► VNode tree ──► HTML
//!                 │
//!                 ├─ Canvas: editor mode, element ids + selection marker
//!                 └─ ResponsivePreview: read-only, framed per device
//! ```
//!
//! Rendering is isolated per element: an unknown type or malformed element
//! becomes a placeholder node and its siblings render normally.
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_model::{Breakpoint, ElementKind, PageData, PageElement};
//! use pagecraft_renderer::{render_document, Canvas, HtmlOptions};
//!
//! let page = PageData::new(vec![
//!     PageElement::new("t-1", ElementKind::Text).with_content("Hello"),
//! ]);
//!
//! let nodes = Canvas::new(&page, Breakpoint::Desktop, Some("t-1")).render();
//! assert!(nodes[0].has_class("pb-selected"));
//!
//! let html = render_document(&page, Breakpoint::Desktop, &HtmlOptions::default());
//! assert!(html.contains("<p>Hello</p>"));
//! ```

mod canvas;
mod html;
pub mod preview;
mod render;
mod vnode;

pub use canvas::Canvas;
pub use html::{escape_html, render_document, to_html, HtmlOptions, DEFAULT_TITLE};
pub use preview::{preview_html, ResponsivePreview, Viewport};
pub use render::{
    RenderError, RenderMode, Renderer, DROP_ZONE_CLASS, ELEMENT_CLASS, SELECTED_CLASS,
};
pub use vnode::VNode;
