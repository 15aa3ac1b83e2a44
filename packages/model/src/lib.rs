//! # Pagecraft Model
//!
//! The page element tree shared by every other Pagecraft crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: PageData → PageElement tree          │
//! │  - typed element kinds (tagged union)       │
//! │  - per-breakpoint style resolution          │
//! │  - id-addressed tree operations             │
//! │  - JSON load/save                           │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//!   library (templates)       editor / renderer
//! ```
//!
//! A page is an ordered list of root elements. Each element has a `type`,
//! optional `content`, a property bag (`className`, `style`, `responsive`,
//! `settings`) and, for container kinds, an ordered list of children. A
//! node's parent is whichever node's `children` contains it; no back
//! reference is stored.
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_model::{Breakpoint, ElementKind, PageData, PageElement};
//!
//! let mut page = PageData::default();
//! let heading = PageElement::new("h-1", ElementKind::Text)
//!     .with_content("Hello")
//!     .with_style("color", "red")
//!     .with_responsive(Breakpoint::Mobile, "color", "blue");
//! page.elements.push(heading);
//!
//! let element = page.find_by_id("h-1").unwrap();
//! assert_eq!(element.properties.resolve_style(Breakpoint::Mobile)["color"], "blue");
//! assert_eq!(element.properties.resolve_style(Breakpoint::Desktop)["color"], "red");
//! ```

mod breakpoint;
mod element;
mod error;
mod id;
mod kind;
mod page;
mod style;
pub mod tree;

pub use breakpoint::{Breakpoint, ParseBreakpointError};
pub use element::{ElementProperties, PageElement, ResponsiveStyles, Settings};
pub use error::{ModelError, TreeError};
pub use id::{IdSource, RandomIds, SequentialIds};
pub use kind::ElementKind;
pub use page::{MetadataMap, PageData};
pub use style::{css_declarations, css_property_name, css_value, StyleMap};
pub use tree::{Location, Walk};
