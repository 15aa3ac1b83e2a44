//! # Pagecraft Editor
//!
//! Editing engine for a page tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: PageData → PageElement tree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - selection + breakpoint                   │
//! │  - validated, invertible mutations          │
//! │  - undo/redo history                        │
//! │  - properties / layers panels, SEO score    │
//! │  - save tickets                             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: canvas / preview / HTML           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The session owns the tree**: panels and renderers read it, only
//!    session methods change it
//! 2. **Every edit is a mutation**: validated before it is applied, with an
//!    inverse recorded for undo
//! 3. **Lookups recover locally**: a stale selection shows an empty panel;
//!    only failed saves are reported to the user
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_editor::EditSession;
//! use pagecraft_library::ComponentLibrary;
//! use pagecraft_model::PageData;
//! use serde_json::json;
//!
//! let library = ComponentLibrary::standard();
//! let mut session = EditSession::new("session-1", PageData::default());
//!
//! let button = session
//!     .insert_template(library.get("button-primary").unwrap(), None, None)
//!     .unwrap();
//! session.select(&button).unwrap();
//! session.update_property("settings.href", json!("https://example.com")).unwrap();
//!
//! assert_eq!(
//!     session.selected_element().unwrap().properties.setting_str("href"),
//!     Some("https://example.com")
//! );
//! assert!(session.undo().unwrap());
//! ```

mod errors;
pub mod layers;
mod mutations;
pub mod properties;
pub mod seo;
mod session;
mod undo_stack;

pub use errors::EditorError;
pub use layers::LayerRow;
pub use mutations::{ContentUpdate, ElementPatch, Mutation, MutationError};
pub use properties::{PanelError, PanelView, PropertiesPanel, PropertyPath};
pub use seo::{SeoGrade, SeoReport};
pub use session::{EditSession, SaveOutcome, SaveStatus, SaveTicket, SavedRevision, SessionState};
pub use undo_stack::{MutationBatch, UndoStack};
