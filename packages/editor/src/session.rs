//! # Edit Session
//!
//! One editor's view of one page: the tree, the current selection and
//! breakpoint, undo history and save state. All tree changes go through the
//! session's methods, which route them through [`Mutation`]s so they can be
//! undone.
//!
//! Saving is split in two so the network round trip can happen elsewhere:
//! [`EditSession::begin_save`] hands out a [`SaveTicket`] holding a snapshot,
//! and [`EditSession::complete_save`] records the outcome. Completions for a
//! closed session or a superseded ticket are discarded.

use crate::layers::{layer_rows, LayerRow};
use crate::mutations::{ElementPatch, Mutation};
use crate::properties::PropertiesPanel;
use crate::seo::{self, SeoReport};
use crate::{EditorError, UndoStack};
use pagecraft_library::ComponentTemplate;
use pagecraft_model::{tree, Breakpoint, IdSource, PageData, PageElement, RandomIds};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Where the session is in its select/edit cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "elementId", rename_all = "camelCase")]
pub enum SessionState {
    Idle,
    Selected(String),
    /// A panel change is being applied
    Editing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    Saving,
    Unsaved,
}

/// Identity of the stored copy a session was loaded from or last saved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRevision {
    pub page_id: String,
    pub version: u64,
}

impl SavedRevision {
    pub fn new(page_id: impl Into<String>, version: u64) -> Self {
        Self {
            page_id: page_id.into(),
            version,
        }
    }
}

/// Snapshot handed out by [`EditSession::begin_save`]
#[derive(Debug, Clone)]
pub struct SaveTicket {
    session_id: String,
    sequence: u64,
    generation: u64,
    /// Stored revision the snapshot was edited from, if any
    pub base: Option<SavedRevision>,
    pub page: PageData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored copy matches the session
    Saved,
    /// Stored, but the session was edited while the save was in flight
    SavedWithPendingEdits,
    /// Session closed or ticket superseded; nothing was changed
    Discarded,
}

/// Single editor session over one page
pub struct EditSession {
    /// Unique session identifier
    pub id: String,
    page: PageData,
    selected: Option<String>,
    state: SessionState,
    breakpoint: Breakpoint,
    history: UndoStack,
    ids: Box<dyn IdSource>,
    revision: Option<SavedRevision>,
    save_status: SaveStatus,
    /// Bumped on every change to the page
    generation: u64,
    save_sequence: u64,
    pending_save: Option<u64>,
    closed: bool,
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("elements", &self.page.len())
            .field("selected", &self.selected)
            .field("breakpoint", &self.breakpoint)
            .field("save_status", &self.save_status)
            .field("closed", &self.closed)
            .finish()
    }
}

impl EditSession {
    /// Create new edit session over a freshly loaded (or empty) page
    pub fn new(id: impl Into<String>, page: PageData) -> Self {
        Self {
            id: id.into(),
            page,
            selected: None,
            state: SessionState::Idle,
            breakpoint: Breakpoint::Desktop,
            history: UndoStack::new(),
            ids: Box::new(RandomIds),
            revision: None,
            save_status: SaveStatus::Saved,
            generation: 0,
            save_sequence: 0,
            pending_save: None,
            closed: false,
        }
    }

    /// Use a different id generator (deterministic ids in tests)
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Record the stored copy this session edits
    pub fn with_revision(mut self, revision: SavedRevision) -> Self {
        self.revision = Some(revision);
        self
    }

    pub fn page(&self) -> &PageData {
        &self.page
    }

    pub fn into_page(self) -> PageData {
        self.page
    }

    pub fn revision(&self) -> Option<&SavedRevision> {
        self.revision.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
    }

    // ---- selection -------------------------------------------------------

    pub fn select(&mut self, element_id: &str) -> Result<(), EditorError> {
        self.ensure_open()?;
        if !self.page.contains(element_id) {
            return Err(EditorError::ElementNotFound(element_id.to_string()));
        }
        self.set_selection(Some(element_id.to_string()));
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.set_selection(None);
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected element, or `None` if nothing is selected or the id is stale
    pub fn selected_element(&self) -> Option<&PageElement> {
        self.selected.as_deref().and_then(|id| self.page.find_by_id(id))
    }

    fn set_selection(&mut self, selected: Option<String>) {
        self.state = match &selected {
            Some(id) => SessionState::Selected(id.clone()),
            None => SessionState::Idle,
        };
        self.selected = selected;
    }

    /// Drop the selection if it no longer resolves
    fn reconcile_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.page.contains(id) {
                debug!(session_id = %self.id, element_id = %id, "selection no longer resolves");
                self.set_selection(None);
            }
        }
    }

    // ---- tree edits ------------------------------------------------------

    /// Insert `element` under `parent_id` (root level when `None`). Returns the element id.
    pub fn insert(
        &mut self,
        element: PageElement,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<String, EditorError> {
        let id = element.id.clone();
        self.commit(Mutation::InsertElement {
            parent_id: parent_id.map(str::to_string),
            index,
            element,
        })?;
        Ok(id)
    }

    /// Instantiate a library template with fresh ids and insert it
    pub fn insert_template(
        &mut self,
        template: &ComponentTemplate,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<String, EditorError> {
        self.ensure_open()?;
        let element = template.instantiate(self.ids.as_mut());
        debug!(template = %template.id, element_id = %element.id, "instantiated template");
        self.insert(element, parent_id, index)
    }

    pub fn update_by_id(&mut self, element_id: &str, patch: ElementPatch) -> Result<(), EditorError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.commit(Mutation::UpdateElement {
            element_id: element_id.to_string(),
            patch,
        })
    }

    /// Remove an element and its subtree. The selection is cleared when it
    /// pointed at the removed element or anything inside it.
    pub fn delete_by_id(&mut self, element_id: &str) -> Result<(), EditorError> {
        let selection_removed = match (&self.selected, self.page.find_by_id(element_id)) {
            (Some(selected), Some(element)) => {
                selected == element_id || tree::contains_descendant(element, selected)
            }
            _ => false,
        };

        self.commit(Mutation::RemoveElement {
            element_id: element_id.to_string(),
        })?;

        if selection_removed {
            self.set_selection(None);
        }
        Ok(())
    }

    /// Insert a deep copy (fresh ids throughout) right after the original.
    /// Returns the id of the copy.
    pub fn duplicate(&mut self, element_id: &str) -> Result<String, EditorError> {
        self.ensure_open()?;
        let original = self
            .page
            .find_by_id(element_id)
            .ok_or_else(|| EditorError::ElementNotFound(element_id.to_string()))?;
        let location = self
            .page
            .locate(element_id)
            .ok_or_else(|| EditorError::ElementNotFound(element_id.to_string()))?;

        let mut copy = original.clone();
        tree::reassign_ids(&mut copy, self.ids.as_mut());

        self.insert(copy, location.parent_id.as_deref(), Some(location.index + 1))
    }

    /// Move an element under `new_parent_id` (root level when `None`) at `index`
    pub fn move_element(
        &mut self,
        element_id: &str,
        new_parent_id: Option<&str>,
        index: usize,
    ) -> Result<(), EditorError> {
        self.commit(Mutation::MoveElement {
            element_id: element_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            index,
        })
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        let undone = self.history.undo(&mut self.page)?;
        if undone {
            self.touch();
            self.reconcile_selection();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        let redone = self.history.redo(&mut self.page)?;
        if redone {
            self.touch();
            self.reconcile_selection();
        }
        Ok(redone)
    }

    fn commit(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        self.ensure_open()?;
        self.history.apply(&mutation, &mut self.page)?;
        self.touch();
        debug!(
            session_id = %self.id,
            mutation = mutation.name(),
            element_id = mutation.target_id(),
            generation = self.generation,
            "applied mutation"
        );
        Ok(())
    }

    fn touch(&mut self) {
        self.generation += 1;
        self.save_status = SaveStatus::Unsaved;
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.closed {
            Err(EditorError::SessionClosed(self.id.clone()))
        } else {
            Ok(())
        }
    }

    // ---- panels ----------------------------------------------------------

    pub fn properties_panel(&self) -> PropertiesPanel<'_> {
        PropertiesPanel::new(&self.page.elements, self.selected.as_deref(), self.breakpoint)
    }

    /// Commit a panel edit at `path` for the selected element
    pub fn update_property(&mut self, path: &str, value: Value) -> Result<(), EditorError> {
        let mut pending = None;
        self.properties_panel()
            .update_property(path, value, |id, patch| pending = Some((id.to_string(), patch)))?;
        self.apply_panel_edit(pending)
    }

    /// Commit a style edit for the current breakpoint only
    pub fn update_responsive_property(&mut self, key: &str, value: Value) -> Result<(), EditorError> {
        let mut pending = None;
        self.properties_panel()
            .update_responsive_property(key, value, |id, patch| pending = Some((id.to_string(), patch)))?;
        self.apply_panel_edit(pending)
    }

    fn apply_panel_edit(&mut self, pending: Option<(String, ElementPatch)>) -> Result<(), EditorError> {
        let Some((element_id, patch)) = pending else {
            return Ok(());
        };

        self.state = SessionState::Editing(element_id.clone());
        let result = self.update_by_id(&element_id, patch);
        self.state = SessionState::Selected(element_id);
        result
    }

    pub fn layers(&self, expanded: &HashSet<String>, search: &str) -> Vec<LayerRow> {
        layer_rows(&self.page.elements, self.selected.as_deref(), expanded, search)
    }

    pub fn seo_report(&self) -> SeoReport {
        seo::score(&self.page.seo_data)
    }

    /// Set (or with `null`, clear) one `seoData` field. Not recorded in undo history.
    pub fn update_seo(&mut self, key: &str, value: Value) -> Result<(), EditorError> {
        self.ensure_open()?;
        if value.is_null() {
            self.page.seo_data.remove(key);
        } else {
            self.page.seo_data.insert(key.to_string(), value);
        }
        self.touch();
        Ok(())
    }

    // ---- persistence -----------------------------------------------------

    /// Snapshot the page for saving. A newer ticket supersedes older ones.
    pub fn begin_save(&mut self) -> Result<SaveTicket, EditorError> {
        self.ensure_open()?;
        self.save_sequence += 1;
        self.pending_save = Some(self.save_sequence);
        self.save_status = SaveStatus::Saving;

        info!(session_id = %self.id, sequence = self.save_sequence, "saving page");
        Ok(SaveTicket {
            session_id: self.id.clone(),
            sequence: self.save_sequence,
            generation: self.generation,
            base: self.revision.clone(),
            page: self.page.clone(),
        })
    }

    /// Record the result of a save started with [`begin_save`](Self::begin_save).
    ///
    /// On failure the tree is kept as is, the session is marked unsaved and
    /// the error is returned as [`EditorError::Persistence`] so the caller can
    /// report it and retry.
    pub fn complete_save<E: fmt::Display>(
        &mut self,
        ticket: SaveTicket,
        result: Result<SavedRevision, E>,
    ) -> Result<SaveOutcome, EditorError> {
        if self.closed || ticket.session_id != self.id || self.pending_save != Some(ticket.sequence) {
            debug!(
                session_id = %self.id,
                sequence = ticket.sequence,
                "discarding stale save completion"
            );
            return Ok(SaveOutcome::Discarded);
        }
        self.pending_save = None;

        match result {
            Ok(revision) => {
                info!(
                    session_id = %self.id,
                    page_id = %revision.page_id,
                    version = revision.version,
                    "page saved"
                );
                self.revision = Some(revision);
                if ticket.generation == self.generation {
                    self.save_status = SaveStatus::Saved;
                    Ok(SaveOutcome::Saved)
                } else {
                    self.save_status = SaveStatus::Unsaved;
                    Ok(SaveOutcome::SavedWithPendingEdits)
                }
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "failed to save page");
                self.save_status = SaveStatus::Unsaved;
                Err(EditorError::Persistence(e.to_string()))
            }
        }
    }

    /// Navigation away: later edits fail and in-flight saves are discarded
    pub fn close(&mut self) {
        if !self.closed {
            info!(session_id = %self.id, "closing edit session");
        }
        self.closed = true;
        self.pending_save = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{ElementKind, SequentialIds};

    fn session() -> EditSession {
        let page = PageData::new(vec![PageElement::new("box", ElementKind::Container)
            .with_child(PageElement::new("title", ElementKind::Text).with_content("Hello"))]);
        EditSession::new("session-1", page).with_id_source(SequentialIds::new("n"))
    }

    #[test]
    fn test_session_creation() {
        let session = session();

        assert_eq!(session.id, "session-1");
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.save_status(), SaveStatus::Saved);
        assert!(session.selected_element().is_none());
    }

    #[test]
    fn test_select_requires_existing_element() {
        let mut session = session();

        assert!(matches!(session.select("missing"), Err(EditorError::ElementNotFound(_))));
        session.select("title").unwrap();
        assert_eq!(session.state(), &SessionState::Selected("title".into()));
    }

    #[test]
    fn test_deleting_parent_clears_selected_child() {
        let mut session = session();
        session.select("title").unwrap();

        session.delete_by_id("box").unwrap();
        assert_eq!(session.selected_id(), None);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_undo_of_insert_clears_selection() {
        let mut session = session();
        let id = session
            .insert(PageElement::new("extra", ElementKind::Text), None, None)
            .unwrap();
        session.select(&id).unwrap();

        session.undo().unwrap();
        assert!(session.selected_id().is_none());
    }

    #[test]
    fn test_duplicate_goes_after_original() {
        let mut session = session();
        let copy = session.duplicate("title").unwrap();

        let children = session.page().find_by_id("box").unwrap().children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].id, copy);
        assert_eq!(children[1].content_text(), Some("Hello"));
    }

    #[test]
    fn test_panel_edit_returns_to_selected() {
        let mut session = session();
        session.select("title").unwrap();

        session
            .update_property("content", Value::String("Bye".into()))
            .unwrap();

        assert_eq!(session.state(), &SessionState::Selected("title".into()));
        assert_eq!(session.selected_element().unwrap().content_text(), Some("Bye"));
        assert_eq!(session.save_status(), SaveStatus::Unsaved);
    }

    #[test]
    fn test_closed_session_rejects_edits() {
        let mut session = session();
        session.close();

        assert!(matches!(
            session.delete_by_id("title"),
            Err(EditorError::SessionClosed(_))
        ));
        assert!(session.page().contains("title"));
    }
}
