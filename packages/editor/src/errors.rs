//! Error types for the editor

use crate::properties::PanelError;
use pagecraft_model::{ModelError, TreeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Properties panel error: {0}")]
    Panel(#[from] PanelError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Session {0} has been closed")]
    SessionClosed(String),

    #[error("Failed to save page: {0}")]
    Persistence(String),
}

impl From<TreeError> for EditorError {
    fn from(e: TreeError) -> Self {
        EditorError::Mutation(e.into())
    }
}

impl EditorError {
    /// Whether the error must be shown to the user.
    ///
    /// Tree-shape problems are recovered where they are detected; only a
    /// failed save means edits are not durable.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, EditorError::Persistence(_))
    }
}
