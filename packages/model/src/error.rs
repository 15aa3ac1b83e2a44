//! Error types for the element model

use thiserror::Error;

/// Tree-shape failures, always addressed by element id
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Element {id} ({kind}) cannot have children")]
    NotAContainer { id: String, kind: String },

    #[error("Moving {0} into its own subtree would create a cycle")]
    WouldCreateCycle(String),

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to parse page data: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    #[error("Failed to serialize page data: {0}")]
    Serialize(serde_json::Error),

    #[error("Invalid page tree: {0}")]
    Tree(#[from] TreeError),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the page schema. Check element `id`, `type` and `properties` fields.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ModelError::Parse { source: e, hint }
    }
}
