//! # Tree Mutations
//!
//! High-level semantic operations on a page tree.
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Parent must exist and be a container kind (or `None` for a root)
//! - Index is clamped to the sibling count; `None` appends
//! - No id in the inserted subtree may already be in the page
//!
//! ### Update
//! - Atomic replacement of `content` and/or the whole property bag
//! - Last write wins; no merge attempts
//!
//! ### Remove
//! - Removes the node and all descendants
//!
//! ### Move
//! - Atomic relocation of a node to a new parent at index
//! - Fails if the target is the node itself or one of its descendants

use pagecraft_model::{tree, ElementProperties, PageData, PageElement, TreeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a subtree under `parent_id` (root level when `None`)
    #[serde(rename_all = "camelCase")]
    InsertElement {
        parent_id: Option<String>,
        index: Option<usize>,
        element: PageElement,
    },

    /// Replace content and/or properties of one element
    #[serde(rename_all = "camelCase")]
    UpdateElement { element_id: String, patch: ElementPatch },

    /// Remove a node and its subtree
    #[serde(rename_all = "camelCase")]
    RemoveElement { element_id: String },

    /// Move an element to a new parent at index
    #[serde(rename_all = "camelCase")]
    MoveElement {
        element_id: String,
        new_parent_id: Option<String>,
        index: usize,
    },
}

/// New content and/or properties for an element.
///
/// Fields left as `None` are untouched. `properties` replaces the whole bag,
/// so callers build a fresh object rather than editing the stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentUpdate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ElementProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum ContentUpdate {
    Set(Value),
    Clear,
}

impl ElementPatch {
    pub fn content(value: impl Into<Value>) -> Self {
        Self {
            content: Some(ContentUpdate::Set(value.into())),
            properties: None,
        }
    }

    pub fn properties(properties: ElementProperties) -> Self {
        Self {
            content: None,
            properties: Some(properties),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.properties.is_none()
    }

    fn apply_to(&self, element: &mut PageElement) {
        match &self.content {
            Some(ContentUpdate::Set(value)) => element.content = Some(value.clone()),
            Some(ContentUpdate::Clear) => element.content = None,
            None => {}
        }
        if let Some(properties) = &self.properties {
            element.properties = properties.clone();
        }
    }

    /// Patch restoring whatever this patch would overwrite on `element`
    fn inverse_for(&self, element: &PageElement) -> ElementPatch {
        ElementPatch {
            content: self.content.as_ref().map(|_| match &element.content {
                Some(value) => ContentUpdate::Set(value.clone()),
                None => ContentUpdate::Clear,
            }),
            properties: self.properties.as_ref().map(|_| element.properties.clone()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Id of the element the mutation is about
    pub fn target_id(&self) -> &str {
        match self {
            Mutation::InsertElement { element, .. } => &element.id,
            Mutation::UpdateElement { element_id, .. }
            | Mutation::RemoveElement { element_id }
            | Mutation::MoveElement { element_id, .. } => element_id,
        }
    }

    /// Short name for logs and undo descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertElement { .. } => "insert",
            Mutation::UpdateElement { .. } => "update",
            Mutation::RemoveElement { .. } => "remove",
            Mutation::MoveElement { .. } => "move",
        }
    }

    /// Apply mutation to the page with validation
    pub fn apply(&self, page: &mut PageData) -> Result<(), MutationError> {
        self.validate(page)?;

        match self {
            Mutation::InsertElement {
                parent_id,
                index,
                element,
            } => {
                page.insert(parent_id.as_deref(), *index, element.clone())?;
            }

            Mutation::UpdateElement { element_id, patch } => {
                let element = page
                    .find_by_id_mut(element_id)
                    .ok_or_else(|| TreeError::ElementNotFound(element_id.clone()))?;
                patch.apply_to(element);
            }

            Mutation::RemoveElement { element_id } => {
                page.remove(element_id)?;
            }

            Mutation::MoveElement {
                element_id,
                new_parent_id,
                index,
            } => {
                let (element, _) = page.remove(element_id)?;
                page.insert(new_parent_id.as_deref(), Some(*index), element)?;
            }
        }

        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, page: &PageData) -> Result<(), MutationError> {
        match self {
            Mutation::InsertElement {
                parent_id, element, ..
            } => {
                if let Some(parent_id) = parent_id {
                    Self::check_container(page, parent_id)?;
                }

                let incoming_tree = std::slice::from_ref(element);
                let mut incoming = HashSet::new();
                for (node, _) in tree::Walk::new(incoming_tree) {
                    if !incoming.insert(node.id.as_str()) || page.contains(&node.id) {
                        return Err(TreeError::DuplicateId(node.id.clone()).into());
                    }
                }
                if let Some(leaf) = tree::misplaced_children(incoming_tree) {
                    return Err(TreeError::NotAContainer {
                        id: leaf.id.clone(),
                        kind: leaf.kind.to_string(),
                    }
                    .into());
                }
                Ok(())
            }

            Mutation::UpdateElement { element_id, .. } | Mutation::RemoveElement { element_id } => {
                if page.contains(element_id) {
                    Ok(())
                } else {
                    Err(TreeError::ElementNotFound(element_id.clone()).into())
                }
            }

            Mutation::MoveElement {
                element_id,
                new_parent_id,
                ..
            } => {
                let element = page
                    .find_by_id(element_id)
                    .ok_or_else(|| TreeError::ElementNotFound(element_id.clone()))?;

                if let Some(parent_id) = new_parent_id {
                    if parent_id == element_id || tree::contains_descendant(element, parent_id) {
                        return Err(TreeError::WouldCreateCycle(element_id.clone()).into());
                    }
                    Self::check_container(page, parent_id)?;
                }
                Ok(())
            }
        }
    }

    /// Mutation that undoes `self`, computed against the page before `self` is applied
    pub fn to_inverse(&self, page: &PageData) -> Result<Mutation, MutationError> {
        self.validate(page)?;

        let inverse = match self {
            Mutation::InsertElement { element, .. } => Mutation::RemoveElement {
                element_id: element.id.clone(),
            },

            Mutation::UpdateElement { element_id, patch } => {
                let element = Self::existing(page, element_id)?;
                Mutation::UpdateElement {
                    element_id: element_id.clone(),
                    patch: patch.inverse_for(element),
                }
            }

            Mutation::RemoveElement { element_id } => {
                let element = Self::existing(page, element_id)?;
                let location = Self::location(page, element_id)?;
                Mutation::InsertElement {
                    parent_id: location.parent_id,
                    index: Some(location.index),
                    element: element.clone(),
                }
            }

            Mutation::MoveElement { element_id, .. } => {
                let location = Self::location(page, element_id)?;
                Mutation::MoveElement {
                    element_id: element_id.clone(),
                    new_parent_id: location.parent_id,
                    index: location.index,
                }
            }
        };

        Ok(inverse)
    }

    fn existing<'a>(page: &'a PageData, id: &str) -> Result<&'a PageElement, MutationError> {
        page.find_by_id(id)
            .ok_or_else(|| TreeError::ElementNotFound(id.to_string()).into())
    }

    fn location(page: &PageData, id: &str) -> Result<tree::Location, MutationError> {
        page.locate(id)
            .ok_or_else(|| TreeError::ElementNotFound(id.to_string()).into())
    }

    fn check_container(page: &PageData, parent_id: &str) -> Result<(), MutationError> {
        let parent = page
            .find_by_id(parent_id)
            .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;

        if parent.kind.is_container() {
            Ok(())
        } else {
            Err(TreeError::NotAContainer {
                id: parent.id.clone(),
                kind: parent.kind.to_string(),
            }
            .into())
        }
    }
}
