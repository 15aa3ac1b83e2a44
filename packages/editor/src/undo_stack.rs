//! # Undo/Redo Stack
//!
//! Tracks mutation history for a page.
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original mutations
//! - New mutations clear the redo stack
//! - Several mutations can be grouped into one undo step

use crate::{Mutation, MutationError};
use pagecraft_model::PageData;

/// A group of mutations that are undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// The inverse mutations (in reverse order for undo)
    pub inverses: Vec<Mutation>,

    pub description: Option<String>,
}

impl MutationBatch {
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
        }
    }

    fn empty(description: Option<String>) -> Self {
        Self {
            mutations: Vec::new(),
            inverses: Vec::new(),
            description,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: &Mutation, page: &mut PageData) -> Result<(), MutationError> {
        // Inverse must be computed against the pre-mutation tree
        let inverse = mutation.to_inverse(page)?;

        mutation.apply(page)?;

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation.clone());
            batch.inverses.insert(0, inverse);
        } else {
            self.push_batch(MutationBatch::single(mutation.clone(), inverse));
        }

        Ok(())
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(MutationBatch::empty(None));
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, page: &mut PageData) -> Result<bool, MutationError> {
        // An open batch is closed first so it can be undone as a unit
        self.end_batch();

        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = Self::replay(&batch.inverses, page) {
            self.undo_stack.push(batch);
            return Err(e);
        }

        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, page: &mut PageData) -> Result<bool, MutationError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = Self::replay(&batch.mutations, page) {
            self.redo_stack.push(batch);
            return Err(e);
        }

        self.undo_stack.push(batch);
        Ok(true)
    }

    /// Apply a sequence atomically: on failure the page is left as it was
    fn replay(mutations: &[Mutation], page: &mut PageData) -> Result<(), MutationError> {
        let mut scratch = page.clone();
        for mutation in mutations {
            mutation.apply(&mut scratch)?;
        }
        *page = scratch;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.current_batch.as_ref().is_some_and(|b| !b.mutations.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
