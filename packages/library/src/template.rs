use crate::category::Category;
use pagecraft_model::{tree, IdSource, PageElement};
use serde::Serialize;

/// A reusable, pre-configured element subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Advisory only; never gates instantiation
    pub is_pro: bool,
    pub template: PageElement,
}

impl ComponentTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        template: PageElement,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            is_pro: false,
            template,
        }
    }

    pub fn pro(mut self) -> Self {
        self.is_pro = true;
        self
    }

    /// Case-insensitive match on name or description
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }

    /// Deep copy of the template subtree with a fresh id on every node.
    ///
    /// The returned element shares nothing with the catalog entry, so editing
    /// an instance never changes later instantiations.
    pub fn instantiate(&self, ids: &mut dyn IdSource) -> PageElement {
        let mut element = self.template.clone();
        tree::reassign_ids(&mut element, ids);
        element
    }
}
