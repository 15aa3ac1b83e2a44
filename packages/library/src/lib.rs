//! # Pagecraft Component Library
//!
//! The catalog of reusable element templates offered by the builder's
//! component panel, plus search, grouping and instantiation.
//!
//! ```rust
//! use pagecraft_library::ComponentLibrary;
//! use pagecraft_model::SequentialIds;
//!
//! let library = ComponentLibrary::standard();
//! let hero = library.get("hero-banner").unwrap();
//!
//! let mut ids = SequentialIds::new("el");
//! let element = hero.instantiate(&mut ids);
//! assert_eq!(element.id, "el-1");
//! assert_eq!(element.subtree_len(), 5);
//! ```

mod category;
mod standard;
mod template;

pub use category::{Category, UnknownCategory};
pub use template::ComponentTemplate;

use pagecraft_model::{IdSource, PageElement};

/// Ordered collection of component templates
#[derive(Clone)]
pub struct ComponentLibrary {
    templates: Vec<ComponentTemplate>,
}

impl ComponentLibrary {
    /// The built-in catalog
    pub fn standard() -> Self {
        Self {
            templates: standard::standard_templates(),
        }
    }

    /// Create an empty library
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Add a template; an existing template with the same id is replaced
    pub fn add_template(&mut self, template: ComponentTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn templates(&self) -> &[ComponentTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&ComponentTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Categories that have at least one template, in display order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.templates.iter().any(|t| t.category == *c))
            .collect()
    }

    /// Templates matching `term` and, when given, `category`
    pub fn search(&self, term: &str, category: Option<Category>) -> Vec<&ComponentTemplate> {
        self.templates
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .filter(|t| t.matches(term))
            .collect()
    }

    /// Search results grouped by category; empty groups are omitted
    pub fn grouped(&self, term: &str) -> Vec<(Category, Vec<&ComponentTemplate>)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.search(term, Some(c))))
            .filter(|(_, templates)| !templates.is_empty())
            .collect()
    }

    /// Instantiate the template with `id`, if it exists
    pub fn instantiate(&self, id: &str, ids: &mut dyn IdSource) -> Option<PageElement> {
        self.get(id).map(|t| t.instantiate(ids))
    }
}

impl Default for ComponentLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ComponentLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentLibrary")
            .field("templates", &format!("{} templates", self.templates.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::ElementKind;

    #[test]
    fn test_standard_catalog() {
        let library = ComponentLibrary::standard();
        assert_eq!(library.templates().len(), 14);
        assert_eq!(library.categories(), Category::ALL.to_vec());

        let pro: Vec<&str> = library
            .templates()
            .iter()
            .filter(|t| t.is_pro)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(pro, vec!["testimonial-slider", "pricing-table"]);
    }

    #[test]
    fn test_search_name_or_description() {
        let library = ComponentLibrary::standard();

        let ids: Vec<&str> = library.search("COLUMN", None).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["grid-2col", "grid-3col"]);

        // "CTA" only appears in the hero description
        let ids: Vec<&str> = library.search("cta", None).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hero-banner"]);
    }

    #[test]
    fn test_search_with_category() {
        let library = ComponentLibrary::standard();
        assert_eq!(library.search("", Some(Category::Forms)).len(), 1);
        assert!(library.search("heading", Some(Category::Layout)).is_empty());
    }

    #[test]
    fn test_grouped_skips_empty_categories() {
        let library = ComponentLibrary::standard();
        let groups = library.grouped("card");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, Category::Components);
    }

    #[test]
    fn test_add_template_replaces_same_id() {
        let mut library = ComponentLibrary::empty();
        let first = ComponentTemplate::new(
            "x",
            "X",
            Category::Basic,
            "first",
            PageElement::new("x", ElementKind::Text),
        );
        let second = ComponentTemplate { description: "second".into(), ..first.clone() };

        library.add_template(first);
        library.add_template(second);

        assert_eq!(library.templates().len(), 1);
        assert_eq!(library.get("x").unwrap().description, "second");
    }
}
