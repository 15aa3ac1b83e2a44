use crate::element::PageElement;
use crate::error::{ModelError, TreeError};
use crate::tree::{self, Location, Walk};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque metadata (`seoData`, `schemaData`) carried alongside the tree
pub type MetadataMap = BTreeMap<String, Value>;

/// The whole editable document: ordered roots plus metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    #[serde(default)]
    pub elements: Vec<PageElement>,

    #[serde(default)]
    pub seo_data: MetadataMap,

    #[serde(default)]
    pub schema_data: MetadataMap,
}

impl PageData {
    pub fn new(elements: Vec<PageElement>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }

    /// Parse a page document and check the unique-id invariant
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        let page: PageData = serde_json::from_str(source)?;
        page.validate()?;
        Ok(page)
    }

    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let page: PageData = serde_json::from_value(value)?;
        page.validate()?;
        Ok(page)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string(self).map_err(ModelError::Serialize)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(ModelError::Serialize)
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        tree::validate(&self.elements)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PageElement> {
        tree::find_by_id(&self.elements, id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut PageElement> {
        tree::find_by_id_mut(&mut self.elements, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn locate(&self, id: &str) -> Option<Location> {
        tree::locate(&self.elements, id)
    }

    pub fn insert(
        &mut self,
        parent_id: Option<&str>,
        index: Option<usize>,
        element: PageElement,
    ) -> Result<Location, TreeError> {
        tree::insert_at(&mut self.elements, parent_id, index, element)
    }

    pub fn remove(&mut self, id: &str) -> Result<(PageElement, Location), TreeError> {
        tree::remove_by_id(&mut self.elements, id)
            .ok_or_else(|| TreeError::ElementNotFound(id.to_string()))
    }

    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.elements)
    }

    /// Total number of elements at every depth
    pub fn len(&self) -> usize {
        tree::count(&self.elements)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// String-valued SEO field, if set and non-blank
    pub fn seo_str(&self, key: &str) -> Option<&str> {
        self.seo_data
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ElementKind;

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"{"elements": [
            {"id": "a", "type": "text"},
            {"id": "b", "type": "container", "children": [{"id": "a", "type": "text"}]}
        ]}"#;

        let err = PageData::from_json(json).unwrap_err();
        assert!(matches!(err, ModelError::Tree(TreeError::DuplicateId(ref id)) if id == "a"));
    }

    #[test]
    fn test_from_json_rejects_children_on_leaf() {
        let json = r#"{"elements": [
            {"id": "img", "type": "image", "children": [{"id": "t", "type": "text"}]}
        ]}"#;

        let err = PageData::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Tree(TreeError::NotAContainer { ref id, .. }) if id == "img"
        ));
    }

    #[test]
    fn test_syntax_error_has_hint() {
        let err = PageData::from_json(r#"{"elements": [,]}"#).unwrap_err();
        assert!(err.to_string().contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn test_missing_sections_default() {
        let page = PageData::from_json("{}").unwrap();
        assert!(page.is_empty());
        assert!(page.seo_data.is_empty());
    }

    #[test]
    fn test_remove_missing_element() {
        let mut page = PageData::new(vec![PageElement::new("a", ElementKind::Text)]);
        assert_eq!(
            page.remove("zzz"),
            Err(TreeError::ElementNotFound("zzz".to_string()))
        );
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_seo_str_ignores_blank() {
        let mut page = PageData::default();
        page.seo_data.insert("title".into(), "  ".into());
        page.seo_data.insert("description".into(), "About us".into());

        assert_eq!(page.seo_str("title"), None);
        assert_eq!(page.seo_str("description"), Some("About us"));
    }
}
