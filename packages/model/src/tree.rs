//! # Tree operations
//!
//! Id-addressed queries and edits over an ordered list of root elements.
//! Every lookup is a depth-first, pre-order scan; page trees are editor
//! scale (dozens to a few hundred nodes), so no index is maintained.

use crate::element::PageElement;
use crate::error::TreeError;
use crate::id::IdSource;
use crate::kind::ElementKind;
use std::collections::HashSet;

/// Position of a node: its parent (`None` for roots) and index among siblings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent_id: Option<String>,
    pub index: usize,
}

impl Location {
    pub fn root(index: usize) -> Self {
        Self {
            parent_id: None,
            index,
        }
    }
}

/// First node with `id`, searching depth-first
pub fn find_by_id<'a>(elements: &'a [PageElement], id: &str) -> Option<&'a PageElement> {
    for element in elements {
        if element.id == id {
            return Some(element);
        }
        if let Some(found) = find_by_id(element.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_by_id_mut<'a>(elements: &'a mut [PageElement], id: &str) -> Option<&'a mut PageElement> {
    for element in elements.iter_mut() {
        if element.id == id {
            return Some(element);
        }
        if let Some(children) = element.children.as_mut() {
            if let Some(found) = find_by_id_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Where `id` currently sits in the tree
pub fn locate(elements: &[PageElement], id: &str) -> Option<Location> {
    locate_in(elements, None, id)
}

fn locate_in(elements: &[PageElement], parent: Option<&str>, id: &str) -> Option<Location> {
    for (index, element) in elements.iter().enumerate() {
        if element.id == id {
            return Some(Location {
                parent_id: parent.map(str::to_string),
                index,
            });
        }
        if let Some(found) = locate_in(element.children(), Some(&element.id), id) {
            return Some(found);
        }
    }
    None
}

/// Detach the subtree rooted at `id`, returning it with its former location
pub fn remove_by_id(elements: &mut Vec<PageElement>, id: &str) -> Option<(PageElement, Location)> {
    remove_in(elements, None, id)
}

fn remove_in(
    elements: &mut Vec<PageElement>,
    parent: Option<&str>,
    id: &str,
) -> Option<(PageElement, Location)> {
    if let Some(index) = elements.iter().position(|e| e.id == id) {
        let removed = elements.remove(index);
        let location = Location {
            parent_id: parent.map(str::to_string),
            index,
        };
        return Some((removed, location));
    }

    for element in elements.iter_mut() {
        if let Some(children) = element.children.as_mut() {
            if let Some(found) = remove_in(children, Some(&element.id), id) {
                return Some(found);
            }
        }
    }
    None
}

/// Insert `element` under `parent_id` (or at root level) at `index`.
///
/// The index is clamped to the sibling count; `None` appends. The parent must
/// exist and be a container kind.
pub fn insert_at(
    elements: &mut Vec<PageElement>,
    parent_id: Option<&str>,
    index: Option<usize>,
    element: PageElement,
) -> Result<Location, TreeError> {
    let siblings = match parent_id {
        None => elements,
        Some(pid) => {
            let parent = find_by_id_mut(elements, pid)
                .ok_or_else(|| TreeError::ParentNotFound(pid.to_string()))?;
            if !parent.kind.is_container() {
                return Err(TreeError::NotAContainer {
                    id: parent.id.clone(),
                    kind: parent.kind.to_string(),
                });
            }
            parent.children.get_or_insert_with(Vec::new)
        }
    };

    let index = index.map_or(siblings.len(), |i| i.min(siblings.len()));
    siblings.insert(index, element);

    Ok(Location {
        parent_id: parent_id.map(str::to_string),
        index,
    })
}

/// Whether `id` is somewhere below `root` (not `root` itself)
pub fn contains_descendant(root: &PageElement, id: &str) -> bool {
    find_by_id(root.children(), id).is_some()
}

/// Give every node of the subtree a fresh id
pub fn reassign_ids(element: &mut PageElement, ids: &mut dyn IdSource) {
    element.id = ids.next_id();
    if let Some(children) = element.children.as_mut() {
        for child in children {
            reassign_ids(child, ids);
        }
    }
}

/// Total node count across all subtrees
pub fn count(elements: &[PageElement]) -> usize {
    elements.iter().map(PageElement::subtree_len).sum()
}

/// Ids that occur more than once, each reported once, in document order
pub fn duplicate_ids(elements: &[PageElement]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for (element, _) in Walk::new(elements) {
        if !seen.insert(element.id.as_str()) && reported.insert(element.id.as_str()) {
            duplicates.push(element.id.clone());
        }
    }
    duplicates
}

/// First node of a leaf kind that carries children, in document order.
///
/// Unknown kinds are skipped: their children are kept as loaded.
pub fn misplaced_children(elements: &[PageElement]) -> Option<&PageElement> {
    Walk::new(elements).map(|(element, _)| element).find(|element| {
        !element.kind.is_container()
            && !matches!(element.kind, ElementKind::Unknown(_))
            && !element.children().is_empty()
    })
}

/// Check unique ids and that only container kinds hold children
pub fn validate(elements: &[PageElement]) -> Result<(), TreeError> {
    if let Some(id) = duplicate_ids(elements).into_iter().next() {
        return Err(TreeError::DuplicateId(id));
    }
    match misplaced_children(elements) {
        Some(element) => Err(TreeError::NotAContainer {
            id: element.id.clone(),
            kind: element.kind.to_string(),
        }),
        None => Ok(()),
    }
}

/// Pre-order traversal yielding `(element, depth)`
pub struct Walk<'a> {
    stack: Vec<(&'a PageElement, usize)>,
}

impl<'a> Walk<'a> {
    pub fn new(elements: &'a [PageElement]) -> Self {
        Self {
            stack: elements.iter().rev().map(|e| (e, 0)).collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a PageElement, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (element, depth) = self.stack.pop()?;
        self.stack
            .extend(element.children().iter().rev().map(|c| (c, depth + 1)));
        Some((element, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;

    fn sample() -> Vec<PageElement> {
        vec![
            PageElement::new("section", ElementKind::Section)
                .with_child(PageElement::new("title", ElementKind::Text).with_content("Hi"))
                .with_child(
                    PageElement::new("grid", ElementKind::Grid)
                        .with_child(PageElement::new("col-a", ElementKind::Container))
                        .with_child(PageElement::new("col-b", ElementKind::Container)),
                ),
            PageElement::new("footer", ElementKind::Text),
        ]
    }

    #[test]
    fn test_find_nested() {
        let elements = sample();
        assert_eq!(find_by_id(&elements, "col-b").unwrap().kind, ElementKind::Container);
        assert!(find_by_id(&elements, "missing").is_none());
    }

    #[test]
    fn test_locate() {
        let elements = sample();
        assert_eq!(
            locate(&elements, "col-b"),
            Some(Location {
                parent_id: Some("grid".to_string()),
                index: 1
            })
        );
        assert_eq!(locate(&elements, "footer"), Some(Location::root(1)));
    }

    #[test]
    fn test_remove_returns_subtree() {
        let mut elements = sample();
        let (removed, location) = remove_by_id(&mut elements, "grid").unwrap();

        assert_eq!(removed.subtree_len(), 3);
        assert_eq!(location.parent_id.as_deref(), Some("section"));
        assert!(find_by_id(&elements, "col-a").is_none());
    }

    #[test]
    fn test_insert_into_leaf_is_rejected() {
        let mut elements = sample();
        let err = insert_at(
            &mut elements,
            Some("title"),
            None,
            PageElement::new("x", ElementKind::Text),
        )
        .unwrap_err();

        assert!(matches!(err, TreeError::NotAContainer { .. }));
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut elements = sample();
        let location = insert_at(
            &mut elements,
            Some("grid"),
            Some(99),
            PageElement::new("col-c", ElementKind::Container),
        )
        .unwrap();

        assert_eq!(location.index, 2);
        assert_eq!(find_by_id(&elements, "grid").unwrap().children()[2].id, "col-c");
    }

    #[test]
    fn test_walk_is_preorder() {
        let elements = sample();
        let order: Vec<(&str, usize)> = Walk::new(&elements)
            .map(|(e, depth)| (e.id.as_str(), depth))
            .collect();

        assert_eq!(
            order,
            vec![
                ("section", 0),
                ("title", 1),
                ("grid", 1),
                ("col-a", 2),
                ("col-b", 2),
                ("footer", 0),
            ]
        );
    }

    #[test]
    fn test_duplicate_detection() {
        let mut elements = sample();
        elements.push(PageElement::new("col-a", ElementKind::Text));

        assert_eq!(duplicate_ids(&elements), vec!["col-a".to_string()]);
        assert_eq!(
            validate(&elements),
            Err(TreeError::DuplicateId("col-a".to_string()))
        );
    }

    #[test]
    fn test_leaf_with_children_is_rejected() {
        let mut elements = sample();
        elements[0].children.as_mut().unwrap()[0]
            .children
            .get_or_insert_with(Vec::new)
            .push(PageElement::new("hidden", ElementKind::Button));

        assert_eq!(misplaced_children(&elements).map(|e| e.id.as_str()), Some("title"));
        assert_eq!(
            validate(&elements),
            Err(TreeError::NotAContainer {
                id: "title".to_string(),
                kind: "text".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_kind_keeps_children() {
        let elements = vec![PageElement::new("w", ElementKind::Unknown("carousel".into()))
            .with_child(PageElement::new("slide", ElementKind::Image))];

        assert!(misplaced_children(&elements).is_none());
        assert_eq!(validate(&elements), Ok(()));
    }

    #[test]
    fn test_reassign_ids_covers_descendants() {
        let mut elements = sample();
        let mut ids = SequentialIds::new("n");
        reassign_ids(&mut elements[0], &mut ids);

        let renamed: Vec<&str> = Walk::new(&elements[..1]).map(|(e, _)| e.id.as_str()).collect();
        assert_eq!(renamed, vec!["n-1", "n-2", "n-3", "n-4", "n-5"]);
    }
}
