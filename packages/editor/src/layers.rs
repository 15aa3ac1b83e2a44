//! Flattened outline of the page tree for the layers panel

use pagecraft_model::PageElement;
use serde::Serialize;
use std::collections::HashSet;

const LABEL_PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRow {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub depth: usize,
    pub selected: bool,
    pub has_children: bool,
    pub expanded: bool,
}

/// `type` alone, or `type - <first 20 chars of content>...`
pub fn layer_label(element: &PageElement) -> String {
    match element.content_text().filter(|t| !t.is_empty()) {
        Some(text) if text.chars().count() > LABEL_PREVIEW_CHARS => {
            let preview: String = text.chars().take(LABEL_PREVIEW_CHARS).collect();
            format!("{} - {}...", element.kind, preview)
        }
        Some(text) => format!("{} - {}", element.kind, text),
        None => element.kind.to_string(),
    }
}

fn matches(element: &PageElement, needle: &str) -> bool {
    element.kind.as_str().to_lowercase().contains(needle)
        || element
            .content_text()
            .is_some_and(|t| t.to_lowercase().contains(needle))
}

fn subtree_matches(element: &PageElement, needle: &str) -> bool {
    matches(element, needle) || element.children().iter().any(|c| subtree_matches(c, needle))
}

/// Rows in document order.
///
/// Children appear only under expanded nodes. A non-empty `search` keeps
/// nodes whose type or text contains it (case-insensitive) plus their
/// ancestors, and opens those ancestors so every match is visible.
pub fn layer_rows(
    elements: &[PageElement],
    selected: Option<&str>,
    expanded: &HashSet<String>,
    search: &str,
) -> Vec<LayerRow> {
    let needle = search.trim().to_lowercase();
    let mut rows = Vec::new();
    push_rows(elements, 0, selected, expanded, &needle, &mut rows);
    rows
}

fn push_rows(
    elements: &[PageElement],
    depth: usize,
    selected: Option<&str>,
    expanded: &HashSet<String>,
    needle: &str,
    rows: &mut Vec<LayerRow>,
) {
    for element in elements {
        let searching = !needle.is_empty();
        if searching && !subtree_matches(element, needle) {
            continue;
        }

        let has_children = !element.children().is_empty();
        let descendant_match =
            searching && element.children().iter().any(|c| subtree_matches(c, needle));
        let is_expanded = has_children && (expanded.contains(&element.id) || descendant_match);

        rows.push(LayerRow {
            id: element.id.clone(),
            kind: element.kind.to_string(),
            label: layer_label(element),
            depth,
            selected: selected == Some(element.id.as_str()),
            has_children,
            expanded: is_expanded,
        });

        if is_expanded {
            push_rows(element.children(), depth + 1, selected, expanded, needle, rows);
        }
    }
}
