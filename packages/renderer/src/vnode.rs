use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node produced by rendering a page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        /// CSS property name → value
        styles: BTreeMap<String, String>,
        classes: Vec<String>,
        /// Id of the page element this node was rendered from (editor mode only)
        #[serde(rename = "elementId", skip_serializing_if = "Option::is_none", default)]
        element_id: Option<String>,
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },

    /// Stand-in for an element that could not be rendered. Shown inline so the
    /// rest of the page still renders.
    Placeholder {
        #[serde(rename = "elementId")]
        element_id: String,
        label: String,
        reason: String,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: Vec::new(),
            element_id: None,
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn placeholder(
        element_id: impl Into<String>,
        label: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        VNode::Placeholder {
            element_id: element_id.into(),
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    /// Add a class, ignoring duplicates
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut classes, ..
        } = self
        {
            let class = class.into();
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_element_id(mut self, id: impl Into<String>) -> Self {
        if let VNode::Element {
            element_id: ref mut node_id,
            ..
        } = self
        {
            *node_id = Some(id.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        matches!(self, VNode::Element { classes, .. } if classes.iter().any(|c| c == class))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, VNode::Placeholder { .. })
    }

    /// Find the node rendered from a page element, searching depth-first
    pub fn find_element(&self, id: &str) -> Option<&VNode> {
        match self {
            VNode::Element { element_id, .. } if element_id.as_deref() == Some(id) => Some(self),
            VNode::Placeholder { element_id, .. } if element_id == id => Some(self),
            VNode::Element { children, .. } => {
                children.iter().find_map(|child| child.find_element(id))
            }
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Placeholder { label, .. } => out.push_str(label),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Comment { .. } => {}
        }
    }
}
