//! Markup tree
//!
//! This module defines the element model rendered by the serializer. The
//! tree is built bottom-up by the transform, reordered in place, and then
//! consumed top-down by [`crate::serialize`].

use indexmap::IndexMap;

/// Attribute keys that describe node structure rather than markup attributes.
///
/// Entries with these keys in [`MarkupNode::attributes`] are never emitted;
/// the corresponding concepts have dedicated fields.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "tagName",
    "className",
    "class",
    "style",
    "data",
    "label",
    "innerText",
    "innerMarkup",
    "children",
];

/// Attributes rendered as `key="key"` when truthy and omitted otherwise.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &["disabled", "checked", "readonly"];

/// An attribute value before string coercion
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Literal string value
    Text(String),
    /// Numeric value (geometry, widths); zero renders as `"0"`
    Number(f64),
    /// Boolean flag
    Flag(bool),
}

impl AttrValue {
    /// Coerce the value to its attribute string
    pub fn render(&self) -> String {
        match self {
            AttrValue::Text(text) => text.clone(),
            // Covers -0 as well
            AttrValue::Number(number) if *number == 0.0 => "0".to_string(),
            AttrValue::Number(number) => number.to_string(),
            AttrValue::Flag(flag) => flag.to_string(),
        }
    }

    /// Whether the value counts as set for boolean attributes
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Text(text) => !text.is_empty(),
            AttrValue::Number(number) => *number != 0.0 && !number.is_nan(),
            AttrValue::Flag(flag) => *flag,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Number(f64::from(value))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Flag(value)
    }
}

/// A child of a markup element
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Nested element
    Node(MarkupNode),
    /// Pre-rendered markup, emitted verbatim
    Raw(String),
}

impl Child {
    /// The nested element, if this child is one
    pub fn as_node(&self) -> Option<&MarkupNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Raw(_) => None,
        }
    }

    /// Mutable access to the nested element, if this child is one
    pub fn as_node_mut(&mut self) -> Option<&mut MarkupNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Raw(_) => None,
        }
    }
}

impl From<MarkupNode> for Child {
    fn from(node: MarkupNode) -> Self {
        Child::Node(node)
    }
}

/// A markup element.
///
/// Content resolution at render time is ordered: `inner_markup`, then
/// `inner_text` (or its alias `label`), then `children`. A node with text
/// never renders its children.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupNode {
    /// Element name; the serializer falls back to a generic tag when unset
    pub tag_name: Option<String>,

    /// Plain attributes in insertion order
    pub attributes: IndexMap<String, AttrValue>,

    /// Inline style properties in insertion order
    pub style: IndexMap<String, String>,

    /// Rendered as the `class` attribute
    pub class_name: Option<String>,

    /// Rendered as one `data-<key>` attribute per entry
    pub data: IndexMap<String, AttrValue>,

    /// Child elements or raw markup, in paint order once normalized
    pub children: Vec<Child>,

    /// Text content, escaped on output
    pub inner_text: Option<String>,

    /// Alias for `inner_text`, used only when `inner_text` is empty
    pub label: Option<String>,

    /// Raw inner markup, emitted verbatim
    pub inner_markup: Option<String>,

    /// `false` suppresses the node and its whole subtree
    pub is_valid: bool,

    /// `false` renders the node with `display: none`
    pub is_visible: bool,
}

impl Default for MarkupNode {
    fn default() -> Self {
        Self {
            tag_name: None,
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            class_name: None,
            data: IndexMap::new(),
            children: Vec::new(),
            inner_text: None,
            label: None,
            inner_markup: None,
            is_valid: true,
            is_visible: true,
        }
    }
}

impl MarkupNode {
    /// Create an element with the given tag
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: Some(tag_name.to_string()),
            ..Default::default()
        }
    }

    /// Create a node that renders nothing.
    ///
    /// Used for hidden source subtrees: the node keeps its slot in the
    /// parent's child list but contributes no output.
    pub fn placeholder() -> Self {
        Self {
            tag_name: Some("div".to_string()),
            is_valid: false,
            is_visible: false,
            ..Default::default()
        }
    }

    /// Create a text element
    pub fn text(tag_name: &str, text: &str) -> Self {
        Self {
            tag_name: Some(tag_name.to_string()),
            inner_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Check whether this node has the given tag name
    pub fn is_tag(&self, tag_name: &str) -> bool {
        self.tag_name.as_deref() == Some(tag_name)
    }

    /// Set the tag name
    pub fn set_tag(&mut self, tag_name: &str) {
        self.tag_name = Some(tag_name.to_string());
    }

    /// Set an attribute, keeping its original position if already present
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Set an inline style property
    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    /// Set a `data-*` entry
    pub fn set_data(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Append a class to `class_name`
    pub fn add_class(&mut self, class: &str) {
        match self.class_name {
            Some(ref mut existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => self.class_name = Some(class.to_string()),
        }
    }

    /// Add a child element
    pub fn add_child(&mut self, child: MarkupNode) {
        self.children.push(Child::Node(child));
    }

    /// Add pre-rendered markup as a child
    pub fn add_raw(&mut self, markup: &str) {
        self.children.push(Child::Raw(markup.to_string()));
    }

    /// Iterate over element children, skipping raw markup
    pub fn element_children(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// Check whether this node carries any children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
