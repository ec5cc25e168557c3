//! Markup tree serialization
//!
//! Converts markup nodes into SVG/HTML text.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::ast::{Child, MarkupNode, BOOLEAN_ATTRIBUTES, RESERVED_ATTRIBUTES};
use crate::escape::{encode_attribute, encode_text};
use crate::options::Options;

/// Serialize a node and its subtree to a markup string
pub fn serialize(node: &MarkupNode, options: &Options) -> String {
    let mut output = String::with_capacity(4096);
    serialize_node(node, options, &mut output);
    output
}

/// Serialize a node that may be absent.
///
/// A missing node renders as the empty string.
pub fn serialize_optional(node: Option<&MarkupNode>, options: &Options) -> String {
    match node {
        Some(node) => serialize(node, options),
        None => {
            log::warn!("Invalid tag: nothing to render");
            String::new()
        }
    }
}

fn serialize_node(node: &MarkupNode, options: &Options, out: &mut String) {
    if !node.is_valid {
        return;
    }

    let tag_name = node.tag_name.as_deref().unwrap_or(&options.fallback_tag);

    out.push('<');
    out.push_str(tag_name);
    serialize_attributes(node, out);

    if options.is_self_closing(tag_name) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    serialize_content(node, options, out);
    out.push_str("</");
    out.push_str(tag_name);
    out.push('>');
}

fn serialize_attributes(node: &MarkupNode, out: &mut String) {
    for (key, value) in &node.attributes {
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }

        if BOOLEAN_ATTRIBUTES.contains(&key.as_str()) {
            if value.is_truthy() {
                push_attribute(out, key, key);
            }
            continue;
        }

        push_attribute(out, key, &encode_attribute(&value.render()));
    }

    let style = effective_style(node);
    if !style.is_empty() {
        push_attribute(out, "style", &encode_attribute(&join_style(&style)));
    }

    if let Some(class_name) = node.class_name.as_deref().filter(|c| !c.is_empty()) {
        push_attribute(out, "class", &encode_attribute(class_name));
    }

    for (key, value) in &node.data {
        let name = format!("data-{}", key);
        push_attribute(out, &name, &encode_attribute(&value.render()));
    }
}

/// Style map as rendered; hidden nodes get `display: none` forced in
fn effective_style(node: &MarkupNode) -> Cow<'_, IndexMap<String, String>> {
    if node.is_visible {
        return Cow::Borrowed(&node.style);
    }

    let mut style = node.style.clone();
    style.insert("display".to_string(), "none".to_string());
    Cow::Owned(style)
}

fn join_style(style: &IndexMap<String, String>) -> String {
    style
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn push_attribute(out: &mut String, name: &str, escaped_value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(escaped_value);
    out.push('"');
}

fn serialize_content(node: &MarkupNode, options: &Options, out: &mut String) {
    if let Some(markup) = node.inner_markup.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(markup);
        return;
    }

    let text = node
        .inner_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(node.label.as_deref());

    if let Some(text) = text.filter(|t| !t.is_empty()) {
        out.push_str(&encode_text(text));
        return;
    }

    for child in &node.children {
        match child {
            Child::Node(child) => serialize_node(child, options, out),
            Child::Raw(markup) => out.push_str(markup),
        }
    }
}
