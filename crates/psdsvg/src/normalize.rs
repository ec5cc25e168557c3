//! Stacking order fixes applied after the transform.
//!
//! Layered documents list the topmost layer first, while markup paints
//! later siblings on top. SVG output reverses sibling order at every
//! composite level ([`normalize`]); HTML output instead flattens the tree
//! and numbers leaves with an explicit `z-index` ([`flatten`]).

use psdsvg_core::{Child, MarkupNode};

use crate::convert::GROUP_CLASS;

/// Tag whose children are line fragments rather than stacked layers
pub const TEXT_TAG: &str = "text";

/// z-index given to the first visited node in HTML mode
pub const BASE_Z_INDEX: i64 = 10000;

/// Reverse sibling order throughout the tree, except inside text elements
pub fn normalize(node: &mut MarkupNode) {
    if node.is_tag(TEXT_TAG) || node.children.is_empty() {
        return;
    }

    node.children.reverse();

    for child in node.children.iter_mut().filter_map(Child::as_node_mut) {
        normalize(child);
    }
}

/// Hoist every leaf of `root` into its child list.
///
/// Nodes are visited depth-first in source order and each visit consumes
/// one z-index, counting down from [`BASE_Z_INDEX`]. Group containers and
/// invalid nodes are dropped from the result.
pub fn flatten(root: &mut MarkupNode) {
    let children = std::mem::take(&mut root.children);
    let mut z_index = BASE_Z_INDEX;
    let mut leaves = Vec::with_capacity(children.len());

    for child in children {
        collect_leaves(child, &mut z_index, &mut leaves);
    }

    root.children = leaves;
}

fn collect_leaves(child: Child, z_index: &mut i64, leaves: &mut Vec<Child>) {
    let mut node = match child {
        Child::Node(node) => node,
        raw @ Child::Raw(_) => {
            leaves.push(raw);
            return;
        }
    };

    let own_index = *z_index;
    *z_index -= 1;

    if !node.is_valid {
        return;
    }

    if is_group(&node) {
        for grandchild in std::mem::take(&mut node.children) {
            collect_leaves(grandchild, z_index, leaves);
        }
        return;
    }

    node.set_style("z-index", own_index.to_string());
    leaves.push(Child::Node(node));
}

fn is_group(node: &MarkupNode) -> bool {
    node.class_name
        .as_deref()
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == GROUP_CLASS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(tag: &str, name: &str) -> MarkupNode {
        let mut node = MarkupNode::new(tag);
        node.set_attr("data-node-name", name);
        node
    }

    fn names(node: &MarkupNode) -> Vec<String> {
        node.element_children()
            .map(|c| c.attr("data-node-name").map(|v| v.render()).unwrap_or_default())
            .collect()
    }

    fn group(children: Vec<MarkupNode>) -> MarkupNode {
        let mut g = MarkupNode::new("div");
        g.add_class(GROUP_CLASS);
        for child in children {
            g.add_child(child);
        }
        g
    }

    #[test]
    fn test_normalize_reverses_every_level() {
        let mut inner = named("g", "inner");
        inner.add_child(named("rect", "c"));
        inner.add_child(named("rect", "d"));

        let mut root = named("svg", "root");
        root.add_child(named("rect", "a"));
        root.add_child(inner);
        root.add_child(named("rect", "b"));

        normalize(&mut root);

        assert_eq!(names(&root), vec!["b", "inner", "a"]);
        let inner = root.element_children().nth(1).unwrap();
        assert_eq!(names(inner), vec!["d", "c"]);
    }

    #[test]
    fn test_normalize_leaves_text_alone() {
        let mut text = named("text", "t");
        text.add_child(named("tspan", "first"));
        text.add_child(named("tspan", "second"));

        let mut root = named("svg", "root");
        root.add_child(text);
        root.add_child(named("rect", "r"));

        normalize(&mut root);

        assert_eq!(names(&root), vec!["r", "t"]);
        let text = root.element_children().nth(1).unwrap();
        assert_eq!(names(text), vec!["first", "second"]);
    }

    #[test]
    fn test_normalize_twice_restores_order() {
        let mut root = named("svg", "root");
        root.add_child(named("rect", "a"));
        root.add_child(named("rect", "b"));
        let original = root.clone();

        normalize(&mut root);
        normalize(&mut root);
        assert_eq!(root, original);
    }

    #[test]
    fn test_flatten_hoists_leaves_with_z_index() {
        let mut root = named("div", "root");
        root.add_child(named("div", "a"));
        root.add_child(group(vec![named("div", "b"), named("div", "c")]));
        root.add_child(named("div", "d"));

        flatten(&mut root);

        assert_eq!(names(&root), vec!["a", "b", "c", "d"]);
        let z: Vec<&str> = root
            .element_children()
            .map(|c| c.style.get("z-index").map(String::as_str).unwrap_or(""))
            .collect();
        // The group itself consumes 9999
        assert_eq!(z, vec!["10000", "9998", "9997", "9996"]);
    }

    #[test]
    fn test_flatten_drops_invalid_nodes() {
        let mut hidden_group = group(vec![named("div", "never")]);
        hidden_group.is_valid = false;

        let mut hidden_leaf = named("div", "hidden");
        hidden_leaf.is_visible = false;

        let mut root = named("div", "root");
        root.add_child(hidden_group);
        root.add_child(hidden_leaf);

        flatten(&mut root);

        assert_eq!(names(&root), vec!["hidden"]);
        let leaf = root.element_children().next().unwrap();
        assert_eq!(leaf.style.get("z-index").map(String::as_str), Some("9999"));
    }
}
