//! Node traversal and text-extraction helpers
//!
//! Small, reusable utilities over `tree_sitter::Node`. Everything here is
//! purely structural; the effect-specific interpretation lives in the
//! `extract` module.

use tree_sitter::Node;

use super::kinds;

/// Extract the source text covered by a node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Find the first child of a specific kind
pub fn find_child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == kind {
                return Some(child);
            }
        }
    }
    None
}

/// Find all children of a specific kind
pub fn find_children_by_kind<'a>(node: &Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut children = Vec::new();
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == kind {
                children.push(child);
            }
        }
    }
    children
}

/// Collect the named children of a node
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut children = Vec::new();
    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            children.push(child);
        }
    }
    children
}

/// Find the first node in document order satisfying a predicate
pub fn find_preorder<'a, F>(node: Node<'a>, pred: &F) -> Option<Node<'a>>
where
    F: Fn(&Node<'a>) -> bool,
{
    if pred(&node) {
        return Some(node);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if let Some(found) = find_preorder(child, pred) {
                return Some(found);
            }
        }
    }
    None
}

/// Visit every node in document order
pub fn walk_preorder<'a, F>(node: Node<'a>, visit: &mut F)
where
    F: FnMut(&Node<'a>),
{
    visit(&node);
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            walk_preorder(child, visit);
        }
    }
}

/// Check if a node carries a specific modifier among its direct children
pub fn has_modifier(node: &Node, modifier_kind: &str) -> bool {
    find_child_by_kind(node, modifier_kind).is_some()
}

/// Check if a class member is static
pub fn is_static(node: &Node) -> bool {
    has_modifier(node, kinds::STATIC)
}

/// Get the name node of a class member
///
/// The grammar uses the `name` field for most member forms and `property`
/// for plain field definitions; both are tried.
pub fn member_name_node<'a>(member: &Node<'a>) -> Option<Node<'a>> {
    member
        .child_by_field_name("name")
        .or_else(|| member.child_by_field_name("property"))
        .or_else(|| find_child_by_kind(member, kinds::PROPERTY_IDENTIFIER))
}

/// Strip the surrounding quotes from a string literal node's text
pub fn string_literal_value<'a>(node: &Node, source: &'a str) -> &'a str {
    let text = node_text(node, source);
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}
