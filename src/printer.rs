//! Printer (C7): depth-first, indented YAML-like rendering of the
//! reshaped tree (spec.md §4.7).
//!
//! A node with display fields prints its first field as `- path.k: v`
//! and the rest as `  path.k: v`; children indent two further spaces.
//! A node with no display fields is pass-through: it extends the
//! dotted path prefix without emitting a line, so navigation-only
//! tables don't clutter the output. A node that *does* emit resets the
//! path for its own children to just their own alias - only a
//! contiguous run of pass-through ancestors accumulates into the path
//! prefix a node prints under.

use crate::reshape::ReshapedNode;

pub fn print_tree(forest: &[ReshapedNode]) -> String {
    let mut out = String::new();
    for node in forest {
        render_node(node, &[], 0, &mut out);
    }
    out
}

fn render_node(node: &ReshapedNode, path: &[String], indent: usize, out: &mut String) {
    let mut next_path = path.to_vec();
    next_path.push(node.alias.clone());

    if node.display.is_empty() {
        for child in &node.children {
            render_node(child, &next_path, indent + 2, out);
        }
        return;
    }

    let prefix = next_path.join(".");
    for (i, (name, value)) in node.display.iter().enumerate() {
        let marker = if i == 0 { "- " } else { "  " };
        out.push_str(&" ".repeat(indent));
        out.push_str(marker);
        out.push_str(&prefix);
        out.push('.');
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&value.to_string());
        out.push('\n');
    }

    for child in &node.children {
        render_node(child, &[], indent + 2, out);
    }
}
