//! Contains pure functions for collecting nodes along each XPath axis.
//!
//! Every collector starts from a copy of the given cursor, so the caller's
//! navigator is never moved. Results are returned in proximity order: document
//! order for forward axes, reverse document order for reverse axes.

use crate::ast::Axis;
use crate::navigator::Navigator;

pub fn collect<N: Navigator>(axis: Axis, node: &N) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::Child => collect_child_nodes(node, &mut results),
        // The navigator contract exposes no attribute positions.
        Axis::Attribute => {}
        Axis::Descendant => collect_descendant_nodes(node, &mut results),
        Axis::DescendantOrSelf => collect_descendant_or_self_nodes(node, &mut results),
        Axis::Parent => collect_parent_nodes(node, &mut results),
        Axis::Ancestor => collect_ancestor_nodes(node, &mut results),
        Axis::AncestorOrSelf => {
            results.push(node.copy());
            collect_ancestor_nodes(node, &mut results);
        }
        Axis::SelfAxis => results.push(node.copy()),
        Axis::FollowingSibling => collect_following_sibling_nodes(node, &mut results),
        Axis::PrecedingSibling => collect_preceding_sibling_nodes(node, &mut results),
        Axis::Following => collect_following_nodes(node, &mut results),
        Axis::Preceding => collect_preceding_nodes(node, &mut results),
    }
    results
}

pub fn collect_child_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    if !cursor.move_to_child() {
        return;
    }
    loop {
        results.push(cursor.copy());
        if !cursor.move_to_next() {
            break;
        }
    }
}

pub fn collect_descendant_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    if !cursor.move_to_child() {
        return;
    }
    loop {
        results.push(cursor.copy());
        if cursor.move_to_child() {
            continue;
        }
        // Climb until a next sibling exists, stopping once we are back at `node`.
        loop {
            if cursor.is_same_node(node) {
                return;
            }
            if cursor.move_to_next() {
                break;
            }
            if !cursor.move_to_parent() {
                return;
            }
        }
    }
}

pub fn collect_descendant_or_self_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    results.push(node.copy());
    collect_descendant_nodes(node, results);
}

pub fn collect_parent_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    if cursor.move_to_parent() {
        results.push(cursor);
    }
}

pub fn collect_ancestor_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    while cursor.move_to_parent() {
        results.push(cursor.copy());
    }
}

pub fn collect_following_sibling_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    while cursor.move_to_next() {
        results.push(cursor.copy());
    }
}

pub fn collect_preceding_sibling_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut cursor = node.copy();
    while cursor.move_to_previous() {
        results.push(cursor.copy());
    }
}

pub fn collect_following_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut current = node.copy();
    loop {
        let mut sibling = current.copy();
        while sibling.move_to_next() {
            collect_descendant_or_self_nodes(&sibling, results);
        }
        if !current.move_to_parent() {
            break;
        }
    }
}

pub fn collect_preceding_nodes<N: Navigator>(node: &N, results: &mut Vec<N>) {
    let mut current = node.copy();
    loop {
        let mut sibling = current.copy();
        while sibling.move_to_previous() {
            let mut subtree = Vec::new();
            collect_descendant_or_self_nodes(&sibling, &mut subtree);
            results.extend(subtree.into_iter().rev());
        }
        if !current.move_to_parent() {
            break;
        }
    }
}
