//! Display ordering for the documentation tree.
//!
//! Siblings at every level are sorted by a layered comparator tuned for
//! progressive reading: `index.md` first, overview material next, files
//! before folders, then (top level only) a fixed topic order for well-known
//! folder names, with a case-insensitive name comparison as the final
//! tie-break.

use std::cmp::Ordering;

use crate::tree::{NodeKind, TreeNode};

/// Reading order for well-known top-level folders, from introductory to
/// operational. Unknown folders rank after all of these.
const FOLDER_PRIORITY: [(&str, u32); 7] = [
    ("overview", 1),
    ("architecture", 2),
    ("guides", 3),
    ("features", 4),
    ("modules", 5),
    ("conventions", 6),
    ("sop", 7),
];

fn folder_priority(name: &str) -> u32 {
    let lower = name.to_lowercase();
    FOLDER_PRIORITY
        .iter()
        .find(|(known, _)| *known == lower)
        .map(|(_, rank)| *rank)
        .unwrap_or(99)
}

/// Sorts the hierarchy in place, recursively. The topic-priority rule applies
/// to the root level only; every deeper level uses the remaining rules.
pub fn sort_tree(roots: &mut [TreeNode]) {
    sort_level(roots, true);
}

fn sort_level(nodes: &mut [TreeNode], is_root: bool) {
    nodes.sort_by(|a, b| compare_siblings(a, b, is_root));
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            sort_level(children, false);
        }
    }
}

fn compare_siblings(a: &TreeNode, b: &TreeNode, is_root: bool) -> Ordering {
    let a_name = a.name.to_lowercase();
    let b_name = b.name.to_lowercase();

    // index.md always reads first among its siblings.
    let a_index = a_name == "index.md";
    let b_index = b_name == "index.md";
    if a_index != b_index {
        return if a_index { Ordering::Less } else { Ordering::Greater };
    }

    // Overview material comes before everything that is not.
    let a_overview = a_name.contains("overview");
    let b_overview = b_name.contains("overview");
    if a_overview != b_overview {
        return if a_overview {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Files before folders: read the level's documents, then descend.
    if a.kind != b.kind {
        return if a.kind == NodeKind::File {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    if is_root && a.kind == NodeKind::Folder {
        let rank_a = folder_priority(&a.name);
        let rank_b = folder_priority(&b.name);
        if rank_a != rank_b {
            return rank_a.cmp(&rank_b);
        }
    }

    a_name.cmp(&b_name)
}
