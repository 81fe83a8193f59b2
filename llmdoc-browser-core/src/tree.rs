//! Reconstruction of the hierarchical documentation tree from flat paths.
//!
//! The hosting API returns the `llmdoc/` subtree as a flat path list. This
//! module rebuilds the folder hierarchy from it: entries are pre-sorted by
//! path (so a directory entry is always processed before anything inside it),
//! the fixed `llmdoc/` prefix is stripped, and each node is linked to its
//! parent by path membership. Intermediate directories the listing omits are
//! synthesized as container-only folder nodes, so no entry is ever dropped.
//!
//! Building never fails: malformed or empty input yields an empty or partial
//! hierarchy. Display order is a separate concern, see [`crate::order`].

use tracing::debug;

use crate::contract::{EntryKind, TreeEntry};

/// Path prefix of the documentation subtree.
pub const DOC_PREFIX: &str = "llmdoc/";

/// A node in the reconstructed documentation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeNode {
    /// Final path segment, used for display and ordering.
    pub name: String,
    /// Original full path; unique across the hierarchy and used as the
    /// identity and content-fetch key.
    pub path: String,
    pub kind: NodeKind,
    /// Content identifier for files; `None` for synthesized folders.
    pub sha: Option<String>,
    /// `Some` for folders (possibly empty), `None` for files.
    pub children: Option<Vec<TreeNode>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// Builds the documentation hierarchy from the flat `llmdoc/` entry list and
/// returns its roots, unordered.
pub fn build_tree(doc_entries: &[TreeEntry]) -> Vec<TreeNode> {
    let mut sorted: Vec<&TreeEntry> = doc_entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut roots: Vec<TreeNode> = Vec::new();
    for entry in sorted {
        let relative = entry.path.strip_prefix(DOC_PREFIX).unwrap_or(&entry.path);
        if relative.is_empty() {
            continue;
        }
        let segments: Vec<&str> = relative.split('/').collect();
        insert(&mut roots, DOC_PREFIX.trim_end_matches('/'), &segments, entry);
    }

    debug!(
        entries = doc_entries.len(),
        roots = roots.len(),
        "Built documentation tree"
    );
    roots
}

/// Descends from `siblings` along `segments`, synthesizing missing folders,
/// and materializes `entry` at the terminal segment.
fn insert(siblings: &mut Vec<TreeNode>, parent_path: &str, segments: &[&str], entry: &TreeEntry) {
    let name = segments[0];
    let path = format!("{parent_path}/{name}");

    if segments.len() == 1 {
        if let Some(existing) = siblings.iter_mut().find(|n| n.path == path) {
            // A deeper path synthesized this folder first, or the listing
            // holds a duplicate; attach the sha and keep existing children.
            if existing.sha.is_none() {
                existing.sha = Some(entry.sha.clone());
            }
            return;
        }
        let (kind, children) = match entry.kind {
            EntryKind::Directory => (NodeKind::Folder, Some(Vec::new())),
            EntryKind::File => (NodeKind::File, None),
        };
        siblings.push(TreeNode {
            name: name.to_string(),
            path,
            kind,
            sha: Some(entry.sha.clone()),
            children,
        });
        return;
    }

    let idx = match siblings.iter().position(|n| n.path == path) {
        Some(idx) => idx,
        None => {
            debug!(path = %path, "Synthesizing folder missing from listing");
            siblings.push(TreeNode {
                name: name.to_string(),
                path: path.clone(),
                kind: NodeKind::Folder,
                sha: None,
                children: Some(Vec::new()),
            });
            siblings.len() - 1
        }
    };
    let node = &mut siblings[idx];
    // A file path with descendants can only come from a malformed listing;
    // degrade by treating it as a container rather than dropping the child.
    let children = node.children.get_or_insert_with(Vec::new);
    insert(children, &path, &segments[1..], entry);
}

/// Finds the node carrying `path`, searching the whole hierarchy.
pub fn find_node<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if let Some(children) = &node.children {
            if let Some(found) = find_node(children, path) {
                return Some(found);
            }
        }
    }
    None
}
