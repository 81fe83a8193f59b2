//! Classification of a repository's flat tree listing into its LLM-doc parts.
//!
//! A single pass over the entry list splits out the special root documents
//! (`claude.md`/`llms.txt` and `agents.md`) and everything under the `llmdoc/`
//! prefix. Entries matching none of the predicates play no further role.

use tracing::debug;

use crate::contract::TreeEntry;

/// The recognised documentation surfaces of one repository snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTabs {
    /// Root-level `claude.md`, or `llms.txt` when no `claude.md` exists.
    pub root_primary: Option<TreeEntry>,
    /// Root-level `agents.md`.
    pub root_secondary: Option<TreeEntry>,
    /// Every entry under the `llmdoc/` prefix, in input order (the tree
    /// builder re-sorts these).
    pub doc_entries: Vec<TreeEntry>,
}

impl DocTabs {
    /// Whether the snapshot carries any recognised documentation at all.
    pub fn has_content(&self) -> bool {
        self.root_primary.is_some() || self.root_secondary.is_some() || !self.doc_entries.is_empty()
    }
}

/// Scans a flat entry list and extracts the special root documents and the
/// documentation subtree.
///
/// Root-document matching is case-insensitive and root-level only: a path
/// containing `/` never matches one of the three special names. The `llmdoc/`
/// prefix test is case-sensitive. When both `claude.md` and `llms.txt` exist
/// in the same snapshot, `claude.md` wins regardless of iteration order.
pub fn extract_docs(entries: &[TreeEntry]) -> DocTabs {
    let mut tabs = DocTabs::default();

    for entry in entries {
        let lower = entry.path.to_lowercase();

        if lower == "claude.md" {
            tabs.root_primary = Some(entry.clone());
        } else if lower == "llms.txt" {
            // llms.txt is the fallback primary; never displace claude.md.
            let claude_seen = tabs
                .root_primary
                .as_ref()
                .is_some_and(|e| e.path.to_lowercase() == "claude.md");
            if !claude_seen {
                tabs.root_primary = Some(entry.clone());
            }
        } else if lower == "agents.md" {
            tabs.root_secondary = Some(entry.clone());
        } else if entry.path.starts_with("llmdoc/") {
            tabs.doc_entries.push(entry.clone());
        }
    }

    debug!(
        primary = tabs.root_primary.as_ref().map(|e| e.path.as_str()),
        secondary = tabs.root_secondary.as_ref().map(|e| e.path.as_str()),
        doc_entries = tabs.doc_entries.len(),
        "Classified repository entries"
    );

    tabs
}
