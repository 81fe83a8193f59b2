//! High-level pipeline: orchestrates metadata → tree → classify → build → order
//! for one repository view, plus a session wrapper with generation-guarded
//! commits so superseded loads never overwrite newer state.
//!
//! # Major Types
//! - [`RepoView`]: everything derived from one repository load
//! - [`RepoSession`]: owns the committed view and selected-file slot
//! - [`Commit`]: whether a resolved operation was committed or discarded
//!
//! # Responsibilities
//! - Two sequential host fetches (metadata, then the full tree at the default
//!   branch), then the pure classify→build→order pipeline, synchronously
//! - No retries, no backoff, no timeouts: a failed fetch is terminal for that
//!   operation and surfaces as a typed [`HostError`]
//! - A failed single-file fetch degrades to a placeholder string in place of
//!   content without invalidating the rest of the hierarchy
//!
//! # Cancellation
//! Each load and each file selection bumps an atomic generation counter and
//! re-checks it after its awaits resolve; a stale generation discards the
//! result instead of committing it. Loading a new repository also invalidates
//! any in-flight file fetch.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::contract::{HostError, RepoHost, RepoInfo};
use crate::docs::{extract_docs, DocTabs};
use crate::order::sort_tree;
use crate::tree::{build_tree, TreeNode};

/// Everything the presentation layer needs from one repository load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoView {
    pub info: RepoInfo,
    pub tabs: DocTabs,
    /// Ordered roots of the `llmdoc/` hierarchy.
    pub tree: Vec<TreeNode>,
    pub has_content: bool,
}

/// A selected file's resolved content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub path: String,
    pub content: String,
}

/// Outcome of a generation-guarded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit<T> {
    /// The result was committed to session state.
    Committed(T),
    /// A newer operation started before this one resolved; the result was
    /// discarded without touching session state.
    Superseded,
}

/// Placeholder shown in place of content when a single file fetch fails.
pub const FILE_LOAD_FAILED: &str = "Failed to load file content";

/// Loads one repository's documentation view: metadata, full recursive tree,
/// then classification, tree building and ordering.
pub async fn load_repository<H>(host: &H, owner: &str, repo: &str) -> Result<RepoView, HostError>
where
    H: RepoHost + ?Sized,
{
    info!(owner, repo, "Loading repository documentation");

    let info = host.repo_info(owner, repo).await?;
    let entries = host
        .repo_tree(owner, repo, &info.default_branch)
        .await?;

    let tabs = extract_docs(&entries);
    let mut tree = build_tree(&tabs.doc_entries);
    sort_tree(&mut tree);
    let has_content = tabs.has_content();

    info!(
        owner,
        repo,
        branch = %info.default_branch,
        entries = entries.len(),
        doc_roots = tree.len(),
        has_content,
        "Repository documentation loaded"
    );

    Ok(RepoView {
        info,
        tabs,
        tree,
        has_content,
    })
}

/// Holds the committed view and selected file for one browsing session.
///
/// Each operation owns its own result until it commits; two in-flight
/// operations never write shared state concurrently.
pub struct RepoSession<H: RepoHost> {
    host: H,
    load_gen: AtomicU64,
    file_gen: AtomicU64,
    view: Mutex<Option<RepoView>>,
    selected: Mutex<Option<FileView>>,
}

impl<H: RepoHost> RepoSession<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            load_gen: AtomicU64::new(0),
            file_gen: AtomicU64::new(0),
            view: Mutex::new(None),
            selected: Mutex::new(None),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Loads a repository and commits the view, unless a newer load started
    /// in the meantime. A terminal fetch error clears the committed view.
    pub async fn load(&self, owner: &str, repo: &str) -> Result<Commit<RepoView>, HostError> {
        let generation = self.load_gen.fetch_add(1, Ordering::SeqCst) + 1;
        // Switching repositories invalidates any in-flight file fetch too.
        self.file_gen.fetch_add(1, Ordering::SeqCst);

        let result = load_repository(&self.host, owner, repo).await;

        if self.load_gen.load(Ordering::SeqCst) != generation {
            debug!(owner, repo, "Discarding superseded repository load");
            return Ok(Commit::Superseded);
        }

        match result {
            Ok(view) => {
                *self.view.lock().await = Some(view.clone());
                *self.selected.lock().await = None;
                Ok(Commit::Committed(view))
            }
            Err(e) => {
                error!(owner, repo, error = %e, "Repository load failed");
                *self.view.lock().await = None;
                *self.selected.lock().await = None;
                Err(e)
            }
        }
    }

    /// Fetches one file's content by sha and commits it as the selected file,
    /// unless a newer selection (or repository load) started in the meantime.
    /// A fetch failure commits a placeholder string instead of content.
    pub async fn select_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
    ) -> Commit<FileView> {
        let generation = self.file_gen.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.host.blob_text(owner, repo, sha).await;

        if self.file_gen.load(Ordering::SeqCst) != generation {
            debug!(path, "Discarding superseded file fetch");
            return Commit::Superseded;
        }

        let content = match result {
            Ok(text) => text,
            Err(e) => {
                error!(path, error = %e, "Failed to load file content");
                FILE_LOAD_FAILED.to_string()
            }
        };

        let view = FileView {
            path: path.to_string(),
            content,
        };
        *self.selected.lock().await = Some(view.clone());
        Commit::Committed(view)
    }

    /// The committed repository view, if a load has succeeded.
    pub async fn view(&self) -> Option<RepoView> {
        self.view.lock().await.clone()
    }

    /// The committed selected file, if any.
    pub async fn selected(&self) -> Option<FileView> {
        self.selected.lock().await.clone()
    }
}
