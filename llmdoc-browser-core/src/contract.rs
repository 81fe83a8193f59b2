//! # contract: trait seams between the core pipeline and its collaborators
//!
//! This module defines the two collaborator traits the core depends on and the
//! plain data types exchanged across them:
//! - [`RepoHost`]: the content-hosting API: repository metadata, a flat
//!   recursive tree listing, and blob content by sha.
//! - [`TokenStore`]: explicitly-scoped persistence for the auth state used to
//!   raise the host's rate limit. The core only ever asks "token, or none".
//!
//! Both traits are annotated for `mockall` so consumers can generate
//! deterministic mocks for unit/integration tests, mirroring how real clients
//! (a reqwest-backed GitHub client, a file-backed token store) plug in from
//! the CLI crate.
//!
//! All methods are async and return typed errors; implementors convert
//! transport-level failures into [`HostError`] variants so callers can map
//! them to user-visible states without inspecting HTTP internals.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// One row of a repository's flat recursive file/directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TreeEntry {
    /// Full slash-separated path from the repository root.
    pub path: String,
    pub kind: EntryKind,
    /// Opaque content identifier, sufficient to fetch the blob later.
    pub sha: String,
}

/// Whether a tree entry is a file (blob) or a directory (tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Repository metadata as returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub default_branch: String,
    pub description: Option<String>,
}

/// Authenticated user profile, stored alongside the token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HostUser {
    pub login: String,
    pub avatar_url: String,
    pub name: Option<String>,
}

/// Persisted authentication state: a bearer token and the profile it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthState {
    pub token: String,
    pub user: Option<HostUser>,
}

/// Typed failure signals from the hosting API, mapped from HTTP status codes
/// by the implementor. The presentation layer translates these into
/// user-visible states (not found, rate limited, generic failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// HTTP 404: the repository does not exist or is not visible.
    NotFound,
    /// HTTP 403: the unauthenticated rate limit was exhausted.
    RateLimited,
    /// Any other non-success HTTP status.
    Http(u16),
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    Network(String),
    /// The response body could not be parsed or decoded.
    Decode(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::NotFound => write!(f, "repository not found"),
            HostError::RateLimited => write!(f, "rate limited by the hosting API"),
            HostError::Http(status) => write!(f, "hosting API returned status {status}"),
            HostError::Network(msg) => write!(f, "network error: {msg}"),
            HostError::Decode(msg) => write!(f, "failed to decode response: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Trait for the content-hosting API the browser reads from.
///
/// Implemented by the real GitHub client in the CLI crate and by mocks in
/// tests. One repository load issues `repo_info` then `repo_tree`
/// sequentially; `blob_text` is called on demand per selected file.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Fetch repository metadata (default branch, description).
    async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, HostError>;

    /// Fetch one full recursive snapshot of the repository tree at a branch,
    /// as a flat, unordered entry list.
    async fn repo_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<TreeEntry>, HostError>;

    /// Fetch a single blob's content by sha, decoded to UTF-8 text.
    async fn blob_text(&self, owner: &str, repo: &str, sha: &str) -> Result<String, HostError>;
}

/// Trait for the scoped key-value store holding auth state.
///
/// Replaces ambient globals with explicit read/write/clear operations; the
/// CLI crate provides a file-backed implementation.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TokenStore: Send + Sync {
    /// Read the persisted auth state, if any.
    fn read(&self) -> Option<AuthState>;

    /// Persist the given auth state, replacing any previous one.
    fn write(&self, state: &AuthState) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Remove any persisted auth state.
    fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
