#![doc = "GitHub API client: implements the core's RepoHost trait over the REST v3 API."]
//
//! # GitHub Integration (CLI <-> Core)
//!
//! This module bridges the [`RepoHost`] abstraction from
//! `llmdoc-browser-core` to the real GitHub REST API via reqwest. It covers
//! the three calls one repository view needs:
//!
//! - repository metadata (`/repos/{owner}/{repo}`) for the default branch,
//! - the full recursive tree (`/git/trees/{branch}?recursive=1`),
//! - blob content by sha (`/git/blobs/{sha}`), base64-decoded to UTF-8 text.
//!
//! HTTP status codes are mapped onto [`HostError`] variants here, so the core
//! and the CLI never inspect transport details: 404 is "repository not
//! found", 403 is the unauthenticated rate limit, anything else non-success
//! is a generic HTTP failure. An optional bearer token raises the rate limit.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, info};

use llmdoc_browser_core::contract::{EntryKind, HostError, RepoHost, RepoInfo, TreeEntry};

const API_BASE: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("llmdoc-browser/", env!("CARGO_PKG_VERSION"));

/// Repository metadata payload, subset of the GitHub response.
#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
    description: Option<String>,
}

/// One row of the recursive tree payload.
#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    item_type: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
}

/// Blob payload; `content` is base64 with embedded newlines.
#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
}

/// reqwest-backed [`RepoHost`] for the GitHub REST API.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    /// Builds a client with an optional bearer token.
    pub fn new(token: Option<String>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        info!(authenticated = token.is_some(), "Initialized GitHub client");
        Ok(Self { client, token })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, HostError> {
        debug!(url, "GitHub API request");
        let mut request = self.client.get(url).header("Accept", ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                404 => HostError::NotFound,
                403 => HostError::RateLimited,
                code => HostError::Http(code),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HostError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, HostError> {
        let url = format!("{API_BASE}/repos/{owner}/{repo}");
        let data: RepoResponse = self.get_json(&url).await?;
        Ok(RepoInfo {
            owner: owner.to_string(),
            repo: repo.to_string(),
            default_branch: data.default_branch,
            description: data.description,
        })
    }

    async fn repo_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<TreeEntry>, HostError> {
        let url = format!("{API_BASE}/repos/{owner}/{repo}/git/trees/{branch}?recursive=1");
        let data: TreeResponse = self.get_json(&url).await?;
        info!(owner, repo, branch, entries = data.tree.len(), "Fetched repository tree");
        Ok(data
            .tree
            .into_iter()
            .map(|item| TreeEntry {
                path: item.path,
                kind: if item.item_type == "tree" {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
                sha: item.sha,
            })
            .collect())
    }

    async fn blob_text(&self, owner: &str, repo: &str, sha: &str) -> Result<String, HostError> {
        let url = format!("{API_BASE}/repos/{owner}/{repo}/git/blobs/{sha}");
        let data: BlobResponse = self.get_json(&url).await?;
        decode_blob_content(&data.content)
    }
}

/// Decodes GitHub's base64 blob payload (newline-separated chunks) to UTF-8.
pub fn decode_blob_content(content: &str) -> Result<String, HostError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| HostError::Decode(format!("invalid base64 blob: {e}")))?;
    String::from_utf8(bytes).map_err(|e| HostError::Decode(format!("blob is not UTF-8: {e}")))
}
