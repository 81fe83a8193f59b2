//! Authentication: file-backed token store, OAuth login URL and code
//! exchange against GitHub's token endpoint.
//!
//! The exchange uses client credentials held in the environment
//! (`GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`); the secret never appears in
//! any URL handed to the user. The token store is the explicit read/write/
//! clear key-value abstraction the core's [`TokenStore`] trait describes,
//! persisted as a small JSON file.
//!
//! Store location: `LLMDOC_TOKEN_FILE` if set, else
//! `$HOME/.llmdoc-browser/auth.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use llmdoc_browser_core::contract::{AuthState, HostUser, TokenStore};

const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
const AUTHORIZE_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
const USER_ENDPOINT: &str = "https://api.github.com/user";

/// JSON-file-backed [`TokenStore`].
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves the store path from `LLMDOC_TOKEN_FILE`, falling back to
    /// `$HOME/.llmdoc-browser/auth.json`.
    pub fn from_env() -> Self {
        let path = match std::env::var("LLMDOC_TOKEN_FILE") {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                Path::new(&home).join(".llmdoc-browser").join("auth.json")
            }
        };
        debug!(path = %path.display(), "Resolved token store path");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<AuthState> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<AuthState>(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                // A corrupt store behaves like an empty one.
                warn!(path = %self.path.display(), error = ?e, "Ignoring unreadable token store");
                None
            }
        }
    }

    fn write(&self, state: &AuthState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "Persisted auth state");
        Ok(())
    }

    fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared auth state");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// Builds the GitHub authorize URL the user opens in a browser.
///
/// `state` carries the path to return to after the callback, as the original
/// redirect flow does.
pub fn login_url(
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let url = reqwest::Url::parse_with_params(
        AUTHORIZE_ENDPOINT,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("scope", "public_repo"),
            ("state", state),
        ],
    )?;
    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchanges an OAuth authorization code for an access token.
///
/// Client credentials come from `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET`;
/// both must be set or the exchange fails before any request is made.
pub async fn exchange_code(
    client: &reqwest::Client,
    code: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if code.is_empty() {
        return Err("missing code parameter".into());
    }
    let client_id = std::env::var("GITHUB_CLIENT_ID")
        .map_err(|_| "GITHUB_CLIENT_ID missing in environment")?;
    let client_secret = std::env::var("GITHUB_CLIENT_SECRET")
        .map_err(|_| "GITHUB_CLIENT_SECRET missing in environment")?;

    info!("Exchanging authorization code for access token");
    let response = client
        .post(TOKEN_ENDPOINT)
        .header("Accept", "application/json")
        .json(&serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
        }))
        .send()
        .await?;

    let data: TokenResponse = response.json().await?;

    if let Some(err) = data.error {
        let description = data.error_description.unwrap_or(err);
        error!(error = %description, "Token exchange rejected by provider");
        return Err(description.into());
    }

    match data.access_token {
        Some(token) => Ok(token),
        None => Err("no access token received".into()),
    }
}

/// Fetches the authenticated user's profile for display and persistence.
pub async fn fetch_current_user(
    client: &reqwest::Client,
    token: &str,
) -> Result<HostUser, Box<dyn std::error::Error + Send + Sync>> {
    let response = client.get(USER_ENDPOINT).bearer_auth(token).send().await?;
    if !response.status().is_success() {
        return Err(format!("failed to fetch user: status {}", response.status()).into());
    }
    Ok(response.json::<HostUser>().await?)
}
