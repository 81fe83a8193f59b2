/// # llmdoc-browser CLI Interface (Module)
///
/// This module implements the CLI for llmdoc-browser: command parsing,
/// argument validation, and the async entrypoint. All business logic
/// (classification, tree building, ordering, the load pipeline) lives in the
/// `llmdoc-browser-core` crate; this module is strictly glue.
///
/// ## Commands
/// - `tree <owner/repo>`: load a repository and print its root documents and
///   the ordered `llmdoc/` hierarchy.
/// - `show <owner/repo> [path]`: print one file's content; defaults to the
///   primary root document (`claude.md`/`llms.txt`) when no path is given.
/// - `login [--code <code>]`: print the authorize URL, or exchange a
///   callback code for a token and persist it.
/// - `logout`: clear the persisted token.
///
/// For programmatic/integration use, call [`run`] with a constructed [`Cli`].
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use llmdoc_browser_core::contract::{AuthState, HostError, TokenStore};
use llmdoc_browser_core::session::{Commit, RepoSession, RepoView};
use llmdoc_browser_core::tree::{find_node, NodeKind, TreeNode};

use crate::auth::{self, FileTokenStore};
use crate::github::GitHubClient;

/// CLI for llmdoc-browser: read a repository's LLM docs from the terminal.
#[derive(Parser)]
#[clap(
    name = "llmdoc-browser",
    version,
    about = "Browse a GitHub repository's LLM-oriented documentation (claude.md, agents.md, llmdoc/)"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the ordered documentation tree of a repository
    Tree {
        /// Repository in owner/repo form
        repo: String,
    },
    /// Print one documentation file's content
    Show {
        /// Repository in owner/repo form
        repo: String,
        /// Full path of the file; defaults to the primary root document
        path: Option<String>,
    },
    /// Print the GitHub authorize URL, or exchange a callback code for a token
    Login {
        /// Authorization code from the OAuth callback
        #[clap(long)]
        code: Option<String>,
    },
    /// Forget the persisted token
    Logout,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Tree { repo } => {
            let (owner, repo) = split_repo(&repo)?;
            let view = load_view(owner, repo).await?;
            print_view(&view);
            Ok(())
        }
        Commands::Show { repo, path } => {
            let (owner, repo) = split_repo(&repo)?;
            show_file(owner, repo, path.as_deref()).await
        }
        Commands::Login { code } => login(code.as_deref()).await,
        Commands::Logout => {
            let store = FileTokenStore::from_env();
            store
                .clear()
                .map_err(|e| anyhow!("failed to clear token store: {e}"))?;
            println!("Logged out.");
            Ok(())
        }
    }
}

/// Splits an `owner/repo` argument, rejecting anything else.
fn split_repo(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => bail!("expected repository in owner/repo form, got {arg:?}"),
    }
}

fn authenticated_client() -> Result<GitHubClient> {
    let store = FileTokenStore::from_env();
    let token = store.read().map(|state| state.token);
    GitHubClient::new(token).map_err(|e| anyhow!("failed to build GitHub client: {e}"))
}

async fn load_view(owner: &str, repo: &str) -> Result<RepoView> {
    let client = authenticated_client()?;
    let session = RepoSession::new(client);
    match session.load(owner, repo).await {
        Ok(Commit::Committed(view)) => Ok(view),
        // A single sequential load cannot be superseded.
        Ok(Commit::Superseded) => bail!("repository load was superseded"),
        Err(e) => Err(user_message(e)),
    }
}

/// Maps typed host failures to the user-visible states of the UI.
fn user_message(e: HostError) -> anyhow::Error {
    match e {
        HostError::NotFound => anyhow!("repository not found"),
        HostError::RateLimited => {
            anyhow!("rate limited by GitHub; run `llmdoc-browser login` to raise the limit")
        }
        other => anyhow!(other),
    }
}

fn print_view(view: &RepoView) {
    let info = &view.info;
    println!("{}/{} ({})", info.owner, info.repo, info.default_branch);
    if let Some(description) = &info.description {
        println!("{description}");
    }
    println!();

    if !view.has_content {
        println!("No LLM documentation found (claude.md, agents.md or llmdoc/).");
        return;
    }

    if let Some(primary) = &view.tabs.root_primary {
        println!("* {}", primary.path);
    }
    if let Some(secondary) = &view.tabs.root_secondary {
        println!("* {}", secondary.path);
    }
    if !view.tree.is_empty() {
        println!("* llmdoc/");
        print_level(&view.tree, 1);
    }
}

fn print_level(nodes: &[TreeNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node.kind {
            NodeKind::Folder => {
                println!("{indent}{}/", node.name);
                if let Some(children) = &node.children {
                    print_level(children, depth + 1);
                }
            }
            NodeKind::File => println!("{indent}{}", node.name),
        }
    }
}

async fn show_file(owner: &str, repo: &str, path: Option<&str>) -> Result<()> {
    let client = authenticated_client()?;
    let session = RepoSession::new(client);
    let view = match session.load(owner, repo).await {
        Ok(Commit::Committed(view)) => view,
        Ok(Commit::Superseded) => bail!("repository load was superseded"),
        Err(e) => return Err(user_message(e)),
    };

    let (path, sha) = resolve_file(&view, path)?;
    info!(path = %path, "Fetching selected file");

    match session.select_file(owner, repo, &path, &sha).await {
        Commit::Committed(file) => {
            println!("{}", file.content);
            Ok(())
        }
        Commit::Superseded => bail!("file fetch was superseded"),
    }
}

/// Resolves the requested path (or the default primary document) to a
/// (path, sha) pair, searching the root tabs first and then the doc tree.
fn resolve_file(view: &RepoView, path: Option<&str>) -> Result<(String, String)> {
    let tabs = &view.tabs;

    let path = match path {
        Some(p) => p,
        None => {
            let primary = tabs
                .root_primary
                .as_ref()
                .context("no path given and the repository has no claude.md/llms.txt")?;
            return Ok((primary.path.clone(), primary.sha.clone()));
        }
    };

    for root in [&tabs.root_primary, &tabs.root_secondary].into_iter().flatten() {
        if root.path == path {
            return Ok((root.path.clone(), root.sha.clone()));
        }
    }

    let node = find_node(&view.tree, path)
        .with_context(|| format!("no documentation file at {path:?}"))?;
    if node.kind != NodeKind::File {
        bail!("{path:?} is a folder, not a file");
    }
    let sha = node
        .sha
        .clone()
        .with_context(|| format!("{path:?} has no content identifier"))?;
    Ok((node.path.clone(), sha))
}

async fn login(code: Option<&str>) -> Result<()> {
    match code {
        None => {
            let client_id = std::env::var("GITHUB_CLIENT_ID")
                .map_err(|_| anyhow!("GITHUB_CLIENT_ID missing in environment"))?;
            let redirect_uri = std::env::var("GITHUB_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8787/callback".to_string());
            let url = auth::login_url(&client_id, &redirect_uri, "/")
                .map_err(|e| anyhow!("failed to build login URL: {e}"))?;
            println!("Open this URL to authorize, then rerun with --code <code>:");
            println!("{url}");
            Ok(())
        }
        Some(code) => {
            let http = reqwest::Client::builder()
                .user_agent(concat!("llmdoc-browser/", env!("CARGO_PKG_VERSION")))
                .build()?;
            let token = auth::exchange_code(&http, code)
                .await
                .map_err(|e| anyhow!("token exchange failed: {e}"))?;
            let user = match auth::fetch_current_user(&http, &token).await {
                Ok(user) => Some(user),
                Err(e) => {
                    // The token is still usable without a profile.
                    tracing::warn!(error = %e, "Could not fetch user profile");
                    None
                }
            };

            let store = FileTokenStore::from_env();
            store
                .write(&AuthState {
                    token,
                    user: user.clone(),
                })
                .map_err(|e| anyhow!("failed to persist token: {e}"))?;

            match user {
                Some(user) => println!("Logged in as {}.", user.login),
                None => println!("Logged in."),
            }
            Ok(())
        }
    }
}
