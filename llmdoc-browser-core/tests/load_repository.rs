use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use llmdoc_browser_core::contract::{
    EntryKind, HostError, MockRepoHost, RepoHost, RepoInfo, TreeEntry,
};
use llmdoc_browser_core::session::{load_repository, Commit, RepoSession, FILE_LOAD_FAILED};
use llmdoc_browser_core::tree::NodeKind;

fn file(path: &str) -> TreeEntry {
    TreeEntry {
        path: path.to_string(),
        kind: EntryKind::File,
        sha: format!("sha-{path}"),
    }
}

fn info_for(owner: &str, repo: &str) -> RepoInfo {
    RepoInfo {
        owner: owner.to_string(),
        repo: repo.to_string(),
        default_branch: "main".to_string(),
        description: None,
    }
}

#[tokio::test]
async fn load_pipeline_end_to_end() {
    let mut host = MockRepoHost::new();
    host.expect_repo_info()
        .returning(|owner, repo| Ok(info_for(owner, repo)));
    host.expect_repo_tree().returning(|_, _, branch| {
        assert_eq!(branch, "main");
        Ok(vec![
            file("agents.md"),
            file("llmdoc/overview/intro.md"),
            file("llmdoc/architecture/core.md"),
            file("llmdoc/index.md"),
        ])
    });

    let view = load_repository(&host, "octo", "docs")
        .await
        .expect("load should succeed");

    assert!(view.has_content);
    assert!(view.tabs.root_primary.is_none());
    assert_eq!(view.tabs.root_secondary.as_ref().unwrap().path, "agents.md");
    assert_eq!(view.tabs.doc_entries.len(), 3);

    let root_names: Vec<&str> = view.tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(root_names, vec!["index.md", "overview", "architecture"]);
    assert_eq!(view.tree[0].kind, NodeKind::File);

    let overview_children = view.tree[1].children.as_ref().unwrap();
    assert_eq!(overview_children[0].name, "intro.md");
    let architecture_children = view.tree[2].children.as_ref().unwrap();
    assert_eq!(architecture_children[0].name, "core.md");
}

#[tokio::test]
async fn load_uses_the_default_branch_from_metadata() {
    let mut host = MockRepoHost::new();
    host.expect_repo_info().returning(|owner, repo| {
        let mut info = info_for(owner, repo);
        info.default_branch = "develop".to_string();
        Ok(info)
    });
    host.expect_repo_tree().returning(|_, _, branch| {
        assert_eq!(branch, "develop");
        Ok(vec![])
    });

    let view = load_repository(&host, "octo", "docs").await.unwrap();
    assert!(!view.has_content);
    assert!(view.tree.is_empty());
}

#[tokio::test]
async fn metadata_errors_propagate_untouched() {
    let mut host = MockRepoHost::new();
    host.expect_repo_info()
        .returning(|_, _| Err(HostError::NotFound));

    let err = load_repository(&host, "octo", "gone").await.unwrap_err();
    assert_eq!(err, HostError::NotFound);
}

#[tokio::test]
async fn tree_fetch_errors_propagate_untouched() {
    let mut host = MockRepoHost::new();
    host.expect_repo_info()
        .returning(|owner, repo| Ok(info_for(owner, repo)));
    host.expect_repo_tree()
        .returning(|_, _, _| Err(HostError::RateLimited));

    let err = load_repository(&host, "octo", "busy").await.unwrap_err();
    assert_eq!(err, HostError::RateLimited);
}

#[tokio::test]
async fn session_commits_view_and_clears_it_on_failure() {
    let mut host = MockRepoHost::new();
    host.expect_repo_info()
        .times(1)
        .returning(|owner, repo| Ok(info_for(owner, repo)));
    host.expect_repo_tree()
        .times(1)
        .returning(|_, _, _| Ok(vec![file("claude.md")]));
    host.expect_repo_info()
        .returning(|_, _| Err(HostError::Http(500)));

    let session = RepoSession::new(host);

    let committed = session.load("octo", "docs").await.unwrap();
    assert!(matches!(committed, Commit::Committed(_)));
    assert_eq!(session.view().await.unwrap().info.repo, "docs");

    let err = session.load("octo", "broken").await.unwrap_err();
    assert_eq!(err, HostError::Http(500));
    assert!(session.view().await.is_none(), "failed load clears the view");
}

#[tokio::test]
async fn failed_file_fetch_commits_placeholder_content() {
    let mut host = MockRepoHost::new();
    host.expect_blob_text()
        .returning(|_, _, _| Err(HostError::Http(502)));

    let session = RepoSession::new(host);
    let outcome = session
        .select_file("octo", "docs", "llmdoc/index.md", "sha-1")
        .await;

    match outcome {
        Commit::Committed(view) => {
            assert_eq!(view.path, "llmdoc/index.md");
            assert_eq!(view.content, FILE_LOAD_FAILED);
        }
        Commit::Superseded => panic!("unexpected supersede"),
    }
    assert!(session.selected().await.is_some());
}

#[tokio::test]
async fn successful_file_fetch_commits_content() {
    let mut host = MockRepoHost::new();
    host.expect_blob_text()
        .returning(|_, _, sha| Ok(format!("content of {sha}")));

    let session = RepoSession::new(host);
    let outcome = session
        .select_file("octo", "docs", "llmdoc/index.md", "abc123")
        .await;

    match outcome {
        Commit::Committed(view) => assert_eq!(view.content, "content of abc123"),
        Commit::Superseded => panic!("unexpected supersede"),
    }
}

/// Host whose tree fetch for the repository named "slow" blocks until
/// released, and signals when it has been entered. Everything else resolves
/// immediately.
struct GatedHost {
    entered: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl RepoHost for GatedHost {
    async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, HostError> {
        Ok(info_for(owner, repo))
    }

    async fn repo_tree(
        &self,
        _owner: &str,
        repo: &str,
        _branch: &str,
    ) -> Result<Vec<TreeEntry>, HostError> {
        if repo == "slow" {
            if let Some(tx) = self.entered.lock().await.take() {
                let _ = tx.send(());
            }
            if let Some(rx) = self.release.lock().await.take() {
                let _ = rx.await;
            }
        }
        Ok(vec![file(&format!("llmdoc/{repo}.md"))])
    }

    async fn blob_text(&self, _owner: &str, _repo: &str, _sha: &str) -> Result<String, HostError> {
        Ok(String::new())
    }
}

#[tokio::test]
async fn superseded_load_does_not_overwrite_newer_state() {
    let (entered_tx, entered_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let session = Arc::new(RepoSession::new(GatedHost {
        entered: Mutex::new(Some(entered_tx)),
        release: Mutex::new(Some(release_rx)),
    }));

    let slow = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.load("octo", "slow").await })
    };

    // Wait until the first load is parked inside its tree fetch, then start
    // a second load that wins the race.
    entered_rx.await.unwrap();
    let fast = session.load("octo", "fast").await.unwrap();
    assert!(matches!(fast, Commit::Committed(_)));

    release_tx.send(()).unwrap();
    let outcome = slow.await.unwrap().unwrap();
    assert_eq!(outcome, Commit::Superseded);

    let view = session.view().await.unwrap();
    assert_eq!(view.info.repo, "fast", "stale load must not overwrite state");
    assert_eq!(view.tree[0].path, "llmdoc/fast.md");
}
