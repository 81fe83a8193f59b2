use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::cargo_bin("llmdoc-browser").expect("binary exists")
}

#[test]
fn help_lists_all_subcommands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("tree")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("login"))
                .and(predicate::str::contains("logout")),
        );
}

#[test]
fn tree_rejects_malformed_repository_argument() {
    bin()
        .arg("tree")
        .arg("not-a-repo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner/repo"));
}

#[test]
fn show_rejects_extra_path_separators_in_repo() {
    bin()
        .arg("show")
        .arg("owner/repo/extra")
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner/repo"));
}

#[test]
fn tree_requires_an_argument() {
    bin().arg("tree").assert().failure();
}

#[test]
fn login_without_client_id_reports_missing_env() {
    bin()
        .arg("login")
        .env_remove("GITHUB_CLIENT_ID")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_CLIENT_ID"));
}

#[test]
fn login_prints_authorize_url_with_client_id() {
    bin()
        .arg("login")
        .env("GITHUB_CLIENT_ID", "test-client-id")
        .env_remove("GITHUB_REDIRECT_URI")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://github.com/login/oauth/authorize")
                .and(predicate::str::contains("client_id=test-client-id"))
                .and(predicate::str::contains("scope=public_repo")),
        );
}

#[test]
fn logout_succeeds_even_without_a_stored_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    bin()
        .arg("logout")
        .env("LLMDOC_TOKEN_FILE", dir.path().join("auth.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
}
