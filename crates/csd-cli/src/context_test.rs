use super::*;
use std::process::Command;

fn context(root: &Path, git: GitMode) -> RuntimeContext {
    RuntimeContext {
        root: root.to_path_buf(),
        config: Config {
            git,
            ..Config::default()
        },
    }
}

fn git_available() -> bool {
    GitProbe::new("git").version().is_some()
}

/// Run git in `dir` with a fixed identity.
fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.name=csd",
            "-c",
            "user.email=csd@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

/// A repository with one commit and no tag.
fn untagged_repository() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.sql"), "SELECT 1;\n").unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "changelog"]);
    dir
}

#[test]
fn test_git_never_skips_git() {
    let dir = tempfile::tempdir().unwrap();
    let status = context(dir.path(), GitMode::Never).git();

    assert!(status.disabled);
    assert!(status.version.is_none());
    assert!(!status.timestamps_enabled());
}

#[test]
fn test_git_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(dir.path(), GitMode::Always);
    ctx.config.git_binary = "/nonexistent/bin/git-for-csd-tests".to_string();
    let status = ctx.git();

    assert!(!status.disabled);
    assert!(status.version.is_none());
    assert!(!status.timestamps_enabled());
}

#[test]
fn test_git_auto_needs_describe() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = untagged_repository();
    let status = context(repo.path(), GitMode::Auto).git();

    assert!(status.version.is_some());
    assert!(status.app_version.is_none());
    assert!(!status.timestamps_enabled());
}

#[test]
fn test_git_always_without_tag() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = untagged_repository();
    let status = context(repo.path(), GitMode::Always).git();

    assert!(status.app_version.is_none());
    assert!(status.timestamps_enabled());
}

#[test]
fn test_git_auto_with_tag() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = untagged_repository();
    git(repo.path(), &["tag", "-a", "v1.0.0", "-m", "release"]);
    let status = context(repo.path(), GitMode::Auto).git();

    assert_eq!(status.app_version.as_deref(), Some("v1.0.0"));
    assert!(status.timestamps_enabled());
}
