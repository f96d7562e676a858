//! Integration tests for `update`, `restore` and `clean`.
//!
//! These tests verify that:
//! - Update moves home content into the store and links home back
//! - Hard update and restore leave real copies at home
//! - Conflicts follow --yes, --no, and answers read from stdin
//! - Dry-run mode reports operations and changes nothing
//! - Clean removes managed links and keeps the store intact
//! - Category overrides restrict which paths are touched

mod common;

use common::{is_real_file, is_symlink, link, write, TestEnv};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_update_moves_home_into_store_and_links() {
    let env = TestEnv::with_filelist(".vimrc:common,laptop\n");
    write(&env.home_file(".vimrc"), "set nu");

    env.run_ok(&["update"]);

    let master = env.cat("common", ".vimrc");
    assert!(is_real_file(&master));
    assert_eq!(fs::read_to_string(&master).unwrap(), "set nu");
    assert!(is_symlink(&env.cat("laptop", ".vimrc")));
    assert_eq!(
        fs::read_link(env.cat("laptop", ".vimrc")).unwrap(),
        std::path::PathBuf::from("../common/.vimrc")
    );
    assert!(is_symlink(&env.home_file(".vimrc")));
    assert_eq!(fs::read_link(env.home_file(".vimrc")).unwrap(), master);
}

#[test]
fn test_update_is_idempotent() {
    let env = TestEnv::with_filelist(".vimrc\n.config/git/config:common,work\n");
    write(&env.home_file(".vimrc"), "set nu");

    env.run_ok(&["update"]);
    env.command()
        .args(["--verbose", "update"])
        .assert()
        .success()
        .stderr(predicate::str::contains("update: nothing to do"))
        .stderr(predicate::str::contains("restore: nothing to do"));
}

#[test]
fn test_update_without_content_creates_empty_master() {
    let env = TestEnv::with_filelist(".zshrc\n");

    env.command()
        .arg("update")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "unable to find any candidates for \".zshrc\", creating empty master",
        ));

    assert!(is_real_file(&env.cat("common", ".zshrc")));
    assert_eq!(fs::read(env.cat("common", ".zshrc")).unwrap(), b"");
    assert!(is_symlink(&env.home_file(".zshrc")));
}

#[test]
fn test_update_hard_leaves_copy_at_home() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.home_file(".vimrc"), "set nu");

    env.run_ok(&["update", "--hard"]);

    assert!(is_real_file(&env.cat("common", ".vimrc")));
    assert!(is_real_file(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "set nu");
}

#[test]
fn test_update_hard_stores_edited_home_copy() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.home_file(".vimrc"), "v1");
    env.run_ok(&["update", "--hard"]);
    fs::write(env.home_file(".vimrc"), "v2 edited").unwrap();

    env.run_ok(&["--yes", "update", "--hard"]);

    assert_eq!(fs::read_to_string(env.cat("common", ".vimrc")).unwrap(), "v2 edited");
    assert!(is_real_file(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "v2 edited");
    env.command()
        .arg("diff")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_update_hard_asks_before_storing_edit() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.home_file(".vimrc"), "v1");
    env.run_ok(&["update", "--hard"]);
    fs::write(env.home_file(".vimrc"), "v2 edited").unwrap();

    env.command()
        .args(["update", "--hard"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("was edited; store it in the repository"));

    assert_eq!(fs::read_to_string(env.cat("common", ".vimrc")).unwrap(), "v2 edited");
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "v2 edited");
}

#[test]
fn test_update_hard_declined_edit_stays_at_home() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.home_file(".vimrc"), "v1");
    env.run_ok(&["update", "--hard"]);
    fs::write(env.home_file(".vimrc"), "v2 edited").unwrap();

    env.command()
        .args(["--no", "update", "--hard"])
        .assert()
        .success()
        .stderr(predicate::str::contains("keeping divergent"));

    assert_eq!(fs::read_to_string(env.cat("common", ".vimrc")).unwrap(), "v1");
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "v2 edited");
}

#[test]
fn test_update_dry_run_changes_nothing() {
    let env = TestEnv::with_filelist(".vimrc:common,laptop\n");
    write(&env.home_file(".vimrc"), "set nu");

    env.command()
        .args(["--dry-run", "update"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would move"))
        .stderr(predicate::str::contains("[DRY RUN] update: would apply 2 operation(s)"));

    assert!(is_real_file(&env.home_file(".vimrc")));
    assert!(!env.cat("common", ".vimrc").exists());
    assert!(!env.cat("laptop", ".vimrc").exists());
}

#[test]
fn test_update_divergent_category_kept_with_no() {
    let env = TestEnv::with_filelist(".vimrc:common,laptop\n");
    write(&env.cat("common", ".vimrc"), "one");
    write(&env.cat("laptop", ".vimrc"), "two");

    env.command()
        .args(["--no", "update"])
        .assert()
        .success()
        .stderr(predicate::str::contains("keeping divergent"));

    assert!(is_real_file(&env.cat("laptop", ".vimrc")));
    assert_eq!(fs::read_to_string(env.cat("laptop", ".vimrc")).unwrap(), "two");
}

// ============================================================================
// Restore
// ============================================================================

#[test]
fn test_restore_links_home() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.cat("common", ".vimrc"), "set nu");

    env.run_ok(&["restore"]);

    assert!(is_symlink(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "set nu");
}

#[test]
fn test_restore_missing_master_is_skipped() {
    let env = TestEnv::with_filelist(".zshrc\n");
    write(&env.home_file(".zshrc"), "mine");

    env.command()
        .arg("restore")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "unable to find \".zshrc\" in repo, skipping",
        ));

    assert!(is_real_file(&env.home_file(".zshrc")));
    assert!(!env.cat("common", ".zshrc").exists());
}

#[test]
fn test_restore_conflict_replaced_with_yes() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.cat("common", ".vimrc"), "repo");
    write(&env.home_file(".vimrc"), "mine");

    env.run_ok(&["--yes", "restore"]);

    assert!(is_symlink(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "repo");
}

#[test]
fn test_restore_conflict_kept_with_no() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.cat("common", ".vimrc"), "repo");
    write(&env.home_file(".vimrc"), "mine");

    env.run_ok(&["--no", "restore"]);

    assert!(is_real_file(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "mine");
}

#[test]
fn test_restore_conflict_answered_on_stdin() {
    let env = TestEnv::with_filelist(".vimrc\n.bashrc\n");
    for name in [".vimrc", ".bashrc"] {
        write(&env.cat("common", name), "repo");
        write(&env.home_file(name), "mine");
    }

    env.command()
        .arg("restore")
        .write_stdin("y\nn\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[y/N]"));

    assert!(is_symlink(&env.home_file(".vimrc")));
    assert!(is_real_file(&env.home_file(".bashrc")));
    assert_eq!(fs::read_to_string(env.home_file(".bashrc")).unwrap(), "mine");
}

#[test]
fn test_restore_conflict_policy_from_config() {
    let env = TestEnv::with_filelist(".vimrc\n");
    fs::write(env.repo.join("dotrepo.yaml"), "conflict_policy: replace\n").unwrap();
    write(&env.cat("common", ".vimrc"), "repo");
    write(&env.home_file(".vimrc"), "mine");

    env.run_ok(&["restore"]);

    assert!(is_symlink(&env.home_file(".vimrc")));
}

#[test]
fn test_restore_end_of_input_keeps_content() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.cat("common", ".vimrc"), "repo");
    write(&env.home_file(".vimrc"), "mine");

    env.command().arg("restore").write_stdin("").assert().success();

    assert!(is_real_file(&env.home_file(".vimrc")));
}

#[test]
fn test_restore_hard_writes_copies() {
    let env = TestEnv::with_filelist(".vimrc\n");
    write(&env.cat("common", ".vimrc"), "repo");

    env.run_ok(&["restore", "--hard"]);

    assert!(is_real_file(&env.home_file(".vimrc")));
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "repo");
}

#[test]
fn test_restore_respects_category_override() {
    let env = TestEnv::with_filelist(".vimrc\n.gitconfig:work\n");
    write(&env.cat("common", ".vimrc"), "");
    write(&env.cat("work", ".gitconfig"), "");

    env.run_ok(&["--category", "work", "restore"]);

    assert!(is_symlink(&env.home_file(".gitconfig")));
    assert!(!env.home_file(".vimrc").exists());
}

#[test]
fn test_restore_categories_from_environment() {
    let env = TestEnv::with_filelist(".vimrc\n.gitconfig:work\n");
    write(&env.cat("work", ".gitconfig"), "");

    env.command()
        .env("DOTREPO_CATEGORIES", "work")
        .arg("restore")
        .assert()
        .success();

    assert!(is_symlink(&env.home_file(".gitconfig")));
}

// ============================================================================
// Clean
// ============================================================================

#[test]
fn test_clean_removes_links_only() {
    let env = TestEnv::with_filelist(".vimrc\n.bashrc\n.profile\n");
    write(&env.cat("common", ".vimrc"), "");
    write(&env.cat("common", ".bashrc"), "");
    link(env.cat("common", ".vimrc"), &env.home_file(".vimrc"));
    write(&env.home_file(".bashrc"), "mine");
    link("/etc/profile", &env.home_file(".profile"));

    env.run_ok(&["clean"]);

    assert!(!env.home_file(".vimrc").exists());
    assert!(is_real_file(&env.home_file(".bashrc")));
    assert!(is_symlink(&env.home_file(".profile")));
    assert!(is_real_file(&env.cat("common", ".vimrc")));
}

#[test]
fn test_clean_hard_removes_regular_files() {
    let env = TestEnv::with_filelist(".bashrc\n");
    write(&env.cat("common", ".bashrc"), "");
    write(&env.home_file(".bashrc"), "mine");

    env.run_ok(&["clean", "--hard"]);

    assert!(!env.home_file(".bashrc").exists());
    assert!(is_real_file(&env.cat("common", ".bashrc")));
}

#[test]
fn test_update_then_clean_round_trip() {
    let env = TestEnv::with_filelist(".vimrc:common,laptop\n");
    write(&env.home_file(".vimrc"), "set nu");

    env.run_ok(&["update"]);
    env.run_ok(&["clean"]);
    assert!(!env.home_file(".vimrc").exists());

    env.run_ok(&["restore"]);
    assert_eq!(fs::read_to_string(env.home_file(".vimrc")).unwrap(), "set nu");
}
