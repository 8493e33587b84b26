//! Historical revision retrieval against a scripted cleartool.

#![cfg(unix)]

#[path = "common/mod.rs"]
mod common;

use std::fs;
use std::io::Read;

use ccview::ClearCaseRepository;
use common::FakeClearTool;
use tempfile::TempDir;

const CONTENT: &[u8] = b"#include <stdio.h>\n\x00\xffbinary tail\n";

fn setup() -> (FakeClearTool, TempDir, ClearCaseRepository) {
    let fake = FakeClearTool::new();
    fs::write(fake.command().with_file_name("get.out"), CONTENT).unwrap();

    let view = TempDir::new().unwrap();
    fs::create_dir_all(view.path().join("src")).unwrap();
    fs::write(view.path().join("src/main.c"), "current\n").unwrap();
    let repo = ClearCaseRepository::open(view.path(), &fake.config()).unwrap();
    (fake, view, repo)
}

#[test]
fn test_get_revision_returns_client_bytes() {
    let (fake, view, repo) = setup();

    let mut blob = repo
        .get_revision(&view.path().join("src/main.c"), "/main/3")
        .unwrap()
        .expect("revision content");
    let mut bytes = Vec::new();
    blob.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, CONTENT);

    let calls = fake.calls_of("get");
    assert_eq!(calls.len(), 1);
    assert_eq!(FakeClearTool::cwd_of(&calls[0]), repo.root());
    assert!(calls[0].ends_with(" [src/main.c@@/main/3]"), "{}", calls[0]);
}

#[test]
fn test_temp_file_is_deleted_on_close() {
    let (_fake, view, repo) = setup();

    let blob = repo
        .get_revision(&view.path().join("src/main.c"), "/main/3")
        .unwrap()
        .expect("revision content");
    let temp = blob.path().expect("backing file").to_path_buf();
    assert!(temp.exists());

    blob.close().unwrap();
    assert!(!temp.exists());
}

#[test]
fn test_temp_file_is_deleted_when_blob_is_dropped_unread() {
    let (_fake, view, repo) = setup();

    let blob = repo
        .get_revision(&view.path().join("src/main.c"), "/main/3")
        .unwrap()
        .expect("revision content");
    let temp = blob.path().expect("backing file").to_path_buf();
    drop(blob);
    assert!(!temp.exists());
}

#[test]
fn test_failed_get_is_no_content_and_leaves_no_file() {
    let (fake, view, repo) = setup();
    fake.set_exit_code("get", 1);

    let result = repo
        .get_revision(&view.path().join("src/main.c"), "/main/99")
        .unwrap();
    assert!(result.is_none());

    let calls = fake.calls_of("get");
    let target = calls[0]
        .split(" [")
        .nth(3)
        .map(|arg| arg.trim_end_matches(']'))
        .expect("-to argument");
    assert!(!std::path::Path::new(target).exists());
}

#[test]
fn test_missing_client_is_error() {
    let view = TempDir::new().unwrap();
    fs::write(view.path().join("a.txt"), "a").unwrap();
    let config = ccview::Config::default().with_command("/nonexistent/cleartool");
    let repo = ClearCaseRepository::open(view.path(), &config).unwrap();

    assert!(repo.get_revision(&view.path().join("a.txt"), "/main/1").is_err());
}

#[test]
fn test_get_revision_of_element_removed_from_view() {
    let (fake, view, repo) = setup();
    assert!(!view.path().join("src/removed.c").exists());

    let bytes = repo
        .get_revision(&view.path().join("src/removed.c"), "/main/2")
        .unwrap()
        .expect("revision content")
        .into_bytes()
        .unwrap();
    assert_eq!(bytes, CONTENT);

    let calls = fake.calls_of("get");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with(" [src/removed.c@@/main/2]"), "{}", calls[0]);
}

#[test]
fn test_get_revision_under_removed_directory() {
    let (fake, view, repo) = setup();

    repo.get_revision(&view.path().join("old/module/util.c"), "/main/1")
        .unwrap()
        .expect("revision content");

    let calls = fake.calls_of("get");
    assert!(calls[0].ends_with(" [old/module/util.c@@/main/1]"), "{}", calls[0]);
}
