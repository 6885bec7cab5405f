mod common;

use common::today;
use stagerun::run_dir::create_or_find_run_directory;
use stagerun::stages::{
    Stage2Resolution, collation_path, provision_all_mapped, provision_sort_stages,
    provision_stage, resolve_stage2, scale_variant_name,
};
use stagerun::{FolderKeyMapping, RunDirectory, Stage, StageFolder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn fresh_run(root: &Path) -> RunDirectory {
    create_or_find_run_directory(root, today()).unwrap()
}

fn child_names(dir: &Path) -> Vec<String> {
    let mut v: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    v.sort();
    v
}

// --- naming ---

#[test]
fn test_stage_folder_names() {
    assert_eq!(Stage::Sort.folder_name("jpg"), "01-jpg");
    assert_eq!(Stage::Convert.folder_name("png"), "02-png");
    assert_eq!(Stage::Collation.folder_name("Enhancement"), "03-Enhancement");
    assert_eq!(Stage::Convert.prefix(), "02-");
    let sf = StageFolder::new(Path::new("/run"), Stage::Collation, "Bar");
    assert_eq!(sf.path(), Path::new("/run/03-Bar"));
}

#[test]
fn test_scale_variant_name() {
    assert_eq!(scale_variant_name(25), "x25");
    assert_eq!(scale_variant_name(100), "x100");
}

// --- provision_stage ---

#[test]
fn test_provision_stage_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    let first = provision_stage(&run, Stage::Collation, "Bar").unwrap();
    fs::write(first.join("keep.png"), b"x").unwrap();
    let second = provision_stage(&run, Stage::Collation, "Bar").unwrap();
    assert_eq!(first, second);
    assert_eq!(child_names(&run.path()), ["03-Bar"]);
    assert!(second.join("keep.png").exists(), "existing contents untouched");
}

#[test]
fn test_provision_stage_fails_on_file_in_the_way() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    fs::write(run.path().join("03-Bar"), b"").unwrap();
    assert!(provision_stage(&run, Stage::Collation, "Bar").is_err());
}

// --- resolve_stage2 ---

#[test]
fn test_resolve_stage2_exact() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    fs::create_dir_all(run.path().join("02-png")).unwrap();
    fs::create_dir_all(run.path().join("02-bmp")).unwrap();
    let res = resolve_stage2(&run, "png").unwrap();
    assert_eq!(res, Stage2Resolution::Exact(run.path().join("02-png")));
}

#[test]
fn test_resolve_stage2_fallback_is_lexicographically_smallest() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    for n in ["02-webp", "02-bmp", "02-jpg", "03-Bar"] {
        fs::create_dir_all(run.path().join(n)).unwrap();
    }
    fs::write(run.path().join("02-aaa"), b"file, not a folder").unwrap();
    let res = resolve_stage2(&run, "png").unwrap();
    assert_eq!(res, Stage2Resolution::Fallback(run.path().join("02-bmp")));
    assert_eq!(res.path(), run.path().join("02-bmp"));
}

#[test]
fn test_resolve_stage2_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    fs::create_dir_all(run.path().join("03-Bar")).unwrap();
    assert_eq!(resolve_stage2(&run, "png"), None);
}

// --- provision_all_mapped / provision_sort_stages ---

#[test]
fn test_provision_all_mapped_creates_every_collation_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    let mapping: FolderKeyMapping = [
        ("Collation1", "CleanUp"),
        ("Collation2", "Enhancement"),
        ("Collation3", "Extract"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let report = provision_all_mapped(&run, &mapping);
    assert!(report.failed.is_empty());
    assert_eq!(report.provisioned.len(), 3);
    assert_eq!(
        child_names(&run.path()),
        ["03-CleanUp", "03-Enhancement", "03-Extract"]
    );
    assert_eq!(collation_path(&run, "Extract"), run.path().join("03-Extract"));

    // Second pass: no errors, no duplicates.
    let again = provision_all_mapped(&run, &mapping);
    assert!(again.failed.is_empty());
    assert_eq!(child_names(&run.path()).len(), 3);
}

#[test]
fn test_provision_all_mapped_reports_failures_and_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    fs::write(run.path().join("03-Broken"), b"").unwrap();
    let mapping: FolderKeyMapping = [("A", "Broken"), ("B", "Fine")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let report = provision_all_mapped(&run, &mapping);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "03-Broken");
    assert!(run.path().join("03-Fine").is_dir());
}

#[test]
fn test_provision_sort_stages() {
    let tmp = tempfile::tempdir().unwrap();
    let run = fresh_run(tmp.path());
    let exts: BTreeSet<String> = ["jpg", "png"].iter().map(|s| s.to_string()).collect();
    let report = provision_sort_stages(&run, &exts);
    assert!(report.failed.is_empty());
    assert_eq!(child_names(&run.path()), ["01-jpg", "01-png"]);
}
