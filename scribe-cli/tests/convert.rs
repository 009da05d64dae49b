use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const NOVEL: &str = "../scribe-babel/tests/fixtures/novel.json";

#[test]
fn json_to_docx_and_back() {
    let dir = tempdir().unwrap();
    let docx = dir.path().join("novel.docx");

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("convert")
        .arg(NOVEL)
        .arg("--to")
        .arg("docx")
        .arg("-o")
        .arg(&docx);
    cmd.assert().success();
    assert!(fs::read(&docx).unwrap().starts_with(b"PK"));

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(&docx).arg("--to").arg("json");
    let output = cmd.assert().success().get_output().stdout.clone();
    let model: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(model["title"], "The Lighthouse Keeper");
    assert_eq!(model["chapters"][0]["title"], "Chapter 1: Arrival");
    assert_eq!(model["chapters"].as_array().unwrap().len(), 3);
}

#[test]
fn convert_subcommand_is_optional() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL).arg("--to").arg("txt");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("The Lighthouse Keeper\n"))
        .stdout(predicate::str::contains("Chapter 2: 第二章 风暴"));
}

#[test]
fn strip_chapter_prefix_extra_restores_titles() {
    let dir = tempdir().unwrap();
    let docx = dir.path().join("novel.docx");

    cargo_bin_cmd!("scribe")
        .arg(NOVEL)
        .arg("--to")
        .arg("docx")
        .arg("-o")
        .arg(&docx)
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(&docx)
        .arg("--to")
        .arg("json")
        .arg("--extra-strip-chapter-prefix");
    let output = cmd.assert().success().get_output().stdout.clone();
    let model: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(model["chapters"][0]["title"], "Arrival");
}

#[test]
fn binary_formats_require_output_path() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL).arg("--to").arg("docx");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("require an output file"));
}

#[test]
fn pdf_output_is_written() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("novel.pdf");

    cargo_bin_cmd!("scribe")
        .arg(NOVEL)
        .arg("--to")
        .arg("pdf")
        .arg("-o")
        .arg(&pdf)
        .assert()
        .success();

    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn unknown_format_fails() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL).arg("--to").arg("rtf");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Format 'rtf' not found"));
}

#[test]
fn undetectable_source_format_fails() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("notes.unknown").arg("--to").arg("json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn missing_input_fails() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("nonexistent.json").arg("--to").arg("txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn list_formats_shows_registry() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("--list-formats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("docx"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("pdf"))
        .stdout(predicate::str::contains("txt"));
}
