use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const NOVEL: &str = "../scribe-babel/tests/fixtures/novel.json";

#[test]
fn generate_config_prints_defaults() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("generate-config");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[styles.title]"))
        .stdout(predicate::str::contains("[export.page]"))
        .stdout(predicate::str::contains("description_markers"));
}

#[test]
fn description_label_comes_from_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("scribe.toml");
    fs::write(
        &config_path,
        r#"[export]
description_label = "Synopsis"
chapter_heading = "{index}. {title}"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL)
        .arg("--to")
        .arg("txt")
        .arg("--config")
        .arg(&config_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Synopsis"))
        .stdout(predicate::str::contains("1. Arrival"));
}

#[test]
fn extra_overrides_beat_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("scribe.toml");
    fs::write(&config_path, "[export]\ndescription_label = \"Synopsis\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL)
        .arg("--to")
        .arg("txt")
        .arg("--config")
        .arg(&config_path)
        .arg("--extra-description-label")
        .arg("Blurb");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Blurb"))
        .stdout(predicate::str::contains("Synopsis").not());
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg(NOVEL)
        .arg("--to")
        .arg("txt")
        .arg("--config")
        .arg("/definitely/not/here.toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn font_override_reaches_the_docx() {
    let dir = tempdir().unwrap();
    let docx = dir.path().join("novel.docx");

    cargo_bin_cmd!("scribe")
        .arg(NOVEL)
        .arg("--to")
        .arg("docx")
        .arg("-o")
        .arg(&docx)
        .arg("--extra-font-family")
        .arg("Georgia")
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("scribe");
    cmd.arg("inspect")
        .arg(&docx)
        .arg("--extra-font-family")
        .arg("Georgia");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Georgia 22pt bold"))
        .stdout(predicate::str::starts_with("title"));
}
