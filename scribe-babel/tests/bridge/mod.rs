//! Bridge operations against a real filesystem

use crate::common::{docx, fixture, paragraph};
use scribe_babel::storage::StorageResolver;
use scribe_babel::{Bridge, ConversionSettings, ExportRequest, ImportRequest, OperationResult};
use std::fs;
use tempfile::tempdir;

fn bridge_in(dir: &std::path::Path) -> Bridge {
    Bridge::new(
        ConversionSettings::default(),
        StorageResolver::new(vec![dir.to_path_buf()]),
    )
}

#[test]
fn test_export_then_import_via_json() {
    let dir = tempdir().unwrap();
    let bridge = bridge_in(dir.path());
    let target = dir.path().join("out").join("novel.docx");

    let request = serde_json::json!({
        "title": "My Novel",
        "description": null,
        "chapters": [{"title": "Intro", "content": "Hello world."}],
        "savePath": target,
    });
    let exported = bridge.export_json("docx", &request.to_string());
    assert!(exported.success, "{exported:?}");
    assert_eq!(exported.path.as_deref(), Some(target.to_str().unwrap()));
    assert!(target.is_file());

    let import = serde_json::json!({ "filePath": target });
    let imported = bridge.import_json(&import.to_string());
    assert!(imported.success, "{imported:?}");
    let model = imported.data.unwrap();
    assert_eq!(model.title, "My Novel");
    assert_eq!(model.chapters[0].title, "Chapter 1: Intro");
    assert_eq!(model.chapters[0].content, "Hello world.");
}

#[test]
fn test_export_without_path_uses_default_name() {
    let dir = tempdir().unwrap();
    let bridge = bridge_in(dir.path());

    let request = ExportRequest {
        title: Some("My Novel: Part 1".to_string()),
        ..ExportRequest::default()
    };
    let first = bridge.export("txt", &request);
    let second = bridge.export("txt", &request);

    let first = first.path.unwrap();
    let second = second.path.unwrap();
    assert_ne!(first, second);
    let name = std::path::Path::new(&first)
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert!(name.starts_with("My_Novel__Part_1_"), "{name}");
    assert!(name.ends_with(".txt"));
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        "My Novel: Part 1\n================\n"
    );
}

#[test]
fn test_import_fixture_json() {
    let bridge = Bridge::default();
    let result = bridge.import(&ImportRequest::new(fixture("novel.json").to_string_lossy()));
    assert!(result.success);
    assert_eq!(result.data.unwrap().chapters.len(), 3);
}

#[test]
fn test_import_applies_style_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.docx");
    let body = [
        paragraph("Book", "Arial", 28, true),
        paragraph("One", "Arial", 18, true),
        paragraph("text", "Arial", 11, false),
    ]
    .concat();
    fs::write(&path, docx(&body)).unwrap();

    let request = serde_json::json!({
        "filePath": path,
        "styleConfig": {
            "title": {"fontFamily": "Arial", "pointSize": 28},
            "chapterTitle": {"fontFamily": "Arial", "pointSize": 18},
            "chapterContent": {"fontFamily": "Arial", "pointSize": 11}
        }
    });
    let result = bridge_in(dir.path()).import_json(&request.to_string());
    let model = result.data.unwrap();
    assert_eq!(model.title, "Book");
    assert_eq!(model.chapters[0].title, "One");
    assert_eq!(model.chapters[0].content, "text");
}

#[test]
fn test_failures_are_tagged_results() {
    let dir = tempdir().unwrap();
    let bridge = bridge_in(dir.path());

    let missing = bridge.import(&ImportRequest::new(
        dir.path().join("nope.docx").to_string_lossy(),
    ));
    assert!(!missing.success);
    assert!(missing.data.is_none());
    assert!(missing.error.unwrap().starts_with("Source unavailable"));

    let not_docx = dir.path().join("fake.docx");
    fs::write(&not_docx, b"plain text").unwrap();
    let broken = bridge.import(&ImportRequest::new(not_docx.to_string_lossy()));
    assert!(!broken.success);
    assert!(broken.error.unwrap().starts_with("Parse error"));

    let json: serde_json::Value =
        serde_json::from_str(&bridge.import_json("[]").to_json()).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["durationMs"].is_u64());
    assert!(json.get("data").is_none());
}

#[test]
fn test_result_json_shape() {
    let dir = tempdir().unwrap();
    let result = bridge_in(dir.path()).export_json("json", r#"{"title": "T"}"#);
    let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["path"].as_str().unwrap().ends_with(".json"));
    assert!(json.get("error").is_none());

    let back: OperationResult = serde_json::from_str(&result.to_json()).unwrap();
    assert_eq!(back, result);
}
