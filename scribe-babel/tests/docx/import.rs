//! Import scenarios over hand-built DOCX packages (DOCX → model)

use crate::common::{docx, paragraph, plain_paragraph};
use scribe_babel::format::Format;
use scribe_babel::formats::docx::{read_paragraphs, DocxFormat};
use scribe_babel::import::{ImportMachine, ImportState};
use scribe_babel::style::{Role, StyleOverride};
use scribe_babel::{Chapter, ConversionSettings, FormatError, StructureModel};
use std::collections::BTreeMap;

fn import(body: &str) -> Result<StructureModel, FormatError> {
    import_with(body, &ConversionSettings::default())
}

fn import_with(body: &str, settings: &ConversionSettings) -> Result<StructureModel, FormatError> {
    DocxFormat.parse(&docx(body), "manuscript.docx", settings)
}

#[test]
fn test_reference_scenario() {
    let body = [
        paragraph("My Novel", "Serif", 22, true),
        paragraph("Chapter 1: Intro", "Serif", 16, true),
        paragraph("Hello world.", "Serif", 14, false),
    ]
    .concat();

    let model = import(&body).unwrap();
    assert_eq!(
        model,
        StructureModel::new("My Novel").with_chapter("Chapter 1: Intro", "Hello world.")
    );
}

#[test]
fn test_word_processor_drift_is_tolerated() {
    // font names with suffixes and sizes one point off still count
    let body = [
        paragraph("My Novel", "Noto Serif CJK SC", 21, true),
        paragraph("简介", "Noto Serif CJK SC", 15, true),
        paragraph("一个故事。", "Noto Serif CJK SC", 13, false),
        paragraph("第一章", "Noto Serif CJK SC", 17, true),
        paragraph("正文。", "Noto Serif CJK SC", 15, false),
    ]
    .concat();

    let model = import(&body).unwrap();
    assert_eq!(model.title, "My Novel");
    assert_eq!(model.description, "一个故事。");
    assert_eq!(model.chapters, vec![Chapter::new("第一章", "正文。")]);
}

#[test]
fn test_no_title_uses_file_name() {
    let body = [
        paragraph("Chapter 1", "Serif", 16, true),
        paragraph("Text.", "Serif", 14, false),
    ]
    .concat();

    let model = import(&body).unwrap();
    assert_eq!(model.title, "manuscript");
    assert_eq!(model.chapters, vec![Chapter::new("Chapter 1", "Text.")]);
}

#[test]
fn test_unformatted_paragraphs_are_content() {
    let body = [
        paragraph("Book", "Serif", 22, true),
        paragraph("One", "Serif", 16, true),
        plain_paragraph("first"),
        "<w:p/>".to_string(),
        plain_paragraph("second"),
    ]
    .concat();

    let model = import(&body).unwrap();
    assert_eq!(model.chapters, vec![Chapter::new("One", "first\nsecond")]);
}

#[test]
fn test_chapter_order_is_preserved() {
    let mut body = paragraph("Book", "Serif", 22, true);
    for i in 1..=5 {
        body.push_str(&paragraph(&format!("Part {i}"), "Serif", 16, true));
        body.push_str(&paragraph(&format!("text {i}"), "Serif", 14, false));
    }

    let model = import(&body).unwrap();
    let titles: Vec<_> = model.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Part 1", "Part 2", "Part 3", "Part 4", "Part 5"]);
}

#[test]
fn test_custom_style_config() {
    let body = [
        paragraph("Book", "Arial", 30, true),
        paragraph("One", "Arial", 20, false),
        paragraph("text", "Arial", 12, false),
    ]
    .concat();

    let overrides = BTreeMap::from([
        (
            Role::Title,
            StyleOverride {
                font_family: Some("Arial".to_string()),
                point_size: Some(30),
                ..StyleOverride::default()
            },
        ),
        (
            Role::ChapterTitle,
            StyleOverride {
                font_family: Some("Arial".to_string()),
                point_size: Some(20),
                bold: Some(false),
                ..StyleOverride::default()
            },
        ),
    ]);
    let settings = ConversionSettings::default().with_style_overrides(&overrides);

    let model = import_with(&body, &settings).unwrap();
    assert_eq!(model.title, "Book");
    assert_eq!(model.chapters, vec![Chapter::new("One", "text")]);
}

#[test]
fn test_document_without_text_fails() {
    let result = import("<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p>");
    assert!(matches!(result, Err(FormatError::ParseError(_))));
}

#[test]
fn test_missing_document_part_fails() {
    use std::io::{Cursor, Write};
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"hello").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let err = DocxFormat
        .parse(&bytes, "x.docx", &ConversionSettings::default())
        .unwrap_err();
    assert!(err.to_string().contains("word/document.xml"));
}

#[test]
fn test_machine_roles_follow_paragraphs() {
    let body = [
        paragraph("Book", "Serif", 22, true),
        paragraph("Description", "Serif", 16, true),
        paragraph("Blurb", "Serif", 14, false),
        paragraph("One", "Serif", 16, true),
        paragraph("text", "Serif", 14, false),
    ]
    .concat();
    let settings = ConversionSettings::default();
    let mut machine = ImportMachine::new(&settings.styles, &settings.import);

    let roles: Vec<_> = read_paragraphs(&docx(&body))
        .unwrap()
        .iter()
        .filter_map(|p| machine.feed(p))
        .collect();
    assert_eq!(
        roles,
        vec![
            Role::Title,
            Role::DescriptionTitle,
            Role::DescriptionContent,
            Role::ChapterTitle,
            Role::ChapterContent,
        ]
    );
    assert_eq!(machine.state(), ImportState::SeekingBody);
}
