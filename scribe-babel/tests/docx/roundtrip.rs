//! Export → import through the same settings (model → DOCX → model)

use crate::common::fixture;
use scribe_babel::format::Format;
use scribe_babel::formats::docx::{read_paragraphs, DocxFormat};
use scribe_babel::formats::json::JsonFormat;
use scribe_babel::model::UNTITLED_CHAPTER;
use scribe_babel::style::Role;
use scribe_babel::{format_blocks, Chapter, ConversionSettings, StructureModel};
use std::fs;

fn novel() -> StructureModel {
    let source = fs::read(fixture("novel.json")).unwrap();
    JsonFormat
        .parse(&source, "novel.json", &ConversionSettings::default())
        .unwrap()
}

fn round_trip(model: &StructureModel, settings: &ConversionSettings) -> StructureModel {
    let bytes = DocxFormat.serialize(model, settings).unwrap().into_bytes();
    DocxFormat.parse(&bytes, "novel.docx", settings).unwrap()
}

#[test]
fn test_fixture_round_trip_is_lossy_only_in_blank_lines() {
    let model = novel();
    let back = round_trip(&model, &ConversionSettings::default());

    assert_eq!(back.title, "The Lighthouse Keeper");
    assert_eq!(back.description, model.description);
    assert_eq!(
        back.chapters,
        vec![
            Chapter::new(
                "Chapter 1: Arrival",
                "The boat left her at the jetty before noon.\nShe carried one trunk and a crate of oranges."
            ),
            Chapter::new(
                "Chapter 2: 第二章 风暴",
                "The barometer fell all afternoon.\nBy dusk the lamp was the only light for forty miles."
            ),
            Chapter::new(
                format!("Chapter 3: {UNTITLED_CHAPTER}"),
                "Morning came grey and quiet."
            ),
        ]
    );
}

#[test]
fn test_prefix_stripping_restores_titles() {
    let mut settings = ConversionSettings::default();
    settings.import.strip_chapter_prefix = true;
    let model = StructureModel::new("Book")
        .with_chapter("Arrival", "one")
        .with_chapter("Storm", "two");

    assert_eq!(round_trip(&model, &settings), model);
}

#[test]
fn test_writer_styles_are_read_back() {
    let settings = ConversionSettings::default();
    let model = novel();
    let blocks = format_blocks(&model, &settings.export);
    let bytes = DocxFormat.serialize(&model, &settings).unwrap().into_bytes();
    let paragraphs = read_paragraphs(&bytes).unwrap();

    assert_eq!(paragraphs.len(), blocks.len());
    for (paragraph, block) in paragraphs.iter().zip(&blocks) {
        assert_eq!(paragraph.text, block.text);
        assert_eq!(paragraph.style.as_ref(), Some(settings.styles.spec(block.role)));
    }
}

#[test]
fn test_custom_font_round_trips() {
    let settings = ConversionSettings {
        styles: scribe_babel::StyleConfig::with_font_family("宋体"),
        ..ConversionSettings::default()
    };
    let model = StructureModel::new("书名").with_chapter("开端", "第一段");
    let back = round_trip(&model, &settings);

    assert_eq!(back.title, "书名");
    assert_eq!(back.chapters, vec![Chapter::new("Chapter 1: 开端", "第一段")]);
    assert_eq!(settings.styles.spec(Role::Title).font_family, "宋体");
}

#[test]
fn test_empty_chapter_list_yields_title_only() {
    let model = StructureModel::new("Alone");
    let back = round_trip(&model, &ConversionSettings::default());
    assert_eq!(back, model);
}
