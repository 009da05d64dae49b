//! Plain text export
//!
//! Title and chapter headings are underlined (`=` and `-`), the description label sits on its
//! own line above the description, and sections are separated by a blank line.

use crate::error::FormatError;
use crate::export::{format_blocks, StyledBlock};
use crate::format::{Format, SerializedDocument};
use crate::model::StructureModel;
use crate::settings::ConversionSettings;
use crate::style::Role;

pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "txt"
    }

    fn description(&self) -> &str {
        "Plain text with underlined headings"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(
        &self,
        model: &StructureModel,
        settings: &ConversionSettings,
    ) -> Result<SerializedDocument, FormatError> {
        let blocks = format_blocks(model, &settings.export);
        Ok(SerializedDocument::Text(render_text(&blocks)))
    }
}

pub fn render_text(blocks: &[StyledBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        let opens_section = matches!(
            block.role,
            Role::Title | Role::DescriptionTitle | Role::ChapterTitle
        );
        if opens_section && !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&block.text);
        out.push('\n');
        let underline = match block.role {
            Role::Title => Some('='),
            Role::ChapterTitle => Some('-'),
            _ => None,
        };
        if let Some(rule) = underline {
            out.extend(std::iter::repeat(rule).take(block.text.chars().count()));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn renders_sections() {
        let model = StructureModel::new("My Novel")
            .with_description("A story.")
            .with_chapter("Intro", "Hello world.\n\n  Second line.")
            .with_chapter("End", "Bye.");
        let text = TextFormat
            .serialize(&model, &ConversionSettings::default())
            .unwrap()
            .into_bytes();
        assert_snapshot!(String::from_utf8(text).unwrap(), @r"
        My Novel
        ========

        简介
        A story.

        Chapter 1: Intro
        ----------------
        Hello world.
        Second line.

        Chapter 2: End
        --------------
        Bye.
        ");
    }

    #[test]
    fn title_only() {
        let blocks = [StyledBlock::new("Alone", Role::Title)];
        assert_eq!(render_text(&blocks), "Alone\n=====\n");
    }
}
