//! Flattening a manuscript into styled blocks for the renderers.
//!
//! This is the mirror of [`crate::import`]: every block carries the [`Role`] whose template the
//! renderer applies, and the importer later recognizes that same template. The mapping is lossy
//! in one place: blank content lines are dropped, and content lines are trimmed.

use crate::model::StructureModel;
use crate::style::Role;
use serde::Serialize;

pub const DEFAULT_DESCRIPTION_LABEL: &str = "简介";
pub const DEFAULT_CHAPTER_HEADING: &str = "Chapter {index}: {title}";

/// A run of text and the role that decides how it looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledBlock {
    pub text: String,
    pub role: Role,
}

impl StyledBlock {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Heading placed above the description
    pub description_label: String,
    /// Chapter heading with `{index}` (1-based) and `{title}` placeholders
    pub chapter_heading: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            description_label: DEFAULT_DESCRIPTION_LABEL.to_string(),
            chapter_heading: DEFAULT_CHAPTER_HEADING.to_string(),
        }
    }
}

pub fn chapter_heading(template: &str, index: usize, title: &str) -> String {
    template
        .replace("{index}", &index.to_string())
        .replace("{title}", title)
}

/// Produce the block sequence for `model`: title, optional description, then every chapter.
pub fn format_blocks(model: &StructureModel, settings: &ExportSettings) -> Vec<StyledBlock> {
    let mut blocks = vec![StyledBlock::new(model.title.as_str(), Role::Title)];

    if !model.description.trim().is_empty() {
        blocks.push(StyledBlock::new(
            settings.description_label.as_str(),
            Role::DescriptionTitle,
        ));
        blocks.push(StyledBlock::new(
            model.description.as_str(),
            Role::DescriptionContent,
        ));
    }

    for (index, chapter) in model.chapters.iter().enumerate() {
        blocks.push(StyledBlock::new(
            chapter_heading(&settings.chapter_heading, index + 1, &chapter.title),
            Role::ChapterTitle,
        ));
        blocks.extend(
            chapter
                .content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| StyledBlock::new(line, Role::ChapterContent)),
        );
    }

    blocks
}
