//! The manuscript structure shared by both conversion directions.
//!
//! A [`StructureModel`] is built fresh for every import or export call and is never persisted
//! by this crate. Chapter order is reading order.

use serde::{Deserialize, Deserializer, Serialize};

/// Title used for a chapter that arrives without one.
pub const UNTITLED_CHAPTER: &str = "Untitled Chapter";

/// Non-whitespace character budget per chapter before an import warns about it.
pub const DEFAULT_MAX_CHAPTER_CHARS: usize = 20_000;

/// A manuscript: title, optional description, ordered chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<Chapter>,
}

/// A chapter with its newline-joined content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl StructureModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_chapter(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.chapters.push(Chapter::new(title, content));
        self
    }

    /// Applies the safe defaults: a blank title becomes `placeholder`, blank chapter
    /// titles become [`UNTITLED_CHAPTER`]. The title is trimmed; content is left untouched.
    pub fn normalized(mut self, placeholder: &str) -> Self {
        let title = self.title.trim();
        self.title = if title.is_empty() {
            placeholder.to_string()
        } else {
            title.to_string()
        };
        for chapter in &mut self.chapters {
            if chapter.title.trim().is_empty() {
                chapter.title = UNTITLED_CHAPTER.to_string();
            }
        }
        self
    }

    /// Indices of chapters whose visible character count exceeds `limit`.
    pub fn oversized_chapters(&self, limit: usize) -> Vec<usize> {
        self.chapters
            .iter()
            .enumerate()
            .filter(|(_, chapter)| chapter.visible_len() > limit)
            .map(|(index, _)| index)
            .collect()
    }
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Number of non-whitespace characters in the content.
    pub fn visible_len(&self) -> usize {
        self.content.chars().filter(|c| !c.is_whitespace()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}

/// Hosts send `null` for absent strings and arrays; treat it like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
