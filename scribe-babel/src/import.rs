//! Rebuilding a manuscript from a flat stream of styled paragraphs.
//!
//! # The Algorithm
//!
//! A DOCX file has no notion of "chapter"; it is a flat list of paragraphs. The structure is
//! recovered from how each paragraph looks, in one forward pass:
//!
//! 1. Blank paragraphs are dropped before anything else sees them.
//! 2. While [`ImportState::SeekingTitle`], the first paragraph styled like the title role
//!    becomes the title and the machine moves to [`ImportState::SeekingBody`].
//! 3. Every other paragraph is tested in fixed precedence:
//!    - description title: no description found yet, style matches, and the text is one of
//!      the configured markers
//!    - description content: the paragraph right after a description title, style matches
//!    - chapter title: style matches
//!    - chapter content: everything else
//! 4. A chapter title commits the chapter being built (if it holds anything) and opens a new
//!    one. End of input commits the last chapter.
//!
//! Content lines are prefixed with one space per `indent_unit` twips of first-line indent.
//! Nothing is ever discarded: a paragraph that matches no template is chapter content.
//!
//! If no paragraph looked like a title, the source file's base name is used instead.

use crate::classify::Classifier;
use crate::error::FormatError;
use crate::model::{Chapter, StructureModel, DEFAULT_MAX_CHAPTER_CHARS, UNTITLED_CHAPTER};
use crate::style::{Role, StyleConfig, StyleSpec, FALLBACK_POINT_SIZE};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Twips of first-line indent rendered as one leading space.
pub const DEFAULT_INDENT_UNIT: i32 = 200;

/// One paragraph as produced by a paragraph source.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedParagraph {
    pub text: String,
    /// Style of the paragraph's first run; `None` when it has no run at all
    pub style: Option<StyleSpec>,
    /// First-line indent in twips (negative for hanging indents)
    pub first_line_indent: Option<i32>,
}

impl ObservedParagraph {
    pub fn new(text: impl Into<String>, style: Option<StyleSpec>) -> Self {
        Self {
            text: text.into(),
            style,
            first_line_indent: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: StyleSpec) -> Self {
        Self::new(text, Some(style))
    }

    pub fn with_indent(mut self, twips: i32) -> Self {
        self.first_line_indent = Some(twips);
        self
    }
}

/// Knobs of the import heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    /// Exact texts that introduce the description
    pub description_markers: Vec<String>,
    pub indent_unit: i32,
    /// Size assumed for paragraphs without any run
    pub fallback_point_size: i32,
    /// Remove "Chapter N:" / "第N章" from recovered chapter titles
    pub strip_chapter_prefix: bool,
    pub max_chapter_chars: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            description_markers: vec!["简介".to_string(), "Description".to_string()],
            indent_unit: DEFAULT_INDENT_UNIT,
            fallback_point_size: FALLBACK_POINT_SIZE,
            strip_chapter_prefix: false,
            max_chapter_chars: DEFAULT_MAX_CHAPTER_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    SeekingTitle,
    SeekingBody,
}

/// Single-pass classifier state over a paragraph stream.
pub struct ImportMachine<'a> {
    classifier: Classifier<'a>,
    settings: &'a ImportSettings,
    state: ImportState,
    title: Option<String>,
    description: String,
    description_found: bool,
    awaiting_description: bool,
    chapters: Vec<Chapter>,
    current: Chapter,
    paragraphs_seen: usize,
}

impl<'a> ImportMachine<'a> {
    pub fn new(styles: &'a StyleConfig, settings: &'a ImportSettings) -> Self {
        let family = styles.spec(Role::ChapterContent).font_family.clone();
        let fallback = StyleSpec::new(family, settings.fallback_point_size, false);
        Self {
            classifier: Classifier::with_fallback(styles, fallback),
            settings,
            state: ImportState::SeekingTitle,
            title: None,
            description: String::new(),
            description_found: false,
            awaiting_description: false,
            chapters: Vec::new(),
            current: Chapter::default(),
            paragraphs_seen: 0,
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Number of non-blank paragraphs consumed so far.
    pub fn paragraphs_seen(&self) -> usize {
        self.paragraphs_seen
    }

    /// Consume one paragraph and return the role it was given, or `None` if it was blank.
    pub fn feed(&mut self, paragraph: &ObservedParagraph) -> Option<Role> {
        let text = paragraph.text.trim();
        if text.is_empty() {
            return None;
        }
        self.paragraphs_seen += 1;

        let style = paragraph.style.as_ref();
        let after_description_title = std::mem::take(&mut self.awaiting_description);

        if self.state == ImportState::SeekingTitle
            && self.classifier.matches_role(style, Role::Title)
        {
            debug!(title = text, "matched title paragraph");
            self.title = Some(text.to_string());
            self.state = ImportState::SeekingBody;
            return Some(Role::Title);
        }

        let role = self.classify_body(text, style, after_description_title);
        match role {
            Role::DescriptionTitle => {
                self.awaiting_description = true;
            }
            Role::DescriptionContent => {
                self.description = text.to_string();
                self.description_found = true;
            }
            Role::ChapterTitle => {
                self.commit_chapter();
                self.current.title = text.to_string();
            }
            Role::ChapterContent | Role::Title => {
                self.append_content(text, paragraph.first_line_indent);
            }
        }
        Some(role)
    }

    /// Commit the last chapter and produce the model. `source_name` supplies the fallback
    /// title; `untitled` is used when even that is empty.
    pub fn finish(mut self, source_name: &str, untitled: &str) -> StructureModel {
        self.commit_chapter();

        let title = match self.title.take() {
            Some(title) => title,
            None => {
                let fallback = fallback_title(source_name, untitled);
                warn!(
                    fallback = fallback.as_str(),
                    "no paragraph matched the title style, using source name"
                );
                fallback
            }
        };

        let model = StructureModel {
            title,
            description: self.description,
            chapters: self.chapters,
        };

        for index in model.oversized_chapters(self.settings.max_chapter_chars) {
            warn!(
                chapter = index + 1,
                limit = self.settings.max_chapter_chars,
                "chapter exceeds the recommended length"
            );
        }
        model
    }

    fn classify_body(&self, text: &str, style: Option<&StyleSpec>, after_description_title: bool) -> Role {
        if !self.description_found
            && self.is_description_marker(text)
            && self.classifier.matches_role(style, Role::DescriptionTitle)
        {
            return Role::DescriptionTitle;
        }
        if after_description_title && self.classifier.matches_role(style, Role::DescriptionContent) {
            return Role::DescriptionContent;
        }
        if self.classifier.matches_role(style, Role::ChapterTitle) {
            return Role::ChapterTitle;
        }
        Role::ChapterContent
    }

    fn is_description_marker(&self, text: &str) -> bool {
        self.settings.description_markers.iter().any(|marker| marker == text)
    }

    fn append_content(&mut self, text: &str, indent: Option<i32>) {
        if !self.current.content.is_empty() {
            self.current.content.push('\n');
        }
        let spaces = indent_spaces(indent, self.settings.indent_unit);
        self.current.content.extend(std::iter::repeat(' ').take(spaces));
        self.current.content.push_str(text);
    }

    fn commit_chapter(&mut self) {
        let mut chapter = std::mem::take(&mut self.current);
        if chapter.is_empty() {
            return;
        }
        if self.settings.strip_chapter_prefix {
            chapter.title = strip_chapter_prefix(&chapter.title);
        }
        debug!(title = chapter.title.as_str(), "committed chapter");
        self.chapters.push(chapter);
    }
}

/// Run the whole stream through an [`ImportMachine`].
///
/// Fails when the stream holds no non-blank paragraph.
pub fn import_paragraphs<I>(
    paragraphs: I,
    styles: &StyleConfig,
    settings: &ImportSettings,
    source_name: &str,
    untitled: &str,
) -> Result<StructureModel, FormatError>
where
    I: IntoIterator<Item = ObservedParagraph>,
{
    let mut machine = ImportMachine::new(styles, settings);
    for paragraph in paragraphs {
        machine.feed(&paragraph);
    }
    if machine.paragraphs_seen() == 0 {
        return Err(FormatError::ParseError(
            "document contains no text paragraphs".to_string(),
        ));
    }
    Ok(machine.finish(source_name, untitled))
}

/// Leading spaces for a first-line indent of `indent` twips.
pub fn indent_spaces(indent: Option<i32>, unit: i32) -> usize {
    match indent {
        Some(twips) if twips > 0 && unit > 0 => (twips / unit) as usize,
        _ => 0,
    }
}

/// Base name of `source_name` without extension, or `untitled` if there is none.
pub fn fallback_title(source_name: &str, untitled: &str) -> String {
    Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(untitled)
        .to_string()
}

fn chapter_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^\s*(?:第[一二三四五六七八九十百千万零\d]+章|(?i:chapter)\s+\d+)\s*[:：.、]?\s*")
            .expect("chapter prefix pattern is valid")
    })
}

/// Remove a leading chapter number from a heading. A heading that is nothing but the number
/// becomes [`UNTITLED_CHAPTER`].
pub fn strip_chapter_prefix(title: &str) -> String {
    match chapter_prefix().find(title) {
        Some(prefix) => {
            let rest = title[prefix.end()..].trim();
            if rest.is_empty() {
                UNTITLED_CHAPTER.to_string()
            } else {
                rest.to_string()
            }
        }
        None => title.trim().to_string(),
    }
}
