//! PDF export built on `pdf-writer`.
//!
//! Blocks are laid out top to bottom with greedy line filling. No font program is embedded:
//! Latin-1 text is set in the standard Times fonts, everything else in the predefined CJK font
//! `STSong-Light` (Adobe-GB1, `UniGB-UCS2-H`), which viewers substitute from their own fonts.
//! Glyph widths are estimated (half an em for ASCII, a full em otherwise), which is good
//! enough for wrapping but not for typesetting.
//!
//! `STSong-Light` has no bold face, so bold CJK runs are set regular. Characters outside the
//! Basic Multilingual Plane are written as `?`.

use crate::error::FormatError;
use crate::export::{format_blocks, StyledBlock};
use crate::format::{Format, SerializedDocument};
use crate::model::StructureModel;
use crate::settings::{ConversionSettings, PageSettings};
use crate::style::{Alignment, StyleConfig};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");
const CJK_FONT: Name<'static> = Name(b"F3");

const CJK_BASE_FONT: Name<'static> = Name(b"STSong-Light");
const CJK_ENCODING: Name<'static> = Name(b"UniGB-UCS2-H");

/// Line height as a multiple of the font size at single spacing.
const LEADING: f32 = 1.2;

/// Format implementation producing PDF documents
pub struct PdfFormat;

impl Format for PdfFormat {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "PDF export with the standard Times and STSong fonts"
    }

    fn file_extensions(&self) -> &[&str] {
        &["pdf"]
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
        let pages = layout(&blocks, &settings.styles, &settings.page)?;
        debug!(pages = pages.len(), "rendering pdf");
        Ok(SerializedDocument::Binary(write_pdf(
            &pages,
            &settings.page,
            &model.title,
        )))
    }
}

/// One line of text at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    /// Baseline, measured from the bottom of the page
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

struct Cursor<'a> {
    page: &'a PageSettings,
    pages: Vec<Vec<PlacedLine>>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(page: &'a PageSettings) -> Self {
        Self {
            page,
            pages: vec![Vec::new()],
            y: page.height - page.margin,
        }
    }

    fn at_top(&self) -> bool {
        self.y >= self.page.height - self.page.margin
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = self.page.height - self.page.margin;
    }

    fn skip(&mut self, points: f32) {
        if !self.at_top() {
            self.y -= points;
        }
    }

    fn place(&mut self, mut line: PlacedLine, height: f32) {
        if self.y - height < self.page.margin && !self.at_top() {
            self.new_page();
        }
        line.y = self.y - line.size;
        self.y -= height;
        if let Some(page) = self.pages.last_mut() {
            page.push(line);
        }
    }
}

/// Distribute `blocks` over pages.
pub fn layout(
    blocks: &[StyledBlock],
    styles: &StyleConfig,
    page: &PageSettings,
) -> Result<Vec<Vec<PlacedLine>>, FormatError> {
    let width = page.content_width();
    if width <= 0.0 || page.height <= 2.0 * page.margin {
        return Err(FormatError::RendererFailure(format!(
            "page {}x{} leaves no room inside {}pt margins",
            page.width, page.height, page.margin
        )));
    }

    let mut cursor = Cursor::new(page);
    for block in blocks {
        let style = styles.get(block.role);
        let size = style.spec.point_size.max(1) as f32;
        let line_height = size * LEADING * style.layout.line_spacing.max(0.1);

        cursor.skip(style.layout.space_before as f32);
        for source_line in block.text.split('\n') {
            for text in wrap(source_line, size, width) {
                let x = page.margin
                    + match style.layout.alignment {
                        Alignment::Center => (width - measure(&text, size)).max(0.0) / 2.0,
                        Alignment::Right => (width - measure(&text, size)).max(0.0),
                        Alignment::Left | Alignment::Justify => 0.0,
                    };
                let line = PlacedLine {
                    text,
                    x,
                    y: 0.0,
                    size,
                    bold: style.spec.bold,
                };
                cursor.place(line, line_height);
            }
        }
        cursor.skip(style.layout.space_after as f32);
    }
    Ok(cursor.pages)
}

fn advance(c: char, size: f32) -> f32 {
    if c.is_ascii() {
        size * 0.5
    } else {
        size
    }
}

fn measure(text: &str, size: f32) -> f32 {
    text.chars().map(|c| advance(c, size)).sum()
}

/// Greedy wrapping: break at spaces where possible, between characters otherwise.
pub fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;

    for word in text.split_inclusive(' ') {
        let word_width = measure(word, size);
        if line_width + measure(word.trim_end(), size) > width && !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
        }
        if word_width <= width {
            line.push_str(word);
            line_width += word_width;
            continue;
        }
        for c in word.chars() {
            let char_width = advance(c, size);
            if line_width + char_width > width && !line.is_empty() {
                lines.push(line.trim_end().to_string());
                line.clear();
                line_width = 0.0;
            }
            line.push(c);
            line_width += char_width;
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn is_win_ansi(c: char) -> bool {
    matches!(c as u32, 0x09 | 0x20..=0x7e | 0xa0..=0xff)
}

/// WinAnsi bytes for `text`; anything outside Latin-1 becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            0x09 => b' ',
            _ => b'?',
        })
        .collect()
}

/// UCS-2 big-endian bytes for `text`, as expected by `UniGB-UCS2-H`.
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|c| u16::try_from(c as u32).unwrap_or(u16::from(b'?')).to_be_bytes())
        .collect()
}

/// A stretch of text shown with a single font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Latin(&'a str),
    Cjk(&'a str),
}

/// Split `text` into maximal Latin-1 and non-Latin-1 stretches.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut latin = true;
    for (index, c) in text.char_indices() {
        let is_latin = is_win_ansi(c);
        if index > start && is_latin != latin {
            segments.push(segment(&text[start..index], latin));
            start = index;
        }
        latin = is_latin;
    }
    if start < text.len() {
        segments.push(segment(&text[start..], latin));
    }
    segments
}

fn segment(text: &str, latin: bool) -> Segment<'_> {
    if latin {
        Segment::Latin(text)
    } else {
        Segment::Cjk(text)
    }
}

fn write_pdf(pages: &[Vec<PlacedLine>], page: &PageSettings, title: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let cjk_id = Ref::new(5);
    let cjk_descendant_id = Ref::new(6);
    let cjk_descriptor_id = Ref::new(7);
    let info_id = Ref::new(8);
    let mut next_id = Ref::new(9);

    let page_ids: Vec<(Ref, Ref)> = pages
        .iter()
        .map(|_| {
            let page_id = next_id.bump();
            let content_id = next_id.bump();
            (page_id, content_id)
        })
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (lines, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(tree_id)
            .contents(*content_id);
        writer
            .resources()
            .fonts()
            .pair(REGULAR_FONT, regular_id)
            .pair(BOLD_FONT, bold_id)
            .pair(CJK_FONT, cjk_id);
        writer.finish();

        let mut content = Content::new();
        for line in lines {
            let latin_font = if line.bold { BOLD_FONT } else { REGULAR_FONT };
            content
                .begin_text()
                .set_text_matrix([1.0, 0.0, 0.0, 1.0, line.x, line.y]);
            for segment in segments(&line.text) {
                match segment {
                    Segment::Latin(text) => content
                        .set_font(latin_font, line.size)
                        .show(Str(&encode_win_ansi(text))),
                    Segment::Cjk(text) => content
                        .set_font(CJK_FONT, line.size)
                        .show(Str(&encode_ucs2(text))),
                };
            }
            content.end_text();
        }
        pdf.stream(*content_id, &content.finish());
    }

    pdf.type1_font(regular_id)
        .base_font(Name(b"Times-Roman"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Times-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.type0_font(cjk_id)
        .base_font(CJK_BASE_FONT)
        .encoding_predefined(CJK_ENCODING)
        .descendant_font(cjk_descendant_id);
    pdf.cid_font(cjk_descendant_id)
        .subtype(CidFontType::Type0)
        .base_font(CJK_BASE_FONT)
        .system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"GB1"),
            supplement: 2,
        })
        .font_descriptor(cjk_descriptor_id)
        .default_width(1000.0);
    pdf.font_descriptor(cjk_descriptor_id)
        .name(CJK_BASE_FONT)
        .flags(FontFlags::SERIF | FontFlags::SYMBOLIC)
        .bbox(Rect::new(-25.0, -254.0, 1000.0, 880.0))
        .italic_angle(0.0)
        .ascent(880.0)
        .descent(-120.0)
        .cap_height(880.0)
        .stem_v(80.0);

    pdf.document_info(info_id).title(TextStr(title));

    pdf.finish()
}
