//! Minimal WordprocessingML package writer.
//!
//! One paragraph per [`StyledBlock`], one run per paragraph. The run carries the role's font in
//! all four `rFonts` slots so the reader recovers the same family whatever script the text is in.

use super::{DOCUMENT_PART, W_NS};
use crate::error::FormatError;
use crate::export::StyledBlock;
use crate::settings::PageSettings;
use crate::style::{Alignment, StyleConfig};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Twips per point.
const TWIPS: f32 = 20.0;

/// Build the `.docx` bytes for `blocks`. `title` goes into the package properties.
pub fn render(
    blocks: &[StyledBlock],
    styles: &StyleConfig,
    page: &PageSettings,
    title: &str,
) -> Result<Vec<u8>, FormatError> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("docProps/core.xml", core_properties(title)),
        (DOCUMENT_PART, document_xml(blocks, styles, page)),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in parts {
        zip.start_file(name, options).map_err(container_error)?;
        zip.write_all(xml.as_bytes())
            .map_err(|err| FormatError::RendererFailure(format!("cannot write {name}: {err}")))?;
    }
    let cursor = zip.finish().map_err(container_error)?;
    Ok(cursor.into_inner())
}

fn container_error(err: zip::result::ZipError) -> FormatError {
    FormatError::RendererFailure(format!("DOCX container error: {err}"))
}

fn core_properties(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title></cp:coreProperties>"#,
        escape(title)
    )
}

/// The `word/document.xml` part.
pub fn document_xml(blocks: &[StyledBlock], styles: &StyleConfig, page: &PageSettings) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(xml, r#"<w:document xmlns:w="{W_NS}"><w:body>"#);
    for block in blocks {
        write_paragraph(&mut xml, block, styles);
    }
    let margin = twips(page.margin);
    let _ = write!(
        xml,
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{margin}" w:right="{margin}" w:bottom="{margin}" w:left="{margin}" w:header="0" w:footer="0" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        twips(page.width),
        twips(page.height),
    );
    xml
}

fn write_paragraph(xml: &mut String, block: &StyledBlock, styles: &StyleConfig) {
    let style = styles.get(block.role);
    let layout = &style.layout;
    let spec = &style.spec;
    let font = escape(&spec.font_family);
    let half_points = spec.point_size.saturating_mul(2);

    let _ = write!(
        xml,
        r#"<w:p><w:pPr><w:spacing w:before="{}" w:after="{}" w:line="{}" w:lineRule="auto"/><w:jc w:val="{}"/></w:pPr>"#,
        layout.space_before.saturating_mul(20),
        layout.space_after.saturating_mul(20),
        (240.0 * layout.line_spacing).round() as i32,
        justification(layout.alignment),
    );
    let _ = write!(
        xml,
        r#"<w:r><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>"#
    );
    if spec.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    let _ = write!(
        xml,
        r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/></w:rPr>"#
    );
    for (index, line) in block.text.split('\n').enumerate() {
        if index > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(line));
    }
    xml.push_str("</w:r></w:p>");
}

fn justification(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

fn twips(points: f32) -> i32 {
    (points * TWIPS).round() as i32
}

/// Escape text for XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // not representable in XML 1.0
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}
