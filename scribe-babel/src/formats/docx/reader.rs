//! Paragraph source for DOCX packages.
//!
//! Reads `word/document.xml` (and `word/styles.xml` when present) and turns every `w:p` into an
//! [`ObservedParagraph`]. The observed style is taken from the first run that carries text.
//! Run properties the run leaves unset are looked up, in order, on the paragraph mark
//! (`w:pPr/w:rPr`), the paragraph style (following `w:basedOn`), and the document defaults.

use super::{DOCUMENT_PART, STYLES_PART, W_NS};
use crate::error::FormatError;
use crate::import::ObservedParagraph;
use crate::style::StyleSpec;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Longest `w:basedOn` chain followed before giving up.
const MAX_STYLE_DEPTH: usize = 16;

/// Run properties as written; unset fields are inherited.
#[derive(Debug, Clone, Default, PartialEq)]
struct RunProps {
    font: Option<String>,
    size: Option<i32>,
    bold: Option<bool>,
}

impl RunProps {
    fn from_rpr(rpr: Node) -> Self {
        let font = child(rpr, "rFonts").and_then(|fonts| {
            ["ascii", "hAnsi", "eastAsia", "cs"]
                .into_iter()
                .filter_map(|slot| w_attr(fonts, slot))
                .find(|name| !name.trim().is_empty())
                .map(str::to_string)
        });
        let size = child(rpr, "sz")
            .and_then(|sz| w_attr(sz, "val"))
            .and_then(|val| val.trim().parse::<i32>().ok())
            .map(|half_points| half_points / 2);
        let bold = child(rpr, "b").map(|b| on_off(w_attr(b, "val")));
        Self { font, size, bold }
    }

    fn or(self, fallback: &RunProps) -> Self {
        Self {
            font: self.font.or_else(|| fallback.font.clone()),
            size: self.size.or(fallback.size),
            bold: self.bold.or(fallback.bold),
        }
    }

    fn into_spec(self) -> StyleSpec {
        StyleSpec::new(
            self.font.unwrap_or_default(),
            self.size.unwrap_or(0),
            self.bold.unwrap_or(false),
        )
    }
}

/// Run formatting declared in `word/styles.xml`.
#[derive(Debug, Default)]
struct StyleSheet {
    defaults: RunProps,
    styles: HashMap<String, (RunProps, Option<String>)>,
}

impl StyleSheet {
    fn parse(xml: &str) -> Result<Self, FormatError> {
        let doc = Document::parse(xml)?;
        let mut sheet = StyleSheet::default();

        if let Some(rpr) = doc
            .descendants()
            .find(|n| is_w(n, "rPrDefault"))
            .and_then(|n| child(n, "rPr"))
        {
            sheet.defaults = RunProps::from_rpr(rpr);
        }

        for style in doc.descendants().filter(|n| is_w(n, "style")) {
            let Some(id) = w_attr(style, "styleId") else {
                continue;
            };
            let props = child(style, "rPr").map(RunProps::from_rpr).unwrap_or_default();
            let based_on = child(style, "basedOn")
                .and_then(|n| w_attr(n, "val"))
                .map(str::to_string);
            sheet.styles.insert(id.to_string(), (props, based_on));
        }
        Ok(sheet)
    }

    /// Resolved properties of paragraph style `id`, defaults included.
    fn resolve(&self, id: Option<&str>) -> RunProps {
        let mut props = RunProps::default();
        let mut next = id.map(str::to_string);
        let mut depth = 0;
        while let Some(id) = next.take() {
            if depth == MAX_STYLE_DEPTH {
                break;
            }
            depth += 1;
            if let Some((style, based_on)) = self.styles.get(&id) {
                props = props.or(style);
                next = based_on.clone();
            }
        }
        props.or(&self.defaults)
    }
}

/// Read every paragraph of a DOCX package in body order.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<ObservedParagraph>, FormatError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let document = read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| {
        FormatError::ParseError(format!("DOCX package has no {DOCUMENT_PART}"))
    })?;
    let sheet = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => StyleSheet::parse(&xml)?,
        None => StyleSheet::default(),
    };
    parse_document(&document, &sheet)
}

/// Paragraphs of a bare `word/document.xml` string, without a style sheet.
pub fn parse_document_xml(xml: &str) -> Result<Vec<ObservedParagraph>, FormatError> {
    parse_document(xml, &StyleSheet::default())
}

fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, FormatError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| FormatError::ParseError(format!("cannot read {name}: {err}")))?;
    Ok(Some(xml))
}

fn parse_document(xml: &str, sheet: &StyleSheet) -> Result<Vec<ObservedParagraph>, FormatError> {
    let doc = Document::parse(xml)?;
    let body = doc
        .descendants()
        .find(|n| is_w(n, "body"))
        .ok_or_else(|| FormatError::ParseError("document has no w:body".to_string()))?;

    let paragraphs: Vec<_> = body
        .descendants()
        .filter(|n| is_w(n, "p"))
        .map(|p| read_paragraph(p, sheet))
        .collect();
    debug!(count = paragraphs.len(), "read docx paragraphs");
    Ok(paragraphs)
}

fn read_paragraph(paragraph: Node, sheet: &StyleSheet) -> ObservedParagraph {
    let ppr = child(paragraph, "pPr");
    let runs: Vec<Node> = paragraph
        .descendants()
        .filter(|n| is_w(n, "r") && owned_by(*n, paragraph))
        .collect();

    let mut text = String::new();
    for run in &runs {
        for piece in run.children().filter(Node::is_element) {
            if piece.tag_name().namespace() != Some(W_NS) {
                continue;
            }
            match piece.tag_name().name() {
                "t" => text.push_str(piece.text().unwrap_or_default()),
                "tab" => text.push('\t'),
                "br" | "cr" => text.push('\n'),
                _ => {}
            }
        }
    }

    let styled_run = runs
        .iter()
        .find(|run| {
            run.children()
                .any(|n| is_w(&n, "t") && !n.text().unwrap_or_default().is_empty())
        })
        .or_else(|| runs.first());

    let style = styled_run.map(|run| {
        let own = child(*run, "rPr").map(RunProps::from_rpr).unwrap_or_default();
        let mark = ppr
            .and_then(|ppr| child(ppr, "rPr"))
            .map(RunProps::from_rpr)
            .unwrap_or_default();
        let style_id = ppr
            .and_then(|ppr| child(ppr, "pStyle"))
            .and_then(|n| w_attr(n, "val"));
        own.or(&mark).or(&sheet.resolve(style_id)).into_spec()
    });

    let first_line_indent = ppr.and_then(|ppr| child(ppr, "ind")).and_then(|ind| {
        let twips = |name: &str| w_attr(ind, name).and_then(|v| v.trim().parse::<i32>().ok());
        twips("firstLine").or_else(|| twips("hanging").map(|h| -h))
    });

    ObservedParagraph {
        text: text.trim().to_string(),
        style,
        first_line_indent,
    }
}

fn is_w(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(W_NS)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_w(n, name))
}

fn w_attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((W_NS, name))
}

/// Whether `node` belongs to `paragraph` rather than to a paragraph nested inside it
/// (text boxes).
fn owned_by(node: Node, paragraph: Node) -> bool {
    node.ancestors()
        .skip(1)
        .find(|n| is_w(n, "p"))
        .map_or(false, |p| p == paragraph)
}

/// OOXML on/off value; absent means on.
fn on_off(value: Option<&str>) -> bool {
    !matches!(value.map(str::trim), Some("0" | "false" | "off"))
}
