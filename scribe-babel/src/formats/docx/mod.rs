//! DOCX format implementation
//!
//! Export writes one styled paragraph per block (see [`writer`]). Import reads paragraphs back
//! with their run style (see [`reader`]) and hands them to the import state machine, which
//! recognizes roles by the same templates the writer used.

pub mod reader;
pub mod writer;

use crate::error::FormatError;
use crate::export::format_blocks;
use crate::format::{Format, SerializedDocument};
use crate::import::import_paragraphs;
use crate::model::StructureModel;
use crate::settings::ConversionSettings;
use tracing::debug;

pub use reader::read_paragraphs;

/// WordprocessingML main namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";

/// Format implementation for Word documents
pub struct DocxFormat;

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Word document; structure recovered from paragraph styles"
    }

    fn file_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(
        &self,
        source: &[u8],
        source_name: &str,
        settings: &ConversionSettings,
    ) -> Result<StructureModel, FormatError> {
        let paragraphs = read_paragraphs(source)?;
        import_paragraphs(
            paragraphs,
            &settings.styles,
            &settings.import,
            source_name,
            settings.untitled(),
        )
    }

    fn serialize(
        &self,
        model: &StructureModel,
        settings: &ConversionSettings,
    ) -> Result<SerializedDocument, FormatError> {
        let blocks = format_blocks(model, &settings.export);
        debug!(blocks = blocks.len(), "rendering docx");
        writer::render(&blocks, &settings.styles, &settings.page, &model.title)
            .map(SerializedDocument::Binary)
    }
}
