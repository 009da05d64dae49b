//! The structure model as JSON
//!
//! Output is pretty-printed `{title, description, chapters: [{title, content}]}`. Input may
//! omit any field or set it to `null`; the parsed model is normalized, with the source file
//! name standing in for a missing title.

use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::import::fallback_title;
use crate::model::StructureModel;
use crate::settings::ConversionSettings;

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Structure model as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
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
        let model: StructureModel = serde_json::from_slice(source)
            .map_err(|err| FormatError::ParseError(format!("invalid model JSON: {err}")))?;
        Ok(model.normalized(&fallback_title(source_name, settings.untitled())))
    }

    fn serialize(
        &self,
        model: &StructureModel,
        _settings: &ConversionSettings,
    ) -> Result<SerializedDocument, FormatError> {
        let mut json = serde_json::to_string_pretty(model)
            .map_err(|err| FormatError::RendererFailure(err.to_string()))?;
        json.push('\n');
        Ok(SerializedDocument::Text(json))
    }
}
