//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for reading documents into a [`StructureModel`] and
//! rendering a model back out.

use crate::error::FormatError;
use crate::model::StructureModel;
use crate::settings::ConversionSettings;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedDocument {
    /// UTF-8 text output (e.g., json, txt)
    Text(String),
    /// Binary output (e.g., docx, pdf)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, SerializedDocument::Binary(_))
    }
}

/// Trait for document formats
///
/// Implementors convert between raw bytes and a [`StructureModel`]. Formats can support
/// parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(
///         &self,
///         model: &StructureModel,
///         settings: &ConversionSettings,
///     ) -> Result<SerializedDocument, FormatError> {
///         Ok(SerializedDocument::Text(model.title.clone()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "docx", "pdf", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["docx"], ["txt", "text"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (bytes → model)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (model → bytes)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Read `source` into a model. `source_name` is the file the bytes came from and supplies
    /// the fallback title.
    ///
    /// Default implementation returns NotSupported error.
    fn parse(
        &self,
        _source: &[u8],
        _source_name: &str,
        _settings: &ConversionSettings,
    ) -> Result<StructureModel, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Render a model.
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(
        &self,
        _model: &StructureModel,
        _settings: &ConversionSettings,
    ) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
