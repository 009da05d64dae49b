//! Error types for conversion operations

use std::fmt;

/// Errors that can occur while importing, exporting or storing manuscripts
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// A required field is missing or malformed and no safe default exists
    InvalidInput(String),
    /// The source file is missing or unreadable
    SourceUnavailable(String),
    /// The source could be read but not understood (bad container, bad XML, no paragraphs)
    ParseError(String),
    /// The renderer failed to produce or write the document
    RendererFailure(String),
    /// No writable location was found for the output
    StorageUnavailable(String),
    /// Format does not support the requested direction
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            FormatError::SourceUnavailable(msg) => write!(f, "Source unavailable: {msg}"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::RendererFailure(msg) => write!(f, "Renderer failure: {msg}"),
            FormatError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<zip::result::ZipError> for FormatError {
    fn from(err: zip::result::ZipError) -> Self {
        FormatError::ParseError(format!("DOCX container error: {err}"))
    }
}

impl From<roxmltree::Error> for FormatError {
    fn from(err: roxmltree::Error) -> Self {
        FormatError::ParseError(format!("XML parsing error: {err}"))
    }
}
