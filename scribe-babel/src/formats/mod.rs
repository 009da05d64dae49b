//! Format implementations
//!
//! This module contains all format implementations that convert between
//! a [`crate::model::StructureModel`] and document files.

pub mod docx;
pub mod json;
#[cfg(feature = "native-export")]
pub mod pdf;
pub mod text;

pub use docx::DocxFormat;
pub use json::JsonFormat;
#[cfg(feature = "native-export")]
pub use pdf::PdfFormat;
pub use text::TextFormat;
