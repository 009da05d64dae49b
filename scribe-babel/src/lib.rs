//! Manuscript conversion between structured data and document files
//!
//!     This crate converts a manuscript (title, description, ordered chapters) to DOCX, PDF and
//!     plain text, and reads DOCX files back into the same structure.
//!
//!     TLDR: For format authors:
//!         - Formats never invent structure. Export goes through the export formatter
//!           (./export.rs), import of styled documents goes through the import machine
//!           (./import.rs).
//!         - The style templates in ./style.rs are used both ways: the renderer applies them and
//!           the classifier recognizes them. Changing one side changes the other.
//!         - Renderers only see styled blocks and a StyleConfig.
//!
//!     This is a pure lib, that is, it powers scribe-cli but is shell agnostic: no code
//!     should suppose a shell environment, be it std print, env vars etc. File I/O happens
//!     in the bridge (./bridge.rs) and storage (./storage.rs) only.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model.rs                # StructureModel, Chapter
//!     ├── style.rs                # Roles, StyleSpec, StyleConfig and overrides
//!     ├── classify.rs             # Fuzzy style matching
//!     ├── import.rs               # Paragraph stream -> StructureModel
//!     ├── export.rs               # StructureModel -> styled blocks
//!     ├── settings.rs             # ConversionSettings
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── docx                # reader.rs (paragraph source), writer.rs (renderer)
//!     │   ├── pdf
//!     │   ├── text
//!     │   └── json
//!     ├── storage.rs              # Output location policy
//!     └── bridge.rs               # Host-facing operations and result shape
//!
//! Core Algorithm
//!
//!     A DOCX file is a flat list of paragraphs. The nested structure is recovered from how
//!     the paragraphs look: each one is compared against the role templates (font family,
//!     size within one point, bold) and a single forward pass assigns it a role, committing a
//!     chapter whenever the next chapter heading shows up. See ./import.rs for the details.
//!
//!     Export and import are symmetric but not lossless: blank content lines are dropped on
//!     export and chapter headings come back with their "Chapter N:" prefix unless prefix
//!     stripping is enabled.
//!
//! Formats
//!
//!     - docx: both directions
//!     - pdf: export only, behind the `native-export` feature
//!     - txt: export only
//!     - json: both directions, the model itself
//!
pub mod bridge;
pub mod classify;
pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod import;
pub mod model;
pub mod registry;
pub mod settings;
pub mod storage;
pub mod style;

pub use bridge::{Bridge, ExportRequest, ImportRequest, OperationResult};
pub use error::FormatError;
pub use export::{format_blocks, ExportSettings, StyledBlock};
pub use format::{Format, SerializedDocument};
pub use import::{import_paragraphs, ImportMachine, ImportSettings, ObservedParagraph};
pub use model::{Chapter, StructureModel};
pub use registry::FormatRegistry;
pub use settings::{ConversionSettings, PageSettings};
pub use storage::StorageResolver;
pub use style::{Role, StyleConfig, StyleOverride, StyleSpec};
