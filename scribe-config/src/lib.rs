//! Shared configuration loader for the scribe toolchain.
//!
//! `defaults/scribe.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ScribeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use scribe_babel::export::ExportSettings;
use scribe_babel::import::ImportSettings;
use scribe_babel::settings::{ConversionSettings, PageSettings};
use scribe_babel::storage::StorageResolver;
use scribe_babel::style::{Alignment, BlockLayout, Role, RoleStyle, StyleConfig, StyleSpec};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOML: &str = include_str!("../defaults/scribe.default.toml");

/// File picked up from the working directory when present.
pub const USER_CONFIG_FILE: &str = "scribe.toml";

/// Top-level configuration consumed by scribe applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ScribeConfig {
    pub document: DocumentConfig,
    pub styles: StylesConfig,
    pub export: ExportConfig,
    pub import: ImportConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub untitled_title: String,
    pub font_family: String,
}

/// One template per role.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesConfig {
    pub title: RoleStyleConfig,
    pub description_title: RoleStyleConfig,
    pub description_content: RoleStyleConfig,
    pub chapter_title: RoleStyleConfig,
    pub chapter_content: RoleStyleConfig,
}

impl StylesConfig {
    pub fn get(&self, role: Role) -> &RoleStyleConfig {
        match role {
            Role::Title => &self.title,
            Role::DescriptionTitle => &self.description_title,
            Role::DescriptionContent => &self.description_content,
            Role::ChapterTitle => &self.chapter_title,
            Role::ChapterContent => &self.chapter_content,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleStyleConfig {
    /// Falls back to `document.font_family`
    #[serde(default)]
    pub font_family: Option<String>,
    pub point_size: i32,
    pub bold: bool,
    pub alignment: Alignment,
    pub line_spacing: f32,
    pub space_before: u32,
    pub space_after: u32,
}

impl RoleStyleConfig {
    fn to_role_style(&self, default_family: &str) -> RoleStyle {
        RoleStyle {
            spec: StyleSpec::new(
                self.font_family.as_deref().unwrap_or(default_family),
                self.point_size,
                self.bold,
            ),
            layout: BlockLayout::new(
                self.alignment,
                self.line_spacing,
                self.space_before,
                self.space_after,
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub description_label: String,
    pub chapter_heading: String,
    pub page: PageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub description_markers: Vec<String>,
    pub indent_unit: i32,
    pub fallback_point_size: i32,
    pub strip_chapter_prefix: bool,
    pub max_chapter_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub directories: Vec<PathBuf>,
}

impl From<&StorageConfig> for StorageResolver {
    fn from(config: &StorageConfig) -> Self {
        StorageResolver::new(config.directories.iter().cloned())
    }
}

impl From<&ScribeConfig> for StyleConfig {
    fn from(config: &ScribeConfig) -> Self {
        let family = &config.document.font_family;
        let mut styles = StyleConfig::with_font_family(family);
        for role in Role::ALL {
            styles.set(role, config.styles.get(role).to_role_style(family));
        }
        styles
    }
}

impl From<&ImportConfig> for ImportSettings {
    fn from(config: &ImportConfig) -> Self {
        ImportSettings {
            description_markers: config.description_markers.clone(),
            indent_unit: config.indent_unit,
            fallback_point_size: config.fallback_point_size,
            strip_chapter_prefix: config.strip_chapter_prefix,
            max_chapter_chars: config.max_chapter_chars,
        }
    }
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        ExportSettings {
            description_label: config.description_label.clone(),
            chapter_heading: config.chapter_heading.clone(),
        }
    }
}

impl From<&PageConfig> for PageSettings {
    fn from(config: &PageConfig) -> Self {
        PageSettings {
            width: config.width,
            height: config.height,
            margin: config.margin,
        }
    }
}

impl From<&ScribeConfig> for ConversionSettings {
    fn from(config: &ScribeConfig) -> Self {
        ConversionSettings {
            styles: config.into(),
            import: (&config.import).into(),
            export: (&config.export).into(),
            page: (&config.export.page).into(),
            untitled_title: config.document.untitled_title.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ScribeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ScribeConfig, ConfigError> {
    Loader::new().build()
}
