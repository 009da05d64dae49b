//! Settings threaded through every format.

use crate::export::ExportSettings;
use crate::import::ImportSettings;
use crate::style::{FormatOverrides, Role, StyleConfig, StyleOverride};
use std::collections::BTreeMap;

/// Title used when neither the input nor the source name provides one.
pub const DEFAULT_UNTITLED: &str = "Untitled";

/// Page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSettings {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSettings {
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(0.0)
    }
}

impl Default for PageSettings {
    /// A4 portrait with 50pt margins.
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    pub styles: StyleConfig,
    pub import: ImportSettings,
    pub export: ExportSettings,
    pub page: PageSettings,
    pub untitled_title: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            styles: StyleConfig::default(),
            import: ImportSettings::default(),
            export: ExportSettings::default(),
            page: PageSettings::default(),
            untitled_title: DEFAULT_UNTITLED.to_string(),
        }
    }
}

impl ConversionSettings {
    pub fn with_style_overrides(mut self, overrides: &BTreeMap<Role, StyleOverride>) -> Self {
        self.styles = self.styles.merged(overrides);
        self
    }

    pub fn with_format_overrides(self, format: &FormatOverrides) -> Self {
        self.with_style_overrides(&format.to_role_overrides())
    }

    /// The placeholder, falling back to [`DEFAULT_UNTITLED`] when configured blank.
    pub fn untitled(&self) -> &str {
        if self.untitled_title.trim().is_empty() {
            DEFAULT_UNTITLED
        } else {
            &self.untitled_title
        }
    }
}
