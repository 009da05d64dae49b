//! Roles and the style templates that both render and recognize them.
//!
//! A [`StyleSpec`] is the font/size/bold triple the classifier compares. Every role also carries
//! a [`BlockLayout`] (alignment, spacing) that only renderers look at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Font family used by every role unless configured otherwise.
pub const DEFAULT_FONT_FAMILY: &str = "Serif";

/// Point size assumed for a paragraph that has no formatting run.
pub const FALLBACK_POINT_SIZE: i32 = 14;

/// Structural position a paragraph can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Title,
    DescriptionTitle,
    DescriptionContent,
    ChapterTitle,
    ChapterContent,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Title,
        Role::DescriptionTitle,
        Role::DescriptionContent,
        Role::ChapterTitle,
        Role::ChapterContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::DescriptionTitle => "descriptionTitle",
            Role::DescriptionContent => "descriptionContent",
            Role::ChapterTitle => "chapterTitle",
            Role::ChapterContent => "chapterContent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Font family, point size and weight of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    pub font_family: String,
    pub point_size: i32,
    pub bold: bool,
}

impl StyleSpec {
    pub fn new(font_family: impl Into<String>, point_size: i32, bold: bool) -> Self {
        Self {
            font_family: font_family.into(),
            point_size,
            bold,
        }
    }
}

impl fmt::Display for StyleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weight = if self.bold { "bold" } else { "regular" };
        write!(f, "{} {}pt {}", self.font_family, self.point_size, weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Renderer-only layout of a block. Opaque to classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    pub alignment: Alignment,
    /// Line height multiplier (1.0 = single spacing)
    pub line_spacing: f32,
    /// Points of space above the block
    pub space_before: u32,
    /// Points of space below the block
    pub space_after: u32,
}

impl BlockLayout {
    pub fn new(alignment: Alignment, line_spacing: f32, space_before: u32, space_after: u32) -> Self {
        Self {
            alignment,
            line_spacing,
            space_before,
            space_after,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleStyle {
    pub spec: StyleSpec,
    pub layout: BlockLayout,
}

/// Partial style for a role; present fields replace the corresponding defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverride {
    pub font_family: Option<String>,
    pub point_size: Option<i32>,
    pub bold: Option<bool>,
    pub alignment: Option<Alignment>,
    pub line_spacing: Option<f32>,
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
}

impl StyleOverride {
    pub fn point_size(size: i32) -> Self {
        Self {
            point_size: Some(size),
            ..Self::default()
        }
    }

    pub fn line_spacing(spacing: f32) -> Self {
        Self {
            line_spacing: Some(spacing),
            ..Self::default()
        }
    }
}

/// Style template for every role.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    roles: BTreeMap<Role, RoleStyle>,
}

impl StyleConfig {
    /// Built-in templates using `font_family` for all roles.
    pub fn with_font_family(font_family: &str) -> Self {
        let role = |size, bold, layout| RoleStyle {
            spec: StyleSpec::new(font_family, size, bold),
            layout,
        };
        let roles = BTreeMap::from([
            (
                Role::Title,
                role(22, true, BlockLayout::new(Alignment::Center, 1.0, 0, 20)),
            ),
            (
                Role::DescriptionTitle,
                role(16, true, BlockLayout::new(Alignment::Left, 1.0, 15, 8)),
            ),
            (
                Role::DescriptionContent,
                role(14, false, BlockLayout::new(Alignment::Left, 1.5, 0, 15)),
            ),
            (
                Role::ChapterTitle,
                role(16, true, BlockLayout::new(Alignment::Left, 1.0, 15, 10)),
            ),
            (
                Role::ChapterContent,
                role(14, false, BlockLayout::new(Alignment::Left, 1.5, 0, 5)),
            ),
        ]);
        Self { roles }
    }

    pub fn get(&self, role: Role) -> &RoleStyle {
        // every role is inserted on construction and never removed
        &self.roles[&role]
    }

    pub fn spec(&self, role: Role) -> &StyleSpec {
        &self.get(role).spec
    }

    pub fn layout(&self, role: Role) -> &BlockLayout {
        &self.get(role).layout
    }

    pub fn set(&mut self, role: Role, style: RoleStyle) {
        self.roles.insert(role, style);
    }

    /// Merge `patch` field-by-field over the style of `role`.
    pub fn apply_override(&mut self, role: Role, patch: &StyleOverride) {
        let Some(style) = self.roles.get_mut(&role) else {
            return;
        };
        if let Some(family) = &patch.font_family {
            style.spec.font_family = family.clone();
        }
        if let Some(size) = patch.point_size {
            style.spec.point_size = size;
        }
        if let Some(bold) = patch.bold {
            style.spec.bold = bold;
        }
        if let Some(alignment) = patch.alignment {
            style.layout.alignment = alignment;
        }
        if let Some(spacing) = patch.line_spacing {
            style.layout.line_spacing = spacing;
        }
        if let Some(before) = patch.space_before {
            style.layout.space_before = before;
        }
        if let Some(after) = patch.space_after {
            style.layout.space_after = after;
        }
    }

    pub fn merged(mut self, overrides: &BTreeMap<Role, StyleOverride>) -> Self {
        for (role, patch) in overrides {
            self.apply_override(*role, patch);
        }
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::with_font_family(DEFAULT_FONT_FAMILY)
    }
}

/// The size-only knobs hosts send alongside an export request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOverrides {
    pub title_size: Option<i32>,
    pub heading_size: Option<i32>,
    pub body_size: Option<i32>,
    pub line_spacing: Option<f32>,
}

impl FormatOverrides {
    /// Expand into per-role overrides: headings cover both heading roles, body covers both
    /// content roles.
    pub fn to_role_overrides(&self) -> BTreeMap<Role, StyleOverride> {
        let mut overrides: BTreeMap<Role, StyleOverride> = BTreeMap::new();
        let mut sized = |roles: &[Role], size: Option<i32>| {
            if let Some(size) = size {
                for role in roles {
                    overrides.entry(*role).or_default().point_size = Some(size);
                }
            }
        };
        sized(&[Role::Title], self.title_size);
        sized(&[Role::DescriptionTitle, Role::ChapterTitle], self.heading_size);
        sized(&[Role::DescriptionContent, Role::ChapterContent], self.body_size);
        if let Some(spacing) = self.line_spacing {
            for role in [Role::DescriptionContent, Role::ChapterContent] {
                overrides.entry(role).or_default().line_spacing = Some(spacing);
            }
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_role_table() {
        let styles = StyleConfig::default();
        assert_eq!(styles.spec(Role::Title), &StyleSpec::new("Serif", 22, true));
        assert_eq!(styles.spec(Role::DescriptionTitle), &StyleSpec::new("Serif", 16, true));
        assert_eq!(
            styles.spec(Role::DescriptionContent),
            &StyleSpec::new("Serif", 14, false)
        );
        assert_eq!(styles.spec(Role::ChapterTitle), &StyleSpec::new("Serif", 16, true));
        assert_eq!(styles.spec(Role::ChapterContent), &StyleSpec::new("Serif", 14, false));
        assert_eq!(styles.layout(Role::Title).alignment, Alignment::Center);
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let overrides = BTreeMap::from([(Role::Title, StyleOverride::point_size(26))]);
        let styles = StyleConfig::default().merged(&overrides);
        assert_eq!(styles.spec(Role::Title), &StyleSpec::new("Serif", 26, true));
        assert_eq!(styles.spec(Role::ChapterTitle).point_size, 16);
    }

    #[test]
    fn format_overrides_fan_out_to_roles() {
        let format = FormatOverrides {
            heading_size: Some(18),
            line_spacing: Some(2.0),
            ..FormatOverrides::default()
        };
        let styles = StyleConfig::default().merged(&format.to_role_overrides());
        assert_eq!(styles.spec(Role::DescriptionTitle).point_size, 18);
        assert_eq!(styles.spec(Role::ChapterTitle).point_size, 18);
        assert_eq!(styles.spec(Role::Title).point_size, 22);
        assert_eq!(styles.layout(Role::ChapterContent).line_spacing, 2.0);
        assert_eq!(styles.layout(Role::ChapterTitle).line_spacing, 1.0);
    }

    #[test]
    fn role_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("heading".parse::<Role>().is_err());
    }

    #[test]
    fn style_override_deserializes_from_camel_case() {
        let patch: StyleOverride =
            serde_json::from_str(r#"{"fontFamily": "宋体", "pointSize": 20}"#).unwrap();
        assert_eq!(patch.font_family.as_deref(), Some("宋体"));
        assert_eq!(patch.point_size, Some(20));
        assert_eq!(patch.bold, None);
    }
}
