//! Fuzzy style matching.
//!
//! Documents that went through a word processor rarely keep the exact style they were written
//! with: font names pick up fallback lists, sizes get rounded. Matching is therefore lenient:
//!
//! - family: either name contains the other (case-sensitive)
//! - size: within [`SIZE_TOLERANCE`] points
//! - bold: exact
//!
//! A missing spec on either side never matches.

use crate::style::{Role, StyleConfig, StyleSpec, FALLBACK_POINT_SIZE};

/// Largest point size difference that still counts as a match.
pub const SIZE_TOLERANCE: i32 = 1;

/// Lenient family comparison. An empty name counts as absent.
pub fn family_matches(observed: &str, target: &str) -> bool {
    if observed.is_empty() || target.is_empty() {
        return false;
    }
    observed.contains(target) || target.contains(observed)
}

pub fn matches(observed: Option<&StyleSpec>, target: Option<&StyleSpec>) -> bool {
    let (Some(observed), Some(target)) = (observed, target) else {
        return false;
    };
    family_matches(&observed.font_family, &target.font_family)
        && observed.point_size.abs_diff(target.point_size) <= SIZE_TOLERANCE.unsigned_abs()
        && observed.bold == target.bold
}

/// Matches observed paragraph styles against the role templates of a [`StyleConfig`].
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    styles: &'a StyleConfig,
    fallback: StyleSpec,
}

impl<'a> Classifier<'a> {
    /// Uses `{chapter content family, 14pt, regular}` for paragraphs without runs.
    pub fn new(styles: &'a StyleConfig) -> Self {
        let family = styles.spec(Role::ChapterContent).font_family.clone();
        Self::with_fallback(styles, StyleSpec::new(family, FALLBACK_POINT_SIZE, false))
    }

    pub fn with_fallback(styles: &'a StyleConfig, fallback: StyleSpec) -> Self {
        Self { styles, fallback }
    }

    pub fn styles(&self) -> &StyleConfig {
        self.styles
    }

    /// The style a paragraph is judged by: its own, or the fallback when it has no run.
    pub fn effective<'s>(&'s self, observed: Option<&'s StyleSpec>) -> &'s StyleSpec {
        observed.unwrap_or(&self.fallback)
    }

    pub fn matches_role(&self, observed: Option<&StyleSpec>, role: Role) -> bool {
        matches(Some(self.effective(observed)), Some(self.styles.spec(role)))
    }
}
