//! Paragraph-level view of a DOCX manuscript
//!
//! `scribe inspect` replays the import heuristic paragraph by paragraph and shows which
//! role each paragraph was given next to the style observed on its first run. This is the
//! tool to reach for when an import lands text in the wrong place: it shows whether the
//! document's fonts actually match the configured templates.
//!
//! Views:
//!
//! - `table` (default): one line per paragraph, `role | style | text`
//! - `json`: the same rows as a JSON array
//!
//! Blank paragraphs are listed with the role `-` since the importer skips them.

use scribe_babel::{ConversionSettings, ImportMachine, ObservedParagraph, Role};
use serde_json::json;

/// All available inspect views
pub const AVAILABLE_VIEWS: &[&str] = &["table", "json"];

const NO_ROLE: &str = "-";
const NO_STYLE: &str = "(unstyled)";

/// Role assigned to one observed paragraph
pub struct InspectedParagraph<'a> {
    pub paragraph: &'a ObservedParagraph,
    pub role: Option<Role>,
}

/// Run the paragraphs through a fresh import machine, keeping the role of each one.
pub fn classify<'a>(
    paragraphs: &'a [ObservedParagraph],
    settings: &ConversionSettings,
) -> Vec<InspectedParagraph<'a>> {
    let mut machine = ImportMachine::new(&settings.styles, &settings.import);
    paragraphs
        .iter()
        .map(|paragraph| InspectedParagraph {
            paragraph,
            role: machine.feed(paragraph),
        })
        .collect()
}

/// Render the named view
pub fn render(
    paragraphs: &[ObservedParagraph],
    view: &str,
    settings: &ConversionSettings,
) -> Result<String, String> {
    let rows = classify(paragraphs, settings);
    match view {
        "table" => Ok(render_table(&rows)),
        "json" => render_json(&rows),
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn render_table(rows: &[InspectedParagraph<'_>]) -> String {
    let role_width = Role::ALL
        .iter()
        .map(|role| role.as_str().len())
        .max()
        .unwrap_or(0);
    let styles: Vec<String> = rows
        .iter()
        .map(|row| match &row.paragraph.style {
            Some(style) => style.to_string(),
            None => NO_STYLE.to_string(),
        })
        .collect();
    let style_width = styles.iter().map(|s| s.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (row, style) in rows.iter().zip(&styles) {
        let role = row.role.map(|r| r.as_str()).unwrap_or(NO_ROLE);
        let line = format!(
            "{role:<role_width$} | {style:<style_width$} | {}",
            escape_breaks(&row.paragraph.text)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_json(rows: &[InspectedParagraph<'_>]) -> Result<String, String> {
    let values: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "role": row.role,
                "style": row.paragraph.style,
                "firstLineIndent": row.paragraph.first_line_indent,
                "text": row.paragraph.text,
            })
        })
        .collect();
    serde_json::to_string_pretty(&values)
        .map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|e| format!("Failed to serialize inspect rows: {e}"))
}

fn escape_breaks(text: &str) -> String {
    text.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_babel::StyleSpec;

    fn sample() -> Vec<ObservedParagraph> {
        vec![
            ObservedParagraph::styled("My Novel", StyleSpec::new("Serif", 22, true)),
            ObservedParagraph::new("", None),
            ObservedParagraph::styled("Chapter 1: Intro", StyleSpec::new("Serif", 16, true)),
            ObservedParagraph::styled("Hello\nworld.", StyleSpec::new("Serif", 14, false)),
            ObservedParagraph::new("stray", None),
        ]
    }

    #[test]
    fn classify_follows_the_import_machine() {
        let paragraphs = sample();
        let rows = classify(&paragraphs, &ConversionSettings::default());
        let roles: Vec<_> = rows.iter().map(|row| row.role).collect();
        assert_eq!(
            roles,
            vec![
                Some(Role::Title),
                None,
                Some(Role::ChapterTitle),
                Some(Role::ChapterContent),
                Some(Role::ChapterContent),
            ]
        );
    }

    #[test]
    fn table_has_one_line_per_paragraph() {
        let output = render(&sample(), "table", &ConversionSettings::default()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("title "));
        assert!(lines[0].contains("Serif 22pt bold"));
        assert!(lines[0].ends_with("| My Novel"));
        assert!(lines[1].starts_with("- "));
        assert!(lines[3].ends_with("Hello\\nworld."));
        assert!(lines[4].contains(NO_STYLE));
    }

    #[test]
    fn json_view_lists_roles_and_styles() {
        let output = render(&sample(), "json", &ConversionSettings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["role"], "title");
        assert_eq!(value[0]["style"]["pointSize"], 22);
        assert!(value[1]["role"].is_null());
        assert_eq!(value[2]["role"], "chapterTitle");
        assert!(value[4]["style"].is_null());
    }

    #[test]
    fn unknown_view_is_rejected() {
        let err = render(&sample(), "tree", &ConversionSettings::default()).unwrap_err();
        assert!(err.contains("table, json"));
    }
}
