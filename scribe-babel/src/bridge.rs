//! Host-facing operations.
//!
//! The bridge is what an embedding host talks to: requests arrive as loosely filled JSON
//! objects, every answer is an [`OperationResult`], and nothing else escapes. Failures are
//! reported in the result, never returned as `Err`, and every result carries the elapsed
//! time of the call.
//!
//! ```ignore
//! let bridge = Bridge::default();
//! let result = bridge.export_json("docx", r#"{"title": "My Novel", "chapters": []}"#);
//! println!("{}", result.to_json());
//! ```

use crate::error::FormatError;
use crate::format::SerializedDocument;
use crate::model::{Chapter, StructureModel};
use crate::registry::FormatRegistry;
use crate::settings::ConversionSettings;
use crate::storage::StorageResolver;
use crate::style::{FormatOverrides, Role, StyleOverride};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Tagged outcome of a bridge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructureModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl OperationResult {
    fn finish(outcome: Result<Outcome, FormatError>, started: Instant) -> Self {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(Outcome::Written(path)) => Self {
                success: true,
                data: None,
                path: Some(path.display().to_string()),
                error: None,
                duration_ms,
            },
            Ok(Outcome::Imported(model)) => Self {
                success: true,
                data: Some(model),
                path: None,
                error: None,
                duration_ms,
            },
            Err(err) => {
                warn!(%err, "bridge operation failed");
                Self {
                    success: false,
                    data: None,
                    path: None,
                    error: Some(err.to_string()),
                    duration_ms,
                }
            }
        }
    }

    /// Compact JSON for the host.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                r#"{{"success":false,"error":"result serialization failed: {}","durationMs":{}}}"#,
                err.to_string().replace('"', "'"),
                self.duration_ms
            )
        })
    }
}

enum Outcome {
    Written(PathBuf),
    Imported(StructureModel),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Export request as sent by the host. Every field may be missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub chapters: Option<Vec<ChapterInput>>,
    pub save_path: Option<String>,
    /// Size and spacing overrides for this export only
    pub format: Option<FormatOverrides>,
}

impl ExportRequest {
    /// The normalized model, with `untitled` for a missing title.
    pub fn to_model(&self, untitled: &str) -> StructureModel {
        StructureModel {
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            chapters: self
                .chapters
                .iter()
                .flatten()
                .map(|chapter| {
                    Chapter::new(
                        chapter.title.clone().unwrap_or_default(),
                        chapter.content.clone().unwrap_or_default(),
                    )
                })
                .collect(),
        }
        .normalized(untitled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRequest {
    pub file_path: Option<String>,
    /// Per-role overrides merged over the configured styles
    pub style_config: Option<BTreeMap<Role, StyleOverride>>,
}

impl ImportRequest {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            style_config: None,
        }
    }
}

/// Entry point for hosts: export and import with results instead of errors.
pub struct Bridge {
    registry: FormatRegistry,
    settings: ConversionSettings,
    storage: StorageResolver,
}

impl Bridge {
    pub fn new(settings: ConversionSettings, storage: StorageResolver) -> Self {
        Self {
            registry: FormatRegistry::with_defaults(),
            settings,
            storage,
        }
    }

    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn storage(&self) -> &StorageResolver {
        &self.storage
    }

    /// Render `request` as `format` and write it to disk.
    pub fn export(&self, format: &str, request: &ExportRequest) -> OperationResult {
        let started = Instant::now();
        let outcome = self.try_export(format, request).map(Outcome::Written);
        OperationResult::finish(outcome, started)
    }

    /// [`Bridge::export`] with the request as a JSON string.
    pub fn export_json(&self, format: &str, request: &str) -> OperationResult {
        let started = Instant::now();
        let outcome = parse_request::<ExportRequest>(request)
            .and_then(|request| self.try_export(format, &request))
            .map(Outcome::Written);
        OperationResult::finish(outcome, started)
    }

    /// Read the file named by `request` back into a model.
    pub fn import(&self, request: &ImportRequest) -> OperationResult {
        let started = Instant::now();
        let outcome = self.try_import(request).map(Outcome::Imported);
        OperationResult::finish(outcome, started)
    }

    /// [`Bridge::import`] with the request as a JSON string.
    pub fn import_json(&self, request: &str) -> OperationResult {
        let started = Instant::now();
        let outcome = parse_request::<ImportRequest>(request)
            .and_then(|request| self.try_import(&request))
            .map(Outcome::Imported);
        OperationResult::finish(outcome, started)
    }

    fn try_export(&self, format: &str, request: &ExportRequest) -> Result<PathBuf, FormatError> {
        let fmt = self.registry.get(format)?;
        let settings = match &request.format {
            Some(overrides) => self.settings.clone().with_format_overrides(overrides),
            None => self.settings.clone(),
        };
        let model = request.to_model(settings.untitled());

        let path = match request.save_path.as_deref().map(str::trim) {
            Some(requested) if !requested.is_empty() => self.storage.resolve(Path::new(requested))?,
            _ => {
                let extension = fmt.file_extensions().first().copied().unwrap_or(format);
                self.storage
                    .default_path(&model.title, extension, Local::now().naive_local())?
            }
        };

        let bytes = self
            .registry
            .serialize(&model, format, &settings)
            .map(SerializedDocument::into_bytes)?;
        fs::write(&path, bytes).map_err(|err| {
            FormatError::RendererFailure(format!("cannot write {}: {err}", path.display()))
        })?;

        info!(
            format,
            path = %path.display(),
            chapters = model.chapters.len(),
            "export finished"
        );
        Ok(path)
    }

    fn try_import(&self, request: &ImportRequest) -> Result<StructureModel, FormatError> {
        let file_path = request
            .file_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| FormatError::InvalidInput("filePath is required".to_string()))?;

        let bytes = fs::read(file_path).map_err(|err| {
            FormatError::SourceUnavailable(format!("cannot read {file_path}: {err}"))
        })?;
        let format = self
            .registry
            .detect_format_from_filename(file_path)
            .unwrap_or_else(|| "docx".to_string());

        let settings = match &request.style_config {
            Some(overrides) => self.settings.clone().with_style_overrides(overrides),
            None => self.settings.clone(),
        };
        let model = self.registry.parse(&bytes, file_path, &format, &settings)?;

        info!(
            file = file_path,
            chapters = model.chapters.len(),
            "import finished"
        );
        Ok(model)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(ConversionSettings::default(), StorageResolver::new(Vec::new()))
    }
}

fn parse_request<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T, FormatError> {
    serde_json::from_str(json)
        .map_err(|err| FormatError::InvalidInput(format!("malformed request: {err}")))
}
