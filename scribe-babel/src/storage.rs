//! Where exported files land.
//!
//! Candidate directories are tried in order and the first writable one wins; the system temp
//! directory is always the last candidate. Selection is separated from probing
//! ([`first_writable`] takes the probe as a closure) so the policy can be tested without
//! touching the filesystem.

use crate::error::FormatError;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Timestamp suffix appended to generated file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageResolver {
    candidates: Vec<PathBuf>,
}

impl StorageResolver {
    /// Resolver over `candidates`, followed by the system temp directory.
    pub fn new(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = candidates.into_iter().collect();
        let temp = std::env::temp_dir();
        if !candidates.contains(&temp) {
            candidates.push(temp);
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that can be created and written to.
    pub fn first_writable(&self) -> Option<&Path> {
        first_writable(&self.candidates, probe_writable)
    }

    /// Final location for a requested output path.
    ///
    /// The requested directory is used if it is writable. Otherwise the file name moves into
    /// the first writable candidate.
    pub fn resolve(&self, requested: &Path) -> Result<PathBuf, FormatError> {
        self.resolve_with(requested, probe_writable)
    }

    pub fn resolve_with<P>(&self, requested: &Path, mut probe: P) -> Result<PathBuf, FormatError>
    where
        P: FnMut(&Path) -> bool,
    {
        let directory = match requested.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if probe(directory) {
            return Ok(requested.to_path_buf());
        }

        let file_name = requested.file_name().ok_or_else(|| {
            FormatError::InvalidInput(format!("'{}' has no file name", requested.display()))
        })?;
        let fallback = first_writable(&self.candidates, probe).ok_or_else(|| {
            FormatError::StorageUnavailable(format!(
                "neither {} nor any configured directory is writable",
                directory.display()
            ))
        })?;
        warn!(
            requested = %directory.display(),
            fallback = %fallback.display(),
            "requested directory is not writable, using fallback"
        );
        Ok(fallback.join(file_name))
    }

    /// A fresh path for `title` in the first writable candidate, e.g.
    /// `exports/My_Novel_20240102_030405.docx`.
    pub fn default_path(
        &self,
        title: &str,
        extension: &str,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf, FormatError> {
        let directory = self.first_writable().ok_or_else(|| {
            FormatError::StorageUnavailable("no writable export directory".to_string())
        })?;
        let path = unique_path(&directory.join(default_file_name(title, extension, timestamp)));
        debug!(path = %path.display(), "generated export path");
        Ok(path)
    }
}

/// The first candidate `probe` accepts.
pub fn first_writable<P>(candidates: &[PathBuf], mut probe: P) -> Option<&Path>
where
    P: FnMut(&Path) -> bool,
{
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|candidate| probe(candidate))
}

/// Create `directory` if needed and check a file can be written into it.
pub fn probe_writable(directory: &Path) -> bool {
    if fs::create_dir_all(directory).is_err() {
        return false;
    }
    let probe = directory.join(format!(".scribe-probe-{}", std::process::id()));
    match fs::write(&probe, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(err) => {
            debug!(directory = %directory.display(), %err, "directory is not writable");
            false
        }
    }
}

/// Keep ASCII letters, digits and CJK ideographs; everything else becomes `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<sanitized title>_<YYYYMMDD_HHMMSS>.<extension>`
pub fn default_file_name(title: &str, extension: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        sanitize_title(title),
        timestamp.format(TIMESTAMP_FORMAT),
        extension.trim_start_matches('.')
    )
}

/// `path` if unused, otherwise the first free `stem_N.ext` for N = 1, 2, ...
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let directory = path.parent().unwrap_or_else(|| Path::new(""));

    (1..)
        .map(|counter| directory.join(format!("{stem}_{counter}{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
