//! Shared types passed between the sync and render stages.
//!
//! The sync stage serializes a [`FileDescriptor`] list to `files.json`; the
//! render stage reads it back with [`parse_manifest`]. Both sides must agree
//! on this shape; there is no schema version in the file.

use log::debug;
use serde::{Deserialize, Serialize};

/// Default manifest filename, also the path the gallery fetches over HTTP.
pub const MANIFEST_FILENAME: &str = "files.json";

/// One mirrored attachment.
///
/// `name` and `url` are always present. Everything else may be missing and
/// is rendered as an omitted line (size, date) or "Unknown" (author).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Original filename including extension
    pub name: String,
    /// Direct download link
    pub url: String,
    /// ISO-8601 upload timestamp (the Discord message timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    /// Display name of the uploader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Byte count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MIME type as reported by Discord
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            uploaded_at: None,
            author: None,
            size: None,
            content_type: None,
        }
    }
}

/// Parse manifest JSON leniently.
///
/// - `null` (or an empty body) → `Ok(None)`, which the gallery treats as empty
/// - an array → every entry that reads as a [`FileDescriptor`], in order;
///   entries that don't (non-objects, missing `name`/`url`) are skipped
/// - anything else → `Err`
pub fn parse_manifest(body: &str) -> Result<Option<Vec<FileDescriptor>>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let raw: Option<Vec<serde_json::Value>> = serde_json::from_str(body)?;
    let Some(entries) = raw else {
        return Ok(None);
    };

    let files = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
            Ok(file) => Some(file),
            Err(err) => {
                debug!("manifest: skipping entry {idx}: {err}");
                None
            }
        })
        .collect();
    Ok(Some(files))
}
