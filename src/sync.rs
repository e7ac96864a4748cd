//! Sync stage: Discord messages → `files.json`.
//!
//! ```text
//! fetch (1 request)  →  extract attachments  →  sort newest first  →  write
//! ```
//!
//! Each run replaces the manifest wholesale. Files that scroll out of the
//! fetch window simply disappear from the listing; nothing is tracked across
//! runs. When the freshly rendered JSON is byte-identical to what is already
//! on disk the file is left alone, so a scheduled CI job only commits when
//! something actually changed.

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, MirrorConfig};
use crate::discord::{DiscordClient, DiscordError, Message};
use crate::format::parse_timestamp;
use crate::types::FileDescriptor;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discord(#[from] DiscordError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Author label for messages whose author has no usable name.
pub const UNKNOWN_AUTHOR: &str = "Unknown";
/// Filename for attachments that don't report one.
pub const UNKNOWN_FILENAME: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// What a sync run did, for CLI output.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub messages: usize,
    pub files: Vec<FileDescriptor>,
    pub manifest_path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Flatten message attachments into file descriptors, in message order.
///
/// Messages without attachments are skipped. Attachments without a URL
/// can't be linked to and are dropped with a warning.
pub fn extract_attachments(messages: &[Message]) -> Vec<FileDescriptor> {
    let mut files = Vec::new();

    for msg in messages.iter().filter(|m| !m.attachments.is_empty()) {
        let author = msg
            .author
            .as_ref()
            .and_then(|a| a.display_name())
            .unwrap_or(UNKNOWN_AUTHOR);

        for attachment in &msg.attachments {
            let name = attachment
                .filename
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
            let Some(url) = attachment.url.clone().filter(|u| !u.is_empty()) else {
                warn!("sync: message {} attachment {name} has no url, skipping", msg.id);
                continue;
            };

            files.push(FileDescriptor {
                name,
                url,
                uploaded_at: msg.timestamp.clone().filter(|t| !t.is_empty()),
                author: Some(author.to_string()),
                size: attachment.size,
                content_type: attachment.content_type.clone().filter(|c| !c.is_empty()),
            });
        }
    }

    info!("sync: extracted {} attachments", files.len());
    files
}

/// Stable sort by upload time, newest first. Undated entries go last.
pub fn sort_newest_first(files: &mut [FileDescriptor]) {
    files.sort_by_key(|f| std::cmp::Reverse(f.uploaded_at.as_deref().and_then(parse_timestamp)));
}

/// Render the manifest exactly as it is written to disk.
pub fn manifest_json(files: &[FileDescriptor]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(files)?;
    json.push('\n');
    Ok(json)
}

/// Write the manifest, creating parent directories.
///
/// Leaves the file untouched when its contents would not change.
pub fn write_manifest(files: &[FileDescriptor], path: &Path) -> Result<WriteOutcome, SyncError> {
    let json = manifest_json(files)?;

    if let Ok(existing) = fs::read_to_string(path)
        && existing == json
    {
        info!("sync: {} unchanged", path.display());
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("sync: wrote {} entries to {}", files.len(), path.display());
    Ok(WriteOutcome::Written)
}

/// Run the full sync: one request, extract, sort, write.
pub async fn run_sync(config: &MirrorConfig, token: &str) -> Result<SyncReport, SyncError> {
    let channel_id = config.channel_id()?;
    let client = DiscordClient::new(&config.discord.api_base, token, config.discord.timeout())?;

    let messages = client
        .fetch_messages(channel_id, config.discord.message_limit)
        .await?;

    let mut files = extract_attachments(&messages);
    sort_newest_first(&mut files);

    let manifest_path = config.output.manifest_path();
    let outcome = write_manifest(&files, &manifest_path)?;

    Ok(SyncReport {
        messages: messages.len(),
        files,
        manifest_path,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn skips_messages_without_attachments() {
        let messages = vec![
            message("1", Some("alice"), Some("2024-01-01T00:00:00+00:00"), vec![]),
            message(
                "2",
                Some("bob"),
                Some("2024-01-02T00:00:00+00:00"),
                vec![attachment("a.png", Some(10))],
            ),
        ];
        let files = extract_attachments(&messages);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].author.as_deref(), Some("bob"));
    }

    #[test]
    fn one_descriptor_per_attachment_with_shared_message_fields() {
        let messages = vec![message(
            "1",
            Some("alice"),
            Some("2024-01-01T12:00:00+00:00"),
            vec![attachment("a.png", Some(1)), attachment("b.zip", Some(2))],
        )];
        let files = extract_attachments(&messages);
        assert_eq!(file_names(&files), vec!["a.png", "b.zip"]);
        assert!(files.iter().all(|f| f.author.as_deref() == Some("alice")));
        assert!(
            files
                .iter()
                .all(|f| f.uploaded_at.as_deref() == Some("2024-01-01T12:00:00+00:00"))
        );
    }

    #[test]
    fn missing_author_is_unknown() {
        let messages = vec![message(
            "1",
            None,
            None,
            vec![attachment("a.png", None)],
        )];
        let files = extract_attachments(&messages);
        assert_eq!(files[0].author.as_deref(), Some(UNKNOWN_AUTHOR));
        assert_eq!(files[0].uploaded_at, None);
        assert_eq!(files[0].size, None);
    }

    #[test]
    fn missing_filename_is_unknown_and_missing_url_is_dropped() {
        let mut nameless = attachment("", Some(5));
        nameless.filename = None;
        let mut unlinked = attachment("ghost.txt", Some(5));
        unlinked.url = None;

        let messages = vec![message("1", Some("a"), None, vec![nameless, unlinked])];
        let files = extract_attachments(&messages);
        assert_eq!(file_names(&files), vec![UNKNOWN_FILENAME]);
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let mut files = vec![
            dated("old", Some("2023-05-01T00:00:00+00:00")),
            dated("undated", None),
            dated("new", Some("2024-05-01T00:00:00.500000+00:00")),
            dated("garbage", Some("yesterday")),
            dated("mid", Some("2024-01-01T00:00:00Z")),
        ];
        sort_newest_first(&mut files);
        assert_eq!(
            file_names(&files),
            vec!["new", "mid", "old", "undated", "garbage"]
        );
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let ts = Some("2024-01-01T00:00:00+00:00");
        let mut files = vec![dated("first", ts), dated("second", ts), dated("third", ts)];
        sort_newest_first(&mut files);
        assert_eq!(file_names(&files), vec!["first", "second", "third"]);
    }

    #[test]
    fn write_manifest_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs/nested/files.json");
        let files = vec![sample_file("a.png")];

        let outcome = write_manifest(&files, &path).unwrap();
        assert_eq!(outcome, WriteOutcome::Written);

        let body = fs::read_to_string(&path).unwrap();
        let back: Vec<FileDescriptor> = serde_json::from_str(&body).unwrap();
        assert_eq!(back, files);
        // Two-space pretty printing
        assert!(body.starts_with("[\n  {\n    \"name\""));
    }

    #[test]
    fn write_manifest_reports_unchanged_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("files.json");
        let files = vec![sample_file("a.png")];

        assert_eq!(write_manifest(&files, &path).unwrap(), WriteOutcome::Written);
        assert_eq!(write_manifest(&files, &path).unwrap(), WriteOutcome::Unchanged);

        let more = vec![sample_file("a.png"), sample_file("b.png")];
        assert_eq!(write_manifest(&more, &path).unwrap(), WriteOutcome::Written);
    }

    #[test]
    fn empty_sync_writes_empty_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("files.json");
        write_manifest(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn non_ascii_names_are_written_verbatim() {
        let json = manifest_json(&[sample_file("café-日本.png")]).unwrap();
        assert!(json.contains("café-日本.png"));
    }

    #[tokio::test]
    async fn run_sync_without_channel_is_config_error() {
        let config = MirrorConfig::default();
        let result = run_sync(&config, "token").await;
        assert!(matches!(result, Err(SyncError::Config(_))));
    }
}
