//! Shared test utilities for the channel-drop test suite.
//!
//! Builders for Discord payloads and file descriptors, plus small
//! extractors so assertions read as lists of names.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let messages = vec![message("1", Some("alice"), None, vec![attachment("a.png", Some(10))])];
//! let files = extract_attachments(&messages);
//! assert_eq!(file_names(&files), vec!["a.png"]);
//! ```

use crate::discord::{Attachment, Author, Message};
use crate::types::FileDescriptor;

// =========================================================================
// Discord payload builders
// =========================================================================

/// A message with the given author username and timestamp.
pub fn message(
    id: &str,
    author: Option<&str>,
    timestamp: Option<&str>,
    attachments: Vec<Attachment>,
) -> Message {
    Message {
        id: id.to_string(),
        author: author.map(|name| Author {
            username: Some(name.to_string()),
            global_name: None,
        }),
        timestamp: timestamp.map(str::to_string),
        attachments,
    }
}

/// An attachment whose URL is derived from its filename.
pub fn attachment(filename: &str, size: Option<u64>) -> Attachment {
    Attachment {
        filename: Some(filename.to_string()),
        url: Some(format!("https://cdn.example/attachments/{filename}")),
        size,
        content_type: None,
    }
}

// =========================================================================
// File descriptor builders
// =========================================================================

/// A fully-populated descriptor.
pub fn sample_file(name: &str) -> FileDescriptor {
    FileDescriptor {
        name: name.to_string(),
        url: format!("https://cdn.example/attachments/{name}"),
        uploaded_at: Some("2024-01-15T10:30:00.000000+00:00".to_string()),
        author: Some("alice".to_string()),
        size: Some(1536),
        content_type: None,
    }
}

/// A bare descriptor with only `name`, `url` and the given timestamp.
pub fn dated(name: &str, uploaded_at: Option<&str>) -> FileDescriptor {
    FileDescriptor {
        uploaded_at: uploaded_at.map(str::to_string),
        ..FileDescriptor::new(name, format!("https://cdn.example/{name}"))
    }
}

// =========================================================================
// Extractors
// =========================================================================

pub fn file_names(files: &[FileDescriptor]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}
