//! CLI output formatting for the sync and render stages.
//!
//! # Information-First Display
//!
//! Every file is shown by its identity first (positional index + filename),
//! with size, author and date as an indented context line. Paths the stages
//! wrote are shown last, after an arrow.
//!
//! # Output Format
//!
//! ## Sync
//!
//! ```text
//! Channel 1234567890 (42 messages)
//! 001 diagram.png (1.5 KB)
//!     alice · Jan 15, 2024, 10:30
//! 002 notes.txt
//!     bob
//! Manifest → docs/files.json (2 files, written)
//! ```
//!
//! ## Render
//!
//! ```text
//! Source: docs/files.json
//! State: files (2 files available)
//! Page → docs/index.html
//! ```
//!
//! ## Check
//!
//! ```text
//! Channel: 1234567890
//! Token: set
//! Messages per sync: 100
//! Manifest: docs/files.json
//! Page: docs/index.html
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure and
//! do no I/O.

use std::path::Path;

use crate::config::MirrorConfig;
use crate::format::{format_date, format_size};
use crate::gallery::ViewState;
use crate::sync::{SyncReport, UNKNOWN_AUTHOR, WriteOutcome};
use crate::types::FileDescriptor;

/// Longest filename shown before truncating.
const MAX_NAME_CHARS: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Header line for one file: index, name, and size when known.
///
/// ```text
/// 001 diagram.png (1.5 KB)
/// 002 notes.txt
/// ```
fn file_line(index: usize, file: &FileDescriptor) -> String {
    let name = truncate(&file.name, MAX_NAME_CHARS);
    let size = format_size(file.size);
    if size.is_empty() {
        format!("{} {}", format_index(index), name)
    } else {
        format!("{} {} ({})", format_index(index), name, size)
    }
}

/// Context line for one file: author and, when parseable, the date.
fn file_context(file: &FileDescriptor) -> String {
    let author = file.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);
    let date = format_date(file.uploaded_at.as_deref());
    if date.is_empty() {
        format!("{}{}", indent(1), author)
    } else {
        format!("{}{} \u{b7} {}", indent(1), author, date)
    }
}

// ============================================================================
// Sync output
// ============================================================================

/// Format sync output listing every mirrored file.
pub fn format_sync_output(report: &SyncReport, channel_id: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "Channel {} ({} messages)",
        channel_id, report.messages
    )];

    if report.files.is_empty() {
        lines.push(format!("{}No attachments found", indent(1)));
    }
    for (i, file) in report.files.iter().enumerate() {
        lines.push(file_line(i + 1, file));
        lines.push(file_context(file));
    }

    let status = match report.outcome {
        WriteOutcome::Written => "written",
        WriteOutcome::Unchanged => "unchanged",
    };
    lines.push(format!(
        "Manifest \u{2192} {} ({} files, {})",
        report.manifest_path.display(),
        report.files.len(),
        status
    ));
    lines
}

/// Print sync output to stdout.
pub fn print_sync_output(report: &SyncReport, channel_id: &str) {
    for line in format_sync_output(report, channel_id) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Format render output: where the manifest came from, which state was
/// reached, and where the page was written.
pub fn format_render_output(source: &str, state: &ViewState, page: &Path) -> Vec<String> {
    let detail = match state {
        ViewState::Error { message } => format!(" ({})", message),
        ViewState::Files { .. } => format!(" ({})", state.count_label().unwrap_or_default()),
        ViewState::Loading | ViewState::Empty => String::new(),
    };
    vec![
        format!("Source: {}", source),
        format!("State: {}{}", state.name(), detail),
        format!("Page \u{2192} {}", page.display()),
    ]
}

/// Print render output to stdout.
pub fn print_render_output(source: &str, state: &ViewState, page: &Path) {
    for line in format_render_output(source, state, page) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format resolved config. The token's value is never shown, only whether
/// it is set.
pub fn format_check_output(config: &MirrorConfig, token_set: bool) -> Vec<String> {
    let channel = match config.channel_id() {
        Ok(id) => id.to_string(),
        Err(_) => "(not set)".to_string(),
    };
    vec![
        format!("Channel: {}", channel),
        format!("Token: {}", if token_set { "set" } else { "(not set)" }),
        format!("Messages per sync: {}", config.discord.message_limit),
        format!("Timeout: {}s", config.discord.timeout_secs),
        format!("Manifest: {}", config.output.manifest_path().display()),
        format!("Page: {}", config.output.page_path().display()),
    ]
}

/// Print check output to stdout.
pub fn print_check_output(config: &MirrorConfig, token_set: bool) {
    for line in format_check_output(config, token_set) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Card;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    fn report(files: Vec<FileDescriptor>, outcome: WriteOutcome) -> SyncReport {
        SyncReport {
            messages: 7,
            files,
            manifest_path: PathBuf::from("docs/files.json"),
            outcome,
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn truncate_short_and_exact() {
        assert_eq!(truncate("short", 10), "short");
        let text = "a".repeat(10);
        assert_eq!(truncate(&text, 10), text);
    }

    #[test]
    fn truncate_long() {
        assert_eq!(truncate(&"a".repeat(15), 10), format!("{}...", "a".repeat(10)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("日本語のファイル", 3), "日本語...");
    }

    #[test]
    fn file_line_with_and_without_size() {
        assert_eq!(file_line(1, &sample_file("a.png")), "001 a.png (1.5 KB)");
        assert_eq!(file_line(2, &dated("b.txt", None)), "002 b.txt");
    }

    #[test]
    fn file_context_with_and_without_date() {
        assert_eq!(
            file_context(&sample_file("a.png")),
            "    alice \u{b7} Jan 15, 2024, 10:30"
        );
        assert_eq!(file_context(&dated("b.txt", Some("garbage"))), "    Unknown");
    }

    #[test]
    fn sync_output_lists_files_then_manifest() {
        let lines = format_sync_output(
            &report(vec![sample_file("a.png"), dated("b.txt", None)], WriteOutcome::Written),
            "42",
        );
        assert_eq!(
            lines,
            vec![
                "Channel 42 (7 messages)",
                "001 a.png (1.5 KB)",
                "    alice \u{b7} Jan 15, 2024, 10:30",
                "002 b.txt",
                "    Unknown",
                "Manifest \u{2192} docs/files.json (2 files, written)",
            ]
        );
    }

    #[test]
    fn sync_output_empty_and_unchanged() {
        let lines = format_sync_output(&report(vec![], WriteOutcome::Unchanged), "42");
        assert_eq!(lines[1], "    No attachments found");
        assert_eq!(
            lines[2],
            "Manifest \u{2192} docs/files.json (0 files, unchanged)"
        );
    }

    #[test]
    fn render_output_for_each_terminal_state() {
        let page = Path::new("docs/index.html");

        let error = ViewState::Error {
            message: "HTTP 500".into(),
        };
        let lines = format_render_output("https://x/files.json", &error, page);
        assert_eq!(lines[1], "State: error (HTTP 500)");

        let lines = format_render_output("docs/files.json", &ViewState::Empty, page);
        assert_eq!(lines[1], "State: empty");
        assert_eq!(lines[2], "Page \u{2192} docs/index.html");

        let files = ViewState::Files {
            cards: vec![Card::from(&sample_file("a.png"))],
            total_size: "1.5 KB".into(),
        };
        let lines = format_render_output("docs/files.json", &files, page);
        assert_eq!(lines[0], "Source: docs/files.json");
        assert_eq!(lines[1], "State: files (1 file available)");
    }

    #[test]
    fn check_output_hides_token_value() {
        let mut config = MirrorConfig::default();
        config.discord.channel_id = "99".into();
        let lines = format_check_output(&config, true);
        assert_eq!(lines[0], "Channel: 99");
        assert_eq!(lines[1], "Token: set");

        let lines = format_check_output(&MirrorConfig::default(), false);
        assert_eq!(lines[0], "Channel: (not set)");
        assert_eq!(lines[1], "Token: (not set)");
    }
}
