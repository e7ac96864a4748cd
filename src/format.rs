//! Display helpers for the gallery: extension classification, size and date
//! labels.
//!
//! All three are pure and total: any input yields a value, never an error.
//! An empty string means "omit this line" to the page renderer.
//!
//! ## Categories
//!
//! | Category  | Icon | Extensions |
//! |-----------|------|------------|
//! | `Image`   | 🖼️   | jpg jpeg png gif webp svg bmp ico avif heic tiff |
//! | `Video`   | 🎬   | mp4 webm mov avi mkv m4v wmv flv |
//! | `Audio`   | 🎵   | mp3 wav ogg flac m4a aac opus wma |
//! | `Pdf`     | 📕   | pdf |
//! | `Archive` | 📦   | zip rar 7z tar gz bz2 xz tgz zst |
//! | `Code`    | 💻   | js ts py rs go java c cpp h html css json xml yaml yml toml sh md |
//! | `Default` | 📄   | everything else, including names without a `.` |

use chrono::{DateTime, NaiveDateTime, Utc};

/// Icon/display grouping derived from a filename's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Image,
    Video,
    Audio,
    Pdf,
    Archive,
    Code,
    Default,
}

const EXTENSION_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Image,
        &[
            "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif", "heic", "tiff",
        ],
    ),
    (
        Category::Video,
        &["mp4", "webm", "mov", "avi", "mkv", "m4v", "wmv", "flv"],
    ),
    (
        Category::Audio,
        &["mp3", "wav", "ogg", "flac", "m4a", "aac", "opus", "wma"],
    ),
    (Category::Pdf, &["pdf"]),
    (
        Category::Archive,
        &["zip", "rar", "7z", "tar", "gz", "bz2", "xz", "tgz", "zst"],
    ),
    (
        Category::Code,
        &[
            "js", "ts", "py", "rs", "go", "java", "c", "cpp", "h", "html", "css", "json", "xml",
            "yaml", "yml", "toml", "sh", "md",
        ],
    ),
];

impl Category {
    pub fn icon(self) -> &'static str {
        match self {
            Category::Image => "🖼️",
            Category::Video => "🎬",
            Category::Audio => "🎵",
            Category::Pdf => "📕",
            Category::Archive => "📦",
            Category::Code => "💻",
            Category::Default => "📄",
        }
    }

    /// Lowercase name, used as the card's CSS modifier class.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Pdf => "pdf",
            Category::Archive => "archive",
            Category::Code => "code",
            Category::Default => "default",
        }
    }
}

/// Classify a filename by the lowercase text after its final `.`.
pub fn classify(filename: &str) -> Category {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return Category::Default;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Default)
}

/// Binary-scaled size label with one decimal place (`1536` → `"1.5 KB"`).
///
/// Zero or unknown sizes return an empty string.
pub fn format_size(bytes: Option<u64>) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let bytes = match bytes {
        Some(b) if b > 0 => b,
        _ => return String::new(),
    };
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Short date + time label in UTC (`"Jan 15, 2024, 10:30"`).
///
/// Accepts RFC 3339 and offset-less ISO-8601. Anything else returns an
/// empty string.
pub fn format_date(iso: Option<&str>) -> String {
    iso.and_then(parse_timestamp)
        .map(|dt| dt.format("%b %-d, %Y, %H:%M").to_string())
        .unwrap_or_default()
}

/// Parse an ISO-8601 timestamp into UTC. Offset-less input is taken as UTC.
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Utc>> {
    let iso = iso.trim();
    if iso.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Count label for the stats panel.
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 file available".to_string()
    } else {
        format!("{count} files available")
    }
}
