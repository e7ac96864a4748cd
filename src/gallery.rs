//! Gallery renderer: manifest → exactly one display state.
//!
//! ```text
//!                    ┌──────────► Error { message }   (transport, status, parse)
//! Loading ── load() ─┼──────────► Empty               (null / [] / absent)
//!                    └──────────► Files { cards }     (one card per entry)
//! ```
//!
//! [`Gallery`] is constructed once per run and holds the ids of the page
//! regions it toggles. [`Gallery::load`] always enters `Loading` first and
//! ends in exactly one of the other three states; a failed load is never
//! propagated to the caller, it *is* the `Error` state. There are no
//! retries; a fresh load only happens on the next run.
//!
//! Cards are view data only. No escaping happens here: the page template
//! escapes every interpolated string.

use log::{debug, error, info, warn};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::format::{self, Category};
use crate::sync::UNKNOWN_AUTHOR;
use crate::types::{FileDescriptor, parse_manifest};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the manifest comes from.
#[derive(Debug, Clone)]
pub enum ManifestSource {
    /// Published site: `GET {base_url}/{manifest}?_={unix_millis}`.
    Http { base_url: String, manifest: String },
    /// Local file, e.g. the one the sync stage just wrote.
    File { path: PathBuf },
}

impl ManifestSource {
    /// Manifest URL with a cache-busting `_` query parameter.
    ///
    /// Returns `None` for file sources.
    pub fn url(&self, timestamp_millis: i64) -> Option<String> {
        let ManifestSource::Http { base_url, manifest } = self else {
            return None;
        };
        let base = base_url.trim_end_matches('/');
        let sep = if manifest.contains('?') { '&' } else { '?' };
        Some(format!("{base}/{manifest}{sep}_={timestamp_millis}"))
    }

    async fn fetch(&self, client: &Client) -> Result<Option<Vec<FileDescriptor>>, LoadError> {
        match self {
            ManifestSource::Http { .. } => {
                let now = chrono::Utc::now().timestamp_millis();
                let Some(url) = self.url(now) else {
                    return Ok(None);
                };
                let response = client.get(&url).send().await?;
                let status = response.status();
                debug!("render: GET {url} -> {status}");
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }
                let body = response.text().await?;
                Ok(parse_manifest(&body)?)
            }
            ManifestSource::File { path } => {
                let body = tokio::fs::read_to_string(path).await?;
                Ok(parse_manifest(&body)?)
            }
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Http { base_url, manifest } => {
                write!(f, "{}/{}", base_url.trim_end_matches('/'), manifest)
            }
            ManifestSource::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// One of the five page regions the renderer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Loading,
    Error,
    Empty,
    Files,
    Stats,
}

/// Element ids of the page regions and text injection points.
#[derive(Debug, Clone)]
pub struct Regions {
    pub loading: &'static str,
    pub error: &'static str,
    pub error_message: &'static str,
    pub empty: &'static str,
    pub files: &'static str,
    pub stats: &'static str,
    pub file_count: &'static str,
}

impl Default for Regions {
    fn default() -> Self {
        Self {
            loading: "loading",
            error: "error",
            error_message: "error-message",
            empty: "empty",
            files: "files",
            stats: "stats",
            file_count: "file-count",
        }
    }
}

impl Regions {
    pub fn id(&self, region: Region) -> &'static str {
        match region {
            Region::Loading => self.loading,
            Region::Error => self.error,
            Region::Empty => self.empty,
            Region::Files => self.files,
            Region::Stats => self.stats,
        }
    }
}

/// Display data for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub url: String,
    pub category: Category,
    /// Empty when the size line should be omitted.
    pub size: String,
    /// Empty when the date line should be omitted.
    pub date: String,
    pub author: String,
}

impl From<&FileDescriptor> for Card {
    fn from(file: &FileDescriptor) -> Self {
        Self {
            name: file.name.clone(),
            url: file.url.clone(),
            category: format::classify(&file.name),
            size: format::format_size(file.size),
            date: format::format_date(file.uploaded_at.as_deref()),
            author: file
                .author
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error {
        message: String,
    },
    Empty,
    Files {
        cards: Vec<Card>,
        /// Total size label across all files; empty if no sizes are known.
        total_size: String,
    },
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error { .. } => "error",
            ViewState::Empty => "empty",
            ViewState::Files { .. } => "files",
        }
    }

    /// Whether `region` is shown in this state. The stats panel is only
    /// shown alongside the file grid.
    pub fn is_visible(&self, region: Region) -> bool {
        matches!(
            (self, region),
            (ViewState::Loading, Region::Loading)
                | (ViewState::Error { .. }, Region::Error)
                | (ViewState::Empty, Region::Empty)
                | (ViewState::Files { .. }, Region::Files | Region::Stats)
        )
    }

    /// Count label for the stats panel, if in the `Files` state.
    pub fn count_label(&self) -> Option<String> {
        match self {
            ViewState::Files { cards, .. } => Some(format::format_count(cards.len())),
            _ => None,
        }
    }
}

/// The renderer. One per run.
pub struct Gallery {
    regions: Regions,
    source: ManifestSource,
    client: Client,
    state: ViewState,
}

impl Gallery {
    pub fn new(source: ManifestSource, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("render: falling back to default HTTP client configuration ({err})");
                Client::new()
            });
        Self {
            regions: Regions::default(),
            source,
            client,
            state: ViewState::Loading,
        }
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    pub fn source(&self) -> &ManifestSource {
        &self.source
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Build the view for an already-loaded manifest.
    ///
    /// `None` and `[]` both reach `Empty`. Cards keep manifest order.
    pub fn render(&mut self, manifest: Option<Vec<FileDescriptor>>) -> &ViewState {
        self.state = match manifest {
            Some(files) if !files.is_empty() => {
                let known: Vec<u64> = files.iter().filter_map(|f| f.size).collect();
                let total_size = if known.is_empty() {
                    String::new()
                } else {
                    // Sizes come straight from the manifest; clamp instead of overflowing.
                    let total = known.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
                    format::format_size(Some(total))
                };
                ViewState::Files {
                    cards: files.iter().map(Card::from).collect(),
                    total_size,
                }
            }
            _ => ViewState::Empty,
        };
        info!("render: {} state", self.state.name());
        &self.state
    }

    /// Fetch the manifest and render it. Failures become the `Error` state.
    pub async fn load(&mut self) -> &ViewState {
        self.state = ViewState::Loading;
        debug!("render: loading manifest from {}", self.source);

        let fetched = self.source.fetch(&self.client).await;
        match fetched {
            Ok(manifest) => self.render(manifest),
            Err(err) => {
                error!("render: failed to load {}: {err}", self.source);
                self.state = ViewState::Error {
                    message: err.to_string(),
                };
                &self.state
            }
        }
    }
}
