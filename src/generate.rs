//! HTML page generation.
//!
//! Renders the gallery's current [`ViewState`] into a single static page.
//! The page always contains all five regions; only the ones belonging to the
//! current state are visible, the rest carry the `hidden` attribute:
//!
//! | State     | Visible regions  |
//! |-----------|------------------|
//! | `loading` | `#loading`       |
//! | `error`   | `#error`         |
//! | `empty`   | `#empty`         |
//! | `files`   | `#files`, `#stats` |
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── files.json     # Manifest (written by sync)
//! └── index.html     # Gallery page (written here)
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Every interpolated string (filenames, authors, error messages) is
//! escaped, so a filename like `<script>.js` renders as text.

use crate::config::{self, MirrorConfig, SiteConfig};
use crate::gallery::{Card, Gallery, Region, Regions, ViewState};
use log::info;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Write the page for the gallery's current state to `output.page_path()`.
///
/// Returns the path written.
pub fn generate(gallery: &Gallery, config: &MirrorConfig) -> Result<PathBuf, GenerateError> {
    let path = config.output.page_path();
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let page = render_page(gallery.state(), gallery.regions(), &config.site, &css);
    write_page(&path, &page.into_string())?;
    info!(
        "render: wrote {} ({} state)",
        path.display(),
        gallery.state().name()
    );
    Ok(path)
}

fn write_page(path: &Path, html: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, state: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-state=(state) {
                (content)
            }
        }
    }
}

fn site_header(site: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            h1 { (site.title) }
            @if !site.subtitle.is_empty() {
                p.subtitle { (site.subtitle) }
            }
        }
    }
}

/// Only `http(s)` links are emitted; anything else becomes an inert `#`.
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        url
    } else {
        "#"
    }
}

/// Renders one file card
pub fn render_card(card: &Card) -> Markup {
    html! {
        a class={ "file-card file-card--" (card.category.as_str()) }
            href=(safe_href(&card.url))
            target="_blank"
            rel="noopener noreferrer" {
            span.file-icon aria-hidden="true" { (card.category.icon()) }
            span.file-name title=(card.name) { (card.name) }
            @if !card.size.is_empty() {
                span.file-size { (card.size) }
            }
            span.file-author { "by " (card.author) }
            @if !card.date.is_empty() {
                time.file-date { (card.date) }
            }
        }
    }
}

fn stats_panel(state: &ViewState, regions: &Regions) -> Markup {
    let hidden = !state.is_visible(Region::Stats);
    let (count, total) = match state {
        ViewState::Files { total_size, .. } => {
            (state.count_label().unwrap_or_default(), total_size.as_str())
        }
        _ => (String::new(), ""),
    };
    html! {
        div.stats id=(regions.stats) hidden[hidden] {
            span id=(regions.file_count) { (count) }
            @if !total.is_empty() {
                span.total-size { "Total: " (total) }
            }
        }
    }
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Renders the full page for `state`.
pub fn render_page(state: &ViewState, regions: &Regions, site: &SiteConfig, css: &str) -> Markup {
    let hidden = |region: Region| !state.is_visible(region);
    let error_message = match state {
        ViewState::Error { message } => format!("Failed to load files: {message}"),
        _ => String::new(),
    };
    let cards: &[Card] = match state {
        ViewState::Files { cards, .. } => cards,
        _ => &[],
    };

    let content = html! {
        (site_header(site))
        main.gallery {
            (stats_panel(state, regions))
            div class="state state--loading" id=(regions.loading) hidden[hidden(Region::Loading)] {
                div.spinner {}
                p { "Loading files…" }
            }
            div class="state state--error" id=(regions.error) hidden[hidden(Region::Error)] {
                p.state-icon aria-hidden="true" { "⚠️" }
                p id=(regions.error_message) { (error_message) }
            }
            div class="state state--empty" id=(regions.empty) hidden[hidden(Region::Empty)] {
                p.state-icon aria-hidden="true" { "📭" }
                p { "No files yet" }
                p.hint { "Files posted in the Discord channel will appear here." }
            }
            div.file-grid id=(regions.files) hidden[hidden(Region::Files)] {
                @for card in cards {
                    (render_card(card))
                }
            }
        }
    };

    base_document(&site.title, css, state.name(), content)
}

// ============================================================================
// Tests
// ============================================================================
