//! # channel-drop
//!
//! Mirrors the attachments posted in a Discord channel into a static file
//! listing, ready to publish with GitHub Pages.
//!
//! # Architecture: Two Stages, One Artifact
//!
//! ```text
//! 1. Sync     Discord REST  →  files.json   (messages → file descriptors)
//! 2. Render   files.json    →  index.html   (descriptors → gallery page)
//! ```
//!
//! The stages share nothing but the manifest. Sync overwrites it wholesale
//! on every run; render reads it without modifying it. Either stage can run
//! alone: `render --from-url` reads the manifest a previous deploy published;
//! `sync` on its own just refreshes the JSON.
//!
//! Both stages are short-lived. A scheduled CI job runs `build` every
//! fifteen minutes, makes one Discord request, writes two files and exits.
//! There is no gateway connection, no server, and no state between runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discord`] | REST client: one authenticated message-history request |
//! | [`sync`] | Stage 1: attachments → sorted descriptors → `files.json` |
//! | [`gallery`] | Stage 2: loads the manifest, reaches one of four view states |
//! | [`generate`] | Stage 2: renders the view state to HTML using Maud |
//! | [`format`] | Extension categories, size and date labels |
//! | [`config`] | Layered `channel-drop.toml` + environment loading and validation |
//! | [`types`] | `FileDescriptor` and lenient manifest parsing shared by both stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Permissive Manifest Reading
//!
//! The manifest has no schema version. An entry that can't be read is
//! skipped rather than failing the whole page, and a missing or `null`
//! manifest simply renders the empty state. Only an unreadable file, a
//! failed request, or JSON that isn't an array reaches the error state.
//!
//! ## Exactly One Visible State
//!
//! The page always contains all its regions (loading, error, empty, file
//! grid, stats); the render stage marks all but the current state's regions
//! `hidden`. The page structure stays constant, which keeps the generated
//! HTML diffable between runs.
//!
//! ## Token From Environment Only
//!
//! The bot token is read from `DISCORD_BOT_TOKEN` and never from the config
//! file, so the config can live in the published repository.

pub mod config;
pub mod discord;
pub mod format;
pub mod gallery;
pub mod generate;
pub mod output;
pub mod sync;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
