//! Mirror configuration.
//!
//! Handles loading, validating, and layering `channel-drop.toml`. Values are
//! resolved in three layers, each overriding the previous:
//!
//! ```text
//! stock defaults  →  channel-drop.toml  →  environment (DISCORD_CHANNEL_ID)
//! ```
//!
//! The bot token is never read from the config file; it only comes from
//! `DISCORD_BOT_TOKEN`, so the file can be committed alongside the site.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [discord]
//! api_base = "https://discord.com/api/v10"
//! channel_id = ""           # Usually set via DISCORD_CHANNEL_ID
//! message_limit = 100       # Messages to read per sync (1-100)
//! timeout_secs = 30         # Hard per-request timeout
//!
//! [output]
//! dir = "docs"              # GitHub Pages root
//! manifest = "files.json"
//! page = "index.html"
//!
//! [site]
//! title = "Shared Files"
//! subtitle = "Files shared in our Discord channel"
//!
//! [colors.light]
//! background = "#f5f6f8"
//! surface = "#ffffff"
//! text = "#1f2328"
//! text_muted = "#656d76"
//! border = "#d0d7de"
//! accent = "#5865f2"
//!
//! [colors.dark]
//! background = "#0d1117"
//! surface = "#161b22"
//! text = "#e6edf3"
//! text_muted = "#8d96a0"
//! border = "#30363d"
//! accent = "#7984f5"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";
/// Environment variable overriding `discord.channel_id`.
pub const CHANNEL_ENV: &str = "DISCORD_CHANNEL_ID";

/// Discord caps a single message-history request at 100.
pub const MAX_MESSAGE_LIMIT: u32 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
}

/// Full configuration. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    /// Discord REST settings.
    pub discord: DiscordConfig,
    /// Where the manifest and page are written.
    pub output: OutputConfig,
    /// Page text.
    pub site: SiteConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscordConfig {
    /// Base URL of the versioned REST API, without trailing slash.
    pub api_base: String,
    /// Channel to mirror. Empty means "take it from the environment".
    pub channel_id: String,
    /// Number of recent messages to read (1-100).
    pub message_limit: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            channel_id: String::new(),
            message_limit: MAX_MESSAGE_LIMIT,
            timeout_secs: 30,
        }
    }
}

impl DiscordConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory (the published site root).
    pub dir: PathBuf,
    /// Manifest filename within `dir`.
    pub manifest: String,
    /// Gallery page filename within `dir`.
    pub page: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("docs"),
            manifest: crate::types::MANIFEST_FILENAME.to_string(),
            page: "index.html".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest)
    }

    pub fn page_path(&self) -> PathBuf {
        self.dir.join(&self.page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page `<title>` and heading.
    pub title: String,
    /// Line shown under the heading. Empty hides it.
    pub subtitle: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Shared Files".to_string(),
            subtitle: "Files shared in our Discord channel".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Card and panel background.
    pub surface: String,
    pub text: String,
    /// Secondary text (size, author, date lines).
    pub text_muted: String,
    pub border: String,
    /// Links and card hover outline.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f6f8".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f2328".to_string(),
            text_muted: "#656d76".to_string(),
            border: "#d0d7de".to_string(),
            accent: "#5865f2".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0d1117".to_string(),
            surface: "#161b22".to_string(),
            text: "#e6edf3".to_string(),
            text_muted: "#8d96a0".to_string(),
            border: "#30363d".to_string(),
            accent: "#7984f5".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

impl MirrorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.discord.message_limit;
        if limit == 0 || limit > MAX_MESSAGE_LIMIT {
            return Err(ConfigError::Validation(format!(
                "discord.message_limit must be 1-{MAX_MESSAGE_LIMIT}, got {limit}"
            )));
        }
        if self.discord.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "discord.timeout_secs must be non-zero".into(),
            ));
        }
        if self.discord.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "discord.api_base must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("output.manifest", &self.output.manifest),
            ("output.page", &self.output.page),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a bare filename, got \"{value}\""
                )));
            }
        }
        Ok(())
    }

    /// Apply environment overrides on top of file values.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(channel) = lookup(CHANNEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.discord.channel_id = channel.trim().to_string();
        }
    }

    /// Channel id required for syncing.
    pub fn channel_id(&self) -> Result<&str, ConfigError> {
        let id = self.discord.channel_id.trim();
        if id.is_empty() {
            return Err(ConfigError::MissingEnv(CHANNEL_ENV));
        }
        Ok(id)
    }
}

/// Read the bot token. Only the environment is consulted.
pub fn bot_token<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(TOKEN_ENV)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ConfigError::MissingEnv(TOKEN_ENV))
}

/// Environment lookup used by the CLI.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MirrorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. A missing file is `Ok(None)`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<MirrorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: MirrorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, layered over stock defaults.
///
/// Environment overrides are not applied here; see [`MirrorConfig::apply_env`].
pub fn load_config(path: &Path) -> Result<MirrorConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# channel-drop configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.
#
# The bot token is read from DISCORD_BOT_TOKEN only. Never put it here.

# ---------------------------------------------------------------------------
# Discord REST API
# ---------------------------------------------------------------------------
[discord]
api_base = "https://discord.com/api/v10"

# Channel to mirror. DISCORD_CHANNEL_ID overrides this when set.
channel_id = ""

# Most recent messages to read per sync (1-100). Older messages are not
# backfilled, so their attachments drop out of the listing.
message_limit = 100

# Hard timeout for the single history request, in seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Published site root (point GitHub Pages here).
dir = "docs"
manifest = "files.json"
page = "index.html"

# ---------------------------------------------------------------------------
# Page text
# ---------------------------------------------------------------------------
[site]
title = "Shared Files"
subtitle = "Files shared in our Discord channel"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f6f8"
surface = "#ffffff"       # Cards and stats panel
text = "#1f2328"
text_muted = "#656d76"    # Size, author and date lines
border = "#d0d7de"
accent = "#5865f2"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0d1117"
surface = "#161b22"
text = "#e6edf3"
text_muted = "#8d96a0"
border = "#30363d"
accent = "#7984f5"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("bg", &scheme.background),
            ("surface", &scheme.surface),
            ("text", &scheme.text),
            ("text-muted", &scheme.text_muted),
            ("border", &scheme.border),
            ("accent", &scheme.accent),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}
