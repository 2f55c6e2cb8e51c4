//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; the user file in the source directory overrides
//! just the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Plain Folio"         # Document title and masthead text
//! author = ""                   # Meta author; empty omits the tag
//! description = ""              # Meta description; empty omits the tag
//!
//! [content]
//! posts = "posts.json"          # Posts file, relative to the source dir
//! projects = "projects.json"    # Projects file, relative to the source dir
//!
//! [theme]
//! default = "system"            # Initial theme: "light" | "dark" | "system"
//!
//! [colors.light]
//! background = "#ffffff"
//! surface = "#f5f5f5"           # Cards and modal panes
//! text = "#111111"
//! text_muted = "#666666"        # Dates, read times, tags
//! border = "#e0e0e0"
//! link = "#333333"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! surface = "#161616"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! link_hover = "#ffffff"
//!
//! [github]
//! api_base = "https://api.github.com"  # Override in tests / for proxies
//!
//! [server]
//! port = 3000                   # `serve` port; the PORT env var wins
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only override the dark background
//! [colors.dark]
//! background = "#000000"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: title, author, description.
    pub site: SiteMeta,
    /// Where the content JSON files live.
    pub content: ContentConfig,
    /// Initial theme preference.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// GitHub API settings for project repo stats.
    pub github: GithubConfig,
    /// `serve` command settings.
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.content.posts.trim().is_empty() || self.content.projects.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.posts and content.projects must not be empty".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if self.github.api_base.trim_end_matches('/') != self.github.api_base {
            return Err(ConfigError::Validation(
                "github.api_base must not end with a slash".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity shown in the document head and masthead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    /// Empty string omits the meta tag.
    pub author: String,
    /// Empty string omits the meta tag.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Plain Folio".to_string(),
            author: String::new(),
            description: String::new(),
        }
    }
}

/// Content file names, relative to the source directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub posts: String,
    pub projects: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts: "posts.json".to_string(),
            projects: "projects.json".to_string(),
        }
    }
}

/// Theme preference applied before any visitor choice is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeDefault {
    Light,
    Dark,
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub default: ThemeDefault,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Base URL for the REST API, without a trailing slash.
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// `serve` command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen port. The PORT environment variable takes precedence.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
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

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background color.
    pub background: String,
    /// Card and modal pane background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (dates, read times, tags).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f5f5f5".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#161616".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Plain Folio Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the source
# directory next to your content JSON. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Document title and masthead text.
title = "Plain Folio"

# Meta author tag. Leave empty to omit.
author = ""

# Meta description tag. Leave empty to omit.
description = ""

# ---------------------------------------------------------------------------
# Content files, relative to the source directory
# ---------------------------------------------------------------------------
[content]
posts = "posts.json"
projects = "projects.json"

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Theme applied before the visitor picks one: "light", "dark" or "system".
# "system" follows prefers-color-scheme.
default = "system"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f5f5f5"       # Cards and modal panes
text = "#111111"
text_muted = "#666666"    # Dates, read times, tags
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#161616"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# GitHub repo stats
# ---------------------------------------------------------------------------
[github]
# Base URL for the REST API, without a trailing slash.
api_base = "https://api.github.com"

# ---------------------------------------------------------------------------
# Serving
# ---------------------------------------------------------------------------
[server]
# Port for `plain-folio serve`. The PORT environment variable wins.
port = 3000
"##
}

/// Generate CSS custom properties from color config.
///
/// Light values on `:root`, dark values behind the media query for the
/// system fallback, and `body.theme-*` blocks for an explicit visitor
/// choice overriding the system scheme.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let light_vars = scheme_vars(&colors.light);
    let dark_vars = scheme_vars(&colors.dark);
    format!(
        r#":root {{
{light_vars}}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark_vars}    }}
}}

body.theme-light {{
{light_vars}}}

body.theme-dark {{
{dark_vars}}}"#
    )
}

fn scheme_vars(scheme: &ColorScheme) -> String {
    format!(
        "    --color-bg: {};\n    --color-surface: {};\n    --color-text: {};\n    --color-text-muted: {};\n    --color-border: {};\n    --color-link: {};\n    --color-link-hover: {};\n",
        scheme.background,
        scheme.surface,
        scheme.text,
        scheme.text_muted,
        scheme.border,
        scheme.link,
        scheme.link_hover,
    )
}
