//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. The stock defaults
//! are the production values for justcarlson.com; a `site.toml` only needs to
//! name the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! website = "https://justcarlson.com/"
//! title = "Justin Carlson"
//! desc = "Writing about things I find interesting."
//! post_per_index = 10
//! scheduled_post_margin = 900000   # milliseconds
//! timezone = "America/Los_Angeles"
//!
//! [edit_post]
//! enabled = true
//! url = "https://github.com/justcarlson/justcarlson.com/edit/main/"
//!
//! [[social_links]]
//! href = "https://github.com/justcarlson"
//! label = "GitHub"
//!
//! [icons]
//! GitHub = "github"
//!
//! [markdown]
//! heading = "Just Carlson"
//! links = ["GitHub", "LinkedIn"]
//!
//! [home]
//! contribution_chart = true
//!
//! [server]
//! addr = "127.0.0.1:4321"
//! ```
//!
//! Tables merge key by key over the defaults. Arrays (`nav_links`,
//! `social_links`, `markdown.navigation`) replace the default list wholesale.
//!
//! ## Validation
//!
//! Every value is checked once, at startup. A bad URL, a zero page size or
//! an unknown timezone is a [`ConfigError`]; nothing downstream of
//! [`crate::site::Site`] ever sees an invalid config.

use crate::types::{EditPost, LinkEntry, NewsletterConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Canonical site URL. Absolute, used for feeds and attribution.
    pub website: String,
    pub author: String,
    pub author_full_name: String,
    /// Author profile page (absolute or root-relative).
    pub profile: String,
    /// One-line site description.
    pub desc: String,
    pub title: String,
    /// Default Open Graph image, relative to the site root.
    pub og_image: String,
    pub light_and_dark_mode: bool,
    pub post_per_index: usize,
    pub post_per_page: usize,
    /// How far in the future (milliseconds) a post may be dated and still
    /// be published.
    pub scheduled_post_margin: u64,
    pub show_archives: bool,
    pub show_back_button: bool,
    pub edit_post: EditPost,
    pub dynamic_og_image: bool,
    /// Page language code (`lang` attribute).
    pub lang: String,
    /// IANA timezone used for post dates.
    pub timezone: String,
    /// Site-internal navigation, in rendering order.
    pub nav_links: Vec<LinkEntry>,
    /// External profiles plus the RSS link, in rendering order.
    pub social_links: Vec<LinkEntry>,
    /// Social link label to icon id.
    pub icons: BTreeMap<String, String>,
    pub newsletter: NewsletterConfig,
    /// What the `/index.md` rendition lists.
    pub markdown: MarkdownConfig,
    /// Remote images on the home page.
    pub home: HomeConfig,
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            website: "https://justcarlson.com/".to_string(),
            author: "Justin Carlson".to_string(),
            author_full_name: "Justin Carlson".to_string(),
            profile: "https://justcarlson.com/about".to_string(),
            desc: "Writing about things I find interesting.".to_string(),
            title: "Justin Carlson".to_string(),
            og_image: "og.png".to_string(),
            light_and_dark_mode: true,
            post_per_index: 10,
            post_per_page: 10,
            scheduled_post_margin: 15 * 60 * 1000,
            show_archives: false,
            show_back_button: false,
            edit_post: EditPost::default(),
            dynamic_og_image: true,
            lang: "en".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            nav_links: vec![LinkEntry::new("/", "Blog"), LinkEntry::new("/about", "About")],
            social_links: vec![
                LinkEntry::new("https://github.com/justcarlson", "GitHub"),
                LinkEntry::new("https://x.com/_justcarlson", "X"),
                LinkEntry::new("https://www.linkedin.com/in/justincarlson0/", "LinkedIn"),
                LinkEntry::new("/rss.xml", "RSS"),
            ],
            icons: [
                ("GitHub", "github"),
                ("X", "twitter"),
                ("LinkedIn", "linkedin"),
                ("RSS", "rss"),
            ]
            .into_iter()
            .map(|(label, id)| (label.to_string(), id.to_string()))
            .collect(),
            newsletter: NewsletterConfig::default(),
            markdown: MarkdownConfig::default(),
            home: HomeConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are well-formed and within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let website = absolute_url("website", &self.website)?;
        if !matches!(website.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "website must be an http(s) URL, got '{}'",
                self.website
            )));
        }
        link_target("profile", &self.profile)?;
        if self.og_image.trim().is_empty() || self.og_image.contains("://") {
            return Err(ConfigError::Validation(
                "og_image must be a path relative to the site root".into(),
            ));
        }
        if self.post_per_index == 0 {
            return Err(ConfigError::Validation(
                "post_per_index must be greater than 0".into(),
            ));
        }
        if self.post_per_page == 0 {
            return Err(ConfigError::Validation(
                "post_per_page must be greater than 0".into(),
            ));
        }
        if self.edit_post.enabled {
            absolute_url("edit_post.url", &self.edit_post.url)?;
        }
        if !is_language_tag(&self.lang) {
            return Err(ConfigError::Validation(format!(
                "lang '{}' is not a language tag",
                self.lang
            )));
        }
        if !is_iana_timezone(&self.timezone) {
            return Err(ConfigError::Validation(format!(
                "timezone '{}' is not an IANA timezone name",
                self.timezone
            )));
        }
        for link in &self.nav_links {
            check_link("nav_links", link)?;
        }
        for link in &self.social_links {
            check_link("social_links", link)?;
        }
        self.validate_newsletter()?;
        self.validate_markdown()?;
        self.validate_home()?;
        self.server
            .addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Validation(format!("server.addr '{}': {e}", self.server.addr)))?;
        if self.server.workers == Some(0) {
            return Err(ConfigError::Validation(
                "server.workers must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_newsletter(&self) -> Result<(), ConfigError> {
        let n = &self.newsletter;
        if !n.enabled {
            if !(n.provider.is_empty() && n.form_action.is_empty() && n.tag.is_empty()) {
                return Err(ConfigError::Validation(
                    "newsletter settings must be empty while newsletter.enabled is false".into(),
                ));
            }
            return Ok(());
        }
        if n.provider.trim().is_empty() {
            return Err(ConfigError::Validation(
                "newsletter.provider is required when the newsletter is enabled".into(),
            ));
        }
        absolute_url("newsletter.form_action", &n.form_action)?;
        Ok(())
    }

    fn validate_markdown(&self) -> Result<(), ConfigError> {
        if self.markdown.heading.trim().is_empty() {
            return Err(ConfigError::Validation(
                "markdown.heading must not be empty".into(),
            ));
        }
        for link in &self.markdown.navigation {
            check_link("markdown.navigation", link)?;
        }
        for label in &self.markdown.links {
            let link = self
                .social_link(label)
                .ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "markdown.links names '{label}', which is not in social_links"
                    ))
                })?;
            if !link.is_external() {
                return Err(ConfigError::Validation(format!(
                    "markdown.links entry '{label}' must be an absolute URL"
                )));
            }
        }
        Ok(())
    }

    fn validate_home(&self) -> Result<(), ConfigError> {
        absolute_url("home.avatar", &self.home.avatar)?;
        if !(1..=MAX_AVATAR_SIZE).contains(&self.home.avatar_size) {
            return Err(ConfigError::Validation(format!(
                "home.avatar_size must be between 1 and {MAX_AVATAR_SIZE}, got {}",
                self.home.avatar_size
            )));
        }
        if self.home.contribution_chart && self.social_link("GitHub").is_none() {
            return Err(ConfigError::Validation(
                "home.contribution_chart needs a social link labelled 'GitHub'".into(),
            ));
        }
        Ok(())
    }

    /// Find a social link by its label.
    pub fn social_link(&self, label: &str) -> Option<&LinkEntry> {
        self.social_links.iter().find(|l| l.label == label)
    }
}

/// Settings for the `/index.md` rendition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Top-level `#` heading.
    pub heading: String,
    /// Entries of the Navigation section, pointing at other markdown routes.
    pub navigation: Vec<LinkEntry>,
    /// Social link labels listed in the Links section, in order.
    pub links: Vec<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            heading: "Just Carlson".to_string(),
            navigation: vec![
                LinkEntry::new("/about.md", "About"),
                LinkEntry::new("/posts.md", "Recent Posts"),
                LinkEntry::new("/rss.xml", "RSS Feed"),
            ],
            links: vec!["GitHub".to_string(), "LinkedIn".to_string()],
        }
    }
}

/// Largest avatar edge Gravatar serves, in pixels.
pub const MAX_AVATAR_SIZE: u32 = 2048;

/// Remote images shown on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Avatar image URL. Ignored when `gravatar_email` is set.
    pub avatar: String,
    /// Derive the avatar from this address's Gravatar.
    pub gravatar_email: Option<String>,
    /// Avatar edge length in CSS pixels.
    pub avatar_size: u32,
    /// Show the GitHub contribution chart for the `GitHub` social link.
    pub contribution_chart: bool,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            avatar: "https://gravatar.com/avatar/?s=256&d=mp".to_string(),
            gravatar_email: None,
            avatar_size: 128,
            contribution_chart: true,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub addr: String,
    /// Number of request worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:4321".to_string(),
            workers: None,
        }
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_workers(config: &ServerConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.workers.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Field checks
// =============================================================================

fn absolute_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{field} '{value}' is not a valid URL: {e}")))
}

/// Accept an absolute URL or a root-relative path.
fn link_target(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') && !value.starts_with("//") {
        return Ok(());
    }
    absolute_url(field, value).map(|_| ())
}

fn check_link(field: &str, link: &LinkEntry) -> Result<(), ConfigError> {
    if link.label.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field}: link to '{}' has an empty label",
            link.href
        )));
    }
    link_target(field, &link.href)
}

/// Primary language subtag plus optional subtags, e.g. `en`, `en-US`.
fn is_language_tag(lang: &str) -> bool {
    let mut parts = lang.split('-');
    let primary = parts.next().unwrap_or("");
    (2..=3).contains(&primary.len())
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && parts.all(|p| (1..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Names known to the IANA tz database, e.g. `Europe/Berlin` or `UTC`.
fn is_iana_timezone(tz: &str) -> bool {
    tz.parse::<chrono_tz::Tz>().is_ok()
}

// =============================================================================
// Config loading, merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
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

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to the stock defaults when
/// it does not exist.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# justcarlson.com site configuration
# ==================================
# All settings are optional. Values shown below are the defaults.
# Tables merge over the defaults; arrays replace them.
# Unknown keys will cause an error.

# Canonical site URL (absolute).
website = "https://justcarlson.com/"
author = "Justin Carlson"
author_full_name = "Justin Carlson"
profile = "https://justcarlson.com/about"
desc = "Writing about things I find interesting."
title = "Justin Carlson"

# Open Graph image, relative to the site root.
og_image = "og.png"

light_and_dark_mode = true
show_archives = false
show_back_button = false
dynamic_og_image = true

# Posts on the home page / per listing page. Must be > 0.
post_per_index = 10
post_per_page = 10

# A post dated up to this many milliseconds in the future is still published.
scheduled_post_margin = 900000

lang = "en"
timezone = "America/Los_Angeles"

[edit_post]
enabled = true
text = "Edit on GitHub"
url = "https://github.com/justcarlson/justcarlson.com/edit/main/"

# ---------------------------------------------------------------------------
# Links (order is rendering order)
# ---------------------------------------------------------------------------
[[nav_links]]
href = "/"
label = "Blog"

[[nav_links]]
href = "/about"
label = "About"

[[social_links]]
href = "https://github.com/justcarlson"
label = "GitHub"

[[social_links]]
href = "https://x.com/_justcarlson"
label = "X"

[[social_links]]
href = "https://www.linkedin.com/in/justincarlson0/"
label = "LinkedIn"

[[social_links]]
href = "/rss.xml"
label = "RSS"

# Social link label -> icon. Unmapped labels get a generic icon.
[icons]
GitHub = "github"
X = "twitter"
LinkedIn = "linkedin"
RSS = "rss"

# ---------------------------------------------------------------------------
# Newsletter (placeholder; leave the strings empty while disabled)
# ---------------------------------------------------------------------------
[newsletter]
enabled = false
provider = ""
form_action = ""
tag = ""

# ---------------------------------------------------------------------------
# Markdown rendition served at /index.md
# ---------------------------------------------------------------------------
[markdown]
heading = "Just Carlson"
# Social link labels listed under "Links".
links = ["GitHub", "LinkedIn"]

[[markdown.navigation]]
href = "/about.md"
label = "About"

[[markdown.navigation]]
href = "/posts.md"
label = "Recent Posts"

[[markdown.navigation]]
href = "/rss.xml"
label = "RSS Feed"

# ---------------------------------------------------------------------------
# Home page images
# ---------------------------------------------------------------------------
[home]
avatar = "https://gravatar.com/avatar/?s=256&d=mp"
# gravatar_email = "you@example.com"
# Edge length in CSS pixels, 1 to 2048.
avatar_size = 128
# Requires a social link labelled "GitHub".
contribution_chart = true

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
addr = "127.0.0.1:4321"
# Omit to use one worker per CPU core.
# workers = 4
"##
}
