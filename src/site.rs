//! The read-only site store.
//!
//! [`Site`] is built once at startup from a validated [`SiteConfig`] and
//! shared as `Arc<Site>` by the server workers and renderers. It has no
//! setters; every consumer reads site metadata through it.

use crate::config::{
    self, ConfigError, HomeConfig, MAX_AVATAR_SIZE, MarkdownConfig, ServerConfig, SiteConfig,
};
use crate::icons::{self, Icon};
use crate::types::{EditPost, LinkEntry, NewsletterConfig};
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use url::Url;

const CONTRIBUTION_CHART_HOST: &str = "https://ghchart.rshah.org";

#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    website: Url,
}

impl Site {
    /// Validate `config` and freeze it.
    pub fn from_config(config: SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut website = Url::parse(&config.website)
            .map_err(|e| ConfigError::Validation(format!("website: {e}")))?;
        // Relative joins resolve against the directory, not its last segment.
        if !website.path().ends_with('/') {
            let path = format!("{}/", website.path());
            website.set_path(&path);
        }
        Ok(Self { config, website })
    }

    /// Load `site.toml` (stock defaults when absent) and freeze it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_config(config::load_config(path)?)
    }

    /// The underlying config, for serialisation.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Metadata
    // -------------------------------------------------------------------------

    pub fn website(&self) -> &Url {
        &self.website
    }

    pub fn author(&self) -> &str {
        &self.config.author
    }

    pub fn author_full_name(&self) -> &str {
        &self.config.author_full_name
    }

    pub fn profile(&self) -> &str {
        &self.config.profile
    }

    pub fn description(&self) -> &str {
        &self.config.desc
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn og_image(&self) -> &str {
        &self.config.og_image
    }

    pub fn lang(&self) -> &str {
        &self.config.lang
    }

    pub fn timezone(&self) -> &str {
        &self.config.timezone
    }

    // -------------------------------------------------------------------------
    // Feature flags and pagination
    // -------------------------------------------------------------------------

    pub fn light_and_dark_mode(&self) -> bool {
        self.config.light_and_dark_mode
    }

    pub fn show_archives(&self) -> bool {
        self.config.show_archives
    }

    pub fn show_back_button(&self) -> bool {
        self.config.show_back_button
    }

    pub fn dynamic_og_image(&self) -> bool {
        self.config.dynamic_og_image
    }

    pub fn post_per_index(&self) -> usize {
        self.config.post_per_index
    }

    pub fn post_per_page(&self) -> usize {
        self.config.post_per_page
    }

    pub fn scheduled_post_margin(&self) -> Duration {
        Duration::from_millis(self.config.scheduled_post_margin)
    }

    pub fn edit_post(&self) -> &EditPost {
        &self.config.edit_post
    }

    // -------------------------------------------------------------------------
    // Links
    // -------------------------------------------------------------------------

    pub fn nav_links(&self) -> &[LinkEntry] {
        &self.config.nav_links
    }

    pub fn social_links(&self) -> &[LinkEntry] {
        &self.config.social_links
    }

    pub fn social_link(&self, label: &str) -> Option<&LinkEntry> {
        self.config.social_link(label)
    }

    /// Icon for a social link label, [`Icon::Generic`] when unmapped.
    pub fn icon_for(&self, label: &str) -> Icon {
        icons::icon_for(&self.config.icons, label)
    }

    pub fn newsletter(&self) -> &NewsletterConfig {
        &self.config.newsletter
    }

    pub fn markdown(&self) -> &MarkdownConfig {
        &self.config.markdown
    }

    pub fn home(&self) -> &HomeConfig {
        &self.config.home
    }

    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Host name of the canonical site, e.g. `justcarlson.com`.
    pub fn site_host(&self) -> &str {
        self.website.host_str().unwrap_or_default()
    }

    /// Canonical site URL without a trailing slash, e.g. `https://justcarlson.com`.
    pub fn site_origin(&self) -> &str {
        self.website.as_str().trim_end_matches('/')
    }

    /// Absolute URL for a root-relative path. Absolute inputs pass through.
    pub fn canonical_url(&self, path: &str) -> String {
        if path.contains("://") {
            return path.to_string();
        }
        self.website
            .join(path.trim_start_matches('/'))
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/{}", self.site_origin(), path.trim_start_matches('/')))
    }

    /// Up to two uppercase initials of the author, used by image fallbacks.
    pub fn author_initials(&self) -> String {
        self.author_full_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Avatar image URL. A configured Gravatar address wins over `home.avatar`.
    pub fn avatar_url(&self) -> String {
        let home = &self.config.home;
        match &home.gravatar_email {
            // Twice the CSS size for high-density screens, within Gravatar's limit.
            Some(email) => gravatar_url(
                email,
                home.avatar_size.saturating_mul(2).min(MAX_AVATAR_SIZE),
            ),
            None => home.avatar.clone(),
        }
    }

    /// Contribution chart for the `GitHub` social link, if enabled.
    pub fn contribution_chart_url(&self) -> Option<String> {
        if !self.config.home.contribution_chart {
            return None;
        }
        self.social_link("GitHub")
            .map(|link| format!("{CONTRIBUTION_CHART_HOST}/{}", link.handle()))
    }

    /// Whether a post dated `publish_at` may be shown at `now`.
    ///
    /// Past posts always are; future posts are when they fall within
    /// `scheduled_post_margin` of `now`.
    pub fn is_publishable(&self, publish_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let margin = TimeDelta::milliseconds(
            i64::try_from(self.config.scheduled_post_margin).unwrap_or(i64::MAX),
        );
        publish_at - now <= margin
    }
}

/// Gravatar URL for an email address (SHA-256 of the normalised address).
pub fn gravatar_url(email: &str, size: u32) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("https://gravatar.com/avatar/{:x}?s={size}&d=404", digest)
}
