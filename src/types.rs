//! Shared value types for site configuration.
//!
//! These are plain serde structs read from `site.toml` and handed, frozen,
//! to every renderer through [`crate::site::Site`].

use serde::{Deserialize, Serialize};

/// A `(href, label)` pair used for navigation and social links.
///
/// `href` is either root-relative (`/about`) or an absolute URL. Collections
/// of links are ordered: the order in the config file is the rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    pub href: String,
    pub label: String,
}

impl LinkEntry {
    pub fn new(href: &str, label: &str) -> Self {
        Self {
            href: href.to_string(),
            label: label.to_string(),
        }
    }

    /// True if `href` points off-site (has a scheme).
    pub fn is_external(&self) -> bool {
        self.href.contains("://")
    }

    /// Last non-empty path segment of the link, e.g. `justincarlson0` for
    /// `https://www.linkedin.com/in/justincarlson0/`.
    ///
    /// Falls back to the label for links with no usable path.
    pub fn handle(&self) -> &str {
        let path = self
            .href
            .split_once("://")
            .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
            .unwrap_or(&self.href);
        let path = path.split(['?', '#']).next().unwrap_or("");
        path.rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.label)
    }
}

/// "Edit this post" link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditPost {
    pub enabled: bool,
    /// Link text shown under a post.
    pub text: String,
    /// Base URL the post's source path is appended to.
    pub url: String,
}

impl Default for EditPost {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "Edit on GitHub".to_string(),
            url: "https://github.com/justcarlson/justcarlson.com/edit/main/".to_string(),
        }
    }
}

/// Newsletter signup placeholder. Disabled until a provider is configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsletterConfig {
    pub enabled: bool,
    /// Provider name, e.g. `"buttondown"`.
    pub provider: String,
    /// Absolute URL the signup form posts to.
    pub form_action: String,
    /// Optional subscriber tag.
    pub tag: String,
}
