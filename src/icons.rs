//! Social link icons.
//!
//! The config maps link labels to icon ids (`GitHub = "github"`). Lookup is
//! total: a label with no entry, or an entry naming an icon we don't ship,
//! resolves to [`Icon::Generic`] instead of failing.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    GitHub,
    Twitter,
    LinkedIn,
    Rss,
    Mail,
    /// Shown for any label without a known icon.
    Generic,
}

impl Icon {
    /// Parse an icon id as written in `[icons]`.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "github" => Icon::GitHub,
            "twitter" | "x" => Icon::Twitter,
            "linkedin" => Icon::LinkedIn,
            "rss" | "feed" => Icon::Rss,
            "mail" | "email" => Icon::Mail,
            _ => Icon::Generic,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Icon::GitHub => "github",
            Icon::Twitter => "twitter",
            Icon::LinkedIn => "linkedin",
            Icon::Rss => "rss",
            Icon::Mail => "mail",
            Icon::Generic => "link",
        }
    }

    /// Inline SVG body (24x24 viewBox, stroked with `currentColor`).
    pub fn svg_path(self) -> &'static str {
        match self {
            Icon::GitHub => {
                "M9 19c-4.3 1.4-4.3-2.5-6-3m12 5v-3.5c0-1 .1-1.4-.5-2 2.8-.3 5.5-1.4 5.5-6a4.6 4.6 0 0 0-1.3-3.2 4.2 4.2 0 0 0-.1-3.2s-1.1-.3-3.5 1.3a12.3 12.3 0 0 0-6.2 0C6.5 2.8 5.4 3.1 5.4 3.1a4.2 4.2 0 0 0-.1 3.2A4.6 4.6 0 0 0 4 9.5c0 4.6 2.7 5.7 5.5 6-.6.6-.6 1.2-.5 2V21"
            }
            Icon::Twitter => "M4 4l11.7 16H20L8.3 4H4zM4 20l6.8-6.8M13.2 10.8L20 4",
            Icon::LinkedIn => {
                "M16 8a6 6 0 0 1 6 6v7h-4v-7a2 2 0 0 0-4 0v7h-4v-7a6 6 0 0 1 6-6zM2 9h4v12H2zM4 2a2 2 0 1 1 0 4 2 2 0 0 1 0-4z"
            }
            Icon::Rss => "M4 11a9 9 0 0 1 9 9M4 4a16 16 0 0 1 16 16M5 19a1 1 0 1 0 0 .01",
            Icon::Mail => "M3 5h18v14H3zM3 5l9 8 9-8",
            Icon::Generic => {
                "M10 13a5 5 0 0 0 7.5.5l3-3a5 5 0 0 0-7-7l-1.7 1.7M14 11a5 5 0 0 0-7.5-.5l-3 3a5 5 0 0 0 7 7l1.7-1.7"
            }
        }
    }
}

/// Resolve the icon for a social link label.
pub fn icon_for(icons: &BTreeMap<String, String>, label: &str) -> Icon {
    icons
        .get(label)
        .map(|id| Icon::from_id(id))
        .unwrap_or(Icon::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn default_labels_resolve() {
        let icons = SiteConfig::default().icons;
        assert_eq!(icon_for(&icons, "GitHub"), Icon::GitHub);
        assert_eq!(icon_for(&icons, "X"), Icon::Twitter);
        assert_eq!(icon_for(&icons, "LinkedIn"), Icon::LinkedIn);
        assert_eq!(icon_for(&icons, "RSS"), Icon::Rss);
    }

    #[test]
    fn unmapped_label_is_generic() {
        let icons = SiteConfig::default().icons;
        assert_eq!(icon_for(&icons, "Mastodon"), Icon::Generic);
    }

    #[test]
    fn unknown_icon_id_is_generic() {
        let icons: BTreeMap<String, String> =
            [("Mastodon".to_string(), "mastodon".to_string())].into();
        assert_eq!(icon_for(&icons, "Mastodon"), Icon::Generic);
    }

    #[test]
    fn ids_are_case_insensitive() {
        assert_eq!(Icon::from_id("GitHub"), Icon::GitHub);
        assert_eq!(Icon::from_id(" RSS "), Icon::Rss);
    }

    #[test]
    fn id_round_trips_for_shipped_icons() {
        for icon in [Icon::GitHub, Icon::Twitter, Icon::LinkedIn, Icon::Rss, Icon::Mail] {
            assert_eq!(Icon::from_id(icon.id()), icon);
        }
        assert_eq!(Icon::Generic.id(), "link");
    }
}
