//! Markdown renditions of site pages.
//!
//! Served alongside the HTML pages for readers and tools that prefer plain
//! text. Each rendition is built from the [`Site`] alone, so it is a pure
//! function of the configuration: no I/O, no failure path.
//!
//! ```text
//! GET /index.md
//! Content-Type: text/markdown; charset=utf-8
//! Cache-Control: public, max-age=3600
//!
//! # Just Carlson
//!
//! Writing about things I find interesting.
//!
//! ## Navigation
//!
//! - [About](/about.md)
//! ...
//! ```

use crate::site::Site;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Cache directive for rendered pages: public, one hour.
pub const CACHE_CONTROL: &str = "public, max-age=3600";

/// A fully-formed textual response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: &'static str,
    pub body: String,
}

/// Logical paths with a markdown rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRoute {
    /// `/index.md`: the home page.
    Index,
}

impl TextRoute {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/index.md" => Some(TextRoute::Index),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            TextRoute::Index => "/index.md",
        }
    }

    pub fn respond(self, site: &Site) -> TextResponse {
        let body = match self {
            TextRoute::Index => index_markdown(site),
        };
        TextResponse {
            status: 200,
            content_type: MARKDOWN_CONTENT_TYPE,
            cache_control: CACHE_CONTROL,
            body,
        }
    }
}

/// Markdown rendition of the home page.
pub fn index_markdown(site: &Site) -> String {
    let md = site.markdown();
    let mut doc = format!("# {}\n\n{}\n\n## Navigation\n\n", md.heading, site.description());

    for link in &md.navigation {
        doc.push_str(&format!(
            "- [{}]({})\n",
            escape_text(&link.label),
            escape_destination(&link.href)
        ));
    }

    doc.push_str("\n## Links\n\n");
    // Labels are checked against social_links at startup.
    for link in md.links.iter().filter_map(|label| site.social_link(label)) {
        doc.push_str(&format!(
            "- {}: [{}]({})\n",
            escape_text(&link.label),
            escape_text(link.handle()),
            escape_destination(&link.href)
        ));
    }

    let host = site.site_host();
    doc.push_str(&format!(
        "\n---\n\n*This is the markdown version of {host}. Visit [{host}]({}) for the full experience.*",
        site.site_origin()
    ));
    doc
}

/// Backslash-escape characters that would open or close link text.
fn escape_text(text: &str) -> String {
    escape(text, &['\\', '[', ']'])
}

/// Backslash-escape characters that would end a link destination early.
fn escape_destination(href: &str) -> String {
    escape(href, &['\\', '(', ')', '<', '>'])
}

fn escape(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
