//! CLI output formatting.
//!
//! Everything the binary reports goes through here: the config summary
//! printed by `check`, the startup banner, one line per served request, and
//! the files written by `render`.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Site
//!     Justin Carlson → https://justcarlson.com/
//!     Description: Writing about things I find interesting.
//!     Locale: en, America/Los_Angeles
//!     Pagination: 10 on index, 10 per page
//!     Scheduled post margin: 15m
//!
//! Navigation
//! 001 Blog → /
//! 002 About → /about
//!
//! Social
//! 001 GitHub → https://github.com/justcarlson [github]
//! ```
//!
//! ## Serve
//!
//! ```text
//! ==> Serving Justin Carlson at http://127.0.0.1:4321 (4 workers)
//! GET /index.md → 200
//! GET /favicon.ico → 404
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns lines (or a line) for testability; the
//! `print_*` wrappers write them to stdout. Format functions are pure.

use crate::markdown::TextRoute;
use crate::site::Site;
use crate::types::LinkEntry;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Whole minutes when exact, otherwise seconds, otherwise milliseconds.
fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms == 0 {
        "0".to_string()
    } else if ms % 60_000 == 0 {
        format!("{}m", ms / 60_000)
    } else if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{ms}ms")
    }
}

fn link_lines(links: &[LinkEntry], detail: impl Fn(&LinkEntry) -> Option<String>) -> Vec<String> {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let base = format!("{} {} → {}", format_index(i + 1), link.label, link.href);
            match detail(link) {
                Some(d) => format!("{base} [{d}]"),
                None => base,
            }
        })
        .collect()
}

// ============================================================================
// Check
// ============================================================================

/// Summarise a loaded site.
pub fn format_site_summary(site: &Site) -> Vec<String> {
    let mut lines = vec![
        "Site".to_string(),
        format!("{}{} → {}", indent(1), site.title(), site.website()),
        format!("{}Description: {}", indent(1), site.description()),
        format!("{}Locale: {}, {}", indent(1), site.lang(), site.timezone()),
        format!(
            "{}Pagination: {} on index, {} per page",
            indent(1),
            site.post_per_index(),
            site.post_per_page()
        ),
        format!(
            "{}Scheduled post margin: {}",
            indent(1),
            format_duration(site.scheduled_post_margin())
        ),
    ];

    let mut flags = Vec::new();
    if site.light_and_dark_mode() {
        flags.push("light/dark");
    }
    if site.show_archives() {
        flags.push("archives");
    }
    if site.show_back_button() {
        flags.push("back button");
    }
    if site.dynamic_og_image() {
        flags.push("dynamic OG images");
    }
    if site.edit_post().enabled {
        flags.push("edit links");
    }
    if !flags.is_empty() {
        lines.push(format!("{}Features: {}", indent(1), flags.join(", ")));
    }
    let edit = site.edit_post();
    if edit.enabled {
        lines.push(format!("{}Edit links: {} → {}", indent(1), edit.text, edit.url));
    }
    if site.newsletter().enabled {
        lines.push(format!(
            "{}Newsletter: {}",
            indent(1),
            site.newsletter().provider
        ));
    }

    lines.push(String::new());
    lines.push("Navigation".to_string());
    lines.extend(link_lines(site.nav_links(), |_| None));

    lines.push(String::new());
    lines.push("Social".to_string());
    lines.extend(link_lines(site.social_links(), |link| {
        Some(site.icon_for(&link.label).id().to_string())
    }));

    lines.push(String::new());
    lines.push("Images".to_string());
    lines.push(format!("{}Avatar: {}", indent(1), site.avatar_url()));
    if let Some(chart) = site.contribution_chart_url() {
        lines.push(format!("{}Contribution chart: {}", indent(1), chart));
    }

    lines.push(String::new());
    lines.push("Routes".to_string());
    lines.push(format!("{}/ → text/html", indent(1)));
    lines.push(format!("{}{} → text/markdown", indent(1), TextRoute::Index.path()));
    lines
}

pub fn print_site_summary(site: &Site) {
    for line in format_site_summary(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Serve
// ============================================================================

pub fn format_serve_banner(site: &Site, addr: &str, workers: usize) -> String {
    let plural = if workers == 1 { "" } else { "s" };
    format!(
        "==> Serving {} at http://{} ({} worker{})",
        site.title(),
        addr,
        workers,
        plural
    )
}

pub fn print_serve_banner(site: &Site, addr: &str, workers: usize) {
    println!("{}", format_serve_banner(site, addr, workers));
}

pub fn format_request_line(method: &str, url: &str, status: u16) -> String {
    format!("{} {} → {}", method, url, status)
}

pub fn print_request(method: &str, url: &str, status: u16) {
    println!("{}", format_request_line(method, url, status));
}

pub fn print_error(err: &dyn std::error::Error) {
    eprintln!("error: {}", err);
}

// ============================================================================
// Render
// ============================================================================

/// List written files relative to the output directory.
pub fn format_render_output(written: &[PathBuf], output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = written
        .iter()
        .map(|path| {
            let rel = path.strip_prefix(output_dir).unwrap_or(path);
            format!("Generated {}", rel.display())
        })
        .collect();
    lines.push(format!("Site rendered at {}", output_dir.display()));
    lines
}

pub fn print_render_output(written: &[PathBuf], output_dir: &Path) {
    for line in format_render_output(written, output_dir) {
        println!("{}", line);
    }
}
