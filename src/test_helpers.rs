//! Shared test utilities for the justcarlson test suite.
//!
//! Builds validated [`Site`] values from inline TOML and provides small
//! lookups over rendered output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = site_from_toml(r#"title = "Elsewhere""#);
//! let md = crate::markdown::index_markdown(&site);
//! assert_eq!(section_lines(&md, "## Links").len(), 2);
//! ```

use std::fs;
use tempfile::TempDir;

use crate::site::Site;

// =========================================================================
// Site setup
// =========================================================================

/// The stock site, exactly as served with no `site.toml`.
pub fn default_site() -> Site {
    Site::from_config(Default::default()).expect("stock config must validate")
}

/// Write `toml` to a temporary `site.toml` and load it through the normal
/// startup path. Panics if the config does not validate.
pub fn site_from_toml(toml: &str) -> Site {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("site.toml");
    fs::write(&path, toml).unwrap();
    Site::load(&path).unwrap_or_else(|e| panic!("test config failed to load: {e}\n{toml}"))
}

// =========================================================================
// Output lookups
// =========================================================================

/// Lines between `heading` and the next blank line.
///
/// Panics if the heading is missing.
pub fn section_lines<'a>(doc: &'a str, heading: &str) -> Vec<&'a str> {
    let mut lines = doc.lines();
    if !lines.any(|l| l == heading) {
        panic!("heading '{heading}' not found in:\n{doc}");
    }
    lines
        .skip_while(|l| l.is_empty())
        .take_while(|l| !l.is_empty())
        .collect()
}
