//! # justcarlson
//!
//! The blog and portfolio site at justcarlson.com, served by one binary.
//! A single site configuration drives everything: page metadata, navigation,
//! social links, and the markdown rendition served next to the HTML.
//!
//! # Architecture: Config In, Pages Out
//!
//! ```text
//! site.toml ─→ SiteConfig ─→ validate ─→ Site (Arc, read-only)
//!                                          │
//!                  ┌───────────────────────┼─────────────────────┐
//!                  ▼                       ▼                     ▼
//!           render::render_home   markdown::index_markdown   output (check)
//!                  └───────────┬───────────┘
//!                              ▼
//!                       server::route  ←─ tiny_http workers
//! ```
//!
//! Configuration is loaded and checked once, at startup. A bad value stops
//! the process before it binds a socket; after that nothing can fail except
//! writing to a client. Every route is a pure function of the [`site::Site`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Link entries, edit-post and newsletter settings |
//! | [`site`] | The frozen, read-only site store and derived values |
//! | [`icons`] | Social label → icon lookup with a generic fallback |
//! | [`markdown`] | Markdown renditions (`/index.md`) with their headers |
//! | [`render`] | HTML pages via Maud, including remote-image fallbacks |
//! | [`server`] | Routing and the `tiny_http` front |
//! | [`output`] | CLI and request-log formatting |
//!
//! # Design Decisions
//!
//! ## Remote Images Never Break the Page
//!
//! The avatar and the contribution chart live on third-party hosts. Each is
//! rendered inside a placeholder box and hides itself on error, and nothing
//! else on the page is fetched from another origin. See [`render`].
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error, interpolation is escaped, and there is no template
//! directory to deploy.

pub mod config;
pub mod icons;
pub mod markdown;
pub mod output;
pub mod render;
pub mod server;
pub mod site;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
