//! HTML page rendering.
//!
//! Pages are rendered with [maud](https://maud.lambda.xyz/) from the [`Site`]
//! alone. The home page embeds two remotely hosted images: the avatar
//! (Gravatar) and the GitHub contribution chart. Either host may be slow,
//! down, or blocked by the reader's network, so the page is built to survive
//! without them.
//!
//! ## Remote images
//!
//! Every remote image goes through [`remote_image`], which
//!
//! - wraps the `<img>` in a `.img-fallback` box that paints a placeholder
//!   (author initials, or a caption) underneath the image,
//! - gives the `<img>` explicit dimensions so layout never shifts,
//! - hides the `<img>` in its `onerror` handler, so a failed load shows the
//!   placeholder instead of a broken-image glyph.
//!
//! Nothing else on the page leaves the origin: CSS is inlined and the
//! favicon is a data URI. With every remote request blocked the header,
//! `h1` and `main` render exactly as before, and the only console output is
//! the browser's own report of the blocked image requests.

use crate::markdown::{self, TextRoute};
use crate::site::Site;
use crate::types::LinkEntry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Build revision, stamped by `build.rs`.
pub const REVISION: &str = env!("SITE_REVISION");

/// Hide a failed image and mark its placeholder box.
const HIDE_ON_ERROR: &str = "this.hidden=true;this.parentElement.classList.add('img-failed')";

/// A remotely hosted image and the placeholder shown in its place.
#[derive(Debug, Clone)]
pub struct RemoteImage<'a> {
    pub src: &'a str,
    pub alt: &'a str,
    pub width: u32,
    pub height: u32,
    /// Text painted on the placeholder.
    pub fallback: &'a str,
    /// Extra class on the placeholder box.
    pub class: &'a str,
}

/// Render a remote image inside its fallback box.
pub fn remote_image(image: &RemoteImage) -> Markup {
    let style = format!(
        "--w: {}px; --ratio: {} / {};",
        image.width, image.width, image.height
    );
    html! {
        span.img-fallback.(image.class) data-fallback=(image.fallback) style=(style) {
            img src=(image.src) alt=(image.alt) width=(image.width) height=(image.height)
                loading="lazy" decoding="async" referrerpolicy="no-referrer"
                onerror=(HIDE_ON_ERROR);
        }
    }
}

// ============================================================================
// Stylesheet
// ============================================================================

/// CSS custom properties for the color scheme(s), followed by the base styles.
pub fn stylesheet(light_and_dark_mode: bool) -> String {
    let light = r#":root {
    color-scheme: light;
    --color-bg: #fdfdfd;
    --color-text: #282728;
    --color-text-muted: #6b6b6b;
    --color-link: #006cac;
    --color-placeholder: #e6e6e6;
}"#;
    let dark = r#"@media (prefers-color-scheme: dark) {
    :root {
        color-scheme: dark;
        --color-bg: #212737;
        --color-text: #eaedf3;
        --color-text-muted: #a0a7b5;
        --color-link: #ff6b01;
        --color-placeholder: #343f60;
    }
}"#;
    if light_and_dark_mode {
        format!("{light}\n\n{dark}\n\n{CSS_STATIC}")
    } else {
        format!("{light}\n\n{CSS_STATIC}")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Schema.org description of the site and its author, for the page head.
fn structured_data(site: &Site) -> String {
    let same_as: Vec<&str> = site
        .social_links()
        .iter()
        .filter(|l| l.is_external())
        .map(|l| l.href.as_str())
        .collect();
    let data = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": site.title(),
        "description": site.description(),
        "url": site.website().as_str(),
        "inLanguage": site.lang(),
        "author": {
            "@type": "Person",
            "name": site.author_full_name(),
            "url": site.canonical_url(site.profile()),
            "sameAs": same_as,
        },
    });
    // Keep `</script>` out of the inline block.
    data.to_string().replace("</", "<\\/")
}

/// Renders the base HTML document structure
fn base_document(site: &Site, page_title: &str, content: Markup) -> Markup {
    let color_scheme = if site.light_and_dark_mode() {
        "light dark"
    } else {
        "light"
    };
    html! {
        (DOCTYPE)
        html lang=(site.lang()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                meta name="description" content=(site.description());
                meta name="author" content=(site.author());
                meta name="color-scheme" content=(color_scheme);
                meta name="generator" content={ "justcarlson " (REVISION) };
                link rel="canonical" href=(site.website().as_str());
                // Inline favicon: no request, no 404 in the console.
                link rel="icon" href="data:,";
                link rel="alternate" type="text/markdown" href=(TextRoute::Index.path());
                link rel="alternate" type="application/rss+xml" title=(site.title()) href="/rss.xml";
                meta property="og:type" content="website";
                meta property="og:title" content=(page_title);
                meta property="og:description" content=(site.description());
                meta property="og:url" content=(site.website().as_str());
                meta property="og:image" content=(site.canonical_url(site.og_image()));
                meta name="twitter:card" content="summary_large_image";
                script type="application/ld+json" { (PreEscaped(structured_data(site))) }
                style { (PreEscaped(stylesheet(site.light_and_dark_mode()))) }
            }
            body {
                a.skip-link href="#main-content" { "Skip to content" }
                (content)
            }
        }
    }
}

/// Renders the site header with the navigation links.
pub fn site_header(site: &Site, current_path: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (site.title()) }
            nav.site-nav aria-label="Main" {
                ul {
                    @for link in site.nav_links() {
                        (nav_item(link, current_path))
                    }
                    @if site.show_archives() {
                        (nav_item(&LinkEntry::new("/archives", "Archives"), current_path))
                    }
                }
            }
        }
    }
}

fn nav_item(link: &LinkEntry, current_path: &str) -> Markup {
    let is_current = link.href == current_path;
    html! {
        li {
            a href=(link.href) aria-current=[is_current.then_some("page")] { (link.label) }
        }
    }
}

/// Renders the social links, each with its icon.
pub fn social_links(site: &Site) -> Markup {
    html! {
        ul.social-links {
            @for link in site.social_links() {
                @let icon = site.icon_for(&link.label);
                li {
                    @if link.is_external() {
                        a href=(link.href) rel="me noopener" target="_blank" aria-label=(link.label) {
                            (icon_svg(icon.id(), icon.svg_path()))
                            span.label { (link.label) }
                        }
                    } @else {
                        a href=(link.href) aria-label=(link.label) {
                            (icon_svg(icon.id(), icon.svg_path()))
                            span.label { (link.label) }
                        }
                    }
                }
            }
        }
    }
}

fn icon_svg(id: &str, path: &str) -> Markup {
    html! {
        svg.icon data-icon=(id) viewBox="0 0 24 24" aria-hidden="true" {
            path d=(path) {}
        }
    }
}

/// Newsletter signup. Renders nothing while the newsletter is disabled.
fn newsletter_form(site: &Site) -> Markup {
    let newsletter = site.newsletter();
    html! {
        @if newsletter.enabled {
            form.newsletter method="post" action=(newsletter.form_action) data-provider=(newsletter.provider) {
                label for="newsletter-email" { "Subscribe by email" }
                input type="email" id="newsletter-email" name="email" required;
                @if !newsletter.tag.is_empty() {
                    input type="hidden" name="tag" value=(newsletter.tag);
                }
                button type="submit" { "Subscribe" }
            }
        }
    }
}

fn site_footer(site: &Site) -> Markup {
    html! {
        footer.site-footer {
            p {
                "© " (site.author_full_name())
                " · "
                a href=(TextRoute::Index.path()) { "Markdown version" }
            }
        }
    }
}

/// Markdown for short prose. Raw HTML is dropped and images become their
/// alt text, so every remote image on a page goes through [`remote_image`].
fn markdown_inline(text: &str) -> String {
    let events = Parser::new(text).filter(|event| {
        !matches!(
            event,
            Event::Html(_)
                | Event::InlineHtml(_)
                | Event::Start(Tag::Image { .. })
                | Event::End(TagEnd::Image)
        )
    });
    let mut out = String::new();
    md_html::push_html(&mut out, events);
    out
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page.
pub fn render_home(site: &Site) -> Markup {
    let avatar_src = site.avatar_url();
    let initials = site.author_initials();
    let avatar_alt = format!("Photo of {}", site.author_full_name());
    let size = site.home().avatar_size;
    let chart_src = site.contribution_chart_url();

    let content = html! {
        (site_header(site, "/"))
        main #main-content .home-page {
            section.hero {
                (remote_image(&RemoteImage {
                    src: &avatar_src,
                    alt: &avatar_alt,
                    width: size,
                    height: size,
                    fallback: &initials,
                    class: "avatar",
                }))
                h1 { (site.title()) }
                div.lede { (PreEscaped(markdown_inline(site.description()))) }
                (social_links(site))
            }
            @if let Some(chart_src) = &chart_src {
                figure.chart {
                    (remote_image(&RemoteImage {
                        src: chart_src,
                        alt: "GitHub contribution activity",
                        width: 663,
                        height: 104,
                        fallback: "Contribution chart unavailable",
                        class: "chart-frame",
                    }))
                    figcaption { "Contributions on GitHub" }
                }
            }
            (newsletter_form(site))
        }
        (site_footer(site))
    };

    base_document(site, site.title(), content)
}

/// Write every page and its markdown rendition to `output_dir`.
///
/// Returns the written paths in the order they were written.
pub fn write_pages(site: &Site, output_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let home = output_dir.join("index.html");
    fs::write(&home, render_home(site).into_string())?;

    let index_md = output_dir.join("index.md");
    fs::write(&index_md, markdown::index_markdown(site))?;

    Ok(vec![home, index_md])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{default_site, site_from_toml};

    #[test]
    fn remote_image_has_fallback_box() {
        let html = remote_image(&RemoteImage {
            src: "https://gravatar.com/avatar/x",
            alt: "Avatar",
            width: 64,
            height: 64,
            fallback: "JC",
            class: "avatar",
        })
        .into_string();
        assert!(html.starts_with(r#"<span class="img-fallback avatar" data-fallback="JC""#));
        assert!(html.contains(r#"width="64""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains(r#"referrerpolicy="no-referrer""#));
        assert!(html.contains("onerror=\"this.hidden=true;"));
    }

    #[test]
    fn home_has_heading_and_main() {
        let html = render_home(&default_site()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Justin Carlson</h1>"));
        assert!(html.contains(r#"<main class="home-page" id="main-content">"#));
    }

    #[test]
    fn home_embeds_avatar_and_chart() {
        let html = render_home(&default_site()).into_string();
        assert!(html.contains("https://gravatar.com/avatar/"));
        assert!(html.contains("https://ghchart.rshah.org/justcarlson"));
        assert!(html.contains(r#"data-fallback="JC""#));
    }

    #[test]
    fn home_without_chart() {
        let site = site_from_toml(
            r#"
[home]
contribution_chart = false
"#,
        );
        let html = render_home(&site).into_string();
        assert!(!html.contains("ghchart"));
        assert!(!html.contains("<figure"));
    }

    #[test]
    fn favicon_is_inline() {
        let html = render_home(&default_site()).into_string();
        assert!(html.contains(r#"<link rel="icon" href="data:,">"#));
    }

    #[test]
    fn head_metadata() {
        let html = render_home(&default_site()).into_string();
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://justcarlson.com/">"#));
        assert!(html.contains(r#"content="https://justcarlson.com/og.png""#));
        assert!(html.contains(r#"type="text/markdown" href="/index.md""#));
    }

    #[test]
    fn structured_data_lists_external_profiles() {
        let data: serde_json::Value =
            serde_json::from_str(&structured_data(&default_site())).unwrap();
        let same_as = data["author"]["sameAs"].as_array().unwrap();
        assert_eq!(same_as.len(), 3);
        assert_eq!(data["author"]["url"], "https://justcarlson.com/about");
    }

    #[test]
    fn structured_data_escapes_script_end() {
        let site = site_from_toml(r#"desc = "a </script> b""#);
        assert!(!structured_data(&site).contains("</script>"));
    }

    #[test]
    fn nav_marks_current_page() {
        let html = site_header(&default_site(), "/about").into_string();
        assert!(html.contains(r#"<a href="/about" aria-current="page">About</a>"#));
        assert!(html.contains(r#"<a href="/">Blog</a>"#));
    }

    #[test]
    fn archives_link_follows_flag() {
        let html = site_header(&default_site(), "/").into_string();
        assert!(!html.contains("/archives"));

        let site = site_from_toml("show_archives = true");
        let html = site_header(&site, "/").into_string();
        assert!(html.contains(r#"href="/archives""#));
    }

    #[test]
    fn social_links_render_in_order_with_icons() {
        let html = social_links(&default_site()).into_string();
        let github = html.find(r#"data-icon="github""#).unwrap();
        let x = html.find(r#"data-icon="twitter""#).unwrap();
        let linkedin = html.find(r#"data-icon="linkedin""#).unwrap();
        let rss = html.find(r#"data-icon="rss""#).unwrap();
        assert!(github < x && x < linkedin && linkedin < rss);
    }

    #[test]
    fn unmapped_social_label_gets_generic_icon() {
        let site = site_from_toml(
            r#"
[markdown]
links = ["GitHub"]

[[social_links]]
href = "https://github.com/justcarlson"
label = "GitHub"

[[social_links]]
href = "https://bsky.app/profile/justcarlson.com"
label = "Bluesky"
"#,
        );
        let html = social_links(&site).into_string();
        assert!(html.contains(r#"data-icon="link""#));
        assert!(html.contains("Bluesky"));
    }

    #[test]
    fn internal_social_link_opens_in_place() {
        let html = social_links(&default_site()).into_string();
        assert!(html.contains(r#"<a href="/rss.xml" aria-label="RSS">"#));
    }

    #[test]
    fn newsletter_hidden_when_disabled() {
        let html = render_home(&default_site()).into_string();
        assert!(!html.contains(r#"class="newsletter""#));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn newsletter_form_when_enabled() {
        let site = site_from_toml(
            r#"
[newsletter]
enabled = true
provider = "buttondown"
form_action = "https://buttondown.com/api/emails/embed-subscribe/justcarlson"
tag = "blog"
"#,
        );
        let html = render_home(&site).into_string();
        assert!(html.contains(
            r#"action="https://buttondown.com/api/emails/embed-subscribe/justcarlson""#
        ));
        assert!(html.contains(r#"name="tag" value="blog""#));
    }

    #[test]
    fn description_is_rendered_as_markdown() {
        let site = site_from_toml(r#"desc = "Writing about *things*.""#);
        let html = render_home(&site).into_string();
        assert!(html.contains("<em>things</em>"));
    }

    fn lede(html: &str) -> &str {
        let start = html.find(r#"<div class="lede">"#).unwrap();
        let end = start + html[start..].find("</div>").unwrap();
        &html[start..end]
    }

    #[test]
    fn description_images_become_alt_text() {
        let site = site_from_toml(r#"desc = "Hi ![me](https://gravatar.com/avatar/zzz)""#);
        let html = render_home(&site).into_string();
        assert!(lede(&html).starts_with(r#"<div class="lede"><p>Hi me</p>"#));
        assert!(!lede(&html).contains("<img"));
        assert!(!lede(&html).contains("avatar/zzz"));
    }

    #[test]
    fn description_drops_raw_html() {
        let site = site_from_toml(
            r#"desc = "Hi <img src=\"https://example.com/x.png\"> there <script>alert(1)</script>""#,
        );
        let html = render_home(&site).into_string();
        let text = lede(&html);
        assert!(text.contains("Hi"));
        assert!(!text.contains("<img"));
        assert!(!text.contains("example.com/x.png"));
        assert!(!text.contains("<script"));
    }

    #[test]
    fn largest_gravatar_renders() {
        let site = site_from_toml(
            r#"
[home]
gravatar_email = "hello@justcarlson.com"
avatar_size = 2048
"#,
        );
        let html = render_home(&site).into_string();
        assert!(html.contains(r#"width="2048""#));
        assert!(html.contains("s=2048&amp;d=404"));
    }

    #[test]
    fn titles_are_escaped() {
        let site = site_from_toml(r#"title = "<b>bold</b>""#);
        let html = render_home(&site).into_string();
        assert!(html.contains("<h1>&lt;b&gt;bold&lt;/b&gt;</h1>"));
    }

    #[test]
    fn single_color_scheme() {
        assert!(stylesheet(true).contains("prefers-color-scheme: dark"));
        assert!(!stylesheet(false).contains("prefers-color-scheme: dark"));
    }

    #[test]
    fn write_pages_creates_both_renditions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("dist");
        let site = default_site();
        let written = write_pages(&site, &out).unwrap();

        assert_eq!(written, vec![out.join("index.html"), out.join("index.md")]);
        assert_eq!(
            fs::read_to_string(out.join("index.md")).unwrap(),
            markdown::index_markdown(&site)
        );
        assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("<h1>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let site = default_site();
        assert_eq!(
            render_home(&site).into_string(),
            render_home(&site).into_string()
        );
    }
}
