//! Route tests over a real socket.
//!
//! Each test binds the server to an ephemeral port, serves from a background
//! thread, and talks to it with a minimal HTTP/1.1 client so the headers
//! checked are the ones a browser or crawler would see.

use justcarlson::config::SiteConfig;
use justcarlson::markdown::index_markdown;
use justcarlson::server::Server;
use justcarlson::site::Site;
use std::io::{Read as _, Write as _};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ===========================================================================
// Test server and client
// ===========================================================================

fn start(site: Site) -> SocketAddr {
    let server = Server::bind(Arc::new(site), "127.0.0.1:0").unwrap();
    let addr = server.local_addr().unwrap();
    // Detached: the process exit ends the workers.
    thread::spawn(move || server.run(2));
    addr
}

fn default_site() -> Site {
    Site::from_config(SiteConfig::default()).unwrap()
}

struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

fn request(addr: SocketAddr, method: &str, path: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).unwrap();

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header block");
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    let body = raw[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("status line");
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body,
    }
}

fn get(addr: SocketAddr, path: &str) -> RawResponse {
    request(addr, "GET", path)
}

// ===========================================================================
// Markdown rendition
// ===========================================================================

#[test]
fn index_md_headers() {
    let addr = start(default_site());
    let res = get(addr, "/index.md");
    assert_eq!(res.status, 200);
    assert_eq!(
        res.header("Content-Type"),
        Some("text/markdown; charset=utf-8")
    );
    assert_eq!(res.header("Cache-Control"), Some("public, max-age=3600"));
}

#[test]
fn index_md_body_is_the_document() {
    let site = default_site();
    let expected = index_markdown(&site);
    let addr = start(site);
    let res = get(addr, "/index.md");
    assert_eq!(res.text(), expected);
    assert!(res.text().starts_with("# Just Carlson\n"));
    assert!(res.text().contains("- GitHub: [justcarlson](https://github.com/justcarlson)"));
}

#[test]
fn index_md_is_stable_across_requests() {
    let addr = start(default_site());
    let first = get(addr, "/index.md").body;
    let second = get(addr, "/index.md").body;
    assert_eq!(first, second);
}

#[test]
fn index_md_ignores_query_string() {
    let addr = start(default_site());
    let res = get(addr, "/index.md?ref=llms");
    assert_eq!(res.status, 200);
    assert_eq!(res.text(), get(addr, "/index.md").text());
}

#[test]
fn index_md_reflects_configuration() {
    let mut config = SiteConfig::default();
    config.markdown.heading = "Notes".to_string();
    let addr = start(Site::from_config(config).unwrap());
    assert!(get(addr, "/index.md").text().starts_with("# Notes\n"));
}

// ===========================================================================
// Home page and errors
// ===========================================================================

#[test]
fn home_page_is_html() {
    let addr = start(default_site());
    let res = get(addr, "/");
    assert_eq!(res.status, 200);
    assert_eq!(res.header("Content-Type"), Some("text/html; charset=utf-8"));
    let html = res.text();
    assert!(html.contains("<h1>Justin Carlson</h1>"));
    assert!(html.contains(r#"href="/index.md""#));
}

#[test]
fn head_sends_headers_only() {
    let addr = start(default_site());
    let res = request(addr, "HEAD", "/index.md");
    assert_eq!(res.status, 200);
    assert_eq!(
        res.header("Content-Type"),
        Some("text/markdown; charset=utf-8")
    );
    assert!(res.body.is_empty());
}

#[test]
fn unknown_path_is_404() {
    let addr = start(default_site());
    let res = get(addr, "/index.txt");
    assert_eq!(res.status, 404);
    assert_eq!(res.header("Cache-Control"), None);
}

#[test]
fn post_is_405_with_allow() {
    let addr = start(default_site());
    let res = request(addr, "POST", "/index.md");
    assert_eq!(res.status, 405);
    assert_eq!(res.header("Allow"), Some("GET, HEAD"));
}

#[test]
fn concurrent_requests_all_succeed() {
    let addr = start(default_site());
    let expected = get(addr, "/index.md").body;

    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(move || get(addr, "/index.md")))
        .collect();
    for handle in handles {
        let res = handle.join().unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body, expected);
    }
}
